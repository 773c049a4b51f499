//! Time windows that drive the bonus (Q, P) and horizon (K) rules.
//!
//! The three period shapes are independent records. The only behaviour they
//! share is closed-interval containment, exposed as [`contains`].

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Read access to a closed `[start, end]` interval
pub trait Window {
    fn start(&self) -> NaiveDateTime;
    fn end(&self) -> NaiveDateTime;

    /// A window whose start is after its end matches nothing
    fn is_inverted(&self) -> bool {
        self.start() > self.end()
    }
}

/// True when `at` lies inside the closed interval of `period`
pub fn contains<W: Window + ?Sized>(period: &W, at: NaiveDateTime) -> bool {
    period.start() <= at && at <= period.end()
}

/// Adds `fixed` to the remanent of every transaction inside the window
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct QPeriod {
    pub fixed: Decimal,
    #[serde(with = "crate::time::timestamp")]
    pub start: NaiveDateTime,
    #[serde(with = "crate::time::timestamp")]
    pub end: NaiveDateTime,
}

/// Raises the remanent of every transaction inside the window by `extra` percent
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PPeriod {
    pub extra: Decimal,
    #[serde(with = "crate::time::timestamp")]
    pub start: NaiveDateTime,
    #[serde(with = "crate::time::timestamp")]
    pub end: NaiveDateTime,
}

/// Investment-horizon bucket used when aggregating returns
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct KPeriod {
    #[serde(with = "crate::time::timestamp")]
    pub start: NaiveDateTime,
    #[serde(with = "crate::time::timestamp")]
    pub end: NaiveDateTime,
}

macro_rules! impl_window {
    ($($ty:ty),+) => {
        $(
            impl Window for $ty {
                fn start(&self) -> NaiveDateTime {
                    self.start
                }

                fn end(&self) -> NaiveDateTime {
                    self.end
                }
            }
        )+
    };
}

impl_window!(QPeriod, PPeriod, KPeriod);
