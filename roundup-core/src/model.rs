//! Record types flowing through the roundup pipeline.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A raw expense as submitted by the caller
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Expense {
    #[serde(with = "crate::time::timestamp")]
    pub date: NaiveDateTime,
    /// May be negative; rejection happens at validation, not here
    pub amount: Decimal,
}

impl Expense {
    pub fn new(date: NaiveDateTime, amount: Decimal) -> Self {
        Self { date, amount }
    }
}

/// An expense enriched with its ceiling and remanent
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transaction {
    #[serde(with = "crate::time::timestamp")]
    pub date: NaiveDateTime,
    pub amount: Decimal,
    /// Smallest multiple of the ceiling granularity not below `amount`
    pub ceiling: Decimal,
    /// Amount swept into investment (`ceiling - amount` before period rules)
    pub remanent: Decimal,
}

impl Transaction {
    /// Identity used for duplicate detection
    pub fn key(&self) -> (NaiveDateTime, Decimal) {
        // 250 and 250.00 are the same key
        (self.date, self.amount.normalize())
    }

    /// Copy of this transaction carrying a different remanent
    pub fn with_remanent(&self, remanent: Decimal) -> Self {
        Self { remanent, ..*self }
    }
}

/// Why a transaction was rejected by the validator
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Rejection {
    #[serde(rename = "negative amount")]
    NegativeAmount,
    #[serde(rename = "duplicate transaction")]
    Duplicate,
}

impl Rejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rejection::NegativeAmount => "negative amount",
            Rejection::Duplicate => "duplicate transaction",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transaction that failed validation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InvalidTransaction {
    #[serde(with = "crate::time::timestamp")]
    pub date: NaiveDateTime,
    pub amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ceiling: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remanent: Option<Decimal>,
    pub message: Rejection,
}

impl InvalidTransaction {
    pub fn rejected(txn: &Transaction, message: Rejection) -> Self {
        Self {
            date: txn.date,
            amount: txn.amount,
            ceiling: Some(txn.ceiling),
            remanent: Some(txn.remanent),
            message,
        }
    }
}

/// A valid transaction after Q/P adjustment, tagged with K membership
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ValidFilteredTransaction {
    #[serde(with = "crate::time::timestamp")]
    pub date: NaiveDateTime,
    pub amount: Decimal,
    pub ceiling: Decimal,
    pub remanent: Decimal,
    #[serde(rename = "inKPeriod")]
    pub in_k_period: bool,
}

impl ValidFilteredTransaction {
    pub fn tagged(txn: &Transaction, in_k_period: bool) -> Self {
        Self {
            date: txn.date,
            amount: txn.amount,
            ceiling: txn.ceiling,
            remanent: txn.remanent,
            in_k_period,
        }
    }

    pub fn transaction(&self) -> Transaction {
        Transaction {
            date: self.date,
            amount: self.amount,
            ceiling: self.ceiling,
            remanent: self.remanent,
        }
    }
}

/// Projection for one K period bucket
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SavingsByDate {
    #[serde(with = "crate::time::timestamp")]
    pub start: NaiveDateTime,
    #[serde(with = "crate::time::timestamp")]
    pub end: NaiveDateTime,
    /// Summed post-adjustment remanent of the bucket
    pub amount: Decimal,
    pub profit: Decimal,
    pub tax_benefit: Decimal,
}
