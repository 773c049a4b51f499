//! Whole-request failures. Per-transaction problems never surface here; they
//! are classified into the `invalid` list instead.

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoundupError {
    #[error("strategy: unknown strategy '{name}' (available: {available})")]
    UnknownStrategy { name: String, available: String },

    #[error("operation: unknown operation '{0}'")]
    UnknownOperation(String),

    #[error("age: {age} is outside the supported range 0..={max}")]
    AgeOutOfRange { age: u32, max: u32 },

    #[error("wage: must not be negative, got {0}")]
    InvalidWage(Decimal),

    #[error("inflation: must not be negative, got {0}")]
    InvalidInflation(Decimal),

    #[error("profit: compounding over {years} years overflowed")]
    ProjectionOverflow { years: u32 },

    /// A sum or product left the representable decimal range
    #[error("{field}: value out of range")]
    Overflow { field: &'static str },

    #[error("settings: {0}")]
    InvalidSettings(String),
}

pub type Result<T> = std::result::Result<T, RoundupError>;
