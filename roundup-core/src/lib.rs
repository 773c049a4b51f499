//! roundup-core: record types, period windows, strategies, and tax rules for
//! the roundup micro-investment engine

pub mod contract;
pub mod error;
pub mod model;
pub mod period;
pub mod settings;
pub mod strategy;
pub mod tax;
pub mod time;

pub use contract::{
    FilterRequest, FilterResponse, Operation, ReturnsRequest, ReturnsResponse, ValidateRequest,
    ValidateResponse,
};
pub use error::{Result, RoundupError};
pub use model::{
    Expense, InvalidTransaction, Rejection, SavingsByDate, Transaction, ValidFilteredTransaction,
};
pub use period::{contains, KPeriod, PPeriod, QPeriod, Window};
pub use settings::{Settings, TaxSettings, TaxSlab};
pub use strategy::{
    registered as registered_strategies, resolve as resolve_strategy, InvestmentStrategy,
    StrategyKind,
};
pub use tax::TaxCalculator;
pub use time::{format_timestamp, parse_timestamp, TIMESTAMP_FORMAT};
