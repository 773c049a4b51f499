//! roundup-finance: expense parsing, validation, period rules, and returns
//! projection

pub mod parser;
pub mod periods;
pub mod pipeline;
pub mod returns;
pub mod validator;

pub use parser::{ceiling, parse_expenses};
pub use periods::{apply_periods, PeriodRules};
pub use pipeline::Pipeline;
pub use returns::{compound_profit, ReturnsEngine};
pub use validator::validate;
