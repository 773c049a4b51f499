//! Request and response documents for the four logical operations.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, RoundupError};

use crate::model::{
    Expense, InvalidTransaction, SavingsByDate, Transaction, ValidFilteredTransaction,
};
use crate::period::{KPeriod, PPeriod, QPeriod};
use crate::strategy::StrategyKind;

/// The operations a caller can invoke, addressed by route name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Parse,
    Validate,
    Filter,
    Returns(StrategyKind),
}

impl FromStr for Operation {
    type Err = RoundupError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "transactions:parse" => Ok(Operation::Parse),
            "transactions:validator" => Ok(Operation::Validate),
            "transactions:filter" => Ok(Operation::Filter),
            other => match other.strip_prefix("returns:") {
                Some(name) => name.parse().map(Operation::Returns),
                None => Err(RoundupError::UnknownOperation(other.to_string())),
            },
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Parse => f.write_str("transactions:parse"),
            Operation::Validate => f.write_str("transactions:validator"),
            Operation::Filter => f.write_str("transactions:filter"),
            Operation::Returns(kind) => write!(f, "returns:{kind}"),
        }
    }
}

/// Input of `transactions:validator`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidateRequest {
    pub wage: Decimal,
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ValidateResponse {
    pub valid: Vec<Transaction>,
    pub invalid: Vec<InvalidTransaction>,
}

/// Input of `transactions:filter`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilterRequest {
    #[serde(default)]
    pub q: Vec<QPeriod>,
    #[serde(default)]
    pub p: Vec<PPeriod>,
    #[serde(default)]
    pub k: Vec<KPeriod>,
    pub wage: Decimal,
    pub transactions: Vec<Expense>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FilterResponse {
    pub valid: Vec<ValidFilteredTransaction>,
    pub invalid: Vec<InvalidTransaction>,
}

/// Input of `returns:<strategy>`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReturnsRequest {
    pub age: u32,
    pub wage: Decimal,
    /// Annual inflation in percent (5.5 = 5.5%)
    pub inflation: Decimal,
    #[serde(default)]
    pub q: Vec<QPeriod>,
    #[serde(default)]
    pub p: Vec<PPeriod>,
    #[serde(default)]
    pub k: Vec<KPeriod>,
    pub transactions: Vec<Expense>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReturnsResponse {
    pub total_transaction_amount: Decimal,
    pub total_ceiling: Decimal,
    pub savings_by_dates: Vec<SavingsByDate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_operation_route_names() {
        assert_eq!("transactions:parse".parse::<Operation>().unwrap(), Operation::Parse);
        assert_eq!("transactions:validator".parse::<Operation>().unwrap(), Operation::Validate);
        assert_eq!(
            "returns:index".parse::<Operation>().unwrap(),
            Operation::Returns(StrategyKind::Index)
        );
        assert_eq!(Operation::Returns(StrategyKind::Nps).to_string(), "returns:nps");
    }

    #[test]
    fn test_operation_unknown_names() {
        assert!(matches!(
            "returns:ppf".parse::<Operation>(),
            Err(RoundupError::UnknownStrategy { .. })
        ));
        assert!(matches!(
            "transactions:delete".parse::<Operation>(),
            Err(RoundupError::UnknownOperation(_))
        ));
    }

    #[test]
    fn test_filter_request_periods_default_empty() {
        let req: FilterRequest = serde_json::from_str(
            r#"{"wage":50000,"transactions":[{"date":"2023-10-12 20:15:30","amount":250}]}"#,
        )
        .unwrap();
        assert!(req.q.is_empty() && req.p.is_empty() && req.k.is_empty());
        assert_eq!(req.transactions[0].amount, dec!(250));
    }

    #[test]
    fn test_returns_request_requires_age() {
        let err = serde_json::from_str::<ReturnsRequest>(
            r#"{"wage":50000,"inflation":5.5,"transactions":[]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("age"));
    }

    #[test]
    fn test_returns_response_field_names() {
        let json = serde_json::to_value(ReturnsResponse::default()).unwrap();
        assert!(json.get("totalTransactionAmount").is_some());
        assert!(json.get("totalCeiling").is_some());
        assert!(json["savingsByDates"].as_array().unwrap().is_empty());
    }
}
