//! Transaction validation with partial-success semantics: every input lands in
//! exactly one of `valid` or `invalid`, and one bad item never fails the batch.

use std::collections::HashSet;

use roundup_core::{InvalidTransaction, Rejection, Transaction, ValidateResponse};
use rust_decimal::Decimal;

/// Classify transactions in one left-to-right pass. The first rule violated
/// wins: negative amounts, then `(date, amount)` repeats of an accepted
/// transaction.
pub fn validate(wage: Decimal, transactions: &[Transaction]) -> ValidateResponse {
    let mut out = ValidateResponse::default();
    let mut seen = HashSet::with_capacity(transactions.len());

    for txn in transactions {
        let rejection = if txn.amount < Decimal::ZERO {
            Some(Rejection::NegativeAmount)
        } else if seen.contains(&txn.key()) {
            Some(Rejection::Duplicate)
        } else {
            None
        };

        match rejection {
            Some(reason) => out.invalid.push(InvalidTransaction::rejected(txn, reason)),
            None => {
                seen.insert(txn.key());
                out.valid.push(*txn);
            }
        }
    }

    tracing::debug!(
        %wage,
        valid = out.valid.len(),
        invalid = out.invalid.len(),
        "validated transactions"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundup_core::parse_timestamp;
    use rust_decimal_macros::dec;

    fn txn(date: &str, amount: Decimal) -> Transaction {
        let ceiling = crate::parser::ceiling(amount, dec!(100)).unwrap();
        Transaction {
            date: parse_timestamp(date).unwrap(),
            amount,
            ceiling,
            remanent: ceiling - amount,
        }
    }

    #[test]
    fn test_negative_amount_rejected() {
        let out = validate(
            dec!(50000),
            &[txn("2023-02-28 15:49:20", dec!(375)), txn("2023-07-15 10:30:00", dec!(-250))],
        );
        assert_eq!(out.valid.len(), 1);
        assert_eq!(out.valid[0].amount, dec!(375));
        assert_eq!(out.invalid.len(), 1);
        assert_eq!(out.invalid[0].message, Rejection::NegativeAmount);
        assert_eq!(out.invalid[0].amount, dec!(-250));
    }

    #[test]
    fn test_first_duplicate_kept() {
        let out = validate(
            dec!(50000),
            &[
                txn("2023-10-12 20:15:30", dec!(250)),
                txn("2023-10-12 20:15:30", dec!(250)),
                txn("2023-10-12 20:15:30", dec!(250)),
            ],
        );
        assert_eq!(out.valid.len(), 1);
        assert_eq!(out.invalid.len(), 2);
        assert!(out.invalid.iter().all(|i| i.message == Rejection::Duplicate));
    }

    #[test]
    fn test_same_date_different_amount_is_not_duplicate() {
        let out = validate(
            dec!(50000),
            &[txn("2023-10-12 20:15:30", dec!(250)), txn("2023-10-12 20:15:30", dec!(260))],
        );
        assert_eq!(out.valid.len(), 2);
        assert!(out.invalid.is_empty());
    }

    #[test]
    fn test_negative_wins_over_duplicate() {
        let out = validate(
            dec!(50000),
            &[txn("2023-10-12 20:15:30", dec!(-250)), txn("2023-10-12 20:15:30", dec!(-250))],
        );
        assert!(out.valid.is_empty());
        assert!(out.invalid.iter().all(|i| i.message == Rejection::NegativeAmount));
    }

    #[test]
    fn test_empty_batch() {
        let out = validate(dec!(50000), &[]);
        assert!(out.valid.is_empty() && out.invalid.is_empty());
    }
}
