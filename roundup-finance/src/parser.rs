//! Expense parsing: round every expense up to its ceiling and record the
//! remanent swept into investment.

use roundup_core::{Expense, Result, RoundupError, Transaction};
use rust_decimal::Decimal;

/// Smallest multiple of `multiple` not below `amount`.
/// Non-positive amounts have a ceiling of zero.
pub fn ceiling(amount: Decimal, multiple: Decimal) -> Result<Decimal> {
    if amount <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    amount
        .checked_div(multiple)
        .and_then(|steps| steps.ceil().checked_mul(multiple))
        .ok_or(RoundupError::Overflow { field: "amount" })
}

/// Enrich raw expenses with ceiling and remanent. Nothing is rejected here
/// and output order matches input order; only an amount whose ceiling is
/// not representable fails the call.
pub fn parse_expenses(expenses: &[Expense], multiple: Decimal) -> Result<Vec<Transaction>> {
    tracing::debug!(count = expenses.len(), "parsing expenses");

    expenses
        .iter()
        .map(|expense| {
            let ceiling = ceiling(expense.amount, multiple)?;
            Ok(Transaction {
                date: expense.date,
                amount: expense.amount,
                ceiling,
                remanent: ceiling - expense.amount,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundup_core::parse_timestamp;
    use rust_decimal_macros::dec;

    fn expense(amount: Decimal) -> Expense {
        Expense::new(parse_timestamp("2023-10-12 20:15:30").unwrap(), amount)
    }

    #[test]
    fn test_ceiling_rounds_up() {
        assert_eq!(ceiling(dec!(250), dec!(100)), Ok(dec!(300)));
        assert_eq!(ceiling(dec!(375), dec!(100)), Ok(dec!(400)));
        assert_eq!(ceiling(dec!(0.01), dec!(100)), Ok(dec!(100)));
        assert_eq!(ceiling(dec!(1519.99), dec!(100)), Ok(dec!(1600)));
    }

    #[test]
    fn test_exact_multiple_is_its_own_ceiling() {
        assert_eq!(ceiling(dec!(300), dec!(100)), Ok(dec!(300)));
        assert_eq!(ceiling(dec!(100.00), dec!(100)), Ok(dec!(100)));
    }

    #[test]
    fn test_non_positive_amounts() {
        let txns = parse_expenses(&[expense(dec!(-250)), expense(dec!(0))], dec!(100)).unwrap();
        assert_eq!(txns[0].ceiling, dec!(0));
        assert_eq!(txns[0].remanent, dec!(250));
        assert_eq!(txns[1].ceiling, dec!(0));
        assert_eq!(txns[1].remanent, dec!(0));
    }

    #[test]
    fn test_parse_keeps_order_and_fields() {
        let input = [expense(dec!(250)), expense(dec!(620)), expense(dec!(480))];
        let txns = parse_expenses(&input, dec!(100)).unwrap();
        assert_eq!(txns.len(), 3);
        assert_eq!(txns[0].remanent, dec!(50));
        assert_eq!(txns[1].ceiling, dec!(700));
        assert_eq!(txns[1].remanent, dec!(80));
        assert_eq!(txns[2].remanent, dec!(20));
        assert!(txns.iter().zip(&input).all(|(t, e)| t.date == e.date && t.amount == e.amount));
    }

    #[test]
    fn test_custom_granularity() {
        assert_eq!(ceiling(dec!(42), dec!(10)), Ok(dec!(50)));
    }

    #[test]
    fn test_unrepresentable_ceiling_fails_call() {
        // rounding the largest decimal up to the next hundred overflows
        assert_eq!(
            ceiling(Decimal::MAX, dec!(100)),
            Err(RoundupError::Overflow { field: "amount" })
        );
        let err = parse_expenses(&[expense(dec!(250)), expense(Decimal::MAX)], dec!(100));
        assert_eq!(err, Err(RoundupError::Overflow { field: "amount" }));
    }

    #[test]
    fn test_large_exact_amount_parses() {
        let huge = Decimal::from_i128_with_scale(5 * 10i128.pow(28), 0);
        let txns = parse_expenses(&[expense(huge)], dec!(100)).unwrap();
        assert_eq!(txns[0].remanent, dec!(0));
    }
}
