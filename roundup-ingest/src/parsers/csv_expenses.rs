//! CSV expense lists.
//!
//! Expected layout (column order is free, extra columns are ignored):
//!   date,amount
//!   2023-10-12 20:15:30,250
//!   2023-02-28 15:49:20,"₹ 1,375.50"

use regex::Regex;
use roundup_core::{parse_timestamp, Expense};
use rust_decimal::Decimal;
use std::io::Read;
use std::str::FromStr;

use crate::error::{IngestError, Result};

const AMOUNT_PATTERN: &str = concat!(
    r"^(?P<neg>-)?\s*(?:₹|Rs\.?|INR)?\s*",
    r"(?P<num>\d{1,3}(?:,\d{2,3})+(?:\.\d+)?|\d+(?:\.\d+)?)$"
);

/// Normalise an amount that may carry a currency marker or thousands
/// separators ("₹ 1,250.50", "Rs. 1,00,000", "-250")
fn parse_amount(re: &Regex, raw: &str) -> Option<Decimal> {
    let caps = re.captures(raw.trim())?;
    let digits = caps["num"].replace(',', "");
    let value = Decimal::from_str(&digits).ok()?;
    Some(if caps.name("neg").is_some() { -value } else { value })
}

/// Read a CSV document of expenses. Any malformed row fails the whole
/// document, naming its line.
pub fn read_expenses_csv<R: Read>(reader: R) -> Result<Vec<Expense>> {
    let amount_re = Regex::new(AMOUNT_PATTERN)?;
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or(IngestError::MissingColumn(name))
    };
    let date_col = column("date")?;
    let amount_col = column("amount")?;

    let mut out = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        // blank trailing rows
        if record.iter().all(str::is_empty) {
            continue;
        }

        let row_error = |message: String| IngestError::Row { line, message };

        let date_raw = record.get(date_col).unwrap_or("");
        let date = parse_timestamp(date_raw)
            .map_err(|e| row_error(format!("invalid date '{date_raw}': {e}")))?;

        let amount_raw = record.get(amount_col).unwrap_or("");
        let amount = parse_amount(&amount_re, amount_raw)
            .ok_or_else(|| row_error(format!("invalid amount '{amount_raw}'")))?;

        out.push(Expense::new(date, amount));
    }

    tracing::debug!(count = out.len(), "read expenses from CSV");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn amount(raw: &str) -> Option<Decimal> {
        parse_amount(&Regex::new(AMOUNT_PATTERN).unwrap(), raw)
    }

    #[test]
    fn test_parse_amount_variants() {
        assert_eq!(amount("250"), Some(dec!(250)));
        assert_eq!(amount("-250"), Some(dec!(-250)));
        assert_eq!(amount("1,250.50"), Some(dec!(1250.50)));
        assert_eq!(amount("₹ 1,375.50"), Some(dec!(1375.50)));
        assert_eq!(amount("Rs. 1,00,000"), Some(dec!(100000)));
        assert_eq!(amount("INR 99.99"), Some(dec!(99.99)));
        assert_eq!(amount("- ₹ 40"), Some(dec!(-40)));
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        assert_eq!(amount(""), None);
        assert_eq!(amount("abc"), None);
        assert_eq!(amount("12.5.3"), None);
        assert_eq!(amount("$250"), None);
    }

    #[test]
    fn test_reads_expenses() {
        let text = "date,amount\n\
                    2023-10-12 20:15:30,250\n\
                    2023-02-28 15:49:20,\"₹ 1,375.50\"\n\
                    2023-07-15 10:30:00,-250\n";
        let expenses = read_expenses_csv(text.as_bytes()).unwrap();
        assert_eq!(expenses.len(), 3);
        assert_eq!(expenses[0].amount, dec!(250));
        assert_eq!(expenses[1].amount, dec!(1375.50));
        assert_eq!(expenses[2].amount, dec!(-250));
    }

    #[test]
    fn test_column_order_and_extra_columns() {
        let text = "Amount,Note,Date\n480,groceries,2023-12-17 08:09:45\n";
        let expenses = read_expenses_csv(text.as_bytes()).unwrap();
        assert_eq!(expenses[0].amount, dec!(480));
        assert_eq!(
            expenses[0].date,
            parse_timestamp("2023-12-17 08:09:45").unwrap()
        );
    }

    #[test]
    fn test_bad_row_names_line() {
        let text = "date,amount\n2023-10-12 20:15:30,250\n2023-13-40 00:00:00,10\n";
        match read_expenses_csv(text.as_bytes()) {
            Err(IngestError::Row { line, message }) => {
                assert_eq!(line, 3);
                assert!(message.contains("invalid date"));
            }
            other => panic!("expected row error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_amount_column() {
        let text = "date,value\n2023-10-12 20:15:30,250\n";
        assert!(matches!(
            read_expenses_csv(text.as_bytes()),
            Err(IngestError::MissingColumn("amount"))
        ));
    }
}
