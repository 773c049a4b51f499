//! JSON request documents. Shape errors (missing fields, bad timestamps,
//! wrong types) surface here, with serde_json's line and column.

use roundup_core::Expense;
use serde::de::DeserializeOwned;
use std::io::Read;

use crate::error::Result;
use crate::types::Envelope;

/// Deserialize any request document
pub fn read_request<T: DeserializeOwned, R: Read>(reader: R) -> Result<T> {
    Ok(serde_json::from_reader(reader)?)
}

/// A bare JSON array of expenses, as taken by `transactions:parse`
pub fn read_expenses_json<R: Read>(reader: R) -> Result<Vec<Expense>> {
    let expenses: Vec<Expense> = read_request(reader)?;
    tracing::debug!(count = expenses.len(), "read expenses from JSON");
    Ok(expenses)
}

/// A batch item: `{"operation": "...", "payload": {...}}`
pub fn read_envelope<R: Read>(reader: R) -> Result<Envelope> {
    read_request(reader)
}
