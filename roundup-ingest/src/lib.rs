//! roundup-ingest: the request boundary. Reads JSON request documents and CSV
//! expense lists, rejecting malformed shapes before anything reaches the
//! engines.

pub mod error;
pub mod parsers;
pub mod types;

pub use error::{IngestError, Result};
pub use parsers::csv_expenses::read_expenses_csv;
pub use parsers::json_request::{read_envelope, read_expenses_json, read_request};
pub use types::{Envelope, InputFormat};
