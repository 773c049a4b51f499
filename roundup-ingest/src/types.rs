use serde::{Deserialize, Serialize};
use std::path::Path;

/// Document formats accepted for raw expense lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Csv,
}

impl InputFormat {
    /// Guess from the file extension; anything but `.csv` is JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => InputFormat::Csv,
            _ => InputFormat::Json,
        }
    }
}

/// A request addressed to one operation by route name, as used in batches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// e.g. `transactions:filter`, `returns:nps`
    pub operation: String,
    pub payload: serde_json::Value,
}
