//! Runs many enveloped requests at once on the blocking pool. One bad file
//! does not sink the batch; its error is reported in its slot, even when the
//! worker panicked.

use anyhow::{Context, Result};
use roundup_core::{Operation, Settings};
use roundup_finance::Pipeline;
use roundup_ingest::read_envelope;
use serde::Serialize;
use serde_json::Value;
use std::any::Any;
use std::fs::File;
use std::io::BufReader;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinSet;

use crate::commands::dispatch;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchOutcome {
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

fn run_file(path: &Path, settings: &Settings) -> BatchOutcome {
    let file = path.display().to_string();
    let mut operation = None;

    let result = (|| -> Result<Value> {
        let reader = File::open(path).with_context(|| format!("open {file}"))?;
        let envelope = read_envelope(BufReader::new(reader))?;
        operation = Some(envelope.operation.clone());
        let op: Operation = envelope.operation.parse()?;
        dispatch(&Pipeline::new(settings), op, envelope.payload)
    })();

    match result {
        Ok(response) => BatchOutcome {
            file,
            operation,
            response: Some(response),
            error: None,
        },
        Err(e) => {
            tracing::warn!(file = %file, "batch item failed: {e:#}");
            BatchOutcome {
                file,
                operation,
                response: None,
                error: Some(format!("{e:#}")),
            }
        }
    }
}

type FileRunner = fn(&Path, &Settings) -> BatchOutcome;

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

/// Run one file, turning a panic into that file's error
fn run_isolated(runner: FileRunner, path: &Path, settings: &Settings) -> BatchOutcome {
    match panic::catch_unwind(AssertUnwindSafe(|| runner(path, settings))) {
        Ok(outcome) => outcome,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::error!(file = %path.display(), "batch item panicked: {message}");
            BatchOutcome {
                file: path.display().to_string(),
                operation: None,
                response: None,
                error: Some(format!("internal error: {message}")),
            }
        }
    }
}

/// Outcomes come back in the order the files were given
pub async fn run_batch(files: Vec<PathBuf>, settings: Arc<Settings>) -> Result<Vec<BatchOutcome>> {
    run_with(files, settings, run_file).await
}

async fn run_with(
    files: Vec<PathBuf>,
    settings: Arc<Settings>,
    runner: FileRunner,
) -> Result<Vec<BatchOutcome>> {
    let total = files.len();
    let mut set = JoinSet::new();
    for (i, path) in files.into_iter().enumerate() {
        let settings = Arc::clone(&settings);
        set.spawn_blocking(move || (i, run_isolated(runner, &path, &settings)));
    }

    let mut slots: Vec<Option<BatchOutcome>> = vec![None; total];
    while let Some(joined) = set.join_next().await {
        let (i, outcome) = joined.context("batch worker was cancelled")?;
        slots[i] = Some(outcome);
    }

    let outcomes: Vec<BatchOutcome> = slots.into_iter().flatten().collect();
    tracing::info!(
        files = total,
        failed = outcomes.iter().filter(|o| !o.is_ok()).count(),
        "batch complete"
    );
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let p = dir.join(name);
        fs::write(&p, body).unwrap();
        p
    }

    #[tokio::test]
    async fn test_batch_keeps_input_order_and_isolates_failures() {
        let dir = tempfile::tempdir().unwrap();
        let parse = write(
            dir.path(),
            "parse.json",
            r#"{"operation": "transactions:parse",
                "payload": [{"date": "2023-10-12 20:15:30", "amount": 250}]}"#,
        );
        let unknown = write(
            dir.path(),
            "unknown.json",
            r#"{"operation": "transactions:explode", "payload": []}"#,
        );
        let returns = write(
            dir.path(),
            "returns.json",
            r#"{"operation": "returns:nps", "payload": {
                "age": 29, "wage": 50000, "inflation": 5.5,
                "k": [{"start": "2023-01-01 00:00:00", "end": "2023-12-31 23:59:59"}],
                "transactions": [{"date": "2023-02-28 15:49:20", "amount": 375}]}}"#,
        );
        let missing = dir.path().join("missing.json");

        let files = vec![parse.clone(), unknown, returns, missing];
        let out = run_batch(files, Arc::new(Settings::default())).await.unwrap();

        assert_eq!(out.len(), 4);
        assert_eq!(out[0].file, parse.display().to_string());
        assert!(out[0].is_ok());
        assert_eq!(out[1].operation.as_deref(), Some("transactions:explode"));
        assert!(out[1].error.as_deref().unwrap().contains("unknown operation"));
        assert!(out[2].is_ok());
        assert_eq!(out[2].response.as_ref().unwrap()["totalCeiling"], serde_json::json!(400.0));
        assert!(out[3].operation.is_none());
        assert!(!out[3].is_ok());
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let out = run_batch(Vec::new(), Arc::new(Settings::default())).await.unwrap();
        assert!(out.is_empty());
    }

    fn explode_on_boom(path: &Path, settings: &Settings) -> BatchOutcome {
        if path.ends_with("boom.json") {
            panic!("decimal overflow");
        }
        run_file(path, settings)
    }

    #[tokio::test]
    async fn test_panicking_item_reported_in_its_slot() {
        let dir = tempfile::tempdir().unwrap();
        let body = r#"{"operation": "transactions:parse",
                       "payload": [{"date": "2023-10-12 20:15:30", "amount": 250}]}"#;
        let first = write(dir.path(), "first.json", body);
        let boom = write(dir.path(), "boom.json", body);
        let last = write(dir.path(), "last.json", body);

        let files = vec![first, boom.clone(), last];
        let out = run_with(files, Arc::new(Settings::default()), explode_on_boom)
            .await
            .unwrap();

        assert_eq!(out.len(), 3);
        assert!(out[0].is_ok());
        assert_eq!(out[1].file, boom.display().to_string());
        assert_eq!(out[1].error.as_deref(), Some("internal error: decimal overflow"));
        assert!(out[2].is_ok());
    }

    #[tokio::test]
    async fn test_oversized_document_fails_alone() {
        let dir = tempfile::tempdir().unwrap();
        let oversized = write(
            dir.path(),
            "oversized.json",
            r#"{"operation": "returns:nps", "payload": {
                "age": 29, "wage": 1e28, "inflation": 0,
                "transactions": [{"date": "2023-02-28 15:49:20", "amount": 375}]}}"#,
        );
        let fine = write(
            dir.path(),
            "fine.json",
            r#"{"operation": "transactions:parse", "payload": []}"#,
        );

        let out = run_batch(vec![oversized, fine], Arc::new(Settings::default()))
            .await
            .unwrap();
        assert!(out[0].error.as_deref().unwrap().contains("wage: value out of range"));
        assert!(out[1].is_ok());
    }
}
