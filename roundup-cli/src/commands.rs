use anyhow::{Context, Result};
use roundup_core::{Expense, FilterRequest, Operation, ReturnsRequest, ValidateRequest};
use roundup_finance::Pipeline;
use roundup_ingest::{read_expenses_csv, read_expenses_json, read_request, InputFormat};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::PathBuf;

/// Where a request document comes from; `-` or nothing means stdin
#[derive(Debug, Clone)]
pub enum Source {
    Stdin,
    File(PathBuf),
}

impl Source {
    pub fn from_arg(arg: Option<PathBuf>) -> Self {
        match arg {
            Some(p) if p.as_os_str() != "-" => Source::File(p),
            _ => Source::Stdin,
        }
    }

    pub fn open(&self) -> Result<Box<dyn Read>> {
        match self {
            Source::Stdin => Ok(Box::new(io::stdin().lock())),
            Source::File(p) => {
                let f = File::open(p).with_context(|| format!("open {}", p.display()))?;
                Ok(Box::new(BufReader::new(f)))
            }
        }
    }

    pub fn label(&self) -> String {
        match self {
            Source::Stdin => "<stdin>".to_string(),
            Source::File(p) => p.display().to_string(),
        }
    }

    fn format(&self) -> InputFormat {
        match self {
            Source::Stdin => InputFormat::Json,
            Source::File(p) => InputFormat::from_path(p),
        }
    }
}

pub fn read_typed<T: DeserializeOwned>(source: &Source) -> Result<T> {
    read_request(source.open()?).with_context(|| format!("read request from {}", source.label()))
}

/// Expense list from JSON, or CSV when forced or the file ends in `.csv`
pub fn read_expenses(source: &Source, force_csv: bool) -> Result<Vec<Expense>> {
    let reader = source.open()?;
    let expenses = if force_csv || source.format() == InputFormat::Csv {
        read_expenses_csv(reader)
    } else {
        read_expenses_json(reader)
    };
    expenses.with_context(|| format!("read expenses from {}", source.label()))
}

/// Pretty JSON on stdout, newline terminated
pub fn emit<T: Serialize>(value: &T) -> Result<()> {
    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value).context("write response")?;
    writeln!(out)?;
    Ok(())
}

/// Run one operation on an untyped payload, as carried by batch envelopes
pub fn dispatch(pipeline: &Pipeline<'_>, operation: Operation, payload: Value) -> Result<Value> {
    let response = match operation {
        Operation::Parse => {
            let expenses: Vec<Expense> = decode(operation, payload)?;
            serde_json::to_value(pipeline.parse(&expenses)?)?
        }
        Operation::Validate => {
            let request: ValidateRequest = decode(operation, payload)?;
            serde_json::to_value(pipeline.validate(&request))?
        }
        Operation::Filter => {
            let request: FilterRequest = decode(operation, payload)?;
            serde_json::to_value(pipeline.filter(&request)?)?
        }
        Operation::Returns(kind) => {
            let request: ReturnsRequest = decode(operation, payload)?;
            serde_json::to_value(pipeline.returns_for(kind, &request)?)?
        }
    };
    Ok(response)
}

fn decode<T: DeserializeOwned>(operation: Operation, payload: Value) -> Result<T> {
    serde_json::from_value(payload).with_context(|| format!("malformed {operation} payload"))
}
