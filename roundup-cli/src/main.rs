use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use roundup_core::{
    registered_strategies, FilterRequest, ReturnsRequest, Settings, TaxCalculator,
    ValidateRequest,
};
use roundup_finance::Pipeline;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod batch;
mod commands;
mod config;
mod state;

use commands::{emit, read_expenses, read_typed, Source};
use config::Config;

#[derive(Parser, Debug)]
#[command(name = "roundup", version, about = "Round-up savings and retirement projections")]
struct Cli {
    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Config file (defaults to ~/.roundup/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute ceiling and remanent for a list of expenses
    Parse {
        /// JSON expense list (`-` or omitted for stdin)
        #[arg(long, conflicts_with = "csv")]
        input: Option<PathBuf>,

        /// CSV expense list with `date,amount` columns
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Split transactions into valid and invalid
    Validate {
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Parse, validate and apply q/p/k period rules
    Filter {
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Project returns per k period for a strategy (nps, index)
    Returns {
        strategy: String,

        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Run `{"operation": ..., "payload": ...}` documents concurrently
    Batch {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// List the investment strategies and their rates
    Strategies,

    /// Slab tax on an annual income, and the saving from a deduction
    Tax {
        #[arg(long)]
        income: Decimal,

        #[arg(long, default_value_t = Decimal::ZERO)]
        deduction: Decimal,
    },

    /// Manage the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config unless one exists
    Init,
    /// Print the effective config
    Show,
}

fn init_tracing(verbose: u8, configured: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = match verbose {
            0 => configured,
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = config::load_config(cli.config.as_deref());
    let level = match &loaded {
        Ok(cfg) => cfg.logging.level.clone(),
        Err(_) => "warn".to_string(),
    };
    init_tracing(cli.verbose, &level);

    let result = match loaded {
        Ok(cfg) => run(cli, cfg).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, cfg: Config) -> Result<()> {
    let settings = cfg.engine.clone();
    let pipeline = Pipeline::new(&settings);

    match cli.command {
        Command::Parse { input, csv } => {
            let (source, force_csv) = match csv {
                Some(p) => (Source::from_arg(Some(p)), true),
                None => (Source::from_arg(input), false),
            };
            let expenses = read_expenses(&source, force_csv)?;
            emit(&pipeline.parse(&expenses)?)?;
        }

        Command::Validate { input } => {
            let request: ValidateRequest = read_typed(&Source::from_arg(input))?;
            emit(&pipeline.validate(&request))?;
        }

        Command::Filter { input } => {
            let request: FilterRequest = read_typed(&Source::from_arg(input))?;
            emit(&pipeline.filter(&request)?)?;
        }

        Command::Returns { strategy, input } => {
            let request: ReturnsRequest = read_typed(&Source::from_arg(input))?;
            let response = pipeline
                .returns(&strategy, &request)
                .with_context(|| format!("returns:{strategy}"))?;
            emit(&response)?;
        }

        Command::Batch { files } => {
            let outcomes = batch::run_batch(files, Arc::new(settings.clone())).await?;
            let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
            emit(&outcomes)?;
            if failed > 0 {
                anyhow::bail!("{failed} of {} batch items failed", outcomes.len());
            }
        }

        Command::Strategies => {
            emit(&registered_strategies())?;
        }

        Command::Tax { income, deduction } => {
            emit(&tax_report(&settings, income, deduction)?)?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => {
                let p = config::init_config(cli.config.as_deref())?;
                println!("{}", p.display());
            }
            ConfigCommand::Show => {
                let s = toml::to_string_pretty(&cfg).context("serialize config")?;
                print!("{s}");
            }
        },
    }

    Ok(())
}

/// Same deduction limits as the NPS returns path
fn tax_report(settings: &Settings, income: Decimal, deduction: Decimal) -> Result<serde_json::Value> {
    let calculator = TaxCalculator::new(&settings.tax);
    let deductible = calculator.deductible_amount(income, deduction)?;
    Ok(serde_json::json!({
        "income": income,
        "tax": calculator.slab_tax(income),
        "deduction": deductible,
        "taxAfterDeduction": calculator.slab_tax(income - deductible),
        "benefit": calculator.benefit(income, deductible),
    }))
}
