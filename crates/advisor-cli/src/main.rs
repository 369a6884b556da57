//! stock-advisor: run the analysis engine over JSON files from the command line.
//!
//! Commands:
//! - `analyze` - full report (indicators, scores, sentiment, recommendation)
//! - `intrinsic-value` - discounted earnings estimate for one EPS figure
//! - `dividend-rating` - growth rating of a dividend history
//!
//! Results are printed to stdout as JSON; logs go to stderr.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use fundamental_analysis::{dividend_growth_rating, intrinsic_value};
use recommendation_engine::AnalysisEngine;
use serde::Serialize;

mod config;
mod input;

#[derive(Parser)]
#[command(name = "stock-advisor", about = "Technical, fundamental and sentiment stock analysis")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a JSON file of observations and optional fundamentals.
    Analyze {
        /// Path to `{"observations": [...], "fundamentals": {...}}`.
        #[arg(long)]
        input: PathBuf,

        /// Pretty-print the report.
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// Discounted earnings estimate. Rates default to ADVISOR_DCF_* settings.
    IntrinsicValue {
        /// Earnings per share.
        #[arg(long, allow_hyphen_values = true)]
        eps: f64,

        /// Annual EPS growth rate (0.07 = 7%).
        #[arg(long, allow_hyphen_values = true)]
        growth: Option<f64>,

        /// Annual discount rate, greater than -1.
        #[arg(long, allow_hyphen_values = true)]
        discount: Option<f64>,

        /// Terminal earnings multiple.
        #[arg(long, allow_hyphen_values = true)]
        multiple: Option<f64>,
    },
    /// Rate a JSON array of `{"year": .., "dividend": ..}` points.
    DividendRating {
        #[arg(long)]
        input: PathBuf,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IntrinsicValueOutput {
    eps: f64,
    intrinsic_value: f64,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = config::from_env()?;
    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        Commands::Analyze { input, pretty } => {
            let payload = input::read_analysis_input(&input)?;
            tracing::info!("Loaded {} observations from {}", payload.observations.len(), input.display());

            let engine = AnalysisEngine::new(config);
            let report = engine.analyze_values(&payload.observations, payload.fundamentals.as_ref());
            print_json(&report, pretty)?;
        }
        Commands::IntrinsicValue { eps, growth, discount, multiple } => {
            let mut params = config.dcf;
            params.growth_rate = growth.unwrap_or(params.growth_rate);
            params.discount_rate = discount.unwrap_or(params.discount_rate);
            params.terminal_multiple = multiple.unwrap_or(params.terminal_multiple);
            params.validate()?;

            let output = IntrinsicValueOutput { eps, intrinsic_value: intrinsic_value(eps, &params) };
            print_json(&output, true)?;
        }
        Commands::DividendRating { input } => {
            let history = input::read_dividend_history(&input)?;
            print_json(&dividend_growth_rating(&history), true)?;
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{text}");
    Ok(())
}
