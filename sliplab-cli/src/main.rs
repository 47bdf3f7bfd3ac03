//! SlipLab CLI — quote slipped fill prices for configured slippage models.
//!
//! Commands:
//! - `quote` — run a planned fill through every model in a TOML config file
//! - `builtins` — list built-in model kinds with their default parameters
//!
//! Set `RUST_LOG=debug` to see model construction and parameter updates.

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use serde_json::json;
use sliplab_core::{
    apply_slippage, apply_slippage_with_tick, create_builtin, load_config, Side,
    SlippageConfig, SlippageRegistry, SlippageRequest, BUILTIN_KINDS,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "sliplab",
    about = "SlipLab CLI — slippage models for backtest fill simulation"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Quote the real fill price of a planned fill under each configured model.
    Quote {
        /// Path to a TOML file with `[[models]]` entries.
        #[arg(long)]
        config: PathBuf,

        /// Trade side: buy or sell.
        #[arg(long)]
        side: Side,

        /// Planned (pre-slippage) price.
        #[arg(long)]
        price: f64,

        /// Fill time (YYYY-MM-DD or "YYYY-MM-DD HH:MM:SS"). Defaults to now.
        #[arg(long)]
        datetime: Option<String>,

        /// Quantity used for the slippage cost.
        #[arg(long, default_value_t = 1.0)]
        quantity: f64,

        /// Round slipped prices to this tick size (buy up, sell down).
        #[arg(long)]
        tick: Option<f64>,
    },
    /// List built-in model kinds and their default parameters.
    Builtins,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Quote {
            config,
            side,
            price,
            datetime,
            quantity,
            tick,
        } => run_quote(config, side, price, datetime, quantity, tick),
        Commands::Builtins => run_builtins(),
    }
}

fn run_quote(
    config: PathBuf,
    side: Side,
    price: f64,
    datetime: Option<String>,
    quantity: f64,
    tick: Option<f64>,
) -> Result<()> {
    if !(price > 0.0) {
        bail!("--price must be positive, got {price}");
    }
    let datetime = match datetime.as_deref() {
        Some(s) => parse_datetime(s)?,
        None => chrono::Local::now().naive_local(),
    };

    let file = load_config(&config)?;
    if file.models.is_empty() {
        log::warn!("{} defines no models", config.display());
    }
    let registry = SlippageRegistry::new();
    let request = SlippageRequest::new(side, datetime, price);

    for model_config in &file.models {
        let model = registry
            .build(model_config)
            .with_context(|| format!("building model {}", model_config.model_type))?;
        let fill = match tick {
            Some(tick) => apply_slippage_with_tick(model.as_ref(), &request, quantity, tick),
            None => apply_slippage(model.as_ref(), &request, quantity),
        };
        let line = json!({
            "name": model.name(),
            "model_type": model_config.model_type,
            "fingerprint": model_config.fingerprint(),
            "side": side,
            "requested": fill.requested,
            "price": fill.price,
            "slippage_amount": fill.slippage_amount,
        });
        println!("{line}");
    }

    Ok(())
}

fn run_builtins() -> Result<()> {
    for kind in BUILTIN_KINDS {
        let model = create_builtin(&SlippageConfig::new(*kind))?;
        let line = json!({
            "model_type": kind,
            "name": model.name(),
            "params": model.params(),
        });
        println!("{line}");
    }
    Ok(())
}

fn parse_datetime(s: &str) -> Result<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt);
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("invalid --datetime: {s}"))?;
    date.and_hms_opt(0, 0, 0)
        .with_context(|| format!("invalid --datetime: {s}"))
}
