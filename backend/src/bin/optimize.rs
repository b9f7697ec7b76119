//! Burden optimizer command-line driver.
//!
//! Loads a schedule, runs one optimization pass and prints the result as
//! pretty JSON on stdout. Logs go to stderr.
//!
//! # Usage
//!
//! ```bash
//! burden-optimize schedule.json [compliance.json] [complexity.json]
//! ```
//!
//! # Environment Variables
//!
//! - `BURDEN_CONFIG`: path to a TOML engine configuration (default: `./burden.toml`
//!   when present, otherwise built-in defaults)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::path::PathBuf;

use anyhow::Context;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use trial_burden::advisory::Advisory;
use trial_burden::config::EngineConfig;
use trial_burden::io::{AdvisoryLoader, ScheduleLoader};
use trial_burden::optimizer::RulesEngine;

const USAGE: &str = "usage: burden-optimize <schedule.json> [compliance.json] [complexity.json]";

fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mut args = env::args().skip(1);
    let schedule_path = PathBuf::from(args.next().context(USAGE)?);
    let compliance_path = args.next().map(PathBuf::from);
    let complexity_path = args.next().map(PathBuf::from);

    let config = EngineConfig::from_env_or_default().context("Failed to load engine configuration")?;
    let engine = RulesEngine::new(config)?;

    let loaded = ScheduleLoader::load_from_file(&schedule_path)?;
    info!(
        "Loaded {} ({} visits, checksum {})",
        loaded.schedule.protocol_name,
        loaded.schedule.visits.len(),
        loaded.checksum
    );

    let compliance = compliance_path
        .map(|path| AdvisoryLoader::compliance_from_file(&path))
        .unwrap_or(Advisory::Absent);
    let complexity = complexity_path
        .map(|path| AdvisoryLoader::complexity_from_file(&path))
        .unwrap_or(Advisory::Absent);

    let result = engine.optimize(&loaded.schedule, complexity, compliance)?;
    info!(
        "{} suggestion(s), {} warning(s), {:.1}% improvement",
        result.suggestions.len(),
        result.warnings.len(),
        result.improvement_percentage
    );

    let output = serde_json::to_string_pretty(&result).context("Failed to serialize result")?;
    println!("{}", output);

    Ok(())
}
