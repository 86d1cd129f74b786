//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub const DEFAULT_CONFIG: &str = "etc/tank_config.toml";

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "tank", version, about = "Tank level and water quality monitor")]
pub struct Cli {
    /// Path to config TOML; a missing default file falls back to built-in constants
    #[arg(long, value_name = "FILE", default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// Log and report errors as JSON lines instead of pretty text
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); RUST_LOG takes precedence
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the monitoring loop
    Run {
        /// Stop after this many ticks (runs forever when omitted)
        #[arg(long, value_name = "N")]
        ticks: Option<u64>,
    },
    /// Classify readings and print the indicator command and panel frames
    Check {
        /// Distance from sensor to surface, in cm
        #[arg(long, value_name = "CM")]
        distance_cm: f32,
        /// pH value
        #[arg(long, required_unless_present = "ph_code", conflicts_with = "ph_code")]
        ph: Option<f32>,
        /// Raw ADC code for the pH channel
        #[arg(long, value_name = "CODE")]
        ph_code: Option<u16>,
        /// Total dissolved solids in ppm
        #[arg(long, required_unless_present = "tds_code", conflicts_with = "tds_code")]
        tds: Option<f32>,
        /// Raw ADC code for the TDS channel
        #[arg(long, value_name = "CODE")]
        tds_code: Option<u16>,
    },
    /// Read every sensor once and report the result
    SelfCheck,
}
