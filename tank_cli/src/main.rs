mod backend;
mod cli;
mod commands;
mod error_fmt;

use std::path::Path;

use clap::Parser;
use eyre::WrapErr;

use crate::cli::{Cli, Commands, DEFAULT_CONFIG, FILE_GUARD, JSON_MODE};
use crate::error_fmt::{Stage, exit_code_for_error, format_error_json, humanize};

fn main() {
    let _ = color_eyre::install();
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    if let Err(e) = real_main(cli) {
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", format_error_json(&e));
        } else {
            eprintln!("{}", humanize(&e));
        }
        std::process::exit(exit_code_for_error(&e));
    }
}

fn real_main(cli: Cli) -> eyre::Result<()> {
    let (cfg, defaulted) = load_config(&cli.config)?;
    init_tracing(cli.json, cli.log_level.as_deref(), &cfg.logging);
    if defaulted {
        tracing::warn!(path = %cli.config.display(), "config file not found; using built-in defaults");
    }

    match cli.cmd {
        Commands::Run { ticks } => {
            tracing::info!(
                version = env!("CARGO_PKG_VERSION"),
                "tank monitor: water level, pH and TDS"
            );
            commands::run(&cfg, ticks)
        }
        Commands::Check {
            distance_cm,
            ph,
            ph_code,
            tds,
            tds_code,
        } => commands::check(&cfg, distance_cm, ph, ph_code, tds, tds_code, cli.json),
        Commands::SelfCheck => commands::self_check(&cfg),
    }
}

/// Load and validate the config. A missing file at the default path yields the
/// built-in constants; any other missing path is an error.
fn load_config(path: &Path) -> eyre::Result<(tank_config::Config, bool)> {
    let (cfg, defaulted) = if !path.exists() && path == Path::new(DEFAULT_CONFIG) {
        (tank_config::Config::default(), true)
    } else {
        (tank_config::load_file(path).wrap_err(Stage::Config)?, false)
    };
    cfg.validate().wrap_err(Stage::Config)?;
    Ok((cfg, defaulted))
}

/// Console layer (pretty or JSON, on stderr) plus an optional JSON file layer.
/// Filter precedence: RUST_LOG, then --log-level, then `[logging].level`, then info.
fn init_tracing(json: bool, cli_level: Option<&str>, logging: &tank_config::Logging) {
    use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

    let level = cli_level
        .or(logging.level.as_deref())
        .unwrap_or("info");
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let console = if json {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .boxed()
    };

    let file_layer = logging.file.as_deref().map(|file| {
        let path = Path::new(file);
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let name = path
            .file_name()
            .map_or_else(|| "tank.log".into(), |n| n.to_string_lossy().into_owned());
        let appender = match logging.rotation.as_deref() {
            Some("daily") => tracing_appender::rolling::daily(dir, name),
            Some("hourly") => tracing_appender::rolling::hourly(dir, name),
            _ => tracing_appender::rolling::never(dir, name),
        };
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = FILE_GUARD.set(guard);
        fmt::layer().json().with_ansi(false).with_writer(writer)
    });

    let _ = tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .with(filter)
        .try_init();
}
