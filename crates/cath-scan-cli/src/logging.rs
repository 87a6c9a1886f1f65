use crate::error::{CliError, Result};
use std::fs::File;
use std::path::PathBuf;
use tracing_subscriber::{
    Layer,
    filter::{LevelFilter, Targets},
    fmt::{self},
    prelude::*,
    registry::LookupSpan,
};

/// Crates whose events follow `-v`; everything else is capped at WARN.
const SCAN_TARGETS: [&str; 2] = ["cathscan", "cath_scan"];

pub fn level_filter(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::OFF;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

fn scan_filter(verbosity: u8, quiet: bool) -> Targets {
    let level = level_filter(verbosity, quiet);
    SCAN_TARGETS
        .iter()
        .fold(Targets::new(), |targets, &target| targets.with_target(target, level))
        .with_default(level.min(LevelFilter::WARN))
}

/// Plain-text layer for `--log-file`, with thread ids so rayon workers can be told apart.
fn file_layer<S>(file: File) -> impl Layer<S>
where
    S: tracing::Subscriber + for<'span> LookupSpan<'span>,
{
    fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_thread_ids(true)
        .with_target(true)
}

pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<PathBuf>) -> Result<()> {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .compact();

    let subscriber = tracing_subscriber::registry()
        .with(scan_filter(verbosity, quiet))
        .with(stderr_layer);

    let installed = match log_file {
        Some(path) => {
            let file = File::create(&path)?;
            subscriber.with(file_layer(file)).try_init()
        }
        None => subscriber.try_init(),
    };
    installed.map_err(|e| CliError::Other(anyhow::anyhow!("Failed to install logger: {}", e)))
}
