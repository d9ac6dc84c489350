mod commands;
mod metrics;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use queuedesk_core::{load_config, validate_config, Config, Desk, SystemClock};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Config file used when QUEUEDESK_CONFIG is not set
const DEFAULT_CONFIG_PATH: &str = "queuedesk.toml";

fn main() {
    if let Err(e) = run() {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Logs go to stderr, stdout carries responses
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    info!("queuedesk {}", VERSION);

    let config = resolve_config(std::env::var("QUEUEDESK_CONFIG").ok())?;
    validate_config(&config).context("Configuration validation failed")?;

    info!(
        "Queue capacity {}, {} minutes per request, {} counter presets",
        config.queue.capacity,
        config.queue.minutes_per_request,
        config.counters.presets.len()
    );

    let config_json = serde_json::to_string(&config).context("Failed to encode config")?;
    let config_hash = format!("{:x}", Sha256::digest(config_json.as_bytes()));
    info!("Config fingerprint: {}", &config_hash[..16]);

    let desk = Desk::from_config(config, Arc::new(SystemClock))
        .context("Failed to open configured counters")?;

    // Force registration so the first `metrics` command sees every collector
    once_cell::sync::Lazy::force(&metrics::REGISTRY);

    serve(&desk, io::stdin().lock(), io::stdout().lock())?;

    let stats = desk.stats();
    info!(
        "Session finished: {} submitted, {} confirmed, {} cancelled, revenue {:.2}",
        stats.submitted, stats.confirmed, stats.cancelled, stats.revenue
    );

    Ok(())
}

/// Load the config file, falling back to defaults only when the default path is absent.
fn resolve_config(explicit: Option<String>) -> Result<Config> {
    let path = match explicit {
        Some(path) => PathBuf::from(path),
        None => {
            let path = PathBuf::from(DEFAULT_CONFIG_PATH);
            if !path.exists() {
                warn!("No {} found, using built-in defaults", DEFAULT_CONFIG_PATH);
                return Ok(Config::default());
            }
            path
        }
    };

    info!("Loading configuration from {:?}", path);
    load_config(&path).with_context(|| format!("Failed to load config from {:?}", path))
}

/// Answer every non-empty, non-comment input line with one JSON line.
fn serve<R: BufRead, W: Write>(desk: &Desk, input: R, mut output: W) -> Result<()> {
    for line in input.lines() {
        let line = line.context("Failed to read command")?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let response = commands::handle_line(desk, line);
        serde_json::to_writer(&mut output, &response).context("Failed to write response")?;
        writeln!(output).context("Failed to write response")?;
        output.flush().context("Failed to flush output")?;
    }
    Ok(())
}
