use std::fs::File;
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use quiesce_core::config::{LogFormat, LoggingConfig};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

pub const LOG_ENV: &str = "QUIESCE_LOG";

#[derive(Debug)]
pub enum LogTarget {
    Stderr,
    File(File),
    Discard,
}

pub fn init_logging(config: &LoggingConfig, target: LogTarget) -> Result<()> {
    let env_filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|error| anyhow!("invalid log filter: {error}"))?;

    let (layer, target_name) = match target {
        LogTarget::Stderr => (format_layer(config.format, std::io::stderr, true), "stderr"),
        LogTarget::File(file) => (format_layer(config.format, Mutex::new(file), false), "file"),
        LogTarget::Discard => (format_layer(config.format, std::io::sink, false), "discard"),
    };

    tracing_subscriber::registry()
        .with(layer)
        .with(env_filter)
        .try_init()
        .map_err(|error| anyhow!("failed to install log subscriber: {error}"))?;

    tracing::debug!(
        level = %config.level,
        format = ?config.format,
        target = target_name,
        "logging initialized"
    );
    Ok(())
}

fn format_layer<W>(format: LogFormat, writer: W, ansi: bool) -> Box<dyn Layer<Registry> + Send + Sync>
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let layer = fmt::layer().with_target(true).with_level(true).with_writer(writer);
    match format {
        LogFormat::Compact => layer.compact().with_ansi(ansi).boxed(),
        LogFormat::Pretty => layer.pretty().with_ansi(ansi).boxed(),
        LogFormat::Json => layer.json().with_current_span(true).boxed(),
    }
}
