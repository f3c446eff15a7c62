//! Tracing subscriber setup.

use anyhow::{Context, Result, anyhow, bail};
use navhub_weather::LoggingConfig;
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG`, when set, overrides `config.level`.
///
/// Logs go to stderr so `navhub lookup` can keep stdout for its JSON output.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)
            .with_context(|| format!("Invalid log level directive: {}", config.level))?,
    };

    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_level(true)
        .with_ansi(std::io::stderr().is_terminal());

    let installed = match config.format.as_str() {
        "json" => builder.json().try_init(),
        "text" => builder.try_init(),
        other => bail!("Unknown log format '{other}'. Supported formats: text, json."),
    };

    installed.map_err(|err| anyhow!("Failed to install tracing subscriber: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_format_is_rejected() {
        let cfg = LoggingConfig {
            level: "info".into(),
            format: "xml".into(),
        };
        let err = init_logging(&cfg).unwrap_err();
        assert!(err.to_string().contains("Unknown log format 'xml'"));
    }
}
