//! Configuration module for the order gateway.
//!
//! Loads YAML configuration with environment variable interpolation and
//! validates it before anything is started.
//!
//! # Usage
//!
//! ```rust,ignore
//! use order_gateway::config::{Config, load_config};
//!
//! // Load from default path (order-gateway.yaml)
//! let config = load_config(None)?;
//!
//! // Path from ORDER_GATEWAY_CONFIG, defaults when no file exists
//! let config = order_gateway::config::load_from_env()?;
//! ```

mod demo;
mod margin;
mod observability;
mod orders;
mod session;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use demo::DemoConfig;
pub use margin::MarginConfig;
pub use observability::{LOG_FORMATS, LoggingConfig};
pub use orders::OrdersConfig;
pub use session::SessionConfig;

/// Default configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "order-gateway.yaml";

/// Environment variable overriding the configuration path.
pub const CONFIG_PATH_ENV: &str = "ORDER_GATEWAY_CONFIG";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// FIX session identity.
    #[serde(default)]
    pub session: SessionConfig,
    /// Order handling.
    #[serde(default)]
    pub orders: OrdersConfig,
    /// Margin broadcast.
    #[serde(default)]
    pub margin: MarginConfig,
    /// Logging.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Demo counterparty.
    #[serde(default)]
    pub demo: DemoConfig,
}

pub(crate) const fn default_true() -> bool {
    true
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to `order-gateway.yaml`.
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from the path in `ORDER_GATEWAY_CONFIG`.
///
/// Without the variable, `order-gateway.yaml` is loaded if it exists and
/// built-in defaults are used otherwise.
///
/// # Errors
///
/// Returns a `ConfigError` if a selected file cannot be read, parsed, or
/// validated.
pub fn load_from_env() -> Result<Config, ConfigError> {
    match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) if !path.is_empty() => load_config(Some(&path)),
        _ if std::path::Path::new(DEFAULT_CONFIG_PATH).exists() => load_config(None),
        _ => {
            let config = Config::default();
            validate_config(&config)?;
            Ok(config)
        }
    }
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map_or("", |m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let session = &config.session;
    if session.begin_string.is_empty() {
        return Err(invalid("session.begin_string must not be empty"));
    }
    if session.sender_comp_id.is_empty() || session.target_comp_id.is_empty() {
        return Err(invalid("session comp ids must not be empty"));
    }
    if session.sender_comp_id == session.target_comp_id {
        return Err(invalid(
            "session.sender_comp_id and session.target_comp_id must be different",
        ));
    }

    if config.orders.default_account.is_empty() {
        return Err(invalid("orders.default_account must not be empty"));
    }

    let margin = &config.margin;
    if margin.tick_ms == 0 {
        return Err(invalid("margin.tick_ms must be positive"));
    }
    if margin.interval_ms < margin.tick_ms {
        return Err(invalid("margin.interval_ms must be at least margin.tick_ms"));
    }
    if margin.base_value < Decimal::ZERO || margin.level_pct < Decimal::ZERO {
        return Err(invalid(
            "margin.base_value and margin.level_pct must not be negative",
        ));
    }
    if margin.excess_ratio < Decimal::ZERO || margin.excess_ratio > Decimal::ONE {
        return Err(invalid("margin.excess_ratio must be between 0 and 1"));
    }
    if margin.jitter_pct < Decimal::ZERO || margin.jitter_pct >= Decimal::ONE_HUNDRED {
        return Err(invalid("margin.jitter_pct must be in [0, 100)"));
    }

    if !LOG_FORMATS.contains(&config.logging.format.as_str()) {
        return Err(ConfigError::ValidationError(format!(
            "logging.format must be one of: {LOG_FORMATS:?}"
        )));
    }

    Ok(())
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::ValidationError(message.to_string())
}
