use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "VitalWatch";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Trend window for the default ("short") mode.
pub const SHORT_TREND_WINDOW_DAYS: u32 = 7;
/// Trend window for the "long" mode.
pub const LONG_TREND_WINDOW_DAYS: u32 = 30;

pub const DATA_DIR_ENV: &str = "VITALWATCH_DATA_DIR";
pub const BIND_ADDR_ENV: &str = "VITALWATCH_ADDR";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8787";

const DATABASE_FILE: &str = "vitalwatch.db";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot determine home directory; set VITALWATCH_DATA_DIR")]
    NoHomeDir,

    #[error("Invalid bind address '{value}': {reason}")]
    InvalidBindAddr { value: String, reason: String },
}

/// Default tracing filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "vitalwatch_lib=info,vitalwatch=info,tower=warn"
}

/// Get the application data directory
/// `$VITALWATCH_DATA_DIR`, else ~/VitalWatch/
pub fn app_data_dir() -> Result<PathBuf, ConfigError> {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home.join(APP_NAME))
}

/// Path of the SQLite database inside the data directory
pub fn database_path() -> Result<PathBuf, ConfigError> {
    Ok(app_data_dir()?.join(DATABASE_FILE))
}

/// Address the API server binds to.
pub fn bind_addr() -> Result<SocketAddr, ConfigError> {
    let raw = std::env::var(BIND_ADDR_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
    parse_bind_addr(&raw)
}

fn parse_bind_addr(raw: &str) -> Result<SocketAddr, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|e: std::net::AddrParseError| ConfigError::InvalidBindAddr {
            value: raw.to_string(),
            reason: e.to_string(),
        })
}
