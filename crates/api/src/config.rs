use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// API port (default: `3001`).
    pub port: u16,
    /// Path of the JSON catalog document (default: `db.json`).
    pub books_db_path: PathBuf,
    /// Serialize read-modify-write cycles per store (default: `true`).
    /// With `false`, overlapping writers race and the last one wins.
    pub serialize_writes: bool,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Directory holding the admin page bundle (default: `public`).
    pub static_dir: PathBuf,
    /// Port for the static admin server; `0` disables it (default: `3000`).
    pub static_port: u16,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default   |
    /// |------------------------|-----------|
    /// | `HOST`                 | `0.0.0.0` |
    /// | `PORT`                 | `3001`    |
    /// | `BOOKS_DB_PATH`        | `db.json` |
    /// | `SERIALIZE_WRITES`     | `true`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`      |
    /// | `STATIC_DIR`           | `public`  |
    /// | `STATIC_PORT`          | `3000`    |
    pub fn from_env() -> anyhow::Result<Self> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = parse_var("PORT", "3001")?;
        let books_db_path = PathBuf::from(
            std::env::var("BOOKS_DB_PATH").unwrap_or_else(|_| "db.json".into()),
        );
        let serialize_writes = parse_flag(
            "SERIALIZE_WRITES",
            &std::env::var("SERIALIZE_WRITES").unwrap_or_else(|_| "true".into()),
        )?;
        let request_timeout_secs: u64 = parse_var("REQUEST_TIMEOUT_SECS", "30")?;
        let static_dir =
            PathBuf::from(std::env::var("STATIC_DIR").unwrap_or_else(|_| "public".into()));
        let static_port: u16 = parse_var("STATIC_PORT", "3000")?;

        Ok(Self {
            host,
            port,
            books_db_path,
            serialize_writes,
            request_timeout_secs,
            static_dir,
            static_port,
        })
    }
}

fn parse_var<T>(key: &str, default: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = std::env::var(key).unwrap_or_else(|_| default.into());
    raw.trim()
        .parse()
        .with_context(|| format!("{key} has an invalid value: '{raw}'"))
}

fn parse_flag(key: &str, raw: &str) -> anyhow::Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => anyhow::bail!("{key} must be a boolean, got '{raw}'"),
    }
}
