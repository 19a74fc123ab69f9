use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_DB_HOST: &str = "cluster0.l3p6wcn.mongodb.net";
const DEFAULT_DB_NAME: &str = "volunteer-network-users";
const DEFAULT_DB_TIMEOUT_SECS: u64 = 5;
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {name}: '{value}'")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub db_user: String,
    pub db_password: String,
    pub db_host: String,
    pub db_name: String,
    pub mongodb_uri: Option<String>,
    pub db_timeout: Duration,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue { name, value })
        }
        _ => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Config {
            port: parse_var("PORT", DEFAULT_PORT)?,
            db_user: var_or("DB_USER", ""),
            db_password: var_or("DB_PASSWORD", ""),
            db_host: var_or("DB_HOST", DEFAULT_DB_HOST),
            db_name: var_or("DB_NAME", DEFAULT_DB_NAME),
            mongodb_uri: env::var("MONGODB_URI")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            db_timeout: Duration::from_secs(parse_var(
                "DB_TIMEOUT_SECS",
                DEFAULT_DB_TIMEOUT_SECS,
            )?),
            upload_dir: PathBuf::from(var_or("UPLOAD_DIR", DEFAULT_UPLOAD_DIR)),
            max_upload_bytes: parse_var("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
        })
    }

    /// Explicit `MONGODB_URI` wins, otherwise the Atlas SRV URI is built from the credentials
    pub fn mongodb_uri(&self) -> String {
        match &self.mongodb_uri {
            Some(uri) => uri.clone(),
            None => format!(
                "mongodb+srv://{}:{}@{}/?retryWrites=true&w=majority",
                self.db_user, self.db_password, self.db_host
            ),
        }
    }
}
