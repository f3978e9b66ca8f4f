// ============================================================================
// CONFIGURATION - Environment variables (optionally from .env)
// ============================================================================
// LISTEN_ADDR, DOCUMENT_PATH, BACKUP_DIR, SESSION_TIMEOUT, PUBLIC_DIR,
// DUPLICATE_KEYS, TRUST_FORWARDED_FOR, CORS_ALLOW_ANY

use crate::{errors::ConfigError, models::DuplicateKeyPolicy};
use std::{net::SocketAddr, path::PathBuf, time::Duration};
use thiserror::Error;
use tracing::warn;

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8000";
pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub document_path: PathBuf,
    pub backup_dir: PathBuf,
    pub public_dir: PathBuf,
    pub session_timeout: Duration,
    pub duplicate_keys: DuplicateKeyPolicy,
    pub trust_forwarded_for: bool,
    pub cors_allow_any: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            document_path: PathBuf::from("./programs.json"),
            backup_dir: PathBuf::from("./backup"),
            public_dir: PathBuf::from("./public"),
            session_timeout: DEFAULT_SESSION_TIMEOUT,
            duplicate_keys: DuplicateKeyPolicy::Reject,
            trust_forwarded_for: false,
            cors_allow_any: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Only an unusable listen
    /// address is fatal; every other bad value warns and keeps its default.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(addr) = var("LISTEN_ADDR") {
            config.listen_addr = addr
                .trim()
                .parse()
                .map_err(|source| ConfigError::ListenAddr {
                    value: addr.clone(),
                    source,
                })?;
        }
        if let Some(path) = var("DOCUMENT_PATH") {
            config.document_path = PathBuf::from(path);
        }
        if let Some(path) = var("BACKUP_DIR") {
            config.backup_dir = PathBuf::from(path);
        }
        if let Some(path) = var("PUBLIC_DIR") {
            config.public_dir = PathBuf::from(path);
        }

        if let Some(raw) = var("SESSION_TIMEOUT") {
            match parse_duration(&raw) {
                Ok(timeout) => config.session_timeout = timeout,
                Err(e) => warn!(
                    "Failed to parse session timeout '{}' ({}), falling back to {:?}",
                    raw, e, DEFAULT_SESSION_TIMEOUT
                ),
            }
        }

        if let Some(raw) = var("DUPLICATE_KEYS") {
            match raw.parse() {
                Ok(policy) => config.duplicate_keys = policy,
                Err(e) => warn!("{}, keeping {:?}", e, config.duplicate_keys),
            }
        }

        config.trust_forwarded_for = flag(&var, "TRUST_FORWARDED_FOR");
        config.cors_allow_any = flag(&var, "CORS_ALLOW_ANY");

        Ok(config)
    }
}

fn flag(var: &impl Fn(&str) -> Option<String>, key: &str) -> bool {
    let Some(raw) = var(key) else {
        return false;
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" | "" => false,
        other => {
            warn!("Ignoring {}='{}', expected true or false", key, other);
            false
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DurationError {
    #[error("empty duration")]
    Empty,
    #[error("negative durations are not allowed")]
    Negative,
    #[error("missing unit in duration '{0}'")]
    MissingUnit(String),
    #[error("unknown unit '{unit}' in duration '{input}'")]
    UnknownUnit { unit: String, input: String },
    #[error("invalid number in duration '{0}'")]
    InvalidNumber(String),
}

/// Parse durations written like `300ms`, `3s`, `5m10s` or `1.5h`.
/// A bare `0` is accepted.
pub fn parse_duration(input: &str) -> Result<Duration, DurationError> {
    let s = input.trim();
    let (negative, s) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };

    if s.is_empty() {
        return Err(DurationError::Empty);
    }
    if s == "0" {
        return Ok(Duration::ZERO);
    }

    let mut total = 0f64;
    let mut rest = s;
    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (number, tail) = rest.split_at(number_len);
        if number.is_empty() || number == "." {
            return Err(DurationError::InvalidNumber(input.to_string()));
        }
        let value: f64 = number
            .parse()
            .map_err(|_| DurationError::InvalidNumber(input.to_string()))?;

        let unit_len = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_len);
        let nanos_per_unit = match unit {
            "" => return Err(DurationError::MissingUnit(input.to_string())),
            "ns" => 1.0,
            "us" | "µs" | "μs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            other => {
                return Err(DurationError::UnknownUnit {
                    unit: other.to_string(),
                    input: input.to_string(),
                });
            }
        };

        total += value * nanos_per_unit;
        rest = tail;
    }

    let nanos = total.round() as u64;
    if negative && nanos > 0 {
        return Err(DurationError::Negative);
    }
    Ok(Duration::from_nanos(nanos))
}
