//! Process configuration from environment variables.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;
use tracing::warn;

pub const DEFAULT_BIND: &str = "0.0.0.0:8080";
pub const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: invalid value '{value}' ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind: SocketAddr,
    pub jwt_secret: String,
    /// `None` leaves only the offline assistant.
    pub gemini_api_key: Option<String>,
    pub gemini_api_url: Option<String>,
    /// `None` keeps all data in memory.
    pub data_dir: Option<PathBuf>,
    pub max_distance_km: f64,
    pub tie_window_km: f64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars().collect())
    }

    /// Build from an explicit variable map (tests, embedding).
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |name: &str| {
            vars.get(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bind_raw = get("NEARBYKAAM_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_raw.parse().map_err(|_| ConfigError::Invalid {
            var: "NEARBYKAAM_BIND",
            value: bind_raw.clone(),
            reason: "expected host:port",
        })?;

        let jwt_secret = get("JWT_SECRET").unwrap_or_else(|| {
            warn!("JWT_SECRET not set; using insecure dev default");
            DEV_JWT_SECRET.to_string()
        });

        Ok(Self {
            bind,
            jwt_secret,
            gemini_api_key: get("GEMINI_API_KEY"),
            gemini_api_url: get("GEMINI_API_URL"),
            data_dir: get("NEARBYKAAM_DATA_DIR").map(PathBuf::from),
            max_distance_km: positive_km(
                "NEARBYKAAM_MAX_DISTANCE_KM",
                get("NEARBYKAAM_MAX_DISTANCE_KM"),
                nearbykaam_jobs::DEFAULT_MAX_DISTANCE_KM,
            )?,
            tie_window_km: non_negative_km(
                "NEARBYKAAM_TIE_WINDOW_KM",
                get("NEARBYKAAM_TIE_WINDOW_KM"),
                nearbykaam_jobs::DEFAULT_TIE_WINDOW_KM,
            )?,
        })
    }
}

fn parse_km(var: &'static str, raw: &str) -> Result<f64, ConfigError> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ConfigError::Invalid {
            var,
            value: raw.to_string(),
            reason: "expected a number of kilometres",
        })
}

fn positive_km(var: &'static str, raw: Option<String>, default: f64) -> Result<f64, ConfigError> {
    let Some(raw) = raw else { return Ok(default) };
    let v = parse_km(var, &raw)?;
    if v <= 0.0 {
        return Err(ConfigError::Invalid {
            var,
            value: raw,
            reason: "must be greater than zero",
        });
    }
    Ok(v)
}

fn non_negative_km(var: &'static str, raw: Option<String>, default: f64) -> Result<f64, ConfigError> {
    let Some(raw) = raw else { return Ok(default) };
    let v = parse_km(var, &raw)?;
    if v < 0.0 {
        return Err(ConfigError::Invalid {
            var,
            value: raw,
            reason: "must not be negative",
        });
    }
    Ok(v)
}
