use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::FighterCatalog;
use crate::error::AppError;

/// Process configuration read from the environment at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// `None` disables the round timer.
    pub round_timeout: Option<Duration>,
    pub heartbeat_interval: Duration,
    pub catalog_path: Option<PathBuf>,
    pub rng_seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            round_timeout: Some(Duration::from_secs(30)),
            heartbeat_interval: Duration::from_secs(20),
            catalog_path: None,
            rng_seed: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();

        let host = env::var("DUEL_HOST").unwrap_or(defaults.host);
        let port = parse_var::<u16>("DUEL_PORT")?.unwrap_or(defaults.port);
        let round_timeout = match parse_var::<u64>("DUEL_ROUND_TIMEOUT_SECS")? {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => defaults.round_timeout,
        };
        let heartbeat_interval = match parse_var::<u64>("DUEL_HEARTBEAT_SECS")? {
            Some(0) => {
                return Err(AppError::config(
                    "DUEL_HEARTBEAT_SECS must be greater than zero".to_string(),
                ))
            }
            Some(secs) => Duration::from_secs(secs),
            None => defaults.heartbeat_interval,
        };
        let catalog_path = env::var("DUEL_CATALOG_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        let rng_seed = parse_var::<u64>("DUEL_RNG_SEED")?;

        Ok(Self {
            host,
            port,
            round_timeout,
            heartbeat_interval,
            catalog_path,
            rng_seed,
        })
    }

    /// WebSocket clients silent for this long are dropped.
    pub fn client_timeout(&self) -> Duration {
        self.heartbeat_interval * 2
    }

    /// The configured catalog file, or the built-in catalog.
    pub fn load_catalog(&self) -> Result<FighterCatalog, AppError> {
        let Some(path) = &self.catalog_path else {
            return Ok(FighterCatalog::builtin());
        };
        let raw = fs::read_to_string(path).map_err(|e| {
            AppError::config(format!("cannot read catalog '{}': {e}", path.display()))
        })?;
        let catalog: FighterCatalog = serde_json::from_str(&raw).map_err(|e| {
            AppError::config(format!("invalid catalog '{}': {e}", path.display()))
        })?;
        catalog
            .validate()
            .map_err(|detail| AppError::config(format!("invalid catalog: {detail}")))?;
        Ok(catalog)
    }
}

/// Unset or blank is `None`; anything else must parse.
fn parse_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>, AppError> {
    match env::var(name) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            AppError::config(format!("{name} has an invalid value: '{raw}'"))
        }),
        Err(_) => Ok(None),
    }
}
