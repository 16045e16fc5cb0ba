use crate::datasource::gw2::DEFAULT_PRICES_URL;
use crate::recipes::Catalog;
use std::collections::HashMap;
use std::net::IpAddr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_POLL_RECIPES: &[&str] = &["scholar_rune", "relic_of_fireworks", "gear_to_ecto"];

/// Upper bounds keep `Instant + interval` and the retention cutoff in range.
pub const MAX_TIMEOUT_SECS: u64 = 300;
pub const MAX_INTERVAL_SECS: u64 = 30 * 86_400;
pub const MAX_RETENTION_DAYS: u64 = 3_650;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub bind_addr: IpAddr,
    pub database_path: String,
    pub price_api_url: String,
    /// Base URL the poller uses to reach this service's own JSON endpoints.
    pub self_base_url: String,
    pub upstream_timeout: Duration,
    pub poller_enabled: bool,
    pub poll_interval: Duration,
    pub cleanup_interval: Duration,
    pub retention_days: i64,
    pub poll_recipes: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = parse_or(&env_map, "PORT", 8000u16, "must be a valid u16")?;
        let bind_addr = parse_or(
            &env_map,
            "BIND_ADDR",
            IpAddr::from([127, 0, 0, 1]),
            "must be an IP address",
        )?;

        let database_path = env_map
            .get("DATABASE_PATH")
            .cloned()
            .unwrap_or_else(|| "database/data.db".to_string());

        let price_api_url = env_map
            .get("PRICE_API_URL")
            .cloned()
            .unwrap_or_else(|| DEFAULT_PRICES_URL.to_string());

        let self_base_url = env_map
            .get("SELF_BASE_URL")
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("http://127.0.0.1:{}", port));

        let upstream_timeout = Duration::from_secs(bounded(
            &env_map,
            "UPSTREAM_TIMEOUT_SECS",
            10,
            MAX_TIMEOUT_SECS,
        )?);
        let poll_interval = Duration::from_secs(bounded(
            &env_map,
            "POLL_INTERVAL_SECS",
            900,
            MAX_INTERVAL_SECS,
        )?);
        let cleanup_interval = Duration::from_secs(bounded(
            &env_map,
            "CLEANUP_INTERVAL_SECS",
            86_400,
            MAX_INTERVAL_SECS,
        )?);
        let retention_days = i64::try_from(bounded(
            &env_map,
            "RETENTION_DAYS",
            14,
            MAX_RETENTION_DAYS,
        )?)
        .map_err(|_| {
            ConfigError::InvalidValue("RETENTION_DAYS".to_string(), "out of range".to_string())
        })?;

        let poller_enabled = match env_map
            .get("POLLER_ENABLED")
            .map(|s| s.as_str())
            .unwrap_or("true")
        {
            "true" | "1" => true,
            "false" | "0" => false,
            other => {
                return Err(ConfigError::InvalidValue(
                    "POLLER_ENABLED".to_string(),
                    format!("must be true or false, got {}", other),
                ))
            }
        };

        let poll_recipes = parse_poll_recipes_from_map(&env_map, &Catalog::builtin())?;

        Ok(Config {
            port,
            bind_addr,
            database_path,
            price_api_url,
            self_base_url,
            upstream_timeout,
            poller_enabled,
            poll_interval,
            cleanup_interval,
            retention_days,
            poll_recipes,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    env_map: &HashMap<String, String>,
    key: &str,
    default: T,
    expectation: &str,
) -> Result<T, ConfigError> {
    match env_map.get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue(key.to_string(), expectation.to_string())),
        None => Ok(default),
    }
}

/// Integer in `1..=max`.
fn bounded(
    env_map: &HashMap<String, String>,
    key: &str,
    default: u64,
    max: u64,
) -> Result<u64, ConfigError> {
    let expectation = format!("must be an integer between 1 and {}", max);
    let value = parse_or(env_map, key, default, &expectation)?;
    if value == 0 || value > max {
        return Err(ConfigError::InvalidValue(key.to_string(), expectation));
    }
    Ok(value)
}

fn parse_poll_recipes_from_map(
    env_map: &HashMap<String, String>,
    catalog: &Catalog,
) -> Result<Vec<String>, ConfigError> {
    let recipes: Vec<String> = match env_map.get("POLL_RECIPES") {
        Some(list) => list
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        None => DEFAULT_POLL_RECIPES.iter().map(|s| s.to_string()).collect(),
    };

    if let Some(bad) = recipes.iter().find(|r| !catalog.is_trackable(r)) {
        return Err(ConfigError::InvalidValue(
            "POLL_RECIPES".to_string(),
            format!("{} is not a trackable recipe", bad),
        ));
    }

    Ok(recipes)
}
