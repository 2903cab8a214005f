//! Configuration loading and representation.
//!
//! Every setting has a default; environment variables override them.
//! Parsing goes through a lookup function so tests never touch the process
//! environment.

use std::net::SocketAddr;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shelfwise_ai::{ForecastConfig, ProductSelection, WorkerPool};
use shelfwise_core::parse_calendar_date;

pub const ENV_BIND: &str = "SHELFWISE_BIND";
pub const ENV_REFERENCE_DATE: &str = "SHELFWISE_REFERENCE_DATE";
pub const ENV_FORECAST_LIMIT: &str = "SHELFWISE_FORECAST_LIMIT";
pub const ENV_FORECAST_SELECTION: &str = "SHELFWISE_FORECAST_SELECTION";
pub const ENV_MAX_CONCURRENT: &str = "SHELFWISE_MAX_CONCURRENT";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "SHELFWISE_REQUEST_TIMEOUT_SECS";
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid value `{value}` for {key}: {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisorConfig {
    pub bind_addr: SocketAddr,
    /// Pinned evaluation date for the discount engine. `None` means "today"
    /// (UTC), read once per request.
    pub reference_date: Option<NaiveDate>,
    pub forecast_product_limit: usize,
    pub forecast_selection: ProductSelection,
    pub max_concurrent: usize,
    pub request_timeout: Duration,
    pub database_url: Option<String>,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
            reference_date: None,
            forecast_product_limit: 10,
            forecast_selection: ProductSelection::EncounterOrder,
            max_concurrent: 4,
            request_timeout: Duration::from_secs(30),
            database_url: None,
        }
    }
}

impl AdvisorConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(v) = get(ENV_BIND) {
            cfg.bind_addr = v.parse().map_err(|e| invalid(ENV_BIND, &v, e))?;
        }
        if let Some(v) = get(ENV_REFERENCE_DATE) {
            let date = parse_calendar_date(&v)
                .ok_or_else(|| invalid(ENV_REFERENCE_DATE, &v, "expected YYYY-MM-DD"))?;
            cfg.reference_date = Some(date);
        }
        if let Some(v) = get(ENV_FORECAST_LIMIT) {
            cfg.forecast_product_limit = v.parse().map_err(|e| invalid(ENV_FORECAST_LIMIT, &v, e))?;
        }
        if let Some(v) = get(ENV_FORECAST_SELECTION) {
            cfg.forecast_selection = v
                .parse()
                .map_err(|e: String| invalid(ENV_FORECAST_SELECTION, &v, e))?;
        }
        if let Some(v) = get(ENV_MAX_CONCURRENT) {
            let n: usize = v.parse().map_err(|e| invalid(ENV_MAX_CONCURRENT, &v, e))?;
            if n == 0 {
                return Err(invalid(ENV_MAX_CONCURRENT, &v, "must be at least 1"));
            }
            cfg.max_concurrent = n;
        }
        if let Some(v) = get(ENV_REQUEST_TIMEOUT_SECS) {
            let secs: u64 = v.parse().map_err(|e| invalid(ENV_REQUEST_TIMEOUT_SECS, &v, e))?;
            if secs == 0 {
                return Err(invalid(ENV_REQUEST_TIMEOUT_SECS, &v, "must be at least 1"));
            }
            cfg.request_timeout = Duration::from_secs(secs);
        }
        cfg.database_url = get(ENV_DATABASE_URL);

        Ok(cfg)
    }

    /// The evaluation date for one discount run: the pinned date, or today.
    pub fn reference_date_or_today(&self) -> NaiveDate {
        self.reference_date.unwrap_or_else(|| Utc::now().date_naive())
    }

    pub fn forecast_config(&self) -> ForecastConfig {
        ForecastConfig {
            product_limit: self.forecast_product_limit,
            selection: self.forecast_selection,
        }
    }

    pub fn worker_pool(&self) -> WorkerPool {
        WorkerPool::new(self.max_concurrent)
    }
}

fn invalid(key: &'static str, value: &str, reason: impl ToString) -> ConfigError {
    ConfigError {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
