//! Order service configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use atelier_core::{DiscountPolicy, LoyaltyDiscount, DEFAULT_LOYALTY_DISCOUNT_BPS};
use atelier_db::DbConfig;

use crate::page::MAX_PAGE_SIZE;

/// Order service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfig {
    /// SQLite database file
    pub database_path: PathBuf,

    /// Loyalty discount for permanent clients, basis points (1000 = 10%)
    pub loyalty_discount_bps: u32,

    /// Upper bound for list page sizes
    pub max_page_size: u32,
}

impl Default for OrderConfig {
    fn default() -> Self {
        OrderConfig {
            database_path: PathBuf::from("./atelier.db"),
            loyalty_discount_bps: DEFAULT_LOYALTY_DISCOUNT_BPS,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

impl OrderConfig {
    /// Load configuration from environment variables.
    ///
    /// - `ATELIER_DATABASE_PATH` (default `./atelier.db`)
    /// - `ATELIER_LOYALTY_DISCOUNT_BPS` (default 1000, at most 10000)
    /// - `ATELIER_MAX_PAGE_SIZE` (default 100, 1..=100)
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`OrderConfig::load`], reading values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = OrderConfig::default();

        let config = OrderConfig {
            database_path: lookup("ATELIER_DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),

            loyalty_discount_bps: lookup("ATELIER_LOYALTY_DISCOUNT_BPS")
                .map(|v| v.trim().parse())
                .transpose()
                .map_err(|_| ConfigError::InvalidValue("ATELIER_LOYALTY_DISCOUNT_BPS".to_string()))?
                .unwrap_or(defaults.loyalty_discount_bps),

            max_page_size: lookup("ATELIER_MAX_PAGE_SIZE")
                .map(|v| v.trim().parse())
                .transpose()
                .map_err(|_| ConfigError::InvalidValue("ATELIER_MAX_PAGE_SIZE".to_string()))?
                .unwrap_or(defaults.max_page_size),
        };

        if config.loyalty_discount_bps > 10_000 {
            return Err(ConfigError::OutOfRange {
                key: "ATELIER_LOYALTY_DISCOUNT_BPS".to_string(),
                min: 0,
                max: 10_000,
            });
        }

        if !(1..=MAX_PAGE_SIZE).contains(&config.max_page_size) {
            return Err(ConfigError::OutOfRange {
                key: "ATELIER_MAX_PAGE_SIZE".to_string(),
                min: 1,
                max: MAX_PAGE_SIZE,
            });
        }

        Ok(config)
    }

    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path)
    }

    pub fn discount_policy(&self) -> Arc<dyn DiscountPolicy> {
        Arc::new(LoyaltyDiscount::new(self.loyalty_discount_bps))
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("{key} must be between {min} and {max}")]
    OutOfRange { key: String, min: u32, max: u32 },
}
