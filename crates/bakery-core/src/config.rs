use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::{Currency, Money, PaymentLimits};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration file not found: {path}")]
    NotFound { path: String },

    #[error("read error: {source}")]
    Read {
        #[from]
        source: std::io::Error,
    },

    #[error("TOML parse error: {source}")]
    Parse {
        #[from]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub shop: ShopConfig,
    pub storage: StorageConfig,
    pub payment: PaymentConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShopConfig {
    pub name: String,
    pub currency: Currency,
    /// Sessions shown by `shop history` when no limit is given.
    pub history_limit: usize,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    pub database_path: Option<PathBuf>,
}

/// Amounts are in minor units (bani, cents).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PaymentConfig {
    pub base_url: Option<String>,
    pub min_amount: Money,
    pub max_amount: Money,
    pub tax_rate_percent: u32,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            name: "Bakery".to_string(),
            currency: Currency::Ron,
            history_limit: 5,
        }
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        let limits = PaymentLimits::default();
        Self {
            base_url: None,
            min_amount: limits.min,
            max_amount: limits.max,
            tax_rate_percent: 19,
        }
    }
}

impl PaymentConfig {
    pub fn limits(&self) -> PaymentLimits {
        PaymentLimits {
            min: self.min_amount,
            max: self.max_amount,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("bakery")
            .join("config.toml")
    }

    pub fn database_path(&self) -> PathBuf {
        self.storage.database_path.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("bakery")
                .join("bakery.db")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sensible_values() {
        let config = Config::default();

        assert_eq!(config.shop.name, "Bakery");
        assert_eq!(config.shop.currency, Currency::Ron);
        assert_eq!(config.shop.history_limit, 5);
        assert!(config.storage.database_path.is_none());
        assert!(config.payment.base_url.is_none());
        assert_eq!(config.payment.min_amount, Money::from_major(1));
        assert_eq!(config.payment.max_amount, Money::from_major(10_000));
        assert_eq!(config.payment.tax_rate_percent, 19);
    }

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
            [shop]
            name = "Brutăria Bunicii"
        "#;

        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.shop.name, "Brutăria Bunicii");
        assert_eq!(config.shop.currency, Currency::Ron);
        assert_eq!(config.payment.tax_rate_percent, 19);
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
            [shop]
            name = "Corner Bakery"
            currency = "EUR"
            history_limit = 10

            [storage]
            database_path = "/var/lib/bakery/shop.db"

            [payment]
            base_url = "https://api.payments.example.com"
            min_amount = 50
            max_amount = 500000
            tax_rate_percent = 9
        "#;

        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.shop.currency, Currency::Eur);
        assert_eq!(config.shop.history_limit, 10);
        assert_eq!(
            config.database_path(),
            PathBuf::from("/var/lib/bakery/shop.db")
        );
        assert_eq!(
            config.payment.base_url.as_deref(),
            Some("https://api.payments.example.com")
        );
        assert_eq!(
            config.payment.limits(),
            PaymentLimits {
                min: Money::from_minor(50),
                max: Money::from_minor(500_000),
            }
        );
        assert_eq!(config.payment.tax_rate_percent, 9);
    }

    #[test]
    fn unknown_currency_fails_to_parse() {
        let toml = r#"
            [shop]
            currency = "JPY"
        "#;

        assert!(toml::from_str::<Config>(toml).is_err());
    }

    #[test]
    fn default_database_lives_in_data_dir() {
        let config = Config::default();

        assert!(config.database_path().ends_with("bakery/bakery.db"));
    }
}
