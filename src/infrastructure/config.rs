//! Server configuration read from the environment (a `.env` file is loaded first when present).
//!
//! Required:
//! - `ACCESS_TOKEN_SECRET` - HS256 secret used to sign and verify access tokens
//! - `PAYMENT_SECRET_KEY` - secret key for the payment gateway
//!
//! Optional:
//! - `HOST` - bind address (default: 127.0.0.1)
//! - `PORT` - listen port (default: 5000)
//! - `PAYMENT_API_BASE` - payment gateway base URL (default: https://api.stripe.com)
//! - `PAYMENT_CURRENCY` - currency for payment intents (default: usd)
//! - `CATALOG_SEED_PATH` - JSON file with `instructors` and `classes` loaded at startup

use std::net::IpAddr;
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_PAYMENT_API_BASE: &str = "https://api.stripe.com";
const DEFAULT_CURRENCY: &str = "usd";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

#[derive(Debug, Clone)]
pub struct PaymentConfig {
    pub secret_key: String,
    pub api_base: String,
    pub currency: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: IpAddr,
    pub port: u16,
    pub jwt_secret: String,
    pub payment: PaymentConfig,
    pub catalog_seed_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
        };

        let host = match lookup("HOST") {
            Some(raw) => raw
                .parse::<IpAddr>()
                .map_err(|e| ConfigError::InvalidEnvVar("HOST".to_string(), e.to_string()))?,
            None => DEFAULT_HOST.parse().map_err(|_| {
                ConfigError::InvalidEnvVar("HOST".to_string(), DEFAULT_HOST.to_string())
            })?,
        };

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| ConfigError::InvalidEnvVar("PORT".to_string(), e.to_string()))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            host,
            port,
            jwt_secret: required("ACCESS_TOKEN_SECRET")?,
            payment: PaymentConfig {
                secret_key: required("PAYMENT_SECRET_KEY")?,
                api_base: lookup("PAYMENT_API_BASE")
                    .unwrap_or_else(|| DEFAULT_PAYMENT_API_BASE.to_string()),
                currency: lookup("PAYMENT_CURRENCY")
                    .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            },
            catalog_seed_path: lookup("CATALOG_SEED_PATH")
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from),
        })
    }
}
