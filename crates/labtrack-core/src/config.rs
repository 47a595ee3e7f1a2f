//! Configuration module
//!
//! This module provides configuration for the API server, database pool, and
//! the FedEx carrier integration. All values are read from the environment
//! (with `.env` support via dotenvy) at startup.

use std::env;

// Common constants
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const CARRIER_TIMEOUT_SECS: u64 = 30;

const FEDEX_SANDBOX_TOKEN_URL: &str = "https://apis-sandbox.fedex.com/oauth/token";
const FEDEX_PRODUCTION_TOKEN_URL: &str = "https://apis.fedex.com/oauth/token";
const FEDEX_SANDBOX_TRACKING_URL: &str = "https://apis-sandbox.fedex.com/track/v1/trackingnumbers";
const FEDEX_PRODUCTION_TRACKING_URL: &str = "https://apis.fedex.com/track/v1/trackingnumbers";

/// FedEx carrier API configuration.
///
/// `sandbox` selects between the sandbox and production base URLs for both
/// the OAuth token endpoint and the tracking endpoint.
#[derive(Clone, Debug)]
pub struct FedExConfig {
    pub client_id: String,
    pub client_secret: String,
    pub sandbox: bool,
    pub timeout_seconds: u64,
}

impl FedExConfig {
    pub fn token_url(&self) -> &'static str {
        if self.sandbox {
            FEDEX_SANDBOX_TOKEN_URL
        } else {
            FEDEX_PRODUCTION_TOKEN_URL
        }
    }

    pub fn tracking_url(&self) -> &'static str {
        if self.sandbox {
            FEDEX_SANDBOX_TRACKING_URL
        } else {
            FEDEX_PRODUCTION_TRACKING_URL
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub fedex: FedExConfig,
}

impl AppConfig {
    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let fedex = FedExConfig {
            client_id: env::var("FEDEX_CLIENT_ID")
                .map_err(|_| anyhow::anyhow!("FEDEX_CLIENT_ID must be set"))?,
            client_secret: env::var("FEDEX_CLIENT_SECRET")
                .map_err(|_| anyhow::anyhow!("FEDEX_CLIENT_SECRET must be set"))?,
            sandbox: env::var("FEDEX_MODE")
                .map(|m| m.trim().eq_ignore_ascii_case("sandbox"))
                .unwrap_or(true),
            timeout_seconds: env::var("FEDEX_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CARRIER_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CARRIER_TIMEOUT_SECS),
        };

        Ok(AppConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            fedex,
        })
    }
}
