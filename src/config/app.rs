use anyhow::Result;
use std::env;

use super::parsed;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_ACCESS_TTL_MINUTES: i64 = 15;
const DEFAULT_REFRESH_TTL_DAYS: i64 = 30;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub log_level: String,
    pub jwt_secret: String,
    pub access_ttl_minutes: i64,
    pub refresh_ttl_days: i64,
    pub bcrypt_cost: u32,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let environment = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let default_host = if environment == "localhost" { "127.0.0.1" } else { "0.0.0.0" };
        let host = env::var("HOST").unwrap_or_else(|_| default_host.to_string());
        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let jwt_secret = env::var("JWT_SECRET")
            .unwrap_or_else(|_| "your-secret-key-change-in-production".to_string());

        Ok(AppConfig {
            host,
            port: parsed("PORT", DEFAULT_PORT)?,
            environment,
            log_level,
            jwt_secret,
            access_ttl_minutes: parsed("JWT_ACCESS_TTL_MINUTES", DEFAULT_ACCESS_TTL_MINUTES)?,
            refresh_ttl_days: parsed("JWT_REFRESH_TTL_DAYS", DEFAULT_REFRESH_TTL_DAYS)?,
            bcrypt_cost: parsed("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
