use std::time::Duration;
use crate::services::quota::{QuotaLimits, DEFAULT_REPORT_QUOTA, DEFAULT_SAVE_QUOTA};

#[derive(Debug, Clone)]
pub struct Config {
    pub trip_store_url: String,
    pub cash_store_url: String,
    pub cash_sheet: String,
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub limits: QuotaLimits,
    pub store_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let trip_store_url = optional_env("TRIP_STORE_URL")
            .ok_or_else(|| "TRIP_STORE_URL must be set".to_string())?;

        Ok(Self {
            cash_store_url: optional_env("CASH_STORE_URL").unwrap_or_else(|| trip_store_url.clone()),
            trip_store_url,
            cash_sheet: env_or("CASH_SHEET", "cash"),
            database_url: optional_env("DATABASE_URL"),
            host: env_or("HOST", "127.0.0.1"),
            port: env_parse("PORT", 3000),
            limits: QuotaLimits {
                save: env_parse("SAVE_QUOTA", DEFAULT_SAVE_QUOTA),
                report: env_parse("REPORT_QUOTA", DEFAULT_REPORT_QUOTA),
            },
            store_timeout: Duration::from_secs(env_parse("STORE_TIMEOUT_SECS", 30)),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    optional_env(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}
