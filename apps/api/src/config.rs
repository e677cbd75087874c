use anyhow::{Context, Result};

use crate::layout::geometry::DEFAULT_PAGE_CAPACITY_CM;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub measure_service_url: String,
    pub measure_timeout_secs: u64,
    /// Base effective page capacity in cm (A4 minus margins, footer and safety reservations).
    pub page_capacity_cm: f64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            measure_service_url: require_env("MEASURE_SERVICE_URL")?,
            measure_timeout_secs: parse_var(
                "MEASURE_TIMEOUT_SECS",
                std::env::var("MEASURE_TIMEOUT_SECS").ok(),
                10,
            )?,
            page_capacity_cm: parse_capacity(std::env::var("PAGE_CAPACITY_CM").ok())?,
            port: parse_var("PORT", std::env::var("PORT").ok(), 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_var<T: std::str::FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(value) => value
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: '{value}'")),
        None => Ok(default),
    }
}

fn parse_capacity(raw: Option<String>) -> Result<f64> {
    let capacity = parse_var("PAGE_CAPACITY_CM", raw, DEFAULT_PAGE_CAPACITY_CM)?;
    if !capacity.is_finite() || capacity <= 0.0 {
        anyhow::bail!("PAGE_CAPACITY_CM must be a positive number, got {capacity}");
    }
    Ok(capacity)
}
