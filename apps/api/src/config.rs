use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; only malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Absent key disables the AI search variant.
    pub anthropic_api_key: Option<String>,
    pub page_size: usize,
    pub seed_resumes: usize,
    pub seed: u64,
    pub upload_delay: Duration,
    pub scoring_delay: Duration,
    pub progress_tick: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            page_size: parse_env::<usize>("PAGE_SIZE", 8)?.max(1),
            seed_resumes: parse_env("SEED_RESUMES", 42)?,
            seed: parse_env("SEED", 7)?,
            upload_delay: Duration::from_millis(parse_env("UPLOAD_DELAY_MS", 2000)?),
            scoring_delay: Duration::from_millis(parse_env("SCORING_DELAY_MS", 1500)?),
            progress_tick: Duration::from_millis(parse_env::<u64>("PROGRESS_TICK_MS", 150)?.max(1)),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            anthropic_api_key: None,
            page_size: 8,
            seed_resumes: 42,
            seed: 7,
            upload_delay: Duration::from_millis(2000),
            scoring_delay: Duration::from_millis(1500),
            progress_tick: Duration::from_millis(150),
        }
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}
