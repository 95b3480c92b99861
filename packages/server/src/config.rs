use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub tavily_api_key: Option<String>,
    /// Listing URL template with a `{state}` placeholder
    pub directory_listing_url: Option<String>,
    pub enrich_concurrency: usize,
    pub fetch_timeout_secs: u64,
    pub max_candidates: usize,
    /// How long finished jobs are kept before pruning
    pub job_retention: chrono::Duration,
    pub allowed_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            tavily_api_key: None,
            directory_listing_url: None,
            enrich_concurrency: 15,
            fetch_timeout_secs: 10,
            max_candidates: 100,
            job_retention: chrono::Duration::hours(24),
            allowed_origins: Vec::new(),
        }
    }
}

fn parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid number", name)),
        Err(_) => Ok(default),
    }
}

/// Unset and blank values both count as absent.
fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Retention window for finished jobs, in whole hours.
fn retention_window(hours: i64) -> Result<chrono::Duration> {
    anyhow::ensure!(hours >= 0, "JOB_RETENTION_HOURS must not be negative");
    chrono::Duration::try_hours(hours)
        .with_context(|| format!("JOB_RETENTION_HOURS is out of range: {}", hours))
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let defaults = Self::default();
        let directory_listing_url = optional("DIRECTORY_LISTING_URL");
        if let Some(template) = &directory_listing_url {
            anyhow::ensure!(
                template.contains("{state}"),
                "DIRECTORY_LISTING_URL must contain a {{state}} placeholder"
            );
        }

        Ok(Self {
            port: parse_or("PORT", defaults.port)?,
            tavily_api_key: optional("TAVILY_API_KEY"),
            directory_listing_url,
            enrich_concurrency: parse_or("ENRICH_CONCURRENCY", defaults.enrich_concurrency)?,
            fetch_timeout_secs: parse_or("FETCH_TIMEOUT_SECS", defaults.fetch_timeout_secs)?,
            max_candidates: parse_or("MAX_CANDIDATES", defaults.max_candidates)?,
            job_retention: retention_window(parse_or(
                "JOB_RETENTION_HOURS",
                defaults.job_retention.num_hours(),
            )?)?,
            allowed_origins: optional("ALLOWED_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        })
    }
}
