use std::time::Duration;

use anyhow::{Context, Result, bail};
use importer::{RetryPolicy, SchedulerSettings, SyncSettings};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub codeforces_api_url: String,
    /// Catalog scope; the public contest list when unset.
    pub group_code: Option<String>,
    pub refresh_interval: Duration,
    pub fetch_timeout: Duration,
    pub run_timeout: Duration,
    pub fetch_concurrency: usize,
    pub fetch_retries: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let config = Self {
            database_url: lookup("DATABASE_URL").context("Cannot load DATABASE_URL env variable")?,
            database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?,
            codeforces_api_url: lookup("CODEFORCES_API_URL")
                .unwrap_or_else(|| importer::CODEFORCES_API_URL.to_string()),
            group_code: lookup("CODEFORCES_GROUP_CODE").filter(|code| !code.trim().is_empty()),
            refresh_interval: Duration::from_secs(parse_or(&lookup, "REFRESH_INTERVAL_SECS", 7200)?),
            fetch_timeout: Duration::from_secs(parse_or(&lookup, "FETCH_TIMEOUT_SECS", 30)?),
            run_timeout: Duration::from_secs(parse_or(&lookup, "RUN_TIMEOUT_SECS", 1800)?),
            fetch_concurrency: parse_or(&lookup, "FETCH_CONCURRENCY", 4)?,
            fetch_retries: parse_or(&lookup, "FETCH_RETRIES", 3)?,
        };

        if config.refresh_interval.is_zero() {
            bail!("REFRESH_INTERVAL_SECS must be greater than 0");
        }
        if config.fetch_timeout.is_zero() {
            bail!("FETCH_TIMEOUT_SECS must be greater than 0");
        }
        if config.run_timeout.is_zero() {
            bail!("RUN_TIMEOUT_SECS must be greater than 0");
        }
        if config.fetch_concurrency == 0 {
            bail!("FETCH_CONCURRENCY must be greater than 0");
        }

        Ok(config)
    }

    pub fn sync_settings(&self) -> SyncSettings {
        SyncSettings {
            concurrency: self.fetch_concurrency,
            fetch_timeout: self.fetch_timeout,
            retry: RetryPolicy::new(self.fetch_retries),
        }
    }

    pub fn scheduler_settings(&self) -> SchedulerSettings {
        SchedulerSettings {
            interval: self.refresh_interval,
            run_timeout: self.run_timeout,
        }
    }

    /// The database URL without credentials, for logging.
    pub fn database_host(&self) -> &str {
        self.database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a number, got {raw:?}")),
        None => Ok(default),
    }
}
