use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use artswipe_matching::MatchQueueConfig;

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "change-me-to-a-random-string",
    "dev-secret-change-me",
];

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub jwt_secret: String,
    pub storage_public_url: String,
    pub match_queue: MatchQueueConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let jwt_secret = var("ARTSWIPE_JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("ARTSWIPE_JWT_SECRET is unset or still a placeholder; set it in your .env file");
        }

        let storage_public_url = var("ARTSWIPE_STORAGE_PUBLIC_URL").unwrap_or_default();
        if storage_public_url.is_empty() {
            bail!("ARTSWIPE_STORAGE_PUBLIC_URL is not set");
        }

        let port = match var("ARTSWIPE_PORT") {
            Some(v) => v.parse().context("ARTSWIPE_PORT is not a valid port")?,
            None => 8080,
        };

        let defaults = MatchQueueConfig::default();
        let match_queue = MatchQueueConfig {
            workers: parse_or(&var, "ARTSWIPE_MATCH_WORKERS", defaults.workers)?,
            capacity: parse_or(&var, "ARTSWIPE_MATCH_QUEUE_CAPACITY", defaults.capacity)?,
        };

        Ok(Self {
            host: var("ARTSWIPE_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            db_path: var("ARTSWIPE_DB_PATH")
                .unwrap_or_else(|| "artswipe.db".into())
                .into(),
            jwt_secret,
            storage_public_url,
            match_queue,
        })
    }
}

fn parse_or(var: &impl Fn(&str) -> Option<String>, key: &str, default: usize) -> Result<usize> {
    let Some(v) = var(key) else {
        return Ok(default);
    };
    let n: usize = v
        .parse()
        .with_context(|| format!("{key} must be a positive integer"))?;
    if n == 0 {
        bail!("{key} must be a positive integer");
    }
    Ok(n)
}
