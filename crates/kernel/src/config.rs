//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port.
    pub port: u16,

    /// PostgreSQL connection URL.
    pub database_url: String,

    /// Maximum database connections in the pool.
    pub database_max_connections: u32,

    /// Directory the theme engine loads templates from.
    pub templates_dir: PathBuf,

    /// Application names to drop from the installed-app table
    /// (from the DISABLED_APPS env var).
    pub disabled_apps: Vec<String>,
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let port = env_or("PORT", "3000")
            .parse()
            .context("PORT must be a valid u16")?;

        let database_url =
            env::var("DATABASE_URL").context("DATABASE_URL environment variable is required")?;

        let database_max_connections = env_or("DATABASE_MAX_CONNECTIONS", "10")
            .parse()
            .context("DATABASE_MAX_CONNECTIONS must be a valid u32")?;

        let templates_dir = PathBuf::from(env_or("TEMPLATES_DIR", "./templates"));

        let disabled_apps = env_or("DISABLED_APPS", "")
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            port,
            database_url,
            database_max_connections,
            templates_dir,
            disabled_apps,
        })
    }
}
