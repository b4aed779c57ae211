//! Configuration loading from environment.

use std::env;

/// Database used when `DATABASE_URL` is not set.
const DEFAULT_DATABASE_URL: &str = "sqlite://billing.db?mode=rwc";

/// Application configuration.
pub struct Config {
    pub port: u16,
    pub database_url: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// `PORT` defaults to 5000, `DATABASE_URL` to a local SQLite file.
    pub fn from_env() -> anyhow::Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()?;

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        Ok(Self { port, database_url })
    }
}
