//! Process configuration, read from the environment (and `.env` if present).

use std::env;

use tracing::Level;

use crate::error::Error;

pub const MEMORY_URI: &str = "memory://";

#[derive(Clone, Debug)]
pub struct Config {
    pub database_uri: String,
    pub database_name: String,
    pub api_key: Option<String>,
    pub bind_address: String,
    pub log_level: Level,
}

impl Config {
    pub fn from_env() -> Result<Config, Error> {
        dotenv::dotenv().ok();

        let log_level = var_or("LOG_LEVEL", "debug");
        let log_level = log_level.parse::<Level>().map_err(|_| Error::InvalidConfiguration {
            key: "LOG_LEVEL",
            value: log_level.clone(),
        })?;

        Ok(Config {
            database_uri: var_or("DATABASE_URI", "mongodb://localhost:27017"),
            database_name: var_or("DATABASE_NAME", "promotions"),
            api_key: env::var("API_KEY").ok().filter(|key| !key.is_empty()),
            bind_address: var_or("BIND_ADDRESS", "127.0.0.1:8080"),
            log_level,
        })
    }

    /// A configuration backed by the in-memory store.
    pub fn in_memory(api_key: impl Into<String>) -> Config {
        Config {
            database_uri: MEMORY_URI.to_owned(),
            database_name: "promotions".to_owned(),
            api_key: Some(api_key.into()),
            bind_address: "127.0.0.1:0".to_owned(),
            log_level: Level::INFO,
        }
    }

    pub fn uses_memory_store(&self) -> bool {
        self.database_uri.starts_with(MEMORY_URI)
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}
