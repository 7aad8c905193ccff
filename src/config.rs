use std::{env, path::PathBuf};

use crate::errors::AppError;

const DEFAULT_PORT: u16 = 4000;
pub(crate) const DEFAULT_DB: &str = "ratings";
const DEFAULT_COLLECTION: &str = "reviews";
const DEFAULT_STATIC_DIR: &str = "../frontend/dist";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub mongodb_url: String,
    /// Falls back to the database named in the connection string, then `ratings`.
    pub mongodb_db: Option<String>,
    pub mongodb_collection: String,
    pub production: bool,
    pub static_dir: PathBuf,
    pub log_bodies: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup, so tests don't touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match var("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| AppError::EnvError(format!("Invalid PORT value '{}': {}", raw, e)))?,
            None => DEFAULT_PORT,
        };

        let mongodb_url =
            var("MONGODB_URL").ok_or_else(|| AppError::EnvError("MONGODB_URL must be set".into()))?;

        Ok(Self {
            port,
            mongodb_url,
            mongodb_db: var("MONGODB_DB"),
            mongodb_collection: var("MONGODB_COLLECTION")
                .unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
            production: var("NODE_ENV").is_some_and(|v| v.trim() == "production"),
            static_dir: var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
            log_bodies: var("LOG_BODIES").is_some_and(|v| parse_flag(&v)),
        })
    }

    pub fn is_production(&self) -> bool {
        self.production
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
