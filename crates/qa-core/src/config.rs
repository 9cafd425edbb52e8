//! Runtime configuration.
//!
//! Values come from the process environment. The binary loads a `.env` file
//! first and lets command-line flags override individual fields.

use chrono::{TimeDelta, Utc};
use std::path::PathBuf;
use tracing::warn;

use crate::error::{QaError, QaResult};

/// Default SQLite database location.
pub const DEFAULT_DATABASE: &str = "./qa_dashboard.db";

/// Default allowed browser origins.
pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://localhost:3001";

/// Default bearer token lifetime.
pub const DEFAULT_TOKEN_MINUTES: i64 = 30;

const DEV_SECRET_KEY: &str = "qa-dashboard-development-secret-change-me";

/// Which browser origins may call the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsPolicy {
    /// Any origin, without credentials.
    AllowAll,
    /// Only the listed origins, with credentials.
    Origins(Vec<String>),
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub secret_key: String,
    pub access_token_minutes: i64,
    pub cors: CorsPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE),
            secret_key: DEV_SECRET_KEY.to_string(),
            access_token_minutes: DEFAULT_TOKEN_MINUTES,
            cors: CorsPolicy::Origins(split_origins(DEFAULT_ALLOWED_ORIGINS)),
        }
    }
}

impl Config {
    /// Build the configuration from environment variables.
    pub fn from_env() -> QaResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> QaResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_path = lookup("QA_DATABASE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE));

        let secret_key = match lookup("SECRET_KEY").filter(|s| !s.is_empty()) {
            Some(key) => key,
            None => {
                warn!("SECRET_KEY not set, using the development key");
                DEV_SECRET_KEY.to_string()
            }
        };

        let access_token_minutes = match lookup("ACCESS_TOKEN_EXPIRE_MINUTES") {
            Some(raw) => parse_token_minutes(&raw)?,
            None => DEFAULT_TOKEN_MINUTES,
        };

        let allow_all = lookup("ALLOW_ALL_ORIGINS")
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let cors = if allow_all {
            CorsPolicy::AllowAll
        } else {
            let raw = lookup("ALLOWED_ORIGINS")
                .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.to_string());
            CorsPolicy::Origins(split_origins(&raw))
        };

        Ok(Self {
            database_path,
            secret_key,
            access_token_minutes,
            cors,
        })
    }
}

/// Token lifetimes must be positive and small enough that `now + lifetime`
/// is still a representable timestamp.
fn parse_token_minutes(raw: &str) -> QaResult<i64> {
    let invalid = || {
        QaError::Config(format!(
            "ACCESS_TOKEN_EXPIRE_MINUTES must be a positive number of minutes, got '{raw}'"
        ))
    };

    let minutes = raw.trim().parse::<i64>().map_err(|_| invalid())?;
    if minutes <= 0 {
        return Err(invalid());
    }
    TimeDelta::try_minutes(minutes)
        .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
        .ok_or_else(invalid)?;

    Ok(minutes)
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
