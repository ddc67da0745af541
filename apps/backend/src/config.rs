//! Environment configuration

use std::{env, fmt::Display, str::FromStr};

use anyhow::{anyhow, Context};
use progression_core::PointsPolicy;
use tracing::{debug, info};

/// Runtime configuration loaded from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    pub leaderboard_default_limit: u32,
    pub points: PointsPolicy,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let defaults = PointsPolicy::default();
        let points = PointsPolicy {
            post_created: try_load("POINTS_POST_CREATED", defaults.post_created)?,
            like_received: try_load("POINTS_LIKE_RECEIVED", defaults.like_received)?,
            comment_created: try_load("POINTS_COMMENT_CREATED", defaults.comment_created)?,
            lesson_completed: try_load("POINTS_LESSON_COMPLETED", defaults.lesson_completed)?,
        };
        points
            .validate()
            .map_err(|e| anyhow!("Invalid points policy: {e}"))?;

        Ok(Self {
            database_url,
            host: try_load("HOST", "0.0.0.0".to_string())?,
            port: try_load("PORT", 3000)?,
            max_connections: try_load("DB_MAX_CONNECTIONS", 10)?,
            leaderboard_default_limit: try_load("LEADERBOARD_DEFAULT_LIMIT", 10)?,
            points,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn try_load<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => {
            debug!("{key}={raw}");
            raw.trim()
                .parse()
                .map_err(|e| anyhow!("Invalid {key} value '{raw}': {e}"))
        }
        Err(_) => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}
