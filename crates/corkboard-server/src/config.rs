use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use jsonwebtoken::Algorithm;

/// Process-wide configuration, read from the environment once at startup.
pub struct Config {
    pub db_path: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_algorithm: Algorithm,
    pub token_ttl_days: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let jwt_secret = std::env::var("CORKBOARD_JWT_SECRET")
            .context("Missing required environment variable: CORKBOARD_JWT_SECRET")?;

        let jwt_algorithm = match std::env::var("CORKBOARD_JWT_ALGORITHM") {
            Ok(name) => Algorithm::from_str(&name)
                .map_err(|_| anyhow!("Unknown JWT algorithm: {}", name))?,
            Err(_) => Algorithm::HS256,
        };

        let token_ttl_days = match std::env::var("CORKBOARD_TOKEN_TTL_DAYS") {
            Ok(days) => days
                .parse()
                .context("CORKBOARD_TOKEN_TTL_DAYS must be an integer")?,
            Err(_) => 7,
        };

        let port = std::env::var("CORKBOARD_PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .context("CORKBOARD_PORT must be a port number")?;

        Ok(Self {
            db_path: std::env::var("CORKBOARD_DB_PATH").unwrap_or_else(|_| "corkboard.db".into()),
            host: std::env::var("CORKBOARD_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port,
            jwt_secret,
            jwt_algorithm,
            token_ttl_days,
        })
    }
}
