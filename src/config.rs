use std::net::SocketAddr;

use anyhow::Context;
use serde::Deserialize;

/// Longest accepted token lifetime: one year.
pub const MAX_JWT_TTL_MINUTES: i64 = 60 * 24 * 365;

fn jwt_ttl_minutes(raw: Option<String>) -> anyhow::Result<i64> {
    let Some(raw) = raw else {
        return Ok(5 * 60);
    };
    let minutes: i64 = raw
        .parse()
        .with_context(|| format!("JWT_TTL_MINUTES is not an integer: {raw}"))?;
    if !(1..=MAX_JWT_TTL_MINUTES).contains(&minutes) {
        anyhow::bail!("JWT_TTL_MINUTES must be between 1 and {MAX_JWT_TTL_MINUTES}, got {minutes}");
    }
    Ok(minutes)
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbConfig {
    pub api_key: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt: JwtConfig,
    pub tmdb: TmdbConfig,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let database_max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            ttl_minutes: jwt_ttl_minutes(std::env::var("JWT_TTL_MINUTES").ok())?,
        };
        let tmdb = TmdbConfig {
            api_key: std::env::var("TMDB_API_KEY").unwrap_or_default(),
            base_url: std::env::var("TMDB_BASE_URL")
                .unwrap_or_else(|_| "https://api.themoviedb.org/3".into()),
        };
        Ok(Self {
            database_url,
            database_max_connections,
            jwt,
            tmdb,
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: std::env::var("APP_PORT")
                .ok()
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(3001),
        })
    }

    pub fn listen_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}
