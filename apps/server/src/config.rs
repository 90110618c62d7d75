use std::{net::SocketAddr, path::PathBuf, time::Duration};

use anyhow::Context;

use crate::auth::decode_secret_key;

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:8080,http://localhost:3000,http://localhost:5173";

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub jwt_secret: Vec<u8>,
    pub token_ttl: Duration,
    pub quote_cache_ttl: Duration,
    pub static_dir: Option<PathBuf>,
    pub log_format: String,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// `AS_LOG_FORMAT`, `text` unless set. Read on its own by tools that skip
/// the full server config.
pub fn log_format_from_env() -> String {
    env_or("AS_LOG_FORMAT", "text").trim().to_lowercase()
}

fn env_u64(key: &str, default: u64) -> anyhow::Result<u64> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {key}: {raw}")),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = env_or("AS_LISTEN_ADDR", "0.0.0.0:3001")
            .parse()
            .context("Invalid AS_LISTEN_ADDR")?;
        let db_path = env_or("AS_DB_PATH", "./db/app.db");

        let mut cors_allow: Vec<String> = env_or("AS_CORS_ALLOW_ORIGINS", DEFAULT_CORS_ORIGINS)
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if let Ok(frontend) = std::env::var("AS_FRONTEND_URL") {
            let frontend = frontend.trim().to_string();
            if !frontend.is_empty() && !cors_allow.contains(&frontend) {
                cors_allow.push(frontend);
            }
        }

        let raw_secret = std::env::var("AS_JWT_SECRET").context("AS_JWT_SECRET must be set")?;
        let jwt_secret = decode_secret_key(&raw_secret).context("Invalid AS_JWT_SECRET")?;

        let static_dir = std::env::var("AS_STATIC_DIR")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(env_u64("AS_REQUEST_TIMEOUT_MS", 30_000)?),
            jwt_secret,
            token_ttl: Duration::from_secs(env_u64("AS_TOKEN_TTL_SECS", 7 * 24 * 60 * 60)?),
            quote_cache_ttl: Duration::from_secs(env_u64("AS_QUOTE_CACHE_TTL_SECS", 60)?),
            static_dir,
            log_format: log_format_from_env(),
        })
    }
}
