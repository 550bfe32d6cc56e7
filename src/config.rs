use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub uploads: UploadConfig,
    pub bootstrap: Option<BootstrapAdmin>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub min_connections: u32,
    pub max_connections: u32,
    pub connect_timeout: u64,
    pub acquire_timeout: u64,
    pub idle_timeout: u64,
    /// Create missing tables from the entity definitions at start-up
    pub auto_migrate: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    /// Base URL clients resolve `/uploads/...` paths against
    pub public_base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    /// Token lifetime in seconds
    pub expiration: u64,
    pub bcrypt_cost: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    pub dir: PathBuf,
    pub max_bytes: usize,
}

/// First super admin, created only while the users table is empty
#[derive(Debug, Clone, Deserialize)]
pub struct BootstrapAdmin {
    pub username: String,
    pub email: String,
    pub password: String,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database = DatabaseConfig {
            url: std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?,
            min_connections: env_or("DB_MIN_CONNECTIONS", 5),
            max_connections: env_or("DB_MAX_CONNECTIONS", 20),
            connect_timeout: env_or("DB_CONNECT_TIMEOUT", 10),
            acquire_timeout: env_or("DB_ACQUIRE_TIMEOUT", 10),
            idle_timeout: env_or("DB_IDLE_TIMEOUT", 600),
            auto_migrate: env_or("DB_AUTO_MIGRATE", true),
        };

        let server = ServerConfig {
            host: std::env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("SERVER_PORT must be a port number")?,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            public_base_url: std::env::var("PUBLIC_BASE_URL").ok(),
        };

        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET is not set")?,
            expiration: env_or("JWT_EXPIRATION", 86400),
            bcrypt_cost: env_or("BCRYPT_COST", bcrypt::DEFAULT_COST),
        };

        let uploads = UploadConfig {
            dir: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./uploads")),
            max_bytes: env_or("UPLOAD_MAX_BYTES", 10 * 1024 * 1024),
        };

        let bootstrap = match (
            std::env::var("ADMIN_USERNAME"),
            std::env::var("ADMIN_PASSWORD"),
        ) {
            (Ok(username), Ok(password)) => Some(BootstrapAdmin {
                email: std::env::var("ADMIN_EMAIL")
                    .unwrap_or_else(|_| format!("{username}@localhost")),
                username,
                password,
            }),
            _ => None,
        };

        Ok(Config {
            database,
            server,
            jwt,
            uploads,
            bootstrap,
        })
    }
}
