use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ImageHostConfig {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    /// Base used to build the public URL of an uploaded object.
    pub public_url: String,
    pub upload_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
    pub images: ImageHostConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;

        let endpoint = std::env::var("S3_ENDPOINT").context("S3_ENDPOINT is not set")?;
        let bucket = std::env::var("S3_BUCKET").context("S3_BUCKET is not set")?;
        let public_url = std::env::var("S3_PUBLIC_URL")
            .unwrap_or_else(|_| format!("{}/{}", endpoint.trim_end_matches('/'), bucket));
        let images = ImageHostConfig {
            access_key: std::env::var("S3_ACCESS_KEY").context("S3_ACCESS_KEY is not set")?,
            secret_key: std::env::var("S3_SECRET_KEY").context("S3_SECRET_KEY is not set")?,
            region: std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".into()),
            upload_timeout_secs: env_parse("UPLOAD_TIMEOUT_SECS", 30),
            endpoint,
            bucket,
            public_url,
        };

        Ok(Self {
            database_url,
            db_max_connections: env_parse("DB_MAX_CONNECTIONS", 10),
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_parse("APP_PORT", 8080),
            max_upload_bytes: env_parse("MAX_UPLOAD_BYTES", 10 * 1024 * 1024),
            images,
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
