use serde::Deserialize;
use time::Duration;

use crate::checkins::cadence::{CadencePolicy, CHECK_IN_CADENCE, CHECK_IN_GRACE};

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    pub photo_url_ttl_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub storage: StorageConfig,
    pub cadence: CadencePolicy,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "coachplan".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "coachplan-users".into()),
        };
        let storage = StorageConfig {
            endpoint: std::env::var("MINIO_ENDPOINT")?,
            bucket: std::env::var("MINIO_BUCKET").unwrap_or_else(|_| "progress-photos".into()),
            access_key: std::env::var("MINIO_ACCESS_KEY")?,
            secret_key: std::env::var("MINIO_SECRET_KEY")?,
            region: std::env::var("MINIO_REGION").unwrap_or_else(|_| "us-east-1".into()),
            photo_url_ttl_seconds: env_parse("PHOTO_URL_TTL_SECONDS").unwrap_or(30 * 60),
        };
        let cadence = CadencePolicy {
            window: env_parse::<i64>("CHECKIN_CADENCE_DAYS")
                .map(Duration::days)
                .unwrap_or(CHECK_IN_CADENCE),
            grace: env_parse::<i64>("CHECKIN_GRACE_HOURS")
                .map(Duration::hours)
                .unwrap_or(CHECK_IN_GRACE),
        };
        Ok(Self {
            database_url,
            jwt,
            storage,
            cadence,
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}
