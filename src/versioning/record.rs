use serde::{de::DeserializeOwned, Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use super::kind::RecordKind;
use crate::error::AppError;

/// A payload type that lives in a version chain.
pub trait Versioned: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const KIND: RecordKind;
}

/// A version row as stored, with its payload still as JSON.
#[derive(Debug, Clone, FromRow)]
pub struct RawRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub version: i32,
    pub payload: serde_json::Value,
    pub created_at: OffsetDateTime,
}

/// One version of a client's record. The payload fields are flattened into
/// the outward representation next to `version` and `createdAt`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VersionedRecord<T> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub version: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(flatten)]
    pub payload: T,
}

impl<T: Versioned> TryFrom<RawRecord> for VersionedRecord<T> {
    type Error = AppError;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: raw.id,
            user_id: raw.user_id,
            version: raw.version,
            created_at: raw.created_at,
            payload: serde_json::from_value(raw.payload)?,
        })
    }
}
