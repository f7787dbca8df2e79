use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{CheckIn, PhotoType};
use crate::storage::StorageClient;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressPhotoView {
    pub photo_type: PhotoType,
    pub path: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInView {
    pub id: Uuid,
    pub week_number: i32,
    pub notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub photos: Vec<ProgressPhotoView>,
}

impl CheckInView {
    /// Resolves each stored photo path into a short-lived download URL.
    pub async fn presigned(
        check_in: CheckIn,
        storage: &dyn StorageClient,
        ttl_seconds: u64,
    ) -> anyhow::Result<Self> {
        let mut photos = Vec::with_capacity(check_in.photos.len());
        for p in check_in.photos {
            let url = storage.presign_get(&p.storage_path, ttl_seconds).await?;
            photos.push(ProgressPhotoView {
                photo_type: p.photo_type,
                path: p.storage_path,
                url,
            });
        }
        Ok(Self {
            id: check_in.id,
            week_number: check_in.week_number,
            notes: check_in.notes,
            created_at: check_in.created_at,
            photos,
        })
    }

    pub async fn presign_many(
        check_ins: Vec<CheckIn>,
        storage: &dyn StorageClient,
        ttl_seconds: u64,
    ) -> anyhow::Result<Vec<Self>> {
        let mut out = Vec::with_capacity(check_ins.len());
        for c in check_ins {
            out.push(Self::presigned(c, storage, ttl_seconds).await?);
        }
        Ok(out)
    }
}
