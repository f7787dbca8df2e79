use std::collections::BTreeMap;

use anyhow::Context;
use bytes::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    repo::{CheckInStore, NewCheckIn},
    repo_types::{CheckIn, PhotoType, ProgressPhoto},
};
use crate::{
    error::{AppError, AppResult},
    storage::{ext_from_mime, photo_key, StorageClient},
};

pub struct PhotoUpload {
    pub photo_type: PhotoType,
    pub body: Bytes,
    pub content_type: String,
}

#[derive(Default)]
pub struct CheckInSubmission {
    pub week_number: Option<i32>,
    pub notes: Option<String>,
    pub photos: Vec<PhotoUpload>,
}

/// Uploads the photos, then records the check-in with their paths.
/// Uploaded objects are removed again if the check-in cannot be stored.
pub async fn create_check_in(
    check_ins: &dyn CheckInStore,
    storage: &dyn StorageClient,
    user_id: Uuid,
    submission: CheckInSubmission,
) -> AppResult<CheckIn> {
    let week_number = submission
        .week_number
        .ok_or_else(|| AppError::validation("weekNumber", "is required"))?;
    if week_number < 1 {
        return Err(AppError::validation("weekNumber", "must be at least 1"));
    }

    let mut by_type: BTreeMap<PhotoType, (PhotoUpload, &'static str)> = BTreeMap::new();
    for upload in submission.photos {
        let field = upload.photo_type.as_str();
        let ext = ext_from_mime(&upload.content_type)
            .ok_or_else(|| AppError::validation(field, "unsupported image type"))?;
        if by_type.contains_key(&upload.photo_type) {
            return Err(AppError::validation(field, "only one photo per type is allowed"));
        }
        by_type.insert(upload.photo_type, (upload, ext));
    }

    let check_in_id = Uuid::new_v4();
    let mut photos = Vec::with_capacity(by_type.len());
    for (photo_type, (upload, ext)) in by_type {
        let key = photo_key(user_id, check_in_id, photo_type, ext);
        if let Err(e) = storage
            .put_object(&key, upload.body, &upload.content_type)
            .await
            .with_context(|| format!("put_object {key}"))
        {
            discard_uploads(storage, &photos).await;
            return Err(e.into());
        }
        photos.push(ProgressPhoto {
            photo_type,
            storage_path: key,
        });
    }

    let new = NewCheckIn {
        id: check_in_id,
        user_id,
        week_number,
        notes: submission
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty()),
        photos: photos.clone(),
    };
    match check_ins.insert(new).await {
        Ok(check_in) => {
            info!(%user_id, check_in_id = %check_in.id, week_number, photos = check_in.photos.len(), "check-in recorded");
            Ok(check_in)
        }
        Err(e) => {
            discard_uploads(storage, &photos).await;
            Err(e)
        }
    }
}

async fn discard_uploads(storage: &dyn StorageClient, photos: &[ProgressPhoto]) {
    for p in photos {
        if let Err(e) = storage.delete_object(&p.storage_path).await {
            warn!(error = %e, key = %p.storage_path, "failed to remove orphaned photo");
        }
    }
}
