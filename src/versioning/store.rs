use std::future::Future;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{debug, warn};
use uuid::Uuid;

use super::{
    kind::RecordKind,
    record::{RawRecord, Versioned, VersionedRecord},
};
use crate::error::{AppError, AppResult};

/// How many times a colliding version allocation is retried before the
/// conflict is reported to the caller.
pub const MAX_APPEND_ATTEMPTS: u32 = 3;

/// Storage seam for version chains keyed by (user, kind).
///
/// "Latest" is always the highest `version`, never the newest timestamp.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn latest(&self, user_id: Uuid, kind: RecordKind) -> AppResult<Option<RawRecord>>;

    /// Every version, highest first.
    async fn history(&self, user_id: Uuid, kind: RecordKind) -> AppResult<Vec<RawRecord>>;

    /// Inserts `payload` as `max(version) + 1` in one step. Returns
    /// [`AppError::Conflict`] when a concurrent writer took that number.
    async fn try_append(
        &self,
        user_id: Uuid,
        kind: RecordKind,
        payload: Value,
    ) -> AppResult<RawRecord>;

    /// Shallow-merges `patch` into the latest version's payload, keeping its
    /// `version` and `created_at`. `None` when the chain is empty.
    async fn merge_latest(
        &self,
        user_id: Uuid,
        kind: RecordKind,
        patch: Map<String, Value>,
    ) -> AppResult<Option<RawRecord>>;

    /// Appends the next onboarding version and sets the profile's onboarding
    /// flag in one transaction. `None`, with nothing written, when the user
    /// has no profile. Collisions surface as [`AppError::Conflict`].
    async fn try_append_onboarding(
        &self,
        user_id: Uuid,
        payload: Value,
    ) -> AppResult<Option<RawRecord>>;
}

pub async fn latest<T: Versioned>(
    store: &dyn RecordStore,
    user_id: Uuid,
) -> AppResult<Option<VersionedRecord<T>>> {
    store
        .latest(user_id, T::KIND)
        .await?
        .map(VersionedRecord::try_from)
        .transpose()
}

pub async fn history<T: Versioned>(
    store: &dyn RecordStore,
    user_id: Uuid,
) -> AppResult<Vec<VersionedRecord<T>>> {
    store
        .history(user_id, T::KIND)
        .await?
        .into_iter()
        .map(VersionedRecord::try_from)
        .collect()
}

pub async fn append_new_version<T: Versioned>(
    store: &dyn RecordStore,
    user_id: Uuid,
    payload: &T,
) -> AppResult<VersionedRecord<T>> {
    let body = serde_json::to_value(payload)?;
    let raw = retry_conflicts(user_id, T::KIND, move || {
        store.try_append(user_id, T::KIND, body.clone())
    })
    .await?;
    debug!(%user_id, kind = %T::KIND, version = raw.version, "version appended");
    VersionedRecord::try_from(raw)
}

/// Runs `append` again while it reports a version collision, at most
/// [`MAX_APPEND_ATTEMPTS`] times in total.
pub async fn retry_conflicts<R, F, Fut>(
    user_id: Uuid,
    kind: RecordKind,
    mut append: F,
) -> AppResult<R>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AppResult<R>>,
{
    let mut attempt = 1;
    loop {
        match append().await {
            Ok(r) => return Ok(r),
            Err(AppError::Conflict(reason)) if attempt < MAX_APPEND_ATTEMPTS => {
                warn!(%user_id, %kind, attempt, %reason, "version collision, retrying");
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

pub async fn update_latest_in_place<T: Versioned>(
    store: &dyn RecordStore,
    user_id: Uuid,
    patch: Map<String, Value>,
) -> AppResult<VersionedRecord<T>> {
    let raw = store
        .merge_latest(user_id, T::KIND, patch)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!("No {} found for this client", T::KIND.label()))
        })?;
    debug!(%user_id, kind = %T::KIND, version = raw.version, "latest version updated in place");
    VersionedRecord::try_from(raw)
}
