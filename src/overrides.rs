//! Coach edits to versioned records.
//!
//! Every edit arrives as a shallow patch of camelCase payload fields. The
//! record kind's [`EditPolicy`] decides what happens to it:
//!
//! * `Append`: the fields carried forward from the latest version are combined
//!   with the patch into a brand new version.
//! * `MutateLatest`: the patch is merged into the latest version, which must
//!   already exist.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    versioning::{store, EditPolicy, RecordStore, Versioned, VersionedRecord},
};

pub trait CoachEditable: Versioned {
    /// Fields a superseding version inherits from `previous`. Defaults to all of them.
    fn carried_forward(previous: Option<&Self>) -> AppResult<Map<String, Value>> {
        match previous {
            Some(p) => to_patch(p),
            None => Ok(Map::new()),
        }
    }
}

/// Serializes `value` into the object of fields it supplies. Types used as
/// edits skip `None` fields, so absent fields never reach the patch.
pub fn to_patch<E: Serialize>(value: &E) -> AppResult<Map<String, Value>> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(AppError::Internal(anyhow::anyhow!(
            "edit did not serialize to an object: {other}"
        ))),
    }
}

pub async fn apply_coach_edit<T: CoachEditable>(
    records: &dyn RecordStore,
    user_id: Uuid,
    patch: Map<String, Value>,
) -> AppResult<VersionedRecord<T>> {
    let record = match T::KIND.coach_edit_policy() {
        EditPolicy::Append => {
            let previous = store::latest::<T>(records, user_id).await?;
            let mut fields = T::carried_forward(previous.as_ref().map(|r| &r.payload))?;
            fields.extend(patch);
            let payload: T = serde_json::from_value(Value::Object(fields))
                .map_err(|e| AppError::validation(T::KIND.as_str(), e.to_string()))?;
            store::append_new_version(records, user_id, &payload).await?
        }
        EditPolicy::MutateLatest => {
            store::update_latest_in_place::<T>(records, user_id, patch).await?
        }
    };
    info!(%user_id, kind = %T::KIND, version = record.version, "coach edit applied");
    Ok(record)
}
