use uuid::Uuid;

use super::{dto::MacroOverrideRequest, repo_types::MacroTarget};
use crate::{
    error::AppResult,
    overrides::{apply_coach_edit, to_patch},
    versioning::{RecordStore, VersionedRecord},
};

/// Records a coach override as a new macro-target version.
pub async fn apply_coach_override(
    records: &dyn RecordStore,
    user_id: Uuid,
    request: MacroOverrideRequest,
) -> AppResult<VersionedRecord<MacroTarget>> {
    let edit = request.validate()?;
    apply_coach_edit::<MacroTarget>(records, user_id, to_patch(&edit)?).await
}
