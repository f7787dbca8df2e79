use tracing::info;
use uuid::Uuid;

use super::{dto::OnboardingSubmission, repo_types::OnboardingResponse};
use crate::{
    error::{AppError, AppResult},
    versioning::{store::retry_conflicts, RecordKind, RecordStore, VersionedRecord},
};

/// Stores a submission as the next onboarding version and marks the client
/// as onboarded, both or neither. Later submissions leave the flag set.
pub async fn submit_onboarding(
    records: &dyn RecordStore,
    user_id: Uuid,
    submission: OnboardingSubmission,
) -> AppResult<VersionedRecord<OnboardingResponse>> {
    let answers = submission.validate()?;
    let body = serde_json::to_value(&answers)?;

    let raw = retry_conflicts(user_id, RecordKind::Onboarding, move || {
        records.try_append_onboarding(user_id, body.clone())
    })
    .await?
    .ok_or_else(|| AppError::not_found("Profile not found"))?;

    let record = VersionedRecord::try_from(raw)?;
    if record.version == 1 {
        info!(%user_id, "onboarding completed");
    }
    info!(%user_id, version = record.version, "onboarding response stored");
    Ok(record)
}
