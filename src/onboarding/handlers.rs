use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use tracing::instrument;

use super::{dto::OnboardingSubmission, repo_types::OnboardingResponse, services::submit_onboarding};
use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    state::AppState,
    versioning::{store, VersionedRecord},
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/onboarding", get(get_onboarding).post(submit))
}

#[instrument(skip(state, body))]
pub async fn submit(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Json(body): Json<OnboardingSubmission>,
) -> AppResult<(StatusCode, Json<VersionedRecord<OnboardingResponse>>)> {
    let record = submit_onboarding(state.records.as_ref(), principal.user_id, body).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[instrument(skip(state))]
pub async fn get_onboarding(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> AppResult<Json<VersionedRecord<OnboardingResponse>>> {
    store::latest::<OnboardingResponse>(state.records.as_ref(), principal.user_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("No onboarding response found"))
}
