use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::CheckInView,
    repo_types::PhotoType,
    services::{create_check_in, CheckInSubmission, PhotoUpload},
};
use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/check-ins", get(list_check_ins).post(submit_check_in))
        .layer(DefaultBodyLimit::max(30 * 1024 * 1024)) // three photos
}

/// POST /check-ins (multipart)
/// Fields: weekNumber, notes?, front?, side?, back?
#[instrument(skip(state, mp))]
pub async fn submit_check_in(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    mut mp: Multipart,
) -> AppResult<(StatusCode, Json<CheckInView>)> {
    let mut submission = CheckInSubmission::default();
    while let Some(field) = mp
        .next_field()
        .await
        .map_err(|e| AppError::validation("body", e.to_string()))?
    {
        let name = field.name().map(|s| s.to_string()).unwrap_or_default();
        match name.as_str() {
            "weekNumber" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::validation("weekNumber", e.to_string()))?;
                let week = text
                    .trim()
                    .parse::<i32>()
                    .map_err(|_| AppError::validation("weekNumber", "must be an integer"))?;
                submission.week_number = Some(week);
            }
            "notes" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::validation("notes", e.to_string()))?;
                submission.notes = Some(text);
            }
            other => {
                let Ok(photo_type) = other.parse::<PhotoType>() else {
                    continue;
                };
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".into());
                let body = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(other, e.to_string()))?;
                submission.photos.push(PhotoUpload {
                    photo_type,
                    body,
                    content_type,
                });
            }
        }
    }

    let check_in = create_check_in(
        state.check_ins.as_ref(),
        state.storage.as_ref(),
        principal.user_id,
        submission,
    )
    .await?;
    let view = CheckInView::presigned(
        check_in,
        state.storage.as_ref(),
        state.config.storage.photo_url_ttl_seconds,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(view)))
}

#[instrument(skip(state))]
pub async fn list_check_ins(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> AppResult<Json<Vec<CheckInView>>> {
    let check_ins = state.check_ins.list_for_user(principal.user_id).await?;
    let views = CheckInView::presign_many(
        check_ins,
        state.storage.as_ref(),
        state.config.storage.photo_url_ttl_seconds,
    )
    .await?;
    Ok(Json(views))
}
