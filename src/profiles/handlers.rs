use axum::{
    extract::{Path, State},
    routing::put,
    Json, Router,
};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use super::repo_types::{Profile, SubscriptionStatus};
use crate::{
    auth::AdminUser,
    error::{AppError, AppResult},
    state::AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionUpdate {
    pub subscription_status: SubscriptionStatus,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/admin/clients/:id/subscription", put(set_subscription))
}

/// Contact point for the payment service: records the client's subscription state.
#[instrument(skip(state))]
pub async fn set_subscription(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(client_id): Path<Uuid>,
    Json(body): Json<SubscriptionUpdate>,
) -> AppResult<Json<Profile>> {
    let profile = state
        .profiles
        .set_subscription_status(client_id, body.subscription_status)
        .await?
        .ok_or_else(|| AppError::not_found("Client not found"))?;
    info!(admin_id = %admin.user_id, %client_id, status = body.subscription_status.as_str(), "subscription status updated");
    Ok(Json(profile))
}
