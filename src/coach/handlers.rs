use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::Value;
use time::OffsetDateTime;
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{ClientSummary, PlanBundle},
    services::{history_json, load_bundle, require_client, triage},
};
use crate::{
    adjustments::repo_types::PendingMacroAdjustment,
    auth::CoachUser,
    error::{AppError, AppResult},
    macro_targets::{dto::MacroOverrideRequest, services::apply_coach_override, MacroTarget},
    plans::{
        dto::{MealPlanEdit, PublishMealPlan, PublishTrainingPlan, TrainingPlanEdit},
        services::{edit_meal_plan, edit_training_plan, publish_meal_plan, publish_training_plan},
        MealPlan, TrainingPlan,
    },
    state::AppState,
    versioning::{RecordKind, VersionedRecord},
};

// --- routers ---

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/coach/clients", get(list_clients))
        .route("/coach/clients/:id", get(get_client))
        .route("/coach/clients/:id/history/:kind", get(get_history))
        .route("/coach/clients/:id/adjustments", get(list_adjustments))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/coach/clients/:id/macros", put(override_macros))
        .route(
            "/coach/clients/:id/meal-plan",
            post(publish_meal).patch(edit_meal),
        )
        .route(
            "/coach/clients/:id/training-plan",
            post(publish_training).patch(edit_training),
        )
}

// --- reads ---

#[instrument(skip(state))]
pub async fn list_clients(
    State(state): State<AppState>,
    CoachUser(_coach): CoachUser,
) -> AppResult<Json<Vec<ClientSummary>>> {
    Ok(Json(triage(&state, OffsetDateTime::now_utc()).await?))
}

#[instrument(skip(state))]
pub async fn get_client(
    State(state): State<AppState>,
    CoachUser(_coach): CoachUser,
    Path(client_id): Path<Uuid>,
) -> AppResult<Json<PlanBundle>> {
    Ok(Json(load_bundle(&state, client_id, OffsetDateTime::now_utc()).await?))
}

#[instrument(skip(state))]
pub async fn get_history(
    State(state): State<AppState>,
    CoachUser(_coach): CoachUser,
    Path((client_id, kind)): Path<(Uuid, String)>,
) -> AppResult<Json<Vec<Value>>> {
    let kind: RecordKind = kind
        .parse()
        .map_err(|e: String| AppError::validation("kind", e))?;
    require_client(&state, client_id).await?;
    Ok(Json(history_json(state.records.as_ref(), client_id, kind).await?))
}

#[instrument(skip(state))]
pub async fn list_adjustments(
    State(state): State<AppState>,
    CoachUser(_coach): CoachUser,
    Path(client_id): Path<Uuid>,
) -> AppResult<Json<Vec<PendingMacroAdjustment>>> {
    require_client(&state, client_id).await?;
    Ok(Json(state.adjustments.list_pending(client_id).await?))
}

// --- edits ---

#[instrument(skip(state, body))]
pub async fn override_macros(
    State(state): State<AppState>,
    CoachUser(coach): CoachUser,
    Path(client_id): Path<Uuid>,
    Json(body): Json<MacroOverrideRequest>,
) -> AppResult<Json<VersionedRecord<MacroTarget>>> {
    require_client(&state, client_id).await?;
    let record = apply_coach_override(state.records.as_ref(), client_id, body).await?;
    info!(coach_id = %coach.user_id, %client_id, version = record.version, "macro override saved");
    Ok(Json(record))
}

#[instrument(skip(state, body))]
pub async fn publish_meal(
    State(state): State<AppState>,
    CoachUser(coach): CoachUser,
    Path(client_id): Path<Uuid>,
    Json(body): Json<PublishMealPlan>,
) -> AppResult<(StatusCode, Json<VersionedRecord<MealPlan>>)> {
    require_client(&state, client_id).await?;
    let record = publish_meal_plan(state.records.as_ref(), client_id, body).await?;
    info!(coach_id = %coach.user_id, %client_id, version = record.version, "meal plan published");
    Ok((StatusCode::CREATED, Json(record)))
}

#[instrument(skip(state, body))]
pub async fn edit_meal(
    State(state): State<AppState>,
    CoachUser(coach): CoachUser,
    Path(client_id): Path<Uuid>,
    Json(body): Json<MealPlanEdit>,
) -> AppResult<Json<VersionedRecord<MealPlan>>> {
    require_client(&state, client_id).await?;
    let record = edit_meal_plan(state.records.as_ref(), client_id, body).await?;
    info!(coach_id = %coach.user_id, %client_id, version = record.version, "meal plan edited");
    Ok(Json(record))
}

#[instrument(skip(state, body))]
pub async fn publish_training(
    State(state): State<AppState>,
    CoachUser(coach): CoachUser,
    Path(client_id): Path<Uuid>,
    Json(body): Json<PublishTrainingPlan>,
) -> AppResult<(StatusCode, Json<VersionedRecord<TrainingPlan>>)> {
    require_client(&state, client_id).await?;
    let record = publish_training_plan(state.records.as_ref(), client_id, body).await?;
    info!(coach_id = %coach.user_id, %client_id, version = record.version, "training plan published");
    Ok((StatusCode::CREATED, Json(record)))
}

#[instrument(skip(state, body))]
pub async fn edit_training(
    State(state): State<AppState>,
    CoachUser(coach): CoachUser,
    Path(client_id): Path<Uuid>,
    Json(body): Json<TrainingPlanEdit>,
) -> AppResult<Json<VersionedRecord<TrainingPlan>>> {
    require_client(&state, client_id).await?;
    let record = edit_training_plan(state.records.as_ref(), client_id, body).await?;
    info!(coach_id = %coach.user_id, %client_id, version = record.version, "training plan edited");
    Ok(Json(record))
}
