use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{
    dto::{ClientSummary, PlanBundle},
    status::classify,
};
use crate::{
    checkins::dto::CheckInView,
    error::{AppError, AppResult},
    macro_targets::MacroTarget,
    onboarding::OnboardingResponse,
    plans::{MealPlan, TrainingPlan},
    profiles::repo_types::{Profile, Role},
    state::AppState,
    versioning::{store, RecordKind, RecordStore, Versioned},
};

/// Loads a profile that a coach may act on.
pub async fn require_client(st: &AppState, client_id: Uuid) -> AppResult<Profile> {
    match st.profiles.get(client_id).await? {
        Some(p) if p.role == Role::Client => Ok(p),
        _ => Err(AppError::not_found("Client not found")),
    }
}

/// Every client with its triage status, most urgent first.
pub async fn triage(st: &AppState, now: OffsetDateTime) -> AppResult<Vec<ClientSummary>> {
    let clients = st.profiles.list_clients().await?;
    let ids: Vec<Uuid> = clients.iter().map(|c| c.user_id).collect();
    let last_check_ins = st.check_ins.last_check_in_times(&ids).await?;
    let pending = st.adjustments.pending_counts(&ids).await?;

    let mut summaries: Vec<ClientSummary> = clients
        .into_iter()
        .map(|c| {
            let last = last_check_ins.get(&c.user_id).copied();
            ClientSummary {
                status: classify(c.onboarding_completed, last, &st.config.cadence, now),
                pending_adjustments: pending.get(&c.user_id).copied().unwrap_or(0),
                last_check_in_at: last,
                user_id: c.user_id,
                email: c.email,
                display_name: c.display_name,
                subscription_status: c.subscription_status,
            }
        })
        .collect();
    // Within a status, the longest silence first; never-checked-in sorts as oldest.
    summaries.sort_by(|a, b| {
        a.status
            .cmp(&b.status)
            .then(a.last_check_in_at.cmp(&b.last_check_in_at))
            .then_with(|| a.email.cmp(&b.email))
    });
    Ok(summaries)
}

pub async fn load_bundle(st: &AppState, client_id: Uuid, now: OffsetDateTime) -> AppResult<PlanBundle> {
    let profile = require_client(st, client_id).await?;
    let records = st.records.as_ref();

    let onboarding = store::latest::<OnboardingResponse>(records, client_id).await?;
    let macros = store::latest::<MacroTarget>(records, client_id).await?;
    let meal_plan = store::latest::<MealPlan>(records, client_id).await?;
    let training_plan = store::latest::<TrainingPlan>(records, client_id).await?;

    let last_check_in_at = st.check_ins.last_check_in_at(client_id).await?;
    let check_ins = st.check_ins.list_for_user(client_id).await?;
    let check_ins = CheckInView::presign_many(
        check_ins,
        st.storage.as_ref(),
        st.config.storage.photo_url_ttl_seconds,
    )
    .await?;
    let pending_adjustments = st.adjustments.list_pending(client_id).await?;
    let pending_adjustment_count = st.adjustments.count_pending(client_id).await?;

    Ok(PlanBundle {
        status: classify(profile.onboarding_completed, last_check_in_at, &st.config.cadence, now),
        profile,
        onboarding,
        macros,
        meal_plan,
        training_plan,
        check_ins,
        pending_adjustments,
        pending_adjustment_count,
    })
}

/// Version history of one record kind, newest first, as outward JSON.
pub async fn history_json(
    records: &dyn RecordStore,
    client_id: Uuid,
    kind: RecordKind,
) -> AppResult<Vec<Value>> {
    match kind {
        RecordKind::MacroTargets => typed_history::<MacroTarget>(records, client_id).await,
        RecordKind::MealPlan => typed_history::<MealPlan>(records, client_id).await,
        RecordKind::TrainingPlan => typed_history::<TrainingPlan>(records, client_id).await,
        RecordKind::Onboarding => typed_history::<OnboardingResponse>(records, client_id).await,
    }
}

async fn typed_history<T: Versioned>(records: &dyn RecordStore, client_id: Uuid) -> AppResult<Vec<Value>> {
    store::history::<T>(records, client_id)
        .await?
        .into_iter()
        .map(|r| serde_json::to_value(r).map_err(AppError::from))
        .collect()
}
