//! Response shapes of the coach API.
//!
//! Key convention: every key leaving the service is camelCase. Structs get
//! `#[serde(rename_all = "camelCase")]`, versioned payloads are stored with the
//! same keys, and the free-form `planData` / `groceryList` documents inside
//! plans are passed through exactly as they were written.

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use super::status::ClientStatus;
use crate::{
    adjustments::repo_types::PendingMacroAdjustment,
    checkins::dto::CheckInView,
    macro_targets::MacroTarget,
    onboarding::OnboardingResponse,
    plans::{MealPlan, TrainingPlan},
    profiles::repo_types::{Profile, SubscriptionStatus},
    versioning::VersionedRecord,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSummary {
    pub user_id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub status: ClientStatus,
    pub subscription_status: SubscriptionStatus,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_check_in_at: Option<OffsetDateTime>,
    pub pending_adjustments: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanBundle {
    pub profile: Profile,
    pub status: ClientStatus,
    pub onboarding: Option<VersionedRecord<OnboardingResponse>>,
    pub macros: Option<VersionedRecord<MacroTarget>>,
    pub meal_plan: Option<VersionedRecord<MealPlan>>,
    pub training_plan: Option<VersionedRecord<TrainingPlan>>,
    pub check_ins: Vec<CheckInView>,
    pub pending_adjustments: Vec<PendingMacroAdjustment>,
    pub pending_adjustment_count: i64,
}
