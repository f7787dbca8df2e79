use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Status of an adjustment still awaiting a decision. `approved` and
/// `rejected` are terminal.
pub const PENDING: &str = "pending";

/// A proposed macro change awaiting a coach decision. Created by the
/// recommendation service; approval and rejection happen elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PendingMacroAdjustment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    pub calorie_target: i32,
    pub protein_g: i32,
    pub carbs_g: i32,
    pub fat_g: i32,
    pub reason: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
