use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    overrides::CoachEditable,
    versioning::{RecordKind, Versioned},
};

/// `plan_data` and `grocery_list` are opaque documents and are never re-keyed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlan {
    pub plan_data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grocery_list: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingPlan {
    pub plan_data: Value,
    pub duration_weeks: i32,
}

impl Versioned for MealPlan {
    const KIND: RecordKind = RecordKind::MealPlan;
}

impl Versioned for TrainingPlan {
    const KIND: RecordKind = RecordKind::TrainingPlan;
}

impl CoachEditable for MealPlan {}

impl CoachEditable for TrainingPlan {}
