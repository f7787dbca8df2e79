use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// The record kinds kept as per-client version chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    MacroTargets,
    MealPlan,
    TrainingPlan,
    Onboarding,
}

/// What a coach edit does to a record chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditPolicy {
    /// The edit becomes a new, immutable version.
    Append,
    /// The edit is merged into the latest version; its number is kept.
    MutateLatest,
}

impl RecordKind {
    pub const ALL: [RecordKind; 4] = [
        RecordKind::MacroTargets,
        RecordKind::MealPlan,
        RecordKind::TrainingPlan,
        RecordKind::Onboarding,
    ];

    /// Value stored in `versioned_records.kind`.
    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::MacroTargets => "macro_targets",
            RecordKind::MealPlan => "meal_plan",
            RecordKind::TrainingPlan => "training_plan",
            RecordKind::Onboarding => "onboarding",
        }
    }

    /// Human wording used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            RecordKind::MacroTargets => "macro targets",
            RecordKind::MealPlan => "meal plan",
            RecordKind::TrainingPlan => "training plan",
            RecordKind::Onboarding => "onboarding response",
        }
    }

    pub fn coach_edit_policy(self) -> EditPolicy {
        match self {
            // Overrides change the interpretable current truth and must stay auditable.
            RecordKind::MacroTargets | RecordKind::Onboarding => EditPolicy::Append,
            // Coach edits to plans are corrections to the current iteration.
            RecordKind::MealPlan | RecordKind::TrainingPlan => EditPolicy::MutateLatest,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Path segments use kebab-case, storage uses snake_case.
        match s.replace('-', "_").as_str() {
            "macro_targets" | "macros" => Ok(RecordKind::MacroTargets),
            "meal_plan" => Ok(RecordKind::MealPlan),
            "training_plan" => Ok(RecordKind::TrainingPlan),
            "onboarding" => Ok(RecordKind::Onboarding),
            other => Err(format!("unknown record kind '{other}'")),
        }
    }
}
