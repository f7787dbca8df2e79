use serde::{Deserialize, Serialize};

use super::repo_types::FormulaUsed;
use crate::error::{AppError, AppResult};

pub const DEFAULT_OVERRIDE_EXPLANATION: &str = "Coach manual override";

/// Body of `PUT /coach/clients/:id/macros`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroOverrideRequest {
    pub calorie_target: Option<f64>,
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fat_g: Option<f64>,
    pub explanation: Option<String>,
}

/// A validated override, serialized as the patch of fields it sets.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroOverride {
    pub calorie_target: i32,
    pub protein_g: i32,
    pub carbs_g: i32,
    pub fat_g: i32,
    pub formula_used: FormulaUsed,
    pub explanation: String,
}

impl MacroOverrideRequest {
    pub fn validate(self) -> AppResult<MacroOverride> {
        let explanation = self
            .explanation
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| DEFAULT_OVERRIDE_EXPLANATION.to_string());

        Ok(MacroOverride {
            calorie_target: positive("calorieTarget", self.calorie_target)?,
            protein_g: positive("proteinG", self.protein_g)?,
            carbs_g: positive("carbsG", self.carbs_g)?,
            fat_g: positive("fatG", self.fat_g)?,
            formula_used: FormulaUsed::CoachOverride,
            explanation,
        })
    }
}

fn positive(field: &str, value: Option<f64>) -> AppResult<i32> {
    let v = value.ok_or_else(|| AppError::validation(field, "is required"))?;
    if !v.is_finite() {
        return Err(AppError::validation(field, "must be a number"));
    }
    // Stored values are whole numbers, so positivity is judged after rounding.
    let rounded = v.round();
    if rounded < 1.0 {
        return Err(AppError::validation(field, "must be a positive number"));
    }
    if rounded > f64::from(i32::MAX) {
        return Err(AppError::validation(field, "is out of range"));
    }
    Ok(rounded as i32)
}
