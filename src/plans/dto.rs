use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::repo_types::{MealPlan, TrainingPlan};
use crate::error::{AppError, AppResult};

/// Body of `PATCH /coach/clients/:id/meal-plan`. Absent fields stay as they are.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanEdit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grocery_list: Option<Value>,
}

/// Body of `PATCH /coach/clients/:id/training-plan`.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingPlanEdit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_weeks: Option<i32>,
}

impl MealPlanEdit {
    pub fn validate(self) -> AppResult<Self> {
        if self.plan_data.is_none() && self.grocery_list.is_none() {
            return Err(AppError::validation(
                "planData",
                "at least one of planData or groceryList is required",
            ));
        }
        if let Some(data) = &self.plan_data {
            require_document("planData", data)?;
        }
        Ok(self)
    }
}

impl TrainingPlanEdit {
    pub fn validate(self) -> AppResult<Self> {
        if self.plan_data.is_none() && self.duration_weeks.is_none() {
            return Err(AppError::validation(
                "planData",
                "at least one of planData or durationWeeks is required",
            ));
        }
        if let Some(data) = &self.plan_data {
            require_document("planData", data)?;
        }
        if let Some(weeks) = self.duration_weeks {
            require_weeks(weeks)?;
        }
        Ok(self)
    }
}

/// Body of `POST /coach/clients/:id/meal-plan`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishMealPlan {
    pub plan_data: Value,
    #[serde(default)]
    pub grocery_list: Option<Value>,
}

/// Body of `POST /coach/clients/:id/training-plan`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishTrainingPlan {
    pub plan_data: Value,
    pub duration_weeks: i32,
}

impl TryFrom<PublishMealPlan> for MealPlan {
    type Error = AppError;

    fn try_from(req: PublishMealPlan) -> Result<Self, Self::Error> {
        require_document("planData", &req.plan_data)?;
        Ok(MealPlan {
            plan_data: req.plan_data,
            grocery_list: req.grocery_list,
        })
    }
}

impl TryFrom<PublishTrainingPlan> for TrainingPlan {
    type Error = AppError;

    fn try_from(req: PublishTrainingPlan) -> Result<Self, Self::Error> {
        require_document("planData", &req.plan_data)?;
        require_weeks(req.duration_weeks)?;
        Ok(TrainingPlan {
            plan_data: req.plan_data,
            duration_weeks: req.duration_weeks,
        })
    }
}

fn require_document(field: &str, value: &Value) -> AppResult<()> {
    match value {
        Value::Object(_) | Value::Array(_) => Ok(()),
        _ => Err(AppError::validation(field, "must be a JSON object or array")),
    }
}

fn require_weeks(weeks: i32) -> AppResult<()> {
    if weeks < 1 {
        return Err(AppError::validation("durationWeeks", "must be at least 1"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn empty_edit_is_rejected() {
        assert!(MealPlanEdit::default().validate().is_err());
        assert!(TrainingPlanEdit::default().validate().is_err());
    }

    #[test]
    fn scalar_plan_data_is_rejected() {
        let edit = MealPlanEdit {
            plan_data: Some(json!("breakfast")),
            grocery_list: None,
        };
        assert!(matches!(
            edit.validate(),
            Err(AppError::Validation { ref field, .. }) if field == "planData"
        ));
    }

    #[test]
    fn edit_patch_omits_absent_fields() {
        let edit: MealPlanEdit =
            serde_json::from_value(json!({ "groceryList": ["oats", "eggs"] })).unwrap();
        let patch = crate::overrides::to_patch(&edit.validate().unwrap()).unwrap();
        assert_eq!(patch.len(), 1);
        assert_eq!(patch["groceryList"], json!(["oats", "eggs"]));
    }

    #[test]
    fn publish_training_plan_requires_positive_weeks() {
        let req = PublishTrainingPlan {
            plan_data: json!({ "days": [] }),
            duration_weeks: 0,
        };
        assert!(TrainingPlan::try_from(req).is_err());
    }
}
