use serde::Deserialize;

use super::repo_types::{
    JobType, OnboardingResponse, PrimaryGoal, Sex, StressLevel, TrainingExperience,
    DEFAULT_AVERAGE_STEPS, DEFAULT_SLEEP_HOURS,
};
use crate::error::{AppError, AppResult};

/// Body of `POST /onboarding`. Only the anthropometrics and the primary goal
/// are required; the rest falls back to documented defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingSubmission {
    pub age: Option<i32>,
    pub sex: Option<Sex>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub body_fat_percent: Option<f64>,
    pub primary_goal: Option<PrimaryGoal>,
    pub goal_weight_kg: Option<f64>,
    pub goal_notes: Option<String>,
    pub dietary_preferences: Option<Vec<String>>,
    pub allergies: Option<Vec<String>>,
    pub disliked_foods: Option<Vec<String>>,
    pub meals_per_day: Option<i32>,
    pub training_experience: Option<TrainingExperience>,
    pub training_days_per_week: Option<i32>,
    pub session_length_minutes: Option<i32>,
    pub equipment_access: Option<Vec<String>>,
    pub injuries: Option<Vec<String>>,
    pub average_steps: Option<i32>,
    pub sleep_hours: Option<f64>,
    pub stress_level: Option<StressLevel>,
    pub job_type: Option<JobType>,
}

impl OnboardingSubmission {
    pub fn validate(self) -> AppResult<OnboardingResponse> {
        let age = required("age", self.age)?;
        if !(13..=100).contains(&age) {
            return Err(AppError::validation("age", "must be between 13 and 100"));
        }
        let height_cm = positive("heightCm", required("heightCm", self.height_cm)?)?;
        let weight_kg = positive("weightKg", required("weightKg", self.weight_kg)?)?;
        if let Some(bf) = self.body_fat_percent {
            if !(bf > 0.0 && bf < 100.0) {
                return Err(AppError::validation("bodyFatPercent", "must be between 0 and 100"));
            }
        }
        if let Some(goal) = self.goal_weight_kg {
            positive("goalWeightKg", goal)?;
        }
        if let Some(days) = self.training_days_per_week {
            if !(0..=7).contains(&days) {
                return Err(AppError::validation("trainingDaysPerWeek", "must be between 0 and 7"));
            }
        }
        let average_steps = self.average_steps.unwrap_or(DEFAULT_AVERAGE_STEPS);
        if average_steps < 0 {
            return Err(AppError::validation("averageSteps", "must not be negative"));
        }
        let sleep_hours = self.sleep_hours.unwrap_or(DEFAULT_SLEEP_HOURS);
        if !(0.0..=24.0).contains(&sleep_hours) {
            return Err(AppError::validation("sleepHours", "must be between 0 and 24"));
        }

        Ok(OnboardingResponse {
            age,
            sex: required("sex", self.sex)?,
            height_cm,
            weight_kg,
            body_fat_percent: self.body_fat_percent,
            primary_goal: required("primaryGoal", self.primary_goal)?,
            goal_weight_kg: self.goal_weight_kg,
            goal_notes: self.goal_notes.filter(|n| !n.trim().is_empty()),
            dietary_preferences: cleaned(self.dietary_preferences),
            allergies: cleaned(self.allergies),
            disliked_foods: cleaned(self.disliked_foods),
            meals_per_day: self.meals_per_day,
            training_experience: self.training_experience,
            training_days_per_week: self.training_days_per_week,
            session_length_minutes: self.session_length_minutes,
            equipment_access: cleaned(self.equipment_access),
            injuries: cleaned(self.injuries),
            average_steps,
            sleep_hours,
            stress_level: self.stress_level.unwrap_or_default(),
            job_type: self.job_type.unwrap_or_default(),
        })
    }
}

fn required<T>(field: &str, value: Option<T>) -> AppResult<T> {
    value.ok_or_else(|| AppError::validation(field, "is required"))
}

fn positive(field: &str, value: f64) -> AppResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(AppError::validation(field, "must be a positive number"))
    }
}

fn cleaned(items: Option<Vec<String>>) -> Vec<String> {
    items
        .unwrap_or_default()
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn minimal() -> OnboardingSubmission {
        serde_json::from_value(json!({
            "age": 34,
            "sex": "female",
            "heightCm": 168.0,
            "weightKg": 72.5,
            "primaryGoal": "fat_loss"
        }))
        .unwrap()
    }

    #[test]
    fn documented_defaults_apply() {
        let answers = minimal().validate().unwrap();
        assert_eq!(answers.average_steps, 8000);
        assert_eq!(answers.sleep_hours, 7.0);
        assert_eq!(answers.stress_level, StressLevel::Medium);
        assert_eq!(answers.job_type, JobType::Desk);
        assert!(answers.allergies.is_empty());
        assert!(answers.injuries.is_empty());
        assert!(answers.dietary_preferences.is_empty());
    }

    #[test]
    fn stored_payload_uses_camel_case_keys() {
        let value = serde_json::to_value(minimal().validate().unwrap()).unwrap();
        assert_eq!(value["averageSteps"], 8000);
        assert_eq!(value["stressLevel"], "medium");
        assert_eq!(value["jobType"], "desk");
        assert_eq!(value["primaryGoal"], "fat_loss");
    }

    #[test]
    fn missing_required_field_names_it() {
        let mut sub = minimal();
        sub.height_cm = None;
        match sub.validate() {
            Err(AppError::Validation { field, .. }) => assert_eq!(field, "heightCm"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn list_entries_are_trimmed() {
        let mut sub = minimal();
        sub.allergies = Some(vec![" peanuts ".into(), "".into()]);
        assert_eq!(sub.validate().unwrap().allergies, vec!["peanuts".to_string()]);
    }

    #[test]
    fn out_of_range_age_is_rejected() {
        let mut sub = minimal();
        sub.age = Some(7);
        assert!(sub.validate().is_err());
    }
}
