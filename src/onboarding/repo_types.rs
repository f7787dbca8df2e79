use serde::{Deserialize, Serialize};

use crate::versioning::{RecordKind, Versioned};

pub const DEFAULT_AVERAGE_STEPS: i32 = 8000;
pub const DEFAULT_SLEEP_HOURS: f64 = 7.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryGoal {
    FatLoss,
    Maintenance,
    MuscleGain,
    Recomposition,
    Performance,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StressLevel {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    #[default]
    Desk,
    Standing,
    Physical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingExperience {
    Beginner,
    Intermediate,
    Advanced,
}

/// A client's onboarding answers. Every submission is a new version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingResponse {
    // anthropometrics
    pub age: i32,
    pub sex: Sex,
    pub height_cm: f64,
    pub weight_kg: f64,
    #[serde(default)]
    pub body_fat_percent: Option<f64>,

    // goals
    pub primary_goal: PrimaryGoal,
    #[serde(default)]
    pub goal_weight_kg: Option<f64>,
    #[serde(default)]
    pub goal_notes: Option<String>,

    // diet
    #[serde(default)]
    pub dietary_preferences: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub disliked_foods: Vec<String>,
    #[serde(default)]
    pub meals_per_day: Option<i32>,

    // training
    #[serde(default)]
    pub training_experience: Option<TrainingExperience>,
    #[serde(default)]
    pub training_days_per_week: Option<i32>,
    #[serde(default)]
    pub session_length_minutes: Option<i32>,
    #[serde(default)]
    pub equipment_access: Vec<String>,
    #[serde(default)]
    pub injuries: Vec<String>,

    // lifestyle
    #[serde(default = "default_average_steps")]
    pub average_steps: i32,
    #[serde(default = "default_sleep_hours")]
    pub sleep_hours: f64,
    #[serde(default)]
    pub stress_level: StressLevel,
    #[serde(default)]
    pub job_type: JobType,
}

fn default_average_steps() -> i32 {
    DEFAULT_AVERAGE_STEPS
}

fn default_sleep_hours() -> f64 {
    DEFAULT_SLEEP_HOURS
}

impl Versioned for OnboardingResponse {
    const KIND: RecordKind = RecordKind::Onboarding;
}
