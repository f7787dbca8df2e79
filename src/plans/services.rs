use uuid::Uuid;

use super::{
    dto::{MealPlanEdit, PublishMealPlan, PublishTrainingPlan, TrainingPlanEdit},
    repo_types::{MealPlan, TrainingPlan},
};
use crate::{
    error::AppResult,
    overrides::{apply_coach_edit, to_patch},
    versioning::{store::append_new_version, RecordStore, VersionedRecord},
};

/// Corrects the client's current meal plan in place.
pub async fn edit_meal_plan(
    records: &dyn RecordStore,
    user_id: Uuid,
    edit: MealPlanEdit,
) -> AppResult<VersionedRecord<MealPlan>> {
    let edit = edit.validate()?;
    apply_coach_edit::<MealPlan>(records, user_id, to_patch(&edit)?).await
}

/// Corrects the client's current training plan in place.
pub async fn edit_training_plan(
    records: &dyn RecordStore,
    user_id: Uuid,
    edit: TrainingPlanEdit,
) -> AppResult<VersionedRecord<TrainingPlan>> {
    let edit = edit.validate()?;
    apply_coach_edit::<TrainingPlan>(records, user_id, to_patch(&edit)?).await
}

/// Starts a new meal-plan iteration.
pub async fn publish_meal_plan(
    records: &dyn RecordStore,
    user_id: Uuid,
    req: PublishMealPlan,
) -> AppResult<VersionedRecord<MealPlan>> {
    append_new_version(records, user_id, &MealPlan::try_from(req)?).await
}

/// Starts a new training-plan iteration.
pub async fn publish_training_plan(
    records: &dyn RecordStore,
    user_id: Uuid,
    req: PublishTrainingPlan,
) -> AppResult<VersionedRecord<TrainingPlan>> {
    append_new_version(records, user_id, &TrainingPlan::try_from(req)?).await
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        error::AppError,
        memory::MemoryStore,
        versioning::{store::history, RecordKind},
    };

    fn publish_meal(data: serde_json::Value) -> PublishMealPlan {
        PublishMealPlan {
            plan_data: data,
            grocery_list: Some(json!(["rice"])),
        }
    }

    #[tokio::test]
    async fn editing_missing_training_plan_is_not_found_and_leaves_nothing() {
        let store = MemoryStore::default();
        let user = Uuid::new_v4();
        let edit = TrainingPlanEdit {
            plan_data: Some(json!({ "days": ["push", "pull"] })),
            duration_weeks: None,
        };

        let err = edit_training_plan(&store, user, edit).await.unwrap_err();
        match err {
            AppError::NotFound(msg) => assert_eq!(msg, "No training plan found for this client"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(store
            .history(user, RecordKind::TrainingPlan)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn editing_missing_meal_plan_is_not_found() {
        let store = MemoryStore::default();
        let edit = MealPlanEdit {
            plan_data: Some(json!({ "meals": [] })),
            grocery_list: None,
        };
        let err = edit_meal_plan(&store, Uuid::new_v4(), edit).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m == "No meal plan found for this client"));
    }

    #[tokio::test]
    async fn meal_plan_edit_mutates_latest_without_new_version() {
        let store = MemoryStore::default();
        let user = Uuid::new_v4();
        publish_meal_plan(&store, user, publish_meal(json!({ "week": 1 })))
            .await
            .unwrap();
        let published = publish_meal_plan(&store, user, publish_meal(json!({ "week": 2 })))
            .await
            .unwrap();
        assert_eq!(published.version, 2);

        let edit = MealPlanEdit {
            plan_data: Some(json!({ "week": 2, "snacks": ["yogurt"] })),
            grocery_list: None,
        };
        let edited = edit_meal_plan(&store, user, edit).await.unwrap();

        assert_eq!(edited.version, 2);
        assert_eq!(edited.created_at, published.created_at);
        assert_eq!(edited.payload.plan_data, json!({ "week": 2, "snacks": ["yogurt"] }));
        // Grocery list was not supplied and is kept.
        assert_eq!(edited.payload.grocery_list, Some(json!(["rice"])));

        let all = history::<MealPlan>(&store, user).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].payload.plan_data, json!({ "week": 1 }));
    }

    #[tokio::test]
    async fn training_plan_edit_changes_only_duration() {
        let store = MemoryStore::default();
        let user = Uuid::new_v4();
        let req = PublishTrainingPlan {
            plan_data: json!({ "split": "upper_lower" }),
            duration_weeks: 8,
        };
        publish_training_plan(&store, user, req).await.unwrap();

        let edit = TrainingPlanEdit {
            plan_data: None,
            duration_weeks: Some(12),
        };
        let edited = edit_training_plan(&store, user, edit).await.unwrap();
        assert_eq!(edited.version, 1);
        assert_eq!(edited.payload.duration_weeks, 12);
        assert_eq!(edited.payload.plan_data, json!({ "split": "upper_lower" }));
    }
}
