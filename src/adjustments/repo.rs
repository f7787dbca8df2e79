use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use super::repo_types::{PendingMacroAdjustment, PENDING};
use crate::{db::PgStore, error::AppResult};

/// Read side of the adjustment queue used for coach triage.
#[async_trait]
pub trait AdjustmentStore: Send + Sync {
    /// Pending adjustments, newest first.
    async fn list_pending(&self, user_id: Uuid) -> AppResult<Vec<PendingMacroAdjustment>>;

    async fn count_pending(&self, user_id: Uuid) -> AppResult<i64>;

    /// Pending count per user; users with none are absent.
    async fn pending_counts(&self, user_ids: &[Uuid]) -> AppResult<HashMap<Uuid, i64>>;
}

#[async_trait]
impl AdjustmentStore for PgStore {
    async fn list_pending(&self, user_id: Uuid) -> AppResult<Vec<PendingMacroAdjustment>> {
        let rows = sqlx::query_as::<_, PendingMacroAdjustment>(
            r#"
            SELECT id, user_id, status, calorie_target, protein_g, carbs_g, fat_g,
                   reason, created_at
              FROM pending_macro_adjustments
             WHERE user_id = $1 AND status = $2
             ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .bind(PENDING)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn count_pending(&self, user_id: Uuid) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
              FROM pending_macro_adjustments
             WHERE user_id = $1 AND status = $2
            "#,
        )
        .bind(user_id)
        .bind(PENDING)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn pending_counts(&self, user_ids: &[Uuid]) -> AppResult<HashMap<Uuid, i64>> {
        let rows = sqlx::query_as::<_, (Uuid, i64)>(
            r#"
            SELECT user_id, COUNT(*)
              FROM pending_macro_adjustments
             WHERE user_id = ANY($1) AND status = $2
             GROUP BY user_id
            "#,
        )
        .bind(user_ids)
        .bind(PENDING)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().collect())
    }
}
