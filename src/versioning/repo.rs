use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::PgExecutor;
use uuid::Uuid;

use super::{kind::RecordKind, record::RawRecord, store::RecordStore};
use crate::{
    db::PgStore,
    error::{AppError, AppResult},
};

#[async_trait]
impl RecordStore for PgStore {
    async fn latest(&self, user_id: Uuid, kind: RecordKind) -> AppResult<Option<RawRecord>> {
        let row = sqlx::query_as::<_, RawRecord>(
            r#"
            SELECT id, user_id, version, payload, created_at
              FROM versioned_records
             WHERE user_id = $1 AND kind = $2
             ORDER BY version DESC
             LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(kind.as_str())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn history(&self, user_id: Uuid, kind: RecordKind) -> AppResult<Vec<RawRecord>> {
        let rows = sqlx::query_as::<_, RawRecord>(
            r#"
            SELECT id, user_id, version, payload, created_at
              FROM versioned_records
             WHERE user_id = $1 AND kind = $2
             ORDER BY version DESC
            "#,
        )
        .bind(user_id)
        .bind(kind.as_str())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn try_append(
        &self,
        user_id: Uuid,
        kind: RecordKind,
        payload: Value,
    ) -> AppResult<RawRecord> {
        insert_next_version(&self.pool, user_id, kind, &payload).await
    }

    async fn merge_latest(
        &self,
        user_id: Uuid,
        kind: RecordKind,
        patch: Map<String, Value>,
    ) -> AppResult<Option<RawRecord>> {
        let row = sqlx::query_as::<_, RawRecord>(
            r#"
            UPDATE versioned_records
               SET payload = payload || $3
             WHERE id = (
                   SELECT id
                     FROM versioned_records
                    WHERE user_id = $1 AND kind = $2
                    ORDER BY version DESC
                    LIMIT 1
             )
            RETURNING id, user_id, version, payload, created_at
            "#,
        )
        .bind(user_id)
        .bind(kind.as_str())
        .bind(Value::Object(patch))
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn try_append_onboarding(
        &self,
        user_id: Uuid,
        payload: Value,
    ) -> AppResult<Option<RawRecord>> {
        let mut tx = self.pool.begin().await?;

        let flagged = sqlx::query(
            r#"UPDATE profiles SET onboarding_completed = TRUE WHERE user_id = $1"#,
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
        if flagged.rows_affected() == 0 {
            // No profile: dropping `tx` rolls back.
            return Ok(None);
        }

        let row = insert_next_version(&mut *tx, user_id, RecordKind::Onboarding, &payload).await?;
        tx.commit().await?;
        Ok(Some(row))
    }
}

/// Allocates `max(version) + 1` and inserts in one statement; a concurrent
/// duplicate hits UNIQUE (user_id, kind, version) and becomes a conflict.
async fn insert_next_version<'e, E>(
    exec: E,
    user_id: Uuid,
    kind: RecordKind,
    payload: &Value,
) -> AppResult<RawRecord>
where
    E: PgExecutor<'e>,
{
    let res = sqlx::query_as::<_, RawRecord>(
        r#"
        INSERT INTO versioned_records (user_id, kind, version, payload)
        SELECT $1, $2, COALESCE(MAX(version), 0) + 1, $3
          FROM versioned_records
         WHERE user_id = $1 AND kind = $2
        RETURNING id, user_id, version, payload, created_at
        "#,
    )
    .bind(user_id)
    .bind(kind.as_str())
    .bind(payload)
    .fetch_one(exec)
    .await;

    match res {
        Ok(row) => Ok(row),
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Err(
            AppError::conflict(format!("{kind} version for user {user_id} was taken concurrently")),
        ),
        Err(e) => Err(e.into()),
    }
}
