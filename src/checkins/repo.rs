use std::collections::HashMap;

use anyhow::Context;
use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{CheckIn, CheckInRow, PhotoRow, ProgressPhoto};
use crate::{db::PgStore, error::AppResult};

/// A check-in about to be persisted; photos are already in blob storage.
#[derive(Debug, Clone)]
pub struct NewCheckIn {
    pub id: Uuid,
    pub user_id: Uuid,
    pub week_number: i32,
    pub notes: Option<String>,
    pub photos: Vec<ProgressPhoto>,
}

#[async_trait]
pub trait CheckInStore: Send + Sync {
    /// Stores the check-in and its photo paths together or not at all.
    async fn insert(&self, new: NewCheckIn) -> AppResult<CheckIn>;

    /// Newest first, photos included.
    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<CheckIn>>;

    async fn last_check_in_at(&self, user_id: Uuid) -> AppResult<Option<OffsetDateTime>>;

    /// Last check-in time per user; users without check-ins are absent.
    async fn last_check_in_times(
        &self,
        user_ids: &[Uuid],
    ) -> AppResult<HashMap<Uuid, OffsetDateTime>>;
}

#[async_trait]
impl CheckInStore for PgStore {
    async fn insert(&self, new: NewCheckIn) -> AppResult<CheckIn> {
        let mut tx = self.pool.begin().await.context("begin tx")?;

        let row = sqlx::query_as::<_, CheckInRow>(
            r#"
            INSERT INTO check_ins (id, user_id, week_number, notes)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, week_number, notes, created_at
            "#,
        )
        .bind(new.id)
        .bind(new.user_id)
        .bind(new.week_number)
        .bind(new.notes.as_deref())
        .fetch_one(&mut *tx)
        .await?;

        for photo in &new.photos {
            sqlx::query(
                r#"
                INSERT INTO progress_photos (check_in_id, photo_type, storage_path)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(new.id)
            .bind(photo.photo_type.as_str())
            .bind(&photo.storage_path)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await.context("commit tx")?;

        let mut photos = new.photos;
        photos.sort_by_key(|p| p.photo_type);
        Ok(CheckIn {
            id: row.id,
            user_id: row.user_id,
            week_number: row.week_number,
            notes: row.notes,
            created_at: row.created_at,
            photos,
        })
    }

    async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<CheckIn>> {
        let rows = sqlx::query_as::<_, CheckInRow>(
            r#"
            SELECT id, user_id, week_number, notes, created_at
              FROM check_ins
             WHERE user_id = $1
             ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let photo_rows = sqlx::query_as::<_, PhotoRow>(
            r#"
            SELECT check_in_id, photo_type, storage_path
              FROM progress_photos
             WHERE check_in_id = ANY($1)
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_check_in: HashMap<Uuid, Vec<ProgressPhoto>> = HashMap::new();
        for p in photo_rows {
            let photo_type = p.photo_type.parse().map_err(anyhow::Error::msg)?;
            by_check_in.entry(p.check_in_id).or_default().push(ProgressPhoto {
                photo_type,
                storage_path: p.storage_path,
            });
        }

        Ok(rows
            .into_iter()
            .map(|r| {
                let mut photos = by_check_in.remove(&r.id).unwrap_or_default();
                photos.sort_by_key(|p| p.photo_type);
                CheckIn {
                    id: r.id,
                    user_id: r.user_id,
                    week_number: r.week_number,
                    notes: r.notes,
                    created_at: r.created_at,
                    photos,
                }
            })
            .collect())
    }

    async fn last_check_in_at(&self, user_id: Uuid) -> AppResult<Option<OffsetDateTime>> {
        let last = sqlx::query_scalar::<_, Option<OffsetDateTime>>(
            r#"SELECT MAX(created_at) FROM check_ins WHERE user_id = $1"#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(last)
    }

    async fn last_check_in_times(
        &self,
        user_ids: &[Uuid],
    ) -> AppResult<HashMap<Uuid, OffsetDateTime>> {
        let rows = sqlx::query_as::<_, (Uuid, OffsetDateTime)>(
            r#"
            SELECT user_id, MAX(created_at)
              FROM check_ins
             WHERE user_id = ANY($1)
             GROUP BY user_id
            "#,
        )
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().collect())
    }
}
