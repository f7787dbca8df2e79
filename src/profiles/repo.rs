use async_trait::async_trait;
use uuid::Uuid;

use super::repo_types::{Profile, ProfileRow, SubscriptionStatus};
use crate::{db::PgStore, error::AppResult};

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get(&self, user_id: Uuid) -> AppResult<Option<Profile>>;

    /// Every profile with the client role, oldest first.
    async fn list_clients(&self) -> AppResult<Vec<Profile>>;

    async fn set_subscription_status(
        &self,
        user_id: Uuid,
        status: SubscriptionStatus,
    ) -> AppResult<Option<Profile>>;
}

const PROFILE_COLUMNS: &str =
    "user_id, email, display_name, role, onboarding_completed, subscription_status, created_at";

#[async_trait]
impl ProfileStore for PgStore {
    async fn get(&self, user_id: Uuid) -> AppResult<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Profile::try_from).transpose()?)
    }

    async fn list_clients(&self) -> AppResult<Vec<Profile>> {
        let rows = sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE role = 'client' ORDER BY created_at ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(Profile::try_from)
            .collect::<anyhow::Result<Vec<_>>>()?)
    }

    async fn set_subscription_status(
        &self,
        user_id: Uuid,
        status: SubscriptionStatus,
    ) -> AppResult<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            "UPDATE profiles SET subscription_status = $2 WHERE user_id = $1 RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(user_id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Profile::try_from).transpose()?)
    }
}
