use async_trait::async_trait;
use sqlx::{types::Json, PgPool};
use tracing::debug;
use uuid::Uuid;

use crate::nutrition::ports::{PreferencesStore, StoreError};
use crate::nutrition::UserPreferences;

#[derive(Clone)]
pub struct PgPreferencesStore {
    db: PgPool,
}

impl PgPreferencesStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PreferencesStore for PgPreferencesStore {
    async fn fetch_preferences(
        &self,
        user_id: Uuid,
    ) -> Result<Option<UserPreferences>, StoreError> {
        let doc = sqlx::query_scalar::<_, serde_json::Value>(
            r#"
            SELECT preferences
            FROM user_preferences
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        doc.map(serde_json::from_value::<UserPreferences>)
            .transpose()
            .map_err(StoreError::from)
    }

    async fn save_preferences(
        &self,
        user_id: Uuid,
        preferences: &UserPreferences,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO user_preferences (user_id, preferences)
            VALUES ($1, $2)
            ON CONFLICT (user_id)
            DO UPDATE SET preferences = EXCLUDED.preferences, updated_at = now()
            "#,
        )
        .bind(user_id)
        .bind(Json(preferences))
        .execute(&self.db)
        .await?;

        debug!(%user_id, "preferences saved");
        Ok(())
    }
}
