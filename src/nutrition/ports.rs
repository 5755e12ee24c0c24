//! Store ports consumed by the analyzer and the HTTP handlers.

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use super::records::{FoodEntry, MealRecord, MealType};
use super::targets::UserPreferences;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),

    #[error("malformed stored document: {0}")]
    Decode(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Decode(err.to_string())
    }
}

/// A validated meal about to be logged.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMealLog {
    pub date: OffsetDateTime,
    pub meal_type: MealType,
    pub foods: Vec<FoodEntry>,
}

#[async_trait]
pub trait MealLogStore: Send + Sync {
    /// Logged meals for `user_id`, optionally bounded; no bounds means everything.
    async fn fetch_meal_records(
        &self,
        user_id: Uuid,
        start: Option<OffsetDateTime>,
        end: Option<OffsetDateTime>,
    ) -> Result<Vec<MealRecord>, StoreError>;

    async fn insert_meal_log(
        &self,
        user_id: Uuid,
        meal: NewMealLog,
    ) -> Result<MealRecord, StoreError>;
}

#[async_trait]
pub trait PreferencesStore: Send + Sync {
    /// `Ok(None)` when the user never saved preferences.
    async fn fetch_preferences(&self, user_id: Uuid)
        -> Result<Option<UserPreferences>, StoreError>;

    async fn save_preferences(
        &self,
        user_id: Uuid,
        preferences: &UserPreferences,
    ) -> Result<(), StoreError>;
}
