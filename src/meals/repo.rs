use async_trait::async_trait;
use sqlx::{types::Json, PgPool};
use time::OffsetDateTime;
use tracing::{debug, warn};
use uuid::Uuid;

use super::repo_types::MealLogRow;
use crate::nutrition::ports::{MealLogStore, NewMealLog, StoreError};
use crate::nutrition::records::{MealRecord, RawMealLog};

#[derive(Clone)]
pub struct PgMealLogStore {
    db: PgPool,
}

impl PgMealLogStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MealLogStore for PgMealLogStore {
    /// Bounds apply to the row's `created_at`.
    async fn fetch_meal_records(
        &self,
        user_id: Uuid,
        start: Option<OffsetDateTime>,
        end: Option<OffsetDateTime>,
    ) -> Result<Vec<MealRecord>, StoreError> {
        let rows = sqlx::query_as::<_, MealLogRow>(
            r#"
            SELECT id, user_id, meal_data, created_at
            FROM meal_logs
            WHERE user_id = $1
              AND ($2::timestamptz IS NULL OR created_at >= $2)
              AND ($3::timestamptz IS NULL OR created_at <= $3)
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await?;

        let fetched = rows.len();
        let records: Vec<MealRecord> = rows
            .into_iter()
            .filter_map(|row| {
                let id = row.id;
                match MealRecord::try_from(row) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        warn!(error = %e, meal_log_id = id, %user_id, "skipping malformed meal log");
                        None
                    }
                }
            })
            .collect();
        debug!(%user_id, fetched, kept = records.len(), "meal logs fetched");
        Ok(records)
    }

    async fn insert_meal_log(
        &self,
        user_id: Uuid,
        meal: NewMealLog,
    ) -> Result<MealRecord, StoreError> {
        let payload = RawMealLog::for_new_meal(meal.date, meal.meal_type, &meal.foods);
        let row = sqlx::query_as::<_, MealLogRow>(
            r#"
            INSERT INTO meal_logs (user_id, meal_data)
            VALUES ($1, $2)
            RETURNING id, user_id, meal_data, created_at
            "#,
        )
        .bind(user_id)
        .bind(Json(&payload))
        .fetch_one(&self.db)
        .await?;

        MealRecord::try_from(row)
    }
}
