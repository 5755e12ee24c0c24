use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::nutrition::ports::StoreError;
use crate::nutrition::records::{MealRecord, RawMealLog};

/// A `meal_logs` row; `meal_data` is the camelCase meal document.
#[derive(Debug, FromRow)]
pub struct MealLogRow {
    pub id: i64,
    pub user_id: Uuid,
    pub meal_data: serde_json::Value,
    pub created_at: OffsetDateTime,
}

impl TryFrom<MealLogRow> for MealRecord {
    type Error = StoreError;

    fn try_from(row: MealLogRow) -> Result<Self, Self::Error> {
        let raw: RawMealLog = serde_json::from_value(row.meal_data)?;
        raw.into_record(row.id, row.user_id, row.created_at)
            .map_err(|e| StoreError::Decode(e.to_string()))
    }
}
