use serde::Deserialize;
use time::OffsetDateTime;

use crate::nutrition::FoodEntry;

#[derive(Debug, Deserialize)]
pub struct MealRangeQuery {
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub start: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub end: Option<OffsetDateTime>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMealRequest {
    /// RFC 3339 timestamp or bare `YYYY-MM-DD`; now when absent.
    #[serde(default)]
    pub date: Option<String>,
    pub meal_type: String,
    #[serde(default)]
    pub foods: Vec<FoodEntry>,
}
