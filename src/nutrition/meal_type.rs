use serde::Serialize;

use super::macros::round_half_up;
use super::records::{MealRecord, MealType};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealTypeBucket {
    pub meal_type: MealType,
    pub name: String,
    /// Rounded mean of `totalCalories`; 0 when no meal of this type was logged.
    pub average_calories: f64,
    pub count: usize,
}

/// Always four buckets, in breakfast, lunch, dinner, snack order.
pub fn aggregate_by_meal_type(records: &[MealRecord]) -> Vec<MealTypeBucket> {
    MealType::ALL
        .iter()
        .map(|&meal_type| {
            let (count, calories) = records
                .iter()
                .filter(|r| r.meal_type == meal_type)
                .fold((0usize, 0.0f64), |(n, sum), r| (n + 1, sum + r.calories()));
            let average_calories = if count == 0 {
                0.0
            } else {
                round_half_up(calories / count as f64)
            };
            MealTypeBucket {
                meal_type,
                name: meal_type.label(),
                average_calories,
                count,
            }
        })
        .collect()
}
