use thiserror::Error;
use time::OffsetDateTime;

use super::dto::CreateMealRequest;
use crate::nutrition::ports::NewMealLog;
use crate::nutrition::records::{parse_meal_date, FoodNutrition, MealType};

#[derive(Debug, Error, PartialEq)]
pub enum MealValidationError {
    #[error("a meal needs at least one food")]
    EmptyFoods,

    #[error("unknown meal type {0:?}; expected breakfast, lunch, dinner or snack")]
    UnknownMealType(String),

    #[error("invalid meal date {0:?}")]
    InvalidDate(String),

    #[error("food {0:?} has negative or non-numeric nutrition values")]
    InvalidNutrition(String),
}

/// Validates a logging request; `now` stands in for a missing date.
pub fn prepare_meal_log(
    req: CreateMealRequest,
    now: OffsetDateTime,
) -> Result<NewMealLog, MealValidationError> {
    let meal_type = MealType::parse(&req.meal_type)
        .ok_or_else(|| MealValidationError::UnknownMealType(req.meal_type.clone()))?;

    if req.foods.is_empty() {
        return Err(MealValidationError::EmptyFoods);
    }
    if let Some(bad) = req.foods.iter().find(|f| !nutrition_is_valid(&f.nutrition)) {
        return Err(MealValidationError::InvalidNutrition(bad.name.clone()));
    }

    let date = match req.date {
        Some(raw) => parse_meal_date(&raw).ok_or(MealValidationError::InvalidDate(raw))?,
        None => now,
    };

    Ok(NewMealLog {
        date,
        meal_type,
        foods: req.foods,
    })
}

fn nutrition_is_valid(n: &FoodNutrition) -> bool {
    let required = [n.calories, n.protein, n.carbs, n.fat];
    let optional = [n.fiber, n.sugar];
    required
        .into_iter()
        .chain(optional.into_iter().flatten())
        .all(|v| v.is_finite() && v >= 0.0)
}
