//! Canonical meal records plus the adapter that decodes stored meal payloads.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    /// Canonical reporting order.
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }

    /// Capitalized name, e.g. `"Breakfast"`.
    pub fn label(self) -> String {
        let name = self.as_str();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
            None => String::new(),
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "breakfast" => Some(MealType::Breakfast),
            "lunch" => Some(MealType::Lunch),
            "dinner" => Some(MealType::Dinner),
            "snack" | "snacks" => Some(MealType::Snack),
            _ => None,
        }
    }
}

/// Nutrition of one food entry, already scaled for the eaten quantity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FoodNutrition {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiber: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sugar: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodEntry {
    pub name: String,
    pub nutrition: FoodNutrition,
}

/// A logged meal as the analysis core sees it.
///
/// Totals are trusted as stored; a missing total counts as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealRecord {
    pub id: i64,
    pub user_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    pub meal_type: MealType,
    #[serde(default)]
    pub foods: Vec<FoodEntry>,
    #[serde(default)]
    pub total_calories: Option<f64>,
    #[serde(default)]
    pub total_protein: Option<f64>,
    #[serde(default)]
    pub total_carbs: Option<f64>,
    #[serde(default)]
    pub total_fat: Option<f64>,
}

impl MealRecord {
    /// Calendar day of the meal in the timestamp's own offset.
    pub fn day(&self) -> Date {
        self.date.date()
    }

    pub fn calories(&self) -> f64 {
        self.total_calories.unwrap_or(0.0)
    }

    pub fn protein(&self) -> f64 {
        self.total_protein.unwrap_or(0.0)
    }

    pub fn carbs(&self) -> f64 {
        self.total_carbs.unwrap_or(0.0)
    }

    pub fn fat(&self) -> f64 {
        self.total_fat.unwrap_or(0.0)
    }
}

/// Running calorie and macro sums.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NutrientTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl NutrientTotals {
    pub fn add_record(&mut self, record: &MealRecord) {
        self.calories += record.calories();
        self.protein += record.protein();
        self.carbs += record.carbs();
        self.fat += record.fat();
    }

    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a MealRecord>) -> Self {
        let mut totals = Self::default();
        for record in records {
            totals.add_record(record);
        }
        totals
    }

    pub fn from_foods(foods: &[FoodEntry]) -> Self {
        foods.iter().fold(Self::default(), |acc, food| Self {
            calories: acc.calories + food.nutrition.calories,
            protein: acc.protein + food.nutrition.protein,
            carbs: acc.carbs + food.nutrition.carbs,
            fat: acc.fat + food.nutrition.fat,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordDecodeError {
    #[error("meal payload has no mealType")]
    MissingMealType,

    #[error("unknown meal type {0:?}")]
    UnknownMealType(String),

    #[error("unparseable meal date {0:?}")]
    InvalidDate(String),
}

/// Stored meal payload, in the camelCase document shape the upstream store keeps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMealLog {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_type: Option<String>,
    #[serde(default)]
    pub foods: Vec<RawFood>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_calories: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_protein: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_carbs: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_fat: Option<f64>,
}

/// The two food shapes found in stored meals: catalog items carry a
/// `nutritionInfo` block, chat-suggested foods carry `calories` plus `macros`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawFood {
    Catalog {
        name: String,
        #[serde(rename = "nutritionInfo")]
        nutrition_info: RawNutritionInfo,
    },
    Chat {
        name: String,
        calories: f64,
        macros: RawMacros,
    },
    Other(serde_json::Value),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNutritionInfo {
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiber: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sugar: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawMacros {
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiber: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sugar: Option<f64>,
}

impl RawFood {
    /// `None` for shapes that carry no usable nutrition.
    pub fn into_entry(self) -> Option<FoodEntry> {
        match self {
            RawFood::Catalog {
                name,
                nutrition_info: n,
            } => Some(FoodEntry {
                name,
                nutrition: FoodNutrition {
                    calories: n.calories,
                    protein: n.protein,
                    carbs: n.carbs,
                    fat: n.fat,
                    fiber: n.fiber,
                    sugar: n.sugar,
                },
            }),
            RawFood::Chat {
                name,
                calories,
                macros: m,
            } => Some(FoodEntry {
                name,
                nutrition: FoodNutrition {
                    calories,
                    protein: m.protein,
                    carbs: m.carbs,
                    fat: m.fat,
                    fiber: m.fiber,
                    sugar: m.sugar,
                },
            }),
            RawFood::Other(_) => None,
        }
    }
}

impl From<&FoodEntry> for RawFood {
    fn from(food: &FoodEntry) -> Self {
        let n = food.nutrition;
        RawFood::Catalog {
            name: food.name.clone(),
            nutrition_info: RawNutritionInfo {
                calories: n.calories,
                protein: n.protein,
                carbs: n.carbs,
                fat: n.fat,
                fiber: n.fiber,
                sugar: n.sugar,
            },
        }
    }
}

impl RawMealLog {
    /// Payload for a newly logged meal; totals are the sum of its foods.
    pub fn for_new_meal(date: OffsetDateTime, meal_type: MealType, foods: &[FoodEntry]) -> Self {
        let totals = NutrientTotals::from_foods(foods);
        Self {
            date: date.format(&Rfc3339).ok(),
            meal_type: Some(meal_type.as_str().to_string()),
            foods: foods.iter().map(RawFood::from).collect(),
            total_calories: Some(totals.calories),
            total_protein: Some(totals.protein),
            total_carbs: Some(totals.carbs),
            total_fat: Some(totals.fat),
        }
    }

    /// Normalizes the payload into a [`MealRecord`]; `created_at` stands in for a missing date.
    pub fn into_record(
        self,
        id: i64,
        user_id: Uuid,
        created_at: OffsetDateTime,
    ) -> Result<MealRecord, RecordDecodeError> {
        let raw_type = self.meal_type.ok_or(RecordDecodeError::MissingMealType)?;
        let meal_type =
            MealType::parse(&raw_type).ok_or(RecordDecodeError::UnknownMealType(raw_type))?;
        let date = match self.date {
            Some(raw) => parse_meal_date(&raw).ok_or(RecordDecodeError::InvalidDate(raw))?,
            None => created_at,
        };

        Ok(MealRecord {
            id,
            user_id,
            date,
            meal_type,
            foods: self.foods.into_iter().filter_map(RawFood::into_entry).collect(),
            total_calories: self.total_calories,
            total_protein: self.total_protein,
            total_carbs: self.total_carbs,
            total_fat: self.total_fat,
        })
    }
}

/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` days (midnight UTC).
pub fn parse_meal_date(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if let Ok(ts) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(ts);
    }
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|day| day.midnight().assume_utc())
}
