//! Rule-based recommendation text.

use serde::Serialize;

use super::macros::{compute_macro_goals, round_half_up};
use super::targets::NutritionTargets;

/// Thresholds for recommendation triggers, as fractions of the goal.
mod thresholds {
    /// Average calories below this fraction of the goal are under target.
    pub const UNDER_CALORIES: f64 = 0.9;
    /// Average calories above this fraction of the goal are over target.
    pub const OVER_CALORIES: f64 = 1.1;
    /// Average protein below this fraction of the gram goal is low.
    pub const LOW_PROTEIN: f64 = 0.9;
}

pub const START_TRACKING: &str = "Start tracking your meals to see nutritional insights.";
pub const ON_TRACK: &str = "You're doing well with your nutrition goals. Keep it up!";

/// Window averages fed into the rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DailyAverages {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// Evaluates every rule in a fixed order. Never returns an empty list.
pub fn generate_recommendations(averages: &DailyAverages, targets: &NutritionTargets) -> Vec<String> {
    let mut recommendations = Vec::new();

    if let Some(rec) = check_calorie_balance(averages, targets) {
        recommendations.push(rec);
    }

    if let Some(rec) = check_protein_intake(averages, targets) {
        recommendations.push(rec);
    }

    if recommendations.is_empty() {
        recommendations.push(ON_TRACK.to_string());
    }

    recommendations
}

fn check_calorie_balance(averages: &DailyAverages, targets: &NutritionTargets) -> Option<String> {
    let goal = targets.daily_calorie_goal;
    let average = round_half_up(averages.calories);

    if averages.calories < goal * thresholds::UNDER_CALORIES {
        Some(format!(
            "You're averaging {average} calories per day, which is below your goal of {goal}. \
             Consider adding nutrient-dense foods to your meals."
        ))
    } else if averages.calories > goal * thresholds::OVER_CALORIES {
        Some(format!(
            "You're averaging {average} calories per day, which is above your goal of {goal}. \
             Consider moderating portion sizes."
        ))
    } else {
        None
    }
}

fn check_protein_intake(averages: &DailyAverages, targets: &NutritionTargets) -> Option<String> {
    let protein_goal = compute_macro_goals(targets).protein_grams;
    if averages.protein >= protein_goal * thresholds::LOW_PROTEIN {
        return None;
    }
    Some(
        "Your protein intake is below your target. Try to include more lean protein sources \
         like chicken, fish, legumes, or tofu."
            .to_string(),
    )
}
