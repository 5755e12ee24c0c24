//! Validation and normalization applied before preferences are saved.

use thiserror::Error;

use crate::nutrition::macros::round_half_up;
use crate::nutrition::targets::{MacroTargets, StoredMacroTargets};
use crate::nutrition::UserPreferences;

/// Macro totals inside this band are saved as entered.
const MACRO_TOTAL_TOLERANCE: (f64, f64) = (95.0, 105.0);

#[derive(Debug, Error, PartialEq)]
pub enum PreferencesError {
    #[error("dailyCalorieGoal must be a positive number, got {0}")]
    InvalidCalorieGoal(f64),

    #[error("macro target {name} must be between 0 and 100, got {value}")]
    InvalidMacroTarget { name: &'static str, value: f64 },
}

/// Rescales macro percentages to sum to 100 when they drift outside the tolerance band.
///
/// Protein and carbs are rounded and fat takes the remainder, so the result
/// always sums to exactly 100. An all-zero set is returned unchanged.
pub fn normalize_macro_targets(targets: MacroTargets) -> MacroTargets {
    let total = targets.total();
    let (low, high) = MACRO_TOTAL_TOLERANCE;
    if !(total > 0.0) || (low..=high).contains(&total) {
        return targets;
    }

    let protein = round_half_up(targets.protein * 100.0 / total);
    // two halves rounding up could otherwise push fat below zero
    let carbs = round_half_up(targets.carbs * 100.0 / total).min(100.0 - protein);
    MacroTargets {
        protein,
        carbs,
        fat: 100.0 - protein - carbs,
    }
}

/// Validates `prefs` and returns the document to store.
pub fn prepare_preferences(mut prefs: UserPreferences) -> Result<UserPreferences, PreferencesError> {
    if let Some(goal) = prefs.daily_calorie_goal {
        if !goal.is_finite() || goal <= 0.0 {
            return Err(PreferencesError::InvalidCalorieGoal(goal));
        }
    }

    if let Some(stored) = prefs.macro_targets {
        for (name, value) in [
            ("protein", stored.protein),
            ("carbs", stored.carbs),
            ("fat", stored.fat),
        ] {
            if let Some(value) = value {
                if !(0.0..=100.0).contains(&value) {
                    return Err(PreferencesError::InvalidMacroTarget { name, value });
                }
            }
        }

        let resolved = MacroTargets {
            protein: stored.protein.unwrap_or(0.0),
            carbs: stored.carbs.unwrap_or(0.0),
            fat: stored.fat.unwrap_or(0.0),
        };
        prefs.macro_targets = Some(StoredMacroTargets::from(normalize_macro_targets(resolved)));
    }

    for list in [
        &mut prefs.dietary_restrictions,
        &mut prefs.health_goals,
        &mut prefs.allergies,
    ] {
        list.retain(|item| !item.trim().is_empty());
    }

    Ok(prefs)
}
