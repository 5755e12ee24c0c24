//! User nutrition targets and the stored preferences document they come from.

use serde::{Deserialize, Serialize};

pub const DEFAULT_DAILY_CALORIE_GOAL: f64 = 2000.0;

pub const DEFAULT_MACRO_TARGETS: MacroTargets = MacroTargets {
    protein: 25.0,
    carbs: 50.0,
    fat: 25.0,
};

/// Macro targets as percentages of daily calories. Not guaranteed to sum to 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroTargets {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl MacroTargets {
    pub fn total(&self) -> f64 {
        self.protein + self.carbs + self.fat
    }
}

impl Default for MacroTargets {
    fn default() -> Self {
        DEFAULT_MACRO_TARGETS
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionTargets {
    pub daily_calorie_goal: f64,
    pub macro_targets: MacroTargets,
}

impl Default for NutritionTargets {
    fn default() -> Self {
        Self {
            daily_calorie_goal: DEFAULT_DAILY_CALORIE_GOAL,
            macro_targets: DEFAULT_MACRO_TARGETS,
        }
    }
}

/// Macro percentages as stored; any of them may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredMacroTargets {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbs: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fat: Option<f64>,
}

impl From<MacroTargets> for StoredMacroTargets {
    fn from(t: MacroTargets) -> Self {
        Self {
            protein: Some(t.protein),
            carbs: Some(t.carbs),
            fat: Some(t.fat),
        }
    }
}

/// The user's preferences document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    #[serde(default)]
    pub health_goals: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_calorie_goal: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macro_targets: Option<StoredMacroTargets>,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            dietary_restrictions: Vec::new(),
            health_goals: Vec::new(),
            allergies: Vec::new(),
            daily_calorie_goal: Some(DEFAULT_DAILY_CALORIE_GOAL),
            macro_targets: Some(DEFAULT_MACRO_TARGETS.into()),
        }
    }
}

impl UserPreferences {
    /// Resolves the targets the analysis runs against.
    ///
    /// A missing calorie goal or a missing `macroTargets` block falls back to the
    /// defaults; a single missing macro inside a present block is 0.
    pub fn targets(&self) -> NutritionTargets {
        let macro_targets = match self.macro_targets {
            Some(stored) => MacroTargets {
                protein: stored.protein.unwrap_or(0.0),
                carbs: stored.carbs.unwrap_or(0.0),
                fat: stored.fat.unwrap_or(0.0),
            },
            None => DEFAULT_MACRO_TARGETS,
        };
        NutritionTargets {
            daily_calorie_goal: self.daily_calorie_goal.unwrap_or(DEFAULT_DAILY_CALORIE_GOAL),
            macro_targets,
        }
    }
}
