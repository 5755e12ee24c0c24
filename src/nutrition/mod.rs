//! Nutrition aggregation and recommendation engine.
//!
//! Everything in here except [`analysis::NutritionAnalyzer`] is a pure function of
//! (records, targets, window). The analyzer is the only piece that talks to the
//! stores behind [`ports`].

pub mod analysis;
pub mod daily;
pub mod error;
pub mod macros;
pub mod meal_type;
pub mod memory;
pub mod ports;
pub mod recommendations;
pub mod records;
pub mod targets;
pub mod window;

pub use analysis::{build_analysis, AnalysisResult, NutritionAnalyzer};
pub use error::AnalysisError;
pub use records::{FoodEntry, FoodNutrition, MealRecord, MealType};
pub use targets::{MacroTargets, NutritionTargets, UserPreferences};
pub use window::AnalysisWindow;
