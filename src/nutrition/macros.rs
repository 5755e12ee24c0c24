//! Macro averages, gram goals and percent-of-goal math.

use serde::{Deserialize, Serialize};

use super::records::{MealRecord, NutrientTotals};
use super::targets::NutritionTargets;
use super::window::AnalysisWindow;

pub const PROTEIN_KCAL_PER_GRAM: f64 = 4.0;
pub const CARBS_KCAL_PER_GRAM: f64 = 4.0;
pub const FAT_KCAL_PER_GRAM: f64 = 9.0;

/// Below this percent of goal a value is reported as under goal.
const UNDER_GOAL_PERCENT: f64 = 80.0;
/// Above this percent of goal a value is reported as over goal.
const OVER_GOAL_PERCENT: f64 = 120.0;

/// Macro grams where any field may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialMacros {
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
}

/// Average grams per day. Every field is always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroAverages {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl MacroAverages {
    /// Fills every missing field with 0.
    pub fn complete(partial: PartialMacros) -> Self {
        Self {
            protein: partial.protein.unwrap_or(0.0),
            carbs: partial.carbs.unwrap_or(0.0),
            fat: partial.fat.unwrap_or(0.0),
        }
    }
}

impl From<PartialMacros> for MacroAverages {
    fn from(partial: PartialMacros) -> Self {
        Self::complete(partial)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroGoals {
    pub protein_grams: f64,
    pub carbs_grams: f64,
    pub fat_grams: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GoalStatus {
    UnderGoal,
    OnTrack,
    OverGoal,
}

impl GoalStatus {
    pub fn classify(value: f64, goal: f64) -> Self {
        // Any intake exceeds a non-positive goal.
        if !(goal > 0.0) {
            return if value > 0.0 {
                GoalStatus::OverGoal
            } else {
                GoalStatus::OnTrack
            };
        }
        let pct = percentage(value, goal);
        if pct < UNDER_GOAL_PERCENT {
            GoalStatus::UnderGoal
        } else if pct > OVER_GOAL_PERCENT {
            GoalStatus::OverGoal
        } else {
            GoalStatus::OnTrack
        }
    }
}

/// One bar of the macro chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroBar {
    pub name: String,
    pub value: f64,
    pub goal: f64,
    pub percent_of_goal: f64,
    pub status: GoalStatus,
}

impl MacroBar {
    fn new(name: &str, value: f64, goal: f64) -> Self {
        Self {
            name: name.to_string(),
            value,
            goal,
            percent_of_goal: percentage(value, goal),
            status: GoalStatus::classify(value, goal),
        }
    }
}

/// `value` as a percent of `goal`; 0 whenever the result would not be a finite number.
pub fn percentage(value: f64, goal: f64) -> f64 {
    if !(goal > 0.0) {
        return 0.0;
    }
    let pct = value / goal * 100.0;
    if pct.is_finite() {
        pct
    } else {
        0.0
    }
}

/// Rounds .5 up, matching how calorie figures are shown to users.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Sum of each macro over the window's records divided by the full window length.
///
/// Days without logged meals count as zero; they are not excluded.
pub fn compute_macro_averages(records: &[MealRecord], window: &AnalysisWindow) -> MacroAverages {
    let totals = window_totals(records, window);
    let days = f64::from(window.days());
    MacroAverages::complete(PartialMacros {
        protein: Some(totals.protein / days),
        carbs: Some(totals.carbs / days),
        fat: Some(totals.fat / days),
    })
}

/// Average calories per day over the full window length.
pub fn compute_calorie_average(records: &[MealRecord], window: &AnalysisWindow) -> f64 {
    window_totals(records, window).calories / f64::from(window.days())
}

fn window_totals(records: &[MealRecord], window: &AnalysisWindow) -> NutrientTotals {
    NutrientTotals::from_records(records.iter().filter(|r| window.contains(r.day())))
}

/// Gram targets derived from the macro percentages and the calorie goal.
pub fn compute_macro_goals(targets: &NutritionTargets) -> MacroGoals {
    let calories = targets.daily_calorie_goal;
    let macros = targets.macro_targets;
    MacroGoals {
        protein_grams: goal_grams(macros.protein, calories, PROTEIN_KCAL_PER_GRAM),
        carbs_grams: goal_grams(macros.carbs, calories, CARBS_KCAL_PER_GRAM),
        fat_grams: goal_grams(macros.fat, calories, FAT_KCAL_PER_GRAM),
    }
}

fn goal_grams(percent: f64, calorie_goal: f64, kcal_per_gram: f64) -> f64 {
    if !(percent > 0.0) || !(calorie_goal > 0.0) {
        return 0.0;
    }
    (percent / 100.0) * calorie_goal / kcal_per_gram
}

/// Protein, Carbs, Fat bars in that order.
pub fn macro_bars(averages: &MacroAverages, goals: &MacroGoals) -> Vec<MacroBar> {
    vec![
        MacroBar::new("Protein", averages.protein, goals.protein_grams),
        MacroBar::new("Carbs", averages.carbs, goals.carbs_grams),
        MacroBar::new("Fat", averages.fat, goals.fat_grams),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::records::MealType;
    use crate::nutrition::targets::MacroTargets;
    use proptest::prelude::*;
    use time::macros::datetime;
    use uuid::Uuid;

    fn record(date: time::OffsetDateTime, protein: Option<f64>, carbs: Option<f64>, fat: Option<f64>) -> MealRecord {
        MealRecord {
            id: 1,
            user_id: Uuid::nil(),
            date,
            meal_type: MealType::Lunch,
            foods: Vec::new(),
            total_calories: Some(400.0),
            total_protein: protein,
            total_carbs: carbs,
            total_fat: fat,
        }
    }

    fn targets(goal: f64, protein: f64, carbs: f64, fat: f64) -> NutritionTargets {
        NutritionTargets {
            daily_calorie_goal: goal,
            macro_targets: MacroTargets { protein, carbs, fat },
        }
    }

    #[test]
    fn averages_divide_by_full_window() {
        let window = AnalysisWindow::new(7, datetime!(2024-01-07 20:00 UTC)).unwrap();
        let records = vec![
            record(datetime!(2024-01-03 08:00 UTC), Some(35.0), Some(70.0), Some(14.0)),
            record(datetime!(2024-01-05 12:00 UTC), Some(35.0), Some(70.0), Some(14.0)),
        ];
        let avg = compute_macro_averages(&records, &window);
        assert!((avg.protein - 10.0).abs() < 1e-9);
        assert!((avg.carbs - 20.0).abs() < 1e-9);
        assert!((avg.fat - 4.0).abs() < 1e-9);
        assert!((compute_calorie_average(&records, &window) - 800.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn averages_skip_records_outside_window_and_missing_fields() {
        let window = AnalysisWindow::new(2, datetime!(2024-01-07 20:00 UTC)).unwrap();
        let records = vec![
            record(datetime!(2024-01-01 08:00 UTC), Some(500.0), Some(500.0), Some(500.0)),
            record(datetime!(2024-01-07 08:00 UTC), None, Some(10.0), None),
        ];
        let avg = compute_macro_averages(&records, &window);
        assert_eq!(avg, MacroAverages { protein: 0.0, carbs: 5.0, fat: 0.0 });
    }

    #[test]
    fn empty_input_gives_zeroed_averages() {
        let window = AnalysisWindow::new(7, datetime!(2024-01-07 20:00 UTC)).unwrap();
        assert_eq!(compute_macro_averages(&[], &window), MacroAverages::default());
        assert_eq!(compute_calorie_average(&[], &window), 0.0);
    }

    #[test]
    fn goal_grams_use_kcal_factors() {
        let goals = compute_macro_goals(&targets(2000.0, 25.0, 50.0, 25.0));
        assert!((goals.protein_grams - 125.0).abs() < 1e-9);
        assert!((goals.carbs_grams - 250.0).abs() < 1e-9);
        assert!((goals.fat_grams - 2000.0 * 0.25 / 9.0).abs() < 1e-9);
    }

    #[test]
    fn zero_macro_targets_give_zero_goals_and_zero_percentages() {
        let goals = compute_macro_goals(&targets(2000.0, 0.0, 0.0, 0.0));
        assert_eq!(goals, MacroGoals::default());

        let averages = MacroAverages { protein: 80.0, carbs: 200.0, fat: 60.0 };
        for bar in macro_bars(&averages, &goals) {
            assert_eq!(bar.percent_of_goal, 0.0);
            assert_eq!(bar.status, GoalStatus::OverGoal);
        }
    }

    #[test]
    fn zero_calorie_goal_gives_zero_goals() {
        let goals = compute_macro_goals(&targets(0.0, 30.0, 40.0, 30.0));
        assert_eq!(goals, MacroGoals::default());
    }

    #[test]
    fn percentage_guards_bad_goals() {
        assert_eq!(percentage(50.0, 0.0), 0.0);
        assert_eq!(percentage(50.0, -10.0), 0.0);
        assert_eq!(percentage(50.0, f64::NAN), 0.0);
        assert_eq!(percentage(f64::INFINITY, 10.0), 0.0);
        assert_eq!(percentage(f64::MAX, f64::MIN_POSITIVE), 0.0);
        assert!((percentage(50.0, 200.0) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn classify_uses_80_and_120_percent_bands() {
        assert_eq!(GoalStatus::classify(1500.0, 2000.0), GoalStatus::UnderGoal);
        assert_eq!(GoalStatus::classify(1600.0, 2000.0), GoalStatus::OnTrack);
        assert_eq!(GoalStatus::classify(2400.0, 2000.0), GoalStatus::OnTrack);
        assert_eq!(GoalStatus::classify(2401.0, 2000.0), GoalStatus::OverGoal);
    }

    #[test]
    fn classify_against_a_zero_goal() {
        assert_eq!(GoalStatus::classify(500.0, 0.0), GoalStatus::OverGoal);
        assert_eq!(GoalStatus::classify(0.0, 0.0), GoalStatus::OnTrack);
        assert_eq!(GoalStatus::classify(10.0, f64::NAN), GoalStatus::OverGoal);
    }

    #[test]
    fn round_half_up_matches_display_rounding() {
        assert_eq!(round_half_up(150.5), 151.0);
        assert_eq!(round_half_up(150.49), 150.0);
        assert_eq!(round_half_up(0.0), 0.0);
    }

    #[test]
    fn complete_defaults_each_missing_field() {
        let partial = PartialMacros { protein: Some(12.5), carbs: None, fat: Some(3.0) };
        assert_eq!(
            MacroAverages::from(partial),
            MacroAverages { protein: 12.5, carbs: 0.0, fat: 3.0 }
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn percentage_is_zero_for_non_positive_goals(value in -1.0e6f64..1.0e6, goal in -1.0e6f64..=0.0) {
            prop_assert_eq!(percentage(value, goal), 0.0);
        }

        #[test]
        fn percentage_is_always_finite(value in proptest::num::f64::ANY, goal in proptest::num::f64::ANY) {
            prop_assert!(percentage(value, goal).is_finite());
        }

        #[test]
        fn completed_macros_are_always_numbers(
            protein in proptest::option::of(0.0f64..500.0),
            carbs in proptest::option::of(0.0f64..500.0),
            fat in proptest::option::of(0.0f64..500.0),
        ) {
            let complete = MacroAverages::complete(PartialMacros { protein, carbs, fat });
            prop_assert!(complete.protein.is_finite());
            prop_assert!(complete.carbs.is_finite());
            prop_assert!(complete.fat.is_finite());
            prop_assert_eq!(complete.protein, protein.unwrap_or(0.0));
        }
    }
}
