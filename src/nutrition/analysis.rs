//! Assembles the per-window analysis handed to presentation code.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::Serialize;
use time::OffsetDateTime;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::daily::{aggregate_daily, macro_ratio_trend, DailyBucket, MacroRatioPoint};
use super::error::AnalysisError;
use super::macros::{
    compute_calorie_average, compute_macro_averages, compute_macro_goals, macro_bars, GoalStatus,
    MacroAverages, MacroBar, MacroGoals,
};
use super::meal_type::{aggregate_by_meal_type, MealTypeBucket};
use super::ports::{MealLogStore, PreferencesStore, StoreError};
use super::recommendations::{generate_recommendations, DailyAverages, START_TRACKING};
use super::records::MealRecord;
use super::targets::{MacroTargets, NutritionTargets, UserPreferences};
use super::window::AnalysisWindow;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub window_days: u32,
    /// Oldest to newest, exactly `window_days` entries.
    pub daily_buckets: Vec<DailyBucket>,
    pub meal_type_buckets: Vec<MealTypeBucket>,
    pub macro_averages: MacroAverages,
    pub average_calories: f64,
    pub recommendations: Vec<String>,
    pub has_data: bool,
    pub calorie_goal: f64,
    pub macro_targets: MacroTargets,
    pub calorie_status: GoalStatus,
    pub macro_goals: MacroGoals,
    pub macro_bars: Vec<MacroBar>,
    pub macro_ratio_trend: Vec<MacroRatioPoint>,
}

/// Runs every aggregator over `records` and assembles the result.
///
/// `prior_average` is a previously observed average for the same user and
/// window; a positive one keeps `has_data` set when the window itself is empty.
pub fn build_analysis(
    records: &[MealRecord],
    targets: &NutritionTargets,
    window: &AnalysisWindow,
    prior_average: Option<f64>,
) -> AnalysisResult {
    let in_window: Vec<MealRecord> = records
        .iter()
        .filter(|r| window.contains(r.day()))
        .cloned()
        .collect();

    let daily_buckets = aggregate_daily(&in_window, window, targets);
    let meal_type_buckets = aggregate_by_meal_type(&in_window);
    let macro_averages = compute_macro_averages(&in_window, window);
    let average_calories = compute_calorie_average(&in_window, window);
    let macro_goals = compute_macro_goals(targets);

    let recommendations = if in_window.is_empty() {
        vec![START_TRACKING.to_string()]
    } else {
        generate_recommendations(
            &DailyAverages {
                calories: average_calories,
                protein: macro_averages.protein,
                carbs: macro_averages.carbs,
                fat: macro_averages.fat,
            },
            targets,
        )
    };

    let has_data = !in_window.is_empty() || prior_average.is_some_and(|avg| avg > 0.0);

    AnalysisResult {
        window_days: window.days(),
        macro_ratio_trend: macro_ratio_trend(&daily_buckets),
        daily_buckets,
        meal_type_buckets,
        macro_averages,
        average_calories,
        recommendations,
        has_data,
        calorie_goal: targets.daily_calorie_goal,
        macro_targets: targets.macro_targets,
        calorie_status: GoalStatus::classify(average_calories, targets.daily_calorie_goal),
        macro_bars: macro_bars(&macro_averages, &macro_goals),
        macro_goals,
    }
}

/// Most recent positive average calories per (user, window length).
#[derive(Debug, Default)]
pub struct AverageCache {
    entries: RwLock<HashMap<(Uuid, u32), f64>>,
}

impl AverageCache {
    /// Entries kept before the cache starts over.
    const MAX_ENTRIES: usize = 10_000;

    pub fn get(&self, user_id: Uuid, days: u32) -> Option<f64> {
        self.entries.read().ok()?.get(&(user_id, days)).copied()
    }

    /// Records the latest average; a zero average forgets the entry.
    pub fn remember(&self, user_id: Uuid, days: u32, average: f64) {
        let Ok(mut entries) = self.entries.write() else {
            return;
        };
        if !(average > 0.0) {
            entries.remove(&(user_id, days));
            return;
        }
        if entries.len() >= Self::MAX_ENTRIES && !entries.contains_key(&(user_id, days)) {
            entries.clear();
        }
        entries.insert((user_id, days), average);
    }
}

/// Fetches a user's records and targets and runs the analysis.
///
/// Store failures never escape: a failed record fetch reports "no data", a
/// failed or missing preferences fetch falls back to default targets.
pub struct NutritionAnalyzer {
    meal_logs: Arc<dyn MealLogStore>,
    preferences: Arc<dyn PreferencesStore>,
    cache: AverageCache,
}

impl NutritionAnalyzer {
    pub fn new(meal_logs: Arc<dyn MealLogStore>, preferences: Arc<dyn PreferencesStore>) -> Self {
        Self {
            meal_logs,
            preferences,
            cache: AverageCache::default(),
        }
    }

    /// Only an invalid window is an error.
    #[instrument(skip(self))]
    pub async fn analyze(
        &self,
        user_id: Uuid,
        window_days: i64,
        now: OffsetDateTime,
    ) -> Result<AnalysisResult, AnalysisError> {
        let window = AnalysisWindow::new(window_days, now)?;
        let (start, end) = window.fetch_range();

        let (records, preferences) = tokio::join!(
            self.meal_logs.fetch_meal_records(user_id, start, end),
            self.preferences.fetch_preferences(user_id),
        );

        let targets = resolve_targets(user_id, preferences);

        let records = match records {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, %user_id, "meal record fetch failed; reporting no data");
                return Ok(build_analysis(&[], &targets, &window, None));
            }
        };

        let prior = self.cache.get(user_id, window.days());
        let result = build_analysis(&records, &targets, &window, prior);
        self.cache
            .remember(user_id, window.days(), result.average_calories);

        debug!(
            %user_id,
            from = %window.start(),
            to = %window.end(),
            records = records.len(),
            has_data = result.has_data,
            "nutrition analysis computed"
        );
        Ok(result)
    }
}

fn resolve_targets(
    user_id: Uuid,
    preferences: Result<Option<UserPreferences>, StoreError>,
) -> NutritionTargets {
    match preferences {
        Ok(Some(prefs)) => prefs.targets(),
        Ok(None) => {
            debug!(%user_id, "no saved preferences; using default targets");
            NutritionTargets::default()
        }
        Err(e) => {
            warn!(error = %e, %user_id, "preferences fetch failed; using default targets");
            NutritionTargets::default()
        }
    }
}
