//! Per-day totals over the analysis window.

use std::collections::HashMap;

use serde::Serialize;
use time::{macros::format_description, Date};

use super::records::{MealRecord, NutrientTotals};
use super::targets::NutritionTargets;
use super::window::AnalysisWindow;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyBucket {
    /// Chart label, e.g. `"Jan 05"`.
    pub label: String,
    pub date: Date,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    /// Copy of the daily calorie goal, carried for charting.
    pub goal: f64,
}

/// Each macro's share of a day's total macro grams, in percent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroRatioPoint {
    pub label: String,
    pub date: Date,
    pub protein_ratio: f64,
    pub carbs_ratio: f64,
    pub fat_ratio: f64,
}

pub fn day_label(day: Date) -> String {
    day.format(format_description!("[month repr:short] [day]"))
        .unwrap_or_else(|_| day.to_string())
}

/// One bucket per window day, oldest first, zero-filled where nothing was logged.
///
/// Records dated outside the window are ignored.
pub fn aggregate_daily(
    records: &[MealRecord],
    window: &AnalysisWindow,
    targets: &NutritionTargets,
) -> Vec<DailyBucket> {
    let mut per_day: HashMap<Date, NutrientTotals> = HashMap::new();
    for record in records {
        let day = record.day();
        if !window.contains(day) {
            continue;
        }
        per_day.entry(day).or_default().add_record(record);
    }

    window
        .dates()
        .map(|day| {
            let totals = per_day.get(&day).copied().unwrap_or_default();
            DailyBucket {
                label: day_label(day),
                date: day,
                calories: totals.calories,
                protein: totals.protein,
                carbs: totals.carbs,
                fat: totals.fat,
                goal: targets.daily_calorie_goal,
            }
        })
        .collect()
}

pub fn macro_ratio_trend(buckets: &[DailyBucket]) -> Vec<MacroRatioPoint> {
    buckets
        .iter()
        .map(|b| {
            let total = b.protein + b.carbs + b.fat;
            let share = |grams: f64| if total > 0.0 { grams / total * 100.0 } else { 0.0 };
            MacroRatioPoint {
                label: b.label.clone(),
                date: b.date,
                protein_ratio: share(b.protein),
                carbs_ratio: share(b.carbs),
                fat_ratio: share(b.fat),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::records::MealType;
    use proptest::prelude::*;
    use time::macros::{date, datetime};
    use time::{Duration, OffsetDateTime};
    use uuid::Uuid;

    fn meal(date: OffsetDateTime, calories: f64) -> MealRecord {
        MealRecord {
            id: 0,
            user_id: Uuid::nil(),
            date,
            meal_type: MealType::Dinner,
            foods: Vec::new(),
            total_calories: Some(calories),
            total_protein: Some(calories / 20.0),
            total_carbs: Some(calories / 10.0),
            total_fat: Some(calories / 40.0),
        }
    }

    fn targets() -> NutritionTargets {
        NutritionTargets::default()
    }

    #[test]
    fn same_day_records_share_one_bucket() {
        let window = AnalysisWindow::new(7, datetime!(2024-01-07 21:00 UTC)).unwrap();
        let records = vec![
            meal(datetime!(2024-01-05 08:00 UTC), 300.0),
            meal(datetime!(2024-01-05 20:00 UTC), 700.0),
        ];
        let buckets = aggregate_daily(&records, &window, &targets());

        assert_eq!(buckets.len(), 7);
        let jan5: Vec<&DailyBucket> = buckets.iter().filter(|b| b.calories > 0.0).collect();
        assert_eq!(jan5.len(), 1);
        assert_eq!(jan5[0].date, date!(2024-01-05));
        assert_eq!(jan5[0].calories, 1000.0);
        assert_eq!(jan5[0].protein, 50.0);
    }

    #[test]
    fn time_of_day_is_ignored_at_day_edges() {
        let window = AnalysisWindow::new(3, datetime!(2024-01-06 12:00 UTC)).unwrap();
        let records = vec![
            meal(datetime!(2024-01-05 23:50 UTC), 100.0),
            meal(datetime!(2024-01-05 00:01 UTC), 50.0),
        ];
        let buckets = aggregate_daily(&records, &window, &targets());
        assert_eq!(buckets[1].date, date!(2024-01-05));
        assert_eq!(buckets[1].calories, 150.0);
        assert_eq!(buckets[0].calories, 0.0);
        assert_eq!(buckets[2].calories, 0.0);
    }

    #[test]
    fn empty_window_is_zero_filled_with_goal() {
        let window = AnalysisWindow::new(7, datetime!(2024-01-07 10:00 UTC)).unwrap();
        let buckets = aggregate_daily(&[], &window, &targets());
        assert_eq!(buckets.len(), 7);
        for bucket in &buckets {
            assert_eq!(bucket.calories, 0.0);
            assert_eq!(bucket.fat, 0.0);
            assert_eq!(bucket.goal, 2000.0);
        }
        assert_eq!(buckets[0].label, "Jan 01");
        assert_eq!(buckets[6].label, "Jan 07");
    }

    #[test]
    fn records_outside_window_are_ignored() {
        let window = AnalysisWindow::new(2, datetime!(2024-01-07 10:00 UTC)).unwrap();
        let records = vec![
            meal(datetime!(2024-01-05 10:00 UTC), 900.0),
            meal(datetime!(2024-01-08 01:00 UTC), 900.0),
            meal(datetime!(2024-01-06 10:00 UTC), 400.0),
        ];
        let buckets = aggregate_daily(&records, &window, &targets());
        let total: f64 = buckets.iter().map(|b| b.calories).sum();
        assert_eq!(total, 400.0);
    }

    #[test]
    fn ratio_trend_is_zero_on_empty_days() {
        let window = AnalysisWindow::new(2, datetime!(2024-01-07 10:00 UTC)).unwrap();
        let records = vec![meal(datetime!(2024-01-07 09:00 UTC), 400.0)];
        let trend = macro_ratio_trend(&aggregate_daily(&records, &window, &targets()));

        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].protein_ratio, 0.0);
        assert_eq!(trend[0].carbs_ratio, 0.0);
        assert_eq!(trend[0].fat_ratio, 0.0);

        // 20g protein, 40g carbs, 10g fat
        assert!((trend[1].protein_ratio - 20.0 / 70.0 * 100.0).abs() < 1e-9);
        let sum = trend[1].protein_ratio + trend[1].carbs_ratio + trend[1].fat_ratio;
        assert!((sum - 100.0).abs() < 1e-9);
    }

    fn arb_records() -> impl Strategy<Value = Vec<(i64, i64, u32)>> {
        // (days before reference, minutes into the day, calories)
        prop::collection::vec((0i64..40, 0i64..1440, 0u32..3000), 0..60)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn window_always_has_n_contiguous_days(days in 1i64..60, raw in arb_records()) {
            let now = datetime!(2024-03-15 18:30 UTC);
            let window = AnalysisWindow::new(days, now).unwrap();
            let records: Vec<MealRecord> = raw
                .iter()
                .map(|(back, minute, kcal)| {
                    let date = (now.date() - Duration::days(*back)).midnight().assume_utc()
                        + Duration::minutes(*minute);
                    meal(date, f64::from(*kcal))
                })
                .collect();

            let buckets = aggregate_daily(&records, &window, &targets());
            prop_assert_eq!(buckets.len() as i64, days);
            prop_assert_eq!(buckets.last().map(|b| b.date), Some(now.date()));
            for pair in buckets.windows(2) {
                prop_assert_eq!(pair[0].date.next_day(), Some(pair[1].date));
            }
        }

        #[test]
        fn daily_totals_conserve_in_window_calories(days in 1i64..30, raw in arb_records()) {
            let now = datetime!(2024-03-15 18:30 UTC);
            let window = AnalysisWindow::new(days, now).unwrap();
            let records: Vec<MealRecord> = raw
                .iter()
                .map(|(back, minute, kcal)| {
                    let date = (now.date() - Duration::days(*back)).midnight().assume_utc()
                        + Duration::minutes(*minute);
                    meal(date, f64::from(*kcal))
                })
                .collect();

            let expected: f64 = records
                .iter()
                .filter(|r| window.contains(r.day()))
                .map(|r| r.calories())
                .sum();
            let actual: f64 = aggregate_daily(&records, &window, &targets())
                .iter()
                .map(|b| b.calories)
                .sum();
            prop_assert!((expected - actual).abs() < 1e-6);
        }
    }
}
