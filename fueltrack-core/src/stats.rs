//! Daily and lifetime nutrition statistics.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::MealRecord;

/// Calories and protein accumulated for one calendar date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DailyTotal {
    pub calories: i64,
    pub protein: i64,
}

/// Aggregated view of one user's records relative to a given day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    /// Records dated `today`, in stored order.
    pub today_meals: Vec<MealRecord>,
    pub today_calories: i64,
    pub today_protein: i64,
    pub lifetime_calories: i64,
    pub lifetime_protein: i64,
    /// Number of distinct dates with at least one record.
    pub days_logged: usize,
    pub avg_calories: i64,
    pub avg_protein: i64,
}

/// Computes statistics over `records` in a single pass.
///
/// `records` should already be limited to one identity. Records without a
/// date count as `today`. Negative amounts are summed as-is.
pub fn aggregate(records: &[MealRecord], today: &str) -> Stats {
    let mut stats = Stats::default();
    let mut daily: BTreeMap<&str, DailyTotal> = BTreeMap::new();

    for record in records {
        let date = record.date_or(today);

        stats.lifetime_calories = stats.lifetime_calories.saturating_add(record.calories);
        stats.lifetime_protein = stats.lifetime_protein.saturating_add(record.protein);

        let day = daily.entry(date).or_default();
        day.calories = day.calories.saturating_add(record.calories);
        day.protein = day.protein.saturating_add(record.protein);

        if date == today {
            stats.today_calories = stats.today_calories.saturating_add(record.calories);
            stats.today_protein = stats.today_protein.saturating_add(record.protein);
            stats.today_meals.push(record.clone());
        }
    }

    stats.days_logged = daily.len();
    stats.avg_calories = average(stats.lifetime_calories, stats.days_logged);
    stats.avg_protein = average(stats.lifetime_protein, stats.days_logged);
    stats
}

/// Integer mean truncated toward zero; 0 when nothing was logged.
fn average(total: i64, days: usize) -> i64 {
    match i64::try_from(days) {
        Ok(0) | Err(_) => 0,
        Ok(days) => total / days,
    }
}
