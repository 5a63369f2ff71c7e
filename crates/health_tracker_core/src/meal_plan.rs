//! crates/health_tracker_core/src/meal_plan.rs
//!
//! Calorie aggregation over a week of planned meals.

use crate::domain::{MealPlanEntry, MealSlot, Weekday};
use crate::metrics::round_half_up;
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub day: Weekday,
    pub total_calories: f64,
    pub entry_count: usize,
}

/// Per-day totals plus the weekly total and the rounded daily average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct WeeklySummary {
    pub days: Vec<DaySummary>,
    pub weekly_total: f64,
    pub weekly_average: u64,
}

pub fn total_calories_for_day(entries: &[MealPlanEntry], day: Weekday) -> f64 {
    entries
        .iter()
        .filter(|entry| entry.day == day)
        .map(|entry| entry.calories)
        .sum()
}

/// Entries planned for one slot of one day, in insertion order.
pub fn entries_for_slot(
    entries: &[MealPlanEntry],
    day: Weekday,
    meal_type: MealSlot,
) -> Vec<&MealPlanEntry> {
    entries
        .iter()
        .filter(|entry| entry.day == day && entry.meal_type == meal_type)
        .collect()
}

pub fn weekly_total(entries: &[MealPlanEntry]) -> f64 {
    Weekday::ALL
        .iter()
        .map(|&day| total_calories_for_day(entries, day))
        .sum()
}

/// Weekly total divided by seven, rounded for display.
pub fn weekly_average(entries: &[MealPlanEntry]) -> u64 {
    display_average(weekly_total(entries))
}

fn display_average(weekly_total: f64) -> u64 {
    round_half_up(weekly_total / 7.0) as u64
}

pub fn weekly_summary(entries: &[MealPlanEntry]) -> WeeklySummary {
    let days: Vec<DaySummary> = Weekday::ALL
        .iter()
        .map(|&day| DaySummary {
            day,
            total_calories: total_calories_for_day(entries, day),
            entry_count: entries.iter().filter(|entry| entry.day == day).count(),
        })
        .collect();
    let weekly_total = days.iter().map(|d| d.total_calories).sum();
    WeeklySummary {
        days,
        weekly_total,
        weekly_average: display_average(weekly_total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn entry(day: Weekday, meal_type: MealSlot, title: &str, calories: f64) -> MealPlanEntry {
        MealPlanEntry {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            week_start: NaiveDate::from_ymd_opt(2026, 10, 12).unwrap(),
            day,
            meal_type,
            recipe_id: None,
            recipe_title: title.to_string(),
            calories,
            created_at: Utc::now(),
        }
    }

    fn sample_week() -> Vec<MealPlanEntry> {
        vec![
            entry(Weekday::Monday, MealSlot::Breakfast, "Oats", 350.0),
            entry(Weekday::Monday, MealSlot::Lunch, "Lentil soup", 420.0),
            entry(Weekday::Monday, MealSlot::Breakfast, "Banana", 105.0),
            entry(Weekday::Wednesday, MealSlot::Dinner, "Salmon", 610.0),
            entry(Weekday::Saturday, MealSlot::NightSnack, "Yoghurt", 150.0),
            entry(Weekday::Sunday, MealSlot::Lunch, "Pasta", 700.0),
        ]
    }

    #[test]
    fn empty_plan_is_all_zero() {
        let summary = weekly_summary(&[]);
        assert_eq!(summary.weekly_total, 0.0);
        assert_eq!(summary.weekly_average, 0);
        assert_eq!(summary.days.len(), 7);
        assert!(summary.days.iter().all(|d| d.total_calories == 0.0 && d.entry_count == 0));
        assert_eq!(total_calories_for_day(&[], Weekday::Friday), 0.0);
    }

    #[test]
    fn day_totals_sum_matching_entries() {
        let week = sample_week();
        assert_eq!(total_calories_for_day(&week, Weekday::Monday), 875.0);
        assert_eq!(total_calories_for_day(&week, Weekday::Tuesday), 0.0);
        assert_eq!(total_calories_for_day(&week, Weekday::Sunday), 700.0);
    }

    #[test]
    fn slot_entries_keep_insertion_order() {
        let week = sample_week();
        let titles: Vec<&str> = entries_for_slot(&week, Weekday::Monday, MealSlot::Breakfast)
            .into_iter()
            .map(|e| e.recipe_title.as_str())
            .collect();
        assert_eq!(titles, vec!["Oats", "Banana"]);
        assert!(entries_for_slot(&week, Weekday::Monday, MealSlot::Dinner).is_empty());
    }

    #[test]
    fn weekly_total_is_sum_of_day_totals() {
        let week = sample_week();
        let by_day: f64 = Weekday::ALL
            .iter()
            .map(|&d| total_calories_for_day(&week, d))
            .sum();
        assert_eq!(weekly_total(&week), by_day);
        assert_eq!(weekly_total(&week), 2335.0);
        // 2335 / 7 = 333.57
        assert_eq!(weekly_average(&week), 334);

        let summary = weekly_summary(&week);
        assert_eq!(summary.weekly_total, 2335.0);
        assert_eq!(summary.weekly_average, 334);
        assert_eq!(summary.days[0].entry_count, 3);
    }

    #[test]
    fn huge_entries_add_up_without_wrapping() {
        let near_max = f64::from(u32::MAX);
        let week = vec![
            entry(Weekday::Monday, MealSlot::Dinner, "Feast", near_max),
            entry(Weekday::Monday, MealSlot::Lunch, "Feast", near_max),
            entry(Weekday::Tuesday, MealSlot::Dinner, "Feast", 3_000_000_000.0),
        ];

        let summary = weekly_summary(&week);
        assert_eq!(summary.days[0].total_calories, 2.0 * near_max);
        let by_day: f64 = summary.days.iter().map(|d| d.total_calories).sum();
        assert_eq!(summary.weekly_total, by_day);
        assert_eq!(summary.weekly_total, 2.0 * near_max + 3_000_000_000.0);
        assert_eq!(summary.weekly_average, weekly_average(&week));
        assert!(summary.weekly_average > u64::from(u32::MAX) / 7);
    }

    #[test]
    fn fractional_calories_are_kept_until_the_average() {
        let week = vec![
            entry(Weekday::Friday, MealSlot::Breakfast, "Toast", 250.5),
            entry(Weekday::Friday, MealSlot::MorningSnack, "Apple", 52.25),
        ];
        assert_eq!(total_calories_for_day(&week, Weekday::Friday), 302.75);
        assert_eq!(weekly_total(&week), 302.75);
        // 302.75 / 7 = 43.25
        assert_eq!(weekly_average(&week), 43);
    }
}
