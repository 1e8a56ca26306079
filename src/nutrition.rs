use serde::Serialize;
use time::{Date, UtcOffset};

use crate::meals::repo_types::MealRecord;

/// Summed calories and macros over a set of meals.
///
/// Per-meal values are `u32`, totals are `u64` and use plain addition.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyTotals {
    pub calories: u64,
    pub protein: u64,
    pub carbs: u64,
    pub fats: u64,
}

impl DailyTotals {
    fn add_meal(self, meal: &MealRecord) -> Self {
        Self {
            calories: self.calories + u64::from(meal.calories),
            protein: self.protein + u64::from(meal.protein),
            carbs: self.carbs + u64::from(meal.carbs),
            fats: self.fats + u64::from(meal.fats),
        }
    }
}

/// Element-wise sum; the empty slice sums to zero.
pub fn aggregate<'a, I>(meals: I) -> DailyTotals
where
    I: IntoIterator<Item = &'a MealRecord>,
{
    meals
        .into_iter()
        .fold(DailyTotals::default(), DailyTotals::add_meal)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyGoals {
    pub calories: u64,
    pub protein: u64,
    pub carbs: u64,
    pub fats: u64,
}

impl Default for DailyGoals {
    fn default() -> Self {
        Self {
            calories: 2000,
            protein: 150,
            carbs: 250,
            fats: 65,
        }
    }
}

/// Percent of goal reached per field. Not clamped at 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GoalProgress {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NutritionSummary {
    pub totals: DailyTotals,
    pub goals: DailyGoals,
    pub progress: GoalProgress,
    pub remaining: DailyTotals,
}

impl NutritionSummary {
    pub fn new(totals: DailyTotals, goals: DailyGoals) -> Self {
        Self {
            totals,
            goals,
            progress: GoalProgress {
                calories: percent(totals.calories, goals.calories),
                protein: percent(totals.protein, goals.protein),
                carbs: percent(totals.carbs, goals.carbs),
                fats: percent(totals.fats, goals.fats),
            },
            remaining: DailyTotals {
                calories: goals.calories.saturating_sub(totals.calories),
                protein: goals.protein.saturating_sub(totals.protein),
                carbs: goals.carbs.saturating_sub(totals.carbs),
                fats: goals.fats.saturating_sub(totals.fats),
            },
        }
    }
}

fn percent(current: u64, goal: u64) -> f64 {
    if goal == 0 {
        return 0.0;
    }
    current as f64 / goal as f64 * 100.0
}

/// Meals logged on one calendar day.
#[derive(Debug, Clone)]
pub struct DayGroup {
    pub date: Date,
    pub totals: DailyTotals,
    pub meals: Vec<MealRecord>,
}

/// Groups `meals` by the local date of `logged_at`, newest day first.
///
/// Meals keep their relative order inside a group. `totals` covers every meal
/// of the day; `keep` only decides which meals are listed.
pub fn group_by_day<F>(meals: &[MealRecord], offset: UtcOffset, keep: F) -> Vec<DayGroup>
where
    F: Fn(&MealRecord) -> bool,
{
    let mut days: Vec<(Date, Vec<&MealRecord>)> = Vec::new();
    for meal in meals {
        let date = meal.logged_at.to_offset(offset).date();
        match days.iter_mut().find(|(d, _)| *d == date) {
            Some((_, group)) => group.push(meal),
            None => days.push((date, vec![meal])),
        }
    }
    days.sort_by(|a, b| b.0.cmp(&a.0));

    days.into_iter()
        .map(|(date, group)| DayGroup {
            date,
            totals: aggregate(group.iter().copied()),
            meals: group.into_iter().filter(|m| keep(m)).cloned().collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisResult;
    use crate::meals::repo_types::MealId;
    use time::{macros::date, macros::datetime, macros::offset, OffsetDateTime};

    fn meal(name: &str, at: OffsetDateTime, macros: (u32, u32, u32, u32)) -> MealRecord {
        MealRecord::from_analysis(
            MealId::new(),
            String::new(),
            AnalysisResult {
                name: name.into(),
                calories: macros.0,
                protein: macros.1,
                carbs: macros.2,
                fats: macros.3,
                confidence: 80,
            },
            at,
        )
    }

    #[test]
    fn empty_log_sums_to_zero() {
        assert_eq!(
            aggregate(&[] as &[MealRecord]),
            DailyTotals { calories: 0, protein: 0, carbs: 0, fats: 0 }
        );
    }

    #[test]
    fn sums_two_meals() {
        let at = datetime!(2026-10-16 12:00 UTC);
        let meals = vec![
            meal("bowl", at, (485, 32, 48, 14)),
            meal("salad", at, (420, 28, 15, 26)),
        ];
        assert_eq!(
            aggregate(&meals),
            DailyTotals { calories: 905, protein: 60, carbs: 63, fats: 40 }
        );
    }

    #[test]
    fn totals_do_not_wrap_at_u32() {
        let at = datetime!(2026-10-16 12:00 UTC);
        let meals = vec![
            meal("a", at, (u32::MAX, u32::MAX, 0, 0)),
            meal("b", at, (u32::MAX, 1, 0, 0)),
        ];
        let totals = aggregate(&meals);
        assert_eq!(totals.calories, 2 * u64::from(u32::MAX));
        assert_eq!(totals.protein, u64::from(u32::MAX) + 1);
    }

    #[test]
    fn summary_progress_and_remaining() {
        let totals = DailyTotals { calories: 905, protein: 60, carbs: 300, fats: 40 };
        let summary = NutritionSummary::new(totals, DailyGoals::default());
        assert!((summary.progress.calories - 45.25).abs() < 1e-9);
        assert!((summary.progress.protein - 40.0).abs() < 1e-9);
        assert!((summary.progress.carbs - 120.0).abs() < 1e-9);
        assert_eq!(summary.remaining.calories, 1095);
        assert_eq!(summary.remaining.carbs, 0);
    }

    #[test]
    fn zero_goal_reports_zero_progress() {
        let goals = DailyGoals { calories: 0, protein: 0, carbs: 0, fats: 0 };
        let summary = NutritionSummary::new(DailyTotals { calories: 10, ..Default::default() }, goals);
        assert_eq!(summary.progress.calories, 0.0);
    }

    #[test]
    fn groups_by_local_date_newest_first() {
        let meals = vec![
            meal("late dinner", datetime!(2026-10-16 23:30 UTC), (700, 30, 60, 20)),
            meal("lunch", datetime!(2026-10-16 12:00 UTC), (500, 25, 50, 15)),
            meal("yesterday", datetime!(2026-10-15 09:00 UTC), (300, 10, 40, 5)),
        ];

        let utc = group_by_day(&meals, UtcOffset::UTC, |_| true);
        assert_eq!(utc.len(), 2);
        assert_eq!(utc[0].date, date!(2026-10-16));
        assert_eq!(utc[0].meals.len(), 2);
        assert_eq!(utc[0].meals[0].name, "late dinner");
        assert_eq!(utc[0].totals.calories, 1200);
        assert_eq!(utc[1].totals.calories, 300);

        // +02:00 pushes the late dinner into the next day
        let shifted = group_by_day(&meals, offset!(+2), |_| true);
        assert_eq!(shifted.len(), 3);
        assert_eq!(shifted[0].meals[0].name, "late dinner");
        assert_eq!(shifted[0].date, date!(2026-10-17));
    }

    #[test]
    fn filter_hides_meals_but_not_their_calories() {
        let at = datetime!(2026-10-16 12:00 UTC);
        let meals = vec![
            meal("Caesar Salad", at, (420, 28, 15, 26)),
            meal("Toast", at, (350, 18, 28, 20)),
        ];
        let groups = group_by_day(&meals, UtcOffset::UTC, |m| m.name.contains("Salad"));
        assert_eq!(groups[0].meals.len(), 1);
        assert_eq!(groups[0].totals.calories, 770);
    }
}
