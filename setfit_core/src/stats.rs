//! Aggregate statistics over workout history.

use crate::WorkoutLog;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::collections::HashMap;

/// Summary figures computed from the full log history
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorkoutStats {
    pub total_workouts: usize,
    /// Sum of session durations, in seconds
    pub total_duration_secs: u64,
    /// Mean session duration, in seconds (0 with no history)
    pub average_duration_secs: u64,
    /// Most frequently completed plan name
    pub favorite_plan: Option<String>,
    /// Longest run of consecutive calendar days with a workout
    pub longest_streak: u32,
    /// Consecutive days ending today or yesterday (UTC)
    pub current_streak: u32,
    pub last_workout: Option<DateTime<Utc>>,
}

/// Compute stats relative to the current UTC date
pub fn compute_stats(logs: &[WorkoutLog]) -> WorkoutStats {
    compute_stats_at(logs, Utc::now().date_naive())
}

/// Compute stats relative to an explicit "today"
pub fn compute_stats_at(logs: &[WorkoutLog], today: NaiveDate) -> WorkoutStats {
    if logs.is_empty() {
        return WorkoutStats::default();
    }

    let total_workouts = logs.len();
    let total_duration_secs: u64 = logs.iter().map(|l| l.duration).sum();
    let average_duration_secs = total_duration_secs / total_workouts as u64;

    let mut plan_counts: HashMap<&str, usize> = HashMap::new();
    for log in logs {
        *plan_counts.entry(log.plan_name.as_str()).or_default() += 1;
    }
    // Ties break toward the alphabetically first name for determinism
    let favorite_plan = plan_counts
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
        .map(|(name, _)| (*name).to_string());

    let last_workout = logs.iter().map(|l| l.date).max();

    let mut days: Vec<NaiveDate> = logs.iter().map(|l| l.date.date_naive()).collect();
    days.sort_unstable();
    days.dedup();

    let (longest_streak, current_streak) = streaks(&days, today);

    WorkoutStats {
        total_workouts,
        total_duration_secs,
        average_duration_secs,
        favorite_plan,
        longest_streak,
        current_streak,
        last_workout,
    }
}

/// Longest and current consecutive-day runs over sorted unique dates
fn streaks(days: &[NaiveDate], today: NaiveDate) -> (u32, u32) {
    let mut longest = 0u32;
    let mut run = 0u32;
    let mut prev: Option<NaiveDate> = None;
    let mut current = 0u32;

    for &day in days {
        run = match prev {
            Some(p) if day - p == Duration::days(1) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        prev = Some(day);

        // A run still counts as "current" if it reaches today or yesterday
        if day == today || day + Duration::days(1) == today {
            current = run;
        }
    }

    (longest, current)
}
