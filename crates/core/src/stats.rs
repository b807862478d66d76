//! Dashboard aggregation over persisted study history.
//!
//! The store supplies a `StudyHistory` snapshot; everything here is pure so it
//! can be tested without a database.

use chrono::NaiveDate;

/// Raw counts read from the store in one consistent snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudyHistory {
    pub total_reviews: u64,
    pub correct_reviews: u64,
    pub total_sessions: u64,
    pub active_groups: u64,
    /// Distinct UTC calendar days with at least one session, any order.
    pub session_days: Vec<NaiveDate>,
}

/// Figures shown on the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    pub success_rate: f64,
    pub total_study_sessions: u64,
    pub total_active_groups: u64,
    pub study_streak_days: u32,
}

impl DashboardStats {
    #[must_use]
    pub fn from_history(history: &StudyHistory) -> Self {
        Self {
            success_rate: success_rate(history.correct_reviews, history.total_reviews),
            total_study_sessions: history.total_sessions,
            total_active_groups: history.active_groups,
            study_streak_days: study_streak_days(&history.session_days),
        }
    }
}

/// Words studied versus words available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StudyProgress {
    pub total_words_studied: u64,
    pub total_available_words: u64,
}

/// Percentage of correct reviews, rounded to two decimals.
///
/// Zero when nothing has been reviewed. Always within `0.0..=100.0`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn success_rate(correct: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let correct = correct.min(total);
    let rate = correct as f64 * 100.0 / total as f64;
    ((rate * 100.0).round() / 100.0).clamp(0.0, 100.0)
}

/// Length of the most recent run of consecutive session days.
///
/// The run is anchored at the latest day in `days` and extends backward until
/// the first calendar day without a session. Duplicates and ordering in the
/// input do not matter.
#[must_use]
pub fn study_streak_days(days: &[NaiveDate]) -> u32 {
    let mut sorted = days.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    sorted.dedup();

    let Some((&latest, rest)) = sorted.split_first() else {
        return 0;
    };

    let mut streak = 1_u32;
    let mut expected = latest.pred_opt();
    for day in rest {
        if Some(*day) != expected {
            break;
        }
        streak = streak.saturating_add(1);
        expected = day.pred_opt();
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn success_rate_without_reviews_is_zero() {
        assert_eq!(success_rate(0, 0), 0.0);
    }

    #[test]
    fn success_rate_is_a_rounded_percentage() {
        assert_eq!(success_rate(1, 1), 100.0);
        assert_eq!(success_rate(0, 4), 0.0);
        assert_eq!(success_rate(1, 3), 33.33);
        assert_eq!(success_rate(2, 3), 66.67);
    }

    #[test]
    fn success_rate_stays_in_bounds() {
        for total in 0..20_u64 {
            for correct in 0..=total + 2 {
                let rate = success_rate(correct, total);
                assert!((0.0..=100.0).contains(&rate), "{correct}/{total} -> {rate}");
            }
        }
    }

    #[test]
    fn streak_is_zero_without_sessions() {
        assert_eq!(study_streak_days(&[]), 0);
    }

    #[test]
    fn streak_of_a_single_day_is_one() {
        let today = day(2024, 3, 10);
        assert_eq!(study_streak_days(&[today, today]), 1);
    }

    #[test]
    fn streak_counts_consecutive_days_back_from_latest() {
        let days = [day(2024, 3, 8), day(2024, 3, 10), day(2024, 3, 9)];
        assert_eq!(study_streak_days(&days), 3);
    }

    #[test]
    fn streak_breaks_on_gap_day() {
        let days = [
            day(2024, 3, 1),
            day(2024, 3, 2),
            day(2024, 3, 3),
            day(2024, 3, 5),
            day(2024, 3, 6),
        ];
        assert_eq!(study_streak_days(&days), 2);
    }

    #[test]
    fn streak_crosses_month_boundaries() {
        let days = [day(2024, 2, 28), day(2024, 2, 29), day(2024, 3, 1)];
        assert_eq!(study_streak_days(&days), 3);
    }

    #[test]
    fn dashboard_stats_combine_history() {
        let history = StudyHistory {
            total_reviews: 4,
            correct_reviews: 3,
            total_sessions: 2,
            active_groups: 1,
            session_days: vec![day(2024, 1, 1)],
        };
        let stats = DashboardStats::from_history(&history);
        assert_eq!(stats.success_rate, 75.0);
        assert_eq!(stats.total_study_sessions, 2);
        assert_eq!(stats.total_active_groups, 1);
        assert_eq!(stats.study_streak_days, 1);
    }
}
