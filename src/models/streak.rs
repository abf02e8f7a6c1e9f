// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily meal-logging streak.
//!
//! Dates are UTC calendar dates. A streak continues only when the previous
//! log was exactly yesterday; anything else (including a date in the future)
//! starts over at 1.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Streak record stored at `mealLogs/{uid}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealLog {
    /// Last day a meal was logged (`YYYY-MM-DD`)
    #[serde(default)]
    pub last_logged_date: Option<NaiveDate>,
    /// Consecutive days with at least one logged meal
    #[serde(default)]
    pub current_streak: u32,
}

/// Result of applying a meal log to the stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutcome {
    /// A meal was already logged today; nothing to write.
    AlreadyLogged { streak: u32 },
    /// New record to persist.
    Updated(MealLog),
}

impl LogOutcome {
    pub fn streak(&self) -> u32 {
        match self {
            LogOutcome::AlreadyLogged { streak } => *streak,
            LogOutcome::Updated(record) => record.current_streak,
        }
    }
}

impl MealLog {
    /// Record for a first meal logged on `today`.
    pub fn started(today: NaiveDate) -> Self {
        Self {
            last_logged_date: Some(today),
            current_streak: 1,
        }
    }

    /// Apply a meal logged on `today` to an optional existing record.
    pub fn log_meal(record: Option<&MealLog>, today: NaiveDate) -> LogOutcome {
        let Some(record) = record else {
            return LogOutcome::Updated(Self::started(today));
        };

        match record.last_logged_date {
            Some(last) if last == today => LogOutcome::AlreadyLogged {
                streak: record.current_streak,
            },
            Some(last) if Some(last) == today.pred_opt() => LogOutcome::Updated(Self {
                last_logged_date: Some(today),
                current_streak: record.current_streak.saturating_add(1),
            }),
            _ => LogOutcome::Updated(Self::started(today)),
        }
    }

    /// Whether the streak is broken as of `today` (last log before yesterday).
    pub fn is_stale(&self, today: NaiveDate) -> bool {
        match (self.last_logged_date, today.pred_opt()) {
            (Some(last), Some(yesterday)) => last < yesterday,
            _ => false,
        }
    }

    /// Zeroed copy of a stale record, or `None` when no write is needed.
    ///
    /// `last_logged_date` is kept so history is not lost.
    pub fn lazy_reset(&self, today: NaiveDate) -> Option<MealLog> {
        if self.is_stale(today) && self.current_streak != 0 {
            Some(Self {
                current_streak: 0,
                ..*self
            })
        } else {
            None
        }
    }

    /// Streak as seen on `today`.
    pub fn observed_streak(&self, today: NaiveDate) -> u32 {
        if self.is_stale(today) {
            0
        } else {
            self.current_streak
        }
    }
}

/// Immutable history entry at `mealLogs/{uid}/entries/{auto-id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealLogEntry {
    /// Server time of the log (RFC3339)
    pub timestamp: String,
    /// Meal details as sent by the client (may be empty)
    #[serde(default)]
    pub meal: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn record(last: &str, streak: u32) -> MealLog {
        MealLog {
            last_logged_date: Some(date(last)),
            current_streak: streak,
        }
    }

    #[test]
    fn test_first_log_starts_at_one() {
        let outcome = MealLog::log_meal(None, date("2024-03-10"));
        assert_eq!(outcome, LogOutcome::Updated(MealLog::started(date("2024-03-10"))));
        assert_eq!(outcome.streak(), 1);
    }

    #[test]
    fn test_consecutive_days_increment() {
        let mut current: Option<MealLog> = None;
        let start = date("2024-02-27");

        for (i, expected) in (1..=5).enumerate() {
            let today = start + chrono::Days::new(i as u64);
            match MealLog::log_meal(current.as_ref(), today) {
                LogOutcome::Updated(next) => {
                    assert_eq!(next.current_streak, expected);
                    current = Some(next);
                }
                other => panic!("unexpected outcome {:?}", other),
            }
        }
    }

    #[test]
    fn test_same_day_is_noop() {
        let existing = record("2024-01-02", 6);
        let outcome = MealLog::log_meal(Some(&existing), date("2024-01-02"));
        assert_eq!(outcome, LogOutcome::AlreadyLogged { streak: 6 });
    }

    #[test]
    fn test_gap_resets_to_one() {
        let existing = record("2024-01-01", 9);
        let outcome = MealLog::log_meal(Some(&existing), date("2024-01-03"));
        assert_eq!(outcome, LogOutcome::Updated(record("2024-01-03", 1)));
    }

    #[test]
    fn test_future_last_date_resets_to_one() {
        let existing = record("2024-01-10", 4);
        let outcome = MealLog::log_meal(Some(&existing), date("2024-01-05"));
        assert_eq!(outcome, LogOutcome::Updated(record("2024-01-05", 1)));
    }

    #[test]
    fn test_missing_last_date_resets_to_one() {
        let existing = MealLog {
            last_logged_date: None,
            current_streak: 3,
        };
        let outcome = MealLog::log_meal(Some(&existing), date("2024-01-05"));
        assert_eq!(outcome.streak(), 1);
    }

    #[test]
    fn test_log_after_lazy_reset_restarts_at_one() {
        let zeroed = record("2024-01-02", 0);
        let outcome = MealLog::log_meal(Some(&zeroed), date("2024-01-05"));
        assert_eq!(outcome, LogOutcome::Updated(record("2024-01-05", 1)));
    }

    #[test]
    fn test_lazy_reset_only_when_stale() {
        let existing = record("2024-01-02", 6);

        assert_eq!(existing.lazy_reset(date("2024-01-02")), None);
        assert_eq!(existing.lazy_reset(date("2024-01-03")), None);
        assert_eq!(
            existing.lazy_reset(date("2024-01-05")),
            Some(record("2024-01-02", 0))
        );

        assert_eq!(existing.observed_streak(date("2024-01-03")), 6);
        assert_eq!(existing.observed_streak(date("2024-01-04")), 0);
    }

    #[test]
    fn test_lazy_reset_skips_already_zero() {
        let zeroed = record("2024-01-02", 0);
        assert_eq!(zeroed.lazy_reset(date("2024-02-01")), None);
        assert_eq!(zeroed.observed_streak(date("2024-02-01")), 0);
    }

    #[test]
    fn test_date_serializes_as_iso_day() {
        let json = serde_json::to_value(record("2024-01-02", 6)).unwrap();
        assert_eq!(json["last_logged_date"], "2024-01-02");
        assert_eq!(json["current_streak"], 6);
    }
}
