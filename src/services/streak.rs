// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Meal logging and streak tracking over a [`ProfileStore`].
//!
//! The read-modify-write of the streak record is not transactional. Two
//! concurrent logs on the same day both land on the same-day or
//! next-day branch, so the worst case is a missed increment.

use chrono::NaiveDate;

use crate::db::ProfileStore;
use crate::error::AppError;
use crate::models::{LogOutcome, MealLog, MealLogEntry};
use crate::time_utils::format_utc_rfc3339;

pub struct StreakTracker<'a> {
    store: &'a dyn ProfileStore,
}

impl<'a> StreakTracker<'a> {
    pub fn new(store: &'a dyn ProfileStore) -> Self {
        Self { store }
    }

    /// Record a meal for `uid` on `today` and return the resulting streak.
    ///
    /// A second log on the same day changes nothing, history included.
    pub async fn log_meal(
        &self,
        uid: &str,
        today: NaiveDate,
        meal: serde_json::Value,
    ) -> Result<LogOutcome, AppError> {
        let existing = self.store.get_meal_log(uid).await?;
        let outcome = MealLog::log_meal(existing.as_ref(), today);

        let LogOutcome::Updated(record) = outcome else {
            tracing::debug!(uid, %today, "Meal already logged today");
            return Ok(outcome);
        };

        self.store.set_meal_log(uid, &record).await?;

        let entry = MealLogEntry {
            timestamp: format_utc_rfc3339(chrono::Utc::now()),
            meal,
        };
        self.store.add_meal_log_entry(uid, &entry).await?;

        tracing::info!(
            uid,
            %today,
            streak = record.current_streak,
            "Meal logged"
        );

        Ok(outcome)
    }

    /// Current streak for `uid` as of `today`, zeroing a broken streak in storage.
    pub async fn get_streak(&self, uid: &str, today: NaiveDate) -> Result<u32, AppError> {
        let Some(record) = self.store.get_meal_log(uid).await? else {
            return Ok(0);
        };

        if let Some(reset) = record.lazy_reset(today) {
            tracing::info!(
                uid,
                previous = record.current_streak,
                last_logged = ?record.last_logged_date,
                "Streak broken, resetting to 0"
            );
            self.store.set_meal_log(uid, &reset).await?;
        }

        Ok(record.observed_streak(today))
    }
}
