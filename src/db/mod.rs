// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer.
//!
//! Handlers talk to a [`ProfileStore`]; production wires in Firestore,
//! tests and local runs use the in-memory store.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryDb;

use crate::error::AppError;
use crate::models::{MealLog, MealLogEntry, MealPlan, UserProfile};
use async_trait::async_trait;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const MEAL_PLANS: &str = "mealPlans";
    /// Streak records (keyed by uid)
    pub const MEAL_LOGS: &str = "mealLogs";
    /// Sub-collection of `mealLogs/{uid}` holding every logged meal
    pub const MEAL_LOG_ENTRIES: &str = "entries";
}

/// Keyed document store for profiles, meal plans and meal logs.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Get a user profile by uid.
    async fn get_user(&self, uid: &str) -> Result<Option<UserProfile>, AppError>;

    /// Create or replace a user profile.
    async fn upsert_user(&self, user: &UserProfile) -> Result<(), AppError>;

    async fn get_meal_plan(&self, uid: &str) -> Result<Option<MealPlan>, AppError>;

    async fn set_meal_plan(&self, uid: &str, plan: &MealPlan) -> Result<(), AppError>;

    /// Get the streak record for a user.
    async fn get_meal_log(&self, uid: &str) -> Result<Option<MealLog>, AppError>;

    /// Store the streak record for a user.
    async fn set_meal_log(&self, uid: &str, log: &MealLog) -> Result<(), AppError>;

    /// Append an entry to the user's meal history.
    async fn add_meal_log_entry(&self, uid: &str, entry: &MealLogEntry) -> Result<(), AppError>;
}
