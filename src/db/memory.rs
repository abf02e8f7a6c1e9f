//! In-memory [`ProfileStore`] for tests and local development.

use super::ProfileStore;
use crate::error::AppError;
use crate::models::{MealLog, MealLogEntry, MealPlan, UserProfile};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// Process-local store. Cloning shares the underlying maps.
#[derive(Clone, Default)]
pub struct MemoryDb {
    users: Arc<DashMap<String, UserProfile>>,
    meal_plans: Arc<DashMap<String, MealPlan>>,
    meal_logs: Arc<DashMap<String, MealLog>>,
    meal_log_entries: Arc<DashMap<String, Vec<MealLogEntry>>>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Meal history for a user, oldest first.
    pub fn meal_log_entries(&self, uid: &str) -> Vec<MealLogEntry> {
        self.meal_log_entries
            .get(uid)
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ProfileStore for MemoryDb {
    async fn get_user(&self, uid: &str) -> Result<Option<UserProfile>, AppError> {
        Ok(self.users.get(uid).map(|u| u.clone()))
    }

    async fn upsert_user(&self, user: &UserProfile) -> Result<(), AppError> {
        self.users.insert(user.uid.clone(), user.clone());
        Ok(())
    }

    async fn get_meal_plan(&self, uid: &str) -> Result<Option<MealPlan>, AppError> {
        Ok(self.meal_plans.get(uid).map(|p| p.clone()))
    }

    async fn set_meal_plan(&self, uid: &str, plan: &MealPlan) -> Result<(), AppError> {
        self.meal_plans.insert(uid.to_string(), plan.clone());
        Ok(())
    }

    async fn get_meal_log(&self, uid: &str) -> Result<Option<MealLog>, AppError> {
        Ok(self.meal_logs.get(uid).map(|l| *l))
    }

    async fn set_meal_log(&self, uid: &str, log: &MealLog) -> Result<(), AppError> {
        self.meal_logs.insert(uid.to_string(), *log);
        Ok(())
    }

    async fn add_meal_log_entry(&self, uid: &str, entry: &MealLogEntry) -> Result<(), AppError> {
        self.meal_log_entries
            .entry(uid.to_string())
            .or_default()
            .push(entry.clone());
        Ok(())
    }
}
