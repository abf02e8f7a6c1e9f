// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod chat;
pub mod food;
pub mod meal_plan;
pub mod streak;
pub mod user;

pub use chat::{ChatMessage, ChatRole};
pub use food::{FoodDetails, FoodSummary, NutrientSummary};
pub use meal_plan::MealPlan;
pub use streak::{LogOutcome, MealLog, MealLogEntry};
pub use user::{HealthDetails, UserProfile};
