// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Nutri-Insights: nutrition assistant backend
//!
//! This crate provides the API for user accounts and health profiles,
//! LLM-backed nutrition chat and meal plans, USDA food lookups and a
//! daily meal-logging streak.

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::ProfileStore;
use services::{ChatModel, FoodDataSource, IdentityProvider, TokenService};
use std::sync::Arc;
use time_utils::Clock;

/// Shared application state.
///
/// Every external collaborator is a trait object so tests can swap in fakes.
pub struct AppState {
    pub config: Config,
    pub db: Arc<dyn ProfileStore>,
    pub tokens: TokenService,
    pub identity: Arc<dyn IdentityProvider>,
    /// Model answering chat messages
    pub chat_model: Arc<dyn ChatModel>,
    /// Model generating weekly meal plans
    pub meal_plan_model: Arc<dyn ChatModel>,
    pub foods: Arc<dyn FoodDataSource>,
    /// Decides which UTC day a meal log falls on
    pub clock: Arc<dyn Clock>,
}
