// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users.

use crate::error::{AppError, Result};
use crate::extract::ValidatedJson;
use crate::middleware::auth::AuthUser;
use crate::models::{ChatMessage, LogOutcome, MealPlan, UserProfile};
use crate::services::prompts::{self, MEAL_PLANNER_SYSTEM_PROMPT};
use crate::services::StreakTracker;
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// API routes (require authentication via bearer token).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/chat", post(chat))
        .route("/api/generate-meal-plan", post(generate_meal_plan))
        .route("/api/meal-plan", get(get_meal_plan))
        .route("/api/log-meal", post(log_meal))
        .route("/api/streak", get(get_streak))
}

async fn load_profile(state: &AppState, uid: &str) -> Result<UserProfile> {
    state
        .db
        .get_user(uid)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

// ─── User Profile ────────────────────────────────────────────

/// Get current user profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserProfile>> {
    Ok(Json(load_profile(&state, &user.uid).await?))
}

// ─── Chat ────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct ChatRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "No messages provided"))]
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ChatResponse {
    pub reply: String,
    /// The message being answered
    pub message: String,
}

/// Answer the latest message in a conversation, personalised with the
/// user's health profile when one is stored.
async fn chat(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    ValidatedJson(req): ValidatedJson<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    if !req.messages.iter().any(ChatMessage::is_conversational) {
        return Err(AppError::BadRequest("No messages provided".to_string()));
    }

    let last_message = req
        .messages
        .last()
        .map(|m| m.content.clone())
        .unwrap_or_default();

    let health = state
        .db
        .get_user(&user.uid)
        .await?
        .map(|profile| profile.health_details);
    let system_prompt = prompts::chat_system_prompt(health.as_ref());

    let reply = state
        .chat_model
        .complete(&system_prompt, &req.messages)
        .await?;

    tracing::debug!(
        uid = %user.uid,
        turns = req.messages.len(),
        personalised = health.is_some(),
        "Chat reply generated"
    );

    Ok(Json(ChatResponse {
        reply,
        message: last_message,
    }))
}

// ─── Meal Plans ──────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MealPlanResponse {
    pub message: String,
    pub meal_plan: MealPlan,
}

/// Generate a week of meals from the stored profile and save it.
async fn generate_meal_plan(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<MealPlanResponse>> {
    let profile = load_profile(&state, &user.uid).await?;
    let prompt = prompts::meal_plan_prompt(&profile.name, &profile.health_details);

    let raw = state
        .meal_plan_model
        .complete(MEAL_PLANNER_SYSTEM_PROMPT, &[ChatMessage::user(prompt)])
        .await?;

    let mut meal_plan = MealPlan::from_model_output(&raw)
        .map_err(|e| AppError::Upstream(format!("Meal plan is not valid JSON: {}", e)))?;
    meal_plan.generated_at = Some(format_utc_rfc3339(Utc::now()));

    state.db.set_meal_plan(&user.uid, &meal_plan).await?;
    tracing::info!(uid = %user.uid, "Meal plan generated");

    Ok(Json(MealPlanResponse {
        message: "Meal plan generated and saved successfully".to_string(),
        meal_plan,
    }))
}

/// Get the most recently generated meal plan.
async fn get_meal_plan(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<MealPlan>> {
    let plan = state
        .db
        .get_meal_plan(&user.uid)
        .await?
        .ok_or_else(|| AppError::NotFound("Meal plan not found".to_string()))?;
    Ok(Json(plan))
}

// ─── Meal Logging & Streaks ──────────────────────────────────

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LogMealResponse {
    pub message: String,
    pub streak: u32,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StreakResponse {
    pub streak: u32,
}

/// Meal details are optional; anything that is not a JSON value is stored as `{}`.
fn meal_details(body: &[u8]) -> serde_json::Value {
    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(serde_json::Value::Null) | Err(_) => serde_json::json!({}),
        Ok(value) => value,
    }
}

/// Record that the user ate today and advance their streak.
async fn log_meal(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    body: Bytes,
) -> Result<Json<LogMealResponse>> {
    let today = state.clock.today();
    let outcome = StreakTracker::new(state.db.as_ref())
        .log_meal(&user.uid, today, meal_details(&body))
        .await?;

    let message = match outcome {
        LogOutcome::AlreadyLogged { .. } => "Meal already logged today",
        LogOutcome::Updated(_) => "Meal logged",
    };

    Ok(Json(LogMealResponse {
        message: message.to_string(),
        streak: outcome.streak(),
    }))
}

/// Get the current streak, resetting it if a day was missed.
async fn get_streak(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<StreakResponse>> {
    let today = state.clock.today();
    let streak = StreakTracker::new(state.db.as_ref())
        .get_streak(&user.uid, today)
        .await?;
    Ok(Json(StreakResponse { streak }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meal_details_defaults_to_empty_object() {
        assert_eq!(meal_details(b""), serde_json::json!({}));
        assert_eq!(meal_details(b"null"), serde_json::json!({}));
        assert_eq!(meal_details(b"not json"), serde_json::json!({}));
        assert_eq!(
            meal_details(br#"{"name": "oatmeal", "calories": 300}"#),
            serde_json::json!({"name": "oatmeal", "calories": 300})
        );
    }
}
