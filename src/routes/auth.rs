// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account registration and login routes.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::extract::ValidatedJson;
use crate::models::user::lenient_string;
use crate::models::{HealthDetails, UserProfile};
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
}

/// Registration form. Health fields may arrive as strings or numbers.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub age: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub gender: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub height: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub weight: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub diet_preference: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub goal: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub activity_level: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub allergies: String,
}

impl RegisterRequest {
    fn health_details(&self) -> HealthDetails {
        HealthDetails {
            age: self.age.clone(),
            gender: self.gender.clone(),
            height: self.height.clone(),
            weight: self.weight.clone(),
            diet_preference: self.diet_preference.clone(),
            goal: self.goal.clone(),
            activity_level: self.activity_level.clone(),
            allergies: self.allergies.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Public view of a user account.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserResponse {
    pub uid: String,
    pub email: String,
    pub name: String,
    #[serde(rename = "healthDetails")]
    pub health_details: HealthDetails,
}

impl From<UserProfile> for UserResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            uid: profile.uid,
            email: profile.email,
            name: profile.name,
            health_details: profile.health_details,
        }
    }
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RegisterResponse {
    pub message: String,
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

fn issue_token(state: &AppState, uid: &str) -> Result<String> {
    state
        .tokens
        .issue(uid, None)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))
}

/// Create an account with the identity provider and store its profile.
async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    let account = state.identity.create_user(&req.email, &req.password).await?;

    let profile = UserProfile {
        uid: account.uid.clone(),
        email: req.email.clone(),
        name: req.name.clone(),
        created_at: format_utc_rfc3339(chrono::Utc::now()),
        health_details: req.health_details(),
    };
    state.db.upsert_user(&profile).await?;

    let token = issue_token(&state, &account.uid)?;
    tracing::info!(uid = %account.uid, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User created successfully".to_string(),
            token,
            user: UserResponse {
                email: account.email,
                ..profile.into()
            },
        }),
    ))
}

/// Exchange email and password for a session token.
///
/// Every failure to identify the account is reported as `invalid_credentials`.
async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let account = state
        .identity
        .sign_in(&req.email, &req.password)
        .await
        .map_err(|e| {
            if !matches!(e, AppError::InvalidLogin) {
                tracing::warn!(error = %e, "Sign-in failed");
            }
            AppError::InvalidLogin
        })?;

    let user = match state.db.get_user(&account.uid).await? {
        Some(profile) => UserResponse {
            email: account.email.clone(),
            ..profile.into()
        },
        None => UserResponse {
            uid: account.uid.clone(),
            email: account.email.clone(),
            name: String::new(),
            health_details: HealthDetails::default(),
        },
    };

    let token = issue_token(&state, &account.uid)?;
    tracing::info!(uid = %account.uid, "User logged in");

    Ok(Json(LoginResponse { token, user }))
}
