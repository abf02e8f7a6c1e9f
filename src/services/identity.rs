// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity provider client (Firebase Authentication, Identity Toolkit REST API).
//!
//! Only used to create accounts and resolve an email/password pair to a uid.
//! Session tokens are issued by [`crate::services::TokenService`], never by
//! the provider.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Account as known to the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityUser {
    pub uid: String,
    pub email: String,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create a new account. Fails with `Identity` when the provider rejects it.
    async fn create_user(&self, email: &str, password: &str) -> Result<IdentityUser, AppError>;

    /// Resolve an existing account by email, proving the password.
    /// Fails with `InvalidLogin` for unknown email or wrong password.
    async fn sign_in(&self, email: &str, password: &str) -> Result<IdentityUser, AppError>;
}

const DEFAULT_BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1";

/// Firebase Authentication over the Identity Toolkit REST API.
#[derive(Clone)]
pub struct FirebaseAuthClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
}

/// Provider answer to an `accounts:*` call.
enum AccountOutcome {
    Accepted(IdentityUser),
    /// 4xx with the provider's error code (e.g. `EMAIL_EXISTS`).
    Rejected(String),
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl FirebaseAuthClient {
    /// Create a client for the project's web API key.
    ///
    /// Honors FIREBASE_AUTH_EMULATOR_HOST for local development.
    pub fn new(api_key: String) -> Self {
        let base_url = match std::env::var("FIREBASE_AUTH_EMULATOR_HOST") {
            Ok(host) => {
                tracing::info!(host = %host, "Using Firebase Auth emulator");
                format!("http://{}/identitytoolkit.googleapis.com/v1", host)
            }
            Err(_) => DEFAULT_BASE_URL.to_string(),
        };
        Self::with_base_url(api_key, base_url)
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }

    /// POST an email/password pair to an `accounts:*` endpoint.
    async fn post_account(
        &self,
        action: &str,
        email: &str,
        password: &str,
    ) -> Result<AccountOutcome, AppError> {
        let url = format!("{}/accounts:{}", self.base_url, action);

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&PasswordRequest {
                email,
                password,
                return_secure_token: true,
            })
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Identity provider request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            let account: AccountResponse = response.json().await.map_err(|e| {
                AppError::Upstream(format!("Invalid identity provider response: {}", e))
            })?;
            return Ok(AccountOutcome::Accepted(IdentityUser {
                uid: account.local_id,
                email: account.email.unwrap_or_else(|| email.to_string()),
            }));
        }

        if status.is_client_error() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Ok(AccountOutcome::Rejected(message));
        }

        let body = response.text().await.unwrap_or_default();
        Err(AppError::Upstream(format!(
            "Identity provider HTTP {}: {}",
            status, body
        )))
    }
}

#[async_trait]
impl IdentityProvider for FirebaseAuthClient {
    async fn create_user(&self, email: &str, password: &str) -> Result<IdentityUser, AppError> {
        match self.post_account("signUp", email, password).await? {
            AccountOutcome::Accepted(user) => {
                tracing::info!(uid = %user.uid, "Identity provider account created");
                Ok(user)
            }
            AccountOutcome::Rejected(message) => {
                tracing::warn!(reason = %message, "Identity provider rejected sign-up");
                Err(AppError::Identity(message))
            }
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<IdentityUser, AppError> {
        match self.post_account("signInWithPassword", email, password).await? {
            AccountOutcome::Accepted(user) => Ok(user),
            AccountOutcome::Rejected(message) => {
                tracing::debug!(reason = %message, "Identity provider rejected sign-in");
                Err(AppError::InvalidLogin)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_envelope_parses_provider_message() {
        let body = r#"{"error": {"code": 400, "message": "EMAIL_EXISTS", "errors": []}}"#;
        let parsed: ErrorEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.error.message, "EMAIL_EXISTS");
    }

    #[test]
    fn test_password_request_shape() {
        let json = serde_json::to_value(PasswordRequest {
            email: "a@example.com",
            password: "hunter22",
            return_secure_token: true,
        })
        .unwrap();
        assert_eq!(json["returnSecureToken"], true);
        assert_eq!(json["email"], "a@example.com");
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_upstream_failure() {
        let client = FirebaseAuthClient::with_base_url(
            "key".to_string(),
            "http://127.0.0.1:1/identitytoolkit.googleapis.com/v1".to_string(),
        );
        let err = client.sign_in("a@example.com", "pw").await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
    }
}
