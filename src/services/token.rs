// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session tokens (HS256 JWT).
//!
//! Tokens are self-contained: verification needs only the server secret,
//! never a round trip to the identity provider or the database.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Claim names owned by the token service; callers cannot override them.
const RESERVED_CLAIMS: [&str; 3] = ["sub", "iat", "exp"];

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Subject (identity provider uid)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Caller-supplied claims merged in at issuance.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    /// Signature is valid but `exp` is not in the future.
    #[error("token expired")]
    Expired,

    /// Bad signature, malformed token, missing claims or wrong algorithm.
    #[error("token invalid")]
    Invalid,

    #[error("token signing failed: {0}")]
    Signing(String),
}

/// Issues and verifies session tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validity: Duration,
}

impl TokenService {
    pub fn new(secret: &[u8], validity: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validity,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.jwt_secret, Duration::hours(config.token_ttl_hours))
    }

    /// Create a token for `subject_id` valid from now.
    pub fn issue(
        &self,
        subject_id: &str,
        additional_claims: Option<serde_json::Map<String, serde_json::Value>>,
    ) -> Result<String, TokenError> {
        self.issue_at(subject_id, additional_claims, Utc::now())
    }

    /// Create a token as if issued at `now`.
    pub fn issue_at(
        &self,
        subject_id: &str,
        additional_claims: Option<serde_json::Map<String, serde_json::Value>>,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let mut extra = additional_claims.unwrap_or_default();
        for reserved in RESERVED_CLAIMS {
            extra.remove(reserved);
        }

        let expires = now
            .checked_add_signed(self.validity)
            .ok_or_else(|| TokenError::Signing("token expiry out of range".to_string()))?;

        let claims = Claims {
            sub: subject_id.to_string(),
            iat: now.timestamp(),
            exp: expires.timestamp(),
            extra,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify signature and expiry against the current time.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify signature and expiry against `now`.
    ///
    /// The signature is checked first, so `Expired` is only ever reported
    /// for tokens this service actually signed.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is compared strictly against `now` below, without leeway.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
                tracing::debug!(error = %e, "Token rejected");
                TokenError::Invalid
            })?;

        if token_data.claims.exp <= now.timestamp() {
            return Err(TokenError::Expired);
        }

        Ok(token_data.claims)
    }
}
