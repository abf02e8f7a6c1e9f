// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! USDA FoodData Central client.
//!
//! Handles:
//! - Food search by free-text query
//! - Single food lookup by FDC ID
//! - Batch lookup of several FDC IDs

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::AppError;
use crate::models::food::{UsdaFood, UsdaSearchResponse};

/// Results per search when the caller does not ask for a size.
pub const DEFAULT_PAGE_SIZE: u32 = 5;

#[async_trait]
pub trait FoodDataSource: Send + Sync {
    async fn search(&self, query: &str, page_size: u32) -> Result<UsdaSearchResponse, AppError>;

    /// Fails with `NotFound` for unknown IDs.
    async fn food(&self, fdc_id: u64) -> Result<UsdaFood, AppError>;

    async fn foods(&self, fdc_ids: &[u64]) -> Result<Vec<UsdaFood>, AppError>;
}

/// FoodData Central client configuration
#[derive(Debug, Clone)]
pub struct UsdaClientConfig {
    pub api_key: String,
    /// Base URL (default: <https://api.nal.usda.gov/fdc/v1>)
    pub base_url: String,
}

impl Default for UsdaClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.nal.usda.gov/fdc/v1".to_string(),
        }
    }
}

#[derive(Clone)]
pub struct UsdaClient {
    http: reqwest::Client,
    config: UsdaClientConfig,
}

/// FDC reports some failures as 200 with an `error`/`errors`/`Error` key.
fn error_payload(body: &serde_json::Value) -> Option<&serde_json::Value> {
    ["error", "errors", "Error"]
        .iter()
        .find_map(|key| body.get(*key))
}

fn decode<T: DeserializeOwned>(body: serde_json::Value) -> Result<T, AppError> {
    serde_json::from_value(body)
        .map_err(|e| AppError::Upstream(format!("USDA API JSON parse error: {}", e)))
}

impl UsdaClient {
    pub fn new(config: UsdaClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Send a request and return the JSON body of a successful response.
    ///
    /// A 404 becomes `NotFound`; every other failure is `Upstream`.
    async fn send_json(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<serde_json::Value, AppError> {
        let response = request
            .query(&[("api_key", self.config.api_key.as_str())])
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("USDA API request failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::NotFound("Food not found".to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "USDA API HTTP {}: {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("USDA API JSON parse error: {}", e)))
    }
}

#[async_trait]
impl FoodDataSource for UsdaClient {
    async fn search(&self, query: &str, page_size: u32) -> Result<UsdaSearchResponse, AppError> {
        let url = format!("{}/foods/search", self.config.base_url);
        let request = self.http.get(&url).query(&[
            ("query", query.to_string()),
            ("pageSize", page_size.to_string()),
        ]);

        let body = self.send_json(request).await?;
        if let Some(err) = error_payload(&body) {
            return Err(AppError::Upstream(format!("USDA API error: {}", err)));
        }

        let results: UsdaSearchResponse = decode(body)?;
        tracing::debug!(query, hits = results.foods.len(), "Food search complete");
        Ok(results)
    }

    async fn food(&self, fdc_id: u64) -> Result<UsdaFood, AppError> {
        let url = format!("{}/food/{}", self.config.base_url, fdc_id);
        let body = self.send_json(self.http.get(&url)).await?;

        if let Some(err) = error_payload(&body) {
            tracing::debug!(fdc_id, error = %err, "USDA API reported error for food lookup");
            return Err(AppError::NotFound(format!("Food {} not found", fdc_id)));
        }

        decode(body)
    }

    async fn foods(&self, fdc_ids: &[u64]) -> Result<Vec<UsdaFood>, AppError> {
        let url = format!("{}/foods", self.config.base_url);
        let request = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "fdcIds": fdc_ids }));

        let body = self.send_json(request).await?;
        if let Some(err) = error_payload(&body) {
            return Err(AppError::Upstream(format!("USDA API error: {}", err)));
        }

        decode(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_payload_detection() {
        let ok = serde_json::json!({"foods": []});
        assert!(error_payload(&ok).is_none());

        let err = serde_json::json!({"error": {"code": "API_KEY_INVALID"}});
        assert!(error_payload(&err).is_some());

        let capital = serde_json::json!({"Error": "No food found"});
        assert!(error_payload(&capital).is_some());

        // Arrays (batch responses) never carry an error key.
        assert!(error_payload(&serde_json::json!([])).is_none());
    }

    #[tokio::test]
    async fn test_unreachable_api_is_upstream_failure() {
        let client = UsdaClient::new(UsdaClientConfig {
            api_key: "key".to_string(),
            base_url: "http://127.0.0.1:1".to_string(),
        });
        let err = client.search("apple", DEFAULT_PAGE_SIZE).await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
    }
}
