// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (`users/{uid}`)
//! - Meal plans (`mealPlans/{uid}`)
//! - Meal logs (`mealLogs/{uid}` streak record + `entries` history)

use super::ProfileStore;
use crate::db::collections;
use crate::error::AppError;
use crate::models::{MealLog, MealLogEntry, MealPlan, UserProfile};
use async_trait::async_trait;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    async fn get_doc<T>(&self, collection: &str, id: &str) -> Result<Option<T>, AppError>
    where
        T: serde::de::DeserializeOwned + Send,
    {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collection)
            .obj::<T>()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn set_doc<T>(&self, collection: &str, id: &str, doc: &T) -> Result<(), AppError>
    where
        T: serde::Serialize + serde::de::DeserializeOwned + Sync + Send,
    {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collection)
            .document_id(id)
            .object(doc)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for FirestoreDb {
    // ─── User Operations ─────────────────────────────────────────

    async fn get_user(&self, uid: &str) -> Result<Option<UserProfile>, AppError> {
        self.get_doc(collections::USERS, uid).await
    }

    async fn upsert_user(&self, user: &UserProfile) -> Result<(), AppError> {
        self.set_doc(collections::USERS, &user.uid, user).await
    }

    // ─── Meal Plan Operations ────────────────────────────────────

    async fn get_meal_plan(&self, uid: &str) -> Result<Option<MealPlan>, AppError> {
        self.get_doc(collections::MEAL_PLANS, uid).await
    }

    async fn set_meal_plan(&self, uid: &str, plan: &MealPlan) -> Result<(), AppError> {
        self.set_doc(collections::MEAL_PLANS, uid, plan).await
    }

    // ─── Meal Log Operations ─────────────────────────────────────

    async fn get_meal_log(&self, uid: &str) -> Result<Option<MealLog>, AppError> {
        self.get_doc(collections::MEAL_LOGS, uid).await
    }

    async fn set_meal_log(&self, uid: &str, log: &MealLog) -> Result<(), AppError> {
        self.set_doc(collections::MEAL_LOGS, uid, log).await
    }

    async fn add_meal_log_entry(&self, uid: &str, entry: &MealLogEntry) -> Result<(), AppError> {
        let client = self.get_client()?;

        let parent_path = client
            .parent_path(collections::MEAL_LOGS, uid)
            .map_err(|e| AppError::Database(e.to_string()))?;

        let _: () = client
            .fluent()
            .insert()
            .into(collections::MEAL_LOG_ENTRIES)
            .generate_document_id()
            .parent(&parent_path)
            .object(entry)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::debug!(uid, "Meal log entry stored");
        Ok(())
    }
}
