// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Nutri-Insights API Server
//!
//! Nutrition assistant backend: accounts and health profiles, LLM chat and
//! meal plans, USDA food lookups and meal-logging streaks.

use nutri_insights::{
    config::Config,
    db::FirestoreDb,
    services::{FirebaseAuthClient, GeminiClient, TokenService, UsdaClient, UsdaClientConfig},
    time_utils::SystemClock,
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured JSON logging for GCP
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Nutri-Insights API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.firebase_project_id).await?;

    let identity = FirebaseAuthClient::new(config.firebase_api_key.clone());

    let chat_model = GeminiClient::new(config.google_api_key.clone(), config.chat_model.clone());
    let meal_plan_model = GeminiClient::new(
        config.google_api_key.clone(),
        config.meal_plan_model.clone(),
    );
    tracing::info!(
        chat_model = chat_model.model(),
        meal_plan_model = meal_plan_model.model(),
        "Gemini clients initialized"
    );

    let foods = UsdaClient::new(UsdaClientConfig {
        api_key: config.usda_api_key.clone(),
        ..UsdaClientConfig::default()
    });

    // Build shared state
    let state = Arc::new(AppState {
        tokens: TokenService::from_config(&config),
        config: config.clone(),
        db: Arc::new(db),
        identity: Arc::new(identity),
        chat_model: Arc::new(chat_model),
        meal_plan_model: Arc::new(meal_plan_model),
        foods: Arc::new(foods),
        clock: Arc::new(SystemClock),
    });

    // Build router
    let app = nutri_insights::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() -> anyhow::Result<()> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("nutri_insights=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
