// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public food lookup routes backed by FoodData Central.

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::extract::ValidatedJson;
use crate::models::food::summarize_search;
use crate::models::{FoodDetails, FoodSummary};
use crate::services::nutrition::DEFAULT_PAGE_SIZE;
use crate::AppState;

const MAX_PAGE_SIZE: u32 = 50;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/nutrition/search", get(search_foods))
        .route("/api/nutrition/food/{id}", get(get_food))
        .route("/api/nutrition/foods", post(get_foods))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    q: Option<String>,
    #[serde(default, rename = "pageSize")]
    page_size: Option<u32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct FoodsRequest {
    #[serde(rename = "fdcIds")]
    #[validate(length(min = 1, max = 20, message = "Between 1 and 20 fdcIds are required"))]
    fdc_ids: Vec<u64>,
}

/// Search foods by free text.
async fn search_foods(
    State(state): State<Arc<AppState>>,
    query: std::result::Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Vec<FoodSummary>>> {
    let Query(params) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let q = params.q.as_deref().map(str::trim).unwrap_or_default();
    if q.is_empty() {
        return Err(AppError::BadRequest(
            "Query parameter \"q\" is required".to_string(),
        ));
    }

    let page_size = params.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
        return Err(AppError::BadRequest(format!(
            "pageSize must be between 1 and {}",
            MAX_PAGE_SIZE
        )));
    }

    let results = state.foods.search(q, page_size).await?;
    Ok(Json(summarize_search(&results)))
}

/// Nutrient breakdown for one food.
async fn get_food(
    State(state): State<Arc<AppState>>,
    id: std::result::Result<Path<u64>, PathRejection>,
) -> Result<Json<FoodDetails>> {
    let Path(fdc_id) = id.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let food = state.foods.food(fdc_id).await?;
    Ok(Json(FoodDetails::from_usda(&food)))
}

/// Nutrient breakdown for several foods at once.
async fn get_foods(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<FoodsRequest>,
) -> Result<Json<Vec<FoodDetails>>> {
    let foods = state.foods.foods(&req.fdc_ids).await?;
    Ok(Json(foods.iter().map(FoodDetails::from_usda).collect()))
}
