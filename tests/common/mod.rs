// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request};
use chrono::{Days, NaiveDate};
use dashmap::DashMap;
use nutri_insights::config::Config;
use nutri_insights::db::{FirestoreDb, MemoryDb, ProfileStore};
use nutri_insights::error::AppError;
use nutri_insights::models::food::{UsdaFood, UsdaSearchResponse};
use nutri_insights::models::{ChatMessage, HealthDetails, UserProfile};
use nutri_insights::routes::create_router;
use nutri_insights::services::{
    ChatModel, FoodDataSource, IdentityProvider, IdentityUser, TokenService,
};
use nutri_insights::time_utils::Clock;
use nutri_insights::AppState;
use std::sync::{Arc, Mutex};

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

// ─── Fakes ───────────────────────────────────────────────────

/// Identity provider keeping accounts in memory.
#[derive(Default)]
pub struct FakeIdentity {
    /// email -> (uid, password)
    accounts: DashMap<String, (String, String)>,
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn create_user(&self, email: &str, password: &str) -> Result<IdentityUser, AppError> {
        if self.accounts.contains_key(email) {
            return Err(AppError::Identity("EMAIL_EXISTS".to_string()));
        }
        let uid = format!("uid-{}", self.accounts.len() + 1);
        self.accounts
            .insert(email.to_string(), (uid.clone(), password.to_string()));
        Ok(IdentityUser {
            uid,
            email: email.to_string(),
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<IdentityUser, AppError> {
        match self.accounts.get(email) {
            Some(account) if account.1 == password => Ok(IdentityUser {
                uid: account.0.clone(),
                email: email.to_string(),
            }),
            _ => Err(AppError::InvalidLogin),
        }
    }
}

/// One recorded call to a [`ScriptedModel`].
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct ModelCall {
    pub system_prompt: String,
    pub messages: Vec<ChatMessage>,
}

/// Model that answers every call with a fixed reply, or fails when none is set.
#[derive(Default)]
pub struct ScriptedModel {
    reply: Mutex<Option<String>>,
    calls: Mutex<Vec<ModelCall>>,
}

#[allow(dead_code)]
impl ScriptedModel {
    pub fn replying(reply: &str) -> Self {
        let model = Self::default();
        model.set_reply(Some(reply));
        model
    }

    pub fn set_reply(&self, reply: Option<&str>) {
        *self.reply.lock().unwrap() = reply.map(str::to_string);
    }

    pub fn calls(&self) -> Vec<ModelCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(
        &self,
        system_prompt: &str,
        messages: &[ChatMessage],
    ) -> Result<String, AppError> {
        self.calls.lock().unwrap().push(ModelCall {
            system_prompt: system_prompt.to_string(),
            messages: messages.to_vec(),
        });
        self.reply
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| AppError::Upstream("scripted model failure".to_string()))
    }
}

/// Food source serving canned FoodData Central documents.
#[derive(Default)]
pub struct FakeFoods {
    foods: Vec<UsdaFood>,
}

#[allow(dead_code)]
impl FakeFoods {
    pub fn with_foods(foods: serde_json::Value) -> Self {
        Self {
            foods: serde_json::from_value(foods).unwrap(),
        }
    }
}

#[async_trait]
impl FoodDataSource for FakeFoods {
    async fn search(&self, query: &str, page_size: u32) -> Result<UsdaSearchResponse, AppError> {
        let query = query.to_lowercase();
        let foods = self
            .foods
            .iter()
            .filter(|f| {
                f.description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&query))
            })
            .take(page_size as usize)
            .cloned()
            .collect();
        Ok(UsdaSearchResponse { foods })
    }

    async fn food(&self, fdc_id: u64) -> Result<UsdaFood, AppError> {
        self.foods
            .iter()
            .find(|f| f.fdc_id == Some(fdc_id))
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Food {} not found", fdc_id)))
    }

    async fn foods(&self, fdc_ids: &[u64]) -> Result<Vec<UsdaFood>, AppError> {
        Ok(self
            .foods
            .iter()
            .filter(|f| f.fdc_id.is_some_and(|id| fdc_ids.contains(&id)))
            .cloned()
            .collect())
    }
}

/// FoodData Central documents shared by the nutrition tests.
#[allow(dead_code)]
pub fn sample_foods() -> serde_json::Value {
    serde_json::json!([
        {
            "fdcId": 171688,
            "description": "Apples, raw, with skin",
            "dataType": "SR Legacy",
            "foodNutrients": [
                {"nutrient": {"name": "Energy", "unitName": "kcal"}, "amount": 52.0},
                {"nutrient": {"name": "Protein", "unitName": "g"}, "amount": 0.26},
                {"nutrient": {"name": "Total lipid (fat)", "unitName": "g"}, "amount": 0.17},
                {"nutrient": {"name": "Carbohydrate, by difference", "unitName": "g"}, "amount": 13.81},
                {"nutrient": {"name": "Fiber, total dietary", "unitName": "g"}, "amount": 2.4},
                {"nutrient": {"name": "Vitamin C, total ascorbic acid", "unitName": "mg"}, "amount": 4.6}
            ]
        },
        {
            "fdcId": 2344720,
            "description": "Apple juice",
            "brandOwner": "Orchard Co",
            "dataType": "Branded",
            "foodNutrients": [
                {"nutrientName": "Energy", "unitName": "KCAL", "value": 46.0},
                {"nutrientName": "Protein", "unitName": "MG", "value": 100.0}
            ]
        },
        {
            "fdcId": 173944,
            "description": "Bananas, raw",
            "dataType": "SR Legacy",
            "foodNutrients": []
        }
    ])
}

/// Model output for a complete week, every day identical.
#[allow(dead_code)]
pub fn sample_plan_json() -> serde_json::Value {
    let meal = |name: &str, calories: f64| {
        serde_json::json!({
            "name": name,
            "ingredients": "oats, milk",
            "portionSize": "1 bowl",
            "calories": calories,
            "protein": 12,
            "carbs": 40,
            "fat": 6
        })
    };
    let day = serde_json::json!({
        "Breakfast": meal("Oatmeal", 300.0),
        "Lunch": meal("Lentil soup", 450.0),
        "Dinner": meal("Tofu stir fry", 550.0),
        "Snack": meal("Apple", 95.0)
    });

    let mut week = serde_json::Map::new();
    for name in [
        "Sunday",
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
    ] {
        week.insert(name.to_string(), day.clone());
    }
    serde_json::json!({ "mealPlan": week })
}

/// Day the test clock starts on.
#[allow(dead_code)]
pub fn test_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
}

/// Clock that only moves when a test advances it.
pub struct FixedClock {
    today: Mutex<NaiveDate>,
}

#[allow(dead_code)]
impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today: Mutex::new(today),
        }
    }

    pub fn advance(&self, days: u64) {
        let mut today = self.today.lock().unwrap();
        *today = today.checked_add_days(Days::new(days)).unwrap();
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        *self.today.lock().unwrap()
    }
}

// ─── App ─────────────────────────────────────────────────────

/// Router plus handles on every fake behind it.
#[allow(dead_code)]
pub struct TestApp {
    pub router: axum::Router,
    pub state: Arc<AppState>,
    pub db: MemoryDb,
    pub identity: Arc<FakeIdentity>,
    pub chat_model: Arc<ScriptedModel>,
    pub meal_plan_model: Arc<ScriptedModel>,
    pub clock: Arc<FixedClock>,
}

#[allow(dead_code)]
impl TestApp {
    /// Session token for `uid` signed with the app's key.
    pub fn token_for(&self, uid: &str) -> String {
        self.state.tokens.issue(uid, None).unwrap()
    }

    pub fn tokens(&self) -> &TokenService {
        &self.state.tokens
    }

    /// Store a profile for `uid` directly, bypassing registration.
    pub async fn seed_profile(&self, uid: &str, health_details: HealthDetails) -> UserProfile {
        let profile = UserProfile {
            uid: uid.to_string(),
            email: format!("{}@example.com", uid),
            name: "Test User".to_string(),
            created_at: "2024-01-01T00:00:00Z".to_string(),
            health_details,
        };
        self.db.upsert_user(&profile).await.unwrap();
        profile
    }
}

/// Create a test app backed by the in-memory store and fakes.
#[allow(dead_code)]
pub fn create_test_app() -> TestApp {
    let config = Config::test_default();
    let db = MemoryDb::new();
    let chat_model = Arc::new(ScriptedModel::replying("Eat more leafy greens."));
    let meal_plan_model = Arc::new(ScriptedModel::default());
    let identity = Arc::new(FakeIdentity::default());
    let clock = Arc::new(FixedClock::new(test_today()));

    let state = Arc::new(AppState {
        tokens: TokenService::from_config(&config),
        config,
        db: Arc::new(db.clone()),
        identity: identity.clone(),
        chat_model: chat_model.clone(),
        meal_plan_model: meal_plan_model.clone(),
        foods: Arc::new(FakeFoods::with_foods(sample_foods())),
        clock: clock.clone(),
    });

    TestApp {
        router: create_router(state.clone()),
        state,
        db,
        identity,
        chat_model,
        meal_plan_model,
        clock,
    }
}

// ─── Requests ────────────────────────────────────────────────

/// Build a request with an optional bearer token and JSON body.
#[allow(dead_code)]
pub fn request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
