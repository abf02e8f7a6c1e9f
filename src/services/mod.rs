// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic and external clients.

pub mod identity;
pub mod llm;
pub mod nutrition;
pub mod prompts;
pub mod streak;
pub mod token;

pub use identity::{FirebaseAuthClient, IdentityProvider, IdentityUser};
pub use llm::{ChatModel, GeminiClient};
pub use nutrition::{FoodDataSource, UsdaClient, UsdaClientConfig};
pub use streak::StreakTracker;
pub use token::{Claims, TokenError, TokenService};
