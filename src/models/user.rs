//! User profile model for storage and API.

use serde::{Deserialize, Deserializer, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Health details collected at registration.
///
/// Stored as strings exactly as the client sent them; the frontend
/// mixes numeric and free-text input for these fields. Older documents
/// may hold numbers, which are read back as their textual form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HealthDetails {
    #[serde(deserialize_with = "lenient_string")]
    pub age: String,
    #[serde(deserialize_with = "lenient_string")]
    pub gender: String,
    /// Height in centimeters
    #[serde(deserialize_with = "lenient_string")]
    pub height: String,
    /// Weight in kilograms
    #[serde(deserialize_with = "lenient_string")]
    pub weight: String,
    #[serde(deserialize_with = "lenient_string")]
    pub diet_preference: String,
    #[serde(deserialize_with = "lenient_string")]
    pub goal: String,
    #[serde(deserialize_with = "lenient_string")]
    pub activity_level: String,
    #[serde(deserialize_with = "lenient_string")]
    pub allergies: String,
}

/// Daily energy adjustment for weight loss / muscle gain goals (kcal).
const GOAL_ADJUSTMENT_KCAL: f64 = 500.0;

impl HealthDetails {
    /// Activity multiplier applied to the basal metabolic rate.
    fn activity_factor(&self) -> Option<f64> {
        let level = self.activity_level.to_lowercase().replace(['_', '-'], " ");
        if level.contains("sedentary") {
            Some(1.2)
        } else if level.contains("light") {
            Some(1.375)
        } else if level.contains("moderate") {
            Some(1.55)
        } else if level.contains("very") || level.contains("extra") {
            Some(1.725)
        } else {
            None
        }
    }

    fn goal_adjustment(&self) -> f64 {
        let goal = self.goal.to_lowercase();
        if goal.contains("loss") || goal.contains("lose") {
            -GOAL_ADJUSTMENT_KCAL
        } else if goal.contains("gain") || goal.contains("muscle") {
            GOAL_ADJUSTMENT_KCAL
        } else {
            0.0
        }
    }

    /// Mifflin-St Jeor estimate of daily calorie needs, adjusted for
    /// activity and goal. `None` when any input is missing or unparseable.
    pub fn estimated_daily_calories(&self) -> Option<f64> {
        let age: f64 = self.age.trim().parse().ok()?;
        let height: f64 = self.height.trim().parse().ok()?;
        let weight: f64 = self.weight.trim().parse().ok()?;
        if age <= 0.0 || height <= 0.0 || weight <= 0.0 {
            return None;
        }

        let base = 10.0 * weight + 6.25 * height - 5.0 * age;
        let bmr = match self.gender.trim().to_lowercase().as_str() {
            "male" | "m" | "man" => base + 5.0,
            "female" | "f" | "woman" => base - 161.0,
            _ => return None,
        };

        Some((bmr * self.activity_factor()? + self.goal_adjustment()).round())
    }
}

/// User profile stored in Firestore at `users/{uid}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserProfile {
    /// Identity provider user ID (also used as document ID)
    pub uid: String,
    pub email: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    /// When the account was registered (RFC3339)
    #[serde(default, deserialize_with = "lenient_string")]
    pub created_at: String,
    #[serde(rename = "healthDetails", default)]
    pub health_details: HealthDetails,
}

/// Accept a JSON string, number or bool and keep its textual form.
///
/// `null` and absent values become the empty string.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(serde_json::Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    })
}
