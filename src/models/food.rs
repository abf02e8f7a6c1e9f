//! FoodData Central payloads and the condensed shapes served to the frontend.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

// ─── Upstream payloads ───────────────────────────────────────

/// `GET /foods/search` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UsdaSearchResponse {
    #[serde(default)]
    pub foods: Vec<UsdaFood>,
}

/// A food item as returned by search, `GET /food/{id}` and `POST /foods`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsdaFood {
    pub fdc_id: Option<u64>,
    pub description: Option<String>,
    pub brand_owner: Option<String>,
    pub data_type: Option<String>,
    #[serde(default)]
    pub food_nutrients: Vec<UsdaFoodNutrient>,
}

/// Nutrient entry. Detail responses nest name/unit under `nutrient` and
/// use `amount`; abridged and search responses flatten them and use `value`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsdaFoodNutrient {
    pub nutrient: Option<UsdaNutrient>,
    pub nutrient_name: Option<String>,
    pub unit_name: Option<String>,
    pub amount: Option<f64>,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsdaNutrient {
    pub name: Option<String>,
    pub unit_name: Option<String>,
}

impl UsdaFoodNutrient {
    fn name(&self) -> Option<&str> {
        self.nutrient
            .as_ref()
            .and_then(|n| n.name.as_deref())
            .or(self.nutrient_name.as_deref())
    }

    fn unit(&self) -> String {
        self.nutrient
            .as_ref()
            .and_then(|n| n.unit_name.as_deref())
            .or(self.unit_name.as_deref())
            .unwrap_or_default()
            .to_lowercase()
    }

    fn quantity(&self) -> Option<f64> {
        self.amount.or(self.value)
    }
}

// ─── Frontend shapes ─────────────────────────────────────────

/// One search hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FoodSummary {
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub id: Option<u64>,
    pub name: Option<String>,
    pub brand: Option<String>,
    #[serde(rename = "dataType")]
    pub data_type: Option<String>,
}

/// Macro totals in grams (calories in kcal) plus everything else as text.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct NutrientSummary {
    pub calories: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
    pub fiber: f64,
    pub micronutrients: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct FoodDetails {
    #[serde(rename = "fdcId")]
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub fdc_id: Option<u64>,
    pub name: Option<String>,
    pub brand: Option<String>,
    pub nutrients: NutrientSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Macro {
    Calories,
    Protein,
    Fat,
    Carbs,
    Fiber,
}

/// Checked in order; the first substring match wins.
const MACRO_NAMES: [(&str, Macro); 5] = [
    ("energy", Macro::Calories),
    ("protein", Macro::Protein),
    ("total lipid (fat)", Macro::Fat),
    ("carbohydrate, by difference", Macro::Carbs),
    ("fiber, total dietary", Macro::Fiber),
];

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Convert a mass in `unit` to grams.
fn to_grams(value: f64, unit: &str) -> f64 {
    match unit {
        "mg" => value / 1_000.0,
        "µg" | "ug" => value / 1_000_000.0,
        _ => value,
    }
}

impl FoodSummary {
    pub fn from_usda(food: &UsdaFood) -> Self {
        Self {
            id: food.fdc_id,
            name: food.description.clone(),
            brand: food.brand_owner.clone(),
            data_type: food.data_type.clone(),
        }
    }
}

/// Condense a search response.
pub fn summarize_search(response: &UsdaSearchResponse) -> Vec<FoodSummary> {
    response.foods.iter().map(FoodSummary::from_usda).collect()
}

impl NutrientSummary {
    pub fn from_usda(nutrients: &[UsdaFoodNutrient]) -> Self {
        let mut summary = Self::default();

        for nutrient in nutrients {
            let Some(name) = nutrient.name() else {
                continue;
            };
            let unit = nutrient.unit();
            let lower = name.to_lowercase();

            let mapped = MACRO_NAMES
                .iter()
                .find(|(key, _)| lower.contains(key))
                .map(|(_, m)| *m)
                // Energy is also reported in kJ; only kcal feeds the calorie total.
                .filter(|m| !(*m == Macro::Calories && unit == "kj"));

            match (mapped, nutrient.quantity()) {
                (Some(m), quantity) => {
                    let value = quantity.unwrap_or(0.0);
                    let value = if m == Macro::Calories {
                        value
                    } else {
                        to_grams(value, &unit)
                    };
                    let slot = match m {
                        Macro::Calories => &mut summary.calories,
                        Macro::Protein => &mut summary.protein,
                        Macro::Fat => &mut summary.fat,
                        Macro::Carbs => &mut summary.carbs,
                        Macro::Fiber => &mut summary.fiber,
                    };
                    *slot = round2(value);
                }
                (None, Some(value)) => {
                    summary
                        .micronutrients
                        .insert(name.to_string(), format!("{} {}", value, unit));
                }
                (None, None) => {}
            }
        }

        summary
    }
}

impl FoodDetails {
    pub fn from_usda(food: &UsdaFood) -> Self {
        Self {
            fdc_id: food.fdc_id,
            name: food.description.clone(),
            brand: food.brand_owner.clone(),
            nutrients: NutrientSummary::from_usda(&food.food_nutrients),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn food_from(json: serde_json::Value) -> UsdaFood {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_summarize_search() {
        let response: UsdaSearchResponse = serde_json::from_value(serde_json::json!({
            "totalHits": 2,
            "foods": [
                {"fdcId": 1, "description": "APPLE", "dataType": "Foundation"},
                {"fdcId": 2, "description": "Apple chips", "brandOwner": "Acme", "dataType": "Branded"}
            ]
        }))
        .unwrap();

        let results = summarize_search(&response);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].brand, None);
        assert_eq!(results[1].brand.as_deref(), Some("Acme"));

        let json = serde_json::to_value(&results[1]).unwrap();
        assert_eq!(json["dataType"], "Branded");
        assert_eq!(json["id"], 2);
    }

    #[test]
    fn test_details_maps_macros_and_converts_units() {
        let food = food_from(serde_json::json!({
            "fdcId": 171688,
            "description": "Apples, raw",
            "foodNutrients": [
                {"nutrient": {"name": "Energy", "unitName": "kcal"}, "amount": 52},
                {"nutrient": {"name": "Energy", "unitName": "kJ"}, "amount": 218},
                {"nutrient": {"name": "Protein", "unitName": "g"}, "amount": 0.26},
                {"nutrient": {"name": "Total lipid (fat)", "unitName": "g"}, "amount": 0.17},
                {"nutrient": {"name": "Carbohydrate, by difference", "unitName": "g"}, "amount": 13.812},
                {"nutrient": {"name": "Fiber, total dietary", "unitName": "mg"}, "amount": 2400},
                {"nutrient": {"name": "Vitamin C, total ascorbic acid", "unitName": "mg"}, "amount": 4.6}
            ]
        }));

        let details = FoodDetails::from_usda(&food);
        assert_eq!(details.fdc_id, Some(171688));
        assert_eq!(details.nutrients.calories, 52.0);
        assert_eq!(details.nutrients.protein, 0.26);
        assert_eq!(details.nutrients.carbs, 13.81);
        assert_eq!(details.nutrients.fiber, 2.4);
        assert_eq!(
            details.nutrients.micronutrients.get("Vitamin C, total ascorbic acid"),
            Some(&"4.6 mg".to_string())
        );
        assert_eq!(
            details.nutrients.micronutrients.get("Energy"),
            Some(&"218 kj".to_string())
        );
    }

    #[test]
    fn test_details_accepts_flattened_nutrients() {
        let food = food_from(serde_json::json!({
            "fdcId": 5,
            "description": "Chicken",
            "foodNutrients": [
                {"nutrientName": "Protein", "unitName": "G", "value": 31.02},
                {"nutrientName": "Iron, Fe", "unitName": "MG", "value": 1.04},
                {"nutrientName": "Water", "unitName": "G"}
            ]
        }));

        let nutrients = FoodDetails::from_usda(&food).nutrients;
        assert_eq!(nutrients.protein, 31.02);
        assert_eq!(nutrients.micronutrients.len(), 1);
        assert_eq!(nutrients.micronutrients["Iron, Fe"], "1.04 mg");
    }

    #[test]
    fn test_microgram_macros_convert_to_grams() {
        let food = food_from(serde_json::json!({
            "foodNutrients": [
                {"nutrient": {"name": "Protein", "unitName": "µg"}, "amount": 2500000}
            ]
        }));
        assert_eq!(FoodDetails::from_usda(&food).nutrients.protein, 2.5);
    }
}
