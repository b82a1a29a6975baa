use serde::{de, Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::models::domain::RecommendationQuery;

/// Request body of `POST /predict`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PredictRequest {
    #[validate(length(min = 1))]
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "State", default)]
    pub state: Option<String>,
    #[serde(rename = "Climate")]
    pub climate: String,
    #[serde(rename = "BudgetLevel")]
    pub budget_level: String,
    #[serde(rename = "AvgCostINR", deserialize_with = "deserialize_number")]
    pub avg_cost_inr: f64,
    #[serde(rename = "PopularityScore", deserialize_with = "deserialize_number")]
    pub popularity_score: f64,
    #[serde(rename = "AvgTempC", deserialize_with = "deserialize_number")]
    pub avg_temp_c: f64,
    #[serde(rename = "Rating", deserialize_with = "deserialize_number")]
    pub rating: f64,
    #[serde(rename = "SafetyIndex", deserialize_with = "deserialize_number")]
    pub safety_index: f64,
    #[serde(rename = "Accessibility")]
    pub accessibility: String,
    #[serde(rename = "TransportCostINR", deserialize_with = "deserialize_number")]
    pub transport_cost_inr: f64,
    #[validate(range(min = 1))]
    #[serde(default)]
    pub top_k: Option<usize>,
}

impl PredictRequest {
    /// Convert into a pipeline query, filling in the default result count
    pub fn into_query(self, default_top_k: usize) -> RecommendationQuery {
        RecommendationQuery {
            location: self.location,
            state: self.state,
            climate: self.climate,
            budget_level: self.budget_level,
            avg_cost_inr: self.avg_cost_inr,
            popularity_score: self.popularity_score,
            avg_temp_c: self.avg_temp_c,
            rating: self.rating,
            safety_index: self.safety_index,
            accessibility: self.accessibility,
            transport_cost_inr: self.transport_cost_inr,
            top_k: self.top_k.unwrap_or(default_top_k),
        }
    }
}

/// Accept a JSON number or a string holding one; the result must be finite
fn deserialize_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        String(String),
    }

    let value = match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => n,
        NumberOrString::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| de::Error::custom(format!("invalid number '{}'", s)))?,
    };

    if value.is_finite() {
        Ok(value)
    } else {
        Err(de::Error::custom(format!("number must be finite, got {}", value)))
    }
}

/// Query string of `GET /states`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatesQuery {
    pub country: Option<String>,
}
