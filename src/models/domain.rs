use serde::{Deserialize, Deserializer, Serialize};

/// State placeholder for rows that carry no state
pub const MISSING_STATE: &str = "-";

/// Destination row from the reference dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    #[serde(rename = "Destination")]
    pub name: String,
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "State", default = "missing_state", deserialize_with = "deserialize_state")]
    pub state: String,
    #[serde(rename = "SourceCity", default)]
    pub source_city: String,
    #[serde(rename = "Climate")]
    pub climate: String,
    #[serde(rename = "BudgetLevel")]
    pub budget_level: String,
    #[serde(rename = "AvgCostINR")]
    pub avg_cost_inr: f64,
    #[serde(rename = "PopularityScore")]
    pub popularity_score: f64,
    #[serde(rename = "AvgTempC")]
    pub avg_temp_c: f64,
    #[serde(rename = "Rating")]
    pub rating: f64,
    #[serde(rename = "SafetyIndex")]
    pub safety_index: f64,
    #[serde(rename = "Accessibility")]
    pub accessibility: String,
    #[serde(rename = "TransportCostINR")]
    pub transport_cost_inr: f64,
    #[serde(rename = "Activities", default)]
    pub activities: String,
}

fn missing_state() -> String {
    MISSING_STATE.to_string()
}

fn deserialize_state<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let state: Option<String> = Option::deserialize(deserializer)?;
    Ok(state.unwrap_or_else(missing_state))
}

impl Destination {
    /// Value of a string column by its dataset name
    pub fn categorical(&self, column: &str) -> Option<&str> {
        let value = match column {
            "Destination" => &self.name,
            "Country" => &self.country,
            "State" => &self.state,
            "SourceCity" => &self.source_city,
            "Climate" => &self.climate,
            "BudgetLevel" => &self.budget_level,
            "Accessibility" => &self.accessibility,
            "Activities" => &self.activities,
            _ => return None,
        };
        Some(value.as_str())
    }

    /// Value of a numeric column by its dataset name
    pub fn numeric(&self, column: &str) -> Option<f64> {
        match column {
            "AvgCostINR" => Some(self.avg_cost_inr),
            "PopularityScore" => Some(self.popularity_score),
            "AvgTempC" => Some(self.avg_temp_c),
            "Rating" => Some(self.rating),
            "SafetyIndex" => Some(self.safety_index),
            "TransportCostINR" => Some(self.transport_cost_inr),
            _ => None,
        }
    }
}

/// Projection of a destination returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "Destination")]
    pub destination: String,
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "SourceCity")]
    pub source_city: String,
    #[serde(rename = "Climate")]
    pub climate: String,
    #[serde(rename = "BudgetLevel")]
    pub budget_level: String,
    #[serde(rename = "AvgCostINR")]
    pub avg_cost_inr: f64,
    #[serde(rename = "Activities")]
    pub activities: String,
    #[serde(rename = "Rating")]
    pub rating: f64,
    #[serde(rename = "SafetyIndex")]
    pub safety_index: f64,
    #[serde(rename = "TransportCostINR")]
    pub transport_cost_inr: f64,
}

impl From<&Destination> for Recommendation {
    fn from(destination: &Destination) -> Self {
        Self {
            destination: destination.name.clone(),
            country: destination.country.clone(),
            state: destination.state.clone(),
            source_city: destination.source_city.clone(),
            climate: destination.climate.clone(),
            budget_level: destination.budget_level.clone(),
            avg_cost_inr: destination.avg_cost_inr,
            activities: destination.activities.clone(),
            rating: destination.rating,
            safety_index: destination.safety_index,
            transport_cost_inr: destination.transport_cost_inr,
        }
    }
}

/// Query after validation, in the shape the pipeline consumes
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationQuery {
    pub location: String,
    pub state: Option<String>,
    pub climate: String,
    pub budget_level: String,
    pub avg_cost_inr: f64,
    pub popularity_score: f64,
    pub avg_temp_c: f64,
    pub rating: f64,
    pub safety_index: f64,
    pub accessibility: String,
    pub transport_cost_inr: f64,
    pub top_k: usize,
}

/// Coarse location filter settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationPolicy {
    /// Location value that selects the home country's rows
    pub home_country: String,
    /// State value meaning "no state restriction"
    pub any_state: String,
}

impl Default for LocationPolicy {
    fn default() -> Self {
        Self {
            home_country: "India".to_string(),
            any_state: "Any State".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_state_becomes_placeholder() {
        let json = serde_json::json!({
            "Destination": "Paris",
            "Country": "France",
            "State": null,
            "SourceCity": "Delhi",
            "Climate": "Temperate",
            "BudgetLevel": "High",
            "AvgCostINR": 150000.0,
            "PopularityScore": 95.0,
            "AvgTempC": 15.0,
            "Rating": 4.7,
            "SafetyIndex": 7.5,
            "Accessibility": "Easy",
            "TransportCostINR": 60000.0,
            "Activities": "Museums"
        });

        let destination: Destination = serde_json::from_value(json).unwrap();
        assert_eq!(destination.state, MISSING_STATE);
        assert_eq!(destination.categorical("Country"), Some("France"));
        assert_eq!(destination.numeric("Rating"), Some(4.7));
        assert_eq!(destination.numeric("Country"), None);
    }
}
