use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder for any field the parser could not extract.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherData {
    pub temperature: String,
    pub condition: String,
    pub humidity: String,
    pub wind_speed: String,
}

impl Default for WeatherData {
    fn default() -> Self {
        Self {
            temperature: NOT_AVAILABLE.to_string(),
            condition: NOT_AVAILABLE.to_string(),
            humidity: NOT_AVAILABLE.to_string(),
            wind_speed: NOT_AVAILABLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AqiData {
    pub value: String,
    pub category: String,
}

impl Default for AqiData {
    fn default() -> Self {
        Self {
            value: NOT_AVAILABLE.to_string(),
            category: NOT_AVAILABLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    /// Usually a maps link, sometimes free text.
    pub description: String,
}

/// Structured travel brief extracted from the model's markdown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelInfo {
    pub weather: WeatherData,
    pub aqi: AqiData,
    pub clothing: Vec<String>,
    pub places_to_visit: Vec<Place>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingSource {
    pub uri: String,
    pub title: String,
}

/// Provenance attached by the search-grounded backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroundingChunk {
    Web(GroundingSource),
    Maps(GroundingSource),
}

impl GroundingChunk {
    pub fn kind(&self) -> &'static str {
        match self {
            GroundingChunk::Web(_) => "web",
            GroundingChunk::Maps(_) => "maps",
        }
    }

    pub fn source(&self) -> &GroundingSource {
        match self {
            GroundingChunk::Web(source) | GroundingChunk::Maps(source) => source,
        }
    }
}

/// Raw result of a single backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderResponse {
    pub text: String,
    pub grounding_chunks: Vec<GroundingChunk>,
}

/// One search: what was asked, when, and what came back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelBrief {
    pub location: String,
    pub fetched_at: DateTime<Utc>,
    pub info: TravelInfo,
    pub sources: Vec<GroundingChunk>,
}
