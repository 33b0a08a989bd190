use serde::{Deserialize, Serialize};
use crate::models::domain::{Restaurant, Tag, Tour};

/// Response for the tour planning endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanTourResponse {
    pub status: String,
    pub tours: Vec<Tour>,
    pub total_restaurants: usize,
}

/// Response for the nearest restaurant endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearestResponse {
    pub status: String,
    pub language: String,
    pub narration: String,
    pub audio_url: Option<String>,
    pub distance_km: f64,
    pub nearest_place: Restaurant,
}

/// Translated narration and its synthesized audio, cached per restaurant and language
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Narration {
    pub text: String,
    pub audio_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagsResponse {
    pub status: String,
    pub tags: Vec<Tag>,
}

/// Response for the analytics tracking endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackResponse {
    pub status: String,
    pub restaurant_id: Option<i32>,
    pub count: Option<i64>,
    pub average: Option<i64>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Generic status response, e.g. `{"status": "hidden"}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StatusResponse {
    pub fn new(status: &str) -> Self {
        Self {
            status: status.to_string(),
            id: None,
            message: None,
        }
    }

    pub fn with_id(status: &str, id: i32) -> Self {
        Self {
            id: Some(id),
            ..Self::new(status)
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::new("error")
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub status: String,
    pub token: String,
    pub expires_at: i64,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
