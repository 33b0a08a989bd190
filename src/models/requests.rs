use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request for the nearest restaurant and its narration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LocationRequest {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    #[serde(default = "default_language")]
    #[validate(length(min = 2, max = 10))]
    pub language: String,
}

fn default_language() -> String {
    "vi".to_string()
}

/// Request to plan food tours
///
/// Budgets are deliberately not validated: non-positive or non-finite
/// values produce an empty tour list instead of an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanTourRequest {
    pub time_limit: f64,
    pub budget: f64,
    #[serde(default)]
    pub tags: Vec<i32>,
    #[serde(default)]
    pub user_lat: Option<f64>,
    #[serde(default)]
    pub user_lng: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TrackLocationRequest {
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,
    #[validate(range(min = 0))]
    pub duration_seconds: i64,
    #[serde(default)]
    pub restaurant_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TrackAudioRequest {
    pub restaurant_id: i32,
    #[validate(range(min = 0))]
    pub duration_seconds: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: String,
}

/// Create or update a restaurant
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RestaurantRequest {
    #[validate(length(min = 1, max = 100, message = "Restaurant name must not be empty"))]
    pub name: String,
    #[validate(range(min = -90.0, max = 90.0, message = "Invalid latitude"))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0, message = "Invalid longitude"))]
    pub lng: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[validate(range(min = 1, message = "Eating time must be a positive number of minutes"))]
    pub avg_eat_time: i32,
    #[serde(default)]
    #[validate(range(exclusive_min = 0.0, message = "POI radius must be positive"))]
    pub poi_radius_km: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteRestaurantRequest {
    #[serde(default)]
    pub confirm_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MenuItemRequest {
    #[validate(length(min = 1, max = 100, message = "Dish name must not be empty"))]
    pub name: String,
    #[validate(range(min = 1, message = "Price must be a positive integer"))]
    pub price: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TagRequest {
    #[validate(length(min = 1, max = 50, message = "Tag name must not be empty"))]
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ImageRequest {
    #[validate(length(min = 1, message = "Image URL must not be empty"))]
    pub image_url: String,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default)]
    pub is_primary: bool,
}

/// Query string of the admin analytics listing
///
/// `tags` is a comma separated list of tag ids, e.g. `tags=1,4`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyticsQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
}

impl AnalyticsQuery {
    /// Parsed tag ids; entries that are not integers are ignored
    pub fn tag_ids(&self) -> Vec<i32> {
        self.tags
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .filter_map(|part| part.trim().parse().ok())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitsQuery {
    #[serde(default = "default_visit_days")]
    pub days: u32,
}

fn default_visit_days() -> u32 {
    7
}
