use serde::{Deserialize, Serialize};

/// Restaurant with its menu, tag ids, images and running analytics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: i32,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub avg_eat_time: Option<i32>,
    #[serde(default = "default_poi_radius_km")]
    pub poi_radius_km: f64,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub menu: Vec<MenuItem>,
    #[serde(default)]
    pub tag_ids: Vec<i32>,
    #[serde(default)]
    pub images: Vec<RestaurantImage>,
    #[serde(default)]
    pub visit_count: i64,
    #[serde(default)]
    pub avg_visit_duration: i64,
    #[serde(default)]
    pub audio_play_count: i64,
    #[serde(default)]
    pub avg_audio_duration: i64,
}

impl Restaurant {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            lat: self.lat,
            lng: self.lng,
        }
    }
}

pub fn default_poi_radius_km() -> f64 { 0.015 }

fn default_true() -> bool { true }

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: i32,
    pub name: String,
    pub price: i64,
    pub restaurant_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: i32,
    pub name: String,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantImage {
    pub id: i32,
    pub restaurant_id: i32,
    pub image_url: String,
    pub caption: Option<String>,
    pub display_order: i32,
    pub is_primary: bool,
}

/// A WGS84 position in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Restaurant with the derived fields used to order and pack tours
#[derive(Debug, Clone)]
pub struct ScoredCandidate<'a> {
    pub restaurant: &'a Restaurant,
    pub score: i32,
    pub avg_price: f64,
    pub matching_tags: usize,
    pub distance_km: Option<f64>,
}

/// Ordering applied to the scored candidates before greedy packing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TourStrategy {
    BestScore,
    Nearest,
    Cheapest,
}

impl TourStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            TourStrategy::BestScore => "best_score",
            TourStrategy::Nearest => "nearest",
            TourStrategy::Cheapest => "cheapest",
        }
    }
}

impl std::fmt::Display for TourStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of a restaurant placed into an itinerary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourStop {
    pub id: i32,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub avg_price: i64,
    pub score: i32,
    pub matching_tags: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    pub images: Vec<RestaurantImage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tour {
    pub strategy: TourStrategy,
    pub restaurants: Vec<TourStop>,
    pub total_time: u32,
    pub total_cost: i64,
    pub num_stops: usize,
}

impl Tour {
    pub fn stop_ids(&self) -> Vec<i32> {
        self.restaurants.iter().map(|stop| stop.id).collect()
    }
}

/// Geo point recorded by the tracking endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationVisit {
    pub id: i64,
    pub lat: f64,
    pub lng: f64,
    pub duration_seconds: i64,
    pub restaurant_id: Option<i32>,
    pub recorded_at: chrono::DateTime<chrono::Utc>,
}

/// Tunables for the tour planner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannerSettings {
    pub per_stop_minutes: u32,
    pub max_stops: usize,
    pub fallback_avg_price: f64,
    pub tag_match_points: i32,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            per_stop_minutes: 30,
            max_stops: 5,
            fallback_avg_price: 50_000.0,
            tag_match_points: 10,
        }
    }
}
