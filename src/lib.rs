//! Nearbite - Location-aware restaurant discovery service
//!
//! This library provides the food tour planner, the nearest-restaurant
//! locator and the visit analytics used by the Nearbite backend, together
//! with the HTTP routes and service clients around them.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{find_nearest, haversine_distance, PlanError, RunningMean, TourPlanner, TourQuery};
pub use models::{Coordinates, MenuItem, PlanTourRequest, PlanTourResponse, PlannerSettings, Restaurant, Tour, TourStrategy};
