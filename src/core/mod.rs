// Core algorithm exports
pub mod analytics;
pub mod distance;
pub mod filters;
pub mod locator;
pub mod narration;
pub mod planner;
pub mod scoring;

pub use analytics::{AnalyticsEvent, Metric, RunningMean};
pub use distance::{distance_between, haversine_distance, round_to};
pub use filters::{filter_candidates, matches_tags, matching_tag_count};
pub use locator::{attribute_visit, find_nearest, NearestMatch};
pub use narration::{generate_narration, SOURCE_LANGUAGE};
pub use planner::{build_tour, order_candidates, PlanError, TourPlan, TourPlanner, TourQuery};
pub use scoring::{average_menu_price, score_candidate};
