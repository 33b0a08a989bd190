// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Coordinates, LocationVisit, MenuItem, PlannerSettings, Restaurant, RestaurantImage,
    ScoredCandidate, Tag, Tour, TourStop, TourStrategy,
};
pub use requests::{
    AnalyticsQuery, DeleteRestaurantRequest, ImageRequest, LocationRequest, LoginRequest,
    MenuItemRequest, PlanTourRequest, RestaurantRequest, TagRequest, TrackAudioRequest,
    TrackLocationRequest, VisitsQuery,
};
pub use responses::{
    ErrorResponse, HealthResponse, LoginResponse, Narration, NearestResponse, PlanTourResponse,
    StatusResponse, TagsResponse, TrackResponse,
};
