// Route exports
pub mod admin;
pub mod user;

use actix_web::{web, HttpResponse};
use std::sync::Arc;
use validator::ValidationErrors;

use crate::core::TourPlanner;
use crate::models::ErrorResponse;
use crate::services::{AdminAuth, CacheManager, RestaurantStore, SpeechClient, StoreError, TranslationClient};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RestaurantStore>,
    pub cache: Arc<CacheManager>,
    pub translator: Arc<TranslationClient>,
    pub speech: Arc<SpeechClient>,
    pub auth: Arc<AdminAuth>,
    pub planner: TourPlanner,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(user::configure)
        .service(web::scope("/admin").configure(admin::configure));
}

pub(crate) fn error_response(status_code: u16, error: &str, message: impl Into<String>) -> HttpResponse {
    let status = actix_web::http::StatusCode::from_u16(status_code)
        .unwrap_or(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR);

    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message: message.into(),
        status_code,
    })
}

pub(crate) fn validation_failed(errors: ValidationErrors) -> HttpResponse {
    error_response(400, "Validation failed", errors.to_string())
}

/// Map a store failure onto an HTTP response
pub(crate) fn store_failed(context: &str, err: StoreError) -> HttpResponse {
    match err {
        StoreError::NotFound(message) => error_response(404, "Not found", message),
        StoreError::Conflict(message) => error_response(409, "Conflict", message),
        other => {
            tracing::error!("{}: {}", context, other);
            error_response(500, context, other.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn test_store_errors_map_to_status() {
        let not_found = store_failed("Failed to load restaurant", StoreError::NotFound("Restaurant 9 not found".into()));
        assert_eq!(not_found.status(), 404);

        let conflict = store_failed("Failed to create tag", StoreError::Conflict("Tag exists".into()));
        assert_eq!(conflict.status(), 409);

        let body = to_bytes(conflict.into_body()).await.unwrap();
        let parsed: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.status_code, 409);
        assert_eq!(parsed.message, "Tag exists");
    }
}
