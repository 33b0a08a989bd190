use actix_web::{http::header, web, HttpResponse, Responder};
use validator::Validate;

use super::{error_response, store_failed, validation_failed, AppState};
use crate::core::{
    attribute_visit, find_nearest, generate_narration, round_to, AnalyticsEvent, PlanError, TourPlan,
    TourQuery,
};
use crate::models::{
    Coordinates, HealthResponse, LocationRequest, Narration, NearestResponse, PlanTourRequest,
    PlanTourResponse, Restaurant, StatusResponse, TagsResponse, TrackAudioRequest,
    TrackLocationRequest, TrackResponse,
};
use crate::services::{
    is_supported_language, CacheKey, CacheManager, SpeechClient, TranslationClient, Visibility,
    SUPPORTED_LANGUAGES,
};

/// Configure the public routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/", web::get().to(health_check))
        .route("/health", web::get().to(health_check))
        .route("/location", web::post().to(nearest_restaurant))
        .route("/plan-tour", web::post().to(plan_tour))
        .route("/tags", web::get().to(list_tags))
        .route("/languages", web::get().to(list_languages))
        .route("/track-location", web::post().to(track_location))
        .route("/track-audio", web::post().to(track_audio))
        .route("/static/tts/{file}", web::get().to(serve_audio));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let db_healthy = state.store.health_check().await.unwrap_or(false);

    let status = if db_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Nearest restaurant endpoint
///
/// POST /location
///
/// Request body:
/// ```json
/// { "latitude": 10.7769, "longitude": 106.7009, "language": "en" }
/// ```
async fn nearest_restaurant(
    state: web::Data<AppState>,
    req: web::Json<LocationRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    let Some(language) = narration_language(&req.language) else {
        return error_response(
            400,
            "Validation failed",
            format!("Unsupported language '{}'", req.language),
        );
    };

    let restaurants = match state.store.load_restaurants(Visibility::Active).await {
        Ok(restaurants) => restaurants,
        Err(e) => return store_failed("Failed to load restaurants", e),
    };

    let user = Coordinates::new(req.latitude, req.longitude);
    let Some(nearest) = find_nearest(&user, &restaurants) else {
        return HttpResponse::NotFound().json(StatusResponse::error("No active restaurants"));
    };

    let narration = narration_for(
        nearest.restaurant,
        &language,
        &state.translator,
        &state.speech,
        &state.cache,
    )
    .await;

    tracing::info!(
        "Nearest restaurant to ({}, {}) is {} at {:.3} km",
        req.latitude,
        req.longitude,
        nearest.restaurant.id,
        nearest.distance_km
    );

    HttpResponse::Ok().json(NearestResponse {
        status: "success".to_string(),
        language,
        narration: narration.text,
        audio_url: narration.audio_url,
        distance_km: round_to(nearest.distance_km, 3),
        nearest_place: nearest.restaurant.clone(),
    })
}

/// Normalized narration language, or `None` when it is not offered
///
/// The code ends up in the provider URL, the cache key and the audio file name.
fn narration_language(raw: &str) -> Option<String> {
    let language = raw.trim().to_lowercase();
    is_supported_language(&language).then_some(language)
}

/// Translated and synthesized narration for a restaurant
///
/// Complete results are cached per restaurant and language. A failed
/// translation falls back to the source text and is not cached, nor is a
/// result without audio.
pub async fn narration_for(
    restaurant: &Restaurant,
    language: &str,
    translator: &TranslationClient,
    speech: &SpeechClient,
    cache: &CacheManager,
) -> Narration {
    let key = CacheKey::narration(restaurant.id, language);
    if let Ok(cached) = cache.get::<Narration>(&key).await {
        return cached;
    }

    let source = generate_narration(restaurant);
    let (text, translated) = match translator.translate(&source, language).await {
        Ok(text) => (text, true),
        Err(e) => {
            tracing::warn!("Translation to '{}' failed, using source text: {}", language, e);
            (source, false)
        }
    };

    let audio_url = speech.narration_audio(&text, language, restaurant.id).await;
    let narration = Narration { text, audio_url };

    if translated && narration.audio_url.is_some() {
        if let Err(e) = cache.set(&key, &narration).await {
            tracing::warn!("Failed to cache narration {}: {}", key, e);
        }
    }

    narration
}

/// Plan tour endpoint
///
/// POST /plan-tour
///
/// Request body:
/// ```json
/// { "time_limit": 120, "budget": 300000, "tags": [1, 3], "user_lat": 10.77, "user_lng": 106.70 }
/// ```
async fn plan_tour(
    state: web::Data<AppState>,
    req: web::Json<PlanTourRequest>,
) -> impl Responder {
    let restaurants = match state.store.load_restaurants(Visibility::Active).await {
        Ok(restaurants) => restaurants,
        Err(e) => return store_failed("Failed to load restaurants", e),
    };

    let query = TourQuery::from(&*req);
    plan_response(state.planner.plan(&query, &restaurants), &query)
}

/// Map a planning result onto the `/plan-tour` response
///
/// No matching restaurant is a 404 error envelope. A budget or time limit
/// too tight for any stop is still a success, with no tours.
fn plan_response(result: Result<TourPlan, PlanError>, query: &TourQuery) -> HttpResponse {
    match result {
        Ok(plan) => {
            tracing::info!(
                "Planned {} tours from {} candidates (time_limit={}, budget={}, tags={:?})",
                plan.tours.len(),
                plan.total_restaurants,
                query.time_limit,
                query.budget,
                query.tags
            );

            HttpResponse::Ok().json(PlanTourResponse {
                status: "success".to_string(),
                tours: plan.tours,
                total_restaurants: plan.total_restaurants,
            })
        }
        Err(e @ PlanError::NoCandidates) => {
            tracing::info!("No candidates for tags {:?}", query.tags);
            HttpResponse::NotFound().json(StatusResponse::error(e.to_string()))
        }
    }
}

async fn list_tags(state: web::Data<AppState>) -> impl Responder {
    match state.store.list_tags().await {
        Ok(tags) => HttpResponse::Ok().json(TagsResponse {
            status: "success".to_string(),
            tags,
        }),
        Err(e) => store_failed("Failed to load tags", e),
    }
}

async fn list_languages() -> impl Responder {
    let languages: Vec<_> = SUPPORTED_LANGUAGES
        .iter()
        .map(|(code, label)| serde_json::json!({ "code": code, "label": label }))
        .collect();

    HttpResponse::Ok().json(serde_json::json!({
        "status": "success",
        "languages": languages,
    }))
}

/// Track location endpoint
///
/// POST /track-location
///
/// Stores the ping and, when it belongs to a restaurant (given explicitly
/// or found through the POI radius), folds the duration into its visit
/// analytics.
async fn track_location(
    state: web::Data<AppState>,
    req: web::Json<TrackLocationRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    let restaurant_id = match req.restaurant_id {
        Some(id) => Some(id),
        None => match state.store.load_restaurants(Visibility::Active).await {
            Ok(restaurants) => attribute_visit(&Coordinates::new(req.lat, req.lng), &restaurants)
                .map(|m| m.restaurant.id),
            Err(e) => return store_failed("Failed to load restaurants", e),
        },
    };

    let mean = match restaurant_id {
        Some(id) => match state.store.apply_event(&AnalyticsEvent::visit(id, req.duration_seconds)).await {
            Ok(mean) => Some(mean),
            Err(e) => return store_failed("Failed to update visit analytics", e),
        },
        None => None,
    };

    if let Err(e) = state
        .store
        .record_visit(req.lat, req.lng, req.duration_seconds, restaurant_id)
        .await
    {
        return store_failed("Failed to record visit", e);
    }

    tracing::debug!(
        "Tracked location ({}, {}) for {}s, restaurant={:?}",
        req.lat,
        req.lng,
        req.duration_seconds,
        restaurant_id
    );

    HttpResponse::Ok().json(TrackResponse {
        status: "success".to_string(),
        restaurant_id,
        count: mean.map(|m| m.count),
        average: mean.map(|m| m.avg),
    })
}

/// Track audio endpoint
///
/// POST /track-audio
async fn track_audio(
    state: web::Data<AppState>,
    req: web::Json<TrackAudioRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors);
    }

    let event = AnalyticsEvent::audio_play(req.restaurant_id, req.duration_seconds);
    match state.store.apply_event(&event).await {
        Ok(mean) => HttpResponse::Ok().json(TrackResponse {
            status: "success".to_string(),
            restaurant_id: Some(req.restaurant_id),
            count: Some(mean.count),
            average: Some(mean.avg),
        }),
        Err(e) => store_failed("Failed to update audio analytics", e),
    }
}

/// Serve a synthesized narration file
async fn serve_audio(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let file = path.into_inner();
    if !is_audio_file_name(&file) {
        return error_response(404, "Not found", "Unknown audio file");
    }

    match tokio::fs::read(state.speech.output_dir().join(&file)).await {
        Ok(bytes) => HttpResponse::Ok()
            .insert_header((header::CONTENT_TYPE, "audio/mpeg"))
            .body(bytes),
        Err(_) => error_response(404, "Not found", format!("Audio file {} not found", file)),
    }
}

/// Plain `<name>.mp3` names only, so paths cannot escape the output directory
fn is_audio_file_name(name: &str) -> bool {
    name.strip_suffix(".mp3").is_some_and(|stem| {
        !stem.is_empty()
            && stem
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TourPlanner;
    use crate::models::MenuItem;
    use actix_web::body::to_bytes;
    use mockito::Matcher;
    use std::time::Duration;

    fn restaurant() -> Restaurant {
        Restaurant {
            id: 4,
            name: "Phở Minh".to_string(),
            lat: 10.7769,
            lng: 106.7009,
            description: Some("Phở bò gia truyền".to_string()),
            avg_eat_time: Some(30),
            poi_radius_km: 0.015,
            is_active: true,
            menu: vec![MenuItem {
                id: 1,
                name: "Phở tái".to_string(),
                price: 55_000,
                restaurant_id: 4,
            }],
            tag_ids: vec![],
            images: vec![],
            visit_count: 0,
            avg_visit_duration: 0,
            audio_play_count: 0,
            avg_audio_duration: 0,
        }
    }

    #[test]
    fn test_audio_file_names() {
        assert!(is_audio_file_name("4_en.mp3"));
        assert!(is_audio_file_name("12_zh-CN.mp3"));
        assert!(!is_audio_file_name("../secret.mp3"));
        assert!(!is_audio_file_name(".mp3"));
        assert!(!is_audio_file_name("4_en.wav"));
    }

    fn tour_query(budget: f64, tags: Vec<i32>) -> TourQuery {
        TourQuery {
            time_limit: 120.0,
            budget,
            tags,
            user: None,
        }
    }

    #[actix_web::test]
    async fn test_plan_without_candidates_is_an_error_envelope() {
        let query = tour_query(500_000.0, vec![7]);
        let result = TourPlanner::default().plan(&query, &[restaurant()]);

        let response = plan_response(result, &query);
        assert_eq!(response.status(), 404);

        let body = to_bytes(response.into_body()).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed["status"], "error");
        assert_eq!(parsed["message"], "No restaurants match the selected tags");
    }

    #[actix_web::test]
    async fn test_infeasible_budget_is_an_empty_success() {
        let query = tour_query(10_000.0, vec![]);
        let result = TourPlanner::default().plan(&query, &[restaurant()]);

        let response = plan_response(result, &query);
        assert_eq!(response.status(), 200);

        let body = to_bytes(response.into_body()).await.unwrap();
        let parsed: PlanTourResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.status, "success");
        assert!(parsed.tours.is_empty());
        assert_eq!(parsed.total_restaurants, 1);
    }

    #[test]
    fn test_narration_language_is_normalized_and_checked() {
        assert_eq!(narration_language("EN").as_deref(), Some("en"));
        assert_eq!(narration_language(" zh ").as_deref(), Some("zh"));
        assert!(narration_language("xx").is_none());
        assert!(narration_language("en/../../etc").is_none());
    }

    #[tokio::test]
    async fn test_narration_is_translated_synthesized_and_cached() {
        let mut server = mockito::Server::new_async().await;
        let translate = server
            .mock("GET", Matcher::Regex(r"^/translate_a/single".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[[["Pho Minh. Traditional beef pho.","Phở Minh.",null]],null,"vi"]"#)
            .expect(1)
            .create_async()
            .await;
        let tts = server
            .mock("GET", Matcher::Regex(r"^/translate_tts".to_string()))
            .with_status(200)
            .with_body("ID3")
            .expect(1)
            .create_async()
            .await;

        let dir = std::env::temp_dir().join(format!("nearbite-narration-{}", uuid::Uuid::new_v4()));
        let translator = TranslationClient::new(server.url(), Duration::from_secs(5)).unwrap();
        let speech = SpeechClient::new(server.url(), dir.clone(), "/static/tts".into(), Duration::from_secs(5)).unwrap();
        let cache = CacheManager::in_memory(100, 60);

        let first = narration_for(&restaurant(), "en", &translator, &speech, &cache).await;
        assert_eq!(first.text, "Pho Minh. Traditional beef pho.");
        assert_eq!(first.audio_url.as_deref(), Some("/static/tts/4_en.mp3"));

        // Served from cache: the mocks expect exactly one call each
        let second = narration_for(&restaurant(), "en", &translator, &speech, &cache).await;
        assert_eq!(second, first);

        translate.assert_async().await;
        tts.assert_async().await;
        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn test_failed_translation_falls_back_to_source() {
        let mut server = mockito::Server::new_async().await;
        let _translate = server
            .mock("GET", Matcher::Regex(r"^/translate_a/single".to_string()))
            .with_status(500)
            .create_async()
            .await;
        let _tts = server
            .mock("GET", Matcher::Regex(r"^/translate_tts".to_string()))
            .with_status(500)
            .create_async()
            .await;

        let dir = std::env::temp_dir().join(format!("nearbite-narration-{}", uuid::Uuid::new_v4()));
        let translator = TranslationClient::new(server.url(), Duration::from_secs(5)).unwrap();
        let speech = SpeechClient::new(server.url(), dir, "/static/tts".into(), Duration::from_secs(5)).unwrap();
        let cache = CacheManager::in_memory(100, 60);

        let narration = narration_for(&restaurant(), "fr", &translator, &speech, &cache).await;

        assert_eq!(narration.text, generate_narration(&restaurant()));
        assert!(narration.audio_url.is_none());
        assert!(cache.get::<Narration>(&CacheKey::narration(4, "fr")).await.is_err());
    }
}
