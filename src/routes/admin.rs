use actix_web::{http::header, web, HttpRequest, HttpResponse, Responder};
use std::collections::HashSet;
use validator::Validate;

use super::{error_response, store_failed, validation_failed, AppState};
use crate::models::{
    AnalyticsQuery, DeleteRestaurantRequest, ImageRequest, LoginRequest, LoginResponse,
    MenuItemRequest, Restaurant, RestaurantRequest, StatusResponse, TagRequest, VisitsQuery,
};
use crate::services::{AdminClaims, AuthError, CacheKey, Visibility};

/// Configure the admin routes (mounted under `/admin`)
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/login", web::post().to(login))
        .route("/check", web::get().to(check))
        .route("/logout", web::post().to(logout))
        .route("/restaurants", web::get().to(list_restaurants))
        .route("/restaurants", web::post().to(create_restaurant))
        .route("/restaurants/hidden", web::get().to(list_hidden))
        .route("/restaurants/analytics", web::get().to(restaurant_analytics))
        .route("/restaurants/{id}", web::get().to(restaurant_details))
        .route("/restaurants/{id}", web::put().to(update_restaurant))
        .route("/restaurants/{id}", web::delete().to(delete_restaurant))
        .route("/restaurants/{id}/hide", web::put().to(hide_restaurant))
        .route("/restaurants/{id}/restore", web::put().to(restore_restaurant))
        .route("/restaurants/{id}/menu", web::get().to(list_menu))
        .route("/restaurants/{id}/menu", web::post().to(add_menu_item))
        .route("/restaurants/{id}/tags/{tag_id}", web::post().to(attach_tag))
        .route("/restaurants/{id}/tags/{tag_id}", web::delete().to(detach_tag))
        .route("/restaurants/{id}/images", web::post().to(add_image))
        .route("/menu/{id}", web::put().to(update_menu_item))
        .route("/menu/{id}", web::delete().to(delete_menu_item))
        .route("/tags", web::get().to(list_tags))
        .route("/tags", web::post().to(create_tag))
        .route("/tags/{id}", web::put().to(update_tag))
        .route("/tags/{id}", web::delete().to(delete_tag))
        .route("/images/{id}", web::put().to(update_image))
        .route("/images/{id}", web::delete().to(delete_image))
        .route("/visits", web::get().to(recent_visits));
}

/// Check the bearer token of an admin request
async fn authorize(state: &AppState, req: &HttpRequest) -> Result<AdminClaims, HttpResponse> {
    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    state.auth.verify_header(header).await.map_err(|e| {
        tracing::info!("Rejected admin request to {}: {}", req.path(), e);
        error_response(401, "Unauthorized", e.to_string())
    })
}

macro_rules! require_admin {
    ($state:expr, $req:expr) => {
        if let Err(response) = authorize(&$state, &$req).await {
            return response;
        }
    };
}

/// Drop cached narrations after a restaurant's content changed
async fn invalidate_narrations(state: &AppState, restaurant_id: i32) {
    if let Err(e) = state
        .cache
        .invalidate_prefix(&CacheKey::narration_prefix(restaurant_id))
        .await
    {
        tracing::warn!("Failed to invalidate narrations of restaurant {}: {}", restaurant_id, e);
    }
}

// ----------------------------------------------------------------------
// Session
// ----------------------------------------------------------------------

async fn login(state: web::Data<AppState>, req: web::Json<LoginRequest>) -> impl Responder {
    match state.auth.login(&req.password) {
        Ok(issued) => {
            tracing::info!("Admin logged in");
            HttpResponse::Ok().json(LoginResponse {
                status: "success".to_string(),
                token: issued.token,
                expires_at: issued.expires_at.timestamp(),
            })
        }
        Err(AuthError::InvalidPassword) => error_response(401, "Unauthorized", "Wrong password"),
        Err(e) => {
            tracing::error!("Failed to issue admin token: {}", e);
            error_response(500, "Failed to issue token", e.to_string())
        }
    }
}

async fn check(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    match authorize(&state, &req).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({ "status": "success", "logged_in": true })),
        Err(_) => HttpResponse::Unauthorized().json(serde_json::json!({ "status": "error", "logged_in": false })),
    }
}

async fn logout(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .unwrap_or_default();

    match state.auth.logout(token.trim()).await {
        Ok(()) => HttpResponse::Ok().json(StatusResponse::new("logged_out")),
        Err(e) => error_response(401, "Unauthorized", e.to_string()),
    }
}

// ----------------------------------------------------------------------
// Restaurants
// ----------------------------------------------------------------------

async fn list_restaurants(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    require_admin!(state, req);

    match state.store.load_restaurants(Visibility::Active).await {
        Ok(restaurants) => HttpResponse::Ok().json(restaurants),
        Err(e) => store_failed("Failed to load restaurants", e),
    }
}

async fn list_hidden(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    require_admin!(state, req);

    match state.store.load_restaurants(Visibility::Hidden).await {
        Ok(restaurants) => HttpResponse::Ok().json(restaurants),
        Err(e) => store_failed("Failed to load hidden restaurants", e),
    }
}

async fn restaurant_details(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i32>,
) -> impl Responder {
    require_admin!(state, req);

    match state.store.get_restaurant(path.into_inner()).await {
        Ok(restaurant) => HttpResponse::Ok().json(restaurant),
        Err(e) => store_failed("Failed to load restaurant", e),
    }
}

async fn create_restaurant(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<RestaurantRequest>,
) -> impl Responder {
    require_admin!(state, req);
    if let Err(errors) = body.validate() {
        return validation_failed(errors);
    }

    match state.store.create_restaurant(&body).await {
        Ok(restaurant) => HttpResponse::Ok().json(serde_json::json!({ "status": "success", "restaurant": restaurant })),
        Err(e) => store_failed("Failed to create restaurant", e),
    }
}

async fn update_restaurant(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i32>,
    body: web::Json<RestaurantRequest>,
) -> impl Responder {
    require_admin!(state, req);
    if let Err(errors) = body.validate() {
        return validation_failed(errors);
    }

    let id = path.into_inner();
    match state.store.update_restaurant(id, &body).await {
        Ok(restaurant) => {
            invalidate_narrations(&state, id).await;
            HttpResponse::Ok().json(serde_json::json!({ "status": "success", "restaurant": restaurant }))
        }
        Err(e) => store_failed("Failed to update restaurant", e),
    }
}

/// Delete a restaurant permanently
///
/// The body must repeat the restaurant's name as `confirm_name`.
async fn delete_restaurant(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i32>,
    body: Option<web::Json<DeleteRestaurantRequest>>,
) -> impl Responder {
    require_admin!(state, req);

    let id = path.into_inner();
    let restaurant = match state.store.get_restaurant(id).await {
        Ok(restaurant) => restaurant,
        Err(e) => return store_failed("Failed to load restaurant", e),
    };

    let confirmed = body
        .as_ref()
        .and_then(|b| b.confirm_name.as_deref())
        .is_some_and(|name| name == restaurant.name);
    if !confirmed {
        return HttpResponse::BadRequest().json(StatusResponse::error("Confirmation name does not match"));
    }

    match state.store.delete_restaurant(id).await {
        Ok(()) => {
            invalidate_narrations(&state, id).await;
            HttpResponse::Ok().json(StatusResponse::with_id("deleted", id))
        }
        Err(e) => store_failed("Failed to delete restaurant", e),
    }
}

async fn hide_restaurant(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i32>,
) -> impl Responder {
    require_admin!(state, req);

    match state.store.set_active(path.into_inner(), false).await {
        Ok(()) => HttpResponse::Ok().json(StatusResponse::new("hidden")),
        Err(e) => store_failed("Failed to hide restaurant", e),
    }
}

async fn restore_restaurant(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i32>,
) -> impl Responder {
    require_admin!(state, req);

    match state.store.set_active(path.into_inner(), true).await {
        Ok(()) => HttpResponse::Ok().json(StatusResponse::new("restored")),
        Err(e) => store_failed("Failed to restore restaurant", e),
    }
}

/// Analytics listing
///
/// GET /admin/restaurants/analytics?search=pho&tags=1,3&sort=visit_count
async fn restaurant_analytics(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<AnalyticsQuery>,
) -> impl Responder {
    require_admin!(state, req);

    match state.store.load_restaurants(Visibility::Active).await {
        Ok(restaurants) => {
            let listed = filter_and_sort(restaurants, &query);
            HttpResponse::Ok().json(serde_json::json!({
                "status": "success",
                "total": listed.len(),
                "restaurants": listed,
            }))
        }
        Err(e) => store_failed("Failed to load analytics", e),
    }
}

/// Apply the analytics listing's search, tag filter and sort order
///
/// Names sort ascending; metrics sort descending. Unknown sort keys fall
/// back to name order.
pub fn filter_and_sort(restaurants: Vec<Restaurant>, query: &AnalyticsQuery) -> Vec<Restaurant> {
    let search = query
        .search
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty());
    let tags: HashSet<i32> = query.tag_ids().into_iter().collect();

    let mut listed: Vec<Restaurant> = restaurants
        .into_iter()
        .filter(|r| {
            search
                .as_deref()
                .map_or(true, |s| r.name.to_lowercase().contains(s))
        })
        .filter(|r| tags.is_empty() || r.tag_ids.iter().any(|t| tags.contains(t)))
        .collect();

    match query.sort.as_deref().unwrap_or("name") {
        "visit_count" => listed.sort_by(|a, b| b.visit_count.cmp(&a.visit_count)),
        "avg_visit_duration" => listed.sort_by(|a, b| b.avg_visit_duration.cmp(&a.avg_visit_duration)),
        "audio_play_count" => listed.sort_by(|a, b| b.audio_play_count.cmp(&a.audio_play_count)),
        "avg_audio_duration" => listed.sort_by(|a, b| b.avg_audio_duration.cmp(&a.avg_audio_duration)),
        _ => listed.sort_by_key(|r| r.name.to_lowercase()),
    }

    listed
}

// ----------------------------------------------------------------------
// Menu
// ----------------------------------------------------------------------

async fn list_menu(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i32>,
) -> impl Responder {
    require_admin!(state, req);

    match state.store.list_menu(path.into_inner()).await {
        Ok(items) => HttpResponse::Ok().json(items),
        Err(e) => store_failed("Failed to load menu", e),
    }
}

async fn add_menu_item(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i32>,
    body: web::Json<MenuItemRequest>,
) -> impl Responder {
    require_admin!(state, req);
    if let Err(errors) = body.validate() {
        return validation_failed(errors);
    }

    let restaurant_id = path.into_inner();
    match state.store.add_menu_item(restaurant_id, &body).await {
        Ok(item) => {
            invalidate_narrations(&state, restaurant_id).await;
            HttpResponse::Ok().json(serde_json::json!({ "status": "success", "item": item }))
        }
        Err(e) => store_failed("Failed to add menu item", e),
    }
}

async fn update_menu_item(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i32>,
    body: web::Json<MenuItemRequest>,
) -> impl Responder {
    require_admin!(state, req);
    if let Err(errors) = body.validate() {
        return validation_failed(errors);
    }

    match state.store.update_menu_item(path.into_inner(), &body).await {
        Ok(item) => {
            invalidate_narrations(&state, item.restaurant_id).await;
            HttpResponse::Ok().json(serde_json::json!({ "status": "success", "item": item }))
        }
        Err(e) => store_failed("Failed to update menu item", e),
    }
}

async fn delete_menu_item(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i32>,
) -> impl Responder {
    require_admin!(state, req);

    let id = path.into_inner();
    match state.store.delete_menu_item(id).await {
        Ok(restaurant_id) => {
            invalidate_narrations(&state, restaurant_id).await;
            HttpResponse::Ok().json(StatusResponse::with_id("deleted", id))
        }
        Err(e) => store_failed("Failed to delete menu item", e),
    }
}

// ----------------------------------------------------------------------
// Tags
// ----------------------------------------------------------------------

async fn list_tags(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    require_admin!(state, req);

    match state.store.list_tags().await {
        Ok(tags) => HttpResponse::Ok().json(tags),
        Err(e) => store_failed("Failed to load tags", e),
    }
}

async fn create_tag(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<TagRequest>,
) -> impl Responder {
    require_admin!(state, req);
    if let Err(errors) = body.validate() {
        return validation_failed(errors);
    }

    match state.store.create_tag(&body).await {
        Ok(tag) => HttpResponse::Ok().json(serde_json::json!({ "status": "success", "tag": tag })),
        Err(e) => store_failed("Failed to create tag", e),
    }
}

async fn update_tag(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i32>,
    body: web::Json<TagRequest>,
) -> impl Responder {
    require_admin!(state, req);
    if let Err(errors) = body.validate() {
        return validation_failed(errors);
    }

    match state.store.update_tag(path.into_inner(), &body).await {
        Ok(tag) => HttpResponse::Ok().json(serde_json::json!({ "status": "success", "tag": tag })),
        Err(e) => store_failed("Failed to update tag", e),
    }
}

async fn delete_tag(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i32>,
) -> impl Responder {
    require_admin!(state, req);

    let id = path.into_inner();
    match state.store.delete_tag(id).await {
        Ok(()) => HttpResponse::Ok().json(StatusResponse::with_id("deleted", id)),
        Err(e) => store_failed("Failed to delete tag", e),
    }
}

async fn attach_tag(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<(i32, i32)>,
) -> impl Responder {
    require_admin!(state, req);

    let (restaurant_id, tag_id) = path.into_inner();
    match state.store.attach_tag(restaurant_id, tag_id).await {
        Ok(()) => HttpResponse::Ok().json(StatusResponse::with_id("attached", tag_id)),
        Err(e) => store_failed("Failed to attach tag", e),
    }
}

async fn detach_tag(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<(i32, i32)>,
) -> impl Responder {
    require_admin!(state, req);

    let (restaurant_id, tag_id) = path.into_inner();
    match state.store.detach_tag(restaurant_id, tag_id).await {
        Ok(()) => HttpResponse::Ok().json(StatusResponse::with_id("detached", tag_id)),
        Err(e) => store_failed("Failed to detach tag", e),
    }
}

// ----------------------------------------------------------------------
// Images
// ----------------------------------------------------------------------

async fn add_image(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i32>,
    body: web::Json<ImageRequest>,
) -> impl Responder {
    require_admin!(state, req);
    if let Err(errors) = body.validate() {
        return validation_failed(errors);
    }

    match state.store.add_image(path.into_inner(), &body).await {
        Ok(image) => HttpResponse::Ok().json(serde_json::json!({ "status": "success", "image": image })),
        Err(e) => store_failed("Failed to add image", e),
    }
}

async fn update_image(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i32>,
    body: web::Json<ImageRequest>,
) -> impl Responder {
    require_admin!(state, req);
    if let Err(errors) = body.validate() {
        return validation_failed(errors);
    }

    match state.store.update_image(path.into_inner(), &body).await {
        Ok(image) => HttpResponse::Ok().json(serde_json::json!({ "status": "success", "image": image })),
        Err(e) => store_failed("Failed to update image", e),
    }
}

async fn delete_image(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i32>,
) -> impl Responder {
    require_admin!(state, req);

    let id = path.into_inner();
    match state.store.delete_image(id).await {
        Ok(()) => HttpResponse::Ok().json(StatusResponse::with_id("deleted", id)),
        Err(e) => store_failed("Failed to delete image", e),
    }
}

// ----------------------------------------------------------------------
// Visits
// ----------------------------------------------------------------------

/// Heat-map points of the last `days` days
async fn recent_visits(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<VisitsQuery>,
) -> impl Responder {
    require_admin!(state, req);

    match state.store.recent_visits(query.days).await {
        Ok(visits) => HttpResponse::Ok().json(serde_json::json!({
            "status": "success",
            "days": query.days,
            "visits": visits,
        })),
        Err(e) => store_failed("Failed to load visits", e),
    }
}
