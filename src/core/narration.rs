use crate::models::Restaurant;

/// Language the narration text is written in
pub const SOURCE_LANGUAGE: &str = "vi";

/// Menu items mentioned by name
const FEATURED_DISHES: usize = 3;

/// Build the spoken introduction of a restaurant in the source language
pub fn generate_narration(restaurant: &Restaurant) -> String {
    let mut parts = vec![format!("{}.", restaurant.name.trim())];

    if let Some(description) = restaurant
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
    {
        parts.push(format!("{}.", description.trim_end_matches('.')));
    }

    let dishes: Vec<&str> = restaurant
        .menu
        .iter()
        .take(FEATURED_DISHES)
        .map(|item| item.name.as_str())
        .collect();

    if dishes.is_empty() {
        parts.push("Quán có thực đơn đa dạng.".to_string());
    } else {
        parts.push(format!("Quán có các món tiêu biểu như {}.", dishes.join(", ")));
    }

    parts.join(" ")
}
