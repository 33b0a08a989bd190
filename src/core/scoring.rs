use std::collections::HashSet;

use crate::core::{distance::distance_between, filters::matching_tag_count};
use crate::models::{Coordinates, PlannerSettings, Restaurant, ScoredCandidate};

/// Price fit bonuses: (budget divisor, points), checked in order
const PRICE_FIT_TIERS: [(f64, i32); 2] = [(3.0, 5), (2.0, 3)];

/// Proximity bonuses: (distance below km, points), checked in order
const PROXIMITY_TIERS: [(f64, i32); 3] = [(0.5, 8), (1.0, 5), (2.0, 2)];

/// Score a restaurant for a planning request
///
/// Scoring formula:
/// score = (
///     tag_match_points * matching_tags +   # 10 per requested tag carried
///     price_fit_bonus +                    # +5 under budget/3, +3 under budget/2
///     proximity_bonus                      # +8 / +5 / +2 under 0.5 / 1 / 2 km
/// )
///
/// The proximity term and `distance_km` are only present when the user's
/// position is known.
pub fn score_candidate<'a>(
    restaurant: &'a Restaurant,
    requested_tags: &HashSet<i32>,
    budget: f64,
    user: Option<&Coordinates>,
    settings: &PlannerSettings,
) -> ScoredCandidate<'a> {
    let matching_tags = matching_tag_count(restaurant, requested_tags);
    let avg_price = average_menu_price(restaurant, settings.fallback_avg_price);
    let distance_km = user.map(|position| distance_between(position, &restaurant.coordinates()));

    let mut score = settings.tag_match_points * matching_tags as i32;
    score += price_fit_bonus(avg_price, budget);
    if let Some(distance) = distance_km {
        score += proximity_bonus(distance);
    }

    ScoredCandidate {
        restaurant,
        score,
        avg_price,
        matching_tags,
        distance_km,
    }
}

/// Arithmetic mean of the menu prices, or `fallback` for an empty menu
#[inline]
pub fn average_menu_price(restaurant: &Restaurant, fallback: f64) -> f64 {
    if restaurant.menu.is_empty() {
        return fallback;
    }

    let total: i64 = restaurant.menu.iter().map(|item| item.price).sum();
    total as f64 / restaurant.menu.len() as f64
}

#[inline]
fn price_fit_bonus(avg_price: f64, budget: f64) -> i32 {
    PRICE_FIT_TIERS
        .iter()
        .find(|(divisor, _)| avg_price < budget / divisor)
        .map(|(_, points)| *points)
        .unwrap_or(0)
}

#[inline]
fn proximity_bonus(distance_km: f64) -> i32 {
    PROXIMITY_TIERS
        .iter()
        .find(|(limit, _)| distance_km < *limit)
        .map(|(_, points)| *points)
        .unwrap_or(0)
}
