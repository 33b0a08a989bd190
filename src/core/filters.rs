use std::collections::HashSet;

use crate::models::Restaurant;

/// Number of the restaurant's tags that appear in the requested set
#[inline]
pub fn matching_tag_count(restaurant: &Restaurant, requested: &HashSet<i32>) -> usize {
    restaurant
        .tag_ids
        .iter()
        .filter(|tag_id| requested.contains(tag_id))
        .count()
}

/// Check if a restaurant is eligible for planning
///
/// Hidden restaurants never qualify. An empty tag set means no tag filter;
/// otherwise one shared tag is enough (union, not intersection).
#[inline]
pub fn matches_tags(restaurant: &Restaurant, requested: &HashSet<i32>) -> bool {
    if !restaurant.is_active {
        return false;
    }

    requested.is_empty() || matching_tag_count(restaurant, requested) > 0
}

/// Select the candidate set for a planning request, preserving input order
pub fn filter_candidates<'a>(
    restaurants: &'a [Restaurant],
    requested: &HashSet<i32>,
) -> Vec<&'a Restaurant> {
    restaurants
        .iter()
        .filter(|restaurant| matches_tags(restaurant, requested))
        .collect()
}
