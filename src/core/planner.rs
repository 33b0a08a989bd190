use std::cmp::Ordering;
use std::collections::HashSet;

use thiserror::Error;

use crate::core::{filters::filter_candidates, scoring::score_candidate};
use crate::models::{
    Coordinates, PlanTourRequest, PlannerSettings, Restaurant, ScoredCandidate, Tour, TourStop,
    TourStrategy,
};

/// Images carried by each tour stop
const MAX_STOP_IMAGES: usize = 2;

/// Errors reported by the tour planner
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("No restaurants match the selected tags")]
    NoCandidates,
}

/// Parameters of one planning request
#[derive(Debug, Clone)]
pub struct TourQuery {
    pub time_limit: f64,
    pub budget: f64,
    pub tags: Vec<i32>,
    pub user: Option<Coordinates>,
}

impl From<&PlanTourRequest> for TourQuery {
    fn from(req: &PlanTourRequest) -> Self {
        // A position needs both halves
        let user = match (req.user_lat, req.user_lng) {
            (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
            _ => None,
        };

        Self {
            time_limit: req.time_limit,
            budget: req.budget,
            tags: req.tags.clone(),
            user,
        }
    }
}

/// Result of the planning process
#[derive(Debug, Clone, PartialEq)]
pub struct TourPlan {
    pub tours: Vec<Tour>,
    pub total_restaurants: usize,
}

/// Tour planning orchestrator
///
/// # Pipeline Stages
/// 1. Tag filtering over active restaurants
/// 2. Scoring (tag match, price fit, proximity)
/// 3. One ordering per strategy: best_score, nearest, cheapest
/// 4. Greedy packing per ordering, then duplicate suppression
#[derive(Debug, Clone)]
pub struct TourPlanner {
    settings: PlannerSettings,
}

impl TourPlanner {
    pub fn new(settings: PlannerSettings) -> Self {
        Self { settings }
    }

    pub fn with_default_settings() -> Self {
        Self {
            settings: PlannerSettings::default(),
        }
    }

    pub fn settings(&self) -> &PlannerSettings {
        &self.settings
    }

    /// Plan up to three distinct tours over a restaurant snapshot
    ///
    /// # Arguments
    /// * `query` - Time limit, budget, requested tags and optional user position
    /// * `restaurants` - Restaurant snapshot in enumeration order
    ///
    /// # Returns
    /// `TourPlan` with tours in strategy order, or `PlanError::NoCandidates`
    /// when filtering leaves nothing. Budgets too tight for any restaurant
    /// give an empty tour list rather than an error.
    pub fn plan(&self, query: &TourQuery, restaurants: &[Restaurant]) -> Result<TourPlan, PlanError> {
        let requested: HashSet<i32> = query.tags.iter().copied().collect();

        // Stage 1: filtering
        let candidates = filter_candidates(restaurants, &requested);
        if candidates.is_empty() {
            return Err(PlanError::NoCandidates);
        }
        let total_restaurants = candidates.len();

        // Stage 2: scoring
        let scored: Vec<ScoredCandidate> = candidates
            .into_iter()
            .map(|restaurant| {
                score_candidate(
                    restaurant,
                    &requested,
                    query.budget,
                    query.user.as_ref(),
                    &self.settings,
                )
            })
            .collect();

        // Stages 3 & 4: order, pack, dedupe
        let mut strategies = vec![TourStrategy::BestScore];
        if query.user.is_some() {
            strategies.push(TourStrategy::Nearest);
        }
        strategies.push(TourStrategy::Cheapest);

        let mut seen: HashSet<Vec<i32>> = HashSet::new();
        let mut tours = Vec::with_capacity(strategies.len());

        for strategy in strategies {
            let ordered = order_candidates(&scored, strategy);
            let Some(tour) = build_tour(strategy, &ordered, query.time_limit, query.budget, &self.settings) else {
                continue;
            };

            if seen.insert(tour.stop_ids()) {
                tours.push(tour);
            }
        }

        Ok(TourPlan {
            tours,
            total_restaurants,
        })
    }
}

impl Default for TourPlanner {
    fn default() -> Self {
        Self::with_default_settings()
    }
}

/// Order the scored candidates for a strategy
///
/// Sorts are stable, so ties keep enumeration order.
pub fn order_candidates<'s, 'a>(
    scored: &'s [ScoredCandidate<'a>],
    strategy: TourStrategy,
) -> Vec<&'s ScoredCandidate<'a>> {
    let mut ordered: Vec<&ScoredCandidate> = scored.iter().collect();

    match strategy {
        TourStrategy::BestScore => ordered.sort_by(|a, b| b.score.cmp(&a.score)),
        TourStrategy::Nearest => ordered.sort_by(|a, b| {
            let a_distance = a.distance_km.unwrap_or(f64::INFINITY);
            let b_distance = b.distance_km.unwrap_or(f64::INFINITY);
            a_distance.partial_cmp(&b_distance).unwrap_or(Ordering::Equal)
        }),
        TourStrategy::Cheapest => ordered.sort_by(|a, b| {
            a.avg_price
                .partial_cmp(&b.avg_price)
                .unwrap_or(Ordering::Equal)
        }),
    }

    ordered
}

/// Greedily pack an ordered candidate list into a tour
///
/// Each candidate is accepted if one more stop keeps the running time within
/// `time_limit` and its rounded average price keeps the running cost within
/// `budget`; otherwise it is skipped for good. Packing ends at
/// `settings.max_stops`. Returns `None` when nothing fits.
///
/// Costs are summed on the same rounded price each stop reports, so
/// `total_cost` is always the sum of the stops' `avg_price`.
pub fn build_tour(
    strategy: TourStrategy,
    ordered: &[&ScoredCandidate],
    time_limit: f64,
    budget: f64,
    settings: &PlannerSettings,
) -> Option<Tour> {
    let mut stops = Vec::new();
    let mut total_time: u32 = 0;
    let mut total_cost: i64 = 0;

    for candidate in ordered {
        if stops.len() >= settings.max_stops {
            break;
        }

        let next_time = total_time + settings.per_stop_minutes;
        let next_cost = total_cost + stop_price(candidate);
        if f64::from(next_time) <= time_limit && next_cost as f64 <= budget {
            stops.push(tour_stop(candidate));
            total_time = next_time;
            total_cost = next_cost;
        }
    }

    if stops.is_empty() {
        return None;
    }

    Some(Tour {
        strategy,
        num_stops: stops.len(),
        restaurants: stops,
        total_time,
        total_cost,
    })
}

/// Whole-currency price of a stop
fn stop_price(candidate: &ScoredCandidate) -> i64 {
    candidate.avg_price.round() as i64
}

fn tour_stop(candidate: &ScoredCandidate) -> TourStop {
    let restaurant = candidate.restaurant;

    TourStop {
        id: restaurant.id,
        name: restaurant.name.clone(),
        lat: restaurant.lat,
        lng: restaurant.lng,
        avg_price: stop_price(candidate),
        score: candidate.score,
        matching_tags: candidate.matching_tags,
        distance_km: candidate.distance_km,
        images: restaurant
            .images
            .iter()
            .take(MAX_STOP_IMAGES)
            .cloned()
            .collect(),
    }
}
