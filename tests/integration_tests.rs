// Integration tests for Nearbite tour planning

use nearbite::core::{find_nearest, PlanError, TourPlanner, TourQuery};
use nearbite::models::{Coordinates, MenuItem, PlanTourRequest, Restaurant, TourStrategy};
use std::collections::HashSet;

fn create_restaurant(id: i32, lat: f64, lng: f64, prices: &[i64], tag_ids: Vec<i32>) -> Restaurant {
    Restaurant {
        id,
        name: format!("Quán {}", id),
        lat,
        lng,
        description: Some(format!("Món ngon số {}", id)),
        avg_eat_time: Some(30),
        poi_radius_km: 0.015,
        is_active: true,
        menu: prices
            .iter()
            .enumerate()
            .map(|(i, price)| MenuItem {
                id: id * 100 + i as i32,
                name: format!("Món {}-{}", id, i),
                price: *price,
                restaurant_id: id,
            })
            .collect(),
        tag_ids,
        images: vec![],
        visit_count: 0,
        avg_visit_duration: 0,
        audio_play_count: 0,
        avg_audio_duration: 0,
    }
}

/// Five restaurants around District 1, Ho Chi Minh City
fn district_one() -> Vec<Restaurant> {
    vec![
        create_restaurant(1, 10.7769, 106.7009, &[45_000, 55_000], vec![1, 2]),
        create_restaurant(2, 10.7725, 106.6980, &[35_000], vec![2]),
        create_restaurant(3, 10.7800, 106.7050, &[60_000, 80_000, 70_000], vec![3]),
        create_restaurant(4, 10.7680, 106.6930, &[25_000, 30_000], vec![1]),
        create_restaurant(5, 10.7850, 106.6900, &[90_000], vec![4]),
    ]
}

fn query(time_limit: f64, budget: f64, tags: Vec<i32>, user: Option<Coordinates>) -> TourQuery {
    TourQuery {
        time_limit,
        budget,
        tags,
        user,
    }
}

#[test]
fn test_scenario_generous_budget_without_location() {
    let planner = TourPlanner::default();
    let plan = planner
        .plan(&query(120.0, 500_000.0, vec![], None), &district_one())
        .unwrap();

    let strategies: Vec<TourStrategy> = plan.tours.iter().map(|t| t.strategy).collect();
    assert!(strategies.contains(&TourStrategy::BestScore));
    assert!(!strategies.contains(&TourStrategy::Nearest));
    assert_eq!(plan.total_restaurants, 5);

    for tour in &plan.tours {
        assert_eq!(tour.num_stops, 4);
        assert_eq!(tour.total_time, 120);
    }

    // Same restaurants as best score, in price order
    let cheapest = plan
        .tours
        .iter()
        .find(|t| t.strategy == TourStrategy::Cheapest)
        .expect("cheapest tour");
    assert_eq!(cheapest.stop_ids(), vec![4, 2, 1, 3]);
}

#[test]
fn test_scenario_budget_too_small() {
    let planner = TourPlanner::default();
    let plan = planner
        .plan(&query(120.0, 10_000.0, vec![], None), &district_one())
        .unwrap();

    assert!(plan.tours.is_empty());
    assert_eq!(plan.total_restaurants, 5);
}

#[test]
fn test_scenario_unknown_tag() {
    let planner = TourPlanner::default();
    let result = planner.plan(&query(120.0, 500_000.0, vec![7], None), &district_one());

    assert_eq!(result, Err(PlanError::NoCandidates));
}

#[test]
fn test_scenario_user_at_restaurant() {
    let restaurants = district_one();
    let user = Coordinates::new(10.7800, 106.7050);

    let nearest = find_nearest(&user, &restaurants).unwrap();
    assert_eq!(nearest.restaurant.id, 3);
    assert!(nearest.distance_km < 1e-9);

    let plan = TourPlanner::default()
        .plan(&query(120.0, 500_000.0, vec![], Some(user)), &restaurants)
        .unwrap();
    let nearest_tour = plan
        .tours
        .iter()
        .find(|t| t.strategy == TourStrategy::Nearest)
        .expect("nearest tour");

    assert_eq!(nearest_tour.restaurants[0].id, 3);
    assert!(nearest_tour.restaurants[0].distance_km.unwrap() < 1e-9);
}

#[test]
fn test_scenario_identical_candidates_keep_order() {
    let restaurants = vec![
        create_restaurant(8, 10.7769, 106.7009, &[40_000], vec![1]),
        create_restaurant(9, 10.7769, 106.7009, &[40_000], vec![1]),
    ];
    let user = Some(Coordinates::new(10.7700, 106.7000));

    let plan = TourPlanner::default()
        .plan(&query(60.0, 100_000.0, vec![1], user), &restaurants)
        .unwrap();

    // Every strategy yields the same sequence, so only one tour survives
    assert_eq!(plan.tours.len(), 1);
    assert_eq!(plan.tours[0].strategy, TourStrategy::BestScore);
    assert_eq!(plan.tours[0].stop_ids(), vec![8, 9]);
}

#[test]
fn test_tours_respect_limits() {
    let restaurants = district_one();
    let user = Some(Coordinates::new(10.7760, 106.7000));

    for (time_limit, budget) in [(30.0, 60_000.0), (90.0, 150_000.0), (240.0, 200_000.0), (600.0, 1_000_000.0)] {
        let plan = TourPlanner::default()
            .plan(&query(time_limit, budget, vec![], user), &restaurants)
            .unwrap();

        for tour in &plan.tours {
            assert!(f64::from(tour.total_time) <= time_limit);
            assert!(tour.total_cost as f64 <= budget);
            assert!(tour.num_stops <= 5);
            assert_eq!(tour.num_stops, tour.restaurants.len());
            assert_eq!(tour.total_time, 30 * tour.num_stops as u32);

            let stop_total: i64 = tour.restaurants.iter().map(|s| s.avg_price).sum();
            assert_eq!(tour.total_cost, stop_total);
        }
    }
}

#[test]
fn test_fractional_averages_keep_cost_consistent() {
    let restaurants = vec![
        create_restaurant(1, 10.7769, 106.7009, &[45_000, 40_000, 42_000], vec![]),
        create_restaurant(2, 10.7725, 106.6980, &[45_000, 40_000, 42_000], vec![]),
        create_restaurant(3, 10.7800, 106.7050, &[33_000, 34_000], vec![]),
    ];

    let plan = TourPlanner::default()
        .plan(&query(120.0, 500_000.0, vec![], None), &restaurants)
        .unwrap();

    for tour in &plan.tours {
        let stop_total: i64 = tour.restaurants.iter().map(|s| s.avg_price).sum();
        assert_eq!(tour.total_cost, stop_total);
    }
    assert_eq!(plan.tours[0].total_cost, 42_333 + 42_333 + 33_500);
}

#[test]
fn test_planning_is_deterministic_and_distinct() {
    let restaurants = district_one();
    let q = query(150.0, 300_000.0, vec![1, 2], Some(Coordinates::new(10.7750, 106.6990)));
    let planner = TourPlanner::default();

    let first = planner.plan(&q, &restaurants).unwrap();
    let second = planner.plan(&q, &restaurants).unwrap();
    assert_eq!(first, second);

    let distinct: HashSet<Vec<i32>> = first.tours.iter().map(|t| t.stop_ids()).collect();
    assert_eq!(distinct.len(), first.tours.len());

    let order: Vec<TourStrategy> = first.tours.iter().map(|t| t.strategy).collect();
    let mut sorted = order.clone();
    sorted.sort_by_key(|s| match s {
        TourStrategy::BestScore => 0,
        TourStrategy::Nearest => 1,
        TourStrategy::Cheapest => 2,
    });
    assert_eq!(order, sorted);
}

#[test]
fn test_hidden_restaurants_are_never_planned() {
    let mut restaurants = district_one();
    restaurants[3].is_active = false;

    let plan = TourPlanner::default()
        .plan(&query(300.0, 1_000_000.0, vec![], None), &restaurants)
        .unwrap();

    assert_eq!(plan.total_restaurants, 4);
    assert!(plan.tours.iter().all(|t| !t.stop_ids().contains(&4)));
}

#[test]
fn test_request_with_half_a_position_has_no_nearest_tour() {
    let req: PlanTourRequest = serde_json::from_str(
        r#"{"time_limit": 120, "budget": 500000, "tags": [], "user_lat": 10.77}"#,
    )
    .unwrap();

    let plan = TourPlanner::default()
        .plan(&TourQuery::from(&req), &district_one())
        .unwrap();

    assert!(plan.tours.iter().all(|t| t.strategy != TourStrategy::Nearest));
}

#[test]
fn test_plan_serializes_strategy_names() {
    let plan = TourPlanner::default()
        .plan(&query(60.0, 500_000.0, vec![], None), &district_one())
        .unwrap();

    let json = serde_json::to_value(&plan.tours).unwrap();
    assert_eq!(json[0]["strategy"], "best_score");
    assert!(json[0]["restaurants"][0].get("distance_km").is_none());
}
