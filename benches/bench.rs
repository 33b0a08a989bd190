// Criterion benchmarks for Nearbite

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nearbite::core::{distance::haversine_distance, find_nearest, TourPlanner, TourQuery};
use nearbite::models::{Coordinates, MenuItem, Restaurant};

fn create_restaurant(id: usize, lat: f64, lng: f64) -> Restaurant {
    let id = id as i32;
    Restaurant {
        id,
        name: format!("Quán {}", id),
        lat,
        lng,
        description: None,
        avg_eat_time: Some(30),
        poi_radius_km: 0.015,
        is_active: true,
        menu: (0..3)
            .map(|i| MenuItem {
                id: id * 10 + i,
                name: format!("Món {}", i),
                price: 20_000 + i64::from((id * 7 + i) % 15) * 5_000,
                restaurant_id: id,
            })
            .collect(),
        tag_ids: vec![id % 6, (id + 2) % 6],
        images: vec![],
        visit_count: 0,
        avg_visit_duration: 0,
        audio_play_count: 0,
        avg_audio_duration: 0,
    }
}

/// Restaurants scattered on a grid around District 1
fn create_restaurants(count: usize) -> Vec<Restaurant> {
    (0..count)
        .map(|i| {
            let lat = 10.7769 + (i % 50) as f64 * 0.0008;
            let lng = 106.7009 + (i / 50) as f64 * 0.0008;
            create_restaurant(i, lat, lng)
        })
        .collect()
}

fn bench_haversine_distance(c: &mut Criterion) {
    c.bench_function("haversine_distance", |b| {
        b.iter(|| {
            haversine_distance(
                black_box(10.7769),
                black_box(106.7009),
                black_box(10.7725),
                black_box(106.6980),
            )
        });
    });
}

fn bench_find_nearest(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_nearest");
    let user = Coordinates::new(10.79, 106.71);

    for size in [100, 1000, 10000].iter() {
        let restaurants = create_restaurants(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| find_nearest(black_box(&user), black_box(&restaurants)));
        });
    }

    group.finish();
}

fn bench_plan_tours(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan_tours");
    let planner = TourPlanner::default();
    let query = TourQuery {
        time_limit: 150.0,
        budget: 250_000.0,
        tags: vec![1, 3],
        user: Some(Coordinates::new(10.79, 106.71)),
    };

    for size in [100, 1000, 10000].iter() {
        let restaurants = create_restaurants(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| planner.plan(black_box(&query), black_box(&restaurants)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_haversine_distance, bench_find_nearest, bench_plan_tours);
criterion_main!(benches);
