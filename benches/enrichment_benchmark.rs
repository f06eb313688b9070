use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rayon::ThreadPoolBuilder;
use std::sync::Arc;
use weather_enrich::models::{
    CoordinateSource, Franchise, NormalizedRestaurant, WeatherObservations, WeatherRecord,
};
use weather_enrich::processors::{EnrichmentJoiner, SpatialKeyDeriver, WeatherNormalizer};
use weather_enrich::utils::geohash;

// Observations on a grid over the continental US, one month of days per point
fn create_weather(points: usize, days: i32) -> WeatherObservations {
    let mut records = Vec::with_capacity(points * days as usize);
    for point in 0..points {
        let latitude = 25.0 + (point % 50) as f64 * 0.5;
        let longitude = -125.0 + (point / 50) as f64 * 0.5;
        for day in 1..=days {
            let row = records.len();
            records.push(WeatherRecord::new(latitude, longitude, 2023, 5, day, row));
        }
    }
    WeatherObservations::without_measurements(records).unwrap()
}

fn create_restaurants(count: usize, keys: SpatialKeyDeriver) -> Vec<NormalizedRestaurant> {
    (0..count)
        .map(|i| {
            let lat = 25.0 + (i % 50) as f64 * 0.5 + 0.01;
            let lng = -125.0 + (i / 50 % 100) as f64 * 0.5 + 0.01;
            NormalizedRestaurant {
                franchise: Arc::new(Franchise {
                    id: Some(i as u64),
                    franchise_id: i as u64,
                    franchise_name: format!("Franchise {}", i),
                    restaurant_franchise_id: Some(i as u64),
                    country: "US".to_string(),
                    city: "Springfield".to_string(),
                }),
                restaurant_lat: Some(lat),
                restaurant_lng: Some(lng),
                geohash: keys.derive(Some(lat), Some(lng)),
                coordinate_source: CoordinateSource::Source,
            }
        })
        .collect()
}

fn benchmark_geohash(c: &mut Criterion) {
    let mut group = c.benchmark_group("geohash_encode");
    for precision in [4usize, 8, 12] {
        group.bench_with_input(
            BenchmarkId::from_parameter(precision),
            &precision,
            |b, &precision| {
                b.iter(|| geohash::encode(black_box(40.7128), black_box(-74.006), precision))
            },
        );
    }
    group.finish();
}

fn benchmark_normalize_and_join(c: &mut Criterion) {
    let pool = ThreadPoolBuilder::new().num_threads(4).build().unwrap();
    let keys = SpatialKeyDeriver::default();
    let restaurants = create_restaurants(2_000, keys);

    let mut group = c.benchmark_group("enrichment");
    for points in [100usize, 1_000] {
        group.bench_with_input(
            BenchmarkId::new("normalize_weather", points),
            &points,
            |b, &points| {
                b.iter_batched(
                    || create_weather(points, 30),
                    |weather| WeatherNormalizer::new(keys).normalize(weather, &pool),
                    BatchSize::LargeInput,
                )
            },
        );

        let normalized = WeatherNormalizer::new(keys).normalize(create_weather(points, 30), &pool);
        group.bench_with_input(BenchmarkId::new("join", points), &points, |b, _| {
            b.iter(|| {
                EnrichmentJoiner::new().join(
                    black_box(&normalized.observations),
                    black_box(&restaurants),
                    &pool,
                )
            })
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_geohash, benchmark_normalize_and_join);
criterion_main!(benches);
