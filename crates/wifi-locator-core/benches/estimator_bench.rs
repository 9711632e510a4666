//! Estimator throughput over a synthetic campus survey.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use wifi_locator_core::{
    AccessPointId, CoordinateTable, Coordinates, FingerprintStore, LocationId, Observation,
    ObservationSet, PositionEstimator, ReferenceReading,
};

const LOCATIONS: usize = 12;

fn mac(i: usize) -> String {
    format!("02:00:00:00:{:02X}:{:02X}", (i >> 8) & 0xff, i & 0xff)
}

fn survey(n_aps: usize) -> (FingerprintStore, CoordinateTable) {
    let mut builder = FingerprintStore::builder();
    let mut coords = CoordinateTable::default();
    for loc in 0..LOCATIONS {
        coords.insert(
            LocationId::new(format!("TOUR_{loc}")),
            Coordinates::new(48.84 + loc as f64 * 1e-4, 2.35),
        );
    }
    for ap in 0..n_aps {
        // Each AP is heard from three neighbouring zones.
        for k in 0..3 {
            let loc = (ap + k) % LOCATIONS;
            let rssi = -45 - ((ap * 7 + k * 13) % 45) as i32;
            builder.insert(
                AccessPointId::new(mac(ap)),
                ReferenceReading::new(format!("TOUR_{loc}"), rssi, "eduroam"),
            );
        }
    }
    (builder.build(), coords)
}

fn scan(n_obs: usize) -> ObservationSet {
    let observations = (0..n_obs)
        .map(|i| Observation::new("eduroam", mac(i * 3), -50 - (i % 40) as i32, 6))
        .collect();
    ObservationSet::new("bench", 0, observations)
}

fn bench_estimate(c: &mut Criterion) {
    let (store, coords) = survey(1_000);
    let estimator = PositionEstimator::new();

    let mut group = c.benchmark_group("estimate");
    for n_obs in [8usize, 32, 128] {
        let input = scan(n_obs);
        group.throughput(Throughput::Elements(n_obs as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n_obs), &input, |b, input| {
            b.iter(|| estimator.estimate(black_box(input), &store, &coords))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_estimate);
criterion_main!(benches);
