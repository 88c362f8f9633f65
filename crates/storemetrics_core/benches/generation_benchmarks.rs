//! Criterion benchmarks for storemetrics_core generation and aggregation
//!
//! Run with: cargo bench -p storemetrics_core

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use storemetrics_core::aggregate::aggregate_locations;
use storemetrics_core::calendar::CalendarIndex;
use storemetrics_core::generate::{CustomerGenerator, generate_tree};
use storemetrics_core::reshape::{CalendarGranularity, ChartQuery, CustomerMetric, reshape};
use storemetrics_core::{GenerationRequest, MetricsDomain, RangeSet, StoreLocation, generate_dataset};

fn bench_customer_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("customer_tree");
    let ranges = RangeSet::default();
    let generator = CustomerGenerator::new(&ranges.customer);

    for through in [2015, 2020, 2025].iter() {
        let index =
            CalendarIndex::for_location(StoreLocation::Edmonton, &ranges.history, *through).unwrap();
        group.bench_with_input(BenchmarkId::new("through", through), through, |b, _| {
            b.iter(|| {
                let mut rng = SmallRng::seed_from_u64(42);
                generate_tree(black_box(&generator), &index, StoreLocation::Edmonton, &mut rng)
            })
        });
    }

    group.finish();
}

fn bench_datasets(c: &mut Criterion) {
    let mut group = c.benchmark_group("dataset");
    let ranges = RangeSet::default();
    let request = GenerationRequest::new(2025).seed(42);

    for domain in MetricsDomain::ALL {
        group.bench_function(domain.label(), |b| {
            b.iter(|| generate_dataset(domain, black_box(&request), &ranges))
        });
    }

    group.finish();
}

fn bench_location_fold(c: &mut Criterion) {
    let ranges = RangeSet::default();
    let generator = CustomerGenerator::new(&ranges.customer);
    let trees: Vec<_> = StoreLocation::PHYSICAL
        .iter()
        .map(|&location| {
            let index = CalendarIndex::for_location(location, &ranges.history, 2025).unwrap();
            let mut rng = SmallRng::seed_from_u64(7);
            (location, generate_tree(&generator, &index, location, &mut rng).unwrap())
        })
        .collect();
    let refs: Vec<_> = trees.iter().map(|(location, tree)| (*location, tree)).collect();

    c.bench_function("aggregate_locations", |b| {
        b.iter(|| aggregate_locations(black_box(&refs)))
    });

    let (_, edmonton) = &trees[0];
    let query = ChartQuery::new(jiff::civil::date(2024, 6, 15), jiff::civil::date(2025, 1, 1))
        .granularity(CalendarGranularity::Monthly);
    c.bench_function("reshape_monthly", |b| {
        b.iter(|| reshape(black_box(edmonton), CustomerMetric::Total, &query))
    });
}

criterion_group!(benches, bench_customer_tree, bench_datasets, bench_location_fold);
criterion_main!(benches);
