//! # Registration Composer Benchmarks
//!
//! | Path | Work per attempt |
//! |------|------------------|
//! | Base asset | intent, price, split, settle, claim, transfer |
//! | Oracle-priced | the above plus one scripted price fetch and conversion |
//! | Discounted | base asset with a coupon applied |
//!
//! The scripted oracle answers immediately, so the numbers measure
//! composition overhead only.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ns_registration::{Discount, RegistrationApi, RegistrationRequest};
use ns_tests::fixtures::{alice_base, bob_usdc, service};
use std::time::Duration;

fn bench_compose_paths(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let (service, _, _) = service();

    let mut group = c.benchmark_group("compose");
    group.measurement_time(Duration::from_secs(5));

    let paths: Vec<(&str, RegistrationRequest)> = vec![
        ("base", alice_base()),
        ("oracle_priced", bob_usdc()),
        (
            "discounted",
            alice_base().with_discount(Discount::Coupon {
                code: "LAUNCH25".to_string(),
            }),
        ),
    ];

    for (name, request) in paths {
        group.bench_with_input(BenchmarkId::new("path", name), &request, |b, request| {
            b.iter(|| {
                let tx = runtime
                    .block_on(service.compose(black_box(request.clone())))
                    .unwrap();
                black_box(tx)
            })
        });
    }
    group.finish();
}

fn bench_seal_to_json(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let (service, _, _) = service();
    let tx = runtime.block_on(service.compose(bob_usdc())).unwrap();

    let mut group = c.benchmark_group("sealed");
    group.throughput(Throughput::Elements(tx.operations.len() as u64));
    group.bench_function("to_json", |b| b.iter(|| black_box(tx.to_json().unwrap())));
    group.finish();
}

criterion_group!(benches, bench_compose_paths, bench_seal_to_json);
criterion_main!(benches);
