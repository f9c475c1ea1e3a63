//! Criterion benchmarks for aliaslab-core
//!
//! Run with: cargo bench -p aliaslab-core

use aliaslab_core::special::{PolylogOrder, f2, f3, polylog};
use aliaslab_core::{AntialiasOrder, TapMatrix};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

/// Generate a high-drive test sine
fn generate_sine(size: usize, freq_n: f64, mag: f64) -> Vec<f64> {
    (0..size)
        .map(|n| mag * (2.0 * std::f64::consts::PI * freq_n * n as f64).sin())
        .collect()
}

fn bench_orders(c: &mut Criterion) {
    let mut group = c.benchmark_group("ADAA_Order");

    let signal = generate_sine(4096 + 3, 0.1101, 4.0);
    let x = TapMatrix::sliding(&signal, 4).unwrap();

    for order in AntialiasOrder::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(order), &x, |b, x| {
            b.iter(|| black_box(order.apply(black_box(x)).unwrap()))
        });
    }

    group.finish();
}

fn bench_special(c: &mut Criterion) {
    let mut group = c.benchmark_group("Special");

    let xs: Vec<f64> = (0..1024).map(|i| -8.0 + 16.0 * i as f64 / 1024.0).collect();
    let args: Vec<f64> = xs.iter().map(|x| -(-2.0 * x.abs()).exp()).collect();

    group.bench_function("li2_1024", |b| {
        b.iter(|| black_box(polylog(black_box(&args), PolylogOrder::Dilog)))
    });
    group.bench_function("li3_1024", |b| {
        b.iter(|| black_box(polylog(black_box(&args), PolylogOrder::Trilog)))
    });
    group.bench_function("f2_1024", |b| {
        b.iter(|| black_box(xs.iter().map(|&x| f2(x)).sum::<f64>()))
    });
    group.bench_function("f3_1024", |b| {
        b.iter(|| black_box(xs.iter().map(|&x| f3(x)).sum::<f64>()))
    });

    group.finish();
}

criterion_group!(benches, bench_orders, bench_special);
criterion_main!(benches);
