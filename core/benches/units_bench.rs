// Unit conversion benchmarks.
//
// Covers parsing user-entered amounts into base units and formatting base
// units back for display, at the decimals real tokens use.

use alloy_primitives::U256;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use yieldvault_core::units::{format_units, parse_units};

fn bench_parse_units(c: &mut Criterion) {
    let mut group = c.benchmark_group("units/parse");
    for decimals in [6u8, 18] {
        group.bench_with_input(
            BenchmarkId::from_parameter(decimals),
            &decimals,
            |b, &d| {
                b.iter(|| parse_units("123456.789", d));
            },
        );
    }
    group.finish();
}

fn bench_format_units(c: &mut Criterion) {
    let mut group = c.benchmark_group("units/format");
    for decimals in [6u8, 18] {
        let value = parse_units("98765.4321", decimals).unwrap_or(U256::ZERO);
        group.bench_with_input(
            BenchmarkId::from_parameter(decimals),
            &decimals,
            |b, &d| {
                b.iter(|| format_units(value, d));
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_parse_units, bench_format_units);
criterion_main!(benches);
