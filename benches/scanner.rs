//! Benchmarks for call-site scanning and whole-universe validation.
//!
//! Covers the two hot paths:
//! - raw instruction-stream scanning over bodies of varying shape
//! - a full orchestrator pass over a synthetic universe of flattened classes

extern crate flatscope;

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use flatscope::prelude::*;
use std::hint::black_box;

fn call(target: Token) -> Vec<u8> {
    let mut bytes = vec![0x28];
    bytes.extend_from_slice(&target.value().to_le_bytes());
    bytes
}

/// A body interleaving arithmetic, a switch, and `calls` call sites.
fn mixed_body(calls: usize) -> Vec<u8> {
    let mut bytes = Vec::new();
    for row in 0..calls {
        bytes.push(0x02); // ldarg.0
        bytes.extend_from_slice(&[0x1F, 0x2A]); // ldc.i4.s 42
        bytes.push(0x58); // add
        bytes.extend_from_slice(&[0x45, 0x01, 0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00]); // switch
        bytes.extend_from_slice(&call(Token::method_def(row as u32 + 1)));
    }
    bytes.push(0x2A); // ret
    bytes
}

fn universe_with_methods(count: usize) -> TypeUniverse {
    let mut builder = TypeUniverse::builder();
    for row in 0..count {
        builder = builder.add_method(MethodDef::new(
            Token::method_def(row as u32 + 1),
            format!("M{row}"),
            Token::type_def(1),
            None,
        ));
    }
    builder.build()
}

/// Benchmark raw scanning throughput over a mixed instruction stream.
fn bench_scan_calls(c: &mut Criterion) {
    let universe = universe_with_methods(64);
    let body = mixed_body(64);

    let mut group = c.benchmark_group("scanner");
    group.throughput(Throughput::Bytes(body.len() as u64));
    group.bench_function("scan_calls_mixed_stream", |b| {
        b.iter(|| {
            let targets = scan_calls(black_box(&body), black_box(&universe)).unwrap();
            black_box(targets)
        });
    });
    group.finish();
}

/// Builds a universe of `classes` flattened view classes, each with one retained
/// property and one removed property wired through a helper.
fn view_universe(classes: u32) -> TypeUniverse {
    let mut builder = TypeUniverse::builder();
    let contract = Token::type_def(1);
    builder = builder.add_type(
        TypeDef::new(contract, "Bench.IView")
            .with_property(Property::new("Kept", "System.Int32")),
    );

    for index in 0..classes {
        let owner = Token::type_def(index + 2);
        let kept_get = Token::method_def(index * 4 + 1);
        let helper = Token::method_def(index * 4 + 2);
        let removed_get = Token::method_def(index * 4 + 3);

        let mut removed_body = call(kept_get);
        removed_body = [call(helper), removed_body].concat();
        removed_body.push(0x2A);

        builder = builder
            .add_type(
                TypeDef::new(owner, format!("Bench.View{index}"))
                    .with_flags(TypeFlags::FLATTEN_PARTICIPANT)
                    .with_contract(contract)
                    .with_property(Property::new("Kept", "System.Int32").with_getter(kept_get))
                    .with_property(
                        Property::new("Dropped", "System.Int32")
                            .with_flags(PropertyFlags::REMOVED)
                            .with_getter(removed_get),
                    ),
            )
            .add_method(MethodDef::new(kept_get, "get_Kept", owner, Some(vec![0x16, 0x2A])))
            .add_method(MethodDef::new(helper, "Compute", owner, Some(vec![0x16, 0x2A])))
            .add_method(MethodDef::new(removed_get, "get_Dropped", owner, Some(removed_body)));
    }

    builder.build()
}

/// Benchmark a full validation pass, sequential vs parallel scheduling.
fn bench_validation_pass(c: &mut Criterion) {
    let universe = view_universe(256);

    let mut group = c.benchmark_group("orchestrator");
    group.bench_function("validate_256_classes_sequential", |b| {
        b.iter(|| {
            let report = MappingValidator::validate(
                black_box(&universe),
                ValidationConfig::sequential(),
            );
            black_box(report)
        });
    });
    group.bench_function("validate_256_classes_parallel", |b| {
        b.iter(|| {
            let report =
                MappingValidator::validate(black_box(&universe), ValidationConfig::default());
            black_box(report)
        });
    });
    group.finish();
}

criterion_group!(benches, bench_scan_calls, bench_validation_pass);
criterion_main!(benches);
