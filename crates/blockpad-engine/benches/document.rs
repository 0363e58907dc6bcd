use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
mod common;

fn bench_document_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("document_creation");
    group.sample_size(20);

    group.bench_function("build_500_blocks", |b| {
        b.iter(|| {
            let doc = common::generate_document(black_box(500));
            black_box(doc);
        });
    });

    group.finish();
}

fn bench_document_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("document_operations");
    group.sample_size(20);

    let doc = common::generate_document(500);
    let middle = common::middle_id(&doc);

    group.bench_function("snapshot", |b| {
        b.iter(|| {
            let snapshot = doc.snapshot();
            black_box(snapshot);
        });
    });

    group.bench_function("get_next", |b| {
        b.iter(|| {
            let next = doc.get_next(black_box(middle)).map(|node| node.id());
            black_box(next);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_document_creation, bench_document_operations);
criterion_main!(benches);
