//! Benchmarks for the two boundary strategies

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use divvy_core::{BoundaryMatcher, FastqScanner, RegexMatcher, FASTQ_PATTERN};
use std::hint::black_box;

/// Synthetic FASTQ whose quality lines often start with the sentinel
fn fastq(records: usize) -> Vec<u8> {
    let mut out = Vec::new();
    for i in 0..records {
        let record = format!("@read{i}\nACGTACGTACGTACGTACGT\n+\n@IIIIIIIIIIIIIIIIIII\n");
        out.extend_from_slice(record.as_bytes());
    }
    out
}

/// Walk every boundary in `data`
fn count_boundaries(matcher: &dyn BoundaryMatcher, data: &[u8]) -> usize {
    let mut count = 0;
    let mut from = 0;
    while let Some(pos) = matcher.find(data, from) {
        count += 1;
        from = pos + 1;
    }
    count
}

fn bench_locate(c: &mut Criterion) {
    let mut group = c.benchmark_group("boundaries");
    let regex = RegexMatcher::new(FASTQ_PATTERN).unwrap();
    let scanner = FastqScanner::new();

    for records in [100, 10_000] {
        let data = fastq(records);
        group.throughput(Throughput::Bytes(data.len() as u64));

        group.bench_with_input(BenchmarkId::new("regex", records), &data, |b, data| {
            b.iter(|| count_boundaries(&regex, black_box(data)))
        });
        group.bench_with_input(BenchmarkId::new("grammar", records), &data, |b, data| {
            b.iter(|| count_boundaries(&scanner, black_box(data)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_locate);
criterion_main!(benches);
