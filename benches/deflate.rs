//! Criterion benchmarks for the DEFLATE compression core.
//!
//! Run with:
//!   cargo bench --bench deflate
//!
//! Optionally set SILESIA_CORPUS_DIR to a directory of corpus files so the
//! benchmarks run against real-world data instead of synthetic lorem ipsum.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use deflatr::{compress_to_vec, Deflate, FlushMode, Strategy};

mod corpus {
    include!("corpus.rs");
}

fn bench_compress_levels(c: &mut Criterion) {
    let mut group = c.benchmark_group("compress_by_level");

    for &chunk_size in &[65_536usize, 262_144] {
        let chunks = corpus::corpus_chunks(chunk_size);
        let chunk = chunks[0].clone();

        for &level in &[1i32, 6, 9] {
            group.throughput(Throughput::Bytes(chunk_size as u64));
            group.bench_with_input(
                BenchmarkId::new(format!("level_{level}"), chunk_size),
                &chunk,
                |b, chunk| b.iter(|| compress_to_vec(chunk, level).unwrap()),
            );
        }
    }

    group.finish();
}

fn bench_streaming_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("streaming_write");
    let chunk = corpus::synthetic_data(262_144);
    let mut scratch = vec![0u8; chunk.len() * 2 + 4096];

    group.throughput(Throughput::Bytes(chunk.len() as u64));
    group.bench_function("level_6_single_chunk", |b| {
        b.iter(|| {
            let mut deflate = Deflate::new(6, 15, 8, Strategy::Default).unwrap();
            deflate
                .write(&chunk, &mut scratch, FlushMode::Finish)
                .unwrap()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_compress_levels, bench_streaming_write);
criterion_main!(benches);
