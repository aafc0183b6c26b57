//! Benchmarks for local-file streaming.
//!
//! Measures chunked read throughput for full and ranged requests, plus
//! Range header parsing overhead.

use chanstream::streaming::{file_chunk_stream, parse_range_header, CHUNK_SIZE};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use futures::StreamExt;
use std::path::PathBuf;

fn write_file(dir: &tempfile::TempDir, name: &str, size: usize) -> PathBuf {
    let path = dir.path().join(name);
    let data: Vec<u8> = (0..size).map(|i| (i % 251) as u8).collect();
    std::fs::write(&path, data).unwrap();
    path
}

/// Benchmark streaming whole files of typical media-chunk sizes.
fn bench_full_file_stream(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let dir = tempfile::tempdir().unwrap();

    let mut group = c.benchmark_group("full_file_stream");

    for size in [64 * 1024, 1024 * 1024, 4 * 1024 * 1024] {
        let path = write_file(&dir, &format!("full_{size}.bin"), size);

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_function(format!("read_{}", size), |b| {
            b.iter(|| {
                rt.block_on(async {
                    let chunks: Vec<_> =
                        file_chunk_stream(path.clone(), None).collect().await;
                    black_box(chunks)
                })
            });
        });
    }

    group.finish();
}

/// Benchmark ranged reads: a single chunk-sized window from the middle of
/// a larger file.
fn bench_ranged_stream(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let dir = tempfile::tempdir().unwrap();

    let file_size = 4 * 1024 * 1024;
    let path = write_file(&dir, "ranged.bin", file_size);

    let mut group = c.benchmark_group("ranged_stream");
    group.throughput(Throughput::Bytes(CHUNK_SIZE as u64));

    let start = (file_size / 2) as u64;
    let end = start + CHUNK_SIZE as u64 - 1;

    group.bench_function("middle_chunk", |b| {
        b.iter(|| {
            rt.block_on(async {
                let chunks: Vec<_> = file_chunk_stream(path.clone(), Some((start, end)))
                    .collect()
                    .await;
                black_box(chunks)
            })
        });
    });

    group.finish();
}

/// Benchmark Range header parsing.
fn bench_range_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("range_parsing");

    for header in ["bytes=0-1023", "bytes=500-", "bytes=-256", "bytes=abc-def"] {
        group.bench_function(format!("parse_{}", header.replace('=', "_")), |b| {
            b.iter(|| black_box(parse_range_header(black_box(header), 1024 * 1024)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_full_file_stream,
    bench_ranged_stream,
    bench_range_parsing
);
criterion_main!(benches);
