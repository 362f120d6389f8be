use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sigscout::{ScanConfig, ScanEngine, Signature};
use std::fs;
use std::num::{NonZeroU64, NonZeroUsize};
use tempfile::tempdir;

fn bench_config(chunk_size: u64, threads: usize) -> ScanConfig {
    ScanConfig {
        chunk_size: NonZeroU64::new(chunk_size).unwrap(),
        thread_count: NonZeroUsize::new(threads).unwrap(),
        log_level: "error".to_string(),
    }
}

/// Builds `count` signatures of staggered lengths, none of which occur in
/// the generated corpus, so the benches measure full scans.
fn build_signatures(count: usize) -> Vec<Signature> {
    (0..count)
        .map(|i| {
            let len = 8 + (i * 5) % 48;
            let bytes: Vec<u8> = (0..len).map(|j| 0x80 | ((i + j) as u8 & 0x3f)).collect();
            Signature::new(bytes, format!("bench-sig-{i:03}"))
        })
        .collect()
}

fn build_corpus(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i % 61) as u8).collect()
}

fn bench_buffer_sizes(c: &mut Criterion) {
    let engine = ScanEngine::new(build_signatures(32), &bench_config(1 << 20, 4)).unwrap();

    let mut group = c.benchmark_group("buffer_sizes");
    for &size in &[4 * 1024, 64 * 1024, 1024 * 1024] {
        let corpus = build_corpus(size);
        group.bench_function(format!("scan_{}kb", size / 1024), |b| {
            b.iter(|| black_box(engine.scan_bytes(black_box(&corpus))));
        });
    }
    group.finish();
}

fn bench_signature_counts(c: &mut Criterion) {
    let corpus = build_corpus(256 * 1024);

    let mut group = c.benchmark_group("signature_counts");
    for &count in &[1usize, 8, 64] {
        let engine = ScanEngine::new(build_signatures(count), &bench_config(1 << 20, 4)).unwrap();
        group.bench_function(format!("signatures_{count}"), |b| {
            b.iter(|| black_box(engine.scan_bytes(black_box(&corpus))));
        });
    }
    group.finish();
}

fn bench_thread_counts(c: &mut Criterion) {
    let corpus = build_corpus(512 * 1024);

    let mut group = c.benchmark_group("thread_counts");
    for &threads in &[1usize, 2, 4] {
        let engine = ScanEngine::new(build_signatures(64), &bench_config(1 << 20, threads)).unwrap();
        group.bench_function(format!("threads_{threads}"), |b| {
            b.iter(|| black_box(engine.scan_bytes(black_box(&corpus))));
        });
    }
    group.finish();
}

fn bench_file_scan(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bench.bin");
    fs::write(&path, build_corpus(4 * 1024 * 1024)).unwrap();

    let mut group = c.benchmark_group("file_scan");
    for &chunk_size in &[256 * 1024u64, 1024 * 1024] {
        let engine = ScanEngine::new(build_signatures(16), &bench_config(chunk_size, 4)).unwrap();
        group.bench_function(format!("chunk_{}kb", chunk_size / 1024), |b| {
            b.iter(|| black_box(engine.scan_file(black_box(&path))));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_buffer_sizes,
    bench_signature_counts,
    bench_thread_counts,
    bench_file_scan
);
criterion_main!(benches);
