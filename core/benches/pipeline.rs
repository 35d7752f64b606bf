use std::io::Cursor;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use transform_core::crypto::KeyMaterial;
use transform_core::stream::Pipeline;

fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 97) as u8 ^ (i / 4096) as u8).collect()
}

fn encode(pipeline: &Pipeline, data: &[u8], chunk: usize) -> Vec<u8> {
    let mut out = pipeline.output_stream(Vec::with_capacity(data.len())).unwrap();
    for piece in data.chunks(chunk) {
        out.write(piece).unwrap();
    }
    out.into_inner().unwrap()
}

fn bench_pipeline(c: &mut Criterion) {
    let pipeline = Pipeline::attachment(KeyMaterial::generate());
    let mut group = c.benchmark_group("attachment");

    for size in [64 * 1024, 1024 * 1024, 8 * 1024 * 1024] {
        let data = payload(size);
        let wire = encode(&pipeline, &data, 64 * 1024);
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(BenchmarkId::new("encode", size), &data, |b, data| {
            b.iter(|| black_box(encode(&pipeline, data, 64 * 1024)))
        });

        group.bench_with_input(BenchmarkId::new("decode", size), &wire, |b, wire| {
            b.iter(|| {
                let mut input = pipeline.input_stream(Cursor::new(wire.as_slice())).unwrap();
                let mut total = 0usize;
                while let Some(chunk) = input.read_chunk().unwrap() {
                    total += chunk.len();
                }
                black_box(total)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
