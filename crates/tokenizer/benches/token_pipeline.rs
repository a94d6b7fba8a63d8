use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use tokenizer::Pipeline;

fn bench_pipeline(c: &mut Criterion) {
    let pipeline = Pipeline::resolve("text", &["stopwords".to_string(), "stemm_lower".to_string()])
        .expect("pipeline");
    let mut group = c.benchmark_group("token_pipeline");

    for size in [64, 512, 4096, 32768].iter() {
        let text = "the running dogs jumped over lazy fences ".repeat(*size / 8);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_function(format!("bytes_{size}"), |b| {
            b.iter(|| pipeline.run(black_box(&text)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
