use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ndarray::Array2;

use conceptvec::prelude::*;

const N_WORDS: usize = 20_000;
const DIMS: usize = 300;

fn synthetic_embeddings() -> Embeddings<SimpleVocab, NdArray> {
    let words = (0..N_WORDS).map(|idx| format!("word{}", idx)).collect();
    let matrix = Array2::from_shape_fn((N_WORDS, DIMS), |(r, c)| {
        ((r * DIMS + c) as f32 * 0.618).sin() + 0.01
    });
    Embeddings::from_words(words, matrix).unwrap()
}

fn similarity_benchmark(c: &mut Criterion) {
    let embeds = synthetic_embeddings();

    c.bench_function("nearest-to-term-10", |b| {
        b.iter(|| embeds.nearest_to_term(black_box("word42"), 10).unwrap())
    });

    c.bench_function("nearest-to-term-1000", |b| {
        b.iter(|| embeds.nearest_to_term(black_box("word42"), 1000).unwrap())
    });

    c.bench_function("analogy-10", |b| {
        b.iter(|| {
            embeds
                .analogy(black_box(["word1", "word2", "word3"]), 10)
                .unwrap()
        })
    });

    c.bench_function("similarity", |b| {
        b.iter(|| embeds.similarity(black_box("word1"), black_box("word2")).unwrap())
    });
}

criterion_group!(similarity_benches, similarity_benchmark);
criterion_main!(similarity_benches);
