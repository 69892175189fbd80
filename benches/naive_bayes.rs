//! Benchmarks for Gaussian Naive Bayes training and classification.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gaussian_nb::prelude::*;

const N_FEATURES: usize = 16;
const N_CLASSES: usize = 4;

/// Deterministic `N_FEATURES × n` batch with labels cycling over the classes.
fn synthetic_batch(n: usize) -> (Matrix<f64>, Vec<usize>) {
    let labels: Vec<usize> = (0..n).map(|k| k % N_CLASSES).collect();
    let mut data = Vec::with_capacity(N_FEATURES * n);
    for i in 0..N_FEATURES {
        for (k, &label) in labels.iter().enumerate() {
            let noise = ((i * 31 + k * 17) % 97) as f64 / 97.0 - 0.5;
            data.push(label as f64 * 3.0 + i as f64 * 0.1 + noise);
        }
    }
    let x = Matrix::from_vec(N_FEATURES, n, data).unwrap();
    (x, labels)
}

fn bench_fit_replace(c: &mut Criterion) {
    let mut group = c.benchmark_group("naive_bayes_fit_replace");

    for size in [100, 1_000, 10_000].iter() {
        let (x, y) = synthetic_batch(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                GaussianNaiveBayes::from_data(
                    black_box(&x),
                    black_box(&y),
                    N_CLASSES,
                    NaiveBayesConfig::default(),
                )
                .unwrap()
            });
        });
    }

    group.finish();
}

fn bench_fit_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("naive_bayes_fit_merge");

    for size in [100, 1_000, 10_000].iter() {
        let (x, y) = synthetic_batch(*size);
        let (seed_x, seed_y) = synthetic_batch(1_000);
        let model = GaussianNaiveBayes::from_data(&seed_x, &seed_y, N_CLASSES, NaiveBayesConfig::default())
            .unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let mut model = model.clone();
                model.fit_merge(black_box(&x), black_box(&y)).unwrap();
                model
            });
        });
    }

    group.finish();
}

fn bench_classify_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("naive_bayes_classify_batch");

    let (train_x, train_y) = synthetic_batch(1_000);
    let model =
        GaussianNaiveBayes::from_data(&train_x, &train_y, N_CLASSES, NaiveBayesConfig::default())
            .unwrap();

    for size in [100, 1_000, 10_000].iter() {
        let (x, _) = synthetic_batch(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| model.classify_batch(black_box(&x)).unwrap());
        });
    }

    group.finish();
}

fn bench_classify_pointwise(c: &mut Criterion) {
    let (train_x, train_y) = synthetic_batch(1_000);
    let model =
        GaussianNaiveBayes::from_data(&train_x, &train_y, N_CLASSES, NaiveBayesConfig::default())
            .unwrap();
    let (x, _) = synthetic_batch(1_000);
    let points: Vec<Vector<f64>> = (0..x.n_cols()).map(|k| x.column(k)).collect();

    c.bench_function("naive_bayes_classify_pointwise_1000", |b| {
        b.iter(|| {
            points
                .iter()
                .map(|p| model.classify(black_box(p)).unwrap())
                .sum::<usize>()
        });
    });
}

criterion_group!(
    benches,
    bench_fit_replace,
    bench_fit_merge,
    bench_classify_batch,
    bench_classify_pointwise
);
criterion_main!(benches);
