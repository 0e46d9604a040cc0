use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use riskglm::datasets::DenseDataset;
use riskglm::estimators::{Fit, LogisticRegression};
use riskglm::helpers::test_helpers::generate_random_data;

fn bench_logistic(c: &mut Criterion) {
    let mut group = c.benchmark_group("logistic_regression");
    group.sample_size(10);

    for n_samples in [100, 1000] {
        for n_features in [10, 30] {
            for max_iterations in [100, 1000] {
                let (x, y) = generate_random_data(n_samples, n_features);
                let dataset = DenseDataset::from((x, y));

                let clf = LogisticRegression::params()
                    .learning_rate(0.1)
                    .max_iterations(max_iterations)
                    .tolerance(0.)
                    .seed(0);
                let config = (n_samples, n_features, max_iterations);
                let config_string = format!("{}, {}, {}", n_samples, n_features, max_iterations);

                group.bench_with_input(
                    BenchmarkId::new("gradient_descent", config_string),
                    &config,
                    |b, _| b.iter(|| clf.fit(&dataset).unwrap()),
                );
            }
        }
    }

    group.finish();
}

criterion_group!(benches, bench_logistic);
criterion_main!(benches);
