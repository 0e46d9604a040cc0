use std::cell::Cell;
use std::collections::{HashMap, HashSet};

use approx::assert_relative_eq;
use ndarray::{array, Array1, Array2};

use crate::estimators::{
    EstimatorError, LogisticRegression, LogisticRegressionValidParams, ParamGuard,
};
use crate::helpers::test_helpers::*;
use crate::preprocessing::PreprocessingError;
use crate::risk::*;

fn names() -> Vec<String> {
    vec!["radius".into(), "texture".into(), "area".into()]
}

fn params() -> LogisticRegressionValidParams<f64> {
    LogisticRegression::params()
        .learning_rate(0.1)
        .max_iterations(500)
        .seed(0)
        .check_unwrap()
}

fn trained_model() -> (RiskModel<f64>, Array2<f64>, Array1<f64>) {
    let (x, y) = generate_two_clusters(50, 3, 4., 5);
    let model = RiskModel::train(&x, &y, names(), params()).unwrap();
    (model, x, y)
}

#[test]
fn test_risk_level_bands() {
    assert_eq!(RiskLevel::from_probability(0.), RiskLevel::VeryLow);
    assert_eq!(RiskLevel::from_probability(0.29), RiskLevel::VeryLow);
    assert_eq!(RiskLevel::from_probability(0.3), RiskLevel::Low);
    assert_eq!(RiskLevel::from_probability(0.49f32), RiskLevel::Low);
    assert_eq!(RiskLevel::from_probability(0.5), RiskLevel::Moderate);
    assert_eq!(RiskLevel::from_probability(0.7), RiskLevel::High);
    assert_eq!(RiskLevel::from_probability(1.), RiskLevel::High);
    assert!(RiskLevel::VeryLow < RiskLevel::High);
}

#[test]
fn test_risk_level_display() {
    assert_eq!(RiskLevel::VeryLow.to_string(), "Very Low");
    assert_eq!(RiskLevel::Low.to_string(), "Low");
    assert_eq!(RiskLevel::Moderate.to_string(), "Moderate");
    assert_eq!(RiskLevel::High.to_string(), "High");
}

#[test]
fn test_tumor_features() {
    let unique: HashSet<&str> = TUMOR_FEATURES.iter().copied().collect();
    assert_eq!(unique.len(), 30);
    assert_eq!(TUMOR_FEATURES[0], "radius_mean");
    assert_eq!(TUMOR_FEATURES[29], "fractal_dimension_worst");
}

#[test]
fn test_train_and_evaluate() {
    let (model, x, y) = trained_model();
    assert!(model.estimator().is_fitted());
    assert_eq!(model.feature_names(), names().as_slice());
    assert_eq!(model.scaler().n_features(), 3);

    let report = model.evaluate(&x, &y).unwrap();
    assert!(report.accuracy >= 0.95, "accuracy {}", report.accuracy);
    assert!(report.roc_auc.unwrap() >= 0.95);
    assert_eq!(report.confusion_matrix.total(), 100);
}

#[test]
fn test_train_feature_names_mismatch() {
    let (x, y) = generate_two_clusters(5, 3, 4., 0);
    let result = RiskModel::train(&x, &y, vec!["a".into()], params());
    assert_eq!(
        result,
        Err(RiskError::FeatureNamesMismatch {
            expected: 3,
            found: 1
        })
    );
}

#[test]
fn test_train_rejects_non_binary_targets() {
    let x = array![[1., 2., 3.], [2., 3., 4.]];
    let y = array![0., 2.];
    assert_eq!(
        RiskModel::train(&x, &y, names(), params()),
        Err(RiskError::Estimator(EstimatorError::NonBinaryTarget(1)))
    );
}

#[test]
fn test_assess() {
    let (model, _, _) = trained_model();

    let malignant = model.assess(&array![4., 4., 4.]).unwrap();
    assert!(malignant.is_malignant());
    assert_eq!(malignant.level, RiskLevel::High);
    assert!(malignant.probability > 0.7);

    let benign = model.assess(&array![0., 0., 0.]).unwrap();
    assert!(!benign.is_malignant());
    assert_eq!(benign.label, 0);
    assert_eq!(benign.level, RiskLevel::VeryLow);
    assert_eq!(benign.level, RiskLevel::from_probability(benign.probability));
}

#[test]
fn test_assess_matches_batch() {
    let (model, x, _) = trained_model();
    let batch = model.assess_batch(&x).unwrap();
    assert_eq!(batch.len(), x.nrows());
    for (row, expected) in x.rows().into_iter().zip(batch.iter()).take(10) {
        let single = model.assess(&row).unwrap();
        assert_relative_eq!(single.probability, expected.probability, epsilon = 1e-12);
        assert_eq!(single.label, expected.label);
    }
}

#[test]
fn test_assess_shape_mismatch() {
    let (model, _, _) = trained_model();
    assert_eq!(
        model.assess(&array![1., 2.]),
        Err(RiskError::Preprocessing(PreprocessingError::ShapeMismatch {
            expected: 3,
            found: 2
        }))
    );
}

#[test]
fn test_assess_named() {
    let (model, _, _) = trained_model();
    let mut values = HashMap::new();
    values.insert(String::from("area"), 3.5);
    values.insert(String::from("radius"), 3.);
    values.insert(String::from("texture"), 4.);
    values.insert(String::from("unused"), -100.);

    let named = model.assess_named(&values).unwrap();
    let positional = model.assess(&array![3., 4., 3.5]).unwrap();
    assert_eq!(named, positional);

    values.remove("texture");
    assert_eq!(
        model.assess_named(&values),
        Err(RiskError::MissingFeature(String::from("texture")))
    );
}

#[test]
fn test_top_features() {
    let (model, _, _) = trained_model();
    let top = model.top_features(2).unwrap();
    assert_eq!(top.len(), 2);
    assert!(top[0].1 >= top[1].1);

    let all = model.top_features(10).unwrap();
    assert_eq!(all.len(), 3);
    let coefficients = model.estimator().weights().unwrap().coefficients;
    let max = coefficients.iter().fold(0f64, |acc, w| acc.max(w.abs()));
    assert_relative_eq!(all[0].1, max);
}

#[test]
fn test_artifact_round_trip() {
    let (model, x, _) = trained_model();
    let artifact = model.to_artifact().unwrap();
    assert_eq!(artifact.weights.len(), 4);

    let json = serde_json::to_string(&artifact).unwrap();
    let restored_artifact: RiskModelArtifact<f64> = serde_json::from_str(&json).unwrap();
    let restored = RiskModel::from_artifact(restored_artifact).unwrap();

    assert_eq!(restored.feature_names(), model.feature_names());
    let expected = model.assess_batch(&x).unwrap();
    let found = restored.assess_batch(&x).unwrap();
    for (e, f) in expected.iter().zip(found.iter()) {
        assert_relative_eq!(e.probability, f.probability, epsilon = 1e-12);
        assert_eq!(e.level, f.level);
    }
}

#[test]
fn test_inconsistent_artifact() {
    let (model, _, _) = trained_model();

    let mut artifact = model.to_artifact().unwrap();
    artifact.weights = array![0.1, 0.2];
    assert_eq!(
        RiskModel::from_artifact(artifact),
        Err(RiskError::Estimator(EstimatorError::ShapeMismatch {
            expected: 3,
            found: 1
        }))
    );

    let mut artifact = model.to_artifact().unwrap();
    artifact.feature_names.pop();
    assert_eq!(
        RiskModel::from_artifact(artifact),
        Err(RiskError::FeatureNamesMismatch {
            expected: 3,
            found: 2
        })
    );

    let mut artifact = model.to_artifact().unwrap();
    artifact.scale[0] = 0.;
    assert_eq!(
        RiskModel::from_artifact(artifact),
        Err(RiskError::Preprocessing(PreprocessingError::InvalidScale(0)))
    );
}

#[test]
fn test_load_or_train() {
    let (model, x, y) = trained_model();
    let trained = Cell::new(false);
    let train = || {
        trained.set(true);
        RiskModel::train(&x, &y, names(), params())
    };

    let loaded = RiskModel::load_or_train(Some(model.to_artifact().unwrap()), train).unwrap();
    assert!(!trained.get());
    assert_eq!(loaded.feature_names(), model.feature_names());

    let fresh = RiskModel::load_or_train(None, train).unwrap();
    assert!(trained.get());
    assert!(fresh.estimator().is_fitted());
}

#[test]
fn test_load_or_train_falls_back_on_invalid_artifact() {
    let (model, x, y) = trained_model();
    let mut artifact = model.to_artifact().unwrap();
    artifact.weights = Array1::zeros(0);

    let trained = Cell::new(false);
    let restored = RiskModel::load_or_train(Some(artifact), || {
        trained.set(true);
        RiskModel::train(&x, &y, names(), params())
    })
    .unwrap();
    assert!(trained.get());
    assert_eq!(restored.estimator().n_features(), Some(3));
}

#[test]
fn test_assessment_confidence() {
    assert_relative_eq!(RiskAssessment::from_probability(0.5).confidence, 0.);
    assert_relative_eq!(RiskAssessment::from_probability(0.).confidence, 1.);
    assert_relative_eq!(RiskAssessment::from_probability(1.).confidence, 1.);
    assert_relative_eq!(
        RiskAssessment::from_probability(0.85).confidence,
        0.7,
        epsilon = 1e-12
    );
    assert_relative_eq!(
        RiskAssessment::from_probability(0.15f32).confidence,
        0.7,
        epsilon = 1e-6
    );

    let (model, _, _) = trained_model();
    let benign = model.assess(&array![0., 0., 0.]).unwrap();
    assert_relative_eq!(
        benign.confidence,
        2. * (benign.probability - 0.5).abs(),
        epsilon = 1e-12
    );
}

#[test]
fn test_artifact_with_invalid_hyperparameters_is_rejected() {
    let (model, _, _) = trained_model();
    let value = serde_json::to_value(model.to_artifact().unwrap()).unwrap();

    for (key, invalid) in [
        ("max_iterations", serde_json::json!(0)),
        ("learning_rate", serde_json::json!(-5.0)),
        ("tolerance", serde_json::json!(-1.0)),
    ] {
        let mut tampered = value.clone();
        tampered["hyperparameters"][key] = invalid;
        assert!(serde_json::from_value::<RiskModelArtifact<f64>>(tampered).is_err());
    }
}
