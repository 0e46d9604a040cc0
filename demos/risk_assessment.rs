extern crate riskglm;

use riskglm::{
    datasets::{train_test_split, DatasetBase},
    estimators::{LogisticRegression, ParamGuard},
    helpers::test_helpers::generate_two_clusters,
    risk::RiskModel,
};

fn main() {
    let (x, y) = generate_two_clusters(100, 5, 2.5, 0);
    let dataset = DatasetBase::from((x, y));
    let (train, test) = train_test_split(&dataset, 0.2, 42);

    let params = LogisticRegression::params()
        .learning_rate(0.1)
        .max_iterations(1000)
        .seed(42)
        .check_unwrap();
    let feature_names = (0..train.n_features())
        .map(|j| format!("measurement_{}", j))
        .collect();

    println!("#### Training malignancy risk model");
    let model =
        RiskModel::train(&train.design_matrix, &train.targets, feature_names, params).unwrap();

    let report = model.evaluate(&test.design_matrix, &test.targets).unwrap();
    println!("accuracy:    {:.3}", report.accuracy);
    println!("precision:   {:.3}", report.precision);
    println!("recall:      {:.3}", report.recall);
    println!("specificity: {:.3}", report.specificity);
    println!("f1:          {:.3}", report.f1);
    if let Some(auc) = report.roc_auc {
        println!("roc auc:     {:.3}", auc);
    }

    println!("#### Most influential measurements");
    for (name, importance) in model.top_features(3).unwrap() {
        println!("{}: {:.4}", name, importance);
    }

    println!("#### Scoring held-out observations");
    for (row, assessment) in test
        .design_matrix
        .rows()
        .into_iter()
        .zip(model.assess_batch(&test.design_matrix).unwrap())
        .take(5)
    {
        println!(
            "{:?} -> p = {:.3}, risk: {}, confidence: {:.3}",
            row.to_vec(),
            assessment.probability,
            assessment.level,
            assessment.confidence
        );
    }
}
