//! Integration test: train/test evaluation end-to-end

use kolosal_eval::prelude::*;
use polars::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

/// 150 rows, 4 numeric inputs, 3 well-separated classes of 50 rows each
fn three_class_dataset() -> TabularDataset {
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let centers = [("setosa", 1.0), ("versicolor", 5.0), ("virginica", 9.0)];

    let mut features: Vec<Vec<f64>> = vec![Vec::with_capacity(150); 4];
    let mut classes = Vec::with_capacity(150);
    for i in 0..150 {
        let (class, center) = centers[i % 3];
        for column in features.iter_mut() {
            column.push(center + rng.gen_range(-0.5..0.5));
        }
        classes.push(class);
    }

    let x = df!(
        "sepal_length" => &features[0],
        "sepal_width" => &features[1],
        "petal_length" => &features[2],
        "petal_width" => &features[3]
    )
    .unwrap();
    let y = df!("species" => classes).unwrap();
    TabularDataset::new(x, y).unwrap()
}

fn regression_dataset() -> TabularDataset {
    let x1: Vec<f64> = (0..40).map(|i| i as f64).collect();
    let x2: Vec<f64> = (0..40).map(|i| (i * 2) as f64).collect();
    let target: Vec<f64> = (0..40).map(|i| 3.0 * i as f64 + 1.0).collect();
    TabularDataset::new(
        df!("x1" => x1, "x2" => x2).unwrap(),
        df!("target" => target).unwrap(),
    )
    .unwrap()
}

#[test]
fn test_three_class_split_sizes() {
    let evaluator = ModelEvaluator::new(three_class_dataset(), Some(0.2), None, 42).unwrap();

    assert_eq!(evaluator.test_data().len(), 30);
    assert_eq!(evaluator.training_data().len(), 120);

    let train: HashSet<usize> = evaluator.training_data().index().iter().copied().collect();
    let test: HashSet<usize> = evaluator.test_data().index().iter().copied().collect();
    assert!(train.is_disjoint(&test));
    let all: HashSet<usize> = train.union(&test).copied().collect();
    assert_eq!(all, (0..150).collect::<HashSet<_>>());
}

#[test]
fn test_split_reproducible_with_same_seed() {
    let a = ModelEvaluator::new(three_class_dataset(), Some(0.2), None, 42).unwrap();
    let b = ModelEvaluator::new(three_class_dataset(), Some(0.2), None, 42).unwrap();
    assert_eq!(a.test_data().index(), b.test_data().index());
    assert!(a.training_data().inputs().data().equals(b.training_data().inputs().data()));
    assert!(a.test_data().outputs().data().equals(b.test_data().outputs().data()));

    let c = ModelEvaluator::new(three_class_dataset(), Some(0.2), None, 7).unwrap();
    assert_ne!(a.test_data().index(), c.test_data().index());
}

#[test]
fn test_inputs_and_outputs_stay_aligned() {
    let evaluator = ModelEvaluator::new(regression_dataset(), Some(0.25), None, 42).unwrap();
    let test = evaluator.test_data();
    let x1 = test.inputs().column_values("x1").unwrap();
    let target = test.outputs().column_values("target").unwrap();
    for (x, y) in x1.iter().zip(target.iter()) {
        assert_eq!(*y, 3.0 * x + 1.0);
    }
    for (label, x) in test.index().iter().zip(x1.iter()) {
        assert_eq!(*label as f64, *x);
    }
}

#[test]
fn test_invalid_construction() {
    let data = three_class_dataset();
    assert!(matches!(
        ModelEvaluator::new(data.clone(), None, None, 42),
        Err(EvalError::ConfigError(_))
    ));
    assert!(matches!(
        ModelEvaluator::new(data.clone(), Some(0.2), Some(data.clone()), 42),
        Err(EvalError::ConfigError(_))
    ));
    assert!(matches!(
        ModelEvaluator::new(data.clone(), Some(-0.1), None, 42),
        Err(EvalError::InvalidParameter { .. })
    ));
    assert!(matches!(
        ModelEvaluator::new(data, Some(1.01), None, 42),
        Err(EvalError::InvalidParameter { .. })
    ));
}

#[test]
fn test_mismatched_dataset_rows() {
    let x = df!("a" => &[1.0, 2.0, 3.0]).unwrap();
    let y = df!("b" => &[1.0, 2.0]).unwrap();
    assert!(matches!(TabularDataset::new(x, y), Err(EvalError::ShapeError { .. })));
}

#[test]
fn test_nearest_centroid_classifies_three_classes() {
    let evaluator = VectorClassificationModelEvaluator::new(
        ModelEvaluator::new(three_class_dataset(), Some(0.2), None, 42).unwrap(),
    );
    let mut model = VectorClassificationModel::new(NearestCentroidClassifier::new())
        .with_input_transformer(Scaler::new(ScalerType::Standard));

    let eval_data = evaluator.fit_and_eval(&mut model).unwrap();
    let stats = eval_data.get_eval_stats();

    assert!(stats.accuracy() >= 0.9, "accuracy too low: {}", stats.accuracy());
    assert!(stats.metrics().balanced_accuracy >= 0.9);
    assert!(stats.metrics().log_loss.is_finite());
    assert_eq!(
        stats.labels(),
        &["setosa".to_string(), "versicolor".to_string(), "virginica".to_string()]
    );

    let cm = stats.confusion_matrix();
    let total: usize = cm.counts().iter().sum();
    assert_eq!(total, 30);
}

#[test]
fn test_regression_evaluation_with_explicit_test_data() {
    let train = regression_dataset();
    let test = train.filter_indices(&[0, 10, 20, 30]).unwrap();
    let evaluator = VectorRegressionModelEvaluator::new(ModelEvaluator::new(train, None, Some(test), 42).unwrap());

    let mut model = VectorRegressionModel::new(MeanRegressor::new());
    let eval_data = evaluator.fit_and_eval(&mut model).unwrap();

    let stats = eval_data.get_eval_stats(Some("target")).unwrap();
    assert_eq!(stats.len(), 4);
    // training mean is 3 * 19.5 + 1
    let expected_mae = [1.0, 31.0, 61.0, 91.0]
        .iter()
        .map(|y| (y - 59.5f64).abs())
        .sum::<f64>()
        / 4.0;
    assert!((stats.metrics().mae - expected_mae).abs() < 1e-9);

    let df = eval_data.data_frame().unwrap();
    assert_eq!(df.height(), 1);
    assert!(df.column("rmse").is_ok());
}

#[test]
fn test_eval_before_fit_fails() {
    let evaluator = VectorRegressionModelEvaluator::new(
        ModelEvaluator::new(regression_dataset(), Some(0.2), None, 42).unwrap(),
    );
    let model = VectorRegressionModel::new(MeanRegressor::new());
    let err = evaluator.eval_model(&model).unwrap_err();
    assert!(matches!(err, EvalError::ModelNotFitted(_)));
}

#[test]
fn test_evaluator_config_roundtrip() {
    let config = EvaluatorConfig::new().with_test_fraction(0.2).with_random_seed(42);
    let restored = EvaluatorConfig::from_json(&config.to_json().unwrap()).unwrap();
    assert_eq!(restored, config);

    let evaluator = ModelEvaluator::from_config(three_class_dataset(), &restored).unwrap();
    assert_eq!(evaluator.test_data().len(), 30);
}
