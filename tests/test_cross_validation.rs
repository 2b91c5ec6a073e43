//! Integration test: k-fold cross-validation end-to-end

use kolosal_eval::prelude::*;
use polars::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

fn three_class_dataset() -> TabularDataset {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let centers = [("a", 0.0), ("b", 4.0), ("c", 8.0)];

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
        "f1" => &features[0],
        "f2" => &features[1],
        "f3" => &features[2],
        "f4" => &features[3]
    )
    .unwrap();
    TabularDataset::new(x, df!("class" => classes).unwrap()).unwrap()
}

fn two_target_dataset(n: usize) -> TabularDataset {
    let x: Vec<f64> = (0..n).map(|i| i as f64).collect();
    let y1: Vec<f64> = (0..n).map(|i| (i % 5) as f64).collect();
    let y2: Vec<f64> = (0..n).map(|i| (i % 3) as f64 * 10.0).collect();
    TabularDataset::new(df!("x" => x).unwrap(), df!("y1" => y1, "y2" => y2).unwrap()).unwrap()
}

fn test_blocks(cv: &VectorClassificationModelCrossValidator) -> Vec<Vec<usize>> {
    cv.evaluators()
        .iter()
        .map(|e| e.evaluator().test_data().index().to_vec())
        .collect()
}

#[test]
fn test_five_folds_of_thirty() {
    let cv = VectorClassificationModelCrossValidator::new(
        &three_class_dataset(),
        &CrossValidationConfig::new().with_folds(5).with_random_seed(42),
    )
    .unwrap();

    let blocks = test_blocks(&cv);
    assert_eq!(blocks.len(), 5);

    let mut seen = HashSet::new();
    for block in &blocks {
        assert_eq!(block.len(), 30);
        for idx in block {
            assert!(seen.insert(*idx), "row {} tested twice", idx);
        }
    }
    assert_eq!(seen.len(), 150);
}

#[test]
fn test_folds_reproducible_with_same_seed() {
    let config = CrossValidationConfig::new().with_random_seed(42);
    let a = VectorClassificationModelCrossValidator::new(&three_class_dataset(), &config).unwrap();
    let b = VectorClassificationModelCrossValidator::new(&three_class_dataset(), &config).unwrap();
    assert_eq!(test_blocks(&a), test_blocks(&b));
}

#[test]
fn test_classification_cross_validation() {
    let cv = VectorClassificationModelCrossValidator::new(&three_class_dataset(), &CrossValidationConfig::default())
        .unwrap();
    let model = VectorClassificationModel::new(NearestCentroidClassifier::new());

    let result = cv.eval_model(&model).unwrap();
    assert!(!model.is_fitted());
    assert_eq!(result.num_folds(), 5);
    assert_eq!(result.trained_models().len(), 5);

    let collection = result.get_eval_stats_collection();
    let summary = collection.summary();
    let (name, accuracy) = &summary[0];
    assert_eq!(*name, "accuracy");
    assert!(accuracy.mean >= 0.9);
    assert!(accuracy.min <= accuracy.max);

    let combined = collection.combined_eval_stats().unwrap();
    assert_eq!(combined.y_true().len(), 150);
    assert_eq!(combined.confusion_matrix().counts().iter().sum::<usize>(), 150);
}

#[test]
fn test_regression_cross_validation_multiple_targets() {
    let data = two_target_dataset(32);
    let cv = VectorRegressionModelCrossValidator::new(&data, &CrossValidationConfig::new().with_folds(5)).unwrap();
    let model = VectorRegressionModel::new(MeanRegressor::new())
        .with_input_transformer(Scaler::new(ScalerType::MinMax));

    let result = cv.eval_model(&model).unwrap();
    assert_eq!(result.predicted_var_names(), &["y1".to_string(), "y2".to_string()]);

    // 32 rows in 5 folds: blocks of 6, two rows never tested
    let tested: HashSet<usize> = result.test_indices_list().iter().flatten().copied().collect();
    assert_eq!(tested.len(), 30);
    let untested: Vec<usize> = (0..32).filter(|i| !tested.contains(i)).collect();
    for evaluator in cv.evaluators() {
        let train = evaluator.evaluator().training_data().index();
        assert_eq!(train.len(), 26);
        for idx in &untested {
            assert!(train.contains(idx));
        }
    }

    assert!(matches!(
        result.get_eval_stats_collection(None),
        Err(EvalError::AmbiguousVariable(_))
    ));
    let collection = result.get_eval_stats_collection(Some("y2")).unwrap();
    assert_eq!(collection.len(), 5);
    let agg = collection.agg_stats();
    assert!(agg.contains_key("mean[rmse]"));
    assert!(agg.contains_key("std[r2]"));
}

#[test]
fn test_trained_models_are_independent() {
    let x: Vec<f64> = (0..20).map(|i| i as f64).collect();
    let y: Vec<f64> = (0..20).map(|i| (i * i) as f64).collect();
    let data = TabularDataset::new(df!("x" => x).unwrap(), df!("y" => y).unwrap()).unwrap();
    let cv = VectorRegressionModelCrossValidator::new(&data, &CrossValidationConfig::new().with_folds(4)).unwrap();
    let result = cv.eval_model(&VectorRegressionModel::new(MeanRegressor::new())).unwrap();

    let means: Vec<f64> = result
        .trained_models()
        .iter()
        .map(|m| m.estimator().means().unwrap()[0].1)
        .collect();
    assert_eq!(means.len(), 4);
    // each fold drops a different block, so the fitted means differ
    let distinct: HashSet<u64> = means.iter().map(|m| m.to_bits()).collect();
    assert!(distinct.len() > 1);
}

#[test]
fn test_invalid_fold_counts() {
    let data = two_target_dataset(4);
    assert!(matches!(
        VectorRegressionModelCrossValidator::new(&data, &CrossValidationConfig::new().with_folds(1)),
        Err(EvalError::InvalidParameter { .. })
    ));
    assert!(matches!(
        VectorRegressionModelCrossValidator::new(&data, &CrossValidationConfig::new().with_folds(5)),
        Err(EvalError::InvalidParameter { .. })
    ));
}

#[test]
fn test_fold_results_keyed_by_model_variables() {
    let data = two_target_dataset(30);
    let cv = VectorRegressionModelCrossValidator::new(&data, &CrossValidationConfig::new().with_folds(3)).unwrap();
    let model = VectorRegressionModel::new(MeanRegressor::new())
        .with_output_transformer(ColumnSelector::new(vec!["y2".to_string(), "y1".to_string()]));

    let result = cv.eval_model(&model).unwrap();
    assert_eq!(result.predicted_var_names(), &["y1".to_string(), "y2".to_string()]);
    for eval_data in result.eval_data_list() {
        assert_eq!(eval_data.predicted_var_names(), result.predicted_var_names());
    }

    let y1 = result.get_eval_stats_collection(Some("y1")).unwrap();
    let y2 = result.get_eval_stats_collection(Some("y2")).unwrap();
    let mae_y1 = y1.combined_eval_stats().unwrap().metrics().mae;
    let mae_y2 = y2.combined_eval_stats().unwrap().metrics().mae;
    assert!(mae_y1 < mae_y2);
}
