//! K-fold cross-validation
//!
//! All folds are cut from one permutation drawn at construction. Folds are
//! evaluated sequentially, each on an unfitted copy of the given model.

use super::config::CrossValidationConfig;
use super::eval_data::{VectorClassificationModelCrossValidationData, VectorRegressionModelCrossValidationData};
use super::evaluator::{ModelEvaluator, VectorClassificationModelEvaluator, VectorRegressionModelEvaluator};
use super::split::fold_splits;
use crate::data::TabularDataset;
use crate::error::Result;
use crate::training::{ClassificationModel, VectorModel};
use tracing::{debug, info};

fn fold_evaluators(data: &TabularDataset, config: &CrossValidationConfig) -> Result<Vec<ModelEvaluator>> {
    config.validate()?;
    fold_splits(data.len(), config.folds, config.random_seed)?
        .into_iter()
        .map(|split| {
            debug!(
                fold = split.fold_idx,
                n_train = split.train_indices.len(),
                n_test = split.test_indices.len(),
                "Created cross-validation fold"
            );
            Ok(ModelEvaluator::from_split(
                data.filter_indices(&split.train_indices)?,
                data.filter_indices(&split.test_indices)?,
            ))
        })
        .collect()
}

/// Cross-validation of regression models
#[derive(Debug, Clone)]
pub struct VectorRegressionModelCrossValidator {
    evaluators: Vec<VectorRegressionModelEvaluator>,
}

impl VectorRegressionModelCrossValidator {
    pub fn new(data: &TabularDataset, config: &CrossValidationConfig) -> Result<Self> {
        let evaluators = fold_evaluators(data, config)?
            .into_iter()
            .map(VectorRegressionModelEvaluator::new)
            .collect();
        Ok(Self { evaluators })
    }

    pub fn evaluators(&self) -> &[VectorRegressionModelEvaluator] {
        &self.evaluators
    }

    pub fn num_folds(&self) -> usize {
        self.evaluators.len()
    }

    /// Fit and evaluate an unfitted copy of `model` on every fold
    pub fn eval_model<M: VectorModel>(&self, model: &M) -> Result<VectorRegressionModelCrossValidationData<M>> {
        let mut trained_models = Vec::with_capacity(self.evaluators.len());
        let mut eval_data_list = Vec::with_capacity(self.evaluators.len());
        let mut test_indices_list = Vec::with_capacity(self.evaluators.len());

        for (fold, evaluator) in self.evaluators.iter().enumerate() {
            debug!(fold, model = %model.name(), "Evaluating cross-validation fold");
            let mut fold_model = model.unfitted_copy();
            let eval_data = evaluator.fit_and_eval(&mut fold_model)?;
            test_indices_list.push(evaluator.evaluator().test_data().index().to_vec());
            eval_data_list.push(eval_data);
            trained_models.push(fold_model);
        }

        let predicted_var_names = trained_models
            .first()
            .and_then(|m: &M| m.predicted_variable_names())
            .map(<[String]>::to_vec)
            .unwrap_or_default();

        info!(folds = trained_models.len(), model = %model.name(), "Cross-validation completed");
        Ok(VectorRegressionModelCrossValidationData::new(
            trained_models,
            eval_data_list,
            predicted_var_names,
            test_indices_list,
        ))
    }
}

/// Cross-validation of classification models
#[derive(Debug, Clone)]
pub struct VectorClassificationModelCrossValidator {
    evaluators: Vec<VectorClassificationModelEvaluator>,
}

impl VectorClassificationModelCrossValidator {
    pub fn new(data: &TabularDataset, config: &CrossValidationConfig) -> Result<Self> {
        let evaluators = fold_evaluators(data, config)?
            .into_iter()
            .map(VectorClassificationModelEvaluator::new)
            .collect();
        Ok(Self { evaluators })
    }

    /// Use a known label set in every fold
    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.evaluators = self
            .evaluators
            .into_iter()
            .map(|e| e.with_labels(labels.clone()))
            .collect();
        self
    }

    pub fn evaluators(&self) -> &[VectorClassificationModelEvaluator] {
        &self.evaluators
    }

    pub fn num_folds(&self) -> usize {
        self.evaluators.len()
    }

    /// Fit and evaluate an unfitted copy of `model` on every fold
    pub fn eval_model<M: ClassificationModel>(
        &self,
        model: &M,
    ) -> Result<VectorClassificationModelCrossValidationData<M>> {
        let mut trained_models = Vec::with_capacity(self.evaluators.len());
        let mut eval_data_list = Vec::with_capacity(self.evaluators.len());

        for (fold, evaluator) in self.evaluators.iter().enumerate() {
            debug!(fold, model = %model.name(), "Evaluating cross-validation fold");
            let mut fold_model = model.unfitted_copy();
            eval_data_list.push(evaluator.fit_and_eval(&mut fold_model)?);
            trained_models.push(fold_model);
        }

        info!(folds = trained_models.len(), model = %model.name(), "Cross-validation completed");
        Ok(VectorClassificationModelCrossValidationData::new(trained_models, eval_data_list))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::EvalStats;
    use crate::training::{MeanRegressor, NearestCentroidClassifier, VectorClassificationModel, VectorRegressionModel};
    use polars::prelude::*;
    use std::collections::HashSet;

    fn regression_dataset(n: usize) -> TabularDataset {
        let x: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let y: Vec<f64> = (0..n).map(|i| (i % 7) as f64).collect();
        TabularDataset::new(df!("x" => x).unwrap(), df!("y" => y).unwrap()).unwrap()
    }

    #[test]
    fn test_folds_are_disjoint() {
        let cv = VectorRegressionModelCrossValidator::new(&regression_dataset(23), &CrossValidationConfig::default())
            .unwrap();
        assert_eq!(cv.num_folds(), 5);

        let mut tested = HashSet::new();
        for evaluator in cv.evaluators() {
            let inner = evaluator.evaluator();
            assert_eq!(inner.test_data().len(), 4);
            assert_eq!(inner.training_data().len(), 19);
            for idx in inner.test_data().index() {
                assert!(tested.insert(*idx));
            }
        }
        assert_eq!(tested.len(), 20);
    }

    #[test]
    fn test_invalid_fold_count() {
        let data = regression_dataset(10);
        assert!(VectorRegressionModelCrossValidator::new(&data, &CrossValidationConfig::new().with_folds(1)).is_err());
        assert!(VectorRegressionModelCrossValidator::new(&data, &CrossValidationConfig::new().with_folds(11)).is_err());
    }

    #[test]
    fn test_regression_cross_validation() {
        let data = regression_dataset(30);
        let cv = VectorRegressionModelCrossValidator::new(&data, &CrossValidationConfig::new().with_folds(3)).unwrap();
        let model = VectorRegressionModel::new(MeanRegressor::new());

        let result = cv.eval_model(&model).unwrap();
        assert!(!model.is_fitted());
        assert_eq!(result.num_folds(), 3);
        assert_eq!(result.predicted_var_names(), &["y".to_string()]);
        assert!(result.trained_models().iter().all(|m| m.is_fitted()));
        assert_eq!(result.test_indices_list().len(), 3);
        assert!(result.test_indices_list().iter().all(|idx| idx.len() == 10));

        let collection = result.get_eval_stats_collection(None).unwrap();
        assert_eq!(collection.len(), 3);
        let combined = collection.combined_eval_stats().unwrap();
        assert_eq!(combined.len(), 30);
        assert!(combined.get("mae").is_some());
    }

    #[test]
    fn test_classification_cross_validation() {
        let f: Vec<f64> = (0..20).map(|i| if i % 2 == 0 { i as f64 * 0.01 } else { 10.0 + i as f64 * 0.01 }).collect();
        let class: Vec<&str> = (0..20).map(|i| if i % 2 == 0 { "even" } else { "odd" }).collect();
        let data = TabularDataset::new(df!("f" => f).unwrap(), df!("class" => class).unwrap()).unwrap();

        let cv = VectorClassificationModelCrossValidator::new(&data, &CrossValidationConfig::new().with_folds(4))
            .unwrap()
            .with_labels(vec!["even".to_string(), "odd".to_string()]);
        let model = VectorClassificationModel::new(NearestCentroidClassifier::new());
        let result = cv.eval_model(&model).unwrap();

        assert_eq!(result.num_folds(), 4);
        let collection = result.get_eval_stats_collection();
        for accuracy in collection.values("accuracy").unwrap() {
            assert_eq!(accuracy, 1.0);
        }
    }
}
