//! Train/test evaluators
//!
//! A [`ModelEvaluator`] owns a training and a test dataset, derived from one
//! source dataset by a seeded permutation or supplied directly. The typed
//! evaluators fit models on the training part and compute statistics on the
//! test part.

use super::config::EvaluatorConfig;
use super::eval_data::{VectorClassificationModelEvaluationData, VectorRegressionModelEvaluationData};
use super::split::train_test_indices;
use super::stats::{ClassProbabilities, ClassificationEvalStats, RegressionEvalStats};
use crate::data::{LabeledFrame, TabularDataset};
use crate::error::{EvalError, Result};
use crate::training::{ClassificationModel, PredictorModel, VectorModel};
use crate::utils::columns_to_array2;
use std::time::Instant;
use tracing::{debug, info};

/// Training/test split of a dataset
#[derive(Debug, Clone)]
pub struct ModelEvaluator {
    training_data: TabularDataset,
    test_data: TabularDataset,
}

impl ModelEvaluator {
    /// Exactly one of `test_fraction` and `test_data` must be given.
    ///
    /// With a fraction, the first `floor(len * test_fraction)` rows of a
    /// permutation seeded with `random_seed` form the test set. With explicit
    /// test data, `data` is used for training as is.
    pub fn new(
        data: TabularDataset,
        test_fraction: Option<f64>,
        test_data: Option<TabularDataset>,
        random_seed: u64,
    ) -> Result<Self> {
        match (test_fraction, test_data) {
            (Some(fraction), None) => {
                let (train, test) = train_test_indices(data.len(), fraction, random_seed)?;
                debug!(
                    n_train = train.len(),
                    n_test = test.len(),
                    seed = random_seed,
                    "Split dataset for evaluation"
                );
                Ok(Self {
                    training_data: data.filter_indices(&train)?,
                    test_data: data.filter_indices(&test)?,
                })
            }
            (None, Some(test_data)) => Ok(Self::from_split(data, test_data)),
            (Some(_), Some(_)) => Err(EvalError::ConfigError(
                "either test_fraction or test_data must be given, not both".to_string(),
            )),
            (None, None) => Err(EvalError::ConfigError(
                "either test_fraction or test_data must be given".to_string(),
            )),
        }
    }

    /// Split `data` with the fraction and seed of `config`
    pub fn from_config(data: TabularDataset, config: &EvaluatorConfig) -> Result<Self> {
        Self::new(data, config.test_fraction, None, config.random_seed)
    }

    pub fn from_split(training_data: TabularDataset, test_data: TabularDataset) -> Self {
        Self {
            training_data,
            test_data,
        }
    }

    pub fn training_data(&self) -> &TabularDataset {
        &self.training_data
    }

    pub fn test_data(&self) -> &TabularDataset {
        &self.test_data
    }

    /// Fit `model` on the training data
    pub fn fit_model<M: VectorModel + ?Sized>(&self, model: &mut M) -> Result<()> {
        let start = Instant::now();
        model.fit(self.training_data.inputs(), self.training_data.outputs())?;
        info!(
            model = %model.name(),
            elapsed_secs = start.elapsed().as_secs_f64(),
            "Training of model completed"
        );
        Ok(())
    }
}

/// Evaluates regression models, one statistics object per predicted variable
#[derive(Debug, Clone)]
pub struct VectorRegressionModelEvaluator {
    evaluator: ModelEvaluator,
}

impl VectorRegressionModelEvaluator {
    pub fn new(evaluator: ModelEvaluator) -> Self {
        Self { evaluator }
    }

    pub fn evaluator(&self) -> &ModelEvaluator {
        &self.evaluator
    }

    pub fn fit_model<M: VectorModel + ?Sized>(&self, model: &mut M) -> Result<()> {
        self.evaluator.fit_model(model)
    }

    /// Predictions for the test inputs alongside the test outputs
    pub fn compute_test_data_outputs<P: PredictorModel + ?Sized>(
        &self,
        model: &P,
    ) -> Result<(LabeledFrame, LabeledFrame)> {
        let test_data = self.evaluator.test_data();
        let predictions = model.predict(test_data.inputs())?;
        Ok((predictions, test_data.outputs().clone()))
    }

    /// One statistics object per variable the model reports as predicted,
    /// in the model's order
    pub fn eval_model<P: PredictorModel + ?Sized>(&self, model: &P) -> Result<VectorRegressionModelEvaluationData> {
        let (predictions, ground_truth) = self.compute_test_data_outputs(model)?;
        let predicted_var_names = model
            .predicted_variable_names()
            .ok_or_else(|| EvalError::ModelNotFitted(model.name()))?;
        let stats = predicted_var_names
            .iter()
            .map(|var| {
                let y_predicted = predictions.column_values(var)?;
                let y_true = ground_truth.column_values(var)?;
                let stats = RegressionEvalStats::new(y_predicted, y_true)?;
                Ok((var.clone(), stats))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(VectorRegressionModelEvaluationData::new(stats))
    }

    pub fn fit_and_eval<M: VectorModel>(&self, model: &mut M) -> Result<VectorRegressionModelEvaluationData> {
        self.fit_model(model)?;
        self.eval_model(model)
    }
}

impl From<ModelEvaluator> for VectorRegressionModelEvaluator {
    fn from(evaluator: ModelEvaluator) -> Self {
        Self::new(evaluator)
    }
}

/// Evaluates classification models on their first output column
#[derive(Debug, Clone)]
pub struct VectorClassificationModelEvaluator {
    evaluator: ModelEvaluator,
    labels: Option<Vec<String>>,
}

impl VectorClassificationModelEvaluator {
    pub fn new(evaluator: ModelEvaluator) -> Self {
        Self {
            evaluator,
            labels: None,
        }
    }

    /// Known label set; otherwise the fitted model's labels are used
    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = Some(labels);
        self
    }

    pub fn evaluator(&self) -> &ModelEvaluator {
        &self.evaluator
    }

    pub fn fit_model<M: VectorModel + ?Sized>(&self, model: &mut M) -> Result<()> {
        self.evaluator.fit_model(model)
    }

    /// Predicted labels, class probabilities and test outputs
    pub fn compute_test_data_outputs<M: ClassificationModel + ?Sized>(
        &self,
        model: &M,
    ) -> Result<(LabeledFrame, LabeledFrame, LabeledFrame)> {
        let test_data = self.evaluator.test_data();
        let predictions = model.predict(test_data.inputs())?;
        let probabilities = model.predict_proba(test_data.inputs())?;
        Ok((predictions, probabilities, test_data.outputs().clone()))
    }

    pub fn eval_model<M: ClassificationModel + ?Sized>(
        &self,
        model: &M,
    ) -> Result<VectorClassificationModelEvaluationData> {
        let (predictions, probabilities, ground_truth) = self.compute_test_data_outputs(model)?;

        let y_predicted = first_column_labels(&predictions)?;
        let y_true = first_column_labels(&ground_truth)?;

        let proba_labels = probabilities.column_names();
        let values = columns_to_array2(probabilities.data(), &proba_labels)?;
        let proba = ClassProbabilities::new(proba_labels, values)?;

        let labels = self
            .labels
            .clone()
            .or_else(|| model.labels().map(<[String]>::to_vec));

        let stats = ClassificationEvalStats::new(y_predicted, y_true, Some(proba), labels)?;
        Ok(VectorClassificationModelEvaluationData::new(stats))
    }

    pub fn fit_and_eval<M: ClassificationModel>(
        &self,
        model: &mut M,
    ) -> Result<VectorClassificationModelEvaluationData> {
        self.fit_model(model)?;
        self.eval_model(model)
    }
}

impl From<ModelEvaluator> for VectorClassificationModelEvaluator {
    fn from(evaluator: ModelEvaluator) -> Self {
        Self::new(evaluator)
    }
}

fn first_column_labels(frame: &LabeledFrame) -> Result<Vec<String>> {
    let first = frame
        .column_names()
        .into_iter()
        .next()
        .ok_or_else(|| EvalError::InvalidInput("frame has no columns".to_string()))?;
    frame.column_labels(&first)
}
