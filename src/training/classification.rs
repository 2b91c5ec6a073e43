//! Classification model wrapper

use super::models::{ClassificationEstimator, ClassificationModel, PredictorModel, VectorModel};
use super::vector_model::{fmt_names, VectorModelCore};
use crate::data::LabeledFrame;
use crate::error::{EvalError, Result};
use crate::preprocessing::{DataFrameTransformer, TransformerPipeline};
use polars::prelude::*;
use std::collections::BTreeSet;
use std::fmt;

/// A classification estimator together with its input transformer pipeline
#[derive(Debug, Clone)]
pub struct VectorClassificationModel<E> {
    core: VectorModelCore,
    estimator: E,
    labels: Option<Vec<String>>,
}

impl<E: ClassificationEstimator> VectorClassificationModel<E> {
    pub fn new(estimator: E) -> Self {
        Self {
            core: VectorModelCore::default(),
            estimator,
            labels: None,
        }
    }

    /// Builder method to append an input transformer
    pub fn with_input_transformer(mut self, transformer: impl DataFrameTransformer) -> Self {
        self.core.input_transformers.push(transformer);
        self
    }

    pub fn estimator(&self) -> &E {
        &self.estimator
    }
}

/// Sorted unique stringified labels of the first column
fn unique_labels(y: &DataFrame) -> Result<Vec<String>> {
    let first = y
        .get_columns()
        .first()
        .ok_or_else(|| EvalError::InvalidInput("classification targets have no columns".to_string()))?;
    let labels: BTreeSet<String> = first
        .cast(&DataType::String)?
        .str()?
        .into_iter()
        .map(|v| v.unwrap_or("null").to_string())
        .collect();
    Ok(labels.into_iter().collect())
}

impl<E: ClassificationEstimator> PredictorModel for VectorClassificationModel<E> {
    fn predict(&self, x: &LabeledFrame) -> Result<LabeledFrame> {
        let x_model = self.core.check_and_transform_inputs(x, self.estimator.name())?;
        let y_model = self.estimator.predict(&x_model)?;
        self.core.finish_prediction(x, y_model)
    }

    fn predicted_variable_names(&self) -> Option<&[String]> {
        self.core.predicted_variable_names.as_deref()
    }

    fn name(&self) -> String {
        self.estimator.name().to_string()
    }
}

impl<E: ClassificationEstimator> VectorModel for VectorClassificationModel<E> {
    fn fit(&mut self, x: &LabeledFrame, y: &LabeledFrame) -> Result<()> {
        let (x_model, y_model) = self.core.prepare_fit(x, y, self.estimator.name())?;
        let fitted = unique_labels(&y_model).and_then(|labels| {
            self.estimator.fit_classifier(&x_model, &y_model, &labels)?;
            Ok(labels)
        });
        match fitted {
            Ok(labels) => {
                self.labels = Some(labels);
                Ok(())
            }
            Err(err) => {
                self.core.clear_schema();
                self.labels = None;
                Err(err)
            }
        }
    }

    fn input_variable_names(&self) -> Option<&[String]> {
        self.core.input_variable_names.as_deref()
    }

    fn model_input_variable_names(&self) -> Option<&[String]> {
        self.core.model_input_variable_names.as_deref()
    }

    fn model_output_variable_names(&self) -> Option<&[String]> {
        self.core.model_output_variable_names.as_deref()
    }

    fn input_transformers(&self) -> &TransformerPipeline {
        &self.core.input_transformers
    }

    fn unfitted_copy(&self) -> Self {
        Self {
            core: self.core.unfitted_copy(),
            estimator: self.estimator.unfitted(),
            labels: None,
        }
    }
}

impl<E: ClassificationEstimator> ClassificationModel for VectorClassificationModel<E> {
    fn predict_proba(&self, x: &LabeledFrame) -> Result<LabeledFrame> {
        let x_model = self.core.check_and_transform_inputs(x, self.estimator.name())?;
        let proba = self.estimator.predict_proba(&x_model)?;
        x.relabel(proba)
    }

    fn labels(&self) -> Option<&[String]> {
        self.labels.as_deref()
    }
}

impl<E: ClassificationEstimator> fmt::Display for VectorClassificationModel<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[estimator={:?}, inputTransformers={}, labels={}]",
            self.estimator.name(),
            self.estimator,
            self.core.input_transformers,
            fmt_names(&self.labels),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::{Scaler, ScalerType};
    use crate::training::NearestCentroidClassifier;
    use polars::prelude::*;

    fn training_frames() -> (LabeledFrame, LabeledFrame) {
        let x = df!(
            "f1" => &[0.0, 0.2, 0.1, 5.0, 5.2, 5.1, 10.0, 10.1],
            "f2" => &[0.0, 0.1, 0.3, 5.0, 4.9, 5.2, 0.0, 0.2]
        )
        .unwrap();
        let y = df!("class" => &["b", "b", "b", "a", "a", "a", "c", "c"]).unwrap();
        (LabeledFrame::new(x), LabeledFrame::new(y))
    }

    #[test]
    fn test_labels_are_sorted_unique() {
        let mut model = VectorClassificationModel::new(NearestCentroidClassifier::new());
        let (x, y) = training_frames();
        assert!(model.labels().is_none());
        model.fit(&x, &y).unwrap();
        assert_eq!(model.labels().unwrap(), &["a".to_string(), "b".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_labels_from_first_target_column() {
        let (x, _) = training_frames();
        let y = LabeledFrame::new(
            df!(
                "class" => &[2i32, 2, 2, 1, 1, 1, 3, 3],
                "other" => &[9i32, 9, 9, 9, 9, 9, 9, 9]
            )
            .unwrap(),
        );
        let mut model = VectorClassificationModel::new(NearestCentroidClassifier::new());
        model.fit(&x, &y).unwrap();
        assert_eq!(model.labels().unwrap(), &["1".to_string(), "2".to_string(), "3".to_string()]);
    }

    #[test]
    fn test_predict_and_proba() {
        let mut model = VectorClassificationModel::new(NearestCentroidClassifier::new())
            .with_input_transformer(Scaler::new(ScalerType::Standard));
        let (x, y) = training_frames();
        model.fit(&x, &y).unwrap();

        let subset = x.take_rows(&[6, 0, 3]).unwrap();
        let predictions = model.predict(&subset).unwrap();
        assert_eq!(predictions.index(), &[6, 0, 3]);
        assert_eq!(predictions.column_labels("class").unwrap(), vec!["c", "b", "a"]);

        let proba = model.predict_proba(&subset).unwrap();
        assert_eq!(proba.index(), &[6, 0, 3]);
        assert_eq!(proba.column_names(), vec!["a", "b", "c"]);
        for row in 0..proba.height() {
            let total: f64 = ["a", "b", "c"]
                .iter()
                .map(|c| proba.column_values(c).unwrap()[row])
                .sum();
            assert!((total - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_proba_before_fit() {
        let model = VectorClassificationModel::new(NearestCentroidClassifier::new());
        let (x, _) = training_frames();
        assert!(matches!(model.predict_proba(&x), Err(EvalError::ModelNotFitted(_))));
    }

    #[test]
    fn test_unfitted_copy_forgets_labels() {
        let mut model = VectorClassificationModel::new(NearestCentroidClassifier::new());
        let (x, y) = training_frames();
        model.fit(&x, &y).unwrap();
        let copy = model.unfitted_copy();
        assert!(copy.labels().is_none());
        assert!(!copy.is_fitted());
    }
}
