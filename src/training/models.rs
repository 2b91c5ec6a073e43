//! Model capabilities
//!
//! Concrete learning logic plugs in through [`RegressionEstimator`] and
//! [`ClassificationEstimator`]; the harness wraps estimators in
//! [`VectorRegressionModel`](super::VectorRegressionModel) and
//! [`VectorClassificationModel`](super::VectorClassificationModel), which own
//! the transformer pipelines and the fitted column schema.

use crate::data::LabeledFrame;
use crate::error::Result;
use crate::preprocessing::{DataFrameTransformer, TransformerPipeline};
use polars::prelude::*;
use std::fmt;

/// Anything that maps input frames to predictions
pub trait PredictorModel {
    /// Predict outputs for `x`; the result carries `x`'s row labels
    fn predict(&self, x: &LabeledFrame) -> Result<LabeledFrame>;

    /// Names of the predicted variables, `None` until fitted
    fn predicted_variable_names(&self) -> Option<&[String]>;

    fn name(&self) -> String;
}

/// A predictor that is fitted on (X, Y) frames
pub trait VectorModel: PredictorModel {
    fn fit(&mut self, x: &LabeledFrame, y: &LabeledFrame) -> Result<()>;

    /// Raw input columns seen at fit time, before input transformation
    fn input_variable_names(&self) -> Option<&[String]>;

    /// Columns the underlying estimator consumes
    fn model_input_variable_names(&self) -> Option<&[String]>;

    /// Columns the underlying estimator emits, before output transformation
    fn model_output_variable_names(&self) -> Option<&[String]>;

    fn input_transformers(&self) -> &TransformerPipeline;

    /// A fresh, unfitted instance with identical configuration
    fn unfitted_copy(&self) -> Self
    where
        Self: Sized;

    fn is_fitted(&self) -> bool {
        self.predicted_variable_names().is_some()
    }

    /// First attached input transformer of the given type
    fn input_transformer<T: DataFrameTransformer>(&self) -> Option<&T>
    where
        Self: Sized,
    {
        self.input_transformers().find::<T>()
    }
}

/// A vector model predicting class labels and class probabilities
pub trait ClassificationModel: VectorModel {
    /// One column per class label, rows labelled like `x`
    fn predict_proba(&self, x: &LabeledFrame) -> Result<LabeledFrame>;

    /// Sorted class labels seen at fit time
    fn labels(&self) -> Option<&[String]>;
}

/// Learning logic for regression.
///
/// Receives frames that already passed through the model's transformers.
pub trait RegressionEstimator: Clone + Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    fn fit(&mut self, x: &DataFrame, y: &DataFrame) -> Result<()>;

    fn predict(&self, x: &DataFrame) -> Result<DataFrame>;

    /// Same configuration, no learned state
    fn unfitted(&self) -> Self;
}

/// Learning logic for classification
pub trait ClassificationEstimator: Clone + Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// `labels` is the sorted set of stringified labels in `y`'s first column
    fn fit_classifier(&mut self, x: &DataFrame, y: &DataFrame, labels: &[String]) -> Result<()>;

    fn predict(&self, x: &DataFrame) -> Result<DataFrame>;

    /// One Float64 column per class label
    fn predict_proba(&self, x: &DataFrame) -> Result<DataFrame>;

    fn unfitted(&self) -> Self;
}
