//! Regression model wrapper

use super::models::{PredictorModel, RegressionEstimator, VectorModel};
use super::vector_model::{fmt_names, VectorModelCore};
use crate::data::LabeledFrame;
use crate::error::Result;
use crate::preprocessing::{DataFrameTransformer, TransformerPipeline};
use std::fmt;

/// A regression estimator together with its input, output and
/// training-output transformer pipelines.
///
/// Training-output transformers are applied to the targets before fitting
/// only; output transformers are applied to every prediction.
#[derive(Debug, Clone)]
pub struct VectorRegressionModel<E> {
    core: VectorModelCore,
    estimator: E,
}

impl<E: RegressionEstimator> VectorRegressionModel<E> {
    pub fn new(estimator: E) -> Self {
        Self {
            core: VectorModelCore::default(),
            estimator,
        }
    }

    /// Builder method to append an input transformer
    pub fn with_input_transformer(mut self, transformer: impl DataFrameTransformer) -> Self {
        self.core.input_transformers.push(transformer);
        self
    }

    /// Builder method to append an output transformer
    pub fn with_output_transformer(mut self, transformer: impl DataFrameTransformer) -> Self {
        self.core.output_transformers.push(transformer);
        self
    }

    /// Builder method to append a training-output transformer
    pub fn with_training_output_transformer(mut self, transformer: impl DataFrameTransformer) -> Self {
        self.core.training_output_transformers.push(transformer);
        self
    }

    pub fn estimator(&self) -> &E {
        &self.estimator
    }

    pub fn output_transformers(&self) -> &TransformerPipeline {
        &self.core.output_transformers
    }

    pub fn training_output_transformers(&self) -> &TransformerPipeline {
        &self.core.training_output_transformers
    }
}

impl<E: RegressionEstimator> PredictorModel for VectorRegressionModel<E> {
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

impl<E: RegressionEstimator> VectorModel for VectorRegressionModel<E> {
    fn fit(&mut self, x: &LabeledFrame, y: &LabeledFrame) -> Result<()> {
        let (x_model, y_model) = self.core.prepare_fit(x, y, self.estimator.name())?;
        if let Err(err) = self.estimator.fit(&x_model, &y_model) {
            self.core.clear_schema();
            return Err(err);
        }
        Ok(())
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
        }
    }
}

impl<E: RegressionEstimator> fmt::Display for VectorRegressionModel<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[estimator={:?}, inputTransformers={}, outputTransformers={}, trainingOutputTransformers={}, predictedVariableNames={}]",
            self.estimator.name(),
            self.estimator,
            self.core.input_transformers,
            self.core.output_transformers,
            self.core.training_output_transformers,
            fmt_names(&self.core.predicted_variable_names),
        )
    }
}
