//! Shared fit/predict plumbing for vector models

use crate::data::LabeledFrame;
use crate::error::{EvalError, Result};
use crate::preprocessing::TransformerPipeline;
use polars::prelude::*;
use tracing::info;

/// Transformer pipelines plus the column schema recorded at fit time
#[derive(Debug, Clone, Default)]
pub(crate) struct VectorModelCore {
    pub(crate) input_transformers: TransformerPipeline,
    pub(crate) output_transformers: TransformerPipeline,
    pub(crate) training_output_transformers: TransformerPipeline,
    pub(crate) input_variable_names: Option<Vec<String>>,
    pub(crate) predicted_variable_names: Option<Vec<String>>,
    pub(crate) model_input_variable_names: Option<Vec<String>>,
    pub(crate) model_output_variable_names: Option<Vec<String>>,
}

impl VectorModelCore {
    /// Same pipelines (to be refitted), no recorded schema
    pub(crate) fn unfitted_copy(&self) -> Self {
        Self {
            input_transformers: self.input_transformers.clone(),
            output_transformers: self.output_transformers.clone(),
            training_output_transformers: self.training_output_transformers.clone(),
            ..Self::default()
        }
    }

    /// Fit the input and training-output pipelines and record the schema.
    /// Returns the transformed (X, Y) to hand to the estimator.
    pub(crate) fn prepare_fit(
        &mut self,
        x: &LabeledFrame,
        y: &LabeledFrame,
        model_name: &str,
    ) -> Result<(DataFrame, DataFrame)> {
        if x.height() != y.height() {
            return Err(EvalError::ShapeError {
                expected: format!("{} output rows", x.height()),
                actual: format!("{} output rows", y.height()),
            });
        }

        self.clear_schema();
        let input_names = x.column_names();
        let predicted_names = y.column_names();

        let x_model = self.input_transformers.fit_apply(x.data())?;
        let y_model = self.training_output_transformers.fit_apply(y.data())?;

        let model_inputs = column_names(&x_model);
        let model_outputs = column_names(&y_model);
        info!(
            model = model_name,
            inputs = ?model_inputs,
            outputs = ?model_outputs,
            "Training model"
        );

        self.input_variable_names = Some(input_names);
        self.predicted_variable_names = Some(predicted_names);
        self.model_input_variable_names = Some(model_inputs);
        self.model_output_variable_names = Some(model_outputs);

        Ok((x_model, y_model))
    }

    /// Apply the fitted input pipeline and check the result against the
    /// column list recorded at fit time
    pub(crate) fn check_and_transform_inputs(&self, x: &LabeledFrame, model_name: &str) -> Result<DataFrame> {
        let expected = self
            .model_input_variable_names
            .as_ref()
            .filter(|_| self.predicted_variable_names.is_some())
            .ok_or_else(|| EvalError::ModelNotFitted(model_name.to_string()))?;

        let x_model = self.input_transformers.apply(x.data())?;
        let actual = column_names(&x_model);
        if &actual != expected {
            return Err(EvalError::ColumnMismatch {
                expected: expected.clone(),
                actual,
            });
        }
        Ok(x_model)
    }

    /// Label raw estimator output with the input rows and apply the output pipeline
    pub(crate) fn finish_prediction(&self, x: &LabeledFrame, y_model: DataFrame) -> Result<LabeledFrame> {
        let labelled = x.relabel(y_model)?;
        let (data, index) = labelled.into_parts();
        let y = self.output_transformers.apply(&data)?;
        LabeledFrame::with_index(y, index)
    }
}

pub(crate) fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names().iter().map(|s| s.to_string()).collect()
}

pub(crate) fn fmt_names(names: &Option<Vec<String>>) -> String {
    match names {
        Some(names) => format!("{:?}", names),
        None => "None".to_string(),
    }
}

impl VectorModelCore {
    /// Forget the recorded schema, e.g. after the estimator failed to fit
    pub(crate) fn clear_schema(&mut self) {
        self.input_variable_names = None;
        self.predicted_variable_names = None;
        self.model_input_variable_names = None;
        self.model_output_variable_names = None;
    }
}
