//! Input/output dataset

use super::frame::LabeledFrame;
use crate::error::{EvalError, Result};
use crate::utils::pearson_correlation;
use polars::prelude::*;
use std::collections::HashMap;

/// Aligned input and output tables sharing row count and row labels
#[derive(Debug, Clone)]
pub struct TabularDataset {
    inputs: LabeledFrame,
    outputs: LabeledFrame,
}

impl TabularDataset {
    /// Create a dataset from unlabelled frames; rows are labelled `0..len`
    pub fn new(inputs: DataFrame, outputs: DataFrame) -> Result<Self> {
        if inputs.height() != outputs.height() {
            return Err(EvalError::ShapeError {
                expected: format!("{} output rows", inputs.height()),
                actual: format!("{} output rows", outputs.height()),
            });
        }
        Ok(Self {
            inputs: LabeledFrame::new(inputs),
            outputs: LabeledFrame::new(outputs),
        })
    }

    /// Create a dataset from labelled frames, which must agree on row labels
    pub fn from_frames(inputs: LabeledFrame, outputs: LabeledFrame) -> Result<Self> {
        if inputs.height() != outputs.height() {
            return Err(EvalError::ShapeError {
                expected: format!("{} output rows", inputs.height()),
                actual: format!("{} output rows", outputs.height()),
            });
        }
        if inputs.index() != outputs.index() {
            return Err(EvalError::InvalidInput(
                "inputs and outputs have different row labels".to_string(),
            ));
        }
        Ok(Self { inputs, outputs })
    }

    pub fn len(&self) -> usize {
        self.inputs.height()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of input columns
    pub fn input_dim(&self) -> usize {
        self.inputs.width()
    }

    /// Number of output columns
    pub fn output_dim(&self) -> usize {
        self.outputs.width()
    }

    pub fn inputs(&self) -> &LabeledFrame {
        &self.inputs
    }

    pub fn outputs(&self) -> &LabeledFrame {
        &self.outputs
    }

    /// Row labels shared by inputs and outputs
    pub fn index(&self) -> &[usize] {
        self.inputs.index()
    }

    /// New dataset restricted to the given row positions, keeping row labels
    pub fn filter_indices(&self, indices: &[usize]) -> Result<Self> {
        Ok(Self {
            inputs: self.inputs.take_rows(indices)?,
            outputs: self.outputs.take_rows(indices)?,
        })
    }

    /// Pearson correlation for every (output column, input column) pair,
    /// keyed output column -> input column -> coefficient.
    pub fn compute_input_output_correlation(&self) -> Result<HashMap<String, HashMap<String, f64>>> {
        let input_columns: Vec<(String, Vec<f64>)> = self
            .inputs
            .column_names()
            .into_iter()
            .map(|name| {
                let values = self.inputs.column_values(&name)?;
                Ok((name, values))
            })
            .collect::<Result<_>>()?;

        let mut correlations = HashMap::new();
        for output_col in self.outputs.column_names() {
            let output_values = self.outputs.column_values(&output_col)?;
            let mut per_input = HashMap::with_capacity(input_columns.len());
            for (input_col, input_values) in &input_columns {
                let pcc = pearson_correlation(input_values, &output_values)?;
                per_input.insert(input_col.clone(), pcc);
            }
            correlations.insert(output_col, per_input);
        }

        Ok(correlations)
    }
}
