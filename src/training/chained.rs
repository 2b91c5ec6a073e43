//! Repeated application of a square predictor

use super::models::{PredictorModel, VectorModel};
use crate::data::LabeledFrame;
use crate::error::{EvalError, Result};

/// Applies a predictor whose output dimensionality equals its input
/// dimensionality several times in a row, feeding each prediction back as
/// the next input.
#[derive(Debug, Clone)]
pub struct ChainedVectorRegressionPredictor<P> {
    predictor: P,
    n_chained_predictions: usize,
}

impl<P: PredictorModel> ChainedVectorRegressionPredictor<P> {
    /// Chain any predictor; dimensionality is only checked on prediction.
    /// Fails when `n_chained_predictions` is zero.
    pub fn from_predictor(predictor: P, n_chained_predictions: usize) -> Result<Self> {
        if n_chained_predictions == 0 {
            return Err(EvalError::InvalidParameter {
                name: "n_chained_predictions".to_string(),
                value: n_chained_predictions.to_string(),
                reason: "at least one prediction is required".to_string(),
            });
        }
        Ok(Self {
            predictor,
            n_chained_predictions,
        })
    }

    pub fn predictor(&self) -> &P {
        &self.predictor
    }

    pub fn n_chained_predictions(&self) -> usize {
        self.n_chained_predictions
    }
}

impl<P: VectorModel> ChainedVectorRegressionPredictor<P> {
    /// Fails when `n_chained_predictions` is zero, or when the predictor is
    /// already fitted and its input and output dimensionality differ.
    pub fn new(predictor: P, n_chained_predictions: usize) -> Result<Self> {
        if let (Some(inputs), Some(outputs)) = (
            predictor.input_variable_names(),
            predictor.predicted_variable_names(),
        ) {
            if inputs.len() != outputs.len() {
                return Err(EvalError::IncompatibleChain {
                    input_dim: inputs.len(),
                    output_dim: outputs.len(),
                });
            }
        }
        Self::from_predictor(predictor, n_chained_predictions)
    }
}

impl<P: PredictorModel> PredictorModel for ChainedVectorRegressionPredictor<P> {
    fn predict(&self, x: &LabeledFrame) -> Result<LabeledFrame> {
        let mut predictions = self.predictor.predict(x)?;
        if predictions.width() != x.width() {
            return Err(EvalError::IncompatibleChain {
                input_dim: x.width(),
                output_dim: predictions.width(),
            });
        }
        for _ in 1..self.n_chained_predictions {
            predictions = self.predictor.predict(&predictions)?;
        }
        Ok(predictions)
    }

    fn predicted_variable_names(&self) -> Option<&[String]> {
        self.predictor.predicted_variable_names()
    }

    fn name(&self) -> String {
        format!("Chained[{}x{}]", self.n_chained_predictions, self.predictor.name())
    }
}
