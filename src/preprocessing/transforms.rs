//! Elementwise mathematical transforms
//!
//! Fixed formulas with no learned parameters, so [`MathTransform`] is a
//! rule-based transformer.

use super::{numeric_column_names, RuleBasedTransformer};
use crate::error::{EvalError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Type of transformation to apply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum TransformType {
    /// Natural logarithm: log(x)
    Log,
    /// Log with offset: log(x + 1)
    Log1p,
    /// Log base 10
    Log10,
    /// Square root
    Sqrt,
    /// Power transform: x^power
    Power(f64),
    /// Reciprocal: 1/x
    Reciprocal,
    /// No transformation
    #[default]
    Identity,
}

impl TransformType {
    /// Transform a single value; values outside the domain become NaN
    pub fn transform_value(&self, x: f64) -> f64 {
        match self {
            TransformType::Log => {
                if x > 0.0 { x.ln() } else { f64::NAN }
            }
            TransformType::Log1p => {
                if x > -1.0 { (x + 1.0).ln() } else { f64::NAN }
            }
            TransformType::Log10 => {
                if x > 0.0 { x.log10() } else { f64::NAN }
            }
            TransformType::Sqrt => {
                if x >= 0.0 { x.sqrt() } else { f64::NAN }
            }
            TransformType::Power(p) => x.powf(*p),
            TransformType::Reciprocal => {
                if x.abs() > 1e-10 { 1.0 / x } else { f64::NAN }
            }
            TransformType::Identity => x,
        }
    }
}

/// Applies a [`TransformType`] to the configured columns, or to every
/// numeric column when none are configured
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MathTransform {
    transform_type: TransformType,
    columns: Option<Vec<String>>,
}

impl MathTransform {
    pub fn new(transform_type: TransformType) -> Self {
        Self {
            transform_type,
            columns: None,
        }
    }

    /// Builder method to restrict the transform to the given columns
    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.columns = Some(columns);
        self
    }

    pub fn transform_type(&self) -> &TransformType {
        &self.transform_type
    }

    fn transform_column(&self, column: &Column) -> Result<Series> {
        let casted = column.cast(&DataType::Float64)?;
        let values: Float64Chunked = casted
            .f64()?
            .into_iter()
            .map(|v| v.map(|x| self.transform_type.transform_value(x)))
            .collect();

        Ok(values.with_name(column.name().clone()).into_series())
    }
}

impl RuleBasedTransformer for MathTransform {
    fn apply_rule(&self, df: &DataFrame) -> Result<DataFrame> {
        if self.transform_type == TransformType::Identity {
            return Ok(df.clone());
        }

        let columns = match &self.columns {
            Some(cols) => cols.clone(),
            None => numeric_column_names(df),
        };

        let mut result = df.clone();
        for col_name in &columns {
            let column = df
                .column(col_name)
                .map_err(|_| EvalError::FeatureNotFound(col_name.clone()))?;
            let transformed = self.transform_column(column)?;
            result.with_column(transformed)?;
        }

        Ok(result)
    }
}
