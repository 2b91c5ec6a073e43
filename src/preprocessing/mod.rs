//! Data frame transformers
//!
//! Transformers reshape a `DataFrame` without changing its row count or row
//! order. Stateful transformers learn parameters in [`DataFrameTransformer::fit`];
//! rule-based ones implement [`RuleBasedTransformer`] and need no fitting.
//!
//! - [`Scaler`] - feature scaling (Standard, MinMax, Robust, MaxAbs)
//! - [`MathTransform`] - elementwise log/power/sqrt transforms
//! - [`ColumnSelector`], [`ColumnDropper`], [`ColumnRenamer`] - column reshaping
//! - [`TransformerPipeline`] - ordered chain of transformers

mod columns;
mod pipeline;
mod scaler;
mod transforms;

pub use columns::{ColumnDropper, ColumnRenamer, ColumnSelector};
pub use pipeline::TransformerPipeline;
pub use scaler::{Scaler, ScalerType};
pub use transforms::{MathTransform, TransformType};

use crate::error::Result;
use polars::prelude::*;
use std::any::Any;
use std::fmt;

/// A mapping over data frames, possibly learned from data
pub trait DataFrameTransformer: Any + Send + Sync + fmt::Debug {
    /// Learn the transformer's parameters, replacing any previous state
    fn fit(&mut self, df: &DataFrame) -> Result<()>;

    /// Transform the frame; row count and order are preserved
    fn apply(&self, df: &DataFrame) -> Result<DataFrame>;

    fn clone_box(&self) -> Box<dyn DataFrameTransformer>;

    fn as_any(&self) -> &dyn Any;
}

/// A transformer whose logic is fixed by rules and never needs fitting
pub trait RuleBasedTransformer: Clone + Any + Send + Sync + fmt::Debug {
    fn apply_rule(&self, df: &DataFrame) -> Result<DataFrame>;
}

impl<T: RuleBasedTransformer> DataFrameTransformer for T {
    fn fit(&mut self, _df: &DataFrame) -> Result<()> {
        Ok(())
    }

    fn apply(&self, df: &DataFrame) -> Result<DataFrame> {
        self.apply_rule(df)
    }

    fn clone_box(&self) -> Box<dyn DataFrameTransformer> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Clone for Box<dyn DataFrameTransformer> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Names of all numeric columns, in frame order
pub(crate) fn numeric_column_names(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|col| {
            matches!(
                col.dtype(),
                DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64 |
                DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64 |
                DataType::Float32 | DataType::Float64
            )
        })
        .map(|col| col.name().to_string())
        .collect()
}
