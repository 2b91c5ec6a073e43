//! DataFrame with row labels

use crate::error::{EvalError, Result};
use polars::prelude::*;

/// A `DataFrame` whose rows carry stable integer labels.
///
/// Row labels survive subsetting, so rows taken out of a larger frame can
/// always be traced back to their origin.
#[derive(Debug, Clone)]
pub struct LabeledFrame {
    data: DataFrame,
    index: Vec<usize>,
}

impl LabeledFrame {
    /// Wrap a frame, labelling its rows `0..height`
    pub fn new(data: DataFrame) -> Self {
        let index = (0..data.height()).collect();
        Self { data, index }
    }

    /// Wrap a frame with explicit row labels
    pub fn with_index(data: DataFrame, index: Vec<usize>) -> Result<Self> {
        if index.len() != data.height() {
            return Err(EvalError::ShapeError {
                expected: format!("{} row labels", data.height()),
                actual: format!("{} row labels", index.len()),
            });
        }
        Ok(Self { data, index })
    }

    pub fn data(&self) -> &DataFrame {
        &self.data
    }

    pub fn index(&self) -> &[usize] {
        &self.index
    }

    pub fn height(&self) -> usize {
        self.data.height()
    }

    pub fn width(&self) -> usize {
        self.data.width()
    }

    pub fn is_empty(&self) -> bool {
        self.height() == 0
    }

    /// Ordered column names
    pub fn column_names(&self) -> Vec<String> {
        self.data
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Rows at the given positions, in the given order, with their labels
    pub fn take_rows(&self, positions: &[usize]) -> Result<Self> {
        let height = self.height();
        if let Some(&bad) = positions.iter().find(|&&p| p >= height) {
            return Err(EvalError::InvalidInput(format!(
                "row position {} out of range for frame with {} rows",
                bad, height
            )));
        }

        let idx: Vec<IdxSize> = positions.iter().map(|&p| p as IdxSize).collect();
        let idx = IdxCa::from_vec("idx".into(), idx);
        let data = self.data.take(&idx)?;
        let index = positions.iter().map(|&p| self.index[p]).collect();

        Ok(Self { data, index })
    }

    /// Values of a column cast to f64; nulls become NaN
    pub fn column_values(&self, name: &str) -> Result<Vec<f64>> {
        let column = self
            .data
            .column(name)
            .map_err(|_| EvalError::FeatureNotFound(name.to_string()))?;
        let column_f64 = column.cast(&DataType::Float64)?;
        let values = column_f64
            .f64()?
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect();
        Ok(values)
    }

    /// Values of a column rendered as strings; nulls become `"null"`
    pub fn column_labels(&self, name: &str) -> Result<Vec<String>> {
        let column = self
            .data
            .column(name)
            .map_err(|_| EvalError::FeatureNotFound(name.to_string()))?;
        let column_str = column.cast(&DataType::String)?;
        let labels = column_str
            .str()?
            .into_iter()
            .map(|v| v.unwrap_or("null").to_string())
            .collect();
        Ok(labels)
    }

    /// Same rows and labels, different data; the heights must agree
    pub fn relabel(&self, data: DataFrame) -> Result<Self> {
        Self::with_index(data, self.index.clone())
    }

    pub fn into_parts(self) -> (DataFrame, Vec<usize>) {
        (self.data, self.index)
    }
}

impl From<DataFrame> for LabeledFrame {
    fn from(data: DataFrame) -> Self {
        Self::new(data)
    }
}
