//! Feature scaling

use super::{numeric_column_names, DataFrameTransformer};
use crate::error::{EvalError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::HashMap;

/// Type of scaler to use
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScalerType {
    /// Standard scaling (z-score normalization): (x - mean) / std
    Standard,
    /// Min-Max scaling: (x - min) / (max - min)
    MinMax,
    /// Robust scaling using median and IQR
    Robust,
    /// Max absolute scaling: x / max(|x|)
    MaxAbs,
    /// No scaling
    None,
}

/// Parameters for a fitted column
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScalerParams {
    center: f64,    // mean, min, or median
    scale: f64,     // std, range, or IQR
}

/// Stateful feature scaler.
///
/// Scales the configured columns, or every numeric column present at fit time
/// when no columns are configured. Scaled columns are always Float64.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scaler {
    scaler_type: ScalerType,
    columns: Option<Vec<String>>,
    params: HashMap<String, ScalerParams>,
    is_fitted: bool,
}

impl Scaler {
    /// Create a scaler over all numeric columns
    pub fn new(scaler_type: ScalerType) -> Self {
        Self {
            scaler_type,
            columns: None,
            params: HashMap::new(),
            is_fitted: false,
        }
    }

    /// Builder method to restrict scaling to the given columns
    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.columns = Some(columns);
        self
    }

    pub fn scaler_type(&self) -> &ScalerType {
        &self.scaler_type
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    /// Fitted (center, scale) of a column
    pub fn column_params(&self, column: &str) -> Option<(f64, f64)> {
        self.params.get(column).map(|p| (p.center, p.scale))
    }

    fn compute_params(&self, column: &Column) -> Result<ScalerParams> {
        let column = column.cast(&DataType::Float64)?;
        let ca = column.f64()?;

        match self.scaler_type {
            ScalerType::Standard => {
                let mean = ca.mean().unwrap_or(0.0);
                let std = ca.std(1).unwrap_or(1.0);
                Ok(ScalerParams {
                    center: mean,
                    scale: if std == 0.0 || std.is_nan() { 1.0 } else { std },
                })
            }
            ScalerType::MinMax => {
                let min = ca.min().unwrap_or(0.0);
                let max = ca.max().unwrap_or(1.0);
                let range = max - min;
                Ok(ScalerParams {
                    center: min,
                    scale: if range == 0.0 { 1.0 } else { range },
                })
            }
            ScalerType::Robust => {
                let median = ca.median().unwrap_or(0.0);
                let q1 = ca.quantile(0.25, QuantileMethod::Linear)?.unwrap_or(0.0);
                let q3 = ca.quantile(0.75, QuantileMethod::Linear)?.unwrap_or(1.0);
                let iqr = q3 - q1;
                Ok(ScalerParams {
                    center: median,
                    scale: if iqr == 0.0 { 1.0 } else { iqr },
                })
            }
            ScalerType::MaxAbs => {
                let max_abs = ca
                    .into_iter()
                    .filter_map(|v| v.map(|x| x.abs()))
                    .fold(0.0f64, |a, b| a.max(b));
                Ok(ScalerParams {
                    center: 0.0,
                    scale: if max_abs == 0.0 { 1.0 } else { max_abs },
                })
            }
            ScalerType::None => Ok(ScalerParams {
                center: 0.0,
                scale: 1.0,
            }),
        }
    }

    fn scale_column(&self, column: &Column, params: &ScalerParams) -> Result<Series> {
        let casted = column.cast(&DataType::Float64)?;
        let ca = casted.f64()?;

        let scaled: Float64Chunked = ca
            .into_iter()
            .map(|opt| opt.map(|v| (v - params.center) / params.scale))
            .collect();

        Ok(scaled.with_name(column.name().clone()).into_series())
    }
}

impl DataFrameTransformer for Scaler {
    fn fit(&mut self, df: &DataFrame) -> Result<()> {
        let columns = match &self.columns {
            Some(cols) => cols.clone(),
            None => numeric_column_names(df),
        };

        let mut params = HashMap::with_capacity(columns.len());
        for col_name in &columns {
            let column = df
                .column(col_name)
                .map_err(|_| EvalError::FeatureNotFound(col_name.clone()))?;
            params.insert(col_name.clone(), self.compute_params(column)?);
        }

        self.params = params;
        self.is_fitted = true;
        Ok(())
    }

    /// Builds all replacement columns first, then applies them in a single pass
    fn apply(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(EvalError::ModelNotFitted(format!("{:?} scaler", self.scaler_type)));
        }

        let replacements: Vec<Series> = self
            .params
            .iter()
            .map(|(col_name, params)| {
                let column = df
                    .column(col_name)
                    .map_err(|_| EvalError::FeatureNotFound(col_name.clone()))?;
                self.scale_column(column, params)
            })
            .collect::<Result<Vec<_>>>()?;

        let mut result = df.clone();
        for scaled in replacements {
            result.with_column(scaled)?;
        }

        Ok(result)
    }

    fn clone_box(&self) -> Box<dyn DataFrameTransformer> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_column() -> DataFrame {
        DataFrame::new(vec![
            Series::new("a".into(), &[1.0, 2.0, 3.0, 4.0, 5.0]).into(),
        ])
        .unwrap()
    }

    #[test]
    fn test_standard_scaler() {
        let df = single_column();
        let mut scaler = Scaler::new(ScalerType::Standard);
        scaler.fit(&df).unwrap();
        let result = scaler.apply(&df).unwrap();

        let col = result.column("a").unwrap().f64().unwrap();
        let mean: f64 = col.mean().unwrap();
        assert!(mean.abs() < 1e-10);
    }

    #[test]
    fn test_minmax_scaler() {
        let df = single_column();
        let mut scaler = Scaler::new(ScalerType::MinMax);
        scaler.fit(&df).unwrap();
        let result = scaler.apply(&df).unwrap();

        let col = result.column("a").unwrap().f64().unwrap();
        assert!((col.min().unwrap() - 0.0).abs() < 1e-10);
        assert!((col.max().unwrap() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_selected_columns_only() {
        let df = df!(
            "a" => &[1.0, 2.0, 3.0],
            "b" => &[10.0, 20.0, 30.0]
        )
        .unwrap();
        let mut scaler = Scaler::new(ScalerType::MaxAbs).with_columns(vec!["b".to_string()]);
        scaler.fit(&df).unwrap();
        let result = scaler.apply(&df).unwrap();

        let a = result.column("a").unwrap().as_materialized_series();
        assert!(a.equals(df.column("a").unwrap().as_materialized_series()));
        let b = result.column("b").unwrap().f64().unwrap();
        assert!((b.max().unwrap() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_refit_replaces_state() {
        let mut scaler = Scaler::new(ScalerType::MinMax);
        scaler.fit(&single_column()).unwrap();
        assert!(scaler.column_params("a").is_some());

        let other = df!("z" => &[0.0, 4.0]).unwrap();
        scaler.fit(&other).unwrap();
        assert!(scaler.column_params("a").is_none());
        assert_eq!(scaler.column_params("z"), Some((0.0, 4.0)));
    }

    #[test]
    fn test_apply_before_fit() {
        let scaler = Scaler::new(ScalerType::Standard);
        assert!(matches!(
            scaler.apply(&single_column()),
            Err(EvalError::ModelNotFitted(_))
        ));
    }
}
