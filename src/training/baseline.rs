//! Baseline estimators
//!
//! Data-independent reference points for evaluation: a model worth deploying
//! should beat these.

use super::models::{ClassificationEstimator, RegressionEstimator};
use crate::error::{EvalError, Result};
use crate::utils::columns_to_array2;
use ndarray::{Array1, Array2, Axis};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Predicts the training mean of every output column
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeanRegressor {
    means: Option<Vec<(String, f64)>>,
}

impl MeanRegressor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fitted (column, mean) pairs
    pub fn means(&self) -> Option<&[(String, f64)]> {
        self.means.as_deref()
    }
}

impl RegressionEstimator for MeanRegressor {
    fn name(&self) -> &str {
        "MeanRegressor"
    }

    fn fit(&mut self, _x: &DataFrame, y: &DataFrame) -> Result<()> {
        if y.height() == 0 {
            return Err(EvalError::InvalidInput("cannot fit on empty data".to_string()));
        }
        let names: Vec<String> = y.get_column_names().iter().map(|s| s.to_string()).collect();
        let values = columns_to_array2(y, &names)?;
        let means = values
            .mean_axis(Axis(0))
            .ok_or_else(|| EvalError::ComputationError("mean of empty targets".to_string()))?;
        self.means = Some(names.into_iter().zip(means.iter().copied()).collect());
        Ok(())
    }

    fn predict(&self, x: &DataFrame) -> Result<DataFrame> {
        let means = self
            .means
            .as_ref()
            .ok_or_else(|| EvalError::ModelNotFitted(self.name().to_string()))?;
        let n_rows = x.height();
        let columns: Vec<Column> = means
            .iter()
            .map(|(name, mean)| Column::new(name.as_str().into(), vec![*mean; n_rows]))
            .collect();
        Ok(DataFrame::new(columns)?)
    }

    fn unfitted(&self) -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Centroids {
    target: String,
    features: Vec<String>,
    labels: Vec<String>,
    centroids: Array2<f64>,
}

/// Assigns each row the label of the nearest class centroid (Euclidean).
///
/// Class probabilities are a softmax over negative distances, scaled by
/// `temperature`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearestCentroidClassifier {
    temperature: f64,
    fitted: Option<Centroids>,
}

impl Default for NearestCentroidClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl NearestCentroidClassifier {
    pub fn new() -> Self {
        Self {
            temperature: 1.0,
            fitted: None,
        }
    }

    /// Builder method to set the softmax temperature
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    fn fitted(&self) -> Result<&Centroids> {
        self.fitted
            .as_ref()
            .ok_or_else(|| EvalError::ModelNotFitted(self.name().to_string()))
    }

    /// Row-by-class Euclidean distance matrix
    fn distances(&self, x: &DataFrame) -> Result<(Array2<f64>, &Centroids)> {
        let fitted = self.fitted()?;
        let x = columns_to_array2(x, &fitted.features)?;
        let mut distances = Array2::<f64>::zeros((x.nrows(), fitted.labels.len()));
        for (r, row) in x.axis_iter(Axis(0)).enumerate() {
            for (c, centroid) in fitted.centroids.axis_iter(Axis(0)).enumerate() {
                let diff = &row - &centroid;
                distances[[r, c]] = diff.dot(&diff).sqrt();
            }
        }
        Ok((distances, fitted))
    }
}

impl ClassificationEstimator for NearestCentroidClassifier {
    fn name(&self) -> &str {
        "NearestCentroidClassifier"
    }

    fn fit_classifier(&mut self, x: &DataFrame, y: &DataFrame, labels: &[String]) -> Result<()> {
        if self.temperature <= 0.0 || self.temperature.is_nan() {
            return Err(EvalError::InvalidParameter {
                name: "temperature".to_string(),
                value: self.temperature.to_string(),
                reason: "must be positive".to_string(),
            });
        }

        let target = y
            .get_column_names()
            .first()
            .map(|s| s.to_string())
            .ok_or_else(|| EvalError::InvalidInput("classification targets have no columns".to_string()))?;
        let row_labels: Vec<String> = y
            .column(&target)?
            .cast(&DataType::String)?
            .str()?
            .into_iter()
            .map(|v| v.unwrap_or("null").to_string())
            .collect();

        let features: Vec<String> = x.get_column_names().iter().map(|s| s.to_string()).collect();
        let x = columns_to_array2(x, &features)?;

        let mut centroids = Array2::<f64>::zeros((labels.len(), features.len()));
        for (c, label) in labels.iter().enumerate() {
            let rows: Vec<usize> = row_labels
                .iter()
                .enumerate()
                .filter(|(_, l)| *l == label)
                .map(|(i, _)| i)
                .collect();
            let centroid: Array1<f64> = x
                .select(Axis(0), &rows)
                .mean_axis(Axis(0))
                .ok_or_else(|| EvalError::ComputationError(format!("no rows for label {}", label)))?;
            centroids.row_mut(c).assign(&centroid);
        }

        self.fitted = Some(Centroids {
            target,
            features,
            labels: labels.to_vec(),
            centroids,
        });
        Ok(())
    }

    fn predict(&self, x: &DataFrame) -> Result<DataFrame> {
        let (distances, fitted) = self.distances(x)?;
        let predicted: Vec<String> = distances
            .axis_iter(Axis(0))
            .map(|row| {
                let best = row
                    .iter()
                    .enumerate()
                    .min_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
                    .map(|(i, _)| i)
                    .unwrap_or(0);
                fitted.labels[best].clone()
            })
            .collect();

        Ok(DataFrame::new(vec![
            Series::new(fitted.target.as_str().into(), predicted).into(),
        ])?)
    }

    fn predict_proba(&self, x: &DataFrame) -> Result<DataFrame> {
        let (distances, fitted) = self.distances(x)?;
        let mut proba = distances.mapv(|d| -d / self.temperature);
        for mut row in proba.axis_iter_mut(Axis(0)) {
            let max = row.fold(f64::NEG_INFINITY, |a, &b| a.max(b));
            row.mapv_inplace(|v| (v - max).exp());
            let total = row.sum();
            row.mapv_inplace(|v| v / total);
        }

        let columns: Vec<Column> = fitted
            .labels
            .iter()
            .enumerate()
            .map(|(c, label)| Column::new(label.as_str().into(), proba.column(c).to_vec()))
            .collect();
        Ok(DataFrame::new(columns)?)
    }

    fn unfitted(&self) -> Self {
        Self {
            temperature: self.temperature,
            fitted: None,
        }
    }
}
