//! Evaluation statistics
//!
//! Fixed metric records per task kind, each exposed as an ordered
//! name -> value view for aggregation and reporting.

use crate::error::{EvalError, Result};
use crate::utils::{mean, pearson_correlation, population_std};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Probability clipping bound for log loss
const PROBA_EPS: f64 = 1e-15;

/// A bundle of metrics computed from predictions and ground truth
pub trait EvalStats: Clone + fmt::Debug {
    /// Metric names in reporting order
    const METRIC_NAMES: &'static [&'static str];

    /// Metric values, aligned with [`EvalStats::METRIC_NAMES`]
    fn metric_values(&self) -> Vec<f64>;

    /// Statistics over the concatenated data of all given statistics
    fn combine(stats: &[Self]) -> Result<Self>;

    /// All metrics as (name, value) pairs
    fn get_all(&self) -> Vec<(&'static str, f64)> {
        Self::METRIC_NAMES
            .iter()
            .copied()
            .zip(self.metric_values())
            .collect()
    }

    fn get(&self, metric: &str) -> Option<f64> {
        self.get_all()
            .into_iter()
            .find(|(name, _)| *name == metric)
            .map(|(_, value)| value)
    }
}

fn check_lengths(predicted: usize, truth: usize) -> Result<()> {
    if predicted != truth {
        return Err(EvalError::ShapeError {
            expected: format!("{} predictions", truth),
            actual: format!("{} predictions", predicted),
        });
    }
    if truth == 0 {
        return Err(EvalError::InvalidInput(
            "cannot compute statistics on empty data".to_string(),
        ));
    }
    Ok(())
}

// ============================================================================
// Regression
// ============================================================================

/// Regression metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    /// Mean absolute error
    pub mae: f64,
    /// Mean squared error
    pub mse: f64,
    /// Root mean squared error
    pub rmse: f64,
    /// Root relative squared error
    pub rrse: f64,
    /// Coefficient of determination
    pub r2: f64,
    /// Pearson correlation between predictions and ground truth
    pub pcc: f64,
    /// Standard deviation of absolute errors
    pub std_dev_ae: f64,
}

impl RegressionMetrics {
    pub fn compute(y_predicted: &[f64], y_true: &[f64]) -> Result<Self> {
        check_lengths(y_predicted.len(), y_true.len())?;

        let errors: Vec<f64> = y_predicted
            .iter()
            .zip(y_true.iter())
            .map(|(p, t)| p - t)
            .collect();
        let abs_errors: Vec<f64> = errors.iter().map(|e| e.abs()).collect();

        let mse = mean(&errors.iter().map(|e| e * e).collect::<Vec<_>>());
        let mae = mean(&abs_errors);

        let y_mean = mean(y_true);
        let ss_tot: f64 = y_true.iter().map(|y| (y - y_mean).powi(2)).sum();
        let ss_res: f64 = errors.iter().map(|e| e.powi(2)).sum();

        let (r2, rrse) = if ss_tot > 0.0 {
            (1.0 - ss_res / ss_tot, (ss_res / ss_tot).sqrt())
        } else {
            (0.0, f64::NAN)
        };

        Ok(Self {
            mae,
            mse,
            rmse: mse.sqrt(),
            rrse,
            r2,
            pcc: pearson_correlation(y_predicted, y_true)?,
            std_dev_ae: population_std(&abs_errors),
        })
    }
}

/// Regression statistics for one predicted variable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionEvalStats {
    y_predicted: Vec<f64>,
    y_true: Vec<f64>,
    metrics: RegressionMetrics,
}

impl RegressionEvalStats {
    pub fn new(y_predicted: Vec<f64>, y_true: Vec<f64>) -> Result<Self> {
        let metrics = RegressionMetrics::compute(&y_predicted, &y_true)?;
        Ok(Self {
            y_predicted,
            y_true,
            metrics,
        })
    }

    pub fn metrics(&self) -> &RegressionMetrics {
        &self.metrics
    }

    pub fn y_predicted(&self) -> &[f64] {
        &self.y_predicted
    }

    pub fn y_true(&self) -> &[f64] {
        &self.y_true
    }

    pub fn len(&self) -> usize {
        self.y_true.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y_true.is_empty()
    }
}

impl EvalStats for RegressionEvalStats {
    const METRIC_NAMES: &'static [&'static str] =
        &["mae", "mse", "rmse", "rrse", "r2", "pcc", "std_dev_ae"];

    fn metric_values(&self) -> Vec<f64> {
        let m = &self.metrics;
        vec![m.mae, m.mse, m.rmse, m.rrse, m.r2, m.pcc, m.std_dev_ae]
    }

    fn combine(stats: &[Self]) -> Result<Self> {
        let y_predicted = stats.iter().flat_map(|s| s.y_predicted.iter().copied()).collect();
        let y_true = stats.iter().flat_map(|s| s.y_true.iter().copied()).collect();
        Self::new(y_predicted, y_true)
    }
}

impl fmt::Display for RegressionEvalStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_metrics(f, "RegressionEvalStats", &self.get_all())
    }
}

// ============================================================================
// Classification
// ============================================================================

/// Predicted class probabilities, one column per class label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassProbabilities {
    labels: Vec<String>,
    values: Array2<f64>,
}

impl ClassProbabilities {
    pub fn new(labels: Vec<String>, values: Array2<f64>) -> Result<Self> {
        if values.ncols() != labels.len() {
            return Err(EvalError::ShapeError {
                expected: format!("{} probability columns", labels.len()),
                actual: format!("{} probability columns", values.ncols()),
            });
        }
        Ok(Self { labels, values })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    /// Probability assigned to `label` in `row`; 0 for unknown labels
    pub fn probability(&self, row: usize, label: &str) -> f64 {
        self.labels
            .iter()
            .position(|l| l == label)
            .map(|c| self.values[[row, c]])
            .unwrap_or(0.0)
    }
}

/// Classification metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationMetrics {
    pub accuracy: f64,
    /// Mean per-class recall over the classes present in the ground truth
    pub balanced_accuracy: f64,
    /// Cross-entropy of the true labels; NaN without probabilities
    pub log_loss: f64,
}

/// Counts of (true label, predicted label) pairs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    labels: Vec<String>,
    /// Rows are true labels, columns predicted labels
    counts: Array2<usize>,
}

impl ConfusionMatrix {
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn counts(&self) -> &Array2<usize> {
        &self.counts
    }

    pub fn count(&self, true_label: &str, predicted_label: &str) -> Option<usize> {
        let r = self.labels.iter().position(|l| l == true_label)?;
        let c = self.labels.iter().position(|l| l == predicted_label)?;
        Some(self.counts[[r, c]])
    }
}

/// Classification statistics over all classes jointly
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationEvalStats {
    y_predicted: Vec<String>,
    y_true: Vec<String>,
    y_predicted_proba: Option<ClassProbabilities>,
    labels: Vec<String>,
    metrics: ClassificationMetrics,
}

impl ClassificationEvalStats {
    /// `labels` is the known label set; when absent, the sorted union of true
    /// and predicted labels is used
    pub fn new(
        y_predicted: Vec<String>,
        y_true: Vec<String>,
        y_predicted_proba: Option<ClassProbabilities>,
        labels: Option<Vec<String>>,
    ) -> Result<Self> {
        check_lengths(y_predicted.len(), y_true.len())?;
        if let Some(proba) = &y_predicted_proba {
            if proba.n_rows() != y_true.len() {
                return Err(EvalError::ShapeError {
                    expected: format!("{} probability rows", y_true.len()),
                    actual: format!("{} probability rows", proba.n_rows()),
                });
            }
        }

        let labels = match labels {
            Some(labels) => labels,
            None => y_true
                .iter()
                .chain(y_predicted.iter())
                .cloned()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect(),
        };

        let metrics = Self::compute_metrics(&y_predicted, &y_true, y_predicted_proba.as_ref());
        Ok(Self {
            y_predicted,
            y_true,
            y_predicted_proba,
            labels,
            metrics,
        })
    }

    fn compute_metrics(
        y_predicted: &[String],
        y_true: &[String],
        proba: Option<&ClassProbabilities>,
    ) -> ClassificationMetrics {
        let n = y_true.len() as f64;
        let correct = y_true
            .iter()
            .zip(y_predicted.iter())
            .filter(|(t, p)| t == p)
            .count();

        let mut per_class: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
        for (t, p) in y_true.iter().zip(y_predicted.iter()) {
            let entry = per_class.entry(t.as_str()).or_insert((0, 0));
            entry.1 += 1;
            if t == p {
                entry.0 += 1;
            }
        }
        let recalls: Vec<f64> = per_class
            .values()
            .map(|(hits, total)| *hits as f64 / *total as f64)
            .collect();

        let log_loss = match proba {
            Some(proba) => {
                let total: f64 = y_true
                    .iter()
                    .enumerate()
                    .map(|(row, label)| {
                        let p = proba.probability(row, label).clamp(PROBA_EPS, 1.0 - PROBA_EPS);
                        -p.ln()
                    })
                    .sum();
                total / n
            }
            None => f64::NAN,
        };

        ClassificationMetrics {
            accuracy: correct as f64 / n,
            balanced_accuracy: mean(&recalls),
            log_loss,
        }
    }

    pub fn metrics(&self) -> &ClassificationMetrics {
        &self.metrics
    }

    pub fn accuracy(&self) -> f64 {
        self.metrics.accuracy
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn y_predicted(&self) -> &[String] {
        &self.y_predicted
    }

    pub fn y_true(&self) -> &[String] {
        &self.y_true
    }

    pub fn y_predicted_proba(&self) -> Option<&ClassProbabilities> {
        self.y_predicted_proba.as_ref()
    }

    /// Confusion matrix over the label set; pairs involving labels outside
    /// the set are not counted
    pub fn confusion_matrix(&self) -> ConfusionMatrix {
        let k = self.labels.len();
        let mut counts = Array2::<usize>::zeros((k, k));
        for (t, p) in self.y_true.iter().zip(self.y_predicted.iter()) {
            let r = self.labels.iter().position(|l| l == t);
            let c = self.labels.iter().position(|l| l == p);
            if let (Some(r), Some(c)) = (r, c) {
                counts[[r, c]] += 1;
            }
        }
        ConfusionMatrix {
            labels: self.labels.clone(),
            counts,
        }
    }
}

impl EvalStats for ClassificationEvalStats {
    const METRIC_NAMES: &'static [&'static str] = &["accuracy", "balanced_accuracy", "log_loss"];

    fn metric_values(&self) -> Vec<f64> {
        let m = &self.metrics;
        vec![m.accuracy, m.balanced_accuracy, m.log_loss]
    }

    /// Probabilities are kept only when every part has them over the same labels
    fn combine(stats: &[Self]) -> Result<Self> {
        let y_predicted = stats.iter().flat_map(|s| s.y_predicted.iter().cloned()).collect();
        let y_true = stats.iter().flat_map(|s| s.y_true.iter().cloned()).collect();

        let probas: Option<Vec<&ClassProbabilities>> =
            stats.iter().map(|s| s.y_predicted_proba.as_ref()).collect();
        let proba = match probas {
            Some(probas) if !probas.is_empty() && probas.iter().all(|p| p.labels == probas[0].labels) => {
                let views: Vec<_> = probas.iter().map(|p| p.values.view()).collect();
                let values = ndarray::concatenate(ndarray::Axis(0), &views)?;
                Some(ClassProbabilities::new(probas[0].labels.clone(), values)?)
            }
            _ => None,
        };

        let labels: BTreeSet<String> = stats.iter().flat_map(|s| s.labels.iter().cloned()).collect();
        Self::new(y_predicted, y_true, proba, Some(labels.into_iter().collect()))
    }
}

impl fmt::Display for ClassificationEvalStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_metrics(f, "ClassificationEvalStats", &self.get_all())
    }
}

fn fmt_metrics(f: &mut fmt::Formatter<'_>, title: &str, metrics: &[(&str, f64)]) -> fmt::Result {
    let parts: Vec<String> = metrics
        .iter()
        .map(|(name, value)| format!("{}={:.6}", name, value))
        .collect();
    write!(f, "{}[{}]", title, parts.join(", "))
}

// ============================================================================
// Collections
// ============================================================================

/// Summary of one metric across several evaluations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    pub mean: f64,
    /// Population standard deviation
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl MetricSummary {
    pub fn from_values(values: &[f64]) -> Self {
        Self {
            mean: mean(values),
            std: population_std(values),
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

/// Statistics objects of the same kind, e.g. one per cross-validation fold
#[derive(Debug, Clone)]
pub struct EvalStatsCollection<S> {
    stats: Vec<S>,
}

pub type RegressionEvalStatsCollection = EvalStatsCollection<RegressionEvalStats>;
pub type ClassificationEvalStatsCollection = EvalStatsCollection<ClassificationEvalStats>;

impl<S: EvalStats> EvalStatsCollection<S> {
    pub fn new(stats: Vec<S>) -> Self {
        Self { stats }
    }

    pub fn stats(&self) -> &[S] {
        &self.stats
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    /// Values of one metric across the collection
    pub fn values(&self, metric: &str) -> Result<Vec<f64>> {
        let position = S::METRIC_NAMES
            .iter()
            .position(|name| *name == metric)
            .ok_or_else(|| EvalError::InvalidInput(format!(
                "unknown metric '{}'; known metrics: {:?}",
                metric,
                S::METRIC_NAMES
            )))?;
        Ok(self.stats.iter().map(|s| s.metric_values()[position]).collect())
    }

    /// Mean/std/min/max of every metric, in metric order
    pub fn summary(&self) -> Vec<(&'static str, MetricSummary)> {
        let per_stats: Vec<Vec<f64>> = self.stats.iter().map(|s| s.metric_values()).collect();
        S::METRIC_NAMES
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let values: Vec<f64> = per_stats.iter().map(|v| v[i]).collect();
                (*name, MetricSummary::from_values(&values))
            })
            .collect()
    }

    /// Flat `mean[metric]` / `std[metric]` view of the summary
    pub fn agg_stats(&self) -> BTreeMap<String, f64> {
        let mut agg = BTreeMap::new();
        for (name, summary) in self.summary() {
            agg.insert(format!("mean[{}]", name), summary.mean);
            agg.insert(format!("std[{}]", name), summary.std);
        }
        agg
    }

    /// Statistics over the concatenation of all collected data
    pub fn combined_eval_stats(&self) -> Result<S> {
        S::combine(&self.stats)
    }
}

impl<S: EvalStats> fmt::Display for EvalStatsCollection<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .summary()
            .iter()
            .map(|(name, s)| format!("{}={:.6}±{:.6}", name, s.mean, s.std))
            .collect();
        write!(f, "EvalStatsCollection[n={}, {}]", self.stats.len(), parts.join(", "))
    }
}
