//! Evaluation result containers

use super::stats::{
    ClassificationEvalStats, ClassificationEvalStatsCollection, EvalStats, EvalStatsCollection,
    RegressionEvalStats, RegressionEvalStatsCollection,
};
use crate::error::{EvalError, Result};
use polars::prelude::*;

/// Pick the variable to report on: the given one, or the only one there is
fn resolve_variable<'a>(names: &'a [String], name: Option<&'a str>) -> Result<&'a str> {
    match name {
        Some(name) => {
            if names.iter().any(|n| n == name) {
                Ok(name)
            } else {
                Err(EvalError::UnknownVariable {
                    name: name.to_string(),
                    known: names.to_vec(),
                })
            }
        }
        None => match names {
            [only] => Ok(only.as_str()),
            [] => Err(EvalError::InvalidInput("no predicted variables".to_string())),
            _ => Err(EvalError::AmbiguousVariable(names.to_vec())),
        },
    }
}

/// Regression evaluation of one model on one test set, per predicted variable
#[derive(Debug, Clone)]
pub struct VectorRegressionModelEvaluationData {
    predicted_var_names: Vec<String>,
    stats: Vec<RegressionEvalStats>,
}

impl VectorRegressionModelEvaluationData {
    /// `stats_by_var` keeps the order of the predicted variables
    pub fn new(stats_by_var: Vec<(String, RegressionEvalStats)>) -> Self {
        let (predicted_var_names, stats): (Vec<String>, Vec<RegressionEvalStats>) =
            stats_by_var.into_iter().unzip();
        Self {
            predicted_var_names,
            stats,
        }
    }

    pub fn predicted_var_names(&self) -> &[String] {
        &self.predicted_var_names
    }

    /// Statistics for `predicted_var_name`, which may be omitted when a
    /// single variable was predicted
    pub fn get_eval_stats(&self, predicted_var_name: Option<&str>) -> Result<&RegressionEvalStats> {
        let name = resolve_variable(&self.predicted_var_names, predicted_var_name)?;
        self.iter()
            .find(|(n, _)| *n == name)
            .map(|(_, stats)| stats)
            .ok_or_else(|| EvalError::UnknownVariable {
                name: name.to_string(),
                known: self.predicted_var_names.clone(),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RegressionEvalStats)> {
        self.predicted_var_names
            .iter()
            .map(String::as_str)
            .zip(self.stats.iter())
    }

    /// One row per predicted variable, one column per metric
    pub fn data_frame(&self) -> Result<DataFrame> {
        let mut columns: Vec<Column> = Vec::with_capacity(RegressionEvalStats::METRIC_NAMES.len() + 1);
        let names: Vec<&str> = self.predicted_var_names.iter().map(String::as_str).collect();
        columns.push(Column::new("predicted_var".into(), names));

        let values: Vec<Vec<f64>> = self.stats.iter().map(|s| s.metric_values()).collect();
        for (i, metric) in RegressionEvalStats::METRIC_NAMES.iter().enumerate() {
            let column: Vec<f64> = values.iter().map(|v| v[i]).collect();
            columns.push(Column::new((*metric).into(), column));
        }

        Ok(DataFrame::new(columns)?)
    }
}

/// Classification evaluation of one model on one test set
#[derive(Debug, Clone)]
pub struct VectorClassificationModelEvaluationData {
    stats: ClassificationEvalStats,
}

impl VectorClassificationModelEvaluationData {
    pub fn new(stats: ClassificationEvalStats) -> Self {
        Self { stats }
    }

    pub fn get_eval_stats(&self) -> &ClassificationEvalStats {
        &self.stats
    }
}

/// Per-fold results of a regression cross-validation
#[derive(Debug, Clone)]
pub struct VectorRegressionModelCrossValidationData<M> {
    trained_models: Vec<M>,
    eval_data_list: Vec<VectorRegressionModelEvaluationData>,
    predicted_var_names: Vec<String>,
    test_indices_list: Vec<Vec<usize>>,
}

impl<M> VectorRegressionModelCrossValidationData<M> {
    pub fn new(
        trained_models: Vec<M>,
        eval_data_list: Vec<VectorRegressionModelEvaluationData>,
        predicted_var_names: Vec<String>,
        test_indices_list: Vec<Vec<usize>>,
    ) -> Self {
        Self {
            trained_models,
            eval_data_list,
            predicted_var_names,
            test_indices_list,
        }
    }

    pub fn trained_models(&self) -> &[M] {
        &self.trained_models
    }

    pub fn eval_data_list(&self) -> &[VectorRegressionModelEvaluationData] {
        &self.eval_data_list
    }

    pub fn predicted_var_names(&self) -> &[String] {
        &self.predicted_var_names
    }

    /// Row labels of each fold's test set
    pub fn test_indices_list(&self) -> &[Vec<usize>] {
        &self.test_indices_list
    }

    pub fn num_folds(&self) -> usize {
        self.eval_data_list.len()
    }

    /// Per-fold statistics of one predicted variable
    pub fn get_eval_stats_collection(&self, predicted_var_name: Option<&str>) -> Result<RegressionEvalStatsCollection> {
        let name = resolve_variable(&self.predicted_var_names, predicted_var_name)?;
        let stats = self
            .eval_data_list
            .iter()
            .map(|data| data.get_eval_stats(Some(name)).cloned())
            .collect::<Result<Vec<_>>>()?;
        Ok(EvalStatsCollection::new(stats))
    }
}

/// Per-fold results of a classification cross-validation
#[derive(Debug, Clone)]
pub struct VectorClassificationModelCrossValidationData<M> {
    trained_models: Vec<M>,
    eval_data_list: Vec<VectorClassificationModelEvaluationData>,
}

impl<M> VectorClassificationModelCrossValidationData<M> {
    pub fn new(trained_models: Vec<M>, eval_data_list: Vec<VectorClassificationModelEvaluationData>) -> Self {
        Self {
            trained_models,
            eval_data_list,
        }
    }

    pub fn trained_models(&self) -> &[M] {
        &self.trained_models
    }

    pub fn eval_data_list(&self) -> &[VectorClassificationModelEvaluationData] {
        &self.eval_data_list
    }

    pub fn num_folds(&self) -> usize {
        self.eval_data_list.len()
    }

    pub fn get_eval_stats_collection(&self) -> ClassificationEvalStatsCollection {
        let stats = self
            .eval_data_list
            .iter()
            .map(|data| data.get_eval_stats().clone())
            .collect();
        EvalStatsCollection::new(stats)
    }
}
