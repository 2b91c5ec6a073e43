//! Rule-based column reshaping

use super::RuleBasedTransformer;
use crate::error::{EvalError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Keeps exactly the given columns, in the given order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSelector {
    columns: Vec<String>,
}

impl ColumnSelector {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }
}

impl RuleBasedTransformer for ColumnSelector {
    fn apply_rule(&self, df: &DataFrame) -> Result<DataFrame> {
        if let Some(missing) = self.columns.iter().find(|c| df.column(c).is_err()) {
            return Err(EvalError::FeatureNotFound(missing.clone()));
        }
        Ok(df.select(self.columns.iter().map(|c| c.as_str()))?)
    }
}

/// Removes the given columns; absent columns are ignored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDropper {
    columns: Vec<String>,
}

impl ColumnDropper {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }
}

impl RuleBasedTransformer for ColumnDropper {
    fn apply_rule(&self, df: &DataFrame) -> Result<DataFrame> {
        let mut result = df.clone();
        for col_name in &self.columns {
            if result.column(col_name).is_ok() {
                result = result.drop(col_name)?;
            }
        }
        Ok(result)
    }
}

/// Renames columns according to (old, new) pairs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnRenamer {
    mapping: Vec<(String, String)>,
}

impl ColumnRenamer {
    pub fn new(mapping: Vec<(String, String)>) -> Self {
        Self { mapping }
    }
}

impl RuleBasedTransformer for ColumnRenamer {
    fn apply_rule(&self, df: &DataFrame) -> Result<DataFrame> {
        let mut result = df.clone();
        for (old, new) in &self.mapping {
            result
                .rename(old, new.as_str().into())
                .map_err(|_| EvalError::FeatureNotFound(old.clone()))?;
        }
        Ok(result)
    }
}
