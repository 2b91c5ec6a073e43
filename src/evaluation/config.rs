//! Evaluation configuration

use crate::error::{EvalError, Result};
use serde::{Deserialize, Serialize};

/// Default seed for train/test and fold permutations
pub const DEFAULT_RANDOM_SEED: u64 = 42;

/// Configuration for a single train/test evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    /// Fraction of rows held out for testing; `None` when test data is
    /// supplied explicitly
    pub test_fraction: Option<f64>,

    /// Seed for the row permutation
    pub random_seed: u64,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            test_fraction: Some(0.2),
            random_seed: DEFAULT_RANDOM_SEED,
        }
    }
}

impl EvaluatorConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_test_fraction(mut self, test_fraction: f64) -> Self {
        self.test_fraction = Some(test_fraction);
        self
    }

    /// Use explicitly supplied test data instead of a random hold-out
    pub fn without_test_fraction(mut self) -> Self {
        self.test_fraction = None;
        self
    }

    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Configuration for k-fold cross-validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossValidationConfig {
    /// Number of folds
    pub folds: usize,

    /// Seed for the single permutation all folds are cut from
    pub random_seed: u64,
}

impl Default for CrossValidationConfig {
    fn default() -> Self {
        Self {
            folds: 5,
            random_seed: DEFAULT_RANDOM_SEED,
        }
    }
}

impl CrossValidationConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_folds(mut self, folds: usize) -> Self {
        self.folds = folds;
        self
    }

    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.folds < 2 {
            return Err(EvalError::InvalidParameter {
                name: "folds".to_string(),
                value: self.folds.to_string(),
                reason: "must be at least 2".to_string(),
            });
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EvaluatorConfig::default();
        assert_eq!(config.test_fraction, Some(0.2));
        assert_eq!(config.random_seed, 42);

        let cv = CrossValidationConfig::default();
        assert_eq!(cv.folds, 5);
        assert_eq!(cv.random_seed, 42);
    }

    #[test]
    fn test_builder() {
        let config = EvaluatorConfig::new()
            .with_test_fraction(0.3)
            .with_random_seed(7);
        assert_eq!(config.test_fraction, Some(0.3));
        assert_eq!(config.random_seed, 7);
        assert_eq!(config.without_test_fraction().test_fraction, None);
    }

    #[test]
    fn test_json_roundtrip() {
        let cv = CrossValidationConfig::new().with_folds(10).with_random_seed(1);
        let json = cv.to_json().unwrap();
        assert_eq!(CrossValidationConfig::from_json(&json).unwrap(), cv);
        assert!(EvaluatorConfig::from_json("{").is_err());
    }

    #[test]
    fn test_fold_validation() {
        assert!(CrossValidationConfig::new().with_folds(1).validate().is_err());
        assert!(CrossValidationConfig::new().with_folds(2).validate().is_ok());
    }
}
