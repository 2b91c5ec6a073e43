//! Model evaluation module
//!
//! Provides:
//! - Seeded train/test and k-fold splitting
//! - Regression and classification evaluators
//! - Evaluation statistics and per-fold collections
//! - Cross-validation with per-fold result aggregation

mod config;
mod cross_validation;
mod eval_data;
mod evaluator;
mod split;
mod stats;

pub use config::{CrossValidationConfig, EvaluatorConfig, DEFAULT_RANDOM_SEED};
pub use cross_validation::{VectorClassificationModelCrossValidator, VectorRegressionModelCrossValidator};
pub use eval_data::{
    VectorClassificationModelCrossValidationData, VectorClassificationModelEvaluationData,
    VectorRegressionModelCrossValidationData, VectorRegressionModelEvaluationData,
};
pub use evaluator::{ModelEvaluator, VectorClassificationModelEvaluator, VectorRegressionModelEvaluator};
pub use split::{fold_splits, permuted_indices, train_test_indices, FoldSplit};
pub use stats::{
    ClassProbabilities, ClassificationEvalStats, ClassificationEvalStatsCollection, ClassificationMetrics,
    ConfusionMatrix, EvalStats, EvalStatsCollection, MetricSummary, RegressionEvalStats,
    RegressionEvalStatsCollection, RegressionMetrics,
};
