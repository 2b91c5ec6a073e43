//! Kolosal Eval - model evaluation harness for tabular supervised learning
//!
//! This crate provides the machinery around pluggable predictor models:
//! - Row-labelled input/output datasets over polars DataFrames
//! - Transformer pipelines applied to model inputs and outputs
//! - A uniform model abstraction (fit/predict/predict_proba)
//! - Seeded train/test evaluation and k-fold cross-validation
//! - Regression and classification statistics with per-fold aggregation
//!
//! # Modules
//!
//! - [`data`] - Labelled frames and input/output datasets
//! - [`preprocessing`] - Data frame transformers and pipelines
//! - [`training`] - Model traits, model wrappers and baseline estimators
//! - [`evaluation`] - Evaluators, statistics and cross-validation
//! - [`utils`] - Numeric helpers

// Core error handling
pub mod error;

// Data and models
pub mod data;
pub mod preprocessing;
pub mod training;

// Evaluation
pub mod evaluation;

// Utilities
pub mod utils;

pub use error::{EvalError, Result};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{EvalError, Result};

    // Data
    pub use crate::data::{LabeledFrame, TabularDataset};

    // Preprocessing
    pub use crate::preprocessing::{
        ColumnDropper, ColumnRenamer, ColumnSelector, DataFrameTransformer, MathTransform,
        RuleBasedTransformer, Scaler, ScalerType, TransformType, TransformerPipeline,
    };

    // Training
    pub use crate::training::{
        ChainedVectorRegressionPredictor, ClassificationEstimator, ClassificationModel, MeanRegressor,
        NearestCentroidClassifier, PredictorModel, RegressionEstimator, VectorClassificationModel,
        VectorModel, VectorRegressionModel,
    };

    // Evaluation
    pub use crate::evaluation::{
        ClassificationEvalStats, CrossValidationConfig, EvalStats, EvalStatsCollection, EvaluatorConfig,
        ModelEvaluator, RegressionEvalStats, VectorClassificationModelCrossValidator,
        VectorClassificationModelEvaluator, VectorRegressionModelCrossValidator,
        VectorRegressionModelEvaluator,
    };
}
