//! Model abstraction
//!
//! Provides the model capabilities the evaluation harness works with:
//! - [`PredictorModel`], [`VectorModel`], [`ClassificationModel`] - fit/predict contracts
//! - [`RegressionEstimator`], [`ClassificationEstimator`] - seams for pluggable learning logic
//! - [`VectorRegressionModel`], [`VectorClassificationModel`] - estimators wrapped with
//!   transformer pipelines and fitted column schema checks
//! - [`ChainedVectorRegressionPredictor`] - repeated application of a square predictor
//! - [`MeanRegressor`], [`NearestCentroidClassifier`] - baseline estimators

mod baseline;
mod chained;
mod classification;
mod models;
mod regression;
mod vector_model;

pub use baseline::{MeanRegressor, NearestCentroidClassifier};
pub use chained::ChainedVectorRegressionPredictor;
pub use classification::VectorClassificationModel;
pub use models::{
    ClassificationEstimator, ClassificationModel, PredictorModel, RegressionEstimator, VectorModel,
};
pub use regression::VectorRegressionModel;
