//! Tabular data containers
//!
//! - [`LabeledFrame`] - a polars `DataFrame` carrying explicit row labels
//! - [`TabularDataset`] - aligned input/output frames sharing row identity

mod dataset;
mod frame;

pub use dataset::TabularDataset;
pub use frame::LabeledFrame;
