//! Utility functions shared by the data, model and evaluation modules

mod math;

pub use math::{columns_to_array2, mean, pearson_correlation, population_std};
