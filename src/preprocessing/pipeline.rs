//! Ordered transformer chains

use super::DataFrameTransformer;
use crate::error::Result;
use polars::prelude::*;
use std::fmt;

/// An ordered sequence of transformers applied cumulatively
#[derive(Debug, Clone, Default)]
pub struct TransformerPipeline {
    transformers: Vec<Box<dyn DataFrameTransformer>>,
}

impl TransformerPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to append a transformer
    pub fn with(mut self, transformer: impl DataFrameTransformer) -> Self {
        self.push(transformer);
        self
    }

    pub fn push(&mut self, transformer: impl DataFrameTransformer) {
        self.transformers.push(Box::new(transformer));
    }

    pub fn push_boxed(&mut self, transformer: Box<dyn DataFrameTransformer>) {
        self.transformers.push(transformer);
    }

    pub fn len(&self) -> usize {
        self.transformers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn DataFrameTransformer> {
        self.transformers.iter().map(|t| t.as_ref())
    }

    /// Fit each transformer on the output of its predecessor and return the
    /// fully transformed frame
    pub fn fit_apply(&mut self, df: &DataFrame) -> Result<DataFrame> {
        let mut current = df.clone();
        for transformer in self.transformers.iter_mut() {
            transformer.fit(&current)?;
            current = transformer.apply(&current)?;
        }
        Ok(current)
    }

    /// Apply the (already fitted) transformers in order
    pub fn apply(&self, df: &DataFrame) -> Result<DataFrame> {
        let mut current = df.clone();
        for transformer in &self.transformers {
            current = transformer.apply(&current)?;
        }
        Ok(current)
    }

    /// First transformer of the given concrete type
    pub fn find<T: DataFrameTransformer>(&self) -> Option<&T> {
        self.transformers
            .iter()
            .find_map(|t| t.as_any().downcast_ref::<T>())
    }
}

impl fmt::Display for TransformerPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.transformers.iter().map(|t| format!("{:?}", t)).collect();
        write!(f, "[{}]", parts.join(", "))
    }
}
