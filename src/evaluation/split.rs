//! Seeded row permutations and fold splits

use crate::error::{EvalError, Result};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Positional row indices of one cross-validation fold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldSplit {
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
    pub fold_idx: usize,
}

/// Uniformly random permutation of `0..n`, fully determined by `seed`
pub fn permuted_indices(n: usize, seed: u64) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);
    indices
}

/// Split `0..n` into a test part of `floor(n * test_fraction)` rows and a
/// training part holding the rest. Returns `(train, test)`.
pub fn train_test_indices(n: usize, test_fraction: f64, seed: u64) -> Result<(Vec<usize>, Vec<usize>)> {
    if !(0.0..=1.0).contains(&test_fraction) {
        return Err(EvalError::InvalidParameter {
            name: "test_fraction".to_string(),
            value: test_fraction.to_string(),
            reason: "must be in [0, 1]".to_string(),
        });
    }
    let indices = permuted_indices(n, seed);
    let n_test = (n as f64 * test_fraction).floor() as usize;
    let (test, train) = indices.split_at(n_test);
    Ok((train.to_vec(), test.to_vec()))
}

/// K-fold splits cut from a single permutation.
///
/// Every test block holds `n / folds` rows. Rows past the last full block
/// are never tested and stay in the training part of every fold.
pub fn fold_splits(n: usize, folds: usize, seed: u64) -> Result<Vec<FoldSplit>> {
    if folds < 2 {
        return Err(EvalError::InvalidParameter {
            name: "folds".to_string(),
            value: folds.to_string(),
            reason: "must be at least 2".to_string(),
        });
    }
    if n < folds {
        return Err(EvalError::InvalidParameter {
            name: "folds".to_string(),
            value: folds.to_string(),
            reason: format!("cannot exceed the number of rows ({})", n),
        });
    }

    let indices = permuted_indices(n, seed);
    let block = n / folds;

    let splits = (0..folds)
        .map(|fold_idx| {
            let start = fold_idx * block;
            let end = start + block;
            let test_indices = indices[start..end].to_vec();
            let train_indices = indices[..start]
                .iter()
                .chain(indices[end..].iter())
                .copied()
                .collect();
            FoldSplit {
                train_indices,
                test_indices,
                fold_idx,
            }
        })
        .collect();

    Ok(splits)
}
