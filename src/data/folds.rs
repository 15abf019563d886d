// ============================================================
// Layer 4 — K-Fold Splitter
// ============================================================
// Splits the row indices of one balanced dataset into k folds.
// Each fold is used once as the test set while the other k-1
// folds form the training set.
//
// Two assignment modes:
//   stratified: rows of each class are dealt round-robin over
//                the folds in dataset order, so every fold keeps
//                the class ratio (default for classifiers)
//   plain     : contiguous blocks; the first n % k folds get one
//                extra row
//
// No shuffling happens here: the balanced dataset is already
// shuffled by the resampler.
//
// A fold is degenerate when its training part or its test part
// holds a single class. Accuracy (and the fit itself) is then
// meaningless, so it is reported as an error instead of a score.
//
// Reference: Rust Book §8 (Vectors), §13 (Iterators)

use crate::domain::error::EvalError;
use crate::domain::record::Label;

/// Row indices of one train/test split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fold {
    pub train: Vec<usize>,
    pub test:  Vec<usize>,
}

/// Split `labels.len()` rows into `k` folds.
///
/// `trial` is only used to label errors.
pub fn k_fold_indices(
    labels:     &[Label],
    k:          usize,
    stratified: bool,
    trial:      usize,
) -> Result<Vec<Fold>, EvalError> {
    let n = labels.len();
    if k < 2 {
        return Err(EvalError::InvalidConfig(format!("need at least 2 folds, got {k}")));
    }
    if n < k {
        return Err(EvalError::DegenerateFold {
            trial,
            fold: 0,
            reason: format!("{n} records cannot be split into {k} folds"),
        });
    }

    let assignment = if stratified {
        stratified_assignment(labels, k)
    } else {
        contiguous_assignment(n, k)
    };

    let folds: Vec<Fold> = (0..k)
        .map(|fold| {
            let (test, train): (Vec<usize>, Vec<usize>) =
                (0..n).partition(|&row| assignment[row] == fold);
            Fold { train, test }
        })
        .collect();

    for (i, fold) in folds.iter().enumerate() {
        check_both_classes(labels, &fold.train, "training", trial, i)?;
        check_both_classes(labels, &fold.test, "test", trial, i)?;
    }

    tracing::debug!(
        "Trial {}: {} folds over {} records (stratified={})",
        trial, k, n, stratified
    );
    Ok(folds)
}

fn stratified_assignment(labels: &[Label], k: usize) -> Vec<usize> {
    let mut next = [0usize; 2];
    labels
        .iter()
        .map(|label| {
            let slot = &mut next[label.code() as usize];
            let fold = *slot % k;
            *slot += 1;
            fold
        })
        .collect()
}

fn contiguous_assignment(n: usize, k: usize) -> Vec<usize> {
    let base  = n / k;
    let extra = n % k;
    (0..k)
        .flat_map(|fold| {
            let size = base + usize::from(fold < extra);
            std::iter::repeat(fold).take(size)
        })
        .collect()
}

fn check_both_classes(
    labels: &[Label],
    rows:   &[usize],
    part:   &str,
    trial:  usize,
    fold:   usize,
) -> Result<(), EvalError> {
    let arrhythmia = rows.iter().filter(|&&r| labels[r] == Label::Arrhythmia).count();
    let reason = if rows.is_empty() {
        format!("{part} part is empty")
    } else if arrhythmia == 0 || arrhythmia == rows.len() {
        format!("{part} part has a single class ({} records)", rows.len())
    } else {
        return Ok(());
    };
    Err(EvalError::DegenerateFold { trial, fold, reason })
}
