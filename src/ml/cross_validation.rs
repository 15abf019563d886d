// ============================================================
// Layer 5 — K-Fold Cross-Validation
// ============================================================
// Scores one balanced dataset:
//
//   for each of the k folds:
//     1. fit the scaler on the training rows, scale both parts
//     2. fit a fresh logistic regression on the training rows
//     3. accuracy = correct predictions / test rows
//   trial result = mean of the k fold accuracies
//
// Every fold starts from a model initialised with the same seed,
// so the folds only differ in the data they see.
//
// Reference: Burn Book §5 (Training), Rust Book §13 (Iterators)

use burn::{backend::ndarray::NdArrayDevice, module::AutodiffModule};
use serde::{Deserialize, Serialize};

use crate::data::{
    batcher::FeatureBatcher,
    folds::k_fold_indices,
    preprocessor::Standardizer,
};
use crate::domain::dataset::BalancedDataset;
use crate::domain::error::EvalError;
use crate::domain::record::Record;
use crate::ml::trainer::{fit, ClassifierConfig, InferBackend, TrainBackend};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossValidationConfig {
    /// Number of folds (k)
    pub folds:       usize,
    /// Keep the class ratio in every fold
    pub stratified:  bool,
    /// Z-score features using training-fold statistics
    pub standardize: bool,
}

impl Default for CrossValidationConfig {
    fn default() -> Self {
        Self {
            folds:       10,
            stratified:  true,
            standardize: true,
        }
    }
}

/// Per-fold accuracies of one dataset and their mean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossValScore {
    pub fold_accuracies: Vec<f64>,
    pub mean:            f64,
}

impl CrossValScore {
    pub fn from_folds(fold_accuracies: Vec<f64>) -> Self {
        let mean = if fold_accuracies.is_empty() {
            0.0
        } else {
            fold_accuracies.iter().sum::<f64>() / fold_accuracies.len() as f64
        };
        Self { fold_accuracies, mean }
    }

    pub fn min(&self) -> f64 {
        self.fold_accuracies.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.fold_accuracies.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

/// Mean k-fold accuracy of a fresh classifier on `dataset`.
pub fn cross_val_accuracy(
    dataset: &BalancedDataset,
    cv:      &CrossValidationConfig,
    clf:     &ClassifierConfig,
    seed:    u64,
) -> Result<CrossValScore, EvalError> {
    let folds = k_fold_indices(&dataset.labels(), cv.folds, cv.stratified, dataset.trial)?;

    let device        = NdArrayDevice::default();
    let train_batcher = FeatureBatcher::<TrainBackend>::new(device.clone());
    let test_batcher  = FeatureBatcher::<InferBackend>::new(device.clone());

    let mut accuracies = Vec::with_capacity(folds.len());
    for (i, fold) in folds.iter().enumerate() {
        let train_rows: Vec<&Record> = fold.train.iter().map(|&r| &dataset.records[r]).collect();
        let test_rows: Vec<&Record>  = fold.test.iter().map(|&r| &dataset.records[r]).collect();

        let scaler = if cv.standardize {
            Standardizer::fit(train_rows.iter().copied())
        } else {
            Standardizer::identity(dataset.n_features())
        };
        let train: Vec<Record> = train_rows.iter().map(|r| scaler.transform(r)).collect();
        let test: Vec<Record>  = test_rows.iter().map(|r| scaler.transform(r)).collect();

        let (model, summary) = fit(&train_batcher.batch(&train), clf, seed, &device);
        let correct  = model.valid().correct_predictions(test_batcher.batch(&test));
        let accuracy = correct as f64 / test.len() as f64;

        tracing::debug!(
            "Trial {} fold {}: accuracy={:.4} ({} / {}), iterations={}, loss={:.4}",
            dataset.trial, i, accuracy, correct, test.len(), summary.iterations, summary.final_loss,
        );
        accuracies.push(accuracy);
    }

    Ok(CrossValScore::from_folds(accuracies))
}
