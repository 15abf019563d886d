// ============================================================
// Layer 4 — Feature Standardizer
// ============================================================
// Z-score scaling of every feature column:
//
//   x' = (x - mean) / std
//
// The statistics are fitted on the TRAINING part of a fold only
// and then applied to both the training and the test part.
//
// Columns with zero variance are only centered (std treated as 1).
//
// Reference: Rust Book §8 (Vectors), §13 (Iterators)

use crate::domain::record::Record;

#[derive(Debug, Clone, PartialEq)]
pub struct Standardizer {
    means: Vec<f64>,
    stds:  Vec<f64>,
}

impl Standardizer {
    /// Fit per-column mean and (population) standard deviation.
    pub fn fit<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let mut count = 0usize;
        let mut sums: Vec<f64>    = Vec::new();
        let mut sq_sums: Vec<f64> = Vec::new();

        for record in records {
            if sums.is_empty() {
                sums    = vec![0.0; record.n_features()];
                sq_sums = vec![0.0; record.n_features()];
            }
            for (j, &x) in record.features.iter().enumerate() {
                sums[j]    += x;
                sq_sums[j] += x * x;
            }
            count += 1;
        }

        let n = count.max(1) as f64;
        let means: Vec<f64> = sums.iter().map(|s| s / n).collect();
        let stds = sq_sums
            .iter()
            .zip(&means)
            .map(|(sq, m)| {
                let var = (sq / n - m * m).max(0.0);
                let std = var.sqrt();
                if std > f64::EPSILON { std } else { 1.0 }
            })
            .collect();

        Self { means, stds }
    }

    /// Return a scaled copy of `record`.
    pub fn transform(&self, record: &Record) -> Record {
        let features = record
            .features
            .iter()
            .zip(self.means.iter().zip(&self.stds))
            .map(|(x, (m, s))| (x - m) / s)
            .collect();
        Record::new(features, record.label)
    }

    /// Identity scaler for `n_features` columns.
    pub fn identity(n_features: usize) -> Self {
        Self {
            means: vec![0.0; n_features],
            stds:  vec![1.0; n_features],
        }
    }
}
