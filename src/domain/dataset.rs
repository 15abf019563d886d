// ============================================================
// Layer 3 — Pools and Balanced Datasets
// ============================================================
// ClassPools     : every input record, split by label. Built once,
//                   never mutated afterwards.
// BalancedDataset: requiredSize records drawn from each pool,
//                   concatenated and shuffled. One per trial.

use serde::{Deserialize, Serialize};

use crate::domain::error::EvalError;
use crate::domain::record::{Label, Record};

/// Two label-homogeneous pools.
#[derive(Debug, Clone, Default)]
pub struct ClassPools {
    normal:     Vec<Record>,
    arrhythmia: Vec<Record>,
}

impl ClassPools {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route a record into the pool of its label.
    pub fn push(&mut self, record: Record) {
        match record.label {
            Label::Normal     => self.normal.push(record),
            Label::Arrhythmia => self.arrhythmia.push(record),
        }
    }

    pub fn pool(&self, label: Label) -> &[Record] {
        match label {
            Label::Normal     => &self.normal,
            Label::Arrhythmia => &self.arrhythmia,
        }
    }

    pub fn normal_len(&self) -> usize {
        self.normal.len()
    }

    pub fn arrhythmia_len(&self) -> usize {
        self.arrhythmia.len()
    }

    /// requiredSize = min(|Normal|, |Arrhythmia|), or InsufficientData
    /// when either pool is empty.
    pub fn required_size(&self) -> Result<usize, EvalError> {
        let size = self.normal.len().min(self.arrhythmia.len());
        if size == 0 {
            return Err(EvalError::InsufficientData {
                normal:     self.normal.len(),
                arrhythmia: self.arrhythmia.len(),
            });
        }
        Ok(size)
    }
}

impl FromIterator<Record> for ClassPools {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        let mut pools = ClassPools::new();
        for record in iter {
            pools.push(record);
        }
        pools
    }
}

/// The shuffled, class-balanced training set of one trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalancedDataset {
    pub trial:   usize,
    pub records: Vec<Record>,
}

impl BalancedDataset {
    pub fn new(trial: usize, records: Vec<Record>) -> Self {
        Self { trial, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Width of the feature vectors (0 for an empty dataset).
    pub fn n_features(&self) -> usize {
        self.records.first().map(Record::n_features).unwrap_or(0)
    }

    /// (normal, arrhythmia) record counts.
    pub fn label_counts(&self) -> (usize, usize) {
        let arrhythmia = self
            .records
            .iter()
            .filter(|r| r.label == Label::Arrhythmia)
            .count();
        (self.records.len() - arrhythmia, arrhythmia)
    }

    pub fn labels(&self) -> Vec<Label> {
        self.records.iter().map(|r| r.label).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_size_is_smaller_pool() {
        let pools: ClassPools = (0..10)
            .map(|i| Record::new(vec![i as f64], if i < 7 { Label::Normal } else { Label::Arrhythmia }))
            .collect();
        assert_eq!(pools.normal_len(), 7);
        assert_eq!(pools.arrhythmia_len(), 3);
        assert_eq!(pools.required_size().unwrap(), 3);
    }

    #[test]
    fn test_empty_pool_is_insufficient() {
        let pools: ClassPools = (0..4).map(|i| Record::new(vec![i as f64], Label::Normal)).collect();
        let err = pools.required_size().unwrap_err();
        assert!(matches!(err, EvalError::InsufficientData { normal: 4, arrhythmia: 0 }));
    }

    #[test]
    fn test_label_counts() {
        let ds = BalancedDataset::new(0, vec![
            Record::new(vec![1.0], Label::Normal),
            Record::new(vec![2.0], Label::Arrhythmia),
            Record::new(vec![3.0], Label::Arrhythmia),
        ]);
        assert_eq!(ds.label_counts(), (1, 2));
        assert_eq!(ds.n_features(), 1);
    }
}
