// ============================================================
// Layer 4 — Feature Batcher
// ============================================================
// Turns a slice of Records into the two tensors the classifier
// consumes:
//
//   features: Tensor<B, 2>       shape [n, n_features]  (f32)
//   labels:   Tensor<B, 2, Int>  shape [n, 1]           (0 / 1)
//
// Training is full-batch, so one FeatureBatch holds an entire
// training or test portion of a fold.
//
// Reference: Burn Book §4 (Batcher)

use burn::prelude::*;

use crate::domain::record::Record;

/// All rows of one fold portion, ready for the model.
#[derive(Debug, Clone)]
pub struct FeatureBatch<B: Backend> {
    pub features: Tensor<B, 2>,
    pub labels:   Tensor<B, 2, Int>,
}

impl<B: Backend> FeatureBatch<B> {
    pub fn len(&self) -> usize {
        self.features.dims()[0]
    }
}

/// Holds the target device so tensors are created in the right place.
#[derive(Clone, Debug)]
pub struct FeatureBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> FeatureBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }

    /// Stack `records` row-major into a FeatureBatch. `records` must be
    /// non-empty and share one feature width.
    pub fn batch(&self, records: &[Record]) -> FeatureBatch<B> {
        let n_rows     = records.len();
        let n_features = records.first().map(Record::n_features).unwrap_or(0);

        // [r1_f1, r1_f2, ..., rN_fD] → [N, D]
        let flat: Vec<f32> = records
            .iter()
            .flat_map(|r| r.features.iter().map(|&x| x as f32))
            .collect();
        let labels: Vec<i32> = records.iter().map(|r| r.label.code() as i32).collect();

        let features = Tensor::<B, 1>::from_floats(flat.as_slice(), &self.device)
            .reshape([n_rows, n_features]);
        let labels = Tensor::<B, 1, Int>::from_ints(labels.as_slice(), &self.device)
            .reshape([n_rows, 1]);

        FeatureBatch { features, labels }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::Label;
    use burn::backend::NdArray;

    #[test]
    fn test_batch_shapes() {
        let records = vec![
            Record::new(vec![1.0, 2.0, 3.0], Label::Normal),
            Record::new(vec![4.0, 5.0, 6.0], Label::Arrhythmia),
        ];
        let batch = FeatureBatcher::<NdArray>::new(Default::default()).batch(&records);
        assert_eq!(batch.features.dims(), [2, 3]);
        assert_eq!(batch.labels.dims(), [2, 1]);
        assert_eq!(batch.len(), 2);

        let positives: i64 = batch.labels.sum().into_scalar().elem::<i64>();
        assert_eq!(positives, 1);
    }
}
