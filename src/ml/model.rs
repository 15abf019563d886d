// ============================================================
// Layer 5 — Logistic Regression Model
// ============================================================
// Binary logistic regression as a burn Module:
//
//   logit = X·w + b            X: [n, d], w: [d, 1], b: [1]
//   p     = sigmoid(logit)     probability of arrhythmia
//
// Objective minimised by the trainer (C = inverse regularisation):
//
//   J(w, b) = mean_i[ log(1 + e^z_i) - y_i·z_i ] + ||w||² / (2·C·n)
//
// which is the C-weighted penalised log-likelihood divided by C·n.
// The bias is not penalised.
//
// Reference: Burn Book §3 (Building Blocks)

use burn::{
    module::Param,
    nn::{loss::BinaryCrossEntropyLossConfig, Initializer, Linear, LinearConfig},
    prelude::*,
    tensor::activation::sigmoid,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::data::batcher::FeatureBatch;

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize.
#[derive(Config, Debug)]
pub struct LogisticRegressionConfig {
    pub n_features: usize,

    /// Initial weights are drawn uniformly from [-init_scale, init_scale]
    #[config(default = 0.01)]
    pub init_scale: f64,
}

impl LogisticRegressionConfig {
    /// Build a model whose initial weights depend only on `seed`.
    pub fn init<B: Backend>(&self, seed: u64, device: &B::Device) -> LogisticRegressionModel<B> {
        // Bias starts at zero; the weight is replaced by the seeded draw
        let mut linear: Linear<B> = LinearConfig::new(self.n_features, 1)
            .with_initializer(Initializer::Zeros)
            .init(device);

        let mut rng = StdRng::seed_from_u64(seed);
        let scale   = self.init_scale as f32;
        let initial: Vec<f32> = (0..self.n_features)
            .map(|_| if scale > 0.0 { rng.gen_range(-scale..=scale) } else { 0.0 })
            .collect();

        linear.weight = Param::from_tensor(
            Tensor::<B, 1>::from_floats(initial.as_slice(), device).reshape([self.n_features, 1]),
        );

        LogisticRegressionModel { linear }
    }
}

#[derive(Module, Debug)]
pub struct LogisticRegressionModel<B: Backend> {
    /// d → 1 logit
    pub linear: Linear<B>,
}

impl<B: Backend> LogisticRegressionModel<B> {
    /// features: [n, d] → logits: [n, 1]
    pub fn forward(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
        self.linear.forward(features)
    }

    /// features: [n, d] → P(arrhythmia): [n, 1]
    pub fn predict_proba(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
        sigmoid(self.forward(features))
    }

    /// Number of rows in `batch` classified correctly at the 0.5 threshold.
    pub fn correct_predictions(&self, batch: FeatureBatch<B>) -> usize {
        let predicted = self
            .predict_proba(batch.features)
            .greater_equal_elem(0.5)
            .int();
        let correct: i64 = predicted
            .equal(batch.labels)
            .int()
            .sum()
            .into_scalar()
            .elem::<i64>();
        correct.max(0) as usize
    }

    /// Penalised mean log-loss (shape [1]); `l2` is 1 / (2·C·n).
    pub fn forward_loss(&self, batch: &FeatureBatch<B>, l2: f64) -> Tensor<B, 1> {
        let logits = self.forward(batch.features.clone());

        let bce = BinaryCrossEntropyLossConfig::new()
            .with_logits(true)
            .init(&logits.device());
        let data_loss = bce.forward(logits, batch.labels.clone());

        let w = self.linear.weight.val();
        let penalty = (w.clone() * w).sum().mul_scalar(l2);

        data_loss + penalty
    }
}
