// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Full-batch optimisation of the logistic regression objective
// with one of burn's optimisers. Every iteration:
//
//   forward → penalised log-loss → backward → optimiser step
//
// The loop ends after max_iter iterations, or earlier once the
// loss improves by less than `tol` between two iterations.
//
// Hyperparameters are held constant across trials; only the seed
// (which drives weight initialisation) changes from trial to trial.
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use burn::{
    optim::{AdamConfig, GradientsParams, Optimizer, SgdConfig},
    prelude::*,
    tensor::backend::AutodiffBackend,
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::data::batcher::FeatureBatch;
use crate::ml::model::{LogisticRegressionConfig, LogisticRegressionModel};

pub type TrainBackend = burn::backend::Autodiff<burn::backend::NdArray>;
pub type InferBackend = burn::backend::NdArray;

/// Optimisation method used for every fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Solver {
    Adam,
    Sgd,
}

impl FromStr for Solver {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "adam" => Ok(Solver::Adam),
            "sgd"  => Ok(Solver::Sgd),
            other  => Err(format!("unknown solver '{other}' (expected adam or sgd)")),
        }
    }
}

impl fmt::Display for Solver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Solver::Adam => write!(f, "adam"),
            Solver::Sgd  => write!(f, "sgd"),
        }
    }
}

/// Fixed classifier hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Inverse regularisation strength (larger = weaker penalty)
    pub c:             f64,
    /// Cap on optimiser iterations per fit
    pub max_iter:      usize,
    pub solver:        Solver,
    pub learning_rate: f64,
    /// Stop once the loss improves by less than this
    pub tol:           f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            c:             1.0,
            max_iter:      100,
            solver:        Solver::Adam,
            learning_rate: 0.1,
            tol:           1e-4,
        }
    }
}

impl ClassifierConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.c > 0.0 && self.c.is_finite()) {
            return Err(format!("C must be positive, got {}", self.c));
        }
        if self.max_iter == 0 {
            return Err("max_iter must be at least 1".into());
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(format!("learning rate must be positive, got {}", self.learning_rate));
        }
        if self.tol < 0.0 {
            return Err(format!("tol must not be negative, got {}", self.tol));
        }
        Ok(())
    }
}

/// How one fit went.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainSummary {
    pub iterations: usize,
    pub final_loss: f64,
    pub converged:  bool,
}

/// Fit a fresh model on `batch`. Initial weights depend only on `seed`.
pub fn fit<B: AutodiffBackend>(
    batch:  &FeatureBatch<B>,
    cfg:    &ClassifierConfig,
    seed:   u64,
    device: &B::Device,
) -> (LogisticRegressionModel<B>, TrainSummary) {
    let [n_rows, n_features] = batch.features.dims();
    let model = LogisticRegressionConfig::new(n_features).init::<B>(seed, device);

    // C·Σloss + ½||w||²  divided through by C·n
    let l2 = 1.0 / (2.0 * cfg.c * n_rows.max(1) as f64);

    match cfg.solver {
        Solver::Adam => optimize(model, AdamConfig::new().with_epsilon(1e-8).init(), batch, cfg, l2),
        Solver::Sgd  => optimize(model, SgdConfig::new().init(), batch, cfg, l2),
    }
}

fn optimize<B, O>(
    mut model: LogisticRegressionModel<B>,
    mut optim: O,
    batch:     &FeatureBatch<B>,
    cfg:       &ClassifierConfig,
    l2:        f64,
) -> (LogisticRegressionModel<B>, TrainSummary)
where
    B: AutodiffBackend,
    O: Optimizer<LogisticRegressionModel<B>, B>,
{
    let mut summary = TrainSummary {
        iterations: 0,
        final_loss: f64::NAN,
        converged:  false,
    };
    let mut previous = f64::INFINITY;

    for iteration in 1..=cfg.max_iter {
        let loss = model.forward_loss(batch, l2);
        let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();

        let grads = loss.backward();
        let grads = GradientsParams::from_grads(grads, &model);
        model = optim.step(cfg.learning_rate, model, grads);

        summary.iterations = iteration;
        summary.final_loss = loss_val;

        if (previous - loss_val).abs() < cfg.tol {
            summary.converged = true;
            break;
        }
        previous = loss_val;
    }

    if !summary.converged {
        tracing::debug!(
            "Fit stopped at max_iter={} without converging (loss={:.6})",
            cfg.max_iter,
            summary.final_loss
        );
    }
    (model, summary)
}
