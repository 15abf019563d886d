// ============================================================
// Layer 2 — PartitionUseCase
// ============================================================
// Orchestrates the first stage:
//
//   Step 1: Validate the configuration          (Layer 2)
//   Step 2: Load the input into class pools     (Layer 4 - data)
//   Step 3: Resample + store nbrIterations sets (Layer 4 → Layer 6)
//
// All input rows are parsed (Step 2) before a single artifact
// is written, so malformed input or an empty class leaves the
// output directory untouched.

use anyhow::Result;
use rand::Rng;
use std::sync::atomic::AtomicBool;

use crate::application::config::EvalConfig;
use crate::data::{
    loader::PoolLoader,
    sampler::{materialize, PartitionSummary},
};
use crate::domain::traits::ArtifactStore;

pub struct PartitionUseCase {
    config: EvalConfig,
}

impl PartitionUseCase {
    pub fn new(config: EvalConfig) -> Self {
        Self { config }
    }

    pub fn execute<S, R>(
        &self,
        n_iterations: usize,
        store:        &S,
        rng:          &mut R,
        cancel:       Option<&AtomicBool>,
    ) -> Result<PartitionSummary>
    where
        S: ArtifactStore + ?Sized,
        R: Rng + ?Sized,
    {
        let cfg = &self.config;
        cfg.validate()?;

        // ── Step 2: Parse every row into the two pools ───────────────────────
        tracing::info!("Loading labelled dataset from '{}'", cfg.input_path);
        let pools = PoolLoader::new(&cfg.input_path, cfg.schema.clone()).load()?;

        // ── Step 3: One balanced, shuffled dataset per trial ─────────────────
        let summary = materialize(&pools, n_iterations, store, rng, cancel)?;
        tracing::info!(
            "Partition complete: {} trials, requiredSize={}",
            summary.trials,
            summary.required_size
        );
        Ok(summary)
    }
}
