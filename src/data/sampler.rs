// ============================================================
// Layer 4 — Balanced Resampler
// ============================================================
// Produces one class-balanced, shuffled dataset per trial:
//
//   1. draw requiredSize records from the Normal pool (no replacement)
//   2. draw requiredSize records from the Arrhythmia pool (no replacement)
//   3. concatenate and shuffle (Fisher-Yates)
//   4. hand the result to the ArtifactStore under the trial index
//
// The pools are only borrowed: every trial samples from the
// ORIGINAL pools, so one record can show up in several trials,
// but never twice within the same trial.
//
// The generator is passed in by the caller and advanced trial by
// trial. Seeding it once makes the whole partition reproducible.
//
// Reference: rand crate documentation (seq::index::sample, SliceRandom)

use anyhow::{Context, Result};
use rand::{seq::index, seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::domain::dataset::{BalancedDataset, ClassPools};
use crate::domain::error::EvalError;
use crate::domain::record::Label;
use crate::domain::traits::ArtifactStore;

/// What a partition run produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionSummary {
    pub trials:        usize,
    pub required_size: usize,
}

impl PartitionSummary {
    pub fn records_per_trial(&self) -> usize {
        self.required_size * 2
    }
}

/// Build the balanced dataset for one trial.
pub fn balanced_sample<R: Rng + ?Sized>(
    pools: &ClassPools,
    trial: usize,
    rng:   &mut R,
) -> Result<BalancedDataset, EvalError> {
    let required = pools.required_size()?;

    let mut records = Vec::with_capacity(required * 2);
    for label in [Label::Normal, Label::Arrhythmia] {
        let pool = pools.pool(label);
        records.extend(
            index::sample(rng, pool.len(), required)
                .into_iter()
                .map(|i| pool[i].clone()),
        );
    }

    records.shuffle(rng);
    Ok(BalancedDataset::new(trial, records))
}

/// Materialize `n_iterations` balanced datasets into `store`.
///
/// `cancel`, when set between two trials, stops the loop with
/// `EvalError::Cancelled`. Artifacts already written stay in the store.
pub fn materialize<S, R>(
    pools:        &ClassPools,
    n_iterations: usize,
    store:        &S,
    rng:          &mut R,
    cancel:       Option<&AtomicBool>,
) -> Result<PartitionSummary>
where
    S: ArtifactStore + ?Sized,
    R: Rng + ?Sized,
{
    if n_iterations == 0 {
        return Err(EvalError::InvalidConfig("nbrIterations must be at least 1".into()).into());
    }
    let required_size = pools.required_size()?;

    for trial in 0..n_iterations {
        if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            return Err(EvalError::Cancelled { stage: "partition", completed: trial }.into());
        }

        let dataset = balanced_sample(pools, trial, rng)?;
        store
            .put(&dataset)
            .with_context(|| format!("Failed to store balanced dataset for trial {trial}"))?;

        tracing::debug!("Trial {}: stored {} balanced records", trial, dataset.len());
    }

    tracing::info!(
        "Materialized {} balanced datasets ({} records each)",
        n_iterations,
        required_size * 2
    );
    Ok(PartitionSummary { trials: n_iterations, required_size })
}
