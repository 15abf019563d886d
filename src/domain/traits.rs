// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The partition stage hands datasets to the evaluation stage
// through an ArtifactStore, addressed by trial index.
//
// Implementations (Layer 6, infra):
//   - FsArtifactStore     → one CSV file per trial on disk
//   - MemoryArtifactStore → HashMap, used by tests
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;

use crate::domain::dataset::BalancedDataset;

// ─── ArtifactStore ────────────────────────────────────────────────────────────
/// Durable put/get of balanced datasets by trial index.
///
/// `get` on an index that was never stored must fail with
/// `EvalError::ArtifactMissing` (wrapped in the anyhow error).
pub trait ArtifactStore {
    /// Persist the dataset for `dataset.trial`, replacing any previous one.
    fn put(&self, dataset: &BalancedDataset) -> Result<()>;

    /// Load the dataset stored for `trial`.
    fn get(&self, trial: usize) -> Result<BalancedDataset>;

    /// True if an artifact exists for `trial`.
    fn contains(&self, trial: usize) -> bool;
}
