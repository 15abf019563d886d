// ============================================================
// Layer 3 — Error Taxonomy
// ============================================================
// Every failure a run can hit. None of these are retried:
// malformed input stays malformed and a missing artifact stays
// missing, so each one aborts the run and no aggregate is reported.
//
// The application layer wraps these in anyhow::Error with extra
// context; callers (and tests) can still downcast back to EvalError.
//
// Reference: Rust Book §9 (Recoverable Errors with Result)
//            thiserror crate documentation

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EvalError {
    /// A row failed numeric parsing, is too short for the schema,
    /// or carries a label outside the recognised tokens.
    #[error("malformed row at line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },

    /// One of the two class pools is empty, so balanced sampling is impossible.
    #[error("insufficient data: {normal} normal and {arrhythmia} arrhythmia records (need at least one of each)")]
    InsufficientData { normal: usize, arrhythmia: usize },

    /// The artifact for a trial index could not be found in the store.
    #[error("artifact for trial {trial} is missing")]
    ArtifactMissing { trial: usize },

    /// A cross-validation fold cannot be scored.
    #[error("degenerate fold in trial {trial} (fold {fold}): {reason}")]
    DegenerateFold { trial: usize, fold: usize, reason: String },

    /// The cancel flag was raised between two trials.
    #[error("{stage} cancelled after {completed} completed trials")]
    Cancelled { stage: &'static str, completed: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl EvalError {
    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        EvalError::MalformedRow { line, reason: reason.into() }
    }
}
