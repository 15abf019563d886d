// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Workflow coordination only: no ML math, no printing, no file
// formats. The two stages run one after the other:
//
//   PartitionUseCase → artifacts in the ArtifactStore
//   EvaluateUseCase  → reads them back, returns the aggregate
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

/// Run configuration shared by both stages
pub mod config;

/// Stage 1: class-balanced resampling
pub mod partition_use_case;

/// Stage 2: repeated k-fold evaluation
pub mod evaluate_use_case;
