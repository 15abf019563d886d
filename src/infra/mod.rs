// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns that don't belong to one layer:
//
//   artifact_store.rs - per-trial dataset files (and an
//                       in-memory store for tests)
//
//   run_manifest.rs   - run_manifest.json next to the artifacts
//
//   metrics.rs        - per-trial CSV log and JSON report
//
//   shutdown.rs       - Ctrl-C → cooperative cancel flag
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// ArtifactStore implementations
pub mod artifact_store;

/// Run manifest saving and loading
pub mod run_manifest;

/// Trial metrics CSV logger and report writer
pub mod metrics;

/// Ctrl-C listener
pub mod shutdown;
