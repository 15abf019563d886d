// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between the raw labelled CSV and the tensors the
// classifier is trained on:
//
//   Dataset_withFeatures.csv
//       │
//       ▼
//   PoolLoader        → parses rows into Normal / Arrhythmia pools
//       │
//       ▼
//   sampler           → balanced, shuffled dataset per trial
//       │                (persisted through the ArtifactStore)
//       ▼
//   folds             → k train/test index splits per dataset
//       │
//       ▼
//   Standardizer      → z-score scaling fitted on the train part
//       │
//       ▼
//   FeatureBatcher    → full-batch tensors for the model
//
// Reference: Rust Book §13 (Iterators and Closures)

/// Parses the labelled input CSV into class pools
pub mod loader;

/// Class-balanced resampling and artifact materialization
pub mod sampler;

/// K-fold (optionally stratified) train/test index splits
pub mod folds;

/// Per-fold feature standardization
pub mod preprocessor;

/// Records → burn tensors
pub mod batcher;
