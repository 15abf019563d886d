// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Pure Rust structs, enums and traits that define what the
// system works with:
//
//   record.rs  - one labelled ECG feature row (Normal / Arrhythmia)
//   dataset.rs - the two class pools and a trial's balanced dataset
//   schema.rs  - which input columns are features, which is the label
//   error.rs   - the typed failure taxonomy of a run
//   traits.rs  - the ArtifactStore abstraction (put/get by trial)
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits
//
// Reference: Rust Book §5 (Structs), §6 (Enums), §10 (Traits)

/// A labelled feature row and its class
pub mod record;

/// Class pools and balanced per-trial datasets
pub mod dataset;

/// Explicit column layout of the raw input dataset
pub mod schema;

/// Error taxonomy shared by every layer
pub mod error;

/// Core abstractions (traits) that other layers implement
pub mod traits;
