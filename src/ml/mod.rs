// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All Burn framework specific code lives here.
//
//   model.rs            - logistic regression as a burn Module
//                         (Linear d→1, sigmoid output,
//                          BCE-with-logits loss + L2)
//
//   trainer.rs          - full-batch optimisation loop with
//                         Adam or SGD, iteration cap, tolerance
//
//   cross_validation.rs - k-fold scoring of one balanced dataset
//
// Backend: NdArray (CPU) wrapped in Autodiff for training.
//
// Reference: Burn Book §3 (Building Blocks), §5 (Training)

/// Logistic regression model architecture
pub mod model;

/// Optimisation loop and classifier hyperparameters
pub mod trainer;

/// K-fold cross-validated accuracy
pub mod cross_validation;
