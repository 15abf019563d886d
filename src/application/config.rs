// ============================================================
// Layer 2 — Run Configuration
// ============================================================
// Everything a partition or evaluation run needs to know.
// Built from CLI flags (Layer 1) and saved inside the run
// manifest (Layer 6), hence Serialize/Deserialize.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::error::EvalError;
use crate::domain::schema::Schema;
use crate::ml::cross_validation::CrossValidationConfig;
use crate::ml::trainer::ClassifierConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalConfig {
    /// Cleaned, labelled input dataset
    pub input_path: String,
    /// Where per-trial artifacts (and the manifest) are written
    pub output_dir: String,
    pub schema:     Schema,
    pub cv:         CrossValidationConfig,
    pub classifier: ClassifierConfig,
    /// Seed of the shared generator; drawn at random when None
    pub seed:       Option<u64>,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            input_path: "datasets/Dataset_withFeatures.csv".to_string(),
            output_dir: "datasets".to_string(),
            schema:     Schema::default(),
            cv:         CrossValidationConfig::default(),
            classifier: ClassifierConfig::default(),
            seed:       None,
        }
    }
}

impl EvalConfig {
    pub fn validate(&self) -> Result<(), EvalError> {
        self.schema.validate()?;
        self.classifier.validate().map_err(EvalError::InvalidConfig)?;
        if self.cv.folds < 2 {
            return Err(EvalError::InvalidConfig(format!(
                "cross-validation needs at least 2 folds, got {}",
                self.cv.folds
            )));
        }
        Ok(())
    }

    /// The configured seed, or a fresh random one.
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| rand::thread_rng().gen())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let cfg = EvalConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.cv.folds, 10);
        assert_eq!(cfg.classifier.max_iter, 100);
    }

    #[test]
    fn test_fixed_seed_is_kept() {
        let cfg = EvalConfig { seed: Some(99), ..EvalConfig::default() };
        assert_eq!(cfg.resolve_seed(), 99);
    }

    #[test]
    fn test_one_fold_rejected() {
        let mut cfg = EvalConfig::default();
        cfg.cv.folds = 1;
        assert!(matches!(cfg.validate(), Err(EvalError::InvalidConfig(_))));
    }
}
