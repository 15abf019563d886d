// ============================================================
// Layer 2 — EvaluateUseCase
// ============================================================
// Orchestrates the second stage over artifacts that already exist:
//
//   check every trial artifact is present
//   for each trial i in 0..nbrIterations:
//     Load → draw seed → cross-validate (k folds) → accumulate
//   aggregate = Σ trial accuracy / nbrIterations
//
// Any failed trial aborts the whole evaluation; no partial
// aggregate is returned.

use anyhow::{Context, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::application::config::EvalConfig;
use crate::domain::error::EvalError;
use crate::domain::traits::ArtifactStore;
use crate::infra::metrics::{MetricsLogger, TrialMetrics};
use crate::ml::cross_validation::{cross_val_accuracy, CrossValScore};

/// Outcome of one trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialResult {
    pub trial:   usize,
    /// Seed the trial's classifier was initialised with
    pub seed:    u64,
    pub records: usize,
    pub score:   CrossValScore,
}

/// Aggregate over all trials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub trials:        Vec<TrialResult>,
    /// Mean of the per-trial mean accuracies
    pub mean_accuracy: f64,
    /// Population standard deviation of the per-trial accuracies
    pub std_dev:       f64,
}

impl EvaluationReport {
    pub fn from_trials(trials: Vec<TrialResult>) -> Self {
        let n = trials.len().max(1) as f64;
        let mean_accuracy = trials.iter().map(|t| t.score.mean).sum::<f64>() / n;
        let variance = trials
            .iter()
            .map(|t| (t.score.mean - mean_accuracy).powi(2))
            .sum::<f64>()
            / n;
        Self { trials, mean_accuracy, std_dev: variance.sqrt() }
    }
}

pub struct EvaluateUseCase {
    config: EvalConfig,
}

impl EvaluateUseCase {
    pub fn new(config: EvalConfig) -> Self {
        Self { config }
    }

    pub fn execute<S, R>(
        &self,
        n_iterations: usize,
        store:        &S,
        rng:          &mut R,
        cancel:       Option<&AtomicBool>,
        metrics:      Option<&MetricsLogger>,
    ) -> Result<EvaluationReport>
    where
        S: ArtifactStore + ?Sized,
        R: Rng + ?Sized,
    {
        let cfg = &self.config;
        cfg.validate()?;
        if n_iterations == 0 {
            return Err(EvalError::InvalidConfig("nbrIterations must be at least 1".into()).into());
        }

        // Fail before any training if a trial has nothing to load
        if let Some(trial) = (0..n_iterations).find(|&t| !store.contains(t)) {
            return Err(EvalError::ArtifactMissing { trial }.into());
        }

        let mut trials = Vec::with_capacity(n_iterations);
        for trial in 0..n_iterations {
            if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                return Err(EvalError::Cancelled { stage: "evaluation", completed: trial }.into());
            }

            let dataset = store
                .get(trial)
                .with_context(|| format!("Trial {trial}: cannot load balanced dataset"))?;

            // Fresh classifier per trial, seeded from the shared generator
            let seed: u64 = rng.gen();
            let score = cross_val_accuracy(&dataset, &cfg.cv, &cfg.classifier, seed)
                .with_context(|| format!("Trial {trial}: cross-validation failed"))?;

            tracing::info!(
                "Trial {:>3}/{} | records={} | seed={} | accuracy={:.4}",
                trial + 1, n_iterations, dataset.len(), seed, score.mean,
            );

            if let Some(logger) = metrics {
                logger.log(&TrialMetrics {
                    trial,
                    seed,
                    records:       dataset.len(),
                    mean_accuracy: score.mean,
                    min_fold:      score.min(),
                    max_fold:      score.max(),
                })?;
            }

            trials.push(TrialResult { trial, seed, records: dataset.len(), score });
        }

        let report = EvaluationReport::from_trials(trials);
        tracing::info!(
            "Evaluation complete: mean accuracy {:.4} (std {:.4}) over {} trials",
            report.mean_accuracy,
            report.std_dev,
            n_iterations
        );
        Ok(report)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::partition_use_case::PartitionUseCase;
    use crate::domain::dataset::BalancedDataset;
    use crate::domain::record::{Label, Record};
    use crate::infra::artifact_store::{FsArtifactStore, MemoryArtifactStore};
    use rand::{rngs::StdRng, SeedableRng};
    use std::io::Write;

    /// Feature 1 separates the classes; the rest is noise.
    fn write_input(normal: usize, arrhythmia: usize) -> tempfile::NamedTempFile {
        let mut rng  = StdRng::seed_from_u64(0);
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for i in 0..normal + arrhythmia {
            let is_arr = i >= normal;
            let centre: f64 = if is_arr { 120.0 } else { 70.0 };
            let signal = centre + rng.gen_range(-10.0..10.0);
            let mut fields = vec![i.to_string(), format!("{signal:.3}")];
            fields.extend((0..8).map(|_| format!("{:.3}", rng.gen_range(0.0..1.0))));
            fields.push(if is_arr { "A" } else { "N" }.to_string());
            writeln!(file, "{}", fields.join(",")).unwrap();
        }
        file
    }

    fn config(input: &tempfile::NamedTempFile, out: &std::path::Path) -> EvalConfig {
        EvalConfig {
            input_path: input.path().to_string_lossy().into_owned(),
            output_dir: out.to_string_lossy().into_owned(),
            ..EvalConfig::default()
        }
    }

    #[test]
    fn test_end_to_end_on_disk() {
        let input = write_input(100, 30);
        let out   = tempfile::tempdir().unwrap();
        let cfg   = config(&input, out.path());
        let store = FsArtifactStore::new(out.path()).unwrap();
        let mut rng = StdRng::seed_from_u64(2024);

        let summary = PartitionUseCase::new(cfg.clone()).execute(5, &store, &mut rng, None).unwrap();
        assert_eq!(summary.records_per_trial(), 60);
        for trial in 0..5 {
            assert!(store.path_for(trial).is_file());
        }
        assert!(!store.path_for(5).exists());

        let report = EvaluateUseCase::new(cfg)
            .execute(5, &store, &mut rng, None, None)
            .unwrap();
        assert_eq!(report.trials.len(), 5);
        assert!((0.0..=1.0).contains(&report.mean_accuracy));
        assert!(report.mean_accuracy > 0.9, "accuracy {}", report.mean_accuracy);
        assert!(report.trials.iter().all(|t| t.records == 60));
    }

    #[test]
    fn test_single_trial_aggregate_equals_trial_score() {
        let input = write_input(40, 20);
        let out   = tempfile::tempdir().unwrap();
        let cfg   = config(&input, out.path());
        let store = MemoryArtifactStore::new();
        let mut rng = StdRng::seed_from_u64(5);

        PartitionUseCase::new(cfg.clone()).execute(1, &store, &mut rng, None).unwrap();
        let report = EvaluateUseCase::new(cfg).execute(1, &store, &mut rng, None, None).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(report.trials.len(), 1);
        assert_eq!(report.mean_accuracy, report.trials[0].score.mean);
        assert_eq!(report.std_dev, 0.0);
    }

    #[test]
    fn test_one_record_pool_surfaces_degenerate_fold() {
        let input = write_input(10, 1);
        let out   = tempfile::tempdir().unwrap();
        let cfg   = config(&input, out.path());
        let store = MemoryArtifactStore::new();
        let mut rng = StdRng::seed_from_u64(5);

        PartitionUseCase::new(cfg.clone()).execute(3, &store, &mut rng, None).unwrap();
        assert!((0..3).all(|t| store.get(t).unwrap().len() == 2));

        let err = EvaluateUseCase::new(cfg).execute(3, &store, &mut rng, None, None).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EvalError>(),
            Some(EvalError::DegenerateFold { trial: 0, .. })
        ));
    }

    #[test]
    fn test_missing_artifact_aborts() {
        let store = MemoryArtifactStore::new();
        let records = (0..20)
            .map(|i| Record::new(vec![i as f64], if i % 2 == 0 { Label::Normal } else { Label::Arrhythmia }))
            .collect();
        store.put(&BalancedDataset::new(0, records)).unwrap();

        let err = EvaluateUseCase::new(EvalConfig::default())
            .execute(2, &store, &mut StdRng::seed_from_u64(0), None, None)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EvalError>(),
            Some(EvalError::ArtifactMissing { trial: 1 })
        ));
    }

    #[test]
    fn test_cancel_flag_reports_no_aggregate() {
        let input = write_input(30, 30);
        let out   = tempfile::tempdir().unwrap();
        let cfg   = config(&input, out.path());
        let store = MemoryArtifactStore::new();
        let mut rng = StdRng::seed_from_u64(5);
        PartitionUseCase::new(cfg.clone()).execute(2, &store, &mut rng, None).unwrap();

        let flag = AtomicBool::new(true);
        let err = EvaluateUseCase::new(cfg)
            .execute(2, &store, &mut rng, Some(&flag), None)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EvalError>(),
            Some(EvalError::Cancelled { stage: "evaluation", completed: 0 })
        ));
    }

    #[test]
    fn test_metrics_rows_logged_per_trial() {
        let input = write_input(30, 30);
        let out   = tempfile::tempdir().unwrap();
        let cfg   = config(&input, out.path());
        let store = MemoryArtifactStore::new();
        let mut rng = StdRng::seed_from_u64(8);
        PartitionUseCase::new(cfg.clone()).execute(2, &store, &mut rng, None).unwrap();

        let logger = MetricsLogger::new(out.path().join("metrics.csv")).unwrap();
        EvaluateUseCase::new(cfg)
            .execute(2, &store, &mut rng, None, Some(&logger))
            .unwrap();

        let text = std::fs::read_to_string(logger.csv_path()).unwrap();
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn test_report_statistics() {
        let trial = |i: usize, acc: f64| TrialResult {
            trial: i, seed: 0, records: 10,
            score: CrossValScore::from_folds(vec![acc]),
        };
        let report = EvaluationReport::from_trials(vec![trial(0, 0.6), trial(1, 0.8)]);
        assert!((report.mean_accuracy - 0.7).abs() < 1e-12);
        assert!((report.std_dev - 0.1).abs() < 1e-12);
    }
}
