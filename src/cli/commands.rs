// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Three subcommands, each taking nbrIterations as its single
// positional argument:
//
//   run <N>        partition, then evaluate (one shared generator)
//   partition <N>  only write the N balanced datasets
//   evaluate <N>   only evaluate datasets already on disk
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use std::num::NonZeroUsize;

use crate::application::config::EvalConfig;
use crate::domain::schema::{LabelColumn, Schema};
use crate::ml::cross_validation::CrossValidationConfig;
use crate::ml::trainer::{ClassifierConfig, Solver};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resample balanced datasets, then report cross-validated accuracy
    Run(StageArgs),

    /// Only materialize the balanced per-trial datasets
    Partition(StageArgs),

    /// Only evaluate previously materialized datasets
    Evaluate(StageArgs),
}

#[derive(Args, Debug)]
pub struct StageArgs {
    /// Number of resampling trials (nbrIterations)
    pub iterations: NonZeroUsize,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Flags shared by every subcommand.
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Cleaned, labelled input dataset (comma-separated, no header)
    #[arg(long, default_value = "datasets/Dataset_withFeatures.csv")]
    pub input: String,

    /// Directory for the per-trial datasets and the run manifest
    #[arg(long, default_value = "datasets")]
    pub output_dir: String,

    /// Seed for the shared random generator (random if omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Zero-based input columns used as features, in order
    #[arg(long, value_delimiter = ',', default_values_t = vec![1usize, 2, 3, 4, 5, 6, 7, 8, 9])]
    pub feature_columns: Vec<usize>,

    /// Label column: `last` or a zero-based index
    #[arg(long, default_value = "last")]
    pub label_column: LabelColumn,

    /// Label token(s) meaning "normal"
    #[arg(long = "normal-label", default_values_t = vec!["N".to_string()])]
    pub normal_labels: Vec<String>,

    /// Label token(s) meaning "arrhythmia"
    #[arg(long = "arrhythmia-label", default_values_t = vec!["A".to_string()])]
    pub arrhythmia_labels: Vec<String>,

    /// Number of cross-validation folds
    #[arg(long, default_value_t = 10)]
    pub folds: usize,

    /// Use contiguous folds instead of class-stratified ones
    #[arg(long)]
    pub no_stratify: bool,

    /// Feed raw feature values to the classifier (no z-scoring)
    #[arg(long)]
    pub no_standardize: bool,

    /// Inverse regularisation strength
    #[arg(long = "c", default_value_t = 1.0)]
    pub c: f64,

    /// Iteration cap per fit
    #[arg(long, default_value_t = 100)]
    pub max_iter: usize,

    /// Optimisation method: adam or sgd
    #[arg(long, default_value = "adam")]
    pub solver: Solver,

    #[arg(long, default_value_t = 0.1)]
    pub learning_rate: f64,

    /// Stop a fit once the loss improves by less than this
    #[arg(long, default_value_t = 1e-4)]
    pub tol: f64,

    /// Append per-trial metrics to this CSV file
    #[arg(long)]
    pub metrics: Option<String>,

    /// Write the full evaluation report as JSON to this file
    #[arg(long)]
    pub report: Option<String>,
}

/// The boundary between Layer 1 and Layer 2: the application
/// layer never sees clap types.
impl From<&CommonArgs> for EvalConfig {
    fn from(a: &CommonArgs) -> Self {
        EvalConfig {
            input_path: a.input.clone(),
            output_dir: a.output_dir.clone(),
            schema: Schema {
                feature_columns:   a.feature_columns.clone(),
                label_column:      a.label_column,
                normal_labels:     a.normal_labels.clone(),
                arrhythmia_labels: a.arrhythmia_labels.clone(),
            },
            cv: CrossValidationConfig {
                folds:       a.folds,
                stratified:  !a.no_stratify,
                standardize: !a.no_standardize,
            },
            classifier: ClassifierConfig {
                c:             a.c,
                max_iter:      a.max_iter,
                solver:        a.solver,
                learning_rate: a.learning_rate,
                tol:           a.tol,
            },
            seed: a.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::Cli;
    use super::*;
    use clap::Parser;

    #[test]
    fn test_defaults_match_config_defaults() {
        let cli = Cli::try_parse_from(["arrhythmia-eval", "run", "5"]).unwrap();
        let Commands::Run(args) = cli.command else { panic!("expected run") };
        assert_eq!(args.iterations.get(), 5);

        let cfg = EvalConfig::from(&args.common);
        assert_eq!(cfg, EvalConfig::default());
    }

    #[test]
    fn test_zero_iterations_rejected() {
        assert!(Cli::try_parse_from(["arrhythmia-eval", "run", "0"]).is_err());
        assert!(Cli::try_parse_from(["arrhythmia-eval", "evaluate"]).is_err());
    }

    #[test]
    fn test_schema_flags() {
        let cli = Cli::try_parse_from([
            "arrhythmia-eval", "partition", "3",
            "--feature-columns", "0,2,4",
            "--label-column", "5",
            "--arrhythmia-label", "V",
            "--arrhythmia-label", "A",
            "--solver", "sgd",
            "--no-stratify",
        ])
        .unwrap();
        let Commands::Partition(args) = cli.command else { panic!("expected partition") };
        let cfg = EvalConfig::from(&args.common);

        assert_eq!(cfg.schema.feature_columns, vec![0, 2, 4]);
        assert_eq!(cfg.schema.label_column, LabelColumn::Index(5));
        assert_eq!(cfg.schema.arrhythmia_labels, vec!["V", "A"]);
        assert_eq!(cfg.classifier.solver, Solver::Sgd);
        assert!(!cfg.cv.stratified);
    }
}
