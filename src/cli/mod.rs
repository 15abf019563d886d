// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap, wires the concrete infrastructure
// (file artifact store, seeded generator, Ctrl-C flag) and hands
// off to the use cases in Layer 2. stdout carries one line: the
// accuracy, or the partition summary for `partition` alone.
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, StageArgs};
use rand::{rngs::StdRng, SeedableRng};
use std::io::Write;
use std::sync::atomic::AtomicBool;

use crate::application::{
    config::EvalConfig,
    evaluate_use_case::{EvaluateUseCase, EvaluationReport},
    partition_use_case::PartitionUseCase,
};
use crate::infra::{
    artifact_store::FsArtifactStore,
    metrics::{write_report, MetricsLogger},
    run_manifest::{ManifestStore, RunManifest},
    shutdown::install_ctrl_c_flag,
};

#[derive(Parser, Debug)]
#[command(
    name = "arrhythmia-eval",
    version,
    about = "Estimate arrhythmia classifier accuracy with class-balanced, repeated k-fold cross-validation."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the selected stage(s).
    pub fn run(self) -> Result<()> {
        let cancel = install_ctrl_c_flag();
        let mut out = std::io::stdout().lock();
        match self.command {
            Commands::Run(args)       => run_stages(&args, true, true, &cancel, &mut out),
            Commands::Partition(args) => run_stages(&args, true, false, &cancel, &mut out),
            Commands::Evaluate(args)  => run_stages(&args, false, true, &cancel, &mut out),
        }
    }
}

/// Runs the requested stages and writes the result line to `out`.
/// `run` and `evaluate` print only the accuracy line.
fn run_stages(
    args:      &StageArgs,
    partition: bool,
    evaluate:  bool,
    cancel:    &AtomicBool,
    out:       &mut impl Write,
) -> Result<()> {
    let config: EvalConfig = (&args.common).into();
    let iterations = args.iterations.get();

    // One generator for the whole process, seeded once
    let seed = config.resolve_seed();
    tracing::info!("Random seed: {} (pass --seed {} to reproduce)", seed, seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let store = FsArtifactStore::new(&config.output_dir)?;

    if partition {
        let summary = PartitionUseCase::new(config.clone())
            .execute(iterations, &store, &mut rng, Some(cancel))?;

        ManifestStore::new(&config.output_dir).save(&RunManifest {
            trials:        summary.trials,
            required_size: summary.required_size,
            seed,
            config:        config.clone(),
        })?;

        let line = format!(
            "Wrote {} balanced datasets ({} records each) to '{}'",
            summary.trials,
            summary.records_per_trial(),
            config.output_dir
        );
        if evaluate {
            tracing::info!("{}", line);
        } else {
            writeln!(out, "{line}")?;
        }
    } else {
        warn_on_manifest_mismatch(&config, iterations);
    }

    if evaluate {
        let report = evaluate_stage(&config, args, &store, &mut rng, cancel)?;
        writeln!(out, "The accuracy of the logistic regression model is {}", report.mean_accuracy)?;
    }
    Ok(())
}

fn evaluate_stage(
    config: &EvalConfig,
    args:   &StageArgs,
    store:  &FsArtifactStore,
    rng:    &mut StdRng,
    cancel: &AtomicBool,
) -> Result<EvaluationReport> {
    let metrics = match &args.common.metrics {
        Some(path) => Some(MetricsLogger::new(path)?),
        None       => None,
    };

    let report = EvaluateUseCase::new(config.clone())
        .execute(args.iterations.get(), store, rng, Some(cancel), metrics.as_ref())?;

    if let Some(path) = &args.common.report {
        write_report(path, &report)?;
    }
    Ok(report)
}

/// Advisory only: an unreadable manifest never stops evaluation.
fn warn_on_manifest_mismatch(config: &EvalConfig, iterations: usize) {
    match ManifestStore::new(&config.output_dir).load() {
        Ok(Some(manifest)) if manifest.trials != iterations => tracing::warn!(
            "'{}' was partitioned with {} trials, evaluating {}",
            config.output_dir,
            manifest.trials,
            iterations
        ),
        Ok(Some(_)) => {}
        Ok(None) => tracing::warn!(
            "No run manifest in '{}'; assuming artifacts are present",
            config.output_dir
        ),
        Err(e) => tracing::warn!("Ignoring unreadable run manifest: {:#}", e),
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn write_input(dir: &Path, normal: usize, arrhythmia: usize) -> String {
        let path = dir.join("input.csv");
        let rows: Vec<String> = (0..normal + arrhythmia)
            .map(|i| {
                let is_arr = i >= normal;
                let centre = if is_arr { 5.0 } else { -5.0 };
                let mut fields = vec![i.to_string()];
                fields.extend((0..9).map(|f| format!("{:.2}", centre + (i * 7 + f) as f64 % 3.0)));
                fields.push(if is_arr { "A" } else { "N" }.to_string());
                fields.join(",")
            })
            .collect();
        fs::write(&path, rows.join("\n")).unwrap();
        path.to_string_lossy().into_owned()
    }

    fn stage_args(command: &str, iterations: &str, input: &str, output_dir: &Path) -> (StageArgs, bool, bool) {
        let output_dir = output_dir.to_string_lossy().into_owned();
        let cli = Cli::try_parse_from([
            "arrhythmia-eval",
            command,
            iterations,
            "--input",
            input,
            "--output-dir",
            output_dir.as_str(),
            "--seed",
            "1",
        ])
        .unwrap();
        match cli.command {
            Commands::Run(args)       => (args, true, true),
            Commands::Partition(args) => (args, true, false),
            Commands::Evaluate(args)  => (args, false, true),
        }
    }

    fn run_to_string(args: &StageArgs, partition: bool, evaluate: bool) -> Result<String> {
        let cancel = AtomicBool::new(false);
        let mut out = Vec::new();
        run_stages(args, partition, evaluate, &cancel, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_run_prints_only_the_accuracy_line() {
        let dir   = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), 30, 20);
        let (args, p, e) = stage_args("run", "2", &input, &dir.path().join("out"));

        let printed = run_to_string(&args, p, e).unwrap();
        let lines: Vec<&str> = printed.lines().collect();
        assert_eq!(lines.len(), 1, "stdout was {printed:?}");
        assert!(lines[0].starts_with("The accuracy of the logistic regression model is "));

        let accuracy: f64 = lines[0].rsplit(' ').next().unwrap().parse().unwrap();
        assert!((0.0..=1.0).contains(&accuracy));
    }

    #[test]
    fn test_partition_prints_summary() {
        let dir   = tempfile::tempdir().unwrap();
        let input = write_input(dir.path(), 30, 20);
        let (args, p, e) = stage_args("partition", "2", &input, &dir.path().join("out"));

        let printed = run_to_string(&args, p, e).unwrap();
        assert_eq!(printed.lines().count(), 1);
        assert!(printed.starts_with("Wrote 2 balanced datasets (40 records each)"));
    }

    #[test]
    fn test_evaluate_ignores_unreadable_manifest() {
        let dir   = tempfile::tempdir().unwrap();
        let out   = dir.path().join("out");
        let input = write_input(dir.path(), 30, 20);

        let (args, p, e) = stage_args("partition", "3", &input, &out);
        run_to_string(&args, p, e).unwrap();
        fs::write(out.join("run_manifest.json"), r#"{"trials": 3}"#).unwrap();

        let (args, p, e) = stage_args("evaluate", "3", &input, &out);
        let printed = run_to_string(&args, p, e).unwrap();
        assert!(printed.starts_with("The accuracy of the logistic regression model is "));
    }

    #[test]
    fn test_evaluate_with_mismatched_manifest_still_runs() {
        let dir   = tempfile::tempdir().unwrap();
        let out   = dir.path().join("out");
        let input = write_input(dir.path(), 30, 20);

        let (args, p, e) = stage_args("partition", "3", &input, &out);
        run_to_string(&args, p, e).unwrap();

        let (args, p, e) = stage_args("evaluate", "2", &input, &out);
        let printed = run_to_string(&args, p, e).unwrap();
        assert_eq!(printed.lines().count(), 1);
    }
}
