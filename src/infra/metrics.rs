// ============================================================
// Layer 6 — Trial Metrics Logger
// ============================================================
// Appends one CSV row per evaluated trial:
//
//   trial,seed,records,mean_accuracy,min_fold,max_fold
//   0,88213401,60,0.850000,0.666667,1.000000
//   1,5120333,60,0.816667,0.500000,1.000000
//
// and can write the whole EvaluationReport as JSON.
//
// Reference: Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use crate::application::evaluate_use_case::EvaluationReport;

/// Metrics for one evaluated trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialMetrics {
    pub trial:         usize,
    pub seed:          u64,
    pub records:       usize,
    pub mean_accuracy: f64,
    pub min_fold:      f64,
    pub max_fold:      f64,
}

/// Appends trial metrics to a CSV file.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Writes the CSV header only if the file does not exist yet,
    /// so several runs can share one log.
    pub fn new(csv_path: impl Into<PathBuf>) -> Result<Self> {
        let csv_path = csv_path.into();
        if let Some(parent) = csv_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)
                .with_context(|| format!("Cannot create metrics file '{}'", csv_path.display()))?;
            writeln!(f, "trial,seed,records,mean_accuracy,min_fold,max_fold")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    pub fn log(&self, m: &TrialMetrics) -> Result<()> {
        let mut f = OpenOptions::new().append(true).open(&self.csv_path)?;
        writeln!(
            f,
            "{},{},{},{:.6},{:.6},{:.6}",
            m.trial, m.seed, m.records, m.mean_accuracy, m.min_fold, m.max_fold,
        )?;
        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}

/// Write the full report as pretty JSON.
pub fn write_report(path: impl AsRef<Path>, report: &EvaluationReport) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)
        .with_context(|| format!("Cannot write report to '{}'", path.display()))?;
    tracing::info!("Report written to '{}'", path.display());
    Ok(())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_written_once() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.csv");
        let m = TrialMetrics {
            trial: 0, seed: 7, records: 60,
            mean_accuracy: 0.85, min_fold: 0.5, max_fold: 1.0,
        };

        MetricsLogger::new(&path).unwrap().log(&m).unwrap();
        MetricsLogger::new(&path).unwrap().log(&m).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "trial,seed,records,mean_accuracy,min_fold,max_fold");
        assert_eq!(lines[1], "0,7,60,0.850000,0.500000,1.000000");
    }
}
