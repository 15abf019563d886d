// ============================================================
// Layer 6 — Artifact Stores
// ============================================================
// Implementations of the ArtifactStore trait (Layer 3).
//
// FsArtifactStore writes one CSV file per trial:
//
//   <output_dir>/
//     finalShuffledDataset_0.csv
//     finalShuffledDataset_1.csv
//     ...
//
// Row format: f1,...,fN,label   (label 0 = normal, 1 = arrhythmia)
// No header row. Files are written to a temporary name and then
// renamed into place.
//
// MemoryArtifactStore keeps datasets in a HashMap for tests.
//
// Reference: csv crate documentation
//            Rust Book §9 (Error Handling), §16 (Mutex)

use anyhow::{anyhow, Context, Result};
use std::{
    collections::HashMap,
    fs,
    path::PathBuf,
    sync::Mutex,
};

use crate::domain::dataset::BalancedDataset;
use crate::domain::error::EvalError;
use crate::domain::record::{Label, Record};
use crate::domain::traits::ArtifactStore;

// ─── FsArtifactStore ──────────────────────────────────────────────────────────
pub struct FsArtifactStore {
    dir: PathBuf,
}

impl FsArtifactStore {
    /// Create the store, creating `dir` (like `mkdir -p`) if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create output directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    /// File that holds the artifact for `trial`.
    pub fn path_for(&self, trial: usize) -> PathBuf {
        self.dir.join(format!("finalShuffledDataset_{trial}.csv"))
    }
}

impl ArtifactStore for FsArtifactStore {
    fn put(&self, dataset: &BalancedDataset) -> Result<()> {
        let path = self.path_for(dataset.trial);
        let tmp  = path.with_extension("csv.tmp");

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&tmp)
            .with_context(|| format!("Cannot create '{}'", tmp.display()))?;

        for record in &dataset.records {
            let row = record
                .features
                .iter()
                .map(|x| x.to_string())
                .chain(std::iter::once(record.label.code().to_string()));
            writer.write_record(row)?;
        }
        writer.flush()?;
        drop(writer);

        fs::rename(&tmp, &path)
            .with_context(|| format!("Cannot move artifact into '{}'", path.display()))?;

        tracing::debug!("Wrote {} records to '{}'", dataset.len(), path.display());
        Ok(())
    }

    fn get(&self, trial: usize) -> Result<BalancedDataset> {
        let path = self.path_for(trial);
        if !path.is_file() {
            return Err(EvalError::ArtifactMissing { trial }.into());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&path)
            .with_context(|| format!("Cannot open '{}'", path.display()))?;

        let mut records: Vec<Record> = Vec::new();
        for (i, row) in reader.records().enumerate() {
            let line = i + 1;
            let row  = row.map_err(|e| EvalError::malformed(line, e.to_string()))
                .with_context(|| format!("Bad artifact '{}'", path.display()))?;
            let record = parse_artifact_row(&row, line)
                .with_context(|| format!("Bad artifact '{}'", path.display()))?;

            if let Some(first) = records.first() {
                if first.n_features() != record.n_features() {
                    return Err(anyhow::Error::new(EvalError::malformed(
                        line,
                        format!("expected {} features, found {}", first.n_features(), record.n_features()),
                    ))
                    .context(format!("Bad artifact '{}'", path.display())));
                }
            }
            records.push(record);
        }

        tracing::debug!("Read {} records from '{}'", records.len(), path.display());
        Ok(BalancedDataset::new(trial, records))
    }

    fn contains(&self, trial: usize) -> bool {
        self.path_for(trial).is_file()
    }
}

/// `f1,...,fN,label` → Record
fn parse_artifact_row(row: &csv::StringRecord, line: usize) -> Result<Record, EvalError> {
    if row.len() < 2 {
        return Err(EvalError::malformed(line, format!("expected features and a label, found {} fields", row.len())));
    }
    let (feature_fields, label_field) = (row.len() - 1, &row[row.len() - 1]);

    let label = label_field
        .parse::<u8>()
        .ok()
        .and_then(Label::from_code)
        .ok_or_else(|| EvalError::malformed(line, format!("label '{label_field}' is not 0 or 1")))?;

    let features = row
        .iter()
        .take(feature_fields)
        .map(|raw| match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            Ok(_)  => Err(EvalError::malformed(line, format!("'{raw}' is not a finite number"))),
            Err(_) => Err(EvalError::malformed(line, format!("'{raw}' is not numeric"))),
        })
        .collect::<Result<Vec<f64>, EvalError>>()?;

    Ok(Record::new(features, label))
}

// ─── MemoryArtifactStore ──────────────────────────────────────────────────────
/// In-memory store keyed by trial index.
#[derive(Default)]
pub struct MemoryArtifactStore {
    datasets: Mutex<HashMap<usize, BalancedDataset>>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.datasets.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ArtifactStore for MemoryArtifactStore {
    fn put(&self, dataset: &BalancedDataset) -> Result<()> {
        self.datasets
            .lock()
            .map_err(|_| anyhow!("artifact store lock poisoned"))?
            .insert(dataset.trial, dataset.clone());
        Ok(())
    }

    fn get(&self, trial: usize) -> Result<BalancedDataset> {
        self.datasets
            .lock()
            .map_err(|_| anyhow!("artifact store lock poisoned"))?
            .get(&trial)
            .cloned()
            .ok_or_else(|| EvalError::ArtifactMissing { trial }.into())
    }

    fn contains(&self, trial: usize) -> bool {
        self.datasets
            .lock()
            .map(|m| m.contains_key(&trial))
            .unwrap_or(false)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn sample(trial: usize) -> BalancedDataset {
        BalancedDataset::new(trial, vec![
            Record::new(vec![0.25, -3.0, 1e-3], Label::Arrhythmia),
            Record::new(vec![12.5, 4.0, 7.0], Label::Normal),
        ])
    }

    #[test]
    fn test_fs_put_get() {
        let dir   = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path()).unwrap();
        store.put(&sample(3)).unwrap();

        assert!(store.contains(3));
        assert!(!store.contains(0));
        assert_eq!(store.get(3).unwrap(), sample(3));

        let text = fs::read_to_string(store.path_for(3)).unwrap();
        assert_eq!(text.lines().next().unwrap(), "0.25,-3,0.001,1");
    }

    #[test]
    fn test_fs_missing_artifact() {
        let dir   = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path()).unwrap();
        let err   = store.get(9).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EvalError>(),
            Some(EvalError::ArtifactMissing { trial: 9 })
        ));
    }

    #[test]
    fn test_fs_malformed_artifact() {
        let dir   = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path()).unwrap();
        fs::write(store.path_for(0), "1.0,2.0,0\n1.0,oops,1\n").unwrap();
        let err = store.get(0).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<EvalError>(),
            Some(EvalError::MalformedRow { line: 2, .. })
        ));

        fs::write(store.path_for(1), "1.0,2.0,0\n1.0,2.0,7\n").unwrap();
        assert!(store.get(1).is_err());

        fs::write(store.path_for(2), "1.0,2.0,0\nNaN,2.0,0\n").unwrap();
        assert!(matches!(
            store.get(2).unwrap_err().downcast_ref::<EvalError>(),
            Some(EvalError::MalformedRow { line: 2, .. })
        ));

        fs::write(store.path_for(3), "inf,3.0,1\n").unwrap();
        assert!(matches!(
            store.get(3).unwrap_err().downcast_ref::<EvalError>(),
            Some(EvalError::MalformedRow { line: 1, .. })
        ));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryArtifactStore::new();
        assert!(store.is_empty());
        store.put(&sample(0)).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(0).unwrap(), sample(0));
        assert!(store.get(1).is_err());
    }
}
