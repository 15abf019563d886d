// ============================================================
// Layer 6 — Run Manifest
// ============================================================
// Records how the artifacts in an output directory were made,
// so a later `evaluate` can check it is looking at the right set.
//
//   <output_dir>/
//     finalShuffledDataset_0.csv ...
//     run_manifest.json      ← trials, requiredSize, seed, config
//
// Reference: Rust Book §9 (Error Handling)
//            serde_json crate documentation

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::application::config::EvalConfig;

const MANIFEST_FILE: &str = "run_manifest.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    /// nbrIterations of the partition run
    pub trials:        usize,
    pub required_size: usize,
    /// Seed the shared generator was created with
    pub seed:          u64,
    pub config:        EvalConfig,
}

/// Saves and loads the manifest of one output directory.
pub struct ManifestStore {
    dir: PathBuf,
}

impl ManifestStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self) -> PathBuf {
        self.dir.join(MANIFEST_FILE)
    }

    pub fn save(&self, manifest: &RunManifest) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        let path = self.path();
        let json = serde_json::to_string_pretty(manifest)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write manifest to '{}'", path.display()))?;

        tracing::debug!("Saved run manifest to '{}'", path.display());
        Ok(())
    }

    /// Ok(None) when no manifest has been written yet.
    pub fn load(&self) -> Result<Option<RunManifest>> {
        let path = self.path();
        if !path.is_file() {
            return Ok(None);
        }
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read manifest '{}'", path.display()))?;
        let manifest = serde_json::from_str(&json)
            .with_context(|| format!("Manifest '{}' is not valid JSON", path.display()))?;
        Ok(Some(manifest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_then_load() {
        let dir   = tempfile::tempdir().unwrap();
        let store = ManifestStore::new(dir.path());
        assert!(store.load().unwrap().is_none());

        let manifest = RunManifest {
            trials:        5,
            required_size: 30,
            seed:          1234,
            config:        EvalConfig::default(),
        };
        store.save(&manifest).unwrap();
        assert_eq!(store.load().unwrap(), Some(manifest));
    }
}
