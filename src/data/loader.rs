// ============================================================
// Layer 4 — Dataset Loader
// ============================================================
// Reads the cleaned, labelled input CSV and splits it into the
// two class pools (Normal / Arrhythmia).
//
// Contract with the upstream data cleaner:
//   - comma-delimited, no header row
//   - label in a fixed column, every feature column numeric
//
// The whole file is parsed before anything else happens, so a
// single bad row aborts the run before any artifact is written.
// No repair is attempted.
//
// Reference: csv crate documentation
//            Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use std::{fs::File, io::Read, path::Path};

use crate::domain::dataset::ClassPools;
use crate::domain::error::EvalError;
use crate::domain::schema::Schema;

/// Loads one labelled dataset file into class pools.
pub struct PoolLoader {
    path:   String,
    schema: Schema,
}

impl PoolLoader {
    pub fn new(path: impl Into<String>, schema: Schema) -> Self {
        Self { path: path.into(), schema }
    }

    /// Parse the file and fail with InsufficientData if either pool is empty.
    pub fn load(&self) -> Result<ClassPools> {
        let path = Path::new(&self.path);
        let file = File::open(path)
            .with_context(|| format!("Cannot open input dataset '{}'", path.display()))?;

        let pools = parse_pools(file, &self.schema)?;
        tracing::info!(
            "Loaded '{}': {} normal, {} arrhythmia records",
            self.path,
            pools.normal_len(),
            pools.arrhythmia_len(),
        );

        // Surfaces InsufficientData here, before any trial runs
        pools.required_size()?;
        Ok(pools)
    }
}

/// Parse comma-separated rows from any reader into pools.
pub fn parse_pools<R: Read>(reader: R, schema: &Schema) -> Result<ClassPools, EvalError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut pools = ClassPools::new();
    for (i, row) in csv_reader.records().enumerate() {
        let row = row.map_err(|e| {
            let line = e.position().map(|p| p.line() as usize).unwrap_or(i + 1);
            EvalError::malformed(line, e.to_string())
        })?;
        let line = row.position().map(|p| p.line() as usize).unwrap_or(i + 1);

        let fields: Vec<&str> = row.iter().collect();
        pools.push(schema.parse_row(&fields, line)?);
    }

    tracing::debug!(
        "Parsed pools: normal={}, arrhythmia={}",
        pools.normal_len(),
        pools.arrhythmia_len()
    );
    Ok(pools)
}
