// ============================================================
// Layer 3 — Input Schema Descriptor
// ============================================================
// Describes the layout of the cleaned input dataset:
//   - which column indices hold features (and in what order)
//   - which column holds the class label
//   - which label tokens mean "normal" and which "arrhythmia"
//
// The default matches Dataset_withFeatures.csv:
//   id,f1,f2,f3,f4,f5,f6,f7,f8,f9,...,label
// with features in columns 1..=9 and the label in the last column.
//
// Reference: Rust Book §5 (Structs), §6 (Enums and match)

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::error::EvalError;
use crate::domain::record::{Label, Record};

/// Where the label lives in a raw row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelColumn {
    /// The last field of the row, whatever the row length
    Last,
    /// A fixed zero-based column index
    Index(usize),
}

impl LabelColumn {
    /// Resolve to a concrete index for a row of `row_len` fields.
    pub fn resolve(&self, row_len: usize) -> Option<usize> {
        match *self {
            LabelColumn::Last     => row_len.checked_sub(1),
            LabelColumn::Index(i) => (i < row_len).then_some(i),
        }
    }
}

impl FromStr for LabelColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("last") {
            return Ok(LabelColumn::Last);
        }
        s.parse::<usize>()
            .map(LabelColumn::Index)
            .map_err(|_| format!("expected 'last' or a column index, got '{s}'"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Zero-based feature column indices, in output order
    pub feature_columns: Vec<usize>,

    pub label_column: LabelColumn,

    /// Label tokens that map to Label::Normal
    pub normal_labels: Vec<String>,

    /// Label tokens that map to Label::Arrhythmia
    pub arrhythmia_labels: Vec<String>,
}

impl Default for Schema {
    fn default() -> Self {
        Self {
            feature_columns:   (1..=9).collect(),
            label_column:      LabelColumn::Last,
            normal_labels:     vec!["N".to_string()],
            arrhythmia_labels: vec!["A".to_string()],
        }
    }
}

impl Schema {
    pub fn n_features(&self) -> usize {
        self.feature_columns.len()
    }

    /// Check the descriptor itself before any data is read.
    pub fn validate(&self) -> Result<(), EvalError> {
        if self.feature_columns.is_empty() {
            return Err(EvalError::InvalidConfig("schema has no feature columns".into()));
        }
        if self.normal_labels.is_empty() || self.arrhythmia_labels.is_empty() {
            return Err(EvalError::InvalidConfig(
                "both classes need at least one label token".into(),
            ));
        }
        if let Some(token) = self.normal_labels.iter().find(|t| self.arrhythmia_labels.contains(t)) {
            return Err(EvalError::InvalidConfig(format!(
                "label token '{token}' is assigned to both classes"
            )));
        }
        if let LabelColumn::Index(i) = self.label_column {
            if self.feature_columns.contains(&i) {
                return Err(EvalError::InvalidConfig(format!(
                    "column {i} is both a feature and the label"
                )));
            }
        }
        Ok(())
    }

    /// Map a raw label token to its class.
    pub fn classify(&self, token: &str) -> Option<Label> {
        let token = token.trim();
        if self.normal_labels.iter().any(|t| t == token) {
            Some(Label::Normal)
        } else if self.arrhythmia_labels.iter().any(|t| t == token) {
            Some(Label::Arrhythmia)
        } else {
            None
        }
    }

    /// Turn one raw row into a Record. `line` is 1-based and only used
    /// for diagnostics.
    pub fn parse_row(&self, fields: &[&str], line: usize) -> Result<Record, EvalError> {
        let label_idx = self.label_column.resolve(fields.len()).ok_or_else(|| {
            EvalError::malformed(line, format!("row has {} fields, no label column", fields.len()))
        })?;

        let label = self.classify(fields[label_idx]).ok_or_else(|| {
            EvalError::malformed(line, format!("unrecognised label '{}'", fields[label_idx].trim()))
        })?;

        let features = self
            .feature_columns
            .iter()
            .map(|&col| {
                let raw = fields.get(col).ok_or_else(|| {
                    EvalError::malformed(
                        line,
                        format!("row has {} fields, feature column {col} is out of range", fields.len()),
                    )
                })?;
                let value = raw.trim().parse::<f64>().map_err(|_| {
                    EvalError::malformed(line, format!("column {col}: '{}' is not numeric", raw.trim()))
                })?;
                if !value.is_finite() {
                    return Err(EvalError::malformed(line, format!("column {col}: non-finite value")));
                }
                Ok(value)
            })
            .collect::<Result<Vec<f64>, EvalError>>()?;

        Ok(Record::new(features, label))
    }
}
