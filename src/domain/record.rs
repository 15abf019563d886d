// ============================================================
// Layer 3 — Record Domain Type
// ============================================================
// A Record is one heartbeat-derived feature row with its class.
// In the persisted artifact form it is written as
//
//   f1,f2,...,fN,label        (label: 0 = normal, 1 = arrhythmia)
//
// Reference: Rust Book §5 (Structs), §6 (Enums)

use serde::{Deserialize, Serialize};

/// The two classes a record can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Label {
    Normal,
    Arrhythmia,
}

impl Label {
    /// Numeric encoding used in persisted artifacts and tensors.
    pub fn code(self) -> u8 {
        match self {
            Label::Normal     => 0,
            Label::Arrhythmia => 1,
        }
    }

    /// Inverse of [`Label::code`]. Anything other than 0/1 is rejected.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Label::Normal),
            1 => Some(Label::Arrhythmia),
            _ => None,
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::Normal     => write!(f, "normal"),
            Label::Arrhythmia => write!(f, "arrhythmia"),
        }
    }
}

/// One labelled feature row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Feature values, in schema order
    pub features: Vec<f64>,

    /// Class of this row
    pub label: Label,
}

impl Record {
    pub fn new(features: Vec<f64>, label: Label) -> Self {
        Self { features, label }
    }

    pub fn n_features(&self) -> usize {
        self.features.len()
    }
}
