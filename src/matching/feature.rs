//! Feature vector value object
//!
//! A face is represented as a fixed-length vector of floats (e.g. 10,000
//! values for a 100×100 normalized grayscale patch). The vector is immutable
//! once produced and serializes as an ordered JSON float array; that format
//! crosses the storage boundary and must round-trip exactly.

use serde::{Deserialize, Serialize};

use crate::utils::{AppError, AppResult};

/// Immutable fixed-length face feature vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Parse the persisted form. Failure means the stored row is corrupt,
    /// not that the caller passed bad input.
    pub fn from_json_str(raw: &str) -> AppResult<Self> {
        serde_json::from_str(raw)
            .map_err(|e| AppError::corrupt_data(format!("Unparseable feature vector: {e}")))
    }

    /// Persisted form (ordered float array).
    pub fn to_json_string(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_else(|_| "[]".to_string())
    }
}

impl From<Vec<f64>> for FeatureVector {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}
