//! Face Matcher
//!
//! Correlation-based nearest-neighbor matching under a similarity tolerance.
//! Pure computation over its inputs, no storage access and no side effects.

use tracing::{debug, warn};

use super::FeatureVector;
use crate::utils::{AppError, AppResult};

/// 人脸匹配器
///
/// `tolerance` is on the similarity scale (0–1, higher = stricter); the
/// returned score is a *distance* (lower = better match). A candidate
/// matches when `similarity >= tolerance`, i.e. `distance <= 1 − tolerance`.
#[derive(Debug, Clone, Copy)]
pub struct FaceMatcher {
    tolerance: f64,
}

impl FaceMatcher {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// Compare two vectors; returns `(is_match, distance)`.
    ///
    /// `similarity = (pearson(known, unknown) + 1) / 2`, NaN correlation
    /// (constant or empty vectors) counts as similarity 0. Mismatched
    /// lengths are a caller error and fail loudly.
    pub fn compare(&self, known: &FeatureVector, unknown: &FeatureVector) -> AppResult<(bool, f64)> {
        if known.len() != unknown.len() {
            return Err(AppError::invalid_input(format!(
                "Feature vector length mismatch: {} vs {}",
                known.len(),
                unknown.len()
            )));
        }

        let correlation = pearson(known.as_slice(), unknown.as_slice());
        let similarity = if correlation.is_nan() {
            0.0
        } else {
            (correlation + 1.0) / 2.0
        };

        let is_match = similarity >= self.tolerance;
        Ok((is_match, 1.0 - similarity))
    }

    /// Find the best match among known vectors.
    ///
    /// Scans in input order; keeps the minimum-distance candidate within
    /// tolerance, first-seen wins exact ties. A single bad record (length
    /// mismatch) is skipped, never aborts the scan. Returns `None` when
    /// `known` is empty or nothing is within tolerance.
    pub fn find_best_match(
        &self,
        unknown: &FeatureVector,
        known: &[(i64, FeatureVector)],
    ) -> Option<(i64, f64)> {
        if known.is_empty() {
            debug!("No known faces to compare against");
            return None;
        }

        let mut best: Option<(i64, f64)> = None;

        for (employee_id, features) in known {
            let (is_match, distance) = match self.compare(features, unknown) {
                Ok(result) => result,
                Err(e) => {
                    warn!(employee_id, error = %e, "Skipping unusable face encoding");
                    continue;
                }
            };

            debug!(employee_id, distance, is_match, "Compared face candidate");

            if is_match && best.map_or(true, |(_, d)| distance < d) {
                best = Some((*employee_id, distance));
            }
        }

        best
    }
}

/// Pearson correlation coefficient; NaN when either side has zero variance.
fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len() as f64;
    if n == 0.0 {
        return f64::NAN;
    }

    let mean_a = a.iter().sum::<f64>() / n;
    let mean_b = b.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        let dx = x - mean_a;
        let dy = y - mean_b;
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    cov / (var_a.sqrt() * var_b.sqrt())
}
