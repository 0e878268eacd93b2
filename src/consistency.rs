//! Normalized Estimation Error Squared: per-step filter consistency against
//! ground truth.

use crate::error::{FilterError, FilterResult};
use crate::types::linalg::{StateMat, StateVec};

/// `nees[k] = eᵗ·P[k]⁻¹·e` with `e = xtrue[k] − x[k]`.
///
/// Every covariance in range must be invertible; a singular one aborts with
/// its step index.
pub fn nees_sequence(
    truth: &[StateVec],
    estimates: &[StateVec],
    covariances: &[StateMat],
) -> FilterResult<Vec<f64>> {
    check_len("estimates", truth.len(), estimates.len())?;
    check_len("covariances", truth.len(), covariances.len())?;

    truth
        .iter()
        .zip(estimates)
        .zip(covariances)
        .enumerate()
        .map(|(step, ((xtrue, x), p))| {
            let p_inv = p.try_inverse().ok_or(FilterError::SingularMatrix {
                step,
                matrix: "state covariance",
            })?;
            let e = xtrue - x;
            Ok(e.dot(&(p_inv * e)))
        })
        .collect()
}

/// Averaged consistency score for the whole run.
pub fn mean_nees(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().sum::<f64>() / scores.len() as f64
}

fn check_len(name: &'static str, expected: usize, actual: usize) -> FilterResult<()> {
    if expected != actual {
        return Err(FilterError::ShapeMismatch {
            name,
            expected,
            actual,
        });
    }
    Ok(())
}
