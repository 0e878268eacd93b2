//! Synthetic sensor source: noisy accelerometer and rate-gyro measurements
//! plus the control channel forwarded from ground truth.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::error::{FilterError, FilterResult};
use crate::trajectory::GroundTruth;
use crate::types::linalg::{ControlVec, MeasureVec};

/// Noise parameters for the simulated sensors.
#[derive(Clone, Debug)]
pub struct SensorConfig {
    /// Per-axis accelerometer noise, standard deviation.
    pub accel_noise_std: f64,
    /// Rate-gyro noise, standard deviation.
    pub rate_noise_std: f64,
    /// The gyro drift offset is drawn once per run from this distribution
    /// and applied to every sample.
    pub rate_drift_mean: f64,
    pub rate_drift_std: f64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            accel_noise_std: 0.05,
            rate_noise_std: 0.05,
            rate_drift_mean: 5e-2,
            rate_drift_std: 1e-3,
        }
    }
}

/// Simulate the measurement sequence: true acceleration and angular rate
/// with additive Gaussian noise, plus a constant drift on the rate channel.
pub fn measurement_sequence<R: Rng + ?Sized>(
    truth: &GroundTruth,
    config: &SensorConfig,
    rng: &mut R,
) -> FilterResult<Vec<MeasureVec>> {
    let accel_noise = normal(0.0, config.accel_noise_std)?;
    let rate_noise = normal(0.0, config.rate_noise_std)?;
    let drift = normal(config.rate_drift_mean, config.rate_drift_std)?.sample(rng);

    Ok((0..truth.len())
        .map(|k| {
            MeasureVec::new(
                truth.acceleration[[k, 0]] + accel_noise.sample(rng),
                truth.acceleration[[k, 1]] + accel_noise.sample(rng),
                truth.angular_rate[k] + rate_noise.sample(rng) + drift,
            )
        })
        .collect())
}

/// The control channel forwards the ground-truth planar velocity unchanged.
pub fn control_sequence(truth: &GroundTruth) -> Vec<ControlVec> {
    (0..truth.len())
        .map(|k| ControlVec::new(truth.velocity[[k, 0]], truth.velocity[[k, 1]]))
        .collect()
}

fn normal(mean: f64, std: f64) -> FilterResult<Normal<f64>> {
    Normal::new(mean, std)
        .map_err(|e| FilterError::InvalidParameter(format!("bad noise parameter: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trajectory;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn sequences_match_truth_length() {
        let truth = trajectory::generate(0.2).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let z = measurement_sequence(&truth, &SensorConfig::default(), &mut rng).unwrap();
        let u = control_sequence(&truth);
        assert_eq!(z.len(), truth.len());
        assert_eq!(u.len(), truth.len());
    }

    #[test]
    fn same_seed_reproduces_measurements() {
        let truth = trajectory::generate(0.2).unwrap();
        let config = SensorConfig::default();
        let a = measurement_sequence(&truth, &config, &mut StdRng::seed_from_u64(7)).unwrap();
        let b = measurement_sequence(&truth, &config, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn noiseless_rate_offset_is_the_constant_drift() {
        let truth = trajectory::generate(0.2).unwrap();
        let config = SensorConfig {
            accel_noise_std: 0.0,
            rate_noise_std: 0.0,
            ..SensorConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        let z = measurement_sequence(&truth, &config, &mut rng).unwrap();

        let offset = z[0][2] - truth.angular_rate[0];
        assert!(offset > 0.0);
        for (k, m) in z.iter().enumerate() {
            assert_abs_diff_eq!(m[2] - truth.angular_rate[k], offset, epsilon = 1e-12);
            assert_abs_diff_eq!(m[0], truth.acceleration[[k, 0]], epsilon = 1e-12);
            assert_abs_diff_eq!(m[1], truth.acceleration[[k, 1]], epsilon = 1e-12);
        }
    }

    #[test]
    fn control_forwards_truth_velocity() {
        let truth = trajectory::generate(0.2).unwrap();
        let u = control_sequence(&truth);
        for (k, c) in u.iter().enumerate() {
            assert_eq!(c[0], truth.velocity[[k, 0]]);
            assert_eq!(c[1], truth.velocity[[k, 1]]);
        }
    }

    #[test]
    fn rejects_negative_noise_std() {
        let truth = trajectory::generate(0.2).unwrap();
        let config = SensorConfig {
            accel_noise_std: -1.0,
            ..SensorConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            measurement_sequence(&truth, &config, &mut rng),
            Err(FilterError::InvalidParameter(_))
        ));
    }
}
