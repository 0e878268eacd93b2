//! Linear Kalman recursion for the planar bot.
//!
//! Single-pass predict-then-correct, no smoothing. Per step `k`:
//!
//! ```text
//! xhat = F·x[k-1] + B·u[k] + w[k]
//! Phat = F·P[k-1]·Fᵗ + Q
//! y    = z[k] − Hᵗ·xhat + v[k]
//! S    = Hᵗ·Phat·H + R
//! K    = Phat·H·S⁻¹
//! x[k] = xhat + K·y
//! P[k] = (I − K·Hᵗ)·Phat
//! ```
//!
//! The covariance update is deliberately not the Joseph form: downstream
//! consistency scores are reproducibility-sensitive to the exact update.

use crate::error::{FilterError, FilterResult};
use crate::filters::model::{initial_covariance, NoiseDraws, SystemModel};
use crate::types::linalg::{ControlVec, GainMat, MeasureVec, StateMat, StateVec};

/// One corrected step of the recursion.
#[derive(Clone, Debug)]
pub struct StepOutput {
    pub state: StateVec,
    pub covariance: StateMat,
    pub gain: GainMat,
    pub innovation: MeasureVec,
}

/// Materialized output of a batch run, one entry per step including the
/// initialization step (whose gain and innovation slots are zero).
#[derive(Clone, Debug, Default)]
pub struct FilterRun {
    pub states: Vec<StateVec>,
    pub covariances: Vec<StateMat>,
    pub gains: Vec<GainMat>,
    pub innovations: Vec<MeasureVec>,
}

impl FilterRun {
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// The evolving `(x, P)` pair plus the constant model.
pub struct PlanarKalman {
    model: SystemModel,
    state: StateVec,
    covariance: StateMat,
}

impl PlanarKalman {
    /// Start a run at `x = 0` with the seeded diagonal covariance.
    pub fn new(model: SystemModel, seed: &[f64; 6]) -> FilterResult<Self> {
        let covariance = initial_covariance(seed)?;
        Ok(Self {
            model,
            state: StateVec::zeros(),
            covariance,
        })
    }

    pub fn state(&self) -> &StateVec {
        &self.state
    }

    pub fn covariance(&self) -> &StateMat {
        &self.covariance
    }

    /// Advance from step `k-1` to `k`. The index only labels a singular
    /// innovation covariance in the error.
    pub fn step(
        &mut self,
        step: usize,
        control: &ControlVec,
        measurement: &MeasureVec,
        process_draw: &StateVec,
        measurement_draw: &MeasureVec,
    ) -> FilterResult<StepOutput> {
        let m = &self.model;

        let predicted = m.f * self.state + m.b * control + process_draw;
        let predicted_cov = m.f * self.covariance * m.f.transpose() + m.q;

        let innovation = measurement - m.h.transpose() * predicted + measurement_draw;
        let s = m.h.transpose() * predicted_cov * m.h + m.r;
        let s_inv = s.try_inverse().ok_or(FilterError::SingularMatrix {
            step,
            matrix: "innovation covariance",
        })?;
        let gain = predicted_cov * m.h * s_inv;

        self.state = predicted + gain * innovation;
        self.covariance = (StateMat::identity() - gain * m.h.transpose()) * predicted_cov;
        debug_assert!(
            (self.covariance - self.covariance.transpose()).amax() < 1e-6,
            "covariance lost symmetry at step {step}"
        );

        Ok(StepOutput {
            state: self.state,
            covariance: self.covariance,
            gain,
            innovation,
        })
    }
}

/// Run the full recursion over `N = measurements.len()` steps.
///
/// Sequence lengths are validated before any state is touched; failures
/// after that carry the offending step index.
pub fn run_filter(
    model: &SystemModel,
    seed: &[f64; 6],
    controls: &[ControlVec],
    measurements: &[MeasureVec],
    draws: &NoiseDraws,
) -> FilterResult<FilterRun> {
    let n = measurements.len();
    check_len("controls", n, controls.len())?;
    check_len("process noise draws", n, draws.process.len())?;
    check_len("measurement noise draws", n, draws.measurement.len())?;
    if n == 0 {
        return Ok(FilterRun::default());
    }

    let mut filter = PlanarKalman::new(model.clone(), seed)?;
    let mut run = FilterRun {
        states: Vec::with_capacity(n),
        covariances: Vec::with_capacity(n),
        gains: Vec::with_capacity(n),
        innovations: Vec::with_capacity(n),
    };
    run.states.push(*filter.state());
    run.covariances.push(*filter.covariance());
    run.gains.push(GainMat::zeros());
    run.innovations.push(MeasureVec::zeros());

    for k in 1..n {
        let out = filter.step(
            k,
            &controls[k],
            &measurements[k],
            &draws.process[k],
            &draws.measurement[k],
        )?;
        run.states.push(out.state);
        run.covariances.push(out.covariance);
        run.gains.push(out.gain);
        run.innovations.push(out.innovation);
    }
    log::debug!("filter run complete: {} steps", run.len());
    Ok(run)
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::linalg::{MeasureMat, ObservationMat, ACC_X, ACC_Y, ANG_RATE};
    use approx::assert_abs_diff_eq;

    const DT: f64 = 0.2;
    const SEED: [f64; 6] = [5.0, 0.05, 0.5, 0.5, 0.2, 0.4];

    fn reference_model() -> SystemModel {
        SystemModel::new(DT, 2.0, 100.0).unwrap()
    }

    /// Small synthetic run: slowly varying measurements, constant control.
    fn synthetic_inputs(n: usize) -> (Vec<ControlVec>, Vec<MeasureVec>) {
        let controls = (0..n).map(|k| ControlVec::new(0.1 * k as f64, 0.05)).collect();
        let measurements = (0..n)
            .map(|k| {
                let t = k as f64 * DT;
                MeasureVec::new(0.3 * t.sin(), 0.2 * t.cos(), 0.01 * t)
            })
            .collect();
        (controls, measurements)
    }

    #[test]
    fn initialization_is_zero_state_with_seeded_covariance() {
        let (u, z) = synthetic_inputs(4);
        let run = run_filter(&reference_model(), &SEED, &u, &z, &NoiseDraws::zeroed(4)).unwrap();
        assert_eq!(run.len(), 4);
        assert_eq!(run.states[0], StateVec::zeros());
        assert_eq!(run.covariances[0], initial_covariance(&SEED).unwrap());
        assert_eq!(run.gains[0], GainMat::zeros());
        assert_eq!(run.innovations[0], MeasureVec::zeros());
    }

    #[test]
    fn zero_noise_runs_are_bit_identical() {
        let (u, z) = synthetic_inputs(50);
        let model = reference_model();
        let a = run_filter(&model, &SEED, &u, &z, &NoiseDraws::zeroed(50)).unwrap();
        let b = run_filter(&model, &SEED, &u, &z, &NoiseDraws::zeroed(50)).unwrap();
        assert_eq!(a.states, b.states);
        assert_eq!(a.covariances, b.covariances);
        assert_eq!(a.gains, b.gains);
    }

    #[test]
    fn covariance_stays_symmetric() {
        let (u, z) = synthetic_inputs(100);
        let run = run_filter(&reference_model(), &SEED, &u, &z, &NoiseDraws::zeroed(100)).unwrap();
        for p in &run.covariances {
            assert!((p - p.transpose()).amax() < 1e-9);
        }
    }

    #[test]
    fn huge_measurement_noise_reduces_to_pure_prediction() {
        let (u, z) = synthetic_inputs(10);
        let model = SystemModel::new(DT, 2.0, 1e12).unwrap();
        let run = run_filter(&model, &SEED, &u, &z, &NoiseDraws::zeroed(10)).unwrap();

        // Replay the prediction chain without any correction.
        let mut x = StateVec::zeros();
        for k in 1..10 {
            x = model.f * x + model.b * u[k];
            assert!(run.gains[k].amax() < 1e-9);
            assert_abs_diff_eq!(run.states[k], x, epsilon = 1e-6);
        }
    }

    #[test]
    fn zero_measurement_noise_pins_observed_components() {
        let (u, z) = synthetic_inputs(10);
        let model = SystemModel::new(DT, 2.0, 0.0).unwrap();
        let run = run_filter(&model, &SEED, &u, &z, &NoiseDraws::zeroed(10)).unwrap();
        for k in 1..10 {
            assert_abs_diff_eq!(run.states[k][ACC_X], z[k][0], epsilon = 1e-9);
            assert_abs_diff_eq!(run.states[k][ACC_Y], z[k][1], epsilon = 1e-9);
            assert_abs_diff_eq!(run.states[k][ANG_RATE], z[k][2], epsilon = 1e-9);
        }
    }

    #[test]
    fn degenerate_observation_reports_singular_s_at_first_step() {
        let (u, z) = synthetic_inputs(5);
        let mut model = reference_model();
        model.h = ObservationMat::zeros();
        model.r = MeasureMat::zeros();
        let err = run_filter(&model, &SEED, &u, &z, &NoiseDraws::zeroed(5)).unwrap_err();
        assert_eq!(
            err,
            FilterError::SingularMatrix {
                step: 1,
                matrix: "innovation covariance"
            }
        );
    }

    #[test]
    fn length_mismatches_fail_before_running() {
        let (u, z) = synthetic_inputs(6);
        let model = reference_model();
        let err = run_filter(&model, &SEED, &u[..5], &z, &NoiseDraws::zeroed(6)).unwrap_err();
        assert_eq!(
            err,
            FilterError::ShapeMismatch {
                name: "controls",
                expected: 6,
                actual: 5
            }
        );
        let err = run_filter(&model, &SEED, &u, &z, &NoiseDraws::zeroed(2)).unwrap_err();
        assert!(matches!(err, FilterError::ShapeMismatch { .. }));
    }

    #[test]
    fn bad_seed_is_rejected() {
        let (u, z) = synthetic_inputs(3);
        let err = run_filter(
            &reference_model(),
            &[1.0, 1.0, 1.0, 0.0, 1.0, 1.0],
            &u,
            &z,
            &NoiseDraws::zeroed(3),
        )
        .unwrap_err();
        assert!(matches!(err, FilterError::InvalidParameter(_)));
    }

    #[test]
    fn empty_input_yields_empty_run() {
        let run = run_filter(
            &reference_model(),
            &SEED,
            &[],
            &[],
            &NoiseDraws::zeroed(0),
        )
        .unwrap();
        assert!(run.is_empty());
    }

    #[test]
    fn innovation_uses_the_predicted_state() {
        let (u, z) = synthetic_inputs(3);
        let model = reference_model();
        let run = run_filter(&model, &SEED, &u, &z, &NoiseDraws::zeroed(3)).unwrap();

        let predicted = model.f * run.states[0] + model.b * u[1];
        let expected = z[1] - model.h.transpose() * predicted;
        assert_abs_diff_eq!(run.innovations[1], expected, epsilon = 1e-12);
    }
}
