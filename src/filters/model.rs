//! Fixed system matrices for the planar bot model, built once per run.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::error::{FilterError, FilterResult};
use crate::types::linalg::{
    ControlMat, MeasureMat, MeasureVec, ObservationMat, StateMat, StateVec, ACC_X, ACC_Y, ANG_ACC,
    ANG_RATE, HEADING, POS_X, POS_Y, VEL_X, VEL_Y,
};

/// Base measurement variances before scaling: accelerometer x/y, rate gyro.
const BASE_MEASURE_VAR: [f64; 3] = [9e-1, 9e-1, 2e-3];

/// The five constant matrices driving the recursion.
#[derive(Clone, Debug)]
pub struct SystemModel {
    pub dt: f64,
    /// State transition.
    pub f: StateMat,
    /// Control input map.
    pub b: ControlMat,
    /// Observation selector, applied transposed.
    pub h: ObservationMat,
    /// Process noise, scaled by `phi_s`.
    pub q: StateMat,
    /// Measurement noise.
    pub r: MeasureMat,
}

impl SystemModel {
    /// Build the model for time step `dt`, diffusion scale `phi_s`, and
    /// measurement-noise scale. Only `dt` has a domain restriction.
    pub fn new(dt: f64, phi_s: f64, measure_noise_scale: f64) -> FilterResult<Self> {
        if dt <= 0.0 {
            return Err(FilterError::InvalidParameter(format!(
                "time step must be positive, got {dt}"
            )));
        }
        Ok(Self {
            dt,
            f: build_transition(dt),
            b: build_control(dt),
            h: build_observation(),
            q: build_process_noise(dt, phi_s),
            r: build_measurement_noise(measure_noise_scale),
        })
    }
}

/// Constant-acceleration kinematics per planar axis plus the heading chain.
/// The planar velocity rows have no self term: velocity enters through the
/// control channel, not the transition.
fn build_transition(dt: f64) -> StateMat {
    let half_dt2 = 0.5 * dt * dt;
    let mut f = StateMat::zeros();

    f[(POS_X, POS_X)] = 1.0;
    f[(POS_X, ACC_X)] = half_dt2;
    f[(VEL_X, ACC_X)] = dt;
    f[(ACC_X, ACC_X)] = 1.0;

    f[(POS_Y, POS_Y)] = 1.0;
    f[(POS_Y, ACC_Y)] = half_dt2;
    f[(VEL_Y, ACC_Y)] = dt;
    f[(ACC_Y, ACC_Y)] = 1.0;

    f[(HEADING, HEADING)] = 1.0;
    f[(HEADING, ANG_RATE)] = dt;
    f[(HEADING, ANG_ACC)] = half_dt2;
    f[(ANG_RATE, ANG_RATE)] = 1.0;
    f[(ANG_RATE, ANG_ACC)] = dt;
    f[(ANG_ACC, ANG_ACC)] = 1.0;

    f
}

/// Control feeds the planar position and velocity rows only.
fn build_control(dt: f64) -> ControlMat {
    let mut b = ControlMat::zeros();
    b[(POS_X, 0)] = dt;
    b[(VEL_X, 0)] = 1.0;
    b[(POS_Y, 1)] = dt;
    b[(VEL_Y, 1)] = 1.0;
    b
}

fn build_observation() -> ObservationMat {
    let mut h = ObservationMat::zeros();
    h[(ACC_X, 0)] = 1.0;
    h[(ACC_Y, 1)] = 1.0;
    h[(ANG_RATE, 2)] = 1.0;
    h
}

/// Constant-acceleration noise propagation in exact powers of `dt`. The
/// planar blocks keep their velocity row and column zero (velocity is driven
/// by control, not diffusion); the heading block is the full third-order
/// propagation.
fn build_process_noise(dt: f64, phi_s: f64) -> StateMat {
    let q5 = dt.powi(5) / 20.0;
    let q4 = dt.powi(4) / 8.0;
    let q3 = dt.powi(3) / 6.0;
    let mut q = StateMat::zeros();

    for (pos, acc) in [(POS_X, ACC_X), (POS_Y, ACC_Y)] {
        q[(pos, pos)] = q5;
        q[(pos, acc)] = q3;
        q[(acc, pos)] = q3;
        q[(acc, acc)] = dt;
    }

    q[(HEADING, HEADING)] = q5;
    q[(HEADING, ANG_RATE)] = q4;
    q[(HEADING, ANG_ACC)] = q3;
    q[(ANG_RATE, HEADING)] = q4;
    q[(ANG_RATE, ANG_RATE)] = dt.powi(3) / 3.0;
    q[(ANG_RATE, ANG_ACC)] = 0.5 * dt * dt;
    q[(ANG_ACC, HEADING)] = q3;
    q[(ANG_ACC, ANG_RATE)] = 0.5 * dt * dt;
    q[(ANG_ACC, ANG_ACC)] = dt;

    q * phi_s
}

fn build_measurement_noise(scale: f64) -> MeasureMat {
    let mut r = MeasureMat::zeros();
    for (i, var) in BASE_MEASURE_VAR.iter().enumerate() {
        r[(i, i)] = var * scale;
    }
    r
}

/// Diagonal initial covariance from the six-sigma seed. Adjacent state pairs
/// share a sigma: [s0 s0 s1 s1 s2 s2 s3 s4 s5] down the diagonal.
pub fn initial_covariance(seed: &[f64; 6]) -> FilterResult<StateMat> {
    if let Some(bad) = seed.iter().find(|s| **s <= 0.0) {
        return Err(FilterError::InvalidParameter(format!(
            "initial uncertainty must be positive, got {bad}"
        )));
    }
    let spread = [
        seed[0], seed[0], seed[1], seed[1], seed[2], seed[2], seed[3], seed[4], seed[5],
    ];
    let mut p = StateMat::zeros();
    for (idx, sigma) in spread.iter().enumerate() {
        p[(idx, idx)] = sigma * sigma;
    }
    Ok(p)
}

/// Additive per-step noise draws for the recursion. The reference run keeps
/// them zeroed; `sampled` is the stochastic path behind the injection flag.
#[derive(Clone, Debug)]
pub struct NoiseDraws {
    pub measurement: Vec<MeasureVec>,
    pub process: Vec<StateVec>,
}

impl NoiseDraws {
    pub fn zeroed(steps: usize) -> Self {
        Self {
            measurement: vec![MeasureVec::zeros(); steps],
            process: vec![StateVec::zeros(); steps],
        }
    }

    pub fn sampled<R: Rng + ?Sized>(steps: usize, std: f64, rng: &mut R) -> FilterResult<Self> {
        let dist = Normal::new(0.0, std)
            .map_err(|e| FilterError::InvalidParameter(format!("bad noise parameter: {e}")))?;
        let measurement = (0..steps)
            .map(|_| MeasureVec::from_fn(|_, _| dist.sample(rng)))
            .collect();
        let process = (0..steps)
            .map(|_| StateVec::from_fn(|_, _| dist.sample(rng)))
            .collect();
        Ok(Self {
            measurement,
            process,
        })
    }

    pub fn len(&self) -> usize {
        self.measurement.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measurement.is_empty()
    }
}
