//! Ground-truth trajectory synthesis for the simulated planar bot.
//!
//! A hand-authored tangential-acceleration profile is integrated into
//! velocity and position tracks; heading is derived from the velocity
//! direction and differenced into angular rate and angular acceleration.
//! The first two samples are dropped so every sequence, including the
//! twice-differenced one, has the same length.

use ndarray::{s, Array1, Array2};

use crate::error::{FilterError, FilterResult};
use crate::types::linalg::{
    StateVec, ACC_X, ACC_Y, ANG_ACC, ANG_RATE, HEADING, POS_X, POS_Y, VEL_X, VEL_Y,
};

/// Raw profile length before trimming.
const RAW_STEPS: usize = 702;
/// Samples dropped from the front to align the differenced sequences.
const TRIM: usize = 2;

/// Ground-truth kinematic sequences, all of equal length.
#[derive(Clone, Debug)]
pub struct GroundTruth {
    /// Sample times, endpoint-inclusive spacing over `[0, n·dt]`.
    pub t: Array1<f64>,
    /// Planar position, one (x, y) row per step.
    pub position: Array2<f64>,
    /// Planar velocity.
    pub velocity: Array2<f64>,
    /// Planar tangential acceleration.
    pub acceleration: Array2<f64>,
    /// Heading derived from the velocity direction.
    pub heading: Array1<f64>,
    /// First difference of heading.
    pub angular_rate: Array1<f64>,
    /// Second difference of heading.
    pub angular_accel: Array1<f64>,
}

impl GroundTruth {
    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// Pack step `k` into the 9-component state layout.
    pub fn state_at(&self, k: usize) -> StateVec {
        let mut x = StateVec::zeros();
        x[POS_X] = self.position[[k, 0]];
        x[VEL_X] = self.velocity[[k, 0]];
        x[ACC_X] = self.acceleration[[k, 0]];
        x[POS_Y] = self.position[[k, 1]];
        x[VEL_Y] = self.velocity[[k, 1]];
        x[ACC_Y] = self.acceleration[[k, 1]];
        x[HEADING] = self.heading[k];
        x[ANG_RATE] = self.angular_rate[k];
        x[ANG_ACC] = self.angular_accel[k];
        x
    }

    /// The whole run packed as state vectors.
    pub fn states(&self) -> Vec<StateVec> {
        (0..self.len()).map(|k| self.state_at(k)).collect()
    }
}

/// Build the reference trajectory at time step `dt` (700 steps after trim).
pub fn generate(dt: f64) -> FilterResult<GroundTruth> {
    if dt <= 0.0 {
        return Err(FilterError::InvalidParameter(format!(
            "time step must be positive, got {dt}"
        )));
    }

    let n = RAW_STEPS;
    let t = Array1::linspace(0.0, n as f64 * dt, n);
    let a_tan = build_profile(n);

    let mut vel = Array2::<f64>::zeros((n, 2));
    let mut pos = Array2::<f64>::zeros((n, 2));
    for i in 1..n {
        for axis in 0..2 {
            vel[[i, axis]] = vel[[i - 1, axis]] + a_tan[[i, axis]] * dt;
            pos[[i, axis]] = pos[[i - 1, axis]] + vel[[i, axis]] * dt;
        }
    }
    // The initial velocity is pinned after integration: it seeds the heading
    // ratio below but does not feed the recurrence.
    vel[[0, 0]] = 0.1;
    vel[[0, 1]] = 0.1;

    let theta = Array1::from_shape_fn(n, |i| (vel[[i, 1]] / vel[[i, 0]]).tanh());
    let omega = Array1::from_shape_fn(n - 1, |i| theta[i + 1] - theta[i]);
    let alpha = Array1::from_shape_fn(n - 2, |i| omega[i + 1] - omega[i]);

    Ok(GroundTruth {
        t: t.slice(s![TRIM..]).to_owned(),
        position: pos.slice(s![TRIM.., ..]).to_owned(),
        velocity: vel.slice(s![TRIM.., ..]).to_owned(),
        acceleration: a_tan.slice(s![TRIM.., ..]).to_owned(),
        heading: theta.slice(s![TRIM..]).to_owned(),
        angular_rate: omega.slice(s![1..]).to_owned(),
        angular_accel: alpha,
    })
}

/// Hand-authored tangential-acceleration segments (n×2), scaled down by 10.
fn build_profile(n: usize) -> Array2<f64> {
    let mut a = Array2::<f64>::zeros((n, 2));

    let ramp = Array1::linspace(0.1, 1.0, 10);
    a.slice_mut(s![0..10, 0]).assign(&ramp);
    a.slice_mut(s![0..10, 1]).assign(&ramp.mapv(|x| x * x));

    let brake = Array1::linspace(-0.1, -2.0, 10);
    a.slice_mut(s![100..110, 0]).assign(&brake);
    a.slice_mut(s![100..110, 1]).assign(&brake.mapv(|x| x * x));

    let surge = Array1::linspace(-2.0, 8.0, 50).mapv(|x| x * x / 500.0);
    a.slice_mut(s![150..200, 0]).assign(&surge);
    a.slice_mut(s![150..200, 1]).assign(&surge.mapv(|x| x.powi(3) / 10.0));

    let sweep = Array1::linspace(8.0, -10.0, 100).mapv(|x: f64| x.powi(3) / 1000.0);
    a.slice_mut(s![300..400, 0]).assign(&sweep);
    a.slice_mut(s![300..400, 1]).assign(&sweep);

    // Rows 400 and 600 are still untouched when read, so these segments
    // ramp from zero.
    let hook = Array1::linspace(a[[400, 0]], -1.0, 20).mapv(|x| x * x);
    a.slice_mut(s![500..520, 0]).assign(&hook);
    let rise = Array1::linspace(a[[400, 1]], 1.0, 100);
    a.slice_mut(s![500..600, 1]).assign(&rise);

    let tail_x = -Array1::linspace(a[[600, 0]], 0.0, 50);
    a.slice_mut(s![650..700, 0]).assign(&tail_x);
    let tail_y = -Array1::linspace(a[[600, 1]], 0.0, 50);
    a.slice_mut(s![650..700, 1]).assign(&tail_y);

    a.mapv_inplace(|x| x / 10.0);
    a
}
