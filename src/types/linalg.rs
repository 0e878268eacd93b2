//! Linear algebra type system for the planar bot filter
//!
//! Provides compile-time dimension checking, clean type aliases, and the
//! positional layout of the 9-component state vector.

use nalgebra::{SMatrix, SVector};

// ===== Dimensions =====
pub const STATE_DIM: usize = 9;
pub const MEASURE_DIM: usize = 3; // (acc_x, acc_y, angular_rate)
pub const CONTROL_DIM: usize = 2; // planar control channels

// ===== State layout =====
// The ordering is a positional contract: every matrix builder and the
// ground-truth packing go through these indices.
pub const POS_X: usize = 0;
pub const VEL_X: usize = 1;
pub const ACC_X: usize = 2;
pub const POS_Y: usize = 3;
pub const VEL_Y: usize = 4;
pub const ACC_Y: usize = 5;
pub const HEADING: usize = 6;
pub const ANG_RATE: usize = 7;
pub const ANG_ACC: usize = 8;

// ===== Filter types =====
pub type StateVec = SVector<f64, STATE_DIM>;
pub type StateMat = SMatrix<f64, STATE_DIM, STATE_DIM>;

pub type MeasureVec = SVector<f64, MEASURE_DIM>;
pub type MeasureMat = SMatrix<f64, MEASURE_DIM, MEASURE_DIM>;

pub type ControlVec = SVector<f64, CONTROL_DIM>;
pub type ControlMat = SMatrix<f64, STATE_DIM, CONTROL_DIM>; // 9×2

// Observation matrix is stored state-major (9×3) and applied transposed.
pub type ObservationMat = SMatrix<f64, STATE_DIM, MEASURE_DIM>;
pub type GainMat = SMatrix<f64, STATE_DIM, MEASURE_DIM>; // 9×3
