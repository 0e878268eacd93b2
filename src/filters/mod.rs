//! Kalman filter engine: the fixed system model and the linear recursion.

pub mod linear;
pub mod model;

pub use linear::{run_filter, FilterRun, PlanarKalman, StepOutput};
pub use model::{initial_covariance, NoiseDraws, SystemModel};
