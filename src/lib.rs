//! Discrete-time linear Kalman filtering for a simulated planar bot.
//!
//! The crate is a sequential batch pipeline: a hand-authored trajectory is
//! synthesized ([`trajectory`]), noisy sensors are simulated over it
//! ([`sensors`]), the fixed system matrices are assembled
//! ([`filters::model`]), the predict/correct recursion runs over the
//! sequences ([`filters::linear`]), and the estimates are scored against
//! ground truth ([`consistency`]) and exported for external plotting
//! ([`report`]). [`scenario`] wires the reference run end to end for the
//! binaries and the integration tests.

pub mod consistency;
pub mod error;
pub mod filters;
pub mod report;
pub mod scenario;
pub mod sensors;
pub mod trajectory;
pub mod types;

pub use error::{FilterError, FilterResult};
pub use filters::linear::{run_filter, FilterRun, PlanarKalman, StepOutput};
pub use filters::model::{initial_covariance, NoiseDraws, SystemModel};
pub use trajectory::GroundTruth;
