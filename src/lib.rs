//! Scaling-series annealed particle filter over SE(3) for estimating a rigid
//! object's pose from sparse tactile contact measurements against a known
//! triangular mesh.
//!
//! The core pipeline: [`mesh::load_mesh`] builds an immutable mesh and its
//! face-angle acceleration index once; [`scaling_series::scaling_series`]
//! then repeatedly draws candidate poses ([`sampler`]), scores them against
//! the measurement set ([`likelihood`]), and prunes/resamples
//! ([`resample`]), shrinking the search region and sharpening the
//! likelihood temperature in lockstep until the desired terminal covariance
//! is reached.

pub mod config;
pub mod consts;
pub mod cov6;
pub mod error;
pub mod likelihood;
pub mod measurement;
pub mod mesh;
pub mod resample;
pub mod sampler;
pub mod scaling_series;
pub mod se3;

pub use config::FilterConfig;
pub use cov6::Cov6;
pub use error::{PoseFilterError, Result};
pub use likelihood::{compute_weights, WeightResult};
pub use measurement::Measurement;
pub use mesh::{load_mesh, FaceAngleIndex, Mesh};
pub use scaling_series::{scaling_series, ScalingSeriesResult};
pub use se3::Transform;
