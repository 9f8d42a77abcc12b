//! Named numerical constants for the SE(3) filter core.
//!
//! Centralized here per the crate's convention of never inlining magic
//! numbers into the SE(3)/likelihood/annealing code paths.

/// Below this rotation-vector norm, `exp_so3` returns the identity rather
/// than dividing by a near-zero angle.
pub const SO3_EXP_SMALL_EPS: f64 = 1e-12;

/// `log_so3` treats `R` as the identity (zero rotation) when it is within
/// this tolerance of `I`.
pub const SO3_LOG_IDENTITY_EPS: f64 = 1e-4;

/// `log_so3` treats `trace(R)` as having reached the `angle = pi` singularity
/// within this tolerance.
pub const SO3_LOG_PI_TRACE_EPS: f64 = 1e-4;

/// Below this squared-norm, a diagonal term in the pi-branch axis extraction
/// is treated as zero to avoid dividing by a near-zero square root.
pub const SO3_LOG_PI_DIAGONAL_EPS: f64 = 1e-4;

/// Per-iteration volume zoom factor: z = 2^(-1/6), so that the volume of the
/// sampling region halves every iteration of the scaling series.
pub const SCALING_SERIES_ZOOM: f64 = 0.8908987181403393; // 2^(-1/6)

/// Default prune-threshold ratio rho: particles with weight below
/// `rho * max_weight` are discarded between scaling-series iterations.
pub const DEFAULT_PRUNE_RATIO: f64 = 0.6;

/// Default number of particles drawn per neighborhood ball in the
/// even-density cover sampler.
pub const DEFAULT_QUOTA_PER_BALL: usize = 6;

/// Maximum number of rejection-sampling retries per candidate before the
/// even-density cover sampler accepts the local density shortfall and moves
/// on to the next candidate.
pub const MAX_REJECTION_ATTEMPTS: u32 = 5;

/// Evaluation temperature used for the final, post-anneal weight computation.
pub const EVALUATION_TEMPERATURE: f64 = 1.0;

/// Reference direction used to build a mesh's face-angle index (+z axis).
pub const FACE_ANGLE_REFERENCE_AXIS: [f64; 3] = [0.0, 0.0, 1.0];
