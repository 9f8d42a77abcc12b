//! Tunable constants for the scaling-series filter, bundled with a
//! `Default` impl.

use crate::consts::{
    DEFAULT_PRUNE_RATIO, DEFAULT_QUOTA_PER_BALL, EVALUATION_TEMPERATURE, MAX_REJECTION_ATTEMPTS,
    SCALING_SERIES_ZOOM,
};

#[derive(Clone, Copy, Debug)]
pub struct FilterConfig {
    /// Particles drawn per neighborhood ball in the even-density cover.
    pub quota_per_ball: usize,
    /// Threshold-prune ratio rho: keep particles with weight > rho * max.
    pub prune_ratio: f64,
    /// Per-iteration volume zoom factor.
    pub zoom: f64,
    /// Maximum rejection-sampling retries per even-density-cover candidate.
    pub max_rejection_attempts: u32,
    /// Temperature used for the final, post-anneal weight computation.
    pub evaluation_temperature: f64,
    /// RNG seed for reproducible sampling.
    pub seed: u64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            quota_per_ball: DEFAULT_QUOTA_PER_BALL,
            prune_ratio: DEFAULT_PRUNE_RATIO,
            zoom: SCALING_SERIES_ZOOM,
            max_rejection_attempts: MAX_REJECTION_ATTEMPTS,
            evaluation_temperature: EVALUATION_TEMPERATURE,
            seed: 0,
        }
    }
}
