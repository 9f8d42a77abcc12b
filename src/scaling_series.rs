//! Scaling-series driver: the outer annealing loop that shrinks the
//! sampling region and sharpens the likelihood temperature in lockstep.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::FilterConfig;
use crate::cov6::{initial_deltas, Cov6};
use crate::error::PoseFilterError;
use crate::likelihood::compute_weights;
use crate::measurement::{validate_measurements, Measurement};
use crate::mesh::{FaceAngleIndex, Mesh};
use crate::resample::threshold_prune;
use crate::sampler::{even_density_cover, Region};
use crate::se3::Transform;

/// The volume of a radius-`r` ball in `dim` dimensions (used only for
/// `dim = 3`, to derive the annealing iteration count from the ratio of
/// initial to desired search-region volume).
fn ball_volume(radius: f64, dim: u32) -> f64 {
    let half_dim = dim as f64 / 2.0;
    std::f64::consts::PI.powf(half_dim) / gamma(half_dim + 1.0) * radius.powi(dim as i32)
}

/// Lanczos approximation of the gamma function, sufficient for the
/// half-integer arguments `ball_volume` calls it with (dim = 3 -> 2.5).
fn gamma(x: f64) -> f64 {
    const G: f64 = 7.0;
    const COEFFICIENTS: [f64; 9] = [
        0.99999999999980993,
        676.5203681218851,
        -1259.1392167224028,
        771.32342877765313,
        -176.61502916214059,
        12.507343278686905,
        -0.13857109526572012,
        9.9843695780195716e-6,
        1.5056327351493116e-7,
    ];
    if x < 0.5 {
        std::f64::consts::PI / ((std::f64::consts::PI * x).sin() * gamma(1.0 - x))
    } else {
        let x = x - 1.0;
        let mut a = COEFFICIENTS[0];
        let t = x + G + 0.5;
        for (i, &c) in COEFFICIENTS.iter().enumerate().skip(1) {
            a += c / (x + i as f64);
        }
        (2.0 * std::f64::consts::PI).sqrt() * t.powf(x + 0.5) * (-t).exp() * a
    }
}

/// Result of a `scaling_series` run.
#[derive(Clone, Debug)]
pub struct ScalingSeriesResult {
    pub particles: Vec<Transform>,
    pub weights: Vec<f64>,
    pub degenerate: bool,
    pub cancelled: bool,
    pub iterations_run: u32,
}

/// Runs the scaling-series annealed particle filter.
///
/// `cancel` is checked between iteration steps; if it returns `true` the
/// driver stops early and returns the most recent particles/weights with
/// `cancelled = true` rather than an error.
#[allow(clippy::too_many_arguments)]
pub fn scaling_series(
    mesh: &Mesh,
    index: &FaceAngleIndex,
    particles0: &[Transform],
    measurements: &[Measurement],
    sigma_p: f64,
    sigma_n: f64,
    sigma0: &Cov6,
    sigma_desired: &Cov6,
    config: &FilterConfig,
    cancel: &dyn Fn() -> bool,
) -> Result<ScalingSeriesResult, PoseFilterError> {
    if particles0.is_empty() {
        return Err(PoseFilterError::EmptyParticleSet);
    }
    validate_measurements(measurements)?;

    let (mut delta_rot, mut delta_trans) = initial_deltas(sigma0)?;
    let (delta_rot_desired, delta_trans_desired) = initial_deltas(sigma_desired)?;

    let n_rot = (ball_volume(delta_rot, 3) / ball_volume(delta_rot_desired, 3)).log2();
    let n_trans = (ball_volume(delta_trans, 3) / ball_volume(delta_trans_desired, 3)).log2();
    let n_iterations = n_rot.max(n_trans).round().max(0.0) as u32;

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut region = Region::new(particles0, delta_rot, delta_trans);

    let mut particles = particles0.to_vec();
    let mut weights = vec![1.0 / particles0.len() as f64; particles0.len()];
    let mut degenerate = false;
    let mut iterations_run = 0u32;
    let mut cancelled = false;

    for n in 0..n_iterations {
        if cancel() {
            cancelled = true;
            break;
        }

        delta_rot *= config.zoom;
        delta_trans *= config.zoom;
        let tau = (delta_trans / delta_trans_desired).powi(2);

        particles = even_density_cover(&region, config.quota_per_ball, config.max_rejection_attempts, &mut rng);
        if particles.is_empty() {
            particles = particles0.to_vec();
        }

        let result = compute_weights(mesh, index, &particles, measurements, sigma_p, sigma_n, tau);
        weights = result.weights;
        degenerate = result.degenerate;

        log::debug!(
            "scaling_series iteration {n}: delta_rot={delta_rot:.6} delta_trans={delta_trans:.6} tau={tau:.6} particles={}",
            particles.len()
        );

        let (pruned_particles, pruned_weights) = threshold_prune(&particles, &weights, config.prune_ratio);
        let (pruned_particles, pruned_weights) = if pruned_particles.is_empty() {
            (particles.clone(), weights.clone())
        } else {
            (pruned_particles, pruned_weights)
        };

        region = Region::new(&pruned_particles, delta_rot, delta_trans);
        particles = pruned_particles;
        weights = pruned_weights;
        iterations_run = n + 1;
    }

    if !cancelled {
        particles = even_density_cover(&region, config.quota_per_ball, config.max_rejection_attempts, &mut rng);
        if particles.is_empty() {
            particles = region_fallback(&region);
        }
        let result = compute_weights(
            mesh,
            index,
            &particles,
            measurements,
            sigma_p,
            sigma_n,
            config.evaluation_temperature,
        );
        weights = result.weights;
        degenerate = result.degenerate;
    }

    Ok(ScalingSeriesResult {
        particles,
        weights,
        degenerate,
        cancelled,
        iterations_run,
    })
}

fn region_fallback(region: &Region) -> Vec<Transform> {
    // If even-density cover produced nothing (a degenerate region with zero
    // centers), fall back to the identity so the caller always gets a
    // non-empty result.
    if region.num_centers() == 0 {
        vec![Transform::IDENTITY]
    } else {
        Vec::new()
    }
}
