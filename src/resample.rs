//! Resampling and pruning: systematic residual resampling and
//! weight-threshold pruning, kept as two independently callable named
//! operations rather than the scaling-series driver hard-coding one choice.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::error::PoseFilterError;
use crate::se3::{log_se3, transform_inverse, Transform};

/// Retains only particles whose weight exceeds `ratio * max_weight`.
/// Preserves diversity among high-weight particles; this is the variant the
/// scaling-series driver calls by default between iterations.
pub fn threshold_prune(particles: &[Transform], weights: &[f64], ratio: f64) -> (Vec<Transform>, Vec<f64>) {
    let max_weight = weights.iter().cloned().fold(f64::MIN, f64::max);
    let threshold = ratio * max_weight;

    let mut kept_particles = Vec::new();
    let mut kept_weights = Vec::new();
    for (p, &w) in particles.iter().zip(weights.iter()) {
        if w > threshold {
            kept_particles.push(*p);
            kept_weights.push(w);
        }
    }
    (kept_particles, kept_weights)
}

/// Systematic residual resampling: draws `N` particle indices with a single
/// stratified offset, then collapses consecutive exact duplicates (particles
/// whose composed relative transform is within tolerance of identity).
/// Guarantees an unbiased empirical distribution with reduced Monte-Carlo
/// variance versus multinomial resampling.
pub fn systematic_resample(
    particles: &[Transform],
    weights: &[f64],
    rng: &mut ChaCha8Rng,
) -> Result<Vec<Transform>, PoseFilterError> {
    let n = particles.len();
    if n != weights.len() {
        return Err(PoseFilterError::ParticleWeightLengthMismatch {
            particles: n,
            weights: weights.len(),
        });
    }
    if n == 0 {
        return Ok(Vec::new());
    }

    let mut cumulative = vec![0.0_f64; n];
    cumulative[0] = weights[0];
    for i in 0..n - 1 {
        cumulative[i + 1] = cumulative[i] + weights[i + 1];
    }

    let u0: f64 = rng.gen_range(0.0..1.0) / n as f64;
    let mut k = 0usize;
    let mut drawn = Vec::with_capacity(n);
    for i in 0..n {
        let u = u0 + i as f64 / n as f64;
        while u > cumulative[k] && k + 1 < n {
            k += 1;
        }
        drawn.push(particles[k]);
    }

    let mut collapsed: Vec<Transform> = Vec::with_capacity(drawn.len());
    for (i, p) in drawn.into_iter().enumerate() {
        if i == 0 {
            collapsed.push(p);
            continue;
        }
        let prev = collapsed.last().unwrap();
        let relative = p.compose(&transform_inverse(prev));
        let xi = log_se3(&relative);
        let is_duplicate = xi.rho.length() < 1e-9 && xi.phi.length() < 1e-9;
        if !is_duplicate {
            collapsed.push(p);
        }
    }
    Ok(collapsed)
}
