//! Measurement-likelihood evaluator: scores candidate poses against the
//! observation set via a Gibbs-kernel weight at temperature `tau`.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::measurement::Measurement;
use crate::mesh::distance::minimum_measurement_distance;
use crate::mesh::{FaceAngleIndex, Mesh};
use crate::se3::{transform_inverse, Transform};

/// Result of a weight computation: normalized weights plus a diagnostic flag
/// for the degenerate (all energies effectively infinite / all weights zero)
/// case.
#[derive(Clone, Debug)]
pub struct WeightResult {
    pub weights: Vec<f64>,
    pub degenerate: bool,
}

/// Sum of squared minimum measurement distances for one candidate pose,
/// using a caller-supplied scratch buffer for the body-frame measurements
/// (reused across particles rather than deep-copied per candidate).
fn candidate_energy(
    mesh: &Mesh,
    index: &FaceAngleIndex,
    candidate: &Transform,
    measurements: &[Measurement],
    sigma_p: f64,
    sigma_n: f64,
    scratch: &mut Vec<Measurement>,
) -> f64 {
    let inv = transform_inverse(candidate);
    scratch.clear();
    scratch.extend(measurements.iter().map(|m| m.in_body_frame(&inv)));

    scratch
        .iter()
        .map(|m| {
            let d = minimum_measurement_distance(mesh, index, m, sigma_p, sigma_n);
            d * d
        })
        .sum()
}

fn normalize(weights: &mut [f64]) -> bool {
    let sum: f64 = weights.iter().sum();
    if sum <= 0.0 || !sum.is_finite() {
        let n = weights.len();
        weights.fill(1.0 / n as f64);
        return true;
    }
    for w in weights.iter_mut() {
        *w /= sum;
    }
    false
}

/// For each candidate pose and the full measurement set, computes the
/// energy `E_i`, converts to an unnormalized weight `exp(-E_i / (2*tau))`,
/// then normalizes. Falls back to uniform weights (flagged `degenerate`)
/// when every weight collapses to zero in floating point.
pub fn compute_weights(
    mesh: &Mesh,
    index: &FaceAngleIndex,
    particles: &[Transform],
    measurements: &[Measurement],
    sigma_p: f64,
    sigma_n: f64,
    tau: f64,
) -> WeightResult {
    #[cfg(feature = "parallel")]
    let mut weights: Vec<f64> = particles
        .par_iter()
        .map_init(
            || Vec::with_capacity(measurements.len()),
            |scratch, candidate| {
                let e = candidate_energy(mesh, index, candidate, measurements, sigma_p, sigma_n, scratch);
                (-e / (2.0 * tau)).exp()
            },
        )
        .collect();

    #[cfg(not(feature = "parallel"))]
    let mut weights: Vec<f64> = {
        let mut scratch = Vec::with_capacity(measurements.len());
        particles
            .iter()
            .map(|candidate| {
                let e = candidate_energy(mesh, index, candidate, measurements, sigma_p, sigma_n, &mut scratch);
                (-e / (2.0 * tau)).exp()
            })
            .collect()
    };

    let degenerate = normalize(&mut weights);
    if degenerate {
        log::warn!("compute_weights: all weights collapsed to zero, falling back to uniform");
    }
    WeightResult { weights, degenerate }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    #[test]
    fn single_face_weight_at_tau_one_is_one() {
        let vertices = vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let faces = vec![[0, 1, 2]];
        let (mesh, index) = crate::mesh::load_mesh(&vertices, &faces).unwrap();
        let measurements = vec![Measurement::new(DVec3::new(0.25, 0.25, 0.0), DVec3::new(0.0, 0.0, 1.0))];
        let particles = vec![Transform::IDENTITY];
        let result = compute_weights(&mesh, &index, &particles, &measurements, 0.005, 0.17, 1.0);
        assert!(!result.degenerate);
        assert!((result.weights[0] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn weights_sum_to_one() {
        let vertices = vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let faces = vec![[0, 1, 2]];
        let (mesh, index) = crate::mesh::load_mesh(&vertices, &faces).unwrap();
        let measurements = vec![Measurement::new(DVec3::new(0.25, 0.25, 0.0), DVec3::new(0.0, 0.0, 1.0))];
        let particles = vec![
            Transform::IDENTITY,
            Transform::new(glam::DMat3::IDENTITY, DVec3::new(0.05, 0.0, 0.0)),
            Transform::new(glam::DMat3::IDENTITY, DVec3::new(0.0, 0.05, 0.0)),
        ];
        let result = compute_weights(&mesh, &index, &particles, &measurements, 0.005, 0.17, 0.5);
        let sum: f64 = result.weights.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn uniform_weights_when_temperature_collapses_to_zero_energy_difference() {
        // All candidates identical -> all energies equal -> after
        // normalization weights should be uniform even without the
        // degenerate fallback.
        let vertices = vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let faces = vec![[0, 1, 2]];
        let (mesh, index) = crate::mesh::load_mesh(&vertices, &faces).unwrap();
        let measurements = vec![Measurement::new(DVec3::new(0.25, 0.25, 0.0), DVec3::new(0.0, 0.0, 1.0))];
        let particles = vec![Transform::IDENTITY, Transform::IDENTITY];
        let result = compute_weights(&mesh, &index, &particles, &measurements, 0.005, 0.17, 1.0);
        assert!((result.weights[0] - result.weights[1]).abs() < 1e-15);
    }
}
