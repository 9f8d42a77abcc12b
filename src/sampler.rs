//! Region sampler: even-density cover over a union of tangent-space balls.

use glam::DVec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::Uniform;

use crate::se3::{exp_so3, log_so3, Transform};

/// A union of tangent-space neighborhoods: one ball of radius `delta_rot`
/// (rotation) and `delta_trans` (translation) per particle.
#[derive(Clone, Debug)]
pub struct Region {
    centers_rot: Vec<DVec3>,
    centers_trans: Vec<DVec3>,
    pub delta_rot: f64,
    pub delta_trans: f64,
}

impl Region {
    /// Builds a region from a particle set, caching each particle's
    /// rotation-log once rather than recomputing it inside every
    /// neighborhood test.
    pub fn new(particles: &[Transform], delta_rot: f64, delta_trans: f64) -> Self {
        let centers_rot = particles.iter().map(|t| log_so3(t.rotation)).collect();
        let centers_trans = particles.iter().map(|t| t.translation).collect();
        Self {
            centers_rot,
            centers_trans,
            delta_rot,
            delta_trans,
        }
    }

    pub fn num_centers(&self) -> usize {
        self.centers_rot.len()
    }
}

fn is_inside(point: DVec3, center: DVec3, radius: f64) -> bool {
    (point - center).length() < radius
}

/// Draws candidates covering `region` with approximately `quota` particles
/// per neighborhood, rejecting candidates that fall inside any
/// earlier-indexed ball: the freshly sampled candidate is tested against
/// earlier balls, not the outer per-neighborhood loop variable. Per-candidate
/// rejection retries are capped at `max_rejection_attempts`.
///
/// Each center draws its candidates from its own `ChaCha8Rng`, seeded by a
/// value pulled from `rng` before the per-center loop begins. This keeps the
/// sequence reproducible for a fixed top-level seed independent of whether
/// centers are ever processed out of order or in parallel.
pub fn even_density_cover(region: &Region, quota: usize, max_rejection_attempts: u32, rng: &mut ChaCha8Rng) -> Vec<Transform> {
    let mut particles: Vec<Transform> = Vec::new();
    let mut particle_rot_log: Vec<DVec3> = Vec::new();
    let mut particle_trans: Vec<DVec3> = Vec::new();

    let unit_dist = Uniform::new_inclusive(-1.0, 1.0);
    let center_seeds: Vec<u64> = (0..region.num_centers()).map(|_| rng.gen()).collect();

    for i in 0..region.num_centers() {
        let mut rng = ChaCha8Rng::seed_from_u64(center_seeds[i]);
        let rng = &mut rng;
        let center_rot = region.centers_rot[i];
        let center_trans = region.centers_trans[i];

        let num_existing = particle_rot_log
            .iter()
            .zip(particle_trans.iter())
            .filter(|(&rot, &trans)| {
                is_inside(rot, center_rot, region.delta_rot) && is_inside(trans, center_trans, region.delta_trans)
            })
            .count();

        let shortfall = quota.saturating_sub(num_existing);
        for _ in 0..shortfall {
            let mut accepted = false;
            let mut candidate_rot = DVec3::ZERO;
            let mut candidate_trans = DVec3::ZERO;
            let mut attempts = 0;
            while !accepted && attempts < max_rejection_attempts {
                candidate_rot = DVec3::new(
                    rng.sample(unit_dist),
                    rng.sample(unit_dist),
                    rng.sample(unit_dist),
                ) * region.delta_rot
                    + center_rot;
                candidate_trans = DVec3::new(
                    rng.sample(unit_dist),
                    rng.sample(unit_dist),
                    rng.sample(unit_dist),
                ) * region.delta_trans
                    + center_trans;
                attempts += 1;

                accepted = true;
                for k in 0..i {
                    let prev_rot = region.centers_rot[k];
                    let prev_trans = region.centers_trans[k];
                    if is_inside(candidate_rot, prev_rot, region.delta_rot)
                        && is_inside(candidate_trans, prev_trans, region.delta_trans)
                    {
                        accepted = false;
                        break;
                    }
                }
            }

            if accepted {
                particle_rot_log.push(candidate_rot);
                particle_trans.push(candidate_trans);
                particles.push(Transform::new(exp_so3(candidate_rot), candidate_trans));
            }
        }
    }

    particles
}
