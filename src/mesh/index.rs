//! Face-angle index: a permutation of mesh faces sorted by the angle between
//! each face normal and a fixed reference direction, supporting bounded
//! range queries by measurement-normal angle.

use glam::DVec3;

use super::Mesh;

/// first index `i` such that `sorted[i] > x` (std's `partition_point`).
fn upper_bound(sorted: &[f64], x: f64) -> usize {
    sorted.partition_point(|&v| v <= x)
}

/// first index `i` such that `sorted[i] >= x`.
fn lower_bound(sorted: &[f64], x: f64) -> usize {
    sorted.partition_point(|&v| v < x)
}

/// Immutable, shared, read-only handle built once per mesh. `face_order[k]`
/// is the face index at sorted position `k`; `sorted_angles[k]` is its angle
/// to `reference_axis`.
#[derive(Clone, Debug)]
pub struct FaceAngleIndex {
    face_order: Vec<usize>,
    sorted_angles: Vec<f64>,
    reference_axis: DVec3,
}

impl FaceAngleIndex {
    pub fn build(mesh: &Mesh, reference_axis: DVec3) -> Self {
        let mut pairs: Vec<(usize, f64)> = mesh
            .faces()
            .iter()
            .enumerate()
            .map(|(i, f)| (i, f.normal.dot(reference_axis).clamp(-1.0, 1.0).acos()))
            .collect();
        pairs.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap());

        let face_order = pairs.iter().map(|(i, _)| *i).collect();
        let sorted_angles = pairs.iter().map(|(_, a)| *a).collect();

        Self {
            face_order,
            sorted_angles,
            reference_axis,
        }
    }

    pub fn reference_axis(&self) -> DVec3 {
        self.reference_axis
    }

    pub fn len(&self) -> usize {
        self.face_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.face_order.is_empty()
    }

    /// Returns the half-open range `[lo, hi)` of sorted positions whose
    /// faces could be within `sigma_n` of the measurement normal `n_m`, per
    /// the precise range policy below. Indices into
    /// `self.face_order` (not raw mesh face indices) must be dereferenced by
    /// the caller via `face_order()`.
    pub fn query_range(&self, n_m: DVec3, sigma_n: f64) -> (usize, usize) {
        let len = self.sorted_angles.len();
        let alpha = n_m.dot(self.reference_axis).clamp(-1.0, 1.0).acos();
        let idx = upper_bound(&self.sorted_angles, alpha);

        let hi = if idx < len {
            let target = self.sorted_angles[idx] + (self.sorted_angles[idx] - alpha) + sigma_n;
            idx + upper_bound(&self.sorted_angles[idx..], target)
        } else {
            idx
        };

        let lo = if idx > 0 {
            let target = self.sorted_angles[idx - 1] - (self.sorted_angles[idx - 1] - alpha) - sigma_n;
            let bound = lower_bound(&self.sorted_angles[..idx], target);
            bound.saturating_sub(1)
        } else {
            0
        };

        (lo, hi)
    }

    /// Widens a range by one slot on each side, clamped to `[0, len)`. Used
    /// as the defensive fallback when a query range comes back empty.
    pub fn widen(&self, lo: usize, hi: usize) -> (usize, usize) {
        let lo = lo.saturating_sub(1);
        let hi = (hi + 1).min(self.len());
        (lo, hi)
    }

    /// Maps a sorted-position range to the underlying mesh face indices.
    pub fn faces_in_range(&self, lo: usize, hi: usize) -> &[usize] {
        &self.face_order[lo..hi.min(self.face_order.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::load_mesh;

    fn mesh_with_angles(angles_deg: &[f64]) -> (Mesh, FaceAngleIndex) {
        // Build one triangle per requested angle to +z by tilting it about
        // the x axis.
        let mut vertices = Vec::new();
        let mut faces = Vec::new();
        for &deg in angles_deg {
            let theta = deg.to_radians();
            let base = vertices.len();
            // A small triangle in the local xy plane, then tilted about x so
            // its normal makes angle `theta` with +z.
            let p0 = [0.0, 0.0, 0.0];
            let p1 = [0.1, 0.0, 0.0];
            let p2_y = theta.cos() * 0.1;
            let p2_z = theta.sin() * 0.1;
            let p2 = [0.0, p2_y, p2_z];
            vertices.push(p0);
            vertices.push(p1);
            vertices.push(p2);
            faces.push([base, base + 1, base + 2]);
        }
        load_mesh(&vertices, &faces).unwrap()
    }

    #[test]
    fn range_query_covers_neighbors_at_known_angles() {
        let (_mesh, index) = mesh_with_angles(&[
            0.1_f64.to_degrees(),
            0.5_f64.to_degrees(),
            1.2_f64.to_degrees(),
        ]);
        let query_normal = {
            let theta = 0.45_f64;
            DVec3::new(0.0, theta.sin(), theta.cos())
        };
        let (lo, hi) = index.query_range(query_normal, 0.1);
        let faces = index.faces_in_range(lo, hi);
        // face index 1 (angle 0.5) must be reachable.
        assert!(faces.contains(&1), "range {:?} (lo={lo},hi={hi}) missing face 1", faces);
    }

    #[test]
    fn range_query_on_empty_mesh_angle_span_is_well_formed() {
        let (_mesh, index) = mesh_with_angles(&[0.0, 45.0, 90.0]);
        let (lo, hi) = index.query_range(DVec3::new(0.0, 0.0, 1.0), 0.01);
        assert!(lo <= hi);
        assert!(hi <= index.len());
    }
}
