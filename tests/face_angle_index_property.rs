//! Property test: the face-angle index's range query must never miss a face
//! whose angle to the reference axis is within `sigma_n` of the query
//! normal's angle (soundness of the candidate-set narrowing).

use glam::DVec3;
use proptest::prelude::*;
use touch_pose_filter::{load_mesh, FaceAngleIndex};

fn mesh_with_angles(angles_rad: &[f64]) -> (touch_pose_filter::Mesh, FaceAngleIndex) {
    let mut vertices = Vec::new();
    let mut faces = Vec::new();
    for &theta in angles_rad {
        let base = vertices.len();
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

proptest! {
    #[test]
    fn range_query_never_misses_a_face_within_tolerance(
        angles_deg in prop::collection::vec(1.0_f64..179.0, 2..12),
        query_deg in 1.0_f64..179.0,
        sigma_n_deg in 1.0_f64..30.0,
    ) {
        let angles_rad: Vec<f64> = angles_deg.iter().map(|d| d.to_radians()).collect();
        let (_mesh, index) = mesh_with_angles(&angles_rad);

        let theta = query_deg.to_radians();
        let query_normal = DVec3::new(0.0, theta.sin(), theta.cos());
        let sigma_n = sigma_n_deg.to_radians();

        let (lo, hi) = index.query_range(query_normal, sigma_n);
        let in_range: Vec<usize> = index.faces_in_range(lo, hi).to_vec();

        for (face_idx, &angle) in angles_rad.iter().enumerate() {
            if (angle - theta).abs() <= sigma_n {
                prop_assert!(
                    in_range.contains(&face_idx),
                    "face {} at angle {} missed by range [{},{}) for query angle {} sigma_n {}",
                    face_idx, angle, lo, hi, theta, sigma_n
                );
            }
        }
    }
}
