//! Point-to-triangle distance and the combined position+normal measurement
//! residual.

use glam::DVec3;

use super::{Face, FaceAngleIndex, Mesh};
use crate::measurement::Measurement;

/// Closest point on a closed triangle to `p`, via the standard
/// region-test algorithm (barycentric regions: vertex, edge, interior).
pub fn closest_point_on_triangle(p: DVec3, v: [DVec3; 3]) -> DVec3 {
    let (a, b, c) = (v[0], v[1], v[2]);

    let ab = b - a;
    let ac = c - a;
    let ap = p - a;

    let d1 = ab.dot(ap);
    let d2 = ac.dot(ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return a; // vertex region A
    }

    let bp = p - b;
    let d3 = ab.dot(bp);
    let d4 = ac.dot(bp);
    if d3 >= 0.0 && d4 <= d3 {
        return b; // vertex region B
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v_coord = d1 / (d1 - d3);
        return a + v_coord * ab; // edge region AB
    }

    let cp = p - c;
    let d5 = ab.dot(cp);
    let d6 = ac.dot(cp);
    if d6 >= 0.0 && d5 <= d6 {
        return c; // vertex region C
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w_coord = d2 / (d2 - d6);
        return a + w_coord * ac; // edge region AC
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w_coord = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return b + w_coord * (c - b); // edge region BC
    }

    // interior region
    let denom = 1.0 / (va + vb + vc);
    let v_coord = vb * denom;
    let w_coord = vc * denom;
    a + ab * v_coord + ac * w_coord
}

/// The combined position+normal measurement residual for one face: a
/// Mahalanobis-like distance in the diagonal `(sigma_p^2, sigma_n^2)` metric.
pub fn face_measurement_distance(face: &Face, m: &Measurement, sigma_p: f64, sigma_n: f64) -> f64 {
    let q = closest_point_on_triangle(m.point, face.vertices);
    let delta_p = (q - m.point).length();
    let delta_n = face.normal.dot(m.normal).clamp(-1.0, 1.0).acos();
    ((delta_p / sigma_p).powi(2) + (delta_n / sigma_n).powi(2)).sqrt()
}

/// The minimum measurement distance over the candidate face range returned
/// by the face-angle index, widening the range by one slot if it comes back
/// empty (defensive fallback; the index spans `[0, pi]` so this should never
/// actually be needed).
pub fn minimum_measurement_distance(
    mesh: &Mesh,
    index: &FaceAngleIndex,
    m: &Measurement,
    sigma_p: f64,
    sigma_n: f64,
) -> f64 {
    let (mut lo, mut hi) = index.query_range(m.normal, sigma_n);
    if lo >= hi {
        let (wlo, whi) = index.widen(lo, hi);
        lo = wlo;
        hi = whi;
    }

    index
        .faces_in_range(lo, hi)
        .iter()
        .map(|&face_idx| face_measurement_distance(mesh.face(face_idx), m, sigma_p, sigma_n))
        .fold(f64::INFINITY, f64::min)
}
