//! Triangular surface mesh and its per-face angle index.
//!
//! Geometric primitives live in this file, the acceleration structure lives
//! in `index`, and the distance computations that consume both live in
//! `distance`.

pub mod distance;
pub mod index;

use glam::DVec3;

use crate::consts::FACE_ANGLE_REFERENCE_AXIS;
use crate::error::PoseFilterError;

pub use index::FaceAngleIndex;

/// A single triangular face: three world-space vertices and a unit outward
/// normal.
#[derive(Clone, Copy, Debug)]
pub struct Face {
    pub vertices: [DVec3; 3],
    pub normal: DVec3,
    pub centroid: DVec3,
    pub area: f64,
}

/// A finite set of triangular faces, immutable after construction.
#[derive(Clone, Debug)]
pub struct Mesh {
    faces: Vec<Face>,
}

impl Mesh {
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn face(&self, i: usize) -> &Face {
        &self.faces[i]
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }
}

/// Builds a mesh from a flat vertex buffer and triangle index list, computing
/// per-face centroid, area, and outward normal (normalized), then builds the
/// face-angle index with `e_ref = +z`. This runs once at load time; the
/// result is immutable thereafter.
pub fn load_mesh(
    vertices: &[[f64; 3]],
    faces: &[[usize; 3]],
) -> Result<(Mesh, FaceAngleIndex), PoseFilterError> {
    if faces.is_empty() {
        return Err(PoseFilterError::EmptyMesh);
    }

    let mut built_faces = Vec::with_capacity(faces.len());
    for (face_idx, &[a, b, c]) in faces.iter().enumerate() {
        for &index in &[a, b, c] {
            if index >= vertices.len() {
                return Err(PoseFilterError::VertexIndexOutOfRange {
                    face: face_idx,
                    index,
                    vertex_count: vertices.len(),
                });
            }
        }
        let v0 = DVec3::from(vertices[a]);
        let v1 = DVec3::from(vertices[b]);
        let v2 = DVec3::from(vertices[c]);

        let raw_normal = (v1 - v0).cross(v2 - v0);
        let area = raw_normal.length() * 0.5;
        if raw_normal.length_squared() < 1e-24 {
            return Err(PoseFilterError::DegenerateFaceNormal { face: face_idx });
        }
        let normal = raw_normal.normalize();
        let centroid = (v0 + v1 + v2) / 3.0;

        built_faces.push(Face {
            vertices: [v0, v1, v2],
            normal,
            centroid,
            area,
        });
    }

    let mesh = Mesh { faces: built_faces };
    let e_ref = DVec3::from(FACE_ANGLE_REFERENCE_AXIS);
    let index = FaceAngleIndex::build(&mesh, e_ref);
    Ok((mesh, index))
}
