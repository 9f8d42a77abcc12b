//! Structured errors for malformed input.
//!
//! Per the crate's error-handling design, only *structural* input mistakes
//! are represented here. Numerical degeneracies the filter can recover from
//! on its own (the `log_so3` singularity branches, an empty face-angle
//! range, an all-zero weight vector, a cancelled anneal) are handled
//! internally and never surface as an `Err`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PoseFilterError {
    #[error("covariance matrix must be square, got {rows}x{cols}")]
    NonSquareCovariance { rows: usize, cols: usize },

    #[error("covariance matrix must be 6x6, got {size}x{size}")]
    WrongCovarianceSize { size: usize },

    #[error("covariance matrix is not positive-definite (Cholesky factorization failed)")]
    NonPositiveDefiniteCovariance,

    #[error("mesh has zero faces")]
    EmptyMesh,

    #[error("face {face} references out-of-range vertex index {index} (mesh has {vertex_count} vertices)")]
    VertexIndexOutOfRange {
        face: usize,
        index: usize,
        vertex_count: usize,
    },

    #[error("face {face} has a degenerate (zero-length) normal")]
    DegenerateFaceNormal { face: usize },

    #[error("measurement {index} has a zero-length normal")]
    DegenerateMeasurementNormal { index: usize },

    #[error("particle set must be non-empty")]
    EmptyParticleSet,

    #[error("measurement set must be non-empty")]
    EmptyMeasurementSet,

    #[error("particle and weight arrays have mismatched lengths: {particles} vs {weights}")]
    ParticleWeightLengthMismatch { particles: usize, weights: usize },
}

pub type Result<T> = std::result::Result<T, PoseFilterError>;
