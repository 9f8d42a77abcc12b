//! Tactile contact measurements.

use glam::DVec3;

use crate::error::PoseFilterError;

/// A single tactile contact observation: a contact point and an inward
/// surface-normal direction, both in the world frame. Normals must already
/// be unit length; this crate does not renormalize them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Measurement {
    pub point: DVec3,
    pub normal: DVec3,
}

impl Measurement {
    pub fn new(point: DVec3, normal: DVec3) -> Self {
        Self { point, normal }
    }

    /// Validates the normal is non-degenerate (non-zero length). Does not
    /// renormalize, per the crate's external interface contract.
    pub fn validate(&self, index: usize) -> Result<(), PoseFilterError> {
        if self.normal.length_squared() < 1e-20 {
            return Err(PoseFilterError::DegenerateMeasurementNormal { index });
        }
        Ok(())
    }

    /// Expresses this measurement in the body frame of candidate pose `t`:
    /// `(R^T (p - t), R^T n)`.
    pub fn in_body_frame(&self, inv: &crate::se3::Transform) -> Measurement {
        Measurement {
            point: inv.apply_point(self.point),
            normal: inv.apply_vector(self.normal),
        }
    }
}

pub fn validate_measurements(measurements: &[Measurement]) -> Result<(), PoseFilterError> {
    if measurements.is_empty() {
        return Err(PoseFilterError::EmptyMeasurementSet);
    }
    for (i, m) in measurements.iter().enumerate() {
        m.validate(i)?;
    }
    Ok(())
}
