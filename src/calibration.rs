//! Magnetometer calibration for the compass engine

use nalgebra::{Matrix3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Hard and soft iron correction for raw magnetometer samples
///
/// Applied as `soft_iron * (uncalibrated - hard_iron)` before a sample
/// reaches the smoothing filter.
///
/// # Example
/// ```
/// use nalgebra::{Matrix3, Vector3};
/// use fusion_compass::MagneticCalibration;
///
/// let calibration = MagneticCalibration {
///     soft_iron: Matrix3::identity(),
///     hard_iron: Vector3::new(10.0, 20.0, 30.0),
/// };
///
/// let calibrated = calibration.apply(Vector3::new(100.0, 200.0, 300.0));
/// assert_eq!(calibrated, Vector3::new(90.0, 180.0, 270.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MagneticCalibration {
    /// 3x3 soft iron correction matrix
    pub soft_iron: Matrix3<f32>,
    /// Hard iron offset in µT
    pub hard_iron: Vector3<f32>,
}

impl MagneticCalibration {
    /// Hard iron offset only
    pub fn with_offset(hard_iron: Vector3<f32>) -> Self {
        Self {
            soft_iron: Matrix3::identity(),
            hard_iron,
        }
    }

    /// Apply the correction to one raw reading
    pub fn apply(&self, uncalibrated: Vector3<f32>) -> Vector3<f32> {
        self.soft_iron * (uncalibrated - self.hard_iron)
    }
}

impl Default for MagneticCalibration {
    fn default() -> Self {
        Self::with_offset(Vector3::zeros())
    }
}
