//! Core types and settings for the compass engine

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::calibration::MagneticCalibration;

/// Default exponential smoothing factor applied to raw sensor samples
pub const DEFAULT_SMOOTHING_FACTOR: f32 = 0.97;

/// Default minimum magnitude of `geomagnetic × gravity` for a usable frame
pub const DEFAULT_DEGENERATE_THRESHOLD: f32 = 0.1;

/// Standard gravity in m/s²
pub const STANDARD_GRAVITY: f32 = 9.81;

/// Default minimum gravity magnitude, a tenth of standard gravity
///
/// Anything shorter is treated as free fall.
pub const DEFAULT_FREE_FALL_THRESHOLD: f32 = 0.1 * STANDARD_GRAVITY;

/// Device body axes convention
///
/// Describes how the sensor axes sit on the device, which decides the axis
/// the heading is measured along. All conventions are right-handed.
///
/// The default `Nwu` measures heading along +X. Phones and tablets report
/// samples in `Enu` axes; pick `Enu` there to get the same azimuth a
/// handset's `getOrientation` reports. The same raw input reads
/// differently under the two: gravity (0, 0, 9.8) with field (20, 0, -40)
/// is north under `Nwu` and west (270°) under `Enu`.
///
/// # Conventions
/// - **NWU**: X forward, Y left, Z up (heading follows +X)
/// - **ENU**: X right, Y forward, Z up (handset axes, heading follows +Y)
/// - **NED**: X forward, Y right, Z down (heading follows +X)
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use fusion_compass::{CompassSettings, Convention, OrientationEngine};
///
/// let settings = CompassSettings {
///     convention: Convention::Enu,
///     ..Default::default()
/// };
/// assert_eq!(settings.smoothing_factor, 0.97);
///
/// let gravity = Vector3::new(0.0, 0.0, 9.8);
/// let geomagnetic = Vector3::new(20.0, 0.0, -40.0);
/// let handset = OrientationEngine::with_settings(&settings).fuse(&gravity, &geomagnetic).unwrap();
/// let body = OrientationEngine::default().fuse(&gravity, &geomagnetic).unwrap();
/// assert!((handset.azimuth - 270.0).abs() < 0.01);
/// assert!(body.azimuth < 0.01 || body.azimuth > 359.99);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Convention {
    /// X forward, Y left, Z up
    #[default]
    Nwu,
    /// X right, Y forward, Z up
    ///
    /// Matches the axes phones and tablets report samples in.
    Enu,
    /// X forward, Y right, Z down
    Ned,
}

/// Unit vectors of the device body axes for a convention
pub(crate) struct BodyAxes {
    pub forward: [f32; 3],
    pub right: [f32; 3],
    pub top: [f32; 3],
}

impl Convention {
    pub(crate) fn body_axes(self) -> BodyAxes {
        match self {
            Convention::Nwu => BodyAxes {
                forward: [1.0, 0.0, 0.0],
                right: [0.0, -1.0, 0.0],
                top: [0.0, 0.0, 1.0],
            },
            Convention::Enu => BodyAxes {
                forward: [0.0, 1.0, 0.0],
                right: [1.0, 0.0, 0.0],
                top: [0.0, 0.0, 1.0],
            },
            Convention::Ned => BodyAxes {
                forward: [1.0, 0.0, 0.0],
                right: [0.0, 1.0, 0.0],
                top: [0.0, 0.0, -1.0],
            },
        }
    }
}

/// Compass engine settings
///
/// Configuration parameters for the engine. Validated when the engine is built.
///
/// # Example
/// ```
/// use fusion_compass::{CompassSettings, Convention};
///
/// let settings = CompassSettings {
///     convention: Convention::Ned,
///     smoothing_factor: 0.9,       // Faster response, more jitter
///     degenerate_threshold: 0.05,
///     free_fall_threshold: 0.5,
///     magnetic_calibration: None,
/// };
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CompassSettings {
    /// Device body axes convention
    pub convention: Convention,
    /// Weight of the previous estimate in the exponential filter (α)
    ///
    /// Must lie in `[0, 1)`. Higher values smooth more but converge slower;
    /// a constant input takes roughly `1 / (1 - α)` samples to settle.
    pub smoothing_factor: f32,
    /// Minimum magnitude of the `geomagnetic × gravity` cross product for a
    /// frame to be usable
    ///
    /// Below this the field is missing or too close to parallel with gravity
    /// and the fusion cycle is skipped.
    pub degenerate_threshold: f32,
    /// Minimum magnitude of the gravity estimate in m/s²
    ///
    /// Below this the device is in free fall, or the filter has not warmed up
    /// yet, and the fusion cycle is skipped.
    pub free_fall_threshold: f32,
    /// Optional hard/soft iron correction applied to raw magnetometer samples
    pub magnetic_calibration: Option<MagneticCalibration>,
}

impl Default for CompassSettings {
    fn default() -> Self {
        Self {
            convention: Convention::default(),
            smoothing_factor: DEFAULT_SMOOTHING_FACTOR,
            degenerate_threshold: DEFAULT_DEGENERATE_THRESHOLD,
            free_fall_threshold: DEFAULT_FREE_FALL_THRESHOLD,
            magnetic_calibration: None,
        }
    }
}

/// Physical sensors the engine consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SensorKind {
    Accelerometer,
    Magnetometer,
}

impl core::fmt::Display for SensorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SensorKind::Accelerometer => f.write_str("accelerometer"),
            SensorKind::Magnetometer => f.write_str("magnetometer"),
        }
    }
}

/// Which sensors the host device provides
///
/// Passed to the engine builder; a missing sensor fails construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorAvailability {
    pub accelerometer: bool,
    pub magnetometer: bool,
}

impl SensorAvailability {
    /// Both sensors present
    pub const fn all() -> Self {
        Self {
            accelerometer: true,
            magnetometer: true,
        }
    }

    /// First sensor the engine needs but the host lacks
    pub fn missing(&self) -> Option<SensorKind> {
        if !self.accelerometer {
            Some(SensorKind::Accelerometer)
        } else if !self.magnetometer {
            Some(SensorKind::Magnetometer)
        } else {
            None
        }
    }
}

impl Default for SensorAvailability {
    fn default() -> Self {
        Self::all()
    }
}

/// Reported sensor accuracy
///
/// Levels follow the platform status codes 0 to 3. Unknown codes map to
/// `Unreliable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SensorAccuracy {
    #[default]
    Unreliable,
    Low,
    Medium,
    High,
}

impl From<i32> for SensorAccuracy {
    fn from(status: i32) -> Self {
        match status {
            1 => SensorAccuracy::Low,
            2 => SensorAccuracy::Medium,
            3 => SensorAccuracy::High,
            _ => SensorAccuracy::Unreliable,
        }
    }
}

impl SensorAccuracy {
    /// Status code in `0..=3`
    pub fn level(self) -> u8 {
        match self {
            SensorAccuracy::Unreliable => 0,
            SensorAccuracy::Low => 1,
            SensorAccuracy::Medium => 2,
            SensorAccuracy::High => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = CompassSettings::default();
        assert_eq!(settings.convention, Convention::Nwu);
        assert_eq!(settings.smoothing_factor, 0.97);
        assert_eq!(settings.degenerate_threshold, 0.1);
        assert!((settings.free_fall_threshold - 0.981).abs() < 1e-6);
        assert!(settings.magnetic_calibration.is_none());
    }

    #[test]
    fn test_body_axes_are_right_handed() {
        for convention in [Convention::Nwu, Convention::Enu, Convention::Ned] {
            let axes = convention.body_axes();
            let forward = nalgebra::Vector3::from(axes.forward);
            let right = nalgebra::Vector3::from(axes.right);
            let top = nalgebra::Vector3::from(axes.top);
            // forward × right points down out of the device
            assert_eq!(forward.cross(&right), -top, "{:?}", convention);
        }
    }

    #[test]
    fn test_sensor_availability() {
        assert_eq!(SensorAvailability::all().missing(), None);
        let no_mag = SensorAvailability {
            accelerometer: true,
            magnetometer: false,
        };
        assert_eq!(no_mag.missing(), Some(SensorKind::Magnetometer));
        let none = SensorAvailability {
            accelerometer: false,
            magnetometer: false,
        };
        assert_eq!(none.missing(), Some(SensorKind::Accelerometer));
    }

    #[test]
    fn test_accuracy_from_status() {
        assert_eq!(SensorAccuracy::from(0), SensorAccuracy::Unreliable);
        assert_eq!(SensorAccuracy::from(1), SensorAccuracy::Low);
        assert_eq!(SensorAccuracy::from(2), SensorAccuracy::Medium);
        assert_eq!(SensorAccuracy::from(3), SensorAccuracy::High);
        assert_eq!(SensorAccuracy::from(-1), SensorAccuracy::Unreliable);
        assert_eq!(SensorAccuracy::from(7), SensorAccuracy::Unreliable);
        assert_eq!(SensorAccuracy::High.level(), 3);
    }
}
