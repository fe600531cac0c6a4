//! Tilt-compensated orientation from smoothed gravity and geomagnetic vectors

use nalgebra::{Matrix3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::math::{RAD_TO_DEG, wrap_360};
use crate::types::{
    CompassSettings, Convention, DEFAULT_DEGENERATE_THRESHOLD, DEFAULT_FREE_FALL_THRESHOLD,
};

/// Orientation derived from one fusion cycle
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrientationSample {
    /// Heading of the forward axis in degrees, clockwise from magnetic north, in `[0, 360)`
    pub azimuth: f32,
    /// Magnitude of the smoothed geomagnetic vector in µT
    pub magnetic_field: f32,
    /// Elevation of the forward axis above the horizon in degrees
    pub pitch: f32,
    /// Bank angle in degrees, positive when the right side dips
    pub roll: f32,
    /// Magnetic dip in degrees, positive when the field points below the horizon
    pub inclination: f32,
}

/// Rotation and inclination matrices built from the two reference vectors
///
/// The rotation rows are the east, north and up directions expressed in device
/// coordinates, so `rotation * v` maps a device vector into the local
/// east-north-up frame. The inclination matrix rotates the geomagnetic vector
/// about the east axis by the dip angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationFrame {
    pub rotation: Matrix3<f32>,
    pub inclination: Matrix3<f32>,
}

impl RotationFrame {
    /// Build the frame, or `None` when the vectors cannot define one
    ///
    /// The frame is degenerate when gravity is shorter than
    /// `free_fall_threshold` (free fall or no samples yet), when
    /// `geomagnetic × gravity` is shorter than `degenerate_threshold` (field
    /// missing or parallel to gravity), or when either is not finite.
    pub fn new(
        gravity: &Vector3<f32>,
        geomagnetic: &Vector3<f32>,
        free_fall_threshold: f32,
        degenerate_threshold: f32,
    ) -> Option<Self> {
        let gravity_norm = gravity.magnitude();
        if !gravity_norm.is_finite() || gravity_norm < free_fall_threshold {
            return None;
        }

        let east = geomagnetic.cross(gravity);
        let east_norm = east.magnitude();
        if !east_norm.is_finite() || east_norm < degenerate_threshold {
            return None;
        }

        let east = east / east_norm;
        let up = gravity / gravity_norm;
        let north = up.cross(&east);

        let rotation = Matrix3::from_rows(&[east.transpose(), north.transpose(), up.transpose()]);

        // |geomagnetic| > 0 is implied by the non-zero cross product
        let inverse_field = 1.0 / geomagnetic.magnitude();
        let c = geomagnetic.dot(&north) * inverse_field;
        let s = geomagnetic.dot(&up) * inverse_field;
        #[rustfmt::skip]
        let inclination = Matrix3::new(
            1.0, 0.0, 0.0,
            0.0,   c,   s,
            0.0,  -s,   c,
        );

        Some(Self {
            rotation,
            inclination,
        })
    }

    /// Magnetic dip in radians, positive below the horizon
    pub fn dip(&self) -> f32 {
        (-self.inclination[(1, 2)]).atan2(self.inclination[(1, 1)])
    }

    /// A device-frame vector expressed in east-north-up components
    pub fn to_world(&self, device: &Vector3<f32>) -> Vector3<f32> {
        self.rotation * device
    }
}

/// Converts smoothed sensor vectors into an orientation sample
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use fusion_compass::OrientationEngine;
///
/// let engine = OrientationEngine::default();
/// let gravity = Vector3::new(0.0, 0.0, 9.8);      // lying flat
/// let geomagnetic = Vector3::new(20.0, 0.0, -40.0); // X axis toward magnetic north
///
/// let sample = engine.fuse(&gravity, &geomagnetic).unwrap();
/// assert!(sample.azimuth < 1.0 || sample.azimuth > 359.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationEngine {
    convention: Convention,
    degenerate_threshold: f32,
    free_fall_threshold: f32,
}

impl OrientationEngine {
    /// Create an engine with the default free-fall threshold
    pub fn new(convention: Convention, degenerate_threshold: f32) -> Self {
        Self {
            convention,
            degenerate_threshold,
            free_fall_threshold: DEFAULT_FREE_FALL_THRESHOLD,
        }
    }

    pub fn with_settings(settings: &CompassSettings) -> Self {
        Self {
            convention: settings.convention,
            degenerate_threshold: settings.degenerate_threshold,
            free_fall_threshold: settings.free_fall_threshold,
        }
    }

    pub fn convention(&self) -> Convention {
        self.convention
    }

    /// Fuse the two smoothed vectors into an orientation
    ///
    /// Returns `None` for a degenerate pair; callers keep their previous
    /// heading for that cycle.
    pub fn fuse(
        &self,
        gravity: &Vector3<f32>,
        geomagnetic: &Vector3<f32>,
    ) -> Option<OrientationSample> {
        let frame = RotationFrame::new(
            gravity,
            geomagnetic,
            self.free_fall_threshold,
            self.degenerate_threshold,
        )?;
        let axes = self.convention.body_axes();

        let forward = frame.to_world(&Vector3::from(axes.forward));
        let right = frame.to_world(&Vector3::from(axes.right));
        let top = frame.to_world(&Vector3::from(axes.top));

        let azimuth = wrap_360(forward.x.atan2(forward.y) * RAD_TO_DEG);
        let pitch = forward.z.clamp(-1.0, 1.0).asin() * RAD_TO_DEG;
        let roll = (-right.z).atan2(top.z) * RAD_TO_DEG;

        Some(OrientationSample {
            azimuth,
            magnetic_field: geomagnetic.magnitude(),
            pitch,
            roll,
            inclination: frame.dip() * RAD_TO_DEG,
        })
    }
}

impl Default for OrientationEngine {
    fn default() -> Self {
        Self::new(Convention::default(), DEFAULT_DEGENERATE_THRESHOLD)
    }
}
