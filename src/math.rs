//! Mathematical utilities and nalgebra extensions for the compass engine

use nalgebra::Vector3;

/// Mathematical constants
pub const DEG_TO_RAD: f32 = core::f32::consts::PI / 180.0;
pub const RAD_TO_DEG: f32 = 180.0 / core::f32::consts::PI;

/// Full circle in degrees
pub const MAX_ANGLE: f32 = 360.0;

/// Extension trait giving `Vector3` the in-place accumulator operations used by
/// the smoothing filter.
///
/// Every mutating method returns `&mut Self` so updates can be chained:
///
/// ```
/// use nalgebra::Vector3;
/// use fusion_compass::Vector3Ext;
///
/// let mut estimate = Vector3::new(1.0f32, 2.0, 3.0);
/// let raw = Vector3::new(10.0f32, 10.0, 10.0);
/// estimate.scale_by(0.5).accumulate(&(raw * 0.5));
/// assert_eq!(estimate, Vector3::new(5.5, 6.0, 6.5));
/// ```
pub trait Vector3Ext {
    /// Multiply all three components by `factor` in place
    fn scale_by(&mut self, factor: f32) -> &mut Self;

    /// Add `other` component-wise in place
    fn accumulate(&mut self, other: &Vector3<f32>) -> &mut Self;

    /// Multiply component-wise by `other` in place
    fn scale_components(&mut self, other: &Vector3<f32>) -> &mut Self;

    /// Normalize the vector, returning zero vector if magnitude is zero
    fn safe_normalize(&self) -> Vector3<f32>;
}

impl Vector3Ext for Vector3<f32> {
    fn scale_by(&mut self, factor: f32) -> &mut Self {
        self.x *= factor;
        self.y *= factor;
        self.z *= factor;
        self
    }

    fn accumulate(&mut self, other: &Vector3<f32>) -> &mut Self {
        self.x += other.x;
        self.y += other.y;
        self.z += other.z;
        self
    }

    fn scale_components(&mut self, other: &Vector3<f32>) -> &mut Self {
        self.x *= other.x;
        self.y *= other.y;
        self.z *= other.z;
        self
    }

    fn safe_normalize(&self) -> Vector3<f32> {
        let magnitude_squared = self.magnitude_squared();

        if magnitude_squared == 0.0 {
            return Vector3::zeros();
        }

        *self * (1.0 / magnitude_squared.sqrt())
    }
}

/// Wrap an angle in degrees into `[0, 360)`
///
/// Uses the `(angle + 360) % 360` form for inputs in `[-360, 360)` and falls
/// back to `rem_euclid` for anything further out. A result that rounds up to
/// exactly 360 in `f32` is folded back to 0.
pub fn wrap_360(angle: f32) -> f32 {
    let wrapped = if (-MAX_ANGLE..MAX_ANGLE).contains(&angle) {
        (angle + MAX_ANGLE) % MAX_ANGLE
    } else {
        angle.rem_euclid(MAX_ANGLE)
    };

    if wrapped >= MAX_ANGLE { 0.0 } else { wrapped }
}
