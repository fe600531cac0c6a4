//! Exponential smoothing of raw sensor vectors

use nalgebra::Vector3;

use crate::math::Vector3Ext;
use crate::types::{DEFAULT_SMOOTHING_FACTOR, SensorKind};

/// Single-pole exponential low-pass filter over a 3-axis stream
///
/// Each raw sample `R` moves the running estimate `S` by
/// `S = S * alpha + R * (1 - alpha)`. The estimate starts at the zero vector,
/// so the first `1 / (1 - alpha)` samples carry a bias toward zero.
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use fusion_compass::SmoothingFilter;
///
/// let mut filter = SmoothingFilter::new(0.5);
/// filter.update(Vector3::new(2.0, 4.0, 8.0));
/// assert_eq!(filter.estimate(), Vector3::new(1.0, 2.0, 4.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothingFilter {
    alpha: f32,
    estimate: Vector3<f32>,
}

impl SmoothingFilter {
    /// Create a filter with the given weight on the previous estimate
    pub fn new(alpha: f32) -> Self {
        Self {
            alpha,
            estimate: Vector3::zeros(),
        }
    }

    /// Fold one raw sample into the estimate and return the new estimate
    pub fn update(&mut self, raw: Vector3<f32>) -> Vector3<f32> {
        let mut weighted = raw;
        weighted.scale_by(1.0 - self.alpha);
        self.estimate.scale_by(self.alpha).accumulate(&weighted);
        self.estimate
    }

    /// Current smoothed estimate
    pub fn estimate(&self) -> Vector3<f32> {
        self.estimate
    }

    /// Smoothing factor
    pub fn alpha(&self) -> f32 {
        self.alpha
    }
}

impl Default for SmoothingFilter {
    fn default() -> Self {
        Self::new(DEFAULT_SMOOTHING_FACTOR)
    }
}

/// Smoothed gravity and geomagnetic estimates of one engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothingState {
    gravity: SmoothingFilter,
    geomagnetic: SmoothingFilter,
}

impl SmoothingState {
    pub fn new(alpha: f32) -> Self {
        Self {
            gravity: SmoothingFilter::new(alpha),
            geomagnetic: SmoothingFilter::new(alpha),
        }
    }

    /// Route a raw sample to the filter for its sensor
    pub fn update(&mut self, kind: SensorKind, raw: Vector3<f32>) -> Vector3<f32> {
        match kind {
            SensorKind::Accelerometer => self.gravity.update(raw),
            SensorKind::Magnetometer => self.geomagnetic.update(raw),
        }
    }

    /// Smoothed accelerometer reading
    pub fn gravity(&self) -> Vector3<f32> {
        self.gravity.estimate()
    }

    /// Smoothed magnetometer reading
    pub fn geomagnetic(&self) -> Vector3<f32> {
        self.geomagnetic.estimate()
    }
}

impl Default for SmoothingState {
    fn default() -> Self {
        Self::new(DEFAULT_SMOOTHING_FACTOR)
    }
}
