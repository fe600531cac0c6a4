//! Magnetic declination from the World Magnetic Model

use world_magnetic_model::GeomagneticField;
use world_magnetic_model::time::OffsetDateTime;
use world_magnetic_model::uom::si::angle::degree;
use world_magnetic_model::uom::si::f32::{Angle, Length};
use world_magnetic_model::uom::si::length::meter;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::DeclinationError;
use crate::math::{DEG_TO_RAD, RAD_TO_DEG, wrap_360};

const NANOS_PER_MILLI: i128 = 1_000_000;

/// A geodetic fix from the location provider
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LocationSample {
    /// Degrees, positive north
    pub latitude: f64,
    /// Degrees, positive east
    pub longitude: f64,
    /// Metres above the WGS84 ellipsoid
    pub altitude: f64,
    /// Unix time in milliseconds
    pub timestamp_millis: i64,
}

impl LocationSample {
    pub fn new(latitude: f64, longitude: f64, altitude: f64, timestamp_millis: i64) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
            timestamp_millis,
        }
    }

    /// Reject coordinates the geomagnetic model must never be asked about
    pub fn validate(&self) -> Result<(), DeclinationError> {
        if !self.latitude.is_finite() {
            return Err(DeclinationError::NonFinite("latitude"));
        }
        if !self.longitude.is_finite() {
            return Err(DeclinationError::NonFinite("longitude"));
        }
        if !self.altitude.is_finite() {
            return Err(DeclinationError::NonFinite("altitude"));
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(DeclinationError::LatitudeOutOfRange(self.latitude));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(DeclinationError::LongitudeOutOfRange(self.longitude));
        }
        Ok(())
    }
}

/// Resolves the angle between magnetic and true north
///
/// Stateless; every call evaluates the model afresh.
///
/// # Example
/// ```
/// use fusion_compass::{DeclinationResolver, LocationSample};
///
/// let resolver = DeclinationResolver::new();
/// // Warsaw, 1 June 2026
/// let warsaw = LocationSample::new(52.23, 21.01, 100.0, 1_780_272_000_000);
/// let declination = resolver.declination(&warsaw).unwrap();
/// assert!(declination > 0.0); // east of true north
///
/// let invalid = LocationSample::new(95.0, 21.01, 100.0, 1_780_272_000_000);
/// assert!(resolver.declination(&invalid).is_err());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclinationResolver;

impl DeclinationResolver {
    pub fn new() -> Self {
        Self
    }

    /// Declination in radians, positive when magnetic north lies east of true north
    pub fn declination(&self, location: &LocationSample) -> Result<f32, DeclinationError> {
        Ok(self.declination_degrees(location)? * DEG_TO_RAD)
    }

    /// Declination in degrees, positive east
    pub fn declination_degrees(&self, location: &LocationSample) -> Result<f32, DeclinationError> {
        location.validate()?;

        let nanos = i128::from(location.timestamp_millis) * NANOS_PER_MILLI;
        let date = OffsetDateTime::from_unix_timestamp_nanos(nanos)
            .map_err(|_| DeclinationError::TimestampOutOfRange(location.timestamp_millis))?
            .date();

        let field = GeomagneticField::new(
            Length::new::<meter>(location.altitude as f32),
            Angle::new::<degree>(location.latitude as f32),
            Angle::new::<degree>(location.longitude as f32),
            date,
        )
        .map_err(|e| DeclinationError::ModelOutOfRange(format!("{e:?}")))?;

        Ok(field.declination().get::<degree>())
    }
}

/// Convert a magnetic azimuth in degrees to a true azimuth in `[0, 360)`
///
/// # Example
/// ```
/// use fusion_compass::true_azimuth;
///
/// let declination = 10.0f32.to_radians();
/// assert!((true_azimuth(355.0, declination) - 5.0).abs() < 1e-3);
/// ```
pub fn true_azimuth(magnetic_azimuth: f32, declination: f32) -> f32 {
    wrap_360(magnetic_azimuth + declination * RAD_TO_DEG)
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1 June 2026, 00:00 UTC
    const JUNE_2026: i64 = 1_780_272_000_000;

    #[test]
    fn test_declination_is_stable() {
        let resolver = DeclinationResolver::new();
        let boulder = LocationSample::new(40.015, -105.27, 1655.0, JUNE_2026);

        let first = resolver.declination(&boulder).unwrap();
        for _ in 0..10 {
            assert_eq!(resolver.declination(&boulder).unwrap(), first);
        }
    }

    #[test]
    fn test_declination_is_radians() {
        let resolver = DeclinationResolver::new();
        let boulder = LocationSample::new(40.015, -105.27, 1655.0, JUNE_2026);

        let degrees = resolver.declination_degrees(&boulder).unwrap();
        let radians = resolver.declination(&boulder).unwrap();
        assert!((radians - degrees.to_radians()).abs() < 1e-6);
        // Colorado sits a few degrees east of the agonic line
        assert!((5.0..10.0).contains(&degrees), "declination {}°", degrees);
    }

    #[test]
    fn test_invalid_coordinates_are_rejected() {
        let resolver = DeclinationResolver::new();

        let cases = [
            (
                LocationSample::new(90.5, 0.0, 0.0, JUNE_2026),
                DeclinationError::LatitudeOutOfRange(90.5),
            ),
            (
                LocationSample::new(-91.0, 0.0, 0.0, JUNE_2026),
                DeclinationError::LatitudeOutOfRange(-91.0),
            ),
            (
                LocationSample::new(0.0, 181.0, 0.0, JUNE_2026),
                DeclinationError::LongitudeOutOfRange(181.0),
            ),
            (
                LocationSample::new(f64::NAN, 0.0, 0.0, JUNE_2026),
                DeclinationError::NonFinite("latitude"),
            ),
            (
                LocationSample::new(0.0, 0.0, f64::INFINITY, JUNE_2026),
                DeclinationError::NonFinite("altitude"),
            ),
        ];

        for (location, expected) in cases {
            assert_eq!(resolver.declination(&location), Err(expected));
        }
    }

    #[test]
    fn test_unrepresentable_timestamp() {
        let resolver = DeclinationResolver::new();
        let location = LocationSample::new(0.0, 0.0, 0.0, i64::MAX);
        assert_eq!(
            resolver.declination(&location),
            Err(DeclinationError::TimestampOutOfRange(i64::MAX))
        );
    }

    #[test]
    fn test_true_azimuth_wraps() {
        let east = 12.0f32.to_radians();
        let west = -12.0f32.to_radians();
        assert!((true_azimuth(90.0, east) - 102.0).abs() < 1e-3);
        assert!((true_azimuth(355.0, east) - 7.0).abs() < 1e-3);
        assert!((true_azimuth(5.0, west) - 353.0).abs() < 1e-3);
    }
}
