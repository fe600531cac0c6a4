//! Error types for the compass engine

use thiserror::Error;

use crate::types::SensorKind;

/// Errors raised while building a [`CompassEngine`](crate::CompassEngine)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompassError {
    #[error("required {0} is not available on this device")]
    MissingSensor(SensorKind),
    #[error("invalid setting `{name}`: {value} (expected {expected})")]
    InvalidSettings {
        name: &'static str,
        value: f32,
        expected: &'static str,
    },
}

/// Errors raised while resolving magnetic declination
///
/// All of these are input validation failures: callers must not substitute a
/// default declination.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeclinationError {
    #[error("latitude {0}° outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0}° outside [-180, 180]")]
    LongitudeOutOfRange(f64),
    #[error("{0} is not a finite number")]
    NonFinite(&'static str),
    #[error("timestamp {0} ms cannot be represented as a calendar date")]
    TimestampOutOfRange(i64),
    #[error("geomagnetic model cannot resolve this location and time: {0}")]
    ModelOutOfRange(String),
}
