//! [![github]](https://github.com/wboayue/fusion-compass)&ensp;[![crates-io]](https://crates.io/crates/fusion-compass)&ensp;[![license]](https://opensource.org/licenses/MIT)
//!
//! [github]: https://img.shields.io/badge/github-8da0cb?style=for-the-badge&labelColor=555555&logo=github
//! [crates-io]: https://img.shields.io/badge/crates.io-fc8d62?style=for-the-badge&labelColor=555555&logo=rust
//! [license]: https://img.shields.io/badge/License-MIT-blue.svg?style=for-the-badge&labelColor=555555
//!
//! Fusion Compass - accelerometer and magnetometer fusion for compass headings
//!
//! This library turns raw accelerometer and magnetometer samples into a stable
//! magnetic heading, an eight-point compass direction, field strength and, from
//! a location fix, magnetic declination. It is the numeric core behind a compass
//! display: a presentation layer feeds samples in and receives plain values out.
//!
//! # Features
//!
//! - Exponential smoothing of raw sensor vectors
//! - Tilt-compensated azimuth from a gravity/geomagnetic rotation frame
//! - Pitch, roll and magnetic dip alongside the heading
//! - Eight-point direction lookup
//! - Declination from the World Magnetic Model
//! - Hard and soft iron magnetometer correction
//! - Thread-safe engine with builder-injected listeners
//!
//! # Quick Start
//!
//! ```rust
//! use fusion_compass::{CompassEngine, DirectionClassifier};
//!
//! let engine = CompassEngine::builder()
//!     .on_heading(|update| println!("{:.1}° {:.0} µT", update.azimuth, update.magnetic_field))
//!     .build()
//!     .unwrap();
//!
//! // Sensor callbacks
//! for _ in 0..100 {
//!     engine.on_accelerometer_sample(0.0, 0.0, 9.8);   // m/s²
//!     engine.on_magnetometer_sample(20.0, 0.0, -40.0); // µT
//! }
//!
//! let sample = engine.last_sample().unwrap();
//! let direction = DirectionClassifier::new().classify_azimuth(sample.azimuth);
//! println!("Heading {} ({})", sample.azimuth, direction.full_name());
//! ```
//!
//! The default [`Convention::Nwu`] measures heading along the sensor X axis.
//! Samples straight from a phone or tablet use handset axes, so set
//! [`Convention::Enu`] in [`CompassSettings`] to match `getOrientation` there.
//!
//! For more documentation and examples, see: <https://github.com/wboayue/fusion-compass>

pub mod calibration;
pub mod declination;
pub mod direction;
mod engine;
mod error;
pub mod field;
mod math;
pub mod orientation;
pub mod smoothing;
mod types;

// Re-export all public types and functions
pub use calibration::MagneticCalibration;
pub use declination::{DeclinationResolver, LocationSample, true_azimuth};
pub use direction::{Direction, DirectionClassifier};
pub use engine::{CompassEngine, CompassEngineBuilder, HeadingUpdate};
pub use error::{CompassError, DeclinationError};
pub use field::FieldStrengthGauge;
pub use math::{DEG_TO_RAD, MAX_ANGLE, RAD_TO_DEG, Vector3Ext, wrap_360};
pub use orientation::{OrientationEngine, OrientationSample, RotationFrame};
pub use smoothing::{SmoothingFilter, SmoothingState};
pub use types::*;
