//! Thread-safe compass engine fed by sensor and location callbacks

use std::sync::{Mutex, MutexGuard, PoisonError};

use nalgebra::Vector3;
use tracing::{debug, info, trace, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::declination::{DeclinationResolver, LocationSample};
use crate::direction::{Direction, DirectionClassifier};
use crate::error::{CompassError, DeclinationError};
use crate::orientation::{OrientationEngine, OrientationSample};
use crate::smoothing::SmoothingState;
use crate::types::{CompassSettings, SensorAccuracy, SensorAvailability, SensorKind};

/// Heading published after every successful fusion cycle
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HeadingUpdate {
    /// Degrees clockwise from magnetic north, in `[0, 360)`
    pub azimuth: f32,
    /// Smoothed field strength in µT, or 0 when the cycle was triggered by
    /// an accelerometer sample
    pub magnetic_field: f32,
}

type HeadingListener = Box<dyn Fn(HeadingUpdate) + Send + Sync>;
type DirectionListener = Box<dyn Fn(Direction) + Send + Sync>;
type AccuracyListener = Box<dyn Fn(SensorAccuracy) + Send + Sync>;
type DeclinationListener = Box<dyn Fn(f32) + Send + Sync>;

#[derive(Default)]
struct Listeners {
    heading: Option<HeadingListener>,
    direction: Option<DirectionListener>,
    accuracy: Option<AccuracyListener>,
    declination: Option<DeclinationListener>,
}

/// Builder for [`CompassEngine`]
///
/// Listeners are fixed at construction; the engine never swaps them while
/// samples are being delivered.
#[derive(Default)]
pub struct CompassEngineBuilder {
    settings: CompassSettings,
    availability: SensorAvailability,
    listeners: Listeners,
}

impl CompassEngineBuilder {
    pub fn settings(mut self, settings: CompassSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Sensors the host device reports
    pub fn sensors(mut self, availability: SensorAvailability) -> Self {
        self.availability = availability;
        self
    }

    /// Called with every new heading, under the fusion lock
    pub fn on_heading<F>(mut self, listener: F) -> Self
    where
        F: Fn(HeadingUpdate) + Send + Sync + 'static,
    {
        self.listeners.heading = Some(Box::new(listener));
        self
    }

    /// Called with the compass point of every new heading
    pub fn on_direction<F>(mut self, listener: F) -> Self
    where
        F: Fn(Direction) + Send + Sync + 'static,
    {
        self.listeners.direction = Some(Box::new(listener));
        self
    }

    /// Called when the magnetometer reports a new accuracy
    pub fn on_accuracy<F>(mut self, listener: F) -> Self
    where
        F: Fn(SensorAccuracy) + Send + Sync + 'static,
    {
        self.listeners.accuracy = Some(Box::new(listener));
        self
    }

    /// Called with the declination in radians for every accepted location
    pub fn on_declination<F>(mut self, listener: F) -> Self
    where
        F: Fn(f32) + Send + Sync + 'static,
    {
        self.listeners.declination = Some(Box::new(listener));
        self
    }

    /// Validate the configuration and create the engine
    pub fn build(self) -> Result<CompassEngine, CompassError> {
        if let Some(kind) = self.availability.missing() {
            return Err(CompassError::MissingSensor(kind));
        }

        let settings = self.settings;
        let alpha = settings.smoothing_factor;
        if !(0.0..1.0).contains(&alpha) {
            return Err(CompassError::InvalidSettings {
                name: "smoothing_factor",
                value: alpha,
                expected: "a value in [0, 1)",
            });
        }

        let thresholds = [
            ("degenerate_threshold", settings.degenerate_threshold),
            ("free_fall_threshold", settings.free_fall_threshold),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() || value < 0.0 {
                return Err(CompassError::InvalidSettings {
                    name,
                    value,
                    expected: "a finite value >= 0",
                });
            }
        }

        info!(
            convention = ?settings.convention,
            smoothing_factor = alpha,
            degenerate_threshold = settings.degenerate_threshold,
            free_fall_threshold = settings.free_fall_threshold,
            calibrated = settings.magnetic_calibration.is_some(),
            "compass engine ready"
        );

        Ok(CompassEngine {
            settings,
            orientation: OrientationEngine::with_settings(&settings),
            classifier: DirectionClassifier::new(),
            resolver: DeclinationResolver::new(),
            fusion: Mutex::new(FusionState {
                smoothing: SmoothingState::new(alpha),
                last_sample: None,
            }),
            location: Mutex::new(LocationState { declination: None }),
            listeners: self.listeners,
        })
    }
}

struct FusionState {
    smoothing: SmoothingState,
    last_sample: Option<OrientationSample>,
}

struct LocationState {
    declination: Option<f32>,
}

/// Compass engine fusing accelerometer and magnetometer samples
///
/// Samples may arrive from any thread and in any interleaving. One lock
/// covers the filter update and the fusion that reads both estimates, so a
/// heading is never derived from a half-updated pair. Location samples use a
/// separate lock and never wait on sensor fusion.
///
/// Heading and direction listeners run on the sampling thread while the
/// fusion lock is held, so they observe headings in the order they were
/// fused. They must return quickly and must not feed samples back into the
/// same engine; hop to a UI or worker thread from inside the listener instead.
///
/// # Example
/// ```
/// use std::sync::{Arc, Mutex};
/// use fusion_compass::{CompassEngine, Direction};
///
/// let seen = Arc::new(Mutex::new(None));
/// let sink = Arc::clone(&seen);
/// let engine = CompassEngine::builder()
///     .on_direction(move |direction| *sink.lock().unwrap() = Some(direction))
///     .build()
///     .unwrap();
///
/// for _ in 0..200 {
///     engine.on_accelerometer_sample(0.0, 0.0, 9.8);
///     engine.on_magnetometer_sample(20.0, 0.0, -40.0);
/// }
///
/// assert_eq!(*seen.lock().unwrap(), Some(Direction::North));
/// ```
pub struct CompassEngine {
    settings: CompassSettings,
    orientation: OrientationEngine,
    classifier: DirectionClassifier,
    resolver: DeclinationResolver,
    fusion: Mutex<FusionState>,
    location: Mutex<LocationState>,
    listeners: Listeners,
}

impl CompassEngine {
    pub fn builder() -> CompassEngineBuilder {
        CompassEngineBuilder::default()
    }

    pub fn settings(&self) -> CompassSettings {
        self.settings
    }

    /// Feed a raw accelerometer sample
    pub fn on_accelerometer_sample(&self, x: f32, y: f32, z: f32) -> Option<HeadingUpdate> {
        self.on_raw_sample(SensorKind::Accelerometer, Vector3::new(x, y, z))
    }

    /// Feed a raw magnetometer sample in µT
    pub fn on_magnetometer_sample(&self, x: f32, y: f32, z: f32) -> Option<HeadingUpdate> {
        self.on_raw_sample(SensorKind::Magnetometer, Vector3::new(x, y, z))
    }

    /// Smooth one raw sample and, if the frame is usable, publish a heading
    ///
    /// Returns `None` when the cycle was skipped because the smoothed vectors
    /// could not define a frame; the previous heading stays current.
    pub fn on_raw_sample(&self, kind: SensorKind, raw: Vector3<f32>) -> Option<HeadingUpdate> {
        let raw = match (kind, &self.settings.magnetic_calibration) {
            (SensorKind::Magnetometer, Some(calibration)) => calibration.apply(raw),
            _ => raw,
        };

        // A single NaN would stay in the estimate forever
        if !raw.iter().all(|component| component.is_finite()) {
            warn!(sensor = %kind, x = raw.x, y = raw.y, z = raw.z, "discarding non-finite sample");
            return None;
        }

        let mut state = lock(&self.fusion);
        state.smoothing.update(kind, raw);

        let Some(sample) = self
            .orientation
            .fuse(&state.smoothing.gravity(), &state.smoothing.geomagnetic())
        else {
            trace!(sensor = %kind, "degenerate frame, skipping fusion cycle");
            return None;
        };
        state.last_sample = Some(sample);

        let update = HeadingUpdate {
            azimuth: sample.azimuth,
            magnetic_field: match kind {
                SensorKind::Magnetometer => sample.magnetic_field,
                SensorKind::Accelerometer => 0.0,
            },
        };

        // Published while still locked so listeners see headings in fusion order
        if let Some(listener) = &self.listeners.heading {
            listener(update);
        }
        if let Some(listener) = &self.listeners.direction {
            listener(self.classifier.classify_azimuth(update.azimuth));
        }

        Some(update)
    }

    /// Forward an accuracy change; only magnetometer accuracy is reported
    pub fn on_accuracy_changed(&self, kind: SensorKind, accuracy: SensorAccuracy) {
        if kind != SensorKind::Magnetometer {
            return;
        }

        debug!(sensor = %kind, level = accuracy.level(), "sensor accuracy changed");

        if let Some(listener) = &self.listeners.accuracy {
            listener(accuracy);
        }
    }

    /// Resolve and publish the declination for a location fix
    ///
    /// Invalid coordinates are returned as an error and nothing is published.
    pub fn on_location_sample(&self, location: LocationSample) -> Result<f32, DeclinationError> {
        let declination = match self.resolver.declination(&location) {
            Ok(declination) => declination,
            Err(e) => {
                warn!(error = %e, "rejected location sample");
                return Err(e);
            }
        };

        let mut state = lock(&self.location);
        state.declination = Some(declination);

        debug!(
            latitude = location.latitude,
            longitude = location.longitude,
            declination,
            "declination updated"
        );
        if let Some(listener) = &self.listeners.declination {
            listener(declination);
        }

        Ok(declination)
    }

    /// Most recent successful fusion result
    pub fn last_sample(&self) -> Option<OrientationSample> {
        lock(&self.fusion).last_sample
    }

    /// Current smoothed gravity and geomagnetic estimates, read together
    pub fn smoothed(&self) -> (Vector3<f32>, Vector3<f32>) {
        let state = lock(&self.fusion);
        (state.smoothing.gravity(), state.smoothing.geomagnetic())
    }

    /// Declination in radians from the last accepted location
    pub fn last_declination(&self) -> Option<f32> {
        lock(&self.location).declination
    }
}

/// Every update writes whole vectors, so state behind a poisoned lock is
/// still consistent.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
