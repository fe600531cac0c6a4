use std::error::Error;
use std::f32::consts::PI;
use std::sync::Mutex;

use fusion_compass::{
    CompassEngine, DirectionClassifier, FieldStrengthGauge, LocationSample, true_azimuth,
};
use tracing::info;

// 1 June 2026, 00:00 UTC
const TIMESTAMP_MILLIS: i64 = 1_780_272_000_000;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "simple=info,fusion_compass=debug".into()),
        )
        .init();

    let gauge = Mutex::new(FieldStrengthGauge::new());

    let engine = CompassEngine::builder()
        .on_direction(|direction| {
            tracing::trace!(%direction, "direction");
        })
        .on_heading(move |update| {
            if update.magnetic_field > 0.0 {
                if let Ok(mut gauge) = gauge.lock() {
                    gauge.update(update.magnetic_field);
                }
            }
        })
        .on_declination(|declination| {
            info!("declination {:.2}°", declination.to_degrees());
        })
        .build()?;

    // Oslo
    let declination =
        engine.on_location_sample(LocationSample::new(59.91, 10.75, 20.0, TIMESTAMP_MILLIS))?;

    let classifier = DirectionClassifier::new();
    let sample_rate = 50.0; // Hz

    // Turn slowly through a full circle while lying flat
    for i in 0..1000 {
        let t = i as f32 / sample_rate;
        let heading = (t / 20.0) * 2.0 * PI;

        engine.on_accelerometer_sample(0.0, 0.0, 9.81);
        let update = engine.on_magnetometer_sample(
            20.0 * heading.cos(),
            20.0 * heading.sin(),
            -40.0,
        );

        if i % 50 == 0 {
            if let Some(update) = update {
                let direction = classifier.classify_azimuth(update.azimuth);
                println!(
                    "t={:5.2}s magnetic={:6.1}° true={:6.1}° {:<10} field={:5.1} µT",
                    t,
                    update.azimuth,
                    true_azimuth(update.azimuth, declination),
                    direction.full_name(),
                    update.magnetic_field
                );
            }
        }
    }

    if let Some(sample) = engine.last_sample() {
        println!(
            "pitch={:.1}° roll={:.1}° inclination={:.1}°",
            sample.pitch, sample.roll, sample.inclination
        );
    }

    Ok(())
}
