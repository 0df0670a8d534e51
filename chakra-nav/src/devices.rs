//! Startup binding of named devices.
//!
//! Sensors and wheel motors are required; a missing one aborts startup.
//! Indicators are optional and skipped when absent.

use crate::config::DeviceNames;
use crate::error::{NavError, Result};
use crate::platform::{DeviceHandle, DeviceKind, Platform};
use crate::state::PROXIMITY_SENSORS;

/// Handles for every device the controller drives.
#[derive(Clone, Debug)]
pub struct DeviceBindings {
    /// Proximity sensors in ring order
    pub proximity: [DeviceHandle; PROXIMITY_SENSORS],
    pub left_motor: DeviceHandle,
    pub right_motor: DeviceHandle,
    /// Indicators that were found; may be empty
    pub indicators: Vec<DeviceHandle>,
}

impl DeviceBindings {
    /// Look up every configured device once.
    pub fn bind<P: Platform + ?Sized>(platform: &P, names: &DeviceNames) -> Result<Self> {
        if names.proximity_sensors.len() != PROXIMITY_SENSORS {
            return Err(NavError::Config(format!(
                "expected {} proximity sensor names, got {}",
                PROXIMITY_SENSORS,
                names.proximity_sensors.len()
            )));
        }

        let mut proximity = [DeviceHandle(0); PROXIMITY_SENSORS];
        for (slot, name) in proximity.iter_mut().zip(&names.proximity_sensors) {
            *slot = require(platform, name, DeviceKind::ProximitySensor)?;
        }

        let left_motor = require(platform, &names.left_motor, DeviceKind::WheelMotor)?;
        let right_motor = require(platform, &names.right_motor, DeviceKind::WheelMotor)?;

        let mut indicators = Vec::with_capacity(names.indicators.len());
        for name in &names.indicators {
            match platform.find_device(name, DeviceKind::Indicator) {
                Some(handle) => indicators.push(handle),
                None => tracing::debug!("Indicator '{}' not present, skipping", name),
            }
        }

        tracing::info!(
            "Bound {} proximity sensors, 2 wheel motors, {}/{} indicators",
            PROXIMITY_SENSORS,
            indicators.len(),
            names.indicators.len()
        );

        Ok(Self {
            proximity,
            left_motor,
            right_motor,
            indicators,
        })
    }
}

fn require<P: Platform + ?Sized>(
    platform: &P,
    name: &str,
    kind: DeviceKind,
) -> Result<DeviceHandle> {
    platform
        .find_device(name, kind)
        .ok_or_else(|| NavError::MissingDevice {
            name: name.to_string(),
            kind,
        })
}
