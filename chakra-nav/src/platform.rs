//! Host platform abstraction.

use std::fmt;
use std::time::Duration;

/// Device categories the controller binds at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceKind {
    ProximitySensor,
    WheelMotor,
    Indicator,
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeviceKind::ProximitySensor => "proximity sensor",
            DeviceKind::WheelMotor => "wheel motor",
            DeviceKind::Indicator => "indicator",
        };
        f.write_str(name)
    }
}

/// Opaque platform-assigned handle for a bound device.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DeviceHandle(pub usize);

/// Result of advancing the platform by one control interval.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// Time advanced; sensors hold fresh values
    Continue,
    /// The run is over (simulation ended, shutdown requested)
    Ended,
}

/// Trait for the robot (or simulator) the controller runs on.
///
/// Implement this trait to connect the controller to hardware or a
/// simulation environment. Devices are looked up once by name; the returned
/// handles are then used for every read and write.
///
/// # Example
///
/// ```ignore
/// impl Platform for MyRobot {
///     fn find_device(&self, name: &str, kind: DeviceKind) -> Option<DeviceHandle> {
///         self.registry.get(name, kind)
///     }
///
///     fn step(&mut self, interval: Duration) -> StepOutcome {
///         if self.bus.wait_tick(interval) { StepOutcome::Continue } else { StepOutcome::Ended }
///     }
///
///     fn read_proximity(&self, sensor: DeviceHandle) -> f32 {
///         self.ir[sensor.0]
///     }
///
///     fn set_velocity(&mut self, motor: DeviceHandle, velocity: f32) {
///         self.motors[motor.0].set(velocity);
///     }
///
///     fn set_indicator(&mut self, led: DeviceHandle, value: u32) {
///         self.leds[led.0].set(value);
///     }
/// }
/// ```
pub trait Platform {
    /// Look up a device by name.
    ///
    /// Returns None if no device of that kind is fitted under the name.
    fn find_device(&self, name: &str, kind: DeviceKind) -> Option<DeviceHandle>;

    /// Block until the platform has advanced by `interval`.
    fn step(&mut self, interval: Duration) -> StepOutcome;

    /// Latest intensity of a proximity sensor.
    fn read_proximity(&self, sensor: DeviceHandle) -> f32;

    /// Set a wheel's angular velocity (rad/s).
    ///
    /// The platform clamps the value to its motor limit.
    fn set_velocity(&mut self, motor: DeviceHandle, velocity: f32);

    /// Write a packed `0xRRGGBB` value to an indicator.
    fn set_indicator(&mut self, indicator: DeviceHandle, value: u32);
}
