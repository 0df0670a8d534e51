//! Platform adapter for the chakra-sim simulator.

use crate::platform::{DeviceHandle, DeviceKind, Platform, StepOutcome};
use chakra_sim::{Device, Simulator, StepResult, Wheel};
use std::time::Duration;

/// Runs the controller against a [`Simulator`].
///
/// Handles are indices within their device kind; wheel motors use
/// 0 = left, 1 = right.
pub struct SimPlatform {
    sim: Simulator,
}

impl SimPlatform {
    pub fn new(sim: Simulator) -> Self {
        Self { sim }
    }

    pub fn simulator(&self) -> &Simulator {
        &self.sim
    }

    pub fn simulator_mut(&mut self) -> &mut Simulator {
        &mut self.sim
    }

    pub fn into_inner(self) -> Simulator {
        self.sim
    }
}

fn wheel_of(handle: DeviceHandle) -> Wheel {
    if handle.0 == 0 { Wheel::Left } else { Wheel::Right }
}

impl Platform for SimPlatform {
    fn find_device(&self, name: &str, kind: DeviceKind) -> Option<DeviceHandle> {
        match (self.sim.device(name)?, kind) {
            (Device::ProximitySensor(i), DeviceKind::ProximitySensor) => Some(DeviceHandle(i)),
            (Device::WheelMotor(Wheel::Left), DeviceKind::WheelMotor) => Some(DeviceHandle(0)),
            (Device::WheelMotor(Wheel::Right), DeviceKind::WheelMotor) => Some(DeviceHandle(1)),
            (Device::Indicator(i), DeviceKind::Indicator) => Some(DeviceHandle(i)),
            _ => None,
        }
    }

    fn step(&mut self, interval: Duration) -> StepOutcome {
        match self.sim.step(interval.as_secs_f32()) {
            StepResult::Continue => StepOutcome::Continue,
            StepResult::Ended => StepOutcome::Ended,
        }
    }

    fn read_proximity(&self, sensor: DeviceHandle) -> f32 {
        self.sim.proximity_value(sensor.0)
    }

    fn set_velocity(&mut self, motor: DeviceHandle, velocity: f32) {
        self.sim.set_wheel_velocity(wheel_of(motor), velocity);
    }

    fn set_indicator(&mut self, indicator: DeviceHandle, value: u32) {
        self.sim.set_indicator(indicator.0, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chakra_sim::SimulationConfig;

    fn platform() -> SimPlatform {
        let config = SimulationConfig {
            random_seed: 1,
            ..SimulationConfig::default()
        };
        SimPlatform::new(Simulator::new(config).unwrap())
    }

    #[test]
    fn test_find_device_checks_kind() {
        let platform = platform();
        assert_eq!(
            platform.find_device("ps3", DeviceKind::ProximitySensor),
            Some(DeviceHandle(3))
        );
        assert_eq!(platform.find_device("ps3", DeviceKind::WheelMotor), None);
        assert_eq!(
            platform.find_device(chakra_sim::RIGHT_WHEEL_MOTOR, DeviceKind::WheelMotor),
            Some(DeviceHandle(1))
        );
        assert_eq!(
            platform.find_device("led4", DeviceKind::Indicator),
            Some(DeviceHandle(4))
        );
        assert_eq!(platform.find_device("led42", DeviceKind::Indicator), None);
        assert_eq!(platform.find_device("camera", DeviceKind::ProximitySensor), None);
    }

    #[test]
    fn test_velocity_and_indicator_writes() {
        let mut platform = platform();
        platform.set_velocity(DeviceHandle(0), 2.0);
        platform.set_velocity(DeviceHandle(1), -100.0);
        let (left, right) = platform.simulator().wheel_velocities();
        assert_eq!(left, 2.0);
        assert!((right + 6.28).abs() < 1e-5);

        platform.set_indicator(DeviceHandle(2), 0xFF0000);
        assert_eq!(platform.simulator().indicator(2), Some(0xFF0000));
    }

    #[test]
    fn test_step_advances_time() {
        let mut platform = platform();
        assert_eq!(
            platform.step(Duration::from_millis(64)),
            StepOutcome::Continue
        );
        assert!((platform.simulator().time() - 0.064).abs() < 1e-6);
    }
}
