//! Per-cycle data: sensor readings, motor commands and the robot state label.

use std::fmt;
use std::ops::Index;

use crate::devices::DeviceBindings;
use crate::platform::Platform;

/// Number of sensors on the proximity ring
pub const PROXIMITY_SENSORS: usize = 8;

/// One snapshot of the proximity ring, indexed 0-7 around the chassis.
///
/// Higher intensities mean closer obstacles.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ProximityReading([f32; PROXIMITY_SENSORS]);

impl ProximityReading {
    pub fn new(values: [f32; PROXIMITY_SENSORS]) -> Self {
        Self(values)
    }

    /// Read every bound sensor from the platform.
    pub fn read<P: Platform + ?Sized>(platform: &P, devices: &DeviceBindings) -> Self {
        let mut values = [0.0; PROXIMITY_SENSORS];
        for (value, &sensor) in values.iter_mut().zip(devices.proximity.iter()) {
            *value = platform.read_proximity(sensor);
        }
        Self(values)
    }

    pub fn values(&self) -> &[f32; PROXIMITY_SENSORS] {
        &self.0
    }
}

impl Index<usize> for ProximityReading {
    type Output = f32;

    fn index(&self, index: usize) -> &f32 {
        &self.0[index]
    }
}

/// Wheel angular velocity pair (rad/s), positive = forward.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MotorCommand {
    pub left: f32,
    pub right: f32,
}

impl MotorCommand {
    /// Both wheels at zero
    pub const STOP: Self = Self {
        left: 0.0,
        right: 0.0,
    };

    pub fn new(left: f32, right: f32) -> Self {
        Self { left, right }
    }

    /// Command expressed as fractions of `max_velocity`, clamped to ±max.
    pub fn scaled(left_fraction: f32, right_fraction: f32, max_velocity: f32) -> Self {
        let max = max_velocity.abs();
        Self {
            left: (left_fraction * max).clamp(-max, max),
            right: (right_fraction * max).clamp(-max, max),
        }
    }

    /// Mean of the two wheel velocities
    #[inline]
    pub fn average(&self) -> f32 {
        (self.left + self.right) / 2.0
    }
}

/// Robot state label, exactly one per cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RobotState {
    /// Free straight advance
    Cruising,
    /// Rotating away from an obstacle or arcing along a wall
    Turning,
    /// Frontal contact, backing away
    ObstacleContact,
    /// Too many consecutive non-productive cycles
    Stuck,
    /// Reserved; never produced by the navigation policy
    GoalReached,
}

impl RobotState {
    /// State name for logging
    pub fn name(&self) -> &'static str {
        match self {
            RobotState::Cruising => "Cruising",
            RobotState::Turning => "Turning",
            RobotState::ObstacleContact => "ObstacleContact",
            RobotState::Stuck => "Stuck",
            RobotState::GoalReached => "GoalReached",
        }
    }
}

impl fmt::Display for RobotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
