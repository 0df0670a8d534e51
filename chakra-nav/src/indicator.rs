//! Status LEDs.
//!
//! Each state maps to a 3-bit color, expanded to `0xRRGGBB` and written to
//! every bound indicator.

use crate::platform::{DeviceHandle, Platform};
use crate::state::RobotState;

/// 3-bit color: red = 0b100, green = 0b010, blue = 0b001
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndicatorColor(u8);

impl IndicatorColor {
    pub const RED: Self = Self(0b100);
    pub const GREEN: Self = Self(0b010);
    pub const BLUE: Self = Self(0b001);
    pub const YELLOW: Self = Self(0b110);
    pub const MAGENTA: Self = Self(0b101);

    pub fn bits(&self) -> u8 {
        self.0
    }

    /// Expand each bit to a full 8-bit channel
    pub fn packed(&self) -> u32 {
        let mut value = 0;
        if self.0 & 0b100 != 0 {
            value |= 0xFF_0000;
        }
        if self.0 & 0b010 != 0 {
            value |= 0x00_FF00;
        }
        if self.0 & 0b001 != 0 {
            value |= 0x00_00FF;
        }
        value
    }
}

/// Color for a state
pub fn encode(state: RobotState) -> IndicatorColor {
    match state {
        RobotState::Cruising => IndicatorColor::RED,
        RobotState::Turning => IndicatorColor::BLUE,
        RobotState::ObstacleContact => IndicatorColor::GREEN,
        RobotState::Stuck => IndicatorColor::MAGENTA,
        RobotState::GoalReached => IndicatorColor::YELLOW,
    }
}

/// Writes the current state to all bound indicators
#[derive(Clone, Debug)]
pub struct StatusIndicator {
    devices: Vec<DeviceHandle>,
    current: Option<RobotState>,
}

impl StatusIndicator {
    pub fn new(devices: Vec<DeviceHandle>) -> Self {
        Self {
            devices,
            current: None,
        }
    }

    /// Show `state` on every indicator and return the color written.
    pub fn show<P: Platform + ?Sized>(&mut self, platform: &mut P, state: RobotState) -> IndicatorColor {
        let color = encode(state);
        let value = color.packed();
        for &device in &self.devices {
            platform.set_indicator(device, value);
        }

        if self.current != Some(state) {
            tracing::debug!(
                "Indicator: {} -> {} (#{:06X})",
                self.current.map(|s| s.name()).unwrap_or("-"),
                state,
                value
            );
            self.current = Some(state);
        }
        color
    }

    /// Last state shown
    pub fn current(&self) -> Option<RobotState> {
        self.current
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }
}
