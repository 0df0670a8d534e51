//! Lock-step robot simulator
//!
//! Simulates a small differential-drive robot with an 8-sensor infrared
//! proximity ring, two wheel motors and a bank of indicator LEDs inside an
//! occupancy-grid arena.
//!
//! # Devices
//!
//! | Device | Names (default) | Simulation Method |
//! |--------|-----------------|-------------------|
//! | Proximity sensors | `ps0`..`ps7` | Ray-casting + lookup table + noise |
//! | Wheel motors | `left wheel motor`, `right wheel motor` | Velocity clamp + kinematics |
//! | Indicators | `led0`..`led9` | Stored packed value |
//!
//! Devices are found by name with [`Simulator::device`], which returns `None`
//! for anything not fitted.
//!
//! # Stepping
//!
//! The controller drives time. Each [`Simulator::step`] call:
//!
//! ```text
//! 1. Check end-of-run (duration limit, shutdown flag)
//! 2. Integrate physics with the current wheel commands
//! 3. Refresh proximity readings at the new pose
//! ```
//!
//! There is no background thread; the simulation only moves when stepped.

use crate::config::SimulationConfig;
use crate::error::Result;
use crate::map::SimulationMap;
use crate::noise::NoiseGenerator;
use crate::physics::PhysicsState;
use crate::proximity::ProximitySimulator;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Left wheel motor device name
pub const LEFT_WHEEL_MOTOR: &str = "left wheel motor";
/// Right wheel motor device name
pub const RIGHT_WHEEL_MOTOR: &str = "right wheel motor";

/// Drive wheel selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wheel {
    Left,
    Right,
}

/// A device fitted to the simulated robot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    /// Proximity sensor at the given ring index
    ProximitySensor(usize),
    /// Wheel motor
    WheelMotor(Wheel),
    /// Indicator LED at the given socket index
    Indicator(usize),
}

/// Outcome of advancing the simulation by one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    /// Simulation advanced; sensors hold fresh values
    Continue,
    /// Simulation has ended; nothing was advanced
    Ended,
}

/// Simulated robot and its arena
pub struct Simulator {
    config: SimulationConfig,
    map: SimulationMap,
    physics: PhysicsState,
    proximity: ProximitySimulator,
    /// Latest proximity intensities, in ring order
    readings: Vec<f32>,
    /// Commanded wheel velocities after clamping (left, right)
    wheel_command: (f32, f32),
    /// Indicator values; `None` marks an unpopulated socket
    indicators: Vec<Option<u32>>,
    /// Simulated time (seconds)
    time: f64,
    /// Steps with the body pressed against an obstacle
    contact_steps: u64,
    in_contact: bool,
    shutdown: Option<Arc<AtomicBool>>,
}

impl Simulator {
    /// Create a simulator, building or loading its map.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let map = match &config.map_file {
            Some(path) => SimulationMap::load(path)?,
            None => SimulationMap::arena(&config.arena)?,
        };
        log::info!(
            "Loaded map: {}x{} cells, resolution: {} m/cell",
            map.width(),
            map.height(),
            map.resolution()
        );

        let physics = PhysicsState::new(
            config.start_x,
            config.start_y,
            config.start_theta,
            &config.robot,
        );

        let noise = NoiseGenerator::new(config.random_seed);
        let proximity = ProximitySimulator::new(&config.proximity, noise);
        let readings = vec![config.proximity.ambient; proximity.len()];

        let indicators = (0..config.indicators.count)
            .map(|i| {
                let name = format!("led{}", i);
                if config.indicators.missing.contains(&name) {
                    None
                } else {
                    Some(0)
                }
            })
            .collect();

        log::info!(
            "Simulator ready: {} proximity sensors, {} indicator sockets, start ({:.3}, {:.3}, {:.1}°)",
            proximity.len(),
            config.indicators.count,
            config.start_x,
            config.start_y,
            config.start_theta.to_degrees()
        );

        Ok(Self {
            config,
            map,
            physics,
            proximity,
            readings,
            wheel_command: (0.0, 0.0),
            indicators,
            time: 0.0,
            contact_steps: 0,
            in_contact: false,
            shutdown: None,
        })
    }

    /// End the run once the flag is set (e.g. from a Ctrl-C handler).
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown = Some(flag);
        self
    }

    /// Look up a fitted device by name
    pub fn device(&self, name: &str) -> Option<Device> {
        if let Some(index) = self.proximity.index_of(name) {
            return Some(Device::ProximitySensor(index));
        }
        match name {
            LEFT_WHEEL_MOTOR => return Some(Device::WheelMotor(Wheel::Left)),
            RIGHT_WHEEL_MOTOR => return Some(Device::WheelMotor(Wheel::Right)),
            _ => {}
        }
        let index: usize = name.strip_prefix("led")?.parse().ok()?;
        match self.indicators.get(index) {
            Some(Some(_)) => Some(Device::Indicator(index)),
            _ => None,
        }
    }

    /// Advance simulated time by `dt` seconds.
    pub fn step(&mut self, dt: f32) -> StepResult {
        if self.is_ended() {
            return StepResult::Ended;
        }

        let (left, right) = self.wheel_command;
        let contact = self.physics.update(dt, left, right, &self.map);
        if contact {
            self.contact_steps += 1;
            if !self.in_contact {
                log::debug!(
                    "Contact at ({:.3}, {:.3}) t={:.2}s",
                    self.physics.x(),
                    self.physics.y(),
                    self.time
                );
            }
        }
        self.in_contact = contact;

        self.proximity.sample(
            &self.map,
            self.physics.x(),
            self.physics.y(),
            self.physics.theta(),
            self.config.robot.robot_radius,
            &mut self.readings,
        );

        self.time += dt as f64;
        StepResult::Continue
    }

    fn is_ended(&self) -> bool {
        if let Some(flag) = &self.shutdown
            && flag.load(Ordering::Relaxed)
        {
            log::info!("Shutdown requested at t={:.2}s", self.time);
            return true;
        }
        let limit = self.config.duration_secs as f64;
        if limit > 0.0 && self.time >= limit - 1e-9 {
            log::info!("Simulation duration of {:.1}s reached", limit);
            return true;
        }
        false
    }

    /// Latest intensity of the proximity sensor at `index`
    pub fn proximity_value(&self, index: usize) -> f32 {
        self.readings.get(index).copied().unwrap_or(0.0)
    }

    /// Command a wheel velocity (rad/s), clamped to the motor limit
    pub fn set_wheel_velocity(&mut self, wheel: Wheel, velocity: f32) {
        let max = self.config.robot.max_wheel_speed;
        let v = velocity.clamp(-max, max);
        match wheel {
            Wheel::Left => self.wheel_command.0 = v,
            Wheel::Right => self.wheel_command.1 = v,
        }
    }

    /// Commanded wheel velocities after clamping (left, right)
    pub fn wheel_velocities(&self) -> (f32, f32) {
        self.wheel_command
    }

    /// Write a packed value to an indicator socket. Unpopulated sockets ignore it.
    pub fn set_indicator(&mut self, index: usize, value: u32) {
        if let Some(Some(slot)) = self.indicators.get_mut(index) {
            *slot = value;
        }
    }

    /// Current value of an indicator, `None` if the socket is unpopulated
    pub fn indicator(&self, index: usize) -> Option<u32> {
        self.indicators.get(index).copied().flatten()
    }

    /// Simulated time (seconds)
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Ground-truth pose (x, y, theta)
    pub fn pose(&self) -> (f32, f32, f32) {
        (self.physics.x(), self.physics.y(), self.physics.theta())
    }

    /// Number of steps the body spent pressed against an obstacle
    pub fn contact_steps(&self) -> u64 {
        self.contact_steps
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }
}
