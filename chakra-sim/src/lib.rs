//! ChakraSim - Simulated platform for a differential-drive robot
//!
//! Provides a lock-step simulation of a small two-wheeled robot with an
//! infrared proximity ring and indicator LEDs, for running and testing
//! controllers without hardware.

pub mod config;
pub mod error;
pub mod map;
pub mod noise;
pub mod physics;
pub mod proximity;
pub mod simulator;

// Re-export commonly used types
pub use config::SimulationConfig;
pub use error::{Error, Result};
pub use simulator::{
    Device, LEFT_WHEEL_MOTOR, RIGHT_WHEEL_MOTOR, Simulator, StepResult, Wheel,
};
