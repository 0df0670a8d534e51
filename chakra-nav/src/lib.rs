//! # ChakraNav: Reactive Obstacle Avoidance
//!
//! A fixed-step controller for a small differential-drive robot with an
//! 8-sensor infrared proximity ring. Every control tick it reads the ring,
//! picks a wheel command with a four-rule policy, shows its state on the
//! indicator LEDs and accumulates run metrics.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chakra_nav::{ControlLoop, NavConfig, ReportSink, SimPlatform};
//! use chakra_sim::Simulator;
//!
//! let config = NavConfig::default();
//! let sim = Simulator::new(config.simulation.clone())?;
//! let mut control = ControlLoop::new(SimPlatform::new(sim), &config)?;
//! control.run();
//! let metrics = control.finish();
//! ReportSink::new(config.report.clone()).emit(&metrics);
//! # Ok::<(), chakra_nav::NavError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`platform`]: the [`Platform`] trait the controller runs against
//! - [`devices`]: startup binding of named devices
//! - [`policy`]: rule-based [`NavigationPolicy`]
//! - [`stuck`]: consecutive non-productive cycle counter
//! - [`metrics`]: time, distance and collision accounting
//! - [`indicator`]: state-to-color LED output
//! - [`control`]: the [`ControlLoop`] tying it together
//! - [`report`]: console summary and report file
//! - [`sim_platform`]: [`Platform`] for the chakra-sim simulator

pub mod config;
pub mod control;
pub mod devices;
pub mod error;
pub mod indicator;
pub mod metrics;
pub mod platform;
pub mod policy;
pub mod report;
pub mod sim_platform;
pub mod state;
pub mod stuck;

pub use config::{ControlConfig, DeviceNames, NavConfig, PolicyConfig, ReportConfig};
pub use control::{ControlLoop, LoopState, Session};
pub use devices::DeviceBindings;
pub use error::{NavError, Result};
pub use indicator::{IndicatorColor, StatusIndicator, encode};
pub use metrics::{FinalStatus, Metrics, MetricsAccumulator};
pub use platform::{DeviceHandle, DeviceKind, Platform, StepOutcome};
pub use policy::{Decision, NavigationPolicy};
pub use report::{ReportSink, RunReport};
pub use sim_platform::SimPlatform;
pub use state::{MotorCommand, PROXIMITY_SENSORS, ProximityReading, RobotState};
pub use stuck::{StuckDelta, StuckDetector};
