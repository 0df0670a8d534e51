//! Fixed-step control loop.
//!
//! One cycle: advance the platform, run the policy against fresh sensors,
//! update the session, then test for termination.

use crate::config::NavConfig;
use crate::devices::DeviceBindings;
use crate::error::Result;
use crate::indicator::StatusIndicator;
use crate::metrics::{Metrics, MetricsAccumulator};
use crate::platform::{Platform, StepOutcome};
use crate::policy::{Decision, NavigationPolicy};
use crate::state::{MotorCommand, RobotState};
use crate::stuck::StuckDetector;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Loop lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Completed,
    Stuck,
}

impl LoopState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, LoopState::Running)
    }
}

/// Per-run mutable context owned by the loop
#[derive(Clone, Debug)]
pub struct Session {
    pub stuck: StuckDetector,
    pub metrics: MetricsAccumulator,
    goal_reached: bool,
}

impl Session {
    pub fn new(stuck_ceiling: u32) -> Self {
        Self {
            stuck: StuckDetector::new(stuck_ceiling),
            metrics: MetricsAccumulator::new(),
            goal_reached: false,
        }
    }

    /// Record that a goal was reached; ends the run as Completed at the
    /// next termination test.
    pub fn mark_goal_reached(&mut self) {
        self.goal_reached = true;
    }

    pub fn goal_reached(&self) -> bool {
        self.goal_reached
    }
}

/// Drives the policy against a platform until the run ends
pub struct ControlLoop<P: Platform> {
    platform: P,
    devices: DeviceBindings,
    policy: NavigationPolicy,
    indicator: StatusIndicator,
    session: Session,
    state: LoopState,
    time_step: Duration,
    max_cycles: u64,
    progress_interval: u64,
    cycles: u64,
    last_decision: Option<Decision>,
}

impl<P: Platform> ControlLoop<P> {
    /// Bind devices on `platform` and prepare a run.
    ///
    /// Fails with `MissingDevice` if a sensor or wheel motor is absent.
    pub fn new(platform: P, config: &NavConfig) -> Result<Self> {
        config.validate()?;
        let devices = DeviceBindings::bind(&platform, &config.devices)?;
        let indicator = StatusIndicator::new(devices.indicators.clone());
        let policy = NavigationPolicy::new(config.policy.clone(), config.control.max_velocity);

        Ok(Self {
            platform,
            devices,
            policy,
            indicator,
            session: Session::new(config.control.stuck_ceiling),
            state: LoopState::Running,
            time_step: config.control.time_step(),
            max_cycles: config.control.max_cycles,
            progress_interval: config.control.progress_interval,
            cycles: 0,
            last_decision: None,
        })
    }

    /// Run one cycle and return the resulting loop state.
    ///
    /// Does nothing once the loop is terminal.
    pub fn tick(&mut self) -> LoopState {
        if self.state.is_terminal() {
            return self.state;
        }

        if self.platform.step(self.time_step) == StepOutcome::Ended {
            info!("Platform ended the run after {} cycles", self.cycles);
            self.state = LoopState::Completed;
            return self.state;
        }

        let decision = self
            .policy
            .step(&mut self.platform, &self.devices, &mut self.indicator);

        self.session.stuck.apply(decision.stuck);
        self.session
            .metrics
            .tick(&decision.command, self.time_step.as_secs_f64());
        if decision.collision {
            self.session.metrics.record_collision();
            debug!(
                "Collision #{} at t={:.2}s",
                self.session.metrics.collisions(),
                self.session.metrics.elapsed_secs()
            );
        }
        self.cycles += 1;
        self.last_decision = Some(decision);

        if self.session.goal_reached() {
            info!("Goal reached after {} cycles", self.cycles);
            self.state = LoopState::Completed;
        } else if self.session.stuck.is_stuck() {
            warn!(
                "Stuck: {} consecutive non-productive cycles, stopping",
                self.session.stuck.count()
            );
            self.platform.set_velocity(self.devices.left_motor, 0.0);
            self.platform.set_velocity(self.devices.right_motor, 0.0);
            self.indicator.show(&mut self.platform, RobotState::Stuck);
            self.state = LoopState::Stuck;
        } else if self.max_cycles > 0 && self.cycles >= self.max_cycles {
            info!("Cycle limit {} reached", self.max_cycles);
            self.state = LoopState::Completed;
        }

        if self.progress_interval > 0 && self.cycles % self.progress_interval == 0 {
            self.log_progress();
        }

        self.state
    }

    /// Tick until the loop is terminal.
    pub fn run(&mut self) -> LoopState {
        info!(
            "Control loop started: {} ms step, stuck ceiling {}",
            self.time_step.as_millis(),
            self.session.stuck.ceiling()
        );
        while !self.tick().is_terminal() {}
        self.state
    }

    /// Finalize the run's metrics, consuming the loop.
    pub fn finish(self) -> Metrics {
        let metrics = self
            .session
            .metrics
            .finalize(self.session.stuck.is_stuck(), self.session.goal_reached());
        info!(
            "Run finished: {} after {} cycles",
            metrics.final_status, self.cycles
        );
        metrics
    }

    fn log_progress(&self) {
        let state = self
            .last_decision
            .map(|d| d.state.name())
            .unwrap_or("-");
        info!(
            "Cycle {}: t={:.1}s, distance={:.1}, collisions={}, stuck={}/{}, state={}",
            self.cycles,
            self.session.metrics.elapsed_secs(),
            self.session.metrics.distance(),
            self.session.metrics.collisions(),
            self.session.stuck.count(),
            self.session.stuck.ceiling(),
            state
        );
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn last_decision(&self) -> Option<&Decision> {
        self.last_decision.as_ref()
    }

    /// Command most recently sent to the wheels
    pub fn last_command(&self) -> MotorCommand {
        match (self.state, self.last_decision) {
            (LoopState::Stuck, _) => MotorCommand::STOP,
            (_, Some(d)) => d.command,
            (_, None) => MotorCommand::STOP,
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn indicator(&self) -> &StatusIndicator {
        &self.indicator
    }
}
