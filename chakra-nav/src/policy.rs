//! Reactive navigation policy.
//!
//! Four ordered rules map one proximity snapshot to a wheel command and a
//! state label. The first matching rule wins:
//!
//! 1. Both front sensors above the collision threshold: frontal contact.
//!    Back up for `backup_cycles` cycles, ignoring the sensors meanwhile.
//! 2. Either front sensor above the obstacle threshold: turn in place.
//! 3. Right side clear: arc right to follow the wall.
//! 4. Otherwise cruise straight.

use crate::config::PolicyConfig;
use crate::devices::DeviceBindings;
use crate::indicator::StatusIndicator;
use crate::platform::Platform;
use crate::state::{MotorCommand, ProximityReading, RobotState};
use crate::stuck::StuckDelta;

/// Outcome of one policy cycle
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Decision {
    pub command: MotorCommand,
    pub state: RobotState,
    /// True only on the cycle that detected frontal contact
    pub collision: bool,
    pub stuck: StuckDelta,
}

/// Rule-based obstacle avoidance
#[derive(Clone, Debug)]
pub struct NavigationPolicy {
    config: PolicyConfig,
    max_velocity: f32,
    /// Reverse cycles still owed after a frontal contact
    backup_remaining: u32,
}

impl NavigationPolicy {
    pub fn new(config: PolicyConfig, max_velocity: f32) -> Self {
        Self {
            config,
            max_velocity,
            backup_remaining: 0,
        }
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// True while a backup maneuver has cycles left
    pub fn is_backing_up(&self) -> bool {
        self.backup_remaining > 0
    }

    /// Classify a reading. Ignores the reading during a backup maneuver.
    pub fn decide(&mut self, reading: &ProximityReading) -> Decision {
        let cfg = &self.config;

        if self.backup_remaining > 0 {
            self.backup_remaining -= 1;
            return Decision {
                command: self.reverse(),
                state: RobotState::ObstacleContact,
                collision: false,
                stuck: StuckDelta::Increment,
            };
        }

        let front_right = reading[cfg.front_right];
        let front_left = reading[cfg.front_left];

        if front_right > cfg.collision_threshold && front_left > cfg.collision_threshold {
            self.backup_remaining = cfg.backup_cycles.saturating_sub(1);
            tracing::debug!(
                "Frontal contact ({:.0}/{:.0}), backing up {} cycles",
                front_right,
                front_left,
                cfg.backup_cycles
            );
            return Decision {
                command: self.reverse(),
                state: RobotState::ObstacleContact,
                collision: true,
                stuck: StuckDelta::Increment,
            };
        }

        if front_right > cfg.obstacle_threshold || front_left > cfg.obstacle_threshold {
            return Decision {
                command: MotorCommand::scaled(cfg.spin_fraction, -cfg.spin_fraction, self.max_velocity),
                state: RobotState::Turning,
                collision: false,
                stuck: StuckDelta::Increment,
            };
        }

        if reading[cfg.right_side] < cfg.side_clear_threshold {
            return Decision {
                command: MotorCommand::scaled(
                    cfg.arc_outer_fraction,
                    cfg.arc_inner_fraction,
                    self.max_velocity,
                ),
                state: RobotState::Turning,
                collision: false,
                stuck: StuckDelta::Reset,
            };
        }

        Decision {
            command: MotorCommand::scaled(cfg.cruise_fraction, cfg.cruise_fraction, self.max_velocity),
            state: RobotState::Cruising,
            collision: false,
            stuck: StuckDelta::Reset,
        }
    }

    /// Run one full cycle against the platform: read the sensors, decide,
    /// write both wheel velocities and show the resulting state.
    pub fn step<P: Platform + ?Sized>(
        &mut self,
        platform: &mut P,
        devices: &DeviceBindings,
        indicator: &mut StatusIndicator,
    ) -> Decision {
        let reading = if self.is_backing_up() {
            ProximityReading::default()
        } else {
            ProximityReading::read(&*platform, devices)
        };

        let decision = self.decide(&reading);
        platform.set_velocity(devices.left_motor, decision.command.left);
        platform.set_velocity(devices.right_motor, decision.command.right);
        indicator.show(platform, decision.state);
        decision
    }

    fn reverse(&self) -> MotorCommand {
        MotorCommand::scaled(
            self.config.reverse_fraction,
            self.config.reverse_fraction,
            self.max_velocity,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: f32 = 6.28;

    fn policy() -> NavigationPolicy {
        NavigationPolicy::new(PolicyConfig::default(), MAX)
    }

    fn reading(front_right: f32, front_left: f32, right_side: f32) -> ProximityReading {
        let mut values = [0.0; 8];
        values[0] = front_right;
        values[7] = front_left;
        values[2] = right_side;
        ProximityReading::new(values)
    }

    fn assert_command(cmd: MotorCommand, left: f32, right: f32) {
        assert!((cmd.left - left).abs() < 1e-4, "left {} != {}", cmd.left, left);
        assert!((cmd.right - right).abs() < 1e-4, "right {} != {}", cmd.right, right);
    }

    #[test]
    fn test_frontal_contact() {
        let mut policy = policy();
        let d = policy.decide(&reading(150.0, 150.0, 100.0));
        assert_eq!(d.state, RobotState::ObstacleContact);
        assert!(d.collision);
        assert_eq!(d.stuck, StuckDelta::Increment);
        assert_command(d.command, -3.14, -3.14);
    }

    #[test]
    fn test_single_front_obstacle_turns() {
        let mut policy = policy();
        let d = policy.decide(&reading(90.0, 10.0, 100.0));
        assert_eq!(d.state, RobotState::Turning);
        assert!(!d.collision);
        assert_eq!(d.stuck, StuckDelta::Increment);
        assert_command(d.command, 2.512, -2.512);

        // One front sensor past the collision threshold is still only an obstacle
        let d = policy.decide(&reading(10.0, 150.0, 100.0));
        assert_eq!(d.state, RobotState::Turning);
        assert!(!d.collision);
        assert!(!policy.is_backing_up());
    }

    #[test]
    fn test_side_clear_arcs() {
        let mut policy = policy();
        let d = policy.decide(&reading(10.0, 10.0, 30.0));
        assert_eq!(d.state, RobotState::Turning);
        assert_eq!(d.stuck, StuckDelta::Reset);
        assert_command(d.command, 3.768, 1.256);
    }

    #[test]
    fn test_cruise() {
        let mut policy = policy();
        let d = policy.decide(&reading(10.0, 10.0, 70.0));
        assert_eq!(d.state, RobotState::Cruising);
        assert_eq!(d.stuck, StuckDelta::Reset);
        assert!(!d.collision);
        assert_command(d.command, 3.14, 3.14);
    }

    #[test]
    fn test_thresholds_are_strict() {
        let mut policy = policy();
        // Exactly at the collision threshold is not contact, but above 80
        let d = policy.decide(&reading(100.0, 100.0, 70.0));
        assert_eq!(d.state, RobotState::Turning);
        assert_eq!(d.stuck, StuckDelta::Increment);

        // Exactly at the obstacle threshold falls through
        let d = policy.decide(&reading(80.0, 80.0, 70.0));
        assert_eq!(d.state, RobotState::Cruising);

        // Exactly at the side threshold is not clear
        let d = policy.decide(&reading(0.0, 0.0, 60.0));
        assert_eq!(d.state, RobotState::Cruising);
    }

    #[test]
    fn test_backup_sequence() {
        let mut policy = policy();
        let contact = policy.decide(&reading(150.0, 150.0, 0.0));
        assert!(contact.collision);
        assert!(policy.is_backing_up());

        // Follow-up cycles reverse regardless of the reading
        for _ in 1..5 {
            let d = policy.decide(&reading(0.0, 0.0, 100.0));
            assert_eq!(d.state, RobotState::ObstacleContact);
            assert!(!d.collision);
            assert_eq!(d.stuck, StuckDelta::Increment);
            assert_command(d.command, -3.14, -3.14);
        }
        assert!(!policy.is_backing_up());

        let d = policy.decide(&reading(0.0, 0.0, 100.0));
        assert_eq!(d.state, RobotState::Cruising);
    }

    #[test]
    fn test_single_cycle_backup() {
        let config = PolicyConfig {
            backup_cycles: 1,
            ..PolicyConfig::default()
        };
        let mut policy = NavigationPolicy::new(config, MAX);
        policy.decide(&reading(150.0, 150.0, 100.0));
        assert!(!policy.is_backing_up());
        let d = policy.decide(&reading(0.0, 0.0, 100.0));
        assert_eq!(d.state, RobotState::Cruising);
    }

    #[test]
    fn test_custom_thresholds() {
        let config = PolicyConfig {
            obstacle_threshold: 200.0,
            collision_threshold: 300.0,
            ..PolicyConfig::default()
        };
        let mut policy = NavigationPolicy::new(config, MAX);
        let d = policy.decide(&reading(150.0, 150.0, 100.0));
        assert_eq!(d.state, RobotState::Cruising);
    }
}
