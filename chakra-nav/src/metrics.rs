//! Run metrics: elapsed time, estimated travel and collision count.

use std::fmt;

use crate::state::MotorCommand;

/// How the run ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FinalStatus {
    /// Platform ended the run, goal reached, or cycle cap hit
    Completed,
    /// Stuck ceiling reached
    Stuck,
}

impl FinalStatus {
    pub fn name(&self) -> &'static str {
        match self {
            FinalStatus::Completed => "Completed",
            FinalStatus::Stuck => "Stuck",
        }
    }
}

impl fmt::Display for FinalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Finalized metrics of one run
#[derive(Clone, Debug, PartialEq)]
pub struct Metrics {
    /// Simulated time covered by processed cycles (seconds)
    pub elapsed_secs: f64,
    /// Sum of |mean commanded wheel velocity| × dt (rad)
    pub distance: f64,
    /// Frontal contact events
    pub collisions: u32,
    pub goal_reached: bool,
    pub final_status: FinalStatus,
}

impl Metrics {
    /// Travel estimate in meters for wheels of the given radius
    pub fn distance_meters(&self, wheel_radius: f32) -> f64 {
        self.distance * wheel_radius as f64
    }
}

/// Integrates time and commanded travel, counts collisions.
///
/// Distance is an estimate from commanded velocities; achieved velocity and
/// wheel slip are ignored.
#[derive(Clone, Debug, Default)]
pub struct MetricsAccumulator {
    elapsed_secs: f64,
    distance: f64,
    collisions: u32,
}

impl MetricsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one cycle of `dt_secs` under `command`
    pub fn tick(&mut self, command: &MotorCommand, dt_secs: f64) {
        self.elapsed_secs += dt_secs;
        self.distance += (command.average() as f64 * dt_secs).abs();
    }

    pub fn record_collision(&mut self) {
        self.collisions += 1;
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn collisions(&self) -> u32 {
        self.collisions
    }

    /// Produce the final record.
    ///
    /// `Stuck` only when the ceiling was reached without reaching a goal.
    pub fn finalize(&self, stuck_exceeded: bool, goal_reached: bool) -> Metrics {
        let final_status = if stuck_exceeded && !goal_reached {
            FinalStatus::Stuck
        } else {
            FinalStatus::Completed
        };
        Metrics {
            elapsed_secs: self.elapsed_secs,
            distance: self.distance,
            collisions: self.collisions,
            goal_reached,
            final_status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_sums_absolute_mean() {
        let mut metrics = MetricsAccumulator::new();
        let dt = 0.064;
        let commands = [
            MotorCommand::new(3.14, 3.14),
            MotorCommand::new(3.768, 1.256),
            MotorCommand::new(2.512, -2.512),
            MotorCommand::new(-3.14, -3.14),
        ];
        for cmd in &commands {
            metrics.tick(cmd, dt);
        }

        let expected: f64 = commands
            .iter()
            .map(|c| (c.average() as f64 * dt).abs())
            .sum();
        assert!((metrics.distance() - expected).abs() < 1e-9);
        assert!((metrics.elapsed_secs() - 4.0 * dt).abs() < 1e-12);
    }

    #[test]
    fn test_reverse_adds_distance() {
        let mut metrics = MetricsAccumulator::new();
        metrics.tick(&MotorCommand::new(-2.0, -2.0), 0.5);
        assert!((metrics.distance() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_spin_in_place_adds_nothing() {
        let mut metrics = MetricsAccumulator::new();
        metrics.tick(&MotorCommand::new(2.5, -2.5), 1.0);
        assert_eq!(metrics.distance(), 0.0);
        assert_eq!(metrics.elapsed_secs(), 1.0);
    }

    #[test]
    fn test_finalize_status() {
        let mut metrics = MetricsAccumulator::new();
        metrics.record_collision();
        metrics.record_collision();

        let done = metrics.finalize(false, false);
        assert_eq!(done.final_status, FinalStatus::Completed);
        assert_eq!(done.collisions, 2);

        let stuck = metrics.finalize(true, false);
        assert_eq!(stuck.final_status, FinalStatus::Stuck);

        // A reached goal wins over the stuck ceiling
        let goal = metrics.finalize(true, true);
        assert_eq!(goal.final_status, FinalStatus::Completed);
        assert!(goal.goal_reached);
    }

    #[test]
    fn test_distance_meters() {
        let metrics = Metrics {
            elapsed_secs: 1.0,
            distance: 100.0,
            collisions: 0,
            goal_reached: false,
            final_status: FinalStatus::Completed,
        };
        assert!((metrics.distance_meters(0.0205) - 2.05).abs() < 1e-6);
    }
}
