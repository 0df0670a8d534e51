//! Configuration loading for ChakraNav

use crate::error::{NavError, Result};
use crate::state::PROXIMITY_SENSORS;
use chakra_sim::SimulationConfig;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Main configuration structure
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NavConfig {
    #[serde(default)]
    pub control: ControlConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
    #[serde(default)]
    pub devices: DeviceNames,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// Control loop timing and limits
#[derive(Clone, Debug, Deserialize)]
pub struct ControlConfig {
    /// Control interval in milliseconds (default: 64)
    #[serde(default = "default_time_step_ms")]
    pub time_step_ms: u64,

    /// Maximum wheel angular velocity in rad/s (default: 6.28)
    #[serde(default = "default_max_velocity")]
    pub max_velocity: f32,

    /// Consecutive non-productive cycles that end the run (default: 50)
    #[serde(default = "default_stuck_ceiling")]
    pub stuck_ceiling: u32,

    /// Hard cap on cycles, 0 = unlimited (default: 0)
    #[serde(default)]
    pub max_cycles: u64,

    /// Cycles between progress log lines, 0 = off (default: 100)
    #[serde(default = "default_progress_interval")]
    pub progress_interval: u64,
}

/// Navigation thresholds and velocity fractions.
///
/// Intensities are raw proximity values; fractions are multiples of
/// `control.max_velocity`.
#[derive(Clone, Debug, Deserialize)]
pub struct PolicyConfig {
    /// Index of the front-right sensor (default: 0)
    #[serde(default = "default_front_right")]
    pub front_right: usize,

    /// Index of the front-left sensor (default: 7)
    #[serde(default = "default_front_left")]
    pub front_left: usize,

    /// Index of the right-side sensor used for wall following (default: 2)
    #[serde(default = "default_right_side")]
    pub right_side: usize,

    /// Both front sensors above this = frontal contact (default: 100)
    #[serde(default = "default_collision_threshold")]
    pub collision_threshold: f32,

    /// Either front sensor above this = obstacle ahead (default: 80)
    #[serde(default = "default_obstacle_threshold")]
    pub obstacle_threshold: f32,

    /// Right-side sensor below this = side clear (default: 60)
    #[serde(default = "default_side_clear_threshold")]
    pub side_clear_threshold: f32,

    /// Wheel fraction while backing up, both wheels (default: -0.5)
    #[serde(default = "default_reverse_fraction")]
    pub reverse_fraction: f32,

    /// Wheel fraction for turning in place, left +, right - (default: 0.4)
    #[serde(default = "default_spin_fraction")]
    pub spin_fraction: f32,

    /// Left wheel fraction for the wall-following arc (default: 0.6)
    #[serde(default = "default_arc_outer_fraction")]
    pub arc_outer_fraction: f32,

    /// Right wheel fraction for the wall-following arc (default: 0.2)
    #[serde(default = "default_arc_inner_fraction")]
    pub arc_inner_fraction: f32,

    /// Wheel fraction for cruising, both wheels (default: 0.5)
    #[serde(default = "default_cruise_fraction")]
    pub cruise_fraction: f32,

    /// Reverse cycles per frontal contact, including the first (default: 5)
    #[serde(default = "default_backup_cycles")]
    pub backup_cycles: u32,
}

/// Device names looked up on the platform
#[derive(Clone, Debug, Deserialize)]
pub struct DeviceNames {
    /// Proximity sensors in ring order, exactly 8
    #[serde(default = "default_proximity_names")]
    pub proximity_sensors: Vec<String>,

    #[serde(default = "default_left_motor")]
    pub left_motor: String,

    #[serde(default = "default_right_motor")]
    pub right_motor: String,

    /// Optional indicators; missing ones are skipped
    #[serde(default = "default_indicator_names")]
    pub indicators: Vec<String>,
}

/// Run report output
#[derive(Clone, Debug, Deserialize)]
pub struct ReportConfig {
    /// Write the report file (console summary is always printed)
    #[serde(default = "default_true")]
    pub write_file: bool,

    /// Directory for report files
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Report file name prefix
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,

    /// Wheel radius in meters for the travel estimate, 0 = omit
    #[serde(default = "default_wheel_radius")]
    pub wheel_radius: f32,
}

// Default value functions
fn default_time_step_ms() -> u64 {
    64
}
fn default_max_velocity() -> f32 {
    6.28
}
fn default_stuck_ceiling() -> u32 {
    50
}
fn default_progress_interval() -> u64 {
    100
}

fn default_front_right() -> usize {
    0
}
fn default_front_left() -> usize {
    7
}
fn default_right_side() -> usize {
    2
}
fn default_collision_threshold() -> f32 {
    100.0
}
fn default_obstacle_threshold() -> f32 {
    80.0
}
fn default_side_clear_threshold() -> f32 {
    60.0
}
fn default_reverse_fraction() -> f32 {
    -0.5
}
fn default_spin_fraction() -> f32 {
    0.4
}
fn default_arc_outer_fraction() -> f32 {
    0.6
}
fn default_arc_inner_fraction() -> f32 {
    0.2
}
fn default_cruise_fraction() -> f32 {
    0.5
}
fn default_backup_cycles() -> u32 {
    5
}

fn default_proximity_names() -> Vec<String> {
    (0..PROXIMITY_SENSORS).map(|i| format!("ps{}", i)).collect()
}
fn default_left_motor() -> String {
    chakra_sim::LEFT_WHEEL_MOTOR.to_string()
}
fn default_right_motor() -> String {
    chakra_sim::RIGHT_WHEEL_MOTOR.to_string()
}
fn default_indicator_names() -> Vec<String> {
    (0..10).map(|i| format!("led{}", i)).collect()
}

fn default_true() -> bool {
    true
}
fn default_output_dir() -> String {
    "output".to_string()
}
fn default_file_prefix() -> String {
    "run_report".to_string()
}
fn default_wheel_radius() -> f32 {
    0.0205
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            time_step_ms: default_time_step_ms(),
            max_velocity: default_max_velocity(),
            stuck_ceiling: default_stuck_ceiling(),
            max_cycles: 0,
            progress_interval: default_progress_interval(),
        }
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            front_right: default_front_right(),
            front_left: default_front_left(),
            right_side: default_right_side(),
            collision_threshold: default_collision_threshold(),
            obstacle_threshold: default_obstacle_threshold(),
            side_clear_threshold: default_side_clear_threshold(),
            reverse_fraction: default_reverse_fraction(),
            spin_fraction: default_spin_fraction(),
            arc_outer_fraction: default_arc_outer_fraction(),
            arc_inner_fraction: default_arc_inner_fraction(),
            cruise_fraction: default_cruise_fraction(),
            backup_cycles: default_backup_cycles(),
        }
    }
}

impl Default for DeviceNames {
    fn default() -> Self {
        Self {
            proximity_sensors: default_proximity_names(),
            left_motor: default_left_motor(),
            right_motor: default_right_motor(),
            indicators: default_indicator_names(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            write_file: true,
            output_dir: default_output_dir(),
            file_prefix: default_file_prefix(),
            wheel_radius: default_wheel_radius(),
        }
    }
}

impl ControlConfig {
    /// Control interval as a Duration
    pub fn time_step(&self) -> Duration {
        Duration::from_millis(self.time_step_ms)
    }
}

impl NavConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| NavError::Config(format!("Failed to read config file: {}", e)))?;
        let config: NavConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the control loop cannot run with
    pub fn validate(&self) -> Result<()> {
        let control = &self.control;
        if control.time_step_ms == 0 {
            return Err(NavError::Config("control.time_step_ms must be > 0".into()));
        }
        if control.max_velocity.is_nan() || control.max_velocity <= 0.0 {
            return Err(NavError::Config("control.max_velocity must be > 0".into()));
        }
        if control.stuck_ceiling == 0 {
            return Err(NavError::Config("control.stuck_ceiling must be > 0".into()));
        }

        let policy = &self.policy;
        for (field, index) in [
            ("front_right", policy.front_right),
            ("front_left", policy.front_left),
            ("right_side", policy.right_side),
        ] {
            if index >= PROXIMITY_SENSORS {
                return Err(NavError::Config(format!(
                    "policy.{} = {} is not a sensor index (0-{})",
                    field,
                    index,
                    PROXIMITY_SENSORS - 1
                )));
            }
        }
        if policy.backup_cycles == 0 {
            return Err(NavError::Config("policy.backup_cycles must be > 0".into()));
        }

        if self.devices.proximity_sensors.len() != PROXIMITY_SENSORS {
            return Err(NavError::Config(format!(
                "devices.proximity_sensors must list {} names",
                PROXIMITY_SENSORS
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NavConfig::default();
        assert_eq!(config.control.time_step(), Duration::from_millis(64));
        assert_eq!(config.control.stuck_ceiling, 50);
        assert_eq!(config.policy.collision_threshold, 100.0);
        assert_eq!(config.policy.obstacle_threshold, 80.0);
        assert_eq!(config.policy.side_clear_threshold, 60.0);
        assert_eq!(config.devices.proximity_sensors[7], "ps7");
        assert_eq!(config.devices.indicators.len(), 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_deserialization() {
        let toml_content = r#"
[control]
time_step_ms = 32
stuck_ceiling = 20

[policy]
backup_cycles = 8
side_clear_threshold = 55.0

[devices]
indicators = ["led0", "led8"]

[report]
write_file = false

[simulation]
random_seed = 7
"#;

        let config: NavConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.control.time_step_ms, 32);
        assert_eq!(config.control.max_velocity, 6.28);
        assert_eq!(config.control.stuck_ceiling, 20);
        assert_eq!(config.policy.backup_cycles, 8);
        assert_eq!(config.policy.side_clear_threshold, 55.0);
        assert_eq!(config.policy.obstacle_threshold, 80.0);
        assert_eq!(config.devices.indicators, vec!["led0", "led8"]);
        assert!(!config.report.write_file);
        assert_eq!(config.simulation.random_seed, 7);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = NavConfig::default();
        config.control.stuck_ceiling = 0;
        assert!(matches!(config.validate(), Err(NavError::Config(_))));

        let mut config = NavConfig::default();
        config.policy.right_side = 8;
        assert!(matches!(config.validate(), Err(NavError::Config(_))));

        let mut config = NavConfig::default();
        config.control.max_velocity = 0.0;
        assert!(config.validate().is_err());

        let mut config = NavConfig::default();
        config.devices.proximity_sensors.pop();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let result = NavConfig::load(Path::new("/nonexistent/chakra.toml"));
        assert!(matches!(result, Err(NavError::Config(_))));
    }
}
