//! Simulation configuration
//!
//! Every parameter has a default matching a small e-puck class robot, so an
//! empty `[simulation]` table yields a working arena run.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! SimulationConfig
//! ├── map_file | ArenaConfig         # Environment setup
//! ├── start_x/y/theta                # Initial pose
//! ├── random_seed, duration_secs     # Simulation control
//! ├── RobotConfig                    # Physical parameters
//! │   ├── wheel_radius, axle_length
//! │   ├── max_wheel_speed
//! │   └── collision_mode, robot_radius
//! ├── ProximityConfig                # IR ring
//! │   ├── sensors (name + mounting angle)
//! │   └── lookup_table, noise_stddev, ambient
//! └── IndicatorsConfig               # LED bank
//! ```
//!
//! # Default Values
//!
//! | Parameter | Default | Notes |
//! |-----------|---------|-------|
//! | wheel_radius | 0.0205 m | |
//! | axle_length | 0.052 m | |
//! | max_wheel_speed | 6.28 rad/s | One turn per second |
//! | robot_radius | 0.037 m | Body footprint |
//! | proximity range | 0.07 m | Last lookup table entry |
//! | indicators | 10 | `led0`..`led9` |

use serde::Deserialize;

// ============================================================================
// Environment
// ============================================================================

/// Axis-aligned box obstacle (center and size in meters)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BoxObstacle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Built-in rectangular arena used when no map file is configured
#[derive(Debug, Clone, Deserialize)]
pub struct ArenaConfig {
    /// Arena width along X (meters)
    #[serde(default = "default_arena_size")]
    pub width: f32,

    /// Arena height along Y (meters)
    #[serde(default = "default_arena_size")]
    pub height: f32,

    /// Grid resolution (meters per cell)
    #[serde(default = "default_arena_resolution")]
    pub resolution: f32,

    /// Border wall thickness (meters)
    #[serde(default = "default_wall_thickness")]
    pub wall_thickness: f32,

    /// Obstacles placed inside the arena
    #[serde(default = "default_obstacles")]
    pub obstacles: Vec<BoxObstacle>,
}

fn default_arena_size() -> f32 {
    1.0
}
fn default_arena_resolution() -> f32 {
    0.005
}
fn default_wall_thickness() -> f32 {
    0.01
}
fn default_obstacles() -> Vec<BoxObstacle> {
    vec![
        BoxObstacle {
            x: 0.25,
            y: 0.70,
            width: 0.15,
            height: 0.10,
        },
        BoxObstacle {
            x: 0.72,
            y: 0.45,
            width: 0.10,
            height: 0.20,
        },
        BoxObstacle {
            x: 0.22,
            y: 0.35,
            width: 0.08,
            height: 0.08,
        },
    ]
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: default_arena_size(),
            height: default_arena_size(),
            resolution: default_arena_resolution(),
            wall_thickness: default_wall_thickness(),
            obstacles: default_obstacles(),
        }
    }
}

// ============================================================================
// Robot and devices
// ============================================================================

/// Robot physical parameters
#[derive(Debug, Clone, Deserialize)]
pub struct RobotConfig {
    /// Wheel radius (meters)
    #[serde(default = "default_wheel_radius")]
    pub wheel_radius: f32,

    /// Distance between wheel contact points (meters)
    #[serde(default = "default_axle_length")]
    pub axle_length: f32,

    /// Maximum wheel angular velocity magnitude (rad/s)
    #[serde(default = "default_max_wheel_speed")]
    pub max_wheel_speed: f32,

    /// Robot collision radius (meters)
    #[serde(default = "default_robot_radius")]
    pub robot_radius: f32,

    /// Collision behavior: "stop", "slide", "passthrough"
    #[serde(default = "default_collision_mode")]
    pub collision_mode: String,

    /// Slide friction coefficient (0.0-1.0, used when collision_mode="slide")
    #[serde(default = "default_slide_friction")]
    pub slide_friction: f32,
}

fn default_wheel_radius() -> f32 {
    0.0205
}
fn default_axle_length() -> f32 {
    0.052
}
fn default_max_wheel_speed() -> f32 {
    6.28
}
fn default_robot_radius() -> f32 {
    0.037
}
fn default_collision_mode() -> String {
    "stop".to_string()
}
fn default_slide_friction() -> f32 {
    0.5
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            wheel_radius: default_wheel_radius(),
            axle_length: default_axle_length(),
            max_wheel_speed: default_max_wheel_speed(),
            robot_radius: default_robot_radius(),
            collision_mode: default_collision_mode(),
            slide_friction: default_slide_friction(),
        }
    }
}

/// One infrared proximity sensor on the ring
#[derive(Debug, Clone, Deserialize)]
pub struct ProximitySensorConfig {
    /// Device name used for lookup
    pub name: String,
    /// Mounting angle in the robot frame (radians, 0 = forward, CCW positive)
    pub angle: f32,
}

/// Proximity ring configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ProximityConfig {
    /// Sensors in index order
    #[serde(default = "default_proximity_sensors")]
    pub sensors: Vec<ProximitySensorConfig>,

    /// Distance (meters) to intensity table, sorted by distance.
    /// Distances beyond the last entry read as `ambient`.
    #[serde(default = "default_lookup_table")]
    pub lookup_table: Vec<[f32; 2]>,

    /// Intensity noise standard deviation
    #[serde(default = "default_proximity_noise")]
    pub noise_stddev: f32,

    /// Intensity reported when nothing is in range
    #[serde(default)]
    pub ambient: f32,
}

fn default_proximity_sensors() -> Vec<ProximitySensorConfig> {
    const ANGLES: [f32; 8] = [-0.30, -0.80, -1.57, -2.64, 2.64, 1.57, 0.80, 0.30];
    ANGLES
        .iter()
        .enumerate()
        .map(|(i, &angle)| ProximitySensorConfig {
            name: format!("ps{}", i),
            angle,
        })
        .collect()
}
fn default_lookup_table() -> Vec<[f32; 2]> {
    vec![
        [0.0, 4095.0],
        [0.005, 2133.33],
        [0.01, 1465.73],
        [0.015, 601.46],
        [0.02, 383.84],
        [0.03, 234.93],
        [0.04, 158.03],
        [0.05, 120.0],
        [0.06, 104.09],
        [0.07, 67.19],
    ]
}
fn default_proximity_noise() -> f32 {
    2.0
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            sensors: default_proximity_sensors(),
            lookup_table: default_lookup_table(),
            noise_stddev: default_proximity_noise(),
            ambient: 0.0,
        }
    }
}

/// Indicator LED bank
#[derive(Debug, Clone, Deserialize)]
pub struct IndicatorsConfig {
    /// Number of LED sockets (`led0`..`led{count-1}`)
    #[serde(default = "default_indicator_count")]
    pub count: usize,

    /// Socket names left unpopulated (lookup returns nothing)
    #[serde(default)]
    pub missing: Vec<String>,
}

fn default_indicator_count() -> usize {
    10
}

impl Default for IndicatorsConfig {
    fn default() -> Self {
        Self {
            count: default_indicator_count(),
            missing: Vec::new(),
        }
    }
}

// ============================================================================
// Top level
// ============================================================================

/// Simulation configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    /// ROS-style map YAML; the built-in arena is used when unset
    #[serde(default)]
    pub map_file: Option<String>,

    /// Built-in arena layout
    #[serde(default)]
    pub arena: ArenaConfig,

    /// Starting X position (meters)
    #[serde(default = "default_start_x")]
    pub start_x: f32,

    /// Starting Y position (meters)
    #[serde(default = "default_start_y")]
    pub start_y: f32,

    /// Starting orientation (radians)
    #[serde(default = "default_start_theta")]
    pub start_theta: f32,

    /// Random seed (0 = random each run)
    #[serde(default = "default_random_seed")]
    pub random_seed: u64,

    /// Simulated time after which the run ends (seconds, 0 = unlimited)
    #[serde(default = "default_duration_secs")]
    pub duration_secs: f32,

    #[serde(default)]
    pub robot: RobotConfig,

    #[serde(default)]
    pub proximity: ProximityConfig,

    #[serde(default)]
    pub indicators: IndicatorsConfig,
}

fn default_start_x() -> f32 {
    0.5
}
fn default_start_y() -> f32 {
    0.15
}
fn default_start_theta() -> f32 {
    std::f32::consts::FRAC_PI_2
}
fn default_random_seed() -> u64 {
    42
}
fn default_duration_secs() -> f32 {
    120.0
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            map_file: None,
            arena: ArenaConfig::default(),
            start_x: default_start_x(),
            start_y: default_start_y(),
            start_theta: default_start_theta(),
            random_seed: default_random_seed(),
            duration_secs: default_duration_secs(),
            robot: RobotConfig::default(),
            proximity: ProximityConfig::default(),
            indicators: IndicatorsConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SimulationConfig::default();
        assert!(config.map_file.is_none());
        assert_eq!(config.proximity.sensors.len(), 8);
        assert_eq!(config.proximity.sensors[0].name, "ps0");
        assert_eq!(config.proximity.sensors[7].name, "ps7");
        assert_eq!(config.indicators.count, 10);
        assert_eq!(config.robot.max_wheel_speed, 6.28);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: SimulationConfig = toml::from_str("").unwrap();
        assert_eq!(config.random_seed, 42);
        assert_eq!(config.arena.obstacles.len(), 3);
        assert_eq!(config.proximity.lookup_table.len(), 10);
    }

    #[test]
    fn test_toml_deserialization() {
        let toml_content = r#"
start_x = 0.3
duration_secs = 0.0

[robot]
collision_mode = "slide"

[arena]
width = 2.0
obstacles = [{ x = 1.0, y = 1.0, width = 0.2, height = 0.2 }]

[indicators]
missing = ["led3", "led9"]
"#;

        let config: SimulationConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.start_x, 0.3);
        assert_eq!(config.duration_secs, 0.0);
        assert_eq!(config.robot.collision_mode, "slide");
        assert_eq!(config.arena.width, 2.0);
        assert_eq!(config.arena.height, 1.0);
        assert_eq!(config.arena.obstacles.len(), 1);
        assert_eq!(config.indicators.missing, vec!["led3", "led9"]);
    }
}
