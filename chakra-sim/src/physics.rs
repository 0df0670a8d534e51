//! Physics engine for differential drive robot simulation
//!
//! Integrates wheel angular velocities into a planar pose and resolves
//! contact with the occupancy grid.

use crate::config::RobotConfig;
use crate::map::SimulationMap;
use std::f32::consts::{PI, TAU};

/// Collision handling mode
#[derive(Debug, Clone, PartialEq)]
pub enum CollisionMode {
    /// Stop on collision
    Stop,
    /// Slide along obstacle surface
    Slide { friction: f32 },
    /// Pass through obstacles (for debugging)
    Passthrough,
}

impl CollisionMode {
    /// Parse collision mode from config string
    pub fn from_config(mode: &str, friction: f32) -> Self {
        match mode {
            "slide" => Self::Slide { friction },
            "passthrough" => Self::Passthrough,
            _ => Self::Stop,
        }
    }
}

/// Physics state for the simulated robot
pub struct PhysicsState {
    /// X position in world frame (meters)
    x: f32,
    /// Y position in world frame (meters)
    y: f32,
    /// Orientation angle (radians, CCW from +X)
    theta: f32,
    collision_mode: CollisionMode,
    robot_radius: f32,
    wheel_radius: f32,
    axle_length: f32,
}

impl PhysicsState {
    /// Create new physics state at given pose
    pub fn new(x: f32, y: f32, theta: f32, config: &RobotConfig) -> Self {
        Self {
            x,
            y,
            theta: normalize_angle(theta),
            collision_mode: CollisionMode::from_config(
                &config.collision_mode,
                config.slide_friction,
            ),
            robot_radius: config.robot_radius,
            wheel_radius: config.wheel_radius,
            axle_length: config.axle_length,
        }
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn theta(&self) -> f32 {
        self.theta
    }

    /// Convert wheel angular velocities (rad/s) to body (v, ω)
    ///
    /// Returns (linear m/s, angular rad/s).
    pub fn body_velocity(&self, left: f32, right: f32) -> (f32, f32) {
        let v_left = left * self.wheel_radius;
        let v_right = right * self.wheel_radius;
        let linear = (v_left + v_right) / 2.0;
        let angular = (v_right - v_left) / self.axle_length;
        (linear, angular)
    }

    /// Advance the pose by `dt` seconds under the given wheel velocities.
    ///
    /// Returns true if the robot is in contact with an obstacle.
    pub fn update(&mut self, dt: f32, left: f32, right: f32, map: &SimulationMap) -> bool {
        let (linear_vel, angular_vel) = self.body_velocity(left, right);

        let (new_x, new_y, new_theta) = if angular_vel.abs() < 1e-6 {
            // Straight line motion
            let new_x = self.x + linear_vel * self.theta.cos() * dt;
            let new_y = self.y + linear_vel * self.theta.sin() * dt;
            (new_x, new_y, self.theta)
        } else {
            // Arc motion
            let r = linear_vel / angular_vel;
            let new_theta = self.theta + angular_vel * dt;
            let new_x = self.x + r * (new_theta.sin() - self.theta.sin());
            let new_y = self.y + r * (self.theta.cos() - new_theta.cos());
            (new_x, new_y, new_theta)
        };

        let would_collide = self.check_collision(new_x, new_y, map);

        match &self.collision_mode {
            CollisionMode::Stop => {
                self.theta = normalize_angle(new_theta);
                if would_collide {
                    // Rotation is still allowed, translation is blocked
                    return true;
                }
                self.x = new_x;
                self.y = new_y;
            }
            CollisionMode::Slide { friction } => {
                if would_collide {
                    let (slide_x, slide_y) =
                        self.compute_slide(linear_vel, *friction, dt, map);
                    self.x = slide_x;
                    self.y = slide_y;
                    self.theta = normalize_angle(new_theta);
                    return true;
                }
                self.x = new_x;
                self.y = new_y;
                self.theta = normalize_angle(new_theta);
            }
            CollisionMode::Passthrough => {
                self.x = new_x;
                self.y = new_y;
                self.theta = normalize_angle(new_theta);
            }
        }

        false
    }

    /// Check if robot at given position would collide with obstacles
    fn check_collision(&self, x: f32, y: f32, map: &SimulationMap) -> bool {
        let num_checks = 16;
        for i in 0..num_checks {
            let angle = (i as f32 / num_checks as f32) * TAU;
            let check_x = x + self.robot_radius * angle.cos();
            let check_y = y + self.robot_radius * angle.sin();
            if map.is_occupied(check_x, check_y) {
                return true;
            }
        }
        map.is_occupied(x, y)
    }

    /// Compute slide motion when colliding
    fn compute_slide(
        &self,
        linear_vel: f32,
        friction: f32,
        dt: f32,
        map: &SimulationMap,
    ) -> (f32, f32) {
        let vel_mag = linear_vel.abs() * (1.0 - friction) * dt;

        // Try sliding in +/- 90 degrees from heading
        let perp_angles = [self.theta + PI / 2.0, self.theta - PI / 2.0];

        for perp_angle in perp_angles {
            let slide_x = self.x + vel_mag * perp_angle.cos();
            let slide_y = self.y + vel_mag * perp_angle.sin();

            if !self.check_collision(slide_x, slide_y, map) {
                return (slide_x, slide_y);
            }
        }

        // Can't slide, stay in place
        (self.x, self.y)
    }
}

/// Normalize angle to [-π, π)
pub fn normalize_angle(angle: f32) -> f32 {
    let mut a = angle % TAU;
    if a >= PI {
        a -= TAU;
    } else if a < -PI {
        a += TAU;
    }
    a
}
