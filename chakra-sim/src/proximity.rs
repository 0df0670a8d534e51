//! Infrared proximity ring simulator
//!
//! Each sensor casts one ray from the body edge along its mounting angle and
//! converts the hit distance to an intensity through the configured lookup
//! table. Closer obstacles give higher intensities.

use crate::config::ProximityConfig;
use crate::map::SimulationMap;
use crate::noise::NoiseGenerator;

/// Proximity ring simulator
pub struct ProximitySimulator {
    config: ProximityConfig,
    noise: NoiseGenerator,
    /// Distance of the last lookup table entry
    max_range: f32,
}

impl ProximitySimulator {
    /// Create new proximity simulator
    pub fn new(config: &ProximityConfig, noise: NoiseGenerator) -> Self {
        let max_range = config
            .lookup_table
            .last()
            .map(|entry| entry[0])
            .unwrap_or(0.0);
        Self {
            config: config.clone(),
            noise,
            max_range,
        }
    }

    /// Number of sensors on the ring
    pub fn len(&self) -> usize {
        self.config.sensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.config.sensors.is_empty()
    }

    /// Index of the sensor with the given device name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.config.sensors.iter().position(|s| s.name == name)
    }

    /// Sample every sensor from the given robot pose into `out`.
    pub fn sample(
        &mut self,
        map: &SimulationMap,
        robot_x: f32,
        robot_y: f32,
        robot_theta: f32,
        body_radius: f32,
        out: &mut Vec<f32>,
    ) {
        out.clear();
        for sensor in &self.config.sensors {
            let world_angle = robot_theta + sensor.angle;
            let ox = robot_x + body_radius * world_angle.cos();
            let oy = robot_y + body_radius * world_angle.sin();

            let distance = map.ray_cast(ox, oy, world_angle, self.max_range);
            let clean = if distance >= self.max_range {
                self.config.ambient
            } else {
                lookup(&self.config.lookup_table, distance)
            };

            let value = clean + self.noise.gaussian(self.config.noise_stddev);
            out.push(value.max(0.0));
        }
    }
}

/// Piecewise-linear interpolation of a (distance, intensity) table.
///
/// Distances below the first entry clamp to its intensity.
pub fn lookup(table: &[[f32; 2]], distance: f32) -> f32 {
    let Some(first) = table.first() else {
        return 0.0;
    };
    if distance <= first[0] {
        return first[1];
    }

    for pair in table.windows(2) {
        let [d0, v0] = pair[0];
        let [d1, v1] = pair[1];
        if distance <= d1 {
            let span = d1 - d0;
            if span <= 0.0 {
                return v1;
            }
            let t = (distance - d0) / span;
            return v0 + t * (v1 - v0);
        }
    }

    table[table.len() - 1][1]
}
