//! Occupancy grid for the simulated arena
//!
//! Either generated from an [`ArenaConfig`] or loaded from a ROS-standard
//! PGM + YAML pair.

use crate::config::ArenaConfig;
use crate::error::{Error, Result};
use image::{GrayImage, Luma};
use serde::Deserialize;
use std::path::Path;

const FREE: Luma<u8> = Luma([255u8]);
const OCCUPIED: Luma<u8> = Luma([0u8]);

/// Map metadata from YAML file (ROS standard format)
#[derive(Debug, Deserialize)]
pub struct MapMetadata {
    /// PGM image filename (relative to YAML file)
    pub image: String,

    /// Map resolution in meters per pixel
    pub resolution: f32,

    /// Origin of map [x, y, yaw] - world coordinates of bottom-left pixel
    pub origin: [f32; 3],

    /// Threshold for occupied cells (0.0-1.0, pixel > threshold*255 = occupied)
    #[serde(default = "default_occupied_thresh")]
    pub occupied_thresh: f32,
}

fn default_occupied_thresh() -> f32 {
    0.65
}

/// Occupancy grid the physics and proximity simulators query
pub struct SimulationMap {
    /// Occupancy grid pixels
    pixels: GrayImage,

    /// Resolution in meters per pixel
    resolution: f32,

    /// Origin (x, y) in world coordinates
    origin: (f32, f32),

    /// Pixel threshold for occupied (0-255)
    occupied_thresh: u8,
}

impl SimulationMap {
    /// Build a walled rectangular arena with box obstacles.
    ///
    /// The arena spans `(0, 0)` to `(width, height)` in world coordinates.
    pub fn arena(config: &ArenaConfig) -> Result<Self> {
        if config.resolution <= 0.0 || config.width <= 0.0 || config.height <= 0.0 {
            return Err(Error::InvalidParameter(format!(
                "arena {}x{} m at {} m/px",
                config.width, config.height, config.resolution
            )));
        }

        let cols = ((config.width / config.resolution).round() as u32).max(1);
        let rows = ((config.height / config.resolution).round() as u32).max(1);
        let mut map = Self {
            pixels: GrayImage::from_pixel(cols, rows, FREE),
            resolution: config.resolution,
            origin: (0.0, 0.0),
            occupied_thresh: 128,
        };

        let t = config.wall_thickness;
        map.fill_rect(0.0, 0.0, config.width, t);
        map.fill_rect(0.0, config.height - t, config.width, config.height);
        map.fill_rect(0.0, 0.0, t, config.height);
        map.fill_rect(config.width - t, 0.0, config.width, config.height);

        for obstacle in &config.obstacles {
            let hw = obstacle.width / 2.0;
            let hh = obstacle.height / 2.0;
            map.fill_rect(
                obstacle.x - hw,
                obstacle.y - hh,
                obstacle.x + hw,
                obstacle.y + hh,
            );
        }

        Ok(map)
    }

    /// Load map from ROS-standard YAML + PGM files
    pub fn load<P: AsRef<Path>>(yaml_path: P) -> Result<Self> {
        let yaml_path = yaml_path.as_ref();

        let yaml_content = std::fs::read_to_string(yaml_path)
            .map_err(|e| Error::Config(format!("Failed to read map YAML: {}", e)))?;

        let metadata: MapMetadata = serde_yaml::from_str(&yaml_content)
            .map_err(|e| Error::Config(format!("Failed to parse map YAML: {}", e)))?;

        // Determine base directory for relative paths
        let yaml_dir = yaml_path.parent().unwrap_or(Path::new("."));

        let pgm_path = yaml_dir.join(&metadata.image);
        let img = image::open(&pgm_path)
            .map_err(|e| {
                Error::Config(format!(
                    "Failed to load map image {}: {}",
                    pgm_path.display(),
                    e
                ))
            })?
            .into_luma8();

        // occupied_thresh: pixels BELOW this are occupied (darker = occupied)
        let occupied_thresh = ((1.0 - metadata.occupied_thresh) * 255.0) as u8;

        Ok(Self {
            pixels: img,
            resolution: metadata.resolution,
            origin: (metadata.origin[0], metadata.origin[1]),
            occupied_thresh,
        })
    }

    /// Get map width in pixels
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Get map height in pixels
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Get map resolution in meters per pixel
    pub fn resolution(&self) -> f32 {
        self.resolution
    }

    /// Get map origin (world coordinates of bottom-left pixel)
    pub fn origin(&self) -> (f32, f32) {
        self.origin
    }

    /// Mark every cell whose center lies inside the world-frame rectangle
    fn fill_rect(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) {
        for py in 0..self.pixels.height() {
            for px in 0..self.pixels.width() {
                let (x, y) = self.pixel_to_world(px, py);
                if x >= x0 && x <= x1 && y >= y0 && y <= y1 {
                    self.pixels.put_pixel(px, py, OCCUPIED);
                }
            }
        }
    }

    /// Convert pixel coordinates to world coordinates (pixel center)
    pub fn pixel_to_world(&self, px: u32, py: u32) -> (f32, f32) {
        let x = self.origin.0 + (px as f32 + 0.5) * self.resolution;
        // Y is inverted: bottom of image = origin, top of image = +Y
        let y = self.origin.1
            + (self.pixels.height() as f32 - 1.0 - py as f32 + 0.5) * self.resolution;
        (x, y)
    }

    /// Convert world coordinates to pixel coordinates
    fn world_to_pixel(&self, x: f32, y: f32) -> Option<(u32, u32)> {
        let fx = ((x - self.origin.0) / self.resolution).floor();
        let fy = ((y - self.origin.1) / self.resolution).floor();
        let px = fx as i64;
        let py = (self.pixels.height() as i64 - 1) - fy as i64;

        if px >= 0
            && py >= 0
            && (px as u64) < self.pixels.width() as u64
            && (py as u64) < self.pixels.height() as u64
        {
            Some((px as u32, py as u32))
        } else {
            None
        }
    }

    /// Check if world coordinate is occupied
    pub fn is_occupied(&self, x: f32, y: f32) -> bool {
        match self.world_to_pixel(x, y) {
            Some((px, py)) => self.pixels.get_pixel(px, py).0[0] < self.occupied_thresh,
            None => true, // Out of bounds = occupied (wall)
        }
    }

    /// Ray-cast from origin in direction, return distance to obstacle
    ///
    /// Returns max_range if no obstacle is hit.
    pub fn ray_cast(&self, ox: f32, oy: f32, angle: f32, max_range: f32) -> f32 {
        if self.is_occupied(ox, oy) {
            return 0.0;
        }

        // Step size: half resolution for accuracy
        let step = self.resolution * 0.5;
        let dx = angle.cos() * step;
        let dy = angle.sin() * step;

        let mut x = ox;
        let mut y = oy;
        let mut distance = 0.0;

        while distance < max_range {
            x += dx;
            y += dy;
            distance += step;

            if self.is_occupied(x, y) {
                return distance.min(max_range);
            }
        }

        max_range
    }
}
