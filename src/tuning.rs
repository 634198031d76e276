//! Data-driven game balance
//!
//! Every constant the simulation depends on lives here so hosts can load
//! alternative balance from JSON. Defaults reproduce the classic runner feel.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::MAX_OBSTACLES_PER_BATCH;
use crate::error::ConfigError;

/// Simulation tuning parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Track ===
    /// Number of lanes (3 = left/center/right)
    pub lane_count: u8,
    /// Lateral distance between lane centers
    pub lane_spacing: f32,
    /// Exponential smoothing rate for lane changes (1/s)
    pub lane_smoothing: f32,

    // === Player ===
    /// Vertical acceleration (negative = down)
    pub gravity: f32,
    /// Peak height of a jump
    pub jump_height: f32,
    /// Initial forward speed
    pub run_speed: f32,
    /// Forward speed gained per second
    pub run_acceleration: f32,
    /// Forward speed cap
    pub max_run_speed: f32,

    // === Spawning ===
    pub min_spawn_interval: f32,
    pub max_spawn_interval: f32,
    /// Inclusive bounds for the pre-difficulty obstacle count of a batch
    pub min_obstacles: u32,
    pub max_obstacles: u32,
    /// Longitudinal gap between obstacles of one batch
    pub obstacle_spacing: f32,
    /// Probability that a batch carries a collectible
    pub collectible_chance: f32,
    pub collectible_offset_min: f32,
    pub collectible_offset_max: f32,
    /// Points awarded per collectible
    pub collectible_value: u32,
    /// Distance ahead of the player that must always be generated
    pub look_ahead: f32,
    /// How far behind the player entities survive before cleanup
    pub retention_distance: f32,
    /// Empty track before the first batch
    pub run_up_distance: f32,

    // === Difficulty ===
    /// Difficulty gained per second of session time
    pub difficulty_rate: f32,
    /// Difficulty cap (>= 1)
    pub max_difficulty: f32,

    // === Collision ===
    /// Half-width of the longitudinal overlap window
    pub collision_window: f32,
    /// Player height at which obstacles pass underneath
    pub obstacle_clearance: f32,

    // === Scoring ===
    /// Points per second survived (0 disables)
    pub survival_points_per_second: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            lane_count: 3,
            lane_spacing: 3.0,
            lane_smoothing: 5.0,

            gravity: -30.0,
            jump_height: 15.0,
            run_speed: 10.0,
            run_acceleration: 0.1,
            max_run_speed: 25.0,

            min_spawn_interval: 2.0,
            max_spawn_interval: 5.0,
            min_obstacles: 1,
            max_obstacles: 2,
            obstacle_spacing: 5.0,
            collectible_chance: 0.3,
            collectible_offset_min: 10.0,
            collectible_offset_max: 20.0,
            collectible_value: 10,
            look_ahead: 50.0,
            retention_distance: 20.0,
            run_up_distance: 0.0,

            difficulty_rate: 0.1,
            max_difficulty: 2.0,

            collision_window: 1.0,
            obstacle_clearance: 1.0,

            survival_points_per_second: 10.0,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON (missing fields use defaults)
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject settings that could produce negative intervals, invalid lanes,
    /// or a difficulty outside [1, max]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lane_count == 0 {
            return Err(out_of_range("lane_count", "at least 1", 0.0));
        }
        positive("lane_spacing", self.lane_spacing)?;
        positive("lane_smoothing", self.lane_smoothing)?;

        finite("gravity", self.gravity)?;
        if self.gravity >= 0.0 {
            return Err(out_of_range("gravity", "negative", self.gravity));
        }
        positive("jump_height", self.jump_height)?;
        non_negative("run_speed", self.run_speed)?;
        non_negative("run_acceleration", self.run_acceleration)?;
        ordered("run_speed..max_run_speed", self.run_speed, self.max_run_speed)?;

        positive("min_spawn_interval", self.min_spawn_interval)?;
        ordered(
            "spawn_interval",
            self.min_spawn_interval,
            self.max_spawn_interval,
        )?;
        if self.max_obstacles < self.min_obstacles {
            return Err(ConfigError::InvertedRange {
                field: "obstacles",
                min: self.min_obstacles as f64,
                max: self.max_obstacles as f64,
            });
        }
        if self.max_obstacles > MAX_OBSTACLES_PER_BATCH {
            return Err(ConfigError::OutOfRange {
                field: "max_obstacles",
                requirement: "at most the per-batch obstacle cap",
                value: self.max_obstacles as f64,
            });
        }
        non_negative("obstacle_spacing", self.obstacle_spacing)?;
        finite("collectible_chance", self.collectible_chance)?;
        if !(0.0..=1.0).contains(&self.collectible_chance) {
            return Err(out_of_range(
                "collectible_chance",
                "within [0, 1]",
                self.collectible_chance,
            ));
        }
        non_negative("collectible_offset_min", self.collectible_offset_min)?;
        ordered(
            "collectible_offset",
            self.collectible_offset_min,
            self.collectible_offset_max,
        )?;
        positive("look_ahead", self.look_ahead)?;
        non_negative("retention_distance", self.retention_distance)?;
        non_negative("run_up_distance", self.run_up_distance)?;

        non_negative("difficulty_rate", self.difficulty_rate)?;
        finite("max_difficulty", self.max_difficulty)?;
        if self.max_difficulty < 1.0 {
            return Err(out_of_range(
                "max_difficulty",
                "at least 1",
                self.max_difficulty,
            ));
        }

        non_negative("collision_window", self.collision_window)?;
        non_negative("obstacle_clearance", self.obstacle_clearance)?;
        non_negative(
            "survival_points_per_second",
            self.survival_points_per_second,
        )?;
        Ok(())
    }

    /// Launch velocity that peaks exactly at `jump_height`
    pub fn jump_velocity(&self) -> f32 {
        (2.0 * self.gravity.abs() * self.jump_height).sqrt()
    }

    /// Lane the player starts in (center for odd lane counts)
    pub fn start_lane(&self) -> u8 {
        self.lane_count / 2
    }

    /// Lateral offset of a lane center
    pub fn lane_offset(&self, lane: u8) -> f32 {
        crate::lane_offset(lane, self.lane_count, self.lane_spacing)
    }
}

fn out_of_range(field: &'static str, requirement: &'static str, value: f32) -> ConfigError {
    ConfigError::OutOfRange {
        field,
        requirement,
        value: value as f64,
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(out_of_range(field, "finite", value))
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(out_of_range(field, "positive", value))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(out_of_range(field, "non-negative", value))
    }
}

fn ordered(field: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
    finite(field, max)?;
    if max < min {
        return Err(ConfigError::InvertedRange {
            field,
            min: min as f64,
            max: max as f64,
        });
    }
    Ok(())
}
