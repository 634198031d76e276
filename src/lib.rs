//! Neon Runner - An endless-runner simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (lanes, jumps, track generation, scoring)
//! - `tuning`: Data-driven game balance
//! - `game`: Host-facing wrapper (input buffering, event draining, high score I/O)
//! - `highscores`: Persisted high score record

pub mod error;
pub mod game;
pub mod highscores;
pub mod sim;
pub mod tuning;

pub use error::{ConfigError, StoreError};
pub use game::Game;
pub use highscores::{FileStore, HighScoreStore, MemoryStore};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Upper bound on spawn batches generated in a single step
    pub const MAX_BATCHES_PER_STEP: u32 = 64;
    /// Upper bound on obstacles in one batch (tuned base count and after difficulty scaling)
    pub const MAX_OBSTACLES_PER_BATCH: u32 = 32;

    /// How far ahead the autopilot scans each lane
    pub const AUTOPILOT_LOOKAHEAD: f32 = 12.0;
    /// Obstacle distance at which the autopilot commits to a jump
    pub const AUTOPILOT_JUMP_DISTANCE: f32 = 3.0;
}

/// Lateral offset of a lane center, with the middle of the track at zero
#[inline]
pub fn lane_offset(lane: u8, lane_count: u8, lane_spacing: f32) -> f32 {
    let center = (lane_count.max(1) - 1) as f32 / 2.0;
    (lane as f32 - center) * lane_spacing
}

/// Frame-rate independent smoothing factor for exponential approach
///
/// Moving `x += (target - x) * smoothing_alpha(rate, dt)` converges at the
/// same speed regardless of how `dt` is sliced.
#[inline]
pub fn smoothing_alpha(rate: f32, dt: f32) -> f32 {
    1.0 - (-rate * dt).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_offset_three_lanes() {
        assert_eq!(lane_offset(0, 3, 3.0), -3.0);
        assert_eq!(lane_offset(1, 3, 3.0), 0.0);
        assert_eq!(lane_offset(2, 3, 3.0), 3.0);
    }

    #[test]
    fn test_lane_offset_even_lane_count() {
        assert_eq!(lane_offset(0, 2, 2.0), -1.0);
        assert_eq!(lane_offset(1, 2, 2.0), 1.0);
    }

    #[test]
    fn test_smoothing_is_frame_rate_independent() {
        let rate = 5.0;
        // One 0.2s step vs four 0.05s steps
        let mut a = 0.0_f32;
        a += (1.0 - a) * smoothing_alpha(rate, 0.2);

        let mut b = 0.0_f32;
        for _ in 0..4 {
            b += (1.0 - b) * smoothing_alpha(rate, 0.05);
        }
        assert!((a - b).abs() < 1e-5);
    }
}
