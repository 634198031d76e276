//! Player state and the lane/jump state machine
//!
//! The controller is the only thing that mutates [`PlayerState`]. Lane index
//! is discrete and drives collision; the lateral position is a smoothed
//! visual follower of it.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::event::GameEvent;
use crate::smoothing_alpha;
use crate::tuning::Tuning;

/// Discrete player commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerInput {
    MoveLeft,
    MoveRight,
    Jump,
}

/// Derived movement state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerPhase {
    Grounded,
    Airborne,
    /// Terminal until the session restarts
    Dead,
}

/// The runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub lane: u8,
    pub vertical_velocity: f32,
    pub grounded: bool,
    pub alive: bool,
    /// x = lateral offset, y = height above track, z = distance along track
    pub position: Vec3,
    /// Current forward speed
    pub run_speed: f32,
}

impl PlayerState {
    pub fn new(tuning: &Tuning) -> Self {
        let lane = tuning.start_lane();
        Self {
            lane,
            vertical_velocity: 0.0,
            grounded: true,
            alive: true,
            position: Vec3::new(tuning.lane_offset(lane), 0.0, 0.0),
            run_speed: tuning.run_speed,
        }
    }

    pub fn phase(&self) -> PlayerPhase {
        if !self.alive {
            PlayerPhase::Dead
        } else if self.grounded {
            PlayerPhase::Grounded
        } else {
            PlayerPhase::Airborne
        }
    }

    /// Distance along the track
    #[inline]
    pub fn distance(&self) -> f32 {
        self.position.z
    }

    /// Height above the track
    #[inline]
    pub fn height(&self) -> f32 {
        self.position.y
    }
}

/// Owns the player and applies inputs, gravity and lane smoothing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaneController {
    player: PlayerState,
}

impl LaneController {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            player: PlayerState::new(tuning),
        }
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    /// Apply one input; out-of-bounds moves and mid-air jumps are ignored
    pub fn handle_input(&mut self, input: PlayerInput, tuning: &Tuning, events: &mut Vec<GameEvent>) {
        if !self.player.alive {
            return;
        }

        match input {
            PlayerInput::MoveLeft => {
                if self.player.lane > 0 {
                    self.player.lane -= 1;
                }
            }
            PlayerInput::MoveRight => {
                if self.player.lane + 1 < tuning.lane_count {
                    self.player.lane += 1;
                }
            }
            PlayerInput::Jump => {
                if self.player.grounded {
                    let velocity = tuning.jump_velocity();
                    self.player.vertical_velocity = velocity;
                    self.player.grounded = false;
                    events.push(GameEvent::Jumped { velocity });
                }
            }
        }
    }

    /// Advance gravity, lane smoothing and forward motion by `dt`
    pub fn step(&mut self, dt: f32, tuning: &Tuning, events: &mut Vec<GameEvent>) {
        let player = &mut self.player;
        if !player.alive {
            return;
        }

        // Vertical axis (semi-implicit Euler)
        if !player.grounded {
            player.vertical_velocity += tuning.gravity * dt;
            player.position.y += player.vertical_velocity * dt;

            if player.vertical_velocity <= 0.0 && player.position.y <= 0.0 {
                player.position.y = 0.0;
                player.vertical_velocity = 0.0;
                player.grounded = true;
                events.push(GameEvent::Landed);
            }
        }

        // Lateral: exponential approach to the lane center
        let target_x = tuning.lane_offset(player.lane);
        player.position.x += (target_x - player.position.x) * smoothing_alpha(tuning.lane_smoothing, dt);

        // Forward
        player.position.z += player.run_speed * dt;
        player.run_speed = (player.run_speed + tuning.run_acceleration * dt).min(tuning.max_run_speed);

        events.push(GameEvent::PositionChanged {
            lane: player.lane,
            position: player.position,
        });
    }

    /// Terminal transition; freezes the player where it stands
    pub fn kill(&mut self, events: &mut Vec<GameEvent>) {
        if !self.player.alive {
            return;
        }
        self.player.alive = false;
        self.player.vertical_velocity = 0.0;
        events.push(GameEvent::PlayerDied);
        log::debug!(
            "Player died at distance {:.1} in lane {}",
            self.player.position.z,
            self.player.lane
        );
    }

    /// Fresh player at the start line
    pub fn reset(&mut self, tuning: &Tuning) {
        self.player = PlayerState::new(tuning);
    }

    /// Place the player directly (scripted scenarios, replays)
    pub fn teleport(&mut self, lane: u8, distance: f32, tuning: &Tuning) {
        if lane >= tuning.lane_count {
            return;
        }
        self.player.lane = lane;
        self.player.position.x = tuning.lane_offset(lane);
        self.player.position.z = distance;
    }
}
