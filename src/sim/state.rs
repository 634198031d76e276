//! Game state and core simulation types
//!
//! `GameState` is the single owner of every simulation component. All of it
//! except the pending event queue serializes, so a snapshot resumes exactly.

use serde::{Deserialize, Serialize};

use super::event::GameEvent;
use super::player::{LaneController, PlayerInput, PlayerState};
use super::rng::SimRng;
use super::session::SessionState;
use super::spawner::{EntityId, Spawner};
use crate::error::ConfigError;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Stepping suspended; time does not accumulate
    Paused,
    /// Run ended, waiting for restart
    GameOver,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Validated balance for this run
    pub tuning: Tuning,
    /// Track generation randomness
    pub rng: SimRng,
    /// Session time in seconds (sum of stepped dt)
    pub elapsed: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub controller: LaneController,
    pub spawner: Spawner,
    pub session: SessionState,
    paused: bool,
    /// Events produced since the last drain
    #[serde(skip)]
    pub(crate) events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new run; rejects invalid tuning before anything starts
    pub fn new(seed: u64, tuning: Tuning, high_score: u64) -> Result<Self, ConfigError> {
        tuning.validate()?;
        log::info!(
            "New run: seed {seed:#x}, {} lanes, high score {high_score}",
            tuning.lane_count
        );
        Ok(Self {
            rng: SimRng::new(seed),
            elapsed: 0.0,
            time_ticks: 0,
            controller: LaneController::new(&tuning),
            spawner: Spawner::new(&tuning),
            session: SessionState::new(high_score),
            paused: false,
            events: Vec::new(),
            tuning,
        })
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn phase(&self) -> GamePhase {
        if !self.session.is_active() {
            GamePhase::GameOver
        } else if self.paused {
            GamePhase::Paused
        } else {
            GamePhase::Running
        }
    }

    pub fn player(&self) -> &PlayerState {
        self.controller.player()
    }

    /// Apply a player command immediately (dropped unless running)
    pub fn apply_input(&mut self, input: PlayerInput) {
        if self.phase() != GamePhase::Running {
            return;
        }
        self.controller
            .handle_input(input, &self.tuning, &mut self.events);
    }

    pub fn pause(&mut self) {
        if self.phase() == GamePhase::Running {
            self.paused = true;
            self.events.push(GameEvent::Paused);
        }
    }

    pub fn resume(&mut self) {
        if self.phase() == GamePhase::Paused {
            self.paused = false;
            self.events.push(GameEvent::Resumed);
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.phase() {
            GamePhase::Running => self.pause(),
            GamePhase::Paused => self.resume(),
            GamePhase::GameOver => {}
        }
    }

    /// Fresh player, track and score; high score and RNG stream carry over
    pub fn restart(&mut self) {
        self.controller.reset(&self.tuning);
        self.spawner.reset(&self.tuning, &mut self.events);
        self.session.restart();
        self.elapsed = 0.0;
        self.time_ticks = 0;
        self.paused = false;
        self.events.push(GameEvent::Restarted);
        log::info!("Run restarted (high score {})", self.session.high_score());
    }

    /// Scripted obstacle placement
    pub fn place_obstacle(&mut self, lane: u8, position: f32) -> Option<EntityId> {
        self.spawner
            .place_obstacle(lane, position, &self.tuning, &mut self.events)
    }

    /// Scripted collectible placement (`None` value uses the tuned default)
    pub fn place_collectible(&mut self, lane: u8, position: f32, value: Option<u32>) -> Option<EntityId> {
        self.spawner
            .place_collectible(lane, position, value, &self.tuning, &mut self.events)
    }

    /// Events produced since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_bad_tuning() {
        let tuning = Tuning {
            max_spawn_interval: 1.0,
            ..Default::default()
        };
        assert!(GameState::new(1, tuning, 0).is_err());
    }

    #[test]
    fn test_pause_resume_cycle() {
        let mut state = GameState::new(1, Tuning::default(), 0).unwrap();
        assert_eq!(state.phase(), GamePhase::Running);
        state.pause();
        assert_eq!(state.phase(), GamePhase::Paused);
        state.pause();
        state.toggle_pause();
        assert_eq!(state.phase(), GamePhase::Running);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::Paused, GameEvent::Resumed]
        );
    }

    #[test]
    fn test_input_dropped_while_paused() {
        let mut state = GameState::new(1, Tuning::default(), 0).unwrap();
        state.pause();
        state.apply_input(PlayerInput::MoveLeft);
        assert_eq!(state.player().lane, 1);
        state.resume();
        state.apply_input(PlayerInput::MoveLeft);
        assert_eq!(state.player().lane, 0);
    }

    #[test]
    fn test_restart_while_paused_resumes() {
        let mut state = GameState::new(1, Tuning::default(), 7).unwrap();
        state.pause();
        state.restart();
        assert_eq!(state.phase(), GamePhase::Running);
        assert_eq!(state.session.high_score(), 7);
        assert_eq!(state.events().last(), Some(&GameEvent::Restarted));
    }

    #[test]
    fn test_snapshot_round_trip_resumes_rng() {
        use crate::sim::rng::RandomSource;

        let mut state = GameState::new(77, Tuning::default(), 0).unwrap();
        let json = serde_json::to_string(&state).unwrap();
        let mut restored: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.seed(), 77);
        assert_eq!(
            state.rng.range_f32(0.0, 1.0),
            restored.rng.range_f32(0.0, 1.0)
        );
    }
}
