//! Host-facing game wrapper
//!
//! Buffers player input between steps, drives the simulation either with a
//! caller-supplied `dt` or through a fixed-step accumulator, hands back the
//! events produced and writes new records to the high score store.

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::error::ConfigError;
use crate::highscores::{self, HighScoreStore};
use crate::sim::{GameEvent, GamePhase, GameState, PlayerInput, TickInput, tick};
use crate::tuning::Tuning;

/// Longest frame the accumulator accepts before clamping
const MAX_FRAME_DT: f32 = 0.1;

/// A running game plus its collaborators
pub struct Game {
    state: GameState,
    input: TickInput,
    accumulator: f32,
    store: Option<Box<dyn HighScoreStore>>,
}

impl Game {
    /// Build a game, reading the persisted high score first
    ///
    /// A missing or unreadable store starts from a high score of 0.
    pub fn new(
        seed: u64,
        tuning: Tuning,
        mut store: Option<Box<dyn HighScoreStore>>,
    ) -> Result<Self, ConfigError> {
        let high_score = highscores::load_or_default(store.as_deref_mut());
        Ok(Self {
            state: GameState::new(seed, tuning, high_score)?,
            input: TickInput::default(),
            accumulator: 0.0,
            store,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for scripted setups
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase()
    }

    pub fn score(&self) -> u64 {
        self.state.session.score()
    }

    pub fn high_score(&self) -> u64 {
        self.state.session.high_score()
    }

    /// Queue a command for the next step
    pub fn input(&mut self, input: PlayerInput) {
        self.input.actions.push(input);
    }

    pub fn pause(&mut self) {
        self.state.pause();
    }

    pub fn resume(&mut self) {
        self.state.resume();
    }

    pub fn restart(&mut self) {
        self.accumulator = 0.0;
        self.input.clear();
        self.state.restart();
    }

    /// Let the built-in pilot play
    pub fn set_idle(&mut self, idle: bool) {
        self.input.idle_mode = idle;
    }

    pub fn is_idle(&self) -> bool {
        self.input.idle_mode
    }

    /// Advance by exactly `dt` seconds and return the events produced
    pub fn step(&mut self, dt: f32) -> Vec<GameEvent> {
        self.tick_once(dt);
        self.collect_events()
    }

    /// Advance by a wall-clock frame using fixed `SIM_DT` substeps
    ///
    /// Leftover time carries into the next frame. At most `MAX_SUBSTEPS`
    /// ticks run per call.
    pub fn advance(&mut self, frame_dt: f32) -> Vec<GameEvent> {
        if frame_dt.is_finite() && frame_dt > 0.0 {
            self.accumulator += frame_dt.min(MAX_FRAME_DT);
        }

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.tick_once(SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        self.collect_events()
    }

    fn tick_once(&mut self, dt: f32) {
        tick(&mut self.state, &self.input, dt);
        // Clear one-shot inputs after processing
        self.input.clear();
    }

    fn collect_events(&mut self) -> Vec<GameEvent> {
        let events = self.state.drain_events();
        for event in &events {
            if let GameEvent::GameOver {
                final_score,
                new_high_score: true,
            } = *event
            {
                self.persist(final_score);
            }
        }
        events
    }

    fn persist(&mut self, high_score: u64) {
        let Some(store) = self.store.as_mut() else {
            return;
        };
        if let Err(err) = store.save(high_score) {
            log::warn!("Could not save high score {high_score}: {err}");
        }
    }
}
