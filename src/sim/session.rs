//! Score keeping and the active/game-over state machine

use serde::{Deserialize, Serialize};

use super::event::GameEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    Active,
    /// Terminal until restart
    GameOver,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    score: u64,
    high_score: u64,
    phase: SessionPhase,
    /// Fractional survival points not yet credited
    survival_carry: f32,
}

impl SessionState {
    /// Start an active session with a previously persisted high score
    pub fn new(high_score: u64) -> Self {
        Self {
            score: 0,
            high_score,
            phase: SessionPhase::Active,
            survival_carry: 0.0,
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == SessionPhase::Active
    }

    /// Credit points; ignored once the session is over
    pub fn add_score(&mut self, points: u64, events: &mut Vec<GameEvent>) {
        if !self.is_active() || points == 0 {
            return;
        }
        self.score = self.score.saturating_add(points);
        events.push(GameEvent::ScoreChanged { score: self.score });
    }

    /// Credit time survived at `points_per_second`, carrying fractions
    pub fn add_survival(&mut self, points_per_second: f32, dt: f32, events: &mut Vec<GameEvent>) {
        if !self.is_active() || points_per_second <= 0.0 {
            return;
        }
        self.survival_carry += points_per_second * dt;
        let whole = self.survival_carry.floor();
        if whole >= 1.0 {
            self.survival_carry -= whole;
            self.add_score(whole as u64, events);
        }
    }

    /// End the session. Returns the new record when the high score was beaten.
    ///
    /// Calling again after the session ended does nothing.
    pub fn game_over(&mut self, events: &mut Vec<GameEvent>) -> Option<u64> {
        if !self.is_active() {
            return None;
        }
        self.phase = SessionPhase::GameOver;

        let new_high_score = self.score > self.high_score;
        if new_high_score {
            self.high_score = self.score;
        }
        events.push(GameEvent::GameOver {
            final_score: self.score,
            new_high_score,
        });
        log::info!(
            "Game over: score {} (high score {}{})",
            self.score,
            self.high_score,
            if new_high_score { ", new record" } else { "" }
        );

        new_high_score.then_some(self.high_score)
    }

    /// Back to an active, zero-score session; the high score is kept
    pub fn restart(&mut self) {
        *self = Self::new(self.high_score);
    }
}
