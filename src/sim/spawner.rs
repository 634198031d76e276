//! Procedural track generation
//!
//! The spawner keeps the stretch of track in front of the player filled with
//! obstacle batches and the occasional collectible, scaled by a difficulty
//! ramp, and retires whatever falls too far behind.

use serde::{Deserialize, Serialize};

use super::event::{GameEvent, RemovalReason};
use super::rng::RandomSource;
use crate::consts::{MAX_BATCHES_PER_STEP, MAX_OBSTACLES_PER_BATCH};
use crate::tuning::Tuning;

/// Stable entity handle
pub type EntityId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Obstacle,
    Collectible,
}

/// Something placed on the track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackEntity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub lane: u8,
    /// Distance along the track
    pub position: f32,
    /// Points awarded on pickup (always 0 for obstacles)
    pub value: u32,
    /// Cleared when consumed; storage is swept by the spawner
    pub alive: bool,
}

/// Committed generation state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnCursor {
    /// Anchor of the most recent batch
    pub last_spawn_position: f32,
    /// Interval sampled for the most recent batch
    pub next_spawn_delta: f32,
    /// Obstacle density multiplier in [1, max_difficulty]
    pub difficulty: f32,
}

impl SpawnCursor {
    pub fn new(start: f32) -> Self {
        Self {
            last_spawn_position: start,
            next_spawn_delta: 0.0,
            difficulty: 1.0,
        }
    }
}

/// Saturating linear difficulty ramp
pub fn difficulty_at(elapsed: f32, tuning: &Tuning) -> f32 {
    (1.0 + elapsed.max(0.0) * tuning.difficulty_rate).min(tuning.max_difficulty)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spawner {
    cursor: SpawnCursor,
    /// Sorted by id (spawn order)
    entities: Vec<TrackEntity>,
    next_id: EntityId,
}

impl Spawner {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            cursor: SpawnCursor::new(tuning.run_up_distance),
            entities: Vec::new(),
            next_id: 1,
        }
    }

    pub fn cursor(&self) -> &SpawnCursor {
        &self.cursor
    }

    pub fn difficulty(&self) -> f32 {
        self.cursor.difficulty
    }

    /// Entities still on the track
    pub fn live_entities(&self) -> impl Iterator<Item = &TrackEntity> {
        self.entities.iter().filter(|e| e.alive)
    }

    pub fn live_count(&self) -> usize {
        self.live_entities().count()
    }

    pub fn entity(&self, id: EntityId) -> Option<&TrackEntity> {
        self.entities.iter().find(|e| e.id == id && e.alive)
    }

    /// One simulation step: difficulty, horizon fill, cleanup
    pub fn step(
        &mut self,
        player_distance: f32,
        elapsed: f32,
        tuning: &Tuning,
        rng: &mut impl RandomSource,
        events: &mut Vec<GameEvent>,
    ) {
        self.update_difficulty(elapsed, tuning, events);

        let mut batches = 0;
        while !self.horizon_filled(player_distance, tuning) && batches < MAX_BATCHES_PER_STEP {
            self.spawn_batch(tuning, rng, events);
            batches += 1;
        }
        if !self.horizon_filled(player_distance, tuning) {
            log::warn!(
                "Spawn horizon not filled after {batches} batches (cursor {:.1}, player {:.1})",
                self.cursor.last_spawn_position,
                player_distance
            );
        }

        self.cleanup(player_distance, tuning, events);
    }

    /// Whether committed track covers the look-ahead in front of the player
    pub fn horizon_filled(&self, player_distance: f32, tuning: &Tuning) -> bool {
        player_distance + tuning.look_ahead <= self.cursor.last_spawn_position
    }

    /// Recompute difficulty from session time; never decreases
    pub fn update_difficulty(&mut self, elapsed: f32, tuning: &Tuning, events: &mut Vec<GameEvent>) {
        let difficulty = difficulty_at(elapsed, tuning).max(self.cursor.difficulty);
        if difficulty > self.cursor.difficulty {
            self.cursor.difficulty = difficulty;
            events.push(GameEvent::DifficultyChanged { difficulty });
        }
    }

    /// Commit one batch past the cursor
    pub fn spawn_batch(&mut self, tuning: &Tuning, rng: &mut impl RandomSource, events: &mut Vec<GameEvent>) {
        let interval = rng.range_f32(tuning.min_spawn_interval, tuning.max_spawn_interval);
        let spawn_position = self.cursor.last_spawn_position + interval;
        self.cursor.next_spawn_delta = interval;
        self.cursor.last_spawn_position = spawn_position;

        let base = rng.range_u32_inclusive(tuning.min_obstacles, tuning.max_obstacles);
        let count = ((base as f32 * self.cursor.difficulty).round_ties_even() as u32)
            .clamp(1, MAX_OBSTACLES_PER_BATCH);

        // Lanes are sampled independently: a batch may block every lane
        for i in 0..count {
            let lane = rng.lane(tuning.lane_count);
            let position = spawn_position + i as f32 * tuning.obstacle_spacing;
            self.push(EntityKind::Obstacle, lane, position, 0, events);
        }

        if rng.chance(tuning.collectible_chance) {
            let offset = rng.range_f32(tuning.collectible_offset_min, tuning.collectible_offset_max);
            let lane = rng.lane(tuning.lane_count);
            self.push(
                EntityKind::Collectible,
                lane,
                spawn_position + offset,
                tuning.collectible_value,
                events,
            );
        }

        log::debug!(
            "Batch at {spawn_position:.1}: {count} obstacle(s), difficulty {:.2}",
            self.cursor.difficulty
        );
    }

    /// Place an obstacle without touching the cursor
    pub fn place_obstacle(
        &mut self,
        lane: u8,
        position: f32,
        tuning: &Tuning,
        events: &mut Vec<GameEvent>,
    ) -> Option<EntityId> {
        (lane < tuning.lane_count).then(|| self.push(EntityKind::Obstacle, lane, position, 0, events))
    }

    /// Place a collectible without touching the cursor (`None` value uses the tuned default)
    pub fn place_collectible(
        &mut self,
        lane: u8,
        position: f32,
        value: Option<u32>,
        tuning: &Tuning,
        events: &mut Vec<GameEvent>,
    ) -> Option<EntityId> {
        let value = value.unwrap_or(tuning.collectible_value);
        (lane < tuning.lane_count)
            .then(|| self.push(EntityKind::Collectible, lane, position, value, events))
    }

    fn push(
        &mut self,
        kind: EntityKind,
        lane: u8,
        position: f32,
        value: u32,
        events: &mut Vec<GameEvent>,
    ) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        self.entities.push(TrackEntity {
            id,
            kind,
            lane,
            position,
            value,
            alive: true,
        });
        events.push(GameEvent::EntitySpawned {
            id,
            kind,
            lane,
            position,
        });
        id
    }

    /// Mark an entity consumed; returns false if it was already gone
    pub fn consume(&mut self, id: EntityId, events: &mut Vec<GameEvent>) -> bool {
        match self.entities.iter_mut().find(|e| e.id == id && e.alive) {
            Some(entity) => {
                entity.alive = false;
                events.push(GameEvent::EntityRemoved {
                    id,
                    reason: RemovalReason::Consumed,
                });
                true
            }
            None => false,
        }
    }

    /// Drop consumed entities and those beyond the retention distance
    pub fn cleanup(&mut self, player_distance: f32, tuning: &Tuning, events: &mut Vec<GameEvent>) {
        let cutoff = player_distance - tuning.retention_distance;
        self.entities.retain(|e| {
            if !e.alive {
                return false;
            }
            if e.position < cutoff {
                events.push(GameEvent::EntityRemoved {
                    id: e.id,
                    reason: RemovalReason::LeftBehind,
                });
                return false;
            }
            true
        });
    }

    /// Remove consumed entities from storage
    pub fn sweep(&mut self) {
        self.entities.retain(|e| e.alive);
    }

    /// Fresh cursor and empty track; entity ids keep counting up
    pub fn reset(&mut self, tuning: &Tuning, events: &mut Vec<GameEvent>) {
        for entity in self.entities.drain(..).filter(|e| e.alive) {
            events.push(GameEvent::EntityRemoved {
                id: entity.id,
                reason: RemovalReason::Cleared,
            });
        }
        self.cursor = SpawnCursor::new(tuning.run_up_distance);
    }
}
