//! Observable simulation events
//!
//! Rendering, audio and UI react to these; none of them feed back into the
//! simulation.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::spawner::{EntityId, EntityKind};

/// Why an entity left the track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemovalReason {
    /// Hit or collected by the player
    Consumed,
    /// Fell behind the retention distance
    LeftBehind,
    /// Track wiped by a restart
    Cleared,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Player moved (x = lateral, y = height, z = distance along track)
    PositionChanged { lane: u8, position: Vec3 },
    Jumped { velocity: f32 },
    Landed,
    PlayerDied,
    EntitySpawned {
        id: EntityId,
        kind: EntityKind,
        lane: u8,
        position: f32,
    },
    EntityRemoved { id: EntityId, reason: RemovalReason },
    ScoreChanged { score: u64 },
    GameOver { final_score: u64, new_high_score: bool },
    DifficultyChanged { difficulty: f32 },
    Paused,
    Resumed,
    Restarted,
}
