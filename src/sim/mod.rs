//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or storage dependencies

pub mod autopilot;
pub mod collision;
pub mod event;
pub mod player;
pub mod rng;
pub mod session;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{CollisionResult, detect, resolve};
pub use event::{GameEvent, RemovalReason};
pub use player::{LaneController, PlayerInput, PlayerPhase, PlayerState};
pub use rng::{RandomSource, ScriptedSource, SimRng};
pub use session::{SessionPhase, SessionState};
pub use spawner::{EntityId, EntityKind, SpawnCursor, Spawner, TrackEntity, difficulty_at};
pub use state::{GamePhase, GameState};
pub use tick::{TickInput, tick};
