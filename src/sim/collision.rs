//! Player vs. track collision
//!
//! A discrete positional test: same lane and within a longitudinal window
//! of the player. There is no sweep between steps, so at very high relative
//! speed an entity can slip past between two ticks.

use super::event::GameEvent;
use super::player::{LaneController, PlayerState};
use super::session::SessionState;
use super::spawner::{EntityId, EntityKind, Spawner, TrackEntity};
use crate::tuning::Tuning;

/// Result of a collision check
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionResult {
    /// First obstacle the player ran into (takes precedence over pickups)
    pub obstacle: Option<EntityId>,
    /// Collectibles reached this step as (id, value); empty when an obstacle hit
    pub collectibles: Vec<(EntityId, u32)>,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self::default()
    }

    pub fn hit(&self) -> bool {
        self.obstacle.is_some() || !self.collectibles.is_empty()
    }
}

/// Lane equality plus longitudinal window
#[inline]
pub fn overlaps(player: &PlayerState, entity: &TrackEntity, tuning: &Tuning) -> bool {
    entity.alive
        && entity.lane == player.lane
        && (entity.position - player.distance()).abs() <= tuning.collision_window
}

/// Find everything the player touches this step, without side effects
pub fn detect<'a>(
    player: &PlayerState,
    entities: impl IntoIterator<Item = &'a TrackEntity>,
    tuning: &Tuning,
) -> CollisionResult {
    if !player.alive {
        return CollisionResult::miss();
    }

    let mut result = CollisionResult::miss();
    for entity in entities {
        if !overlaps(player, entity, tuning) {
            continue;
        }
        match entity.kind {
            EntityKind::Obstacle => {
                // Jumping high enough carries the player over
                if player.height() < tuning.obstacle_clearance {
                    result.obstacle = Some(entity.id);
                    result.collectibles.clear();
                    return result;
                }
            }
            EntityKind::Collectible => result.collectibles.push((entity.id, entity.value)),
        }
    }
    result
}

/// Detect and apply this step's collisions
///
/// An obstacle hit kills the player, ends the session and short-circuits
/// pickups; otherwise every reached collectible is scored and consumed.
pub fn resolve(
    controller: &mut LaneController,
    spawner: &mut Spawner,
    session: &mut SessionState,
    tuning: &Tuning,
    events: &mut Vec<GameEvent>,
) -> CollisionResult {
    let result = detect(controller.player(), spawner.live_entities(), tuning);

    if let Some(id) = result.obstacle {
        controller.kill(events);
        session.game_over(events);
        spawner.consume(id, events);
        return result;
    }

    for &(id, value) in &result.collectibles {
        if spawner.consume(id, events) {
            session.add_score(value as u64, events);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::event::RemovalReason;
    use crate::sim::player::PlayerInput;

    struct Fixture {
        tuning: Tuning,
        controller: LaneController,
        spawner: Spawner,
        session: SessionState,
        events: Vec<GameEvent>,
    }

    fn fixture() -> Fixture {
        let tuning = Tuning::default();
        Fixture {
            controller: LaneController::new(&tuning),
            spawner: Spawner::new(&tuning),
            session: SessionState::new(0),
            events: Vec::new(),
            tuning,
        }
    }

    impl Fixture {
        fn resolve(&mut self) -> CollisionResult {
            resolve(
                &mut self.controller,
                &mut self.spawner,
                &mut self.session,
                &self.tuning,
                &mut self.events,
            )
        }
    }

    #[test]
    fn test_obstacle_kills_and_ends_session() {
        let mut f = fixture();
        let id = f
            .spawner
            .place_obstacle(1, 10.0, &f.tuning, &mut f.events)
            .unwrap();
        f.controller.teleport(1, 10.0, &f.tuning);
        f.events.clear();

        let result = f.resolve();
        assert_eq!(result.obstacle, Some(id));
        assert!(!f.controller.player().alive);
        assert!(!f.session.is_active());
        assert!(f.spawner.entity(id).is_none());
        let game_overs = f
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(game_overs, 1);

        // Dead player no longer collides
        f.spawner.place_obstacle(1, 10.0, &f.tuning, &mut f.events);
        assert!(!f.resolve().hit());
    }

    #[test]
    fn test_collectible_scores_and_is_consumed() {
        let mut f = fixture();
        let id = f
            .spawner
            .place_collectible(0, 5.0, Some(10), &f.tuning, &mut f.events)
            .unwrap();
        f.controller.teleport(0, 5.0, &f.tuning);
        f.events.clear();

        let result = f.resolve();
        assert_eq!(result.collectibles, vec![(id, 10)]);
        assert_eq!(f.session.score(), 10);
        assert!(f.session.is_active());
        assert!(f.events.contains(&GameEvent::ScoreChanged { score: 10 }));
        assert!(f.events.contains(&GameEvent::EntityRemoved {
            id,
            reason: RemovalReason::Consumed
        }));

        // Consumed exactly once
        assert!(!f.resolve().hit());
        assert_eq!(f.session.score(), 10);
    }

    #[test]
    fn test_obstacle_takes_precedence_over_collectible() {
        let mut f = fixture();
        let coin = f
            .spawner
            .place_collectible(1, 20.0, None, &f.tuning, &mut f.events)
            .unwrap();
        f.spawner.place_obstacle(1, 20.5, &f.tuning, &mut f.events);
        f.controller.teleport(1, 20.0, &f.tuning);

        let result = f.resolve();
        assert!(result.obstacle.is_some());
        assert!(result.collectibles.is_empty());
        assert_eq!(f.session.score(), 0);
        assert!(f.spawner.entity(coin).is_some());
    }

    #[test]
    fn test_window_and_lane() {
        let mut f = fixture();
        f.spawner.place_obstacle(0, 10.0, &f.tuning, &mut f.events);
        f.spawner.place_obstacle(1, 11.5, &f.tuning, &mut f.events);
        f.controller.teleport(1, 10.0, &f.tuning);
        assert!(!f.resolve().hit());

        f.controller.teleport(1, 10.5, &f.tuning);
        assert!(f.resolve().obstacle.is_some());
    }

    #[test]
    fn test_jump_clears_obstacle() {
        let mut f = fixture();
        f.spawner.place_obstacle(1, 10.0, &f.tuning, &mut f.events);
        f.controller
            .handle_input(PlayerInput::Jump, &f.tuning, &mut f.events);
        f.controller.step(0.2, &f.tuning, &mut f.events);
        assert!(f.controller.player().height() > f.tuning.obstacle_clearance);

        f.controller.teleport(1, 10.0, &f.tuning);
        assert!(!f.resolve().hit());
        assert!(f.controller.player().alive);
    }

    #[test]
    fn test_airborne_player_still_collects() {
        let mut f = fixture();
        f.spawner
            .place_collectible(1, 10.0, None, &f.tuning, &mut f.events);
        f.controller
            .handle_input(PlayerInput::Jump, &f.tuning, &mut f.events);
        f.controller.step(0.2, &f.tuning, &mut f.events);
        f.controller.teleport(1, 10.0, &f.tuning);

        assert_eq!(f.resolve().collectibles.len(), 1);
        assert_eq!(f.session.score(), 10);
    }
}
