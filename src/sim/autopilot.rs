//! Idle/demo mode pilot
//!
//! Picks at most one command per tick from what lies ahead in each lane:
//! sidestep toward the lane whose nearest obstacle is farthest away, detour
//! for collectibles when the path is clear, and jump when boxed in.

use super::player::PlayerInput;
use super::spawner::EntityKind;
use super::state::GameState;
use crate::consts::{AUTOPILOT_JUMP_DISTANCE, AUTOPILOT_LOOKAHEAD};

/// What the pilot sees in one lane
#[derive(Debug, Clone, Copy)]
struct LaneView {
    /// Distance to the nearest obstacle ahead (infinite when clear)
    obstacle: f32,
    collectible: bool,
}

fn scan(state: &GameState) -> Vec<LaneView> {
    let player = state.player();
    let window = state.tuning.collision_window;
    let mut lanes = vec![
        LaneView {
            obstacle: f32::INFINITY,
            collectible: false,
        };
        state.tuning.lane_count as usize
    ];

    for entity in state.spawner.live_entities() {
        let ahead = entity.position - player.distance();
        if ahead < -window || ahead > AUTOPILOT_LOOKAHEAD {
            continue;
        }
        let Some(view) = lanes.get_mut(entity.lane as usize) else {
            continue;
        };
        match entity.kind {
            EntityKind::Obstacle => view.obstacle = view.obstacle.min(ahead.max(0.0)),
            EntityKind::Collectible => view.collectible = true,
        }
    }
    lanes
}

/// Choose this tick's command, if any
pub fn decide(state: &GameState) -> Option<PlayerInput> {
    let player = state.player();
    if !player.alive {
        return None;
    }

    let lanes = scan(state);
    let current = player.lane as usize;
    let here = lanes[current];

    let neighbors = [
        current.checked_sub(1).map(|l| (l, PlayerInput::MoveLeft)),
        (current + 1 < lanes.len()).then_some((current + 1, PlayerInput::MoveRight)),
    ];
    let best = neighbors
        .into_iter()
        .flatten()
        .max_by(|(a, _), (b, _)| {
            let (a, b) = (lanes[*a], lanes[*b]);
            a.obstacle
                .partial_cmp(&b.obstacle)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.collectible.cmp(&b.collectible))
        });

    if here.obstacle.is_infinite() {
        // Clear ahead: detour for a pickup only if that lane is clear too
        return best.and_then(|(lane, input)| {
            let view = lanes[lane];
            (view.collectible && !here.collectible && view.obstacle.is_infinite()).then_some(input)
        });
    }

    if let Some((lane, input)) = best {
        if lanes[lane].obstacle > here.obstacle {
            return Some(input);
        }
    }

    (player.grounded && here.obstacle <= AUTOPILOT_JUMP_DISTANCE).then_some(PlayerInput::Jump)
}
