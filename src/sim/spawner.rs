//! Procedural spawning
//!
//! One countdown drives both games: in the side-scroller it places a rock
//! pair plus the invisible score trigger just off the right edge and sets
//! them crossing the field; in the slicing game it tosses a target (or bomb)
//! up from below the bottom edge. All randomness comes from the state's
//! seeded RNG, so runs with the same seed spawn identically.

use glam::Vec2;
use rand::Rng;

use super::shape::Shape;
use super::state::{ActionKind, Entity, GameState, PhysicsBody, Role};
use crate::config::GameMode;
use crate::consts::*;

/// Advance the spawn countdown, firing as many spawns as `dt` covers
pub fn run_spawner(state: &mut GameState, dt: f32) {
    state.spawn_countdown -= dt;
    while state.spawn_countdown <= 0.0 {
        state.spawn_countdown += state.config.spawn_interval;
        match state.config.mode {
            GameMode::SideScroller => {
                spawn_pair(state);
            }
            GameMode::Slicing => spawn_toss(state),
        }
    }
}

/// Spawn a rock pair and its score trigger. Returns the random vertical
/// offset the gap was placed at.
pub fn spawn_pair(state: &mut GameState) -> i32 {
    let frame_w = state.config.frame_width;
    let frame_h = state.config.frame_height;
    let gap = state.config.rock_gap;

    // Closed integer range; both bounds are reachable
    let y_max = (frame_h / 3.0) as i32;
    let y_offset = state.rng().random_range(ROCK_Y_OFFSET_MIN..=y_max);

    let spawn_x = frame_w + ROCK_WIDTH;
    let crossing = frame_w + ROCK_WIDTH * 2.0;
    let vel = Vec2::new(-crossing / ROCK_TRAVEL_SECS, 0.0);

    let rock_shape = Shape::rect(ROCK_WIDTH, ROCK_HEIGHT);
    let mut rock_body = PhysicsBody::new(rock_shape);
    rock_body.vel = vel;
    rock_body.contact_mask = Role::Player.bit();

    let bottom_id = state.next_entity_id();
    let top_id = state.next_entity_id();
    let trigger_id = state.next_entity_id();

    let bottom = Entity::new(
        bottom_id,
        Role::Obstacle,
        Vec2::new(spawn_x, y_offset as f32 - gap),
        rock_body,
    );

    let mut top = Entity::new(
        top_id,
        Role::Obstacle,
        Vec2::new(spawn_x, y_offset as f32 + ROCK_HEIGHT),
        rock_body,
    );
    top.flipped = true;

    let mut trigger_body = PhysicsBody::new(Shape::rect(SCORE_TRIGGER_WIDTH, frame_h));
    trigger_body.vel = vel;
    trigger_body.contact_mask = Role::Player.bit();
    let trigger = Entity::new(
        trigger_id,
        Role::ScoreTrigger,
        Vec2::new(spawn_x + SCORE_TRIGGER_WIDTH * 2.0, frame_h / 2.0),
        trigger_body,
    );

    log::debug!(
        "spawned rock pair at tick {} (y offset {})",
        state.time_ticks,
        y_offset
    );

    for id in [bottom_id, top_id, trigger_id] {
        state.schedule(ROCK_TRAVEL_SECS, ActionKind::Despawn(id));
    }
    state.stage_spawn(bottom);
    state.stage_spawn(top);
    state.stage_spawn(trigger);

    y_offset
}

/// Toss a target (or, with configured chance, a bomb) up from the bottom edge
pub fn spawn_toss(state: &mut GameState) {
    let frame_w = state.config.frame_width;
    let bomb_chance = state.config.bomb_chance;

    let margin = TARGET_RADIUS * 2.0;
    let x = state.rng().random_range(margin..=frame_w - margin);
    let drift = state.rng().random_range(-TOSS_DRIFT_MAX..=TOSS_DRIFT_MAX);
    let launch = state.rng().random_range(TOSS_SPEED_MIN..=TOSS_SPEED_MAX);
    let is_bomb = state.rng().random_bool(bomb_chance);

    let role = if is_bomb { Role::Bomb } else { Role::SlicedTarget };
    let mut body = PhysicsBody::new(Shape::circle(TARGET_RADIUS));
    body.vel = Vec2::new(drift, launch);
    body.gravity_affected = true;
    // Cut by the gesture path, not by the physics pass
    body.contact_mask = 0;

    let id = state.next_entity_id();
    state.stage_spawn(Entity::new(
        id,
        role,
        Vec2::new(x, -TARGET_RADIUS),
        body,
    ));

    log::debug!("tossed {:?} {} at tick {}", role, id, state.time_ticks);
}
