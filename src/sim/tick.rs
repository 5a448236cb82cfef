//! Fixed timestep simulation tick
//!
//! One call advances the whole scene by `dt`: buffered pointer events first,
//! then integration, spawner countdown, contact resolution, gesture hit
//! tests, scheduled actions, and finally the staged registry changes. Score
//! and lives only move inside a tick, so the shell always reads a consistent
//! snapshot between calls.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::contact::{find_contacts, resolve_contact, resolve_slice_hit};
use super::spawner::run_spawner;
use super::state::{ActionKind, EntityId, GameEvent, GameState, Role, Sound};
use crate::config::GameMode;
use crate::consts::*;

/// A pointer event delivered by the host, buffered until the next tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down(Vec2),
    Moved(Vec2),
    Up,
    /// Interrupted by the host; treated exactly like `Up`
    Cancelled,
}

/// Buffered input for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer events since the previous tick, in delivery order
    pub pointer: Vec<PointerEvent>,
}

/// Per-entity view the shell renders from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub id: EntityId,
    pub role: Role,
    pub pos: Vec2,
    pub flipped: bool,
    pub tilt: f32,
}

/// Read-only presentation snapshot, taken after a tick completes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Gesture polyline: empty, or at least two points
    pub gesture: Vec<Vec2>,
    pub score: u32,
    pub lives: u32,
    pub game_over: bool,
    pub entities: Vec<EntityView>,
    /// Parallax scroll phases in [0, 1)
    pub background_scroll: f32,
    pub ground_scroll: f32,
    /// One-shot requests; draining them here keeps each emitted exactly once
    pub events: Vec<GameEvent>,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.time_ticks += 1;

    let gesture_moved = apply_pointer_events(state, input);

    // (a) integrate dynamic bodies; frozen once the game is over
    if !state.is_game_over() {
        let gravity = state.config.gravity;
        for entity in state.entities_mut() {
            let body = &mut entity.body;
            if body.is_static {
                continue;
            }
            if body.gravity_affected {
                body.vel.y += gravity * dt;
            }
            entity.pos += body.vel * dt;
            if entity.role == Role::Player {
                entity.tilt = body.vel.y * PLAYER_TILT_FACTOR;
            }
        }

        // Cosmetic scroll layers loop one texture width per period
        state.background_scroll = (state.background_scroll + dt / BACKGROUND_LOOP_SECS).fract();
        state.ground_scroll = (state.ground_scroll + dt / GROUND_LOOP_SECS).fract();

        // (b) spawner countdown
        run_spawner(state, dt);
    }

    // (c) physics contacts, in ascending id-pair order; none once frozen
    if !state.is_game_over() {
        for pair in find_contacts(state) {
            resolve_contact(state, pair);
        }
    }

    // (d) gesture hits go through the same resolver, only on ticks where the
    // path gained points
    if !state.is_game_over() && gesture_moved && state.gesture.is_active() {
        for id in state.gesture.hit_test(state.entities()) {
            resolve_slice_hit(state, id);
        }
    }

    // (e) scheduled actions due this tick
    let now = state.time_ticks;
    let (due, keep): (Vec<_>, Vec<_>) = state
        .scheduled
        .drain(..)
        .partition(|action| action.fire_at <= now);
    state.scheduled = keep;
    for action in due {
        match action.kind {
            // Despawns are gameplay; the frozen scene keeps its bodies
            ActionKind::Despawn(id) if !state.is_game_over() => state.stage_removal(id),
            ActionKind::Despawn(_) => {}
            ActionKind::SwooshReady => state.swoosh_ready = true,
        }
    }

    // (f) out-of-bounds purge, then apply everything staged this tick
    purge_escaped(state);
    state.apply_staged();
}

/// Apply the tick's buffered pointer events. The slicing game routes them to
/// the gesture tracker; the side-scroller turns pointer-down into a flap.
/// Returns whether the gesture path gained points.
fn apply_pointer_events(state: &mut GameState, input: &TickInput) -> bool {
    let mut moved = false;
    for event in &input.pointer {
        match state.config.mode {
            GameMode::Slicing => moved |= apply_gesture_event(state, *event),
            GameMode::SideScroller => {
                if let PointerEvent::Down(_) = event {
                    flap(state);
                }
            }
        }
    }
    moved
}

fn apply_gesture_event(state: &mut GameState, event: PointerEvent) -> bool {
    let now = state.time_ticks;
    match event {
        PointerEvent::Down(pos) => {
            state.gesture.begin(pos, now);
            true
        }
        PointerEvent::Moved(pos) => {
            if !state.gesture.is_active() {
                return false;
            }
            state.gesture.extend(pos, now);
            if state.swoosh_ready {
                state.swoosh_ready = false;
                state.push_event(GameEvent::PlaySound(Sound::Swoosh));
                state.schedule(SWOOSH_COOLDOWN_SECS, ActionKind::SwooshReady);
            }
            true
        }
        PointerEvent::Up | PointerEvent::Cancelled => {
            if state.gesture.end() {
                state.push_event(GameEvent::GestureFade {
                    duration: GESTURE_FADE_SECS,
                });
            }
            false
        }
    }
}

/// Replace the player's vertical motion with an upward shove
fn flap(state: &mut GameState) {
    if state.is_game_over() {
        return;
    }
    if let Some(id) = state.player_id()
        && let Some(player) = state.entity_mut(id)
    {
        player.body.vel.y = FLAP_SPEED;
    }
}

/// Remove entities that left the play bounds. In the slicing game a target
/// that falls back out unsliced costs a life.
fn purge_escaped(state: &mut GameState) {
    let mut escaped_targets = 0u32;
    let mut gone: Vec<EntityId> = Vec::new();

    for entity in state.entities() {
        let half = entity.body.shape.bounds_half();
        let fell_out = entity.body.vel.y < 0.0 && entity.pos.y < -half.y * 2.0;
        let off_left = entity.pos.x < -half.x * 4.0;
        if fell_out || off_left {
            gone.push(entity.id);
            // Any exit counts as a miss: falling back out or drifting off the side
            if entity.role == Role::SlicedTarget {
                escaped_targets += 1;
            }
        }
    }

    for id in gone {
        state.stage_removal(id);
    }

    if escaped_targets > 0 && !state.is_game_over() {
        state.lives = state.lives.saturating_sub(escaped_targets);
        log::debug!(
            "{} target(s) escaped, lives {}",
            escaped_targets,
            state.lives
        );
        if state.lives == 0 {
            state.set_game_over();
        }
    }
}

/// Capture the presentation snapshot for the tick that just ran, draining
/// this tick's one-shot events.
pub fn snapshot(state: &mut GameState) -> Snapshot {
    Snapshot {
        gesture: state.gesture.polyline(),
        score: state.score,
        lives: state.lives,
        game_over: state.is_game_over(),
        entities: state
            .entities()
            .iter()
            .map(|e| EntityView {
                id: e.id,
                role: e.role,
                pos: e.pos,
                flipped: e.flipped,
                tilt: e.tilt,
            })
            .collect(),
        background_scroll: state.background_scroll,
        ground_scroll: state.ground_scroll,
        events: state.drain_events(),
    }
}
