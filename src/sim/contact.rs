//! Contact enumeration and classification
//!
//! The physics side of the core: each tick every overlapping entity pair
//! whose masks ask for contact events becomes a transient [`ContactPair`],
//! resolved against a fixed role-pair table. The first matching row wins and
//! a single contact performs exactly one action. Pairs naming an entity
//! already removed this tick are ignored; removal and contact delivery can
//! race within one tick and that is not an error.

use super::shape::shapes_overlap;
use super::state::{EntityId, GameEvent, GameState, ParticleEffect, Role, Sound};

/// Two entities whose shapes intersect this tick. Not persisted; `a < b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactPair {
    pub a: EntityId,
    pub b: EntityId,
}

/// Enumerate contact pairs in ascending (a, b) id order, so simultaneous
/// contacts always resolve in the same order regardless of how they were
/// found.
pub fn find_contacts(state: &GameState) -> Vec<ContactPair> {
    let entities = state.entities();
    let mut pairs = Vec::new();
    for (i, a) in entities.iter().enumerate() {
        for b in &entities[i + 1..] {
            let wants_event = (a.body.contact_mask & b.role.bit()) != 0
                || (b.body.contact_mask & a.role.bit()) != 0;
            if !wants_event {
                continue;
            }
            if shapes_overlap(&a.body.shape, a.pos, &b.body.shape, b.pos) {
                pairs.push(ContactPair { a: a.id, b: b.id });
            }
        }
    }
    pairs
}

/// Apply the classification table to one physics contact
pub fn resolve_contact(state: &mut GameState, pair: ContactPair) {
    // Stale ids: the other member of an earlier contact may already be gone
    if !state.is_live(pair.a) || !state.is_live(pair.b) {
        return;
    }
    let role_a = match state.entity(pair.a) {
        Some(e) => e.role,
        None => return,
    };
    let role_b = match state.entity(pair.b) {
        Some(e) => e.role,
        None => return,
    };

    // {Player, ScoreTrigger}: the trigger goes, the point is scored
    if let Some(trigger) = match_pair(pair, role_a, role_b, Role::Player, Role::ScoreTrigger) {
        state.stage_removal(trigger);
        state.score += 1;
        state.push_event(GameEvent::PlaySound(Sound::Coin));
        log::debug!("score {} (trigger {})", state.score, trigger);
        return;
    }

    // {Player, Obstacle} / {Player, Bomb}: lethal
    let lethal = match_pair(pair, role_a, role_b, Role::Player, Role::Obstacle)
        .or_else(|| match_pair(pair, role_a, role_b, Role::Player, Role::Bomb));
    if lethal.is_some() {
        let player = if role_a == Role::Player { pair.a } else { pair.b };
        let pos = state.entity(player).map(|e| e.pos).unwrap_or_default();
        state.stage_removal(player);
        state.push_event(GameEvent::PlaySound(Sound::Explosion));
        state.push_event(GameEvent::SpawnParticles(ParticleEffect::Explosion(pos)));
        state.lives = state.lives.saturating_sub(1);
        if state.lives == 0 {
            state.set_game_over();
        }
        return;
    }

    // Everything else carries no scoring effect. A physical response would go
    // here, but every body in both games opts out of collision response
    // (collides_with = 0).
}

/// Resolve a gesture hit delivered by the path tracker, not the physics pass
pub fn resolve_slice_hit(state: &mut GameState, id: EntityId) {
    if !state.is_live(id) {
        return;
    }
    let (role, pos) = match state.entity(id) {
        Some(e) => (e.role, e.pos),
        None => return,
    };
    match role {
        Role::SlicedTarget => {
            state.stage_removal(id);
            state.score += 1;
            state.push_event(GameEvent::PlaySound(Sound::Slice));
            state.push_event(GameEvent::SpawnParticles(ParticleEffect::Slice(pos)));
            log::debug!("sliced target {} (score {})", id, state.score);
        }
        Role::Bomb => {
            state.stage_removal(id);
            state.push_event(GameEvent::PlaySound(Sound::Explosion));
            state.push_event(GameEvent::SpawnParticles(ParticleEffect::Explosion(pos)));
            state.set_game_over();
        }
        // Slicing anything else does nothing
        _ => {}
    }
}

/// If the pair's roles are exactly {x, y} (unordered), return the id of the
/// member with role `y`.
fn match_pair(
    pair: ContactPair,
    role_a: Role,
    role_b: Role,
    x: Role,
    y: Role,
) -> Option<EntityId> {
    if role_a == x && role_b == y {
        Some(pair.b)
    } else if role_a == y && role_b == x {
        Some(pair.a)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::shape::Shape;
    use crate::sim::state::{Entity, PhysicsBody};
    use glam::Vec2;

    fn scroller_state() -> GameState {
        GameState::new(GameConfig::side_scroller(), 1).unwrap()
    }

    fn add_at(state: &mut GameState, role: Role, pos: Vec2) -> EntityId {
        let id = state.next_entity_id();
        let mut body = PhysicsBody::new(Shape::circle(16.0));
        // Spawned bodies only report contact with the player
        body.contact_mask = Role::Player.bit();
        state.stage_spawn(Entity::new(id, role, pos, body));
        state.apply_staged();
        id
    }

    #[test]
    fn test_player_trigger_contact_scores() {
        let mut state = scroller_state();
        let player_pos = state.entities()[0].pos;
        let trigger = add_at(&mut state, Role::ScoreTrigger, player_pos);

        let pairs = find_contacts(&state);
        assert_eq!(pairs.len(), 1);
        for pair in pairs {
            resolve_contact(&mut state, pair);
        }
        state.apply_staged();

        assert_eq!(state.score, 1);
        assert!(state.entity(trigger).is_none());
        assert!(state.player_id().is_some());
        assert!(!state.is_game_over());
    }

    #[test]
    fn test_player_obstacle_contact_is_game_over() {
        let mut state = scroller_state();
        let player_pos = state.entities()[0].pos;
        add_at(&mut state, Role::Obstacle, player_pos);

        for pair in find_contacts(&state) {
            resolve_contact(&mut state, pair);
        }
        state.apply_staged();

        assert!(state.is_game_over());
        assert!(state.player_id().is_none());
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_trigger_row_takes_precedence_over_lethal() {
        // Player overlaps a trigger and an obstacle in the same tick; the
        // trigger pair has lower ids so it resolves first, then the lethal
        // contact still fires.
        let mut state = scroller_state();
        let player_pos = state.entities()[0].pos;
        let trigger = add_at(&mut state, Role::ScoreTrigger, player_pos);
        add_at(&mut state, Role::Obstacle, player_pos);

        let pairs = find_contacts(&state);
        assert_eq!(pairs.len(), 2);
        for pair in pairs {
            resolve_contact(&mut state, pair);
        }
        state.apply_staged();

        assert_eq!(state.score, 1);
        assert!(state.entity(trigger).is_none());
        assert!(state.is_game_over());
    }

    #[test]
    fn test_stale_pair_is_ignored() {
        let mut state = scroller_state();
        let player_pos = state.entities()[0].pos;
        let trigger = add_at(&mut state, Role::ScoreTrigger, player_pos);

        let pairs = find_contacts(&state);
        // Resolve the same pair twice within one tick: one action only
        for pair in pairs.iter().chain(pairs.iter()) {
            resolve_contact(&mut state, *pair);
        }
        assert_eq!(state.score, 1);

        // A pair naming a fully removed entity is also silently ignored
        state.apply_staged();
        let player = state.player_id().unwrap();
        resolve_contact(
            &mut state,
            ContactPair {
                a: player,
                b: trigger,
            },
        );
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_obstacle_pair_without_player_does_nothing() {
        let mut state = GameState::new(GameConfig::slicing(), 1).unwrap();
        let a = add_at(&mut state, Role::Obstacle, Vec2::ZERO);
        let b = add_at(&mut state, Role::Obstacle, Vec2::ZERO);
        resolve_contact(&mut state, ContactPair { a, b });
        state.apply_staged();
        assert_eq!(state.score, 0);
        assert_eq!(state.entities().len(), 2);
        assert!(!state.is_game_over());
    }

    #[test]
    fn test_slice_hit_target_scores() {
        let mut state = GameState::new(GameConfig::slicing(), 1).unwrap();
        let id = add_at(&mut state, Role::SlicedTarget, Vec2::new(100.0, 100.0));
        resolve_slice_hit(&mut state, id);
        state.apply_staged();
        assert_eq!(state.score, 1);
        assert!(state.entity(id).is_none());
        assert!(!state.is_game_over());
    }

    #[test]
    fn test_slice_hit_bomb_ends_game() {
        let mut state = GameState::new(GameConfig::slicing(), 1).unwrap();
        let id = add_at(&mut state, Role::Bomb, Vec2::new(100.0, 100.0));
        resolve_slice_hit(&mut state, id);
        assert!(state.is_game_over());
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_slice_hit_stale_id_ignored() {
        let mut state = GameState::new(GameConfig::slicing(), 1).unwrap();
        let id = add_at(&mut state, Role::SlicedTarget, Vec2::ZERO);
        resolve_slice_hit(&mut state, id);
        resolve_slice_hit(&mut state, id);
        resolve_slice_hit(&mut state, 999);
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_masked_out_pair_produces_no_contact() {
        let mut state = GameState::new(GameConfig::slicing(), 1).unwrap();
        let a = state.next_entity_id();
        let mut body = PhysicsBody::new(Shape::circle(16.0));
        body.contact_mask = 0;
        state.stage_spawn(Entity::new(a, Role::SlicedTarget, Vec2::ZERO, body));
        let b = state.next_entity_id();
        state.stage_spawn(Entity::new(b, Role::Bomb, Vec2::ZERO, body));
        state.apply_staged();
        assert!(find_contacts(&state).is_empty());
    }
}
