//! Game state and core simulation types
//!
//! The whole simulation is one serializable value: entity registry, seeded
//! RNG, score/lives, scheduled actions and the gesture path. Iteration is
//! always in ascending entity id order so replays from a snapshot are
//! bit-identical.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::gesture::GesturePath;
use super::shape::Shape;
use crate::config::{ConfigError, GameConfig, GameMode};
use crate::consts::*;

/// Stable entity identifier, never reused within a run
pub type EntityId = u32;

/// Role tag driving contact classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Player,
    Obstacle,
    ScoreTrigger,
    SlicedTarget,
    Bomb,
}

impl Role {
    /// Bit for collision/contact masks
    pub const fn bit(self) -> u8 {
        match self {
            Role::Player => 1 << 0,
            Role::Obstacle => 1 << 1,
            Role::ScoreTrigger => 1 << 2,
            Role::SlicedTarget => 1 << 3,
            Role::Bomb => 1 << 4,
        }
    }
}

/// All roles, for mask construction
pub const ALL_ROLES: u8 = Role::Player.bit()
    | Role::Obstacle.bit()
    | Role::ScoreTrigger.bit()
    | Role::SlicedTarget.bit()
    | Role::Bomb.bit();

/// Minimal rigid-body state attached to an entity
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PhysicsBody {
    pub vel: Vec2,
    pub shape: Shape,
    /// Static bodies are never moved by integration
    pub is_static: bool,
    /// Whether gravity accelerates this body each tick
    pub gravity_affected: bool,
    /// Roles whose overlap with this body produces a contact event
    pub contact_mask: u8,
    /// Roles this body physically collides with (response, not events)
    pub collides_with: u8,
}

impl PhysicsBody {
    pub fn new(shape: Shape) -> Self {
        Self {
            vel: Vec2::ZERO,
            shape,
            is_static: false,
            gravity_affected: false,
            contact_mask: ALL_ROLES,
            collides_with: 0,
        }
    }

    pub fn fixed(shape: Shape) -> Self {
        Self {
            is_static: true,
            ..Self::new(shape)
        }
    }
}

/// A game object: id, role, position, body and the bit of visual state the
/// shell needs to draw it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub role: Role,
    pub pos: Vec2,
    pub body: PhysicsBody,
    /// Drawn rotated 180 degrees (top rock of a pair)
    pub flipped: bool,
    /// Visual tilt in radians, derived from vertical speed for the player
    pub tilt: f32,
}

impl Entity {
    pub fn new(id: EntityId, role: Role, pos: Vec2, body: PhysicsBody) -> Self {
        Self {
            id,
            role,
            pos,
            body,
            flipped: false,
            tilt: 0.0,
        }
    }
}

/// Sound one-shots requested from the shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sound {
    Coin,
    Explosion,
    Swoosh,
    Slice,
}

/// Particle-effect one-shots requested from the shell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ParticleEffect {
    Explosion(Vec2),
    Slice(Vec2),
}

/// One-shot outputs drained by the presentation layer each tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PlaySound(Sound),
    SpawnParticles(ParticleEffect),
    /// Gesture released; shell should fade the polyline out
    GestureFade { duration: f32 },
    GameOver,
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    /// One-way: gameplay bodies freeze, cosmetic state keeps ticking
    GameOver,
}

/// What a scheduled action does when its tick arrives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    /// Remove the entity from the registry (end of a rock pair's crossing)
    Despawn(EntityId),
    /// Re-arm the swoosh sound after its cooldown
    SwooshReady,
}

/// A deferred operation keyed to simulation time, polled each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledAction {
    pub fire_at: u64,
    pub kind: ActionKind,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub config: GameConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub score: u32,
    pub lives: u32,
    /// Active entities, sorted by id
    entities: Vec<Entity>,
    /// Additions staged during a tick, applied at the tick boundary
    staged_spawns: Vec<Entity>,
    /// Removals staged during a tick, applied at the tick boundary
    staged_removals: Vec<EntityId>,
    /// Pending deferred operations, unordered
    pub scheduled: Vec<ScheduledAction>,
    /// Active slice gesture
    pub gesture: GesturePath,
    /// Seconds until the spawner fires
    pub spawn_countdown: f32,
    /// Swoosh sound may be requested again
    pub swoosh_ready: bool,
    /// Parallax scroll offsets in [0, 1), wrapped each loop
    pub background_scroll: f32,
    pub ground_scroll: f32,
    /// One-shots accumulated this tick
    events: Vec<GameEvent>,
    next_id: EntityId,
}

impl GameState {
    /// Build the initial scene for a config. Fails fast on invalid config;
    /// nothing after this returns an error.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let spawn_countdown = config.spawn_interval;
        let lives = config.lives;
        let mut state = Self {
            config,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            phase: GamePhase::Playing,
            score: 0,
            lives,
            entities: Vec::new(),
            staged_spawns: Vec::new(),
            staged_removals: Vec::new(),
            scheduled: Vec::new(),
            gesture: GesturePath::new(),
            spawn_countdown,
            swoosh_ready: true,
            background_scroll: 0.0,
            ground_scroll: 0.0,
            events: Vec::new(),
            next_id: 1,
        };
        state.populate();
        Ok(state)
    }

    /// Cancel everything pending, clear the registry and rebuild the initial
    /// scene. Called between ticks; never mid-tick.
    pub fn reset(&mut self) {
        log::info!("scene reset (seed {})", self.seed);
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.time_ticks = 0;
        self.phase = GamePhase::Playing;
        self.score = 0;
        self.lives = self.config.lives;
        self.entities.clear();
        self.staged_spawns.clear();
        self.staged_removals.clear();
        self.scheduled.clear();
        self.gesture = GesturePath::new();
        self.spawn_countdown = self.config.spawn_interval;
        self.swoosh_ready = true;
        self.background_scroll = 0.0;
        self.ground_scroll = 0.0;
        self.events.clear();
        self.next_id = 1;
        self.populate();
    }

    /// Mode-specific initial entities
    fn populate(&mut self) {
        if self.config.mode == GameMode::SideScroller {
            let pos = Vec2::new(
                self.config.frame_width / 5.0,
                self.config.frame_height * 0.75,
            );
            let mut body = PhysicsBody::new(Shape::circle(PLAYER_RADIUS));
            body.gravity_affected = true;
            // Reports contact with everything, bounces off nothing
            body.contact_mask = ALL_ROLES;
            body.collides_with = 0;
            let id = self.next_entity_id();
            self.entities.push(Entity::new(id, Role::Player, pos, body));

            // Lethal ground strip along the bottom edge
            let ground_shape = Shape::rect(self.config.frame_width * 2.0, GROUND_HEIGHT);
            let mut ground_body = PhysicsBody::fixed(ground_shape);
            ground_body.contact_mask = Role::Player.bit();
            let ground_id = self.next_entity_id();
            self.entities.push(Entity::new(
                ground_id,
                Role::Obstacle,
                Vec2::new(self.config.frame_width / 2.0, GROUND_HEIGHT / 2.0),
                ground_body,
            ));
        }
    }

    /// Allocate a new entity id
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Seeded RNG, the only randomness source in the simulation
    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Active entities in id order
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Present and not staged for removal this tick
    pub fn is_live(&self, id: EntityId) -> bool {
        !self.staged_removals.contains(&id) && self.entity(id).is_some()
    }

    /// Stage an entity for insertion at the tick boundary
    pub fn stage_spawn(&mut self, entity: Entity) {
        self.staged_spawns.push(entity);
    }

    /// Stage a removal at the tick boundary. Staging the same id twice, or a
    /// dangling id, is a no-op.
    pub fn stage_removal(&mut self, id: EntityId) {
        if !self.staged_removals.contains(&id) {
            self.staged_removals.push(id);
        }
    }

    /// Apply staged additions/removals. Runs once at the end of each tick so
    /// mid-tick iteration never sees the registry change under it.
    pub fn apply_staged(&mut self) {
        if !self.staged_removals.is_empty() {
            let gone = std::mem::take(&mut self.staged_removals);
            self.entities.retain(|e| !gone.contains(&e.id));
            // Orphaned despawn actions are harmless but this keeps the queue short
            self.scheduled
                .retain(|a| !matches!(a.kind, ActionKind::Despawn(id) if gone.contains(&id)));
        }
        if !self.staged_spawns.is_empty() {
            self.entities.append(&mut self.staged_spawns);
            self.entities.sort_by_key(|e| e.id);
        }
    }

    /// Queue a deferred operation `delay` seconds from now
    pub fn schedule(&mut self, delay: f32, kind: ActionKind) {
        let ticks = (delay / SIM_DT).round().max(0.0) as u64;
        self.scheduled.push(ScheduledAction {
            fire_at: self.time_ticks + ticks,
            kind,
        });
    }

    /// Record a one-shot output for the shell
    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take this tick's one-shot outputs
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// The player entity's id, if it is still in the registry
    pub fn player_id(&self) -> Option<EntityId> {
        self.entities
            .iter()
            .find(|e| e.role == Role::Player)
            .map(|e| e.id)
    }

    /// One-way transition to game over; gameplay integration freezes
    pub fn set_game_over(&mut self) {
        if self.phase != GamePhase::GameOver {
            log::info!(
                "game over at tick {} (score {})",
                self.time_ticks,
                self.score
            );
            self.phase = GamePhase::GameOver;
            self.push_event(GameEvent::GameOver);
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    #[test]
    fn test_side_scroller_starts_with_player_and_ground() {
        let state = GameState::new(GameConfig::side_scroller(), 1).unwrap();
        assert_eq!(state.entities().len(), 2);
        assert_eq!(state.entities()[0].role, Role::Player);
        let ground = &state.entities()[1];
        assert_eq!(ground.role, Role::Obstacle);
        assert!(ground.body.is_static);
    }

    #[test]
    fn test_slicing_starts_empty() {
        let state = GameState::new(GameConfig::slicing(), 1).unwrap();
        assert!(state.entities().is_empty());
        assert_eq!(state.lives, 3);
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let mut cfg = GameConfig::side_scroller();
        cfg.spawn_interval = -1.0;
        assert!(GameState::new(cfg, 1).is_err());
    }

    #[test]
    fn test_staged_removal_applies_at_boundary() {
        let mut state = GameState::new(GameConfig::side_scroller(), 1).unwrap();
        let id = state.entities()[0].id;
        state.stage_removal(id);
        // Still present mid-tick
        assert!(state.entity(id).is_some());
        assert!(!state.is_live(id));
        state.apply_staged();
        assert!(state.entity(id).is_none());
    }

    #[test]
    fn test_double_removal_is_noop() {
        let mut state = GameState::new(GameConfig::side_scroller(), 1).unwrap();
        let id = state.entities()[0].id;
        state.stage_removal(id);
        state.stage_removal(id);
        state.stage_removal(999);
        state.apply_staged();
        assert!(state.entity(id).is_none());
        assert_eq!(state.entities().len(), 1);
    }

    #[test]
    fn test_staged_spawns_keep_id_order() {
        let mut state = GameState::new(GameConfig::slicing(), 1).unwrap();
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        let body = PhysicsBody::fixed(Shape::circle(1.0));
        state.stage_spawn(Entity::new(b, Role::Obstacle, Vec2::ZERO, body));
        state.stage_spawn(Entity::new(a, Role::Obstacle, Vec2::ZERO, body));
        state.apply_staged();
        let ids: Vec<_> = state.entities().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[test]
    fn test_reset_cancels_scheduled_and_restores_lives() {
        let mut state = GameState::new(GameConfig::slicing(), 7).unwrap();
        state.schedule(1.0, ActionKind::SwooshReady);
        state.lives = 1;
        state.set_game_over();
        state.reset();
        assert!(state.scheduled.is_empty());
        assert_eq!(state.lives, 3);
        assert!(!state.is_game_over());
    }

    #[test]
    fn test_game_over_is_one_way_and_emits_once() {
        let mut state = GameState::new(GameConfig::side_scroller(), 1).unwrap();
        state.set_game_over();
        state.drain_events();
        state.set_game_over();
        assert!(state.drain_events().is_empty());
        assert!(state.is_game_over());
    }
}
