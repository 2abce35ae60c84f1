//! AgentCore: всё, что state может трогать у своего агента.
//!
//! States не вызывают машину напрямую: они оставляют `Request` в слоте
//! `pending`, машина применяет его сразу после callback'а.

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::{AgentEvent, Roster, StateId, StateTag};
use crate::components::Presence;
use crate::config::AgentConfig;
use crate::navigation::PathFollower;

/// Weak-ссылка на цель. Агент не владеет целью: исчезнувшая entity
/// резолвится в `None` через `SpatialQuery::position_of`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Entity(Entity),
    /// Собственный access point агента (siege)
    AccessPoint,
}

impl Target {
    pub fn entity(&self) -> Option<Entity> {
        match self {
            Target::Entity(entity) => Some(*entity),
            Target::AccessPoint => None,
        }
    }
}

/// Запрос перехода из state / archetype hook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    State(StateId),
    Level(usize),
    LevelStart,
}

/// Yaw-поворот, при котором forward (-Z) смотрит вдоль `direction` (XZ)
pub fn yaw_towards(direction: Vec3) -> Quat {
    Quat::from_rotation_y(f32::atan2(-direction.x, -direction.z))
}

pub struct AgentCore {
    entity: Entity,
    config: AgentConfig,
    speed: f32,
    attack_speed: f32,
    rotation: Quat,
    nav: Box<dyn PathFollower>,
    target: Option<Target>,
    rng: ChaCha8Rng,
    presence: Presence,
    outbox: Vec<AgentEvent>,

    // Bookkeeping машины (agent::machine)
    pub(super) level: usize,
    pub(super) current: Option<StateId>,
    pub(super) current_tag: Option<StateTag>,
    pub(super) last_synced: Option<StateTag>,
    pub(super) roster: Roster,
    pub(super) pending: Option<Request>,
    pub(super) transitioning: bool,
    pub(super) transitions: u64,
    pub(super) level_changes: u64,
}

impl AgentCore {
    pub(super) fn new(entity: Entity, config: AgentConfig, nav: Box<dyn PathFollower>, roster: Roster, seed: u64) -> Self {
        let mut core = Self {
            entity,
            speed: config.speed,
            attack_speed: config.attack_speed,
            config,
            rotation: Quat::IDENTITY,
            nav,
            target: None,
            rng: ChaCha8Rng::seed_from_u64(seed),
            presence: Presence::body(),
            outbox: Vec::new(),
            level: 0,
            current: None,
            current_tag: None,
            last_synced: None,
            roster,
            pending: None,
            transitioning: false,
            transitions: 0,
            level_changes: 0,
        };
        core.set_speed(core.speed);
        core
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    // ========================================================================
    // Movement
    // ========================================================================

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Логическая скорость + скорость path follower'а
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
        self.nav.set_speed(speed);
    }

    pub fn attack_speed(&self) -> f32 {
        self.attack_speed
    }

    pub fn set_attack_speed(&mut self, attack_speed: f32) {
        self.attack_speed = attack_speed;
    }

    pub fn nav(&self) -> &dyn PathFollower {
        self.nav.as_ref()
    }

    pub fn nav_mut(&mut self) -> &mut dyn PathFollower {
        self.nav.as_mut()
    }

    pub fn position(&self) -> Vec3 {
        self.nav.position()
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }

    /// Bevy forward = -Z
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Поворот по направлению движения (если агент реально движется)
    pub(super) fn face_movement(&mut self) {
        let velocity = self.nav.velocity();
        let flat = Vec3::new(velocity.x, 0.0, velocity.z);
        if flat.length_squared() > 1e-4 {
            self.rotation = yaw_towards(flat);
        }
    }

    /// Случайная навигационная точка в круге `radius` вокруг `origin`
    pub fn random_nav_point(&mut self, origin: Vec3, radius: f32) -> Option<Vec3> {
        let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
        // sqrt: равномерно по площади круга
        let distance = radius * self.rng.gen::<f32>().sqrt();
        let candidate = origin + Vec3::new(angle.cos() * distance, 0.0, angle.sin() * distance);
        self.nav.sample_position(candidate, radius)
    }

    // ========================================================================
    // Target
    // ========================================================================

    pub fn target(&self) -> Option<Target> {
        self.target
    }

    pub fn set_target(&mut self, target: Option<Target>) {
        self.target = target;
    }

    pub fn has_target(&self, target: Target) -> bool {
        self.target == Some(target)
    }

    // ========================================================================
    // Transition requests
    // ========================================================================

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn current_state(&self) -> Option<StateId> {
        self.current
    }

    pub fn current_tag(&self) -> Option<StateTag> {
        self.current_tag
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    pub fn level_changes(&self) -> u64 {
        self.level_changes
    }

    pub fn pending(&self) -> Option<Request> {
        self.pending
    }

    /// Запросить переход. Внутри Enter/Exit и при уже занятом слоте
    /// запрос отбрасывается (не ставится в очередь).
    pub fn request(&mut self, request: Request) {
        if self.transitioning {
            crate::log_warning(&format!(
                "⛔ {:?}: {:?} dropped, transition in progress (from {:?})",
                self.entity, request, self.current_tag
            ));
            return;
        }

        if let Some(pending) = self.pending {
            crate::log(&format!(
                "⛔ {:?}: {:?} dropped, {:?} already requested",
                self.entity, request, pending
            ));
            return;
        }

        self.pending = Some(request);
    }

    pub fn change_level(&mut self, level: usize) {
        self.request(Request::Level(level));
    }

    pub fn revert_to_level_start(&mut self) {
        self.request(Request::LevelStart);
    }

    pub fn to_idle(&mut self) {
        self.request(Request::State(self.roster.idle));
    }

    pub fn to_wander(&mut self) {
        self.request(Request::State(self.roster.wander));
    }

    pub fn to_run(&mut self) {
        self.request(Request::State(self.roster.run));
    }

    pub fn to_hide(&mut self) {
        self.request(Request::State(self.roster.hide));
    }

    pub fn to_attack(&mut self, target: Target) {
        self.target = Some(target);
        self.request(Request::State(self.roster.attack));
    }

    pub fn to_move_to(&mut self, target: Target) {
        self.target = Some(target);
        self.request(Request::State(self.roster.move_to));
    }

    // ========================================================================
    // Misc
    // ========================================================================

    /// Равномерный бросок [0, 1)
    pub fn roll(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }

    pub fn rng_mut(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    pub fn presence(&self) -> &Presence {
        &self.presence
    }

    pub fn presence_mut(&mut self) -> &mut Presence {
        &mut self.presence
    }

    pub fn emit(&mut self, event: AgentEvent) {
        self.outbox.push(event);
    }

    pub fn events(&self) -> &[AgentEvent] {
        &self.outbox
    }

    pub fn drain_events(&mut self) -> Vec<AgentEvent> {
        std::mem::take(&mut self.outbox)
    }
}
