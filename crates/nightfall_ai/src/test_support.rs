//! Общие helpers для unit-тестов агентов (без Bevy App).

use bevy::prelude::*;

use crate::agent::{Agent, Archetype, TickContext};
use crate::components::{AnimatorParams, Signals};
use crate::config::AgentConfig;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::navigation::{GroundNavigator, NavArea, PathFollower, PathStatus};
use crate::world::WorldSnapshot;

pub const AGENT: Entity = Entity::from_raw(100);
pub const PLAYER: Entity = Entity::from_raw(1);
pub const OBJECTIVE: Entity = Entity::from_raw(2);

/// Агент на GroundNavigator в квадрате 50×50 с фиксированным seed
pub fn spawn<A: Archetype>(archetype: A, config: AgentConfig, position: Vec3) -> Agent<A> {
    let nav = GroundNavigator::new(position, NavArea::square(50.0));
    Agent::new(AGENT, config, Box::new(nav), archetype, 7)
}

/// Мир + аниматор + сигналы для ручного прогона тиков
#[derive(Default)]
pub struct Harness {
    pub world: WorldSnapshot,
    pub animator: AnimatorParams,
    pub signals: Signals,
}

impl Harness {
    pub fn new(world: WorldSnapshot) -> Self {
        Self {
            world,
            ..Default::default()
        }
    }

    /// Вызов с контекстом (dt = 0): change_state / start / on_damaged
    pub fn with_cx<R>(&mut self, f: impl FnOnce(&mut TickContext<'_>) -> R) -> R {
        let mut cx = TickContext::new(&self.world, &mut self.animator).with_signals(self.signals);
        f(&mut cx)
    }

    /// Navigate → Decide, как в FixedUpdate
    pub fn tick<A: Archetype>(&mut self, agent: &mut Agent<A>, dt: f32) {
        agent.core_mut().nav_mut().advance(dt);
        let mut cx = TickContext::new(&self.world, &mut self.animator)
            .with_dt(dt)
            .with_signals(self.signals);
        agent.tick(&mut cx);
    }

    pub fn run<A: Archetype>(&mut self, agent: &mut Agent<A>, dt: f32, steps: usize) {
        for _ in 0..steps {
            self.tick(agent, dt);
        }
    }
}

/// GroundNavigator, чью готовность тест переключает снаружи (агент
/// владеет навигатором, поэтому флаг общий через `Arc`)
pub struct SwitchableNavigator {
    inner: GroundNavigator,
    ready: Arc<AtomicBool>,
}

impl SwitchableNavigator {
    pub fn new(position: Vec3) -> (Self, Arc<AtomicBool>) {
        let ready = Arc::new(AtomicBool::new(true));
        let nav = Self {
            inner: GroundNavigator::new(position, NavArea::square(50.0)),
            ready: Arc::clone(&ready),
        };
        (nav, ready)
    }
}

impl PathFollower for SwitchableNavigator {
    fn is_enabled(&self) -> bool {
        self.ready.load(Ordering::SeqCst) && self.inner.is_enabled()
    }

    fn is_on_navigable_surface(&self) -> bool {
        self.inner.is_on_navigable_surface()
    }

    fn position(&self) -> Vec3 {
        self.inner.position()
    }

    fn velocity(&self) -> Vec3 {
        self.inner.velocity()
    }

    fn set_destination(&mut self, destination: Vec3) -> bool {
        self.inner.set_destination(destination)
    }

    fn destination(&self) -> Option<Vec3> {
        self.inner.destination()
    }

    fn has_path(&self) -> bool {
        self.inner.has_path()
    }

    fn path_pending(&self) -> bool {
        self.inner.path_pending()
    }

    fn path_status(&self) -> PathStatus {
        self.inner.path_status()
    }

    fn remaining_distance(&self) -> f32 {
        self.inner.remaining_distance()
    }

    fn stopping_distance(&self) -> f32 {
        self.inner.stopping_distance()
    }

    fn set_stopping_distance(&mut self, distance: f32) {
        self.inner.set_stopping_distance(distance);
    }

    fn set_speed(&mut self, speed: f32) {
        self.inner.set_speed(speed);
    }

    fn stop(&mut self) {
        self.inner.stop();
    }

    fn resume(&mut self) {
        self.inner.resume();
    }

    fn is_stopped(&self) -> bool {
        self.inner.is_stopped()
    }

    fn reset_path(&mut self) {
        self.inner.reset_path();
    }

    fn sample_position(&self, point: Vec3, max_distance: f32) -> Option<Vec3> {
        self.inner.sample_position(point, max_distance)
    }

    fn advance(&mut self, dt: f32) {
        self.inner.advance(dt);
    }
}
