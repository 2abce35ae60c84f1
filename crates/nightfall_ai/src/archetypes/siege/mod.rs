//! Siege creatures: днём прячутся в склепе, ночью штурмуют objective.
//!
//! Уровни:
//! - 0 (день): [RunToHide, Hide]
//! - 1 (ночь): [ChooseTarget, Pursuit, Attack, Wander, Idle]
//!
//! Приоритеты целей во время Pursuit (см. `SiegeCreature::reprioritize`):
//! ally на пути > игрок рядом > access point / objective.

pub mod access_point;
pub mod states;
pub mod tactical;


pub use access_point::AccessPoint;
pub use states::{ChooseTargetState, PursuitState};
pub use tactical::{ChargeState, TacticalSiegeCreature};

use bevy::prelude::*;

use crate::agent::{AgentCore, Archetype, DamageReport, StateId, StateTable, Target, TickContext};
use crate::components::EdgeDetector;
use crate::config::{AgentConfig, SiegeConfig};
use crate::states::RunToHideState;
use crate::world::{SpatialQuery, WorldTag};

/// Доступ к общему siege-поведению из archetype (базовый и tactical)
pub trait SiegeBehavior: Archetype {
    fn siege(&self) -> &SiegeCreature;
    fn siege_mut(&mut self) -> &mut SiegeCreature;
}

/// Id siege-специфичных состояний (известны после build_levels)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiegeStates {
    pub choose_target: StateId,
    pub pursuit: StateId,
}

#[derive(Debug, Clone)]
pub struct SiegeCreature {
    config: SiegeConfig,
    crypt: Vec3,
    objective: Option<Entity>,
    access: AccessPoint,
    /// Цель до переключения на игрока (вернёмся, когда игрок сбежит)
    prior_target: Option<Target>,
    player_committed: bool,
    night: EdgeDetector,
    states: Option<SiegeStates>,
}

impl SiegeCreature {
    pub fn new(config: SiegeConfig, crypt: Vec3) -> Self {
        let access = AccessPoint::new(config.access_ring_radius, config.access_ring_tolerance);
        Self {
            config,
            crypt,
            objective: None,
            access,
            prior_target: None,
            player_committed: false,
            night: EdgeDetector::new(false),
            states: None,
        }
    }

    pub fn config(&self) -> &SiegeConfig {
        &self.config
    }

    pub fn crypt(&self) -> Vec3 {
        self.crypt
    }

    pub fn access(&self) -> &AccessPoint {
        &self.access
    }

    pub fn access_mut(&mut self) -> &mut AccessPoint {
        &mut self.access
    }

    pub fn states(&self) -> Option<SiegeStates> {
        self.states
    }

    pub fn prior_target(&self) -> Option<Target> {
        self.prior_target
    }

    pub fn is_player_committed(&self) -> bool {
        self.player_committed
    }

    /// Кэшированный objective; исчез → ищем следующий по тегу
    pub fn locate_objective(&mut self, world: &dyn SpatialQuery) -> Option<(Entity, Vec3)> {
        if let Some(entity) = self.objective {
            if let Some(position) = world.position_of(entity) {
                return Some((entity, position));
            }
        }

        let entity = world.first_tagged(WorldTag::Objective)?;
        let position = world.position_of(entity)?;
        self.objective = Some(entity);
        Some((entity, position))
    }

    /// Начало штурма: старые обязательства и прибытие к access point забываем
    pub fn begin_assault(&mut self) {
        self.access.reset();
        self.forget_player();
    }

    pub(crate) fn forget_player(&mut self) {
        self.player_committed = false;
        self.prior_target = None;
    }

    fn resolve(&self, target: Target, world: &dyn SpatialQuery) -> Option<Vec3> {
        match target {
            Target::Entity(entity) => world.position_of(entity),
            Target::AccessPoint => self.access.position(),
        }
    }

    /// Цель по умолчанию: access point, пока до него не дошли
    fn default_target(&self, objective: Entity) -> Target {
        if self.access.is_reached() || self.access.position().is_none() {
            Target::Entity(objective)
        } else {
            Target::AccessPoint
        }
    }

    /// Переоценка цели каждый тик Pursuit
    pub(crate) fn reprioritize(
        &mut self,
        agent: &mut AgentCore,
        objective: Entity,
        objective_position: Vec3,
        world: &dyn SpatialQuery,
    ) {
        let position = agent.position();

        // 1. Постройка игрока прямо по курсу
        let forward = agent.forward();
        let origin = position + forward * self.config.probe_offset;
        if let Some(ally) = world.cast_ray(origin, forward, self.config.probe_range, WorldTag::Ally) {
            let ally_target = Target::Entity(ally);
            if !agent.has_target(ally_target) {
                crate::log(&format!("🧱 {:?}: ally {:?} in the way, attacking it", agent.entity(), ally));
                self.forget_player();
                agent.set_target(Some(ally_target));
            }
            return;
        }

        // 2. Игрок
        let player = world
            .first_tagged(WorldTag::Player)
            .and_then(|p| world.position_of(p).map(|pos| (p, pos)));
        if let Some((player, player_position)) = player {
            let player_target = Target::Entity(player);
            let distance = position.distance(player_position);

            if !agent.has_target(player_target) {
                if distance < self.config.aggro_range {
                    let in_transit = !self.access.is_reached()
                        && position.distance(objective_position) > self.config.near_objective_range;
                    if in_transit || agent.roll() < self.config.aggro_chance {
                        crate::log(&format!("😡 {:?}: switching to player ({:.1}m)", agent.entity(), distance));
                        self.prior_target = agent.target();
                        self.player_committed = true;
                        agent.set_target(Some(player_target));
                        return;
                    }
                }
            } else if self.player_committed && distance > self.config.flee_range {
                let prior = self.prior_target.take();
                crate::log(&format!("🏃 {:?}: player fled, back to {:?}", agent.entity(), prior));
                self.player_committed = false;
                agent.set_target(prior);
            }
        }

        // 3. Access point
        self.access.refresh(objective_position, agent);
        match agent.target() {
            Some(Target::AccessPoint) => {
                let arrived = self
                    .access
                    .position()
                    .is_some_and(|point| position.distance(point) <= self.config.melee_range);
                if arrived {
                    crate::log(&format!("📍 {:?}: access point reached", agent.entity()));
                    self.access.mark_reached();
                }
                if self.access.is_reached() {
                    agent.set_target(Some(Target::Entity(objective)));
                }
            }
            Some(Target::Entity(entity)) if entity == objective => {
                agent.set_target(Some(self.default_target(objective)));
            }
            _ => {}
        }

        // 4. Цель исчезла
        let valid = agent.target().is_some_and(|target| self.resolve(target, world).is_some());
        if !valid {
            let fallback = self.default_target(objective);
            crate::log(&format!("🎯 {:?}: target lost, fallback to {:?}", agent.entity(), fallback));
            agent.set_target(Some(fallback));
        }
    }

    /// Day/night edge: ночь → штурм (уровень 1), день → склеп (уровень 0)
    pub(crate) fn watch_day_night(&mut self, agent: &mut AgentCore, cx: &TickContext<'_>) {
        match self.night.update(cx.signals.is_night) {
            Some(true) => {
                crate::log(&format!("🌙 {:?}: night falls, assault begins", agent.entity()));
                self.begin_assault();
                agent.change_level(1);
            }
            Some(false) => {
                crate::log(&format!("☀️ {:?}: dawn, retreating to crypt", agent.entity()));
                self.forget_player();
                agent.change_level(0);
            }
            None => {}
        }
    }

    /// Урон от игрока → преследуем игрока (если не полное здоровье)
    pub(crate) fn react_to_damage(&mut self, agent: &mut AgentCore, report: &DamageReport, world: &dyn SpatialQuery) {
        if !report.health.is_alive() {
            return;
        }
        // Полное здоровье после ненулевого урона = иммунитет сработал
        if report.health.is_full() && report.amount > 0 {
            return;
        }

        let Some(player) = world.first_tagged(WorldTag::Player) else {
            return;
        };
        let player_target = Target::Entity(player);
        if agent.has_target(player_target) {
            return;
        }

        crate::log(&format!("💥 {:?}: damaged, hunting the player", agent.entity()));
        self.prior_target = agent.target();
        self.player_committed = true;
        agent.to_move_to(player_target);
    }
}

/// Siege уровни. Pursuit занимает роль MoveTo.
pub fn build_siege_levels<A: SiegeBehavior>(archetype: &mut A, table: &mut StateTable<A>) -> SiegeStates {
    let roster = *table.roster();
    let agent = table.config().clone();
    let choose_interval = archetype.siege().config.choose_interval;

    let run_to_hide = table.add(RunToHideState::new(agent.hide_run_multiplier, agent.hide_stopping_distance));
    let choose_target = table.add(ChooseTargetState::new(choose_interval));
    let pursuit = table.add(PursuitState::new());
    table.roster_mut().move_to = pursuit;

    table.clear_levels();
    table.add_level([run_to_hide, roster.hide]);
    table.add_level([choose_target, pursuit, roster.attack, roster.wander, roster.idle]);

    let states = SiegeStates { choose_target, pursuit };
    archetype.siege_mut().states = Some(states);
    states
}

impl SiegeBehavior for SiegeCreature {
    fn siege(&self) -> &SiegeCreature {
        self
    }

    fn siege_mut(&mut self) -> &mut SiegeCreature {
        self
    }
}

impl Archetype for SiegeCreature {
    const NAME: &'static str = "Siege";

    fn configure(&self, config: &mut AgentConfig) {
        config.speed = self.config.speed;
        config.attack_speed = self.config.attack_speed;
        config.attack_stop_range = self.config.melee_range;
    }

    fn build_levels(&mut self, table: &mut StateTable<Self>) {
        build_siege_levels(self, table);
    }

    fn anchor(&self) -> Option<Vec3> {
        Some(self.crypt)
    }

    fn access_point(&self) -> Option<Vec3> {
        self.access.position()
    }

    fn after_tick(&mut self, agent: &mut AgentCore, cx: &mut TickContext<'_>) {
        self.watch_day_night(agent, cx);
    }

    fn on_damaged(&mut self, agent: &mut AgentCore, report: &DamageReport, world: &dyn SpatialQuery) {
        self.react_to_damage(agent, report, world);
    }
}
