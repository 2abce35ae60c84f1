use bevy::prelude::*;

use crate::agent::{AgentCore, Archetype, DamageReport, State, StateTable, StateTag, Target, TickContext};
use crate::config::{AgentConfig, GuardConfig};
use crate::states::WanderState;
use crate::world::{SpatialQuery, WorldTag};

/// Погоня застряла: почти стоим, а цель чуть дальше attack range
const STALLED_SPEED_SQ: f32 = 0.01;
const STALLED_SLACK: f32 = 0.5;

/// Территориальный страж: патрулирует вокруг поста, гонится за игроком,
/// пока тот не уйдёт дальше `chase_limit_range`.
///
/// Уровни: [Idle, Patrol], [Chase, Attack]
#[derive(Debug, Clone)]
pub struct TerritorialGuard {
    config: GuardConfig,
    post: Vec3,
}

impl TerritorialGuard {
    pub fn new(config: GuardConfig, post: Vec3) -> Self {
        Self { config, post }
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    pub fn post(&self) -> Vec3 {
        self.post
    }

    fn watch_territory(&self, agent: &mut AgentCore, world: &dyn SpatialQuery) {
        let Some(player) = world.first_tagged(WorldTag::Player) else {
            return;
        };
        let Some(position) = world.position_of(player) else {
            return;
        };

        let distance = agent.position().distance(position);
        if distance <= self.config.detection_range {
            crate::log(&format!("🛡️ {:?}: intruder at {:.1}m, chasing", agent.entity(), distance));
            agent.set_target(Some(Target::Entity(player)));
            agent.change_level(1);
        }
    }

    fn check_chase_limit(&self, agent: &mut AgentCore, world: &dyn SpatialQuery) {
        let position = agent.position();
        let within_limit = agent
            .target()
            .and_then(|target| self.locate(target, world))
            .is_some_and(|p| p.distance(position) <= self.config.chase_limit_range);

        if !within_limit {
            crate::log(&format!("🛡️ {:?}: target lost, back to post", agent.entity()));
            agent.set_target(None);
            agent.change_level(0);
        }
    }
}

impl Archetype for TerritorialGuard {
    const NAME: &'static str = "Guard";

    fn configure(&self, config: &mut AgentConfig) {
        config.speed = self.config.speed;
        config.attack_speed = self.config.attack_speed;
    }

    fn build_levels(&mut self, table: &mut StateTable<Self>) {
        let roster = *table.roster();

        let patrol = table.add(PatrolState::new(
            self.config.patrol_radius,
            self.config.patrol_tolerance,
            self.config.patrol_multiplier,
        ));
        let chase = table.add(ChaseState::new(self.config.attack_range));
        table.roster_mut().wander = patrol;

        table.add_level([roster.idle, patrol]);
        table.add_level([chase, roster.attack]);
    }

    fn anchor(&self) -> Option<Vec3> {
        Some(self.post)
    }

    fn after_tick(&mut self, agent: &mut AgentCore, cx: &mut TickContext<'_>) {
        match agent.level() {
            0 => self.watch_territory(agent, cx.world),
            _ => self.check_chase_limit(agent, cx.world),
        }
    }

    /// Атакующий становится целью, даже если он вне detection range
    fn on_damaged(&mut self, agent: &mut AgentCore, report: &DamageReport, world: &dyn SpatialQuery) {
        if !report.health.is_alive() {
            return;
        }
        let Some(attacker) = report.attacker else {
            return;
        };
        if world.position_of(attacker).is_none() {
            return;
        }

        crate::log(&format!("💢 {:?}: hit by {:?}, engaging", agent.entity(), attacker));
        agent.set_target(Some(Target::Entity(attacker)));
        agent.change_level(1);
    }
}

/// Patrol = Wander вокруг поста на пониженной скорости
pub struct PatrolState {
    wander: WanderState,
    multiplier: f32,
    prior_speed: Option<f32>,
}

impl PatrolState {
    pub fn new(radius: f32, tolerance: f32, multiplier: f32) -> Self {
        Self {
            wander: WanderState::new(radius, tolerance),
            multiplier,
            prior_speed: None,
        }
    }
}

impl<A: Archetype> State<A> for PatrolState {
    fn tag(&self) -> StateTag {
        StateTag::Wander
    }

    fn name(&self) -> &'static str {
        "Patrol"
    }

    fn enter(&mut self, agent: &mut AgentCore, archetype: &mut A, cx: &mut TickContext<'_>) {
        let speed = agent.speed();
        self.prior_speed = Some(speed);
        agent.set_speed(speed * self.multiplier);
        State::<A>::enter(&mut self.wander, agent, archetype, cx);
    }

    fn tick(&mut self, agent: &mut AgentCore, archetype: &mut A, cx: &mut TickContext<'_>) {
        State::<A>::tick(&mut self.wander, agent, archetype, cx);
    }

    fn exit(&mut self, agent: &mut AgentCore, archetype: &mut A, cx: &mut TickContext<'_>) {
        State::<A>::exit(&mut self.wander, agent, archetype, cx);
        if let Some(speed) = self.prior_speed.take() {
            agent.set_speed(speed);
        }
    }
}

/// Chase: destination = текущая позиция цели, в attack range → Attack
pub struct ChaseState {
    attack_range: f32,
}

impl ChaseState {
    pub fn new(attack_range: f32) -> Self {
        Self { attack_range }
    }
}

impl<A: Archetype> State<A> for ChaseState {
    fn tag(&self) -> StateTag {
        StateTag::Run
    }

    fn name(&self) -> &'static str {
        "Chase"
    }

    fn enter(&mut self, agent: &mut AgentCore, _archetype: &mut A, cx: &mut TickContext<'_>) {
        agent.nav_mut().resume();
        cx.animation.trigger("DoMove");
    }

    fn tick(&mut self, agent: &mut AgentCore, archetype: &mut A, cx: &mut TickContext<'_>) {
        // Без цели: after_tick архетипа вернёт на уровень 0
        let Some(target) = agent.target() else {
            return;
        };
        let Some(destination) = archetype.locate(target, cx.world) else {
            return;
        };

        agent.nav_mut().set_destination(destination);

        let distance = agent.position().distance(destination);
        if distance <= self.attack_range {
            agent.to_attack(target);
            return;
        }

        let stalled = agent.nav().velocity().length_squared() < STALLED_SPEED_SQ;
        if stalled && distance < self.attack_range + STALLED_SLACK {
            agent.to_attack(target);
        }
    }
}
