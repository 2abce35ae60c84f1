//! Tactical siege: после каждого удара (закрытие attack window) отходит
//! к точке сбора, потом заново выбирает цель.

use bevy::prelude::*;

use super::{build_siege_levels, SiegeBehavior, SiegeCreature};
use crate::agent::{AgentCore, Archetype, DamageReport, Request, State, StateId, StateTable, StateTag, TickContext};
use crate::components::EdgeDetector;
use crate::config::{AgentConfig, SiegeConfig, TacticalConfig};
use crate::navigation::ARRIVAL_EPSILON;
use crate::world::{SpatialQuery, WorldTag};

#[derive(Debug, Clone)]
pub struct TacticalSiegeCreature {
    siege: SiegeCreature,
    config: TacticalConfig,
    attack_window: EdgeDetector,
    charge: Option<StateId>,
    /// Точка сбора текущего рывка
    rally: Option<Vec3>,
}

impl TacticalSiegeCreature {
    pub fn new(siege: SiegeConfig, config: TacticalConfig, crypt: Vec3) -> Self {
        Self {
            siege: SiegeCreature::new(siege, crypt),
            config,
            attack_window: EdgeDetector::new(false),
            charge: None,
            rally: None,
        }
    }

    pub fn charge_state(&self) -> Option<StateId> {
        self.charge
    }

    pub fn rally(&self) -> Option<Vec3> {
        self.rally
    }

    /// Явная точка из tuning, иначе ближайший RallyPoint
    pub fn find_rally_point(&self, from: Vec3, world: &dyn SpatialQuery) -> Option<Vec3> {
        self.config
            .rally_point()
            .or_else(|| world.nearest_tagged(WorldTag::RallyPoint, from).map(|(_, position)| position))
    }

    fn request_choose_target(&self, agent: &mut AgentCore) {
        match self.siege.states() {
            Some(states) => agent.request(Request::State(states.choose_target)),
            None => agent.revert_to_level_start(),
        }
    }
}

impl SiegeBehavior for TacticalSiegeCreature {
    fn siege(&self) -> &SiegeCreature {
        &self.siege
    }

    fn siege_mut(&mut self) -> &mut SiegeCreature {
        &mut self.siege
    }
}

impl Archetype for TacticalSiegeCreature {
    const NAME: &'static str = "TacticalSiege";

    fn configure(&self, config: &mut AgentConfig) {
        self.siege.configure(config);
    }

    fn build_levels(&mut self, table: &mut StateTable<Self>) {
        build_siege_levels(self, table);
        let charge = table.add(ChargeState::new(self.config.charge_stopping_distance));
        table.extend_level(1, charge);
        self.charge = Some(charge);
    }

    fn anchor(&self) -> Option<Vec3> {
        self.siege.anchor()
    }

    fn access_point(&self) -> Option<Vec3> {
        self.siege.access_point()
    }

    /// Окно удара закрылось → рывок к точке сбора
    fn before_tick(&mut self, agent: &mut AgentCore, cx: &mut TickContext<'_>) {
        if self.attack_window.update(cx.signals.attack_window_open) != Some(false) {
            return;
        }
        let Some(charge) = self.charge else {
            return;
        };
        // Днём (уровень 0) окно не значит ничего
        if agent.level() != 1 {
            return;
        }
        crate::log(&format!("⚡ {:?}: strike finished, charging to rally point", agent.entity()));
        agent.request(Request::State(charge));
    }

    fn after_tick(&mut self, agent: &mut AgentCore, cx: &mut TickContext<'_>) {
        self.siege.watch_day_night(agent, cx);
    }

    fn on_damaged(&mut self, agent: &mut AgentCore, report: &DamageReport, world: &dyn SpatialQuery) {
        self.siege.react_to_damage(agent, report, world);
    }
}

/// Charge: бег к точке сбора, по прибытии ChooseTarget
pub struct ChargeState {
    stopping_distance: f32,
    prior_stopping: Option<f32>,
}

impl ChargeState {
    pub fn new(stopping_distance: f32) -> Self {
        Self {
            stopping_distance,
            prior_stopping: None,
        }
    }
}

impl State<TacticalSiegeCreature> for ChargeState {
    fn tag(&self) -> StateTag {
        StateTag::Wander
    }

    fn name(&self) -> &'static str {
        "Charge"
    }

    fn enter(&mut self, agent: &mut AgentCore, archetype: &mut TacticalSiegeCreature, cx: &mut TickContext<'_>) {
        archetype.rally = archetype.find_rally_point(agent.position(), cx.world);
        let Some(rally) = archetype.rally else {
            crate::log_warning(&format!("⚠️ {:?}: no rally point, charge skipped", agent.entity()));
            return;
        };

        let nav = agent.nav_mut();
        nav.resume();
        self.prior_stopping = Some(nav.stopping_distance());
        nav.set_stopping_distance(self.stopping_distance);
        nav.set_destination(rally);
    }

    fn tick(&mut self, agent: &mut AgentCore, archetype: &mut TacticalSiegeCreature, _cx: &mut TickContext<'_>) {
        if archetype.rally.is_none() {
            archetype.request_choose_target(agent);
            return;
        }

        let nav = agent.nav();
        if !nav.path_pending() && nav.remaining_distance() <= nav.stopping_distance() + ARRIVAL_EPSILON {
            crate::log(&format!("🚩 {:?}: rally point reached", agent.entity()));
            archetype.siege.access_mut().reset();
            archetype.request_choose_target(agent);
        }
    }

    fn exit(&mut self, agent: &mut AgentCore, archetype: &mut TacticalSiegeCreature, _cx: &mut TickContext<'_>) {
        if let Some(stopping) = self.prior_stopping.take() {
            agent.nav_mut().set_stopping_distance(stopping);
        }
        archetype.rally = None;
    }
}
