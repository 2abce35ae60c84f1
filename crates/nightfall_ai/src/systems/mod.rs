//! Bevy host: agent brains как components, тики в FixedUpdate.
//!
//! Порядок выполнения (AiSet, chained):
//! 1. Navigate: окна удара тикают, path followers двигаются, Transform синхронизируется
//! 2. Decide: tick всех brains (по archetype, по возрастанию Entity)
//! 3. React: удары → урон → реакции на урон → тревоги → despawn мёртвых

use bevy::prelude::*;

pub mod decisions;
pub mod navigation;
pub mod reactions;
pub mod spawn;

pub use decisions::tick_agents;
pub use navigation::{advance_navigation, tick_attack_windows, NavigationArea};
pub use reactions::{apply_damage, despawn_dead, open_attack_windows, propagate_alerts, react_to_damage, resolve_melee_hits};
pub use spawn::{
    spawn_agent, spawn_ally, spawn_critter, spawn_guard, spawn_objective, spawn_player, spawn_rally_point, spawn_siege,
    spawn_tactical_siege, spawn_wanderer,
};

use crate::agent::{Agent, Archetype};
use crate::archetypes::{Critter, SiegeCreature, TacticalSiegeCreature, TerritorialGuard, Wanderer};
use crate::components::{DayNight, Health};
use crate::config::AiTuning;

/// Component: state machine агента
#[derive(Component)]
pub struct Brain<A: Archetype> {
    pub agent: Agent<A>,
}

impl<A: Archetype> Brain<A> {
    pub fn new(agent: Agent<A>) -> Self {
        Self { agent }
    }
}

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AiSet {
    Navigate,
    Decide,
    React,
}

/// Событие: Attack state замахнулся
#[derive(Event, Debug, Clone, PartialEq)]
pub struct AttackLaunched {
    pub attacker: Entity,
    pub target: Option<Entity>,
    pub damage: u32,
    pub reach: f32,
}

/// Событие: агент поднял тревогу для соседей своего archetype
#[derive(Event, Debug, Clone, PartialEq)]
pub struct AlertRaised {
    pub source: Entity,
    pub origin: Vec3,
    pub radius: f32,
    pub archetype: &'static str,
}

/// Событие: запрос урона (удар агента или внешний источник: игрок, турели)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct DamageTaken {
    pub target: Entity,
    pub attacker: Option<Entity>,
    pub amount: u32,
}

/// Событие: урон применён к Health
#[derive(Event, Debug, Clone, PartialEq)]
pub struct DamageApplied {
    pub target: Entity,
    pub attacker: Option<Entity>,
    /// Запрошенный урон; снято могло быть меньше (см. `health`)
    pub amount: u32,
    /// Здоровье после урона
    pub health: Health,
}

/// Событие: entity умер (health == 0)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// AI Plugin
///
/// Регистрирует events, resources и системы всех archetypes в FixedUpdate.
/// Archetypes внутри фазы выполняются последовательно (детерминизм событий).
pub struct AiPlugin;

impl Plugin for AiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AiTuning>()
            .init_resource::<DayNight>()
            .init_resource::<NavigationArea>()
            .add_event::<AttackLaunched>()
            .add_event::<AlertRaised>()
            .add_event::<DamageTaken>()
            .add_event::<DamageApplied>()
            .add_event::<EntityDied>();

        app.configure_sets(FixedUpdate, (AiSet::Navigate, AiSet::Decide, AiSet::React).chain());

        app.add_systems(
            FixedUpdate,
            (
                (
                    tick_attack_windows,
                    advance_navigation::<Wanderer>,
                    advance_navigation::<Critter>,
                    advance_navigation::<TerritorialGuard>,
                    advance_navigation::<SiegeCreature>,
                    advance_navigation::<TacticalSiegeCreature>,
                )
                    .chain()
                    .in_set(AiSet::Navigate),
                (
                    tick_agents::<Wanderer>,
                    tick_agents::<Critter>,
                    tick_agents::<TerritorialGuard>,
                    tick_agents::<SiegeCreature>,
                    tick_agents::<TacticalSiegeCreature>,
                )
                    .chain()
                    .in_set(AiSet::Decide),
                (
                    // Фаза 1: удары → урон
                    open_attack_windows,
                    resolve_melee_hits,
                    apply_damage,
                    // Фаза 2: реакции brains
                    react_to_damage::<Wanderer>,
                    react_to_damage::<Critter>,
                    react_to_damage::<TerritorialGuard>,
                    react_to_damage::<SiegeCreature>,
                    react_to_damage::<TacticalSiegeCreature>,
                    // Тревоги поднимают только critters
                    propagate_alerts::<Critter>,
                    // Фаза 3: cleanup
                    despawn_dead,
                )
                    .chain()
                    .in_set(AiSet::React),
            ),
        );
    }
}
