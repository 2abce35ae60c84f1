//! Spawn helpers: агенты и объекты мира.
//!
//! Параметры берутся из resources (`AiTuning`, `NavigationArea`), seed
//! агента из `DeterministicRng`, поэтому порядок spawn'а определяет
//! поведение детерминированно.

use bevy::prelude::*;

use super::{Brain, NavigationArea};
use crate::agent::{Agent, Archetype};
use crate::archetypes::{Critter, SiegeCreature, TacticalSiegeCreature, TerritorialGuard, Wanderer};
use crate::components::{AnimatorParams, AttackWindow, Health};
use crate::config::AiTuning;
use crate::navigation::GroundNavigator;
use crate::world::{Footprint, WorldTag};
use crate::DeterministicRng;

fn tuning(world: &World) -> AiTuning {
    world.get_resource::<AiTuning>().cloned().unwrap_or_default()
}

/// Общий spawn: Brain + Transform + тег + здоровье + аниматор
pub fn spawn_agent<A: Archetype>(world: &mut World, archetype: A, position: Vec3, tag: WorldTag) -> Entity {
    let config = tuning(world).agent;
    let area = world.get_resource::<NavigationArea>().cloned().unwrap_or_default();
    let seed = world
        .get_resource_mut::<DeterministicRng>()
        .map(|mut rng| rng.next_seed())
        .unwrap_or_default();

    let entity = world.spawn_empty().id();
    let max_health = config.max_health;
    let nav = GroundNavigator::new(position, area.0);
    let agent = Agent::new(entity, config, Box::new(nav), archetype, seed);

    world.entity_mut(entity).insert((
        Brain::new(agent),
        Transform::from_translation(position),
        tag,
        Footprint::default(),
        Health::new(max_health),
        AnimatorParams::default(),
        AttackWindow::default(),
    ));

    crate::log(&format!("🐣 spawned {} {:?} at {:?} (seed {})", A::NAME, entity, position, seed));
    entity
}

pub fn spawn_wanderer(world: &mut World, position: Vec3) -> Entity {
    spawn_agent(world, Wanderer, position, WorldTag::Wanderer)
}

pub fn spawn_critter(world: &mut World, position: Vec3, burrow: Vec3) -> Entity {
    let config = tuning(world).critter;
    spawn_agent(world, Critter::new(config, burrow), position, WorldTag::Critter)
}

pub fn spawn_guard(world: &mut World, position: Vec3, post: Vec3) -> Entity {
    let config = tuning(world).guard;
    spawn_agent(world, TerritorialGuard::new(config, post), position, WorldTag::Guard)
}

pub fn spawn_siege(world: &mut World, position: Vec3, crypt: Vec3) -> Entity {
    let config = tuning(world).siege;
    spawn_agent(world, SiegeCreature::new(config, crypt), position, WorldTag::Siege)
}

pub fn spawn_tactical_siege(world: &mut World, position: Vec3, crypt: Vec3) -> Entity {
    let tuning = tuning(world);
    let archetype = TacticalSiegeCreature::new(tuning.siege, tuning.tactical, crypt);
    spawn_agent(world, archetype, position, WorldTag::Siege)
}

pub fn spawn_player(world: &mut World, position: Vec3, max_health: u32) -> Entity {
    world
        .spawn((
            Transform::from_translation(position),
            WorldTag::Player,
            Footprint::default(),
            Health::new(max_health),
        ))
        .id()
}

/// Главная постройка (кристалл)
pub fn spawn_objective(world: &mut World, position: Vec3, max_health: u32) -> Entity {
    world
        .spawn((
            Transform::from_translation(position),
            WorldTag::Objective,
            Footprint { radius: 1.5 },
            Health::new(max_health),
        ))
        .id()
}

/// Постройка игрока (стена, турель)
pub fn spawn_ally(world: &mut World, position: Vec3, max_health: u32) -> Entity {
    world
        .spawn((
            Transform::from_translation(position),
            WorldTag::Ally,
            Footprint { radius: 1.0 },
            Health::new(max_health),
        ))
        .id()
}

pub fn spawn_rally_point(world: &mut World, position: Vec3) -> Entity {
    world
        .spawn((Transform::from_translation(position), WorldTag::RallyPoint))
        .id()
}
