//! Archetype capability: level table + hooks вокруг тика.

use bevy::prelude::*;

use super::{AgentCore, DamageReport, StateTable, Target, TickContext};
use crate::config::AgentConfig;
use crate::world::SpatialQuery;

/// Специализация агента (critter, guard, siege...)
///
/// Hooks получают `AgentCore` и переходят только через `AgentCore::request`.
pub trait Archetype: Sized + Send + Sync + 'static {
    /// Имя для логов и фильтрации тревог
    const NAME: &'static str;

    /// Правка общих параметров до сборки состояний (скорость, cadence)
    fn configure(&self, _config: &mut AgentConfig) {}

    /// Уровни по умолчанию: [Idle, Wander], [Attack, Run]
    fn build_levels(&mut self, table: &mut StateTable<Self>) {
        let roster = *table.roster();
        table.add_level([roster.idle, roster.wander]);
        table.add_level([roster.attack, roster.run]);
    }

    /// Точка, вокруг которой бродит / где прячется агент (нора, пост, склеп)
    fn anchor(&self) -> Option<Vec3> {
        None
    }

    fn access_point(&self) -> Option<Vec3> {
        None
    }

    /// Текущая позиция цели; `None` если цель исчезла
    fn locate(&self, target: Target, world: &dyn SpatialQuery) -> Option<Vec3> {
        match target {
            Target::Entity(entity) => world.position_of(entity),
            Target::AccessPoint => self.access_point(),
        }
    }

    fn before_tick(&mut self, _agent: &mut AgentCore, _cx: &mut TickContext<'_>) {}

    fn after_tick(&mut self, _agent: &mut AgentCore, _cx: &mut TickContext<'_>) {}

    fn on_damaged(&mut self, _agent: &mut AgentCore, _report: &DamageReport, _world: &dyn SpatialQuery) {}

    /// Тревога от соседа
    fn on_alerted(&mut self, _agent: &mut AgentCore) {}
}
