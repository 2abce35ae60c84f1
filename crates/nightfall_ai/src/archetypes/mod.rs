//! Archetypes: специализации агента поверх shared states
//!
//! - wanderer: уровни по умолчанию, без hooks
//! - critter: детекция игрока, тревога соседям, нора
//! - guard: патруль поста + погоня с лимитом дистанции
//! - siege: ночной штурм objective (+ tactical вариант с рывком к точке сбора)

pub mod critter;
pub mod guard;
pub mod siege;
pub mod wanderer;

#[cfg(test)]
mod guard_tests;

pub use critter::Critter;
pub use guard::{ChaseState, PatrolState, TerritorialGuard};
pub use siege::{AccessPoint, ChargeState, ChooseTargetState, PursuitState, SiegeBehavior, SiegeCreature, TacticalSiegeCreature};
pub use wanderer::Wanderer;
