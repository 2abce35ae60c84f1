//! Nightfall AI
//!
//! Layered state machine для игровых агентов (critters, стражи, осадные
//! существа) + headless Bevy 0.16 host.
//!
//! Слои:
//! - agent/states/archetypes = чистая логика, тестируется без ECS
//! - systems = Bevy host (brains как components, FixedUpdate 60Hz)

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

pub mod agent;
pub mod archetypes;
pub mod components;
pub mod config;
pub mod logger;
pub mod navigation;
pub mod states;
pub mod systems;
pub mod world;

#[cfg(test)]
mod test_support;

pub use agent::{Agent, AgentCore, Archetype, StateChange, StateTag, Target, TransitionError};
pub use components::*;
pub use config::{AiTuning, ConfigError};
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, log_with_level, set_log_level, set_logger,
    set_logger_if_needed, BufferLogger, ConsoleLogger, LogLevel, LogPrinter,
};
pub use systems::{AiPlugin, AiSet, AlertRaised, AttackLaunched, Brain, DamageApplied, DamageTaken, EntityDied};
pub use world::{Footprint, WorldTag};

/// Шаг FixedUpdate (60Hz)
pub const TICK_HZ: f64 = 60.0;

/// Главный plugin симуляции: fixed 60Hz + seeds + AI
///
/// `DeterministicRng`, вставленный до plugin'а, не перезаписывается.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Time::<Fixed>::from_hz(TICK_HZ));
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }
        app.add_plugins(AiPlugin);
    }
}

/// Resource: источник seeds для агентов
///
/// Seed мира → поток seeds агентов. Одинаковый порядок spawn'а даёт
/// одинаковых агентов (idle паузы, точки блуждания, aggro rolls).
#[derive(Resource)]
pub struct DeterministicRng {
    seed: u64,
    stream: ChaCha8Rng,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            stream: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn next_seed(&mut self) -> u64 {
        self.stream.gen()
    }
}

/// Headless App: MinimalPlugins + симуляция, время ручное
///
/// Каждый `app.update()` двигает часы ровно на один fixed шаг, поэтому
/// N updates = N тиков AI (кроме первого update: его дельта нулевая).
pub fn create_headless_app(seed: u64) -> App {
    init_logger();

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(1.0 / TICK_HZ)))
        .add_plugins(SimulationPlugin);
    app
}

/// Байтовый snapshot компонента `T` по всем entity (сравнение прогонов)
///
/// Entity упорядочены по index, значение пишется через `Debug`.
pub fn world_snapshot<T: Component + std::fmt::Debug>(world: &mut World) -> Vec<u8> {
    let mut rows: Vec<(u32, String)> = world
        .query::<(Entity, &T)>()
        .iter(world)
        .map(|(entity, value)| (entity.index(), format!("{:?}", value)))
        .collect();
    rows.sort_by_key(|(index, _)| *index);

    rows.into_iter()
        .flat_map(|(index, row)| index.to_le_bytes().into_iter().chain(row.into_bytes()))
        .collect()
}
