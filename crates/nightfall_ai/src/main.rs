//! Headless симуляция Nightfall AI
//!
//! Один день и одна ночь: critters, страж, осадные существа штурмуют кристалл.
//! Usage: nightfall_ai [tuning.json]

use bevy::prelude::*;
use nightfall_ai::archetypes::SiegeCreature;
use nightfall_ai::systems::{
    spawn_critter, spawn_guard, spawn_objective, spawn_player, spawn_rally_point, spawn_siege, spawn_tactical_siege,
    spawn_wanderer,
};
use nightfall_ai::{create_headless_app, AiTuning, Brain, DayNight};

const SEED: u64 = 42;
const TICKS: usize = 1800;
const NIGHTFALL_TICK: usize = 300;
const DAWN_TICK: usize = 1500;

fn main() {
    let mut app = create_headless_app(SEED);

    if let Some(path) = std::env::args().nth(1) {
        match AiTuning::from_json_file(&path) {
            Ok(tuning) => {
                nightfall_ai::log_info(&format!("⚙️ tuning loaded from {}", path));
                app.insert_resource(tuning);
            }
            Err(err) => {
                nightfall_ai::log_error(&format!("❌ {}: {}", path, err));
                std::process::exit(1);
            }
        }
    }

    nightfall_ai::log_info(&format!("🌙 Starting Nightfall AI headless simulation (seed: {})", SEED));

    {
        let world = app.world_mut();
        spawn_player(world, Vec3::new(0.0, 0.0, 15.0), 100);
        spawn_objective(world, Vec3::ZERO, 500);
        spawn_rally_point(world, Vec3::new(-12.0, 0.0, -12.0));

        spawn_wanderer(world, Vec3::new(20.0, 0.0, 20.0));
        for i in 0..3 {
            let burrow = Vec3::new(-25.0 + i as f32 * 2.0, 0.0, 25.0);
            spawn_critter(world, burrow + Vec3::X, burrow);
        }
        spawn_guard(world, Vec3::new(25.0, 0.0, -25.0), Vec3::new(25.0, 0.0, -25.0));

        let crypt = Vec3::new(-30.0, 0.0, -30.0);
        for i in 0..4 {
            spawn_siege(world, crypt + Vec3::new(i as f32, 0.0, 0.0), crypt);
        }
        spawn_tactical_siege(world, crypt + Vec3::new(0.0, 0.0, 2.0), crypt);
    }

    for tick in 0..TICKS {
        if tick == NIGHTFALL_TICK {
            app.world_mut().resource_mut::<DayNight>().is_night = true;
            nightfall_ai::log_info("🌑 Nightfall");
        }
        if tick == DAWN_TICK {
            app.world_mut().resource_mut::<DayNight>().is_night = false;
            nightfall_ai::log_info("🌅 Dawn");
        }

        app.update();

        if tick % 300 == 0 {
            report(&mut app, tick);
        }
    }

    nightfall_ai::log_info("✅ Simulation complete!");
}

fn report(app: &mut App, tick: usize) {
    let world = app.world_mut();
    let entity_count = world.entities().len();

    let mut query = world.query::<(Entity, &Brain<SiegeCreature>)>();
    let mut siege: Vec<_> = query
        .iter(world)
        .map(|(entity, brain)| (entity.index(), brain.agent.level(), brain.agent.current_name().unwrap_or("-")))
        .collect();
    siege.sort_by_key(|(index, _, _)| *index);

    nightfall_ai::log_info(&format!("Tick {}: {} entities, siege {:?}", tick, entity_count, siege));
}
