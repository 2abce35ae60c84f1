//! Детерминизм: одинаковый seed → идентичный мир
//!
//! Полная сцена (critters, страж, осада ночью) через Bevy App. Позиции
//! и здоровье всех entity сравниваются побайтово.

use bevy::prelude::*;
use nightfall_ai::systems::{
    spawn_critter, spawn_guard, spawn_objective, spawn_player, spawn_rally_point, spawn_siege, spawn_tactical_siege,
    spawn_wanderer,
};
use nightfall_ai::{create_headless_app, world_snapshot, DayNight, Health};

#[test]
fn test_determinism_same_seed() {
    const SEED: u64 = 12345;
    const TICK_COUNT: usize = 900;

    let first = run_simulation(SEED, TICK_COUNT);
    let second = run_simulation(SEED, TICK_COUNT);

    assert_eq!(first, second, "Симуляция с одинаковым seed ({}) дала разные результаты!", SEED);
}

#[test]
fn test_determinism_multiple_runs() {
    const SEED: u64 = 42;
    const TICK_COUNT: usize = 600;

    let snapshots: Vec<_> = (0..3).map(|_| run_simulation(SEED, TICK_COUNT)).collect();

    for (i, snapshot) in snapshots.iter().enumerate().skip(1) {
        assert_eq!(snapshots[0], *snapshot, "Прогон {} дал результат отличный от прогона 0", i);
    }
}

/// Запускает сцену и возвращает snapshot Transform + Health
fn run_simulation(seed: u64, tick_count: usize) -> (Vec<u8>, Vec<u8>) {
    let mut app = create_headless_app(seed);

    {
        let world = app.world_mut();
        spawn_player(world, Vec3::new(0.0, 0.0, 12.0), 100);
        spawn_objective(world, Vec3::ZERO, 500);
        spawn_rally_point(world, Vec3::new(-10.0, 0.0, -10.0));

        spawn_wanderer(world, Vec3::new(15.0, 0.0, 15.0));
        for i in 0..4 {
            let burrow = Vec3::new(-20.0 + i as f32 * 3.0, 0.0, 20.0);
            spawn_critter(world, burrow, burrow);
        }
        spawn_guard(world, Vec3::new(6.0, 0.0, 12.0), Vec3::new(8.0, 0.0, 12.0));

        let crypt = Vec3::new(-25.0, 0.0, -25.0);
        for i in 0..3 {
            spawn_siege(world, crypt + Vec3::new(i as f32, 0.0, 0.0), crypt);
        }
        spawn_tactical_siege(world, crypt + Vec3::new(0.0, 0.0, 2.0), crypt);
    }

    for tick in 0..tick_count {
        if tick == tick_count / 3 {
            app.world_mut().resource_mut::<DayNight>().is_night = true;
        }
        app.update();
    }

    let transforms = world_snapshot::<Transform>(app.world_mut());
    let healths = world_snapshot::<Health>(app.world_mut());
    (transforms, healths)
}
