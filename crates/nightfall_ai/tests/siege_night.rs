//! Осада через Bevy App: ночной штурм кристалла и реакция на урон.

use bevy::prelude::*;
use nightfall_ai::archetypes::SiegeCreature;
use nightfall_ai::systems::{spawn_objective, spawn_player, spawn_siege};
use nightfall_ai::{create_headless_app, Brain, DamageTaken, DayNight, Health, Target};

const CRYPT: Vec3 = Vec3::new(-20.0, 0.0, 0.0);

fn run(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        app.update();
    }
}

fn brain(app: &App, entity: Entity) -> &Brain<SiegeCreature> {
    app.world().get::<Brain<SiegeCreature>>(entity).unwrap()
}

#[test]
fn test_siege_stays_in_crypt_during_day() {
    let mut app = create_headless_app(1);
    spawn_objective(app.world_mut(), Vec3::ZERO, 500);
    let siege = spawn_siege(app.world_mut(), CRYPT, CRYPT);

    run(&mut app, 120);

    let agent = &brain(&app, siege).agent;
    assert_eq!(agent.level(), 0);
    assert!(app.world().get::<Transform>(siege).unwrap().translation.distance(CRYPT) < 1.0);
}

#[test]
fn test_night_assault_damages_objective() {
    let mut app = create_headless_app(7);
    let objective = spawn_objective(app.world_mut(), Vec3::ZERO, 500);
    let siege = spawn_siege(app.world_mut(), CRYPT, CRYPT);
    app.world_mut().resource_mut::<DayNight>().is_night = true;

    // 40 секунд симуляции
    run(&mut app, 2400);

    let health = app.world().get::<Health>(objective).unwrap();
    assert!(health.current < 500, "objective untouched: {:?}", health);

    let agent = &brain(&app, siege).agent;
    assert_eq!(agent.level(), 1);
    assert_eq!(agent.core().target(), Some(Target::Entity(objective)));
}

#[test]
fn test_dawn_sends_siege_back_to_crypt() {
    let mut app = create_headless_app(7);
    spawn_objective(app.world_mut(), Vec3::ZERO, 500);
    let siege = spawn_siege(app.world_mut(), CRYPT, CRYPT);

    app.world_mut().resource_mut::<DayNight>().is_night = true;
    run(&mut app, 300);
    assert_eq!(brain(&app, siege).agent.level(), 1);

    app.world_mut().resource_mut::<DayNight>().is_night = false;
    run(&mut app, 2);

    let agent = &brain(&app, siege).agent;
    assert_eq!(agent.level(), 0);
    assert_eq!(agent.current_name(), Some("RunToHide"));
}

#[test]
fn test_external_damage_commits_siege_to_player() {
    let mut app = create_headless_app(3);
    spawn_objective(app.world_mut(), Vec3::ZERO, 500);
    let player = spawn_player(app.world_mut(), Vec3::new(30.0, 0.0, 30.0), 100);
    let siege = spawn_siege(app.world_mut(), CRYPT, CRYPT);

    app.world_mut().resource_mut::<DayNight>().is_night = true;
    run(&mut app, 10);
    assert_eq!(brain(&app, siege).agent.level(), 1);

    app.world_mut().send_event(DamageTaken {
        target: siege,
        attacker: Some(player),
        amount: 10,
    });
    run(&mut app, 1);

    let agent = &brain(&app, siege).agent;
    assert_eq!(agent.core().target(), Some(Target::Entity(player)));
    assert!(agent.archetype().is_player_committed());
    assert_eq!(app.world().get::<Health>(siege).unwrap().current, 90);
}

#[test]
fn test_killed_siege_is_despawned() {
    let mut app = create_headless_app(3);
    spawn_objective(app.world_mut(), Vec3::ZERO, 500);
    let siege = spawn_siege(app.world_mut(), CRYPT, CRYPT);
    run(&mut app, 2);

    app.world_mut().send_event(DamageTaken {
        target: siege,
        attacker: None,
        amount: 1000,
    });
    run(&mut app, 2);

    assert!(app.world().get_entity(siege).is_err());
}
