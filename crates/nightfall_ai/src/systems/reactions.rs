//! React phase: удары, урон, реакции brains, тревоги, смерть.

use bevy::prelude::*;

use super::{AlertRaised, AttackLaunched, Brain, DamageApplied, DamageTaken, EntityDied};
use crate::agent::{alert_recipients, Archetype, DamageReport, TickContext};
use crate::components::{AnimatorParams, AttackWindow, DayNight, Health, Signals};
use crate::config::AiTuning;
use crate::world::{Footprint, WorldSnapshot, WorldTag};

/// System: замах открывает окно удара атакующего
pub fn open_attack_windows(
    mut attacks: EventReader<AttackLaunched>,
    tuning: Res<AiTuning>,
    mut windows: Query<&mut AttackWindow>,
) {
    for attack in attacks.read() {
        if let Ok(mut window) = windows.get_mut(attack.attacker) {
            window.open(tuning.agent.attack_window);
        }
    }
}

/// System: замах → DamageTaken, если цель всё ещё в пределах reach
pub fn resolve_melee_hits(
    mut attacks: EventReader<AttackLaunched>,
    transforms: Query<&Transform>,
    healths: Query<&Health>,
    mut damage_events: EventWriter<DamageTaken>,
) {
    for attack in attacks.read() {
        let Some(target) = attack.target else {
            continue;
        };
        let (Ok(from), Ok(to)) = (transforms.get(attack.attacker), transforms.get(target)) else {
            continue;
        };
        if healths.get(target).is_err() {
            continue;
        }

        let distance = from.translation.distance(to.translation);
        if distance > attack.reach {
            crate::log(&format!(
                "💨 {:?} missed {:?} ({:.1}m > {:.1}m)",
                attack.attacker, target, distance, attack.reach
            ));
            continue;
        }

        damage_events.write(DamageTaken {
            target,
            attacker: Some(attack.attacker),
            amount: attack.damage,
        });
    }
}

/// System: DamageTaken → Health → DamageApplied (+ EntityDied)
pub fn apply_damage(
    mut requests: EventReader<DamageTaken>,
    mut healths: Query<&mut Health>,
    mut applied_events: EventWriter<DamageApplied>,
    mut died_events: EventWriter<EntityDied>,
) {
    for request in requests.read() {
        let Ok(mut health) = healths.get_mut(request.target) else {
            crate::log_warning(&format!("⚠️ DamageTaken: {:?} has no Health", request.target));
            continue;
        };
        if !health.is_alive() {
            continue;
        }

        let dealt = health.take_damage(request.amount);
        crate::log(&format!(
            "🩸 {:?} -{} hp ({:.0}% left)",
            request.target,
            dealt,
            health.fraction() * 100.0
        ));
        applied_events.write(DamageApplied {
            target: request.target,
            attacker: request.attacker,
            amount: request.amount,
            health: *health,
        });

        if !health.is_alive() {
            crate::log(&format!("💀 {:?} killed by {:?}", request.target, request.attacker));
            died_events.write(EntityDied {
                entity: request.target,
                killer: request.attacker,
            });
        }
    }
}

/// System: DamageApplied → `Agent::on_damaged` (archetype решает, что делать)
pub fn react_to_damage<A: Archetype>(
    mut applied_events: EventReader<DamageApplied>,
    day_night: Res<DayNight>,
    world_items: Query<(Entity, &Transform, &WorldTag, Option<&Footprint>)>,
    mut brains: Query<(&mut Brain<A>, &mut AnimatorParams)>,
) {
    if brains.is_empty() {
        applied_events.clear();
        return;
    }

    let world = WorldSnapshot::from_iter(world_items.iter());
    let signals = Signals {
        is_night: day_night.is_night,
        attack_window_open: false,
    };

    for event in applied_events.read() {
        let Ok((mut brain, mut animator)) = brains.get_mut(event.target) else {
            continue;
        };

        let report = DamageReport {
            attacker: event.attacker,
            amount: event.amount,
            health: event.health,
        };
        let mut cx = TickContext::new(&world, &mut *animator).with_signals(signals);
        brain.agent.on_damaged(report, &mut cx);
    }
}

/// System: AlertRaised → `Agent::on_alerted` соседей того же archetype
pub fn propagate_alerts<A: Archetype>(
    mut alert_events: EventReader<AlertRaised>,
    day_night: Res<DayNight>,
    world_items: Query<(Entity, &Transform, &WorldTag, Option<&Footprint>)>,
    mut brains: Query<(Entity, &mut Brain<A>, &mut AnimatorParams)>,
) {
    let alerts: Vec<AlertRaised> = alert_events
        .read()
        .filter(|alert| alert.archetype == A::NAME)
        .cloned()
        .collect();
    if alerts.is_empty() {
        return;
    }

    let world = WorldSnapshot::from_iter(world_items.iter());
    let signals = Signals {
        is_night: day_night.is_night,
        attack_window_open: false,
    };

    for alert in alerts {
        let mut candidates: Vec<(Entity, Vec3)> = brains
            .iter()
            .map(|(entity, brain, _)| (entity, brain.agent.core().position()))
            .collect();
        candidates.sort_by_key(|(entity, _)| entity.index());

        for recipient in alert_recipients(alert.source, alert.origin, alert.radius, candidates) {
            let Ok((_, mut brain, mut animator)) = brains.get_mut(recipient) else {
                continue;
            };

            crate::log(&format!("📢 {:?} alerted by {:?} ({})", recipient, alert.source, A::NAME));
            let mut cx = TickContext::new(&world, &mut *animator).with_signals(signals);
            brain.agent.on_alerted(&mut cx);
        }
    }
}

/// System: despawn мёртвых (кроме игрока: его смерть обрабатывает игра)
pub fn despawn_dead(mut commands: Commands, mut died_events: EventReader<EntityDied>, tags: Query<Option<&WorldTag>>) {
    for event in died_events.read() {
        let Ok(tag) = tags.get(event.entity) else {
            continue;
        };
        if tag == Some(&WorldTag::Player) {
            continue;
        }

        crate::log(&format!("🧹 despawn {:?}", event.entity));
        commands.entity(event.entity).despawn();
    }
}
