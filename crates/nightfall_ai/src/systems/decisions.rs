//! Decide phase: один tick каждого brain.

use bevy::prelude::*;

use super::{AlertRaised, AttackLaunched, Brain};
use crate::agent::{AgentEvent, Archetype, TickContext};
use crate::components::{AnimatorParams, AttackWindow, DayNight, Signals};
use crate::world::{Footprint, WorldSnapshot, WorldTag};

/// System: tick всех агентов archetype `A`
///
/// Snapshot мира собирается один раз на систему. Агенты тикают по
/// возрастанию Entity, outbox каждого агента превращается в Bevy events.
pub fn tick_agents<A: Archetype>(
    time: Res<Time>,
    day_night: Res<DayNight>,
    world_items: Query<(Entity, &Transform, &WorldTag, Option<&Footprint>)>,
    mut brains: Query<(Entity, &mut Brain<A>, &mut AnimatorParams, Option<&AttackWindow>)>,
    mut attack_events: EventWriter<AttackLaunched>,
    mut alert_events: EventWriter<AlertRaised>,
) {
    if brains.is_empty() {
        return;
    }

    let dt = time.delta_secs();
    let world = WorldSnapshot::from_iter(world_items.iter());

    let mut agents: Vec<_> = brains.iter_mut().collect();
    agents.sort_by_key(|(entity, ..)| entity.index());

    for (entity, mut brain, mut animator, window) in agents {
        let signals = Signals {
            is_night: day_night.is_night,
            attack_window_open: window.is_some_and(AttackWindow::is_open),
        };
        let mut cx = TickContext::new(&world, &mut *animator)
            .with_dt(dt)
            .with_signals(signals);
        brain.agent.tick(&mut cx);

        let origin = brain.agent.core().position();
        for event in brain.agent.core_mut().drain_events() {
            match event {
                AgentEvent::AttackLaunched { target, damage, reach } => {
                    attack_events.write(AttackLaunched {
                        attacker: entity,
                        target,
                        damage,
                        reach,
                    });
                }
                AgentEvent::AlertRaised { radius } => {
                    alert_events.write(AlertRaised {
                        source: entity,
                        origin,
                        radius,
                        archetype: A::NAME,
                    });
                }
            }
        }
    }
}
