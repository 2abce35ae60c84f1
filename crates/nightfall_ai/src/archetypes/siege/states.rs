use crate::agent::{AgentCore, Request, State, StateTag, Target, TickContext};
use crate::navigation::PathStatus;

use super::SiegeBehavior;

/// ChooseTarget: стоим, раз в `interval` секунд ищем objective → Pursuit
pub struct ChooseTargetState {
    interval: f32,
    elapsed: f32,
}

impl ChooseTargetState {
    pub fn new(interval: f32) -> Self {
        Self { interval, elapsed: 0.0 }
    }
}

impl<A: SiegeBehavior> State<A> for ChooseTargetState {
    fn tag(&self) -> StateTag {
        StateTag::ChooseTarget
    }

    fn enter(&mut self, agent: &mut AgentCore, _archetype: &mut A, _cx: &mut TickContext<'_>) {
        self.elapsed = 0.0;
        agent.nav_mut().stop();
    }

    fn tick(&mut self, agent: &mut AgentCore, archetype: &mut A, cx: &mut TickContext<'_>) {
        self.elapsed += cx.dt;
        if self.elapsed < self.interval {
            return;
        }
        self.elapsed = 0.0;

        let siege = archetype.siege_mut();
        let Some((objective, _)) = siege.locate_objective(cx.world) else {
            crate::log(&format!("🔍 {:?}: no objective left, idling", agent.entity()));
            agent.to_idle();
            return;
        };

        siege.forget_player();
        agent.to_move_to(Target::Entity(objective));
    }
}

/// Pursuit: движение к текущей цели с переоценкой приоритетов каждый тик
pub struct PursuitState;

impl PursuitState {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PursuitState {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: SiegeBehavior> State<A> for PursuitState {
    fn tag(&self) -> StateTag {
        StateTag::MoveToBase
    }

    fn name(&self) -> &'static str {
        "Pursuit"
    }

    fn enter(&mut self, agent: &mut AgentCore, archetype: &mut A, cx: &mut TickContext<'_>) {
        cx.animation.trigger("DoMove");
        agent.nav_mut().resume();

        if let Some(destination) = agent.target().and_then(|t| archetype.locate(t, cx.world)) {
            agent.nav_mut().set_destination(destination);
        }
    }

    fn tick(&mut self, agent: &mut AgentCore, archetype: &mut A, cx: &mut TickContext<'_>) {
        let siege = archetype.siege_mut();
        let Some((objective, objective_position)) = siege.locate_objective(cx.world) else {
            crate::log(&format!("🔍 {:?}: objective destroyed, idling", agent.entity()));
            agent.to_idle();
            return;
        };

        siege.reprioritize(agent, objective, objective_position, cx.world);

        let Some(target) = agent.target() else {
            agent.to_idle();
            return;
        };
        let Some(destination) = archetype.locate(target, cx.world) else {
            agent.to_idle();
            return;
        };

        let accepted = agent.nav_mut().set_destination(destination);
        if !accepted || agent.nav().path_status() == PathStatus::Invalid {
            crate::log_warning(&format!("⚠️ {:?}: no path to {:?}, re-choosing", agent.entity(), target));
            match archetype.siege().states() {
                Some(states) => agent.request(Request::State(states.choose_target)),
                None => agent.revert_to_level_start(),
            }
            return;
        }

        // Access point только промежуточная точка, его не атакуем
        if target != Target::AccessPoint && agent.position().distance(destination) <= archetype.siege().config().melee_range {
            agent.to_attack(target);
        }
    }
}
