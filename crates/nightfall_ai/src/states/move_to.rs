use crate::agent::{AgentCore, Archetype, State, StateTag, TickContext};
use crate::navigation::PathStatus;

/// MoveTo: преследование цели (destination обновляется каждый тик)
pub struct MoveToState {
    tolerance: f32,
}

impl MoveToState {
    pub fn new(tolerance: f32) -> Self {
        Self { tolerance }
    }
}

impl<A: Archetype> State<A> for MoveToState {
    fn tag(&self) -> StateTag {
        StateTag::MoveToBase
    }

    fn enter(&mut self, agent: &mut AgentCore, archetype: &mut A, cx: &mut TickContext<'_>) {
        let Some(destination) = agent.target().and_then(|t| archetype.locate(t, cx.world)) else {
            agent.to_idle();
            return;
        };

        let nav = agent.nav_mut();
        nav.resume();
        nav.set_destination(destination);
    }

    fn tick(&mut self, agent: &mut AgentCore, archetype: &mut A, cx: &mut TickContext<'_>) {
        let Some(destination) = agent.target().and_then(|t| archetype.locate(t, cx.world)) else {
            agent.to_idle();
            return;
        };

        agent.nav_mut().set_destination(destination);

        if agent.position().distance(destination) <= self.tolerance {
            agent.to_idle();
            return;
        }

        if agent.nav().path_status() == PathStatus::Invalid {
            agent.to_idle();
        }
    }
}
