use crate::agent::{AgentCore, Archetype, State, StateTag, TickContext};

/// Hide: прячем все включённые части тела; сам не выходит
pub struct HideState {
    hidden: Vec<usize>,
}

impl HideState {
    pub fn new() -> Self {
        Self { hidden: Vec::new() }
    }
}

impl Default for HideState {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Archetype> State<A> for HideState {
    fn tag(&self) -> StateTag {
        StateTag::Hide
    }

    fn enter(&mut self, agent: &mut AgentCore, _archetype: &mut A, _cx: &mut TickContext<'_>) {
        let nav = agent.nav_mut();
        nav.stop();
        nav.reset_path();

        self.hidden = agent.presence_mut().disable_enabled();
    }

    fn tick(&mut self, _agent: &mut AgentCore, _archetype: &mut A, _cx: &mut TickContext<'_>) {}

    fn exit(&mut self, agent: &mut AgentCore, _archetype: &mut A, _cx: &mut TickContext<'_>) {
        let hidden = std::mem::take(&mut self.hidden);
        agent.presence_mut().enable(&hidden);
        agent.nav_mut().resume();
    }
}
