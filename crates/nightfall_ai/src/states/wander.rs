use crate::agent::{AgentCore, Archetype, State, StateTag, TickContext};

/// Wander: случайная точка вокруг anchor архетипа (или текущей позиции),
/// по прибытии Idle. Нет точки → Idle.
pub struct WanderState {
    radius: f32,
    tolerance: f32,
}

impl WanderState {
    pub fn new(radius: f32, tolerance: f32) -> Self {
        Self { radius, tolerance }
    }
}

impl<A: Archetype> State<A> for WanderState {
    fn tag(&self) -> StateTag {
        StateTag::Wander
    }

    fn enter(&mut self, agent: &mut AgentCore, _archetype: &mut A, _cx: &mut TickContext<'_>) {
        agent.nav_mut().resume();
    }

    fn tick(&mut self, agent: &mut AgentCore, archetype: &mut A, _cx: &mut TickContext<'_>) {
        let nav = agent.nav();

        // Прибытие проверяем до выбора новой точки
        if nav.has_path() && !nav.path_pending() && nav.remaining_distance() <= self.tolerance {
            agent.to_idle();
            return;
        }

        if nav.has_path() || nav.path_pending() {
            return;
        }

        let origin = archetype.anchor().unwrap_or_else(|| agent.position());
        let accepted = match agent.random_nav_point(origin, self.radius) {
            Some(point) => agent.nav_mut().set_destination(point),
            None => false,
        };

        if !accepted {
            agent.to_idle();
        }
    }
}
