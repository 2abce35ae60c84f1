use rand::Rng;

use crate::agent::{AgentCore, Archetype, State, StateTag, TickContext};

/// Idle: стоим случайное время из [min, max), потом Wander
pub struct IdleState {
    min: f32,
    max: f32,
    duration: f32,
    elapsed: f32,
}

impl IdleState {
    pub fn new(min: f32, max: f32) -> Self {
        Self {
            min,
            max,
            duration: min,
            elapsed: 0.0,
        }
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }
}

impl<A: Archetype> State<A> for IdleState {
    fn tag(&self) -> StateTag {
        StateTag::Idle
    }

    fn enter(&mut self, agent: &mut AgentCore, _archetype: &mut A, _cx: &mut TickContext<'_>) {
        // Пустой или вырожденный диапазон → min
        self.duration = if self.max <= self.min {
            self.min
        } else {
            agent.rng_mut().gen_range(self.min..self.max)
        };
        self.elapsed = 0.0;

        let nav = agent.nav_mut();
        nav.stop();
        nav.reset_path();
    }

    fn tick(&mut self, agent: &mut AgentCore, _archetype: &mut A, cx: &mut TickContext<'_>) {
        self.elapsed += cx.dt;
        if self.elapsed >= self.duration {
            self.elapsed = 0.0;
            agent.to_wander();
        }
    }
}
