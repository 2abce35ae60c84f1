use crate::agent::{AgentCore, Archetype, State, StateTag, TickContext};
use crate::navigation::{PathStatus, ARRIVAL_EPSILON};

const ESCAPE_ATTEMPTS: usize = 4;

/// Run: бегство в случайную точку с ускорением. Скорость до входа
/// восстанавливается на выходе точно.
pub struct RunState {
    radius: f32,
    multiplier: f32,
    prior_speed: Option<f32>,
    escaping: bool,
}

impl RunState {
    pub fn new(radius: f32, multiplier: f32) -> Self {
        Self {
            radius,
            multiplier,
            prior_speed: None,
            escaping: false,
        }
    }
}

impl<A: Archetype> State<A> for RunState {
    fn tag(&self) -> StateTag {
        StateTag::Run
    }

    fn enter(&mut self, agent: &mut AgentCore, _archetype: &mut A, _cx: &mut TickContext<'_>) {
        let speed = agent.speed();
        self.prior_speed = Some(speed);
        agent.set_speed(speed * self.multiplier);
        agent.nav_mut().resume();
        self.escaping = false;
    }

    fn tick(&mut self, agent: &mut AgentCore, _archetype: &mut A, _cx: &mut TickContext<'_>) {
        if self.escaping {
            let nav = agent.nav();
            if !nav.has_path() || nav.path_status() == PathStatus::Invalid {
                // Путь потерян: ищем новую точку
                self.escaping = false;
            } else if !nav.path_pending() && nav.remaining_distance() <= nav.stopping_distance() + ARRIVAL_EPSILON {
                self.escaping = false;
                agent.to_idle();
                return;
            }
        }

        if self.escaping {
            return;
        }

        let origin = agent.position();
        for _ in 0..ESCAPE_ATTEMPTS {
            let Some(point) = agent.random_nav_point(origin, self.radius) else {
                continue;
            };
            if agent.nav_mut().set_destination(point) {
                self.escaping = true;
                return;
            }
        }

        crate::log(&format!("🏃 {:?}: no escape point found, giving up", agent.entity()));
        agent.to_idle();
    }

    fn exit(&mut self, agent: &mut AgentCore, _archetype: &mut A, _cx: &mut TickContext<'_>) {
        if let Some(speed) = self.prior_speed.take() {
            agent.set_speed(speed);
        }
        self.escaping = false;
    }
}
