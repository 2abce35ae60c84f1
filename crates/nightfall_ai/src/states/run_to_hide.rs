use crate::agent::{AgentCore, Archetype, State, StateTag, TickContext};

/// Остановка считается, когда |v|² ниже порога
const STOPPED_SPEED_SQ: f32 = 0.1;
const ARRIVAL_SLACK: f32 = 0.5;

/// RunToHide: бежим в укрытие (anchor архетипа), потом Hide
///
/// Скорость и stopping distance возвращаются к значениям до входа.
pub struct RunToHideState {
    multiplier: f32,
    stopping_distance: f32,
    prior_speed: Option<f32>,
    prior_stopping: Option<f32>,
}

impl RunToHideState {
    pub fn new(multiplier: f32, stopping_distance: f32) -> Self {
        Self {
            multiplier,
            stopping_distance,
            prior_speed: None,
            prior_stopping: None,
        }
    }
}

impl<A: Archetype> State<A> for RunToHideState {
    fn tag(&self) -> StateTag {
        StateTag::Run
    }

    fn name(&self) -> &'static str {
        "RunToHide"
    }

    fn enter(&mut self, agent: &mut AgentCore, archetype: &mut A, _cx: &mut TickContext<'_>) {
        let Some(shelter) = archetype.anchor() else {
            crate::log_error(&format!("❌ {:?} ({}): no shelter point, fallback to Idle", agent.entity(), A::NAME));
            agent.to_idle();
            return;
        };

        let nav = agent.nav_mut();
        nav.resume();
        self.prior_stopping = Some(nav.stopping_distance());
        nav.set_stopping_distance(self.stopping_distance);
        nav.set_destination(shelter);

        let speed = agent.speed();
        self.prior_speed = Some(speed);
        agent.set_speed(speed * self.multiplier);
    }

    fn tick(&mut self, agent: &mut AgentCore, archetype: &mut A, _cx: &mut TickContext<'_>) {
        if archetype.anchor().is_none() {
            agent.to_idle();
            return;
        }

        let nav = agent.nav();
        let near = !nav.path_pending() && nav.remaining_distance() <= nav.stopping_distance() + ARRIVAL_SLACK;
        if near && nav.velocity().length_squared() < STOPPED_SPEED_SQ {
            let nav = agent.nav_mut();
            nav.stop();
            nav.reset_path();

            crate::log(&format!("🕳️ {:?} ({}): reached shelter", agent.entity(), A::NAME));
            agent.to_hide();
        }
    }

    fn exit(&mut self, agent: &mut AgentCore, _archetype: &mut A, _cx: &mut TickContext<'_>) {
        if let Some(speed) = self.prior_speed.take() {
            agent.set_speed(speed);
        }
        if let Some(stopping) = self.prior_stopping.take() {
            agent.nav_mut().set_stopping_distance(stopping);
        }
    }
}
