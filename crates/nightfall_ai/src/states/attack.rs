use bevy::prelude::*;

use crate::agent::{yaw_towards, AgentCore, AgentEvent, Archetype, State, StateTag, TickContext};

const ATTACK_TRIGGER: &str = "MeleeAttack";
/// Максимальный угол между forward и направлением на цель для удара
const MAX_FACING_ANGLE_DEG: f32 = 60.0;
/// Не смотрим на цель → повторная проверка через 0.5с, а не через весь cooldown
const FACING_RETRY_DELAY: f32 = 0.5;
const TURN_RATE: f32 = 10.0;

/// Attack: стоим, доворачиваемся к цели, бьём по cadence
pub struct AttackState {
    timer: f32,
}

impl AttackState {
    pub fn new() -> Self {
        Self { timer: 0.0 }
    }
}

impl Default for AttackState {
    fn default() -> Self {
        Self::new()
    }
}

fn is_facing(agent: &AgentCore, target: Vec3) -> bool {
    let to_target = target - agent.position();
    let flat = Vec3::new(to_target.x, 0.0, to_target.z);
    if flat.length_squared() < 1e-6 {
        return true;
    }
    agent.forward().angle_between(flat).to_degrees() < MAX_FACING_ANGLE_DEG
}

impl<A: Archetype> State<A> for AttackState {
    fn tag(&self) -> StateTag {
        StateTag::Attack
    }

    fn enter(&mut self, agent: &mut AgentCore, _archetype: &mut A, _cx: &mut TickContext<'_>) {
        self.timer = 0.0;

        if agent.target().is_none() {
            agent.revert_to_level_start();
            return;
        }

        let nav = agent.nav_mut();
        nav.stop();
        nav.reset_path();
    }

    fn tick(&mut self, agent: &mut AgentCore, archetype: &mut A, cx: &mut TickContext<'_>) {
        let reach = agent.config().attack_reach();
        let position = agent.position();

        // Цель исчезла или явно убежала
        let target_position = agent
            .target()
            .and_then(|target| archetype.locate(target, cx.world))
            .filter(|p| p.distance(position) <= reach);
        let Some(target_position) = target_position else {
            agent.revert_to_level_start();
            return;
        };

        let to_target = target_position - position;
        let flat = Vec3::new(to_target.x, 0.0, to_target.z);
        if flat.length_squared() > 1e-6 {
            let look = yaw_towards(flat);
            let t = (cx.dt * TURN_RATE).min(1.0);
            agent.set_rotation(agent.rotation().slerp(look, t));
        }

        self.timer -= cx.dt;
        if self.timer > 0.0 {
            return;
        }

        if is_facing(agent, target_position) {
            self.timer = agent.attack_speed();
            cx.animation.trigger(ATTACK_TRIGGER);

            let damage = agent.config().attack_damage;
            let target = agent.target().and_then(|t| t.entity());
            agent.emit(AgentEvent::AttackLaunched { target, damage, reach });
        } else {
            self.timer = FACING_RETRY_DELAY;
        }
    }

    fn exit(&mut self, agent: &mut AgentCore, _archetype: &mut A, _cx: &mut TickContext<'_>) {
        agent.nav_mut().resume();
    }
}
