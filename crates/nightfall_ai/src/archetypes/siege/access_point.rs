//! Access point: точка на кольце вокруг objective, через которую агент
//! подходит к цели (чтобы толпа не сходилась в одну точку).

use bevy::prelude::*;
use rand::Rng;

use crate::agent::AgentCore;

/// Разброс направления от objective к агенту (радианы)
const ANGLE_JITTER: f32 = 0.6;

#[derive(Debug, Clone, PartialEq)]
pub struct AccessPoint {
    ring_radius: f32,
    tolerance: f32,
    position: Option<Vec3>,
    /// Sticky до конца штурма (сбрасывает `reset`)
    reached: bool,
}

impl AccessPoint {
    pub fn new(ring_radius: f32, tolerance: f32) -> Self {
        Self {
            ring_radius,
            tolerance,
            position: None,
            reached: false,
        }
    }

    pub fn position(&self) -> Option<Vec3> {
        self.position
    }

    pub fn is_reached(&self) -> bool {
        self.reached
    }

    pub fn mark_reached(&mut self) {
        self.reached = true;
    }

    /// Новый штурм: точку оставляем, флаг прибытия сбрасываем
    pub fn reset(&mut self) {
        self.reached = false;
    }

    /// Точка отсутствует или вышла из полосы [radius ± tolerance] вокруг objective
    pub fn is_stale(&self, objective: Vec3) -> bool {
        match self.position {
            Some(point) => (flat_distance(point, objective) - self.ring_radius).abs() > self.tolerance,
            None => true,
        }
    }

    /// Лениво выбирает точку на кольце со стороны агента; пересэмплирует,
    /// если objective сдвинулся. Точка всегда на навигационной поверхности.
    pub fn refresh(&mut self, objective: Vec3, agent: &mut AgentCore) -> Option<Vec3> {
        if !self.is_stale(objective) {
            return self.position;
        }

        let offset = agent.position() - objective;
        let base_angle = if offset.x.abs() + offset.z.abs() > 1e-4 {
            f32::atan2(offset.z, offset.x)
        } else {
            agent.rng_mut().gen_range(0.0..std::f32::consts::TAU)
        };
        let angle = base_angle + agent.rng_mut().gen_range(-ANGLE_JITTER..=ANGLE_JITTER);

        let candidate = objective + Vec3::new(angle.cos(), 0.0, angle.sin()) * self.ring_radius;
        self.position = agent
            .nav()
            .sample_position(candidate, self.tolerance)
            .filter(|point| (flat_distance(*point, objective) - self.ring_radius).abs() <= self.tolerance);

        match self.position {
            Some(point) => crate::log(&format!(
                "📍 {:?}: access point at ({:.1}, {:.1})",
                agent.entity(),
                point.x,
                point.z
            )),
            None => crate::log_warning(&format!("⚠️ {:?}: no navigable access point near objective", agent.entity())),
        }

        self.position
    }
}

fn flat_distance(a: Vec3, b: Vec3) -> f32 {
    Vec2::new(a.x - b.x, a.z - b.z).length()
}
