//! Что агент сообщает наружу и что получает от боевой системы.

use bevy::prelude::*;

use crate::components::Health;

/// Исходящие события агента (outbox, забирает host)
#[derive(Debug, Clone, PartialEq)]
pub enum AgentEvent {
    /// Замах (Attack state выстрелил по cadence)
    AttackLaunched {
        /// `None` если цель не entity (access point)
        target: Option<Entity>,
        damage: u32,
        reach: f32,
    },

    /// Тревога для соседей того же архетипа
    AlertRaised { radius: f32 },
}

/// Урон, уже применённый к здоровью агента
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageReport {
    pub attacker: Option<Entity>,
    pub amount: u32,
    /// Здоровье после урона
    pub health: Health,
}
