//! Здоровье: у агентов, игрока, построек и кристалла

use bevy::prelude::*;

/// Инвариант: `current <= max`; `current == 0` = мёртв
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    /// Урон не прошёл (иммунитет / блок), если после удара здоровье полное
    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }

    /// Доля здоровья [0, 1] для логов и UI
    pub fn fraction(&self) -> f32 {
        if self.max == 0 {
            return 0.0;
        }
        self.current as f32 / self.max as f32
    }

    /// Возвращает реально снятое здоровье (не больше остатка)
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let dealt = amount.min(self.current);
        self.current -= dealt;
        dealt
    }
}
