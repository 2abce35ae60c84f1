//! Внешние сигналы: день/ночь (scheduler) и окно удара (attack animation).

use bevy::prelude::*;

/// Resource: выставляется day-night scheduler'ом (вне этого crate)
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayNight {
    pub is_night: bool,
}

/// Снимок сигналов для одного агента на текущий тик
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Signals {
    pub is_night: bool,
    /// Окно удара этого агента открыто (hitbox активен)
    pub attack_window_open: bool,
}

/// Детектор фронта булевого сигнала
///
/// `update` возвращает новое значение только когда оно изменилось.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeDetector {
    last: bool,
}

impl EdgeDetector {
    pub fn new(initial: bool) -> Self {
        Self { last: initial }
    }

    pub fn update(&mut self, value: bool) -> Option<bool> {
        if value == self.last {
            return None;
        }
        self.last = value;
        Some(value)
    }

    pub fn value(&self) -> bool {
        self.last
    }
}

/// Component: окно удара (аналог hitbox window из animation events)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct AttackWindow {
    pub remaining: f32,
}

impl AttackWindow {
    pub fn open(&mut self, duration: f32) {
        self.remaining = duration.max(0.0);
    }

    pub fn is_open(&self) -> bool {
        self.remaining > 0.0
    }

    pub fn tick(&mut self, dt: f32) {
        self.remaining = (self.remaining - dt).max(0.0);
    }
}
