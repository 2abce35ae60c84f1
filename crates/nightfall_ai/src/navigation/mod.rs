//! Path-following capability (внешний collaborator)
//!
//! State machine только выдаёт destination и опрашивает прогресс.
//! Сам pathfinding спрятан за трейтом `PathFollower`. `GroundNavigator` это
//! headless реализация (прямая линия по плоской навигационной области).

use bevy::prelude::*;

/// Допуск прибытия поверх stopping distance (float шум при подходе)
pub const ARRIVAL_EPSILON: f32 = 0.05;

/// Статус последнего запроса пути
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum PathStatus {
    /// Путь есть (или пути нет и никто не просил)
    #[default]
    Complete,
    /// Destination недостижима
    Invalid,
}

/// Контракт path-following
pub trait PathFollower: Send + Sync {
    /// Агент включён и стоит на навигационной поверхности
    fn is_ready(&self) -> bool {
        self.is_enabled() && self.is_on_navigable_surface()
    }

    fn is_enabled(&self) -> bool;
    fn is_on_navigable_surface(&self) -> bool;

    /// Авторитетная позиция агента (path follower двигает тело)
    fn position(&self) -> Vec3;
    fn velocity(&self) -> Vec3;

    /// Запросить путь. `false` если destination недостижима.
    fn set_destination(&mut self, destination: Vec3) -> bool;
    fn destination(&self) -> Option<Vec3>;
    fn has_path(&self) -> bool;
    fn path_pending(&self) -> bool;
    fn path_status(&self) -> PathStatus;
    fn remaining_distance(&self) -> f32;

    fn stopping_distance(&self) -> f32;
    fn set_stopping_distance(&mut self, distance: f32);
    fn set_speed(&mut self, speed: f32);

    fn stop(&mut self);
    fn resume(&mut self);
    fn is_stopped(&self) -> bool;
    fn reset_path(&mut self);

    /// Ближайшая навигационная точка в радиусе `max_distance`
    fn sample_position(&self, point: Vec3, max_distance: f32) -> Option<Vec3>;

    /// Продвинуть агента на один тик
    fn advance(&mut self, dt: f32);
}

/// Навигационная область: прямоугольник XZ минус заблокированные диски
#[derive(Debug, Clone, PartialEq)]
pub struct NavArea {
    pub min: Vec2,
    pub max: Vec2,
    /// (center XZ, radius): непроходимые зоны (стены, вода)
    pub blocked: Vec<(Vec2, f32)>,
}

impl Default for NavArea {
    fn default() -> Self {
        Self::square(100.0)
    }
}

impl NavArea {
    /// Квадрат с центром в origin и половиной стороны `half_extent`
    pub fn square(half_extent: f32) -> Self {
        Self {
            min: Vec2::splat(-half_extent),
            max: Vec2::splat(half_extent),
            blocked: Vec::new(),
        }
    }

    pub fn with_blocked(mut self, center: Vec2, radius: f32) -> Self {
        self.blocked.push((center, radius));
        self
    }

    pub fn contains(&self, point: Vec3) -> bool {
        let flat = point.xz();
        flat.x >= self.min.x
            && flat.x <= self.max.x
            && flat.y >= self.min.y
            && flat.y <= self.max.y
            && !self.blocked.iter().any(|(center, radius)| flat.distance(*center) < *radius)
    }

    fn clamp(&self, point: Vec3) -> Vec3 {
        let flat = point.xz().clamp(self.min, self.max);
        Vec3::new(flat.x, point.y, flat.y)
    }
}

/// Headless path follower: движение по прямой с постоянной скоростью
///
/// Инвариант: `destination.is_some()` ⇔ `has_path()`.
#[derive(Debug, Clone)]
pub struct GroundNavigator {
    position: Vec3,
    velocity: Vec3,
    speed: f32,
    stopping_distance: f32,
    destination: Option<Vec3>,
    status: PathStatus,
    stopped: bool,
    enabled: bool,
    area: NavArea,
}

impl GroundNavigator {
    pub fn new(position: Vec3, area: NavArea) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            speed: 3.5,
            stopping_distance: 0.0,
            destination: None,
            status: PathStatus::Complete,
            stopped: false,
            enabled: true,
            area,
        }
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.velocity = Vec3::ZERO;
        }
    }
}

impl PathFollower for GroundNavigator {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn is_on_navigable_surface(&self) -> bool {
        self.area.contains(self.position)
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_destination(&mut self, destination: Vec3) -> bool {
        if self.area.contains(destination) {
            self.destination = Some(destination);
            self.status = PathStatus::Complete;
            true
        } else {
            self.destination = None;
            self.status = PathStatus::Invalid;
            false
        }
    }

    fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    fn has_path(&self) -> bool {
        self.destination.is_some()
    }

    fn path_pending(&self) -> bool {
        // Путь считается мгновенно
        false
    }

    fn path_status(&self) -> PathStatus {
        self.status
    }

    fn remaining_distance(&self) -> f32 {
        self.destination
            .map(|d| self.position.xz().distance(d.xz()))
            .unwrap_or(0.0)
    }

    fn stopping_distance(&self) -> f32 {
        self.stopping_distance
    }

    fn set_stopping_distance(&mut self, distance: f32) {
        self.stopping_distance = distance.max(0.0);
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    fn stop(&mut self) {
        self.stopped = true;
        self.velocity = Vec3::ZERO;
    }

    fn resume(&mut self) {
        self.stopped = false;
    }

    fn is_stopped(&self) -> bool {
        self.stopped
    }

    fn reset_path(&mut self) {
        self.destination = None;
        self.status = PathStatus::Complete;
        self.velocity = Vec3::ZERO;
    }

    fn sample_position(&self, point: Vec3, max_distance: f32) -> Option<Vec3> {
        let candidate = self.area.clamp(point);
        if candidate.distance(point) > max_distance {
            return None;
        }
        self.area.contains(candidate).then_some(candidate)
    }

    fn advance(&mut self, dt: f32) {
        if !self.enabled || self.stopped || dt <= 0.0 {
            self.velocity = Vec3::ZERO;
            return;
        }

        let Some(destination) = self.destination else {
            self.velocity = Vec3::ZERO;
            return;
        };

        let to_destination = Vec3::new(destination.x - self.position.x, 0.0, destination.z - self.position.z);
        let distance = to_destination.length();
        if distance <= self.stopping_distance.max(0.001) {
            self.velocity = Vec3::ZERO;
            return;
        }

        // Не проскакиваем точку остановки
        let step = (self.speed * dt).min(distance - self.stopping_distance);
        let delta = to_destination / distance * step.max(0.0);
        self.position += delta;
        self.velocity = delta / dt;
    }
}
