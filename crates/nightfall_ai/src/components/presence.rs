//! Presence: видимые и физические части тела агента (renderers, colliders).
//!
//! Hide выключает всё, что было включено, и на выходе включает ровно это же
//! множество. Части, выключенные до Hide, остаются выключенными.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum PartKind {
    Renderer,
    Collider,
}

#[derive(Debug, Clone, PartialEq, Reflect)]
pub struct PresencePart {
    pub name: String,
    pub kind: PartKind,
    pub enabled: bool,
}

/// Набор частей тела агента
#[derive(Debug, Clone, Default, PartialEq, Reflect)]
pub struct Presence {
    parts: Vec<PresencePart>,
}

impl Presence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Стандартное тело: mesh + shadow + hitbox collider
    pub fn body() -> Self {
        Self::new()
            .with_part("mesh", PartKind::Renderer, true)
            .with_part("shadow", PartKind::Renderer, true)
            .with_part("hitbox", PartKind::Collider, true)
    }

    pub fn with_part(mut self, name: impl Into<String>, kind: PartKind, enabled: bool) -> Self {
        self.parts.push(PresencePart {
            name: name.into(),
            kind,
            enabled,
        });
        self
    }

    pub fn parts(&self) -> &[PresencePart] {
        &self.parts
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.parts.iter().any(|p| p.name == name && p.enabled)
    }

    pub fn set_enabled(&mut self, name: &str, enabled: bool) {
        for part in self.parts.iter_mut().filter(|p| p.name == name) {
            part.enabled = enabled;
        }
    }

    /// Нет ни одной включённой части
    pub fn is_hidden(&self) -> bool {
        self.parts.iter().all(|p| !p.enabled)
    }

    pub fn enabled_count(&self) -> usize {
        self.parts.iter().filter(|p| p.enabled).count()
    }

    /// Выключает все включённые части, возвращает их индексы
    pub fn disable_enabled(&mut self) -> Vec<usize> {
        let mut disabled = Vec::new();
        for (index, part) in self.parts.iter_mut().enumerate() {
            if part.enabled {
                part.enabled = false;
                disabled.push(index);
            }
        }
        disabled
    }

    pub fn enable(&mut self, indices: &[usize]) {
        for &index in indices {
            if let Some(part) = self.parts.get_mut(index) {
                part.enabled = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disable_then_enable_restores_exact_set() {
        let mut presence = Presence::body().with_part("lantern", PartKind::Renderer, false);
        assert_eq!(presence.enabled_count(), 3);

        let disabled = presence.disable_enabled();
        assert_eq!(disabled, vec![0, 1, 2]);
        assert!(presence.is_hidden());

        presence.enable(&disabled);
        assert_eq!(presence.enabled_count(), 3);
        assert!(presence.is_enabled("hitbox"));
        assert!(!presence.is_enabled("lantern"));
    }
}
