//! World discovery: теги сущностей и spatial queries.
//!
//! Agent никогда не владеет чужими entity: он только спрашивает мир
//! "где сейчас X" и "кто с тегом T рядом". Исчезнувшая entity = `None`.

use bevy::prelude::*;

/// Тег сущности для spatial queries
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
#[reflect(Component)]
pub enum WorldTag {
    Player,
    /// Постройки игрока (стены, турели): цели для siege creatures по пути
    Ally,
    /// Главная постройка (кристалл), которую осаждают ночью
    Objective,
    /// Точка сбора для tactical charge
    RallyPoint,
    /// Базовый агент без специализации
    Wanderer,
    Critter,
    Guard,
    Siege,
}

/// Радиус "тела" сущности для ray probes
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Footprint {
    pub radius: f32,
}

impl Default for Footprint {
    fn default() -> Self {
        Self { radius: 0.5 }
    }
}

/// Read-only доступ к миру для states и archetype hooks
pub trait SpatialQuery {
    /// Текущая позиция entity; `None` если entity уничтожена (weak reference)
    fn position_of(&self, entity: Entity) -> Option<Vec3>;

    /// Первая entity с тегом
    fn first_tagged(&self, tag: WorldTag) -> Option<Entity>;

    /// Все entity с тегом в радиусе, отсортированы по дистанции
    fn tagged_within(&self, tag: WorldTag, center: Vec3, radius: f32) -> Vec<(Entity, Vec3)>;

    /// Первая entity с тегом вдоль луча (origin + direction * t, t ∈ [0, max_distance])
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32, tag: WorldTag) -> Option<Entity>;

    fn nearest_tagged(&self, tag: WorldTag, from: Vec3) -> Option<(Entity, Vec3)> {
        self.tagged_within(tag, from, f32::INFINITY).into_iter().next()
    }
}

#[derive(Debug, Clone, Copy)]
struct SnapshotEntry {
    entity: Entity,
    position: Vec3,
    tag: WorldTag,
    radius: f32,
}

/// Снимок мира на текущий тик
///
/// Собирается один раз перед decision phase из Transform + WorldTag.
/// Порядок entries = порядок вставки, поэтому запросы детерминированы.
#[derive(Debug, Clone, Default)]
pub struct WorldSnapshot {
    entries: Vec<SnapshotEntry>,
}

impl WorldSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entity: Entity, position: Vec3, tag: WorldTag, radius: f32) {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.entity == entity) {
            existing.position = position;
            existing.tag = tag;
            existing.radius = radius;
            return;
        }
        self.entries.push(SnapshotEntry { entity, position, tag, radius });
    }

    pub fn with(mut self, entity: Entity, position: Vec3, tag: WorldTag) -> Self {
        self.insert(entity, position, tag, Footprint::default().radius);
        self
    }

    pub fn move_entity(&mut self, entity: Entity, position: Vec3) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.entity == entity) {
            entry.position = position;
        }
    }

    pub fn remove(&mut self, entity: Entity) {
        self.entries.retain(|e| e.entity != entity);
    }

    /// Собирает snapshot из ECS query (сортировка по Entity для детерминизма)
    pub fn from_iter<'a>(
        items: impl IntoIterator<Item = (Entity, &'a Transform, &'a WorldTag, Option<&'a Footprint>)>,
    ) -> Self {
        let mut entries: Vec<SnapshotEntry> = items
            .into_iter()
            .map(|(entity, transform, tag, footprint)| SnapshotEntry {
                entity,
                position: transform.translation,
                tag: *tag,
                radius: footprint.copied().unwrap_or_default().radius,
            })
            .collect();
        entries.sort_by_key(|e| e.entity.index());
        Self { entries }
    }
}

impl SpatialQuery for WorldSnapshot {
    fn position_of(&self, entity: Entity) -> Option<Vec3> {
        self.entries.iter().find(|e| e.entity == entity).map(|e| e.position)
    }

    fn first_tagged(&self, tag: WorldTag) -> Option<Entity> {
        self.entries.iter().find(|e| e.tag == tag).map(|e| e.entity)
    }

    fn tagged_within(&self, tag: WorldTag, center: Vec3, radius: f32) -> Vec<(Entity, Vec3)> {
        let mut found: Vec<(Entity, Vec3, f32)> = self
            .entries
            .iter()
            .filter(|e| e.tag == tag)
            .map(|e| (e.entity, e.position, e.position.distance(center)))
            .filter(|(_, _, distance)| *distance <= radius)
            .collect();
        found.sort_by(|a, b| a.2.total_cmp(&b.2));
        found.into_iter().map(|(entity, position, _)| (entity, position)).collect()
    }

    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32, tag: WorldTag) -> Option<Entity> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }

        let mut best: Option<(Entity, f32)> = None;
        for entry in self.entries.iter().filter(|e| e.tag == tag) {
            let to_entry = entry.position - origin;
            let along = to_entry.dot(direction);
            if along < 0.0 || along > max_distance + entry.radius {
                continue;
            }

            // Перпендикулярное расстояние от центра до луча
            let closest = origin + direction * along;
            if closest.distance(entry.position) > entry.radius {
                continue;
            }

            if best.map_or(true, |(_, d)| along < d) {
                best = Some((entry.entity, along));
            }
        }

        best.map(|(entity, _)| entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(index: u32) -> Entity {
        Entity::from_raw(index)
    }

    #[test]
    fn test_position_of_vanished_entity_is_none() {
        let mut world = WorldSnapshot::new().with(entity(1), Vec3::X, WorldTag::Player);
        assert_eq!(world.position_of(entity(1)), Some(Vec3::X));

        world.remove(entity(1));
        assert_eq!(world.position_of(entity(1)), None);
    }

    #[test]
    fn test_tagged_within_sorted_by_distance() {
        let world = WorldSnapshot::new()
            .with(entity(1), Vec3::new(5.0, 0.0, 0.0), WorldTag::Critter)
            .with(entity(2), Vec3::new(2.0, 0.0, 0.0), WorldTag::Critter)
            .with(entity(3), Vec3::new(15.0, 0.0, 0.0), WorldTag::Critter)
            .with(entity(4), Vec3::new(1.0, 0.0, 0.0), WorldTag::Player);

        let found = world.tagged_within(WorldTag::Critter, Vec3::ZERO, 10.0);
        let ids: Vec<Entity> = found.iter().map(|(e, _)| *e).collect();
        assert_eq!(ids, vec![entity(2), entity(1)]);

        assert_eq!(world.nearest_tagged(WorldTag::Critter, Vec3::ZERO).map(|(e, _)| e), Some(entity(2)));
    }

    #[test]
    fn test_cast_ray_hits_only_ahead_and_in_range() {
        let world = WorldSnapshot::new()
            .with(entity(1), Vec3::new(0.0, 0.0, -1.5), WorldTag::Ally)
            .with(entity(2), Vec3::new(0.0, 0.0, 1.5), WorldTag::Ally)
            .with(entity(3), Vec3::new(3.0, 0.0, -1.0), WorldTag::Ally);

        // Bevy forward = -Z
        let hit = world.cast_ray(Vec3::ZERO, Vec3::NEG_Z, 2.0, WorldTag::Ally);
        assert_eq!(hit, Some(entity(1)));

        let miss = world.cast_ray(Vec3::new(0.0, 0.0, -5.0), Vec3::NEG_Z, 2.0, WorldTag::Ally);
        assert_eq!(miss, None);

        // Неверный тег
        assert_eq!(world.cast_ray(Vec3::ZERO, Vec3::NEG_Z, 2.0, WorldTag::Player), None);
    }
}
