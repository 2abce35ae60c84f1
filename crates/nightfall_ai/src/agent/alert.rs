//! Cross-agent тревога: кого будить.
//!
//! Решение чистое (позиции → список entity), будит caller через
//! `Agent::on_alerted` каждого получателя.

use bevy::prelude::*;

/// Все кандидаты в радиусе `radius` от `origin`, кроме самого источника.
/// Порядок = порядок кандидатов.
pub fn alert_recipients(
    source: Entity,
    origin: Vec3,
    radius: f32,
    candidates: impl IntoIterator<Item = (Entity, Vec3)>,
) -> Vec<Entity> {
    candidates
        .into_iter()
        .filter(|(entity, position)| *entity != source && position.distance(origin) <= radius)
        .map(|(entity, _)| entity)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipients_exclude_source_and_far_agents() {
        let source = Entity::from_raw(1);
        let near = Entity::from_raw(2);
        let far = Entity::from_raw(3);

        let recipients = alert_recipients(
            source,
            Vec3::ZERO,
            5.0,
            [
                (source, Vec3::ZERO),
                (near, Vec3::new(3.0, 0.0, 4.0)), // ровно 5м
                (far, Vec3::new(6.0, 0.0, 0.0)),
            ],
        );

        assert_eq!(recipients, vec![near]);
    }
}
