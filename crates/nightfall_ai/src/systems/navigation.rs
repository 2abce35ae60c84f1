//! Navigate phase: path followers + окна удара.

use bevy::prelude::*;

use super::Brain;
use crate::agent::Archetype;
use crate::components::AttackWindow;
use crate::navigation::NavArea;

/// Resource: навигационная область для новых агентов
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct NavigationArea(pub NavArea);

impl Default for NavigationArea {
    fn default() -> Self {
        Self(NavArea::square(100.0))
    }
}

/// System: окна удара закрываются со временем
pub fn tick_attack_windows(time: Res<Time>, mut windows: Query<&mut AttackWindow>) {
    let dt = time.delta_secs();
    for mut window in windows.iter_mut() {
        if window.is_open() {
            window.tick(dt);
        }
    }
}

/// System: двигает path followers и пишет позу агента в Transform
///
/// Brain владеет позицией, Transform только отражение
/// (его читают spatial queries других агентов).
pub fn advance_navigation<A: Archetype>(time: Res<Time>, mut agents: Query<(&mut Brain<A>, &mut Transform)>) {
    let dt = time.delta_secs();
    for (mut brain, mut transform) in agents.iter_mut() {
        let core = brain.agent.core_mut();
        core.nav_mut().advance(dt);
        transform.translation = core.position();
        transform.rotation = core.rotation();
    }
}
