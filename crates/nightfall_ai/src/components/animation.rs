//! Animation-parameter sink (playback вне scope, только параметры)

use bevy::prelude::*;

use crate::agent::StateTag;

/// Куда агент пишет параметры аниматора
pub trait AnimationSink {
    /// Integer параметр "State" (edge-triggered со стороны машины)
    fn set_state(&mut self, tag: StateTag);

    /// One-shot trigger ("MeleeAttack", "DoMove")
    fn trigger(&mut self, name: &str);
}

/// Component: параметры аниматора агента
///
/// Rendering layer читает `state` и `last_trigger`; счётчики нужны для тестов
/// и телеметрии.
#[derive(Component, Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct AnimatorParams {
    pub state: Option<StateTag>,
    pub state_syncs: u32,
    pub last_trigger: Option<String>,
    pub trigger_count: u32,
}

impl AnimationSink for AnimatorParams {
    fn set_state(&mut self, tag: StateTag) {
        self.state = Some(tag);
        self.state_syncs += 1;
    }

    fn trigger(&mut self, name: &str) {
        self.last_trigger = Some(name.to_string());
        self.trigger_count += 1;
    }
}
