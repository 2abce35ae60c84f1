use crate::agent::Archetype;

/// Базовый агент: [Idle, Wander], [Attack, Run], без hooks
#[derive(Debug, Clone, Copy, Default)]
pub struct Wanderer;

impl Archetype for Wanderer {
    const NAME: &'static str = "Wanderer";
}
