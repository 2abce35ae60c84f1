//! Level table builder: arena состояний + уровни + роли.

use super::{Archetype, State, StateId, StateTag};
use crate::config::AgentConfig;
use crate::states::{AttackState, HideState, IdleState, MoveToState, RunState, WanderState};

/// Роли, к которым обращаются states и archetype hooks (`to_idle`, `to_wander`...)
///
/// Archetype может переназначить роль на свой state (Patrol вместо Wander,
/// Pursuit вместо MoveTo).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Roster {
    pub idle: StateId,
    pub wander: StateId,
    pub attack: StateId,
    pub run: StateId,
    pub hide: StateId,
    pub move_to: StateId,
}

/// Собирается один раз при spawn, затем переезжает в `Agent`
pub struct StateTable<A: Archetype> {
    pub(super) states: Vec<Box<dyn State<A>>>,
    pub(super) levels: Vec<Vec<StateId>>,
    pub(super) roster: Roster,
    config: AgentConfig,
}

impl<A: Archetype> StateTable<A> {
    /// Arena с общими состояниями, уровней ещё нет
    pub(super) fn with_shared(config: &AgentConfig) -> Self {
        let mut states: Vec<Box<dyn State<A>>> = Vec::with_capacity(8);
        let mut push = |state: Box<dyn State<A>>| {
            states.push(state);
            StateId(states.len() - 1)
        };

        let roster = Roster {
            idle: push(Box::new(IdleState::new(config.idle_min, config.idle_max))),
            wander: push(Box::new(WanderState::new(config.wander_radius, config.wander_tolerance))),
            attack: push(Box::new(AttackState::new())),
            run: push(Box::new(RunState::new(config.run_radius, config.run_multiplier))),
            hide: push(Box::new(HideState::new())),
            move_to: push(Box::new(MoveToState::new(config.move_to_tolerance))),
        };

        Self {
            states,
            levels: Vec::new(),
            roster,
            config: config.clone(),
        }
    }

    pub fn add(&mut self, state: impl State<A> + 'static) -> StateId {
        self.states.push(Box::new(state));
        StateId(self.states.len() - 1)
    }

    /// Добавляет уровень, возвращает его индекс
    pub fn add_level(&mut self, states: impl IntoIterator<Item = StateId>) -> usize {
        self.levels.push(states.into_iter().collect());
        self.levels.len() - 1
    }

    /// Дописывает state в существующий уровень (без дублей)
    pub fn extend_level(&mut self, level: usize, state: StateId) -> bool {
        match self.levels.get_mut(level) {
            Some(states) => {
                if !states.contains(&state) {
                    states.push(state);
                }
                true
            }
            None => false,
        }
    }

    pub fn clear_levels(&mut self) {
        self.levels.clear();
    }

    /// Параметры агента после `Archetype::configure`
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    pub fn tag(&self, id: StateId) -> Option<StateTag> {
        self.states.get(id.index()).map(|s| s.tag())
    }
}
