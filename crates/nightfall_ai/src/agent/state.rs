//! State contract + tick context.

use bevy::prelude::*;
use std::fmt;

use super::{AgentCore, Archetype};
use crate::components::{AnimationSink, Signals};
use crate::world::SpatialQuery;

/// Stable identity tag (телеметрия + animator "State" int)
///
/// Порядок = integer значения в аниматоре.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum StateTag {
    Idle,
    Wander,
    Attack,
    Run,
    Hide,
    MoveToBase,
    ChooseTarget,
}

impl StateTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            StateTag::Idle => "Idle",
            StateTag::Wander => "Wander",
            StateTag::Attack => "Attack",
            StateTag::Run => "Run",
            StateTag::Hide => "Hide",
            StateTag::MoveToBase => "MoveToBase",
            StateTag::ChooseTarget => "ChooseTarget",
        }
    }
}

impl fmt::Display for StateTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Индекс state в arena агента
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(pub(crate) usize);

impl StateId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Всё, что state видит снаружи агента на текущем тике
pub struct TickContext<'a> {
    pub world: &'a dyn SpatialQuery,
    pub animation: &'a mut dyn AnimationSink,
    pub signals: Signals,
    /// Секунды с прошлого тика
    pub dt: f32,
}

impl<'a> TickContext<'a> {
    pub fn new(world: &'a dyn SpatialQuery, animation: &'a mut dyn AnimationSink) -> Self {
        Self {
            world,
            animation,
            signals: Signals::default(),
            dt: 0.0,
        }
    }

    pub fn with_dt(mut self, dt: f32) -> Self {
        self.dt = dt;
        self
    }

    pub fn with_signals(mut self, signals: Signals) -> Self {
        self.signals = signals;
        self
    }
}

/// Behaviour unit агента
///
/// Enter/Exit выполняются внутри перехода: запросы переходов из них
/// отбрасываются. Из Tick запрос (`AgentCore::request`) применяется сразу
/// после возврата, в том же тике.
pub trait State<A: Archetype>: Send + Sync {
    fn tag(&self) -> StateTag;

    /// Имя для логов (Patrol/Chase делят tag с Wander/Run)
    fn name(&self) -> &'static str {
        self.tag().as_str()
    }

    fn enter(&mut self, _agent: &mut AgentCore, _archetype: &mut A, _cx: &mut TickContext<'_>) {}

    fn tick(&mut self, agent: &mut AgentCore, archetype: &mut A, cx: &mut TickContext<'_>);

    fn exit(&mut self, _agent: &mut AgentCore, _archetype: &mut A, _cx: &mut TickContext<'_>) {}
}
