//! Layered state machine агента.
//!
//! Инварианты:
//! - `current ∈ levels[level]` после любого перехода через membership check;
//!   нарушение чинится в начале тика (revert to level start)
//! - одновременно выполняется максимум один переход, вложенные запросы
//!   отбрасываются

use bevy::prelude::*;

use super::{
    AgentCore, Archetype, DamageReport, Request, State, StateId, StateTable, StateTag, TickContext,
    TransitionError,
};
use crate::config::AgentConfig;
use crate::navigation::PathFollower;

/// Результат принятого запроса перехода
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChange {
    /// Уже в этом состоянии / на этом уровне
    Unchanged,
    Entered(StateId),
    /// Запрошенное состояние не из текущего уровня → первое состояние уровня
    Redirected { requested: StateId, entered: StateId },
}

pub struct Agent<A: Archetype> {
    core: AgentCore,
    archetype: A,
    /// Arena: по одному экземпляру каждого состояния, переиспользуются
    states: Vec<Box<dyn State<A>>>,
    levels: Vec<Vec<StateId>>,
}

impl<A: Archetype> Agent<A> {
    /// Level table собирается один раз. Начальное состояние выставит
    /// `start()` или первый тик с готовой навигацией.
    pub fn new(entity: Entity, mut config: AgentConfig, nav: Box<dyn PathFollower>, mut archetype: A, seed: u64) -> Self {
        archetype.configure(&mut config);

        let mut table = StateTable::with_shared(&config);
        archetype.build_levels(&mut table);

        let StateTable { states, levels, roster, .. } = table;
        if levels.is_empty() {
            crate::log_error(&format!("❌ {:?} ({}): level table is empty", entity, A::NAME));
        }

        Self {
            core: AgentCore::new(entity, config, nav, roster, seed),
            archetype,
            states,
            levels,
        }
    }

    pub fn core(&self) -> &AgentCore {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut AgentCore {
        &mut self.core
    }

    pub fn archetype(&self) -> &A {
        &self.archetype
    }

    pub fn archetype_mut(&mut self) -> &mut A {
        &mut self.archetype
    }

    pub fn levels(&self) -> &[Vec<StateId>] {
        &self.levels
    }

    pub fn level(&self) -> usize {
        self.core.level
    }

    pub fn current_state(&self) -> Option<StateId> {
        self.core.current
    }

    pub fn current_tag(&self) -> Option<StateTag> {
        self.core.current_tag
    }

    pub fn current_name(&self) -> Option<&'static str> {
        self.core.current.and_then(|id| self.state_name(id))
    }

    pub fn state_name(&self, id: StateId) -> Option<&'static str> {
        self.states.get(id.index()).map(|s| s.name())
    }

    /// Текущее состояние принадлежит текущему уровню
    pub fn is_consistent(&self) -> bool {
        match (self.core.current, self.levels.get(self.core.level)) {
            (Some(current), Some(level)) => level.contains(&current),
            _ => false,
        }
    }

    /// Начальное состояние = первое состояние уровня 0
    pub fn start(&mut self, cx: &mut TickContext<'_>) -> Result<StateChange, TransitionError> {
        self.core.level = 0;
        self.revert_to_level_start(cx)
    }

    /// Один тик: hooks архетипа + Tick текущего состояния + sync аниматора
    pub fn tick(&mut self, cx: &mut TickContext<'_>) {
        if !self.core.nav().is_ready() {
            return;
        }

        if !self.is_consistent() {
            if self.core.current.is_some() {
                crate::log_warning(&format!(
                    "⚠️ {:?} ({}): {:?} is not on level {}, reverting",
                    self.core.entity(),
                    A::NAME,
                    self.current_name(),
                    self.core.level
                ));
            }
            if let Err(err) = self.revert_to_level_start(cx) {
                crate::log_warning(&format!("⚠️ {:?}: self-correction failed: {}", self.core.entity(), err));
            }
        }

        self.archetype.before_tick(&mut self.core, cx);
        self.apply_pending(cx);

        self.core.face_movement();

        if let Some(current) = self.core.current {
            if let Some(state) = self.states.get_mut(current.index()) {
                state.tick(&mut self.core, &mut self.archetype, cx);
            }
            self.apply_pending(cx);
        }

        self.archetype.after_tick(&mut self.core, cx);
        self.apply_pending(cx);

        self.sync_animation(cx);
    }

    /// Переход в `next` с проверкой принадлежности текущему уровню
    pub fn change_state(&mut self, next: StateId, cx: &mut TickContext<'_>) -> Result<StateChange, TransitionError> {
        self.switch(next, true, cx)
    }

    /// Смена уровня + принудительный переход в его первое состояние
    pub fn change_level(&mut self, level: usize, cx: &mut TickContext<'_>) -> Result<StateChange, TransitionError> {
        if self.core.transitioning {
            crate::log_warning(&format!(
                "⛔ {:?}: change_level({}) dropped, transition in progress",
                self.core.entity(),
                level
            ));
            return Err(TransitionError::Reentrant);
        }

        if level >= self.levels.len() {
            crate::log_error(&format!(
                "❌ {:?} ({}): level {} out of range ({} levels)",
                self.core.entity(),
                A::NAME,
                level,
                self.levels.len()
            ));
            return Err(TransitionError::LevelOutOfRange {
                level,
                count: self.levels.len(),
            });
        }

        if self.core.level == level {
            return Ok(StateChange::Unchanged);
        }

        // Всё проверяем до смены уровня: отказ оставляет агента как был
        if !self.core.nav().is_ready() {
            crate::log(&format!(
                "⏳ {:?}: navigation not ready, change_level({}) skipped",
                self.core.entity(),
                level
            ));
            return Err(TransitionError::NavigationUnavailable);
        }

        let Some(first) = self.levels.get(level).and_then(|states| states.first().copied()) else {
            crate::log_error(&format!("❌ {:?} ({}): level {} is empty", self.core.entity(), A::NAME, level));
            return Err(TransitionError::EmptyLevel { level });
        };

        crate::log(&format!(
            "📶 {:?} ({}): level {} → {}",
            self.core.entity(),
            A::NAME,
            self.core.level,
            level
        ));
        let previous = self.core.level;
        self.core.level = level;

        // Membership не проверяем: first ∈ levels[level] по построению
        let result = self.switch(first, false, cx);
        match result {
            Ok(_) => self.core.level_changes += 1,
            Err(_) => self.core.level = previous,
        }
        result
    }

    /// Переход в первое состояние текущего уровня (states, которые сдались)
    pub fn revert_to_level_start(&mut self, cx: &mut TickContext<'_>) -> Result<StateChange, TransitionError> {
        self.validate_level();

        match self.levels.get(self.core.level).and_then(|states| states.first().copied()) {
            Some(first) => {
                crate::log(&format!(
                    "↩️ {:?} ({}): revert to level {} start ({:?})",
                    self.core.entity(),
                    A::NAME,
                    self.core.level,
                    self.state_name(first)
                ));
                self.switch(first, true, cx)
            }
            None => {
                crate::log_error(&format!(
                    "❌ {:?} ({}): level {} is empty, falling back to Idle",
                    self.core.entity(),
                    A::NAME,
                    self.core.level
                ));
                let idle = self.core.roster.idle;
                self.switch(idle, false, cx)
            }
        }
    }

    /// Damage hook: archetype решает, менять ли цель
    pub fn on_damaged(&mut self, report: DamageReport, cx: &mut TickContext<'_>) {
        self.archetype.on_damaged(&mut self.core, &report, cx.world);
        self.apply_pending(cx);
    }

    /// Тревога от соседа (публичная точка входа для alert propagation)
    pub fn on_alerted(&mut self, cx: &mut TickContext<'_>) {
        self.archetype.on_alerted(&mut self.core);
        self.apply_pending(cx);
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn validate_level(&mut self) {
        if self.core.level >= self.levels.len() && self.core.level != 0 {
            crate::log_error(&format!(
                "❌ {:?} ({}): invalid level {}, reset to 0",
                self.core.entity(),
                A::NAME,
                self.core.level
            ));
            self.core.level = 0;
        }
    }

    fn switch(
        &mut self,
        next: StateId,
        check_membership: bool,
        cx: &mut TickContext<'_>,
    ) -> Result<StateChange, TransitionError> {
        if self.core.transitioning {
            crate::log_warning(&format!(
                "⛔ {:?}: nested change to {:?} from {:?} dropped",
                self.core.entity(),
                self.state_name(next),
                self.current_name()
            ));
            return Err(TransitionError::Reentrant);
        }

        if !self.core.nav().is_ready() {
            crate::log(&format!(
                "⏳ {:?}: navigation not ready, change to {:?} skipped",
                self.core.entity(),
                self.state_name(next)
            ));
            return Err(TransitionError::NavigationUnavailable);
        }

        if self.core.current == Some(next) {
            return Ok(StateChange::Unchanged);
        }

        if !check_membership {
            self.transition_to(next, cx);
            return Ok(StateChange::Entered(next));
        }

        self.validate_level();
        let level = self.core.level;
        let Some(states) = self.levels.get(level) else {
            return Err(TransitionError::EmptyLevel { level });
        };
        let Some(&first) = states.first() else {
            crate::log_error(&format!("❌ {:?} ({}): level {} is empty", self.core.entity(), A::NAME, level));
            return Err(TransitionError::EmptyLevel { level });
        };

        let (entered, change) = if states.contains(&next) {
            (next, StateChange::Entered(next))
        } else {
            crate::log(&format!(
                "↪️ {:?} ({}): {:?} is not on level {}, redirected to {:?}",
                self.core.entity(),
                A::NAME,
                self.state_name(next),
                level,
                self.state_name(first)
            ));
            (
                first,
                StateChange::Redirected {
                    requested: next,
                    entered: first,
                },
            )
        };

        if self.core.current == Some(entered) {
            return Ok(StateChange::Unchanged);
        }

        self.transition_to(entered, cx);
        Ok(change)
    }

    /// Exit → Enter → bookkeeping, ровно один раз
    fn transition_to(&mut self, next: StateId, cx: &mut TickContext<'_>) {
        self.core.transitioning = true;

        let previous = self.core.current;
        if let Some(state) = previous.and_then(|id| self.states.get_mut(id.index())) {
            state.exit(&mut self.core, &mut self.archetype, cx);
        }

        if let Some(state) = self.states.get_mut(next.index()) {
            state.enter(&mut self.core, &mut self.archetype, cx);
            self.core.current_tag = Some(state.tag());
        }

        self.core.current = Some(next);
        self.core.transitions += 1;
        self.core.transitioning = false;

        crate::log(&format!(
            "🔀 {:?} ({}): {:?} → {:?}",
            self.core.entity(),
            A::NAME,
            previous.and_then(|id| self.state_name(id)),
            self.state_name(next)
        ));
    }

    fn apply_pending(&mut self, cx: &mut TickContext<'_>) {
        let Some(request) = self.core.pending.take() else {
            return;
        };

        let result = match request {
            Request::State(next) => self.change_state(next, cx),
            Request::Level(level) => self.change_level(level, cx),
            Request::LevelStart => self.revert_to_level_start(cx),
        };

        if let Err(err) = result {
            crate::log_warning(&format!(
                "⚠️ {:?} ({}): {:?} not applied: {}",
                self.core.entity(),
                A::NAME,
                request,
                err
            ));
        }
    }

    /// Edge-triggered: аниматор получает tag только при смене
    fn sync_animation(&mut self, cx: &mut TickContext<'_>) {
        let Some(tag) = self.core.current_tag else {
            return;
        };
        if self.core.last_synced != Some(tag) {
            cx.animation.set_state(tag);
            self.core.last_synced = Some(tag);
        }
    }
}
