use bevy::prelude::*;

use crate::agent::{AgentCore, AgentEvent, Archetype, StateTable, TickContext};
use crate::config::{AgentConfig, CritterConfig};
use crate::states::{RunToHideState, WanderState};
use crate::world::WorldTag;

/// Во сколько раз дальше detection range должен уйти игрок, чтобы
/// запустился таймер выхода из норы
const HIDE_EXIT_RANGE_FACTOR: f32 = 3.0;

/// Critter (кролик): бродит у норы, замечает игрока, поднимает тревогу
/// и прячется. Вылезает через `hide_exit_delay` после ухода игрока.
///
/// Уровни: [Idle, Wander], [RunToHide, Hide]
#[derive(Debug, Clone)]
pub struct Critter {
    config: CritterConfig,
    burrow: Vec3,
    player_in_range: bool,
    /// Сколько прошло с момента, когда игрок ушёл (None = таймер не запущен)
    hide_exit_elapsed: Option<f32>,
}

impl Critter {
    pub fn new(config: CritterConfig, burrow: Vec3) -> Self {
        Self {
            config,
            burrow,
            player_in_range: false,
            hide_exit_elapsed: None,
        }
    }

    pub fn config(&self) -> &CritterConfig {
        &self.config
    }

    pub fn burrow(&self) -> Vec3 {
        self.burrow
    }

    pub fn is_player_in_range(&self) -> bool {
        self.player_in_range
    }

    pub fn is_leaving_burrow(&self) -> bool {
        self.hide_exit_elapsed.is_some()
    }

    /// Таймер выхода из норы; true когда пора возвращаться на уровень 0
    fn advance_exit_timer(&mut self, dt: f32) -> bool {
        let Some(elapsed) = self.hide_exit_elapsed.as_mut() else {
            return false;
        };
        *elapsed += dt;
        if *elapsed < self.config.hide_exit_delay {
            return false;
        }
        self.hide_exit_elapsed = None;
        true
    }
}

impl Archetype for Critter {
    const NAME: &'static str = "Critter";

    fn configure(&self, config: &mut AgentConfig) {
        config.speed = self.config.speed;
    }

    fn build_levels(&mut self, table: &mut StateTable<Self>) {
        let roster = *table.roster();
        let agent = table.config().clone();

        let wander = table.add(WanderState::new(self.config.wander_radius, self.config.wander_tolerance));
        let run_to_hide = table.add(RunToHideState::new(agent.hide_run_multiplier, agent.hide_stopping_distance));
        table.roster_mut().wander = wander;

        table.add_level([roster.idle, wander]);
        table.add_level([run_to_hide, roster.hide]);
    }

    fn anchor(&self) -> Option<Vec3> {
        Some(self.burrow)
    }

    fn after_tick(&mut self, agent: &mut AgentCore, cx: &mut TickContext<'_>) {
        let player_distance = cx
            .world
            .first_tagged(WorldTag::Player)
            .and_then(|p| cx.world.position_of(p))
            .map(|player| agent.position().distance(player));

        // Игрок вернулся, пока таймер шёл: остаёмся в норе
        if self.hide_exit_elapsed.is_some() && player_distance.is_some_and(|d| d <= self.config.detection_range) {
            crate::log(&format!("🐇 {:?}: player is back, staying in burrow", agent.entity()));
            self.hide_exit_elapsed = None;
        }

        if self.advance_exit_timer(cx.dt) {
            self.player_in_range = false;
            crate::log(&format!("🐇 {:?}: player is gone, leaving burrow", agent.entity()));
            agent.change_level(0);
            return;
        }

        let Some(distance) = player_distance else {
            return;
        };

        if !self.player_in_range && distance <= self.config.detection_range {
            self.player_in_range = true;
            crate::log(&format!("🐇 {:?}: player spotted at {:.1}m, alerting", agent.entity(), distance));
            agent.emit(AgentEvent::AlertRaised {
                radius: self.config.alert_radius,
            });
            agent.change_level(1);
            return;
        }

        let hiding = agent.current_state() == Some(agent.roster().hide);
        if hiding
            && self.hide_exit_elapsed.is_none()
            && distance > self.config.detection_range * HIDE_EXIT_RANGE_FACTOR
        {
            crate::log(&format!(
                "🕒 {:?}: player left, leaving burrow in {:.1}s",
                agent.entity(),
                self.config.hide_exit_delay
            ));
            self.hide_exit_elapsed = Some(0.0);
        }
    }

    fn on_alerted(&mut self, agent: &mut AgentCore) {
        agent.change_level(1);
    }
}
