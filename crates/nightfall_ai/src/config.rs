//! Tuning: параметры агентов и архетипов.
//!
//! Значения по умолчанию = значения из игры. `AiTuning` грузится из JSON
//! (все поля опциональны через `#[serde(default)]`) и валидируется.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Ошибка загрузки tuning файла
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse tuning json: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Общие параметры агента и shared states
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Базовая скорость (м/с)
    pub speed: f32,
    /// Пауза между атаками (секунды)
    pub attack_speed: f32,
    /// Дистанция, на которой агент останавливается для атаки
    pub attack_stop_range: f32,
    pub attack_damage: u32,
    pub max_health: u32,
    /// Сколько открыто окно удара после замаха (секунды)
    pub attack_window: f32,

    pub idle_min: f32,
    pub idle_max: f32,

    pub wander_radius: f32,
    pub wander_tolerance: f32,

    pub run_radius: f32,
    pub run_multiplier: f32,

    pub move_to_tolerance: f32,

    /// RunToHide: множитель скорости и stopping distance у укрытия
    pub hide_run_multiplier: f32,
    pub hide_stopping_distance: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            speed: 3.5,
            attack_speed: 1.0,
            attack_stop_range: 2.0,
            attack_damage: 10,
            max_health: 100,
            attack_window: 0.6,
            idle_min: 3.0,
            idle_max: 7.0,
            wander_radius: 10.0,
            wander_tolerance: 1.0,
            run_radius: 15.0,
            run_multiplier: 2.0,
            move_to_tolerance: 1.5,
            hide_run_multiplier: 2.5,
            hide_stopping_distance: 0.5,
        }
    }
}

impl AgentConfig {
    /// Запас сверх stop range, после которого Attack сдаётся
    pub const ATTACK_EXIT_BUFFER: f32 = 1.2;

    /// Максимальная дистанция удара
    pub fn attack_reach(&self) -> f32 {
        self.attack_stop_range + Self::ATTACK_EXIT_BUFFER
    }
}

/// Критер (кролик): детекция игрока, алерт соседей, укрытие в норе
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CritterConfig {
    pub speed: f32,
    pub detection_range: f32,
    pub alert_radius: f32,
    /// Через сколько секунд после ухода игрока вылезать из норы
    pub hide_exit_delay: f32,
    pub wander_radius: f32,
    pub wander_tolerance: f32,
}

impl Default for CritterConfig {
    fn default() -> Self {
        Self {
            speed: 0.5,
            detection_range: 10.0,
            alert_radius: 5.0,
            hide_exit_delay: 5.0,
            wander_radius: 10.0,
            wander_tolerance: 0.5,
        }
    }
}

/// Территориальный страж
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    pub speed: f32,
    pub attack_speed: f32,
    pub detection_range: f32,
    pub chase_limit_range: f32,
    pub patrol_radius: f32,
    pub patrol_tolerance: f32,
    pub patrol_multiplier: f32,
    pub attack_range: f32,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            speed: 2.0,
            attack_speed: 1.5,
            detection_range: 10.0,
            chase_limit_range: 15.0,
            patrol_radius: 8.0,
            patrol_tolerance: 1.0,
            patrol_multiplier: 0.5,
            attack_range: 1.2,
        }
    }
}

/// Осадное существо (ночной штурм кристалла)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiegeConfig {
    pub speed: f32,
    pub attack_speed: f32,
    /// Игрок ближе этого: кандидат в цели
    pub aggro_range: f32,
    /// Игрок дальше этого: бросаем преследование
    pub flee_range: f32,
    /// Шанс переключиться на игрока возле цели [0, 1]
    pub aggro_chance: f32,
    pub melee_range: f32,
    /// Луч вперёд для поиска построек игрока
    pub probe_range: f32,
    pub probe_offset: f32,
    /// Как часто ChooseTarget пересчитывает цель (секунды)
    pub choose_interval: f32,
    /// Кольцо access point вокруг кристалла
    pub access_ring_radius: f32,
    pub access_ring_tolerance: f32,
    /// Ближе этого к кристаллу: агент уже "у цели", не в пути
    pub near_objective_range: f32,
}

impl Default for SiegeConfig {
    fn default() -> Self {
        Self {
            speed: 1.5,
            attack_speed: 2.0,
            aggro_range: 10.0,
            flee_range: 12.0,
            aggro_chance: 0.3,
            melee_range: 2.0,
            probe_range: 2.0,
            probe_offset: 0.5,
            choose_interval: 0.1,
            access_ring_radius: 6.0,
            access_ring_tolerance: 1.5,
            near_objective_range: 3.0,
        }
    }
}

/// Тактический вариант: рывок к точке сбора после удара
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TacticalConfig {
    /// Явная точка сбора; `None`: ближайшая entity с тегом RallyPoint
    pub rally_point: Option<[f32; 3]>,
    pub charge_stopping_distance: f32,
}

impl Default for TacticalConfig {
    fn default() -> Self {
        Self {
            rally_point: None,
            charge_stopping_distance: 0.5,
        }
    }
}

impl TacticalConfig {
    pub fn rally_point(&self) -> Option<Vec3> {
        self.rally_point.map(Vec3::from_array)
    }
}

/// Resource: весь tuning AI
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiTuning {
    pub agent: AgentConfig,
    pub critter: CritterConfig,
    pub guard: GuardConfig,
    pub siege: SiegeConfig,
    pub tactical: TacticalConfig,
}

impl AiTuning {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let tuning: AiTuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Проверка инвариантов. idle_max < idle_min допустим (берётся idle_min).
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("agent.speed", self.agent.speed)?;
        non_negative("agent.attack_speed", self.agent.attack_speed)?;
        non_negative("agent.idle_min", self.agent.idle_min)?;
        positive("agent.wander_radius", self.agent.wander_radius)?;
        positive("agent.run_radius", self.agent.run_radius)?;
        positive("agent.run_multiplier", self.agent.run_multiplier)?;
        positive("agent.hide_run_multiplier", self.agent.hide_run_multiplier)?;
        if self.agent.max_health == 0 {
            return Err(ConfigError::Invalid {
                field: "agent.max_health",
                reason: "must be > 0".to_string(),
            });
        }

        non_negative("critter.speed", self.critter.speed)?;
        positive("critter.detection_range", self.critter.detection_range)?;
        non_negative("critter.hide_exit_delay", self.critter.hide_exit_delay)?;

        positive("guard.patrol_multiplier", self.guard.patrol_multiplier)?;
        if self.guard.chase_limit_range < self.guard.detection_range {
            return Err(ConfigError::Invalid {
                field: "guard.chase_limit_range",
                reason: format!(
                    "must be >= detection_range ({} < {})",
                    self.guard.chase_limit_range, self.guard.detection_range
                ),
            });
        }

        if !(0.0..=1.0).contains(&self.siege.aggro_chance) {
            return Err(ConfigError::Invalid {
                field: "siege.aggro_chance",
                reason: format!("must be within [0, 1], got {}", self.siege.aggro_chance),
            });
        }
        if self.siege.flee_range < self.siege.aggro_range {
            return Err(ConfigError::Invalid {
                field: "siege.flee_range",
                reason: format!(
                    "must be >= aggro_range ({} < {})",
                    self.siege.flee_range, self.siege.aggro_range
                ),
            });
        }
        positive("siege.access_ring_radius", self.siege.access_ring_radius)?;
        non_negative("tactical.charge_stopping_distance", self.tactical.charge_stopping_distance)?;

        Ok(())
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be a finite non-negative number, got {}", value),
        })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be a finite positive number, got {}", value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_game_values() {
        let tuning = AiTuning::default();
        assert_eq!(tuning.agent.speed, 3.5);
        assert_eq!(tuning.agent.attack_reach(), 3.2);
        assert_eq!(tuning.critter.detection_range, 10.0);
        assert_eq!(tuning.guard.chase_limit_range, 15.0);
        assert_eq!(tuning.siege.aggro_chance, 0.3);
        assert!(tuning.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{ "siege": { "aggro_chance": 0.9 }, "tactical": { "rally_point": [1.0, 0.0, 2.0] } }"#;
        let tuning = AiTuning::from_json_str(json).expect("valid tuning");

        assert_eq!(tuning.siege.aggro_chance, 0.9);
        assert_eq!(tuning.siege.flee_range, 12.0);
        assert_eq!(tuning.agent, AgentConfig::default());
        assert_eq!(tuning.tactical.rally_point(), Some(Vec3::new(1.0, 0.0, 2.0)));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = AiTuning::from_json_str(r#"{ "siege": { "aggro_chance": 1.5 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "siege.aggro_chance", .. }));

        let err = AiTuning::from_json_str(r#"{ "guard": { "chase_limit_range": 5.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "guard.chase_limit_range", .. }));

        let err = AiTuning::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
