//! Tests for TerritorialGuard: detection, chase limit, patrol speed.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use super::super::guard::TerritorialGuard;
    use crate::agent::{DamageReport, StateTag, Target};
    use crate::components::Health;
    use crate::config::{AgentConfig, GuardConfig};
    use crate::test_support::{spawn, Harness, PLAYER};
    use crate::world::{WorldSnapshot, WorldTag};

    fn guard() -> TerritorialGuard {
        TerritorialGuard::new(GuardConfig::default(), Vec3::ZERO)
    }

    fn with_player(position: Vec3) -> Harness {
        Harness::new(WorldSnapshot::new().with(PLAYER, position, WorldTag::Player))
    }

    #[test]
    fn test_intruder_triggers_chase_then_attack() {
        let mut harness = with_player(Vec3::new(5.0, 0.0, 0.0));
        let mut agent = spawn(guard(), AgentConfig::default(), Vec3::ZERO);
        harness.with_cx(|cx| agent.start(cx)).unwrap();

        harness.tick(&mut agent, 0.1);
        assert_eq!(agent.level(), 1);
        assert_eq!(agent.current_name(), Some("Chase"));
        assert_eq!(agent.core().target(), Some(Target::Entity(PLAYER)));
        assert_eq!(harness.animator.last_trigger.as_deref(), Some("DoMove"));

        for _ in 0..60 {
            harness.tick(&mut agent, 0.1);
            if agent.current_tag() == Some(StateTag::Attack) {
                break;
            }
        }
        assert_eq!(agent.current_tag(), Some(StateTag::Attack));
        assert!(agent.core().position().distance(Vec3::new(5.0, 0.0, 0.0)) <= 1.2);
    }

    #[test]
    fn test_chase_limit_sends_guard_back() {
        let mut harness = with_player(Vec3::new(5.0, 0.0, 0.0));
        let mut agent = spawn(guard(), AgentConfig::default(), Vec3::ZERO);
        harness.with_cx(|cx| agent.start(cx)).unwrap();
        harness.tick(&mut agent, 0.1);
        assert_eq!(agent.level(), 1);

        harness.world.move_entity(PLAYER, Vec3::new(30.0, 0.0, 0.0));
        harness.tick(&mut agent, 0.1);

        assert_eq!(agent.level(), 0);
        assert_eq!(agent.core().target(), None);
        assert_eq!(agent.current_tag(), Some(StateTag::Idle));
    }

    #[test]
    fn test_patrol_slows_down_and_restores_speed() {
        let mut harness = Harness::default();
        let mut agent = spawn(guard(), AgentConfig::default(), Vec3::ZERO);
        harness.with_cx(|cx| agent.start(cx)).unwrap();
        let roster = *agent.core().roster();

        harness.with_cx(|cx| agent.change_state(roster.wander, cx)).unwrap();
        assert_eq!(agent.current_name(), Some("Patrol"));
        assert_eq!(agent.core().speed(), 1.0);

        harness.with_cx(|cx| agent.change_state(roster.idle, cx)).unwrap();
        assert_eq!(agent.core().speed(), 2.0);
    }

    #[test]
    fn test_attacker_becomes_target_even_out_of_range() {
        let mut harness = with_player(Vec3::new(12.0, 0.0, 0.0));
        let mut agent = spawn(guard(), AgentConfig::default(), Vec3::ZERO);
        harness.with_cx(|cx| agent.start(cx)).unwrap();
        harness.tick(&mut agent, 0.1);
        assert_eq!(agent.level(), 0);

        let report = DamageReport {
            attacker: Some(PLAYER),
            amount: 15,
            health: Health { current: 85, max: 100 },
        };
        harness.with_cx(|cx| agent.on_damaged(report, cx));

        assert_eq!(agent.level(), 1);
        assert_eq!(agent.current_name(), Some("Chase"));
        assert_eq!(agent.core().target(), Some(Target::Entity(PLAYER)));
    }
}
