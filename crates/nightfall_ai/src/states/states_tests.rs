//! Tests for shared states (Idle, Wander, Attack, Run, RunToHide/Hide, MoveTo).

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::agent::{AgentEvent, Archetype, StateTable, StateTag, Target};
    use crate::archetypes::{Critter, Wanderer};
    use crate::config::{AgentConfig, CritterConfig};
    use crate::navigation::PathFollower;
    use crate::test_support::{spawn, Harness, OBJECTIVE, PLAYER};
    use crate::world::{WorldSnapshot, WorldTag};

    /// Один уровень: [Idle, MoveTo]
    struct Courier;

    impl Archetype for Courier {
        const NAME: &'static str = "Courier";

        fn build_levels(&mut self, table: &mut StateTable<Self>) {
            let roster = *table.roster();
            table.add_level([roster.idle, roster.move_to]);
        }
    }

    fn fixed_idle(duration: f32) -> AgentConfig {
        AgentConfig {
            idle_min: duration,
            idle_max: duration,
            ..Default::default()
        }
    }

    #[test]
    fn test_idle_hands_over_to_wander_after_duration() {
        let mut harness = Harness::default();

        let mut agent = spawn(Wanderer, fixed_idle(5.0), Vec3::ZERO);
        harness.with_cx(|cx| agent.start(cx)).unwrap();
        assert_eq!(agent.current_tag(), Some(StateTag::Idle));

        harness.run(&mut agent, 0.5, 10); // 5.0с
        assert_eq!(agent.current_tag(), Some(StateTag::Wander));

        let mut early = spawn(Wanderer, fixed_idle(5.0), Vec3::ZERO);
        harness.with_cx(|cx| early.start(cx)).unwrap();
        harness.run(&mut early, 0.5, 9);
        harness.tick(&mut early, 0.49); // 4.99с
        assert_eq!(early.current_tag(), Some(StateTag::Idle));
    }

    #[test]
    fn test_wander_arrives_then_idles() {
        let mut harness = Harness::default();
        let mut agent = spawn(Wanderer, AgentConfig::default(), Vec3::ZERO);
        harness.with_cx(|cx| agent.start(cx)).unwrap();

        let wander = agent.core().roster().wander;
        harness.with_cx(|cx| agent.change_state(wander, cx)).unwrap();

        harness.tick(&mut agent, 0.1);
        assert!(agent.core().nav().has_path(), "wander should pick a destination");

        for _ in 0..100 {
            harness.tick(&mut agent, 0.1);
            if agent.current_tag() == Some(StateTag::Idle) {
                break;
            }
        }

        assert_eq!(agent.current_tag(), Some(StateTag::Idle));
        assert!(!agent.core().nav().has_path(), "idle clears the path");
    }

    #[test]
    fn test_attack_fires_once_per_cooldown() {
        let world = WorldSnapshot::new().with(PLAYER, Vec3::new(0.0, 0.0, -1.5), WorldTag::Player);
        let mut harness = Harness::new(world);

        let mut agent = spawn(Wanderer, AgentConfig::default(), Vec3::ZERO);
        harness.with_cx(|cx| agent.start(cx)).unwrap();
        agent.core_mut().set_target(Some(Target::Entity(PLAYER)));
        harness.with_cx(|cx| agent.change_level(1, cx)).unwrap();
        assert_eq!(agent.current_tag(), Some(StateTag::Attack));

        harness.tick(&mut agent, 0.1);
        assert_eq!(harness.animator.trigger_count, 1);
        assert_eq!(harness.animator.last_trigger.as_deref(), Some("MeleeAttack"));

        // attack_speed = 1.0, прошло 0.5с
        harness.run(&mut agent, 0.1, 5);
        assert_eq!(harness.animator.trigger_count, 1);

        let reach = AgentConfig::default().attack_reach();
        assert_eq!(
            agent.core().events(),
            &[AgentEvent::AttackLaunched {
                target: Some(PLAYER),
                damage: 10,
                reach,
            }]
        );
    }

    #[test]
    fn test_attack_turns_before_striking_target_behind() {
        let world = WorldSnapshot::new().with(PLAYER, Vec3::new(0.0, 0.0, 1.5), WorldTag::Player);
        let mut harness = Harness::new(world);

        let mut agent = spawn(Wanderer, AgentConfig::default(), Vec3::ZERO);
        harness.with_cx(|cx| agent.start(cx)).unwrap();
        agent.core_mut().set_target(Some(Target::Entity(PLAYER)));
        harness.with_cx(|cx| agent.change_level(1, cx)).unwrap();

        // Смотрим в -Z, цель за спиной: удара нет, retry через 0.5с
        harness.tick(&mut agent, 0.01);
        assert_eq!(harness.animator.trigger_count, 0);

        harness.run(&mut agent, 0.01, 59);
        assert_eq!(harness.animator.trigger_count, 1);
        assert!(agent.core().forward().dot(Vec3::Z) > 0.5);
    }

    #[test]
    fn test_run_restores_exact_speed() {
        let config = AgentConfig {
            speed: 2.0,
            ..Default::default()
        };
        let mut harness = Harness::default();
        let mut agent = spawn(Wanderer, config, Vec3::ZERO);
        harness.with_cx(|cx| agent.start(cx)).unwrap();
        harness.with_cx(|cx| agent.change_level(1, cx)).unwrap();

        let roster = *agent.core().roster();
        for _ in 0..3 {
            harness.with_cx(|cx| agent.change_state(roster.run, cx)).unwrap();
            assert_eq!(agent.core().speed(), 4.0);
            harness.run(&mut agent, 0.1, 3);

            harness.with_cx(|cx| agent.change_state(roster.attack, cx)).unwrap();
            assert_eq!(agent.core().speed(), 2.0);
        }
    }

    #[test]
    fn test_run_to_hide_then_hide_restores_presence() {
        let world = WorldSnapshot::new().with(PLAYER, Vec3::new(0.0, 0.0, 8.0), WorldTag::Player);
        let mut harness = Harness::new(world);

        let critter = Critter::new(CritterConfig::default(), Vec3::new(5.0, 0.0, 0.0));
        let mut agent = spawn(critter, AgentConfig::default(), Vec3::ZERO);
        agent.core_mut().presence_mut().set_enabled("shadow", false);
        harness.with_cx(|cx| agent.start(cx)).unwrap();

        // Игрок в detection range → уровень 1 (RunToHide)
        harness.tick(&mut agent, 0.1);
        assert_eq!(agent.level(), 1);
        assert_eq!(agent.current_name(), Some("RunToHide"));
        assert_eq!(agent.core().speed(), 0.5 * 2.5);

        for _ in 0..100 {
            harness.tick(&mut agent, 0.1);
            if agent.current_tag() == Some(StateTag::Hide) {
                break;
            }
        }
        assert_eq!(agent.current_tag(), Some(StateTag::Hide));
        assert!(agent.core().presence().is_hidden());
        assert_eq!(agent.core().speed(), 0.5);
        assert_eq!(agent.core().nav().stopping_distance(), 0.0);

        // Игрок ушёл далеко → через hide_exit_delay обратно на уровень 0
        harness.world.move_entity(PLAYER, Vec3::new(40.0, 0.0, 40.0));
        harness.run(&mut agent, 0.1, 60);
        assert_eq!(agent.level(), 0);

        let presence = agent.core().presence();
        assert!(presence.is_enabled("mesh"));
        assert!(presence.is_enabled("hitbox"));
        assert!(!presence.is_enabled("shadow"), "part disabled before hiding stays disabled");
    }

    #[test]
    fn test_move_to_arrives_then_idles() {
        let world = WorldSnapshot::new().with(OBJECTIVE, Vec3::new(6.0, 0.0, 0.0), WorldTag::Objective);
        let mut harness = Harness::new(world);

        let mut agent = spawn(Courier, AgentConfig::default(), Vec3::ZERO);
        harness.with_cx(|cx| agent.start(cx)).unwrap();
        agent.core_mut().set_target(Some(Target::Entity(OBJECTIVE)));
        let move_to = agent.core().roster().move_to;
        harness.with_cx(|cx| agent.change_state(move_to, cx)).unwrap();
        assert_eq!(agent.current_tag(), Some(StateTag::MoveToBase));

        for _ in 0..30 {
            harness.tick(&mut agent, 0.1);
            if agent.current_tag() == Some(StateTag::Idle) {
                break;
            }
        }
        assert_eq!(agent.current_tag(), Some(StateTag::Idle));
        assert!(agent.core().position().distance(Vec3::new(6.0, 0.0, 0.0)) <= 1.5);
    }

    #[test]
    fn test_move_to_gives_up_on_vanished_target() {
        let world = WorldSnapshot::new().with(OBJECTIVE, Vec3::new(20.0, 0.0, 0.0), WorldTag::Objective);
        let mut harness = Harness::new(world);

        let mut agent = spawn(Courier, AgentConfig::default(), Vec3::ZERO);
        harness.with_cx(|cx| agent.start(cx)).unwrap();
        agent.core_mut().set_target(Some(Target::Entity(OBJECTIVE)));
        let move_to = agent.core().roster().move_to;
        harness.with_cx(|cx| agent.change_state(move_to, cx)).unwrap();

        harness.tick(&mut agent, 0.1);
        assert_eq!(agent.current_tag(), Some(StateTag::MoveToBase));

        harness.world.remove(OBJECTIVE);
        harness.tick(&mut agent, 0.1);
        assert_eq!(agent.current_tag(), Some(StateTag::Idle));
    }

    #[test]
    fn test_move_to_unreachable_target_idles() {
        let world = WorldSnapshot::new().with(OBJECTIVE, Vec3::new(80.0, 0.0, 0.0), WorldTag::Objective);
        let mut harness = Harness::new(world);

        let mut agent = spawn(Courier, AgentConfig::default(), Vec3::ZERO);
        harness.with_cx(|cx| agent.start(cx)).unwrap();
        agent.core_mut().set_target(Some(Target::Entity(OBJECTIVE)));
        let move_to = agent.core().roster().move_to;
        harness.with_cx(|cx| agent.change_state(move_to, cx)).unwrap();

        harness.tick(&mut agent, 0.1);
        assert_eq!(agent.current_tag(), Some(StateTag::Idle));
        assert_eq!(agent.core().position(), Vec3::ZERO);
    }
}
