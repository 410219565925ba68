#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use bastion_core::components::RigidBody;
    use bastion_core::enums::{Faction, PlacementPhase, TargetKind};
    use bastion_core::settings::{HealthSettings, PlacementSettings, ProjectileSettings};
    use bastion_core::types::Pose;
    use glam::{Quat, Vec3};
    use proptest::prelude::*;

    use crate::aim::{is_looking_at, rotate_towards, turn_toward, AimSettings};
    use crate::combat::{can_hit, fly, launch, sweep_sphere, FireControl, FireDecision};
    use crate::health::Health;
    use crate::placement::{GroundHit, GroundProbe, PlacementEvent, PlacementSettler};
    use crate::state_machine::{
        follow_signal, start, Listeners, Signal, State, StateMachine, StateTable,
    };
    use crate::targeting::{find_nearest, TargetFinder};

    // ---- State machine ----

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Key {
        A,
        B,
    }

    struct Recorder {
        name: &'static str,
        signal: Option<Signal>,
        finished: bool,
    }

    impl State<Vec<String>> for Recorder {
        fn enter(&mut self, log: &mut Vec<String>) {
            self.finished = false;
            log.push(format!("enter {}", self.name));
        }

        fn tick(&mut self, log: &mut Vec<String>) -> Option<Signal> {
            log.push(format!("tick {}", self.name));
            if self.signal.is_some() {
                self.finished = true;
            }
            self.signal
        }

        fn exit(&mut self, log: &mut Vec<String>) {
            log.push(format!("exit {}", self.name));
        }

        fn is_finished(&self) -> bool {
            self.finished
        }
    }

    struct Table {
        a: Recorder,
        b: Recorder,
    }

    impl StateTable<Key, Vec<String>> for Table {
        fn state_mut(&mut self, key: Key) -> &mut dyn State<Vec<String>> {
            match key {
                Key::A => &mut self.a,
                Key::B => &mut self.b,
            }
        }
    }

    fn table(a_signal: Option<Signal>) -> Table {
        Table {
            a: Recorder {
                name: "A",
                signal: a_signal,
                finished: false,
            },
            b: Recorder {
                name: "B",
                signal: None,
                finished: false,
            },
        }
    }

    fn edges(key: Key) -> &'static [(Signal, Key)] {
        match key {
            Key::A => &[(Signal::Finished, Key::B)],
            Key::B => &[(Signal::TargetLost, Key::A)],
        }
    }

    #[test]
    fn test_change_state_exits_before_entering() {
        let mut machine = StateMachine::new();
        let mut states = table(None);
        let mut log = Vec::new();

        machine.change_state(Key::A, &mut states, &mut log);
        machine.change_state(Key::B, &mut states, &mut log);

        assert_eq!(log, vec!["enter A", "exit A", "enter B"]);
        assert_eq!(machine.current(), Some(Key::B));
        assert_eq!(machine.take_changes(), vec![Key::A, Key::B]);
        assert!(machine.take_changes().is_empty());
    }

    #[test]
    fn test_tick_without_state_is_noop() {
        let mut machine: StateMachine<Key> = StateMachine::new();
        let mut states = table(Some(Signal::Finished));
        let mut log = Vec::new();

        assert_eq!(machine.tick(&mut states, &mut log), None);
        assert_eq!(machine.fixed_tick(&mut states, &mut log), None);
        assert!(log.is_empty());
    }

    #[test]
    fn test_tick_reaches_only_current_state() {
        let mut machine = StateMachine::new();
        let mut states = table(None);
        let mut log = Vec::new();

        machine.change_state(Key::B, &mut states, &mut log);
        log.clear();
        machine.tick(&mut states, &mut log);
        assert_eq!(log, vec!["tick B"]);
    }

    #[test]
    fn test_reentering_current_state_runs_exit_and_enter() {
        let mut machine = StateMachine::new();
        let mut states = table(None);
        let mut log = Vec::new();

        machine.change_state(Key::A, &mut states, &mut log);
        machine.change_state(Key::A, &mut states, &mut log);
        assert_eq!(log, vec!["enter A", "exit A", "enter A"]);
    }

    #[test]
    fn test_listener_fires_once() {
        let mut listeners = Listeners::new();
        listeners.once(Key::A, Signal::Finished, Key::B);
        listeners.once(Key::A, Signal::Finished, Key::B);
        assert_eq!(listeners.len(), 1);

        assert_eq!(listeners.fire(Key::A, Signal::Finished), Some(Key::B));
        assert_eq!(listeners.fire(Key::A, Signal::Finished), None);
        assert!(listeners.is_empty());
    }

    #[test]
    fn test_follow_signal_transitions_and_rewires() {
        let mut machine = StateMachine::new();
        let mut listeners = Listeners::new();
        let mut states = table(Some(Signal::Finished));
        let mut log = Vec::new();

        start(&mut machine, &mut listeners, &mut states, &mut log, Key::A, edges);
        assert!(listeners.is_registered(Key::A, Signal::Finished));

        let raised = machine.tick(&mut states, &mut log).unwrap();
        assert_eq!(raised, (Key::A, Signal::Finished));
        assert!(states.a.is_finished());

        let next = follow_signal(&mut machine, &mut listeners, &mut states, &mut log, raised, edges);
        assert_eq!(next, Some(Key::B));
        assert_eq!(machine.current(), Some(Key::B));
        assert!(!listeners.is_registered(Key::A, Signal::Finished));
        assert!(listeners.is_registered(Key::B, Signal::TargetLost));

        // A stale signal from A no longer has a listener.
        let stale = follow_signal(
            &mut machine,
            &mut listeners,
            &mut states,
            &mut log,
            (Key::A, Signal::Finished),
            edges,
        );
        assert_eq!(stale, None);
        assert_eq!(machine.current(), Some(Key::B));
    }

    // ---- Health ----

    fn health(max: f32) -> Health {
        Health::new(&HealthSettings { max_health: max })
    }

    #[test]
    fn test_damage_clamps_and_reports() {
        let mut h = health(20.0);
        let report = h.take_damage(5.0).unwrap();
        assert_eq!(report.health, 15.0);
        assert!(!report.died);

        let report = h.take_damage(100.0).unwrap();
        assert_eq!(report.health, 0.0);
        assert!(report.died);
        assert!(h.is_dead());
    }

    #[test]
    fn test_dead_entity_ignores_damage() {
        let mut h = health(10.0);
        assert!(h.take_damage(10.0).unwrap().died);
        assert_eq!(h.take_damage(5.0), None);
        assert_eq!(h.current(), 0.0);
    }

    #[test]
    fn test_non_positive_damage_ignored() {
        let mut h = health(10.0);
        assert_eq!(h.take_damage(0.0), None);
        assert_eq!(h.take_damage(-4.0), None);
        assert_eq!(h.take_damage(f32::NAN), None);
        assert_eq!(h.current(), 10.0);
    }

    #[test]
    fn test_initialize_revives() {
        let mut h = health(10.0);
        h.take_damage(50.0);
        h.initialize(&HealthSettings { max_health: 30.0 });
        assert!(h.is_alive());
        assert_eq!(h.current(), 30.0);
        assert_eq!(h.max(), 30.0);
    }

    proptest! {
        #[test]
        fn prop_health_stays_in_range_and_dies_once(
            max in 1.0f32..500.0,
            hits in proptest::collection::vec(-10.0f32..80.0, 0..40),
        ) {
            let mut h = health(max);
            let mut deaths = 0;
            for amount in hits {
                if let Some(report) = h.take_damage(amount) {
                    if report.died {
                        deaths += 1;
                    }
                }
                prop_assert!(h.current() >= 0.0 && h.current() <= max);
            }
            prop_assert!(deaths <= 1);
            prop_assert_eq!(deaths == 1, h.is_dead());
        }
    }

    // ---- Targeting ----

    #[test]
    fn test_find_nearest_within_radius() {
        let candidates = vec![
            (1u32, Vec3::new(15.0, 0.0, 0.0)),
            (2, Vec3::new(0.0, 0.0, 8.0)),
            (3, Vec3::new(30.0, 0.0, 0.0)),
        ];
        let (id, distance) = find_nearest(Vec3::ZERO, 20.0, 5, candidates).unwrap();
        assert_eq!(id, 2);
        assert_abs_diff_eq!(distance, 8.0);
    }

    #[test]
    fn test_find_nearest_out_of_range() {
        let candidates = vec![(1u32, Vec3::new(30.0, 0.0, 0.0))];
        assert_eq!(find_nearest(Vec3::ZERO, 20.0, 5, candidates), None);
    }

    #[test]
    fn test_find_nearest_tie_keeps_first() {
        let candidates = vec![
            (7u32, Vec3::new(5.0, 0.0, 0.0)),
            (8, Vec3::new(-5.0, 0.0, 0.0)),
        ];
        assert_eq!(find_nearest(Vec3::ZERO, 20.0, 5, candidates).unwrap().0, 7);
    }

    #[test]
    fn test_find_nearest_respects_capacity() {
        // The nearest candidate is the sixth inside the radius.
        let mut candidates: Vec<(u32, Vec3)> = (0..5)
            .map(|i| (i, Vec3::new(10.0 + i as f32, 0.0, 0.0)))
            .collect();
        candidates.push((99, Vec3::new(1.0, 0.0, 0.0)));
        assert_eq!(find_nearest(Vec3::ZERO, 20.0, 5, candidates.clone()).unwrap().0, 0);
        assert_eq!(find_nearest(Vec3::ZERO, 20.0, 6, candidates).unwrap().0, 99);
    }

    #[test]
    fn test_target_finder_announces_once() {
        let mut finder = TargetFinder::new(20.0, 5);
        let mut target = None;
        let pool = vec![(4u32, Vec3::new(3.0, 0.0, 0.0))];

        assert_eq!(finder.acquire(Vec3::ZERO, &mut target, || pool.clone()), Some(4));
        assert_eq!(target, Some(4));
        let mut searched = false;
        let again = finder.acquire(Vec3::ZERO, &mut target, || {
            searched = true;
            pool.clone()
        });
        assert_eq!(again, None);
        assert!(!searched, "no search while a target is held");

        // Target cleared externally: next acquisition is announced again.
        target = None;
        assert_eq!(finder.acquire(Vec3::ZERO, &mut target, || pool.clone()), Some(4));
    }

    #[test]
    fn test_target_finder_no_candidates() {
        let mut finder = TargetFinder::new(20.0, 5);
        let mut target: Option<u32> = None;
        assert_eq!(finder.acquire(Vec3::ZERO, &mut target, Vec::new), None);
        assert!(!finder.has_announced());
    }

    proptest! {
        #[test]
        fn prop_find_nearest_is_minimal(
            points in proptest::collection::vec((-40.0f32..40.0, -40.0f32..40.0), 0..20),
        ) {
            let candidates: Vec<(usize, Vec3)> = points
                .iter()
                .enumerate()
                .map(|(i, &(x, z))| (i, Vec3::new(x, 0.0, z)))
                .collect();
            let in_range: Vec<(usize, f32)> = candidates
                .iter()
                .map(|&(i, p)| (i, p.length()))
                .filter(|&(_, d)| d <= 20.0)
                .take(5)
                .collect();
            match find_nearest(Vec3::ZERO, 20.0, 5, candidates) {
                Some((_, distance)) => {
                    prop_assert!(distance <= 20.0);
                    for &(_, d) in &in_range {
                        prop_assert!(distance <= d);
                    }
                }
                None => prop_assert!(in_range.is_empty()),
            }
        }
    }

    // ---- Aim ----

    fn aim() -> AimSettings {
        AimSettings {
            angle_per_second: 200.0,
            threshold_deg: 1.0,
            max_distance: f32::INFINITY,
        }
    }

    #[test]
    fn test_rotate_towards_is_rate_limited() {
        let to = Quat::from_rotation_y(90f32.to_radians());
        let step = rotate_towards(Quat::IDENTITY, to, 30.0);
        assert_abs_diff_eq!(Quat::IDENTITY.angle_between(step).to_degrees(), 30.0, epsilon = 0.05);

        let done = rotate_towards(Quat::IDENTITY, to, 120.0);
        assert_eq!(done, to);
    }

    #[test]
    fn test_turn_toward_converges_on_target() {
        let pivot = Vec3::ZERO;
        let target = Vec3::new(15.0, 0.0, 0.0);
        let mut rotation = Quat::IDENTITY;
        let mut frames = 0;
        while !is_looking_at(&Pose::new(pivot, rotation), target, &aim()) {
            rotation = turn_toward(rotation, pivot, target, 200.0, 1.0 / 90.0);
            frames += 1;
            assert!(frames < 200, "never converged");
        }
        // 90 degrees at 200 deg/s takes ~0.45 s.
        assert!((38..=42).contains(&frames), "took {frames} frames");
    }

    #[test]
    fn test_is_looking_at_threshold_and_distance() {
        let pivot = Pose::default();
        assert!(is_looking_at(&pivot, Vec3::new(0.0, 0.0, 10.0), &aim()));
        // About 5.7 degrees off.
        assert!(!is_looking_at(&pivot, Vec3::new(1.0, 0.0, 10.0), &aim()));

        let short = AimSettings {
            max_distance: 5.0,
            ..aim()
        };
        assert!(!is_looking_at(&pivot, Vec3::new(0.0, 0.0, 10.0), &short));
        assert!(!is_looking_at(&pivot, Vec3::ZERO, &aim()));
    }

    // ---- Combat ----

    #[test]
    fn test_fire_control_waits_full_interval_after_reset() {
        let mut fire = FireControl::new(2.0);
        let dt = 0.1;
        let mut ticks = 0;
        while fire.tick(dt, true) != FireDecision::Fire {
            ticks += 1;
            assert!(ticks < 100);
        }
        // 0.5 s interval at 0.1 s per tick.
        assert!((4..=5).contains(&ticks), "fired after {ticks} ticks");
    }

    #[test]
    fn test_fire_control_no_target() {
        let mut fire = FireControl::new(2.0);
        assert_eq!(fire.tick(1.0, false), FireDecision::NoTarget);
    }

    proptest! {
        #[test]
        fn prop_fire_spacing_respects_rate(rate in 0.5f32..20.0, dt in 0.005f32..0.1) {
            let mut fire = FireControl::new(rate);
            let mut now = 0.0f32;
            let mut last_shot: Option<f32> = None;
            for _ in 0..400 {
                now += dt;
                if fire.tick(dt, true) == FireDecision::Fire {
                    if let Some(prev) = last_shot {
                        prop_assert!(now - prev >= 1.0 / rate - 1e-3);
                    }
                    fire.fired();
                    last_shot = Some(now);
                }
            }
        }
    }

    #[test]
    fn test_launch_aims_at_target() {
        let template = ProjectileSettings::default();
        let projectile = launch(
            &template,
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, 10.0),
            Faction::Tower,
            TargetKind::Enemy,
        )
        .unwrap();
        assert_abs_diff_eq!(projectile.velocity.z, template.speed);
        assert_eq!(projectile.remaining_secs, template.lifetime_secs);
        assert!(launch(&template, Vec3::ONE, Vec3::ONE, Faction::Tower, TargetKind::Enemy).is_none());
    }

    #[test]
    fn test_fly_expires_at_lifetime() {
        let template = ProjectileSettings {
            lifetime_secs: 0.05,
            ..ProjectileSettings::default()
        };
        let mut projectile =
            launch(&template, Vec3::ZERO, Vec3::Z, Faction::Tower, TargetKind::Enemy).unwrap();
        let first = fly(&mut projectile, Vec3::ZERO, 0.02);
        assert!(!first.expired);
        let second = fly(&mut projectile, first.end, 0.02);
        assert!(!second.expired);
        let third = fly(&mut projectile, second.end, 0.02);
        assert!(third.expired);
        // Travel stops at the lifetime: 0.05 s at 50 m/s.
        assert_abs_diff_eq!(third.end.z, 2.5, epsilon = 1e-4);
    }

    #[test]
    fn test_sweep_sphere_hit_and_miss() {
        let t = sweep_sphere(Vec3::ZERO, Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, 5.0), 1.0)
            .unwrap();
        assert_abs_diff_eq!(t, 0.4, epsilon = 1e-5);

        assert_eq!(
            sweep_sphere(Vec3::ZERO, Vec3::new(0.0, 0.0, 3.0), Vec3::new(0.0, 0.0, 5.0), 1.0),
            None
        );
        assert_eq!(
            sweep_sphere(Vec3::ZERO, Vec3::new(0.0, 0.0, 10.0), Vec3::new(3.0, 0.0, 5.0), 1.0),
            None
        );
        assert_eq!(
            sweep_sphere(Vec3::new(0.0, 0.0, 5.2), Vec3::new(0.0, 0.0, 9.0), Vec3::new(0.0, 0.0, 5.0), 1.0),
            Some(0.0)
        );
    }

    #[test]
    fn test_projectiles_skip_own_faction() {
        assert!(!can_hit(Faction::Tower, Faction::Tower));
        assert!(can_hit(Faction::Tower, Faction::Enemy));
        assert!(can_hit(Faction::Enemy, Faction::Tower));
    }

    // ---- Placement ----

    /// Infinite plane through `point` with unit `normal`.
    struct Plane {
        point: Vec3,
        normal: Vec3,
    }

    impl GroundProbe for Plane {
        fn raycast_down(&self, origin: Vec3, max_distance: f32) -> Option<GroundHit> {
            let denom = -self.normal.y;
            if denom.abs() < 1e-6 {
                return None;
            }
            let t = (self.point - origin).dot(self.normal) / denom;
            (0.0..=max_distance).contains(&t).then(|| GroundHit {
                point: origin - Vec3::Y * t,
                normal: self.normal,
            })
        }
    }

    fn flat() -> Plane {
        Plane {
            point: Vec3::ZERO,
            normal: Vec3::Y,
        }
    }

    fn run_until_settled(
        settler: &mut PlacementSettler,
        pose: &mut Pose,
        body: &mut RigidBody,
        ground: &Plane,
    ) -> usize {
        for step in 0..500 {
            if let Some(PlacementEvent::Settled { .. }) =
                settler.fixed_tick(pose, body, None, ground, 0.02)
            {
                return step;
            }
        }
        panic!("placement never settled");
    }

    #[test]
    fn test_placement_settles_upright_on_flat_ground() {
        let mut settler = PlacementSettler::new(&PlacementSettings::default());
        let mut pose = Pose::new(Vec3::new(0.0, 0.3, 0.0), Quat::from_rotation_x(20f32.to_radians()));
        let mut body = RigidBody {
            velocity: Vec3::new(0.0, -1.0, 0.0),
            ..RigidBody::dynamic()
        };

        run_until_settled(&mut settler, &mut pose, &mut body, &flat());

        assert_eq!(settler.phase(), PlacementPhase::Settled);
        assert!((pose.up() - Vec3::Y).length() < 1e-4);
        assert_abs_diff_eq!(pose.position.y, 0.0, epsilon = 1e-5);
        assert!(!body.dynamic);
        assert_eq!(body.velocity, Vec3::ZERO);
        assert_eq!(body.linear_damping, PlacementSettings::default().landed_damping);
    }

    #[test]
    fn test_placement_aligns_with_sloped_ground() {
        let normal = Vec3::new(0.3, 1.0, 0.0).normalize();
        let slope = Plane {
            point: Vec3::ZERO,
            normal,
        };
        let mut settler = PlacementSettler::new(&PlacementSettings::default());
        let mut pose = Pose::at(Vec3::new(0.0, 0.2, 0.0));
        let mut body = RigidBody::dynamic();

        run_until_settled(&mut settler, &mut pose, &mut body, &slope);
        assert!((pose.up() - normal).length() < 1e-4);
    }

    #[test]
    fn test_placement_ignores_rising_body() {
        let mut settler = PlacementSettler::new(&PlacementSettings::default());
        let mut pose = Pose::at(Vec3::new(0.0, 0.2, 0.0));
        let mut body = RigidBody {
            velocity: Vec3::new(0.0, 2.0, 0.0),
            ..RigidBody::dynamic()
        };
        assert_eq!(settler.fixed_tick(&mut pose, &mut body, None, &flat(), 0.02), None);
        assert_eq!(settler.phase(), PlacementPhase::Falling);
    }

    #[test]
    fn test_placement_lands_on_contact() {
        let mut settler = PlacementSettler::new(&PlacementSettings::default());
        // Too high for the base probe, but physics reports a contact.
        let mut pose = Pose::at(Vec3::new(0.0, 3.0, 0.0));
        let mut body = RigidBody {
            velocity: Vec3::new(0.0, 2.0, 0.0),
            ..RigidBody::dynamic()
        };
        let event = settler.fixed_tick(&mut pose, &mut body, Some(Vec3::new(0.0, 0.0, 0.0)), &flat(), 0.02);
        assert!(matches!(event, Some(PlacementEvent::Landed(_))));
        assert_eq!(settler.phase(), PlacementPhase::Orienting);
    }

    #[test]
    fn test_aligned_landing_reports_landed_before_settled() {
        let mut settler = PlacementSettler::new(&PlacementSettings::default());
        // Already upright and on the ground: orientation has nothing to do.
        let mut pose = Pose::at(Vec3::ZERO);
        let mut body = RigidBody::dynamic();

        let first = settler.fixed_tick(&mut pose, &mut body, Some(Vec3::ZERO), &flat(), 0.02);
        assert!(matches!(first, Some(PlacementEvent::Landed(hit)) if hit.point == Vec3::ZERO));
        assert!(!settler.is_settled());

        let second = settler.fixed_tick(&mut pose, &mut body, Some(Vec3::ZERO), &flat(), 0.02);
        assert!(matches!(second, Some(PlacementEvent::Settled { .. })));
        assert!(settler.is_settled());
    }

    #[test]
    fn test_settled_placement_is_idempotent() {
        let mut settler = PlacementSettler::new(&PlacementSettings::default());
        let mut pose = Pose::at(Vec3::new(0.0, 0.1, 0.0));
        let mut body = RigidBody::dynamic();
        run_until_settled(&mut settler, &mut pose, &mut body, &flat());

        let settled_pose = pose;
        for _ in 0..10 {
            assert_eq!(
                settler.fixed_tick(&mut pose, &mut body, Some(Vec3::ZERO), &flat(), 0.02),
                None
            );
        }
        assert_eq!(pose, settled_pose);
        assert!(!body.dynamic);
    }
}
