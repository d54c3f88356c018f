//! Integration tests for taxi-sim.

use taxi_agent::TripStatus;
use taxi_core::{AgentId, SimConfig, Tick, Vec3};
use taxi_graph::{WaypointGraph, WaypointGraphBuilder};
use taxi_nav::{FollowState, FollowerConfig, SpeedPenalty};

use crate::{CollisionEvent, NoopObserver, SimBuilder, SimError, SimObserver, TaxiSpec};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn test_config(total_ticks: u64) -> SimConfig {
    SimConfig {
        tick_secs:             0.02,
        total_ticks,
        output_interval_ticks: 10,
    }
}

/// One-way triangle S→P→E→S, 10 m sides.
fn triangle() -> WaypointGraph {
    let mut b = WaypointGraphBuilder::new();
    let s = b.add_waypoint("S", Vec3::ground(0.0, 0.0));
    let p = b.add_waypoint("P", Vec3::ground(10.0, 0.0));
    let e = b.add_waypoint("E", Vec3::ground(5.0, 8.660_254));
    b.add_connection(s, Some(p));
    b.add_connection(p, Some(e));
    b.add_connection(e, Some(s));
    b.build()
}

/// No passenger penalty, tight arrival threshold.
fn exact_follower() -> FollowerConfig {
    FollowerConfig {
        arrival_threshold: 0.05,
        penalty: SpeedPenalty::Linear { rate: 0.0 },
        ..FollowerConfig::default()
    }
}

fn taxi(name: &str) -> TaxiSpec {
    TaxiSpec::new(name).trip("S", "P", "E")
}

// ── SimBuilder ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn builds_with_no_taxis() {
        let sim = SimBuilder::new(test_config(10), triangle()).build().unwrap();
        assert_eq!(sim.agents.count, 0);
        assert_eq!(sim.active_count(), 0);
    }

    #[test]
    fn invalid_tick_length_errors() {
        let cfg = SimConfig { tick_secs: 0.0, ..test_config(10) };
        let result = SimBuilder::new(cfg, triangle()).taxi(taxi("A")).build();
        assert!(matches!(
            result,
            Err(SimError::Core(taxi_core::CoreError::Config(ref msg))) if msg.contains("tick_secs")
        ));
    }

    #[test]
    fn taxi_placed_at_start_facing_first_waypoint() {
        let sim = SimBuilder::new(test_config(10), triangle()).taxi(taxi("A")).build().unwrap();
        assert_eq!(sim.agents.position[0], Vec3::ground(0.0, 0.0));
        assert!((sim.agents.yaw[0] - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
        assert_eq!(sim.agents.status[0], TripStatus::HeadingToPickup);
        let route = sim.followers[0].route();
        assert_eq!(route.len(), 3);
        assert_eq!(route.leg_boundaries, vec![1, 2, 3]);
    }

    #[test]
    fn missing_waypoint_leaves_taxi_idle() {
        let spec = TaxiSpec { pickup: None, ..taxi("A") };
        let sim = SimBuilder::new(test_config(10), triangle()).taxi(spec).taxi(taxi("B")).build().unwrap();
        assert_eq!(sim.followers[0].state(), FollowState::Idle);
        assert_eq!(sim.agents.status[0], TripStatus::Idle);
        // Still placed at its start, and the other taxi is unaffected.
        assert_eq!(sim.agents.position[0], Vec3::ground(0.0, 0.0));
        assert_eq!(sim.followers[1].state(), FollowState::Following);
    }

    #[test]
    fn unknown_waypoint_leaves_taxi_idle() {
        let spec = TaxiSpec::new("A").trip("S", "P", "Nowhere");
        let sim = SimBuilder::new(test_config(10), triangle()).taxi(spec).build().unwrap();
        assert_eq!(sim.followers[0].state(), FollowState::Idle);
    }

    #[test]
    fn unreachable_leg_leaves_taxi_idle() {
        let mut b = WaypointGraphBuilder::new();
        let s = b.add_waypoint("S", Vec3::ground(0.0, 0.0));
        let p = b.add_waypoint("P", Vec3::ground(5.0, 0.0));
        let e = b.add_waypoint("E", Vec3::ground(10.0, 0.0));
        b.add_connection(s, Some(p));
        b.add_connection(p, Some(e));
        // No way back from E.
        let sim = SimBuilder::new(test_config(10), b.build()).taxi(taxi("A")).build().unwrap();
        assert_eq!(sim.followers[0].state(), FollowState::Idle);
        assert!(sim.followers[0].route().is_empty());
    }

    #[test]
    fn spawn_snaps_to_nearest_waypoint() {
        let spec = TaxiSpec { start: None, ..taxi("A") }.spawn(Vec3::ground(9.0, 1.0));
        let sim = SimBuilder::new(test_config(10), triangle()).taxi(spec).build().unwrap();
        // Snapped to P, so the trip is P→P→E→P.
        assert_eq!(sim.agents.position[0], Vec3::ground(10.0, 0.0));
        assert_eq!(sim.followers[0].state(), FollowState::Following);
        assert_eq!(sim.followers[0].route().boundary(0), Some(0));
    }

    #[test]
    fn base_speed_override() {
        let sim = SimBuilder::new(test_config(10), triangle())
            .follower(exact_follower())
            .taxi(taxi("A").base_speed(3.0))
            .taxi(taxi("B"))
            .build()
            .unwrap();
        assert_eq!(sim.followers[0].config.base_speed, 3.0);
        assert_eq!(sim.followers[1].config.base_speed, exact_follower().base_speed);
        assert_eq!(sim.followers[1].config.arrival_threshold, 0.05);
    }

    #[test]
    fn blank_name_gets_default() {
        let sim = SimBuilder::new(test_config(10), triangle()).taxi(taxi("")).build().unwrap();
        assert_eq!(sim.agents.name[0], "Agent 0");
    }
}

// ── Run loop ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use super::*;
    use crate::StaticCollider;

    /// Long straight S→P, then back round via E.
    fn straight() -> WaypointGraph {
        let mut b = WaypointGraphBuilder::new();
        let s = b.add_waypoint("S", Vec3::ground(0.0, 0.0));
        let p = b.add_waypoint("P", Vec3::ground(30.0, 0.0));
        let e = b.add_waypoint("E", Vec3::ground(30.0, 10.0));
        b.add_connection(s, Some(p));
        b.add_connection(p, Some(e));
        b.add_connection(e, Some(s));
        b.build()
    }

    #[test]
    fn blocked_taxi_pushes_past_stationary_hazard() {
        // A parked taxi in the lane and a wall where the sidestep would go.
        let mut sim = SimBuilder::new(test_config(50 * 60), straight())
            .taxi(taxi("A"))
            .taxi(TaxiSpec::new("Parked").spawn(Vec3::ground(14.0, 0.0)))
            .statics(vec![StaticCollider { center: Vec3::ground(10.0, -2.5), radius: 1.0 }])
            .build()
            .unwrap();
        assert_eq!(sim.followers[1].state(), FollowState::Idle);

        let mut passed = None;
        for tick in 0..50 * 30 {
            sim.run_ticks(1, &mut NoopObserver).unwrap();
            if sim.agents.position[0].x > 16.0 {
                passed = Some(tick);
                break;
            }
        }
        let tick = passed.expect("taxi stayed stuck behind the parked taxi");
        // Held at least for the hard stop timeout before pushing past.
        assert!(tick > 50 * 3, "passed at tick {tick}");
    }

    #[derive(Default)]
    struct Counter {
        starts:    u64,
        ends:      u64,
        snapshots: Vec<Tick>,
        sim_ends:  u32,
    }

    impl SimObserver for Counter {
        fn on_tick_start(&mut self, _t: Tick) { self.starts += 1; }
        fn on_tick_end(&mut self, _t: Tick, _a: usize) { self.ends += 1; }
        fn on_snapshot(&mut self, t: Tick, _time: f32, _agents: &taxi_agent::AgentStore) {
            self.snapshots.push(t);
        }
        fn on_sim_end(&mut self, _t: Tick) { self.sim_ends += 1; }
    }

    #[test]
    fn run_visits_every_tick() {
        let mut sim = SimBuilder::new(test_config(50), triangle()).taxi(taxi("A")).build().unwrap();
        let mut obs = Counter::default();
        sim.run(&mut obs).unwrap();
        assert_eq!(obs.starts, 50);
        assert_eq!(obs.ends, 50);
        assert_eq!(obs.snapshots, vec![Tick(0), Tick(10), Tick(20), Tick(30), Tick(40)]);
        assert_eq!(obs.sim_ends, 1);
        assert_eq!(sim.clock.current_tick, Tick(50));
    }

    #[test]
    fn run_ticks_ignores_end_tick() {
        let mut sim = SimBuilder::new(test_config(5), triangle()).taxi(taxi("A")).build().unwrap();
        let mut obs = Counter::default();
        sim.run_ticks(12, &mut obs).unwrap();
        assert_eq!(obs.starts, 12);
        assert_eq!(obs.sim_ends, 0);
    }

    #[test]
    fn full_trip_end_to_end() {
        let mut sim = SimBuilder::new(test_config(30_000), triangle())
            .follower(exact_follower())
            .taxi(taxi("Taxi A"))
            .build()
            .unwrap();
        assert!(sim.run_until_complete(&mut NoopObserver).unwrap());

        assert_eq!(sim.followers[0].state(), FollowState::Completed);
        let t = sim.agents.telemetry(AgentId(0)).unwrap();
        assert_eq!(t.status, TripStatus::ReturnedToStart);
        assert_eq!(t.passengers, 1);
        assert!((t.distance - 30.0).abs() < 0.2, "distance {}", t.distance);
        // 30 m at 8 m/s plus 3 s of boarding.
        assert!(t.trip_secs > 6.0 && t.trip_secs < 8.0, "trip time {}", t.trip_secs);
        assert!(sim.agents.position[0].flat_distance(Vec3::ZERO) < 0.1);
    }

    #[test]
    fn trip_timer_stops_on_completion() {
        let mut sim = SimBuilder::new(test_config(30_000), triangle())
            .follower(exact_follower())
            .taxi(taxi("A"))
            .build()
            .unwrap();
        sim.run_until_complete(&mut NoopObserver).unwrap();
        let (secs, dist) = (sim.agents.trip_secs[0], sim.agents.distance[0]);
        sim.run_ticks(100, &mut NoopObserver).unwrap();
        assert_eq!(sim.agents.trip_secs[0], secs);
        assert_eq!(sim.agents.distance[0], dist);
    }

    #[test]
    fn budget_exhaustion_reports_incomplete() {
        let mut sim = SimBuilder::new(test_config(20), triangle()).taxi(taxi("A")).build().unwrap();
        assert!(!sim.run_until_complete(&mut NoopObserver).unwrap());
        assert_eq!(sim.clock.current_tick, Tick(20));
    }

    #[test]
    fn idle_taxi_never_moves() {
        let spec = TaxiSpec::new("Idle").spawn(Vec3::ground(-20.0, -20.0));
        let mut sim = SimBuilder::new(test_config(200), triangle()).taxi(spec).build().unwrap();
        let start = sim.agents.position[0];
        sim.run(&mut NoopObserver).unwrap();
        assert_eq!(sim.agents.position[0], start);
        assert_eq!(sim.agents.distance[0], 0.0);
        assert_eq!(sim.agents.status[0], TripStatus::Idle);
    }

    #[test]
    fn speed_telemetry_tracks_motion() {
        let mut sim = SimBuilder::new(test_config(1_000), triangle())
            .follower(exact_follower())
            .taxi(taxi("A"))
            .build()
            .unwrap();
        // One second in: well into the first leg, smoothed speed near cruise.
        sim.run_ticks(50, &mut NoopObserver).unwrap();
        let speed = sim.agents.speed[0];
        assert!(speed > 7.0 && speed <= 8.0 + 1e-3, "speed {speed}");
    }

    #[test]
    fn identical_runs_are_identical() {
        let build = || {
            SimBuilder::new(test_config(600), triangle())
                .taxi(taxi("A"))
                .taxi(taxi("B").spawn(Vec3::ground(-3.0, 0.0)))
                .taxi(TaxiSpec::new("C").trip("P", "E", "S").base_speed(6.0))
                .build()
                .unwrap()
        };
        let (mut a, mut b) = (build(), build());
        a.run(&mut NoopObserver).unwrap();
        b.run(&mut NoopObserver).unwrap();
        assert_eq!(a.agents.position, b.agents.position);
        assert_eq!(a.agents.status, b.agents.status);
        assert_eq!(a.collisions.len(), b.collisions.len());
    }
}

// ── Scene ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scene_tests {
    use taxi_agent::AgentStoreBuilder;
    use taxi_avoid::{LayerMask, SceneQuery};

    use super::*;
    use crate::{AgentScene, SceneConfig, StaticCollider};

    #[test]
    fn casts_hit_live_bodies_and_statics() {
        let mut b = AgentStoreBuilder::new();
        b.add_agent("A", Vec3::ground(0.0, 0.0), 0.0);
        b.add_agent("B", Vec3::ground(0.0, 5.0), 0.0);
        b.add_agent("C", Vec3::ground(0.0, 8.0), 0.0);
        let mut store = b.build();
        let statics = [StaticCollider { center: Vec3::ground(0.0, 12.0), radius: 0.5 }];
        let cfg = SceneConfig::default();

        let scene = AgentScene::new(&store, &statics, &cfg);
        let hits = scene.cast(Vec3::ZERO, Vec3::FORWARD, 20.0, 0.0, LayerMask::ALL);
        // A (inside), B, C and the static.
        assert_eq!(hits.len(), 4);
        let wall = hits.iter().find(|h| h.owner.is_none()).unwrap();
        assert_eq!(wall.collider, 3);
        assert!((wall.distance - 11.5).abs() < 1e-4);
        let self_hit = hits.iter().find(|h| h.owner == Some(AgentId(0))).unwrap();
        assert_eq!(self_hit.distance, 0.0);

        let agents_only = scene.cast(Vec3::ZERO, Vec3::FORWARD, 20.0, 0.0, LayerMask::AGENTS);
        assert!(agents_only.iter().all(|h| h.owner.is_some()));

        store.despawn(AgentId(1));
        let scene = AgentScene::new(&store, &statics, &cfg);
        let hits = scene.cast(Vec3::ZERO, Vec3::FORWARD, 20.0, 0.0, LayerMask::AGENTS);
        assert!(hits.iter().all(|h| h.owner != Some(AgentId(1))));
    }

    #[test]
    fn cast_ignores_bodies_behind_and_beside() {
        let mut b = AgentStoreBuilder::new();
        b.add_agent("Me", Vec3::ground(0.0, 0.0), 0.0);
        b.add_agent("Behind", Vec3::ground(0.0, -5.0), 0.0);
        b.add_agent("Beside", Vec3::ground(3.0, 4.0), 0.0);
        let store = b.build();
        let cfg = SceneConfig::default();
        let scene = AgentScene::new(&store, &[], &cfg);
        let hits = scene.cast(Vec3::ground(0.0, 1.5), Vec3::FORWARD, 10.0, 0.6, LayerMask::AGENTS);
        assert!(hits.iter().all(|h| h.owner == Some(AgentId(0))));
        // Wider cast reaches the body beside the lane.
        let wide = scene.cast(Vec3::ground(0.0, 1.5), Vec3::FORWARD, 10.0, 2.5, LayerMask::AGENTS);
        assert!(wide.iter().any(|h| h.owner == Some(AgentId(2))));
    }
}

// ── Collisions ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod collision_tests {
    use taxi_agent::AgentStoreBuilder;

    use super::*;
    use crate::CollisionLog;

    fn event(store: &taxi_agent::AgentStore, time: f32, a: u32, b: u32) -> CollisionEvent {
        CollisionEvent::new(Tick((time * 50.0) as u64), time, AgentId(a), AgentId(b), store)
    }

    fn names() -> taxi_agent::AgentStore {
        let mut b = AgentStoreBuilder::new();
        for n in ["Taxi A", "Taxi B", "Taxi C"] {
            b.add_agent(n, Vec3::ZERO, 0.0);
        }
        b.build()
    }

    #[test]
    fn message_names_lower_id_first() {
        let store = names();
        let e = event(&store, 0.0, 2, 0);
        assert_eq!((e.a, e.b), (AgentId(0), AgentId(2)));
        assert_eq!(e.message, "Taxi A collided with Taxi C");
        assert!(e.involves(AgentId(2)));
        assert!(!e.involves(AgentId(1)));
    }

    #[test]
    fn log_is_bounded() {
        let store = names();
        let mut log = CollisionLog::new(3, 3.0);
        for k in 0..5 {
            log.record(event(&store, k as f32, 0, 1));
        }
        assert_eq!(log.len(), 3);
        assert_eq!(log.events().next().unwrap().time, 2.0);
    }

    #[test]
    fn recent_events_expire() {
        let store = names();
        let mut log = CollisionLog::default();
        log.record(event(&store, 1.0, 0, 1));
        log.record(event(&store, 2.0, 1, 2));
        assert_eq!(log.latest_message(2.5), Some("Taxi B collided with Taxi C"));
        assert_eq!(log.recent(4.5).count(), 1);
        assert_eq!(log.latest_message(5.5), None);
        // Expired from "recent" but still in the per-pair table.
        assert_eq!(log.last_between(AgentId(1), AgentId(0)).unwrap().time, 1.0);
        assert!(log.last_between(AgentId(0), AgentId(2)).is_none());
    }

    #[test]
    fn per_pair_record_expires() {
        let store = names();
        let mut log = CollisionLog::default();
        log.record(event(&store, 1.0, 0, 1));
        assert_eq!(log.unexpired_between(AgentId(1), AgentId(0), 4.0).unwrap().time, 1.0);
        assert!(log.unexpired_between(AgentId(0), AgentId(1), 4.5).is_none());
        assert!(log.last_between(AgentId(0), AgentId(1)).is_some());

        // A newer contact between the same pair renews the record.
        log.record(event(&store, 4.0, 1, 0));
        assert_eq!(log.unexpired_between(AgentId(0), AgentId(1), 4.5).unwrap().time, 4.0);
    }

    #[test]
    fn per_pair_keeps_latest() {
        let store = names();
        let mut log = CollisionLog::default();
        log.record(event(&store, 1.0, 0, 1));
        log.record(event(&store, 4.0, 1, 0));
        assert_eq!(log.last_between(AgentId(0), AgentId(1)).unwrap().time, 4.0);
    }

    struct Collisions(Vec<CollisionEvent>);

    impl SimObserver for Collisions {
        fn on_collision(&mut self, event: &CollisionEvent) {
            self.0.push(event.clone());
        }
    }

    /// Two taxis spawned on top of each other at S.
    fn stacked() -> crate::Sim {
        SimBuilder::new(test_config(2_000), triangle())
            .taxi(taxi("Taxi A"))
            .taxi(taxi("Taxi B"))
            .build()
            .unwrap()
    }

    #[test]
    fn contact_logged_once_and_higher_id_recovers_on_tie() {
        let mut sim = stacked();
        let mut obs = Collisions(Vec::new());
        sim.run_ticks(1, &mut obs).unwrap();

        assert_eq!(obs.0.len(), 1);
        assert_eq!(obs.0[0].message, "Taxi A collided with Taxi B");
        assert_eq!(sim.collisions.len(), 1);
        // Both stood still, so speeds tie and the higher ID yields.
        assert!(sim.followers[1].avoidance.recovery.is_active());
        assert!(!sim.followers[0].avoidance.recovery.is_active());
        assert_ne!(sim.agents.residual_velocity[0], Vec3::ZERO);

        // Still overlapping: not a new contact.
        sim.run_ticks(1, &mut obs).unwrap();
        assert_eq!(obs.0.len(), 1);
        // The recovering taxi has no residual drift.
        assert_eq!(sim.agents.residual_velocity[1], Vec3::ZERO);
    }

    #[test]
    fn recovery_slides_then_resumes() {
        let mut sim = stacked();
        sim.run_ticks(1, &mut NoopObserver).unwrap();
        let right = sim.followers[1].avoidance.recovery.right;

        // Half a second of sliding.
        sim.run_ticks(25, &mut NoopObserver).unwrap();
        let offset = (sim.agents.position[1] - Vec3::ZERO).flat().dot(right);
        assert!(offset > 1.5, "slid {offset}");

        let mut ended = false;
        for _ in 0..600 {
            sim.run_ticks(1, &mut NoopObserver).unwrap();
            if !sim.followers[1].avoidance.recovery.is_active() {
                ended = true;
                break;
            }
        }
        assert!(ended, "recovery must end on its own");
        assert!(sim.followers[1].is_active());
    }

    #[test]
    fn boarding_taxis_do_not_start_recovery() {
        // Pickup at the start: both taxis begin boarding on the first tick.
        let mut sim = SimBuilder::new(test_config(2_000), triangle())
            .taxi(TaxiSpec::new("Taxi A").trip("S", "S", "E"))
            .taxi(TaxiSpec::new("Taxi B").trip("S", "S", "E"))
            .build()
            .unwrap();
        let mut obs = Collisions(Vec::new());
        sim.run_ticks(1, &mut obs).unwrap();
        assert_eq!(obs.0.len(), 1);

        for _ in 0..100 {
            for f in &sim.followers {
                assert_eq!(f.state(), FollowState::Loading);
                assert!(!f.avoidance.maneuver_active());
            }
            sim.run_ticks(1, &mut obs).unwrap();
        }
    }

    #[test]
    fn despawned_partner_releases_recovery() {
        let mut sim = stacked();
        sim.run_ticks(1, &mut NoopObserver).unwrap();
        sim.despawn(AgentId(0));
        assert_eq!(sim.active_count(), 1);
        // Slide (0.5 s), then the wait ends at once because the partner is gone,
        // then 1 s of merging forward.
        sim.run_ticks(90, &mut NoopObserver).unwrap();
        assert!(!sim.followers[1].avoidance.recovery.is_active());
        let frozen = sim.agents.position[0];
        sim.run_ticks(10, &mut NoopObserver).unwrap();
        assert_eq!(sim.agents.position[0], frozen);
    }
}
