//! Unit tests for taxi-agent.

#[cfg(test)]
mod builder {
    use taxi_core::{AgentId, Vec3};
    use crate::{AgentStoreBuilder, TelemetryConfig, TripStatus};

    #[test]
    fn sequential_ids_and_defaults() {
        let mut b = AgentStoreBuilder::new();
        let a = b.add_agent("A", Vec3::ground(1.0, 2.0), 0.5);
        let c = b.add_agent("C", Vec3::ZERO, 0.0);
        assert_eq!((a, c), (AgentId(0), AgentId(1)));
        assert_eq!(b.count(), 2);

        let store = b.build();
        assert_eq!(store.count, 2);
        assert_eq!(store.position[0], Vec3::ground(1.0, 2.0));
        assert_eq!(store.yaw[0], 0.5);
        assert!(store.speed.iter().all(|&s| s == 0.0));
        assert!(store.status.iter().all(|&s| s == TripStatus::Idle));
        assert!(store.alive.iter().all(|&a| a));
    }

    #[test]
    fn blank_name_gets_default() {
        let mut b = AgentStoreBuilder::new();
        b.add_agent("first", Vec3::ZERO, 0.0);
        b.add_agent("   ", Vec3::ZERO, 0.0);
        let store = b.build();
        assert_eq!(store.name[1], "Agent 1");
    }

    #[test]
    fn telemetry_config_carried() {
        let cfg = TelemetryConfig { min_speed: 0.5, smoothing: 0.0 };
        let store = AgentStoreBuilder::new().telemetry(cfg.clone()).build();
        assert!(store.is_empty());
        assert_eq!(store.telemetry_config, cfg);
    }
}

#[cfg(test)]
mod store {
    use taxi_core::{AgentId, Vec3};
    use crate::{AgentStore, AgentStoreBuilder, TelemetryConfig};

    fn one_agent(cfg: TelemetryConfig) -> (AgentStore, AgentId) {
        let mut b = AgentStoreBuilder::new().telemetry(cfg);
        let a = b.add_agent("A", Vec3::ZERO, 0.0);
        (b.build(), a)
    }

    #[test]
    fn unsmoothed_speed_is_displacement_rate() {
        let (mut store, a) = one_agent(TelemetryConfig { min_speed: 0.02, smoothing: 0.0 });
        store.record_motion(a, Vec3::ground(0.0, 0.5), 0.1);
        assert!((store.speed[0] - 5.0).abs() < 1e-4);
        assert!((store.distance[0] - 0.5).abs() < 1e-6);
        assert_eq!(store.position[0], Vec3::ground(0.0, 0.5));
    }

    #[test]
    fn crawl_reads_as_standstill() {
        let (mut store, a) = one_agent(TelemetryConfig { min_speed: 0.02, smoothing: 0.0 });
        store.record_motion(a, Vec3::ground(0.0, 0.001), 0.1);
        assert_eq!(store.speed[0], 0.0);
        // Distance still accumulates.
        assert!(store.distance[0] > 0.0);
    }

    #[test]
    fn smoothing_converges_without_overshoot() {
        let (mut store, a) = one_agent(TelemetryConfig::default());
        let mut z = 0.0;
        let mut last = 0.0;
        for _ in 0..200 {
            z += 0.16; // 8 m/s at dt = 0.02
            store.record_motion(a, Vec3::ground(0.0, z), 0.02);
            let s = store.speed[0];
            assert!(s >= last - 1e-3 && s <= 8.0 + 1e-3);
            last = s;
        }
        assert!((last - 8.0).abs() < 0.01);
        assert!((store.distance[0] - 32.0).abs() < 1e-2);
    }

    #[test]
    fn zero_dt_keeps_speed() {
        let (mut store, a) = one_agent(TelemetryConfig::default());
        store.speed[0] = 3.0;
        store.record_motion(a, Vec3::ground(1.0, 0.0), 0.0);
        assert_eq!(store.speed[0], 3.0);
        assert_eq!(store.distance[0], 1.0);
    }

    #[test]
    fn despawn_invalidates_weak_reference() {
        let (mut store, a) = one_agent(TelemetryConfig::default());
        assert!(store.is_alive(a));
        assert!(!store.is_alive(AgentId(5)));
        assert!(!store.is_alive(AgentId::INVALID));
        store.despawn(a);
        assert!(!store.is_alive(a));
        // Row stays addressable.
        assert_eq!(store.name[a.index()], "A");
    }

    #[test]
    fn telemetry_view() {
        let (mut store, a) = one_agent(TelemetryConfig::default());
        store.passengers[0] = 1;
        store.status[0] = crate::TripStatus::LoadingPassenger;
        let t = store.telemetry(a).unwrap();
        assert_eq!(t.name, "A");
        assert_eq!(t.passengers, 1);
        assert_eq!(t.status.label(), "Loading passenger");
        assert!(store.telemetry(AgentId(3)).is_none());
    }

    #[test]
    fn forward_follows_yaw() {
        let (mut store, a) = one_agent(TelemetryConfig::default());
        assert!((store.forward(a) - Vec3::FORWARD).length() < 1e-6);
        store.yaw[0] = std::f32::consts::FRAC_PI_2;
        assert!((store.forward(a) - Vec3::ground(1.0, 0.0)).length() < 1e-6);
    }
}

#[cfg(test)]
mod status {
    use crate::TripStatus;

    #[test]
    fn labels() {
        assert_eq!(TripStatus::default().to_string(), "Idle");
        assert_eq!(TripStatus::HeadingToPickup.label(), "Heading to pickup");
        assert_eq!(TripStatus::PassengerPickedUp.label(), "Passenger picked up");
        assert_eq!(TripStatus::ReturningToStart.label(), "Returning to start");
        assert_eq!(TripStatus::ReturnedToStart.label(), "Returned to start");
        assert!(TripStatus::ReturnedToStart.is_terminal());
        assert!(!TripStatus::Idle.is_terminal());
    }
}
