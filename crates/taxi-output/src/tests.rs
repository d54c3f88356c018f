//! Integration tests for taxi-output.

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use crate::csv::{COLLISION_HEADER, CsvWriter, TELEMETRY_HEADER};
    use crate::row::{CollisionRow, TelemetryRow};
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn telemetry_row(agent: u32, tick: u64) -> TelemetryRow {
        TelemetryRow {
            tick,
            time:           tick as f32 * 0.02,
            agent,
            name:           format!("Taxi {agent}"),
            x:              1.5,
            z:              -2.25,
            speed:          7.9,
            distance:       12.0,
            passengers:     1,
            status:         "Passenger picked up",
            lateral_weight: 0.0,
        }
    }

    fn headers(path: &std::path::Path) -> Vec<String> {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        rdr.headers().unwrap().iter().map(str::to_owned).collect()
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("telemetry.csv").exists());
        assert!(dir.path().join("collisions.csv").exists());
    }

    #[test]
    fn creates_missing_directory() {
        let dir = tmp();
        let nested = dir.path().join("runs").join("one");
        let mut w = CsvWriter::new(&nested).unwrap();
        w.finish().unwrap();
        assert!(nested.join("telemetry.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        assert_eq!(headers(&dir.path().join("telemetry.csv")), TELEMETRY_HEADER);
        assert_eq!(headers(&dir.path().join("collisions.csv")), COLLISION_HEADER);
    }

    #[test]
    fn telemetry_rows_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_telemetry(&[telemetry_row(0, 25), telemetry_row(1, 25)]).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("telemetry.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "25");                  // tick
        assert_eq!(&rows[0][1], "0.500");               // time
        assert_eq!(&rows[1][2], "1");                   // agent
        assert_eq!(&rows[1][3], "Taxi 1");              // name
        assert_eq!(&rows[0][5], "-2.250");              // z
        assert_eq!(&rows[0][9], "Passenger picked up"); // status
    }

    #[test]
    fn collision_message_with_comma_is_quoted() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_collision(&CollisionRow {
            tick:    3,
            time:    0.06,
            a:       0,
            b:       4,
            message: "Smith, J collided with Taxi E".into(),
        })
        .unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("collisions.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][3], "4");
        assert_eq!(&rows[0][4], "Smith, J collided with Taxi E");
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap(); // second call should not panic
    }

    #[test]
    fn csv_empty_batch_ok() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_telemetry(&[]).unwrap();
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use taxi_core::{SimConfig, Vec3};
    use taxi_graph::WaypointGraphBuilder;
    use taxi_sim::{NoopObserver, SimBuilder, SimObserver, TaxiSpec};

    use crate::row::{CollisionRow, TelemetryRow};
    use crate::writer::OutputWriter;
    use crate::{CsvWriter, OutputError, OutputResult, SimOutputObserver, telemetry_rows};

    fn triangle() -> taxi_graph::WaypointGraph {
        let mut b = WaypointGraphBuilder::new();
        let s = b.add_waypoint("S", Vec3::ground(0.0, 0.0));
        let p = b.add_waypoint("P", Vec3::ground(10.0, 0.0));
        let e = b.add_waypoint("E", Vec3::ground(5.0, 8.660_254));
        b.add_connection(s, Some(p));
        b.add_connection(p, Some(e));
        b.add_connection(e, Some(s));
        b.build()
    }

    fn config(total_ticks: u64, interval: u64) -> SimConfig {
        SimConfig { tick_secs: 0.02, total_ticks, output_interval_ticks: interval }
    }

    #[test]
    fn rows_skip_despawned_agents() {
        let mut sim = SimBuilder::new(config(10, 1), triangle())
            .taxi(TaxiSpec::new("A").trip("S", "P", "E"))
            .taxi(TaxiSpec::new("B").trip("P", "E", "S"))
            .build()
            .unwrap();
        sim.run_ticks(3, &mut NoopObserver).unwrap();
        sim.despawn(taxi_core::AgentId(0));
        let rows = telemetry_rows(taxi_core::Tick(3), 0.08, &sim.agents);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "B");
        assert_eq!(rows[0].status, "Heading to pickup");
    }

    #[test]
    fn integration_csv() {
        // Two taxis stacked at S: one contact on the first tick.
        let mut sim = SimBuilder::new(config(100, 10), triangle())
            .taxi(TaxiSpec::new("Taxi A").trip("S", "P", "E"))
            .taxi(TaxiSpec::new("Taxi B").trip("S", "P", "E"))
            .build()
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let writer = CsvWriter::new(dir.path()).unwrap();
        let mut obs = SimOutputObserver::new(writer);
        sim.run(&mut obs).unwrap();
        assert!(obs.take_error().is_none(), "no write errors expected");

        // output_interval = 10 → snapshots at ticks 0, 10, …, 90 (10 × 2 agents).
        let mut rdr = csv::Reader::from_path(dir.path().join("telemetry.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 20);

        let mut rdr = csv::Reader::from_path(dir.path().join("collisions.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert!(!rows.is_empty());
        assert_eq!(&rows[0][0], "0");
        assert_eq!(&rows[0][4], "Taxi A collided with Taxi B");
    }

    /// Fails every write with a distinct I/O error.
    struct Failing(u32);

    impl OutputWriter for Failing {
        fn write_telemetry(&mut self, _rows: &[TelemetryRow]) -> OutputResult<()> {
            self.0 += 1;
            Err(std::io::Error::other(format!("write {}", self.0)).into())
        }
        fn write_collision(&mut self, _row: &CollisionRow) -> OutputResult<()> {
            Ok(())
        }
        fn finish(&mut self) -> OutputResult<()> {
            Ok(())
        }
    }

    #[test]
    fn keeps_first_error_only() {
        let mut sim = SimBuilder::new(config(30, 10), triangle())
            .taxi(TaxiSpec::new("A").trip("S", "P", "E"))
            .build()
            .unwrap();
        let mut obs = SimOutputObserver::new(Failing(0));
        sim.run(&mut obs).unwrap();
        match obs.take_error() {
            Some(OutputError::Io(e)) => assert_eq!(e.to_string(), "write 1"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(obs.take_error().is_none());
        assert_eq!(obs.into_writer().0, 3);
    }

    #[test]
    fn observer_is_a_sim_observer() {
        fn assert_observer<O: SimObserver>(_: &O) {}
        let dir = tempfile::tempdir().unwrap();
        let obs = SimOutputObserver::new(CsvWriter::new(dir.path()).unwrap());
        assert_observer(&obs);
    }
}
