//! taxi-rank: runnable scenario for the taxi navigation engine.
//!
//! Usage: `taxi-rank [scenario.json] [output-dir]`
//!
//! Without a scenario file, three taxis share the built-in ring road (see `network.rs`).  Telemetry snapshots and
//! collision events are written as CSV to `output/taxi-rank` by default.
//!
//! Set `RUST_LOG=debug` to see maneuver transitions.

mod network;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use taxi_avoid::{AvoidanceConfig, RecoveryConfig};
use taxi_core::{AgentId, SimConfig, SimRng};
use taxi_graph::{WaypointDecl, WaypointGraph};
use taxi_nav::FollowerConfig;
use taxi_output::{CsvWriter, SimOutputObserver};
use taxi_sim::{SimBuilder, TaxiSpec};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:        u64 = 42;
const DEFAULT_OUT: &str = "output/taxi-rank";

// ── Scenario file ─────────────────────────────────────────────────────────────

/// JSON scenario.  Every section is optional; missing ones take defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Scenario {
    sim:       SimConfig,
    follower:  FollowerConfig,
    avoidance: AvoidanceConfig,
    recovery:  RecoveryConfig,
    waypoints: Vec<WaypointDecl>,
    taxis:     Vec<TaxiSpec>,
}

impl Scenario {
    fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing scenario {}", path.display()))
    }

    /// Three taxis on the ring with slightly different cruising speeds.
    /// All three first legs merge onto Square → Junction.
    fn builtin() -> Self {
        let mut rng = SimRng::new(SEED);
        let trips = [
            ("Taxi A", "Rank",   "Station", "Market"),
            ("Taxi B", "Church", "Hotel",   "Rank"),
            ("Taxi C", "Square", "Market",  "Station"),
        ];
        let taxis = trips
            .iter()
            .enumerate()
            .map(|(i, &(name, start, pickup, end))| {
                let speed = rng.child(i as u64).gen_range(7.0_f32..9.0);
                TaxiSpec::new(name).trip(start, pickup, end).base_speed(speed)
            })
            .collect();

        Self {
            sim: SimConfig { total_ticks: 50 * 180, ..SimConfig::default() },
            waypoints: network::waypoints(),
            taxis,
            ..Self::default()
        }
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let scenario = match args.next() {
        Some(path) => Scenario::load(Path::new(&path))?,
        None => Scenario::builtin(),
    };
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_OUT.to_string()));

    println!("=== taxi-rank ===");

    // 1. Road network.
    let graph = WaypointGraph::from_declarations(&scenario.waypoints);
    println!("Road network: {} waypoints, {} connections", graph.node_count(), graph.edge_count());

    // 2. Sim.
    let taxi_count = scenario.taxis.len();
    let mut sim = SimBuilder::new(scenario.sim.clone(), graph)
        .taxis(scenario.taxis)
        .follower(scenario.follower)
        .avoidance(scenario.avoidance)
        .recovery(scenario.recovery)
        .build()?;
    println!(
        "Sim: {taxi_count} taxis, up to {} ticks of {:.3} s, snapshot every {} ticks",
        scenario.sim.total_ticks, scenario.sim.tick_secs, scenario.sim.output_interval_ticks
    );
    println!();

    // 3. Output.
    let writer = CsvWriter::new(&out_dir)
        .with_context(|| format!("creating output in {}", out_dir.display()))?;
    let mut obs = SimOutputObserver::new(writer);

    // 4. Run.
    let t0 = Instant::now();
    let all_done = sim.run_until_complete(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.take_error() {
        tracing::error!("output error: {e}");
    }

    // 5. Summary.
    println!(
        "Simulation {} after {:.2} sim s ({:.3} s wall)",
        if all_done { "complete" } else { "stopped" },
        sim.now_secs(),
        elapsed.as_secs_f64()
    );
    println!("  logged collisions : {}", sim.collisions.len());
    println!("  output            : {}", out_dir.display());
    println!();

    println!("{:<10} {:>10} {:>8} {:>6}  {}", "Taxi", "Distance", "Time", "Pax", "Status");
    println!("{}", "-".repeat(56));
    for i in 0..sim.agents.count {
        let Some(t) = sim.agents.telemetry(AgentId(i as u32)) else { continue };
        println!(
            "{:<10} {:>9.1}m {:>7.1}s {:>6}  {}",
            t.name, t.distance, t.trip_secs, t.passengers, t.status
        );
    }

    Ok(())
}
