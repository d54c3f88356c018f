//! Fluent builder for constructing a [`Sim`].

use taxi_agent::{AgentStoreBuilder, TelemetryConfig};
use taxi_avoid::{AvoidanceConfig, AvoidanceController, RecoveryConfig};
use taxi_core::{NodeId, SimConfig, Vec3};
use taxi_graph::{AStarRouter, Route, Router, WaypointGraph};
use taxi_nav::{BoardingActivity, FollowerConfig, NavResult, PathFollower, TimedBoarding, TripPlan};

use crate::collision::PairSet;
use crate::{CollisionLog, SceneConfig, Sim, SimResult, StaticCollider};

// ── TaxiSpec ──────────────────────────────────────────────────────────────────

/// Scenario entry for one taxi.
///
/// Waypoints are referred to by name.  A missing `start` is filled in by
/// snapping `spawn` to the nearest waypoint.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TaxiSpec {
    pub name: String,
    pub start: Option<String>,
    pub pickup: Option<String>,
    pub end: Option<String>,
    /// Where the taxi appears when it has no `start`.
    pub spawn: Option<Vec3>,
    /// Overrides [`FollowerConfig::base_speed`].
    pub base_speed: Option<f32>,
}

impl TaxiSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    /// Set start, pickup and end in one go.
    pub fn trip(mut self, start: &str, pickup: &str, end: &str) -> Self {
        self.start = Some(start.to_string());
        self.pickup = Some(pickup.to_string());
        self.end = Some(end.to_string());
        self
    }

    pub fn spawn(mut self, position: Vec3) -> Self {
        self.spawn = Some(position);
        self
    }

    pub fn base_speed(mut self, speed: f32) -> Self {
        self.base_speed = Some(speed);
        self
    }
}

// ── SimBuilder ────────────────────────────────────────────────────────────────

/// Fluent builder for [`Sim<B>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: tick length, total ticks, snapshot interval
/// - [`WaypointGraph`]: the road network every taxi routes on
///
/// # Optional inputs (have defaults)
///
/// | Method            | Default                        |
/// |-------------------|--------------------------------|
/// | `.taxi(spec)`     | No taxis                       |
/// | `.follower(c)`    | `FollowerConfig::default()`    |
/// | `.avoidance(c)`   | `AvoidanceConfig::default()`   |
/// | `.recovery(c)`    | `RecoveryConfig::default()`    |
/// | `.telemetry(c)`   | `TelemetryConfig::default()`   |
/// | `.scene(c)`       | `SceneConfig::default()`       |
/// | `.statics(v)`     | No static colliders            |
/// | `.collision_log(l)` | 32 events, 3 s expiry        |
/// | `.boarding(b)`    | `TimedBoarding` (3 s)          |
/// | `.router(r)`      | `AStarRouter`                  |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(SimConfig::default(), graph)
///     .taxi(TaxiSpec::new("Taxi A").trip("Rank", "Station", "Hotel"))
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<B: BoardingActivity = TimedBoarding, R: Router = AStarRouter> {
    config:    SimConfig,
    graph:     WaypointGraph,
    taxis:     Vec<TaxiSpec>,
    follower:  FollowerConfig,
    avoidance: AvoidanceConfig,
    recovery:  RecoveryConfig,
    telemetry: TelemetryConfig,
    scene:     SceneConfig,
    statics:   Vec<StaticCollider>,
    log:       CollisionLog,
    boarding:  B,
    router:    R,
}

impl SimBuilder {
    /// Create a builder with all required inputs.
    pub fn new(config: SimConfig, graph: WaypointGraph) -> Self {
        Self {
            config,
            graph,
            taxis:     Vec::new(),
            follower:  FollowerConfig::default(),
            avoidance: AvoidanceConfig::default(),
            recovery:  RecoveryConfig::default(),
            telemetry: TelemetryConfig::default(),
            scene:     SceneConfig::default(),
            statics:   Vec::new(),
            log:       CollisionLog::default(),
            boarding:  TimedBoarding::default(),
            router:    AStarRouter,
        }
    }
}

impl<B: BoardingActivity + Clone + Send, R: Router> SimBuilder<B, R> {
    /// Add one taxi.  `AgentId`s follow the order of these calls.
    pub fn taxi(mut self, spec: TaxiSpec) -> Self {
        self.taxis.push(spec);
        self
    }

    pub fn taxis(mut self, specs: impl IntoIterator<Item = TaxiSpec>) -> Self {
        self.taxis.extend(specs);
        self
    }

    /// Follower settings shared by every taxi (before per-taxi overrides).
    pub fn follower(mut self, config: FollowerConfig) -> Self {
        self.follower = config;
        self
    }

    pub fn avoidance(mut self, config: AvoidanceConfig) -> Self {
        self.avoidance = config;
        self
    }

    pub fn recovery(mut self, config: RecoveryConfig) -> Self {
        self.recovery = config;
        self
    }

    pub fn telemetry(mut self, config: TelemetryConfig) -> Self {
        self.telemetry = config;
        self
    }

    pub fn scene(mut self, config: SceneConfig) -> Self {
        self.scene = config;
        self
    }

    pub fn statics(mut self, statics: Vec<StaticCollider>) -> Self {
        self.statics = statics;
        self
    }

    pub fn collision_log(mut self, log: CollisionLog) -> Self {
        self.log = log;
        self
    }

    /// Boarding activity prototype; each taxi gets its own clone.
    pub fn boarding<B2: BoardingActivity + Clone + Send>(self, boarding: B2) -> SimBuilder<B2, R> {
        SimBuilder {
            config:    self.config,
            graph:     self.graph,
            taxis:     self.taxis,
            follower:  self.follower,
            avoidance: self.avoidance,
            recovery:  self.recovery,
            telemetry: self.telemetry,
            scene:     self.scene,
            statics:   self.statics,
            log:       self.log,
            boarding,
            router:    self.router,
        }
    }

    /// Routing algorithm used to assemble every taxi's trip.
    pub fn router<R2: Router>(self, router: R2) -> SimBuilder<B, R2> {
        SimBuilder {
            config:    self.config,
            graph:     self.graph,
            taxis:     self.taxis,
            follower:  self.follower,
            avoidance: self.avoidance,
            recovery:  self.recovery,
            telemetry: self.telemetry,
            scene:     self.scene,
            statics:   self.statics,
            log:       self.log,
            boarding:  self.boarding,
            router,
        }
    }

    /// Validate the configuration, place every taxi and plan its trip.
    ///
    /// Fails only on an invalid [`SimConfig`].  A taxi whose trip cannot be
    /// planned is logged and left idle at its spawn point.
    pub fn build(self) -> SimResult<Sim<B>> {
        self.config.validate()?;

        let mut store = AgentStoreBuilder::new().telemetry(self.telemetry.clone());
        let mut followers = Vec::with_capacity(self.taxis.len());

        for spec in &self.taxis {
            let mut follower_cfg = self.follower.clone();
            if let Some(speed) = spec.base_speed {
                follower_cfg.base_speed = speed;
            }

            let (route, start) = match self.plan(spec) {
                Ok((plan, route)) => (route, Some(plan.start)),
                Err(e) => {
                    tracing::warn!(taxi = %spec.name, "taxi left idle: {e}");
                    let start = spec.start.as_deref().and_then(|n| self.graph.node_by_name(n));
                    (Route::default(), start)
                }
            };

            let position = match (start, spec.spawn) {
                (Some(node), _) => self.graph.position(node),
                (None, Some(p)) => p,
                (None, None) => Vec3::ZERO,
            };
            let yaw = route
                .target(&self.graph, 0)
                .map(|first| (self.graph.position(first) - position).flat())
                .filter(|d| d.length_sq() > 1e-8)
                .map(Vec3::yaw)
                .unwrap_or(0.0);

            let id = store.add_agent(spec.name.as_str(), position, yaw);
            tracing::info!(
                agent = %id,
                taxi = %spec.name,
                connections = route.len(),
                cost = route.total_cost,
                "taxi placed"
            );
            followers.push(PathFollower::new(follower_cfg, route, self.boarding.clone()));
        }

        let mut agents = store.build();
        for (i, f) in followers.iter().enumerate() {
            agents.status[i] = f.initial_status();
        }

        Ok(Sim {
            clock:      self.config.make_clock(),
            config:     self.config,
            graph:      self.graph,
            agents,
            followers,
            controller: AvoidanceController::new(self.avoidance, self.recovery),
            scene:      self.scene,
            statics:    self.statics,
            contacts:   PairSet::default(),
            collisions: self.log,
        })
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn spawn_node(&self, spec: &TaxiSpec) -> Option<NodeId> {
        spec.spawn.and_then(|p| self.graph.nearest_waypoint(p))
    }

    fn plan(&self, spec: &TaxiSpec) -> NavResult<(TripPlan, Route)> {
        // Snap to the nearest waypoint when only a spawn point is given.
        let snapped = match (&spec.start, self.spawn_node(spec)) {
            (None, Some(node)) => Some(self.graph.name(node).to_string()),
            _ => None,
        };
        let start = spec.start.as_deref().or(snapped.as_deref());
        let plan = TripPlan::resolve(&self.graph, start, spec.pickup.as_deref(), spec.end.as_deref())?;
        let route = plan.assemble(&self.graph, &self.router)?;
        Ok((plan, route))
    }
}
