//! The per-agent path follower.
//!
//! # States
//!
//! ```text
//! Idle ──(non-empty route)──▶ Following ──(pickup leg done)──▶ Loading
//!                               ▲    │                           │
//!                               │    └──(last leg done)──▶ Completed
//!                               └──────(boarding done)───────────┘
//! ```
//!
//! # Tick
//!
//! A tick reads the shared [`AgentStore`] snapshot and returns a
//! [`FollowStep`] describing what should be written back; it never writes
//! the store itself.  While a collision recovery is running it owns the
//! agent's motion and normal following is suspended.

use taxi_agent::{AgentStore, TripStatus};
use taxi_avoid::{AvoidanceController, AvoidanceState, SceneQuery};
use taxi_core::geo::turn_towards;
use taxi_core::{AgentId, Vec3};
use taxi_graph::{Route, WaypointGraph};

use crate::{BoardingActivity, FollowerConfig, TimedBoarding};

// ── Context & output ──────────────────────────────────────────────────────────

/// Read-only world a follower sees during one tick.
pub struct NavContext<'a, S: SceneQuery + ?Sized> {
    pub graph: &'a WaypointGraph,
    /// End-of-previous-tick snapshot of every agent.
    pub store: &'a AgentStore,
    pub scene: &'a S,
    pub avoidance: &'a AvoidanceController,
    /// Sim time in seconds.
    pub now: f32,
    pub dt: f32,
}

/// What one follower tick wants written back for its agent.
#[derive(Clone, Debug, PartialEq)]
pub struct FollowStep {
    pub position: Vec3,
    pub yaw: f32,
    /// Recovery is driving: drop any residual velocity.
    pub hold_residual: bool,
    /// New status label, if it changed.
    pub status: Option<TripStatus>,
    /// A passenger boarded this tick.
    pub picked_up: bool,
    /// Seconds to add to the trip timer.
    pub trip_dt: f32,
    pub lateral_weight: f32,
}

impl FollowStep {
    fn hold(store: &AgentStore, me: AgentId) -> Self {
        Self {
            position: store.position[me.index()],
            yaw: store.yaw[me.index()],
            hold_residual: false,
            status: None,
            picked_up: false,
            trip_dt: 0.0,
            lateral_weight: 0.0,
        }
    }
}

// ── FollowState ───────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FollowState {
    /// No valid route; never moves.
    #[default]
    Idle,
    Following,
    /// Paused at the pickup while boarding runs.
    Loading,
    /// Terminal.
    Completed,
}

// ── PathFollower ──────────────────────────────────────────────────────────────

/// Drives one agent along its route.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathFollower<B: BoardingActivity = TimedBoarding> {
    pub config: FollowerConfig,
    route: Route,
    /// Index into `route.edges` of the connection being driven.
    current: usize,
    /// Legs whose completion has been handled.
    legs_done: usize,
    state: FollowState,
    pub avoidance: AvoidanceState,
    boarding: B,
}

impl<B: BoardingActivity> PathFollower<B> {
    /// A follower that will never move.
    pub fn idle(config: FollowerConfig, boarding: B) -> Self {
        Self {
            config,
            route: Route::default(),
            current: 0,
            legs_done: 0,
            state: FollowState::Idle,
            avoidance: AvoidanceState::default(),
            boarding,
        }
    }

    /// Follow `route`.  An empty route gives an idle follower.
    pub fn new(config: FollowerConfig, route: Route, boarding: B) -> Self {
        let mut f = Self::idle(config, boarding);
        if !route.is_empty() {
            f.route = route;
            f.state = FollowState::Following;
        }
        f
    }

    pub fn state(&self) -> FollowState {
        self.state
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// `true` while the trip is under way (following or loading).
    pub fn is_active(&self) -> bool {
        matches!(self.state, FollowState::Following | FollowState::Loading)
    }

    /// Status label to publish before the first tick.
    pub fn initial_status(&self) -> TripStatus {
        match self.state {
            FollowState::Idle => TripStatus::Idle,
            _ => TripStatus::HeadingToPickup,
        }
    }

    /// Advance one tick.
    pub fn tick<S: SceneQuery + ?Sized>(&mut self, ctx: &NavContext<'_, S>, me: AgentId) -> FollowStep {
        let mut step = FollowStep::hold(ctx.store, me);
        step.lateral_weight = self.avoidance.lateral_weight;

        match self.state {
            FollowState::Idle | FollowState::Completed => return step,
            FollowState::Loading => {
                step.trip_dt = ctx.dt;
                if self.boarding.advance(ctx.dt) {
                    tracing::info!(agent = %me, "passenger on board");
                    self.state = FollowState::Following;
                    step.status = Some(TripStatus::PassengerPickedUp);
                    // Later legs may already be complete (pickup == end).
                    self.handle_leg_completions(me, &mut step);
                }
                return step;
            }
            FollowState::Following => {}
        }
        step.trip_dt = ctx.dt;

        // Zero-length legs (pickup at the start) complete without moving.
        self.handle_leg_completions(me, &mut step);
        if self.state != FollowState::Following {
            return step;
        }

        // ── Recovery owns the motion while it runs ────────────────────────
        let pos = step.position;
        if let Some(d) =
            ctx.avoidance.step_recovery(&mut self.avoidance, ctx.store, me, ctx.now, ctx.dt)
        {
            step.position = pos + d.flat();
            step.hold_residual = true;
            step.lateral_weight = 0.0;
            self.avoidance.lateral_weight = 0.0;
            return step;
        }

        // ── Sense & decide ────────────────────────────────────────────────
        let out = ctx.avoidance.evaluate(&mut self.avoidance, ctx.scene, ctx.store, me, ctx.now, ctx.dt);
        step.lateral_weight = out.proposal.lateral_weight;

        // ── Move ──────────────────────────────────────────────────────────
        let Some(node) = self.route.target(ctx.graph, self.current) else {
            // Index ran past the route without completing; stop cleanly.
            self.complete(me, &mut step);
            return step;
        };
        let node_pos = ctx.graph.position(node).with_y(pos.y);
        let yaw = step.yaw;
        let target = node_pos + ctx.avoidance.lane_offset(Vec3::from_yaw(yaw), out.proposal.lateral_weight);

        let passengers = ctx.store.passengers[me.index()];
        let speed = self.config.cruise_speed(passengers) * out.proposal.speed_multiplier;
        let new_pos = pos.move_towards(target, speed * ctx.dt);

        let travel = (target - pos).flat();
        if travel.length_sq() > 1e-8 {
            step.yaw = turn_towards(yaw, travel.yaw(), self.config.turn_rate * ctx.dt);
        }
        step.position = new_pos;

        // ── Arrival ───────────────────────────────────────────────────────
        let thr = self.config.arrival_threshold;
        if new_pos.flat_distance(target) < thr || new_pos.flat_distance(node_pos) < thr {
            self.current += 1;
            self.handle_leg_completions(me, &mut step);
        }
        step
    }

    /// Fire the events of every leg whose boundary `current` has reached.
    /// Stops early when a pickup starts boarding.
    fn handle_leg_completions(&mut self, me: AgentId, step: &mut FollowStep) {
        let legs = self.route.leg_count();
        while self.legs_done < legs && self.state == FollowState::Following {
            let Some(boundary) = self.route.boundary(self.legs_done) else { break };
            if self.current < boundary {
                break;
            }
            let leg = self.legs_done;
            self.legs_done += 1;

            if self.legs_done == legs {
                self.complete(me, step);
            } else if leg == 0 {
                tracing::info!(agent = %me, "reached pickup; passenger boarding");
                step.picked_up = true;
                step.status = Some(TripStatus::LoadingPassenger);
                self.boarding.start(me);
                self.state = FollowState::Loading;
            } else if leg == 1 {
                tracing::info!(agent = %me, "passenger dropped off; returning to start");
                step.status = Some(TripStatus::ReturningToStart);
            }
        }
    }

    fn complete(&mut self, me: AgentId, step: &mut FollowStep) {
        tracing::info!(agent = %me, "returned to start; trip complete");
        self.state = FollowState::Completed;
        self.current = self.route.len();
        step.status = Some(TripStatus::ReturnedToStart);
    }
}
