//! The `Sim` struct and its tick loop.

use taxi_agent::AgentStore;
use taxi_avoid::AvoidanceController;
use taxi_core::{AgentId, SimClock, SimConfig, Tick, Vec3};
use taxi_graph::WaypointGraph;
use taxi_nav::{BoardingActivity, FollowState, FollowStep, NavContext, PathFollower, TimedBoarding};

use crate::collision::{PairSet, touching_pairs};
use crate::{AgentScene, CollisionEvent, CollisionLog, SceneConfig, SimObserver, SimResult, StaticCollider};

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Sim<B>` holds all simulation state and drives the three-phase tick loop:
///
/// 1. **Compute** (optionally parallel with the `parallel` feature): every
///    live taxi's [`PathFollower`] senses the scene built from the previous
///    tick's [`AgentStore`], runs avoidance and returns a [`FollowStep`].
///    Followers only mutate their own state here.
/// 2. **Apply** (sequential, ascending `AgentId`): steps are written back to
///    the store, residual contact velocity is added and decays, telemetry is
///    updated.
/// 3. **Contacts**: bodies that started touching this tick are logged, pushed
///    apart and offered a collision recovery.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<B: BoardingActivity = TimedBoarding> {
    /// Tick length, total ticks, snapshot interval.
    pub config: SimConfig,

    /// Simulation clock.  Tracks the current tick and maps to sim seconds.
    pub clock: SimClock,

    /// The road network every route was planned on.
    pub graph: WaypointGraph,

    /// Agent state (SoA arrays).  Followers read it as the tick-stale
    /// snapshot; only the apply phase writes it.
    pub agents: AgentStore,

    /// One follower per agent, indexed by `AgentId`.
    pub followers: Vec<PathFollower<B>>,

    /// Shared avoidance and recovery logic.
    pub controller: AvoidanceController,

    pub scene: SceneConfig,
    pub statics: Vec<StaticCollider>,

    /// Pairs in contact at the end of the last tick.
    pub(crate) contacts: PairSet,

    pub collisions: CollisionLog,
}

/// What one tick did, for the observer.
pub(crate) struct TickReport {
    active: usize,
    collisions: Vec<CollisionEvent>,
}

impl<B: BoardingActivity + Send> Sim<B> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run the simulation from the current tick to `config.end_tick()`.
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        self.config.validate()?;
        while self.clock.current_tick < self.config.end_tick() {
            self.step(observer);
        }
        observer.on_sim_end(self.clock.current_tick);
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        self.config.validate()?;
        for _ in 0..n {
            self.step(observer);
        }
        Ok(())
    }

    /// Run until no taxi is still on its trip, or `config.end_tick()`.
    ///
    /// Returns `true` if every taxi finished (or never had a trip).
    pub fn run_until_complete<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<bool> {
        self.config.validate()?;
        while self.active_count() > 0 && self.clock.current_tick < self.config.end_tick() {
            self.step(observer);
        }
        observer.on_sim_end(self.clock.current_tick);
        let done = self.active_count() == 0;
        if !done {
            tracing::warn!(active = self.active_count(), "tick budget exhausted before every trip completed");
        }
        Ok(done)
    }

    /// Number of taxis following a route or loading a passenger.
    pub fn active_count(&self) -> usize {
        self.followers
            .iter()
            .enumerate()
            .filter(|(i, f)| f.is_active() && self.agents.is_alive(AgentId(*i as u32)))
            .count()
    }

    /// Sim seconds at the start of the next tick.
    pub fn now_secs(&self) -> f32 {
        self.clock.now_secs()
    }

    pub fn follower(&self, agent: AgentId) -> Option<&PathFollower<B>> {
        self.followers.get(agent.index())
    }

    /// Take `agent` out of the world.  Neighbours still holding its ID in a
    /// yield or recovery treat it as gone on their next tick.
    pub fn despawn(&mut self, agent: AgentId) {
        self.agents.despawn(agent);
        self.contacts.retain(|&(a, b)| a != agent && b != agent);
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn step<O: SimObserver>(&mut self, observer: &mut O) {
        let now = self.clock.current_tick;
        observer.on_tick_start(now);
        let report = self.process_tick(now);
        for event in &report.collisions {
            observer.on_collision(event);
        }
        observer.on_tick_end(now, report.active);
        if self.config.output_interval_ticks > 0 && now.0.is_multiple_of(self.config.output_interval_ticks) {
            let end_secs = self.clock.secs_at(now + 1);
            observer.on_snapshot(now, end_secs, &self.agents);
        }
        self.clock.advance();
    }

    pub(crate) fn process_tick(&mut self, now: Tick) -> TickReport {
        let t = self.clock.secs_at(now);
        let dt = self.config.tick_secs;

        // ── Phase 1: compute (produce) ────────────────────────────────────
        let steps = self.compute_steps(t, dt);

        // ── Phase 2: apply (consume) ──────────────────────────────────────
        //
        // Steps are indexed by AgentId, so this is ascending order.
        for (i, step) in steps.into_iter().enumerate() {
            if let Some(step) = step {
                self.apply_step(AgentId(i as u32), step, dt);
            }
        }

        // ── Phase 3: contacts ─────────────────────────────────────────────
        let collisions = self.detect_contacts(now, t + dt);

        TickReport { active: self.active_count(), collisions }
    }

    /// Run every live follower against the tick-stale snapshot.
    fn compute_steps(&mut self, now: f32, dt: f32) -> Vec<Option<FollowStep>> {
        // Explicit field borrows so the borrow checker sees disjoint access.
        let agents = &self.agents;
        let scene = AgentScene::new(agents, &self.statics, &self.scene);
        let ctx = NavContext {
            graph: &self.graph,
            store: agents,
            scene: &scene,
            avoidance: &self.controller,
            now,
            dt,
        };

        #[cfg(not(feature = "parallel"))]
        {
            self.followers
                .iter_mut()
                .enumerate()
                .map(|(i, f)| {
                    let me = AgentId(i as u32);
                    agents.is_alive(me).then(|| f.tick(&ctx, me))
                })
                .collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            self.followers
                .par_iter_mut()
                .enumerate()
                .map(|(i, f)| {
                    let me = AgentId(i as u32);
                    agents.is_alive(me).then(|| f.tick(&ctx, me))
                })
                .collect()
        }
    }

    /// Write one agent's step back into the store.
    fn apply_step(&mut self, agent: AgentId, step: FollowStep, dt: f32) {
        let i = agent.index();
        let moving = self.followers[i].is_active();

        let mut position = step.position;
        if step.hold_residual || !moving {
            self.agents.residual_velocity[i] = Vec3::ZERO;
        } else {
            let residual = self.agents.residual_velocity[i];
            position += residual.flat() * dt;
            self.agents.residual_velocity[i] = residual * (-self.scene.residual_damping * dt).exp();
        }

        self.agents.record_motion(agent, position, dt);
        self.agents.yaw[i] = step.yaw;
        self.agents.lateral_weight[i] = step.lateral_weight;
        self.agents.trip_secs[i] += step.trip_dt;
        if step.picked_up {
            self.agents.passengers[i] += 1;
        }
        if let Some(status) = step.status {
            tracing::debug!(%agent, %status, "status changed");
            self.agents.status[i] = status;
        }
    }

    /// Log new contacts, push the bodies apart and offer both a recovery.
    fn detect_contacts(&mut self, tick: Tick, time: f32) -> Vec<CollisionEvent> {
        let touching = touching_pairs(&self.agents, self.scene.body_radius);
        let mut events = Vec::new();

        for &(a, b) in &touching {
            if self.contacts.contains(&(a, b)) {
                continue;
            }
            let event = CollisionEvent::new(tick, time, a, b, &self.agents);
            tracing::info!(tick = tick.0, "{}", event.message);

            // Separation impulse along the line between centres.
            let mut dir = (self.agents.position[b.index()] - self.agents.position[a.index()])
                .flat()
                .normalized_or_zero();
            if dir == Vec3::ZERO {
                dir = self.agents.forward(a).right_of();
            }
            let push = dir * self.scene.separation_speed;
            self.agents.residual_velocity[a.index()] += -push;
            self.agents.residual_velocity[b.index()] += push;

            // Both sides decide independently; at most one of them yields.
            // Recovery is only stepped while following.
            for (me, other) in [(a, b), (b, a)] {
                if self.followers[me.index()].state() != FollowState::Following {
                    continue;
                }
                let f = &mut self.followers[me.index()];
                self.controller.on_contact(&mut f.avoidance, &self.agents, me, other, time);
            }

            self.collisions.record(event.clone());
            events.push(event);
        }

        self.contacts = touching.into_iter().collect();
        events
    }
}
