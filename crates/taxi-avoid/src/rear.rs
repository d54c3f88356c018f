//! Rear hazard: pull over to let a faster agent behind go past.
//!
//! # Lifecycle
//!
//! ```text
//!            trailer behind, in lane, faster, cooldown elapsed
//!  Inactive ───────────────────────────────────────────────────▶ Active(n)
//!     ▲                                                             │
//!     │   (progress ≥ min_forward AND n ahead by > pass_clearance)  │
//!     └────────────── OR n gone OR elapsed ≥ yield_timeout ◀────────┘
//! ```
//!
//! While active the yield belongs to `n`: no rear cast is made, so another
//! trailer cannot take it over.  Lateral weight snaps toward 1 while active
//! and merges back toward 0 after, at different rates.

use taxi_agent::AgentStore;
use taxi_core::geo::approach;
use taxi_core::{AgentId, Vec3};

use crate::{AvoidanceConfig, HazardSensor, Proposal, SceneQuery};

/// Per-agent yield maneuver state.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct YieldState {
    /// The agent being yielded to.  A weak reference: re-checked against the
    /// store every tick.
    pub neighbour: Option<AgentId>,
    /// Own position when the yield began.
    pub origin: Vec3,
    /// Own forward direction when the yield began.
    pub forward: Vec3,
    /// Seconds since the yield began.
    pub elapsed: f32,
    /// Current lateral blend weight in `[0, 1]`.
    pub weight: f32,
    /// Sim time before which no new yield may start.
    pub cooldown_until: f32,
}

/// Why a yield ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum YieldEnd {
    Passed,
    NeighbourGone,
    TimedOut,
}

impl YieldState {
    #[inline]
    pub fn is_active(&self) -> bool {
        self.neighbour.is_some()
    }

    fn begin(&mut self, neighbour: AgentId, origin: Vec3, forward: Vec3) {
        self.neighbour = Some(neighbour);
        self.origin = origin;
        self.forward = forward;
        self.elapsed = 0.0;
    }

    fn end(&mut self, now: f32, cooldown: f32) {
        self.neighbour = None;
        self.elapsed = 0.0;
        self.cooldown_until = now + cooldown;
    }

    /// Advance one tick and return the yield's proposal.
    pub fn update<S: SceneQuery + ?Sized>(
        &mut self,
        cfg: &AvoidanceConfig,
        sensor: &HazardSensor,
        scene: &S,
        store: &AgentStore,
        me: AgentId,
        now: f32,
        dt: f32,
    ) -> Proposal {
        let pos = store.position[me.index()];
        let fwd = store.forward(me);

        if let Some(n) = self.neighbour {
            self.elapsed += dt;
            if let Some(reason) = self.should_end(cfg, store, n, pos, fwd) {
                tracing::debug!(agent = %me, neighbour = %n, ?reason, "yield ended");
                self.end(now, cfg.yield_cooldown);
            }
        } else if now >= self.cooldown_until {
            if let Some(n) = find_trailer(cfg, sensor, scene, store, me) {
                tracing::debug!(agent = %me, neighbour = %n, "yielding to faster agent behind");
                self.begin(n, pos, fwd);
            }
        }

        let target = if self.is_active() { 1.0 } else { 0.0 };
        let rate = if self.is_active() { cfg.yield_snap_rate } else { cfg.yield_merge_rate };
        self.weight = approach(self.weight, target, rate * dt);

        if self.is_active() {
            Proposal::new(self.weight, cfg.yield_speed_multiplier)
        } else {
            Proposal::new(self.weight, 1.0)
        }
    }

    fn should_end(
        &self,
        cfg: &AvoidanceConfig,
        store: &AgentStore,
        n: AgentId,
        pos: Vec3,
        fwd: Vec3,
    ) -> Option<YieldEnd> {
        if !store.is_alive(n) {
            return Some(YieldEnd::NeighbourGone);
        }
        let progress = (pos - self.origin).flat().dot(self.forward);
        let lead = (store.position[n.index()] - pos).flat().dot(fwd);
        if progress >= cfg.yield_min_forward && lead > cfg.pass_clearance {
            return Some(YieldEnd::Passed);
        }
        if self.elapsed >= cfg.yield_timeout {
            return Some(YieldEnd::TimedOut);
        }
        None
    }
}

/// The agent behind `me` that `me` should yield to, if any.
///
/// It must be behind by more than `behind_tolerance`, inside the lane
/// corridor, and faster by more than `faster_margin`.
pub fn find_trailer<S: SceneQuery + ?Sized>(
    cfg: &AvoidanceConfig,
    sensor: &HazardSensor,
    scene: &S,
    store: &AgentStore,
    me: AgentId,
) -> Option<AgentId> {
    let i = me.index();
    let pos = store.position[i];
    let fwd = store.forward(me);
    let speed = store.speed[i];

    let hazard = sensor.cast_for_hazard(
        scene,
        me,
        pos,
        -fwd,
        cfg.rear_cast_distance(speed),
        cfg.cast_radius,
    )?;
    let other = hazard.agent;
    if !store.is_alive(other) {
        return None;
    }

    let rel = (store.position[other.index()] - pos).flat();
    let behind = rel.dot(fwd) < -cfg.behind_tolerance;
    let in_lane = rel.dot(fwd.right_of()).abs() <= cfg.lane_corridor_half_width;
    let faster = store.speed[other.index()] > speed + cfg.faster_margin;

    (behind && in_lane && faster).then_some(other)
}
