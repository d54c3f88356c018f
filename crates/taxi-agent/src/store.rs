//! Core agent storage: `AgentStore` (SoA data).
//!
//! Every `Vec` field has exactly `count` elements and the `AgentId` value is
//! the index into all of them:
//!
//! ```ignore
//! let pos = store.position[agent.index()];
//! ```
//!
//! Agents are never removed from the arrays.  Taking an agent out of the
//! world clears its `alive` flag instead, so that an `AgentId` held by a
//! neighbour's yield or recovery maneuver stays a valid index and can be
//! re-validated with [`AgentStore::is_alive`].

use taxi_core::{AgentId, Vec3};

use crate::{Telemetry, TelemetryConfig, TripStatus};

/// Structure-of-Arrays storage for all agent state.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentStore {
    /// Number of agents.  Equals the length of every SoA `Vec`.
    pub count: usize,

    // ── Identity ──────────────────────────────────────────────────────────
    /// Display name.
    pub name: Vec<String>,

    /// `false` once the agent has left the world.
    pub alive: Vec<bool>,

    // ── Pose ──────────────────────────────────────────────────────────────
    pub position: Vec<Vec3>,

    /// Heading on the horizontal plane, radians (`0` faces `+Z`).
    pub yaw: Vec<f32>,

    /// Velocity left over from contacts (separation impulses).  Decays each
    /// tick unless a maneuver zeroes it.
    pub residual_velocity: Vec<Vec3>,

    // ── Telemetry ─────────────────────────────────────────────────────────
    /// Smoothed measured speed (m/s).
    pub speed: Vec<f32>,

    /// Cumulative distance travelled (m).
    pub distance: Vec<f32>,

    pub passengers: Vec<u32>,

    pub status: Vec<TripStatus>,

    /// Elapsed trip time (s).
    pub trip_secs: Vec<f32>,

    /// Lateral blend weight avoidance applied on the last tick.
    pub lateral_weight: Vec<f32>,

    /// Speed measurement settings shared by all agents.
    pub telemetry_config: TelemetryConfig,
}

impl AgentStore {
    /// `true` if there are no agents.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Iterator over all `AgentId`s in ascending index order.
    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        (0..self.count as u32).map(AgentId)
    }

    /// `true` if `agent` is a row of this store and still in the world.
    ///
    /// This is the re-validation check for weak neighbour references.
    #[inline]
    pub fn is_alive(&self, agent: AgentId) -> bool {
        self.alive.get(agent.index()).copied().unwrap_or(false)
    }

    /// Remove `agent` from the world.  Its row keeps its last values.
    pub fn despawn(&mut self, agent: AgentId) {
        if let Some(a) = self.alive.get_mut(agent.index()) {
            *a = false;
            self.speed[agent.index()] = 0.0;
            self.residual_velocity[agent.index()] = Vec3::ZERO;
            tracing::debug!(%agent, "agent left the world");
        }
    }

    /// Horizontal unit vector the agent faces.
    #[inline]
    pub fn forward(&self, agent: AgentId) -> Vec3 {
        Vec3::from_yaw(self.yaw[agent.index()])
    }

    /// Published fields of `agent`, or `None` for an unknown ID.
    pub fn telemetry(&self, agent: AgentId) -> Option<Telemetry<'_>> {
        let i = agent.index();
        if i >= self.count {
            return None;
        }
        Some(Telemetry {
            name:       &self.name[i],
            speed:      self.speed[i],
            distance:   self.distance[i],
            passengers: self.passengers[i],
            status:     self.status[i],
            trip_secs:  self.trip_secs[i],
        })
    }

    // ── Apply-step writers ────────────────────────────────────────────────

    /// Move `agent` to `new_pos` over `dt` seconds and update its measured
    /// speed and odometer from the displacement.
    ///
    /// Speed readings below `min_speed` count as zero, and the published
    /// speed is exponentially smoothed toward the reading.
    pub fn record_motion(&mut self, agent: AgentId, new_pos: Vec3, dt: f32) {
        let i = agent.index();
        let moved = self.position[i].distance(new_pos);
        self.position[i] = new_pos;
        self.distance[i] += moved;

        if dt <= 0.0 {
            return;
        }
        let mut measured = moved / dt;
        if measured < self.telemetry_config.min_speed {
            measured = 0.0;
        }
        let t = self.telemetry_config.blend(dt);
        self.speed[i] += (measured - self.speed[i]) * t;
    }

    // ── Package-private constructor used by AgentStoreBuilder ─────────────

    pub(crate) fn new(
        names: Vec<String>,
        position: Vec<Vec3>,
        yaw: Vec<f32>,
        telemetry_config: TelemetryConfig,
    ) -> Self {
        let count = names.len();
        debug_assert_eq!(position.len(), count);
        debug_assert_eq!(yaw.len(), count);
        Self {
            count,
            name: names,
            alive: vec![true; count],
            position,
            yaw,
            residual_velocity: vec![Vec3::ZERO; count],
            speed: vec![0.0; count],
            distance: vec![0.0; count],
            passengers: vec![0; count],
            status: vec![TripStatus::Idle; count],
            trip_secs: vec![0.0; count],
            lateral_weight: vec![0.0; count],
            telemetry_config,
        }
    }
}
