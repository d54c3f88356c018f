//! Per-tick hazard response for one agent.
//!
//! [`AvoidanceController`] holds configuration and is shared by all agents;
//! each agent owns an [`AvoidanceState`].  A tick runs the front and rear
//! evaluators independently and combines their proposals with
//! [`Proposal::combine`] (larger lateral weight, lower speed).  The yield
//! state machine is advanced every tick even when the front proposal masks
//! its lateral weight, so a yield still starts, times out and cools down on
//! its own schedule.
//!
//! A blocked hard stop is bounded by `hard_stop_timeout`.  When it expires
//! the agent sidesteps at `imminent_sidestep_speed` for `hard_stop_release`
//! seconds whatever the clearance check says.

use taxi_agent::AgentStore;
use taxi_core::{AgentId, Vec3};

use crate::front::{FrontAssessment, FrontSeverity, evaluate_front};
use crate::recovery::yields_to;
use crate::{
    AvoidanceConfig, HazardSensor, Proposal, RecoveryConfig, RecoveryState, SceneQuery, YieldState,
};

/// Everything avoidance remembers about one agent between ticks.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AvoidanceState {
    pub yielding: YieldState,
    /// Most recent front evaluation.
    pub last_front: FrontAssessment,
    pub recovery: RecoveryState,
    /// Combined lateral weight applied on the last tick.
    pub lateral_weight: f32,
    /// Seconds the current blocked hard stop has been held.
    pub blocked_secs: f32,
    /// Forced sidestep after a hard stop timeout runs until this time.
    pub release_until: f32,
    /// The front response moved the agent sideways on the last tick.
    pub sidestepping: bool,
}

impl AvoidanceState {
    /// `true` while a maneuver is running: a front sidestep, a yield or a
    /// recovery.
    pub fn maneuver_active(&self) -> bool {
        self.sidestepping || self.yielding.is_active() || self.recovery.is_active()
    }
}

/// Output of one avoidance tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AvoidanceOutput {
    pub proposal: Proposal,
    pub front: FrontAssessment,
}

/// Shared avoidance logic.
#[derive(Clone, Debug, Default)]
pub struct AvoidanceController {
    pub config: AvoidanceConfig,
    pub recovery: RecoveryConfig,
    pub sensor: HazardSensor,
}

impl AvoidanceController {
    pub fn new(config: AvoidanceConfig, recovery: RecoveryConfig) -> Self {
        Self { config, recovery, sensor: HazardSensor::default() }
    }

    /// Run front and rear evaluation for `me` and return the combined
    /// proposal.  `now` is sim time in seconds.
    pub fn evaluate<S: SceneQuery + ?Sized>(
        &self,
        state: &mut AvoidanceState,
        scene: &S,
        store: &AgentStore,
        me: AgentId,
        now: f32,
        dt: f32,
    ) -> AvoidanceOutput {
        let front = evaluate_front(&self.config, &self.sensor, scene, store, me);
        let rear = state.yielding.update(&self.config, &self.sensor, scene, store, me, now, dt);

        let ahead = self.bound_hard_stop(state, &front, me, now, dt);
        state.sidestepping = front.severity == FrontSeverity::Imminent && ahead.speed_multiplier > 0.0;

        let proposal = ahead.combine(rear);
        state.last_front = front;
        state.lateral_weight = proposal.lateral_weight;
        AvoidanceOutput { proposal, front }
    }

    /// Front proposal after applying the hard stop timeout.
    fn bound_hard_stop(
        &self,
        state: &mut AvoidanceState,
        front: &FrontAssessment,
        me: AgentId,
        now: f32,
        dt: f32,
    ) -> Proposal {
        let forced = Proposal::new(1.0, self.config.imminent_sidestep_speed);
        if !front.is_blocked() {
            state.blocked_secs = 0.0;
            return front.proposal;
        }
        if now < state.release_until {
            return forced;
        }
        state.blocked_secs += dt;
        if state.blocked_secs < self.config.hard_stop_timeout {
            return front.proposal;
        }
        tracing::debug!(agent = %me, held = state.blocked_secs, "hard stop timed out; pushing past");
        state.blocked_secs = 0.0;
        state.release_until = now + self.config.hard_stop_release;
        forced
    }

    /// Lateral offset of the steering target for a given weight.
    #[inline]
    pub fn lane_offset(&self, forward: Vec3, weight: f32) -> Vec3 {
        forward.right_of() * (self.config.lane_offset_distance * weight)
    }

    /// React to a physical contact between `me` and `other`.
    ///
    /// Starts a recovery for `me` only if `me` is the yielding party, no
    /// yield or recovery is already running, and the recovery cooldown has
    /// passed.  Returns `true` if a recovery started.
    pub fn on_contact(
        &self,
        state: &mut AvoidanceState,
        store: &AgentStore,
        me: AgentId,
        other: AgentId,
        now: f32,
    ) -> bool {
        if state.maneuver_active() || !state.recovery.can_trigger(now) {
            return false;
        }
        let my_speed = store.speed[me.index()];
        let other_speed = store.speed.get(other.index()).copied().unwrap_or(0.0);
        if !yields_to(me, my_speed, other, other_speed, self.recovery.speed_epsilon) {
            return false;
        }
        tracing::debug!(agent = %me, partner = %other, "contact: starting recovery");
        state.recovery.begin(other, store.forward(me));
        state.lateral_weight = 0.0;
        true
    }

    /// Advance a running recovery.  `None` when no recovery is active.
    pub fn step_recovery(
        &self,
        state: &mut AvoidanceState,
        store: &AgentStore,
        me: AgentId,
        now: f32,
        dt: f32,
    ) -> Option<Vec3> {
        state.recovery.step(&self.recovery, store, me, now, dt)
    }
}
