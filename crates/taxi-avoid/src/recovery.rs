//! Post-contact recovery: the fallback when prediction failed and two agents
//! actually touched.
//!
//! The slower agent of the pair (ties broken by identity) takes over its own
//! motion from the path follower and runs:
//!
//! ```text
//! Inactive ─contact─▶ Sliding ─offset reached─▶ Waiting ─partner clear / max_wait─▶
//!     MergingForward ─forward_extra covered─▶ Inactive (cooldown)
//! ```
//!
//! `recovery_timeout` ends the maneuver from any phase.

use taxi_agent::AgentStore;
use taxi_core::{AgentId, Vec3};

use crate::RecoveryConfig;

/// Slack when comparing accumulated distance against a phase target.
const DONE_EPS: f32 = 1e-4;

/// Which agent of a touching pair yields.
///
/// Returns `true` if `me` yields to `other`.  Only speeds and identities go
/// in, so both agents reach complementary answers independently: exactly
/// one of `yields_to(a, .., b, ..)` and `yields_to(b, .., a, ..)` is `true`.
pub fn yields_to(me: AgentId, my_speed: f32, other: AgentId, other_speed: f32, epsilon: f32) -> bool {
    if (my_speed - other_speed).abs() <= epsilon {
        me > other
    } else {
        my_speed < other_speed
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RecoveryPhase {
    #[default]
    Inactive,
    Sliding,
    Waiting,
    MergingForward,
}

/// Per-agent recovery maneuver state.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecoveryState {
    pub phase: RecoveryPhase,
    /// Weak reference to the agent that was hit.
    pub partner: Option<AgentId>,
    /// Frame captured at contact.
    pub forward: Vec3,
    pub right: Vec3,
    /// Progress within the current phase (metres or seconds).
    pub phase_progress: f32,
    /// Seconds since contact.
    pub elapsed: f32,
    pub cooldown_until: f32,
}

impl RecoveryState {
    #[inline]
    pub fn is_active(&self) -> bool {
        self.phase != RecoveryPhase::Inactive
    }

    /// `true` if a new contact may start a recovery at `now`.
    #[inline]
    pub fn can_trigger(&self, now: f32) -> bool {
        !self.is_active() && now >= self.cooldown_until
    }

    /// Start recovering from contact with `partner`.
    pub fn begin(&mut self, partner: AgentId, forward: Vec3) {
        let forward = forward.flat().normalized_or_zero();
        self.phase = RecoveryPhase::Sliding;
        self.partner = Some(partner);
        self.forward = forward;
        self.right = forward.right_of();
        self.phase_progress = 0.0;
        self.elapsed = 0.0;
    }

    fn finish(&mut self, now: f32, cooldown: f32) {
        self.phase = RecoveryPhase::Inactive;
        self.partner = None;
        self.phase_progress = 0.0;
        self.elapsed = 0.0;
        self.cooldown_until = now + cooldown;
    }

    fn enter(&mut self, phase: RecoveryPhase) {
        self.phase = phase;
        self.phase_progress = 0.0;
    }

    /// Advance one tick.  Returns this tick's displacement for `me`, or
    /// `None` if no recovery is running.
    pub fn step(
        &mut self,
        cfg: &RecoveryConfig,
        store: &AgentStore,
        me: AgentId,
        now: f32,
        dt: f32,
    ) -> Option<Vec3> {
        if !self.is_active() {
            return None;
        }

        self.elapsed += dt;
        if self.elapsed >= cfg.recovery_timeout {
            tracing::debug!(agent = %me, phase = ?self.phase, "recovery timed out");
            self.finish(now, cfg.cooldown);
            return Some(Vec3::ZERO);
        }

        let motion = match self.phase {
            RecoveryPhase::Inactive => Vec3::ZERO,
            RecoveryPhase::Sliding => {
                let step = (cfg.slide_speed * dt).min(cfg.slide_offset - self.phase_progress).max(0.0);
                self.phase_progress += step;
                if self.phase_progress >= cfg.slide_offset - DONE_EPS {
                    self.enter(RecoveryPhase::Waiting);
                }
                self.right * step
            }
            RecoveryPhase::Waiting => {
                self.phase_progress += dt;
                let cleared = match self.partner {
                    Some(p) if store.is_alive(p) => {
                        let lead = (store.position[p.index()] - store.position[me.index()])
                            .flat()
                            .dot(self.forward);
                        lead > cfg.clearance_ahead
                    }
                    _ => true,
                };
                if cleared || self.phase_progress >= cfg.max_wait {
                    if !cleared {
                        tracing::debug!(agent = %me, "recovery wait expired; moving on");
                    }
                    self.enter(RecoveryPhase::MergingForward);
                }
                Vec3::ZERO
            }
            RecoveryPhase::MergingForward => {
                let step = (cfg.forward_speed * dt).min(cfg.forward_extra - self.phase_progress).max(0.0);
                self.phase_progress += step;
                let motion = self.forward * step;
                if self.phase_progress >= cfg.forward_extra - DONE_EPS {
                    tracing::debug!(agent = %me, "recovery complete");
                    self.finish(now, cfg.cooldown);
                }
                motion
            }
        };
        Some(motion)
    }
}
