//! The passenger boarding handoff.
//!
//! The follower only needs to know when boarding starts and when it is over;
//! whatever happens in between (animations, seat assignment) belongs to the
//! implementation.

use taxi_core::AgentId;

/// A multi-tick side activity run while a taxi waits at its pickup.
pub trait BoardingActivity {
    /// Boarding begins for `agent`.
    fn start(&mut self, agent: AgentId);

    /// Advance by `dt` seconds.  Returns `true` once boarding is complete.
    fn advance(&mut self, dt: f32) -> bool;
}

/// Boarding that simply takes a fixed number of seconds.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimedBoarding {
    pub duration: f32,
    elapsed: f32,
}

impl TimedBoarding {
    pub fn new(duration: f32) -> Self {
        Self { duration: duration.max(0.0), elapsed: 0.0 }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

impl Default for TimedBoarding {
    fn default() -> Self {
        Self::new(3.0)
    }
}

impl BoardingActivity for TimedBoarding {
    fn start(&mut self, _agent: AgentId) {
        self.elapsed = 0.0;
    }

    fn advance(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        self.elapsed >= self.duration
    }
}
