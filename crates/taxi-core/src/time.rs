//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `Tick` counter; every tick advances
//! simulated time by a fixed `tick_secs`:
//!
//!   sim_time = tick * tick_secs
//!
//! The tick is the canonical unit for ordering and output; seconds are what
//! the control loop integrates with (speeds in m/s, timeouts in s).  Using a
//! fixed step keeps runs bit-for-bit reproducible.

use std::fmt;

use crate::{CoreError, CoreResult};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Converts between tick counts and simulated seconds.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Simulated seconds per tick.
    pub tick_secs: f32,
    /// The current tick, advanced by `SimClock::advance()` each iteration.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(tick_secs: f32) -> Self {
        Self { tick_secs, current_tick: Tick::ZERO }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Simulated seconds at the start of `current_tick`.
    #[inline]
    pub fn now_secs(&self) -> f32 {
        self.secs_at(self.current_tick)
    }

    /// Simulated seconds at the start of `tick`.
    #[inline]
    pub fn secs_at(&self, tick: Tick) -> f32 {
        (tick.0 as f64 * self.tick_secs as f64) as f32
    }

    /// How many ticks span `secs` seconds (rounded up).
    #[inline]
    pub fn ticks_for_secs(&self, secs: f32) -> u64 {
        (secs / self.tick_secs).ceil().max(0.0) as u64
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2} s)", self.current_tick, self.now_secs())
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Typically loaded from a JSON scenario by the application crate and passed
/// to the simulation builder.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Simulated seconds per tick.  Default: 1/50 s.
    pub tick_secs: f32,

    /// Hard upper bound on ticks to simulate.  `run` stops here even if some
    /// taxis have not completed their trip.
    pub total_ticks: u64,

    /// Take a telemetry snapshot every N ticks.  `0` disables snapshots.
    pub output_interval_ticks: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_secs:             0.02,
            total_ticks:           50 * 600, // ten simulated minutes
            output_interval_ticks: 25,
        }
    }
}

impl SimConfig {
    /// The tick at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.tick_secs)
    }

    /// Reject step sizes the integrator cannot work with.
    pub fn validate(&self) -> CoreResult<()> {
        if !self.tick_secs.is_finite() || self.tick_secs <= 0.0 {
            return Err(CoreError::Config(format!(
                "tick_secs must be a positive number, got {}",
                self.tick_secs
            )));
        }
        if self.tick_secs > 1.0 {
            return Err(CoreError::Config(format!(
                "tick_secs {} is too coarse for per-tick avoidance (max 1.0)",
                self.tick_secs
            )));
        }
        Ok(())
    }
}
