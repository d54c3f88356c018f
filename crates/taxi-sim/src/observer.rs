//! Simulation observer trait for progress reporting and data collection.

use taxi_agent::AgentStore;
use taxi_core::Tick;

use crate::CollisionEvent;

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: status printer
///
/// ```rust,ignore
/// struct StatusPrinter;
///
/// impl SimObserver for StatusPrinter {
///     fn on_snapshot(&mut self, tick: Tick, _time: f32, agents: &AgentStore) {
///         for a in agents.agent_ids() {
///             if let Some(t) = agents.telemetry(a) {
///                 println!("{tick} {}: {} ({:.1} m/s)", t.name, t.status, t.speed);
///             }
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick.
    ///
    /// `active` is the number of taxis still on their trip (following or
    /// loading) after this tick.
    fn on_tick_end(&mut self, _tick: Tick, _active: usize) {}

    /// Called once for every new contact, after the tick's apply phase.
    fn on_collision(&mut self, _event: &CollisionEvent) {}

    /// Called at snapshot intervals (every `config.output_interval_ticks` ticks).
    ///
    /// `time` is sim seconds at the end of the tick.  Provides read-only
    /// access to the full agent state so that output writers can record
    /// telemetry without the sim knowing about any output format.
    fn on_snapshot(&mut self, _tick: Tick, _time: f32, _agents: &AgentStore) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
