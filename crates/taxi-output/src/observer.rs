//! `SimOutputObserver<W>` bridges `SimObserver` to an `OutputWriter`.

use taxi_agent::AgentStore;
use taxi_core::Tick;
use taxi_sim::{CollisionEvent, SimObserver};

use crate::row::{CollisionRow, TelemetryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes telemetry snapshots and collision events to
/// any [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

/// Telemetry rows for every live agent.
pub fn telemetry_rows(tick: Tick, time: f32, agents: &AgentStore) -> Vec<TelemetryRow> {
    agents
        .agent_ids()
        .filter(|&a| agents.is_alive(a))
        .filter_map(|a| {
            let t = agents.telemetry(a)?;
            let pos = agents.position[a.index()];
            Some(TelemetryRow {
                tick:           tick.0,
                time,
                agent:          a.0,
                name:           t.name.to_string(),
                x:              pos.x,
                z:              pos.z,
                speed:          t.speed,
                distance:       t.distance,
                passengers:     t.passengers,
                status:         t.status.label(),
                lateral_weight: agents.lateral_weight[a.index()],
            })
        })
        .collect()
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_snapshot(&mut self, tick: Tick, time: f32, agents: &AgentStore) {
        let rows = telemetry_rows(tick, time, agents);
        if !rows.is_empty() {
            let result = self.writer.write_telemetry(&rows);
            self.store_err(result);
        }
    }

    fn on_collision(&mut self, event: &CollisionEvent) {
        let row = CollisionRow {
            tick:    event.tick.0,
            time:    event.time,
            a:       event.a.0,
            b:       event.b.0,
            message: event.message.clone(),
        };
        let result = self.writer.write_collision(&row);
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
