//! `taxi-output`: simulation output writers for the taxi navigation engine.
//!
//! | Backend | Files created                         |
//! |---------|---------------------------------------|
//! | CSV     | `telemetry.csv`, `collisions.csv`     |
//!
//! Backends implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `taxi_sim::SimObserver`.
//! Telemetry is written at the sim's snapshot interval; every new contact
//! becomes one collision row.
//!
//! # Usage
//!
//! ```rust,ignore
//! use taxi_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer);
//! sim.run(&mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::{SimOutputObserver, telemetry_rows};
pub use row::{CollisionRow, TelemetryRow};
pub use writer::OutputWriter;
