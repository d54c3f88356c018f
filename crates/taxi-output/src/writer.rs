//! The `OutputWriter` trait implemented by all backend writers.

use crate::{CollisionRow, OutputResult, TelemetryRow};

/// Trait implemented by output backends.
///
/// All methods are infallible from the observer's perspective; errors are
/// stored internally and retrieved with
/// [`SimOutputObserver::take_error`][crate::SimOutputObserver::take_error].
pub trait OutputWriter {
    /// Write a batch of telemetry rows (one snapshot).
    fn write_telemetry(&mut self, rows: &[TelemetryRow]) -> OutputResult<()>;

    /// Write one collision row.
    fn write_collision(&mut self, row: &CollisionRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
