//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `telemetry.csv`
//! - `collisions.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{CollisionRow, OutputResult, TelemetryRow};

pub const TELEMETRY_HEADER: [&str; 11] = [
    "tick", "time", "agent", "name", "x", "z", "speed", "distance", "passengers", "status", "lateral_weight",
];

pub const COLLISION_HEADER: [&str; 5] = ["tick", "time", "a", "b", "message"];

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    telemetry:  Writer<File>,
    collisions: Writer<File>,
    finished:   bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    /// `dir` is created if it does not exist.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut telemetry = Writer::from_path(dir.join("telemetry.csv"))?;
        telemetry.write_record(TELEMETRY_HEADER)?;

        let mut collisions = Writer::from_path(dir.join("collisions.csv"))?;
        collisions.write_record(COLLISION_HEADER)?;

        Ok(Self {
            telemetry,
            collisions,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_telemetry(&mut self, rows: &[TelemetryRow]) -> OutputResult<()> {
        for row in rows {
            self.telemetry.write_record(&[
                row.tick.to_string(),
                format!("{:.3}", row.time),
                row.agent.to_string(),
                row.name.clone(),
                format!("{:.3}", row.x),
                format!("{:.3}", row.z),
                format!("{:.3}", row.speed),
                format!("{:.3}", row.distance),
                row.passengers.to_string(),
                row.status.to_string(),
                format!("{:.3}", row.lateral_weight),
            ])?;
        }
        Ok(())
    }

    fn write_collision(&mut self, row: &CollisionRow) -> OutputResult<()> {
        self.collisions.write_record(&[
            row.tick.to_string(),
            format!("{:.3}", row.time),
            row.a.to_string(),
            row.b.to_string(),
            row.message.clone(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.telemetry.flush()?;
        self.collisions.flush()?;
        Ok(())
    }
}
