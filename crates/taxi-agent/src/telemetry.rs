//! Per-agent trip telemetry: status labels, speed measurement settings, and
//! the read-only view handed to dashboards and output writers.

use std::fmt;

// ── TripStatus ────────────────────────────────────────────────────────────────

/// Where a taxi is in its pickup-and-return trip.
///
/// The display strings are what a status dashboard shows; keep them stable.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TripStatus {
    /// No valid route; the taxi never moves.
    #[default]
    Idle,
    HeadingToPickup,
    LoadingPassenger,
    PassengerPickedUp,
    ReturningToStart,
    /// Terminal.
    ReturnedToStart,
}

impl TripStatus {
    pub fn label(self) -> &'static str {
        match self {
            TripStatus::Idle              => "Idle",
            TripStatus::HeadingToPickup   => "Heading to pickup",
            TripStatus::LoadingPassenger  => "Loading passenger",
            TripStatus::PassengerPickedUp => "Passenger picked up",
            TripStatus::ReturningToStart  => "Returning to start",
            TripStatus::ReturnedToStart   => "Returned to start",
        }
    }

    /// `true` once the trip can no longer change.
    pub fn is_terminal(self) -> bool {
        self == TripStatus::ReturnedToStart
    }
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── TelemetryConfig ───────────────────────────────────────────────────────────

/// How live speed is measured from per-tick displacement.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TelemetryConfig {
    /// Measured speeds below this (m/s) read as standing still.
    pub min_speed: f32,
    /// Exponential smoothing rate (1/s).  `0` disables smoothing.
    pub smoothing: f32,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self { min_speed: 0.02, smoothing: 8.0 }
    }
}

impl TelemetryConfig {
    /// Blend factor toward the newest measurement for a step of `dt` seconds.
    pub fn blend(&self, dt: f32) -> f32 {
        if self.smoothing <= 0.0 {
            1.0
        } else {
            1.0 - (-self.smoothing * dt).exp()
        }
    }
}

// ── Telemetry view ────────────────────────────────────────────────────────────

/// Read-only snapshot of one agent's published fields.
#[derive(Clone, Debug, PartialEq)]
pub struct Telemetry<'a> {
    pub name: &'a str,
    /// Smoothed measured speed (m/s).
    pub speed: f32,
    /// Cumulative distance travelled (m).
    pub distance: f32,
    pub passengers: u32,
    pub status: TripStatus,
    /// Seconds since the trip started; frozen once it completes.
    pub trip_secs: f32,
}
