//! Plain data row types written by output backends.

/// One agent's published telemetry at a snapshot tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryRow {
    pub tick:           u64,
    /// Sim seconds at the end of the tick.
    pub time:           f32,
    pub agent:          u32,
    pub name:           String,
    pub x:              f32,
    pub z:              f32,
    /// Smoothed measured speed (m/s).
    pub speed:          f32,
    /// Cumulative distance (m).
    pub distance:       f32,
    pub passengers:     u32,
    /// Human-readable status label, e.g. `"Heading to pickup"`.
    pub status:         &'static str,
    pub lateral_weight: f32,
}

/// One new contact between two agents.
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionRow {
    pub tick:    u64,
    pub time:    f32,
    pub a:       u32,
    pub b:       u32,
    pub message: String,
}
