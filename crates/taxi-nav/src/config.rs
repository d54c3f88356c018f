//! Path follower settings and the passenger speed penalty.

/// How carrying passengers slows a taxi.
///
/// Both forms are non-increasing in the passenger count.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum SpeedPenalty {
    /// `1 − rate · n`
    Linear { rate: f32 },
    /// `(1 − rate)ⁿ`
    Compounding { rate: f32 },
}

impl SpeedPenalty {
    /// Speed multiplier for `passengers`, never below `floor` (nor above 1).
    pub fn multiplier(self, passengers: u32, floor: f32) -> f32 {
        let raw = match self {
            SpeedPenalty::Linear { rate } => 1.0 - rate.max(0.0) * passengers as f32,
            SpeedPenalty::Compounding { rate } => {
                (1.0 - rate.clamp(0.0, 1.0)).powi(passengers.min(i32::MAX as u32) as i32)
            }
        };
        raw.min(1.0).max(floor)
    }
}

impl Default for SpeedPenalty {
    fn default() -> Self {
        SpeedPenalty::Linear { rate: 0.1 }
    }
}

/// Per-taxi path following settings.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FollowerConfig {
    /// Cruising speed with no passengers and no hazards (m/s).
    pub base_speed: f32,
    /// Heading smoothing rate (1/s).
    pub turn_rate: f32,
    /// Distance at which a waypoint counts as reached (m).
    pub arrival_threshold: f32,
    pub penalty: SpeedPenalty,
    pub penalty_floor: f32,
}

impl Default for FollowerConfig {
    fn default() -> Self {
        Self {
            base_speed:        8.0,
            turn_rate:         5.0,
            arrival_threshold: 1.0,
            penalty:           SpeedPenalty::default(),
            penalty_floor:     0.2,
        }
    }
}

impl FollowerConfig {
    /// Base speed after the passenger penalty.
    pub fn cruise_speed(&self, passengers: u32) -> f32 {
        self.base_speed * self.penalty.multiplier(passengers, self.penalty_floor)
    }
}
