//! The common currency of every hazard evaluator.

/// What one evaluator wants done this tick.
///
/// `lateral_weight` is `0` for lane centre and `1` for the full lane offset;
/// `speed_multiplier` scales the follower's speed.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Proposal {
    pub lateral_weight: f32,
    pub speed_multiplier: f32,
}

impl Proposal {
    /// No effect.
    pub const NONE: Proposal = Proposal { lateral_weight: 0.0, speed_multiplier: 1.0 };

    pub fn new(lateral_weight: f32, speed_multiplier: f32) -> Self {
        Self {
            lateral_weight: lateral_weight.clamp(0.0, 1.0),
            speed_multiplier: speed_multiplier.clamp(0.0, 1.0),
        }
    }

    /// Precedence rule: the larger offset and the lower speed both win.
    pub fn combine(self, other: Proposal) -> Proposal {
        Proposal {
            lateral_weight: self.lateral_weight.max(other.lateral_weight),
            speed_multiplier: self.speed_multiplier.min(other.speed_multiplier),
        }
    }
}

impl Default for Proposal {
    fn default() -> Self {
        Self::NONE
    }
}
