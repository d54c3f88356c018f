//! Thresholds for predictive avoidance and post-contact recovery.
//!
//! Distances are metres, speeds m/s, times seconds, rates per second.

/// Front-hazard, rear-yield, and lane-offset settings.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AvoidanceConfig {
    // ── Sensing ───────────────────────────────────────────────────────────
    /// Forward cast length at standstill.
    pub front_cast_base: f32,
    /// Extra forward cast length per m/s of own speed.
    pub front_lookahead_secs: f32,
    pub rear_cast_base: f32,
    pub rear_lookahead_secs: f32,
    /// Radius of the swept sphere for hazard casts.
    pub cast_radius: f32,

    // ── Front response ────────────────────────────────────────────────────
    pub hard_stop_distance: f32,
    pub hard_stop_ttc: f32,
    pub safe_following_distance: f32,
    pub slow_ttc: f32,
    /// Lowest speed multiplier while approaching (not imminent).
    pub approach_speed_floor: f32,
    /// Lateral weight at the most severe end of the approaching band.
    pub approach_lateral_max: f32,
    /// Speed multiplier while sidestepping an imminent hazard.
    pub imminent_sidestep_speed: f32,
    /// Lateral weight when imminent and the right side is blocked.
    pub blocked_lateral_weight: f32,
    /// Longest a blocked hard stop is held before the agent pushes past.
    pub hard_stop_timeout: f32,
    /// How long the forced sidestep lasts once a hard stop times out.
    /// A new hard stop cannot start during it.
    pub hard_stop_release: f32,
    /// How far past the lane offset the right side must be clear.
    pub right_clearance_extra: f32,
    /// `|cos|` of the heading angle above which two agents count as
    /// travelling the same (or opposite) way.
    pub heading_parallel_cos: f32,
    /// Floor on closing speed when computing time-to-contact.
    pub closing_epsilon: f32,

    // ── Rear yield ────────────────────────────────────────────────────────
    /// How far behind (along own forward) a trailer must be.
    pub behind_tolerance: f32,
    /// Half width of the lane corridor a trailer must be within.
    pub lane_corridor_half_width: f32,
    /// How much faster a trailer must be to be yielded to.
    pub faster_margin: f32,
    pub yield_speed_multiplier: f32,
    /// Lateral weight gain per second while yielding.
    pub yield_snap_rate: f32,
    /// Lateral weight decay per second once the yield ends.
    pub yield_merge_rate: f32,
    /// Forward progress required before a yield may end.
    pub yield_min_forward: f32,
    /// How far ahead the yielded-to agent must be before a yield may end.
    pub pass_clearance: f32,
    pub yield_timeout: f32,
    pub yield_cooldown: f32,

    // ── Steering ──────────────────────────────────────────────────────────
    /// Sideways target offset at lateral weight 1.
    pub lane_offset_distance: f32,
}

impl Default for AvoidanceConfig {
    fn default() -> Self {
        Self {
            front_cast_base:          4.0,
            front_lookahead_secs:     1.0,
            rear_cast_base:           4.0,
            rear_lookahead_secs:      1.0,
            cast_radius:              0.6,

            hard_stop_distance:       2.0,
            hard_stop_ttc:            0.75,
            safe_following_distance:  6.0,
            slow_ttc:                 2.5,
            approach_speed_floor:     0.3,
            approach_lateral_max:     0.5,
            imminent_sidestep_speed:  0.4,
            blocked_lateral_weight:   0.5,
            hard_stop_timeout:        3.0,
            hard_stop_release:        2.0,
            right_clearance_extra:    1.0,
            heading_parallel_cos:     0.5,
            closing_epsilon:          0.01,

            behind_tolerance:         0.5,
            lane_corridor_half_width: 1.5,
            faster_margin:            0.5,
            yield_speed_multiplier:   0.5,
            yield_snap_rate:          3.0,
            yield_merge_rate:         0.75,
            yield_min_forward:        4.0,
            pass_clearance:           3.0,
            yield_timeout:            8.0,
            yield_cooldown:           1.0,

            lane_offset_distance:     2.5,
        }
    }
}

impl AvoidanceConfig {
    /// Forward cast length at `speed`.
    #[inline]
    pub fn front_cast_distance(&self, speed: f32) -> f32 {
        self.front_cast_base + speed.max(0.0) * self.front_lookahead_secs
    }

    /// Rearward cast length at `speed`.
    #[inline]
    pub fn rear_cast_distance(&self, speed: f32) -> f32 {
        self.rear_cast_base + speed.max(0.0) * self.rear_lookahead_secs
    }
}

/// Post-contact recovery settings.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RecoveryConfig {
    /// Speeds closer than this are a tie, broken by agent identity.
    pub speed_epsilon: f32,
    /// Sideways distance of the slide.
    pub slide_offset: f32,
    pub slide_speed: f32,
    /// How far ahead the partner must get before the wait ends.
    pub clearance_ahead: f32,
    pub max_wait: f32,
    /// Forward distance covered after the wait.
    pub forward_extra: f32,
    pub forward_speed: f32,
    /// Hard bound on the whole maneuver.
    pub recovery_timeout: f32,
    pub cooldown: f32,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            speed_epsilon:    0.1,
            slide_offset:     2.0,
            slide_speed:      4.0,
            clearance_ahead:  3.0,
            max_wait:         4.0,
            forward_extra:    3.0,
            forward_speed:    3.0,
            recovery_timeout: 12.0,
            cooldown:         2.0,
        }
    }
}
