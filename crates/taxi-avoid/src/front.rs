//! Front hazard: slow down for, or step around, whatever is ahead.

use taxi_agent::AgentStore;
use taxi_core::AgentId;
use taxi_core::geo::{inverse_lerp, lerp};

use crate::{AvoidanceConfig, Hazard, HazardSensor, Proposal, SceneQuery};

/// How urgent the hazard ahead is.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FrontSeverity {
    #[default]
    Clear,
    Approaching,
    Imminent,
}

/// Result of one front evaluation.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrontAssessment {
    pub severity: FrontSeverity,
    /// Agent ahead, if any.
    pub hazard: Option<AgentId>,
    pub distance: f32,
    /// Time to contact; infinite when nothing is ahead.
    pub ttc: f32,
    pub proposal: Proposal,
}

impl FrontAssessment {
    /// Imminent hazard with the right side blocked: a full stop.
    #[inline]
    pub fn is_blocked(&self) -> bool {
        self.severity == FrontSeverity::Imminent && self.proposal.speed_multiplier <= 0.0
    }

    fn clear() -> Self {
        Self {
            severity: FrontSeverity::Clear,
            hazard: None,
            distance: f32::INFINITY,
            ttc: f32::INFINITY,
            proposal: Proposal::NONE,
        }
    }
}

/// Closing speed toward an agent ahead, given both speeds and the cosine of
/// the angle between the two headings.
///
/// Same heading: own minus other.  Opposing: the sum.  Anything in between
/// is treated as if the other agent were standing still.
pub fn closing_speed(cfg: &AvoidanceConfig, own_speed: f32, other_speed: f32, heading_cos: f32) -> f32 {
    if heading_cos >= cfg.heading_parallel_cos {
        own_speed - other_speed
    } else if heading_cos <= -cfg.heading_parallel_cos {
        own_speed + other_speed
    } else {
        own_speed
    }
}

/// Map a hazard at `distance` closing at `closing` to a proposal.
///
/// `right_is_clear` is only consulted for an imminent hazard.
pub fn respond(
    cfg: &AvoidanceConfig,
    distance: f32,
    closing: f32,
    right_is_clear: impl FnOnce() -> bool,
) -> (FrontSeverity, f32, Proposal) {
    let ttc = distance / closing.max(cfg.closing_epsilon);

    if distance <= cfg.hard_stop_distance || ttc <= cfg.hard_stop_ttc {
        let p = if right_is_clear() {
            Proposal::new(1.0, cfg.imminent_sidestep_speed)
        } else {
            Proposal::new(cfg.blocked_lateral_weight, 0.0)
        };
        return (FrontSeverity::Imminent, ttc, p);
    }

    if distance <= cfg.safe_following_distance || ttc <= cfg.slow_ttc {
        let t_dist = inverse_lerp(cfg.hard_stop_distance, cfg.safe_following_distance, distance);
        let t_ttc = inverse_lerp(cfg.hard_stop_ttc, cfg.slow_ttc, ttc);
        let t = t_dist.min(t_ttc);
        let p = Proposal::new(
            cfg.approach_lateral_max * (1.0 - t),
            lerp(cfg.approach_speed_floor, 1.0, t),
        );
        return (FrontSeverity::Approaching, ttc, p);
    }

    (FrontSeverity::Clear, ttc, Proposal::NONE)
}

/// Cast ahead of `me` and decide how to respond.
pub fn evaluate_front<S: SceneQuery + ?Sized>(
    cfg: &AvoidanceConfig,
    sensor: &HazardSensor,
    scene: &S,
    store: &AgentStore,
    me: AgentId,
) -> FrontAssessment {
    let i = me.index();
    let pos = store.position[i];
    let fwd = store.forward(me);
    let speed = store.speed[i];

    let Some(Hazard { agent, distance }) =
        sensor.cast_for_hazard(scene, me, pos, fwd, cfg.front_cast_distance(speed), cfg.cast_radius)
    else {
        return FrontAssessment::clear();
    };

    // The scene only reports live bodies, but the store is the authority.
    if !store.is_alive(agent) {
        return FrontAssessment::clear();
    }

    let heading_cos = fwd.dot(store.forward(agent));
    let closing = closing_speed(cfg, speed, store.speed[agent.index()], heading_cos);

    let right = fwd.right_of();
    let reach = cfg.lane_offset_distance + cfg.right_clearance_extra;
    let (severity, ttc, proposal) = respond(cfg, distance, closing, || {
        sensor.is_clear(scene, me, pos, right, reach, cfg.cast_radius)
    });

    FrontAssessment { severity, hazard: Some(agent), distance, ttc, proposal }
}
