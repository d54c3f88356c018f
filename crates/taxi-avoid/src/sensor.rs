//! Hazard detection on top of a [`SceneQuery`].

use taxi_core::{AgentId, Vec3};

use crate::{LayerMask, SceneHit, SceneQuery};

/// The nearest other agent a cast found.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Hazard {
    pub agent: AgentId,
    pub distance: f32,
}

/// Issues hazard and clearance casts from an agent's frame.
#[derive(Copy, Clone, Debug)]
pub struct HazardSensor {
    /// Layers hazard casts look at.
    pub hazard_layers: LayerMask,
    /// Layers a clearance check must find empty.
    pub clearance_layers: LayerMask,
}

impl Default for HazardSensor {
    fn default() -> Self {
        Self {
            hazard_layers: LayerMask::AGENTS,
            clearance_layers: LayerMask::AGENTS | LayerMask::STATIC,
        }
    }
}

impl HazardSensor {
    /// Nearest other agent along `direction`, or `None`.
    ///
    /// Hits on `me`'s own body and hits with no agent owner are dropped.  The
    /// remaining hits are sorted here; the scene's ordering is not trusted.
    pub fn cast_for_hazard<S: SceneQuery + ?Sized>(
        &self,
        scene: &S,
        me: AgentId,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        radius: f32,
    ) -> Option<Hazard> {
        if max_distance <= 0.0 {
            return None;
        }
        let mut hits: Vec<(AgentId, f32)> = scene
            .cast(origin, direction, max_distance, radius.max(0.0), self.hazard_layers)
            .into_iter()
            .filter_map(|h| match h.owner {
                Some(owner) if owner != me && h.distance.is_finite() => Some((owner, h.distance)),
                _ => None,
            })
            .collect();
        // Stable sort on distance, then id, so equal distances resolve the
        // same way whatever order the scene reported them in.
        hits.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        hits.first().map(|&(agent, distance)| Hazard { agent, distance })
    }

    /// `true` if nothing but `me` lies along `direction` within `distance`.
    pub fn is_clear<S: SceneQuery + ?Sized>(
        &self,
        scene: &S,
        me: AgentId,
        origin: Vec3,
        direction: Vec3,
        distance: f32,
        radius: f32,
    ) -> bool {
        scene
            .cast(origin, direction, distance, radius.max(0.0), self.clearance_layers)
            .iter()
            .all(|h: &SceneHit| h.owner == Some(me))
    }
}
