//! The world the sensors see: agent bodies plus static colliders.
//!
//! Every live agent is a sphere of radius [`SceneConfig::body_radius`]
//! centred on its position.  Casts are swept spheres on the horizontal
//! plane; a cast that starts inside a body hits it at distance 0.

use taxi_agent::AgentStore;
use taxi_avoid::{LayerMask, SceneHit, SceneQuery};
use taxi_core::Vec3;

/// Body and contact settings.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SceneConfig {
    /// Radius of every agent's body (m).  Two bodies touch below twice this.
    pub body_radius: f32,
    /// Speed each agent is pushed apart with on a new contact (m/s).
    pub separation_speed: f32,
    /// Exponential decay rate of residual velocity (1/s).
    pub residual_damping: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            body_radius:      1.0,
            separation_speed: 1.5,
            residual_damping: 4.0,
        }
    }
}

/// A fixed obstacle (wall, kerb, parked car).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StaticCollider {
    pub center: Vec3,
    pub radius: f32,
}

/// [`SceneQuery`] over one tick's agent snapshot.
pub struct AgentScene<'a> {
    pub store: &'a AgentStore,
    pub statics: &'a [StaticCollider],
    pub body_radius: f32,
}

impl<'a> AgentScene<'a> {
    pub fn new(store: &'a AgentStore, statics: &'a [StaticCollider], config: &SceneConfig) -> Self {
        Self { store, statics, body_radius: config.body_radius }
    }

    /// Collider id of static `i`.  Agent colliders use the agent index, so
    /// statics are numbered after the last agent.
    fn static_id(&self, i: usize) -> u32 {
        (self.store.count + i) as u32
    }
}

/// Distance along `dir` at which a sphere of `radius` cast from `origin`
/// first touches the sphere (`center`, `body`), if within `max`.
pub(crate) fn sweep(origin: Vec3, dir: Vec3, max: f32, radius: f32, center: Vec3, body: f32) -> Option<f32> {
    let reach = body + radius;
    let oc = (center - origin).flat();
    let along = oc.dot(dir);
    let off2 = oc.length_sq() - along * along;
    if off2 > reach * reach {
        return None;
    }
    let half = (reach * reach - off2).sqrt();
    if along + half < 0.0 {
        // Entirely behind the origin.
        return None;
    }
    let t = (along - half).max(0.0);
    (t <= max).then_some(t)
}

impl SceneQuery for AgentScene<'_> {
    fn cast(&self, origin: Vec3, direction: Vec3, max_distance: f32, radius: f32, layers: LayerMask) -> Vec<SceneHit> {
        let dir = direction.flat().normalized_or_zero();
        if dir == Vec3::ZERO || max_distance < 0.0 {
            return Vec::new();
        }
        let mut hits = Vec::new();

        if layers.contains(LayerMask::AGENTS) {
            for agent in self.store.agent_ids().filter(|&a| self.store.is_alive(a)) {
                let center = self.store.position[agent.index()];
                if let Some(d) = sweep(origin, dir, max_distance, radius, center, self.body_radius) {
                    hits.push(SceneHit { owner: Some(agent), collider: agent.0, distance: d });
                }
            }
        }

        if layers.contains(LayerMask::STATIC) {
            for (i, s) in self.statics.iter().enumerate() {
                if let Some(d) = sweep(origin, dir, max_distance, radius, s.center, s.radius) {
                    hits.push(SceneHit { owner: None, collider: self.static_id(i), distance: d });
                }
            }
        }
        hits
    }
}
