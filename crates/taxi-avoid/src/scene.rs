//! The world-query seam.
//!
//! Avoidance never sees geometry directly.  It asks a [`SceneQuery`] to sweep
//! a sphere along a direction and gets back whatever the sweep touched.  The
//! simulation provides the real implementation; tests script one.

use std::ops::BitOr;

use taxi_core::{AgentId, Vec3};

/// Which collider layers a cast considers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    /// Agent bodies.
    pub const AGENTS: LayerMask = LayerMask(1);
    /// Walls, kerbs, parked props.
    pub const STATIC: LayerMask = LayerMask(1 << 1);
    pub const ALL: LayerMask = LayerMask(u32::MAX);

    #[inline]
    pub fn contains(self, other: LayerMask) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for LayerMask {
    type Output = LayerMask;
    fn bitor(self, rhs: LayerMask) -> LayerMask {
        LayerMask(self.0 | rhs.0)
    }
}

/// One thing a cast touched.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SceneHit {
    /// Agent whose body the collider belongs to; `None` for scenery.
    pub owner: Option<AgentId>,
    /// Scene-assigned collider identity.
    pub collider: u32,
    /// Distance along the cast at first contact.
    pub distance: f32,
}

/// Geometric query service.
///
/// Hits may come back in any order.
pub trait SceneQuery {
    /// Sweep a sphere of `radius` from `origin` along `direction` (unit,
    /// horizontal) for up to `max_distance`.  `radius == 0` is a ray.
    fn cast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        radius: f32,
        layers: LayerMask,
    ) -> Vec<SceneHit>;
}

impl<S: SceneQuery + ?Sized> SceneQuery for &S {
    fn cast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        radius: f32,
        layers: LayerMask,
    ) -> Vec<SceneHit> {
        (**self).cast(origin, direction, max_distance, radius, layers)
    }
}
