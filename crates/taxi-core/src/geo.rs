//! World-space vector type and planar heading helpers.
//!
//! `Vec3` uses `f32` components; road networks in this engine are a few
//! hundred metres across, so single precision is ample.  Everything that
//! steers an agent works on the **horizontal plane** (X/Z): use
//! [`Vec3::flat`] before measuring a distance that must ignore height.

use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// A point or direction in world space.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };
    pub const FORWARD: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 1.0 };

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Point on the ground plane (`y = 0`).
    #[inline]
    pub const fn ground(x: f32, z: f32) -> Self {
        Self { x, y: 0.0, z }
    }

    /// Projection onto the horizontal plane.
    #[inline]
    pub fn flat(self) -> Self {
        Self { x: self.x, y: 0.0, z: self.z }
    }

    /// Same point with its height replaced by `y`.
    #[inline]
    pub fn with_y(self, y: f32) -> Self {
        Self { x: self.x, y, z: self.z }
    }

    #[inline]
    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline]
    pub fn length_sq(self) -> f32 {
        self.dot(self)
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.length_sq().sqrt()
    }

    /// Euclidean distance, height included.
    #[inline]
    pub fn distance(self, other: Vec3) -> f32 {
        (other - self).length()
    }

    /// Distance on the horizontal plane only.
    #[inline]
    pub fn flat_distance(self, other: Vec3) -> f32 {
        (other - self).flat().length()
    }

    /// Unit vector in the same direction, or `ZERO` for a (near-)zero vector.
    pub fn normalized_or_zero(self) -> Vec3 {
        let len = self.length();
        if len > 1e-6 { self * (1.0 / len) } else { Vec3::ZERO }
    }

    /// Right-hand direction of a horizontal forward vector (`+Z` → `+X`).
    #[inline]
    pub fn right_of(self) -> Vec3 {
        Vec3::new(self.z, 0.0, -self.x)
    }

    /// Heading (yaw, radians) of this vector on the horizontal plane.
    /// `+Z` is yaw 0, `+X` is yaw π/2.
    #[inline]
    pub fn yaw(self) -> f32 {
        self.x.atan2(self.z)
    }

    /// Horizontal unit vector pointing along `yaw`.
    #[inline]
    pub fn from_yaw(yaw: f32) -> Vec3 {
        Vec3::new(yaw.sin(), 0.0, yaw.cos())
    }

    /// Move from `self` toward `target` by at most `max_step`, never past it.
    pub fn move_towards(self, target: Vec3, max_step: f32) -> Vec3 {
        let delta = target - self;
        let dist = delta.length();
        if dist <= max_step || dist <= 1e-6 {
            target
        } else {
            self + delta * (max_step / dist)
        }
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    #[inline]
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec3) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    #[inline]
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

impl std::fmt::Display for Vec3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}

// ── Headings ──────────────────────────────────────────────────────────────────

/// Signed smallest angle (radians) that turns `from` onto `to`, in `(-π, π]`.
pub fn yaw_delta(from: f32, to: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let mut d = (to - from) % TAU;
    if d > PI {
        d -= TAU;
    } else if d <= -PI {
        d += TAU;
    }
    d
}

/// Turn `current` toward `target` by the fraction `t` of the remaining angle
/// (clamped to `[0, 1]`).  This is the frame-rate-dependent smoothing a
/// `turn_rate * dt` factor gives: fast when far off, easing in near the end.
pub fn turn_towards(current: f32, target: f32, t: f32) -> f32 {
    current + yaw_delta(current, target) * t.clamp(0.0, 1.0)
}

/// Inverse of linear interpolation: where `v` sits between `a` and `b`,
/// clamped to `[0, 1]`.  Returns `1.0` when the range is empty.
pub fn inverse_lerp(a: f32, b: f32, v: f32) -> f32 {
    if (b - a).abs() <= f32::EPSILON {
        return 1.0;
    }
    ((v - a) / (b - a)).clamp(0.0, 1.0)
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Step `current` toward `target` by at most `max_delta`.
#[inline]
pub fn approach(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + max_delta.copysign(target - current)
    }
}
