//! Listener-relative polar positioning.
//!
//! The external spatializer wants a source described as (azimuth, elevation,
//! distance) relative to the listener's head, while the host engine works in
//! world-space transforms. [`polar_position`] is the stateless conversion
//! between the two. Only the handful of vector/quaternion operations that
//! conversion needs live here; this is deliberately not a general-purpose
//! math library.

use libm::{asinf, atan2f, cosf, sinf, sqrtf};

/// Distance floor in world units. Downstream attenuation divides by the
/// distance, so it must never reach zero.
pub const DISTANCE_EPSILON: f32 = 0.001;

const RAD_TO_DEG: f32 = 180.0 / core::f32::consts::PI;

/// A position or direction in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    /// X component.
    pub x: f32,
    /// Y component (up).
    pub y: f32,
    /// Z component.
    pub z: f32,
}

impl Vec3 {
    /// The zero vector.
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);

    /// Creates a vector from components.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean length.
    pub fn length(self) -> f32 {
        sqrtf(self.x * self.x + self.y * self.y + self.z * self.z)
    }

    fn cross(self, other: Vec3) -> Vec3 {
        Vec3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }
}

impl core::ops::Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl core::ops::Add for Vec3 {
    type Output = Vec3;

    fn add(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl core::ops::Mul<f32> for Vec3 {
    type Output = Vec3;

    fn mul(self, scalar: f32) -> Vec3 {
        Vec3::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

/// A rotation, as a unit quaternion.
///
/// Callers are expected to hand in normalized quaternions (they come from
/// engine transforms, which keep them normalized); the rotation formulas
/// assume unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quat {
    /// Vector part, x.
    pub x: f32,
    /// Vector part, y.
    pub y: f32,
    /// Vector part, z.
    pub z: f32,
    /// Scalar part.
    pub w: f32,
}

impl Quat {
    /// The identity rotation.
    pub const IDENTITY: Quat = Quat::new(0.0, 0.0, 0.0, 1.0);

    /// Creates a quaternion from raw components.
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Rotation of `radians` around `axis`. The axis is normalized here, so
    /// any nonzero axis works; a zero axis yields the identity.
    pub fn from_axis_angle(axis: Vec3, radians: f32) -> Self {
        let len = axis.length();
        if len == 0.0 {
            return Quat::IDENTITY;
        }
        let half = radians * 0.5;
        let s = sinf(half) / len;
        Quat::new(axis.x * s, axis.y * s, axis.z * s, cosf(half))
    }

    /// Rotates a vector by this quaternion.
    pub fn rotate(self, v: Vec3) -> Vec3 {
        // v' = v + 2w(q × v) + 2(q × (q × v)), with q the vector part.
        let q = Vec3::new(self.x, self.y, self.z);
        let t = q.cross(v) * 2.0;
        v + t * self.w + q.cross(t)
    }

    /// Rotates a vector by the inverse of this quaternion, i.e. transforms
    /// a world-space vector into this rotation's local space.
    pub fn rotate_inverse(self, v: Vec3) -> Vec3 {
        // For a unit quaternion the inverse is the conjugate.
        Quat::new(-self.x, -self.y, -self.z, self.w).rotate(v)
    }
}

impl Default for Quat {
    fn default() -> Self {
        Quat::IDENTITY
    }
}

/// A world-space position and orientation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transform {
    /// World-space position.
    pub position: Vec3,
    /// World-space orientation.
    pub orientation: Quat,
}

impl Transform {
    /// Creates a transform from position and orientation.
    pub const fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// A transform at `position` with identity orientation.
    pub const fn from_position(position: Vec3) -> Self {
        Self::new(position, Quat::IDENTITY)
    }
}

/// A source position relative to a listener, in the spatializer's polar
/// convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarPosition {
    /// Degrees in \[-180, 180\]. 0 is straight ahead, 90 to the right.
    pub azimuth: f32,
    /// Degrees in \[-90, 90\]. 0 is level with the listener.
    pub elevation: f32,
    /// World units, at least [`DISTANCE_EPSILON`].
    pub distance: f32,
}

/// Computes a source's polar position relative to a listener.
///
/// The world-space delta is rotated into listener-local space by the
/// inverse of the listener's orientation, then the local Z axis is flipped:
/// the host engine's convention and the spatializer's disagree on
/// handedness, and the flip reconciles them.
///
/// Edge cases are pinned down rather than left to float arithmetic: a
/// source exactly on the listener's vertical axis has azimuth 0 (atan2 of
/// two zeros is unspecified territory), and the distance never drops below
/// [`DISTANCE_EPSILON`].
pub fn polar_position(source: Vec3, listener: &Transform) -> PolarPosition {
    let delta = source - listener.position;
    let mut local = listener.orientation.rotate_inverse(delta);
    local.z = -local.z;

    let mut distance = local.length();
    if distance < DISTANCE_EPSILON {
        distance = DISTANCE_EPSILON;
    }

    let azimuth = if local.x == 0.0 && local.z == 0.0 {
        0.0
    } else {
        atan2f(local.x, local.z) * RAD_TO_DEG
    };

    let elevation = asinf((local.y / distance).clamp(-1.0, 1.0)) * RAD_TO_DEG;

    PolarPosition {
        azimuth,
        elevation,
        distance,
    }
}
