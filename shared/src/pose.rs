use glam::{Quat, Vec3};

/// World-space position and rotation of a replicated object.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Pose {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    pub fn distance(&self, other: &Pose) -> f32 {
        self.position.distance(other.position)
    }

    pub fn angle_degrees(&self, other: &Pose) -> f32 {
        angle_degrees(self.rotation, other.rotation)
    }
}

/// Angle between two rotations, in degrees
pub fn angle_degrees(a: Quat, b: Quat) -> f32 {
    a.angle_between(b).to_degrees()
}

/// Moves `current` toward `target` by at most `max_delta`, never past it.
/// A NaN or infinite step jumps straight to `target`.
pub fn move_towards(current: Vec3, target: Vec3, max_delta: f32) -> Vec3 {
    let delta = target - current;
    let distance = delta.length();
    if distance == 0.0 || max_delta.is_nan() || max_delta >= distance {
        return target;
    }
    current + delta / distance * max_delta.max(0.0)
}

/// Rotates `from` toward `to` by at most `max_degrees`, never past it.
/// A NaN or infinite step jumps straight to `to`.
pub fn rotate_towards(from: Quat, to: Quat, max_degrees: f32) -> Quat {
    let angle = angle_degrees(from, to);
    if angle == 0.0 || max_degrees.is_nan() || max_degrees >= angle {
        return to;
    }
    from.slerp(to, max_degrees.max(0.0) / angle)
}
