use std::ops::{Add, Mul};

/// A point or offset in meters, Y up.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);
    pub const UP: Vec3 = Vec3::new(0.0, 1.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    fn cross(self, other: Vec3) -> Vec3 {
        Vec3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// Unit quaternion rotation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quat {
    pub const IDENTITY: Quat = Quat {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    /// Rotation of `degrees` around a unit `axis`.
    pub fn from_axis_angle(axis: Vec3, degrees: f32) -> Self {
        let half = degrees.to_radians() * 0.5;
        let s = half.sin();
        Self {
            x: axis.x * s,
            y: axis.y * s,
            z: axis.z * s,
            w: half.cos(),
        }
    }

    /// Euler angles in degrees, applied Z first, then X, then Y.
    pub fn from_euler_degrees(x: f32, y: f32, z: f32) -> Self {
        let qx = Self::from_axis_angle(Vec3::new(1.0, 0.0, 0.0), x);
        let qy = Self::from_axis_angle(Vec3::UP, y);
        let qz = Self::from_axis_angle(Vec3::new(0.0, 0.0, 1.0), z);
        qy * qx * qz
    }

    pub fn rotate(self, v: Vec3) -> Vec3 {
        // v' = v + 2w(q × v) + 2q × (q × v)
        let q = Vec3::new(self.x, self.y, self.z);
        let t = q.cross(v) * 2.0;
        v + t * self.w + q.cross(t)
    }
}

impl Mul for Quat {
    type Output = Quat;

    /// Hamilton product: `self * rhs` applies `rhs` first.
    fn mul(self, rhs: Quat) -> Quat {
        Quat {
            w: self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
            x: self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            y: self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            z: self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
        }
    }
}

/// Position and orientation, either in world space or relative to a parent.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Pose {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Rotates around the pose's own up axis.
    pub fn rotated_local_y(self, degrees: f32) -> Self {
        Self {
            position: self.position,
            rotation: self.rotation * Quat::from_axis_angle(Vec3::UP, degrees),
        }
    }

    /// Where `local` ends up when expressed relative to this pose.
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation.rotate(local)
    }
}
