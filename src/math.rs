// SPDX-License-Identifier: GPL-3.0-only

//! Minimal linear algebra for stream extrinsics
//!
//! Just enough 3D math to store and compose the rigid transforms relating
//! one stream's coordinate frame to another: 3-vectors, column-major 3x3
//! matrices, and poses. Deliberately not a general-purpose library.

use std::ops::{Add, Mul, Neg};

/// 3-component vector
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
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

impl Neg for Vec3 {
    type Output = Vec3;

    fn neg(self) -> Vec3 {
        self * -1.0
    }
}

/// 3x3 matrix stored column-major: each field is one column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat3 {
    pub x: Vec3,
    pub y: Vec3,
    pub z: Vec3,
}

impl Mat3 {
    pub const IDENTITY: Mat3 = Mat3 {
        x: Vec3::new(1.0, 0.0, 0.0),
        y: Vec3::new(0.0, 1.0, 0.0),
        z: Vec3::new(0.0, 0.0, 1.0),
    };

    pub const fn new(x: Vec3, y: Vec3, z: Vec3) -> Self {
        Self { x, y, z }
    }

    pub fn transpose(&self) -> Mat3 {
        Mat3::new(
            Vec3::new(self.x.x, self.y.x, self.z.x),
            Vec3::new(self.x.y, self.y.y, self.z.y),
            Vec3::new(self.x.z, self.y.z, self.z.z),
        )
    }
}

/// Matrix times vector: linear combination of the columns
impl Mul<Vec3> for Mat3 {
    type Output = Vec3;

    fn mul(self, rhs: Vec3) -> Vec3 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }
}

/// Matrix product: columns of `rhs` transformed by `self`
impl Mul<Mat3> for Mat3 {
    type Output = Mat3;

    fn mul(self, rhs: Mat3) -> Mat3 {
        Mat3::new(self * rhs.x, self * rhs.y, self * rhs.z)
    }
}

/// Rigid transform: a rotation followed by a translation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub orientation: Mat3,
    pub position: Vec3,
}

impl Pose {
    pub const IDENTITY: Pose = Pose {
        orientation: Mat3::IDENTITY,
        position: Vec3::ZERO,
    };

    /// Apply the transform to a point.
    pub fn transform(&self, point: Vec3) -> Vec3 {
        self.orientation * point + self.position
    }

    /// Inverse transform. Assumes the orientation is orthonormal, so its
    /// inverse is the transpose.
    pub fn inverse(&self) -> Pose {
        let inv = self.orientation.transpose();
        Pose {
            orientation: inv,
            position: -(inv * self.position),
        }
    }
}

/// Composition `a * b`: apply `b` first, then `a`
impl Mul for Pose {
    type Output = Pose;

    fn mul(self, rhs: Pose) -> Pose {
        Pose {
            orientation: self.orientation * rhs.orientation,
            position: self.position + self.orientation * rhs.position,
        }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Pose::IDENTITY
    }
}
