use std::cell::Cell;

use glam::{Mat4, Vec3};

use super::Transform;

/// Euler-angle rotation stage. Angles are stored in degrees and applied in
/// the fixed order `rotate_x * rotate_y * rotate_z`.
pub struct Rotate {
    angles_deg: Vec3,
    cached: Cell<Option<Mat4>>,
}

fn rotate_x(deg: f32) -> Mat4 {
    Mat4::from_rotation_x(deg.to_radians())
}

fn rotate_y(deg: f32) -> Mat4 {
    Mat4::from_rotation_y(deg.to_radians())
}

fn rotate_z(deg: f32) -> Mat4 {
    Mat4::from_rotation_z(deg.to_radians())
}

impl Rotate {
    pub fn new(angles_deg: Vec3) -> Self {
        Self {
            angles_deg,
            cached: Cell::new(None),
        }
    }

    /// Adds `delta` (degrees) to the stored angles.
    ///
    /// A zero delta is a no-op and leaves the memoized matrix intact.
    pub fn change(&mut self, delta: Vec3) {
        if delta == Vec3::ZERO {
            return;
        }
        self.angles_deg += delta;
        self.cached.set(None);
    }

    pub fn angles_deg(&self) -> Vec3 {
        self.angles_deg
    }
}

impl Transform for Rotate {
    fn matrix(&self) -> Mat4 {
        if let Some(m) = self.cached.get() {
            return m;
        }
        let Vec3 { x, y, z } = self.angles_deg;
        let m = rotate_x(x) * rotate_y(y) * rotate_z(z);
        self.cached.set(Some(m));
        m
    }
}
