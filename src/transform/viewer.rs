use std::cell::Cell;

use glam::{Mat4, Vec3, Vec4};

use super::Transform;

/// Viewing (look-at) stage. Holds the eye position, the point being looked
/// at, and the up hint, and produces the world-to-camera matrix.
pub struct Viewer {
    eye: Vec3,
    center: Vec3,
    up: Vec3,
    cached: Cell<Option<Mat4>>,
}

impl Viewer {
    pub fn new(eye: Vec3, center: Vec3, up: Vec3) -> Self {
        Self {
            eye,
            center,
            up,
            cached: Cell::new(None),
        }
    }

    /// Moves the eye position. A zero delta leaves the memoized matrix intact.
    pub fn change_eye(&mut self, delta: Vec3) {
        if delta == Vec3::ZERO {
            return;
        }
        self.eye += delta;
        self.cached.set(None);
    }

    /// Moves the look-at point. A zero delta leaves the memoized matrix intact.
    pub fn change_center(&mut self, delta: Vec3) {
        if delta == Vec3::ZERO {
            return;
        }
        self.center += delta;
        self.cached.set(None);
    }

    /// Tilts the up hint. A zero delta leaves the memoized matrix intact.
    pub fn change_up(&mut self, delta: Vec3) {
        if delta == Vec3::ZERO {
            return;
        }
        self.up += delta;
        self.cached.set(None);
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }
}

impl Transform for Viewer {
    fn matrix(&self) -> Mat4 {
        if let Some(m) = self.cached.get() {
            return m;
        }

        // Camera basis: forward out of the screen, right from the up hint,
        // then a recomputed orthogonal up.
        let z_axis = (self.center - self.eye).normalize();
        let x_axis = z_axis.cross(self.up).normalize();
        let y_axis = x_axis.cross(z_axis).normalize();

        let rot = Mat4::from_cols(
            Vec4::new(x_axis.x, y_axis.x, -z_axis.x, 0.0),
            Vec4::new(x_axis.y, y_axis.y, -z_axis.y, 0.0),
            Vec4::new(x_axis.z, y_axis.z, -z_axis.z, 0.0),
            Vec4::W,
        );
        let m = rot * Mat4::from_translation(-self.eye);
        self.cached.set(Some(m));
        m
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Mat4, b: Mat4) {
        for (x, y) in a.to_cols_array().iter().zip(b.to_cols_array().iter()) {
            assert!((x - y).abs() < 1e-5, "{a:?} != {b:?}");
        }
    }

    #[test]
    fn matches_glam_look_at() {
        let eye = Vec3::new(1.0, 2.0, 3.0);
        let center = Vec3::new(0.0, 0.5, 0.0);
        let up = Vec3::Y;
        let stage = Viewer::new(eye, center, up);
        assert_close(stage.matrix(), Mat4::look_at_rh(eye, center, up));
    }

    #[test]
    fn eye_change_invalidates_memo() {
        let mut stage = Viewer::new(Vec3::new(0.0, 0.0, 2.0), Vec3::ZERO, Vec3::Y);
        let before = stage.matrix();
        stage.change_eye(Vec3::ZERO);
        assert_eq!(stage.cached.get(), Some(before));
        stage.change_eye(Vec3::new(0.0, 1.0, 0.0));
        assert!(stage.cached.get().is_none());
        assert_ne!(stage.matrix(), before);
    }
}
