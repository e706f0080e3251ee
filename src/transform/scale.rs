use std::cell::Cell;

use glam::{Mat4, Vec3};

use super::Transform;

/// Axis-aligned scaling stage of the model transform.
pub struct Scale {
    factors: Vec3,
    cached: Cell<Option<Mat4>>,
}

impl Scale {
    pub fn new(factors: Vec3) -> Self {
        Self {
            factors,
            cached: Cell::new(None),
        }
    }

    /// Adds `delta` to the stored scale factors.
    ///
    /// A zero delta is a no-op and leaves the memoized matrix intact.
    pub fn change(&mut self, delta: Vec3) {
        if delta == Vec3::ZERO {
            return;
        }
        self.factors += delta;
        self.cached.set(None);
    }

    pub fn factors(&self) -> Vec3 {
        self.factors
    }
}

impl Transform for Scale {
    fn matrix(&self) -> Mat4 {
        if let Some(m) = self.cached.get() {
            return m;
        }
        let m = Mat4::from_scale(self.factors);
        self.cached.set(Some(m));
        m
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_is_diagonal() {
        let stage = Scale::new(Vec3::new(2.0, 3.0, 4.0));
        let m = stage.matrix();
        assert_eq!(m.x_axis.x, 2.0);
        assert_eq!(m.y_axis.y, 3.0);
        assert_eq!(m.z_axis.z, 4.0);
        assert_eq!(m.w_axis.w, 1.0);
    }

    #[test]
    fn zero_change_keeps_memo() {
        let mut stage = Scale::new(Vec3::ONE);
        let before = stage.matrix();
        stage.change(Vec3::ZERO);
        assert_eq!(stage.cached.get(), Some(before));
        stage.change(Vec3::new(0.5, 0.0, 0.0));
        assert!(stage.cached.get().is_none());
    }
}
