use std::cell::Cell;

use glam::{Mat4, Vec3};

use super::Transform;

/// Translation stage of the model transform.
pub struct Translate {
    offset: Vec3,
    cached: Cell<Option<Mat4>>,
}

impl Translate {
    pub fn new(offset: Vec3) -> Self {
        Self {
            offset,
            cached: Cell::new(None),
        }
    }

    /// Adds `delta` to the stored offset.
    ///
    /// A zero delta is a no-op and leaves the memoized matrix intact.
    pub fn change(&mut self, delta: Vec3) {
        if delta == Vec3::ZERO {
            return;
        }
        self.offset += delta;
        self.cached.set(None);
    }

    pub fn offset(&self) -> Vec3 {
        self.offset
    }
}

impl Transform for Translate {
    fn matrix(&self) -> Mat4 {
        if let Some(m) = self.cached.get() {
            return m;
        }
        let m = Mat4::from_translation(self.offset);
        self.cached.set(Some(m));
        m
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nonzero_change_updates_matrix() {
        let mut stage = Translate::new(Vec3::ZERO);
        let before = stage.matrix();
        stage.change(Vec3::new(1.0, 2.0, 3.0));
        let after = stage.matrix();
        assert_ne!(before, after);
        assert_eq!(after.w_axis.truncate(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn zero_change_keeps_memo() {
        let mut stage = Translate::new(Vec3::new(0.5, 0.0, 0.0));
        let before = stage.matrix();
        assert!(stage.cached.get().is_some());
        stage.change(Vec3::ZERO);
        assert_eq!(stage.cached.get(), Some(before));
    }
}
