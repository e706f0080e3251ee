use std::cell::Cell;

use glam::{Mat4, Vec3};

use super::{FrustumParams, Projection, ProjectionMode, Rotate, Scale, Transform, Translate, Viewer};

/// Composite model-view-projection transform.
///
/// Owns one instance of every stage and memoizes three products
/// independently: the model half (`T * R * S`), the viewing half (`P * V`)
/// and their composition. Updating a model stage invalidates only the model
/// and composite memos; updating a view stage invalidates only the
/// view-project and composite memos. Interaction frames therefore never
/// recompute the half of the pipeline that did not change.
pub struct Mvp {
    translate: Translate,
    rotate: Rotate,
    scale: Scale,
    viewer: Viewer,
    projection: Projection,
    model_cache: Cell<Option<Mat4>>,
    view_project_cache: Cell<Option<Mat4>>,
    full_cache: Cell<Option<Mat4>>,
}

impl Mvp {
    /// Creates the composite transform for a viewport of the given size.
    ///
    /// The model starts untransformed, with the camera two units back on the
    /// z axis looking at the origin.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            translate: Translate::new(Vec3::ZERO),
            rotate: Rotate::new(Vec3::ZERO),
            scale: Scale::new(Vec3::ONE),
            viewer: Viewer::new(Vec3::new(0.0, 0.0, 2.0), Vec3::ZERO, Vec3::Y),
            projection: Projection::new(FrustumParams {
                aspect: width as f32 / height as f32,
                ..Default::default()
            }),
            model_cache: Cell::new(None),
            view_project_cache: Cell::new(None),
            full_cache: Cell::new(None),
        }
    }

    /// The model half of the pipeline: `translate * rotate * scale`.
    pub fn model_matrix(&self) -> Mat4 {
        if let Some(m) = self.model_cache.get() {
            return m;
        }
        let m = self.translate.matrix() * self.rotate.matrix() * self.scale.matrix();
        self.model_cache.set(Some(m));
        m
    }

    /// The viewing half of the pipeline: `projection * view`.
    pub fn view_project_matrix(&self) -> Mat4 {
        if let Some(m) = self.view_project_cache.get() {
            return m;
        }
        let m = self.projection.matrix() * self.viewer.matrix();
        self.view_project_cache.set(Some(m));
        m
    }

    fn invalidate_model(&self) {
        self.model_cache.set(None);
        self.full_cache.set(None);
    }

    fn invalidate_view(&self) {
        self.view_project_cache.set(None);
        self.full_cache.set(None);
    }

    /// Moves the model. A zero delta leaves every memo intact.
    pub fn update_translation(&mut self, delta: Vec3) {
        if delta == Vec3::ZERO {
            return;
        }
        self.translate.change(delta);
        self.invalidate_model();
    }

    /// Spins the model by Euler-angle degrees. A zero delta leaves every memo
    /// intact.
    pub fn update_rotation(&mut self, delta: Vec3) {
        if delta == Vec3::ZERO {
            return;
        }
        self.rotate.change(delta);
        self.invalidate_model();
    }

    /// Stretches the model. A zero delta leaves every memo intact.
    pub fn update_scaling(&mut self, delta: Vec3) {
        if delta == Vec3::ZERO {
            return;
        }
        self.scale.change(delta);
        self.invalidate_model();
    }

    /// Moves the eye position. A zero delta leaves every memo intact.
    pub fn update_eye(&mut self, delta: Vec3) {
        if delta == Vec3::ZERO {
            return;
        }
        self.viewer.change_eye(delta);
        self.invalidate_view();
    }

    /// Moves the look-at point. A zero delta leaves every memo intact.
    pub fn update_center(&mut self, delta: Vec3) {
        if delta == Vec3::ZERO {
            return;
        }
        self.viewer.change_center(delta);
        self.invalidate_view();
    }

    /// Tilts the camera's up hint. A zero delta leaves every memo intact.
    pub fn update_up(&mut self, delta: Vec3) {
        if delta == Vec3::ZERO {
            return;
        }
        self.viewer.change_up(delta);
        self.invalidate_view();
    }

    /// Tracks a viewport resize by updating the projection aspect ratio.
    pub fn set_viewport_size(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.projection.set_aspect(width as f32 / height as f32);
        self.invalidate_view();
    }

    /// Switches between perspective and orthogonal projection.
    pub fn set_project_mode(&mut self, mode: ProjectionMode) {
        self.projection.set_mode(mode);
        self.invalidate_view();
    }

    pub fn project_mode(&self) -> ProjectionMode {
        self.projection.mode()
    }

    /// Current eye position, needed by the lighting uniforms.
    pub fn eye_position(&self) -> Vec3 {
        self.viewer.eye()
    }

    /// Dumps the current matrices to stdout.
    pub fn debug_print(&self) {
        println!("model:\n{}", self.model_matrix());
        println!("view-project:\n{}", self.view_project_matrix());
        println!("mvp:\n{}", self.matrix());
    }
}

impl Transform for Mvp {
    /// The full composite: `view_project_matrix() * model_matrix()`.
    fn matrix(&self) -> Mat4 {
        if let Some(m) = self.full_cache.get() {
            return m;
        }
        let m = self.view_project_matrix() * self.model_matrix();
        self.full_cache.set(Some(m));
        m
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(m: Mat4) -> [u32; 16] {
        m.to_cols_array().map(f32::to_bits)
    }

    #[test]
    fn composite_is_product_of_halves() {
        let mut mvp = Mvp::new(800, 600);
        assert_eq!(mvp.matrix(), mvp.view_project_matrix() * mvp.model_matrix());

        mvp.update_translation(Vec3::new(0.3, -0.1, 0.0));
        mvp.update_rotation(Vec3::new(15.0, 30.0, 0.0));
        mvp.update_eye(Vec3::new(0.0, 0.5, 0.0));
        mvp.set_project_mode(ProjectionMode::Orthogonal);
        assert_eq!(mvp.matrix(), mvp.view_project_matrix() * mvp.model_matrix());
    }

    #[test]
    fn model_update_keeps_view_project_memo() {
        let mut mvp = Mvp::new(800, 600);
        let vp_before = mvp.view_project_matrix();
        mvp.matrix();

        mvp.update_translation(Vec3::new(1.0, 0.0, 0.0));
        // The viewing half must stay memoized, bit for bit.
        assert_eq!(
            mvp.view_project_cache.get().map(bits),
            Some(bits(vp_before))
        );
        assert!(mvp.model_cache.get().is_none());
        assert!(mvp.full_cache.get().is_none());
    }

    #[test]
    fn view_update_keeps_model_memo() {
        let mut mvp = Mvp::new(800, 600);
        mvp.update_scaling(Vec3::new(0.5, 0.5, 0.5));
        let model_before = mvp.model_matrix();
        mvp.matrix();

        mvp.update_center(Vec3::new(0.1, 0.0, 0.0));
        assert_eq!(mvp.model_cache.get().map(bits), Some(bits(model_before)));
        assert!(mvp.view_project_cache.get().is_none());
        assert!(mvp.full_cache.get().is_none());
    }

    #[test]
    fn zero_deltas_touch_nothing() {
        let mut mvp = Mvp::new(800, 600);
        let full = mvp.matrix();

        mvp.update_translation(Vec3::ZERO);
        mvp.update_rotation(Vec3::ZERO);
        mvp.update_scaling(Vec3::ZERO);
        mvp.update_eye(Vec3::ZERO);
        mvp.update_center(Vec3::ZERO);
        mvp.update_up(Vec3::ZERO);

        assert_eq!(mvp.full_cache.get().map(bits), Some(bits(full)));
        assert!(mvp.model_cache.get().is_some());
        assert!(mvp.view_project_cache.get().is_some());
    }

    #[test]
    fn viewport_resize_invalidates_view_half_only() {
        let mut mvp = Mvp::new(800, 600);
        let model = mvp.model_matrix();
        mvp.matrix();

        mvp.set_viewport_size(1024, 768);
        assert!(mvp.view_project_cache.get().is_none());
        assert_eq!(mvp.model_cache.get().map(bits), Some(bits(model)));
    }
}
