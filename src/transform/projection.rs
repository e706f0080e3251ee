use std::cell::Cell;

use glam::Mat4;

use super::Transform;

/// Which projection matrix [`Projection`] produces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProjectionMode {
    #[default]
    Perspective,
    Orthogonal,
}

/// Frustum parameters shared by both projection modes.
///
/// The perspective matrix uses `fovy_deg`/`aspect`/`near`/`far`; the
/// orthogonal matrix uses the box extents with the aspect ratio folded into
/// the horizontal scale so switching modes keeps proportions on screen.
#[derive(Clone, Copy, Debug)]
pub struct FrustumParams {
    pub near: f32,
    pub far: f32,
    pub fovy_deg: f32,
    pub aspect: f32,
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Default for FrustumParams {
    fn default() -> Self {
        Self {
            near: 0.001,
            far: 100.0,
            fovy_deg: 80.0,
            aspect: 4.0 / 3.0,
            left: -1.0,
            right: 1.0,
            top: 1.0,
            bottom: -1.0,
        }
    }
}

/// Projection stage, switchable between perspective and orthogonal.
pub struct Projection {
    params: FrustumParams,
    mode: ProjectionMode,
    cached: Cell<Option<Mat4>>,
}

impl Projection {
    pub fn new(params: FrustumParams) -> Self {
        Self {
            params,
            mode: ProjectionMode::default(),
            cached: Cell::new(None),
        }
    }

    /// Updates the viewport aspect ratio (width / height).
    pub fn set_aspect(&mut self, aspect: f32) {
        self.params.aspect = aspect;
        self.cached.set(None);
    }

    /// Switches between perspective and orthogonal projection.
    pub fn set_mode(&mut self, mode: ProjectionMode) {
        self.mode = mode;
        self.cached.set(None);
    }

    pub fn mode(&self) -> ProjectionMode {
        self.mode
    }

    fn perspective(&self) -> Mat4 {
        let p = &self.params;
        let tan_term = (p.fovy_deg.to_radians() * 0.5).tan();

        let x_scale = 1.0 / (tan_term * p.aspect);
        let y_scale = 1.0 / tan_term;
        let z_scale_a = (p.near + p.far) / (p.near - p.far);
        let z_scale_b = 2.0 * p.near * p.far / (p.near - p.far);

        // Rows written out, then transposed into glam's column-major layout.
        Mat4::from_cols_array(&[
            x_scale, 0.0, 0.0, 0.0, //
            0.0, y_scale, 0.0, 0.0, //
            0.0, 0.0, z_scale_a, z_scale_b, //
            0.0, 0.0, -1.0, 0.0,
        ])
        .transpose()
    }

    fn orthogonal(&self) -> Mat4 {
        let p = &self.params;
        let x_scale = 2.0 / ((p.right - p.left) * p.aspect);
        let y_scale = 2.0 / (p.top - p.bottom);
        let z_scale = 2.0 / (p.near - p.far);

        let x_trans = -(p.right + p.left) / (p.right - p.left);
        let y_trans = -(p.top + p.bottom) / (p.top - p.bottom);
        let z_trans = -(p.far + p.near) / (p.far - p.near);

        Mat4::from_cols_array(&[
            x_scale, 0.0, 0.0, x_trans, //
            0.0, y_scale, 0.0, y_trans, //
            0.0, 0.0, z_scale, z_trans, //
            0.0, 0.0, 0.0, 1.0,
        ])
        .transpose()
    }
}

impl Transform for Projection {
    fn matrix(&self) -> Mat4 {
        if let Some(m) = self.cached.get() {
            return m;
        }
        let m = match self.mode {
            ProjectionMode::Perspective => self.perspective(),
            ProjectionMode::Orthogonal => self.orthogonal(),
        };
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
    fn perspective_matches_gl_convention() {
        let params = FrustumParams {
            near: 0.1,
            far: 100.0,
            fovy_deg: 80.0,
            aspect: 1.5,
            ..Default::default()
        };
        let stage = Projection::new(params);
        let expected = Mat4::perspective_rh_gl(80.0_f32.to_radians(), 1.5, 0.1, 100.0);
        assert_close(stage.matrix(), expected);
    }

    #[test]
    fn mode_switch_changes_matrix() {
        let mut stage = Projection::new(FrustumParams::default());
        let perspective = stage.matrix();
        stage.set_mode(ProjectionMode::Orthogonal);
        assert_ne!(stage.matrix(), perspective);
        assert_eq!(stage.mode(), ProjectionMode::Orthogonal);
    }

    #[test]
    fn aspect_update_invalidates_memo() {
        let mut stage = Projection::new(FrustumParams::default());
        let before = stage.matrix();
        stage.set_aspect(2.0);
        assert!(stage.cached.get().is_none());
        assert_ne!(stage.matrix(), before);
    }

    #[test]
    fn orthogonal_is_centered_box() {
        let mut stage = Projection::new(FrustumParams {
            aspect: 1.0,
            ..Default::default()
        });
        stage.set_mode(ProjectionMode::Orthogonal);
        let m = stage.matrix();
        // Symmetric extents leave no x/y translation.
        assert_eq!(m.w_axis.x, 0.0);
        assert_eq!(m.w_axis.y, 0.0);
        assert_eq!(m.x_axis.x, 1.0);
        assert_eq!(m.y_axis.y, 1.0);
    }
}
