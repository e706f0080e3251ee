//! Mouse/keyboard delta accumulation and dispatch onto the transforms.
//!
//! Raw input deltas are summed across a frame, scaled by per-mode
//! coefficient vectors, and applied once per frame to the matching [`Mvp`]
//! update method (or to the lighting parameters). The accumulator is zeroed
//! unconditionally at the end of every update.

use glam::Vec3;

use crate::transform::Mvp;

/// Operation selected by the keyboard and driven by mouse drags and scroll.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ControlMode {
    #[default]
    TranslateModel,
    ScaleModel,
    RotateModel,
    TranslateEye,
    TranslateCenter,
    TranslateUp,
    Light,
    Shininess,
}

// Slows raw pixel deltas down to usable magnitudes.
const DIRECTION_SCALES: Vec3 = Vec3::new(0.01, 0.01, 0.01);

// Per-mode sign/magnitude vectors keeping on-screen drag directions
// intuitive (and yes, some of them are non-obvious).
const TRANSLATE_SCALES: Vec3 = Vec3::new(1.0, 1.0, -1.0);
const ROTATION_SCALES: Vec3 = Vec3::new(-10.0, 10.0, -10.0);
const SCALING_SCALES: Vec3 = Vec3::new(-1.0, 1.0, -1.0);
const EYE_SCALES: Vec3 = Vec3::new(-1.0, -1.0, 1.0);
const CENTER_SCALES: Vec3 = Vec3::new(-1.0, 1.0, 1.0);
const UP_SCALES: Vec3 = Vec3::new(-1.0, -1.0, 1.0);
const LIGHT_SCALES: Vec3 = Vec3::new(1.0, 1.0, -1.0);
const SHININESS_SCALE: f32 = 64.0;

/// Accumulates input deltas and applies them once per frame.
#[derive(Debug, Default)]
pub struct Control {
    mode: ControlMode,
    accumulated: Vec3,
    pressed: bool,
}

impl Control {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies the accumulated delta to `mvp` or `light` according to the
    /// current mode, then zeroes the accumulator.
    ///
    /// While the mouse button is up only the scroll-driven z component
    /// survives; x and y are discarded.
    pub fn update(&mut self, mvp: &mut Mvp, light: &mut LightOpts) {
        if !self.pressed {
            self.accumulated.x = 0.0;
            self.accumulated.y = 0.0;
        }
        let scaled = self.accumulated * DIRECTION_SCALES;

        match self.mode {
            ControlMode::TranslateModel => mvp.update_translation(scaled * TRANSLATE_SCALES),
            ControlMode::ScaleModel => mvp.update_scaling(scaled * SCALING_SCALES),
            ControlMode::RotateModel => {
                let v = scaled * ROTATION_SCALES;
                // x and y are swapped intentionally: horizontal drags spin
                // around the vertical axis and vice versa.
                mvp.update_rotation(Vec3::new(v.y, v.x, v.z));
            }
            ControlMode::TranslateEye => mvp.update_eye(scaled * EYE_SCALES),
            ControlMode::TranslateCenter => mvp.update_center(scaled * CENTER_SCALES),
            ControlMode::TranslateUp => mvp.update_up(scaled * UP_SCALES),
            ControlMode::Light => light.move_active(scaled * LIGHT_SCALES),
            ControlMode::Shininess => light.adjust_shininess(scaled.z * SHININESS_SCALE),
        }

        self.accumulated = Vec3::ZERO;
    }

    /// Adds a raw input delta to the accumulator.
    pub fn update_offset(&mut self, offset: Vec3) {
        self.accumulated += offset;
    }

    /// Records whether the drag button is currently held.
    pub fn set_pressed(&mut self, pressed: bool) {
        self.pressed = pressed;
    }

    pub fn set_mode(&mut self, mode: ControlMode) {
        self.mode = mode;
    }

    pub fn mode(&self) -> ControlMode {
        self.mode
    }
}

/// Which light the fragment shader evaluates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LightMode {
    #[default]
    Directional,
    Point,
    Spot,
}

impl LightMode {
    pub fn next(self) -> Self {
        match self {
            Self::Directional => Self::Point,
            Self::Point => Self::Spot,
            Self::Spot => Self::Directional,
        }
    }

    /// Index understood by the shader.
    pub fn index(self) -> u32 {
        match self {
            Self::Directional => 0,
            Self::Point => 1,
            Self::Spot => 2,
        }
    }
}

/// Tweakable lighting parameters uploaded to the shader each frame.
#[derive(Clone, Copy, Debug)]
pub struct LightOpts {
    pub mode: LightMode,
    pub directional_pos: Vec3,
    pub point_pos: Vec3,
    pub spot_pos: Vec3,
    pub shininess: f32,
    pub cutoff_deg: f32,
    pub diffuse: f32,
}

impl Default for LightOpts {
    fn default() -> Self {
        Self {
            mode: LightMode::default(),
            directional_pos: Vec3::new(1.0, 1.0, 1.0),
            point_pos: Vec3::new(0.0, 2.0, 1.0),
            spot_pos: Vec3::new(0.0, 0.0, 2.0),
            shininess: 64.0,
            cutoff_deg: 30.0,
            diffuse: 1.0,
        }
    }
}

impl LightOpts {
    /// Cycles directional -> point -> spot -> directional.
    pub fn cycle_mode(&mut self) {
        self.mode = self.mode.next();
    }

    /// Position (or direction, for the directional light) of the light the
    /// shader is currently evaluating.
    pub fn active_position(&self) -> Vec3 {
        match self.mode {
            LightMode::Directional => self.directional_pos,
            LightMode::Point => self.point_pos,
            LightMode::Spot => self.spot_pos,
        }
    }

    fn move_active(&mut self, delta: Vec3) {
        let target = match self.mode {
            LightMode::Directional => &mut self.directional_pos,
            LightMode::Point => &mut self.point_pos,
            LightMode::Spot => &mut self.spot_pos,
        };
        *target += delta;
    }

    fn adjust_shininess(&mut self, delta: f32) {
        self.shininess = (self.shininess + delta).clamp(1.0, 512.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat4;

    fn assert_close(a: Mat4, b: Mat4) {
        for (x, y) in a.to_cols_array().iter().zip(b.to_cols_array().iter()) {
            assert!((x - y).abs() < 1e-6, "{a:?} != {b:?}");
        }
    }

    #[test]
    fn release_discards_xy_but_scroll_applies() {
        let mut control = Control::new();
        let mut mvp = Mvp::new(800, 600);
        let mut light = LightOpts::default();

        // A drag ended earlier this frame, plus one scroll notch.
        control.set_pressed(false);
        control.update_offset(Vec3::new(5.0, 5.0, 0.0));
        control.update_offset(Vec3::new(0.0, 0.0, -2.0));
        control.update(&mut mvp, &mut light);

        // x/y dropped; z = -2 * 0.01 * -1 moved the model toward the camera.
        let translation = mvp.model_matrix().w_axis.truncate();
        assert_eq!(translation, Vec3::new(0.0, 0.0, 0.02));
    }

    #[test]
    fn accumulator_is_zeroed_after_update() {
        let mut control = Control::new();
        let mut mvp = Mvp::new(800, 600);
        let mut light = LightOpts::default();

        control.set_pressed(true);
        control.update_offset(Vec3::new(10.0, 0.0, 0.0));
        control.update(&mut mvp, &mut light);
        let after_first = mvp.model_matrix();

        // No new offsets: the second update must be a no-op.
        control.update(&mut mvp, &mut light);
        assert_close(mvp.model_matrix(), after_first);
    }

    #[test]
    fn rotation_swaps_drag_axes() {
        let mut control = Control::new();
        let mut mvp = Mvp::new(800, 600);
        let mut light = LightOpts::default();

        control.set_mode(ControlMode::RotateModel);
        control.set_pressed(true);
        control.update_offset(Vec3::new(1.0, 0.0, 0.0));
        control.update(&mut mvp, &mut light);

        // A horizontal drag of one pixel becomes a -0.1 degree yaw.
        let expected = Mat4::from_rotation_y((-0.1_f32).to_radians());
        assert_close(mvp.model_matrix(), expected);
    }

    #[test]
    fn light_mode_drags_active_light() {
        let mut control = Control::new();
        let mut mvp = Mvp::new(800, 600);
        let mut light = LightOpts::default();
        light.mode = LightMode::Point;
        let before = light.point_pos;

        control.set_mode(ControlMode::Light);
        control.set_pressed(true);
        control.update_offset(Vec3::new(100.0, 0.0, 0.0));
        control.update(&mut mvp, &mut light);

        assert_eq!(light.point_pos, before + Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(light.directional_pos, LightOpts::default().directional_pos);
    }

    #[test]
    fn shininess_clamps() {
        let mut control = Control::new();
        let mut mvp = Mvp::new(800, 600);
        let mut light = LightOpts::default();

        control.set_mode(ControlMode::Shininess);
        control.update_offset(Vec3::new(0.0, 0.0, -1000.0));
        control.update(&mut mvp, &mut light);
        assert_eq!(light.shininess, 1.0);

        control.update_offset(Vec3::new(0.0, 0.0, 1e6));
        control.update(&mut mvp, &mut light);
        assert_eq!(light.shininess, 512.0);
    }
}
