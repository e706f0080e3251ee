//! Window lifecycle and the per-frame loop.
//!
//! The viewer follows winit's `ApplicationHandler` shape: the app starts
//! `Pending` with just its configuration, and becomes `Running` once the
//! event loop delivers `resumed` and the window plus GPU exist.

use std::sync::Arc;
use winit::application::ApplicationHandler;
use winit::error::EventLoopError;
use winit::event::{MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::KeyCode;
use winit::window::{Window, WindowAttributes, WindowId};

use glam::Vec3;

use crate::control::{Control, ControlMode, LightOpts};
use crate::gpu::GpuContext;
use crate::input::Input;
use crate::model::ModelList;
use crate::scene::Scene;
use crate::transform::{Mvp, ProjectionMode};

/// Configuration for the viewer window.
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "objview".to_string(),
            width: 800,
            height: 600,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

/// Opens a window and runs the viewer over the given models until closed.
pub fn run(config: AppConfig, models: ModelList) -> Result<(), EventLoopError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::Pending {
        config,
        models: Some(models),
    };
    event_loop.run_app(&mut app)
}

enum App {
    Pending {
        config: AppConfig,
        models: Option<ModelList>,
    },
    Running(ViewerState),
}

struct ViewerState {
    window: Arc<Window>,
    title: String,
    gpu: GpuContext,
    scene: Scene,
    models: ModelList,
    mvp: Mvp,
    control: Control,
    light: LightOpts,
    input: Input,
}

impl ViewerState {
    fn refresh_title(&self) {
        self.window
            .set_title(&format!("{} - {}", self.title, self.models.current().name()));
    }

    /// One-shot key bindings, handled once per press.
    fn handle_keys(&mut self) {
        // Model cycling.
        if self.input.key_pressed(KeyCode::KeyZ) {
            self.models.prev_model();
            self.refresh_title();
        }
        if self.input.key_pressed(KeyCode::KeyX) {
            self.models.next_model();
            self.refresh_title();
        }

        // Render and projection modes.
        if self.input.key_pressed(KeyCode::KeyW) {
            self.scene.set_render_mode(self.scene.render_mode().next());
        }
        if self.input.key_pressed(KeyCode::KeyO) {
            self.mvp.set_project_mode(ProjectionMode::Orthogonal);
        }
        if self.input.key_pressed(KeyCode::KeyP) {
            self.mvp.set_project_mode(ProjectionMode::Perspective);
        }

        // Controller mode selection.
        for (key, mode) in [
            (KeyCode::KeyT, ControlMode::TranslateModel),
            (KeyCode::KeyR, ControlMode::RotateModel),
            (KeyCode::KeyS, ControlMode::ScaleModel),
            (KeyCode::KeyE, ControlMode::TranslateEye),
            (KeyCode::KeyC, ControlMode::TranslateCenter),
            (KeyCode::KeyU, ControlMode::TranslateUp),
            (KeyCode::KeyK, ControlMode::Shininess),
        ] {
            if self.input.key_pressed(key) {
                self.control.set_mode(mode);
                log::debug!("control mode: {mode:?}");
            }
        }

        // L selects the light controller; pressing it again cycles which
        // light is active.
        if self.input.key_pressed(KeyCode::KeyL) {
            if self.control.mode() == ControlMode::Light {
                self.light.cycle_mode();
                log::debug!("light: {:?}", self.light.mode);
            } else {
                self.control.set_mode(ControlMode::Light);
            }
        }

        if self.input.key_pressed(KeyCode::KeyV) {
            let on = self.gpu.toggle_vsync();
            log::info!("vsync {}", if on { "on" } else { "off" });
        }

        if self.input.key_pressed(KeyCode::KeyI) {
            println!("model: {}", self.models.current().path().display());
            println!(
                "mode: {:?}, light: {:?}, projection: {:?}",
                self.control.mode(),
                self.light.mode,
                self.mvp.project_mode()
            );
            self.mvp.debug_print();
        }
    }

    /// Feeds this frame's mouse state into the controller.
    ///
    /// Window coordinates grow downward, so the y delta is negated; scroll
    /// notches land on the z axis, pushed away from the viewer.
    fn feed_controller(&mut self) {
        self.control
            .set_pressed(self.input.mouse_down(MouseButton::Left));
        let drag = self.input.mouse_delta();
        self.control.update_offset(Vec3::new(drag.x, -drag.y, 0.0));
        let scroll = self.input.scroll_delta();
        self.control.update_offset(Vec3::new(0.0, 0.0, -scroll.y));
    }

    fn frame(&mut self) {
        self.handle_keys();
        self.feed_controller();
        self.control.update(&mut self.mvp, &mut self.light);

        let model = self.models.current().clone();
        self.scene.render(&self.gpu, &self.mvp, &self.light, &model);

        self.input.begin_frame();
        self.window.request_redraw();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let App::Pending { config, models } = self {
            let window_attrs = WindowAttributes::default()
                .with_title(&config.title)
                .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height));

            let window = Arc::new(event_loop.create_window(window_attrs).unwrap());
            let gpu = GpuContext::new(window.clone());
            let scene = Scene::new(&gpu);
            let mvp = Mvp::new(gpu.width(), gpu.height());

            let state = ViewerState {
                window,
                title: config.title.clone(),
                gpu,
                scene,
                models: models.take().unwrap(),
                mvp,
                control: Control::new(),
                light: LightOpts::default(),
                input: Input::new(),
            };
            state.refresh_title();
            *self = App::Running(state);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let App::Running(state) = self else {
            return;
        };

        state.input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                state.gpu.resize(size.width, size.height);
                state.mvp.set_viewport_size(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                state.frame();
            }
            _ => {}
        }
    }
}
