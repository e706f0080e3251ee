//! The render pass drawing the current model.
//!
//! One pipeline per fill mode, one uniform buffer carrying the transform and
//! lighting state, and a depth buffer that follows the window size.

use crate::control::LightOpts;
use crate::gpu::GpuContext;
use crate::model::Drawable;
use crate::transform::{Mvp, Transform};
use crate::mesh::Vertex3d;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.2,
    g: 0.2,
    b: 0.2,
    a: 1.0,
};

/// How triangles are rasterized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderMode {
    #[default]
    Fill,
    Wireframe,
}

impl RenderMode {
    pub fn next(self) -> Self {
        match self {
            Self::Fill => Self::Wireframe,
            Self::Wireframe => Self::Fill,
        }
    }
}

/// Per-frame uniforms shared by the vertex and fragment stages.
///
/// Field order mirrors the WGSL struct; the trailing padding keeps the
/// Rust and WGSL layouts byte-identical.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniforms {
    /// Full model-view-projection matrix.
    pub mvp: [[f32; 4]; 4],
    /// Model matrix alone, for world-space lighting.
    pub model: [[f32; 4]; 4],
    /// Active light position (or direction, for the directional light).
    pub light_pos: [f32; 3],
    /// 0 directional, 1 point, 2 spot.
    pub light_mode: u32,
    /// Eye position in world space.
    pub eye_pos: [f32; 3],
    /// Specular exponent.
    pub shininess: f32,
    /// Cosine of the spot cutoff angle.
    pub cutoff_cos: f32,
    /// Diffuse intensity multiplier.
    pub diffuse: f32,
    pub _pad: [f32; 2],
}

/// Owns the pipelines and per-frame GPU state for drawing models.
pub struct Scene {
    fill_pipeline: wgpu::RenderPipeline,
    wire_pipeline: Option<wgpu::RenderPipeline>,
    render_mode: RenderMode,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    depth_view: wgpu::TextureView,
    depth_size: (u32, u32),
}

impl Scene {
    pub fn new(gpu: &GpuContext) -> Self {
        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Model Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/model.wgsl").into()),
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Scene Uniforms"),
            size: std::mem::size_of::<SceneUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Scene Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Model Pipeline Layout"),
            bind_group_layouts: &[&uniform_bind_group_layout],
            push_constant_ranges: &[],
        });

        let fill_pipeline =
            Self::build_pipeline(gpu, &shader, &pipeline_layout, wgpu::PolygonMode::Fill);
        let wire_pipeline = gpu.wireframe_supported.then(|| {
            Self::build_pipeline(gpu, &shader, &pipeline_layout, wgpu::PolygonMode::Line)
        });

        let (depth_view, depth_size) = Self::create_depth_view(gpu);

        Self {
            fill_pipeline,
            wire_pipeline,
            render_mode: RenderMode::default(),
            uniform_buffer,
            uniform_bind_group,
            depth_view,
            depth_size,
        }
    }

    fn build_pipeline(
        gpu: &GpuContext,
        shader: &wgpu::ShaderModule,
        layout: &wgpu::PipelineLayout,
        polygon_mode: wgpu::PolygonMode,
    ) -> wgpu::RenderPipeline {
        gpu.device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Model Pipeline"),
                layout: Some(layout),
                vertex: wgpu::VertexState {
                    module: shader,
                    entry_point: Some("vs"),
                    buffers: &[Vertex3d::LAYOUT],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: shader,
                    entry_point: Some("fs"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: gpu.config.format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                // No culling: OBJ files in the wild mix winding orders.
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    polygon_mode,
                    cull_mode: None,
                    front_face: wgpu::FrontFace::Ccw,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: wgpu::TextureFormat::Depth32Float,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
    }

    fn create_depth_view(gpu: &GpuContext) -> (wgpu::TextureView, (u32, u32)) {
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: gpu.width(),
                height: gpu.height(),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        (view, (gpu.width(), gpu.height()))
    }

    /// Ensures the depth buffer matches the current surface size.
    pub fn ensure_depth_size(&mut self, gpu: &GpuContext) {
        if self.depth_size != (gpu.width(), gpu.height()) {
            let (view, size) = Self::create_depth_view(gpu);
            self.depth_view = view;
            self.depth_size = size;
        }
    }

    /// Switches between filled and wireframe rasterization. Wireframe is
    /// ignored (with a warning) on adapters without `POLYGON_MODE_LINE`.
    pub fn set_render_mode(&mut self, mode: RenderMode) {
        if mode == RenderMode::Wireframe && self.wire_pipeline.is_none() {
            log::warn!("wireframe not supported by this adapter, staying in fill mode");
            return;
        }
        self.render_mode = mode;
    }

    pub fn render_mode(&self) -> RenderMode {
        self.render_mode
    }

    fn active_pipeline(&self) -> &wgpu::RenderPipeline {
        match self.render_mode {
            RenderMode::Fill => &self.fill_pipeline,
            RenderMode::Wireframe => self.wire_pipeline.as_ref().unwrap_or(&self.fill_pipeline),
        }
    }

    fn uniforms(mvp: &Mvp, light: &LightOpts) -> SceneUniforms {
        SceneUniforms {
            mvp: mvp.matrix().to_cols_array_2d(),
            model: mvp.model_matrix().to_cols_array_2d(),
            light_pos: light.active_position().to_array(),
            light_mode: light.mode.index(),
            eye_pos: mvp.eye_position().to_array(),
            shininess: light.shininess,
            cutoff_cos: light.cutoff_deg.to_radians().cos(),
            diffuse: light.diffuse,
            _pad: [0.0; 2],
        }
    }

    /// Draws one frame. A lost or outdated surface skips the frame with a
    /// warning; the next resize reconfigures it.
    pub fn render(&mut self, gpu: &GpuContext, mvp: &Mvp, light: &LightOpts, model: &dyn Drawable) {
        self.ensure_depth_size(gpu);

        let output = match gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(err) => {
                log::warn!("skipping frame: {err}");
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        gpu.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::cast_slice(&[Self::uniforms(mvp, light)]),
        );

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(self.active_pipeline());
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            model.draw(gpu, &mut render_pass);
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{offset_of, size_of};

    #[test]
    fn uniforms_match_wgsl_layout() {
        // Must agree with the struct in shaders/model.wgsl.
        assert_eq!(size_of::<SceneUniforms>(), 176);
        assert_eq!(offset_of!(SceneUniforms, model), 64);
        assert_eq!(offset_of!(SceneUniforms, light_pos), 128);
        assert_eq!(offset_of!(SceneUniforms, light_mode), 140);
        assert_eq!(offset_of!(SceneUniforms, eye_pos), 144);
        assert_eq!(offset_of!(SceneUniforms, shininess), 156);
        assert_eq!(offset_of!(SceneUniforms, cutoff_cos), 160);
        assert_eq!(offset_of!(SceneUniforms, diffuse), 164);
    }

    #[test]
    fn render_mode_toggles() {
        assert_eq!(RenderMode::Fill.next(), RenderMode::Wireframe);
        assert_eq!(RenderMode::Wireframe.next(), RenderMode::Fill);
    }
}
