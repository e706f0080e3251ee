//! Mesh geometry: the vertex format, CPU-side triangle soup, and the
//! GPU-resident buffer it is uploaded into.
//!
//! Loaded models are expanded into a non-indexed triangle list. Flat shading
//! wants one normal per face corner, so sharing vertices through an index
//! buffer would only fight the loader.

use glam::Vec3;

use crate::gpu::GpuContext;

/// A vertex with position, normal, and color.
///
/// `#[repr(C)]` keeps the layout predictable for GPU upload; [`bytemuck`]
/// casts the vertex slice to bytes.
///
/// # Memory Layout
///
/// Each vertex occupies 36 bytes:
/// - `position`: 12 bytes (3 × f32) at offset 0
/// - `normal`: 12 bytes (3 × f32) at offset 12
/// - `color`: 12 bytes (3 × f32) at offset 24
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3d {
    /// The 3D position of this vertex in model space.
    pub position: [f32; 3],
    /// The surface normal vector (should be normalized for correct lighting).
    pub normal: [f32; 3],
    /// Per-vertex RGB color.
    pub color: [f32; 3],
}

impl Vertex3d {
    /// The wgpu vertex buffer layout descriptor for this vertex type:
    /// position (loc 0), normal (loc 1), color (loc 2), 36-byte stride.
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex3d>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            // normal
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
            // color
            wgpu::VertexAttribute {
                offset: 24,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x3,
            },
        ],
    };

    pub fn new(position: [f32; 3], normal: [f32; 3], color: [f32; 3]) -> Self {
        Self {
            position,
            normal,
            color,
        }
    }
}

/// CPU-side triangle soup, three vertices per face.
#[derive(Clone, Debug, Default)]
pub struct ObjGeometry {
    pub vertices: Vec<Vertex3d>,
}

impl ObjGeometry {
    pub fn new(vertices: Vec<Vertex3d>) -> Self {
        Self { vertices }
    }

    /// Axis-aligned bounding box, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut iter = self.vertices.iter().map(|v| Vec3::from(v.position));
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some((min, max))
    }

    /// Center of the bounding box.
    pub fn center(&self) -> Vec3 {
        match self.bounds() {
            Some((min, max)) => (min + max) * 0.5,
            None => Vec3::ZERO,
        }
    }

    /// Recenters the mesh on the origin and scales it so the longest
    /// bounding-box axis spans [-1, 1]. Models of wildly different sizes all
    /// arrive on screen at the same magnification.
    pub fn normalize_to_unit(&mut self) {
        let Some((min, max)) = self.bounds() else {
            return;
        };
        let center = (min + max) * 0.5;
        let extent = max - min;
        let half_longest = extent.max_element() * 0.5;
        if half_longest <= 0.0 {
            return;
        }
        for v in &mut self.vertices {
            let p = (Vec3::from(v.position) - center) / half_longest;
            v.position = p.to_array();
        }
    }

    /// Overwrites every normal with its face normal, computed from the
    /// triangle winding. Used when the source file carries no `vn` records.
    pub fn flat_normals(&mut self) {
        for tri in self.vertices.chunks_exact_mut(3) {
            let a = Vec3::from(tri[0].position);
            let b = Vec3::from(tri[1].position);
            let c = Vec3::from(tri[2].position);
            let n = (b - a).cross(c - a).normalize_or_zero();
            for v in tri {
                v.normal = n.to_array();
            }
        }
    }

    /// Uploads the geometry into a vertex buffer.
    pub fn upload(&self, gpu: &GpuContext) -> GpuMesh {
        GpuMesh::new(gpu, &self.vertices)
    }
}

/// GPU-resident geometry: a non-indexed vertex buffer and its length.
#[derive(Debug)]
pub struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
}

impl GpuMesh {
    pub fn new(gpu: &GpuContext, vertices: &[Vertex3d]) -> Self {
        use wgpu::util::DeviceExt;

        let vertex_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Vertex Buffer"),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        Self {
            vertex_buffer,
            vertex_count: vertices.len() as u32,
        }
    }

    /// Binds the vertex buffer and issues the draw call.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.draw(0..self.vertex_count, 0..1);
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> Vec<Vertex3d> {
        [a, b, c]
            .into_iter()
            .map(|p| Vertex3d::new(p, [0.0; 3], [1.0; 3]))
            .collect()
    }

    #[test]
    fn layout_matches_struct_size() {
        assert_eq!(Vertex3d::LAYOUT.array_stride, 36);
        assert_eq!(Vertex3d::LAYOUT.attributes.len(), 3);
        assert_eq!(Vertex3d::LAYOUT.attributes[2].offset, 24);
    }

    #[test]
    fn bounds_cover_all_vertices() {
        let geometry = ObjGeometry::new(tri(
            [-1.0, 0.0, 2.0],
            [3.0, -2.0, 0.0],
            [0.0, 1.0, -4.0],
        ));
        let (min, max) = geometry.bounds().unwrap();
        assert_eq!(min, Vec3::new(-1.0, -2.0, -4.0));
        assert_eq!(max, Vec3::new(3.0, 1.0, 2.0));
        assert!(ObjGeometry::default().bounds().is_none());
    }

    #[test]
    fn normalize_centers_and_scales_to_unit() {
        let mut geometry = ObjGeometry::new(tri(
            [10.0, 10.0, 10.0],
            [14.0, 12.0, 10.0],
            [12.0, 11.0, 11.0],
        ));
        geometry.normalize_to_unit();

        let (min, max) = geometry.bounds().unwrap();
        // Centered on the origin...
        assert!((min + max).length() < 1e-6);
        // ...with the longest axis spanning exactly [-1, 1].
        assert!(((max - min).max_element() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn normalize_skips_degenerate_geometry() {
        let mut geometry = ObjGeometry::new(tri([5.0; 3], [5.0; 3], [5.0; 3]));
        geometry.normalize_to_unit();
        assert_eq!(geometry.vertices[0].position, [5.0; 3]);
    }

    #[test]
    fn flat_normals_follow_winding() {
        let mut geometry = ObjGeometry::new(tri(
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
        ));
        geometry.flat_normals();
        for v in &geometry.vertices {
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
        }
    }
}
