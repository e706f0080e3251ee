//! Wavefront OBJ models and the directory listing the viewer cycles through.
//!
//! Models are discovered up front but parsed and uploaded lazily: the first
//! frame that draws a model pays its load cost, and a file that fails to
//! parse is remembered as failed instead of being retried every frame.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::gpu::GpuContext;
use crate::mesh::{GpuMesh, ObjGeometry, Vertex3d};

/// Errors surfaced while discovering or loading models.
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error("i/o error reading {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Obj(#[from] obj::ObjError),
    #[error("no .obj files found in {0}")]
    NoModels(PathBuf),
}

/// Anything the scene can render.
pub trait Drawable {
    /// Draws into `pass`, uploading on first use if needed.
    fn draw(&self, gpu: &GpuContext, pass: &mut wgpu::RenderPass<'_>);
}

const DEFAULT_COLOR: [f32; 3] = [1.0, 1.0, 1.0];

/// Flattens parsed OBJ data into normalized triangle-soup geometry.
///
/// Polygons with more than three corners are fan-triangulated. When the file
/// carries no normals, flat face normals are computed instead.
fn geometry_from_data(data: &obj::ObjData) -> ObjGeometry {
    let mut vertices = Vec::new();

    for object in &data.objects {
        for group in &object.groups {
            for poly in &group.polys {
                let corners = &poly.0;
                if corners.len() < 3 {
                    continue;
                }
                for i in 1..corners.len() - 1 {
                    for &index in &[corners[0], corners[i], corners[i + 1]] {
                        let obj::IndexTuple(pos, _uv, normal) = index;
                        vertices.push(Vertex3d::new(
                            data.position[pos],
                            normal.map(|n| data.normal[n]).unwrap_or([0.0; 3]),
                            DEFAULT_COLOR,
                        ));
                    }
                }
            }
        }
    }

    let mut geometry = ObjGeometry::new(vertices);
    if data.normal.is_empty() {
        geometry.flat_normals();
    }
    geometry.normalize_to_unit();
    geometry
}

#[derive(Debug)]
enum LoadState {
    Pending,
    Ready(Rc<GpuMesh>),
    Failed,
}

#[derive(Debug)]
struct ModelInner {
    path: PathBuf,
    state: RefCell<LoadState>,
}

/// One OBJ file, loaded on first draw.
#[derive(Clone, Debug)]
pub struct Model {
    inner: Rc<ModelInner>,
}

impl Model {
    pub fn new(path: PathBuf) -> Self {
        Self {
            inner: Rc::new(ModelInner {
                path,
                state: RefCell::new(LoadState::Pending),
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// File stem shown in the window title and logs.
    pub fn name(&self) -> &str {
        self.inner
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("<model>")
    }

    fn load(&self, gpu: &GpuContext) -> Result<Rc<GpuMesh>, ViewerError> {
        let parsed = obj::Obj::load(&self.inner.path)?;
        let geometry = geometry_from_data(&parsed.data);
        log::info!(
            "loaded {} ({} triangles)",
            self.inner.path.display(),
            geometry.vertices.len() / 3
        );
        Ok(Rc::new(geometry.upload(gpu)))
    }

    /// The uploaded mesh, loading it on first use. `None` means the file
    /// failed to load; the failure is logged once and remembered.
    pub fn mesh(&self, gpu: &GpuContext) -> Option<Rc<GpuMesh>> {
        let mut state = self.inner.state.borrow_mut();
        if let LoadState::Pending = *state {
            *state = match self.load(gpu) {
                Ok(mesh) => LoadState::Ready(mesh),
                Err(err) => {
                    log::error!("failed to load {}: {err}", self.inner.path.display());
                    LoadState::Failed
                }
            };
        }
        match &*state {
            LoadState::Ready(mesh) => Some(Rc::clone(mesh)),
            _ => None,
        }
    }
}

impl Drawable for Model {
    fn draw(&self, gpu: &GpuContext, pass: &mut wgpu::RenderPass<'_>) {
        if let Some(mesh) = self.mesh(gpu) {
            mesh.draw(pass);
        }
    }
}

/// The `.obj` files of one directory, with a cursor for cycling.
#[derive(Debug)]
pub struct ModelList {
    models: Vec<Model>,
    current: usize,
}

impl ModelList {
    /// Scans `dir` (non-recursively) for `.obj` files, sorted by file name.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, ViewerError> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir).map_err(|source| ViewerError::Io {
            path: dir.to_owned(),
            source,
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path
                        .extension()
                        .is_some_and(|ext| ext.eq_ignore_ascii_case("obj"))
            })
            .collect();
        paths.sort();

        if paths.is_empty() {
            return Err(ViewerError::NoModels(dir.to_owned()));
        }
        Ok(Self {
            models: paths.into_iter().map(Model::new).collect(),
            current: 0,
        })
    }

    #[cfg(test)]
    fn from_paths(paths: Vec<PathBuf>) -> Self {
        Self {
            models: paths.into_iter().map(Model::new).collect(),
            current: 0,
        }
    }

    pub fn current(&self) -> &Model {
        &self.models[self.current]
    }

    /// Advances to the next model, wrapping at the end.
    pub fn next_model(&mut self) -> &Model {
        self.current = (self.current + 1) % self.models.len();
        self.current()
    }

    /// Steps back to the previous model, wrapping at the start.
    pub fn prev_model(&mut self) -> &Model {
        self.current = (self.current + self.models.len() - 1) % self.models.len();
        self.current()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list() -> ModelList {
        ModelList::from_paths(vec![
            PathBuf::from("a.obj"),
            PathBuf::from("b.obj"),
            PathBuf::from("c.obj"),
        ])
    }

    #[test]
    fn cycling_wraps_both_directions() {
        let mut models = list();
        assert_eq!(models.current().name(), "a");
        models.next_model();
        models.next_model();
        assert_eq!(models.current().name(), "c");
        models.next_model();
        assert_eq!(models.current().name(), "a");
        models.prev_model();
        assert_eq!(models.current().name(), "c");
    }

    #[test]
    fn empty_dir_is_an_error() {
        let dir = std::env::temp_dir().join("objview-empty-test");
        std::fs::create_dir_all(&dir).unwrap();
        match ModelList::from_dir(&dir) {
            Err(ViewerError::NoModels(path)) => assert_eq!(path, dir),
            other => panic!("expected NoModels, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn missing_dir_is_an_io_error() {
        let err = ModelList::from_dir("/definitely/not/a/real/dir").unwrap_err();
        assert!(matches!(err, ViewerError::Io { .. }));
    }

    #[test]
    fn fan_triangulation_splits_quads() {
        let mut group = obj::Group::new("default".to_string());
        group.polys = vec![obj::SimplePolygon(vec![
            obj::IndexTuple(0, None, None),
            obj::IndexTuple(1, None, None),
            obj::IndexTuple(2, None, None),
            obj::IndexTuple(3, None, None),
        ])];
        let mut object = obj::Object::new("quad".to_string());
        object.groups = vec![group];

        let mut data = obj::ObjData::default();
        data.position = vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ];
        data.objects = vec![object];

        let geometry = geometry_from_data(&data);
        // One quad becomes two triangles with flat +z normals.
        assert_eq!(geometry.vertices.len(), 6);
        for v in &geometry.vertices {
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
            assert_eq!(v.color, DEFAULT_COLOR);
        }
    }
}
