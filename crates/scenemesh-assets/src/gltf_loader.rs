use std::borrow::Cow;
use std::path::Path;

use gltf::Semantic;
use tracing::{debug, warn};

use crate::accessor::{AccessorKind, AccessorLayout, AccessorView, ComponentType};
use crate::convert::{convert_normal, convert_position, convert_uv};
use crate::error::{AssetError, DecodeError};
use crate::geometry::{Geometry, Vertex, FLOATS_PER_VERTEX};
use crate::index::IndexView;
use crate::options::ImportOptions;
use crate::triangulate::{triangulate, triangulate_unindexed, Topology};

const DEFAULT_UV: [f32; 2] = [0.0, 0.0];
const DEFAULT_NORMAL: [f32; 3] = [0.0, 0.0, 1.0];

/// Why a primitive was left out of the flattened geometry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkipReason {
    #[error("unsupported primitive mode {0}, expected triangles, strip or fan")]
    UnsupportedTopology(u32),

    #[error("missing POSITION attribute")]
    MissingPosition,

    #[error("POSITION accessor is {0:?}, expected Vec3")]
    InvalidPosition(AccessorKind),

    #[error("{0} accessor has no buffer view")]
    SparseAccessor(&'static str),

    #[error("unsupported index component type {0:?}")]
    UnsupportedIndexType(ComponentType),

    #[error("index {index} is outside the {vertex_count} vertices of the primitive")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("{0} vertices do not fit 32-bit indices")]
    TooManyVertices(usize),
}

/// A primitive that was skipped, identified by its position in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPrimitive {
    pub mesh: usize,
    pub primitive: usize,
    pub reason: SkipReason,
}

/// Summary of a flattening pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub primitives_loaded: usize,
    pub skipped: Vec<SkippedPrimitive>,
}

/// Outcome of flattening one primitive that did not produce geometry.
enum PrimitiveError {
    Skip(SkipReason),
    Decode(DecodeError),
}

impl From<SkipReason> for PrimitiveError {
    fn from(reason: SkipReason) -> Self {
        Self::Skip(reason)
    }
}

impl From<DecodeError> for PrimitiveError {
    fn from(error: DecodeError) -> Self {
        Self::Decode(error)
    }
}

/// Parsed glTF document with its buffer payloads, alive for one load call.
struct SceneDocument {
    document: gltf::Document,
    buffers: Vec<gltf::buffer::Data>,
}

impl SceneDocument {
    /// Read and parse `path`. A `.glb` extension (any case) selects the binary
    /// container; anything else is parsed as JSON with external buffers
    /// resolved relative to the file.
    fn open(path: &Path) -> Result<Self, AssetError> {
        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => AssetError::NotFound(path.to_path_buf()),
            _ => AssetError::Io(path.to_path_buf(), e),
        })?;

        let parse_error =
            |e: &dyn std::fmt::Display| AssetError::Parse(path.to_path_buf(), e.to_string());

        let (root, blob) = if is_binary_container(path) {
            let glb = gltf::Glb::from_slice(&bytes).map_err(|e| parse_error(&e))?;
            let root = gltf::json::Root::from_slice(&glb.json).map_err(|e| parse_error(&e))?;
            (root, glb.bin.map(Cow::into_owned))
        } else {
            let root = gltf::json::Root::from_slice(&bytes).map_err(|e| parse_error(&e))?;
            (root, None)
        };

        validate(&root).map_err(|e| parse_error(&e))?;
        let document = gltf::Document::from_json_without_validation(root);

        let buffers = gltf::import_buffers(&document, path.parent(), blob)
            .map_err(|e| AssetError::BufferResolve(path.to_path_buf(), e.to_string()))?;

        Ok(Self { document, buffers })
    }

    /// Walk every mesh and primitive in document order and concatenate them.
    fn flatten(&self, options: &ImportOptions) -> Result<(Geometry, ImportReport), AssetError> {
        let mut geometry = Geometry::new();
        let mut report = ImportReport::default();

        for (mesh_index, mesh) in self.document.meshes().enumerate() {
            for (primitive_index, primitive) in mesh.primitives().enumerate() {
                let result = flatten_primitive(&primitive, &self.buffers, options).and_then(
                    |local| {
                        let total = geometry.vertex_count() + local.vertex_count();
                        if u32::try_from(total).is_err() {
                            return Err(SkipReason::TooManyVertices(total).into());
                        }
                        Ok(local)
                    },
                );
                match result {
                    Ok(local) => {
                        debug!(
                            "mesh {} primitive {}: {} vertices at base {}",
                            mesh_index,
                            primitive_index,
                            local.vertex_count(),
                            geometry.vertex_count()
                        );
                        geometry.append(&local);
                        report.primitives_loaded += 1;
                    }
                    Err(PrimitiveError::Skip(reason)) => {
                        warn!(
                            "Skipping mesh {} primitive {}: {}",
                            mesh_index, primitive_index, reason
                        );
                        report.skipped.push(SkippedPrimitive {
                            mesh: mesh_index,
                            primitive: primitive_index,
                            reason,
                        });
                    }
                    Err(PrimitiveError::Decode(source)) => {
                        return Err(AssetError::Decode {
                            mesh: mesh_index,
                            primitive: primitive_index,
                            source,
                        });
                    }
                }
            }
        }

        Ok((geometry, report))
    }
}

/// Load a glTF 2.0 file (.gltf or .glb) with default options and flatten
/// every triangle primitive into one vertex/index buffer pair.
pub fn load(path: &Path) -> Result<Geometry, AssetError> {
    load_geometry(path, &ImportOptions::default())
}

/// Load and flatten a glTF 2.0 file, discarding the import report.
pub fn load_geometry(path: &Path, options: &ImportOptions) -> Result<Geometry, AssetError> {
    import_geometry(path, options).map(|(geometry, _)| geometry)
}

/// Load and flatten a glTF 2.0 file, also reporting which primitives were skipped.
pub fn import_geometry(
    path: &Path,
    options: &ImportOptions,
) -> Result<(Geometry, ImportReport), AssetError> {
    let scene = SceneDocument::open(path)?;
    let (geometry, report) = scene.flatten(options)?;

    debug!(
        "glTF '{}': {} vertices, {} triangles, {} primitives loaded, {} skipped",
        path.display(),
        geometry.vertex_count(),
        geometry.triangle_count(),
        report.primitives_loaded,
        report.skipped.len()
    );

    Ok((geometry, report))
}

fn is_binary_container(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("glb"))
}

/// Structural validation of the parsed JSON.
///
/// Missing or malformed POSITION data is tolerated here and handled per
/// primitive by the flattener; everything else, including out-of-range
/// references, fails the load.
fn validate(root: &gltf::json::Root) -> Result<(), String> {
    use gltf::json::validation::{Error, Validate};

    let mut errors = Vec::new();
    root.validate(
        root,
        gltf::json::Path::new,
        &mut |path: &dyn Fn() -> gltf::json::Path, error: Error| {
            let path = path().to_string();
            let position_issue =
                path.contains("POSITION") && matches!(error, Error::Missing | Error::Invalid);
            if !position_issue {
                errors.push(format!("{}: {:?}", path, error));
            }
        },
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(format!("invalid glTF: {}", errors.join(", ")))
    }
}

fn buffer_data(buffers: &[gltf::buffer::Data], index: usize) -> Result<&[u8], DecodeError> {
    buffers
        .get(index)
        .map(|data| data.0.as_slice())
        .ok_or(DecodeError::MissingBuffer(index))
}

/// View over an attribute accessor, or `None` when it has no buffer view.
fn attribute_view<'a>(
    accessor: &gltf::Accessor<'_>,
    buffers: &'a [gltf::buffer::Data],
) -> Result<Option<AccessorView<'a>>, DecodeError> {
    let Some((layout, buffer)) = AccessorLayout::from_gltf(accessor) else {
        return Ok(None);
    };
    AccessorView::new(layout, buffer_data(buffers, buffer)?).map(Some)
}

/// Optional attribute stream, dropped with a warning when it cannot supply
/// `min_components` per vertex for all `vertex_count` vertices.
fn optional_attribute<'a>(
    primitive: &gltf::Primitive<'_>,
    semantic: Semantic,
    min_components: usize,
    vertex_count: usize,
    buffers: &'a [gltf::buffer::Data],
) -> Result<Option<AccessorView<'a>>, DecodeError> {
    let Some(accessor) = primitive.get(&semantic) else {
        return Ok(None);
    };
    let Some(view) = attribute_view(&accessor, buffers)? else {
        warn!("{:?} accessor has no buffer view, using defaults", semantic);
        return Ok(None);
    };
    if view.component_count() < min_components {
        warn!(
            "{:?} has {} components, need {}, using defaults",
            semantic,
            view.component_count(),
            min_components
        );
        return Ok(None);
    }
    if view.len() < vertex_count {
        warn!(
            "{:?} has {} elements for {} vertices, using defaults",
            semantic,
            view.len(),
            vertex_count
        );
        return Ok(None);
    }
    Ok(Some(view))
}

/// Decode one primitive into standalone geometry with local indices.
fn flatten_primitive(
    primitive: &gltf::Primitive<'_>,
    buffers: &[gltf::buffer::Data],
    options: &ImportOptions,
) -> Result<Geometry, PrimitiveError> {
    let mode = primitive.mode();
    let topology =
        Topology::from_mode(mode).ok_or(SkipReason::UnsupportedTopology(mode.as_gl_enum()))?;

    let position_accessor = primitive
        .get(&Semantic::Positions)
        .ok_or(SkipReason::MissingPosition)?;
    let positions = attribute_view(&position_accessor, buffers)?
        .ok_or(SkipReason::SparseAccessor("POSITION"))?;
    if positions.layout().kind != AccessorKind::Vec3 {
        return Err(SkipReason::InvalidPosition(positions.layout().kind).into());
    }
    let vertex_count = positions.len();
    let local_count =
        u32::try_from(vertex_count).map_err(|_| SkipReason::TooManyVertices(vertex_count))?;

    let tex_coords =
        optional_attribute(primitive, Semantic::TexCoords(0), 2, vertex_count, buffers)?;
    let normals = optional_attribute(primitive, Semantic::Normals, 3, vertex_count, buffers)?;

    let mut local = Geometry::new();
    local.vertices.reserve(vertex_count * FLOATS_PER_VERTEX);
    for i in 0..vertex_count {
        let position = convert_position(positions.read::<3>(i)?);
        let uv = match &tex_coords {
            Some(view) => convert_uv(view.read::<2>(i)?, options.flip_v),
            None => DEFAULT_UV,
        };
        let normal = match &normals {
            Some(view) => convert_normal(view.read::<3>(i)?),
            None => DEFAULT_NORMAL,
        };
        local.push_vertex(Vertex::new(position, uv, normal));
    }

    match primitive.indices() {
        Some(accessor) => {
            let (layout, buffer) = AccessorLayout::from_gltf(&accessor)
                .ok_or(SkipReason::SparseAccessor("indices"))?;
            let view = IndexView::new(layout, buffer_data(buffers, buffer)?).map_err(|e| match e {
                DecodeError::UnsupportedIndexType(ty) => {
                    PrimitiveError::Skip(SkipReason::UnsupportedIndexType(ty))
                }
                other => PrimitiveError::Decode(other),
            })?;
            let source = view.read_all()?;

            if let Some(&index) = source.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(SkipReason::IndexOutOfRange {
                    index,
                    vertex_count,
                }
                .into());
            }
            if topology == Topology::Triangles && source.len() % 3 != 0 {
                debug!("Dropping {} trailing indices", source.len() % 3);
            }
            triangulate(topology, &source, &mut local.indices);
        }
        None => triangulate_unindexed(topology, local_count, &mut local.indices),
    }

    Ok(local)
}
