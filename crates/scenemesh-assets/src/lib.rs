//! Scenemesh Assets - glTF mesh ingestion
//!
//! Decodes glTF 2.0 accessors, triangulates every triangle-based primitive,
//! converts it into a left-handed, top-left UV convention and flattens the
//! whole document into one interleaved vertex buffer plus a `u32` index list.

mod accessor;
mod convert;
mod error;
mod geometry;
mod gltf_loader;
mod handle;
mod index;
mod options;
mod server;
mod triangulate;

#[cfg(test)]
mod test_support;

pub use accessor::{read_component, AccessorKind, AccessorLayout, AccessorView, ComponentType};
pub use convert::{convert_normal, convert_position, convert_uv};
pub use error::{AssetError, DecodeError, GeometryError};
pub use geometry::{Geometry, Vertex, FLOATS_PER_VERTEX, VERTEX_STRIDE};
pub use gltf_loader::{
    import_geometry, load, load_geometry, ImportReport, SkipReason, SkippedPrimitive,
};
pub use handle::GeometryHandle;
pub use index::IndexView;
pub use options::ImportOptions;
pub use server::AssetServer;
pub use triangulate::{flip_winding, triangulate, triangulate_unindexed, Topology};
