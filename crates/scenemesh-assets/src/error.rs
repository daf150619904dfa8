use std::path::PathBuf;

use crate::accessor::ComponentType;

/// Errors that can occur while decoding raw accessor data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("read of {size} bytes at offset {offset} overruns buffer of {len} bytes")]
    OutOfBounds { offset: usize, size: usize, len: usize },

    #[error("stride {stride} is smaller than element size {element_size}")]
    StrideTooSmall { stride: usize, element_size: usize },

    #[error("unsupported index component type {0:?}")]
    UnsupportedIndexType(ComponentType),

    #[error("buffer {0} has no resolved data")]
    MissingBuffer(usize),
}

/// Errors that can occur during asset loading.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to parse glTF file '{0}': {1}")]
    Parse(PathBuf, String),

    #[error("failed to resolve buffers for '{0}': {1}")]
    BufferResolve(PathBuf, String),

    #[error("I/O error loading '{0}': {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("mesh {mesh} primitive {primitive}: {source}")]
    Decode {
        mesh: usize,
        primitive: usize,
        #[source]
        source: DecodeError,
    },
}

/// Violations of the flattened geometry contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    #[error("vertex buffer length {0} is not a multiple of the vertex size")]
    PartialVertex(usize),

    #[error("index buffer length {0} is not a multiple of three")]
    PartialTriangle(usize),

    #[error("index {index} references a vertex beyond the {vertex_count} available")]
    IndexOutOfRange { index: u32, vertex_count: usize },
}
