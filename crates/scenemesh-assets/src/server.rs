use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::AssetError;
use crate::geometry::Geometry;
use crate::gltf_loader::{self, ImportReport};
use crate::handle::GeometryHandle;
use crate::options::ImportOptions;

/// Caller-side cache of flattened geometry, keyed by resolved file path.
///
/// Each load runs the importer on its own; the server only remembers the
/// finished [`Geometry`] so repeated requests for one file are free.
pub struct AssetServer {
    base_path: PathBuf,
    options: ImportOptions,
    geometries: Vec<Geometry>,
    path_to_geometry: HashMap<PathBuf, GeometryHandle>,
}

impl AssetServer {
    /// Create a new AssetServer rooted at the given base path.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self::with_options(base_path, ImportOptions::default())
    }

    /// Create a server that imports with `options`.
    pub fn with_options(base_path: impl Into<PathBuf>, options: ImportOptions) -> Self {
        let base_path = base_path.into();
        info!("AssetServer created with base path: {}", base_path.display());
        Self {
            base_path,
            options,
            geometries: Vec::new(),
            path_to_geometry: HashMap::new(),
        }
    }

    /// Resolve a relative asset path against the base path.
    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_path.join(path)
        }
    }

    /// Load and flatten a glTF file, returning a handle to its geometry.
    /// Subsequent loads of the same path return the cached handle.
    pub fn load_geometry(&mut self, path: &Path) -> Result<GeometryHandle, AssetError> {
        self.load_with_report(path).map(|(handle, _)| handle)
    }

    /// Like [`load_geometry`](Self::load_geometry), also returning the import
    /// report. A cached hit reports nothing new and yields `None`.
    pub fn load_with_report(
        &mut self,
        path: &Path,
    ) -> Result<(GeometryHandle, Option<ImportReport>), AssetError> {
        let full_path = self.resolve(path);

        if let Some(&handle) = self.path_to_geometry.get(&full_path) {
            return Ok((handle, None));
        }

        if !full_path.exists() {
            return Err(AssetError::NotFound(full_path));
        }

        let (geometry, report) = gltf_loader::import_geometry(&full_path, &self.options)?;
        if !report.skipped.is_empty() {
            warn!(
                "{}: {} primitives skipped",
                full_path.display(),
                report.skipped.len()
            );
        }
        info!(
            "Loaded '{}': {} vertices, {} triangles",
            full_path.display(),
            geometry.vertex_count(),
            geometry.triangle_count()
        );

        let handle = GeometryHandle::new(self.geometries.len());
        self.geometries.push(geometry);
        self.path_to_geometry.insert(full_path, handle);

        Ok((handle, Some(report)))
    }

    /// Get a reference to loaded geometry by its handle.
    pub fn get_geometry(&self, handle: GeometryHandle) -> Option<&Geometry> {
        self.geometries.get(handle.slot())
    }

    /// Check if a handle refers to loaded geometry.
    pub fn is_loaded(&self, handle: GeometryHandle) -> bool {
        handle.slot() < self.geometries.len()
    }

    /// Number of distinct files loaded so far.
    pub fn len(&self) -> usize {
        self.geometries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty()
    }

    /// The base path this server resolves relative paths against.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Options every load through this server uses.
    pub fn options(&self) -> &ImportOptions {
        &self.options
    }
}
