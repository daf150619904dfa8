use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::GeometryError;

/// Number of floats making up one interleaved vertex.
pub const FLOATS_PER_VERTEX: usize = 8;

/// Byte stride of one interleaved vertex in [`Geometry::vertices`].
pub const VERTEX_STRIDE: usize = FLOATS_PER_VERTEX * std::mem::size_of::<f32>();

/// Interleaved vertex as laid out in the flattened vertex buffer.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
    pub normal: [f32; 3],
}

impl Vertex {
    pub fn new(position: [f32; 3], uv: [f32; 2], normal: [f32; 3]) -> Self {
        Self {
            position,
            uv,
            normal,
        }
    }
}

/// Flattened, renderer-ready geometry.
///
/// `vertices` holds `[px, py, pz, u, v, nx, ny, nz]` per vertex and
/// `indices` is a triangle list into that vertex sequence.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl Geometry {
    /// Create empty geometry.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / FLOATS_PER_VERTEX
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.indices.is_empty()
    }

    /// Append one interleaved vertex.
    pub fn push_vertex(&mut self, vertex: Vertex) {
        self.vertices
            .extend_from_slice(bytemuck::cast_slice(std::slice::from_ref(&vertex)));
    }

    /// Typed view of the vertex buffer, or `None` if it holds a partial vertex.
    pub fn as_vertices(&self) -> Option<&[Vertex]> {
        bytemuck::try_cast_slice(&self.vertices).ok()
    }

    /// Vertex at `index`.
    pub fn vertex(&self, index: usize) -> Option<Vertex> {
        self.as_vertices()?.get(index).copied()
    }

    /// Raw vertex bytes, ready for upload with a [`VERTEX_STRIDE`] stride.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Raw 32-bit index bytes.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Concatenate `other`, rebasing its indices past the vertices already held.
    pub fn append(&mut self, other: &Geometry) {
        let base_vertex = self.vertex_count() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices
            .extend(other.indices.iter().map(|&index| base_vertex + index));
    }

    /// Axis-aligned bounds of all vertex positions.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut positions = self
            .as_vertices()?
            .iter()
            .map(|v| Vec3::from_array(v.position));
        let first = positions.next()?;
        Some(positions.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }

    /// Check the output contract: whole vertices, whole triangles, and every
    /// index inside the vertex buffer.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.vertices.len() % FLOATS_PER_VERTEX != 0 {
            return Err(GeometryError::PartialVertex(self.vertices.len()));
        }
        if self.indices.len() % 3 != 0 {
            return Err(GeometryError::PartialTriangle(self.indices.len()));
        }
        let vertex_count = self.vertex_count();
        if let Some(&index) = self.indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(GeometryError::IndexOutOfRange {
                index,
                vertex_count,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Geometry {
        let mut geometry = Geometry::new();
        geometry.push_vertex(Vertex::new([0.0, 0.0, 0.0], [0.0, 0.0], [0.0, 0.0, 1.0]));
        geometry.push_vertex(Vertex::new([1.0, 0.0, 0.0], [1.0, 0.0], [0.0, 0.0, 1.0]));
        geometry.push_vertex(Vertex::new([0.0, 1.0, -2.0], [0.0, 1.0], [0.0, 0.0, 1.0]));
        geometry.indices.extend_from_slice(&[0, 2, 1]);
        geometry
    }

    #[test]
    fn vertex_layout_is_32_bytes() {
        assert_eq!(VERTEX_STRIDE, 32);
        assert_eq!(std::mem::size_of::<Vertex>(), VERTEX_STRIDE);
    }

    #[test]
    fn push_vertex_interleaves() {
        let geometry = triangle();
        assert_eq!(geometry.vertex_count(), 3);
        assert_eq!(geometry.triangle_count(), 1);
        assert_eq!(
            &geometry.vertices[16..24],
            &[0.0, 1.0, -2.0, 0.0, 1.0, 0.0, 0.0, 1.0]
        );
        assert_eq!(geometry.vertex(1).unwrap().uv, [1.0, 0.0]);
        assert!(geometry.vertex(3).is_none());
        assert_eq!(geometry.vertex_bytes().len(), 3 * VERTEX_STRIDE);
        assert_eq!(geometry.index_bytes().len(), 12);
    }

    #[test]
    fn append_rebases_indices() {
        let mut combined = triangle();
        combined.append(&triangle());
        assert_eq!(combined.vertex_count(), 6);
        assert_eq!(combined.indices, vec![0, 2, 1, 3, 5, 4]);
        assert!(combined.validate().is_ok());
    }

    #[test]
    fn bounds_cover_all_positions() {
        let (min, max) = triangle().bounds().unwrap();
        assert_eq!(min, Vec3::new(0.0, 0.0, -2.0));
        assert_eq!(max, Vec3::new(1.0, 1.0, 0.0));
        assert!(Geometry::new().bounds().is_none());
    }

    #[test]
    fn validate_reports_contract_violations() {
        let mut geometry = triangle();
        geometry.indices.push(0);
        assert_eq!(geometry.validate(), Err(GeometryError::PartialTriangle(4)));

        let mut geometry = triangle();
        geometry.indices.extend_from_slice(&[0, 1, 3]);
        assert_eq!(
            geometry.validate(),
            Err(GeometryError::IndexOutOfRange {
                index: 3,
                vertex_count: 3
            })
        );

        let mut geometry = triangle();
        geometry.vertices.pop();
        assert_eq!(geometry.validate(), Err(GeometryError::PartialVertex(23)));
        assert!(geometry.as_vertices().is_none());
    }
}
