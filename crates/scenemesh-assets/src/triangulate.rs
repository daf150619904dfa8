/// Triangle-based primitive topologies accepted by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topology {
    Triangles,
    TriangleStrip,
    TriangleFan,
}

impl Topology {
    /// Map a glTF primitive mode, returning `None` for points and lines.
    pub fn from_mode(mode: gltf::mesh::Mode) -> Option<Self> {
        use gltf::mesh::Mode;
        match mode {
            Mode::Triangles => Some(Self::Triangles),
            Mode::TriangleStrip => Some(Self::TriangleStrip),
            Mode::TriangleFan => Some(Self::TriangleFan),
            Mode::Points | Mode::Lines | Mode::LineLoop | Mode::LineStrip => None,
        }
    }
}

/// Swap the second and third index of every complete triple in `indices`.
pub fn flip_winding(indices: &mut [u32]) {
    for triangle in indices.chunks_exact_mut(3) {
        triangle.swap(1, 2);
    }
}

/// Append a flat triangle list for `indices` to `out`.
///
/// Indices stay in the primitive's local numbering; the caller adds the
/// base vertex. Triangle lists get their winding flipped to match the
/// mirrored Z axis, and a trailing partial triangle is dropped. Strips
/// alternate `(a, b, c)` / `(b, a, c)` by parity, fans pivot on the first
/// index. Fewer than three indices produce nothing.
pub fn triangulate(topology: Topology, indices: &[u32], out: &mut Vec<u32>) {
    match topology {
        Topology::Triangles => {
            let start = out.len();
            for triangle in indices.chunks_exact(3) {
                out.extend_from_slice(triangle);
            }
            // Only this primitive's triangles; earlier output is already final.
            flip_winding(&mut out[start..]);
        }
        Topology::TriangleStrip => {
            for i in 2..indices.len() {
                let (a, b, c) = (indices[i - 2], indices[i - 1], indices[i]);
                if i % 2 == 0 {
                    out.extend_from_slice(&[a, b, c]);
                } else {
                    out.extend_from_slice(&[b, a, c]);
                }
            }
        }
        Topology::TriangleFan => {
            let Some(&hub) = indices.first() else {
                return;
            };
            for i in 2..indices.len() {
                out.extend_from_slice(&[hub, indices[i - 1], indices[i]]);
            }
        }
    }
}

/// Same as [`triangulate`] for a primitive without an index accessor, where
/// vertices are consumed in order `0..vertex_count`.
pub fn triangulate_unindexed(topology: Topology, vertex_count: u32, out: &mut Vec<u32>) {
    let sequential: Vec<u32> = (0..vertex_count).collect();
    triangulate(topology, &sequential, out);
}
