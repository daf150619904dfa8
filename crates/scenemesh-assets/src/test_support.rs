//! In-memory glTF fixture builder for tests.
//!
//! Accumulates a single little-endian binary buffer plus the JSON that
//! describes it, and writes either a `.glb` container or a `.gltf` file with
//! a sibling `.bin`.

use std::path::{Path, PathBuf};

use serde_json::{json, Value};

pub(crate) const MODE_LINES: u32 = 1;
pub(crate) const MODE_TRIANGLES: u32 = 4;
pub(crate) const MODE_STRIP: u32 = 5;
pub(crate) const MODE_FAN: u32 = 6;

const FLOAT: u32 = 5126;
const UNSIGNED_BYTE: u32 = 5121;
const SHORT: u32 = 5122;
const UNSIGNED_SHORT: u32 = 5123;
const UNSIGNED_INT: u32 = 5125;

/// Build a primitive object.
pub(crate) fn primitive(attributes: Value, indices: Option<usize>, mode: u32) -> Value {
    let mut primitive = json!({ "attributes": attributes, "mode": mode });
    if let Some(indices) = indices {
        primitive["indices"] = json!(indices);
    }
    primitive
}

#[derive(Default)]
pub(crate) struct SceneBuilder {
    bin: Vec<u8>,
    buffer_views: Vec<Value>,
    accessors: Vec<Value>,
    meshes: Vec<Value>,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bin(&self) -> &[u8] {
        &self.bin
    }

    /// Append `bytes` as a new buffer view, 4-byte aligned.
    pub fn view(&mut self, bytes: &[u8], stride: Option<usize>) -> usize {
        let offset = self.bin.len();
        self.bin.extend_from_slice(bytes);
        while self.bin.len() % 4 != 0 {
            self.bin.push(0);
        }

        let mut view = json!({ "buffer": 0, "byteOffset": offset, "byteLength": bytes.len() });
        if let Some(stride) = stride {
            view["byteStride"] = json!(stride);
        }
        self.buffer_views.push(view);
        self.buffer_views.len() - 1
    }

    pub fn accessor(&mut self, accessor: Value) -> usize {
        self.accessors.push(accessor);
        self.accessors.len() - 1
    }

    /// Float VEC3 positions with the bounds a POSITION accessor carries.
    pub fn positions(&mut self, positions: &[[f32; 3]]) -> usize {
        let mut min = [f32::MAX; 3];
        let mut max = [f32::MIN; 3];
        for p in positions {
            for axis in 0..3 {
                min[axis] = min[axis].min(p[axis]);
                max[axis] = max[axis].max(p[axis]);
            }
        }
        let view = self.view(&float_bytes(positions.iter().flatten()), None);
        self.accessor(json!({
            "bufferView": view, "componentType": FLOAT, "count": positions.len(),
            "type": "VEC3", "min": min, "max": max
        }))
    }

    pub fn vec2(&mut self, values: &[[f32; 2]]) -> usize {
        let view = self.view(&float_bytes(values.iter().flatten()), None);
        self.accessor(json!({
            "bufferView": view, "componentType": FLOAT, "count": values.len(), "type": "VEC2"
        }))
    }

    pub fn vec3(&mut self, values: &[[f32; 3]]) -> usize {
        let view = self.view(&float_bytes(values.iter().flatten()), None);
        self.accessor(json!({
            "bufferView": view, "componentType": FLOAT, "count": values.len(), "type": "VEC3"
        }))
    }

    pub fn indices_u8(&mut self, indices: &[u8]) -> usize {
        self.scalar(indices.to_vec(), UNSIGNED_BYTE, indices.len())
    }

    pub fn indices_u16(&mut self, indices: &[u16]) -> usize {
        let bytes = indices.iter().flat_map(|i| i.to_le_bytes()).collect();
        self.scalar(bytes, UNSIGNED_SHORT, indices.len())
    }

    pub fn indices_u32(&mut self, indices: &[u32]) -> usize {
        let bytes = indices.iter().flat_map(|i| i.to_le_bytes()).collect();
        self.scalar(bytes, UNSIGNED_INT, indices.len())
    }

    /// Signed 16-bit indices, which are not a valid index type.
    pub fn accessor_i16_indices(&mut self, indices: &[i16]) -> usize {
        let bytes = indices.iter().flat_map(|i| i.to_le_bytes()).collect();
        self.scalar(bytes, SHORT, indices.len())
    }

    fn scalar(&mut self, bytes: Vec<u8>, component_type: u32, count: usize) -> usize {
        let view = self.view(&bytes, None);
        self.accessor(json!({
            "bufferView": view, "componentType": component_type, "count": count, "type": "SCALAR"
        }))
    }

    pub fn mesh(&mut self, primitives: Vec<Value>) {
        self.meshes.push(json!({ "primitives": primitives }));
    }

    /// Document JSON; `uri` names an external buffer, `None` means the GLB chunk.
    pub fn to_json(&self, uri: Option<&str>) -> Value {
        let mut buffer = json!({ "byteLength": self.bin.len() });
        if let Some(uri) = uri {
            buffer["uri"] = json!(uri);
        }
        json!({
            "asset": { "version": "2.0" },
            "buffers": [buffer],
            "bufferViews": self.buffer_views,
            "accessors": self.accessors,
            "meshes": self.meshes,
        })
    }

    /// Write a binary container into `dir`.
    pub fn write_glb(&self, dir: &Path, name: &str) -> PathBuf {
        let mut json = self.to_json(None).to_string().into_bytes();
        while json.len() % 4 != 0 {
            json.push(b' ');
        }

        let total = 12 + 8 + json.len() + 8 + self.bin.len();
        let mut glb = Vec::with_capacity(total);
        glb.extend_from_slice(b"glTF");
        glb.extend_from_slice(&2u32.to_le_bytes());
        glb.extend_from_slice(&(total as u32).to_le_bytes());

        glb.extend_from_slice(&(json.len() as u32).to_le_bytes());
        glb.extend_from_slice(b"JSON");
        glb.extend_from_slice(&json);

        glb.extend_from_slice(&(self.bin.len() as u32).to_le_bytes());
        glb.extend_from_slice(b"BIN\0");
        glb.extend_from_slice(&self.bin);

        let path = dir.join(name);
        std::fs::write(&path, glb).unwrap();
        path
    }

    /// Write a `.gltf` file with its buffer in a sibling `bin_name` file.
    pub fn write_gltf(&self, dir: &Path, name: &str, bin_name: &str) -> PathBuf {
        std::fs::write(dir.join(bin_name), &self.bin).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, self.to_json(Some(bin_name)).to_string()).unwrap();
        path
    }
}

fn float_bytes<'a>(values: impl Iterator<Item = &'a f32>) -> Vec<u8> {
    values.flat_map(|v| v.to_le_bytes()).collect()
}
