//! Typed, strided accessor decoding.
//!
//! An accessor describes one attribute stream inside a binary buffer: the
//! component representation, how many components make up an element, where
//! the first element starts and how far apart consecutive elements are.
//! [`AccessorView`] pairs that description with the buffer bytes and decodes
//! single elements into `f32` channels.

use crate::error::DecodeError;

/// Scalar representation of a single accessor component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    F32,
    F64,
}

impl ComponentType {
    /// Size in bytes of one component.
    pub fn byte_size(self) -> usize {
        match self {
            Self::I8 | Self::U8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::I32 | Self::U32 | Self::F32 => 4,
            Self::F64 => 8,
        }
    }
}

impl From<gltf::accessor::DataType> for ComponentType {
    fn from(data_type: gltf::accessor::DataType) -> Self {
        use gltf::accessor::DataType;
        match data_type {
            DataType::I8 => Self::I8,
            DataType::U8 => Self::U8,
            DataType::I16 => Self::I16,
            DataType::U16 => Self::U16,
            DataType::U32 => Self::U32,
            DataType::F32 => Self::F32,
        }
    }
}

/// Element shape of an accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessorKind {
    Scalar,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
}

impl AccessorKind {
    /// Number of components in one element.
    pub fn component_count(self) -> usize {
        match self {
            Self::Scalar => 1,
            Self::Vec2 => 2,
            Self::Vec3 => 3,
            Self::Vec4 | Self::Mat2 => 4,
            Self::Mat3 => 9,
            Self::Mat4 => 16,
        }
    }
}

impl From<gltf::accessor::Dimensions> for AccessorKind {
    fn from(dimensions: gltf::accessor::Dimensions) -> Self {
        use gltf::accessor::Dimensions;
        match dimensions {
            Dimensions::Scalar => Self::Scalar,
            Dimensions::Vec2 => Self::Vec2,
            Dimensions::Vec3 => Self::Vec3,
            Dimensions::Vec4 => Self::Vec4,
            Dimensions::Mat2 => Self::Mat2,
            Dimensions::Mat3 => Self::Mat3,
            Dimensions::Mat4 => Self::Mat4,
        }
    }
}

/// Location and format of an attribute stream within one buffer.
///
/// Combines the accessor's own fields with the buffer view it reads through,
/// so decoding needs nothing but this layout and the buffer bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessorLayout {
    pub component_type: ComponentType,
    pub kind: AccessorKind,
    /// Number of elements.
    pub count: usize,
    /// Offset of the first element relative to the buffer view.
    pub byte_offset: usize,
    /// Offset of the buffer view within the buffer.
    pub view_offset: usize,
    /// Explicit byte stride of the buffer view. `None` or zero means packed.
    pub view_stride: Option<usize>,
    /// Whether integer components map to `[0, 1]` / `[-1, 1]`.
    pub normalized: bool,
}

impl AccessorLayout {
    /// Layout of a tightly packed stream starting at the beginning of the buffer.
    pub fn packed(component_type: ComponentType, kind: AccessorKind, count: usize) -> Self {
        Self {
            component_type,
            kind,
            count,
            byte_offset: 0,
            view_offset: 0,
            view_stride: None,
            normalized: false,
        }
    }

    /// Natural size of one element in bytes.
    pub fn element_size(&self) -> usize {
        self.component_type.byte_size() * self.kind.component_count()
    }

    /// Distance in bytes between consecutive elements.
    pub fn stride(&self) -> usize {
        match self.view_stride {
            Some(stride) if stride > 0 => stride,
            _ => self.element_size(),
        }
    }

    /// Byte offset of element `index` within the buffer, or `None` if it
    /// does not fit in `usize`.
    pub fn element_offset(&self, index: usize) -> Option<usize> {
        self.view_offset
            .checked_add(self.byte_offset)?
            .checked_add(index.checked_mul(self.stride())?)
    }

    /// Check the layout against the bytes it reads from: an explicit stride
    /// must hold a whole element and every element must lie inside `data`.
    pub(crate) fn check(&self, data: &[u8]) -> Result<(), DecodeError> {
        let element_size = self.element_size();
        if let Some(stride) = self.view_stride.filter(|&s| s > 0) {
            if stride < element_size {
                return Err(DecodeError::StrideTooSmall {
                    stride,
                    element_size,
                });
            }
        }
        let Some(last) = self.count.checked_sub(1) else {
            return Ok(());
        };
        let offset = self.element_offset(last);
        match offset.and_then(|offset| offset.checked_add(element_size)) {
            Some(end) if end <= data.len() => Ok(()),
            _ => Err(DecodeError::OutOfBounds {
                offset: offset.unwrap_or(usize::MAX),
                size: element_size,
                len: data.len(),
            }),
        }
    }

    /// Build a layout from a parsed glTF accessor.
    ///
    /// Returns the layout together with the index of the buffer it reads from,
    /// or `None` when the accessor has no buffer view (sparse or zero-filled).
    pub(crate) fn from_gltf(accessor: &gltf::Accessor<'_>) -> Option<(Self, usize)> {
        let view = accessor.view()?;
        let layout = Self {
            component_type: accessor.data_type().into(),
            kind: accessor.dimensions().into(),
            count: accessor.count(),
            byte_offset: accessor.offset(),
            view_offset: view.offset(),
            view_stride: view.stride(),
            normalized: accessor.normalized(),
        };
        Some((layout, view.buffer().index()))
    }
}

/// Read-only view of one accessor over the bytes of its buffer.
#[derive(Debug, Clone, Copy)]
pub struct AccessorView<'a> {
    layout: AccessorLayout,
    data: &'a [u8],
}

impl<'a> AccessorView<'a> {
    /// Create a view, rejecting an explicit stride narrower than one element
    /// and a declared count that runs past the end of `data`.
    pub fn new(layout: AccessorLayout, data: &'a [u8]) -> Result<Self, DecodeError> {
        layout.check(data)?;
        Ok(Self { layout, data })
    }

    pub fn layout(&self) -> &AccessorLayout {
        &self.layout
    }

    /// Number of elements in the stream.
    pub fn len(&self) -> usize {
        self.layout.count
    }

    pub fn is_empty(&self) -> bool {
        self.layout.count == 0
    }

    /// Number of components stored per element.
    pub fn component_count(&self) -> usize {
        self.layout.kind.component_count()
    }

    /// Decode element `index` into `N` float channels.
    ///
    /// Channels beyond the accessor's component count are padded: the fourth
    /// channel (`w`/alpha) with `1.0`, every other one with `0.0`. Components
    /// beyond `N` are ignored.
    pub fn read<const N: usize>(&self, index: usize) -> Result<[f32; N], DecodeError> {
        let component_type = self.layout.component_type;
        let component_size = component_type.byte_size();
        let available = self.component_count();
        let out_of_bounds = DecodeError::OutOfBounds {
            offset: usize::MAX,
            size: component_size,
            len: self.data.len(),
        };
        let base = self
            .layout
            .element_offset(index)
            .ok_or_else(|| out_of_bounds.clone())?;

        let mut out = [0.0; N];
        for (i, channel) in out.iter_mut().enumerate() {
            *channel = if i < available {
                let offset = base
                    .checked_add(i * component_size)
                    .ok_or_else(|| out_of_bounds.clone())?;
                read_component(self.data, offset, component_type, self.layout.normalized)?
            } else if i == 3 {
                1.0
            } else {
                0.0
            };
        }
        Ok(out)
    }
}

/// Copy `S` bytes starting at `offset`, failing instead of reading past the end.
pub(crate) fn read_bytes<const S: usize>(data: &[u8], offset: usize) -> Result<[u8; S], DecodeError> {
    offset
        .checked_add(S)
        .and_then(|end| data.get(offset..end))
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or(DecodeError::OutOfBounds {
            offset,
            size: S,
            len: data.len(),
        })
}

/// Decode one little-endian component at `offset` as `f32`.
///
/// Floats are read directly (doubles narrowed). Integers are widened, or when
/// `normalized` is set, divided by the type's maximum and clamped to `[-1, 1]`
/// for signed and `[0, 1]` for unsigned types.
pub fn read_component(
    data: &[u8],
    offset: usize,
    component_type: ComponentType,
    normalized: bool,
) -> Result<f32, DecodeError> {
    let value = match component_type {
        ComponentType::F32 => f32::from_le_bytes(read_bytes(data, offset)?),
        ComponentType::F64 => f64::from_le_bytes(read_bytes(data, offset)?) as f32,
        ComponentType::I8 => signed(
            i8::from_le_bytes(read_bytes(data, offset)?) as f32,
            i8::MAX as f32,
            normalized,
        ),
        ComponentType::U8 => unsigned(
            u8::from_le_bytes(read_bytes(data, offset)?) as f32,
            u8::MAX as f32,
            normalized,
        ),
        ComponentType::I16 => signed(
            i16::from_le_bytes(read_bytes(data, offset)?) as f32,
            i16::MAX as f32,
            normalized,
        ),
        ComponentType::U16 => unsigned(
            u16::from_le_bytes(read_bytes(data, offset)?) as f32,
            u16::MAX as f32,
            normalized,
        ),
        ComponentType::I32 => signed(
            i32::from_le_bytes(read_bytes(data, offset)?) as f32,
            i32::MAX as f32,
            normalized,
        ),
        ComponentType::U32 => unsigned(
            u32::from_le_bytes(read_bytes(data, offset)?) as f32,
            u32::MAX as f32,
            normalized,
        ),
    };
    Ok(value)
}

fn signed(value: f32, max: f32, normalized: bool) -> f32 {
    if normalized {
        // The most negative value divides to slightly below -1.0.
        (value / max).clamp(-1.0, 1.0)
    } else {
        value
    }
}

fn unsigned(value: f32, max: f32, normalized: bool) -> f32 {
    if normalized {
        (value / max).clamp(0.0, 1.0)
    } else {
        value
    }
}
