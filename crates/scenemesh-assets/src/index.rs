use crate::accessor::{read_bytes, AccessorKind, AccessorLayout, ComponentType};
use crate::error::DecodeError;

/// Read-only view of an index accessor, widening every element to `u32`.
///
/// Only unsigned 8-, 16- and 32-bit components are valid index types; the
/// accessor's element shape is ignored and treated as scalar.
#[derive(Debug, Clone, Copy)]
pub struct IndexView<'a> {
    layout: AccessorLayout,
    data: &'a [u8],
}

impl<'a> IndexView<'a> {
    /// Create a view over unsigned index data. The layout is read as scalar
    /// and checked against `data` the same way attribute streams are.
    pub fn new(layout: AccessorLayout, data: &'a [u8]) -> Result<Self, DecodeError> {
        match layout.component_type {
            ComponentType::U8 | ComponentType::U16 | ComponentType::U32 => {}
            other => return Err(DecodeError::UnsupportedIndexType(other)),
        }
        let layout = AccessorLayout {
            kind: AccessorKind::Scalar,
            ..layout
        };
        layout.check(data)?;
        Ok(Self { layout, data })
    }

    pub fn len(&self) -> usize {
        self.layout.count
    }

    pub fn is_empty(&self) -> bool {
        self.layout.count == 0
    }

    /// Read index `position`.
    pub fn read(&self, position: usize) -> Result<u32, DecodeError> {
        let size = self.layout.component_type.byte_size();
        let offset = self
            .layout
            .element_offset(position)
            .ok_or(DecodeError::OutOfBounds {
                offset: usize::MAX,
                size,
                len: self.data.len(),
            })?;
        match self.layout.component_type {
            ComponentType::U8 => Ok(u8::from_le_bytes(read_bytes(self.data, offset)?) as u32),
            ComponentType::U16 => Ok(u16::from_le_bytes(read_bytes(self.data, offset)?) as u32),
            ComponentType::U32 => Ok(u32::from_le_bytes(read_bytes(self.data, offset)?)),
            other => Err(DecodeError::UnsupportedIndexType(other)),
        }
    }

    /// Read every index in order.
    pub fn read_all(&self) -> Result<Vec<u32>, DecodeError> {
        (0..self.len()).map(|i| self.read(i)).collect()
    }
}
