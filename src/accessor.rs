//! Accessor, bufferView, and buffer entities (spec §3). The byte-range
//! arithmetic and component decoding that operate on these live in
//! [`crate::span`].

use crate::arena::StrRef;
use crate::consts::{ComponentType, ElementType};
use crate::document::Document;
use crate::handle::{Handle, OptHandle};

/// A typed, counted view over a bufferView.
#[derive(Clone, Copy, Debug)]
pub struct Accessor {
    pub buffer_view: OptHandle<BufferView>,
    pub byte_offset: u32,
    pub component_type: ComponentType,
    pub element_type: ElementType,
    pub count: u32,
    pub normalized: bool,
}

/// An unconditioned byte slice of a buffer.
#[derive(Clone, Copy, Debug)]
pub struct BufferView {
    pub buffer: Handle<Buffer>,
    pub byte_offset: u32,
    pub byte_length: u32,
    /// `0` means tightly packed (spec §8 boundary behavior).
    pub byte_stride: u32,
    pub target: Option<u32>,
}

/// A raw byte array of declared length.
#[derive(Clone, Debug)]
pub struct Buffer {
    pub uri: StrRef,
    pub byte_length: u32,
    pub data: Vec<u8>,
}

impl Document {
    pub fn accessor_info(&self, handle: Handle<Accessor>) -> Option<(u32, ComponentType, ElementType, bool)> {
        self.accessor(handle)
            .map(|a| (a.count, a.component_type, a.element_type, a.normalized))
    }

    pub fn accessor_span(&self, handle: Handle<Accessor>) -> Result<crate::span::Span, crate::error::GltfError> {
        crate::span::compute_span(self, handle)
    }

    pub fn accessor_read_f32(
        &self,
        handle: Handle<Accessor>,
        i: u32,
        out: &mut [f32],
    ) -> Result<u32, crate::error::GltfError> {
        crate::span::read_element_f32(self, handle, i, out)
    }

    /// Reads the raw (non-normalized) `u32` value of a SCALAR index accessor
    /// element, exactly, for component types U8/U16/U32 — unlike
    /// [`Document::accessor_read_f32`], this never round-trips the value
    /// through `f32`, so U32 indices above `2^24` are not lossy (spec §4.7).
    pub fn accessor_read_index_u32(
        &self,
        handle: Handle<Accessor>,
        i: u32,
    ) -> Result<u32, crate::error::GltfError> {
        use crate::error::{ErrorKind, GltfError, Path};

        let path = Path::new().field("accessors").index(handle.index());
        let a = self
            .accessor(handle)
            .ok_or_else(|| GltfError::new(ErrorKind::Invalid, "accessor out of range", path.clone()))?;
        if a.element_type != ElementType::Scalar {
            return Err(GltfError::new(ErrorKind::Parse, "index accessor must be SCALAR", path));
        }
        if a.normalized {
            return Err(GltfError::new(ErrorKind::Parse, "index accessor must not be normalized", path));
        }
        let span = crate::span::compute_span(self, handle)?;
        let bytes = span
            .element_bytes(self, i)
            .ok_or_else(|| GltfError::new(ErrorKind::Invalid, "index out of range", path.clone()))?;
        match a.component_type {
            ComponentType::U8 => Ok(bytes[0] as u32),
            ComponentType::U16 => Ok(u16::from_le_bytes([bytes[0], bytes[1]]) as u32),
            ComponentType::U32 => Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])),
            _ => Err(GltfError::new(ErrorKind::Parse, "index component type must be U8/U16/U32", path)),
        }
    }
}
