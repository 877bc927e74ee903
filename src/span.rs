//! The accessor/span engine: maps an accessor to a validated byte range and
//! decodes individual components to `f32`.
//!
//! Grounded directly on the reference loader's `gltf_accessor_span` /
//! `gltf_accessor_read_f32` (`gltf_accessor.c`) and `gltf_decode_component_to_f32`
//! (`gltf_decode.c`). A [`Span`] does not carry a raw pointer the way the C
//! original's `gltf_span` does — that would need `unsafe` to alias document
//! memory in Rust for no real benefit — instead it carries the owning
//! buffer's handle plus a base byte offset, and every read re-validates
//! against the buffer's length at the call site.

use crate::consts::ComponentType;
use crate::document::{Accessor, Document};
use crate::error::{ErrorKind, GltfError, Path};
use crate::handle::Handle;

/// A non-owning view `(buffer, base_offset, count, stride, elem_size)` into
/// document-owned bytes, per the GLOSSARY's `Span` definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    pub buffer: Handle<crate::document::Buffer>,
    pub base_offset: u32,
    pub count: u32,
    pub stride: u32,
    pub elem_size: u32,
    /// `true` when there is no backing byte range to read (`count == 0`),
    /// matching the C original's `ptr == NULL` case.
    pub empty: bool,
}

impl Span {
    /// Byte slice for element `i`, or `None` if `i` is out of range or the
    /// span has no backing data.
    pub fn element_bytes<'a>(&self, doc: &'a Document, i: u32) -> Option<&'a [u8]> {
        if self.empty || i >= self.count {
            return None;
        }
        let buffer = doc.buffer(self.buffer)?;
        let start = self.base_offset as usize + i as usize * self.stride as usize;
        let end = start + self.elem_size as usize;
        buffer.data.get(start..end)
    }
}

/// Computes the validated [`Span`] for `accessor`, per spec §4.6.
pub fn compute_span(doc: &Document, accessor: Handle<Accessor>) -> Result<Span, GltfError> {
    let path = Path::new().field("accessors").index(accessor.index());
    let a = doc
        .accessor(accessor)
        .ok_or_else(|| GltfError::new(ErrorKind::Invalid, "accessor out of range", path.clone()))?;

    let buffer_view = a.buffer_view.get().ok_or_else(|| {
        GltfError::new(
            ErrorKind::Parse,
            "accessor has no bufferView",
            path.field("bufferView"),
        )
    })?;
    let bv = doc.buffer_view(buffer_view).ok_or_else(|| {
        GltfError::new(
            ErrorKind::Parse,
            "bufferView out of range",
            path.field("bufferView"),
        )
    })?;
    let buffer = doc.buffer(bv.buffer).ok_or_else(|| {
        GltfError::new(
            ErrorKind::Parse,
            "buffer out of range",
            Path::new().field("bufferViews").index(buffer_view.index()).field("buffer"),
        )
    })?;
    let comp_count = a.element_type.component_count();
    let comp_size = a.component_type.size_bytes();
    let elem_size = comp_count
        .checked_mul(comp_size)
        .ok_or_else(|| GltfError::new(ErrorKind::Parse, "accessor element size overflow", path.clone()))?;
    let stride = if bv.byte_stride != 0 {
        bv.byte_stride
    } else {
        elem_size
    };
    if stride < elem_size {
        return Err(GltfError::new(
            ErrorKind::Parse,
            "bufferView.byteStride smaller than element size",
            Path::new().field("bufferViews").index(buffer_view.index()).field("byteStride"),
        ));
    }

    let rel = a.byte_offset;
    if rel > bv.byte_length {
        return Err(GltfError::new(
            ErrorKind::Parse,
            "accessor offset out of bufferView bounds",
            path.field("byteOffset"),
        ));
    }

    let count = a.count;
    if count > 0 {
        let last_rel = (rel as u64)
            .checked_add((count as u64 - 1) * stride as u64)
            .ok_or_else(|| GltfError::new(ErrorKind::Parse, "accessor range overflow", path.clone()))?;
        let end_rel = last_rel
            .checked_add(elem_size as u64)
            .ok_or_else(|| GltfError::new(ErrorKind::Parse, "accessor range overflow", path.clone()))?;
        if end_rel > bv.byte_length as u64 {
            return Err(GltfError::new(
                ErrorKind::Parse,
                "accessor range out of bufferView bounds",
                path,
            ));
        }
    }

    let base_offset = bv.byte_offset + a.byte_offset;
    Ok(Span {
        buffer: bv.buffer,
        base_offset,
        count,
        stride,
        elem_size,
        empty: count == 0 || buffer.data.is_empty(),
    })
}

/// Decodes a single component to `f32`, applying normalization rules when
/// `normalized` is set (spec §4.6). `bytes` must be at least
/// `component_type.size_bytes()` long, pointing at the component's first
/// byte (little-endian, possibly unaligned).
pub fn decode_component_to_f32(bytes: &[u8], component_type: ComponentType, normalized: bool) -> f32 {
    match component_type {
        ComponentType::F32 => {
            let arr = [bytes[0], bytes[1], bytes[2], bytes[3]];
            f32::from_le_bytes(arr)
        }
        ComponentType::U8 => {
            let v = bytes[0] as f32;
            if normalized {
                v / 255.0
            } else {
                v
            }
        }
        ComponentType::I8 => {
            let v = bytes[0] as i8;
            if normalized {
                if v == i8::MIN {
                    -1.0
                } else {
                    v as f32 / 127.0
                }
            } else {
                v as f32
            }
        }
        ComponentType::U16 => {
            let v = u16::from_le_bytes([bytes[0], bytes[1]]) as f32;
            if normalized {
                v / 65535.0
            } else {
                v
            }
        }
        ComponentType::I16 => {
            let v = i16::from_le_bytes([bytes[0], bytes[1]]);
            if normalized {
                if v == i16::MIN {
                    -1.0
                } else {
                    v as f32 / 32767.0
                }
            } else {
                v as f32
            }
        }
        ComponentType::U32 => {
            let v = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
            if normalized {
                (v as f64 / 4294967295.0) as f32
            } else {
                v as f32
            }
        }
    }
}

/// Reads accessor element `i` into `out`, per `gltf_accessor_read_f32`.
/// `out` must be at least `comp_count` long; returns the number of
/// components written.
pub fn read_element_f32(
    doc: &Document,
    accessor: Handle<Accessor>,
    i: u32,
    out: &mut [f32],
) -> Result<u32, GltfError> {
    let path = Path::new().field("accessors").index(accessor.index());
    let a = doc
        .accessor(accessor)
        .ok_or_else(|| GltfError::new(ErrorKind::Invalid, "accessor out of range", path.clone()))?;
    let comp_count = a.element_type.component_count();
    if (out.len() as u32) < comp_count {
        return Err(GltfError::new(ErrorKind::Invalid, "output buffer too small", path));
    }

    let span = compute_span(doc, accessor)?;
    if i >= span.count {
        return Err(GltfError::new(ErrorKind::Invalid, "element index out of range", path));
    }
    let bytes = span
        .element_bytes(doc, i)
        .ok_or_else(|| GltfError::new(ErrorKind::Parse, "span has no data", path.clone()))?;

    let comp_size = a.component_type.size_bytes() as usize;
    for k in 0..comp_count as usize {
        let start = k * comp_size;
        out[k] = decode_component_to_f32(&bytes[start..start + comp_size], a.component_type, a.normalized);
    }
    Ok(comp_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn f32_component_roundtrips() {
        let bytes = 1.5f32.to_le_bytes();
        assert_relative_eq!(decode_component_to_f32(&bytes, ComponentType::F32, false), 1.5);
    }

    #[test]
    fn signed_min_normalizes_to_exactly_minus_one() {
        let bytes = [-128i8 as u8];
        assert_eq!(decode_component_to_f32(&bytes, ComponentType::I8, true), -1.0);
        let bytes16 = (-32768i16).to_le_bytes();
        assert_eq!(decode_component_to_f32(&bytes16, ComponentType::I16, true), -1.0);
    }

    #[test]
    fn unsigned_byte_normalizes_by_max() {
        let bytes = [255u8];
        assert_relative_eq!(decode_component_to_f32(&bytes, ComponentType::U8, true), 1.0);
        let bytes = [0u8];
        assert_relative_eq!(decode_component_to_f32(&bytes, ComponentType::U8, true), 0.0);
    }
}
