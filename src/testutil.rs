//! Minimal in-memory document fixtures shared by unit tests across modules.

use crate::accessor::Accessor;
use crate::consts::{ComponentType, ElementType, Mode, Semantic};
use crate::document::Document;
use crate::handle::{Handle, OptHandle};
use crate::mesh::{PrimAttr, Primitive};
use crate::pool::RangeU32;

/// A document with a single non-indexed primitive whose POSITION accessor
/// has `count` elements. Useful for exercising triangle topology math
/// without needing real vertex bytes.
pub fn doc_with_position_count(count: u32) -> (Document, Primitive) {
    let mut doc = Document::empty();
    doc.accessors.push(Accessor {
        buffer_view: OptHandle::ABSENT,
        byte_offset: 0,
        component_type: ComponentType::F32,
        element_type: ElementType::Vec3,
        count,
        normalized: false,
    });
    let position: Handle<Accessor> = Handle::new(0);
    doc.prim_attrs.push(PrimAttr {
        semantic: Semantic::Position,
        accessor: position,
    });
    let primitive = Primitive {
        attributes: RangeU32 { first: 0, count: 1 },
        indices: OptHandle::ABSENT,
        mode: Mode::Triangles,
    };
    (doc, primitive)
}
