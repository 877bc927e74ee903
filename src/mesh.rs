//! Primitive and attribute entities, and the query layer over them
//! (spec §3 `Primitive`/`PrimAttr`, §4.7 primitive access).

use crate::consts::{Mode, Semantic};
use crate::document::{Accessor, Document, Mesh};
use crate::handle::{Handle, OptHandle};
use crate::pool::RangeU32;

/// One draw-call-sized unit of a mesh.
#[derive(Clone, Copy, Debug)]
pub struct Primitive {
    /// Range into [`Document::prim_attrs`].
    pub attributes: RangeU32,
    pub indices: OptHandle<Accessor>,
    pub mode: Mode,
}

/// `(semantic, accessor)`; the semantic's second field (if any) carries the
/// attribute's numeric set index (`TEXCOORD_1` → `TexCoord(1)`).
#[derive(Clone, Copy, Debug)]
pub struct PrimAttr {
    pub semantic: Semantic,
    pub accessor: Handle<Accessor>,
}

impl Document {
    /// `(mesh_index, prim_i) -> Handle<Primitive>`, per spec §4.7.
    pub fn primitive(&self, mesh: Handle<Mesh>, prim_i: u32) -> Option<&Primitive> {
        let handle = self.mesh_primitive_handle(mesh, prim_i)?;
        self.primitives.get(handle.index())
    }

    pub fn primitive_attribute_count(&self, primitive: &Primitive) -> u32 {
        primitive.attributes.count
    }

    pub fn primitive_attributes(&self, primitive: &Primitive) -> &[PrimAttr] {
        let first = primitive.attributes.first as usize;
        let count = primitive.attributes.count as usize;
        self.prim_attrs
            .get(first..first + count)
            .unwrap_or(&[])
    }

    pub fn primitive_attribute(&self, primitive: &Primitive, i: u32) -> Option<&PrimAttr> {
        self.primitive_attributes(primitive).get(i as usize)
    }

    /// Linear scan for a `(semantic, set_index)` pair, per spec §4.7
    /// ("POSITION is located by linearly scanning the attribute range").
    pub fn find_attribute(&self, primitive: &Primitive, semantic: Semantic) -> Option<Handle<Accessor>> {
        self.primitive_attributes(primitive)
            .iter()
            .find(|a| a.semantic == semantic)
            .map(|a| a.accessor)
    }

    pub fn position_accessor(&self, primitive: &Primitive) -> Option<Handle<Accessor>> {
        self.find_attribute(primitive, Semantic::Position)
    }

    /// The number of vertices a triangle/index iterator will walk: the
    /// indices accessor's count when indexed, otherwise POSITION's count.
    /// Mirrors `gltf_mesh_primitive_view`'s `index_count` summary field.
    pub fn index_count(&self, primitive: &Primitive) -> u32 {
        if let Some(indices) = primitive.indices.get() {
            self.accessor(indices).map_or(0, |a| a.count)
        } else {
            self.position_accessor(primitive)
                .and_then(|p| self.accessor(p))
                .map_or(0, |a| a.count)
        }
    }
}
