//! Integer handles into the document's flat entity arrays.
//!
//! Every inter-entity reference in the document (a node's mesh, a
//! primitive's indices accessor, a texture's sampler and source) is one of
//! these: a plain `u32` offset, phantom-typed so that a `Handle<Mesh>`
//! cannot be confused with a `Handle<Accessor>` at compile time. This plays
//! the same role as `gltf_json::Index<T>` in the upstream crate, minus the
//! serde (de)serialization support that type carries — this document is
//! built directly from a flat array, not deserialized through `Index<T>`.

use std::fmt;
use std::marker::PhantomData;

pub struct Handle<T> {
    value: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    /// Builds a handle from a raw 0-based array offset. Callers outside this
    /// crate use this to turn a raw index — from `scene_nodes`/`node_children`
    /// (which hold plain `u32`s, since the index pool is untyped and shared
    /// across every entity kind) or an external enumeration `0..count` — into
    /// the typed handle the rest of the query API expects.
    pub fn new(value: u32) -> Self {
        Handle {
            value,
            _marker: PhantomData,
        }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub(crate) fn index(&self) -> usize {
        self.value as usize
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}
impl<T> Eq for Handle<T> {}

impl<T> std::hash::Hash for Handle<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.value.hash(state)
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({})", self.value)
    }
}

/// A signed, possibly-absent reference stored at the entity layer, e.g.
/// `Node::mesh` or `Primitive::indices`. Absence is `-1`, matching the
/// reference C loader's convention (spec §9, "optional components without
/// null checks scattered through the codebase") so that storage stays a
/// plain `i32` with no extra discriminant; callers translate to
/// `Option<Handle<T>>` once, at the query boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OptHandle<T> {
    value: i32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> OptHandle<T> {
    pub const ABSENT: OptHandle<T> = OptHandle {
        value: -1,
        _marker: PhantomData,
    };

    pub(crate) fn some(value: u32) -> Self {
        OptHandle {
            value: value as i32,
            _marker: PhantomData,
        }
    }

    pub fn get(&self) -> Option<Handle<T>> {
        if self.value < 0 {
            None
        } else {
            Some(Handle::new(self.value as u32))
        }
    }

    pub fn raw(&self) -> i32 {
        self.value
    }
}

impl<T> Default for OptHandle<T> {
    fn default() -> Self {
        OptHandle::ABSENT
    }
}
