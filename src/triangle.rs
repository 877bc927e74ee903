//! Triangle iteration over the three supported topologies (spec §4.7).
//!
//! The reference C loader's `gltf_primitive.c` exposes indices one at a
//! time via raw U8/U16/U32 reads without normalization; this module follows
//! the same two-source approach (indexed vs. identity mapping) but exposes
//! it as a Rust iterator rather than a callback-with-continue-signal, which
//! is the idiomatic shape for the same control flow in this language.

use crate::consts::Mode;
use crate::document::Document;
use crate::error::{ErrorKind, GltfError, Path};
use crate::mesh::Primitive;

/// One triangle's vertex indices, in winding order.
pub type Triangle = (u32, u32, u32);

/// Reads the raw (non-normalized) index at position `i`, for an indices
/// accessor whose component type must be U8, U16, or U32 and whose element
/// type must be SCALAR (spec §4.7). Delegates to
/// [`Document::accessor_read_index_u32`], the public exact-precision reader,
/// so indexed triangle iteration never round-trips an index through `f32`.
fn read_raw_index(doc: &Document, indices: crate::handle::Handle<crate::document::Accessor>, i: u32) -> Result<u32, GltfError> {
    doc.accessor_read_index_u32(indices, i)
}

/// Resolves the `(vertex_count, read)` pair for a primitive: an indexed
/// primitive reads through its indices accessor, a non-indexed one uses the
/// identity mapping over POSITION's count.
struct VertexSource<'a> {
    doc: &'a Document,
    indices: Option<crate::handle::Handle<crate::document::Accessor>>,
    vertex_count: u32,
    position_count: u32,
}

impl<'a> VertexSource<'a> {
    fn build(doc: &'a Document, primitive: &Primitive) -> Result<Self, GltfError> {
        let position = doc
            .position_accessor(primitive)
            .ok_or_else(|| GltfError::new(ErrorKind::Parse, "primitive has no POSITION attribute", Path::new()))?;
        let position_count = doc
            .accessor(position)
            .ok_or_else(|| GltfError::new(ErrorKind::Invalid, "accessor out of range", Path::new()))?
            .count;

        let (indices, vertex_count) = match primitive.indices.get() {
            Some(h) => {
                let count = doc
                    .accessor(h)
                    .ok_or_else(|| GltfError::new(ErrorKind::Invalid, "accessor out of range", Path::new()))?
                    .count;
                (Some(h), count)
            }
            None => (None, position_count),
        };

        Ok(VertexSource {
            doc,
            indices,
            vertex_count,
            position_count,
        })
    }

    fn get(&self, i: u32) -> Result<u32, GltfError> {
        let raw = match self.indices {
            Some(h) => read_raw_index(self.doc, h, i)?,
            None => i,
        };
        if raw >= self.position_count {
            return Err(GltfError::new(
                ErrorKind::Range,
                "vertex index exceeds POSITION count",
                Path::new(),
            ));
        }
        Ok(raw)
    }
}

/// Iterates the triangles of `primitive` under its topology mode, invoking
/// `f` with each `(i0, i1, i2)` triple and the triangle index `t`. `f`
/// returns `true` to continue, `false` to stop early; early stop is not an
/// error (spec §4.7: "early stop yields the same success code").
pub fn for_each_triangle<F>(doc: &Document, primitive: &Primitive, mut f: F) -> Result<(), GltfError>
where
    F: FnMut(Triangle, u32) -> bool,
{
    let src = VertexSource::build(doc, primitive)?;
    let n = src.vertex_count;

    match primitive.mode {
        Mode::Triangles => {
            if n % 3 != 0 {
                return Err(GltfError::new(
                    ErrorKind::Parse,
                    "TRIANGLES vertex count must be a multiple of 3",
                    Path::new(),
                ));
            }
            for t in 0..n / 3 {
                let tri = (src.get(3 * t)?, src.get(3 * t + 1)?, src.get(3 * t + 2)?);
                if !f(tri, t) {
                    break;
                }
            }
        }
        Mode::TriangleStrip => {
            if n < 3 {
                return Ok(());
            }
            for t in 0..n - 2 {
                let tri = if t % 2 == 0 {
                    (src.get(t)?, src.get(t + 1)?, src.get(t + 2)?)
                } else {
                    (src.get(t + 1)?, src.get(t)?, src.get(t + 3)?)
                };
                if !f(tri, t) {
                    break;
                }
            }
        }
        Mode::TriangleFan => {
            if n < 3 {
                return Ok(());
            }
            for t in 0..n - 2 {
                let tri = (src.get(0)?, src.get(t + 1)?, src.get(t + 2)?);
                if !f(tri, t) {
                    break;
                }
            }
        }
        _ => {
            return Err(GltfError::new(
                ErrorKind::Invalid,
                "primitive mode is not a triangle topology",
                Path::new(),
            ));
        }
    }

    Ok(())
}
