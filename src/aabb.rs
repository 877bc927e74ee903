//! Axis-aligned bounding box computation over VEC3 accessors (spec §4.9,
//! §8 scenario 2).

use crate::consts::ElementType;
use crate::document::{Accessor, Document};
use crate::error::{ErrorKind, GltfError, Path};
use crate::handle::Handle;

/// A componentwise min/max bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

/// Computes the AABB of a VEC3 accessor's decoded positions.
pub fn compute_aabb(doc: &Document, accessor: Handle<Accessor>) -> Result<Aabb, GltfError> {
    let path = Path::new().field("accessors").index(accessor.index());
    let a = doc
        .accessor(accessor)
        .ok_or_else(|| GltfError::new(ErrorKind::Invalid, "accessor out of range", path.clone()))?;
    if a.element_type != ElementType::Vec3 {
        return Err(GltfError::new(ErrorKind::Invalid, "aabb requires a VEC3 accessor", path));
    }

    let mut min = [f32::INFINITY; 3];
    let mut max = [f32::NEG_INFINITY; 3];
    let mut out = [0.0f32; 3];
    for i in 0..a.count {
        crate::span::read_element_f32(doc, accessor, i, &mut out)?;
        for k in 0..3 {
            if out[k] < min[k] {
                min[k] = out[k];
            }
            if out[k] > max[k] {
                max[k] = out[k];
            }
        }
    }
    if a.count == 0 {
        min = [0.0; 3];
        max = [0.0; 3];
    }
    Ok(Aabb { min, max })
}
