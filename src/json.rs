//! Typed, defaulted JSON field extractors (spec §4.2).
//!
//! Every top-level entity parser reads its fields through these helpers
//! instead of matching on `serde_json::Value` directly, so that a missing
//! key, a wrong JSON type, and an out-of-range integer are all reported the
//! same way: an [`ErrorKind::Parse`] with a dotted [`Path`] pointing at the
//! offending field. None of these allocate on the failure path.

use serde_json::{Map, Value};

use crate::error::{ErrorKind, GltfError, Path};

pub type Obj = Map<String, Value>;

/// Extracts `obj["key"]` as a JSON object, or errors if present-but-wrong-type.
/// Returns `None` when the key is absent.
pub fn get_obj<'a>(obj: &'a Obj, key: &str) -> Option<&'a Obj> {
    obj.get(key).and_then(Value::as_object)
}

/// Extracts `obj["key"]` as a JSON array. Returns an empty slice when the
/// key is absent (spec §8: empty `scenes`/`nodes`/`primitives` are valid).
pub fn get_array<'a>(obj: &'a Obj, key: &str, path: &Path) -> Result<&'a [Value], GltfError> {
    match obj.get(key) {
        None => Ok(&[]),
        Some(Value::Array(a)) => Ok(a.as_slice()),
        Some(_) => Err(GltfError::parse("must be an array", path.field(key))),
    }
}

fn as_object<'a>(v: &'a Value, path: &Path) -> Result<&'a Obj, GltfError> {
    v.as_object()
        .ok_or_else(|| GltfError::parse("must be an object", path.clone()))
}

/// Reads `obj[key]` as an object entry in an array context (a single array
/// element that must itself be a JSON object).
pub fn element_obj<'a>(v: &'a Value, path: &Path) -> Result<&'a Obj, GltfError> {
    as_object(v, path)
}

pub fn get_bool(obj: &Obj, key: &str, default: bool, path: &Path) -> Result<bool, GltfError> {
    match obj.get(key) {
        None => Ok(default),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(GltfError::parse("must be a boolean", path.field(key))),
    }
}

fn as_f64(v: &Value, path: &Path) -> Result<f64, GltfError> {
    v.as_f64()
        .ok_or_else(|| GltfError::parse("must be a number", path.clone()))
}

pub fn get_f32(obj: &Obj, key: &str, default: f32, path: &Path) -> Result<f32, GltfError> {
    match obj.get(key) {
        None => Ok(default),
        Some(v) => Ok(as_f64(v, &path.field(key))? as f32),
    }
}

/// Reads a required non-negative integer field, range-checked against `u32`.
pub fn get_u32_required(obj: &Obj, key: &str, path: &Path) -> Result<u32, GltfError> {
    let field_path = path.field(key);
    let v = obj
        .get(key)
        .ok_or_else(|| GltfError::parse("required field missing", field_path.clone()))?;
    let n = v
        .as_u64()
        .ok_or_else(|| GltfError::parse("must be a non-negative integer", field_path.clone()))?;
    u32::try_from(n).map_err(|_| GltfError::parse("integer out of range for u32", field_path))
}

pub fn get_u32(obj: &Obj, key: &str, default: u32, path: &Path) -> Result<u32, GltfError> {
    match obj.get(key) {
        None => Ok(default),
        Some(v) => {
            let field_path = path.field(key);
            let n = v
                .as_u64()
                .ok_or_else(|| GltfError::parse("must be a non-negative integer", field_path.clone()))?;
            u32::try_from(n).map_err(|_| GltfError::parse("integer out of range for u32", field_path))
        }
    }
}

/// Reads an optional index field (glTF's convention for a reference to
/// another top-level array entry). Absence is the sentinel `-1`.
pub fn get_index_opt(obj: &Obj, key: &str, path: &Path) -> Result<i32, GltfError> {
    match obj.get(key) {
        None => Ok(-1),
        Some(v) => {
            let field_path = path.field(key);
            let n = v
                .as_u64()
                .ok_or_else(|| GltfError::parse("must be a non-negative integer", field_path.clone()))?;
            i32::try_from(n).map_err(|_| GltfError::parse("index out of range", field_path))
        }
    }
}

/// Reads a required index field (e.g. `bufferView.buffer`).
pub fn get_index_required(obj: &Obj, key: &str, path: &Path) -> Result<u32, GltfError> {
    get_u32_required(obj, key, path)
}

pub fn get_str_opt<'a>(obj: &'a Obj, key: &str, path: &Path) -> Result<Option<&'a str>, GltfError> {
    match obj.get(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(_) => Err(GltfError::parse("must be a string", path.field(key))),
    }
}

pub fn get_str_required<'a>(obj: &'a Obj, key: &str, path: &Path) -> Result<&'a str, GltfError> {
    get_str_opt(obj, key, path)?.ok_or_else(|| GltfError::parse("required field missing", path.field(key)))
}

fn get_f32_array_n<const N: usize>(
    obj: &Obj,
    key: &str,
    default: [f32; N],
    path: &Path,
) -> Result<[f32; N], GltfError> {
    let field_path = path.field(key);
    match obj.get(key) {
        None => Ok(default),
        Some(Value::Array(a)) => {
            if a.len() != N {
                return Err(GltfError::parse("array has wrong length", field_path));
            }
            let mut out = default;
            for (i, v) in a.iter().enumerate() {
                out[i] = as_f64(v, &field_path)? as f32;
            }
            Ok(out)
        }
        Some(_) => Err(GltfError::parse("must be an array", field_path)),
    }
}

pub fn get_vec3(obj: &Obj, key: &str, default: [f32; 3], path: &Path) -> Result<[f32; 3], GltfError> {
    get_f32_array_n(obj, key, default, path)
}

pub fn get_vec4(obj: &Obj, key: &str, default: [f32; 4], path: &Path) -> Result<[f32; 4], GltfError> {
    get_f32_array_n(obj, key, default, path)
}

pub fn get_mat4_opt(obj: &Obj, key: &str, path: &Path) -> Result<Option<crate::math::Mat4>, GltfError> {
    let field_path = path.field(key);
    match obj.get(key) {
        None => Ok(None),
        Some(Value::Array(a)) => {
            if a.len() != 16 {
                return Err(GltfError::parse("array has wrong length", field_path));
            }
            let mut out = [0.0f32; 16];
            for (i, v) in a.iter().enumerate() {
                out[i] = as_f64(v, &field_path)? as f32;
            }
            Ok(Some(out))
        }
        Some(_) => Err(GltfError::parse("must be an array", field_path)),
    }
}

/// Parses `s` against a fixed set of accepted spellings, per field `key`
/// (used for `accessor.type` and `material.alphaMode`).
pub fn parse_enum_str<T>(
    s: &str,
    parse: impl Fn(&str) -> Option<T>,
    path: &Path,
) -> Result<T, GltfError> {
    parse(s).ok_or_else(|| GltfError::parse("unrecognized enum value", path.clone()))
}
