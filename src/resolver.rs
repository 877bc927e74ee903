//! Resource resolver: external buffer files and `data:` URIs (spec §4.5).
//!
//! Grounded on the reference loader's `fs.c` (path joining, absolute-path
//! detection) and `gltf_parse.c`'s buffer URI dispatch, with the base64
//! branch delegated to [`crate::base64`].

use std::path::{Path as FsPath, PathBuf};

use crate::error::{ErrorKind, GltfError, Path};

const DATA_SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// `true` if `uri` is a `data:` URI with a `;base64,` marker.
pub fn is_data_uri(uri: &str) -> bool {
    uri.starts_with(DATA_SCHEME) && uri.contains(BASE64_MARKER)
}

/// Decodes the base64 payload of a `data:...;base64,<payload>` URI.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, GltfError> {
    let marker_pos = uri
        .find(BASE64_MARKER)
        .ok_or_else(|| GltfError::parse("data uri missing ';base64,' marker", Path::new()))?;
    let payload = &uri[marker_pos + BASE64_MARKER.len()..];
    crate::base64::decode(payload.as_bytes())
        .ok_or_else(|| GltfError::parse("invalid base64 payload", Path::new()))
}

/// `true` if `p` should be used verbatim rather than joined onto a
/// directory: POSIX absolute paths, Windows drive-letter/UNC paths, and any
/// string that carries a URI scheme (`foo:`) ahead of the first separator.
/// Mirrors `gltf_path_is_relative` in the reference loader, inverted.
fn is_absolute_or_scheme(p: &str) -> bool {
    if p.is_empty() {
        return false;
    }
    let bytes = p.as_bytes();
    if bytes[0] == b'/' {
        return true;
    }
    if bytes.len() >= 2 && bytes[0] == b'\\' && bytes[1] == b'\\' {
        return true; // UNC
    }
    if bytes.len() >= 3 {
        let c0 = bytes[0];
        if c0.is_ascii_alphabetic() && bytes[1] == b':' && (bytes[2] == b'\\' || bytes[2] == b'/') {
            return true; // "C:\" or "C:/"
        }
    }
    // scheme: letters/digits/+/-/. followed by ':'
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        let is_scheme_char =
            c.is_ascii_alphanumeric() || c == b'+' || c == b'-' || c == b'.';
        if !is_scheme_char {
            break;
        }
        i += 1;
    }
    i > 0 && bytes.get(i) == Some(&b':')
}

/// Joins `directory` and `uri`, recognizing both `/` and `\` separators and
/// bypassing the join for absolute paths or scheme-prefixed URIs. `uri` is
/// percent-decoded first (glTF URIs follow RFC 3986, so a filename
/// containing a space or other reserved character round-trips as `%20`).
pub fn resolve_path(directory: Option<&FsPath>, uri: &str) -> PathBuf {
    let decoded = urlencoding::decode(uri).map_or_else(|_| uri.to_string(), |s| s.into_owned());
    if is_absolute_or_scheme(&decoded) {
        return PathBuf::from(decoded);
    }
    let normalized = decoded.replace('\\', "/");
    match directory {
        Some(dir) => dir.join(normalized),
        None => PathBuf::from(normalized),
    }
}

/// Reads an external buffer file, requiring its size to match
/// `declared_len` exactly when `declared_len != 0` (spec §4.5).
pub fn read_external_buffer(
    directory: Option<&FsPath>,
    uri: &str,
    declared_len: u32,
) -> Result<Vec<u8>, GltfError> {
    let path = resolve_path(directory, uri);
    let bytes = std::fs::read(&path).map_err(|_| GltfError::io("failed to read external buffer file"))?;
    if declared_len != 0 && bytes.len() as u64 != declared_len as u64 {
        return Err(GltfError::io("external buffer length does not match byteLength"));
    }
    Ok(bytes)
}

/// Resolves a `buffers[i].uri` into owned bytes, dispatching on URI shape.
pub fn resolve_buffer(
    directory: Option<&FsPath>,
    uri: &str,
    declared_len: u32,
) -> Result<Vec<u8>, GltfError> {
    if is_data_uri(uri) {
        let decoded = decode_data_uri(uri)?;
        if declared_len != 0 && decoded.len() as u64 != declared_len as u64 {
            return Err(GltfError::new(
                ErrorKind::Io,
                "decoded data uri length does not match byteLength",
                Path::new(),
            ));
        }
        Ok(decoded)
    } else {
        read_external_buffer(directory, uri, declared_len)
    }
}
