//! A read-only loader and query library for glTF 2.0 assets.
//!
//! [`load_file`] accepts `.gltf` (JSON, with external or embedded-base64
//! buffers) and `.glb` (binary container) inputs transparently, the same way
//! the reference C loader's single `gltf_load_file` entry point does — the
//! input shape is sniffed from its first bytes rather than its extension.
//! The resulting [`Document`] owns every parsed entity; everything else in
//! this crate is a query or a derived computation over it.

mod aabb;
mod accessor;
mod arena;
mod base64;
mod consts;
mod document;
mod error;
mod glb;
mod handle;
mod image;
mod json;
mod material;
mod math;
mod mesh;
mod parser;
mod pool;
mod resolver;
mod scene;
mod span;
#[cfg(test)]
mod testutil;
mod triangle;

use std::path::Path as FsPath;

pub use aabb::{compute_aabb, Aabb};
pub use consts::{AlphaMode, ComponentType, ElementType, Mode, Semantic};
pub use document::{
    Accessor, Asset, Buffer, BufferView, Document, Image, Material, Mesh, Node, Primitive,
    Sampler, Scene, Texture, Transform,
};
pub use error::{ErrorKind, GltfError, Path, Result};
pub use handle::{Handle, OptHandle};
pub use material::{ImageKind, NormalTextureInfo, OcclusionTextureInfo, TextureInfo};
pub use math::{Mat4, Trs};
pub use scene::WorldCache;
pub use span::Span;
pub use triangle::{for_each_triangle, Triangle};

pub use image::{decode_rgba8, write_png_rgba8, Rgba8Image};

const GLB_MAGIC: &[u8; 4] = b"glTF";

/// Loads a `.gltf` or `.glb` file from disk, resolving external buffer and
/// image URIs relative to the file's directory (spec §5: all I/O completes
/// before the document is returned).
pub fn load_file<P: AsRef<FsPath>>(path: P) -> Result<Document> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|_| GltfError::io("failed to read gltf/glb file"))?;
    let directory = path.parent().map(|p| p.to_path_buf());
    load_bytes(&bytes, directory)
}

/// Loads a `.gltf` or `.glb` document from an in-memory buffer with no
/// filesystem context. Buffers/images that reference relative external
/// paths will fail to resolve; embedded data URIs work regardless.
pub fn load_slice(data: &[u8]) -> Result<Document> {
    load_bytes(data, None)
}

/// Loads a `.gltf` or `.glb` document from an in-memory buffer, resolving
/// relative external URIs against `directory`.
pub fn load_slice_with_directory<P: AsRef<FsPath>>(data: &[u8], directory: P) -> Result<Document> {
    load_bytes(data, Some(directory.as_ref().to_path_buf()))
}

fn load_bytes(data: &[u8], directory: Option<std::path::PathBuf>) -> Result<Document> {
    if data.len() >= 4 && &data[0..4] == GLB_MAGIC {
        let container = glb::parse(data)?;
        let json: serde_json::Value = serde_json::from_slice(&container.json)
            .map_err(|_| GltfError::parse("invalid JSON in glb JSON chunk", error::Path::new()))?;
        let ctx = parser::LoadContext {
            bin: container.bin,
            directory,
            from_glb: true,
        };
        parser::parse(&json, ctx)
    } else {
        let json: serde_json::Value = serde_json::from_slice(data)
            .map_err(|_| GltfError::parse("invalid JSON", error::Path::new()))?;
        parser::parse(&json, parser::LoadContext::standalone(directory))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_slice_rejects_non_object_root() {
        let err = load_slice(b"[]").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Parse);
    }

    #[test]
    fn load_slice_rejects_invalid_json() {
        let err = load_slice(b"not json").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Parse);
    }

    #[test]
    fn load_slice_minimal_document() {
        let json = br#"{"asset": {"version": "2.0"}}"#;
        let doc = load_slice(json).unwrap();
        assert_eq!(doc.asset_version(), "2.0");
        assert_eq!(doc.scene_count(), 0);
    }

    #[test]
    fn load_slice_dispatches_glb_by_magic() {
        let json = br#"{"asset": {"version": "2.0"}}"#;
        let mut padded = json.to_vec();
        while padded.len() % 4 != 0 {
            padded.push(b' ');
        }
        let mut body = Vec::new();
        body.extend_from_slice(&(padded.len() as u32).to_le_bytes());
        body.extend_from_slice(b"JSON");
        body.extend_from_slice(&padded);

        let mut glb = Vec::new();
        glb.extend_from_slice(b"glTF");
        glb.extend_from_slice(&2u32.to_le_bytes());
        glb.extend_from_slice(&((12 + body.len()) as u32).to_le_bytes());
        glb.extend_from_slice(&body);

        let doc = load_slice(&glb).unwrap();
        assert_eq!(doc.asset_version(), "2.0");
    }
}
