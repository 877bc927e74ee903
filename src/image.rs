//! PNG/JPEG pixel-decode collaborator (spec §6).
//!
//! The function signatures here are always part of the public API — only the
//! codec-backed implementation is gated behind the `image-decode` feature, so
//! that calling either function when the feature is disabled returns
//! `UNSUPPORTED` rather than the functions not existing at all.
//!
//! Grounded on the reference loader's `gltf_images.c`: resolve the image's
//! compressed bytes per its `kind` (URI / data URI / bufferView), then hand
//! them to a general-purpose image codec — `stb_image` there, the `image`
//! crate here — forcing an RGBA8 result the same way `stbi_load_from_memory`
//! is called with `req_comp = 4`.

use crate::document::{Document, Image};
use crate::error::{ErrorKind, GltfError};
use crate::handle::Handle;

/// An owned RGBA8 pixel buffer, row-major, `stride = 4 * width`.
pub struct Rgba8Image {
    pub width: u32,
    pub height: u32,
    pub stride: u32,
    pub pixels: Vec<u8>,
}

/// Decodes `doc.images[image_index]` to RGBA8 pixels.
///
/// Returns [`ErrorKind::Unsupported`] when the crate was built without the
/// `image-decode` feature.
pub fn decode_rgba8(doc: &Document, image_index: Handle<Image>) -> Result<Rgba8Image, GltfError> {
    imp::decode_rgba8(doc, image_index)
}

/// Writes an RGBA8 pixel buffer to a PNG file on disk.
///
/// Returns [`ErrorKind::Unsupported`] when the crate was built without the
/// `image-decode` feature.
pub fn write_png_rgba8(path: &std::path::Path, width: u32, height: u32, pixels: &[u8]) -> Result<(), GltfError> {
    imp::write_png_rgba8(path, width, height, pixels)
}

#[cfg(feature = "image-decode")]
mod imp {
    use std::io::Cursor;

    use super::Rgba8Image;
    use crate::document::{Document, Image};
    use crate::error::{ErrorKind, GltfError, Path};
    use crate::handle::Handle;
    use crate::material::ImageKind;

    fn load_compressed_bytes(doc: &Document, handle: Handle<Image>) -> Result<Vec<u8>, GltfError> {
        let path = Path::new().field("images").index(handle.index());
        let image = doc
            .image(handle)
            .ok_or_else(|| GltfError::new(ErrorKind::Range, "image_index out of range", path.clone()))?;

        match image.kind {
            ImageKind::Uri => {
                let resolved = doc.resolved_image_uri(handle);
                std::fs::read(resolved).map_err(|_| GltfError::io("failed to read image file"))
            }
            ImageKind::DataUri => {
                let uri = doc.arena_get(image.uri);
                crate::resolver::decode_data_uri(uri)
            }
            ImageKind::BufferView => {
                let bv_handle = image
                    .buffer_view
                    .get()
                    .ok_or_else(|| GltfError::parse("image bufferView missing", path.clone()))?;
                let bv = doc
                    .buffer_view(bv_handle)
                    .ok_or_else(|| GltfError::new(ErrorKind::Range, "image bufferView out of range", path.clone()))?;
                let buffer = doc
                    .buffer(bv.buffer)
                    .ok_or_else(|| GltfError::new(ErrorKind::Range, "bufferView.buffer out of range", path))?;
                let start = bv.byte_offset as usize;
                let end = start + bv.byte_length as usize;
                buffer
                    .data
                    .get(start..end)
                    .map(|s| s.to_vec())
                    .ok_or_else(|| GltfError::invalid("bufferView range exceeds buffer data"))
            }
            ImageKind::None => Err(GltfError::parse("image has neither uri nor bufferView", path)),
        }
    }

    pub(super) fn decode_rgba8(doc: &Document, image_index: Handle<Image>) -> Result<Rgba8Image, GltfError> {
        let bytes = load_compressed_bytes(doc, image_index)?;
        let decoded = ::image::ImageReader::new(Cursor::new(&bytes))
            .with_guessed_format()
            .map_err(|_| GltfError::parse("unrecognized image format", Path::new()))?
            .decode()
            .map_err(|_| GltfError::parse("image decode failed", Path::new()))?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Rgba8Image {
            width,
            height,
            stride: width * 4,
            pixels: rgba.into_raw(),
        })
    }

    pub(super) fn write_png_rgba8(
        path: &std::path::Path,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Result<(), GltfError> {
        if width == 0 || height == 0 || pixels.len() as u64 != width as u64 * height as u64 * 4 {
            return Err(GltfError::invalid("invalid rgba8 buffer dimensions"));
        }
        ::image::save_buffer(path, pixels, width, height, ::image::ColorType::Rgba8)
            .map_err(|_| GltfError::io("failed to write png"))
    }
}

#[cfg(not(feature = "image-decode"))]
mod imp {
    use super::Rgba8Image;
    use crate::document::{Document, Image};
    use crate::error::GltfError;
    use crate::handle::Handle;

    pub(super) fn decode_rgba8(_doc: &Document, _image_index: Handle<Image>) -> Result<Rgba8Image, GltfError> {
        Err(GltfError::unsupported("image-decode feature not compiled in"))
    }

    pub(super) fn write_png_rgba8(
        _path: &std::path::Path,
        _width: u32,
        _height: u32,
        _pixels: &[u8],
    ) -> Result<(), GltfError> {
        Err(GltfError::unsupported("image-decode feature not compiled in"))
    }
}
