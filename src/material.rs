//! Material, texture, image and sampler entities (spec §3).

use crate::arena::StrRef;
use crate::consts::AlphaMode;
use crate::handle::OptHandle;

/// `(index, texCoord)`; `index` absent means the texture slot is unused.
#[derive(Clone, Copy, Debug, Default)]
pub struct TextureInfo {
    pub index: OptHandle<Texture>,
    pub tex_coord: u32,
}

#[derive(Clone, Copy, Debug)]
pub struct NormalTextureInfo {
    pub index: OptHandle<Texture>,
    pub tex_coord: u32,
    pub scale: f32,
}

impl Default for NormalTextureInfo {
    fn default() -> Self {
        NormalTextureInfo {
            index: OptHandle::ABSENT,
            tex_coord: 0,
            scale: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct OcclusionTextureInfo {
    pub index: OptHandle<Texture>,
    pub tex_coord: u32,
    pub strength: f32,
}

impl Default for OcclusionTextureInfo {
    fn default() -> Self {
        OcclusionTextureInfo {
            index: OptHandle::ABSENT,
            tex_coord: 0,
            strength: 1.0,
        }
    }
}

/// The PBR metallic-roughness block plus the material-level fields that sit
/// alongside it (spec §3 `Material`).
#[derive(Clone, Copy, Debug)]
pub struct Material {
    pub name: StrRef,
    pub base_color_factor: [f32; 4],
    pub metallic_factor: f32,
    pub roughness_factor: f32,
    pub base_color_texture: TextureInfo,
    pub metallic_roughness_texture: TextureInfo,
    pub normal_texture: NormalTextureInfo,
    pub occlusion_texture: OcclusionTextureInfo,
    pub emissive_texture: TextureInfo,
    pub emissive_factor: [f32; 3],
    pub alpha_mode: AlphaMode,
    pub alpha_cutoff: f32,
    pub double_sided: bool,
}

impl Default for Material {
    fn default() -> Self {
        Material {
            name: StrRef::ABSENT_REF,
            base_color_factor: [1.0, 1.0, 1.0, 1.0],
            metallic_factor: 1.0,
            roughness_factor: 1.0,
            base_color_texture: TextureInfo::default(),
            metallic_roughness_texture: TextureInfo::default(),
            normal_texture: NormalTextureInfo::default(),
            occlusion_texture: OcclusionTextureInfo::default(),
            emissive_texture: TextureInfo::default(),
            emissive_factor: [0.0, 0.0, 0.0],
            alpha_mode: AlphaMode::Opaque,
            alpha_cutoff: 0.5,
            double_sided: false,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Texture {
    pub sampler: OptHandle<Sampler>,
    pub source: OptHandle<Image>,
}

/// How an image's bytes are to be found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageKind {
    /// `uri` is a filesystem-ish relative/absolute path.
    Uri,
    /// `uri` is an inline `data:...;base64,...` URI.
    DataUri,
    /// Bytes live in a bufferView; `mime_type` is required in this case.
    BufferView,
    /// Neither `uri` nor `bufferView` was present.
    None,
}

#[derive(Clone, Copy, Debug)]
pub struct Image {
    pub name: StrRef,
    pub kind: ImageKind,
    pub uri: StrRef,
    pub mime_type: StrRef,
    pub buffer_view: OptHandle<crate::accessor::BufferView>,
    /// For `ImageKind::Uri`, the document directory joined with `uri`.
    pub resolved: StrRef,
}

#[derive(Clone, Copy, Debug)]
pub struct Sampler {
    /// `-1` when unspecified.
    pub mag_filter: i32,
    /// `-1` when unspecified.
    pub min_filter: i32,
    pub wrap_s: u32,
    pub wrap_t: u32,
}

impl Default for Sampler {
    fn default() -> Self {
        Sampler {
            mag_filter: -1,
            min_filter: -1,
            wrap_s: crate::consts::WRAP_REPEAT,
            wrap_t: crate::consts::WRAP_REPEAT,
        }
    }
}

impl crate::document::Document {
    pub fn resolved_image_uri(&self, handle: crate::handle::Handle<Image>) -> &str {
        self.image(handle).map_or("absent", |i| self.arena_get(i.resolved))
    }
}
