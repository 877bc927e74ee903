//! Top-level JSON parser (spec §4.3): walks the decoded JSON tree in a fixed
//! key order and populates every array owned by the [`Document`].
//!
//! Grounded on the reference loader's `gltf_parse.c` (per-entity parse
//! functions, two-pass primitive attribute sizing) and the upstream `gltf`
//! crate's `json::root::Root` field layout for naming/defaults, adapted to
//! write directly into the document's flat arrays instead of deserializing
//! into an intermediate `serde_json::Value`-shaped struct tree.

use std::path::PathBuf;

use serde_json::Value;

use crate::accessor::{Accessor, Buffer, BufferView};
use crate::arena::StrRef;
use crate::consts::{AlphaMode, ComponentType, ElementType, Mode, Semantic};
use crate::document::{Asset, Document, Node, Scene, Transform};
use crate::error::{ErrorKind, GltfError, Path};
use crate::handle::{Handle, OptHandle};
use crate::json::{self, Obj};
use crate::material::{
    Image, ImageKind, Material, NormalTextureInfo, OcclusionTextureInfo, Sampler, Texture,
    TextureInfo,
};
use crate::mesh::{PrimAttr, Primitive};
use crate::pool::RangeU32;

/// Context threaded from the file/GLB front ends into the shared JSON
/// parser (spec §6, "Load context").
pub struct LoadContext {
    /// The BIN chunk of a GLB container, bound to `buffers[0]` when that
    /// buffer has no `uri`.
    pub bin: Option<Vec<u8>>,
    /// Directory of the source file, for resolving relative buffer/image
    /// URIs. `None` when parsing from bytes with no filesystem context.
    pub directory: Option<PathBuf>,
    /// `true` when this input originated from a `.glb` container.
    pub from_glb: bool,
}

impl LoadContext {
    pub fn standalone(directory: Option<PathBuf>) -> Self {
        LoadContext {
            bin: None,
            directory,
            from_glb: false,
        }
    }
}

/// Parses a complete glTF JSON document into a [`Document`], per the fixed
/// key order in spec §4.3.
pub fn parse(root: &Value, ctx: LoadContext) -> Result<Document, GltfError> {
    let root_obj = root
        .as_object()
        .ok_or_else(|| GltfError::parse("root must be a JSON object", Path::new()))?;

    let mut doc = Document::empty();
    doc.directory = ctx.directory;

    parse_scene_index(&mut doc, root_obj)?;
    parse_scenes(&mut doc, root_obj)?;
    parse_nodes(&mut doc, root_obj)?;
    parse_meshes(&mut doc, root_obj)?;
    parse_accessors(&mut doc, root_obj)?;
    parse_buffer_views(&mut doc, root_obj)?;
    parse_buffers(&mut doc, root_obj, ctx.bin.as_deref(), ctx.from_glb)?;
    parse_images(&mut doc, root_obj)?;
    parse_samplers(&mut doc, root_obj)?;
    parse_textures(&mut doc, root_obj)?;
    parse_materials(&mut doc, root_obj)?;
    parse_asset(&mut doc, root_obj)?;

    Ok(doc)
}

fn parse_scene_index(doc: &mut Document, root: &Obj) -> Result<(), GltfError> {
    let idx = json::get_index_opt(root, "scene", &Path::new())?;
    doc.default_scene = if idx < 0 {
        OptHandle::ABSENT
    } else {
        OptHandle::some(idx as u32)
    };
    Ok(())
}

fn parse_scenes(doc: &mut Document, root: &Obj) -> Result<(), GltfError> {
    let base = Path::new().field("scenes");
    let items = json::get_array(root, "scenes", &base)?;
    for (i, item) in items.iter().enumerate() {
        let path = base.index(i);
        let obj = json::element_obj(item, &path)?;
        let name = alloc_opt_str(doc, obj, "name", &path)?;
        let node_indices = json::get_array(obj, "nodes", &path)?
            .iter()
            .enumerate()
            .map(|(j, v)| {
                v.as_u64()
                    .and_then(|n| u32::try_from(n).ok())
                    .ok_or_else(|| GltfError::parse("scene node index must be a non-negative integer", path.field("nodes").index(j)))
            })
            .collect::<Result<Vec<u32>, GltfError>>()?;
        let nodes = doc.push_indices(&node_indices)?;
        doc.scenes.push(Scene { name, nodes });
    }
    Ok(())
}

fn parse_nodes(doc: &mut Document, root: &Obj) -> Result<(), GltfError> {
    let base = Path::new().field("nodes");
    let items = json::get_array(root, "nodes", &base)?;
    for (i, item) in items.iter().enumerate() {
        let path = base.index(i);
        let obj = json::element_obj(item, &path)?;
        let name = alloc_opt_str(doc, obj, "name", &path)?;
        let mesh_idx = json::get_index_opt(obj, "mesh", &path)?;
        let mesh = if mesh_idx < 0 {
            OptHandle::ABSENT
        } else {
            OptHandle::some(mesh_idx as u32)
        };

        let child_indices = json::get_array(obj, "children", &path)?
            .iter()
            .enumerate()
            .map(|(j, v)| {
                v.as_u64()
                    .and_then(|n| u32::try_from(n).ok())
                    .ok_or_else(|| GltfError::parse("child index must be a non-negative integer", path.field("children").index(j)))
            })
            .collect::<Result<Vec<u32>, GltfError>>()?;
        let children = doc.push_indices(&child_indices)?;

        let transform = if let Some(matrix) = json::get_mat4_opt(obj, "matrix", &path)? {
            Transform::Matrix(matrix)
        } else {
            let translation = json::get_vec3(obj, "translation", [0.0, 0.0, 0.0], &path)?;
            let rotation = json::get_vec4(obj, "rotation", [0.0, 0.0, 0.0, 1.0], &path)?;
            let scale = json::get_vec3(obj, "scale", [1.0, 1.0, 1.0], &path)?;
            Transform::Trs(crate::math::Trs {
                translation,
                rotation,
                scale,
            })
        };

        doc.nodes.push(Node {
            name,
            mesh,
            children,
            transform,
        });
    }
    Ok(())
}

fn parse_meshes(doc: &mut Document, root: &Obj) -> Result<(), GltfError> {
    let base = Path::new().field("meshes");
    let items = json::get_array(root, "meshes", &base)?;
    for (i, item) in items.iter().enumerate() {
        let path = base.index(i);
        let obj = json::element_obj(item, &path)?;
        let name = alloc_opt_str(doc, obj, "name", &path)?;

        let prim_path = path.field("primitives");
        let prim_items = json::get_array(obj, "primitives", &path)?;
        let first = doc.primitives.len() as u32;
        for (pi, prim_item) in prim_items.iter().enumerate() {
            let ppath = prim_path.index(pi);
            let primitive = parse_primitive(doc, prim_item, &ppath)?;
            doc.primitives.push(primitive);
        }
        let primitives = RangeU32 {
            first,
            count: prim_items.len() as u32,
        };

        doc.meshes.push(crate::document::Mesh { name, primitives });
    }
    Ok(())
}

fn parse_primitive(doc: &mut Document, item: &Value, path: &Path) -> Result<Primitive, GltfError> {
    let obj = json::element_obj(item, path)?;

    let indices_idx = json::get_index_opt(obj, "indices", path)?;
    let indices = if indices_idx < 0 {
        OptHandle::ABSENT
    } else {
        OptHandle::some(indices_idx as u32)
    };

    let mode_value = json::get_u32(obj, "mode", crate::consts::MODE_TRIANGLES, path)?;
    let mode = Mode::from_gl_enum(mode_value)
        .ok_or_else(|| GltfError::parse("primitive mode out of range", path.field("mode")))?;

    let attrs_obj = json::get_obj(obj, "attributes")
        .ok_or_else(|| GltfError::parse("primitive requires attributes", path.field("attributes")))?;

    // Pass 1: count recognized semantic keys, per spec §4.3.
    let recognized: Vec<(Semantic, u32, u32)> = attrs_obj
        .iter()
        .filter_map(|(key, v)| {
            let (semantic, set_index) = Semantic::parse(key)?;
            let accessor_index = v.as_u64()? as u32;
            Some((semantic, set_index, accessor_index))
        })
        .collect();

    // Pass 2: write the exactly-sized flat attribute array.
    let first = doc.prim_attrs.len() as u32;
    for (semantic, _set_index, accessor_index) in &recognized {
        doc.prim_attrs.push(PrimAttr {
            semantic: *semantic,
            accessor: Handle::new(*accessor_index),
        });
    }
    let attributes = RangeU32 {
        first,
        count: recognized.len() as u32,
    };

    Ok(Primitive {
        attributes,
        indices,
        mode,
    })
}

fn parse_accessors(doc: &mut Document, root: &Obj) -> Result<(), GltfError> {
    let base = Path::new().field("accessors");
    let items = json::get_array(root, "accessors", &base)?;
    for (i, item) in items.iter().enumerate() {
        let path = base.index(i);
        let obj = json::element_obj(item, &path)?;

        let bv_idx = json::get_index_opt(obj, "bufferView", &path)?;
        let buffer_view = if bv_idx < 0 {
            OptHandle::ABSENT
        } else {
            OptHandle::some(bv_idx as u32)
        };
        let byte_offset = json::get_u32(obj, "byteOffset", 0, &path)?;
        if buffer_view.get().is_none() && byte_offset != 0 {
            // spec §9 open question: reject rather than silently default.
            return Err(GltfError::parse(
                "byteOffset present without a bufferView",
                path.field("byteOffset"),
            ));
        }

        let component_type_value = json::get_u32_required(obj, "componentType", &path)?;
        let component_type = ComponentType::from_gl_enum(component_type_value)
            .ok_or_else(|| GltfError::parse("unsupported componentType", path.field("componentType")))?;

        let type_str = json::get_str_required(obj, "type", &path)?;
        let element_type = json::parse_enum_str(type_str, ElementType::from_str, &path.field("type"))?;

        let count = json::get_u32_required(obj, "count", &path)?;
        let normalized = json::get_bool(obj, "normalized", false, &path)?;

        doc.accessors.push(Accessor {
            buffer_view,
            byte_offset,
            component_type,
            element_type,
            count,
            normalized,
        });
    }
    Ok(())
}

fn parse_buffer_views(doc: &mut Document, root: &Obj) -> Result<(), GltfError> {
    let base = Path::new().field("bufferViews");
    let items = json::get_array(root, "bufferViews", &base)?;
    for (i, item) in items.iter().enumerate() {
        let path = base.index(i);
        let obj = json::element_obj(item, &path)?;

        let buffer = Handle::new(json::get_index_required(obj, "buffer", &path)?);
        let byte_offset = json::get_u32(obj, "byteOffset", 0, &path)?;
        let byte_length = json::get_u32(obj, "byteLength", 0, &path)?;
        let byte_stride = json::get_u32(obj, "byteStride", 0, &path)?;
        let target = match obj.get("target") {
            None => None,
            Some(_) => Some(json::get_u32_required(obj, "target", &path)?),
        };

        doc.buffer_views.push(BufferView {
            buffer,
            byte_offset,
            byte_length,
            byte_stride,
            target,
        });
    }
    Ok(())
}

fn parse_buffers(
    doc: &mut Document,
    root: &Obj,
    bin: Option<&[u8]>,
    from_glb: bool,
) -> Result<(), GltfError> {
    let base = Path::new().field("buffers");
    let items = json::get_array(root, "buffers", &base)?;
    for (i, item) in items.iter().enumerate() {
        let path = base.index(i);
        let obj = json::element_obj(item, &path)?;

        let byte_length = json::get_u32(obj, "byteLength", 0, &path)?;
        let uri_field = json::get_str_opt(obj, "uri", &path)?;

        let (uri, data) = match uri_field {
            Some(uri) => {
                let bytes = crate::resolver::resolve_buffer(doc.directory(), uri, byte_length)?;
                let uri_ref = doc.alloc_str(uri)?;
                (uri_ref, bytes)
            }
            None => {
                if i == 0 && from_glb {
                    let bytes = bin
                        .ok_or_else(|| GltfError::parse("glb has no BIN chunk for buffers[0]", path.clone()))?
                        .to_vec();
                    (StrRef::ABSENT_REF, bytes)
                } else {
                    return Err(GltfError::parse("buffer uri is required outside of glb buffers[0]", path.field("uri")));
                }
            }
        };

        doc.buffers.push(Buffer {
            uri,
            byte_length,
            data,
        });
    }
    Ok(())
}

fn parse_images(doc: &mut Document, root: &Obj) -> Result<(), GltfError> {
    let base = Path::new().field("images");
    let items = json::get_array(root, "images", &base)?;
    for (i, item) in items.iter().enumerate() {
        let path = base.index(i);
        let obj = json::element_obj(item, &path)?;
        let name = alloc_opt_str(doc, obj, "name", &path)?;

        let uri_field = json::get_str_opt(obj, "uri", &path)?;
        let bv_idx = json::get_index_opt(obj, "bufferView", &path)?;
        let mime_type_field = json::get_str_opt(obj, "mimeType", &path)?;

        let (kind, uri, buffer_view, mime_type, resolved) = if let Some(uri_str) = uri_field {
            if crate::resolver::is_data_uri(uri_str) {
                let uri_ref = doc.alloc_str(uri_str)?;
                (ImageKind::DataUri, uri_ref, OptHandle::ABSENT, StrRef::ABSENT_REF, StrRef::ABSENT_REF)
            } else {
                let uri_ref = doc.alloc_str(uri_str)?;
                let resolved_path = crate::resolver::resolve_path(doc.directory(), uri_str);
                let resolved_ref = doc.alloc_str(&resolved_path.to_string_lossy())?;
                (ImageKind::Uri, uri_ref, OptHandle::ABSENT, StrRef::ABSENT_REF, resolved_ref)
            }
        } else if bv_idx >= 0 {
            let mime = mime_type_field.ok_or_else(|| {
                GltfError::parse("image with a bufferView requires mimeType", path.field("mimeType"))
            })?;
            let mime_ref = doc.alloc_str(mime)?;
            (
                ImageKind::BufferView,
                StrRef::ABSENT_REF,
                OptHandle::some(bv_idx as u32),
                mime_ref,
                StrRef::ABSENT_REF,
            )
        } else {
            (ImageKind::None, StrRef::ABSENT_REF, OptHandle::ABSENT, StrRef::ABSENT_REF, StrRef::ABSENT_REF)
        };

        doc.images.push(Image {
            name,
            kind,
            uri,
            mime_type,
            buffer_view,
            resolved,
        });
    }
    Ok(())
}

fn parse_samplers(doc: &mut Document, root: &Obj) -> Result<(), GltfError> {
    let base = Path::new().field("samplers");
    let items = json::get_array(root, "samplers", &base)?;
    for (i, item) in items.iter().enumerate() {
        let path = base.index(i);
        let obj = json::element_obj(item, &path)?;
        let mag_filter = json::get_index_opt(obj, "magFilter", &path)?;
        let min_filter = json::get_index_opt(obj, "minFilter", &path)?;
        let wrap_s = json::get_u32(obj, "wrapS", crate::consts::WRAP_REPEAT, &path)?;
        let wrap_t = json::get_u32(obj, "wrapT", crate::consts::WRAP_REPEAT, &path)?;
        doc.samplers.push(Sampler {
            mag_filter,
            min_filter,
            wrap_s,
            wrap_t,
        });
    }
    Ok(())
}

fn parse_textures(doc: &mut Document, root: &Obj) -> Result<(), GltfError> {
    let base = Path::new().field("textures");
    let items = json::get_array(root, "textures", &base)?;
    for (i, item) in items.iter().enumerate() {
        let path = base.index(i);
        let obj = json::element_obj(item, &path)?;
        let sampler_idx = json::get_index_opt(obj, "sampler", &path)?;
        let source_idx = json::get_index_opt(obj, "source", &path)?;
        doc.textures.push(Texture {
            sampler: if sampler_idx < 0 { OptHandle::ABSENT } else { OptHandle::some(sampler_idx as u32) },
            source: if source_idx < 0 { OptHandle::ABSENT } else { OptHandle::some(source_idx as u32) },
        });
    }
    Ok(())
}

fn parse_texture_info(obj: &Obj, key: &str, path: &Path) -> Result<TextureInfo, GltfError> {
    match json::get_obj(obj, key) {
        None => Ok(TextureInfo::default()),
        Some(sub) => {
            let sub_path = path.field(key);
            let index = json::get_index_required(sub, "index", &sub_path)?;
            let tex_coord = json::get_u32(sub, "texCoord", 0, &sub_path)?;
            Ok(TextureInfo {
                index: OptHandle::some(index),
                tex_coord,
            })
        }
    }
}

fn parse_materials(doc: &mut Document, root: &Obj) -> Result<(), GltfError> {
    let base = Path::new().field("materials");
    let items = json::get_array(root, "materials", &base)?;
    for (i, item) in items.iter().enumerate() {
        let path = base.index(i);
        let obj = json::element_obj(item, &path)?;
        let name = alloc_opt_str(doc, obj, "name", &path)?;

        let pbr = json::get_obj(obj, "pbrMetallicRoughness");
        let (base_color_factor, metallic_factor, roughness_factor, base_color_texture, metallic_roughness_texture) =
            if let Some(pbr) = pbr {
                let pbr_path = path.field("pbrMetallicRoughness");
                (
                    json::get_vec4(pbr, "baseColorFactor", [1.0, 1.0, 1.0, 1.0], &pbr_path)?,
                    json::get_f32(pbr, "metallicFactor", 1.0, &pbr_path)?,
                    json::get_f32(pbr, "roughnessFactor", 1.0, &pbr_path)?,
                    parse_texture_info(pbr, "baseColorTexture", &pbr_path)?,
                    parse_texture_info(pbr, "metallicRoughnessTexture", &pbr_path)?,
                )
            } else {
                (
                    [1.0, 1.0, 1.0, 1.0],
                    1.0,
                    1.0,
                    TextureInfo::default(),
                    TextureInfo::default(),
                )
            };

        let normal_texture = match json::get_obj(obj, "normalTexture") {
            None => NormalTextureInfo::default(),
            Some(sub) => {
                let sub_path = path.field("normalTexture");
                NormalTextureInfo {
                    index: OptHandle::some(json::get_index_required(sub, "index", &sub_path)?),
                    tex_coord: json::get_u32(sub, "texCoord", 0, &sub_path)?,
                    scale: json::get_f32(sub, "scale", 1.0, &sub_path)?,
                }
            }
        };

        let occlusion_texture = match json::get_obj(obj, "occlusionTexture") {
            None => OcclusionTextureInfo::default(),
            Some(sub) => {
                let sub_path = path.field("occlusionTexture");
                OcclusionTextureInfo {
                    index: OptHandle::some(json::get_index_required(sub, "index", &sub_path)?),
                    tex_coord: json::get_u32(sub, "texCoord", 0, &sub_path)?,
                    strength: json::get_f32(sub, "strength", 1.0, &sub_path)?,
                }
            }
        };

        let emissive_texture = parse_texture_info(obj, "emissiveTexture", &path)?;
        let emissive_factor = json::get_vec3(obj, "emissiveFactor", [0.0, 0.0, 0.0], &path)?;

        let alpha_mode = match json::get_str_opt(obj, "alphaMode", &path)? {
            None => AlphaMode::Opaque,
            Some(s) => json::parse_enum_str(s, AlphaMode::from_str, &path.field("alphaMode"))?,
        };
        let alpha_cutoff = json::get_f32(obj, "alphaCutoff", 0.5, &path)?;
        let double_sided = json::get_bool(obj, "doubleSided", false, &path)?;

        doc.materials.push(Material {
            name,
            base_color_factor,
            metallic_factor,
            roughness_factor,
            base_color_texture,
            metallic_roughness_texture,
            normal_texture,
            occlusion_texture,
            emissive_texture,
            emissive_factor,
            alpha_mode,
            alpha_cutoff,
            double_sided,
        });
    }
    Ok(())
}

fn parse_asset(doc: &mut Document, root: &Obj) -> Result<(), GltfError> {
    let path = Path::new().field("asset");
    let obj = json::get_obj(root, "asset")
        .ok_or_else(|| GltfError::parse("asset is required", path.clone()))?;
    let version = json::get_str_required(obj, "version", &path)?;
    // Inline 7-char-plus-NUL buffer invariant carried over from the
    // reference C loader (spec §3, Asset invariants).
    if version.len() > 7 {
        return Err(GltfError::parse("asset.version must fit in 7 characters", path.field("version")));
    }
    let generator = alloc_opt_str(doc, obj, "generator", &path)?;
    doc.asset = Asset {
        version: version.to_string(),
        generator,
    };
    Ok(())
}

fn alloc_opt_str(doc: &mut Document, obj: &Obj, key: &str, path: &Path) -> Result<StrRef, GltfError> {
    match json::get_str_opt(obj, key, path)? {
        None => Ok(StrRef::ABSENT_REF),
        Some(s) => doc.alloc_str(s),
    }
}
