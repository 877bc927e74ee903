//! The document store: the sole owner of every parsed array, the shared
//! index pool, and the string arena (spec §3, §4.1).

use std::path::PathBuf;

use crate::arena::{StrRef, StringArena};
use crate::error::GltfError;
use crate::handle::{Handle, OptHandle};
use crate::pool::{IndexPool, RangeU32};

/// Metadata about the glTF asset itself.
#[derive(Clone, Debug)]
pub struct Asset {
    pub version: String,
    pub generator: StrRef,
}

/// One root-nodes list (spec §3, `Scene`).
#[derive(Clone, Copy, Debug)]
pub struct Scene {
    pub name: StrRef,
    pub nodes: RangeU32,
}

/// A node's local transform, as stored on the entity (spec §3, `Node`).
#[derive(Clone, Copy, Debug)]
pub enum Transform {
    Matrix(crate::math::Mat4),
    Trs(crate::math::Trs),
}

impl Default for Transform {
    fn default() -> Self {
        Transform::Trs(crate::math::Trs::default())
    }
}

/// A node in the scene graph.
#[derive(Clone, Copy, Debug)]
pub struct Node {
    pub name: StrRef,
    pub mesh: OptHandle<Mesh>,
    pub children: RangeU32,
    pub transform: Transform,
}

/// A drawable collection of primitives.
#[derive(Clone, Copy, Debug)]
pub struct Mesh {
    pub name: StrRef,
    /// Range directly into [`Document::primitives`] — primitives belonging
    /// to one mesh are always parsed contiguously, so this is a plain
    /// `(first, count)` pair rather than an index-pool range.
    pub primitives: RangeU32,
}

pub use crate::accessor::{Accessor, Buffer, BufferView};
pub use crate::material::{Image, Material, Sampler, Texture};
pub use crate::mesh::Primitive;

/// The document: sole owner of every parsed array, the shared index pool,
/// and the string arena. Dropping the `Document` frees everything it owns;
/// spans and handles borrowed from it are valid only until then.
#[derive(Clone, Debug)]
pub struct Document {
    pub(crate) asset: Asset,
    pub(crate) scenes: Vec<Scene>,
    pub(crate) nodes: Vec<Node>,
    pub(crate) meshes: Vec<Mesh>,
    pub(crate) primitives: Vec<Primitive>,
    pub(crate) prim_attrs: Vec<crate::mesh::PrimAttr>,
    pub(crate) accessors: Vec<Accessor>,
    pub(crate) buffer_views: Vec<BufferView>,
    pub(crate) buffers: Vec<Buffer>,
    pub(crate) materials: Vec<Material>,
    pub(crate) textures: Vec<Texture>,
    pub(crate) images: Vec<Image>,
    pub(crate) samplers: Vec<Sampler>,
    pub(crate) indices: IndexPool,
    pub(crate) arena: StringArena,
    pub(crate) default_scene: OptHandle<Scene>,
    /// Directory the source `.gltf`/`.glb` file was loaded from, used to
    /// resolve relative buffer/image URIs. `None` when the document was
    /// parsed directly from bytes with no filesystem context.
    pub(crate) directory: Option<PathBuf>,
}

impl Document {
    pub(crate) fn empty() -> Self {
        Document {
            asset: Asset {
                version: String::new(),
                generator: StrRef::ABSENT_REF,
            },
            scenes: Vec::new(),
            nodes: Vec::new(),
            meshes: Vec::new(),
            primitives: Vec::new(),
            prim_attrs: Vec::new(),
            accessors: Vec::new(),
            buffer_views: Vec::new(),
            buffers: Vec::new(),
            materials: Vec::new(),
            textures: Vec::new(),
            images: Vec::new(),
            samplers: Vec::new(),
            indices: IndexPool::new(),
            arena: StringArena::new(),
            default_scene: OptHandle::ABSENT,
            directory: None,
        }
    }

    pub(crate) fn alloc_str(&mut self, s: &str) -> Result<StrRef, GltfError> {
        self.arena.alloc(s)
    }

    pub(crate) fn push_indices(&mut self, values: &[u32]) -> Result<RangeU32, GltfError> {
        self.indices.push_all(values)
    }

    pub fn arena_get(&self, r: StrRef) -> &str {
        self.arena.get(r)
    }

    pub fn directory(&self) -> Option<&std::path::Path> {
        self.directory.as_deref()
    }

    // ---- asset ----

    pub fn asset_version(&self) -> &str {
        &self.asset.version
    }

    pub fn asset_generator(&self) -> &str {
        self.arena.get(self.asset.generator)
    }

    // ---- scenes ----

    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    pub fn scene(&self, handle: Handle<Scene>) -> Option<&Scene> {
        self.scenes.get(handle.index())
    }

    pub fn scene_name(&self, handle: Handle<Scene>) -> &str {
        self.scene(handle).map_or("absent", |s| self.arena.get(s.name))
    }

    pub fn default_scene(&self) -> Option<Handle<Scene>> {
        self.default_scene.get()
    }

    pub fn scene_nodes(&self, handle: Handle<Scene>) -> &[u32] {
        self.scene(handle)
            .and_then(|s| self.indices.get(s.nodes))
            .unwrap_or(&[])
    }

    // ---- nodes ----

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, handle: Handle<Node>) -> Option<&Node> {
        self.nodes.get(handle.index())
    }

    pub fn node_name(&self, handle: Handle<Node>) -> &str {
        self.node(handle).map_or("absent", |n| self.arena.get(n.name))
    }

    pub fn node_mesh(&self, handle: Handle<Node>) -> Option<Handle<Mesh>> {
        self.node(handle).and_then(|n| n.mesh.get())
    }

    pub fn node_children(&self, handle: Handle<Node>) -> &[u32] {
        self.node(handle)
            .and_then(|n| self.indices.get(n.children))
            .unwrap_or(&[])
    }

    /// The node's local matrix, per spec §4.8: the stored matrix verbatim
    /// if present, otherwise `T * R * S` from the TRS fields.
    pub fn node_local_matrix(&self, handle: Handle<Node>) -> Option<crate::math::Mat4> {
        let n = self.node(handle)?;
        Some(match n.transform {
            Transform::Matrix(m) => m,
            Transform::Trs(trs) => crate::math::mat4_from_trs(&trs),
        })
    }

    // ---- meshes ----

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn mesh(&self, handle: Handle<Mesh>) -> Option<&Mesh> {
        self.meshes.get(handle.index())
    }

    pub fn mesh_name(&self, handle: Handle<Mesh>) -> &str {
        self.mesh(handle).map_or("absent", |m| self.arena.get(m.name))
    }

    pub fn mesh_primitive_count(&self, handle: Handle<Mesh>) -> u32 {
        self.mesh(handle).map_or(0, |m| m.primitives.count)
    }

    /// Flat primitive index for `(mesh_index, prim_i)`, per spec §4.7.
    pub(crate) fn mesh_primitive_handle(&self, mesh: Handle<Mesh>, prim_i: u32) -> Option<Handle<Primitive>> {
        let m = self.mesh(mesh)?;
        if prim_i >= m.primitives.count {
            return None;
        }
        Some(Handle::new(m.primitives.first + prim_i))
    }

    // ---- accessors / buffer views / buffers ----

    pub fn accessor_count(&self) -> usize {
        self.accessors.len()
    }

    pub fn accessor(&self, handle: Handle<Accessor>) -> Option<&Accessor> {
        self.accessors.get(handle.index())
    }

    pub fn buffer_view_count(&self) -> usize {
        self.buffer_views.len()
    }

    pub fn buffer_view(&self, handle: Handle<BufferView>) -> Option<&BufferView> {
        self.buffer_views.get(handle.index())
    }

    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    pub fn buffer(&self, handle: Handle<Buffer>) -> Option<&Buffer> {
        self.buffers.get(handle.index())
    }

    // ---- materials / textures / images / samplers ----

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn material(&self, handle: Handle<Material>) -> Option<&Material> {
        self.materials.get(handle.index())
    }

    pub fn material_name(&self, handle: Handle<Material>) -> &str {
        self.material(handle).map_or("absent", |m| self.arena.get(m.name))
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn texture(&self, handle: Handle<Texture>) -> Option<&Texture> {
        self.textures.get(handle.index())
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    pub fn image(&self, handle: Handle<Image>) -> Option<&Image> {
        self.images.get(handle.index())
    }

    pub fn image_name(&self, handle: Handle<Image>) -> &str {
        self.image(handle).map_or("absent", |i| self.arena.get(i.name))
    }

    pub fn sampler_count(&self) -> usize {
        self.samplers.len()
    }

    pub fn sampler(&self, handle: Handle<Sampler>) -> Option<&Sampler> {
        self.samplers.get(handle.index())
    }
}
