//! Scene graph evaluator: iterative DFS world-matrix computation with
//! cycle detection (spec §4.8).
//!
//! Grounded directly on the reference loader's `gltf_world.c`: an explicit
//! stack of `(node, parent, next_child)` frames replaces recursion, and a
//! per-node state byte (`Unvisited` / `Visiting` / `Done`) both drives the
//! traversal and detects cycles as "visit while `Visiting`".

use crate::document::{Document, Node, Scene};
use crate::error::{ErrorKind, GltfError, Path};
use crate::handle::Handle;
use crate::math::{self, Mat4};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DfsState {
    Unvisited,
    Visiting,
    Done,
}

struct DfsFrame {
    node: u32,
    parent: Option<u32>,
    next_child: u32,
}

/// A reusable cache of per-node world matrices, independently owned by the
/// caller and bound to whichever document produced it (spec §3, "World
/// cache"). Computing into the cache for a new scene resets all state.
pub struct WorldCache {
    world: Vec<Mat4>,
    state: Vec<DfsState>,
    scene_index: Option<u32>,
    valid: bool,
}

impl WorldCache {
    /// Allocates a cache sized for `doc`'s node count.
    pub fn new(doc: &Document) -> Self {
        let n = doc.node_count();
        WorldCache {
            world: vec![math::IDENTITY; n],
            state: vec![DfsState::Unvisited; n],
            scene_index: None,
            valid: false,
        }
    }

    /// `true` once [`WorldCache::compute`] has succeeded for some scene and
    /// the cache has not since been invalidated.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// The world matrix for `node`, if it was reached during the most recent
    /// [`WorldCache::compute`] call. Returns `None` for an unreachable node,
    /// a stale/invalid cache, or a node outside the bound document's range.
    pub fn world_matrix(&self, node: Handle<Node>) -> Option<Mat4> {
        if !self.valid {
            return None;
        }
        let i = node.value() as usize;
        if self.state.get(i) != Some(&DfsState::Done) {
            return None;
        }
        self.world.get(i).copied()
    }

    /// Computes world matrices for every node reachable from `scene`'s root
    /// nodes. Resets all per-node state first, so a cache may be reused
    /// across scenes by calling this repeatedly.
    pub fn compute(&mut self, doc: &Document, scene: Handle<Scene>) -> Result<(), GltfError> {
        if self.world.len() != doc.node_count() {
            return Err(GltfError::new(
                ErrorKind::Invalid,
                "world cache size does not match document node count",
                Path::new(),
            ));
        }

        self.valid = false;
        self.scene_index = Some(scene.value());
        for s in self.state.iter_mut() {
            *s = DfsState::Unvisited;
        }

        let scene_path = Path::new().field("scenes").index(scene.index());
        let roots = doc.scene_nodes(scene);
        if roots.is_empty() {
            self.valid = true;
            return Ok(());
        }

        let mut stack: Vec<DfsFrame> = Vec::with_capacity(doc.node_count());

        for &root in roots {
            if root as usize >= doc.node_count() {
                return Err(GltfError::parse("scene root node index out of range", scene_path.field("nodes")));
            }
            if self.state[root as usize] == DfsState::Done {
                continue; // already reached via a previous root in this scene
            }
            stack.push(DfsFrame {
                node: root,
                parent: None,
                next_child: 0,
            });

            while let Some(frame) = stack.last_mut() {
                let node = frame.node;

                if self.state[node as usize] == DfsState::Unvisited {
                    let parent_world = match frame.parent {
                        Some(p) => self.world[p as usize],
                        None => math::IDENTITY,
                    };
                    let local = doc
                        .node_local_matrix(Handle::new(node))
                        .ok_or_else(|| GltfError::invalid("node index out of range"))?;
                    self.world[node as usize] = math::mat4_mul(&parent_world, &local);
                    self.state[node as usize] = DfsState::Visiting;
                    continue;
                }
                if self.state[node as usize] == DfsState::Done {
                    stack.pop();
                    continue;
                }

                // Visiting: descend into the next unvisited child, or finish.
                let children = doc.node_children(Handle::new(node));
                if (frame.next_child as usize) < children.len() {
                    let child = children[frame.next_child as usize];
                    frame.next_child += 1;
                    if child as usize >= doc.node_count() {
                        return Err(GltfError::parse("node child index out of range", Path::new()));
                    }
                    if self.state[child as usize] == DfsState::Visiting {
                        return Err(GltfError::parse("cycle in node graph", Path::new()));
                    }
                    stack.push(DfsFrame {
                        node: child,
                        parent: Some(node),
                        next_child: 0,
                    });
                } else {
                    self.state[node as usize] = DfsState::Done;
                    stack.pop();
                }
            }
        }

        self.valid = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Document, Transform};
    use crate::math::Trs;
    use approx::assert_relative_eq;

    /// Builds a three-node scene: Root -T(1,0,0),S(2,2,2)- has two children,
    /// ChildB -T(0,0,-3)- and ChildC -T(0,4,0)-, matching spec §8 scenario 5.
    fn trs_scene() -> Document {
        let mut doc = Document::empty();
        let children = doc.push_indices(&[1, 2]).unwrap();
        doc.nodes.push(Node {
            name: crate::arena::StrRef::ABSENT_REF,
            mesh: Default::default(),
            children,
            transform: Transform::Trs(Trs {
                translation: [1.0, 0.0, 0.0],
                rotation: [0.0, 0.0, 0.0, 1.0],
                scale: [2.0, 2.0, 2.0],
            }),
        });
        doc.nodes.push(Node {
            name: crate::arena::StrRef::ABSENT_REF,
            mesh: Default::default(),
            children: crate::pool::RangeU32::EMPTY,
            transform: Transform::Trs(Trs {
                translation: [0.0, 0.0, -3.0],
                ..Default::default()
            }),
        });
        doc.nodes.push(Node {
            name: crate::arena::StrRef::ABSENT_REF,
            mesh: Default::default(),
            children: crate::pool::RangeU32::EMPTY,
            transform: Transform::Trs(Trs {
                translation: [0.0, 4.0, 0.0],
                ..Default::default()
            }),
        });
        let roots = doc.push_indices(&[0]).unwrap();
        doc.scenes.push(Scene {
            name: crate::arena::StrRef::ABSENT_REF,
            nodes: roots,
        });
        doc
    }

    #[test]
    fn worked_trs_scene_matches_spec_scenario() {
        let doc = trs_scene();
        let mut cache = WorldCache::new(&doc);
        cache.compute(&doc, Handle::new(0)).unwrap();

        let root = cache.world_matrix(Handle::new(0)).unwrap();
        assert_relative_eq!(root[12], 1.0);
        assert_relative_eq!(root[13], 0.0);
        assert_relative_eq!(root[14], 0.0);
        assert_relative_eq!(root[0], 2.0);

        let child_b = cache.world_matrix(Handle::new(1)).unwrap();
        assert_relative_eq!(child_b[12], 1.0);
        assert_relative_eq!(child_b[13], 0.0);
        assert_relative_eq!(child_b[14], -6.0);
        assert_relative_eq!(child_b[0], 2.0, epsilon = 1e-5);

        let child_c = cache.world_matrix(Handle::new(2)).unwrap();
        assert_relative_eq!(child_c[12], 1.0);
        assert_relative_eq!(child_c[13], 8.0);
        assert_relative_eq!(child_c[14], -6.0);
    }

    #[test]
    fn cycle_is_detected() {
        let mut doc = Document::empty();
        let children0 = doc.push_indices(&[1]).unwrap();
        doc.nodes.push(Node {
            name: crate::arena::StrRef::ABSENT_REF,
            mesh: Default::default(),
            children: children0,
            transform: Transform::default(),
        });
        let children1 = doc.push_indices(&[0]).unwrap();
        doc.nodes.push(Node {
            name: crate::arena::StrRef::ABSENT_REF,
            mesh: Default::default(),
            children: children1,
            transform: Transform::default(),
        });
        let roots = doc.push_indices(&[0]).unwrap();
        doc.scenes.push(Scene {
            name: crate::arena::StrRef::ABSENT_REF,
            nodes: roots,
        });

        let mut cache = WorldCache::new(&doc);
        let err = cache.compute(&doc, Handle::new(0)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Parse);
    }

    #[test]
    fn unreachable_node_stays_unvisited() {
        let mut doc = Document::empty();
        doc.nodes.push(Node {
            name: crate::arena::StrRef::ABSENT_REF,
            mesh: Default::default(),
            children: crate::pool::RangeU32::EMPTY,
            transform: Transform::default(),
        });
        doc.nodes.push(Node {
            name: crate::arena::StrRef::ABSENT_REF,
            mesh: Default::default(),
            children: crate::pool::RangeU32::EMPTY,
            transform: Transform::default(),
        });
        let roots = doc.push_indices(&[0]).unwrap();
        doc.scenes.push(Scene {
            name: crate::arena::StrRef::ABSENT_REF,
            nodes: roots,
        });

        let mut cache = WorldCache::new(&doc);
        cache.compute(&doc, Handle::new(0)).unwrap();
        assert!(cache.world_matrix(Handle::new(0)).is_some());
        assert!(cache.world_matrix(Handle::new(1)).is_none());
    }

    #[test]
    fn explicit_matrix_overrides_trs() {
        let mut doc = Document::empty();
        #[rustfmt::skip]
        let matrix: Mat4 = [
            2.0, 0.0, 0.0, 0.0,
            0.0, 3.0, 0.0, 0.0,
            0.0, 0.0, 4.0, 0.0,
            5.0, 6.0, 7.0, 1.0,
        ];
        doc.nodes.push(Node {
            name: crate::arena::StrRef::ABSENT_REF,
            mesh: Default::default(),
            children: crate::pool::RangeU32::EMPTY,
            transform: Transform::Matrix(matrix),
        });
        let local = doc.node_local_matrix(Handle::new(0)).unwrap();
        assert_eq!(local, matrix);
    }
}
