//! The already-parsed glTF data the engine consumes.
//!
//! Parsing and deserialization are a collaborator's job; the animation core
//! receives a [`Document`] of dense, index-addressed tables (accessors,
//! nodes, meshes, lights) and only ever reads keyframe data through
//! [`Accessor`] float views.

pub mod accessor;
pub mod light;
pub mod node;

pub use accessor::{Accessor, ComponentType, ElementType};
pub use light::{Light, LightKind, LightParameter};
pub use node::Node;

/// The slice of a mesh the animator cares about: how many morph targets it
/// has and the default weights for them.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub name: Option<String>,
    pub morph_target_count: usize,
    /// Mesh-level default morph weights (may be empty even when targets
    /// exist).
    pub weights: Vec<f32>,
}

/// An in-memory glTF document subset, indexed the way the format indexes:
/// dense integer references between flat tables.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub accessors: Vec<Accessor>,
    pub nodes: Vec<Node>,
    pub meshes: Vec<Mesh>,
    pub lights: Vec<Light>,
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn accessor(&self, index: usize) -> Option<&Accessor> {
        self.accessors.get(index)
    }

    #[inline]
    #[must_use]
    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    #[inline]
    pub fn node_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.nodes.get_mut(index)
    }

    #[inline]
    #[must_use]
    pub fn mesh(&self, index: usize) -> Option<&Mesh> {
        self.meshes.get(index)
    }

    #[inline]
    #[must_use]
    pub fn light(&self, index: usize) -> Option<&Light> {
        self.lights.get(index)
    }

    #[inline]
    pub fn light_mut(&mut self, index: usize) -> Option<&mut Light> {
        self.lights.get_mut(index)
    }

    /// Morph-target count for a node: its own weights when present,
    /// otherwise the weight count declared by its mesh.
    #[must_use]
    pub fn morph_target_count(&self, node_index: usize) -> usize {
        let Some(node) = self.node(node_index) else {
            return 0;
        };
        if !node.weights.is_empty() {
            return node.weights.len();
        }
        node.mesh
            .and_then(|mesh| self.mesh(mesh))
            .map_or(0, |mesh| mesh.morph_target_count)
    }

    /// Captures the rest pose of every node and light. Call once after the
    /// document is fully assembled.
    pub fn capture_rest_pose(&mut self) {
        for node in &mut self.nodes {
            node.capture_rest();
        }
        for light in &mut self.lights {
            light.capture_rest();
        }
    }
}
