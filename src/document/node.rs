//! Scene nodes as seen by the animator.
//!
//! A [`Node`] carries the slice of scene-graph state the animation engine is
//! allowed to touch: the local TRS, the morph-target weights, and a captured
//! rest pose used to restore the node when playback stops. World-matrix
//! propagation and everything downstream of it belongs to the host scene
//! graph.

use glam::{Quat, Vec3};

#[derive(Debug, Clone, Default)]
struct RestPose {
    translation: Vec3,
    rotation: Quat,
    scale: Vec3,
    weights: Vec<f32>,
}

/// A scene node's animatable state.
#[derive(Debug, Clone)]
pub struct Node {
    /// Node name from the source document, if any.
    pub name: Option<String>,

    // === Hot data written every frame ===
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    /// Morph-target weights; empty when the node has none of its own.
    pub weights: Vec<f32>,

    /// Mesh index, used to resolve the morph-target count when the node does
    /// not carry weights itself.
    pub mesh: Option<usize>,
    /// Light index, when the node instantiates a punctual light.
    pub light: Option<usize>,

    rest: RestPose,
}

impl Node {
    /// Creates a node at the identity transform with its rest pose captured.
    #[must_use]
    pub fn new() -> Self {
        Self::with_trs(Vec3::ZERO, Quat::IDENTITY, Vec3::ONE)
    }

    /// Creates a node with the given local TRS, capturing it as the rest
    /// pose.
    #[must_use]
    pub fn with_trs(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        let mut node = Self {
            name: None,
            translation,
            rotation,
            scale,
            weights: Vec::new(),
            mesh: None,
            light: None,
            rest: RestPose::default(),
        };
        node.capture_rest();
        node
    }

    /// Snapshots the current values as the rest pose. Called once after the
    /// document is fully assembled, before any animation runs.
    pub fn capture_rest(&mut self) {
        self.rest = RestPose {
            translation: self.translation,
            rotation: self.rotation,
            scale: self.scale,
            weights: self.weights.clone(),
        };
    }

    #[inline]
    pub fn reset_translation(&mut self) {
        self.translation = self.rest.translation;
    }

    #[inline]
    pub fn reset_rotation(&mut self) {
        self.rotation = self.rest.rotation;
    }

    #[inline]
    pub fn reset_scale(&mut self) {
        self.scale = self.rest.scale;
    }

    #[inline]
    pub fn reset_weights(&mut self) {
        self.weights.clone_from(&self.rest.weights);
    }

    /// Rest-pose translation.
    #[inline]
    #[must_use]
    pub fn rest_translation(&self) -> Vec3 {
        self.rest.translation
    }

    /// Rest-pose rotation.
    #[inline]
    #[must_use]
    pub fn rest_rotation(&self) -> Quat {
        self.rest.rotation
    }

    /// Rest-pose scale.
    #[inline]
    #[must_use]
    pub fn rest_scale(&self) -> Vec3 {
        self.rest.scale
    }

    /// Rest-pose morph weights.
    #[inline]
    #[must_use]
    pub fn rest_weights(&self) -> &[f32] {
        &self.rest.weights
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}
