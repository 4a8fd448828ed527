//! Animation channels: one animated property each.

use crate::animation::path::TargetPath;
use crate::animation::target::AnimationTarget;
use crate::document::Document;

/// Binds an [`AnimationTarget`] to a sampler index in the owning animation's
/// sampler list.
#[derive(Debug, Clone, Default)]
pub struct AnimationChannel {
    target: Option<AnimationTarget>,
    sampler: Option<usize>,
}

impl AnimationChannel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs and owns a new target for the given node and path.
    pub fn create_target(&mut self, node: usize, path: TargetPath) {
        let mut target = AnimationTarget::new();
        target.set_node(node);
        target.set_path(path);
        self.target = Some(target);
    }

    /// Like [`create_target`](Self::create_target), decoding the path from
    /// its string form (unrecognized strings leave the target invalid).
    pub fn create_target_from_string(&mut self, node: usize, path: &str) {
        self.create_target(node, TargetPath::parse(path));
    }

    #[inline]
    #[must_use]
    pub fn target(&self) -> Option<&AnimationTarget> {
        self.target.as_ref()
    }

    #[inline]
    pub fn target_mut(&mut self) -> Option<&mut AnimationTarget> {
        self.target.as_mut()
    }

    pub fn set_target(&mut self, target: AnimationTarget) {
        self.target = Some(target);
    }

    #[inline]
    #[must_use]
    pub fn sampler(&self) -> Option<usize> {
        self.sampler
    }

    #[inline]
    pub fn set_sampler(&mut self, sampler: usize) {
        self.sampler = Some(sampler);
    }

    /// Validates the channel against the document: target present with a
    /// valid path, the target's node index (when declared) in range, and a
    /// sampler reference present. Sampler-index bounds against the sibling
    /// sampler list are the owning animation's job.
    #[must_use]
    pub fn validate(&self, document: &Document) -> bool {
        let Some(target) = &self.target else {
            log::error!("Animation channel missing target");
            return false;
        };

        if self.sampler.is_none() {
            log::error!("Animation channel missing sampler");
            return false;
        }

        if let Some(node) = target.node() {
            if node >= document.nodes.len() {
                log::error!("Invalid target node index: {node}");
                return false;
            }
        }

        if !target.is_path_valid() {
            log::error!("Invalid animation target path: {}", target.path_string());
            return false;
        }

        true
    }

    /// Cheap structural check, independent of any document: target present
    /// with a node and a valid path, and a sampler reference present. No
    /// bounds checking.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.target.as_ref().is_some_and(|target| {
            target.node().is_some() && target.is_path_valid()
        }) && self.sampler.is_some()
    }

    /// The target's node index, if a target with a node exists.
    #[must_use]
    pub fn target_node(&self) -> Option<usize> {
        self.target.as_ref().and_then(AnimationTarget::node)
    }

    /// The target's path; `Unknown` when no target exists.
    #[must_use]
    pub fn target_path(&self) -> TargetPath {
        self.target
            .as_ref()
            .map_or(TargetPath::Unknown, AnimationTarget::path)
    }

    /// The target's path string; empty when no target exists.
    #[must_use]
    pub fn target_path_string(&self) -> &'static str {
        self.target
            .as_ref()
            .map_or("", AnimationTarget::path_string)
    }
}
