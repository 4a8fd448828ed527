//! Animation targets: *what* a channel animates.

use crate::animation::path::TargetPath;
use crate::animation::resolve::AnimationPointer;

/// Identifies the animated property: an optional owning-node reference plus
/// a target path. Pure value object; a target with an `Unknown` path is
/// invalid.
#[derive(Debug, Clone, Default)]
pub struct AnimationTarget {
    node: Option<usize>,
    path: TargetPath,
    /// Raw extension pointer for [`TargetPath::Pointer`] targets, decoded
    /// once when set.
    pointer: Option<AnimationPointer>,
}

impl AnimationTarget {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn node(&self) -> Option<usize> {
        self.node
    }

    #[inline]
    pub fn set_node(&mut self, node: usize) {
        self.node = Some(node);
    }

    #[inline]
    pub fn clear_node(&mut self) {
        self.node = None;
    }

    #[inline]
    #[must_use]
    pub fn path(&self) -> TargetPath {
        self.path
    }

    #[inline]
    pub fn set_path(&mut self, path: TargetPath) {
        self.path = path;
    }

    /// Sets the path from its glTF string form. Unrecognized strings leave
    /// the path `Unknown` and log a warning; the failure surfaces later at
    /// validation.
    pub fn set_path_from_string(&mut self, path: &str) {
        self.path = TargetPath::parse(path);
        if self.path == TargetPath::Unknown {
            log::warn!("Unknown animation path: {path}");
        }
    }

    /// The path's glTF string; empty for `Unknown`.
    #[inline]
    #[must_use]
    pub fn path_string(&self) -> &'static str {
        self.path.as_str()
    }

    #[inline]
    #[must_use]
    pub fn is_path_valid(&self) -> bool {
        self.path.is_valid()
    }

    /// The decoded extension pointer, if one was set.
    #[inline]
    #[must_use]
    pub fn pointer(&self) -> Option<&AnimationPointer> {
        self.pointer.as_ref()
    }

    /// Attaches an extension pointer string (JSON-pointer form). The pointer
    /// is decoded here, once, rather than re-matched every frame.
    pub fn set_pointer(&mut self, raw: impl Into<String>) {
        self.pointer = Some(AnimationPointer::parse(raw.into()));
    }
}
