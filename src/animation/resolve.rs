//! Target resolution: from channel targets to concrete property bindings.
//!
//! Pointer-path channels address extension properties by JSON pointer. The
//! pointer string is decoded once, when it is attached to a target; per
//! frame, resolution is index bounds-checking and enum dispatch only.

use crate::animation::channel::AnimationChannel;
use crate::animation::path::TargetPath;
use crate::document::{Document, LightParameter};

/// A decoded extension pointer.
///
/// The only pointer family the engine can apply is the punctual-light one:
/// `/extensions/KHR_lights_punctual/lights/{i}/<parameter>` is remapped into
/// the document's light table (the prefix also appears pre-stripped as
/// `/lights/{i}/<parameter>` in some exporters; both spellings decode).
/// Anything else decodes to `Unsupported` with a warning and the channel is
/// skipped at resolve time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationPointer {
    raw: String,
    kind: PointerKind,
}

/// What a pointer addresses, decided once at decode time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    /// A punctual-light parameter.
    Light {
        light: usize,
        parameter: LightParameter,
    },
    /// A pointer the engine has no binding for.
    Unsupported,
}

impl AnimationPointer {
    /// Decodes a JSON-pointer string.
    #[must_use]
    pub fn parse(raw: String) -> Self {
        let kind = decode_pointer(&raw);
        if kind == PointerKind::Unsupported {
            log::warn!("Unsupported animation pointer: {raw}");
        }
        Self { raw, kind }
    }

    #[inline]
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> PointerKind {
        self.kind
    }
}

fn decode_pointer(raw: &str) -> PointerKind {
    // KHR_lights_punctual pointers are remapped into the light table's own
    // address space before decoding.
    let path = raw
        .strip_prefix("/extensions/KHR_lights_punctual")
        .unwrap_or(raw);

    let Some(rest) = path.strip_prefix("/lights/") else {
        return PointerKind::Unsupported;
    };
    let Some((index, suffix)) = rest.split_once('/') else {
        return PointerKind::Unsupported;
    };
    let Ok(light) = index.parse::<usize>() else {
        return PointerKind::Unsupported;
    };
    match LightParameter::parse_suffix(suffix) {
        Some(parameter) => PointerKind::Light { light, parameter },
        None => PointerKind::Unsupported,
    }
}

/// The concrete property a resolved channel writes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyBinding {
    Translation,
    Rotation,
    Scale,
    MorphWeights {
        /// Morph-target count, fixed by the node/mesh at resolve time.
        count: usize,
    },
    Light {
        light: usize,
        parameter: LightParameter,
    },
}

/// A channel target resolved against a document: the owning node plus the
/// bound property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub node: usize,
    pub binding: PropertyBinding,
}

impl ResolvedTarget {
    /// Component count of one keyframe value for this binding.
    #[must_use]
    pub fn stride(&self) -> usize {
        match self.binding {
            PropertyBinding::Translation | PropertyBinding::Scale => 3,
            PropertyBinding::Rotation => 4,
            PropertyBinding::MorphWeights { count } => count,
            PropertyBinding::Light { parameter, .. } => parameter.component_count(),
        }
    }
}

/// Resolves a channel's target against the document. Returns `None` (and
/// the channel is skipped for the frame) when the target is absent, the
/// node index is out of range, the path is not animatable, a weights target
/// has no morph targets to drive, or a pointer is unsupported or out of
/// range.
#[must_use]
pub fn resolve(document: &Document, channel: &AnimationChannel) -> Option<ResolvedTarget> {
    let target = channel.target()?;
    let node = target.node()?;
    if node >= document.nodes.len() {
        return None;
    }

    let binding = match target.path() {
        TargetPath::Translation => PropertyBinding::Translation,
        TargetPath::Rotation => PropertyBinding::Rotation,
        TargetPath::Scale => PropertyBinding::Scale,
        TargetPath::Weights => {
            let count = document.morph_target_count(node);
            if count == 0 {
                log::warn!("Weights channel targets node {node} with no morph targets");
                return None;
            }
            PropertyBinding::MorphWeights { count }
        }
        TargetPath::Pointer => match target.pointer()?.kind() {
            PointerKind::Light { light, parameter } => {
                if light >= document.lights.len() {
                    log::warn!("Animation pointer references light {light} out of range");
                    return None;
                }
                PropertyBinding::Light { light, parameter }
            }
            PointerKind::Unsupported => return None,
        },
        TargetPath::Unknown => return None,
    };

    Some(ResolvedTarget { node, binding })
}
