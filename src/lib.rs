#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod animation;
pub mod document;
pub mod errors;
pub mod utils;

pub use animation::{
    Animation, AnimationChannel, AnimationPointer, AnimationRegistry, AnimationSampler,
    AnimationTarget, ComponentVec, InterpolationMode, Interpolator, PointerKind, PropertyBinding,
    ResolvedTarget, TargetPath,
};
pub use document::{
    Accessor, ComponentType, Document, ElementType, Light, LightKind, LightParameter, Mesh, Node,
};
pub use errors::{GlintError, Result};
pub use utils::Timer;
