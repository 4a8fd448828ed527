pub mod channel;
pub mod interpolator;
pub mod path;
pub mod player;
pub mod resolve;
pub mod sampler;
pub mod target;

pub use channel::AnimationChannel;
pub use interpolator::{ComponentVec, Interpolator, slerp_quat};
pub use path::TargetPath;
pub use player::{Animation, AnimationRegistry};
pub use resolve::{AnimationPointer, PointerKind, PropertyBinding, ResolvedTarget, resolve};
pub use sampler::{AnimationSampler, InterpolationMode};
pub use target::AnimationTarget;
