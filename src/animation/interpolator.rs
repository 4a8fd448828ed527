//! The per-channel keyframe evaluator.
//!
//! An [`Interpolator`] is re-entered every frame with the channel's current
//! time and locates the active keyframe bracket incrementally: playback time
//! within a loop is monotonically non-decreasing, so the search resumes from
//! the last resolved key and a backward jump is taken as the start of a new
//! loop. Reverse scrubbing (time decreasing without crossing the loop
//! boundary) is outside this contract and will search incorrectly; callers
//! that need it must [`reset_key`](Interpolator::reset_key) first.

use glam::{Quat, Vec4};
use smallvec::SmallVec;

use crate::animation::channel::AnimationChannel;
use crate::animation::path::TargetPath;
use crate::animation::sampler::{AnimationSampler, InterpolationMode};
use crate::document::Document;

/// One interpolated keyframe value. TRS strides stay inline; morph-weight
/// strides spill to the heap. Empty means "no update this frame".
pub type ComponentVec = SmallVec<[f32; 4]>;

// Above this, endpoint quaternions are near-parallel and SLERP degrades to
// a component lerp for numerical stability.
const DOT_THRESHOLD: f32 = 0.9995;

/// Per-channel evaluator state: the last resolved key index and the last
/// evaluated time.
#[derive(Debug, Clone, Copy, Default)]
pub struct Interpolator {
    prev_key: usize,
    prev_t: f32,
}

impl Interpolator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rewinds the incremental search to the first key. Called whenever
    /// playback is reset to the start.
    pub fn reset_key(&mut self) {
        self.prev_key = 0;
        self.prev_t = 0.0;
    }

    /// Evaluates the channel's sampler at time `t` (seconds).
    ///
    /// `stride` is the component width of one keyframe value for the
    /// channel's bound property; `max_time` is the animation's duration,
    /// used to wrap `t` for looping. Degenerate data (missing or empty
    /// accessors, truncated output) produces an empty result, which the
    /// caller must treat as a skipped frame.
    pub fn interpolate(
        &mut self,
        document: &Document,
        channel: &AnimationChannel,
        sampler: &AnimationSampler,
        t: f32,
        stride: usize,
        max_time: f32,
    ) -> ComponentVec {
        if stride == 0 {
            return ComponentVec::new();
        }

        let (Some(input_ref), Some(output_ref)) = (sampler.input(), sampler.output()) else {
            return ComponentVec::new();
        };
        let (Some(input_accessor), Some(output_accessor)) = (
            document.accessor(input_ref),
            document.accessor(output_ref),
        ) else {
            log::error!("Invalid accessor for animation sampler");
            return ComponentVec::new();
        };

        let input = input_accessor.float_view();
        let output = output_accessor.float_view();
        if input.is_empty() || output.is_empty() {
            log::error!("Empty input or output data");
            return ComponentVec::new();
        }

        // A single keyframe needs no interpolation regardless of mode.
        if output.len() == stride {
            return ComponentVec::from_slice(output);
        }
        if input.len() < 2 {
            return single_key_value(sampler.interpolation(), output, stride);
        }

        // Degenerate duration with more than one key; nothing to wrap into.
        if max_time <= 0.0 {
            return ComponentVec::new();
        }

        // Wrap for looping, then clamp into the keyed range so t never
        // precedes the first key or exceeds the last, even across
        // floating-point wraparound error.
        let t = (t % max_time).max(input[0]).min(input[input.len() - 1]);

        // A backward jump means a new loop has begun; the forward search
        // resumes from the start.
        if self.prev_t > t {
            self.prev_key = 0;
        }
        self.prev_t = t;

        // First key at or after t: min{ input[i] | input[i] >= t }
        let mut next_key = None;
        for (i, &key_time) in input.iter().enumerate().skip(self.prev_key) {
            if t <= key_time {
                next_key = Some(i.clamp(1, input.len() - 1));
                break;
            }
        }
        let next_key = next_key.unwrap_or(input.len() - 1);
        self.prev_key = next_key.saturating_sub(1);

        let key_delta = input[next_key] - input[self.prev_key];
        let tn = if key_delta > 0.0 {
            (t - input[self.prev_key]) / key_delta
        } else {
            0.0
        };

        // Rotation channels carry unit quaternions and get dedicated
        // handling: spline results are renormalized, linear becomes SLERP.
        if channel.target_path() == TargetPath::Rotation {
            match sampler.interpolation() {
                InterpolationMode::CubicSpline => {
                    let mut result =
                        cubic_spline(self.prev_key, next_key, output, key_delta, tn, 4);
                    if result.len() >= 4 {
                        let quat =
                            normalize_quat(Quat::from_xyzw(result[0], result[1], result[2], result[3]));
                        result[..4].copy_from_slice(&quat.to_array());
                    }
                    return result;
                }
                InterpolationMode::Linear => {
                    let q0 = quat_at(output, self.prev_key);
                    let q1 = quat_at(output, next_key);
                    return ComponentVec::from_slice(&slerp_quat(q0, q1, tn).to_array());
                }
                InterpolationMode::Step => {
                    return ComponentVec::from_slice(&quat_at(output, self.prev_key).to_array());
                }
                InterpolationMode::Unknown => {}
            }
        }

        match sampler.interpolation() {
            InterpolationMode::Step => step(self.prev_key, output, stride),
            InterpolationMode::CubicSpline => {
                cubic_spline(self.prev_key, next_key, output, key_delta, tn, stride)
            }
            InterpolationMode::Linear | InterpolationMode::Unknown => {
                linear(self.prev_key, next_key, output, tn, stride)
            }
        }
    }
}

// One input key but a wider output (e.g. a single-key spline): fall back to
// the value component of key 0.
fn single_key_value(
    interpolation: InterpolationMode,
    output: &[f32],
    stride: usize,
) -> ComponentVec {
    let offset = match interpolation {
        InterpolationMode::CubicSpline => stride,
        _ => 0,
    };
    if offset + stride <= output.len() {
        ComponentVec::from_slice(&output[offset..offset + stride])
    } else {
        ComponentVec::new()
    }
}

/// Step interpolation: the previous key's value, verbatim.
fn step(prev_key: usize, output: &[f32], stride: usize) -> ComponentVec {
    let start = prev_key * stride;
    let Some(slice) = output.get(start..start + stride) else {
        log::warn!("Keyframe output too short for step interpolation");
        return ComponentVec::new();
    };
    ComponentVec::from_slice(slice)
}

/// Componentwise linear blend between the bracketing keys.
fn linear(prev_key: usize, next_key: usize, output: &[f32], t: f32, stride: usize) -> ComponentVec {
    let prev_start = prev_key * stride;
    let next_start = next_key * stride;
    let (Some(prev), Some(next)) = (
        output.get(prev_start..prev_start + stride),
        output.get(next_start..next_start + stride),
    ) else {
        log::warn!("Keyframe output too short for linear interpolation");
        return ComponentVec::new();
    };
    prev.iter()
        .zip(next)
        .map(|(&p, &n)| p * (1.0 - t) + n * t)
        .collect()
}

/// Cubic Hermite spline over the glTF output layout, where each key stores
/// `[in-tangent, value, out-tangent]` and the element stride is `3 * stride`.
fn cubic_spline(
    prev_key: usize,
    next_key: usize,
    output: &[f32],
    key_delta: f32,
    t: f32,
    stride: usize,
) -> ComponentVec {
    let prev_index = prev_key * stride * 3;
    let next_index = next_key * stride * 3;
    // Offsets within one key's [in-tangent, value, out-tangent] block.
    let v = stride;
    let b = 2 * stride;

    if next_index + 3 * stride > output.len() {
        log::warn!("Keyframe output too short for cubic spline interpolation");
        return ComponentVec::new();
    }

    let t_sq = t * t;
    let t_cub = t_sq * t;

    let mut result = ComponentVec::with_capacity(stride);
    for i in 0..stride {
        let v0 = output[prev_index + i + v];
        let a = key_delta * output[next_index + i];
        let bb = key_delta * output[prev_index + i + b];
        let v1 = output[next_index + i + v];

        result.push(
            (2.0 * t_cub - 3.0 * t_sq + 1.0) * v0
                + (t_cub - 2.0 * t_sq + t) * bb
                + (-2.0 * t_cub + 3.0 * t_sq) * v1
                + (t_cub - t_sq) * a,
        );
    }
    result
}

/// Spherical linear interpolation along the shortest arc.
///
/// Inputs are normalized first (keyframe data is not trusted to be unit
/// length); a negative dot product flips the second quaternion to stay on
/// the short side of the double cover, and near-parallel inputs fall back
/// to a component lerp. The result is always renormalized.
#[must_use]
pub fn slerp_quat(q1: Quat, q2: Quat, t: f32) -> Quat {
    let qn1 = normalize_quat(q1);
    let mut qn2 = normalize_quat(q2);

    let mut dot = qn1.dot(qn2);
    if dot < 0.0 {
        qn2 = -qn2;
        dot = -dot;
    }

    let result = if dot > DOT_THRESHOLD {
        Quat::from_vec4(Vec4::from(qn1).lerp(Vec4::from(qn2), t))
    } else {
        let theta0 = dot.abs().acos();
        let sin_theta0 = theta0.sin();
        let theta = theta0 * t;
        let s0 = theta.cos() - dot * theta.sin() / sin_theta0;
        let s1 = theta.sin() / sin_theta0;
        Quat::from_vec4(Vec4::from(qn1) * s0 + Vec4::from(qn2) * s1)
    };

    normalize_quat(result)
}

/// Reads the quaternion stored at keyframe `index`, or identity when the
/// output is too short.
fn quat_at(output: &[f32], index: usize) -> Quat {
    let start = 4 * index;
    let Some(q) = output.get(start..start + 4) else {
        log::error!("Index out of bounds when getting quaternion");
        return Quat::IDENTITY;
    };
    Quat::from_xyzw(q[0], q[1], q[2], q[3])
}

/// Normalizes a quaternion, mapping degenerate (near-zero) input to
/// identity.
fn normalize_quat(q: Quat) -> Quat {
    if q.length_squared() < 1e-12 {
        Quat::IDENTITY
    } else {
        q.normalize()
    }
}
