//! Animation Engine Tests
//!
//! Tests for:
//! - TargetPath / InterpolationMode string codecs and Unknown sentinels
//! - AnimationTarget / AnimationChannel / AnimationSampler validation rules
//! - Interpolator kernels: step, linear, cubic spline, quaternion SLERP
//! - Loop wraparound cursor reset and single-keyframe short-circuits
//! - Animation advance/stop state machine, duration scanning, rest restore

use std::f32::consts::FRAC_PI_2;

use glam::{Quat, Vec3};

use glint::animation::slerp_quat;
use glint::{
    Accessor, Animation, AnimationChannel, AnimationPointer, AnimationRegistry, AnimationSampler,
    AnimationTarget, ComponentType, Document, ElementType, InterpolationMode, Interpolator, Light,
    LightParameter, Mesh, Node, PointerKind, TargetPath,
};

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

/// Same rotation up to quaternion sign.
fn quat_approx(a: Quat, b: Quat) -> bool {
    a.dot(b).abs() > 1.0 - 1e-4
}

/// Document with accessor 0 = scalar times, accessor 1 = keyframe values.
fn keyframe_document(times: &[f32], values: &[f32], value_type: ElementType) -> Document {
    let mut document = Document::new();
    document
        .accessors
        .push(Accessor::from_f32(ElementType::Scalar, times).unwrap());
    document
        .accessors
        .push(Accessor::from_f32(value_type, values).unwrap());
    document
}

/// Channel targeting node 0 through sampler 0.
fn channel_for(path: TargetPath) -> AnimationChannel {
    let mut channel = AnimationChannel::new();
    channel.create_target(0, path);
    channel.set_sampler(0);
    channel
}

/// One node sliding from the origin to (10, 0, 0) over one second, resting
/// at (1, 2, 3).
fn slide_document() -> Document {
    let mut document = keyframe_document(
        &[0.0, 1.0],
        &[0.0, 0.0, 0.0, 10.0, 0.0, 0.0],
        ElementType::Vec3,
    );
    document.nodes.push(Node::with_trs(
        Vec3::new(1.0, 2.0, 3.0),
        Quat::IDENTITY,
        Vec3::ONE,
    ));
    document
}

fn slide_animation() -> Animation {
    let mut animation = Animation::new("slide");
    animation.add_sampler(AnimationSampler::linear(0, 1));
    animation.add_channel(channel_for(TargetPath::Translation));
    animation
}

#[derive(Default)]
struct RecordingRegistry {
    removed: Vec<usize>,
}

impl AnimationRegistry for RecordingRegistry {
    fn remove_animation_index(&mut self, index: usize) {
        self.removed.push(index);
    }
}

// ============================================================================
// Path / Mode Codecs
// ============================================================================

#[test]
fn path_codec_round_trip() {
    for s in TargetPath::all_strings() {
        let path = TargetPath::parse(s);
        assert!(path.is_valid(), "{s} should decode to a valid path");
        assert_eq!(path.as_str(), s);
    }
}

#[test]
fn path_codec_unknown_sentinel() {
    let path = TargetPath::parse("wobble");
    assert_eq!(path, TargetPath::Unknown);
    assert!(!path.is_valid());
    assert_eq!(path.as_str(), "");
}

#[test]
fn path_fixed_strides() {
    assert_eq!(TargetPath::Translation.fixed_stride(), Some(3));
    assert_eq!(TargetPath::Scale.fixed_stride(), Some(3));
    assert_eq!(TargetPath::Rotation.fixed_stride(), Some(4));
    assert_eq!(TargetPath::Weights.fixed_stride(), None);
    assert_eq!(TargetPath::Pointer.fixed_stride(), None);
}

#[test]
fn mode_codec_round_trip() {
    for s in InterpolationMode::all_strings() {
        let mode = InterpolationMode::parse(s);
        assert!(mode.is_valid(), "{s} should decode to a valid mode");
        assert_eq!(mode.as_str(), s);
    }
}

#[test]
fn mode_codec_unknown_sentinel_and_default() {
    assert_eq!(InterpolationMode::parse("smooth"), InterpolationMode::Unknown);
    assert!(!InterpolationMode::Unknown.is_valid());
    assert_eq!(InterpolationMode::default(), InterpolationMode::Linear);
}

// ============================================================================
// AnimationTarget
// ============================================================================

#[test]
fn target_path_from_string_leaves_unknown_on_bad_input() {
    let mut target = AnimationTarget::new();
    target.set_path_from_string("rotation");
    assert_eq!(target.path(), TargetPath::Rotation);

    target.set_path_from_string("wobble");
    assert_eq!(target.path(), TargetPath::Unknown);
    assert!(!target.is_path_valid());
}

#[test]
fn target_node_is_clearable() {
    let mut target = AnimationTarget::new();
    assert_eq!(target.node(), None);
    target.set_node(4);
    assert_eq!(target.node(), Some(4));
    target.clear_node();
    assert_eq!(target.node(), None);
}

// ============================================================================
// AnimationChannel
// ============================================================================

#[test]
fn channel_is_complete_requires_node_path_and_sampler() {
    let mut channel = AnimationChannel::new();
    assert!(!channel.is_complete());

    channel.create_target(0, TargetPath::Translation);
    assert!(!channel.is_complete(), "still missing the sampler ref");

    channel.set_sampler(0);
    assert!(channel.is_complete());

    let mut bad_path = AnimationChannel::new();
    bad_path.create_target_from_string(0, "wobble");
    bad_path.set_sampler(0);
    assert!(!bad_path.is_complete());
}

#[test]
fn channel_validate_rejects_out_of_range_node() {
    let document = slide_document();

    let mut channel = AnimationChannel::new();
    channel.create_target(5, TargetPath::Translation);
    channel.set_sampler(0);
    assert!(!channel.validate(&document));

    assert!(channel_for(TargetPath::Translation).validate(&document));
}

#[test]
fn channel_accessors_degrade_without_target() {
    let channel = AnimationChannel::new();
    assert_eq!(channel.target_node(), None);
    assert_eq!(channel.target_path(), TargetPath::Unknown);
    assert_eq!(channel.target_path_string(), "");
}

// ============================================================================
// AnimationSampler
// ============================================================================

#[test]
fn sampler_factories_set_mode_and_refs() {
    let sampler = AnimationSampler::linear(3, 4);
    assert_eq!(sampler.input(), Some(3));
    assert_eq!(sampler.output(), Some(4));
    assert_eq!(sampler.interpolation(), InterpolationMode::Linear);

    assert_eq!(
        AnimationSampler::step(0, 1).interpolation(),
        InterpolationMode::Step
    );
    assert_eq!(
        AnimationSampler::cubic_spline(0, 1).interpolation(),
        InterpolationMode::CubicSpline
    );
    assert!(!AnimationSampler::new().is_complete());
}

#[test]
fn sampler_string_setter_falls_back_to_linear() {
    let mut sampler = AnimationSampler::new();
    sampler.set_interpolation_from_string("CUBICSPLINE");
    assert_eq!(sampler.interpolation(), InterpolationMode::CubicSpline);

    sampler.set_interpolation_from_string("smooth");
    assert_eq!(sampler.interpolation(), InterpolationMode::Linear);
    assert_eq!(sampler.interpolation_string(), "LINEAR");
}

#[test]
fn sampler_validate_linear_counts_must_match() {
    let matching = keyframe_document(&[0.0, 1.0], &[0.0, 0.0, 0.0, 1.0, 1.0, 1.0], ElementType::Vec3);
    assert!(AnimationSampler::linear(0, 1).validate(&matching));

    let mismatched = keyframe_document(
        &[0.0, 1.0],
        &[0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 2.0, 2.0, 2.0],
        ElementType::Vec3,
    );
    assert!(!AnimationSampler::linear(0, 1).validate(&mismatched));
    assert!(!AnimationSampler::step(0, 1).validate(&mismatched));
}

#[test]
fn sampler_validate_cubic_requires_triple_count() {
    // Two keys, each [in-tangent, value, out-tangent]: six scalar elements.
    let cubic = keyframe_document(
        &[0.0, 1.0],
        &[0.0, 0.0, 1.0, 1.0, 10.0, 0.0],
        ElementType::Scalar,
    );
    assert!(AnimationSampler::cubic_spline(0, 1).validate(&cubic));

    // Equal counts are a LINEAR shape, not a CUBICSPLINE one.
    let flat = keyframe_document(&[0.0, 1.0], &[0.0, 10.0], ElementType::Scalar);
    assert!(!AnimationSampler::cubic_spline(0, 1).validate(&flat));
}

#[test]
fn sampler_validate_requires_scalar_input() {
    let mut document = Document::new();
    document
        .accessors
        .push(Accessor::from_f32(ElementType::Vec3, &[0.0, 0.0, 0.0, 1.0, 1.0, 1.0]).unwrap());
    document
        .accessors
        .push(Accessor::from_f32(ElementType::Vec3, &[0.0, 0.0, 0.0, 1.0, 1.0, 1.0]).unwrap());
    assert!(!AnimationSampler::linear(0, 1).validate(&document));
}

#[test]
fn sampler_validate_rejects_missing_and_out_of_range_refs() {
    let document = keyframe_document(&[0.0, 1.0], &[0.0, 10.0], ElementType::Scalar);
    assert!(!AnimationSampler::new().validate(&document));
    assert!(!AnimationSampler::linear(9, 1).validate(&document));
    assert!(!AnimationSampler::linear(0, 9).validate(&document));
}

#[test]
fn sampler_key_frame_count_is_zero_when_unresolvable() {
    let document = keyframe_document(&[0.0, 0.5, 1.0], &[0.0, 5.0, 10.0], ElementType::Scalar);
    assert_eq!(AnimationSampler::linear(0, 1).key_frame_count(&document), 3);
    assert_eq!(AnimationSampler::linear(99, 1).key_frame_count(&document), 0);
    assert_eq!(AnimationSampler::new().key_frame_count(&document), 0);
}

#[test]
fn sampler_time_range_reads_declared_bounds() {
    let document = keyframe_document(&[0.25, 1.0, 2.5], &[0.0, 5.0, 10.0], ElementType::Scalar);
    let range = AnimationSampler::linear(0, 1).time_range(&document);
    assert_eq!(range, Some((0.25, 2.5)));
    assert_eq!(AnimationSampler::new().time_range(&document), None);
    assert_eq!(AnimationSampler::linear(99, 1).time_range(&document), None);
}

// ============================================================================
// Interpolator: Linear
// ============================================================================

#[test]
fn linear_returns_exact_values_at_keyframes() {
    let document = keyframe_document(&[0.0, 1.0, 2.0], &[0.0, 10.0, 20.0], ElementType::Scalar);
    let channel = channel_for(TargetPath::Weights);
    let sampler = AnimationSampler::linear(0, 1);
    let mut cursor = Interpolator::new();

    // max_time above the last key so no sample wraps back to zero.
    for (t, expected) in [(0.0, 0.0), (1.0, 10.0), (2.0, 20.0)] {
        let value = cursor.interpolate(&document, &channel, &sampler, t, 1, 3.0);
        assert_eq!(value.len(), 1);
        assert!(
            approx(value[0], expected),
            "t={t}: expected {expected}, got {}",
            value[0]
        );
    }
}

#[test]
fn linear_midpoint_vec3() {
    let document = keyframe_document(
        &[0.0, 1.0],
        &[0.0, 0.0, 0.0, 10.0, 20.0, 30.0],
        ElementType::Vec3,
    );
    let channel = channel_for(TargetPath::Translation);
    let sampler = AnimationSampler::linear(0, 1);
    let mut cursor = Interpolator::new();

    let value = cursor.interpolate(&document, &channel, &sampler, 0.5, 3, 1.0);
    assert!(approx(value[0], 5.0));
    assert!(approx(value[1], 10.0));
    assert!(approx(value[2], 15.0));
}

#[test]
fn linear_clamps_before_first_key() {
    let document = keyframe_document(&[1.0, 2.0], &[10.0, 20.0], ElementType::Scalar);
    let channel = channel_for(TargetPath::Weights);
    let sampler = AnimationSampler::linear(0, 1);
    let mut cursor = Interpolator::new();

    let value = cursor.interpolate(&document, &channel, &sampler, 0.25, 1, 2.0);
    assert!(approx(value[0], 10.0), "got {}", value[0]);
}

// ============================================================================
// Interpolator: Step
// ============================================================================

#[test]
fn step_holds_previous_key_value() {
    let document = keyframe_document(&[0.0, 1.0, 2.0], &[1.0, 2.0, 3.0], ElementType::Scalar);
    let channel = channel_for(TargetPath::Weights);
    let sampler = AnimationSampler::step(0, 1);
    let mut cursor = Interpolator::new();

    let value = cursor.interpolate(&document, &channel, &sampler, 1.5, 1, 2.0);
    assert!(approx(value[0], 2.0), "expected 2.0, got {}", value[0]);

    let value = cursor.interpolate(&document, &channel, &sampler, 1.99, 1, 2.0);
    assert!(approx(value[0], 2.0));
}

// ============================================================================
// Interpolator: Cubic Spline
// ============================================================================

#[test]
fn cubic_returns_exact_value_component_at_keyframes() {
    // Per key: [in-tangent, value, out-tangent].
    let document = keyframe_document(
        &[0.0, 1.0],
        &[0.0, 1.0, 2.0, -1.0, 5.0, 0.0],
        ElementType::Scalar,
    );
    let channel = channel_for(TargetPath::Weights);
    let sampler = AnimationSampler::cubic_spline(0, 1);
    let mut cursor = Interpolator::new();

    let v0 = cursor.interpolate(&document, &channel, &sampler, 0.0, 1, 2.0);
    assert!(approx(v0[0], 1.0), "t=0: got {}", v0[0]);
    let v1 = cursor.interpolate(&document, &channel, &sampler, 1.0, 1, 2.0);
    assert!(approx(v1[0], 5.0), "t=1: got {}", v1[0]);
}

#[test]
fn cubic_zero_tangent_midpoint_is_average() {
    let document = keyframe_document(
        &[0.0, 1.0],
        &[0.0, 0.0, 0.0, 0.0, 10.0, 0.0],
        ElementType::Scalar,
    );
    let channel = channel_for(TargetPath::Weights);
    let sampler = AnimationSampler::cubic_spline(0, 1);
    let mut cursor = Interpolator::new();

    let value = cursor.interpolate(&document, &channel, &sampler, 0.5, 1, 1.0);
    assert!(approx(value[0], 5.0), "got {}", value[0]);
}

// ============================================================================
// Interpolator: Single Keyframe & Degenerate Data
// ============================================================================

#[test]
fn single_keyframe_returns_sole_value_for_any_time() {
    let document = keyframe_document(&[0.0], &[42.0, 0.0, 7.0], ElementType::Vec3);
    let channel = channel_for(TargetPath::Translation);
    let sampler = AnimationSampler::linear(0, 1);
    let mut cursor = Interpolator::new();

    // A single key at t=0 makes the animation zero-duration.
    for t in [0.0, 0.5, 5.0, 100.0] {
        let value = cursor.interpolate(&document, &channel, &sampler, t, 3, 0.0);
        assert!(approx(value[0], 42.0), "t={t}");
        assert!(approx(value[1], 0.0));
        assert!(approx(value[2], 7.0));
    }
}

#[test]
fn single_keyframe_cubic_returns_value_component() {
    let document = keyframe_document(&[0.0], &[9.0, 42.0, 9.0], ElementType::Scalar);
    let channel = channel_for(TargetPath::Weights);
    let sampler = AnimationSampler::cubic_spline(0, 1);
    let mut cursor = Interpolator::new();

    let value = cursor.interpolate(&document, &channel, &sampler, 3.0, 1, 0.0);
    assert_eq!(value.len(), 1);
    assert!(approx(value[0], 42.0), "got {}", value[0]);
}

#[test]
fn empty_keyframe_data_produces_empty_result() {
    let document = keyframe_document(&[], &[], ElementType::Scalar);
    let channel = channel_for(TargetPath::Weights);
    let sampler = AnimationSampler::linear(0, 1);
    let mut cursor = Interpolator::new();
    assert!(
        cursor
            .interpolate(&document, &channel, &sampler, 0.5, 1, 1.0)
            .is_empty()
    );
}

#[test]
fn missing_accessor_produces_empty_result() {
    let document = Document::new();
    let channel = channel_for(TargetPath::Weights);
    let sampler = AnimationSampler::linear(5, 6);
    let mut cursor = Interpolator::new();
    assert!(
        cursor
            .interpolate(&document, &channel, &sampler, 0.5, 1, 1.0)
            .is_empty()
    );
}

// ============================================================================
// Interpolator: Rotation Paths
// ============================================================================

#[test]
fn rotation_linear_slerps_halfway_about_y() {
    let document = keyframe_document(
        &[0.0, 1.0],
        &[0.0, 0.0, 0.0, 1.0, 0.0, 0.7071, 0.0, 0.7071],
        ElementType::Vec4,
    );
    let channel = channel_for(TargetPath::Rotation);
    let sampler = AnimationSampler::linear(0, 1);
    let mut cursor = Interpolator::new();

    let value = cursor.interpolate(&document, &channel, &sampler, 0.5, 4, 1.0);
    assert_eq!(value.len(), 4);
    // 45 degrees about Y.
    assert!((value[0]).abs() < 1e-3);
    assert!((value[1] - 0.3827).abs() < 1e-3, "y: got {}", value[1]);
    assert!((value[2]).abs() < 1e-3);
    assert!((value[3] - 0.9239).abs() < 1e-3, "w: got {}", value[3]);
}

#[test]
fn rotation_step_returns_previous_quat() {
    let document = keyframe_document(
        &[0.0, 1.0],
        &[0.0, 0.0, 0.0, 1.0, 0.0, 0.7071, 0.0, 0.7071],
        ElementType::Vec4,
    );
    let channel = channel_for(TargetPath::Rotation);
    let sampler = AnimationSampler::step(0, 1);
    let mut cursor = Interpolator::new();

    let value = cursor.interpolate(&document, &channel, &sampler, 0.5, 4, 1.0);
    let quat = Quat::from_xyzw(value[0], value[1], value[2], value[3]);
    assert!(quat_approx(quat, Quat::IDENTITY));
}

#[test]
fn rotation_cubic_result_is_renormalized() {
    let half_y = Quat::from_rotation_y(FRAC_PI_2);
    let mut output = Vec::new();
    // key 0: zero in-tangent, identity value, a non-trivial out-tangent.
    output.extend_from_slice(&[0.0; 4]);
    output.extend_from_slice(&Quat::IDENTITY.to_array());
    output.extend_from_slice(&[0.0, 1.0, 0.0, 0.0]);
    // key 1: non-trivial in-tangent, 90-degree value, zero out-tangent.
    output.extend_from_slice(&[0.0, 1.0, 0.0, 0.0]);
    output.extend_from_slice(&half_y.to_array());
    output.extend_from_slice(&[0.0; 4]);

    let document = keyframe_document(&[0.0, 1.0], &output, ElementType::Vec4);
    let channel = channel_for(TargetPath::Rotation);
    let sampler = AnimationSampler::cubic_spline(0, 1);
    let mut cursor = Interpolator::new();

    let value = cursor.interpolate(&document, &channel, &sampler, 0.5, 4, 1.0);
    assert_eq!(value.len(), 4);
    let length = (value[0] * value[0] + value[1] * value[1] + value[2] * value[2]
        + value[3] * value[3])
        .sqrt();
    assert!(approx(length, 1.0), "length: got {length}");
}

// ============================================================================
// Interpolator: Looping
// ============================================================================

#[test]
fn loop_wraparound_matches_fresh_playback() {
    let document = keyframe_document(&[0.0, 1.0, 2.0], &[0.0, 10.0, 20.0], ElementType::Scalar);
    let channel = channel_for(TargetPath::Weights);
    let sampler = AnimationSampler::linear(0, 1);

    // Strictly increasing time that wraps past max_time twice.
    let mut playing = Interpolator::new();
    for &t in &[0.0, 0.4, 0.9, 1.3, 1.9, 2.1, 2.6, 3.0, 3.8, 4.2, 5.5] {
        let looped = playing.interpolate(&document, &channel, &sampler, t, 1, 2.0);
        let mut fresh = Interpolator::new();
        let reference = fresh.interpolate(&document, &channel, &sampler, t % 2.0, 1, 2.0);
        assert_eq!(looped.len(), 1);
        assert!(
            approx(looped[0], reference[0]),
            "t={t}: looped {} != fresh {}",
            looped[0],
            reference[0]
        );
    }
}

#[test]
fn reset_key_rewinds_the_cursor() {
    let document = keyframe_document(&[0.0, 1.0, 2.0], &[0.0, 10.0, 20.0], ElementType::Scalar);
    let channel = channel_for(TargetPath::Weights);
    let sampler = AnimationSampler::linear(0, 1);

    let mut cursor = Interpolator::new();
    cursor.interpolate(&document, &channel, &sampler, 1.8, 1, 2.0);
    cursor.reset_key();
    let value = cursor.interpolate(&document, &channel, &sampler, 0.5, 1, 2.0);
    assert!(approx(value[0], 5.0), "got {}", value[0]);
}

// ============================================================================
// SLERP
// ============================================================================

#[test]
fn slerp_is_exact_at_endpoints_and_unit_length() {
    let q1 = Quat::from_rotation_x(0.3);
    let q2 = Quat::from_rotation_y(1.2);
    assert!(quat_approx(slerp_quat(q1, q2, 0.0), q1));
    assert!(quat_approx(slerp_quat(q1, q2, 1.0), q2));

    for i in 0..=10 {
        let t = i as f32 * 0.1;
        let length = slerp_quat(q1, q2, t).length();
        assert!(approx(length, 1.0), "t={t}: length {length}");
    }
}

#[test]
fn slerp_takes_the_shortest_path() {
    let q1 = Quat::from_rotation_y(0.2);
    let q2 = Quat::from_rotation_y(2.0);

    // A negated endpoint is the same rotation; the result must not change.
    let direct = slerp_quat(q1, q2, 0.25);
    let negated = slerp_quat(q1, -q2, 0.25);
    assert!(quat_approx(direct, negated));

    // And the interpolant stays inside the arc between the endpoints.
    assert!(direct.angle_between(q1) < q1.angle_between(q2));
}

#[test]
fn slerp_near_parallel_stays_stable() {
    let q1 = Quat::IDENTITY;
    let q2 = Quat::from_rotation_y(1e-3);
    let mid = slerp_quat(q1, q2, 0.5);
    assert!(approx(mid.length(), 1.0));
    assert!(mid.angle_between(q1) <= 1e-3);
}

#[test]
fn slerp_normalizes_non_unit_inputs() {
    let q1 = Quat::from_xyzw(0.0, 0.0, 0.0, 2.0);
    let q2 = Quat::from_xyzw(0.0, 2.0, 0.0, 0.0);
    let mid = slerp_quat(q1, q2, 0.5);
    assert!(quat_approx(mid, Quat::from_rotation_y(FRAC_PI_2 * 0.5)));
}

// ============================================================================
// Animation: Validation
// ============================================================================

#[test]
fn animation_validate_requires_channels_and_samplers() {
    let document = slide_document();

    let mut animation = Animation::new("empty");
    assert!(!animation.validate(&document));

    animation.add_sampler(AnimationSampler::linear(0, 1));
    assert!(!animation.validate(&document), "still no channels");

    assert!(slide_animation().validate(&document));
}

#[test]
fn animation_validate_rejects_out_of_range_sampler_ref() {
    let document = slide_document();
    let mut animation = Animation::new("bad-ref");
    animation.add_sampler(AnimationSampler::linear(0, 1));
    let mut channel = channel_for(TargetPath::Translation);
    channel.set_sampler(3);
    animation.add_channel(channel);
    assert!(!animation.validate(&document));
}

#[test]
fn animation_channel_removal_keeps_interpolators_in_sync() {
    let document = slide_document();
    let mut animation = slide_animation();
    animation.add_channel(channel_for(TargetPath::Scale));
    assert_eq!(animation.channels().len(), 2);

    assert!(animation.remove_channel(1));
    assert!(!animation.remove_channel(5));
    assert_eq!(animation.channels().len(), 1);
    assert!(animation.validate(&document));
}

// ============================================================================
// Animation: Duration
// ============================================================================

#[test]
fn animation_duration_is_memoized() {
    let document = slide_document();
    let mut animation = slide_animation();

    assert!(approx(animation.calculate_max_time(&document), 1.0));
    assert!(approx(animation.duration(&document), 1.0));
    assert!(approx(animation.duration(&document), 1.0));

    assert!(animation.is_active_at_time(0.0));
    assert!(animation.is_active_at_time(0.5));
    assert!(!animation.is_active_at_time(1.5));
    assert!(!animation.is_active_at_time(-0.1));
}

#[test]
fn animation_duration_scans_integer_time_encodings() {
    let mut document = Document::new();
    document
        .accessors
        .push(Accessor::from_u16(ElementType::Scalar, &[0, 2]).unwrap());
    document
        .accessors
        .push(Accessor::from_u8(ElementType::Scalar, &[0, 3]).unwrap());

    let mut animation = Animation::new("mixed");
    animation.add_sampler(AnimationSampler::step(0, 0));
    animation.add_sampler(AnimationSampler::step(1, 1));
    animation.add_channel(channel_for(TargetPath::Translation));
    let mut second = channel_for(TargetPath::Scale);
    second.set_sampler(1);
    animation.add_channel(second);

    assert!(approx(animation.calculate_max_time(&document), 3.0));
}

#[test]
fn animation_duration_skips_unsupported_encodings() {
    let mut document = Document::new();
    document.accessors.push(
        Accessor::new(
            ElementType::Scalar,
            ComponentType::I16,
            false,
            2,
            Vec::new(),
            Vec::new(),
            vec![0, 0, 16, 39],
        )
        .unwrap(),
    );

    let mut animation = Animation::new("short-times");
    animation.add_sampler(AnimationSampler::step(0, 0));
    animation.add_channel(channel_for(TargetPath::Translation));

    assert!(approx(animation.calculate_max_time(&document), 0.0));
}

// ============================================================================
// Animation: Advance State Machine
// ============================================================================

#[test]
fn advance_applies_interpolated_translation() {
    let mut document = slide_document();
    let mut animation = slide_animation();
    let mut registry = RecordingRegistry::default();

    animation.advance(&mut document, &mut registry, Some(0.0), -1, 0);
    animation.advance(&mut document, &mut registry, Some(0.5), -1, 0);

    let node = document.node(0).unwrap();
    assert!(approx(node.translation.x, 5.0), "got {}", node.translation.x);
    assert!(approx(node.translation.y, 0.0));
    assert!(approx(node.translation.z, 0.0));
    assert!(registry.removed.is_empty());
    assert!(animation.is_playing());
}

#[test]
fn advance_with_absent_time_restores_rest_and_stops() {
    let mut document = slide_document();
    let mut animation = slide_animation();
    let mut registry = RecordingRegistry::default();

    animation.advance(&mut document, &mut registry, Some(0.0), -1, 0);
    animation.advance(&mut document, &mut registry, Some(0.5), -1, 0);
    assert!(approx(document.node(0).unwrap().translation.x, 5.0));

    animation.advance(&mut document, &mut registry, None, -1, 0);

    let node = document.node(0).unwrap();
    assert!(approx(node.translation.x, 1.0));
    assert!(approx(node.translation.y, 2.0));
    assert!(approx(node.translation.z, 3.0));
    assert!(!animation.is_playing());
}

#[test]
fn advance_finite_loop_deregisters_and_snaps_to_final_frame() {
    let mut document = slide_document();
    let mut animation = slide_animation();
    let mut registry = RecordingRegistry::default();

    animation.advance(&mut document, &mut registry, Some(10.0), 1, 7);
    animation.advance(&mut document, &mut registry, Some(11.5), 1, 7);

    assert_eq!(registry.removed, vec![7]);
    assert!(!animation.is_playing());
    let node = document.node(0).unwrap();
    assert!(
        approx(node.translation.x, 10.0),
        "should rest on the last keyframe, got {}",
        node.translation.x
    );
}

#[test]
fn advance_infinite_loop_wraps_time() {
    let mut document = slide_document();
    let mut animation = slide_animation();
    let mut registry = RecordingRegistry::default();

    animation.advance(&mut document, &mut registry, Some(0.0), -1, 0);
    animation.advance(&mut document, &mut registry, Some(2.25), -1, 0);

    assert!(registry.removed.is_empty());
    let node = document.node(0).unwrap();
    assert!(approx(node.translation.x, 2.5), "got {}", node.translation.x);
}

#[test]
fn advance_respects_playback_speed() {
    let mut document = slide_document();
    let mut animation = slide_animation();
    animation.set_playback_speed(2.0);
    let mut registry = RecordingRegistry::default();

    animation.advance(&mut document, &mut registry, Some(0.0), -1, 0);
    animation.advance(&mut document, &mut registry, Some(0.25), -1, 0);

    let node = document.node(0).unwrap();
    assert!(approx(node.translation.x, 5.0), "got {}", node.translation.x);
}

#[test]
fn reset_restores_rest_values() {
    let mut document = slide_document();
    let mut animation = slide_animation();
    let mut registry = RecordingRegistry::default();

    animation.advance(&mut document, &mut registry, Some(0.0), -1, 0);
    animation.advance(&mut document, &mut registry, Some(0.5), -1, 0);
    animation.reset(&mut document);

    let node = document.node(0).unwrap();
    assert!(approx(node.translation.x, 1.0));
    assert!(approx(node.translation.y, 2.0));
    assert!(approx(node.translation.z, 3.0));
}

#[test]
fn advance_weights_channel_writes_node_weights() {
    let mut document = keyframe_document(&[0.0, 1.0], &[0.0, 0.0, 1.0, 1.0], ElementType::Scalar);
    document.meshes.push(Mesh {
        morph_target_count: 2,
        ..Mesh::default()
    });
    let mut node = Node::new();
    node.mesh = Some(0);
    document.nodes.push(node);

    let mut animation = Animation::new("morph");
    animation.add_sampler(AnimationSampler::linear(0, 1));
    animation.add_channel(channel_for(TargetPath::Weights));
    let mut registry = RecordingRegistry::default();

    animation.advance(&mut document, &mut registry, Some(0.0), -1, 0);
    animation.advance(&mut document, &mut registry, Some(0.5), -1, 0);

    let weights = &document.node(0).unwrap().weights;
    assert_eq!(weights.len(), 2);
    assert!(approx(weights[0], 0.5));
    assert!(approx(weights[1], 0.5));
}

#[test]
fn advance_light_pointer_channel_writes_intensity() {
    let mut document = keyframe_document(&[0.0, 1.0], &[1.0, 3.0], ElementType::Scalar);
    document.nodes.push(Node::new());
    document.lights.push(Light::new_point(Vec3::ONE, 1.0, 0.0));

    let mut channel = AnimationChannel::new();
    channel.create_target(0, TargetPath::Pointer);
    channel
        .target_mut()
        .unwrap()
        .set_pointer("/extensions/KHR_lights_punctual/lights/0/intensity");
    channel.set_sampler(0);

    let mut animation = Animation::new("dim");
    animation.add_sampler(AnimationSampler::linear(0, 1));
    animation.add_channel(channel);
    let mut registry = RecordingRegistry::default();

    animation.advance(&mut document, &mut registry, Some(0.0), -1, 0);
    animation.advance(&mut document, &mut registry, Some(0.5), -1, 0);

    assert!(approx(document.light(0).unwrap().intensity, 2.0));
}

#[test]
fn advance_skips_unsupported_pointer_channels() {
    let mut document = keyframe_document(&[0.0, 1.0], &[1.0, 3.0], ElementType::Scalar);
    document
        .nodes
        .push(Node::with_trs(Vec3::X, Quat::IDENTITY, Vec3::ONE));

    let mut channel = AnimationChannel::new();
    channel.create_target(0, TargetPath::Pointer);
    channel
        .target_mut()
        .unwrap()
        .set_pointer("/materials/0/alphaCutoff");
    channel.set_sampler(0);

    let mut animation = Animation::new("unsupported");
    animation.add_sampler(AnimationSampler::linear(0, 1));
    animation.add_channel(channel);
    let mut registry = RecordingRegistry::default();

    animation.advance(&mut document, &mut registry, Some(0.0), -1, 0);
    animation.advance(&mut document, &mut registry, Some(0.5), -1, 0);

    // Channel is skipped; nothing written, nothing deregistered.
    assert!(approx(document.node(0).unwrap().translation.x, 1.0));
    assert!(registry.removed.is_empty());
}

// ============================================================================
// Animation: Introspection & Clone
// ============================================================================

#[test]
fn affected_nodes_dedup_in_first_seen_order() {
    let mut animation = Animation::new("multi");
    animation.add_sampler(AnimationSampler::linear(0, 1));
    for (node, path) in [
        (2, TargetPath::Translation),
        (0, TargetPath::Rotation),
        (2, TargetPath::Scale),
    ] {
        let mut channel = AnimationChannel::new();
        channel.create_target(node, path);
        channel.set_sampler(0);
        animation.add_channel(channel);
    }

    assert_eq!(animation.affected_nodes(), vec![2, 0]);
    assert_eq!(
        animation.animated_properties(),
        vec!["translation", "rotation", "scale"]
    );
}

#[test]
fn clone_resets_playback_state() {
    let mut document = slide_document();
    let mut animation = slide_animation();
    let mut registry = RecordingRegistry::default();

    animation.advance(&mut document, &mut registry, Some(0.0), -1, 0);
    assert!(animation.is_playing());

    let cloned = animation.clone();
    assert!(!cloned.is_playing());
    assert_eq!(cloned.channels().len(), 1);
    assert_eq!(cloned.samplers().len(), 1);
    assert!(cloned.validate(&document));
}

#[test]
fn display_summarizes_the_animation() {
    let text = slide_animation().to_string();
    assert!(text.contains("'slide'"));
    assert!(text.contains("Channels: 1"));
    assert!(text.contains("Samplers: 1"));
}

// ============================================================================
// Animation Pointers
// ============================================================================

#[test]
fn pointer_decodes_light_parameters() {
    let pointer = AnimationPointer::parse(
        "/extensions/KHR_lights_punctual/lights/3/spot/outerConeAngle".to_string(),
    );
    assert_eq!(
        pointer.kind(),
        PointerKind::Light {
            light: 3,
            parameter: LightParameter::OuterConeAngle
        }
    );

    // Some exporters pre-strip the extension prefix.
    let pointer = AnimationPointer::parse("/lights/0/color".to_string());
    assert_eq!(
        pointer.kind(),
        PointerKind::Light {
            light: 0,
            parameter: LightParameter::Color
        }
    );
}

#[test]
fn pointer_unknown_addresses_are_unsupported() {
    let pointer = AnimationPointer::parse("/meshes/0/weights".to_string());
    assert_eq!(pointer.kind(), PointerKind::Unsupported);
    assert_eq!(pointer.raw(), "/meshes/0/weights");

    let pointer = AnimationPointer::parse("/lights/not-a-number/color".to_string());
    assert_eq!(pointer.kind(), PointerKind::Unsupported);
}
