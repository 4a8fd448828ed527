//! The animation orchestrator.
//!
//! An [`Animation`] owns the channel and sampler arenas for one named
//! animation plus a parallel-indexed interpolator per channel, and drives
//! the per-frame advance protocol: wrap time, interpolate every channel,
//! commit the results onto the document, and report (via the caller's
//! registry) when playback naturally concludes.

use std::fmt;

use rustc_hash::FxHashSet;

use crate::animation::channel::AnimationChannel;
use crate::animation::interpolator::{ComponentVec, Interpolator};
use crate::animation::resolve::{self, PropertyBinding, ResolvedTarget};
use crate::animation::sampler::{AnimationSampler, InterpolationMode};
use crate::document::{Accessor, ComponentType, Document};

/// The caller's animation-index registry. When a finite playback budget is
/// exhausted the animation deregisters its own slot through this interface.
pub trait AnimationRegistry {
    fn remove_animation_index(&mut self, index: usize);
}

/// A named animation: channels, samplers, per-channel interpolators, and
/// the playback state machine.
///
/// The three lists are index-correlated (`channels[i]` pairs with
/// `interpolators[i]` and references a sampler by index); the pairing is
/// enforced by [`validate`](Animation::validate), not by construction, so an
/// animation assembled channel-by-channel must be validated before use.
#[derive(Debug)]
pub struct Animation {
    name: String,
    channels: Vec<AnimationChannel>,
    samplers: Vec<AnimationSampler>,
    interpolators: Vec<Interpolator>,

    /// Memoized duration; `None` until first computed. An explicit flag
    /// rather than a zero sentinel, so zero-duration animations stay
    /// representable.
    max_time: Option<f32>,

    // === Playback state ===
    start_time: Option<f32>,
    /// -1 = loop forever, 0 = play once, N = N passes.
    loop_count: i32,
    current_loop: i32,
    playback_speed: f32,
}

impl Animation {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            channels: Vec::new(),
            samplers: Vec::new(),
            interpolators: Vec::new(),
            max_time: None,
            start_time: None,
            loop_count: -1,
            current_loop: 0,
            playback_speed: 1.0,
        }
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    #[inline]
    #[must_use]
    pub fn playback_speed(&self) -> f32 {
        self.playback_speed
    }

    pub fn set_playback_speed(&mut self, speed: f32) {
        self.playback_speed = speed;
    }

    /// Whether the animation is between its first `advance` with a time and
    /// its stop.
    #[inline]
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.start_time.is_some()
    }

    /// Completed loop passes of the current playback (finite budgets only).
    #[inline]
    #[must_use]
    pub fn current_loop(&self) -> i32 {
        self.current_loop
    }

    // ========================================================================
    // Assembly
    // ========================================================================

    /// Appends a channel, keeping the interpolator list in sync.
    pub fn add_channel(&mut self, channel: AnimationChannel) {
        self.channels.push(channel);
        self.interpolators.push(Interpolator::new());
    }

    /// Removes a channel (and its interpolator) by index. Returns false when
    /// out of range.
    pub fn remove_channel(&mut self, index: usize) -> bool {
        if index >= self.channels.len() {
            return false;
        }
        self.channels.remove(index);
        if index < self.interpolators.len() {
            self.interpolators.remove(index);
        }
        true
    }

    #[must_use]
    pub fn channel(&self, index: usize) -> Option<&AnimationChannel> {
        self.channels.get(index)
    }

    #[must_use]
    pub fn channels(&self) -> &[AnimationChannel] {
        &self.channels
    }

    pub fn add_sampler(&mut self, sampler: AnimationSampler) {
        self.samplers.push(sampler);
    }

    /// Removes a sampler by index. Channel sampler references are not
    /// rewritten; revalidate after structural edits.
    pub fn remove_sampler(&mut self, index: usize) -> bool {
        if index >= self.samplers.len() {
            return false;
        }
        self.samplers.remove(index);
        true
    }

    #[must_use]
    pub fn sampler(&self, index: usize) -> Option<&AnimationSampler> {
        self.samplers.get(index)
    }

    #[must_use]
    pub fn samplers(&self) -> &[AnimationSampler] {
        &self.samplers
    }

    /// Rebuilds the interpolator list, one fresh cursor per channel. Must be
    /// called after channels are added outside [`add_channel`] (e.g. bulk
    /// assembly) and before playback.
    pub fn init_interpolators(&mut self) {
        self.interpolators = vec![Interpolator::new(); self.channels.len()];
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Validates the whole aggregate against a document. Failures are logged
    /// and reported by the return value; nothing panics.
    #[must_use]
    pub fn validate(&self, document: &Document) -> bool {
        if self.channels.is_empty() {
            log::error!("Animation has no channels");
            return false;
        }
        if self.samplers.is_empty() {
            log::error!("Animation has no samplers");
            return false;
        }

        for (i, channel) in self.channels.iter().enumerate() {
            if !channel.validate(document) {
                log::error!("Animation channel {i} validation failed");
                return false;
            }
            let Some(sampler_index) = channel.sampler() else {
                log::error!("Animation channel {i} has no sampler");
                return false;
            };
            if sampler_index >= self.samplers.len() {
                log::error!("Animation channel {i} has invalid sampler index: {sampler_index}");
                return false;
            }
        }

        for (i, sampler) in self.samplers.iter().enumerate() {
            if !sampler.validate(document) {
                log::error!("Animation sampler {i} validation failed");
                return false;
            }
        }

        if self.interpolators.len() != self.channels.len() {
            log::error!(
                "Interpolator count ({}) does not match channel count ({})",
                self.interpolators.len(),
                self.channels.len()
            );
            return false;
        }

        true
    }

    // ========================================================================
    // Duration
    // ========================================================================

    /// Scans every channel's input accessor for its last (highest) time
    /// value. Float, unsigned-short and unsigned-byte time encodings are
    /// supported; anything else is skipped with a warning and contributes
    /// nothing.
    #[must_use]
    pub fn calculate_max_time(&self, document: &Document) -> f32 {
        let mut max_time = 0.0_f32;

        for channel in &self.channels {
            let Some(sampler_index) = channel.sampler() else {
                continue;
            };
            let Some(sampler) = self.samplers.get(sampler_index) else {
                continue;
            };
            let Some(input_accessor) = sampler.input().and_then(|i| document.accessor(i)) else {
                continue;
            };
            if let Some(last) = last_time_value(input_accessor) {
                max_time = max_time.max(last);
            }
        }

        max_time
    }

    /// The animation's duration, computed once and memoized.
    pub fn duration(&mut self, document: &Document) -> f32 {
        if self.max_time.is_none() {
            self.max_time = Some(self.calculate_max_time(document));
        }
        self.max_time.unwrap_or(0.0)
    }

    /// Whether `time` falls inside the (already computed) playback window.
    #[must_use]
    pub fn is_active_at_time(&self, time: f32) -> bool {
        time >= 0.0 && time <= self.max_time.unwrap_or(0.0)
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Node indices touched by this animation, deduplicated, in first-seen
    /// order.
    #[must_use]
    pub fn affected_nodes(&self) -> Vec<usize> {
        let mut seen = FxHashSet::default();
        let mut nodes = Vec::new();
        for channel in &self.channels {
            if let Some(node) = channel.target_node() {
                if seen.insert(node) {
                    nodes.push(node);
                }
            }
        }
        nodes
    }

    /// Path strings of every channel with a target, in channel order.
    #[must_use]
    pub fn animated_properties(&self) -> Vec<String> {
        self.channels
            .iter()
            .filter(|channel| channel.target().is_some())
            .map(|channel| channel.target_path_string().to_string())
            .collect()
    }

    // ========================================================================
    // Playback
    // ========================================================================

    /// Advances playback to `time` (seconds, on the caller's clock) and
    /// commits the interpolated values onto the document.
    ///
    /// An absent `time` stops the animation and restores every animated
    /// property to its rest value. The first timed call captures the start
    /// time and computes the duration; subsequent calls are expected to pass
    /// a non-decreasing time. When a finite `loop_count` (-1 = infinite,
    /// 0 = single pass, N = N passes) is exhausted, the animation snaps to
    /// its final frame, deregisters `registry_index` from `registry`, and
    /// returns without processing further channels.
    pub fn advance(
        &mut self,
        document: &mut Document,
        registry: &mut dyn AnimationRegistry,
        time: Option<f32>,
        loop_count: i32,
        registry_index: usize,
    ) {
        if self.channels.is_empty() {
            return;
        }

        let Some(time) = time else {
            self.reset(document);
            self.start_time = None;
            self.current_loop = 0;
            return;
        };

        if self.max_time.is_none() {
            self.max_time = Some(self.calculate_max_time(document));
        }
        self.loop_count = loop_count;
        let start = *self.start_time.get_or_insert(time);
        let elapsed = (time - start) * self.playback_speed;

        for index in 0..self.channels.len().min(self.interpolators.len()) {
            if !self.process_channel(document, index, elapsed) {
                registry.remove_animation_index(registry_index);
                return;
            }
        }
    }

    /// Convenience wrapper for callers that drive playback off a
    /// [`Timer`](crate::utils::Timer) instead of supplying their own clock.
    pub fn advance_with_timer(
        &mut self,
        document: &mut Document,
        registry: &mut dyn AnimationRegistry,
        timer: &crate::utils::Timer,
        loop_count: i32,
        registry_index: usize,
    ) {
        self.advance(
            document,
            registry,
            Some(timer.elapsed_seconds()),
            loop_count,
            registry_index,
        );
    }

    /// Restores every resolvable channel's property to its rest value.
    /// Leaves the memoized duration and the interpolator cursors untouched.
    pub fn reset(&self, document: &mut Document) {
        for channel in &self.channels {
            let Some(resolved) = resolve::resolve(document, channel) else {
                continue;
            };
            Self::reset_property(document, &resolved);
        }
    }

    // Returns false when playback should end; the caller deregisters and
    // aborts the advance.
    fn process_channel(&mut self, document: &mut Document, index: usize, elapsed: f32) -> bool {
        let Some(sampler_index) = self.channels[index].sampler() else {
            return true;
        };
        if sampler_index >= self.samplers.len() {
            return true;
        }
        let Some(resolved) = resolve::resolve(document, &self.channels[index]) else {
            return true;
        };

        if self.should_stop(elapsed) {
            self.start_time = None;
            self.handle_complete(document, &resolved);
            return false;
        }

        let stride = resolved.stride();
        let max_time = self.max_time.unwrap_or(0.0);
        let value = {
            let channel = &self.channels[index];
            let sampler = &self.samplers[sampler_index];
            self.interpolators[index].interpolate(
                document, channel, sampler, elapsed, stride, max_time,
            )
        };

        if value.is_empty() {
            // Degenerate data: no-op for this channel this frame.
            return true;
        }
        Self::apply_to_target(document, &resolved, &value);
        true
    }

    fn should_stop(&mut self, elapsed: f32) -> bool {
        let Some(max_time) = self.max_time else {
            return false;
        };
        if max_time <= 0.0 || self.loop_count < 0 {
            return false;
        }

        let budget = self.loop_count.max(1);
        let completed = (elapsed / max_time) as i32;
        if completed >= budget {
            return true;
        }
        self.current_loop = completed;
        false
    }

    fn handle_complete(&mut self, document: &mut Document, target: &ResolvedTarget) {
        log::info!("Animation complete: {}", self.name);
        if self.loop_count != -1 {
            self.set_to_final_frame(document, target);
        }
    }

    // Leaves the finishing property on its last keyframe instead of
    // mid-interpolation.
    fn set_to_final_frame(&mut self, document: &mut Document, target: &ResolvedTarget) {
        for index in 0..self.channels.len() {
            let Some(sampler_index) = self.channels[index].sampler() else {
                continue;
            };
            let Some(sampler) = self.samplers.get(sampler_index) else {
                continue;
            };
            let Some(resolved) = resolve::resolve(document, &self.channels[index]) else {
                continue;
            };
            if resolved != *target {
                continue;
            }

            let value = final_frame_value(document, sampler, resolved.stride());
            if !value.is_empty() {
                Self::apply_to_target(document, &resolved, &value);
            }
            break;
        }
    }

    fn apply_to_target(document: &mut Document, target: &ResolvedTarget, value: &[f32]) {
        match target.binding {
            PropertyBinding::Translation => {
                if value.len() >= 3 {
                    if let Some(node) = document.node_mut(target.node) {
                        node.translation = glam::Vec3::new(value[0], value[1], value[2]);
                    }
                }
            }
            PropertyBinding::Rotation => {
                if value.len() >= 4 {
                    if let Some(node) = document.node_mut(target.node) {
                        node.rotation = glam::Quat::from_xyzw(value[0], value[1], value[2], value[3]);
                    }
                }
            }
            PropertyBinding::Scale => {
                if value.len() >= 3 {
                    if let Some(node) = document.node_mut(target.node) {
                        node.scale = glam::Vec3::new(value[0], value[1], value[2]);
                    }
                }
            }
            PropertyBinding::MorphWeights { count } => {
                if let Some(node) = document.node_mut(target.node) {
                    let count = count.min(value.len());
                    node.weights.clear();
                    node.weights.extend_from_slice(&value[..count]);
                }
            }
            PropertyBinding::Light { light, parameter } => {
                if let Some(light) = document.light_mut(light) {
                    light.set_parameter(parameter, value);
                }
            }
        }
    }

    fn reset_property(document: &mut Document, target: &ResolvedTarget) {
        match target.binding {
            PropertyBinding::Translation => {
                if let Some(node) = document.node_mut(target.node) {
                    node.reset_translation();
                }
            }
            PropertyBinding::Rotation => {
                if let Some(node) = document.node_mut(target.node) {
                    node.reset_rotation();
                }
            }
            PropertyBinding::Scale => {
                if let Some(node) = document.node_mut(target.node) {
                    node.reset_scale();
                }
            }
            PropertyBinding::MorphWeights { .. } => {
                if let Some(node) = document.node_mut(target.node) {
                    node.reset_weights();
                }
            }
            PropertyBinding::Light { light, parameter } => {
                if let Some(light) = document.light_mut(light) {
                    light.reset_parameter(parameter);
                }
            }
        }
    }
}

// Clones the definition, not the playback: interpolator cursors are rebuilt
// and transient state (start time, loop progress) starts fresh.
impl Clone for Animation {
    fn clone(&self) -> Self {
        let mut cloned = Self {
            name: self.name.clone(),
            channels: self.channels.clone(),
            samplers: self.samplers.clone(),
            interpolators: Vec::new(),
            max_time: self.max_time,
            start_time: None,
            loop_count: self.loop_count,
            current_loop: 0,
            playback_speed: self.playback_speed,
        };
        cloned.init_interpolators();
        cloned
    }
}

impl fmt::Display for Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Animation")?;
        if !self.name.is_empty() {
            write!(f, " '{}'", self.name)?;
        }
        writeln!(f, ":")?;
        writeln!(f, "  Channels: {}", self.channels.len())?;
        writeln!(f, "  Samplers: {}", self.samplers.len())?;
        write!(f, "  Duration: {} seconds", self.max_time.unwrap_or(0.0))
    }
}

/// Last time value of a scalar time accessor, widened per its encoding.
fn last_time_value(accessor: &Accessor) -> Option<f32> {
    if accessor.count() == 0 {
        return None;
    }
    let bytes = accessor.bytes();
    match accessor.component_type() {
        ComponentType::F32 => {
            let start = bytes.len().checked_sub(4)?;
            Some(f32::from_le_bytes([
                bytes[start],
                bytes[start + 1],
                bytes[start + 2],
                bytes[start + 3],
            ]))
        }
        ComponentType::U16 => {
            let start = bytes.len().checked_sub(2)?;
            Some(f32::from(u16::from_le_bytes([bytes[start], bytes[start + 1]])))
        }
        ComponentType::U8 => bytes.last().map(|&b| f32::from(b)),
        other => {
            log::warn!(
                "Unsupported component type for time data: {}",
                other.gl_code()
            );
            None
        }
    }
}

/// The value component of a sampler's last keyframe.
fn final_frame_value(
    document: &Document,
    sampler: &AnimationSampler,
    stride: usize,
) -> ComponentVec {
    if stride == 0 {
        return ComponentVec::new();
    }
    let Some(output) = sampler.output().and_then(|i| document.accessor(i)) else {
        return ComponentVec::new();
    };
    let values = output.float_view();

    let (element_stride, value_offset) = match sampler.interpolation() {
        InterpolationMode::CubicSpline => (3 * stride, stride),
        _ => (stride, 0),
    };
    let count = values.len() / element_stride;
    if count == 0 {
        return ComponentVec::new();
    }
    let start = (count - 1) * element_stride + value_offset;
    values
        .get(start..start + stride)
        .map_or_else(ComponentVec::new, ComponentVec::from_slice)
}
