//! Animation samplers: keyframe input/output accessor pairs plus an
//! interpolation mode.

use crate::document::{Document, ElementType};

/// Keyframe interpolation mode, a closed set fixed by the glTF format.
///
/// `Unknown` is the decode sentinel for unrecognized mode strings. A freshly
/// constructed sampler defaults to `Linear`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InterpolationMode {
    #[default]
    Linear,
    Step,
    CubicSpline,
    Unknown,
}

impl InterpolationMode {
    /// Decodes a glTF interpolation string. Unrecognized strings decode to
    /// [`InterpolationMode::Unknown`]; the failure surfaces at validation.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "LINEAR" => Self::Linear,
            "STEP" => Self::Step,
            "CUBICSPLINE" => Self::CubicSpline,
            _ => Self::Unknown,
        }
    }

    /// The glTF string for this mode; empty for `Unknown`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "LINEAR",
            Self::Step => "STEP",
            Self::CubicSpline => "CUBICSPLINE",
            Self::Unknown => "",
        }
    }

    #[inline]
    #[must_use]
    pub fn is_valid(self) -> bool {
        self != Self::Unknown
    }

    /// Every supported mode string, for diagnostics and tooling.
    #[must_use]
    pub fn all_strings() -> [&'static str; 3] {
        ["LINEAR", "STEP", "CUBICSPLINE"]
    }
}

/// Declares where a channel's keyframe data lives: a time (input) accessor,
/// a value (output) accessor, and how to interpolate between keys.
#[derive(Debug, Clone, Default)]
pub struct AnimationSampler {
    input: Option<usize>,
    interpolation: InterpolationMode,
    output: Option<usize>,
}

impl AnimationSampler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A LINEAR sampler over the given accessor pair.
    #[must_use]
    pub fn linear(input: usize, output: usize) -> Self {
        Self {
            input: Some(input),
            interpolation: InterpolationMode::Linear,
            output: Some(output),
        }
    }

    /// A STEP sampler over the given accessor pair.
    #[must_use]
    pub fn step(input: usize, output: usize) -> Self {
        Self {
            input: Some(input),
            interpolation: InterpolationMode::Step,
            output: Some(output),
        }
    }

    /// A CUBICSPLINE sampler over the given accessor pair.
    #[must_use]
    pub fn cubic_spline(input: usize, output: usize) -> Self {
        Self {
            input: Some(input),
            interpolation: InterpolationMode::CubicSpline,
            output: Some(output),
        }
    }

    #[inline]
    #[must_use]
    pub fn input(&self) -> Option<usize> {
        self.input
    }

    #[inline]
    pub fn set_input(&mut self, input: usize) {
        self.input = Some(input);
    }

    #[inline]
    #[must_use]
    pub fn output(&self) -> Option<usize> {
        self.output
    }

    #[inline]
    pub fn set_output(&mut self, output: usize) {
        self.output = Some(output);
    }

    #[inline]
    #[must_use]
    pub fn interpolation(&self) -> InterpolationMode {
        self.interpolation
    }

    #[inline]
    pub fn set_interpolation(&mut self, interpolation: InterpolationMode) {
        self.interpolation = interpolation;
    }

    /// Sets the mode from its string form, falling back to LINEAR with a
    /// warning on unrecognized input. This is the sampler-level safety
    /// default; the raw codec would leave `Unknown`.
    pub fn set_interpolation_from_string(&mut self, mode: &str) {
        self.interpolation = InterpolationMode::parse(mode);
        if self.interpolation == InterpolationMode::Unknown {
            log::warn!("Unknown interpolation mode: {mode}, using LINEAR");
            self.interpolation = InterpolationMode::Linear;
        }
    }

    /// The mode's glTF string.
    #[inline]
    #[must_use]
    pub fn interpolation_string(&self) -> &'static str {
        self.interpolation.as_str()
    }

    /// Clears both accessor references and restores the LINEAR default.
    pub fn reset(&mut self) {
        self.input = None;
        self.interpolation = InterpolationMode::Linear;
        self.output = None;
    }

    /// Structural check: both references present and a valid mode. No
    /// document context, no bounds checking.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.input.is_some() && self.output.is_some() && self.interpolation.is_valid()
    }

    /// Validates the sampler against the document: both accessor references
    /// present and in range, a scalar input (time) accessor, a valid
    /// interpolation mode, and count compatibility between input and output
    /// (3x for CUBICSPLINE's tangent/value/tangent layout, equal otherwise).
    #[must_use]
    pub fn validate(&self, document: &Document) -> bool {
        let Some(input) = self.input else {
            log::error!("Animation sampler missing input accessor");
            return false;
        };
        let Some(output) = self.output else {
            log::error!("Animation sampler missing output accessor");
            return false;
        };

        if document.accessor(input).is_none() {
            log::error!("Invalid input accessor index: {input}");
            return false;
        }
        if document.accessor(output).is_none() {
            log::error!("Invalid output accessor index: {output}");
            return false;
        }

        if !self.interpolation.is_valid() {
            log::error!("Invalid interpolation mode");
            return false;
        }

        if !self.accessors_compatible(document) {
            log::error!("Input and output accessors are not compatible");
            return false;
        }

        true
    }

    /// Declared [min, max] of the input accessor's first component. `None`
    /// when the accessor is missing, out of range, or unbounded.
    #[must_use]
    pub fn time_range(&self, document: &Document) -> Option<(f32, f32)> {
        document.accessor(self.input?)?.declared_range()
    }

    /// Element count of the input accessor, or 0 when unresolvable.
    #[must_use]
    pub fn key_frame_count(&self, document: &Document) -> usize {
        self.input
            .and_then(|input| document.accessor(input))
            .map_or(0, crate::document::Accessor::count)
    }

    fn accessors_compatible(&self, document: &Document) -> bool {
        let (Some(input), Some(output)) = (self.input, self.output) else {
            return false;
        };
        let (Some(input_accessor), Some(output_accessor)) =
            (document.accessor(input), document.accessor(output))
        else {
            return false;
        };

        // Input carries time values, one scalar per key.
        if input_accessor.element_type() != ElementType::Scalar {
            log::error!("Input accessor must be SCALAR type");
            return false;
        }

        if self.interpolation == InterpolationMode::CubicSpline {
            // In-tangent, value and out-tangent per key.
            if output_accessor.count() != input_accessor.count() * 3 {
                log::error!("For CUBICSPLINE interpolation, output count must be 3x input count");
                return false;
            }
        } else if output_accessor.count() != input_accessor.count() {
            log::error!("For LINEAR/STEP interpolation, input and output counts must match");
            return false;
        }

        true
    }
}
