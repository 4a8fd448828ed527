//! Typed views over raw keyframe buffers.
//!
//! An [`Accessor`] owns a flat, already de-interleaved little-endian byte
//! payload plus the metadata needed to interpret it: component type, element
//! type, element count, a `normalized` flag and the declared min/max range.
//! The animation engine only ever consumes the [`Accessor::float_view`]
//! produced here; it never touches buffer-view or binary-chunk layout, which
//! stays with the loader that produced the document.

use std::cell::OnceCell;

use crate::errors::{GlintError, Result};

/// Component storage type, mirroring the glTF/GL component-type enums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    I8,
    U8,
    I16,
    U16,
    U32,
    F32,
}

impl ComponentType {
    /// Decodes a GL component-type code (5120..5126). Unrecognized codes
    /// return `None` so callers can skip the data with a warning instead of
    /// failing outright.
    #[must_use]
    pub fn from_gl(code: u32) -> Option<Self> {
        match code {
            5120 => Some(Self::I8),
            5121 => Some(Self::U8),
            5122 => Some(Self::I16),
            5123 => Some(Self::U16),
            5125 => Some(Self::U32),
            5126 => Some(Self::F32),
            _ => None,
        }
    }

    /// The GL code for this component type.
    #[must_use]
    pub fn gl_code(self) -> u32 {
        match self {
            Self::I8 => 5120,
            Self::U8 => 5121,
            Self::I16 => 5122,
            Self::U16 => 5123,
            Self::U32 => 5125,
            Self::F32 => 5126,
        }
    }

    /// Size of one component in bytes.
    #[must_use]
    pub fn byte_size(self) -> usize {
        match self {
            Self::I8 | Self::U8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::U32 | Self::F32 => 4,
        }
    }
}

/// Element shape, mirroring the glTF accessor `type` strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Scalar,
    Vec2,
    Vec3,
    Vec4,
    Mat4,
}

impl ElementType {
    /// Decodes a glTF accessor type string ("SCALAR", "VEC3", ...).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "SCALAR" => Some(Self::Scalar),
            "VEC2" => Some(Self::Vec2),
            "VEC3" => Some(Self::Vec3),
            "VEC4" => Some(Self::Vec4),
            "MAT4" => Some(Self::Mat4),
            _ => None,
        }
    }

    /// The glTF type string for this element shape.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scalar => "SCALAR",
            Self::Vec2 => "VEC2",
            Self::Vec3 => "VEC3",
            Self::Vec4 => "VEC4",
            Self::Mat4 => "MAT4",
        }
    }

    /// Components per element.
    #[must_use]
    pub fn component_count(self) -> usize {
        match self {
            Self::Scalar => 1,
            Self::Vec2 => 2,
            Self::Vec3 => 3,
            Self::Vec4 => 4,
            Self::Mat4 => 16,
        }
    }
}

/// A typed view over a raw, de-interleaved data buffer.
///
/// `min`/`max` carry the declared per-component range from the source
/// document; they may be empty when the source omitted them.
#[derive(Debug, Clone)]
pub struct Accessor {
    component_type: ComponentType,
    element_type: ElementType,
    normalized: bool,
    count: usize,
    min: Vec<f32>,
    max: Vec<f32>,
    bytes: Vec<u8>,
    // Lazily converted float view. The engine is single-threaded (one owning
    // thread per document), so plain interior mutability is enough.
    float_view: OnceCell<Vec<f32>>,
}

impl Accessor {
    /// Creates an accessor over a raw little-endian payload, validating that
    /// the payload length matches the declared shape.
    pub fn new(
        element_type: ElementType,
        component_type: ComponentType,
        normalized: bool,
        count: usize,
        min: Vec<f32>,
        max: Vec<f32>,
        bytes: Vec<u8>,
    ) -> Result<Self> {
        let expected = count * element_type.component_count() * component_type.byte_size();
        if bytes.len() != expected {
            return Err(GlintError::AccessorPayloadMismatch {
                expected,
                count,
                actual: bytes.len(),
            });
        }
        Ok(Self {
            component_type,
            element_type,
            normalized,
            count,
            min,
            max,
            bytes,
            float_view: OnceCell::new(),
        })
    }

    /// Builds a float accessor directly from component values, deriving the
    /// count and the declared min/max range.
    pub fn from_f32(element_type: ElementType, components: &[f32]) -> Result<Self> {
        let bytes = components.iter().flat_map(|v| v.to_le_bytes()).collect();
        let (count, min, max) = derive_shape(element_type, components)?;
        Self::new(element_type, ComponentType::F32, false, count, min, max, bytes)
    }

    /// Builds an unsigned-short accessor from component values.
    pub fn from_u16(element_type: ElementType, components: &[u16]) -> Result<Self> {
        let bytes = components.iter().flat_map(|v| v.to_le_bytes()).collect();
        let floats: Vec<f32> = components.iter().map(|&v| f32::from(v)).collect();
        let (count, min, max) = derive_shape(element_type, &floats)?;
        Self::new(element_type, ComponentType::U16, false, count, min, max, bytes)
    }

    /// Builds an unsigned-byte accessor from component values.
    pub fn from_u8(element_type: ElementType, components: &[u8]) -> Result<Self> {
        let floats: Vec<f32> = components.iter().map(|&v| f32::from(v)).collect();
        let (count, min, max) = derive_shape(element_type, &floats)?;
        Self::new(
            element_type,
            ComponentType::U8,
            false,
            count,
            min,
            max,
            components.to_vec(),
        )
    }

    #[inline]
    #[must_use]
    pub fn component_type(&self) -> ComponentType {
        self.component_type
    }

    #[inline]
    #[must_use]
    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    #[inline]
    #[must_use]
    pub fn is_normalized(&self) -> bool {
        self.normalized
    }

    /// Declared element count.
    #[inline]
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Components per element.
    #[inline]
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.element_type.component_count()
    }

    /// Declared per-component minimum values (may be empty).
    #[inline]
    #[must_use]
    pub fn min(&self) -> &[f32] {
        &self.min
    }

    /// Declared per-component maximum values (may be empty).
    #[inline]
    #[must_use]
    pub fn max(&self) -> &[f32] {
        &self.max
    }

    /// Declared range of the first component, if the source declared one.
    #[must_use]
    pub fn declared_range(&self) -> Option<(f32, f32)> {
        match (self.min.first(), self.max.first()) {
            (Some(&lo), Some(&hi)) => Some((lo, hi)),
            _ => None,
        }
    }

    /// Raw little-endian payload.
    #[inline]
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The flat float view of the payload.
    ///
    /// Integer components are widened to `f32`; when the accessor is flagged
    /// `normalized` they are dequantized per the glTF rules instead
    /// (unsigned x/maxval, signed clamped at -1). The conversion runs once
    /// and is cached for the accessor's lifetime.
    #[must_use]
    pub fn float_view(&self) -> &[f32] {
        self.float_view.get_or_init(|| self.build_float_view())
    }

    fn build_float_view(&self) -> Vec<f32> {
        let bytes = &self.bytes;
        match self.component_type {
            ComponentType::F32 => bytes
                .chunks_exact(4)
                .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
            ComponentType::U8 => bytes
                .iter()
                .map(|&v| {
                    if self.normalized {
                        f32::from(v) / 255.0
                    } else {
                        f32::from(v)
                    }
                })
                .collect(),
            ComponentType::I8 => bytes
                .iter()
                .map(|&v| {
                    let v = v as i8;
                    if self.normalized {
                        (f32::from(v) / 127.0).max(-1.0)
                    } else {
                        f32::from(v)
                    }
                })
                .collect(),
            ComponentType::U16 => bytes
                .chunks_exact(2)
                .map(|c| {
                    let v = u16::from_le_bytes([c[0], c[1]]);
                    if self.normalized {
                        f32::from(v) / 65535.0
                    } else {
                        f32::from(v)
                    }
                })
                .collect(),
            ComponentType::I16 => bytes
                .chunks_exact(2)
                .map(|c| {
                    let v = i16::from_le_bytes([c[0], c[1]]);
                    if self.normalized {
                        (f32::from(v) / 32767.0).max(-1.0)
                    } else {
                        f32::from(v)
                    }
                })
                .collect(),
            ComponentType::U32 => bytes
                .chunks_exact(4)
                .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]) as f32)
                .collect(),
        }
    }
}

/// Derives (count, min, max) for a component slice of the given element
/// shape. min/max are componentwise over elements, matching the declared
/// ranges a glTF exporter would write.
fn derive_shape(
    element_type: ElementType,
    components: &[f32],
) -> Result<(usize, Vec<f32>, Vec<f32>)> {
    let width = element_type.component_count();
    if components.len() % width != 0 {
        return Err(GlintError::AccessorComponentMismatch {
            components: components.len(),
            element_size: width,
        });
    }
    let count = components.len() / width;
    if count == 0 {
        return Ok((0, Vec::new(), Vec::new()));
    }
    let mut min = vec![f32::INFINITY; width];
    let mut max = vec![f32::NEG_INFINITY; width];
    for element in components.chunks_exact(width) {
        for (i, &v) in element.iter().enumerate() {
            min[i] = min[i].min(v);
            max[i] = max[i].max(v);
        }
    }
    Ok((count, min, max))
}
