//! Punctual lights (KHR_lights_punctual subset).
//!
//! Lights exist in the document so pointer-path animation channels have a
//! property table to write into; shading is not this crate's concern.

use glam::Vec3;

/// Light flavor plus the flavor-specific parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    Directional,
    Point,
    Spot {
        inner_cone_angle: f32,
        outer_cone_angle: f32,
    },
}

/// An animatable light parameter, addressed by pointer-path channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightParameter {
    Color,
    Intensity,
    Range,
    InnerConeAngle,
    OuterConeAngle,
}

impl LightParameter {
    /// Decodes the property suffix of a light pointer, e.g. `color` or
    /// `spot/outerConeAngle`.
    #[must_use]
    pub fn parse_suffix(s: &str) -> Option<Self> {
        match s {
            "color" => Some(Self::Color),
            "intensity" => Some(Self::Intensity),
            "range" => Some(Self::Range),
            "spot/innerConeAngle" => Some(Self::InnerConeAngle),
            "spot/outerConeAngle" => Some(Self::OuterConeAngle),
            _ => None,
        }
    }

    /// Number of float components carried by the parameter.
    #[must_use]
    pub fn component_count(self) -> usize {
        match self {
            Self::Color => 3,
            _ => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct LightRest {
    color: Vec3,
    intensity: f32,
    range: f32,
    inner_cone_angle: f32,
    outer_cone_angle: f32,
}

/// A punctual light with a captured rest state.
#[derive(Debug, Clone)]
pub struct Light {
    pub name: Option<String>,
    pub color: Vec3,
    pub intensity: f32,
    /// Attenuation range; 0 means unbounded, matching the glTF default.
    pub range: f32,
    pub kind: LightKind,

    rest: LightRest,
}

impl Light {
    #[must_use]
    pub fn new(kind: LightKind, color: Vec3, intensity: f32) -> Self {
        let mut light = Self {
            name: None,
            color,
            intensity,
            range: 0.0,
            kind,
            rest: LightRest::default(),
        };
        light.capture_rest();
        light
    }

    #[must_use]
    pub fn new_directional(color: Vec3, intensity: f32) -> Self {
        Self::new(LightKind::Directional, color, intensity)
    }

    #[must_use]
    pub fn new_point(color: Vec3, intensity: f32, range: f32) -> Self {
        let mut light = Self::new(LightKind::Point, color, intensity);
        light.range = range;
        light.capture_rest();
        light
    }

    #[must_use]
    pub fn new_spot(
        color: Vec3,
        intensity: f32,
        range: f32,
        inner_cone_angle: f32,
        outer_cone_angle: f32,
    ) -> Self {
        let mut light = Self::new(
            LightKind::Spot {
                inner_cone_angle,
                outer_cone_angle,
            },
            color,
            intensity,
        );
        light.range = range;
        light.capture_rest();
        light
    }

    /// Snapshots the current parameters as the rest state.
    pub fn capture_rest(&mut self) {
        let (inner, outer) = self.cone_angles();
        self.rest = LightRest {
            color: self.color,
            intensity: self.intensity,
            range: self.range,
            inner_cone_angle: inner,
            outer_cone_angle: outer,
        };
    }

    fn cone_angles(&self) -> (f32, f32) {
        match self.kind {
            LightKind::Spot {
                inner_cone_angle,
                outer_cone_angle,
            } => (inner_cone_angle, outer_cone_angle),
            _ => (0.0, 0.0),
        }
    }

    /// Reads a parameter's current value into its component representation.
    #[must_use]
    pub fn parameter(&self, parameter: LightParameter) -> [f32; 3] {
        let (inner, outer) = self.cone_angles();
        match parameter {
            LightParameter::Color => self.color.to_array(),
            LightParameter::Intensity => [self.intensity, 0.0, 0.0],
            LightParameter::Range => [self.range, 0.0, 0.0],
            LightParameter::InnerConeAngle => [inner, 0.0, 0.0],
            LightParameter::OuterConeAngle => [outer, 0.0, 0.0],
        }
    }

    /// Writes an interpolated component vector into a parameter. Short
    /// vectors and cone writes on non-spot lights are ignored with a
    /// warning.
    pub fn set_parameter(&mut self, parameter: LightParameter, value: &[f32]) {
        if value.len() < parameter.component_count() {
            log::warn!(
                "Light parameter {parameter:?} expects {} components, got {}",
                parameter.component_count(),
                value.len()
            );
            return;
        }
        match parameter {
            LightParameter::Color => {
                self.color = Vec3::new(value[0], value[1], value[2]);
            }
            LightParameter::Intensity => self.intensity = value[0],
            LightParameter::Range => self.range = value[0],
            LightParameter::InnerConeAngle => {
                if let LightKind::Spot {
                    inner_cone_angle, ..
                } = &mut self.kind
                {
                    *inner_cone_angle = value[0];
                } else {
                    log::warn!("Spot cone write on a non-spot light");
                }
            }
            LightParameter::OuterConeAngle => {
                if let LightKind::Spot {
                    outer_cone_angle, ..
                } = &mut self.kind
                {
                    *outer_cone_angle = value[0];
                } else {
                    log::warn!("Spot cone write on a non-spot light");
                }
            }
        }
    }

    /// Restores a parameter to its captured rest value.
    pub fn reset_parameter(&mut self, parameter: LightParameter) {
        match parameter {
            LightParameter::Color => self.color = self.rest.color,
            LightParameter::Intensity => self.intensity = self.rest.intensity,
            LightParameter::Range => self.range = self.rest.range,
            LightParameter::InnerConeAngle => {
                if let LightKind::Spot {
                    inner_cone_angle, ..
                } = &mut self.kind
                {
                    *inner_cone_angle = self.rest.inner_cone_angle;
                }
            }
            LightParameter::OuterConeAngle => {
                if let LightKind::Spot {
                    outer_cone_angle, ..
                } = &mut self.kind
                {
                    *outer_cone_angle = self.rest.outer_cone_angle;
                }
            }
        }
    }
}
