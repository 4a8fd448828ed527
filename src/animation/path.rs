//! Animation target path vocabulary and its string codec.

/// The property a channel animates on its target node.
///
/// `Unknown` is the decode sentinel for unrecognized path strings; it is
/// never a valid animatable path and is rejected at validation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TargetPath {
    Translation,
    Rotation,
    Scale,
    Weights,
    Pointer,
    #[default]
    Unknown,
}

impl TargetPath {
    /// Decodes a glTF target path string. Unrecognized strings decode to
    /// [`TargetPath::Unknown`] rather than failing, so callers can defer the
    /// error to validation.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "translation" => Self::Translation,
            "rotation" => Self::Rotation,
            "scale" => Self::Scale,
            "weights" => Self::Weights,
            "pointer" => Self::Pointer,
            _ => Self::Unknown,
        }
    }

    /// The glTF string for this path; empty for `Unknown`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Translation => "translation",
            Self::Rotation => "rotation",
            Self::Scale => "scale",
            Self::Weights => "weights",
            Self::Pointer => "pointer",
            Self::Unknown => "",
        }
    }

    #[inline]
    #[must_use]
    pub fn is_valid(self) -> bool {
        self != Self::Unknown
    }

    /// Every supported path string, for diagnostics and tooling.
    #[must_use]
    pub fn all_strings() -> [&'static str; 5] {
        ["translation", "rotation", "scale", "weights", "pointer"]
    }

    /// Component count for paths whose width is fixed by the format; weights
    /// and pointer widths depend on the document.
    #[must_use]
    pub fn fixed_stride(self) -> Option<usize> {
        match self {
            Self::Translation | Self::Scale => Some(3),
            Self::Rotation => Some(4),
            _ => None,
        }
    }
}
