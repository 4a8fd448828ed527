//! Error Types
//!
//! This module defines the error types used throughout the engine.
//!
//! # Overview
//!
//! The main error type [`GlintError`] covers the structural failures that can
//! occur while a document is being assembled:
//! - Accessor payloads that disagree with their declared shape
//! - Out-of-range indices supplied at construction time
//!
//! Playback-path failures never surface here: validation reports through
//! `validate()` returning `false` plus a logged diagnostic, and degenerate
//! keyframe data degrades to an empty sample (see the interpolator docs).
//!
//! # Usage
//!
//! Public constructors that can fail return [`Result<T>`] which is an alias
//! for `std::result::Result<T, GlintError>`.

use thiserror::Error;

/// The main error type for the animation engine.
#[derive(Error, Debug)]
pub enum GlintError {
    /// An accessor's raw byte payload does not match its declared
    /// count × element size.
    #[error(
        "Accessor payload mismatch: expected {expected} bytes for {count} elements, got {actual}"
    )]
    AccessorPayloadMismatch {
        /// Byte length implied by count, element type and component type
        expected: usize,
        /// Declared element count
        count: usize,
        /// Actual payload length
        actual: usize,
    },

    /// A typed helper constructor was handed a component slice that does not
    /// divide evenly into elements of the requested type.
    #[error("Accessor component count {components} is not a multiple of element size {element_size}")]
    AccessorComponentMismatch {
        /// Number of raw components supplied
        components: usize,
        /// Components per element for the requested element type
        element_size: usize,
    },

    /// An index handed to a document table at construction time is out of
    /// bounds.
    #[error("Document index out of bounds: {context} (index: {index})")]
    DocumentIndexOutOfBounds {
        /// Description of what was being accessed
        context: &'static str,
        /// The invalid index
        index: usize,
    },
}

/// Alias for `Result<T, GlintError>`.
pub type Result<T> = std::result::Result<T, GlintError>;
