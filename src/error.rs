//! Error types.
//!
//! Errors from the path data parser live in [`crate::path_parser`], since they carry a
//! position in the input string.

use thiserror::Error;

/// A command could not be constructed from a list of values.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CommandError {
    /// The number of values does not match the command's arity.
    #[error("command '{letter}' takes {expected} values, got {found}")]
    Arity {
        letter: char,
        expected: usize,
        found: usize,
    },

    /// An arc's large-arc or sweep flag was not 0 or 1.
    #[error("arc flags must be 0 or 1, got {0}")]
    InvalidArcFlag(f64),
}

/// A list of commands does not form valid path data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PathDataError {
    #[error("path data must start with a moveto command")]
    MissingMoveTo,
}

/// A geometric construction is mathematically undefined for its input.
///
/// These indicate malformed input; the simplifier treats them as "do not touch
/// this command" and never propagates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("elliptical arc has a zero radius")]
    ZeroRadius,

    #[error("elliptical arc endpoints coincide")]
    CoincidentEndpoints,
}
