//! Parse and geometrically simplify SVG path data.
//!
//! This crate reads the mini-language of the SVG `d` attribute into a typed
//! [`PathData`], and can rewrite it with fewer commands while keeping its shape:
//! collinear line vertices are dropped, runs of Bézier curves are merged, and curves
//! that are close to quarter circles or ellipses become elliptical arcs.
//!
//! Every replacement is checked against the geometry it replaces: the area enclosed
//! between the new curves and their chord may not deviate by more than a tolerance,
//! given in percent, from that of the original commands.
//!
//! # Basic usage
//!
//! * Parse path data with [`parse_path`], or use [`simplify_path_data`] to parse and
//!   simplify in one step.
//! * Configure the simplifier with [`SimplifyOptions`].
//! * Print the result with the `Display` implementation of [`PathData`].
//!
//! # Example
//!
//! ```
//! use svgpath::{simplify_path_data, ParseMode, SimplifyOptions};
//!
//! let options = SimplifyOptions::default().with_tolerance(2.5);
//!
//! let simplified =
//!     simplify_path_data("m0 0 h10 h10 v10 v10 h-20 z", &options, ParseMode::Permissive)
//!         .unwrap();
//!
//! assert_eq!(simplified.path.to_string(), "M0 0 L20 0 L20 20 L0 20 Z");
//! assert!(simplified.diagnostics.is_empty());
//! ```
//!
//! # Diagnostics
//!
//! By default the parser is permissive like SVG renderers: it recovers from errors,
//! keeps everything up to the error, and reports a [`ParseError`] for each of them.
//! With [`ParseMode::Strict`], the first error fails the parse.
//!
//! Set the `SVGPATH_LOG` environment variable to see what the simplifier does.

#![allow(clippy::too_many_arguments)]
#![allow(clippy::derive_partial_eq_without_eq)]
#![warn(nonstandard_style, rust_2018_idioms, unused)]
// Some lints no longer exist
#![warn(renamed_and_removed_lints)]
// Standalone lints
#![warn(trivial_casts, trivial_numeric_casts)]

pub use crate::analyze::{analyze, Analysis, AnnotatedCommand, SubpathInfo};
pub use crate::chunk::{build_chunks, Chunk};
pub use crate::error::{CommandError, GeometryError, PathDataError};
pub use crate::geometry::Point;
pub use crate::normalize::{normalize, to_absolute, to_longhand};
pub use crate::options::{ParseMode, SimplifyOptions};
pub use crate::path_data::{
    Command, CommandKind, CubicBezierCurve, EllipticalArc, LargeArc, PathBuilder, PathCommand,
    PathData, QuadraticBezierCurve, SmoothCubicBezierCurve, SubPath, Sweep,
};
pub use crate::path_parser::{parse_path, ErrorKind, LexError, ParseError, ParsedPath};
pub use crate::rect::Rect;
pub use crate::session::Session;
pub use crate::simplify::{simplify, simplify_path_data, SimplifiedPath};

mod analyze;
mod chunk;
mod error;
mod float_eq;
pub mod geometry;
mod log;
mod normalize;
mod options;
mod path_data;
mod path_parser;
mod rect;
mod session;
pub mod simplify;

#[doc(hidden)]
pub mod bench_only {
    pub use crate::path_parser::Lexer;
}
