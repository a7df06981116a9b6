//! Representation of path data.
//!
//! The path parser pushes commands into a [`PathBuilder`], a mutable, temporary storage
//! for path data.  When it is done, the builder gets turned into an immutable
//! [`PathData`], which is what the rest of the crate consumes and produces.
//!
//! Unlike a renderer, which only needs absolute coordinates, this crate needs to know
//! exactly what the author wrote: each [`Command`] remembers its letter's kind and
//! whether it was relative, so that normalization is an explicit step.
//!
//! The builder uses a [`TinyVec`] with space for 32 commands on the stack, since most
//! paths in the wild have fewer than that; larger ones spill to the heap.

use std::fmt;
use std::ops::Range;
use std::slice;
use std::str::FromStr;

use itertools::Itertools;
use tinyvec::{ArrayVec, TinyVec};

use crate::error::{CommandError, PathDataError};
use crate::geometry::{Controls, Point};
use crate::options::ParseMode;
use crate::path_parser::{parse_path, ParseError, PathParser};

/// Whether an arc's sweep should be >= 180 degrees, or smaller.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct LargeArc(pub bool);

/// Angular direction in which an arc is drawn.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Sweep {
    #[default]
    Negative,
    Positive,
}

impl From<bool> for Sweep {
    fn from(positive: bool) -> Sweep {
        if positive {
            Sweep::Positive
        } else {
            Sweep::Negative
        }
    }
}

impl Sweep {
    pub fn is_positive(self) -> bool {
        self == Sweep::Positive
    }
}

/// The kind of a path command, independent of its coordinates.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CommandKind {
    MoveTo,
    LineTo,
    HorizontalLineTo,
    VerticalLineTo,
    CurveTo,
    SmoothCurveTo,
    QuadTo,
    SmoothQuadTo,
    Arc,
    ClosePath,
}

impl CommandKind {
    /// Number of values that follow the command letter.
    pub fn num_values(self) -> usize {
        match self {
            CommandKind::MoveTo | CommandKind::LineTo | CommandKind::SmoothQuadTo => 2,
            CommandKind::HorizontalLineTo | CommandKind::VerticalLineTo => 1,
            CommandKind::CurveTo => 6,
            CommandKind::SmoothCurveTo | CommandKind::QuadTo => 4,
            CommandKind::Arc => 7,
            CommandKind::ClosePath => 0,
        }
    }

    /// Returns the kind for a command letter, and whether the letter is relative.
    pub fn from_letter(c: char) -> Option<(CommandKind, bool)> {
        let kind = match c.to_ascii_uppercase() {
            'M' => CommandKind::MoveTo,
            'L' => CommandKind::LineTo,
            'H' => CommandKind::HorizontalLineTo,
            'V' => CommandKind::VerticalLineTo,
            'C' => CommandKind::CurveTo,
            'S' => CommandKind::SmoothCurveTo,
            'Q' => CommandKind::QuadTo,
            'T' => CommandKind::SmoothQuadTo,
            'A' => CommandKind::Arc,
            'Z' => CommandKind::ClosePath,
            _ => return None,
        };

        Some((kind, c.is_ascii_lowercase()))
    }

    /// The uppercase (absolute) letter for this kind.
    pub fn letter(self) -> char {
        match self {
            CommandKind::MoveTo => 'M',
            CommandKind::LineTo => 'L',
            CommandKind::HorizontalLineTo => 'H',
            CommandKind::VerticalLineTo => 'V',
            CommandKind::CurveTo => 'C',
            CommandKind::SmoothCurveTo => 'S',
            CommandKind::QuadTo => 'Q',
            CommandKind::SmoothQuadTo => 'T',
            CommandKind::Arc => 'A',
            CommandKind::ClosePath => 'Z',
        }
    }

    /// Whether this is one of the shorthand forms H, V, S or T.
    pub fn is_shorthand(self) -> bool {
        matches!(
            self,
            CommandKind::HorizontalLineTo
                | CommandKind::VerticalLineTo
                | CommandKind::SmoothCurveTo
                | CommandKind::SmoothQuadTo
        )
    }
}

/// "C" command; a cubic Bézier segment.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CubicBezierCurve {
    /// The first control point.
    pub pt1: Point,
    /// The second control point.
    pub pt2: Point,
    /// The end point of this path segment.
    pub to: Point,
}

/// "S" command; a cubic Bézier whose first control point is reflected from the
/// previous segment.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SmoothCubicBezierCurve {
    pub pt2: Point,
    pub to: Point,
}

/// "Q" command; a quadratic Bézier segment.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct QuadraticBezierCurve {
    pub pt1: Point,
    pub to: Point,
}

/// "A" command; an elliptical arc in terms of its end point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EllipticalArc {
    /// The (x-axis, y-axis) radii for the ellipse.
    pub r: (f64, f64),
    /// The rotation angle in degrees for the ellipse's x-axis
    /// relative to the x-axis of the user coordinate system.
    pub x_axis_rotation: f64,
    /// Flag indicating whether the arc sweep should be
    /// greater than or equal to 180 degrees, or smaller than 180 degrees.
    pub large_arc: LargeArc,
    /// Flag indicating the angular direction in which the arc is drawn.
    pub sweep: Sweep,
    /// The end point of this path segment.
    pub to: Point,
}

/// The geometric payload of a path command, with a fixed arity per variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    HorizontalLineTo(f64),
    VerticalLineTo(f64),
    CurveTo(CubicBezierCurve),
    SmoothCurveTo(SmoothCubicBezierCurve),
    QuadTo(QuadraticBezierCurve),
    SmoothQuadTo(Point),
    Arc(EllipticalArc),
    ClosePath,
}

/// A single command in path data, as written by the author.
///
/// For relative commands, the coordinates in `segment` are offsets from the current
/// point.  After [`crate::normalize::to_absolute`] all commands are absolute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Command {
    pub segment: PathCommand,
    pub relative: bool,
}

// This is just so we can use TinyVec, whose type parameter requires T: Default.
// There is no actual default for path commands; this is just our
// implementation detail.
impl Default for Command {
    fn default() -> Command {
        Command::close_path()
    }
}

impl Command {
    pub fn absolute(segment: PathCommand) -> Command {
        Command {
            segment,
            relative: false,
        }
    }

    pub fn relative(segment: PathCommand) -> Command {
        Command {
            segment,
            relative: true,
        }
    }

    pub fn move_to(to: Point) -> Command {
        Command::absolute(PathCommand::MoveTo(to))
    }

    pub fn line_to(to: Point) -> Command {
        Command::absolute(PathCommand::LineTo(to))
    }

    pub fn curve_to(pt1: Point, pt2: Point, to: Point) -> Command {
        Command::absolute(PathCommand::CurveTo(CubicBezierCurve { pt1, pt2, to }))
    }

    pub fn quad_to(pt1: Point, to: Point) -> Command {
        Command::absolute(PathCommand::QuadTo(QuadraticBezierCurve { pt1, to }))
    }

    pub fn arc(
        r: (f64, f64),
        x_axis_rotation: f64,
        large_arc: LargeArc,
        sweep: Sweep,
        to: Point,
    ) -> Command {
        Command::absolute(PathCommand::Arc(EllipticalArc {
            r,
            x_axis_rotation,
            large_arc,
            sweep,
            to,
        }))
    }

    pub fn close_path() -> Command {
        Command::absolute(PathCommand::ClosePath)
    }

    pub fn kind(&self) -> CommandKind {
        match self.segment {
            PathCommand::MoveTo(_) => CommandKind::MoveTo,
            PathCommand::LineTo(_) => CommandKind::LineTo,
            PathCommand::HorizontalLineTo(_) => CommandKind::HorizontalLineTo,
            PathCommand::VerticalLineTo(_) => CommandKind::VerticalLineTo,
            PathCommand::CurveTo(_) => CommandKind::CurveTo,
            PathCommand::SmoothCurveTo(_) => CommandKind::SmoothCurveTo,
            PathCommand::QuadTo(_) => CommandKind::QuadTo,
            PathCommand::SmoothQuadTo(_) => CommandKind::SmoothQuadTo,
            PathCommand::Arc(_) => CommandKind::Arc,
            PathCommand::ClosePath => CommandKind::ClosePath,
        }
    }

    /// The command letter; lowercase for relative commands.
    pub fn letter(&self) -> char {
        let c = self.kind().letter();
        if self.relative {
            c.to_ascii_lowercase()
        } else {
            c
        }
    }

    /// The values that follow the command letter, in path data order.
    pub fn values(&self) -> ArrayVec<[f64; 7]> {
        let mut v = ArrayVec::new();

        match self.segment {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) | PathCommand::SmoothQuadTo(p) => {
                v.extend([p.x, p.y]);
            }

            PathCommand::HorizontalLineTo(n) | PathCommand::VerticalLineTo(n) => v.push(n),

            PathCommand::CurveTo(c) => {
                v.extend([c.pt1.x, c.pt1.y, c.pt2.x, c.pt2.y, c.to.x, c.to.y]);
            }

            PathCommand::SmoothCurveTo(c) => v.extend([c.pt2.x, c.pt2.y, c.to.x, c.to.y]),

            PathCommand::QuadTo(c) => v.extend([c.pt1.x, c.pt1.y, c.to.x, c.to.y]),

            PathCommand::Arc(a) => v.extend([
                a.r.0,
                a.r.1,
                a.x_axis_rotation,
                flag_value(a.large_arc.0),
                flag_value(a.sweep.is_positive()),
                a.to.x,
                a.to.y,
            ]),

            PathCommand::ClosePath => (),
        }

        v
    }

    /// Builds a command from its kind and the values that follow its letter.
    ///
    /// Fails if the number of values does not match the kind, or if an arc flag
    /// is neither 0 nor 1.
    pub fn from_values(
        kind: CommandKind,
        relative: bool,
        values: &[f64],
    ) -> Result<Command, CommandError> {
        if values.len() != kind.num_values() {
            return Err(CommandError::Arity {
                letter: kind.letter(),
                expected: kind.num_values(),
                found: values.len(),
            });
        }

        let pt = |i: usize| Point::new(values[i], values[i + 1]);

        let segment = match kind {
            CommandKind::MoveTo => PathCommand::MoveTo(pt(0)),
            CommandKind::LineTo => PathCommand::LineTo(pt(0)),
            CommandKind::HorizontalLineTo => PathCommand::HorizontalLineTo(values[0]),
            CommandKind::VerticalLineTo => PathCommand::VerticalLineTo(values[0]),
            CommandKind::CurveTo => PathCommand::CurveTo(CubicBezierCurve {
                pt1: pt(0),
                pt2: pt(2),
                to: pt(4),
            }),
            CommandKind::SmoothCurveTo => PathCommand::SmoothCurveTo(SmoothCubicBezierCurve {
                pt2: pt(0),
                to: pt(2),
            }),
            CommandKind::QuadTo => PathCommand::QuadTo(QuadraticBezierCurve {
                pt1: pt(0),
                to: pt(2),
            }),
            CommandKind::SmoothQuadTo => PathCommand::SmoothQuadTo(pt(0)),
            CommandKind::Arc => PathCommand::Arc(EllipticalArc {
                r: (values[0], values[1]),
                x_axis_rotation: values[2],
                large_arc: LargeArc(parse_flag(values[3])?),
                sweep: Sweep::from(parse_flag(values[4])?),
                to: pt(5),
            }),
            CommandKind::ClosePath => PathCommand::ClosePath,
        };

        Ok(Command { segment, relative })
    }

    /// The on-path point where this command leaves the pen.
    ///
    /// `current` is the current point before the command, and `subpath_start` is the
    /// point of the subpath's last MoveTo, which ClosePath returns to.
    pub fn end_point(&self, current: Point, subpath_start: Point) -> Point {
        let offset = if self.relative {
            current
        } else {
            Point::default()
        };

        match self.segment {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) | PathCommand::SmoothQuadTo(p) => {
                p + offset
            }
            PathCommand::HorizontalLineTo(x) => Point::new(x + offset.x, current.y),
            PathCommand::VerticalLineTo(y) => Point::new(current.x, y + offset.y),
            PathCommand::CurveTo(c) => c.to + offset,
            PathCommand::SmoothCurveTo(c) => c.to + offset,
            PathCommand::QuadTo(c) => c.to + offset,
            PathCommand::Arc(a) => a.to + offset,
            PathCommand::ClosePath => subpath_start,
        }
    }

    /// The end point of an absolute command, or `None` for ClosePath and for commands
    /// whose end point depends on the current point.
    pub fn to(&self) -> Option<Point> {
        if self.relative {
            return None;
        }

        match self.segment {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) | PathCommand::SmoothQuadTo(p) => {
                Some(p)
            }
            PathCommand::CurveTo(c) => Some(c.to),
            PathCommand::SmoothCurveTo(c) => Some(c.to),
            PathCommand::QuadTo(c) => Some(c.to),
            PathCommand::Arc(a) => Some(a.to),
            PathCommand::HorizontalLineTo(_)
            | PathCommand::VerticalLineTo(_)
            | PathCommand::ClosePath => None,
        }
    }

    /// Bézier control points of an absolute LineTo, QuadTo or CurveTo starting at `from`.
    ///
    /// Returns `None` for any other command.
    pub fn controls(&self, from: Point) -> Option<Controls> {
        if self.relative {
            return None;
        }

        let mut points = Controls::new();
        points.push(from);

        match self.segment {
            PathCommand::LineTo(p) => points.push(p),
            PathCommand::QuadTo(c) => points.extend([c.pt1, c.to]),
            PathCommand::CurveTo(c) => points.extend([c.pt1, c.pt2, c.to]),
            _ => return None,
        }

        Some(points)
    }

    /// Whether this is a quadratic or cubic Bézier, in any form.
    pub fn is_curve(&self) -> bool {
        matches!(
            self.kind(),
            CommandKind::CurveTo
                | CommandKind::SmoothCurveTo
                | CommandKind::QuadTo
                | CommandKind::SmoothQuadTo
        )
    }
}

fn flag_value(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}

fn parse_flag(v: f64) -> Result<bool, CommandError> {
    if v == 0.0 {
        Ok(false)
    } else if v == 1.0 {
        Ok(true)
    } else {
        Err(CommandError::InvalidArcFlag(v))
    }
}

// Avoids printing "-0", and hundreds of digits for very large or small magnitudes.
fn write_number(f: &mut fmt::Formatter<'_>, v: f64) -> fmt::Result {
    let magnitude = v.abs();

    if v == 0.0 {
        write!(f, "0")
    } else if magnitude >= 1e15 || magnitude < 1e-6 {
        write!(f, "{:e}", v)
    } else {
        write!(f, "{}", v)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())?;

        for (i, v) in self.values().into_iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write_number(f, v)?;
        }

        Ok(())
    }
}

/// An immutable sequence of path commands.
///
/// When not empty, the first command is always a MoveTo.  You can get an iterator for
/// the commands with the `iter` method, or an iterator for its subpaths (subsequences
/// of commands that start with a MoveTo) with the `iter_subpath` method.
///
/// This struct implements `Default`, and it yields an empty path.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathData {
    commands: Vec<Command>,
}

impl PathData {
    /// Creates path data from a list of commands, which must start with a MoveTo.
    pub fn new(commands: Vec<Command>) -> Result<PathData, PathDataError> {
        match commands.first() {
            Some(c) if c.kind() != CommandKind::MoveTo => Err(PathDataError::MissingMoveTo),
            _ => Ok(PathData { commands }),
        }
    }

    // For pipeline stages that preserve the leading MoveTo of their input.
    pub(crate) fn from_commands(commands: Vec<Command>) -> PathData {
        debug_assert!(commands
            .first()
            .map_or(true, |c| c.kind() == CommandKind::MoveTo));

        PathData { commands }
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<Command> {
        self.commands
    }

    pub fn iter(&self) -> slice::Iter<'_, Command> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Get an iterator over the subpaths.
    pub fn iter_subpath(&self) -> SubPathIter<'_> {
        SubPathIter {
            commands: &self.commands,
            start: 0,
        }
    }

    /// Whether every command is absolute and none is a shorthand (H, V, S, T).
    ///
    /// The simplifier only works on path data in this form.
    pub fn is_absolute_longhand(&self) -> bool {
        self.commands
            .iter()
            .all(|c| !c.relative && !c.kind().is_shorthand())
    }
}

impl<'a> IntoIterator for &'a PathData {
    type Item = &'a Command;
    type IntoIter = slice::Iter<'a, Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}

impl fmt::Display for PathData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.commands.iter().format(" "))
    }
}

impl FromStr for PathData {
    type Err = ParseError;

    /// Parses path data permissively, discarding diagnostics.
    fn from_str(s: &str) -> Result<PathData, ParseError> {
        parse_path(s, ParseMode::Permissive).map(|parsed| parsed.path)
    }
}

/// A slice of commands with a single MoveTo at the beginning.
#[derive(Debug, Clone, Copy)]
pub struct SubPath<'a> {
    commands: &'a [Command],
    start: usize,
}

impl<'a> SubPath<'a> {
    pub fn commands(&self) -> &'a [Command] {
        self.commands
    }

    /// Indices of this subpath's commands within the whole path.
    pub fn range(&self) -> Range<usize> {
        self.start..self.start + self.commands.len()
    }

    /// The point of the subpath's MoveTo, as written.
    pub fn origin(&self) -> Point {
        match self.commands.first().map(|c| c.segment) {
            Some(PathCommand::MoveTo(p)) => p,
            _ => Point::default(),
        }
    }

    /// Whether the subpath ends with a ClosePath.
    pub fn is_closed(&self) -> bool {
        self.commands
            .last()
            .map_or(false, |c| c.kind() == CommandKind::ClosePath)
    }
}

/// An iterator over the subpaths of a `PathData`.
pub struct SubPathIter<'a> {
    commands: &'a [Command],
    start: usize,
}

impl<'a> Iterator for SubPathIter<'a> {
    type Item = SubPath<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.commands[self.start..];
        if rest.is_empty() {
            return None;
        }

        // Skip over the initial MoveTo and stop before the next one
        let len = rest
            .iter()
            .skip(1)
            .position(|c| c.kind() == CommandKind::MoveTo)
            .map_or(rest.len(), |i| i + 1);

        let subpath = SubPath {
            commands: &rest[..len],
            start: self.start,
        };
        self.start += len;

        Some(subpath)
    }
}

/// Constructs path data out of commands.
///
/// Create this with `PathBuilder::default`; you can then add commands to it or call the
/// `parse` method.  When you are finished, turn it into [`PathData`] with
/// `into_path_data`.
#[derive(Default)]
pub struct PathBuilder {
    commands: TinyVec<[Command; 32]>,
}

impl PathBuilder {
    /// Parses path data into the builder, returning the diagnostics.
    ///
    /// In [`ParseMode::Strict`], the first diagnostic is returned as an error instead.
    pub fn parse(&mut self, path_str: &str, mode: ParseMode) -> Result<Vec<ParseError>, ParseError> {
        let mut parser = PathParser::new(self, path_str, mode);
        parser.parse()
    }

    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    /// Adds a MoveTo command to the path.
    pub fn move_to(&mut self, x: f64, y: f64) {
        self.push(Command::move_to(Point::new(x, y)));
    }

    /// Adds a LineTo command to the path.
    pub fn line_to(&mut self, x: f64, y: f64) {
        self.push(Command::line_to(Point::new(x, y)));
    }

    /// Adds a CurveTo command to the path.
    pub fn curve_to(&mut self, x2: f64, y2: f64, x3: f64, y3: f64, x4: f64, y4: f64) {
        self.push(Command::curve_to(
            Point::new(x2, y2),
            Point::new(x3, y3),
            Point::new(x4, y4),
        ));
    }

    /// Adds a QuadTo command to the path.
    pub fn quad_to(&mut self, x2: f64, y2: f64, x3: f64, y3: f64) {
        self.push(Command::quad_to(Point::new(x2, y2), Point::new(x3, y3)));
    }

    /// Adds an EllipticalArc command to the path.
    #[allow(clippy::too_many_arguments)]
    pub fn arc(
        &mut self,
        rx: f64,
        ry: f64,
        x_axis_rotation: f64,
        large_arc: LargeArc,
        sweep: Sweep,
        x: f64,
        y: f64,
    ) {
        self.push(Command::arc(
            (rx, ry),
            x_axis_rotation,
            large_arc,
            sweep,
            Point::new(x, y),
        ));
    }

    /// Adds a ClosePath command to the path.
    pub fn close_path(&mut self) {
        self.push(Command::close_path());
    }

    pub fn last(&self) -> Option<&Command> {
        self.commands.last()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Consumes the builder and returns immutable path data.
    ///
    /// Fails if the first command is not a MoveTo.
    pub fn into_path_data(self) -> Result<PathData, PathDataError> {
        PathData::new(self.commands.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_builder() {
        let builder = PathBuilder::default();
        let path = builder.into_path_data().unwrap();
        assert!(path.is_empty());
        assert_eq!(path.iter().count(), 0);
        assert_eq!(path.to_string(), "");
    }

    #[test]
    fn rejects_missing_moveto() {
        let mut builder = PathBuilder::default();
        builder.line_to(1.0, 2.0);
        assert_eq!(
            builder.into_path_data().unwrap_err(),
            PathDataError::MissingMoveTo
        );
    }

    #[test]
    fn all_commands() {
        let mut builder = PathBuilder::default();
        builder.move_to(42.0, 43.0);
        builder.line_to(42.0, 43.0);
        builder.curve_to(42.0, 43.0, 44.0, 45.0, 46.0, 47.0);
        builder.quad_to(1.0, 2.0, 3.0, 4.0);
        builder.arc(44.0, 45.0, 46.0, LargeArc(true), Sweep::Positive, 47.0, 48.0);
        builder.close_path();
        let path = builder.into_path_data().unwrap();

        assert_eq!(
            path.to_string(),
            "M42 43 L42 43 C42 43 44 45 46 47 Q1 2 3 4 A44 45 46 1 1 47 48 Z"
        );
        assert!(path.is_absolute_longhand());
    }

    #[test]
    fn builds_from_values() {
        let c = Command::from_values(CommandKind::Arc, true, &[5.0, 6.0, 7.0, 0.0, 1.0, 8.0, 9.0])
            .unwrap();
        assert_eq!(c.letter(), 'a');
        assert_eq!(c.to_string(), "a5 6 7 0 1 8 9");
        assert_eq!(&c.values()[..], &[5.0, 6.0, 7.0, 0.0, 1.0, 8.0, 9.0]);

        assert_eq!(
            Command::from_values(CommandKind::CurveTo, false, &[1.0, 2.0]),
            Err(CommandError::Arity {
                letter: 'C',
                expected: 6,
                found: 2
            })
        );

        assert_eq!(
            Command::from_values(CommandKind::Arc, false, &[5.0, 6.0, 7.0, 2.0, 1.0, 8.0, 9.0]),
            Err(CommandError::InvalidArcFlag(2.0))
        );
    }

    #[test]
    fn computes_end_points() {
        let current = Point::new(10.0, 20.0);
        let start = Point::new(1.0, 1.0);

        let h = Command::relative(PathCommand::HorizontalLineTo(5.0));
        assert_eq!(h.end_point(current, start), Point::new(15.0, 20.0));

        let v = Command::absolute(PathCommand::VerticalLineTo(5.0));
        assert_eq!(v.end_point(current, start), Point::new(10.0, 5.0));

        let l = Command::relative(PathCommand::LineTo(Point::new(-1.0, 2.0)));
        assert_eq!(l.end_point(current, start), Point::new(9.0, 22.0));
        assert_eq!(l.to(), None);

        assert_eq!(Command::close_path().end_point(current, start), start);
    }

    #[test]
    fn subpath_iter() {
        let mut builder = PathBuilder::default();
        builder.move_to(42.0, 43.0);
        builder.line_to(42.0, 43.0);
        builder.close_path();

        builder.move_to(22.0, 22.0);
        builder.curve_to(22.0, 22.0, 44.0, 45.0, 46.0, 47.0);

        builder.move_to(69.0, 69.0);
        builder.line_to(42.0, 43.0);
        let path = builder.into_path_data().unwrap();

        let subpaths = path
            .iter_subpath()
            .map(|subpath| (subpath.origin(), subpath.range(), subpath.is_closed()))
            .collect::<Vec<_>>();

        assert_eq!(
            subpaths,
            vec![
                (Point::new(42.0, 43.0), 0..3, true),
                (Point::new(22.0, 22.0), 3..5, false),
                (Point::new(69.0, 69.0), 5..7, false),
            ]
        );
    }

    #[test]
    fn prints_negative_zero_as_zero() {
        let path = PathData::new(vec![Command::move_to(Point::new(-0.0, 1.5))]).unwrap();
        assert_eq!(path.to_string(), "M0 1.5");
    }

    #[test]
    fn prints_extreme_magnitudes_with_exponents() {
        let path = PathData::new(vec![
            Command::move_to(Point::new(1e300, -2.5e-12)),
            Command::line_to(Point::new(123456.25, 0.001)),
        ])
        .unwrap();

        let printed = path.to_string();
        assert_eq!(printed, "M1e300 -2.5e-12 L123456.25 0.001");
        assert_eq!(printed.parse::<PathData>().unwrap(), path);
    }
}
