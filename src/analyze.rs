//! Annotation of path commands with the metadata that bounds where merging is safe.
//!
//! The analyzer never changes geometry.  It computes, for each command of an absolute,
//! long-hand [`PathData`], its on-path points and a few flags; the chunk builder uses
//! the flags to decide which runs of commands may be merged.

use std::ops::Range;

use crate::float_eq::ApproxEqPath;
use crate::geometry::{
    angle_difference, chord_distance, polygon_area, square_distance, tangent_at_t, Controls,
    Point,
};
use crate::path_data::{Command, CommandKind, PathCommand, PathData, SubPath};
use crate::rect::Rect;

/// A curve is flat when the area of its control polygon is less than this fraction of
/// its squared chord length.
pub const FLAT_RATIO: f64 = 0.02;

/// In an open subpath whose on-path points all lie on one line, and whose curves never
/// change bending direction, a curve that strays less than this many user units from
/// its chord is also flat.  Such a subpath is a stroke along the line.
pub const STROKE_FLAT_DISTANCE: f64 = 1.0;

/// Tangent discontinuities above this angle, in degrees, are corners.
pub const CORNER_ANGLE: f64 = 5.0;

// Tolerance for collinearity of on-path points, relative to the subpath's size.
const COLLINEAR_EPSILON: f64 = 1e-6;

/// A command with its on-path points and merge-safety flags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnotatedCommand {
    pub command: Command,

    /// Index of the subpath that contains this command.
    pub subpath: usize,

    /// The current point before this command.
    pub p0: Point,

    /// The current point after this command.
    pub p: Point,

    /// First control point of a quadratic or cubic.
    pub cp1: Option<Point>,

    /// Second control point of a cubic.
    pub cp2: Option<Point>,

    /// Signed area of the control polygon `[p0, cp1, (cp2), p]`.
    pub area: f64,

    /// A LineTo, or a ClosePath that draws a segment.
    pub lineto: bool,

    /// The tangent turns sharply between this curve and the next one.
    pub corner: bool,

    /// The end point lies on the edge of the subpath's bounding box.
    pub extreme: bool,

    /// The curve bends the opposite way from the previous curve.
    pub direction_change: bool,

    pub close_path: bool,

    /// The curve is indistinguishable from a straight line.
    pub flat: bool,
}

impl AnnotatedCommand {
    pub fn kind(&self) -> CommandKind {
        self.command.kind()
    }

    /// Whether this is a quadratic or cubic Bézier.
    pub fn is_curve(&self) -> bool {
        matches!(self.kind(), CommandKind::CurveTo | CommandKind::QuadTo)
    }

    /// Bézier control points from `p0` to `p`, for lines and curves.
    pub fn controls(&self) -> Option<Controls> {
        self.command.controls(self.p0)
    }
}

/// Per-subpath results of the analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct SubpathInfo {
    /// Indices of the subpath's commands.
    pub range: Range<usize>,

    /// The point of the subpath's MoveTo.
    pub start: Point,

    pub closed: bool,

    /// Bounding box of the on-path points.
    pub vertex_bounds: Rect,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Analysis {
    pub commands: Vec<AnnotatedCommand>,
    pub subpaths: Vec<SubpathInfo>,
}

/// Annotates every command of absolute, long-hand path data.
pub fn analyze(path: &PathData) -> Analysis {
    debug_assert!(path.is_absolute_longhand());

    let mut analysis = Analysis {
        commands: Vec::with_capacity(path.len()),
        subpaths: Vec::new(),
    };

    let mut current = Point::default();

    for (index, subpath) in path.iter_subpath().enumerate() {
        let (commands, info) = analyze_subpath(&subpath, index, &mut current);
        analysis.commands.extend(commands);
        analysis.subpaths.push(info);
    }

    analysis
}

fn analyze_subpath(
    subpath: &SubPath<'_>,
    index: usize,
    current: &mut Point,
) -> (Vec<AnnotatedCommand>, SubpathInfo) {
    let mut start = subpath.origin();

    let mut commands: Vec<AnnotatedCommand> = subpath
        .commands()
        .iter()
        .map(|command| {
            let p0 = *current;
            let p = command.end_point(p0, start);
            let kind = command.kind();

            if kind == CommandKind::MoveTo {
                start = p;
            }

            let (cp1, cp2) = match command.segment {
                PathCommand::CurveTo(c) => (Some(c.pt1), Some(c.pt2)),
                PathCommand::QuadTo(c) => (Some(c.pt1), None),
                _ => (None, None),
            };

            let area = match (cp1, cp2) {
                (Some(c1), Some(c2)) => polygon_area(&[p0, c1, c2, p]),
                (Some(c1), None) => polygon_area(&[p0, c1, p]),
                _ => 0.0,
            };

            let close_path = kind == CommandKind::ClosePath;

            *current = p;

            AnnotatedCommand {
                command: *command,
                subpath: index,
                p0,
                p,
                cp1,
                cp2,
                area,
                lineto: kind == CommandKind::LineTo || (close_path && !p0.approx_eq_path(p)),
                corner: false,
                extreme: false,
                direction_change: false,
                close_path,
                flat: false,
            }
        })
        .collect();

    let vertex_bounds = Rect::from_points(commands.iter().map(|a| a.p)).unwrap_or_default();

    mark_direction_changes(&mut commands);

    let stroke = !subpath.is_closed() && is_stroke_along_line(&commands, &vertex_bounds);

    for a in commands.iter_mut().filter(|a| a.is_curve()) {
        a.flat = is_flat(a) || (stroke && strays_less_than(a, STROKE_FLAT_DISTANCE));
    }

    for a in commands.iter_mut() {
        a.extreme = (a.is_curve() || a.kind() == CommandKind::Arc)
            && !a.flat
            && vertex_bounds.touches_edge(a.p);
    }

    mark_corners(&mut commands);

    let info = SubpathInfo {
        range: subpath.range(),
        start: subpath.origin(),
        closed: subpath.is_closed(),
        vertex_bounds,
    };

    (commands, info)
}

fn is_flat(a: &AnnotatedCommand) -> bool {
    let chord2 = square_distance(a.p0, a.p);

    if chord2 == 0.0 {
        // A loop is only flat if it is a single point.
        return a.area == 0.0
            && [a.cp1, a.cp2]
                .iter()
                .flatten()
                .all(|c| c.approx_eq_path(a.p));
    }

    a.area.abs() / chord2 < FLAT_RATIO
}

fn strays_less_than(a: &AnnotatedCommand, distance: f64) -> bool {
    a.controls()
        .map_or(false, |controls| chord_distance(&controls) < distance)
}

fn mark_direction_changes(commands: &mut [AnnotatedCommand]) {
    let mut previous_positive: Option<bool> = None;

    for a in commands.iter_mut().filter(|a| a.is_curve()) {
        let chord2 = square_distance(a.p0, a.p);
        if a.area.abs() <= f64::EPSILON * chord2.max(1.0) {
            continue;
        }

        let positive = a.area > 0.0;
        a.direction_change = previous_positive.map_or(false, |prev| prev != positive);
        previous_positive = Some(positive);
    }
}

// All on-path points lie on one line, and no curve changes bending direction.
fn is_stroke_along_line(commands: &[AnnotatedCommand], vertex_bounds: &Rect) -> bool {
    if commands.iter().any(|a| a.direction_change) {
        return false;
    }

    let first = match commands.first() {
        Some(a) => a.p,
        None => return true,
    };

    let farthest = commands
        .iter()
        .map(|a| a.p)
        .max_by(|a, b| {
            square_distance(first, *a)
                .partial_cmp(&square_distance(first, *b))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .unwrap_or(first);

    let axis = farthest - first;
    let len = axis.length();
    if len == 0.0 {
        return true;
    }

    let tolerance = COLLINEAR_EPSILON * vertex_bounds.max_dimension().max(1.0);

    commands
        .iter()
        .all(|a| (axis.cross(a.p - first) / len).abs() <= tolerance)
}

fn mark_corners(commands: &mut [AnnotatedCommand]) {
    let threshold = CORNER_ANGLE.to_radians();

    for i in 1..commands.len() {
        let (prev, next) = (&commands[i - 1], &commands[i]);

        if !prev.is_curve() || prev.kind() != next.kind() {
            continue;
        }

        if (prev.extreme || prev.flat) && (next.extreme || next.flat) {
            continue;
        }

        let (out_controls, in_controls) = match (prev.controls(), next.controls()) {
            (Some(a), Some(b)) => (a, b),
            _ => continue,
        };

        let outgoing = tangent_at_t(&out_controls, 1.0);
        let incoming = tangent_at_t(&in_controls, 0.0);

        if angle_difference(outgoing, incoming).abs() > threshold {
            commands[i - 1].corner = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze_str(s: &str) -> Analysis {
        analyze(&s.parse::<PathData>().unwrap())
    }

    #[test]
    fn square_has_only_lines() {
        let analysis = analyze_str("M0 0 L10 0 L10 10 L0 10 Z");
        let c = &analysis.commands;

        assert_eq!(c.len(), 5);
        assert!(c[1..].iter().all(|a| a.lineto));
        assert!(c.iter().all(|a| !a.flat && !a.extreme && !a.corner && !a.direction_change));
        assert!(c[4].close_path);
        assert_eq!(c[4].p, Point::new(0.0, 0.0));

        let info = &analysis.subpaths[0];
        assert_eq!(info.range, 0..5);
        assert!(info.closed);
        assert_eq!(info.vertex_bounds, Rect::new(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn closepath_without_segment_is_not_lineto() {
        let analysis = analyze_str("M0 0 L10 0 L10 10 L0 0 Z");
        assert!(!analysis.commands[4].lineto);
    }

    #[test]
    fn detects_flat_curves() {
        let analysis = analyze_str("M0 0 C1 1 2 1 3 0");
        assert!(analysis.commands[1].flat);
        assert!(!analysis.commands[1].extreme);

        let analysis = analyze_str("M0 0 C0 10 10 10 10 0");
        assert!(!analysis.commands[1].flat);
        assert!(analysis.commands[1].extreme);
    }

    #[test]
    fn lone_curves_are_not_strokes() {
        for s in [
            "M0 -10 C5.523 -10 10 -5.523 10 0",
            "M0 0 C0 10 10 20 20 20",
            "M0 0 C10 5 20 5 30 0",
            "M0 0 C1 1 2 1 3 0 C2 -1 1 -1 0 0 Z",
        ] {
            let analysis = analyze_str(s);
            assert!(analysis.commands.iter().all(|a| !a.flat), "{}", s);
        }
    }

    #[test]
    fn flat_ratio_applies_at_any_scale() {
        let analysis = analyze_str("M0 0 Q500 5 1000 0 L1000 1000 Z");
        assert!(analysis.commands[1].flat);

        let analysis = analyze_str("M0 0 Q0.05 0.05 0.1 0 L0.1 0.1 Z");
        assert!(!analysis.commands[1].flat);
    }

    #[test]
    fn detects_direction_changes() {
        let analysis = analyze_str("M0 0 C0 10 10 20 20 20 C30 20 40 30 40 40");
        let c = &analysis.commands;

        assert!(!c[1].direction_change);
        assert!(c[2].direction_change);
        assert!(!c[1].flat);
        assert!(!c[2].flat);
        assert!(c[1].area < 0.0);
        assert!(c[2].area > 0.0);
    }

    #[test]
    fn detects_corners() {
        let analysis = analyze_str("M0 0 C0 5 5 10 10 10 C10 15 15 20 20 30");
        assert!(analysis.commands[1].corner);
        assert!(!analysis.commands[2].corner);

        let analysis = analyze_str("M0 0 C0 5 5 10 10 10 C15 10 20 15 20 30");
        assert!(!analysis.commands[1].corner);
    }

    #[test]
    fn circle_quadrants_are_extreme() {
        let analysis = analyze_str(
            "M0 -10 C5.523 -10 10 -5.523 10 0 C10 5.523 5.523 10 0 10 \
             C-5.523 10 -10 5.523 -10 0 C-10 -5.523 -5.523 -10 0 -10 Z",
        );

        assert!(analysis.commands[1..5].iter().all(|a| a.extreme && !a.flat));
        assert!(analysis.commands[1..5].iter().all(|a| !a.direction_change));
    }

    #[test]
    fn tracks_subpaths() {
        let analysis = analyze_str("M0 0 L1 1 Z M5 5 L6 6");

        assert_eq!(analysis.subpaths.len(), 2);
        assert_eq!(analysis.subpaths[1].range, 3..5);
        assert_eq!(analysis.commands[3].subpath, 1);
        assert_eq!(analysis.commands[3].p0, Point::new(0.0, 0.0));
        assert!(!analysis.subpaths[1].closed);
    }
}
