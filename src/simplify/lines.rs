//! Removal of redundant vertices from runs of LineTo commands.

use crate::analyze::AnnotatedCommand;
use crate::float_eq::ApproxEqPath;
use crate::geometry::{angle, angle_difference, polygon_area, Point};
use crate::path_data::Command;

/// A vertex is redundant when the triangle it forms with its neighbors has an area
/// below this fraction of the squared subpath size.
pub const LINE_FLATNESS: f64 = 1e-5;

/// Turns sharper than this, in degrees, are kept regardless of their area.
pub const MAX_DROPPED_TURN: f64 = 45.0;

/// Simplifies a run of LineTo commands.
///
/// Vertices that barely bend the polyline are dropped, as are zero-length segments.
/// The run's start and end points are kept exactly.  `size` is the largest dimension
/// of the subpath that contains the run.
pub fn simplify_lines(run: &[AnnotatedCommand], size: f64) -> Vec<Command> {
    let p0 = match run.first() {
        Some(a) => a.p0,
        None => return Vec::new(),
    };

    let mut ends: Vec<Point> = Vec::with_capacity(run.len());
    let mut previous = p0;
    for a in run {
        if !a.p.approx_eq_path(previous) {
            ends.push(a.p);
            previous = a.p;
        }
    }

    if ends.is_empty() {
        // Everything is zero-length; the first segment still draws a dot.
        return vec![run[0].command];
    }

    let max_area = LINE_FLATNESS * size * size;
    let max_turn = MAX_DROPPED_TURN.to_radians();

    let mut kept = Vec::with_capacity(ends.len());
    let mut last = p0;

    for (i, &this) in ends.iter().enumerate() {
        let next = match ends.get(i + 1) {
            Some(&next) => next,
            None => {
                kept.push(Command::line_to(this));
                break;
            }
        };

        let area = polygon_area(&[last, this, next]).abs();
        let turn = angle_difference(angle(last, this, false), angle(this, next, false)).abs();

        if area < max_area && turn < max_turn {
            continue;
        }

        kept.push(Command::line_to(this));
        last = this;
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::analyze;
    use crate::path_data::PathData;

    fn simplified(s: &str) -> String {
        let analysis = analyze(&s.parse::<PathData>().unwrap());
        let size = analysis.subpaths[0].vertex_bounds.max_dimension();
        let commands = simplify_lines(&analysis.commands[1..], size);

        PathData::new(
            std::iter::once(analysis.commands[0].command)
                .chain(commands)
                .collect(),
        )
        .unwrap()
        .to_string()
    }

    #[test]
    fn drops_collinear_vertices() {
        assert_eq!(
            simplified("M0 0 L12.5 0 L25 0 L37.5 0 L50 0 L62.5 0 L75 0 L87.5 0 L100 0"),
            "M0 0 L100 0"
        );
    }

    #[test]
    fn keeps_corners() {
        assert_eq!(
            simplified("M0 0 L10 0 L10 10 L0 10"),
            "M0 0 L10 0 L10 10 L0 10"
        );
    }

    #[test]
    fn keeps_reversals() {
        assert_eq!(simplified("M0 0 L10 0 L5 0"), "M0 0 L10 0 L5 0");
    }

    #[test]
    fn drops_nearly_collinear_vertices() {
        assert_eq!(simplified("M0 0 L50 0.001 L100 0"), "M0 0 L100 0");
        assert_eq!(simplified("M0 0 L50 5 L100 0"), "M0 0 L50 5 L100 0");
    }

    #[test]
    fn drops_zero_length_segments() {
        assert_eq!(simplified("M0 0 L10 0 L10 0 L10 10"), "M0 0 L10 0 L10 10");
        assert_eq!(simplified("M0 0 L0 0 L0 0"), "M0 0 L0 0");
    }
}
