//! Replacement of near-circular cubics by elliptical arcs, and merging of adjacent arcs.

use std::f64::consts::{FRAC_PI_2, PI};

use crate::float_eq::ApproxEqPath;
use crate::geometry::{
    angle, angle_difference, arc_to_center_param, bezier_area, distance, line_intersection,
    ArcCenter, Point,
};
use crate::path_data::{Command, CommandKind, EllipticalArc, LargeArc, PathCommand, PathData, Sweep};
use crate::session::Session;
use crate::svgpath_log;

use super::area::measure;

/// Outer tangents must be this close to perpendicular, in degrees, for a quarter arc.
pub const RIGHT_ANGLE_TOLERANCE: f64 = 3.0;

/// Relative difference under which two radii are considered equal.
pub const RADIUS_TOLERANCE: f64 = 0.05;

/// Merged arcs sweeping more than this are split in two.
pub const MAX_SINGLE_ARC_SWEEP: f64 = 1.5 * PI;

/// At most this many consecutive arcs are merged at once.
const MAX_MERGED_ARCS: usize = 4;

/// Builds the quarter ellipse from `p0` to `p` whose tangents at the endpoints pass
/// through `start_handle` and `end_handle`.
///
/// Returns `None` unless the tangents are perpendicular and meet ahead of both
/// endpoints.  Nearly equal radii are snapped to a circle.
pub fn quarter_arc(p0: Point, start_handle: Point, end_handle: Point, p: Point) -> Option<Command> {
    let turn = angle_difference(angle(p0, start_handle, false), angle(end_handle, p, false));
    if (turn.abs() - FRAC_PI_2).abs() > RIGHT_ANGLE_TOLERANCE.to_radians() {
        return None;
    }

    let x = line_intersection(p0, start_handle, end_handle, p, false)?;
    if (x - p0).dot(start_handle - p0) <= 0.0 || (x - p).dot(end_handle - p) <= 0.0 {
        return None;
    }

    // The ellipse's x axis runs from `p` to the tangents' intersection.
    let rx = distance(p, x);
    let ry = distance(p0, x);
    if rx.approx_eq_path(0.0) || ry.approx_eq_path(0.0) {
        return None;
    }

    let (r, rotation) = if radii_match(rx, ry) {
        let r = (rx + ry) / 2.0;
        ((r, r), 0.0)
    } else {
        ((rx, ry), angle(p, x, false).to_degrees())
    };

    let sweep = Sweep::from((x - p).cross(x - p0) > 0.0);

    Some(Command::arc(r, rotation, LargeArc(false), sweep, p))
}

fn radii_match(a: f64, b: f64) -> bool {
    (a - b).abs() < RADIUS_TOLERANCE * a.max(b)
}

// Replaces each single cubic that is close to a quarter arc.
fn replace_cubics(path: &PathData, tolerance: f64, session: &Session) -> Vec<Command> {
    let mut current = Point::default();
    let mut start = Point::default();
    let mut replaced = 0;

    let commands = path
        .iter()
        .map(|command| {
            let p0 = current;
            current = command.end_point(current, start);
            if command.kind() == CommandKind::MoveTo {
                start = current;
            }

            let controls = match command.segment {
                PathCommand::CurveTo(_) => command.controls(p0),
                _ => None,
            };

            let arc = controls.and_then(|c| {
                let start_handle = c[1..].iter().copied().find(|&h| h != c[0])?;
                let end_handle = c[..3].iter().rev().copied().find(|&h| h != c[3])?;

                let arc = quarter_arc(c[0], start_handle, end_handle, c[3])?;
                let deviation = measure(p0, bezier_area(&c), &[arc])?;

                Some(arc).filter(|_| deviation < tolerance)
            });

            match arc {
                Some(arc) => {
                    replaced += 1;
                    arc
                }
                None => *command,
            }
        })
        .collect();

    svgpath_log!(session, "arcs: replaced {} cubics", replaced);

    commands
}

#[derive(Debug, Clone, Copy)]
struct ArcSegment {
    arc: EllipticalArc,
    center: ArcCenter,
}

impl ArcSegment {
    fn new(from: Point, arc: EllipticalArc) -> Option<ArcSegment> {
        let center = arc_to_center_param(
            from,
            arc.r.0,
            arc.r.1,
            arc.x_axis_rotation,
            arc.large_arc.0,
            arc.sweep.is_positive(),
            arc.to,
        )
        .ok()?;

        Some(ArcSegment { arc, center })
    }

    fn is_circular(&self) -> bool {
        radii_match(self.center.rx, self.center.ry)
    }

    // Whether both arcs lie on the same ellipse, in the same direction.
    fn continues(&self, other: &ArcSegment) -> bool {
        let (a, b) = (&self.center, &other.center);
        let r = a.rx.max(a.ry);

        self.arc.sweep == other.arc.sweep
            && radii_match(a.rx, b.rx)
            && radii_match(a.ry, b.ry)
            && distance(a.center, b.center) <= RADIUS_TOLERANCE * r
            && (self.is_circular()
                || angle_difference(2.0 * a.phi, 2.0 * b.phi).abs()
                    <= 2.0 * RIGHT_ANGLE_TOLERANCE.to_radians())
    }
}

fn total_sweep(group: &[ArcSegment]) -> f64 {
    group.iter().map(|s| s.center.delta_theta.abs()).sum()
}

// One arc covering the whole group.
fn merge(group: &[ArcSegment]) -> Command {
    let first = &group[0];
    let last = &group[group.len() - 1];

    if group.len() == 1 {
        return Command::absolute(PathCommand::Arc(first.arc));
    }

    let n = group.len() as f64;
    let rx = group.iter().map(|s| s.center.rx).sum::<f64>() / n;
    let ry = group.iter().map(|s| s.center.ry).sum::<f64>() / n;

    Command::arc(
        (rx, ry),
        first.arc.x_axis_rotation,
        LargeArc(total_sweep(group) > PI + 1e-9),
        first.arc.sweep,
        last.arc.to,
    )
}

fn flush(group: &mut Vec<ArcSegment>, out: &mut Vec<Command>) {
    match group.len() {
        0 => (),

        1 => out.push(merge(group)),

        n if total_sweep(group) <= MAX_SINGLE_ARC_SWEEP + 1e-9 => {
            debug_assert!(n <= MAX_MERGED_ARCS);
            out.push(merge(group));
        }

        n if n >= 3 => {
            let (left, right) = group.split_at(n / 2);
            out.push(merge(left));
            out.push(merge(right));
        }

        _ => out.extend(group.iter().map(|s| Command::absolute(PathCommand::Arc(s.arc)))),
    }

    group.clear();
}

// Merges runs of 2 to 4 arcs on the same ellipse, sweeping at most a full turn.
fn merge_arcs(commands: &[Command], session: &Session) -> Vec<Command> {
    let mut out = Vec::with_capacity(commands.len());
    let mut group: Vec<ArcSegment> = Vec::with_capacity(MAX_MERGED_ARCS);

    let mut current = Point::default();
    let mut start = Point::default();

    for command in commands {
        let p0 = current;
        current = command.end_point(current, start);
        if command.kind() == CommandKind::MoveTo {
            start = current;
        }

        let segment = match command.segment {
            PathCommand::Arc(arc) => ArcSegment::new(p0, arc),
            _ => None,
        };

        match segment {
            Some(segment) => {
                let fits = group.len() < MAX_MERGED_ARCS
                    && total_sweep(&group) + segment.center.delta_theta.abs() <= 2.0 * PI + 1e-9
                    && group.first().map_or(true, |first| first.continues(&segment));

                if !fits {
                    flush(&mut group, &mut out);
                }
                group.push(segment);
            }

            None => {
                flush(&mut group, &mut out);
                out.push(*command);
            }
        }
    }

    flush(&mut group, &mut out);

    svgpath_log!(
        session,
        "arcs: {} commands after merging, from {}",
        out.len(),
        commands.len()
    );

    out
}

/// Replaces cubics that match a quarter ellipse within `tolerance` percent by arcs,
/// then merges runs of arcs on the same ellipse.
pub fn arc_stage(path: &PathData, tolerance: f64, session: &Session) -> PathData {
    let replaced = replace_cubics(path, tolerance, session);
    PathData::from_commands(merge_arcs(&replaced, session))
}
