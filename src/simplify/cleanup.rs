//! Removal of commands that draw nothing, and normalization of closed subpaths' start.

use crate::float_eq::ApproxEqPath;
use crate::geometry::{distance, Point};
use crate::path_data::{Command, CommandKind, PathCommand, PathData};
use crate::rect::Rect;
use crate::session::Session;
use crate::svgpath_log;

/// LineTo commands shorter than this fraction of the subpath's size are dropped.
pub const SHORT_LINE_RATIO: f64 = 1e-4;

fn is_drawing(command: &Command) -> bool {
    !matches!(command.kind(), CommandKind::MoveTo | CommandKind::ClosePath)
}

// Whether an absolute command starting at `from` stays on that point.
fn is_zero_length(command: &Command, from: Point) -> bool {
    let to = match command.to() {
        Some(to) => to,
        None => return false,
    };

    match command.segment {
        PathCommand::CurveTo(c) => [c.pt1, c.pt2, to].iter().all(|p| p.approx_eq_path(from)),
        PathCommand::QuadTo(c) => [c.pt1, to].iter().all(|p| p.approx_eq_path(from)),
        _ => to.approx_eq_path(from),
    }
}

// A MoveTo immediately followed by another one moves nowhere.
fn drop_repeated_moves(path: &PathData) -> Vec<Command> {
    let commands = path.commands();

    commands
        .iter()
        .enumerate()
        .filter(|(i, c)| {
            c.kind() != CommandKind::MoveTo
                || commands
                    .get(i + 1)
                    .map_or(true, |next| next.kind() != CommandKind::MoveTo)
        })
        .map(|(_, c)| *c)
        .collect()
}

// Drops zero-length and very short commands, and a LineTo back to the start that a
// ClosePath would draw anyway.
fn drop_degenerate(commands: &[Command], start: Point) -> Vec<Command> {
    let mut current = start;
    let size = Rect::from_points(
        std::iter::once(start).chain(commands.iter().filter_map(Command::to)),
    )
    .map_or(0.0, |r| r.max_dimension());
    let min_line = SHORT_LINE_RATIO * size;

    let mut drawing = commands.iter().filter(|c| is_drawing(c)).count();
    let mut out: Vec<Command> = Vec::with_capacity(commands.len());

    for command in commands {
        if !is_drawing(command) {
            out.push(*command);
            current = command.end_point(current, start);
            continue;
        }

        let to = command.to().unwrap_or(current);
        let short = command.kind() == CommandKind::LineTo && distance(current, to) < min_line;

        if (short || is_zero_length(command, current)) && drawing > 1 {
            drawing -= 1;
            continue;
        }

        out.push(*command);
        current = to;
    }

    let n = out.len();
    if n >= 3 && out[n - 1].kind() == CommandKind::ClosePath && drawing > 1 {
        let last = out[n - 2];
        if last.kind() == CommandKind::LineTo && last.to().map_or(false, |p| p.approx_eq_path(start))
        {
            out.remove(n - 2);
        }
    }

    out
}

// For a closed subpath that starts between two curves, away from its bounding box,
// moves the start to the nearest vertex that is a line endpoint or on the box.
fn rotate_start(commands: Vec<Command>, start: Point) -> Vec<Command> {
    let n = commands.len();
    if n < 4 || commands[n - 1].kind() != CommandKind::ClosePath {
        return commands;
    }

    let draws = &commands[1..n - 1];
    if !draws.iter().all(is_drawing) {
        return commands;
    }

    let ends: Option<Vec<Point>> = draws.iter().map(Command::to).collect();
    let ends = match ends {
        Some(ends) => ends,
        None => return commands,
    };

    let is_line = |i: usize| draws[i].kind() == CommandKind::LineTo;
    let m = draws.len();

    // The start is a line endpoint, or ClosePath draws a line to it.
    if is_line(0) || is_line(m - 1) || !ends[m - 1].approx_eq_path(start) {
        return commands;
    }

    let bounds = match Rect::from_points(ends.iter().copied()) {
        Some(bounds) => bounds,
        None => return commands,
    };

    if bounds.touches_edge(start) {
        return commands;
    }

    // ends[k] is the vertex between draws[k] and draws[k + 1].
    let candidate = (0..m - 1)
        .filter(|&k| is_line(k) || is_line(k + 1) || bounds.touches_edge(ends[k]))
        .min_by(|&a, &b| {
            distance(start, ends[a])
                .partial_cmp(&distance(start, ends[b]))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    match candidate {
        Some(k) => std::iter::once(Command::move_to(ends[k]))
            .chain(draws[k + 1..].iter().copied())
            .chain(draws[..=k].iter().copied())
            .chain(std::iter::once(Command::close_path()))
            .collect(),
        None => commands,
    }
}

/// Cleans up absolute, long-hand path data.
///
/// Repeated MoveTo commands are collapsed to the last one.  In each subpath,
/// zero-length commands and LineTo commands shorter than [`SHORT_LINE_RATIO`] of the
/// subpath's size are dropped, except when that would leave nothing to draw, and so is
/// a final LineTo back to the start before ClosePath.  Closed subpaths that start in the
/// middle of a smooth run of curves are rotated to start at a nearby vertex that is a
/// line endpoint or an extreme.
pub fn cleanup(path: &PathData, session: &Session) -> PathData {
    let moves = PathData::from_commands(drop_repeated_moves(path));

    let mut out = Vec::with_capacity(moves.len());
    for subpath in moves.iter_subpath() {
        let start = subpath.origin();
        let commands = drop_degenerate(subpath.commands(), start);
        out.extend(rotate_start(commands, start));
    }

    if out.len() != path.len() {
        svgpath_log!(
            session,
            "cleanup: {} commands, from {}",
            out.len(),
            path.len()
        );
    }

    PathData::from_commands(out)
}
