//! Conversion of path data to absolute, long-hand commands.
//!
//! The analyzer and the simplifier only deal with MoveTo, LineTo, CurveTo, QuadTo, Arc
//! and ClosePath, all with absolute coordinates.  These functions rewrite anything else
//! into those terms without changing the geometry.

use crate::geometry::Point;
use crate::path_data::*;

/// Makes every command absolute.
///
/// Arc radii are also made positive, since their sign has no meaning.
pub fn to_absolute(path: &PathData) -> PathData {
    let mut current = Point::default();
    let mut subpath_start = Point::default();

    let commands = path
        .iter()
        .map(|command| {
            let offset = if command.relative {
                current
            } else {
                Point::default()
            };

            let segment = match command.segment {
                PathCommand::MoveTo(p) => PathCommand::MoveTo(p + offset),
                PathCommand::LineTo(p) => PathCommand::LineTo(p + offset),
                PathCommand::HorizontalLineTo(x) => PathCommand::HorizontalLineTo(x + offset.x),
                PathCommand::VerticalLineTo(y) => PathCommand::VerticalLineTo(y + offset.y),
                PathCommand::CurveTo(c) => PathCommand::CurveTo(CubicBezierCurve {
                    pt1: c.pt1 + offset,
                    pt2: c.pt2 + offset,
                    to: c.to + offset,
                }),
                PathCommand::SmoothCurveTo(c) => {
                    PathCommand::SmoothCurveTo(SmoothCubicBezierCurve {
                        pt2: c.pt2 + offset,
                        to: c.to + offset,
                    })
                }
                PathCommand::QuadTo(c) => PathCommand::QuadTo(QuadraticBezierCurve {
                    pt1: c.pt1 + offset,
                    to: c.to + offset,
                }),
                PathCommand::SmoothQuadTo(p) => PathCommand::SmoothQuadTo(p + offset),
                PathCommand::Arc(a) => PathCommand::Arc(EllipticalArc {
                    r: (a.r.0.abs(), a.r.1.abs()),
                    to: a.to + offset,
                    ..a
                }),
                PathCommand::ClosePath => PathCommand::ClosePath,
            };

            current = command.end_point(current, subpath_start);
            if command.kind() == CommandKind::MoveTo {
                subpath_start = current;
            }

            Command::absolute(segment)
        })
        .collect();

    PathData::from_commands(commands)
}

/// Expands H and V into LineTo, S into CurveTo, and T into QuadTo.
///
/// Relative commands are made absolute first.  The first control point of S and T is
/// the reflection of the previous command's last control point about the current
/// point, or the current point itself if the previous command was not of the same
/// kind.
pub fn to_longhand(path: &PathData) -> PathData {
    let absolute;
    let path = if path.iter().any(|c| c.relative) {
        absolute = to_absolute(path);
        &absolute
    } else {
        path
    };

    let mut current = Point::default();
    let mut subpath_start = Point::default();

    // Last control point of the previous cubic or quadratic, for reflection.
    let mut cubic_reflection: Option<Point> = None;
    let mut quadratic_reflection: Option<Point> = None;

    let reflect = |ctrl: Option<Point>, current: Point| match ctrl {
        Some(p) => current * 2.0 - p,
        None => current,
    };

    let commands = path
        .iter()
        .map(|command| {
            let (command, cubic_ctrl, quadratic_ctrl) = match command.segment {
                PathCommand::HorizontalLineTo(x) => {
                    (Command::line_to(Point::new(x, current.y)), None, None)
                }

                PathCommand::VerticalLineTo(y) => {
                    (Command::line_to(Point::new(current.x, y)), None, None)
                }

                PathCommand::CurveTo(c) => (*command, Some(c.pt2), None),

                PathCommand::SmoothCurveTo(c) => {
                    let pt1 = reflect(cubic_reflection, current);
                    (Command::curve_to(pt1, c.pt2, c.to), Some(c.pt2), None)
                }

                PathCommand::QuadTo(c) => (*command, None, Some(c.pt1)),

                PathCommand::SmoothQuadTo(to) => {
                    let pt1 = reflect(quadratic_reflection, current);
                    (Command::quad_to(pt1, to), None, Some(pt1))
                }

                _ => (*command, None, None),
            };

            cubic_reflection = cubic_ctrl;
            quadratic_reflection = quadratic_ctrl;

            current = command.end_point(current, subpath_start);
            if command.kind() == CommandKind::MoveTo {
                subpath_start = current;
            }

            command
        })
        .collect();

    PathData::from_commands(commands)
}

/// Converts path data to absolute, long-hand commands, skipping the work when it is
/// already in that form.
pub fn normalize(path: &PathData) -> PathData {
    if path.is_absolute_longhand() {
        path.clone()
    } else {
        to_longhand(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalized(s: &str) -> String {
        normalize(&s.parse::<PathData>().unwrap()).to_string()
    }

    #[test]
    fn makes_commands_absolute() {
        let path: PathData = "m10 10 l5 0 c1 1 2 2 3 3 z l1 1 m5 5 a-2 3 0 0 1 4 0"
            .parse()
            .unwrap();

        assert_eq!(
            to_absolute(&path).to_string(),
            "M10 10 L15 10 C16 11 17 12 18 13 Z M10 10 L11 11 M16 16 A2 3 0 0 1 20 16"
        );
    }

    #[test]
    fn expands_horizontal_and_vertical_lines() {
        assert_eq!(normalized("M10 10 H20 V30 h-5 v-5"), "M10 10 L20 10 L20 30 L15 30 L15 25");
    }

    #[test]
    fn reflects_cubic_control_points() {
        assert_eq!(
            normalized("M0 0 C0 10 10 10 10 0 S20 -10 20 0"),
            "M0 0 C0 10 10 10 10 0 C10 -10 20 -10 20 0"
        );

        // Without a previous cubic, the current point is the control point
        assert_eq!(
            normalized("M0 0 L5 0 S10 10 10 0"),
            "M0 0 L5 0 C5 0 10 10 10 0"
        );
    }

    #[test]
    fn reflects_quadratic_control_points() {
        assert_eq!(
            normalized("M0 0 Q5 10 10 0 T20 0 t10 0"),
            "M0 0 Q5 10 10 0 Q15 -10 20 0 Q25 10 30 0"
        );

        assert_eq!(normalized("M0 0 T10 0"), "M0 0 Q0 0 10 0");
    }

    #[test]
    fn leaves_normalized_data_alone() {
        let path: PathData = "M0 0 L1 1 C1 2 3 4 5 6 Z".parse().unwrap();
        assert!(path.is_absolute_longhand());
        assert_eq!(normalize(&path), path);
    }
}
