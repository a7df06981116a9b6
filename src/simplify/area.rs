//! Area measurements used to accept or reject replacement geometry.
//!
//! A run of commands from `p0` to `p`, closed by the chord back to `p0`, forms a small
//! closed path; we call its signed area the run's micro-path area.  A replacement is
//! only accepted when its micro-path area is close to the original's.

use crate::geometry::{
    arc_to_center_param, bezier_integral, segments_cross, square_distance, Controls, Point,
};
use crate::path_data::{Command, PathCommand};

/// Signed area enclosed by absolute commands starting at `p0` and the chord back to `p0`.
///
/// MoveTo and ClosePath contribute nothing.
pub fn micro_path_area(p0: Point, commands: &[Command]) -> f64 {
    // Integrals are taken relative to p0, so that far away coordinates do not cancel.
    let mut current = p0;
    let mut sum = 0.0;

    for command in commands {
        let to = match command.to() {
            Some(to) => to,
            None => continue,
        };

        sum += match command.segment {
            PathCommand::Arc(arc) => arc_to_center_param(
                current - p0,
                arc.r.0,
                arc.r.1,
                arc.x_axis_rotation,
                arc.large_arc.0,
                arc.sweep.is_positive(),
                to - p0,
            )
            .map(|center| center.integral())
            .unwrap_or_else(|_| bezier_integral(&[current - p0, to - p0])),

            PathCommand::MoveTo(_) => 0.0,

            _ => command
                .controls(current)
                .map_or(0.0, |controls| relative_integral(&controls, p0)),
        };

        current = to;
    }

    sum
}

fn relative_integral(controls: &[Point], origin: Point) -> f64 {
    let shifted: Controls = controls.iter().map(|c| *c - origin).collect();
    bezier_integral(&shifted)
}

/// Signed micro-path area of a sequence of Béziers given by their control points.
pub fn controls_area(curves: &[Controls]) -> f64 {
    let origin = match curves.first() {
        Some(first) => first[0],
        None => return 0.0,
    };

    // The chord back to the origin contributes nothing.
    curves.iter().map(|c| relative_integral(c, origin)).sum()
}

// Areas below this fraction of the squared size of the geometry are rounding noise.
const AREA_EPSILON: f64 = 1e-12;

/// Difference between two areas, in percent of the first one.
///
/// A zero original area makes any non-zero replacement infinitely far off.
pub fn area_deviation(original: f64, replacement: f64) -> f64 {
    if original == 0.0 {
        if replacement == 0.0 {
            0.0
        } else {
            f64::INFINITY
        }
    } else {
        (100.0 * (original - replacement) / original).abs()
    }
}

/// Whether the control polygon of a cubic crosses itself.
///
/// Such cubics have a loop or a cusp that the original geometry did not have.
pub fn control_polygon_crosses(controls: &[Point]) -> bool {
    match *controls {
        [p0, c1, c2, p] => segments_cross(p0, c1, c2, p) || segments_cross(c1, c2, p, p0),
        _ => false,
    }
}

/// Measures a replacement for a run starting at `p0` whose micro-path area is
/// `original`.
///
/// Returns the area deviation in percent, or `None` if the replacement must be
/// rejected outright: when one of its cubics has a self-crossing control polygon, or
/// when it encloses area on the other side of the chord.
pub fn measure(p0: Point, original: f64, replacement: &[Command]) -> Option<f64> {
    let mut current = p0;
    let mut size2: f64 = 0.0;

    for command in replacement {
        if let Some(controls) = command.controls(current) {
            if control_polygon_crosses(&controls) {
                return None;
            }

            size2 = controls
                .iter()
                .fold(size2, |s, c| s.max(square_distance(p0, *c)));
        }

        current = command.to().unwrap_or(current);
        size2 = size2.max(square_distance(p0, current));
    }

    let area = micro_path_area(p0, replacement);

    let noise = AREA_EPSILON * size2;
    let (original, area) = (flush_noise(original, noise), flush_noise(area, noise));

    if original * area < 0.0 {
        return None;
    }

    Some(area_deviation(original, area))
}

fn flush_noise(area: f64, noise: f64) -> f64 {
    if area.abs() <= noise {
        0.0
    } else {
        area
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path_data::{LargeArc, Sweep};
    use float_cmp::approx_eq;

    const K: f64 = 5.523;

    #[test]
    fn micro_path_area_of_lines() {
        let p0 = Point::new(0.0, 0.0);
        let commands = [
            Command::line_to(Point::new(10.0, 0.0)),
            Command::line_to(Point::new(10.0, 10.0)),
        ];

        assert!(approx_eq!(f64, micro_path_area(p0, &commands), 50.0, epsilon = 1e-9));
    }

    #[test]
    fn micro_path_area_of_curves_matches_controls_area() {
        let p0 = Point::new(0.0, -10.0);
        let cubic = Command::curve_to(
            Point::new(K, -10.0),
            Point::new(10.0, -K),
            Point::new(10.0, 0.0),
        );
        let controls = cubic.controls(p0).unwrap();

        let a = micro_path_area(p0, &[cubic]);
        assert!(approx_eq!(f64, a, controls_area(&[controls]), epsilon = 1e-9));

        // Quarter circle minus the triangle under the chord
        let expected = 25.0 * std::f64::consts::PI - 50.0;
        assert!((a.abs() - expected).abs() < 0.05);
    }

    #[test]
    fn micro_path_area_of_arcs() {
        let p0 = Point::new(-10.0, 0.0);
        let arc = Command::arc(
            (10.0, 10.0),
            0.0,
            LargeArc(false),
            Sweep::Positive,
            Point::new(10.0, 0.0),
        );

        let a = micro_path_area(p0, &[arc]);
        assert!(approx_eq!(
            f64,
            a.abs(),
            50.0 * std::f64::consts::PI,
            epsilon = 1e-6
        ));
    }

    #[test]
    fn deviation_is_relative() {
        assert!(approx_eq!(f64, area_deviation(100.0, 95.0), 5.0, epsilon = 1e-12));
        assert!(approx_eq!(f64, area_deviation(-100.0, -110.0), 10.0, epsilon = 1e-12));
        assert_eq!(area_deviation(0.0, 0.0), 0.0);
        assert_eq!(area_deviation(0.0, 1.0), f64::INFINITY);
    }

    #[test]
    fn detects_crossing_control_polygons() {
        let crossed = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
            Point::new(10.0, 0.0),
        ];
        assert!(control_polygon_crosses(&crossed));

        let convex = [
            Point::new(0.0, 0.0),
            Point::new(0.0, 10.0),
            Point::new(10.0, 10.0),
            Point::new(10.0, 0.0),
        ];
        assert!(!control_polygon_crosses(&convex));
    }

    #[test]
    fn rejects_replacements_on_the_other_side() {
        let p0 = Point::new(0.0, 0.0);
        let original = micro_path_area(
            p0,
            &[Command::quad_to(Point::new(5.0, 10.0), Point::new(10.0, 0.0))],
        );

        let same_side = [Command::quad_to(Point::new(5.0, 9.0), Point::new(10.0, 0.0))];
        let deviation = measure(p0, original, &same_side).unwrap();
        assert!(approx_eq!(f64, deviation, 10.0, epsilon = 1e-9));

        let other_side = [Command::quad_to(Point::new(5.0, -10.0), Point::new(10.0, 0.0))];
        assert_eq!(measure(p0, original, &other_side), None);
    }

    #[test]
    fn deviation_does_not_depend_on_scale() {
        let p0 = Point::new(0.0, 0.0);

        for scale in [1e-6, 1.0, 1e6] {
            let original = micro_path_area(
                p0,
                &[Command::quad_to(Point::new(5.0 * scale, 10.0 * scale), Point::new(10.0 * scale, 0.0))],
            );

            let replacement =
                [Command::quad_to(Point::new(5.0 * scale, 9.0 * scale), Point::new(10.0 * scale, 0.0))];
            let deviation = measure(p0, original, &replacement).unwrap();
            assert!(approx_eq!(f64, deviation, 10.0, epsilon = 1e-6), "{}", scale);
        }
    }

    #[test]
    fn areas_far_from_the_origin_are_exact() {
        let p0 = Point::new(1e6, 1e6);
        let commands = [
            Command::line_to(Point::new(1e6 + 10.0, 1e6)),
            Command::line_to(Point::new(1e6 + 10.0, 1e6 + 10.0)),
        ];
        assert_eq!(micro_path_area(p0, &commands), 50.0);

        let to = Point::new(1e6 + 3.0, 1e6 + 3.0);
        let straight = [Command::line_to(Point::new(1e6 + 1.0, 1e6 + 1.0)), Command::line_to(to)];
        let original = micro_path_area(p0, &straight);
        assert_eq!(measure(p0, original, &[Command::line_to(to)]), Some(0.0));
    }
}
