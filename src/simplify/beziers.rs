//! Merging of runs of quadratic or cubic Béziers into fewer curves.
//!
//! A run comes from a single chunk, so it bends one way and has no corners or
//! extreme points inside it.  Replacements are built from the run's outer tangents
//! and accepted when their micro-path area deviates from the run's by less than the
//! tolerance.

use std::cmp::Ordering;

use crate::analyze::AnnotatedCommand;
use crate::geometry::{bezier_area, line_intersection, split_at_t, Controls, Point};
use crate::options::SimplifyOptions;
use crate::path_data::Command;

use super::arcs::quarter_arc;
use super::area::{area_deviation, controls_area, measure};

/// New control points sit at half this factor of the way from each endpoint to the
/// intersection of the tangents.
pub const TANGENT_EXTRAPOLATION: f64 = 1.333;

/// Runs of three or more curves are replaced by an arc when the deviation is below this
/// fraction of the tolerance.
pub const ARC_RUN_TOLERANCE_FACTOR: f64 = 0.75;

/// With `keep_details`, longer runs are bisected.
pub const MAX_RUN_LENGTH: usize = 4;

/// Replacement commands for a run, and their area deviation in percent.
#[derive(Debug, Clone, PartialEq)]
pub struct Fit {
    pub commands: Vec<Command>,
    pub deviation: f64,
}

#[derive(Debug, Clone)]
struct Curve {
    controls: Controls,
    flat: bool,
}

// The parts of a run that the constructions look at.
struct Span {
    p0: Point,
    /// A point on the tangent at `p0`, ahead of it.
    start_handle: Point,
    /// A point on the tangent at `end`, behind it.
    end_handle: Point,
    end: Point,
    start_length: f64,
    end_length: f64,
}

impl Span {
    fn new(curves: &[Controls]) -> Option<Span> {
        let first = curves.first()?;
        let last = curves.last()?;

        let p0 = first[0];
        let end = last[last.len() - 1];

        // A handle may sit on its endpoint; the next control point gives the tangent.
        let start_handle = first[1..].iter().copied().find(|&c| c != p0)?;
        let end_handle = last[..last.len() - 1].iter().rev().copied().find(|&c| c != end)?;

        let start_length = curves.iter().map(|c| (c[1] - c[0]).length()).sum();
        let end_length = curves
            .iter()
            .map(|c| (c[c.len() - 1] - c[c.len() - 2]).length())
            .sum();

        Some(Span {
            p0,
            start_handle,
            end_handle,
            end,
            start_length,
            end_length,
        })
    }

    // Intersection of the tangents, if it lies ahead of both endpoints.
    fn tangent_intersection(&self) -> Option<Point> {
        let x = line_intersection(self.p0, self.start_handle, self.end_handle, self.end, false)?;

        let ahead_of_start = (x - self.p0).dot(self.start_handle - self.p0) > 0.0;
        let ahead_of_end = (x - self.end).dot(self.end_handle - self.end) > 0.0;

        if ahead_of_start && ahead_of_end {
            Some(x)
        } else {
            None
        }
    }

    fn quadratic(&self) -> Option<Command> {
        self.tangent_intersection()
            .map(|x| Command::quad_to(x, self.end))
    }

    fn extrapolated_cubic(&self) -> Option<Command> {
        let x = self.tangent_intersection()?;
        let k = TANGENT_EXTRAPOLATION / 2.0;

        Some(Command::curve_to(
            self.p0 + (x - self.p0) * k,
            self.end + (x - self.end) * k,
            self.end,
        ))
    }

    fn handle_sum_cubic(&self) -> Option<Command> {
        let d0 = (self.start_handle - self.p0).normalize()?;
        let d1 = (self.end_handle - self.end).normalize()?;

        Some(Command::curve_to(
            self.p0 + d0 * self.start_length,
            self.end + d1 * self.end_length,
            self.end,
        ))
    }
}

// The single curve from the constructions for this span that deviates least from
// `curves`, if any.
fn best_single(curves: &[Controls], quadratic: bool) -> Option<Fit> {
    let span = Span::new(curves)?;
    let original = controls_area(curves);

    let candidates = if quadratic {
        vec![span.quadratic()]
    } else {
        vec![span.extrapolated_cubic(), span.handle_sum_cubic()]
    };

    candidates
        .into_iter()
        .flatten()
        .filter_map(|command| {
            measure(span.p0, original, &[command]).map(|deviation| Fit {
                commands: vec![command],
                deviation,
            })
        })
        .min_by(|a, b| {
            a.deviation
                .partial_cmp(&b.deviation)
                .unwrap_or(Ordering::Equal)
        })
}

fn to_command(controls: &Controls) -> Command {
    match **controls {
        [_, p1, p2] => Command::quad_to(p1, p2),
        [_, p1, p2, p3] => Command::curve_to(p1, p2, p3),
        _ => Command::line_to(controls[controls.len() - 1]),
    }
}

fn unchanged(curves: &[Controls]) -> Fit {
    Fit {
        commands: curves.iter().map(to_command).collect(),
        deviation: 0.0,
    }
}

struct Fitter {
    tolerance: f64,
    force_cubic: bool,
    arcs: bool,

    /// Area of the closed subpath that the run belongs to.
    fill_area: Option<f64>,
}

impl Fitter {
    fn simplify(&self, curves: &[Curve], keep_details: bool) -> Fit {
        if keep_details && curves.len() > MAX_RUN_LENGTH && !curves.iter().all(|c| c.flat) {
            let (left, right) = curves.split_at(curves.len() / 2);

            let mut commands = self.simplify(left, keep_details).commands;
            commands.extend(self.simplify(right, keep_details).commands);

            let controls: Vec<Controls> = curves.iter().map(|c| c.controls.clone()).collect();

            // Each half is within tolerance of its own area, but not necessarily both.
            return match measure(controls[0][0], controls_area(&controls), &commands) {
                Some(deviation) if deviation < self.tolerance => Fit {
                    commands,
                    deviation,
                },
                _ => unchanged(&controls),
            };
        }

        self.fit(curves)
    }

    fn fit(&self, curves: &[Curve]) -> Fit {
        if curves.iter().all(|c| c.flat) {
            let deviation = self.flattening_deviation(curves);

            if deviation == 0.0 || deviation < self.tolerance {
                return Fit {
                    commands: curves
                        .iter()
                        .map(|c| Command::line_to(c.controls[c.controls.len() - 1]))
                        .collect(),
                    deviation,
                };
            }
        }

        let controls: Vec<Controls> = curves.iter().map(|c| c.controls.clone()).collect();

        self.try_fit(&controls).unwrap_or_else(|| unchanged(&controls))
    }

    // Straightening curves takes the area between them and their chords out of the
    // enclosing subpath.  Open subpaths enclose nothing.
    fn flattening_deviation(&self, curves: &[Curve]) -> f64 {
        let removed: f64 = curves.iter().map(|c| bezier_area(&c.controls)).sum();

        match self.fill_area {
            Some(_) if removed == 0.0 => 0.0,
            Some(fill) => area_deviation(fill, fill - removed),
            None => 0.0,
        }
    }

    fn try_fit(&self, curves: &[Controls]) -> Option<Fit> {
        let quadratic = curves[0].len() == 3;
        let accept = |fit: Fit| Some(fit).filter(|f| f.deviation < self.tolerance);

        match curves.len() {
            1 if quadratic || self.force_cubic => None,
            1 => best_single(curves, true).and_then(accept),
            2 => best_single(curves, quadratic).and_then(accept),
            _ => self
                .arc(curves)
                .or_else(|| best_single(curves, quadratic).and_then(accept))
                .or_else(|| self.pivot(curves, quadratic)),
        }
    }

    fn arc(&self, curves: &[Controls]) -> Option<Fit> {
        if !self.arcs {
            return None;
        }

        let span = Span::new(curves)?;
        let arc = quarter_arc(span.p0, span.start_handle, span.end_handle, span.end)?;
        let deviation = measure(span.p0, controls_area(curves), &[arc])?;

        if deviation < ARC_RUN_TOLERANCE_FACTOR * self.tolerance {
            Some(Fit {
                commands: vec![arc],
                deviation,
            })
        } else {
            None
        }
    }

    // Two curves meeting in the middle of the run.
    fn pivot(&self, curves: &[Controls], quadratic: bool) -> Option<Fit> {
        let n = curves.len();
        let mid = n / 2;

        let (left, right) = if n % 2 == 1 {
            let (a, b) = split_at_t(&curves[mid], 0.5);

            let mut left = curves[..mid].to_vec();
            left.push(a);

            let mut right = vec![b];
            right.extend_from_slice(&curves[mid + 1..]);

            (left, right)
        } else {
            (curves[..mid].to_vec(), curves[mid..].to_vec())
        };

        let first = best_single(&left, quadratic).filter(|f| f.deviation < self.tolerance)?;
        let second = best_single(&right, quadratic).filter(|f| f.deviation < self.tolerance)?;

        let mut commands = first.commands;
        commands.extend(second.commands);

        let deviation = measure(curves[0][0], controls_area(curves), &commands)?;

        if deviation < self.tolerance {
            Some(Fit {
                commands,
                deviation,
            })
        } else {
            None
        }
    }
}

/// Simplifies a run of QuadTo or CurveTo commands from one chunk.
///
/// The result starts at the run's first point and ends exactly at its last point.  If
/// no replacement is close enough, the run's commands are returned unchanged.
///
/// `fill_area` is the area of the run's subpath when the subpath is closed; flat curves
/// only become lines if that area changes by less than the tolerance.
pub fn simplify_curves(
    run: &[AnnotatedCommand],
    fill_area: Option<f64>,
    options: &SimplifyOptions,
) -> Fit {
    let curves: Option<Vec<Curve>> = run
        .iter()
        .map(|a| {
            a.controls()
                .filter(|_| a.is_curve())
                .map(|controls| Curve {
                    controls,
                    flat: a.flat,
                })
        })
        .collect();

    let curves = match curves {
        Some(curves) if !curves.is_empty() => curves,
        _ => {
            return Fit {
                commands: run.iter().map(|a| a.command).collect(),
                deviation: 0.0,
            }
        }
    };

    let fitter = Fitter {
        tolerance: options.tolerance,
        force_cubic: options.force_cubic,
        arcs: options.cubic_to_arc,
        fill_area,
    };

    if !options.multipass {
        return fitter.simplify(&curves, options.keep_details);
    }

    let coarse = fitter.simplify(&curves, false);
    let detailed = fitter.simplify(&curves, true);

    let tie = (coarse.deviation - detailed.deviation).abs() <= 1e-9;
    if (tie && detailed.commands.len() < coarse.commands.len())
        || (!tie && detailed.deviation < coarse.deviation)
    {
        detailed
    } else {
        coarse
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::analyze;
    use crate::assert_approx_eq_path;
    use crate::float_eq::ApproxEqPath;
    use crate::path_data::{CommandKind, PathData};
    use crate::simplify::area::micro_path_area;

    fn simplified_with(s: &str, options: &SimplifyOptions) -> Fit {
        let analysis = analyze(&s.parse::<PathData>().unwrap());
        simplify_curves(&analysis.commands[1..], None, options)
    }

    fn simplified(s: &str) -> Fit {
        simplified_with(s, &SimplifyOptions::default())
    }

    fn kinds(fit: &Fit) -> Vec<CommandKind> {
        fit.commands.iter().map(Command::kind).collect()
    }

    #[test]
    fn constants() {
        assert_eq!(TANGENT_EXTRAPOLATION, 1.333);
        assert_eq!(ARC_RUN_TOLERANCE_FACTOR, 0.75);
        assert_eq!(MAX_RUN_LENGTH, 4);
    }

    #[test]
    fn flat_curve_becomes_a_line() {
        let fit = simplified("M0 0 C1 0.01 2 0.01 3 0");
        assert_eq!(fit.commands, vec![Command::line_to(Point::new(3.0, 0.0))]);
    }

    #[test]
    fn reduces_cubic_to_quadratic() {
        // Degree elevation of Q5 10 10 0
        let p = 2.0 / 3.0;
        let s = format!("M0 0 C{} {} {} {} 10 0", 5.0 * p, 10.0 * p, 10.0 - 5.0 * p, 10.0 * p);

        let fit = simplified(&s);
        assert_eq!(kinds(&fit), vec![CommandKind::QuadTo]);
        assert!(fit.deviation < 1e-6);

        match fit.commands[0].controls(Point::new(0.0, 0.0)) {
            Some(c) => {
                assert_approx_eq_path!(c[1], Point::new(5.0, 10.0));
                assert_eq!(c[2], Point::new(10.0, 0.0));
            }
            None => panic!("expected a quadratic"),
        }
    }

    #[test]
    fn keeps_cubics_when_forced() {
        let s = "M0 0 C3.333 6.667 6.667 6.667 10 0";
        let options = SimplifyOptions::default().with_force_cubic(true);

        let fit = simplified_with(s, &options);
        assert_eq!(kinds(&fit), vec![CommandKind::CurveTo]);
        assert_eq!(fit.deviation, 0.0);
    }

    #[test]
    fn does_not_reduce_a_quarter_circle_to_a_quadratic() {
        let fit = simplified("M0 -10 C5.523 -10 10 -5.523 10 0");
        assert_eq!(
            fit.commands,
            vec![Command::curve_to(
                Point::new(5.523, -10.0),
                Point::new(10.0, -5.523),
                Point::new(10.0, 0.0)
            )]
        );
    }

    #[test]
    fn merges_two_halves_of_a_quarter_circle() {
        // Two 45° arcs of radius 10, as cubics
        let h = 10.0 * 4.0 / 3.0 * (std::f64::consts::PI / 16.0).tan();
        let m = 10.0 * std::f64::consts::FRAC_1_SQRT_2;
        let s = format!(
            "M0 -10 C{} -10 {} {} {} {} C{} {} 10 {} 10 0",
            h,
            m - h * m / 10.0,
            -m - h * m / 10.0,
            m,
            -m,
            m + h * m / 10.0,
            -m + h * m / 10.0,
            -h
        );

        let fit = simplified(&s);
        assert_eq!(kinds(&fit), vec![CommandKind::CurveTo]);
        assert!(fit.deviation < 5.0);
        assert_eq!(fit.commands[0].to(), Some(Point::new(10.0, 0.0)));
    }

    #[test]
    fn merges_quadratic_runs() {
        // Halves of Q5 10 10 0
        let fit = simplified("M0 0 Q2.5 5 5 5 Q7.5 5 10 0");
        assert_eq!(kinds(&fit), vec![CommandKind::QuadTo]);

        let c = fit.commands[0].controls(Point::new(0.0, 0.0)).unwrap();
        assert_approx_eq_path!(c[1], Point::new(5.0, 10.0));
    }

    #[test]
    fn replaces_long_quarter_runs_with_arcs() {
        // Three 30° arcs of radius 10 around the origin
        let h = 10.0 * 4.0 / 3.0 * (std::f64::consts::PI / 24.0).tan();
        let pt = |deg: f64| {
            let r = deg.to_radians();
            Point::new(10.0 * r.cos(), 10.0 * r.sin())
        };
        let tangent = |deg: f64| {
            let r = deg.to_radians();
            Point::new(-r.sin(), r.cos())
        };

        let mut s = String::from("M10 0");
        for i in 0..3 {
            let a = 30.0 * i as f64;
            let b = a + 30.0;
            let c1 = pt(a) + tangent(a) * h;
            let c2 = pt(b) - tangent(b) * h;
            let p = pt(b);
            s.push_str(&format!(" C{} {} {} {} {} {}", c1.x, c1.y, c2.x, c2.y, p.x, p.y));
        }

        let fit = simplified(&s);
        assert_eq!(kinds(&fit), vec![CommandKind::Arc]);
        assert!(fit.deviation < 0.75 * 5.0);
    }

    #[test]
    fn leaves_unmergeable_runs_alone() {
        let s = "M0 0 C0 10 1 11 10 11 C20 11 25 20 25 40";
        let fit = simplified_with(s, &SimplifyOptions::default().with_tolerance(0.001));

        assert_eq!(fit.commands.len(), 2);
        assert_eq!(fit.deviation, 0.0);
    }

    // Six quadratics along a gentle bend; the first one is flat.
    const BEND: &str = "M0 0 Q1 2 2 3.5 Q3 5 4 6 Q5 7 6 7.5 Q7 8 8 8.2 Q9 8.4 10 8.4 Q11 8.4 12 8.2";

    fn assert_commands_approx(fit: &Fit, expected: &str) {
        let expected = expected.parse::<PathData>().unwrap();
        let expected = &expected.commands()[1..];

        assert_eq!(fit.commands.len(), expected.len());
        for (a, b) in fit.commands.iter().zip(expected) {
            assert_eq!(a.kind(), b.kind());
            for (x, y) in a.values().into_iter().zip(b.values()) {
                assert!((x - y).abs() < 1e-9, "{} != {}", a, b);
            }
        }
    }

    #[test]
    fn bisects_long_runs_with_keep_details() {
        let expected = "M0 0 Q3 6 6 7.5 Q8.714285714285719 8.85714285714286 12 8.2";

        let options = SimplifyOptions::default().with_keep_details(true);
        let fit = simplified_with(BEND, &options);
        assert_commands_approx(&fit, expected);
        assert!((fit.deviation - 0.1768).abs() < 1e-3);

        // Five curves are bisected into two and three.
        let analysis = analyze(&BEND.parse::<PathData>().unwrap());
        let run = &analysis.commands[1..6];

        let fit = simplify_curves(run, None, &options);
        assert_commands_approx(&fit, "M0 0 Q2 4 4 6 Q6.4 8.4 10 8.4");
        assert!((fit.deviation - 0.3053).abs() < 1e-3);

        let fit = simplify_curves(run, None, &SimplifyOptions::default());
        assert_commands_approx(&fit, "M0 0 Q2.5 5 5 6.875 Q7.033333333333333 8.4 10 8.4");
        assert!((fit.deviation - 0.1177).abs() < 1e-3);
    }

    #[test]
    fn multipass_keeps_the_closer_result() {
        let analysis = analyze(&BEND.parse::<PathData>().unwrap());
        let run = &analysis.commands[1..6];

        let options = SimplifyOptions::default().with_multipass(true);
        let fit = simplify_curves(run, None, &options);

        assert_commands_approx(&fit, "M0 0 Q2.5 5 5 6.875 Q7.033333333333333 8.4 10 8.4");
        assert!((fit.deviation - 0.1177).abs() < 1e-3);
    }

    #[test]
    fn bisection_keeps_the_run_when_the_halves_add_up_too_far() {
        // A 60° bend of radius 20, then a tighter 90° bend the other way
        let s = "M0 0 Q3.53 0 6.84 1.21 Q10.15 2.41 12.86 4.68 Q15.56 6.95 17.32 10 \
                 Q18.18 11.5 19.68 12.36 Q21.18 13.22 22.91 13.22 Q24.63 13.22 26.13 12.36";
        let options = SimplifyOptions::default()
            .with_tolerance(20.0)
            .with_cubic_to_arc(false)
            .with_keep_details(true);

        let analysis = analyze(&s.parse::<PathData>().unwrap());
        let run = &analysis.commands[1..];

        let fit = simplify_curves(run, None, &options);
        let original: Vec<Command> = run.iter().map(|a| a.command).collect();

        assert_eq!(fit.commands, original);
        assert_eq!(fit.deviation, 0.0);
    }

    #[test]
    fn flat_curves_of_closed_subpaths_keep_the_fill() {
        let s = "M0 0 C10 0.5 20 0.5 30 0 C20 -0.5 10 -0.5 0 0";
        let analysis = analyze(&s.parse::<PathData>().unwrap());
        let run = &analysis.commands[1..];
        assert!(run.iter().all(|a| a.flat));

        let fill = micro_path_area(Point::new(0.0, 0.0), &[run[0].command, run[1].command]);

        let fit = simplify_curves(run, Some(fill), &SimplifyOptions::default());
        assert!(fit.commands.iter().all(|c| c.kind() == CommandKind::CurveTo));

        let fit = simplify_curves(run, None, &SimplifyOptions::default());
        assert_eq!(
            fit.commands,
            vec![
                Command::line_to(Point::new(30.0, 0.0)),
                Command::line_to(Point::new(0.0, 0.0))
            ]
        );

        // A slight bulge on one side of a large shape may go.
        let fit = simplify_curves(&run[..1], Some(1000.0), &SimplifyOptions::default());
        assert_eq!(fit.commands, vec![Command::line_to(Point::new(30.0, 0.0))]);
    }
}
