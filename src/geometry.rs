//! Geometry kernel: points, intersections, Bézier evaluation, areas and arcs.
//!
//! Everything in here is a pure function over [`Point`] values.  The simplifier makes
//! all of its decisions from ratios of the areas computed here, so these functions
//! avoid approximations: areas of Bézier curves and elliptical arcs are computed in
//! closed form.
//!
//! Bézier curves are passed around as slices of 2, 3 or 4 points (a line, a quadratic
//! or a cubic), starting with the on-path start point and ending with the on-path end
//! point.

use std::cmp::Ordering;
use std::f64::consts::PI;
use std::ops::{Add, Mul, Neg, Sub};

use itertools::Itertools;
use tinyvec::ArrayVec;

use crate::error::GeometryError;
use crate::float_eq::ApproxEqPath;

/// Two lines are parallel when the sine of the angle between them is below this.
const PARALLEL_EPSILON: f64 = 1e-9;

/// Roots of the derivative closer than this to 0 or 1 are not interior extrema.
const T_EPSILON: f64 = 1e-9;

/// A point or a vector in the plane.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Point {
        Point { x, y }
    }

    /// Linear interpolation; `t = 0` is `self`, `t = 1` is `other`.
    #[inline]
    pub fn lerp(self, other: Point, t: f64) -> Point {
        self + (other - self) * t
    }

    #[inline]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    #[inline]
    pub fn dot(self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// The z component of the 3D cross product; positive when `other` turns
    /// counterclockwise from `self` in a y-up frame.
    #[inline]
    pub fn cross(self, other: Point) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// A unit vector in the same direction, or `None` for the zero vector.
    pub fn normalize(self) -> Option<Point> {
        let len = self.length();
        if len > 0.0 && len.is_finite() {
            Some(self * (1.0 / len))
        } else {
            None
        }
    }

    pub fn midpoint(self, other: Point) -> Point {
        self.lerp(other, 0.5)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, s: f64) -> Point {
        Point::new(self.x * s, self.y * s)
    }
}

impl Neg for Point {
    type Output = Point;

    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

/// Control points of a line, quadratic or cubic Bézier.
pub type Controls = ArrayVec<[Point; 4]>;

pub fn distance(a: Point, b: Point) -> f64 {
    (b - a).length()
}

pub fn square_distance(a: Point, b: Point) -> f64 {
    let d = b - a;
    d.dot(d)
}

/// Direction angle of the vector from `p1` to `p2`, in radians.
///
/// The result is in `(-π, π]`, or in `[0, 2π)` if `normalize` is true.
pub fn angle(p1: Point, p2: Point, normalize: bool) -> f64 {
    let a = (p2.y - p1.y).atan2(p2.x - p1.x);

    if normalize && a < 0.0 {
        a + 2.0 * PI
    } else {
        a
    }
}

/// Signed difference `b - a` between two direction angles, wrapped to `(-π, π]`.
pub fn angle_difference(a: f64, b: f64) -> f64 {
    let mut d = (b - a) % (2.0 * PI);

    if d > PI {
        d -= 2.0 * PI;
    } else if d <= -PI {
        d += 2.0 * PI;
    }

    d
}

/// Intersection of the line through `p1` and `p2` with the line through `p3` and `p4`.
///
/// Returns `None` if the lines are parallel or either of them is degenerate.  If
/// `exact` is true, the intersection must also lie on both segments.
pub fn line_intersection(p1: Point, p2: Point, p3: Point, p4: Point, exact: bool) -> Option<Point> {
    let (ua, ub) = intersection_params(p1, p2, p3, p4)?;

    if exact && !((0.0..=1.0).contains(&ua) && (0.0..=1.0).contains(&ub)) {
        return None;
    }

    Some(p1.lerp(p2, ua))
}

/// Whether the segments `p1p2` and `p3p4` cross at a point interior to both.
///
/// Touching at an endpoint is not a crossing.
pub fn segments_cross(p1: Point, p2: Point, p3: Point, p4: Point) -> bool {
    const INTERIOR: f64 = 1e-9;

    match intersection_params(p1, p2, p3, p4) {
        Some((ua, ub)) => {
            ua > INTERIOR && ua < 1.0 - INTERIOR && ub > INTERIOR && ub < 1.0 - INTERIOR
        }
        None => false,
    }
}

// Parameters along p1p2 and p3p4 of the intersection of both lines.
fn intersection_params(p1: Point, p2: Point, p3: Point, p4: Point) -> Option<(f64, f64)> {
    let d1 = p2 - p1;
    let d2 = p4 - p3;

    let denom = d1.cross(d2);
    if denom == 0.0 || denom.abs() <= PARALLEL_EPSILON * d1.length() * d2.length() {
        return None;
    }

    let r = p3 - p1;
    Some((r.cross(d2) / denom, r.cross(d1) / denom))
}

// One step of De Casteljau's algorithm per level; returns the control points of the
// left and right halves.
fn de_casteljau(points: &[Point], t: f64) -> (Controls, Controls) {
    debug_assert!((2..=4).contains(&points.len()));

    let mut level: Controls = points.iter().copied().collect();
    let mut left = Controls::new();
    let mut right = Controls::new();

    left.push(level[0]);
    right.push(level[level.len() - 1]);

    while level.len() > 1 {
        level = level
            .iter()
            .tuple_windows()
            .map(|(a, b)| a.lerp(*b, t))
            .collect();

        left.push(level[0]);
        right.push(level[level.len() - 1]);
    }

    right.reverse();
    (left, right)
}

/// Point on a Bézier at parameter `t`.
pub fn point_at_t(points: &[Point], t: f64) -> Point {
    let (left, _) = de_casteljau(points, t);
    left[left.len() - 1]
}

/// Direction angle of a Bézier's tangent at parameter `t`.
pub fn tangent_at_t(points: &[Point], t: f64) -> f64 {
    let (left, right) = de_casteljau(points, t);
    let (a, b) = (left[left.len() - 2], right[1]);

    if a.approx_eq_path(b) {
        // A handle collapsed onto its endpoint; the chord gives the direction.
        angle(points[0], points[points.len() - 1], false)
    } else {
        angle(a, b, false)
    }
}

/// Splits a Bézier at parameter `t` into two Béziers of the same degree.
pub fn split_at_t(points: &[Point], t: f64) -> (Controls, Controls) {
    de_casteljau(points, t)
}

fn solve_quadratic(a: f64, b: f64, c: f64) -> ArrayVec<[f64; 2]> {
    let mut roots = ArrayVec::new();

    if a.abs() < 1e-12 {
        if b != 0.0 {
            roots.push(-c / b);
        }
        return roots;
    }

    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return roots;
    }

    let sq = disc.sqrt();
    roots.push((-b + sq) / (2.0 * a));
    if sq > 0.0 {
        roots.push((-b - sq) / (2.0 * a));
    }
    roots
}

/// Parameters in `(0, 1)` where a quadratic or cubic Bézier has a horizontal or
/// vertical tangent, sorted and deduplicated.
pub fn bezier_extreme_t(points: &[Point]) -> ArrayVec<[f64; 4]> {
    let axes: [fn(&Point) -> f64; 2] = [|p| p.x, |p| p.y];
    let mut ts = ArrayVec::<[f64; 4]>::new();

    if !(3..=4).contains(&points.len()) {
        return ts;
    }

    for coord in axes.iter() {
        let v: ArrayVec<[f64; 4]> = points.iter().map(coord).collect();

        let roots = match points.len() {
            3 => {
                let denom = v[0] - 2.0 * v[1] + v[2];
                let mut r = ArrayVec::<[f64; 2]>::new();
                if denom != 0.0 {
                    r.push((v[0] - v[1]) / denom);
                }
                r
            }

            4 => {
                let a = 3.0 * (-v[0] + 3.0 * v[1] - 3.0 * v[2] + v[3]);
                let b = 6.0 * (v[0] - 2.0 * v[1] + v[2]);
                let c = 3.0 * (v[1] - v[0]);
                solve_quadratic(a, b, c)
            }

            _ => ArrayVec::new(),
        };

        for t in roots {
            if t > T_EPSILON && t < 1.0 - T_EPSILON {
                ts.push(t);
            }
        }
    }

    ts.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    ts.into_iter().dedup_by(|a, b| a.approx_eq_path(*b)).collect()
}

/// Largest distance from a Bézier to the line through its endpoints.
///
/// For a closed curve, whose endpoints coincide, this is the largest distance from
/// the endpoint to a control point.
pub fn chord_distance(points: &[Point]) -> f64 {
    let (first, last) = match points {
        [first, .., last] => (*first, *last),
        _ => return 0.0,
    };

    let axis = match (last - first).normalize() {
        Some(axis) => axis,
        None => {
            return points
                .iter()
                .map(|p| distance(first, *p))
                .fold(0.0, f64::max)
        }
    };

    // Heights over the chord are a Bézier of the same degree.
    let heights: Controls = points
        .iter()
        .map(|p| Point::new(axis.dot(*p - first), axis.cross(*p - first)))
        .collect();

    bezier_extreme_t(&heights)
        .into_iter()
        .map(|t| point_at_t(&heights, t).y.abs())
        .fold(0.0, f64::max)
}

/// Signed area of a polygon by the shoelace formula.
///
/// Positive for counterclockwise polygons in a y-up frame.
pub fn polygon_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let sum: f64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.cross(*b))
        .sum();

    0.5 * sum
}

/// Degree elevation of a quadratic Bézier to the equivalent cubic.
pub fn elevate_quadratic(p0: Point, p1: Point, p2: Point) -> [Point; 4] {
    [
        p0,
        p0 + (p1 - p0) * (2.0 / 3.0),
        p2 + (p1 - p2) * (2.0 / 3.0),
        p2,
    ]
}

/// The Green's theorem contribution `½∫(x dy − y dx)` of a line, quadratic or cubic.
///
/// Summing this over every segment of a closed path gives its signed area.
pub fn bezier_integral(points: &[Point]) -> f64 {
    match *points {
        [p0, p1] => 0.5 * p0.cross(p1),

        [p0, p1, p2] => bezier_integral(&elevate_quadratic(p0, p1, p2)),

        [p0, p1, p2, p3] => {
            let (x0, y0) = (p0.x, p0.y);
            let (x1, y1) = (p1.x, p1.y);
            let (x2, y2) = (p2.x, p2.y);
            let (x3, y3) = (p3.x, p3.y);

            3.0 * ((y3 - y0) * (x1 + x2) - (x3 - x0) * (y1 + y2) + y1 * (x0 - x2)
                - x1 * (y0 - y2)
                + y3 * (x2 + x0 / 3.0)
                - x3 * (y2 + y0 / 3.0))
                / 20.0
        }

        _ => 0.0,
    }
}

/// Signed area of the loop formed by a Bézier and its chord.
pub fn bezier_area(points: &[Point]) -> f64 {
    match points {
        [first, .., last] => bezier_integral(points) + 0.5 * last.cross(*first),
        _ => 0.0,
    }
}

/// Area of the sector of an axis-aligned ellipse between two polar angles.
///
/// The angles are measured from the center, as opposed to the parametric angles
/// used by [`ArcCenter`].  The result is signed like `end - start`.
pub fn ellipse_sector_area(rx: f64, ry: f64, start: f64, end: f64) -> f64 {
    // Maps a polar angle to the parametric angle of the same point, continuously.
    let parametric = |theta: f64| {
        let (s, c) = (2.0 * theta).sin_cos();
        theta - ((ry - rx) * s).atan2(ry + rx + (ry - rx) * c)
    };

    0.5 * rx * ry * (parametric(end) - parametric(start))
}

/// Center parameterization of an elliptical arc.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ArcCenter {
    pub center: Point,
    /// Radii, corrected so that the arc reaches both endpoints.
    pub rx: f64,
    pub ry: f64,
    /// Rotation of the ellipse's x axis, in radians.
    pub phi: f64,
    /// Parametric angle of the start point.
    pub theta1: f64,
    /// Parametric sweep to the end point; positive for a positive-angle sweep.
    pub delta_theta: f64,
}

impl ArcCenter {
    pub fn theta2(&self) -> f64 {
        self.theta1 + self.delta_theta
    }

    /// Point on the ellipse at parametric angle `theta`.
    pub fn point_at(&self, theta: f64) -> Point {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_th, cos_th) = theta.sin_cos();
        let (x, y) = (self.rx * cos_th, self.ry * sin_th);

        Point::new(
            self.center.x + cos_phi * x - sin_phi * y,
            self.center.y + sin_phi * x + cos_phi * y,
        )
    }

    // Polar angle (in the ellipse's own frame) of the point at `theta`, kept
    // within a quarter turn of `theta` so that sweeps stay unwrapped.
    fn polar_angle(&self, theta: f64) -> f64 {
        let polar = (self.ry * theta.sin()).atan2(self.rx * theta.cos());
        theta + angle_difference(theta, polar)
    }

    /// Signed area swept by the radius vector from the center along the arc.
    pub fn sector_area(&self) -> f64 {
        ellipse_sector_area(
            self.rx,
            self.ry,
            self.polar_angle(self.theta1),
            self.polar_angle(self.theta2()),
        )
    }

    /// The Green's theorem contribution of the arc, like [`bezier_integral`].
    pub fn integral(&self) -> f64 {
        let from = self.point_at(self.theta1);
        let to = self.point_at(self.theta2());

        self.sector_area()
            + 0.5 * (self.center.x * (to.y - from.y) - self.center.y * (to.x - from.x))
    }
}

/// Converts an arc from SVG's endpoint parameterization to a center parameterization.
///
/// Radii that are too small to reach both endpoints are scaled up uniformly.
///
/// See section [B.2.4. Conversion from endpoint to center
/// parameterization](https://www.w3.org/TR/SVG2/implnote.html#ArcConversionEndpointToCenter)
#[allow(clippy::too_many_arguments)]
pub fn arc_to_center_param(
    from: Point,
    rx: f64,
    ry: f64,
    x_axis_rotation: f64,
    large_arc: bool,
    sweep: bool,
    to: Point,
) -> Result<ArcCenter, GeometryError> {
    if from.approx_eq_path(to) {
        return Err(GeometryError::CoincidentEndpoints);
    }

    // We divide by the square of the radii further down.
    if rx * rx < f64::EPSILON || ry * ry < f64::EPSILON {
        return Err(GeometryError::ZeroRadius);
    }

    let mut rx = rx.abs();
    let mut ry = ry.abs();

    // A circle whose endpoints are diametrically opposed.
    if rx.approx_eq_path(ry) && distance(from, to).approx_eq_path(2.0 * rx) {
        let center = from.midpoint(to);
        return Ok(ArcCenter {
            center,
            rx,
            ry: rx,
            phi: 0.0,
            theta1: angle(center, from, false),
            delta_theta: if sweep { PI } else { -PI },
        });
    }

    let phi = x_axis_rotation.to_radians();
    let (sin_phi, cos_phi) = phi.sin_cos();

    // Translate the origin to the midpoint of the chord and rotate the axes to line up
    // with the ellipse's; primed coordinates are in that frame.
    let mid = (from - to) * 0.5;
    let x1_ = cos_phi * mid.x + sin_phi * mid.y;
    let y1_ = -sin_phi * mid.x + cos_phi * mid.y;

    let lambda = (x1_ / rx).powi(2) + (y1_ / ry).powi(2);
    if lambda > 1.0 {
        rx *= lambda.sqrt();
        ry *= lambda.sqrt();
    }

    let d = (rx * y1_).powi(2) + (ry * x1_).powi(2);
    if d == 0.0 {
        return Err(GeometryError::CoincidentEndpoints);
    }

    let k = {
        let k = ((rx * ry).powi(2) / d - 1.0).abs().sqrt();
        if sweep == large_arc {
            -k
        } else {
            k
        }
    };
    let cx_ = k * rx * y1_ / ry;
    let cy_ = -k * ry * x1_ / rx;

    let center = Point::new(
        cos_phi * cx_ - sin_phi * cy_ + (from.x + to.x) / 2.0,
        sin_phi * cx_ + cos_phi * cy_ + (from.y + to.y) / 2.0,
    );

    let (ux, uy) = ((x1_ - cx_) / rx, (y1_ - cy_) / ry);
    let (vx, vy) = ((-x1_ - cx_) / rx, (-y1_ - cy_) / ry);

    let theta1 = uy.atan2(ux);
    let delta_theta = {
        let mut delta = (ux * vy - uy * vx).atan2(ux * vx + uy * vy);
        if sweep && delta < 0.0 {
            delta += 2.0 * PI;
        } else if !sweep && delta > 0.0 {
            delta -= 2.0 * PI;
        }
        delta
    };

    Ok(ArcCenter {
        center,
        rx,
        ry,
        phi,
        theta1,
        delta_theta,
    })
}
