//! Axis-aligned bounding boxes.

use crate::float_eq::ApproxEqPath;
use crate::geometry::Point;

// Use our own min() and max() that are acceptable for floating point

fn min(x: f64, y: f64) -> f64 {
    if x <= y {
        x
    } else {
        y
    }
}

fn max(x: f64, y: f64) -> f64 {
    if x >= y {
        x
    } else {
        y
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    #[inline]
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// A zero-sized rectangle at `p`.
    #[inline]
    pub fn from_point(p: Point) -> Self {
        Self::new(p.x, p.y, p.x, p.y)
    }

    /// The smallest rectangle containing all of `points`, or `None` for an empty iterator.
    pub fn from_points<I: IntoIterator<Item = Point>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Rect::from_point(first), |r, p| r.extend(p)))
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// The larger of width and height; used to scale relative tolerances.
    #[inline]
    pub fn max_dimension(&self) -> f64 {
        max(self.width(), self.height())
    }

    #[must_use]
    pub fn extend(&self, p: Point) -> Self {
        Self {
            x0: min(self.x0, p.x),
            y0: min(self.y0, p.y),
            x1: max(self.x1, p.x),
            y1: max(self.y1, p.y),
        }
    }

    /// Whether `p` lies on the left, right, top or bottom edge.
    pub fn touches_edge(&self, p: Point) -> bool {
        p.x.approx_eq_path(self.x0)
            || p.x.approx_eq_path(self.x1)
            || p.y.approx_eq_path(self.y0)
            || p.y.approx_eq_path(self.y1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_from_points() {
        let r = Rect::from_points(vec![
            Point::new(1.0, 5.0),
            Point::new(-2.0, 3.0),
            Point::new(4.0, 7.0),
        ])
        .unwrap();

        assert_eq!(r, Rect::new(-2.0, 3.0, 4.0, 7.0));
        assert_eq!(r.width(), 6.0);
        assert_eq!(r.height(), 4.0);
        assert_eq!(r.max_dimension(), 6.0);

        assert!(Rect::from_points(Vec::new()).is_none());
    }

    #[test]
    fn detects_edges() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.touches_edge(Point::new(0.0, 5.0)));
        assert!(r.touches_edge(Point::new(3.0, 10.0)));
        assert!(!r.touches_edge(Point::new(3.0, 4.0)));
    }
}
