//! Utilities to compare floating-point numbers.

use float_cmp::{ApproxEq, F64Margin};

use crate::geometry::Point;

/// Absolute tolerance under which two path coordinates are considered equal.
///
/// Path data that went through text is rarely more precise than this, and the
/// geometry code accumulates errors of a few ULPs when it intersects lines or
/// converts arcs.
pub const PATH_EPSILON: f64 = 1e-9;

const PATH_ULPS: i64 = 4;

/// Checks whether two values are approximately equal for the purposes of path geometry.
///
/// Two numbers are equal if their absolute difference is smaller than
/// [`PATH_EPSILON`], or if they are a few units-in-the-last-place (ULP) apart, which
/// matters for very large coordinates.
pub trait ApproxEqPath: ApproxEq {
    fn approx_eq_path(self, other: Self) -> bool;
}

impl ApproxEqPath for f64 {
    fn approx_eq_path(self, other: f64) -> bool {
        self.approx_eq(other, (PATH_EPSILON, PATH_ULPS))
    }
}

impl ApproxEq for Point {
    type Margin = F64Margin;

    fn approx_eq<M: Into<Self::Margin>>(self, other: Self, margin: M) -> bool {
        let margin = margin.into();
        self.x.approx_eq(other.x, margin) && self.y.approx_eq(other.y, margin)
    }
}

impl ApproxEqPath for Point {
    fn approx_eq_path(self, other: Point) -> bool {
        self.approx_eq(other, (PATH_EPSILON, PATH_ULPS))
    }
}

// Macro for usage in unit tests
#[doc(hidden)]
#[macro_export]
macro_rules! assert_approx_eq_path {
    ($left:expr, $right:expr) => {{
        match ($left, $right) {
            (l, r) => {
                if !l.approx_eq_path(r) {
                    panic!(
                        r#"assertion failed: `(left == right)`
  left: `{:?}`,
 right: `{:?}`"#,
                        l, r
                    )
                }
            }
        }
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_approx_equal() {
        assert!(1.0_f64.approx_eq_path(1.0 + 1e-12));
        assert!(0.0_f64.approx_eq_path(-1e-10));
        assert!(!0.0_f64.approx_eq_path(1e-6));
        assert!(!1.0_f64.approx_eq_path(1.000001));

        // 2^53 and (2^53 + 2) are 1 ULP apart
        assert!(9_007_199_254_740_992.0.approx_eq_path(9_007_199_254_740_994.0));
    }

    #[test]
    fn points_approx_equal() {
        assert!(Point::new(1.0, 2.0).approx_eq_path(Point::new(1.0, 2.0 + 1e-12)));
        assert!(!Point::new(1.0, 2.0).approx_eq_path(Point::new(1.001, 2.0)));
    }

    #[test]
    fn assert_approx_eq_path_should_not_panic() {
        assert_approx_eq_path!(42_f64, 42_f64);
    }

    #[test]
    #[should_panic]
    fn assert_approx_eq_path_should_panic() {
        assert_approx_eq_path!(3_f64, 42_f64);
    }
}
