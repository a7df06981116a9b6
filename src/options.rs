//! Options for parsing and simplification.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// How the path data parser treats errors in its input.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Recover from errors and report them as diagnostics.
    #[default]
    Permissive,

    /// Fail on the first error.
    Strict,
}

/// Options for [`crate::simplify`].
///
/// Create this with `SimplifyOptions::default()` and then use the `with_*` methods to
/// configure it:
///
/// ```
/// use svgpath::SimplifyOptions;
///
/// let options = SimplifyOptions::default()
///     .with_tolerance(2.5)
///     .with_keep_details(true);
///
/// assert_eq!(options.tolerance, 2.5);
/// ```
#[derive(Debug, Clone)]
pub struct SimplifyOptions {
    /// Maximum deviation of enclosed area, in percent, for a replacement to be accepted.
    pub tolerance: f64,

    /// Bisect runs longer than 4 commands and simplify each half independently.
    pub keep_details: bool,

    /// Never reduce cubic Béziers to quadratic ones.
    pub force_cubic: bool,

    /// Replace near-circular cubics with elliptical arcs, and merge adjacent arcs.
    pub cubic_to_arc: bool,

    /// Simplify each chunk with and without `keep_details`, and keep the closer match.
    pub multipass: bool,

    /// Checked between chunks; once set, the remaining chunks are left unchanged.
    pub cancellation: Option<Arc<AtomicBool>>,
}

impl Default for SimplifyOptions {
    fn default() -> Self {
        SimplifyOptions {
            tolerance: 5.0,
            keep_details: false,
            force_cubic: false,
            cubic_to_arc: true,
            multipass: false,
            cancellation: None,
        }
    }
}

impl SimplifyOptions {
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_keep_details(mut self, keep_details: bool) -> Self {
        self.keep_details = keep_details;
        self
    }

    pub fn with_force_cubic(mut self, force_cubic: bool) -> Self {
        self.force_cubic = force_cubic;
        self
    }

    pub fn with_cubic_to_arc(mut self, cubic_to_arc: bool) -> Self {
        self.cubic_to_arc = cubic_to_arc;
        self
    }

    pub fn with_multipass(mut self, multipass: bool) -> Self {
        self.multipass = multipass;
        self
    }

    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancellation = Some(flag);
        self
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .map_or(false, |flag| flag.load(Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = SimplifyOptions::default();
        assert_eq!(options.tolerance, 5.0);
        assert!(!options.keep_details);
        assert!(!options.force_cubic);
        assert!(options.cubic_to_arc);
        assert!(!options.multipass);
        assert!(!options.is_cancelled());
        assert_eq!(ParseMode::default(), ParseMode::Permissive);
    }

    #[test]
    fn observes_cancellation() {
        let flag = Arc::new(AtomicBool::new(false));
        let options = SimplifyOptions::default().with_cancellation(flag.clone());
        assert!(!options.is_cancelled());

        flag.store(true, Ordering::Relaxed);
        assert!(options.is_cancelled());
    }
}
