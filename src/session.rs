//! Tracks metadata for a simplification session.

use crate::log;

/// Metadata for a parsing/simplification session.
///
/// The entry points create one of these and pass it down through the pipeline
/// stages, so that they can decide whether to log what they are doing.
#[derive(Clone, Debug)]
pub struct Session {
    log_enabled: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            log_enabled: log::log_enabled(),
        }
    }

    /// A session that never logs, regardless of the environment.
    pub fn new_for_test_suite() -> Self {
        Self { log_enabled: false }
    }

    pub fn log_enabled(&self) -> bool {
        self.log_enabled
    }
}
