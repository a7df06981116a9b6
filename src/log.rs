//! Utilities for logging messages from the library.

use once_cell::sync::Lazy;

#[doc(hidden)]
#[macro_export]
macro_rules! svgpath_log {
    (
        $session:expr,
        $($arg:tt)+
    ) => {
        if $session.log_enabled() {
            println!("{}", format_args!($($arg)+));
        }
    };
}

/// Whether the `SVGPATH_LOG` environment variable was set when first queried.
pub fn log_enabled() -> bool {
    static ENABLED: Lazy<bool> = Lazy::new(|| ::std::env::var_os("SVGPATH_LOG").is_some());

    *ENABLED
}
