//! Feature-gated logging macros.
//!
//! When the `tracing` feature is enabled these delegate to the real
//! `tracing` macros; when disabled they compile to no-ops so the core pays
//! nothing for log points it never emits.

#[cfg(feature = "tracing")]
pub use tracing::{debug, error, trace, warn};

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub use crate::{debug, error, trace, warn};
