//! Process-wide tracing setup.

pub mod tracing;

pub use self::tracing::LogFormat;

/// Initialize tracing with the given output format.
pub fn init_with(format: LogFormat) {
    self::tracing::init(format);
}
