//! Process-wide logging setup shared by the marketplace binaries.

/// Initialize process-wide tracing.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Subscriber configuration (filters, output format).
pub mod tracing;
