//! Per-ticker error log port trait.

/// Sink for per-ticker failures during batch operations. Logging is
/// best-effort and must never fail the operation being logged.
pub trait ErrorLogPort {
    fn log(&self, ticker: &str, message: &str);
}
