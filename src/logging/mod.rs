//! Error logging contract
//!
//! Middlewares report unclassified failures through [`ErrorLog`]. The default
//! sink writes through the process-wide `tracing` subscriber; callers attach
//! their own sink at construction time instead of probing globals at runtime.

/// Destination for error diagnostics emitted by the middlewares
pub trait ErrorLog: Send + Sync {
    fn error(&self, message: &str);
}

/// Default sink: forwards to `tracing::error!`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingErrorLog;

impl ErrorLog for TracingErrorLog {
    fn error(&self, message: &str) {
        tracing::error!("{}", message);
    }
}
