//! services/web/src/error.rs
//!
//! Defines the primary error type for the study planner service.
//!
//! Configuration failures never reach this type: the binary reports them and
//! exits before the server starts.

/// The primary error type for the `web` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
