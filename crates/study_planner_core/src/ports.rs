//! crates/study_planner_core/src/ports.rs
//!
//! Defines the service contract the core uses to reach the text-generation model.
//! Adapters in the service crate implement it, so the core never depends on a
//! particular HTTP client or provider.

use async_trait::async_trait;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., network, API).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("{0}")]
    Unexpected(String),
    #[error("The model returned an empty response.")]
    EmptyResponse,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait TextGenerationService: Send + Sync {
    /// Sends a prompt to the model and returns the generated text.
    async fn generate(&self, prompt: &str) -> PortResult<String>;
}
