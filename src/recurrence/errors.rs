use crate::kernel::errors::StateError;

// ============================================================================
// Recurrence Handler Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// The charge status tag is valid but the transition table has no arm
    /// for it. Surfaced, never silently swallowed.
    #[error("no transition for subscription charge status `{0}`")]
    UnhandledStatus(String),

    #[error("subscription `{0}` carries no current charge")]
    MissingCharge(String),

    #[error("subscription `{0}` references no platform order")]
    MissingPlatformOrder(String),

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Port(#[from] anyhow::Error),
}
