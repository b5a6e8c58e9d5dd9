use crate::kernel::errors::{ParseError, ValidationError};
use crate::recurrence::errors::HandlerError;

// ============================================================================
// Webhook Delivery Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("malformed webhook payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("unsupported webhook entity `{0}`")]
    UnsupportedEntity(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Handler(#[from] HandlerError),
}
