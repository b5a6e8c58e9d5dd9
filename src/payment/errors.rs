use crate::kernel::errors::{ParseError, ValidationError};

// ============================================================================
// Payment Business Rule Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    /// The requested installment count matched no entry of the resolved
    /// installment table; the whole batch is rejected.
    #[error("invalid installment number: {0}")]
    InvalidInstallment(u32),

    #[error("card payment entry is missing the brand")]
    MissingBrand,

    #[error("malformed payment instructions: {0}")]
    Payload(#[from] serde_json::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}
