use super::value_objects::OrderStatus;

// ============================================================================
// Kernel Error Taxonomy
// ============================================================================
//
// ValidationError: rejected at construction, never recovered locally.
// ParseError: aborts the enclosing factory call, names the offending field.
// StateError: order lifecycle invariant violations.
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("amount must be greater than or equal to 0, got {0}")]
    NegativeAmount(i64),

    #[error("invalid {kind} identifier: {value}")]
    InvalidId { kind: &'static str, value: String },

    #[error("unknown {kind} tag: {tag}")]
    UnknownTag { kind: &'static str, tag: String },

    #[error("webhook event type has no entity/action delimiter: {0}")]
    MalformedEventType(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("malformed date in field `{field}`: {value}")]
    MalformedDate { field: &'static str, value: String },

    #[error("unknown variant `{value}` in field `{field}`")]
    UnknownVariant { field: &'static str, value: String },

    #[error("malformed payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("order in terminal status {from:?} cannot move to {to:?}")]
    TerminalTransition { from: OrderStatus, to: OrderStatus },
}
