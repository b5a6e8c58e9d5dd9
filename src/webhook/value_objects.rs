use std::fmt;

use serde::Serialize;

use crate::kernel::errors::ValidationError;

// ============================================================================
// Webhook Value Objects
// ============================================================================

/// Parsed gateway event name: `<entity>.<action>`, e.g. "charge.paid".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookType {
    entity_type: String,
    action: String,
}

impl WebhookType {
    /// Splits the dotted event name posted by the gateway. Fails when the
    /// delimiter is missing or either side is empty.
    pub fn from_post_type(post_type: &str) -> Result<Self, ValidationError> {
        match post_type.split_once('.') {
            Some((entity_type, action)) if !entity_type.is_empty() && !action.is_empty() => {
                Ok(Self {
                    entity_type: entity_type.to_string(),
                    action: action.to_string(),
                })
            }
            _ => Err(ValidationError::MalformedEventType(post_type.to_string())),
        }
    }

    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    pub fn action(&self) -> &str {
        &self.action
    }
}

impl fmt::Display for WebhookType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.entity_type, self.action)
    }
}

/// Which subsystem produced the webhook, derived from its entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Component {
    Kernel,
    Recurrence,
}

impl Component {
    pub fn from_entity_type(entity_type: &str) -> Self {
        match entity_type {
            "subscription" | "invoice" | "plan" | "plan_item" => Self::Recurrence,
            _ => Self::Kernel,
        }
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::Kernel => "Kernel",
            Self::Recurrence => "Recurrence",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
