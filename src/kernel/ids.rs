use std::fmt;

use serde::Serialize;

use super::errors::ValidationError;

// ============================================================================
// Gateway Identity Value Objects
// ============================================================================
//
// Every gateway-side id is a prefixed string: `<prefix>` followed by exactly
// 16 alphanumeric characters (e.g. "ch_1234567890abcdef"). Construction
// validates the shape; a malformed value never enters the system.
//
// ============================================================================

fn valid_gateway_id(value: &str, prefix: &str) -> bool {
    match value.strip_prefix(prefix) {
        Some(rest) => rest.len() == 16 && rest.chars().all(|c| c.is_ascii_alphanumeric()),
        None => false,
    }
}

macro_rules! gateway_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
                let value = value.into();
                if !valid_gateway_id(&value, $prefix) {
                    return Err(ValidationError::InvalidId {
                        kind: stringify!($name),
                        value,
                    });
                }
                Ok(Self(value))
            }

            pub fn value(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

gateway_id!(ChargeId, "ch_");
gateway_id!(OrderId, "or_");
gateway_id!(TransactionId, "tran_");
gateway_id!(CustomerId, "cus_");
gateway_id!(SubscriptionId, "sub_");
gateway_id!(InvoiceId, "in_");
gateway_id!(WebhookId, "hook_");
gateway_id!(PlanItemId, "pi_");
gateway_id!(
    /// One-time ephemeral card token issued by the gateway's checkout form.
    CardToken,
    "token_"
);
gateway_id!(
    /// Persistent reference to a card stored at the gateway.
    CardId,
    "card_"
);

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_well_formed_ids() {
        assert_eq!(
            ChargeId::new("ch_45asDadb8Xd95451").unwrap().value(),
            "ch_45asDadb8Xd95451"
        );
        assert_eq!(
            SubscriptionId::new("sub_hdgeifuaudiv9ek3").unwrap().value(),
            "sub_hdgeifuaudiv9ek3"
        );
        assert_eq!(
            WebhookId::new("hook_xxxxxxxxxxxxxxxx").unwrap().value(),
            "hook_xxxxxxxxxxxxxxxx"
        );
    }

    #[test]
    fn test_rejects_wrong_prefix() {
        assert!(ChargeId::new("sub_45asDadb8Xd95451").is_err());
        assert!(CardToken::new("card_45asDadb8Xd95451").is_err());
    }

    #[test]
    fn test_rejects_wrong_length_and_charset() {
        assert!(ChargeId::new("ch_short").is_err());
        assert!(ChargeId::new("ch_45asDadb8Xd9545!").is_err());
        assert!(ChargeId::new("ch_45asDadb8Xd954511").is_err());
    }

    #[test]
    fn test_serializes_as_bare_string() {
        let id = InvoiceId::new("in_45asDadb8Xd95451").unwrap();
        assert_eq!(
            serde_json::to_string(&id).unwrap(),
            "\"in_45asDadb8Xd95451\""
        );
    }

    #[test]
    fn test_structural_equality() {
        let a = CustomerId::new("cus_45asDadb8Xd95451").unwrap();
        let b = CustomerId::new("cus_45asDadb8Xd95451").unwrap();
        assert_eq!(a, b);
    }
}
