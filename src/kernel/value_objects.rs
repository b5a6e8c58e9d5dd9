use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::ValidationError;

// ============================================================================
// Kernel Status/Type Value Objects
// ============================================================================
//
// Immutable tags over fixed enumerated domains. Tags enter the system only
// through `from_tag`, which rejects anything outside the domain; the JSON
// projection of every tag is the bare string.
//
// ============================================================================

/// Status of one gateway-side financial movement against a charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Captured,
    PartialCapture,
    AuthorizedPendingCapture,
    Voided,
    PartialVoid,
}

impl TransactionStatus {
    pub fn from_tag(tag: &str) -> Result<Self, ValidationError> {
        match tag {
            "captured" => Ok(Self::Captured),
            "partial_capture" => Ok(Self::PartialCapture),
            "authorized_pending_capture" => Ok(Self::AuthorizedPendingCapture),
            "voided" => Ok(Self::Voided),
            "partial_void" => Ok(Self::PartialVoid),
            _ => Err(ValidationError::UnknownTag {
                kind: "transaction status",
                tag: tag.to_string(),
            }),
        }
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::Captured => "captured",
            Self::PartialCapture => "partial_capture",
            Self::AuthorizedPendingCapture => "authorized_pending_capture",
            Self::Voided => "voided",
            Self::PartialVoid => "partial_void",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Payment instrument behind a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    CreditCard,
    DebitCard,
    Boleto,
    Voucher,
}

impl TransactionType {
    pub fn from_tag(tag: &str) -> Result<Self, ValidationError> {
        match tag {
            "credit_card" => Ok(Self::CreditCard),
            "debit_card" => Ok(Self::DebitCard),
            "boleto" => Ok(Self::Boleto),
            "voucher" => Ok(Self::Voucher),
            _ => Err(ValidationError::UnknownTag {
                kind: "transaction type",
                tag: tag.to_string(),
            }),
        }
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::CreditCard => "credit_card",
            Self::DebitCard => "debit_card",
            Self::Boleto => "boleto",
            Self::Voucher => "voucher",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Gateway-reported lifecycle status of a charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeStatus {
    Paid,
    Pending,
    Failed,
    Underpaid,
    Overpaid,
    Canceled,
}

impl ChargeStatus {
    pub fn from_tag(tag: &str) -> Result<Self, ValidationError> {
        match tag {
            "paid" => Ok(Self::Paid),
            "pending" => Ok(Self::Pending),
            "failed" => Ok(Self::Failed),
            "underpaid" => Ok(Self::Underpaid),
            "overpaid" => Ok(Self::Overpaid),
            "canceled" => Ok(Self::Canceled),
            _ => Err(ValidationError::UnknownTag {
                kind: "charge status",
                tag: tag.to_string(),
            }),
        }
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Pending => "pending",
            Self::Failed => "failed",
            Self::Underpaid => "underpaid",
            Self::Overpaid => "overpaid",
            Self::Canceled => "canceled",
        }
    }
}

impl fmt::Display for ChargeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Local order status. Processing and canceled are terminal: once an order
/// reaches either, the only permitted set is the same status again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Paid,
    Processing,
    Canceled,
}

impl OrderStatus {
    pub fn from_tag(tag: &str) -> Result<Self, ValidationError> {
        match tag {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "processing" => Ok(Self::Processing),
            "canceled" => Ok(Self::Canceled),
            _ => Err(ValidationError::UnknownTag {
                kind: "order status",
                tag: tag.to_string(),
            }),
        }
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Processing => "processing",
            Self::Canceled => "canceled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Processing | Self::Canceled)
    }

    /// Platform-facing status derived from the charge the gateway reported.
    /// Statuses outside the handled set map to pending; the handler dispatch
    /// rejects them before any platform mutation happens.
    pub fn from_charge_status(status: ChargeStatus) -> Self {
        match status {
            ChargeStatus::Paid => Self::Paid,
            ChargeStatus::Pending => Self::Pending,
            ChargeStatus::Failed => Self::Canceled,
            _ => Self::Pending,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// State of the host platform's order record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderState {
    Pending,
    Processing,
    Complete,
    Canceled,
}

impl OrderState {
    pub fn from_tag(tag: &str) -> Result<Self, ValidationError> {
        match tag {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "complete" => Ok(Self::Complete),
            "canceled" => Ok(Self::Canceled),
            _ => Err(ValidationError::UnknownTag {
                kind: "order state",
                tag: tag.to_string(),
            }),
        }
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Complete => "complete",
            Self::Canceled => "canceled",
        }
    }
}

impl fmt::Display for OrderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Billing status of a subscription-cycle invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Paid,
    Pending,
    Canceled,
    Failed,
}

impl InvoiceStatus {
    pub fn from_tag(tag: &str) -> Result<Self, ValidationError> {
        match tag {
            "paid" => Ok(Self::Paid),
            "pending" => Ok(Self::Pending),
            "canceled" => Ok(Self::Canceled),
            "failed" => Ok(Self::Failed),
            _ => Err(ValidationError::UnknownTag {
                kind: "invoice status",
                tag: tag.to_string(),
            }),
        }
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Pending => "pending",
            Self::Canceled => "canceled",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_status_round_trips_every_tag() {
        for tag in [
            "captured",
            "partial_capture",
            "authorized_pending_capture",
            "voided",
            "partial_void",
        ] {
            let status = TransactionStatus::from_tag(tag).unwrap();
            assert_eq!(status.as_tag(), tag);
            assert_eq!(status, TransactionStatus::from_tag(tag).unwrap());
        }
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        assert!(TransactionStatus::from_tag("refunded").is_err());
        assert!(ChargeStatus::from_tag("").is_err());
        assert!(OrderStatus::from_tag("shipped").is_err());
    }

    #[test]
    fn test_json_projection_is_the_bare_tag() {
        let json = serde_json::to_string(&TransactionStatus::PartialVoid).unwrap();
        assert_eq!(json, "\"partial_void\"");

        let json = serde_json::to_string(&ChargeStatus::Paid).unwrap();
        assert_eq!(json, "\"paid\"");
    }

    #[test]
    fn test_charge_status_round_trips_every_tag() {
        for tag in ["paid", "pending", "failed", "underpaid", "overpaid", "canceled"] {
            assert_eq!(ChargeStatus::from_tag(tag).unwrap().as_tag(), tag);
        }
    }

    #[test]
    fn test_order_status_terminal_set() {
        assert!(OrderStatus::Processing.is_terminal());
        assert!(OrderStatus::Canceled.is_terminal());
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::Paid.is_terminal());
    }

    #[test]
    fn test_order_status_derivation_from_charge() {
        assert_eq!(
            OrderStatus::from_charge_status(ChargeStatus::Paid),
            OrderStatus::Paid
        );
        assert_eq!(
            OrderStatus::from_charge_status(ChargeStatus::Pending),
            OrderStatus::Pending
        );
        assert_eq!(
            OrderStatus::from_charge_status(ChargeStatus::Failed),
            OrderStatus::Canceled
        );
        assert_eq!(
            OrderStatus::from_charge_status(ChargeStatus::Underpaid),
            OrderStatus::Pending
        );
    }
}
