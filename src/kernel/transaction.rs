use chrono::{DateTime, Utc};
use serde_json::json;

use super::errors::ValidationError;
use super::ids::{ChargeId, TransactionId};
use super::value_objects::{TransactionStatus, TransactionType};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ============================================================================
// Transaction Aggregate
// ============================================================================
//
// One gateway-side financial movement against a charge. The owning charge is
// a weak reference by id. Created when a gateway notification reports a new
// transaction; immutable afterwards except for status.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    id: Option<i64>,
    gateway_id: Option<TransactionId>,
    charge_id: Option<ChargeId>,
    transaction_type: TransactionType,
    amount: i64,
    status: TransactionStatus,
    created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        transaction_type: TransactionType,
        amount: i64,
        status: TransactionStatus,
    ) -> Result<Self, ValidationError> {
        if amount < 0 {
            return Err(ValidationError::NegativeAmount(amount));
        }
        Ok(Self {
            id: None,
            gateway_id: None,
            charge_id: None,
            transaction_type,
            amount,
            status,
            created_at: Utc::now(),
        })
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    pub fn gateway_id(&self) -> Option<&TransactionId> {
        self.gateway_id.as_ref()
    }

    pub fn set_gateway_id(&mut self, gateway_id: TransactionId) {
        self.gateway_id = Some(gateway_id);
    }

    pub fn charge_id(&self) -> Option<&ChargeId> {
        self.charge_id.as_ref()
    }

    pub fn set_charge_id(&mut self, charge_id: ChargeId) {
        self.charge_id = Some(charge_id);
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn set_amount(&mut self, amount: i64) -> Result<(), ValidationError> {
        if amount < 0 {
            return Err(ValidationError::NegativeAmount(amount));
        }
        self.amount = amount;
        Ok(())
    }

    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    pub fn set_status(&mut self, status: TransactionStatus) {
        self.status = status;
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn set_created_at(&mut self, created_at: DateTime<Utc>) {
        self.created_at = created_at;
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "id": self.id,
            "gatewayId": self.gateway_id.as_ref().map(TransactionId::value),
            "chargeId": self.charge_id.as_ref().map(ChargeId::value),
            "amount": self.amount,
            "type": self.transaction_type.as_tag(),
            "status": self.status.as_tag(),
            "createdAt": self.created_at.format(DATE_FORMAT).to_string(),
        })
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn transaction() -> Transaction {
        Transaction::new(
            TransactionType::CreditCard,
            1000,
            TransactionStatus::Captured,
        )
        .unwrap()
    }

    #[test]
    fn test_negative_amount_is_rejected() {
        let mut tx = transaction();
        assert!(tx.set_amount(-1).is_err());
        assert_eq!(tx.amount(), 1000);

        assert!(Transaction::new(
            TransactionType::Boleto,
            -50,
            TransactionStatus::Voided
        )
        .is_err());
    }

    #[test]
    fn test_zero_amount_is_allowed() {
        let mut tx = transaction();
        tx.set_amount(0).unwrap();
        assert_eq!(tx.amount(), 0);
    }

    #[test]
    fn test_amount_round_trips() {
        let mut tx = transaction();
        tx.set_amount(123_456).unwrap();
        assert_eq!(tx.amount(), 123_456);
    }

    #[test]
    fn test_json_projection() {
        let mut tx = transaction();
        tx.set_id(7);
        tx.set_gateway_id(TransactionId::new("tran_45asDadb8Xd95451").unwrap());
        tx.set_charge_id(ChargeId::new("ch_45asDadb8Xd95451").unwrap());

        let json = tx.to_json();
        assert_eq!(json["id"], 7);
        assert_eq!(json["gatewayId"], "tran_45asDadb8Xd95451");
        assert_eq!(json["chargeId"], "ch_45asDadb8Xd95451");
        assert_eq!(json["type"], "credit_card");
        assert_eq!(json["status"], "captured");
        // formatted timestamp, not an RFC 3339 value
        let created_at = json["createdAt"].as_str().unwrap();
        assert_eq!(created_at.len(), 19);
        assert!(!created_at.contains('T'));
    }
}
