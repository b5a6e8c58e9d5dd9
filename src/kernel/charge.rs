use serde_json::json;

use crate::ports::Identified;

use super::errors::ValidationError;
use super::ids::ChargeId;
use super::transaction::Transaction;
use super::value_objects::{ChargeStatus, TransactionType};

// ============================================================================
// Charge Aggregate
// ============================================================================
//
// One authorization/capture cycle against a payment method. Transactions are
// owned; adding one with an already-known gateway id replaces the stored
// record instead of duplicating it, so webhook re-delivery is absorbed.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Charge {
    id: Option<i64>,
    gateway_id: Option<ChargeId>,
    code: Option<String>,
    amount: i64,
    paid_amount: i64,
    status: ChargeStatus,
    payment_method: Option<TransactionType>,
    transactions: Vec<Transaction>,
}

impl Charge {
    pub fn new(status: ChargeStatus) -> Self {
        Self {
            id: None,
            gateway_id: None,
            code: None,
            amount: 0,
            paid_amount: 0,
            status,
            payment_method: None,
            transactions: Vec::new(),
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    pub fn gateway_id(&self) -> Option<&ChargeId> {
        self.gateway_id.as_ref()
    }

    pub fn set_gateway_id(&mut self, gateway_id: ChargeId) {
        self.gateway_id = Some(gateway_id);
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn set_code(&mut self, code: impl Into<String>) {
        self.code = Some(code.into());
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

    pub fn paid_amount(&self) -> i64 {
        self.paid_amount
    }

    pub fn set_paid_amount(&mut self, paid_amount: i64) -> Result<(), ValidationError> {
        if paid_amount < 0 {
            return Err(ValidationError::NegativeAmount(paid_amount));
        }
        self.paid_amount = paid_amount;
        Ok(())
    }

    pub fn status(&self) -> ChargeStatus {
        self.status
    }

    pub fn set_status(&mut self, status: ChargeStatus) {
        self.status = status;
    }

    pub fn payment_method(&self) -> Option<TransactionType> {
        self.payment_method
    }

    pub fn set_payment_method(&mut self, payment_method: TransactionType) {
        self.payment_method = Some(payment_method);
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn last_transaction(&self) -> Option<&Transaction> {
        self.transactions.last()
    }

    /// Upsert keyed by the transaction's gateway id. A transaction without a
    /// gateway id is always appended.
    pub fn add_transaction(&mut self, transaction: Transaction) {
        if let Some(incoming) = transaction.gateway_id() {
            if let Some(existing) = self
                .transactions
                .iter_mut()
                .find(|tx| tx.gateway_id() == Some(incoming))
            {
                *existing = transaction;
                return;
            }
        }
        self.transactions.push(transaction);
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "id": self.id,
            "gatewayId": self.gateway_id.as_ref().map(ChargeId::value),
            "code": self.code,
            "amount": self.amount,
            "paidAmount": self.paid_amount,
            "status": self.status.as_tag(),
            "paymentMethod": self.payment_method.map(|m| m.as_tag()),
            "transactions": self.transactions.iter().map(Transaction::to_json).collect::<Vec<_>>(),
        })
    }
}

impl Identified for Charge {
    fn local_code(&self) -> Option<String> {
        self.code.clone()
    }

    fn gateway_key(&self) -> Option<String> {
        self.gateway_id.as_ref().map(|id| id.value().to_string())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::ids::TransactionId;
    use crate::kernel::value_objects::TransactionStatus;

    fn transaction_with_gateway_id(id: &str, status: TransactionStatus) -> Transaction {
        let mut tx =
            Transaction::new(TransactionType::CreditCard, 500, status).unwrap();
        tx.set_gateway_id(TransactionId::new(id).unwrap());
        tx
    }

    #[test]
    fn test_add_transaction_is_idempotent_by_gateway_id() {
        let mut charge = Charge::new(ChargeStatus::Pending);
        charge.add_transaction(transaction_with_gateway_id(
            "tran_45asDadb8Xd95451",
            TransactionStatus::AuthorizedPendingCapture,
        ));
        charge.add_transaction(transaction_with_gateway_id(
            "tran_45asDadb8Xd95451",
            TransactionStatus::Captured,
        ));

        assert_eq!(charge.transactions().len(), 1);
        assert_eq!(
            charge.last_transaction().unwrap().status(),
            TransactionStatus::Captured
        );
    }

    #[test]
    fn test_distinct_transactions_accumulate() {
        let mut charge = Charge::new(ChargeStatus::Paid);
        charge.add_transaction(transaction_with_gateway_id(
            "tran_45asDadb8Xd95451",
            TransactionStatus::Captured,
        ));
        charge.add_transaction(transaction_with_gateway_id(
            "tran_45asDadb8Xd95452",
            TransactionStatus::Captured,
        ));
        assert_eq!(charge.transactions().len(), 2);
    }

    #[test]
    fn test_amount_validation() {
        let mut charge = Charge::new(ChargeStatus::Pending);
        assert!(charge.set_amount(-10).is_err());
        charge.set_amount(2500).unwrap();
        charge.set_paid_amount(2500).unwrap();
        assert_eq!(charge.amount(), 2500);
        assert_eq!(charge.paid_amount(), 2500);
    }
}
