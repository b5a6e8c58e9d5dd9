use chrono::{DateTime, Utc};
use serde_json::json;

use crate::kernel::charge::Charge;
use crate::kernel::errors::ValidationError;
use crate::kernel::ids::{InvoiceId, SubscriptionId};
use crate::kernel::value_objects::InvoiceStatus;
use crate::payment::customer::Customer;
use crate::payment::value_objects::PaymentMethodKind;
use crate::ports::Identified;

// ============================================================================
// Invoice Aggregate
// ============================================================================
//
// Billing record for one subscription cycle. References its customer and
// charge; points back at the owning subscription by id.
//
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cycle {
    cycle_start: Option<DateTime<Utc>>,
    cycle_end: Option<DateTime<Utc>>,
}

impl Cycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cycle_start(&self) -> Option<DateTime<Utc>> {
        self.cycle_start
    }

    pub fn set_cycle_start(&mut self, start: DateTime<Utc>) {
        self.cycle_start = Some(start);
    }

    pub fn cycle_end(&self) -> Option<DateTime<Utc>> {
        self.cycle_end
    }

    pub fn set_cycle_end(&mut self, end: DateTime<Utc>) {
        self.cycle_end = Some(end);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Invoice {
    id: Option<i64>,
    gateway_id: Option<InvoiceId>,
    customer: Option<Customer>,
    charge: Option<Charge>,
    payment_method: Option<PaymentMethodKind>,
    status: Option<InvoiceStatus>,
    amount: i64,
    installments: bool,
    cycle: Option<Cycle>,
    subscription_id: Option<SubscriptionId>,
    total_discount: i64,
    total_increment: i64,
}

impl Invoice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    pub fn gateway_id(&self) -> Option<&InvoiceId> {
        self.gateway_id.as_ref()
    }

    pub fn set_gateway_id(&mut self, gateway_id: InvoiceId) {
        self.gateway_id = Some(gateway_id);
    }

    pub fn customer(&self) -> Option<&Customer> {
        self.customer.as_ref()
    }

    pub fn set_customer(&mut self, customer: Customer) {
        self.customer = Some(customer);
    }

    pub fn charge(&self) -> Option<&Charge> {
        self.charge.as_ref()
    }

    pub fn set_charge(&mut self, charge: Charge) {
        self.charge = Some(charge);
    }

    pub fn payment_method(&self) -> Option<PaymentMethodKind> {
        self.payment_method
    }

    pub fn set_payment_method(&mut self, payment_method: PaymentMethodKind) {
        self.payment_method = Some(payment_method);
    }

    pub fn status(&self) -> Option<InvoiceStatus> {
        self.status
    }

    pub fn set_status(&mut self, status: InvoiceStatus) {
        self.status = Some(status);
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

    pub fn installments(&self) -> bool {
        self.installments
    }

    pub fn set_installments(&mut self, installments: bool) {
        self.installments = installments;
    }

    pub fn cycle(&self) -> Option<&Cycle> {
        self.cycle.as_ref()
    }

    pub fn set_cycle(&mut self, cycle: Cycle) {
        self.cycle = Some(cycle);
    }

    pub fn cycle_start(&self) -> Option<DateTime<Utc>> {
        self.cycle.as_ref().and_then(Cycle::cycle_start)
    }

    pub fn cycle_end(&self) -> Option<DateTime<Utc>> {
        self.cycle.as_ref().and_then(Cycle::cycle_end)
    }

    pub fn subscription_id(&self) -> Option<&SubscriptionId> {
        self.subscription_id.as_ref()
    }

    pub fn set_subscription_id(&mut self, subscription_id: SubscriptionId) {
        self.subscription_id = Some(subscription_id);
    }

    pub fn total_discount(&self) -> i64 {
        self.total_discount
    }

    pub fn set_total_discount(&mut self, total_discount: i64) {
        self.total_discount = total_discount;
    }

    pub fn total_increment(&self) -> i64 {
        self.total_increment
    }

    pub fn set_total_increment(&mut self, total_increment: i64) {
        self.total_increment = total_increment;
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "id": self.id,
            "gatewayId": self.gateway_id.as_ref().map(InvoiceId::value),
            "customer": self.customer.as_ref().map(Customer::to_json),
            "charge": self.charge.as_ref().map(Charge::to_json),
            "paymentMethod": self.payment_method.map(|m| m.as_tag()),
            "status": self.status.map(|s| s.as_tag()),
            "amount": self.amount,
            "installments": self.installments,
            "cycleStart": self.cycle_start().map(|d| d.to_rfc3339()),
            "cycleEnd": self.cycle_end().map(|d| d.to_rfc3339()),
            "subscriptionId": self.subscription_id.as_ref().map(SubscriptionId::value),
            "totalDiscount": self.total_discount,
            "totalIncrement": self.total_increment,
        })
    }
}

impl Identified for Invoice {
    fn local_code(&self) -> Option<String> {
        self.id.map(|id| id.to_string())
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
    use chrono::Duration;
    use crate::kernel::value_objects::ChargeStatus;

    #[test]
    fn test_fully_populated_invoice() {
        let mut cycle = Cycle::new();
        let start = Utc::now();
        cycle.set_cycle_start(start);
        cycle.set_cycle_end(start + Duration::days(10));

        let mut invoice = Invoice::new();
        invoice
            .set_gateway_id(InvoiceId::new("in_45asDadb8Xd95451").unwrap());
        invoice.set_id(1);
        invoice.set_customer(Customer::new());
        invoice.set_payment_method(PaymentMethodKind::CreditCard);
        invoice.set_status(InvoiceStatus::Paid);
        invoice.set_amount(100).unwrap();
        invoice.set_charge(Charge::new(ChargeStatus::Paid));
        invoice.set_installments(true);
        invoice.set_cycle(cycle);
        invoice
            .set_subscription_id(SubscriptionId::new("sub_hdgeifuaudiv9ek3").unwrap());
        invoice.set_total_discount(100);
        invoice.set_total_increment(100);

        assert_eq!(invoice.gateway_id().unwrap().value(), "in_45asDadb8Xd95451");
        assert_eq!(invoice.id(), Some(1));
        assert_eq!(invoice.payment_method(), Some(PaymentMethodKind::CreditCard));
        assert_eq!(invoice.status(), Some(InvoiceStatus::Paid));
        assert_eq!(invoice.amount(), 100);
        assert_eq!(invoice.total_discount(), 100);
        assert_eq!(invoice.total_increment(), 100);
        assert!(invoice.cycle_start().is_some());
        assert!(invoice.cycle_end().is_some());
        assert_eq!(
            invoice.subscription_id().unwrap().value(),
            "sub_hdgeifuaudiv9ek3"
        );
    }

    #[test]
    fn test_json_projection_is_valid() {
        let invoice = Invoice::new();
        let json = invoice.to_json();
        assert!(json.is_object());
        assert!(json["status"].is_null());
    }

    #[test]
    fn test_cycle_bounds_are_none_without_a_cycle() {
        let invoice = Invoice::new();
        assert!(invoice.cycle_start().is_none());
        assert!(invoice.cycle_end().is_none());
    }

    #[test]
    fn test_negative_amount_is_rejected() {
        let mut invoice = Invoice::new();
        assert!(invoice.set_amount(-5).is_err());
    }
}
