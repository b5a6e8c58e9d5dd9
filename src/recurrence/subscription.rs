use serde_json::json;

use crate::kernel::charge::Charge;
use crate::kernel::ids::SubscriptionId;
use crate::payment::customer::Customer;
use crate::payment::value_objects::PaymentMethodKind;
use crate::ports::Identified;

use super::invoice::Invoice;
use super::value_objects::SubscriptionStatus;

// ============================================================================
// Subscription Aggregate
// ============================================================================
//
// Owns references to its current charge and invoice; the host platform order
// is a weak reference held as the platform order code and reached through
// the PlatformOrders port.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Subscription {
    id: Option<i64>,
    gateway_id: Option<SubscriptionId>,
    code: Option<String>,
    status: SubscriptionStatus,
    payment_method: Option<PaymentMethodKind>,
    installments: bool,
    current_charge: Option<Charge>,
    invoice: Option<Invoice>,
    customer: Option<Customer>,
    platform_order_code: Option<String>,
}

impl Subscription {
    pub fn new(status: SubscriptionStatus) -> Self {
        Self {
            id: None,
            gateway_id: None,
            code: None,
            status,
            payment_method: None,
            installments: false,
            current_charge: None,
            invoice: None,
            customer: None,
            platform_order_code: None,
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    pub fn gateway_id(&self) -> Option<&SubscriptionId> {
        self.gateway_id.as_ref()
    }

    pub fn set_gateway_id(&mut self, gateway_id: SubscriptionId) {
        self.gateway_id = Some(gateway_id);
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn set_code(&mut self, code: impl Into<String>) {
        self.code = Some(code.into());
    }

    pub fn status(&self) -> SubscriptionStatus {
        self.status
    }

    pub fn set_status(&mut self, status: SubscriptionStatus) {
        self.status = status;
    }

    pub fn payment_method(&self) -> Option<PaymentMethodKind> {
        self.payment_method
    }

    pub fn set_payment_method(&mut self, payment_method: PaymentMethodKind) {
        self.payment_method = Some(payment_method);
    }

    pub fn installments(&self) -> bool {
        self.installments
    }

    pub fn set_installments(&mut self, installments: bool) {
        self.installments = installments;
    }

    pub fn current_charge(&self) -> Option<&Charge> {
        self.current_charge.as_ref()
    }

    pub fn set_current_charge(&mut self, charge: Charge) {
        self.current_charge = Some(charge);
    }

    pub fn invoice(&self) -> Option<&Invoice> {
        self.invoice.as_ref()
    }

    pub fn set_invoice(&mut self, invoice: Invoice) {
        self.invoice = Some(invoice);
    }

    pub fn customer(&self) -> Option<&Customer> {
        self.customer.as_ref()
    }

    pub fn set_customer(&mut self, customer: Customer) {
        self.customer = Some(customer);
    }

    /// Code of the platform order this subscription bills against.
    pub fn platform_order_code(&self) -> Option<&str> {
        self.platform_order_code.as_deref()
    }

    pub fn set_platform_order_code(&mut self, code: impl Into<String>) {
        self.platform_order_code = Some(code.into());
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "id": self.id,
            "gatewayId": self.gateway_id.as_ref().map(SubscriptionId::value),
            "code": self.code,
            "status": self.status.as_tag(),
            "paymentMethod": self.payment_method.map(|m| m.as_tag()),
            "installments": self.installments,
            "currentCharge": self.current_charge.as_ref().map(Charge::to_json),
            "invoice": self.invoice.as_ref().map(Invoice::to_json),
            "customer": self.customer.as_ref().map(Customer::to_json),
            "platformOrderCode": self.platform_order_code,
        })
    }
}

impl Identified for Subscription {
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
