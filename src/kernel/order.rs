use serde_json::json;

use crate::payment::customer::Customer;
use crate::recurrence::subscription::Subscription;

use super::charge::Charge;
use super::errors::StateError;
use super::ids::OrderId;
use super::value_objects::OrderStatus;

// ============================================================================
// Order Aggregate (local mirror of the platform order)
// ============================================================================
//
// Synchronized with, but not owning, the host platform's order record; the
// platform record is reached through the PlatformOrders port by code.
// Status transitions out of a terminal status are rejected; re-setting the
// current status is a no-op so webhook re-delivery stays idempotent.
//
// ============================================================================

#[derive(Debug, Clone)]
pub struct Order {
    id: Option<i64>,
    gateway_id: Option<OrderId>,
    code: Option<String>,
    status: OrderStatus,
    charges: Vec<Charge>,
    customer: Option<Customer>,
}

impl Order {
    pub fn new(status: OrderStatus) -> Self {
        Self {
            id: None,
            gateway_id: None,
            code: None,
            status,
            charges: Vec::new(),
            customer: None,
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    pub fn gateway_id(&self) -> Option<&OrderId> {
        self.gateway_id.as_ref()
    }

    pub fn set_gateway_id(&mut self, gateway_id: OrderId) {
        self.gateway_id = Some(gateway_id);
    }

    /// Code of the order record on the host platform.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn set_code(&mut self, code: impl Into<String>) {
        self.code = Some(code.into());
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn set_status(&mut self, status: OrderStatus) -> Result<(), StateError> {
        if self.status == status {
            return Ok(());
        }
        if self.status.is_terminal() {
            return Err(StateError::TerminalTransition {
                from: self.status,
                to: status,
            });
        }
        self.status = status;
        Ok(())
    }

    pub fn charges(&self) -> &[Charge] {
        &self.charges
    }

    pub fn add_charge(&mut self, charge: Charge) {
        self.charges.push(charge);
    }

    pub fn customer(&self) -> Option<&Customer> {
        self.customer.as_ref()
    }

    pub fn set_customer(&mut self, customer: Customer) {
        self.customer = Some(customer);
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "id": self.id,
            "gatewayId": self.gateway_id.as_ref().map(OrderId::value),
            "code": self.code,
            "status": self.status.as_tag(),
            "charges": self.charges.iter().map(Charge::to_json).collect::<Vec<_>>(),
            "customer": self.customer.as_ref().map(Customer::to_json),
        })
    }
}

// ============================================================================
// Order Factory
// ============================================================================

pub struct OrderFactory;

impl OrderFactory {
    /// Rebuild the local order mirror from the subscription's current data
    /// plus the platform status derived from the reported charge.
    pub fn create_from_subscription_data(
        subscription: &Subscription,
        status: OrderStatus,
    ) -> Order {
        let mut order = Order::new(status);

        if let Some(code) = subscription
            .platform_order_code()
            .or_else(|| subscription.code())
        {
            order.set_code(code);
        }
        if let Some(charge) = subscription.current_charge() {
            order.add_charge(charge.clone());
        }
        if let Some(customer) = subscription.customer() {
            order.set_customer(customer.clone());
        }

        order
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions_from_non_terminal_statuses() {
        let mut order = Order::new(OrderStatus::Paid);
        order.set_status(OrderStatus::Processing).unwrap();
        assert_eq!(order.status(), OrderStatus::Processing);

        let mut order = Order::new(OrderStatus::Pending);
        order.set_status(OrderStatus::Canceled).unwrap();
        assert_eq!(order.status(), OrderStatus::Canceled);
    }

    #[test]
    fn test_terminal_status_cannot_be_left() {
        let mut order = Order::new(OrderStatus::Processing);
        assert!(order.set_status(OrderStatus::Pending).is_err());

        let mut order = Order::new(OrderStatus::Canceled);
        assert!(order.set_status(OrderStatus::Processing).is_err());
    }

    #[test]
    fn test_setting_the_same_status_is_a_no_op() {
        let mut order = Order::new(OrderStatus::Processing);
        order.set_status(OrderStatus::Processing).unwrap();
        assert_eq!(order.status(), OrderStatus::Processing);
    }
}
