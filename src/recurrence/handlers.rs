use std::sync::Arc;

use tracing::{info, warn};

use crate::kernel::charge::Charge;
use crate::kernel::order::{Order, OrderFactory};
use crate::kernel::value_objects::{ChargeStatus, InvoiceStatus, OrderState, OrderStatus};
use crate::payment::customer::Customer;
use crate::ports::{CantCreateReason, InvoiceCreator, Localizer, PlatformOrders, Repository};

use super::errors::HandlerError;
use super::invoice::Invoice;
use super::subscription::Subscription;

// ============================================================================
// Subscription Response Handler
// ============================================================================
//
// The state machine that replays a gateway-reported charge status into local
// state and the host platform. Dispatch is a finite transition table over
// ChargeStatus with an explicit error arm; there is no catch-all success.
//
// Step order is load-bearing (later steps read what earlier steps wrote):
// charge save, order reconstruction, subscription save, customer upsert,
// status dispatch. A failure partway leaves the earlier writes in place;
// re-delivery of the same webhook is absorbed by upsert semantics.
//
// ============================================================================

/// Result of a handled status: the payment either completed, or the platform
/// refused invoice creation and the reason is the result. Never both.
#[derive(Debug, Clone, PartialEq)]
pub enum HandlerOutcome {
    Completed,
    Refused(CantCreateReason),
}

pub struct SubscriptionHandler {
    charges: Arc<dyn Repository<Charge>>,
    subscriptions: Arc<dyn Repository<Subscription>>,
    customers: Arc<dyn Repository<Customer>>,
    invoices: Arc<dyn Repository<Invoice>>,
    invoice_creator: Arc<dyn InvoiceCreator>,
    platform_orders: Arc<dyn PlatformOrders>,
    localizer: Arc<dyn Localizer>,
}

impl SubscriptionHandler {
    pub fn new(
        charges: Arc<dyn Repository<Charge>>,
        subscriptions: Arc<dyn Repository<Subscription>>,
        customers: Arc<dyn Repository<Customer>>,
        invoices: Arc<dyn Repository<Invoice>>,
        invoice_creator: Arc<dyn InvoiceCreator>,
        platform_orders: Arc<dyn PlatformOrders>,
        localizer: Arc<dyn Localizer>,
    ) -> Self {
        Self {
            charges,
            subscriptions,
            customers,
            invoices,
            invoice_creator,
            platform_orders,
            localizer,
        }
    }

    pub async fn handle(
        &self,
        subscription: &Subscription,
    ) -> Result<HandlerOutcome, HandlerError> {
        let charge = subscription
            .current_charge()
            .cloned()
            .ok_or_else(|| HandlerError::MissingCharge(subscription_label(subscription)))?;
        let status = charge.status();

        info!(
            subscription = %subscription_label(subscription),
            status = %status,
            "handling subscription charge status"
        );

        self.charges.save(&charge).await?;

        let mut order = OrderFactory::create_from_subscription_data(
            subscription,
            OrderStatus::from_charge_status(status),
        );

        self.subscriptions.save(subscription).await?;
        self.upsert_customer(subscription.customer()).await?;

        match status {
            ChargeStatus::Paid => self.handle_paid(subscription, &mut order).await,
            ChargeStatus::Pending => self.handle_pending(subscription, &mut order).await,
            ChargeStatus::Failed => self.handle_failed(subscription, &mut order).await,
            other => Err(HandlerError::UnhandledStatus(other.as_tag().to_string())),
        }
    }

    async fn handle_paid(
        &self,
        subscription: &Subscription,
        order: &mut Order,
    ) -> Result<HandlerOutcome, HandlerError> {
        let cant_create = self.invoice_creator.cant_create_reason(order).await?;

        match self.invoice_creator.create_invoice_for(order).await? {
            Some(mut invoice) => {
                self.complete_payment(subscription, order, &mut invoice)
                    .await?;
                Ok(HandlerOutcome::Completed)
            }
            None => {
                let reason = cant_create.unwrap_or_else(|| {
                    CantCreateReason::new("invoice could not be created for the order")
                });
                warn!(
                    subscription = %subscription_label(subscription),
                    reason = %reason,
                    "platform refused invoice creation"
                );
                Ok(HandlerOutcome::Refused(reason))
            }
        }
    }

    async fn complete_payment(
        &self,
        subscription: &Subscription,
        order: &mut Order,
        invoice: &mut Invoice,
    ) -> Result<(), HandlerError> {
        invoice.set_status(InvoiceStatus::Paid);
        self.invoices.save(invoice).await?;

        order.set_status(OrderStatus::Processing)?;
        let code = order_code(subscription, order)?;
        self.platform_orders
            .set_state(&code, OrderState::Processing)
            .await?;

        let comment = self.localizer.translate(
            "Subscription invoice paid. Id: %s. Invoice: %s",
            &[
                &gateway_id_value(subscription),
                invoice
                    .gateway_id()
                    .map(|id| id.value())
                    .unwrap_or_default(),
            ],
        );
        self.platform_orders
            .add_history_comment(&code, &comment)
            .await?;

        self.platform_orders.sync_platform_with(order).await?;
        Ok(())
    }

    async fn handle_pending(
        &self,
        subscription: &Subscription,
        order: &mut Order,
    ) -> Result<HandlerOutcome, HandlerError> {
        order.set_status(OrderStatus::Pending)?;
        let code = order_code(subscription, order)?;

        let comment = self.localizer.translate(
            "Subscription created at the gateway. Id: %s",
            &[&gateway_id_value(subscription)],
        );
        self.platform_orders
            .add_history_comment(&code, &comment)
            .await?;

        self.platform_orders.sync_platform_with(order).await?;
        Ok(HandlerOutcome::Completed)
    }

    async fn handle_failed(
        &self,
        subscription: &Subscription,
        order: &mut Order,
    ) -> Result<HandlerOutcome, HandlerError> {
        order.set_status(OrderStatus::Canceled)?;
        let code = order_code(subscription, order)?;

        self.platform_orders
            .set_state(&code, OrderState::Canceled)
            .await?;
        self.platform_orders.save(&code).await?;

        let comment = self.localizer.translate(
            "Subscription payment failed at the gateway. Id: %s",
            &[&gateway_id_value(subscription)],
        );
        self.platform_orders
            .add_history_comment(&code, &comment)
            .await?;

        self.platform_orders.sync_platform_with(order).await?;

        let comment = self.localizer.translate("Subscription canceled.", &[]);
        self.platform_orders
            .add_history_comment(&code, &comment)
            .await?;

        Ok(HandlerOutcome::Completed)
    }

    /// Registered customers only. Local code is not a stable dedup key across
    /// gateway ids, so a code collision forces delete-and-recreate; a record
    /// already stored under the incoming gateway id is left untouched.
    async fn upsert_customer(&self, customer: Option<&Customer>) -> Result<(), HandlerError> {
        let Some(customer) = customer else {
            return Ok(());
        };
        let Some(code) = customer.code() else {
            return Ok(());
        };

        if self.customers.find_by_code(code).await?.is_some() {
            self.customers.delete_by_code(code).await?;
        }

        let existing = match customer.gateway_id() {
            Some(gateway_id) => self.customers.find_by_gateway_id(gateway_id.value()).await?,
            None => None,
        };
        if existing.is_none() {
            self.customers.save(customer).await?;
        }

        Ok(())
    }
}

fn subscription_label(subscription: &Subscription) -> String {
    subscription
        .gateway_id()
        .map(|id| id.value().to_string())
        .or_else(|| subscription.code().map(str::to_string))
        .unwrap_or_else(|| "unknown".to_string())
}

fn gateway_id_value(subscription: &Subscription) -> String {
    subscription
        .gateway_id()
        .map(|id| id.value().to_string())
        .unwrap_or_default()
}

fn order_code(subscription: &Subscription, order: &Order) -> Result<String, HandlerError> {
    order
        .code()
        .map(str::to_string)
        .ok_or_else(|| HandlerError::MissingPlatformOrder(subscription_label(subscription)))
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::in_memory::{
        InMemoryRepository, PlatformCall, RecordingPlatformOrders, StaticInvoiceCreator,
        TemplateLocalizer,
    };
    use crate::kernel::ids::{ChargeId, CustomerId, SubscriptionId};
    use crate::recurrence::value_objects::SubscriptionStatus;

    struct TestBed {
        handler: SubscriptionHandler,
        charges: Arc<InMemoryRepository<Charge>>,
        subscriptions: Arc<InMemoryRepository<Subscription>>,
        customers: Arc<InMemoryRepository<Customer>>,
        invoices: Arc<InMemoryRepository<Invoice>>,
        platform: Arc<RecordingPlatformOrders>,
    }

    fn test_bed(creator: StaticInvoiceCreator) -> TestBed {
        let charges = Arc::new(InMemoryRepository::new());
        let subscriptions = Arc::new(InMemoryRepository::new());
        let customers = Arc::new(InMemoryRepository::new());
        let invoices = Arc::new(InMemoryRepository::new());
        let platform = Arc::new(RecordingPlatformOrders::new());

        let handler = SubscriptionHandler::new(
            charges.clone(),
            subscriptions.clone(),
            customers.clone(),
            invoices.clone(),
            Arc::new(creator),
            platform.clone(),
            Arc::new(TemplateLocalizer),
        );

        TestBed {
            handler,
            charges,
            subscriptions,
            customers,
            invoices,
            platform,
        }
    }

    fn subscription_with_status(status: ChargeStatus) -> Subscription {
        let mut charge = Charge::new(status);
        charge.set_gateway_id(ChargeId::new("ch_45asDadb8Xd95451").unwrap());
        charge.set_amount(2990).unwrap();

        let mut customer = Customer::new();
        customer.set_code("C-1001");
        customer.set_gateway_id(CustomerId::new("cus_45asDadb8Xd95451").unwrap());

        let mut subscription = Subscription::new(SubscriptionStatus::Active);
        subscription.set_gateway_id(SubscriptionId::new("sub_hdgeifuaudiv9ek3").unwrap());
        subscription.set_code("000000123");
        subscription.set_platform_order_code("000000123");
        subscription.set_current_charge(charge);
        subscription.set_customer(customer);
        subscription
    }

    #[tokio::test]
    async fn test_paid_status_completes_the_payment() {
        let bed = test_bed(StaticInvoiceCreator::creating());
        let subscription = subscription_with_status(ChargeStatus::Paid);

        let outcome = bed.handler.handle(&subscription).await.unwrap();
        assert_eq!(outcome, HandlerOutcome::Completed);

        assert_eq!(bed.charges.save_count(), 1);
        assert_eq!(bed.subscriptions.save_count(), 1);

        let invoices = bed.invoices.records();
        assert_eq!(invoices.len(), 1);
        assert_eq!(invoices[0].status(), Some(InvoiceStatus::Paid));

        let calls = bed.platform.calls();
        assert!(matches!(
            calls[0],
            PlatformCall::SetState { state: OrderState::Processing, .. }
        ));
        assert!(matches!(calls[1], PlatformCall::Comment { .. }));
        assert!(matches!(calls[2], PlatformCall::Sync { .. }));
        if let PlatformCall::Comment { text, .. } = &calls[1] {
            assert!(text.contains("sub_hdgeifuaudiv9ek3"));
        }
    }

    #[tokio::test]
    async fn test_paid_status_surfaces_the_cant_create_reason() {
        let bed = test_bed(StaticInvoiceCreator::refusing("No invoiceable items left"));
        let subscription = subscription_with_status(ChargeStatus::Paid);

        let outcome = bed.handler.handle(&subscription).await.unwrap();
        assert_eq!(
            outcome,
            HandlerOutcome::Refused(CantCreateReason::new("No invoiceable items left"))
        );

        // refused: no invoice persisted, no platform mutation
        assert!(bed.invoices.records().is_empty());
        assert!(bed.platform.calls().is_empty());
        // the unconditional saves still happened
        assert_eq!(bed.charges.save_count(), 1);
        assert_eq!(bed.subscriptions.save_count(), 1);
    }

    #[tokio::test]
    async fn test_pending_status_comments_and_syncs() {
        let bed = test_bed(StaticInvoiceCreator::creating());
        let subscription = subscription_with_status(ChargeStatus::Pending);

        let outcome = bed.handler.handle(&subscription).await.unwrap();
        assert_eq!(outcome, HandlerOutcome::Completed);

        let calls = bed.platform.calls();
        assert_eq!(calls.len(), 2);
        if let PlatformCall::Comment { code, text } = &calls[0] {
            assert_eq!(code, "000000123");
            assert!(text.contains("sub_hdgeifuaudiv9ek3"));
        } else {
            panic!("expected a history comment first");
        }
        assert!(matches!(
            &calls[1],
            PlatformCall::Sync { status: OrderStatus::Pending, .. }
        ));
        assert!(bed.invoices.records().is_empty());
    }

    #[tokio::test]
    async fn test_failed_status_cancels_and_comments_twice() {
        let bed = test_bed(StaticInvoiceCreator::creating());
        let subscription = subscription_with_status(ChargeStatus::Failed);

        bed.handler.handle(&subscription).await.unwrap();

        let calls = bed.platform.calls();
        assert!(matches!(
            calls[0],
            PlatformCall::SetState { state: OrderState::Canceled, .. }
        ));
        assert!(matches!(calls[1], PlatformCall::Save { .. }));
        assert!(matches!(calls[2], PlatformCall::Comment { .. }));
        assert!(matches!(
            &calls[3],
            PlatformCall::Sync { status: OrderStatus::Canceled, .. }
        ));
        if let PlatformCall::Comment { text, .. } = &calls[4] {
            assert!(text.contains("canceled"));
        } else {
            panic!("expected a closing comment");
        }
    }

    #[tokio::test]
    async fn test_unhandled_status_is_an_error_not_a_silent_success() {
        let bed = test_bed(StaticInvoiceCreator::creating());
        let subscription = subscription_with_status(ChargeStatus::Underpaid);

        let err = bed.handler.handle(&subscription).await.unwrap_err();
        assert!(matches!(err, HandlerError::UnhandledStatus(ref tag) if tag == "underpaid"));

        // the unconditional persistence steps ran before dispatch rejected
        assert_eq!(bed.charges.save_count(), 1);
        assert_eq!(bed.subscriptions.save_count(), 1);
        assert!(bed.platform.calls().is_empty());
    }

    #[tokio::test]
    async fn test_re_delivery_does_not_duplicate_records() {
        let bed = test_bed(StaticInvoiceCreator::creating());
        let subscription = subscription_with_status(ChargeStatus::Paid);

        bed.handler.handle(&subscription).await.unwrap();
        bed.handler.handle(&subscription).await.unwrap();

        assert_eq!(bed.charges.records().len(), 1);
        assert_eq!(bed.subscriptions.records().len(), 1);
        assert_eq!(bed.invoices.records().len(), 1);
        assert_eq!(bed.customers.records().len(), 1);
    }

    #[tokio::test]
    async fn test_customer_code_collision_forces_recreate() {
        let bed = test_bed(StaticInvoiceCreator::creating());

        let mut stale = Customer::new();
        stale.set_code("C-1001");
        stale.set_gateway_id(CustomerId::new("cus_0000000000000000").unwrap());
        bed.customers.save(&stale).await.unwrap();

        let subscription = subscription_with_status(ChargeStatus::Pending);
        bed.handler.handle(&subscription).await.unwrap();

        let customers = bed.customers.records();
        assert_eq!(customers.len(), 1);
        assert_eq!(
            customers[0].gateway_id().unwrap().value(),
            "cus_45asDadb8Xd95451"
        );
    }

    #[tokio::test]
    async fn test_customer_known_under_gateway_id_is_left_untouched() {
        let bed = test_bed(StaticInvoiceCreator::creating());

        let mut known = Customer::new();
        known.set_code("C-other");
        known.set_gateway_id(CustomerId::new("cus_45asDadb8Xd95451").unwrap());
        bed.customers.save(&known).await.unwrap();

        let subscription = subscription_with_status(ChargeStatus::Pending);
        bed.handler.handle(&subscription).await.unwrap();

        let customers = bed.customers.records();
        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].code(), Some("C-other"));
    }

    #[tokio::test]
    async fn test_subscription_without_charge_is_rejected() {
        let bed = test_bed(StaticInvoiceCreator::creating());
        let mut subscription = Subscription::new(SubscriptionStatus::Active);
        subscription.set_code("000000123");

        let err = bed.handler.handle(&subscription).await.unwrap_err();
        assert!(matches!(err, HandlerError::MissingCharge(_)));
    }
}
