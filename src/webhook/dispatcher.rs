use tracing::{error, info, warn};
use uuid::Uuid;

use crate::recurrence::errors::HandlerError;
use crate::recurrence::handlers::{HandlerOutcome, SubscriptionHandler};

use super::aggregate::WebhookEntity;
use super::errors::WebhookError;
use super::factory::WebhookFactory;

// ============================================================================
// Webhook Delivery Boundary
// ============================================================================
//
// Turns one raw gateway delivery into a verdict the transport layer can map
// to a response code. Malformed payloads and infrastructure failures ask the
// gateway to redeliver; deterministic rejections do not, since retrying the
// same payload cannot succeed.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryVerdict {
    /// Webhook replayed into local state.
    Processed,
    /// Valid delivery the core takes no action on.
    Ignored,
    /// Deterministic rejection with a human-readable reason; redelivery
    /// cannot succeed.
    Refused { reason: String },
    /// Transient failure; the gateway must redeliver (non-2xx response).
    Retry { error: String },
}

pub struct WebhookDispatcher {
    subscription_handler: SubscriptionHandler,
}

impl WebhookDispatcher {
    pub fn new(subscription_handler: SubscriptionHandler) -> Self {
        Self {
            subscription_handler,
        }
    }

    pub async fn dispatch(&self, raw: &str) -> DeliveryVerdict {
        let delivery_id = Uuid::new_v4();

        let webhook = match WebhookFactory::create_from_json(raw) {
            Ok(webhook) => webhook,
            Err(WebhookError::UnsupportedEntity(entity)) => {
                warn!(%delivery_id, entity, "ignoring webhook for unsupported entity");
                return DeliveryVerdict::Ignored;
            }
            Err(err) => {
                error!(%delivery_id, %err, "rejecting malformed webhook delivery");
                return DeliveryVerdict::Retry {
                    error: err.to_string(),
                };
            }
        };

        info!(
            %delivery_id,
            webhook_type = %webhook.webhook_type(),
            component = %webhook.component(),
            "dispatching webhook"
        );

        match webhook.entity() {
            WebhookEntity::Subscription(subscription) => {
                match self.subscription_handler.handle(subscription).await {
                    Ok(HandlerOutcome::Completed) => DeliveryVerdict::Processed,
                    Ok(HandlerOutcome::Refused(reason)) => {
                        info!(%delivery_id, %reason, "platform refused the delivery");
                        DeliveryVerdict::Refused {
                            reason: reason.message().to_string(),
                        }
                    }
                    Err(err @ HandlerError::Port(_)) => {
                        error!(%delivery_id, %err, "infrastructure failure while handling webhook");
                        DeliveryVerdict::Retry {
                            error: err.to_string(),
                        }
                    }
                    Err(err) => {
                        error!(%delivery_id, %err, "webhook handling failed deterministically");
                        DeliveryVerdict::Refused {
                            reason: err.to_string(),
                        }
                    }
                }
            }
            WebhookEntity::Charge(_) | WebhookEntity::Invoice(_) => {
                // charge/invoice deliveries update nothing beyond what the
                // subscription flow already replays
                info!(%delivery_id, "acknowledging delivery with no local action");
                DeliveryVerdict::Ignored
            }
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::infrastructure::in_memory::{
        InMemoryRepository, RecordingPlatformOrders, StaticInvoiceCreator, TemplateLocalizer,
    };
    use crate::telemetry;

    fn dispatcher(creator: StaticInvoiceCreator) -> WebhookDispatcher {
        let handler = SubscriptionHandler::new(
            Arc::new(InMemoryRepository::<crate::kernel::Charge>::new()),
            Arc::new(InMemoryRepository::<crate::recurrence::Subscription>::new()),
            Arc::new(InMemoryRepository::<crate::payment::Customer>::new()),
            Arc::new(InMemoryRepository::<crate::recurrence::Invoice>::new()),
            Arc::new(creator),
            Arc::new(RecordingPlatformOrders::new()),
            Arc::new(TemplateLocalizer),
        );
        WebhookDispatcher::new(handler)
    }

    fn paid_subscription_delivery() -> &'static str {
        r#"{
            "type": "subscription.charge_paid",
            "id": "hook_xxxxxxxxxxxxxxxx",
            "data": {
                "id": "sub_hdgeifuaudiv9ek3",
                "code": "000000123",
                "status": "active",
                "platform_order_code": "000000123",
                "current_charge": {
                    "id": "ch_45asDadb8Xd95451",
                    "amount": 2990,
                    "status": "paid"
                }
            }
        }"#
    }

    #[tokio::test]
    async fn test_processed_delivery() {
        telemetry::init();
        let verdict = dispatcher(StaticInvoiceCreator::creating())
            .dispatch(paid_subscription_delivery())
            .await;
        assert_eq!(verdict, DeliveryVerdict::Processed);
    }

    #[tokio::test]
    async fn test_business_refusal_carries_the_reason() {
        let verdict = dispatcher(StaticInvoiceCreator::refusing("Order already invoiced"))
            .dispatch(paid_subscription_delivery())
            .await;
        assert_eq!(
            verdict,
            DeliveryVerdict::Refused {
                reason: "Order already invoiced".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_malformed_payload_asks_for_redelivery() {
        let verdict = dispatcher(StaticInvoiceCreator::creating())
            .dispatch("{not json")
            .await;
        assert!(matches!(verdict, DeliveryVerdict::Retry { .. }));
    }

    #[tokio::test]
    async fn test_unhandled_status_is_refused_not_retried() {
        let delivery = r#"{
            "type": "subscription.charge_underpaid",
            "id": "hook_xxxxxxxxxxxxxxxx",
            "data": {
                "id": "sub_hdgeifuaudiv9ek3",
                "code": "000000123",
                "status": "active",
                "platform_order_code": "000000123",
                "current_charge": {"id": "ch_45asDadb8Xd95451", "status": "underpaid"}
            }
        }"#;
        let verdict = dispatcher(StaticInvoiceCreator::creating())
            .dispatch(delivery)
            .await;
        assert!(matches!(verdict, DeliveryVerdict::Refused { .. }));
    }

    #[tokio::test]
    async fn test_unsupported_entity_is_ignored() {
        let verdict = dispatcher(StaticInvoiceCreator::creating())
            .dispatch(r#"{"type": "refund.created", "id": "hook_xxxxxxxxxxxxxxxx", "data": {}}"#)
            .await;
        assert_eq!(verdict, DeliveryVerdict::Ignored);
    }

    #[tokio::test]
    async fn test_charge_entity_is_acknowledged_without_action() {
        let verdict = dispatcher(StaticInvoiceCreator::creating())
            .dispatch(
                r#"{
                    "type": "charge.paid",
                    "id": "hook_xxxxxxxxxxxxxxxx",
                    "data": {"id": "ch_45asDadb8Xd95451", "status": "paid"}
                }"#,
            )
            .await;
        assert_eq!(verdict, DeliveryVerdict::Ignored);
    }
}
