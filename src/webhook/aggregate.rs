use serde_json::json;

use crate::kernel::charge::Charge;
use crate::kernel::ids::WebhookId;
use crate::recurrence::invoice::Invoice;
use crate::recurrence::subscription::Subscription;

use super::value_objects::{Component, WebhookType};

// ============================================================================
// Webhook Aggregate
// ============================================================================

/// Entity payload carried by a webhook, keyed by the event's entity type.
#[derive(Debug, Clone)]
pub enum WebhookEntity {
    Charge(Charge),
    Subscription(Box<Subscription>),
    Invoice(Invoice),
}

impl WebhookEntity {
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Charge(charge) => charge.to_json(),
            Self::Subscription(subscription) => subscription.to_json(),
            Self::Invoice(invoice) => invoice.to_json(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Webhook {
    id: Option<i64>,
    gateway_id: Option<WebhookId>,
    webhook_type: WebhookType,
    entity: WebhookEntity,
    component: Component,
}

impl Webhook {
    pub fn new(webhook_type: WebhookType, entity: WebhookEntity) -> Self {
        let component = Component::from_entity_type(webhook_type.entity_type());
        Self {
            id: None,
            gateway_id: None,
            webhook_type,
            entity,
            component,
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    pub fn gateway_id(&self) -> Option<&WebhookId> {
        self.gateway_id.as_ref()
    }

    pub fn set_gateway_id(&mut self, gateway_id: WebhookId) {
        self.gateway_id = Some(gateway_id);
    }

    pub fn webhook_type(&self) -> &WebhookType {
        &self.webhook_type
    }

    pub fn entity(&self) -> &WebhookEntity {
        &self.entity
    }

    pub fn component(&self) -> Component {
        self.component
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "id": self.id,
            "gatewayId": self.gateway_id.as_ref().map(WebhookId::value),
            "type": self.webhook_type.to_string(),
            "component": self.component.as_tag(),
            "entity": self.entity.to_json(),
        })
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
