use serde::Deserialize;

use crate::kernel::ids::WebhookId;
use crate::recurrence::factories::{
    charge_from_data, invoice_from_data, ChargeData, InvoiceData, SubscriptionData,
    SubscriptionFactory,
};

use super::aggregate::{Webhook, WebhookEntity};
use super::errors::WebhookError;
use super::value_objects::WebhookType;

// ============================================================================
// Webhook Factory
// ============================================================================

/// Inbound webhook delivery: `{ type: "<entity>.<action>", id, data }`.
#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    #[serde(rename = "type")]
    pub event_type: String,
    pub id: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

pub struct WebhookFactory;

impl WebhookFactory {
    pub fn create_from_json(json: &str) -> Result<Webhook, WebhookError> {
        let payload: WebhookPayload = serde_json::from_str(json)?;
        Self::create_from_post_data(&payload)
    }

    pub fn create_from_post_data(payload: &WebhookPayload) -> Result<Webhook, WebhookError> {
        let webhook_type = WebhookType::from_post_type(&payload.event_type)?;

        let entity = match webhook_type.entity_type() {
            "charge" => {
                let data: ChargeData = serde_json::from_value(payload.data.clone())?;
                WebhookEntity::Charge(charge_from_data(&data)?)
            }
            "subscription" => {
                let data: SubscriptionData = serde_json::from_value(payload.data.clone())?;
                WebhookEntity::Subscription(Box::new(SubscriptionFactory::create_from_gateway_data(
                    &data,
                )?))
            }
            "invoice" => {
                let data: InvoiceData = serde_json::from_value(payload.data.clone())?;
                WebhookEntity::Invoice(invoice_from_data(&data)?)
            }
            other => return Err(WebhookError::UnsupportedEntity(other.to_string())),
        };

        let mut webhook = Webhook::new(webhook_type, entity);
        webhook.set_gateway_id(WebhookId::new(payload.id.as_str())?);
        Ok(webhook)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
