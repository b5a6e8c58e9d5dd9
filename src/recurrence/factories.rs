use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::kernel::charge::Charge;
use crate::kernel::errors::ParseError;
use crate::kernel::ids::{ChargeId, InvoiceId, PlanItemId, SubscriptionId};
use crate::kernel::value_objects::{ChargeStatus, InvoiceStatus, TransactionType};
use crate::payment::customer::{non_empty, CustomerData, CustomerFactory};
use crate::payment::value_objects::PaymentMethodKind;

use super::invoice::{Cycle, Invoice};
use super::sub_product::SubProduct;
use super::subscription::Subscription;
use super::value_objects::{PricingScheme, SubscriptionStatus};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ============================================================================
// Aggregate Factories
// ============================================================================
//
// Reconstruction of aggregates from heterogeneous input: form posts, DB rows
// and gateway JSON all funnel through the same optional-field schema structs.
// Absent or empty fields keep the aggregate defaults; numeric fields accept
// numbers and numeric strings alike. Malformed dates and unknown variant
// selectors abort the factory call naming the offending field.
//
// ============================================================================

/// Accepts a JSON number, a numeric string, an empty string (absent) or null.
fn flex_opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Str(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Int(value)) => Ok(Some(value)),
        Some(Raw::Str(value)) if value.trim().is_empty() => Ok(None),
        Some(Raw::Str(value)) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid integer: {value}"))),
    }
}

fn parse_naive_date(field: &'static str, value: &str) -> Result<NaiveDateTime, ParseError> {
    NaiveDateTime::parse_from_str(value, DATE_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|d| d.naive_utc()))
        .or_else(|_| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d").map(|d| d.and_time(NaiveTime::MIN))
        })
        .map_err(|_| ParseError::MalformedDate {
            field,
            value: value.to_string(),
        })
}

fn parse_utc_date(field: &'static str, value: &str) -> Result<DateTime<Utc>, ParseError> {
    parse_naive_date(field, value).map(|naive| naive.and_utc())
}

// ============================================================================
// SubProduct Factory
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SubProductData {
    #[serde(deserialize_with = "flex_opt_i64")]
    pub id: Option<i64>,
    pub gateway_id: Option<String>,
    #[serde(deserialize_with = "flex_opt_i64")]
    pub product_id: Option<i64>,
    #[serde(deserialize_with = "flex_opt_i64")]
    pub product_recurrence_id: Option<i64>,
    pub recurrence_type: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(deserialize_with = "flex_opt_i64")]
    pub price: Option<i64>,
    pub price_type: Option<String>,
    #[serde(deserialize_with = "flex_opt_i64")]
    pub quantity: Option<i64>,
    #[serde(deserialize_with = "flex_opt_i64")]
    pub cycles: Option<i64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

pub struct SubProductFactory;

impl SubProductFactory {
    pub fn create_from_post_data(data: &SubProductData) -> Result<SubProduct, ParseError> {
        let mut product = SubProduct::new();

        if let Some(id) = nonzero(data.id) {
            product.set_id(id);
        }
        if let Some(gateway_id) = non_empty(data.gateway_id.as_deref()) {
            product.set_gateway_id(PlanItemId::new(gateway_id).map_err(ParseError::Validation)?);
        }
        if let Some(product_id) = nonzero(data.product_id) {
            product.set_product_id(product_id);
        }
        if let Some(recurrence_id) = nonzero(data.product_recurrence_id) {
            product.set_product_recurrence_id(recurrence_id);
        }
        if let Some(recurrence_type) = non_empty(data.recurrence_type.as_deref()) {
            product.set_recurrence_type(recurrence_type);
        }
        if let Some(name) = non_empty(data.name.as_deref()) {
            product.set_name(name);
        }
        if let Some(description) = non_empty(data.description.as_deref()) {
            product.set_description(description);
        }
        if let Some(price) = nonzero(data.price) {
            let selector = non_empty(data.price_type.as_deref()).unwrap_or("UNIT");
            product.set_pricing_scheme(PricingScheme::from_selector(selector, price)?);
        }
        if let Some(quantity) = nonzero(data.quantity) {
            product.set_quantity(quantity);
        }
        if let Some(cycles) = nonzero(data.cycles) {
            product.set_cycles(cycles);
        }
        if let Some(created_at) = non_empty(data.created_at.as_deref()) {
            product.set_created_at(parse_naive_date("created_at", created_at)?);
        }
        if let Some(updated_at) = non_empty(data.updated_at.as_deref()) {
            product.set_updated_at(parse_naive_date("updated_at", updated_at)?);
        }

        Ok(product)
    }

    /// Persisted rows share the post-data path: both are string-keyed maps
    /// with the same field names.
    pub fn create_from_db_row(row: &SubProductData) -> Result<SubProduct, ParseError> {
        Self::create_from_post_data(row)
    }

    pub fn create_from_json(json: &str) -> Result<SubProduct, ParseError> {
        let data: SubProductData = serde_json::from_str(json)?;
        Self::create_from_post_data(&data)
    }
}

// Zero is the "empty" sentinel in form posts and DB rows.
fn nonzero(value: Option<i64>) -> Option<i64> {
    value.filter(|v| *v != 0)
}

// ============================================================================
// Charge / Invoice / Subscription reconstruction from gateway payloads
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChargeData {
    #[serde(alias = "id")]
    pub gateway_id: Option<String>,
    pub code: Option<String>,
    #[serde(deserialize_with = "flex_opt_i64")]
    pub amount: Option<i64>,
    #[serde(deserialize_with = "flex_opt_i64")]
    pub paid_amount: Option<i64>,
    pub status: Option<String>,
    pub payment_method: Option<String>,
}

pub fn charge_from_data(data: &ChargeData) -> Result<Charge, ParseError> {
    let status = match non_empty(data.status.as_deref()) {
        Some(tag) => ChargeStatus::from_tag(tag).map_err(|_| ParseError::UnknownVariant {
            field: "status",
            value: tag.to_string(),
        })?,
        None => ChargeStatus::Pending,
    };

    let mut charge = Charge::new(status);
    if let Some(gateway_id) = non_empty(data.gateway_id.as_deref()) {
        charge.set_gateway_id(ChargeId::new(gateway_id).map_err(ParseError::Validation)?);
    }
    if let Some(code) = non_empty(data.code.as_deref()) {
        charge.set_code(code);
    }
    if let Some(amount) = data.amount {
        charge.set_amount(amount).map_err(ParseError::Validation)?;
    }
    if let Some(paid_amount) = data.paid_amount {
        charge
            .set_paid_amount(paid_amount)
            .map_err(ParseError::Validation)?;
    }
    if let Some(method) = non_empty(data.payment_method.as_deref()) {
        let method = TransactionType::from_tag(method).map_err(|_| ParseError::UnknownVariant {
            field: "payment_method",
            value: method.to_string(),
        })?;
        charge.set_payment_method(method);
    }

    Ok(charge)
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CycleData {
    pub start_at: Option<String>,
    pub end_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InvoiceData {
    #[serde(alias = "id")]
    pub gateway_id: Option<String>,
    #[serde(deserialize_with = "flex_opt_i64")]
    pub amount: Option<i64>,
    pub status: Option<String>,
    pub payment_method: Option<String>,
    pub installments: Option<bool>,
    pub cycle: Option<CycleData>,
    pub subscription_id: Option<String>,
    #[serde(deserialize_with = "flex_opt_i64")]
    pub total_discount: Option<i64>,
    #[serde(deserialize_with = "flex_opt_i64")]
    pub total_increment: Option<i64>,
    pub customer: Option<CustomerData>,
}

pub fn invoice_from_data(data: &InvoiceData) -> Result<Invoice, ParseError> {
    let mut invoice = Invoice::new();

    if let Some(gateway_id) = non_empty(data.gateway_id.as_deref()) {
        invoice.set_gateway_id(InvoiceId::new(gateway_id).map_err(ParseError::Validation)?);
    }
    if let Some(amount) = data.amount {
        invoice.set_amount(amount).map_err(ParseError::Validation)?;
    }
    if let Some(tag) = non_empty(data.status.as_deref()) {
        let status = InvoiceStatus::from_tag(tag).map_err(|_| ParseError::UnknownVariant {
            field: "status",
            value: tag.to_string(),
        })?;
        invoice.set_status(status);
    }
    if let Some(method) = non_empty(data.payment_method.as_deref()) {
        let method =
            PaymentMethodKind::from_tag(method).map_err(|_| ParseError::UnknownVariant {
                field: "payment_method",
                value: method.to_string(),
            })?;
        invoice.set_payment_method(method);
    }
    if let Some(installments) = data.installments {
        invoice.set_installments(installments);
    }
    if let Some(cycle_data) = &data.cycle {
        let mut cycle = Cycle::new();
        if let Some(start) = non_empty(cycle_data.start_at.as_deref()) {
            cycle.set_cycle_start(parse_utc_date("start_at", start)?);
        }
        if let Some(end) = non_empty(cycle_data.end_at.as_deref()) {
            cycle.set_cycle_end(parse_utc_date("end_at", end)?);
        }
        invoice.set_cycle(cycle);
    }
    if let Some(subscription_id) = non_empty(data.subscription_id.as_deref()) {
        invoice.set_subscription_id(
            SubscriptionId::new(subscription_id).map_err(ParseError::Validation)?,
        );
    }
    if let Some(discount) = data.total_discount {
        invoice.set_total_discount(discount);
    }
    if let Some(increment) = data.total_increment {
        invoice.set_total_increment(increment);
    }
    if let Some(customer) = &data.customer {
        invoice.set_customer(CustomerFactory::create_from_data(customer)?);
    }

    Ok(invoice)
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SubscriptionData {
    #[serde(alias = "id")]
    pub gateway_id: Option<String>,
    pub code: Option<String>,
    pub status: Option<String>,
    pub payment_method: Option<String>,
    pub installments: Option<bool>,
    #[serde(alias = "order_code")]
    pub platform_order_code: Option<String>,
    #[serde(alias = "charge")]
    pub current_charge: Option<ChargeData>,
    pub invoice: Option<InvoiceData>,
    pub customer: Option<CustomerData>,
}

pub struct SubscriptionFactory;

impl SubscriptionFactory {
    pub fn create_from_json(json: &str) -> Result<Subscription, ParseError> {
        let data: SubscriptionData = serde_json::from_str(json)?;
        Self::create_from_gateway_data(&data)
    }

    pub fn create_from_gateway_data(data: &SubscriptionData) -> Result<Subscription, ParseError> {
        let status = match non_empty(data.status.as_deref()) {
            Some(tag) => {
                SubscriptionStatus::from_tag(tag).map_err(|_| ParseError::UnknownVariant {
                    field: "status",
                    value: tag.to_string(),
                })?
            }
            None => SubscriptionStatus::Active,
        };

        let mut subscription = Subscription::new(status);
        if let Some(gateway_id) = non_empty(data.gateway_id.as_deref()) {
            subscription
                .set_gateway_id(SubscriptionId::new(gateway_id).map_err(ParseError::Validation)?);
        }
        if let Some(code) = non_empty(data.code.as_deref()) {
            subscription.set_code(code);
        }
        if let Some(method) = non_empty(data.payment_method.as_deref()) {
            let method =
                PaymentMethodKind::from_tag(method).map_err(|_| ParseError::UnknownVariant {
                    field: "payment_method",
                    value: method.to_string(),
                })?;
            subscription.set_payment_method(method);
        }
        if let Some(installments) = data.installments {
            subscription.set_installments(installments);
        }
        if let Some(order_code) = non_empty(data.platform_order_code.as_deref()) {
            subscription.set_platform_order_code(order_code);
        }
        if let Some(charge_data) = &data.current_charge {
            subscription.set_current_charge(charge_from_data(charge_data)?);
        }
        if let Some(invoice_data) = &data.invoice {
            subscription.set_invoice(invoice_from_data(invoice_data)?);
        }
        if let Some(customer_data) = &data.customer {
            subscription.set_customer(CustomerFactory::create_from_data(customer_data)?);
        }

        Ok(subscription)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
