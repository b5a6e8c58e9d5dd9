use chrono::NaiveDateTime;
use serde_json::json;

use crate::kernel::ids::PlanItemId;

use super::repetition::{Increment, Repetition};
use super::value_objects::PricingScheme;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const TEXT_LIMIT: usize = 256;

// ============================================================================
// SubProduct Aggregate
// ============================================================================
//
// A recurring-billing line item. Product and product-recurrence are weak
// references by numeric id. Name and description are sanitized on every set,
// so the constraints hold after construction no matter the input. Timestamps
// are stored as formatted strings: this aggregate sits at a serialization
// boundary and never hands raw temporal values onward.
//
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubProduct {
    id: Option<i64>,
    gateway_id: Option<PlanItemId>,
    product_id: Option<i64>,
    product_recurrence_id: Option<i64>,
    recurrence_type: Option<String>,
    name: String,
    description: String,
    pricing_scheme: Option<PricingScheme>,
    quantity: i64,
    cycles: i64,
    increment: Option<Increment>,
    selected_repetition: Option<Repetition>,
    created_at: Option<String>,
    updated_at: Option<String>,
}

/// Drops `<...>` spans. An unterminated `<` discards the remainder of the
/// input, matching how markup strippers treat a dangling open bracket.
fn strip_markup(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_tag = false;
    for c in input.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

fn truncate_chars(input: &str, limit: usize) -> String {
    input.chars().take(limit).collect()
}

impl SubProduct {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    pub fn gateway_id(&self) -> Option<&PlanItemId> {
        self.gateway_id.as_ref()
    }

    pub fn set_gateway_id(&mut self, gateway_id: PlanItemId) {
        self.gateway_id = Some(gateway_id);
    }

    pub fn product_id(&self) -> Option<i64> {
        self.product_id
    }

    pub fn set_product_id(&mut self, product_id: i64) {
        self.product_id = Some(product_id);
    }

    pub fn product_recurrence_id(&self) -> Option<i64> {
        self.product_recurrence_id
    }

    pub fn set_product_recurrence_id(&mut self, product_recurrence_id: i64) {
        self.product_recurrence_id = Some(product_recurrence_id);
    }

    pub fn recurrence_type(&self) -> Option<&str> {
        self.recurrence_type.as_deref()
    }

    pub fn set_recurrence_type(&mut self, recurrence_type: impl Into<String>) {
        self.recurrence_type = Some(recurrence_type.into());
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Markup is stripped, anything outside `[A-Za-z0-9 ]` is removed and
    /// the result is truncated to 256 characters.
    pub fn set_name(&mut self, name: &str) {
        let stripped = strip_markup(name);
        let cleaned: String = stripped
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
            .collect();
        self.name = truncate_chars(&cleaned, TEXT_LIMIT);
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Markup is stripped and the result truncated to 256 characters;
    /// punctuation is kept.
    pub fn set_description(&mut self, description: &str) {
        self.description = truncate_chars(&strip_markup(description), TEXT_LIMIT);
    }

    pub fn pricing_scheme(&self) -> Option<&PricingScheme> {
        self.pricing_scheme.as_ref()
    }

    pub fn set_pricing_scheme(&mut self, pricing_scheme: PricingScheme) {
        self.pricing_scheme = Some(pricing_scheme);
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn set_quantity(&mut self, quantity: i64) {
        self.quantity = quantity;
    }

    pub fn cycles(&self) -> i64 {
        self.cycles
    }

    pub fn set_cycles(&mut self, cycles: i64) {
        self.cycles = cycles;
    }

    pub fn increment(&self) -> Option<&Increment> {
        self.increment.as_ref()
    }

    pub fn set_increment(&mut self, increment: Increment) {
        self.increment = Some(increment);
    }

    pub fn selected_repetition(&self) -> Option<&Repetition> {
        self.selected_repetition.as_ref()
    }

    pub fn set_selected_repetition(&mut self, repetition: Repetition) {
        self.selected_repetition = Some(repetition);
    }

    pub fn created_at(&self) -> Option<&str> {
        self.created_at.as_deref()
    }

    pub fn set_created_at(&mut self, created_at: NaiveDateTime) {
        self.created_at = Some(created_at.format(DATE_FORMAT).to_string());
    }

    pub fn updated_at(&self) -> Option<&str> {
        self.updated_at.as_deref()
    }

    pub fn set_updated_at(&mut self, updated_at: NaiveDateTime) {
        self.updated_at = Some(updated_at.format(DATE_FORMAT).to_string());
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "id": self.id,
            "gatewayId": self.gateway_id.as_ref().map(PlanItemId::value),
            "productId": self.product_id,
            "productRecurrenceId": self.product_recurrence_id,
            "recurrenceType": self.recurrence_type,
            "name": self.name,
            "description": self.description,
            "pricingScheme": self.pricing_scheme.as_ref().map(PricingScheme::to_gateway_request),
            "quantity": self.quantity,
            "cycles": self.cycles,
            "increment": self.increment.as_ref().map(Increment::to_gateway_request),
            "createdAt": self.created_at,
            "updatedAt": self.updated_at,
        })
    }

    /// Plan-item fragment of a gateway plan request.
    pub fn to_gateway_request(&self) -> serde_json::Value {
        let mut item = json!({
            "name": self.name,
            "description": self.description,
            "pricing_scheme": self.pricing_scheme.as_ref().map(PricingScheme::to_gateway_request),
            "cycles": self.cycles,
            "quantity": self.quantity,
            "plan_item_id": self.id,
            "id": self.gateway_id.as_ref().map(PlanItemId::value),
            "status": "active",
        });
        if let Some(increment) = &self.increment {
            item["increments"] = json!([increment.to_gateway_request()]);
        }
        item
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recurrence::value_objects::IncrementType;

    #[test]
    fn test_name_sanitation_strips_markup_and_punctuation() {
        let mut product = SubProduct::new();
        product.set_name("<b>Hello</b> World!");
        assert_eq!(product.name(), "Hello World");
    }

    #[test]
    fn test_name_is_truncated_to_256_chars() {
        let mut product = SubProduct::new();
        product.set_name(&"a".repeat(300));
        assert_eq!(product.name().chars().count(), 256);
    }

    #[test]
    fn test_description_keeps_punctuation() {
        let mut product = SubProduct::new();
        product.set_description("<p>Monthly plan, renews automatically!</p>");
        assert_eq!(product.description(), "Monthly plan, renews automatically!");

        product.set_description(&"b".repeat(400));
        assert_eq!(product.description().chars().count(), 256);
    }

    #[test]
    fn test_unterminated_markup_drops_the_remainder() {
        let mut product = SubProduct::new();
        product.set_name("Basic <b plan");
        assert_eq!(product.name(), "Basic ");
    }

    #[test]
    fn test_timestamps_are_stored_formatted() {
        let mut product = SubProduct::new();
        let when = NaiveDateTime::parse_from_str("2024-05-01 10:30:00", DATE_FORMAT).unwrap();
        product.set_created_at(when);
        assert_eq!(product.created_at(), Some("2024-05-01 10:30:00"));
    }

    #[test]
    fn test_gateway_request_shape() {
        let mut product = SubProduct::new();
        product.set_id(10);
        product.set_name("Basic plan");
        product.set_pricing_scheme(PricingScheme::unit(990));
        product.set_quantity(1);
        product.set_cycles(12);
        product.set_increment(Increment::new(100, IncrementType::Flat));

        let request = product.to_gateway_request();
        assert_eq!(request["plan_item_id"], 10);
        assert_eq!(request["status"], "active");
        assert_eq!(request["pricing_scheme"]["scheme_type"], "unit");
        assert_eq!(request["increments"][0]["value"], 100);
    }
}
