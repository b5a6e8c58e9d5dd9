use serde::Deserialize;
use serde_json::json;

use crate::kernel::errors::ParseError;
use crate::kernel::ids::CustomerId;
use crate::ports::Identified;

use super::value_objects::CustomerType;

// ============================================================================
// Customer Aggregate
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Customer {
    id: Option<i64>,
    code: Option<String>,
    gateway_id: Option<CustomerId>,
    name: Option<String>,
    email: Option<String>,
    document: Option<String>,
    customer_type: Option<CustomerType>,
}

impl Customer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    /// Local code on the host platform. Customers without a code are
    /// anonymous buyers and never persisted.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn set_code(&mut self, code: impl Into<String>) {
        self.code = Some(code.into());
    }

    pub fn gateway_id(&self) -> Option<&CustomerId> {
        self.gateway_id.as_ref()
    }

    pub fn set_gateway_id(&mut self, gateway_id: CustomerId) {
        self.gateway_id = Some(gateway_id);
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = Some(email.into());
    }

    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }

    pub fn set_document(&mut self, document: impl Into<String>) {
        self.document = Some(document.into());
    }

    pub fn customer_type(&self) -> Option<CustomerType> {
        self.customer_type
    }

    pub fn set_customer_type(&mut self, customer_type: CustomerType) {
        self.customer_type = Some(customer_type);
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "id": self.id,
            "code": self.code,
            "gatewayId": self.gateway_id.as_ref().map(CustomerId::value),
            "name": self.name,
            "email": self.email,
            "document": self.document,
            "type": self.customer_type.map(|t| t.as_tag()),
        })
    }
}

impl Identified for Customer {
    fn local_code(&self) -> Option<String> {
        self.code.clone()
    }

    fn gateway_key(&self) -> Option<String> {
        self.gateway_id.as_ref().map(|id| id.value().to_string())
    }
}

// ============================================================================
// Customer Factory
// ============================================================================

/// Schema for customer data arriving inside payment instructions, webhook
/// entities or persisted rows. Absent fields keep the aggregate defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CustomerData {
    pub id: Option<i64>,
    pub code: Option<String>,
    #[serde(rename = "customerId", alias = "gateway_id")]
    pub customer_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub document: Option<String>,
    #[serde(rename = "type")]
    pub customer_type: Option<String>,
}

pub struct CustomerFactory;

impl CustomerFactory {
    pub fn create_from_json(json: &str) -> Result<Customer, ParseError> {
        let data: CustomerData = serde_json::from_str(json)?;
        Self::create_from_data(&data)
    }

    pub fn create_from_data(data: &CustomerData) -> Result<Customer, ParseError> {
        let mut customer = Customer::new();

        if let Some(id) = data.id {
            customer.set_id(id);
        }
        if let Some(code) = non_empty(data.code.as_deref()) {
            customer.set_code(code);
        }
        if let Some(gateway_id) = non_empty(data.customer_id.as_deref()) {
            customer.set_gateway_id(CustomerId::new(gateway_id).map_err(ParseError::Validation)?);
        }
        if let Some(name) = non_empty(data.name.as_deref()) {
            customer.set_name(name);
        }
        if let Some(email) = non_empty(data.email.as_deref()) {
            customer.set_email(email);
        }
        if let Some(document) = non_empty(data.document.as_deref()) {
            customer.set_document(document);
        }
        if let Some(tag) = non_empty(data.customer_type.as_deref()) {
            let customer_type = CustomerType::from_tag(tag).map_err(|_| {
                ParseError::UnknownVariant {
                    field: "type",
                    value: tag.to_string(),
                }
            })?;
            customer.set_customer_type(customer_type);
        }

        Ok(customer)
    }
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_payload_keeps_defaults() {
        let customer = CustomerFactory::create_from_json("{}").unwrap();
        assert_eq!(customer, Customer::default());
    }

    #[test]
    fn test_full_payload() {
        let customer = CustomerFactory::create_from_json(
            r#"{
                "code": "C-1001",
                "customerId": "cus_45asDadb8Xd95451",
                "name": "Maria Souza",
                "email": "maria@example.com",
                "document": "12345678901",
                "type": "individual"
            }"#,
        )
        .unwrap();

        assert_eq!(customer.code(), Some("C-1001"));
        assert_eq!(
            customer.gateway_id().unwrap().value(),
            "cus_45asDadb8Xd95451"
        );
        assert_eq!(customer.customer_type(), Some(CustomerType::Individual));
    }

    #[test]
    fn test_unknown_type_selector_fails() {
        let err = CustomerFactory::create_from_json(r#"{"type": "robot"}"#).unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnknownVariant { field: "type", .. }
        ));
    }

    #[test]
    fn test_empty_strings_are_treated_as_absent() {
        let customer =
            CustomerFactory::create_from_json(r#"{"code": "", "name": ""}"#).unwrap();
        assert!(customer.code().is_none());
        assert!(customer.name().is_none());
    }
}
