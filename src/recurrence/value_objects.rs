use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::kernel::errors::{ParseError, ValidationError};

// ============================================================================
// Recurrence Value Objects
// ============================================================================

/// Gateway-reported lifecycle status of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Canceled,
    Future,
}

impl SubscriptionStatus {
    pub fn from_tag(tag: &str) -> Result<Self, ValidationError> {
        match tag {
            "active" => Ok(Self::Active),
            "canceled" => Ok(Self::Canceled),
            "future" => Ok(Self::Future),
            _ => Err(ValidationError::UnknownTag {
                kind: "subscription status",
                tag: tag.to_string(),
            }),
        }
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Canceled => "canceled",
            Self::Future => "future",
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingSchemeKind {
    Unit,
    Package,
    Volume,
}

impl PricingSchemeKind {
    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::Unit => "unit",
            Self::Package => "package",
            Self::Volume => "volume",
        }
    }
}

/// How a recurring line item is priced. Selected by a companion `price_type`
/// field in post data; unit pricing is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingScheme {
    kind: PricingSchemeKind,
    price: i64,
}

impl PricingScheme {
    pub fn unit(price: i64) -> Self {
        Self {
            kind: PricingSchemeKind::Unit,
            price,
        }
    }

    pub fn package(price: i64) -> Self {
        Self {
            kind: PricingSchemeKind::Package,
            price,
        }
    }

    pub fn volume(price: i64) -> Self {
        Self {
            kind: PricingSchemeKind::Volume,
            price,
        }
    }

    /// Variant selection from a `price_type` field. The selector arrives
    /// uppercase in form posts; an unknown value aborts the factory call.
    pub fn from_selector(selector: &str, price: i64) -> Result<Self, ParseError> {
        match selector.to_ascii_uppercase().as_str() {
            "UNIT" => Ok(Self::unit(price)),
            "PACKAGE" => Ok(Self::package(price)),
            "VOLUME" => Ok(Self::volume(price)),
            _ => Err(ParseError::UnknownVariant {
                field: "price_type",
                value: selector.to_string(),
            }),
        }
    }

    pub fn kind(&self) -> PricingSchemeKind {
        self.kind
    }

    pub fn price(&self) -> i64 {
        self.price
    }

    pub fn to_gateway_request(&self) -> serde_json::Value {
        json!({
            "scheme_type": self.kind.as_tag(),
            "price": self.price,
        })
    }
}

/// Billing interval of a repetition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interval {
    Day,
    Week,
    Month,
    Year,
}

impl Interval {
    pub fn from_tag(tag: &str) -> Result<Self, ValidationError> {
        match tag {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            _ => Err(ValidationError::UnknownTag {
                kind: "interval",
                tag: tag.to_string(),
            }),
        }
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncrementType {
    Flat,
    Percentage,
}

impl IncrementType {
    pub fn from_tag(tag: &str) -> Result<Self, ValidationError> {
        match tag {
            "flat" => Ok(Self::Flat),
            "percentage" => Ok(Self::Percentage),
            _ => Err(ValidationError::UnknownTag {
                kind: "increment type",
                tag: tag.to_string(),
            }),
        }
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Percentage => "percentage",
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscription_status_tags() {
        assert_eq!(SubscriptionStatus::from_tag("active").unwrap().as_tag(), "active");
        assert_eq!(
            SubscriptionStatus::from_tag("canceled").unwrap().as_tag(),
            "canceled"
        );
        assert_eq!(SubscriptionStatus::from_tag("future").unwrap().as_tag(), "future");
        assert!(SubscriptionStatus::from_tag("paused").is_err());
    }

    #[test]
    fn test_subscription_status_equality_and_projection() {
        assert_eq!(
            SubscriptionStatus::from_tag("future").unwrap(),
            SubscriptionStatus::Future
        );
        assert_eq!(
            serde_json::to_string(&SubscriptionStatus::Future).unwrap(),
            "\"future\""
        );
    }

    #[test]
    fn test_pricing_scheme_selector() {
        let scheme = PricingScheme::from_selector("UNIT", 990).unwrap();
        assert_eq!(scheme.kind(), PricingSchemeKind::Unit);
        assert_eq!(scheme.price(), 990);

        // selectors are matched case-insensitively
        assert_eq!(
            PricingScheme::from_selector("package", 500).unwrap().kind(),
            PricingSchemeKind::Package
        );

        let err = PricingScheme::from_selector("TIERED", 100).unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnknownVariant {
                field: "price_type",
                ..
            }
        ));
    }

    #[test]
    fn test_pricing_scheme_gateway_projection() {
        let request = PricingScheme::volume(1500).to_gateway_request();
        assert_eq!(request["scheme_type"], "volume");
        assert_eq!(request["price"], 1500);
    }

    #[test]
    fn test_interval_and_increment_tags() {
        for tag in ["day", "week", "month", "year"] {
            assert_eq!(Interval::from_tag(tag).unwrap().as_tag(), tag);
        }
        assert!(Interval::from_tag("fortnight").is_err());

        assert_eq!(IncrementType::from_tag("flat").unwrap(), IncrementType::Flat);
        assert_eq!(
            IncrementType::from_tag("percentage").unwrap(),
            IncrementType::Percentage
        );
        assert!(IncrementType::from_tag("stepped").is_err());
    }
}
