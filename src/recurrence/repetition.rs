use serde_json::json;

use crate::kernel::errors::ValidationError;

use super::value_objects::{IncrementType, Interval};

// ============================================================================
// Repetition & Increment
// ============================================================================
//
// Plan add-ons for a recurring line item: a Repetition is one offered billing
// cadence with its own recurrence price, an Increment is a per-cycle amount
// adjustment pushed to the gateway with the plan item.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Repetition {
    id: Option<i64>,
    interval: Interval,
    interval_count: i32,
    recurrence_price: i64,
}

impl Repetition {
    pub fn new(
        interval: Interval,
        interval_count: i32,
        recurrence_price: i64,
    ) -> Result<Self, ValidationError> {
        if recurrence_price < 0 {
            return Err(ValidationError::NegativeAmount(recurrence_price));
        }
        Ok(Self {
            id: None,
            interval,
            interval_count,
            recurrence_price,
        })
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    pub fn interval_count(&self) -> i32 {
        self.interval_count
    }

    pub fn recurrence_price(&self) -> i64 {
        self.recurrence_price
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "id": self.id,
            "interval": self.interval.as_tag(),
            "intervalCount": self.interval_count,
            "recurrencePrice": self.recurrence_price,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Increment {
    value: i64,
    increment_type: IncrementType,
    cycles: Option<i32>,
}

impl Increment {
    pub fn new(value: i64, increment_type: IncrementType) -> Self {
        Self {
            value,
            increment_type,
            cycles: None,
        }
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn increment_type(&self) -> IncrementType {
        self.increment_type
    }

    pub fn cycles(&self) -> Option<i32> {
        self.cycles
    }

    pub fn set_cycles(&mut self, cycles: i32) {
        self.cycles = Some(cycles);
    }

    pub fn to_gateway_request(&self) -> serde_json::Value {
        json!({
            "value": self.value,
            "increment_type": self.increment_type.as_tag(),
            "cycles": self.cycles,
        })
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_recurrence_price_is_rejected() {
        assert!(Repetition::new(Interval::Month, 1, -100).is_err());
    }

    #[test]
    fn test_repetition_projection() {
        let mut repetition = Repetition::new(Interval::Month, 3, 2990).unwrap();
        repetition.set_id(4);
        let json = repetition.to_json();
        assert_eq!(json["interval"], "month");
        assert_eq!(json["intervalCount"], 3);
        assert_eq!(json["recurrencePrice"], 2990);
    }

    #[test]
    fn test_increment_gateway_request() {
        let mut increment = Increment::new(500, IncrementType::Flat);
        increment.set_cycles(2);
        let request = increment.to_gateway_request();
        assert_eq!(request["value"], 500);
        assert_eq!(request["increment_type"], "flat");
        assert_eq!(request["cycles"], 2);
    }
}
