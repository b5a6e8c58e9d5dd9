// ============================================================================
// Recurrence Context - Subscription Billing
// ============================================================================
//
// This module contains ALL recurring-billing code:
// - Value objects (SubscriptionStatus, PricingScheme, Interval, IncrementType)
// - Aggregates (SubProduct, Repetition, Increment, Invoice, Cycle,
//   Subscription)
// - Factories (SubProductFactory, SubscriptionFactory + gateway data schemas)
// - Response handler (SubscriptionHandler, the status state machine)
// - Errors (HandlerError)
//
// ============================================================================

pub mod errors;
pub mod factories;
pub mod handlers;
pub mod invoice;
pub mod repetition;
pub mod sub_product;
pub mod subscription;
pub mod value_objects;

// Re-export for convenience
pub use errors::HandlerError;
pub use factories::{
    charge_from_data, invoice_from_data, ChargeData, CycleData, InvoiceData, SubProductData,
    SubProductFactory, SubscriptionData, SubscriptionFactory,
};
pub use handlers::{HandlerOutcome, SubscriptionHandler};
pub use invoice::{Cycle, Invoice};
pub use repetition::{Increment, Repetition};
pub use sub_product::SubProduct;
pub use subscription::Subscription;
pub use value_objects::*;
