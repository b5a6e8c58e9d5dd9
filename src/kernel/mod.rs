// ============================================================================
// Kernel Context - Shared Identity, Status Tags, Core Aggregates
// ============================================================================
//
// This module contains the building blocks every other context leans on:
// - Gateway id value objects (ids)
// - Status/type tag value objects (value_objects)
// - Transaction / Charge / Order aggregates and the OrderFactory
// - The kernel error taxonomy (errors)
//
// ============================================================================

pub mod charge;
pub mod errors;
pub mod ids;
pub mod order;
pub mod transaction;
pub mod value_objects;

// Re-export for convenience
pub use charge::Charge;
pub use errors::{ParseError, StateError, ValidationError};
pub use ids::*;
pub use order::{Order, OrderFactory};
pub use transaction::Transaction;
pub use value_objects::*;
