//! Payment-gateway state-synchronization core.
//!
//! Models the orders, charges, transactions, subscriptions, invoices and
//! webhooks exchanged with a third-party payment processor and replays the
//! gateway-reported state into a host commerce platform's order records.
//! The gateway is the source of truth for payment and subscription
//! lifecycle; this crate translates its webhook/API payloads into local
//! aggregate transitions and pushes compensating updates back through the
//! platform ports. Persistence, order storage, billing and localization are
//! collaborator ports (`ports`); the host platform supplies the adapters.

pub mod config;
pub mod infrastructure;
pub mod kernel;
pub mod payment;
pub mod ports;
pub mod recurrence;
pub mod telemetry;
pub mod webhook;
