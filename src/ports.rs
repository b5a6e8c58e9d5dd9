use std::fmt;

use anyhow::Result;
use async_trait::async_trait;

use crate::config::InstallmentConfig;
use crate::kernel::order::Order;
use crate::kernel::value_objects::OrderState;
use crate::payment::value_objects::CardBrand;
use crate::recurrence::invoice::Invoice;

// ============================================================================
// Collaborator Ports
// ============================================================================
//
// Contracts the core depends on. Host platforms implement these against
// their own persistence, order storage and billing engine; the in-memory
// implementations in `infrastructure` back the tests.
//
// ============================================================================

/// Key projection used by repositories for upsert/find semantics.
pub trait Identified {
    fn local_code(&self) -> Option<String>;
    fn gateway_key(&self) -> Option<String>;
}

/// Key-value persistence contract. `save` must be an idempotent upsert keyed
/// by the gateway id when present, otherwise by the local code.
#[async_trait]
pub trait Repository<T>: Send + Sync {
    async fn save(&self, entity: &T) -> Result<()>;
    async fn find_by_code(&self, code: &str) -> Result<Option<T>>;
    async fn find_by_gateway_id(&self, gateway_id: &str) -> Result<Option<T>>;
    async fn delete_by_code(&self, code: &str) -> Result<()>;
}

/// Host platform order records, addressed by their platform order code.
/// The platform record is mutated through this port but never owned.
#[async_trait]
pub trait PlatformOrders: Send + Sync {
    async fn set_state(&self, order_code: &str, state: OrderState) -> Result<()>;
    async fn add_history_comment(&self, order_code: &str, comment: &str) -> Result<()>;
    async fn save(&self, order_code: &str) -> Result<()>;
    async fn sync_platform_with(&self, order: &Order) -> Result<()>;
}

/// One row of an installment table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Installment {
    pub times: u32,
    pub total: i64,
}

/// Resolves the valid installment plans for a brand/amount pair under the
/// given schedule, ordered by ascending installment count.
pub trait InstallmentResolver: Send + Sync {
    fn resolve_installments(
        &self,
        brand: CardBrand,
        amount: i64,
        config: &InstallmentConfig,
    ) -> Vec<Installment>;
}

/// Human-readable reason the platform refused to create an invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CantCreateReason(String);

impl CantCreateReason {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CantCreateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Platform billing engine: invoice creation for a synchronized order.
#[async_trait]
pub trait InvoiceCreator: Send + Sync {
    async fn cant_create_reason(&self, order: &Order) -> Result<Option<CantCreateReason>>;
    async fn create_invoice_for(&self, order: &Order) -> Result<Option<Invoice>>;
}

/// Translation lookup for audit-comment text. Not part of the state logic.
pub trait Localizer: Send + Sync {
    fn translate(&self, template: &str, args: &[&str]) -> String;
}
