use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;

use crate::kernel::ids::InvoiceId;
use crate::kernel::order::Order;
use crate::kernel::value_objects::{OrderState, OrderStatus};
use crate::ports::{
    CantCreateReason, Identified, InvoiceCreator, Localizer, PlatformOrders, Repository,
};
use crate::recurrence::invoice::Invoice;

// ============================================================================
// In-Memory Port Implementations
// ============================================================================
//
// Reference implementations of the collaborator ports: hash-backed
// repositories with the contract's upsert semantics, a platform-order
// recorder and a canned invoice creator. The handler and dispatcher tests
// run entirely on these.
//
// ============================================================================

pub struct InMemoryRepository<T> {
    records: Mutex<Vec<T>>,
    saves: AtomicUsize,
}

impl<T: Clone> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            saves: AtomicUsize::new(0),
        }
    }

    pub fn records(&self) -> Vec<T> {
        self.lock().clone()
    }

    /// Number of save calls accepted, including overwrites.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<T>> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<T: Clone> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T> Repository<T> for InMemoryRepository<T>
where
    T: Identified + Clone + Send + Sync,
{
    async fn save(&self, entity: &T) -> Result<()> {
        let mut records = self.lock();
        if let Some(key) = entity.gateway_key() {
            records.retain(|record| record.gateway_key().as_deref() != Some(key.as_str()));
        } else if let Some(code) = entity.local_code() {
            records.retain(|record| record.local_code().as_deref() != Some(code.as_str()));
        }
        records.push(entity.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<T>> {
        Ok(self
            .lock()
            .iter()
            .find(|record| record.local_code().as_deref() == Some(code))
            .cloned())
    }

    async fn find_by_gateway_id(&self, gateway_id: &str) -> Result<Option<T>> {
        Ok(self
            .lock()
            .iter()
            .find(|record| record.gateway_key().as_deref() == Some(gateway_id))
            .cloned())
    }

    async fn delete_by_code(&self, code: &str) -> Result<()> {
        self.lock()
            .retain(|record| record.local_code().as_deref() != Some(code));
        Ok(())
    }
}

// ============================================================================
// Recording Platform Orders
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum PlatformCall {
    SetState { code: String, state: OrderState },
    Comment { code: String, text: String },
    Save { code: String },
    Sync { code: Option<String>, status: OrderStatus },
}

pub struct RecordingPlatformOrders {
    calls: Mutex<Vec<PlatformCall>>,
}

impl RecordingPlatformOrders {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<PlatformCall> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn record(&self, call: PlatformCall) {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(call);
    }
}

impl Default for RecordingPlatformOrders {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlatformOrders for RecordingPlatformOrders {
    async fn set_state(&self, order_code: &str, state: OrderState) -> Result<()> {
        self.record(PlatformCall::SetState {
            code: order_code.to_string(),
            state,
        });
        Ok(())
    }

    async fn add_history_comment(&self, order_code: &str, comment: &str) -> Result<()> {
        self.record(PlatformCall::Comment {
            code: order_code.to_string(),
            text: comment.to_string(),
        });
        Ok(())
    }

    async fn save(&self, order_code: &str) -> Result<()> {
        self.record(PlatformCall::Save {
            code: order_code.to_string(),
        });
        Ok(())
    }

    async fn sync_platform_with(&self, order: &Order) -> Result<()> {
        self.record(PlatformCall::Sync {
            code: order.code().map(str::to_string),
            status: order.status(),
        });
        Ok(())
    }
}

// ============================================================================
// Canned Invoice Creator
// ============================================================================

/// Either refuses every order with a fixed reason, or creates one invoice per
/// order code and hands the same record back on re-delivery.
pub struct StaticInvoiceCreator {
    refusal: Option<CantCreateReason>,
    created: Mutex<HashMap<String, Invoice>>,
    counter: AtomicUsize,
}

impl StaticInvoiceCreator {
    pub fn creating() -> Self {
        Self {
            refusal: None,
            created: Mutex::new(HashMap::new()),
            counter: AtomicUsize::new(0),
        }
    }

    pub fn refusing(reason: &str) -> Self {
        Self {
            refusal: Some(CantCreateReason::new(reason)),
            created: Mutex::new(HashMap::new()),
            counter: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl InvoiceCreator for StaticInvoiceCreator {
    async fn cant_create_reason(&self, _order: &Order) -> Result<Option<CantCreateReason>> {
        Ok(self.refusal.clone())
    }

    async fn create_invoice_for(&self, order: &Order) -> Result<Option<Invoice>> {
        if self.refusal.is_some() {
            return Ok(None);
        }

        let key = order.code().unwrap_or("-").to_string();
        let mut created = self
            .created
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(existing) = created.get(&key) {
            return Ok(Some(existing.clone()));
        }

        let serial = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let mut invoice = Invoice::new();
        invoice.set_gateway_id(InvoiceId::new(format!("in_{serial:016x}"))?);
        let amount = order.charges().iter().map(|charge| charge.amount()).sum();
        invoice.set_amount(amount)?;

        created.insert(key, invoice.clone());
        Ok(Some(invoice))
    }
}

// ============================================================================
// Pass-Through Localizer
// ============================================================================

/// Substitutes `%s` placeholders in order; templates are already English.
pub struct TemplateLocalizer;

impl Localizer for TemplateLocalizer {
    fn translate(&self, template: &str, args: &[&str]) -> String {
        let mut parts = template.split("%s");
        let mut out = String::new();
        if let Some(first) = parts.next() {
            out.push_str(first);
        }
        for (index, part) in parts.enumerate() {
            out.push_str(args.get(index).copied().unwrap_or("%s"));
            out.push_str(part);
        }
        out
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
