// ============================================================================
// Infrastructure - Reference Port Implementations
// ============================================================================
//
// In-process implementations of the collaborator ports. Tests run on these;
// embedders can use them as a starting point for real adapters.
//
// ============================================================================

pub mod in_memory;
pub mod installments;

pub use in_memory::{
    InMemoryRepository, PlatformCall, RecordingPlatformOrders, StaticInvoiceCreator,
    TemplateLocalizer,
};
pub use installments::ConfigInstallmentResolver;
