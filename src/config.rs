use serde::Deserialize;

use crate::payment::value_objects::{BoletoBank, PaymentMethodKind};

// ============================================================================
// Module Configuration
// ============================================================================
//
// One explicit value handed to factories and handlers at construction time.
// Deserializable so the host platform can load it from its own settings
// storage; `Default` gives a workable development profile.
//
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModuleConfig {
    pub card_statement_descriptor: String,
    pub multibuyer_enabled: bool,
    pub boleto: BoletoConfig,
    pub credit_card: CardKindConfig,
    pub debit_card: CardKindConfig,
    pub voucher: CardKindConfig,
}

impl ModuleConfig {
    /// Per-kind card settings. Boleto has no card config and never asks.
    pub fn card_config(&self, kind: PaymentMethodKind) -> &CardKindConfig {
        match kind {
            PaymentMethodKind::DebitCard => &self.debit_card,
            PaymentMethodKind::Voucher => &self.voucher,
            _ => &self.credit_card,
        }
    }
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            card_statement_descriptor: String::new(),
            multibuyer_enabled: false,
            boleto: BoletoConfig::default(),
            credit_card: CardKindConfig::default(),
            debit_card: CardKindConfig::default(),
            voucher: CardKindConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BoletoConfig {
    pub bank: BoletoBank,
    pub instructions: String,
}

impl Default for BoletoConfig {
    fn default() -> Self {
        Self {
            bank: BoletoBank::Itau,
            instructions: String::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CardKindConfig {
    pub capture: bool,
    pub statement_descriptor: Option<String>,
    pub installments: InstallmentConfig,
}

impl Default for CardKindConfig {
    fn default() -> Self {
        Self {
            capture: true,
            statement_descriptor: None,
            installments: InstallmentConfig::default(),
        }
    }
}

/// Interest schedule for an installment table. Rates are in basis points of
/// the base amount per installment count past the interest-free window.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InstallmentConfig {
    pub max_installments: u32,
    pub interest_free_installments: u32,
    pub interest_rate_bps: i64,
    pub incremental_interest_bps: i64,
}

impl Default for InstallmentConfig {
    fn default() -> Self {
        Self {
            max_installments: 12,
            interest_free_installments: 3,
            interest_rate_bps: 199,
            incremental_interest_bps: 50,
        }
    }
}
