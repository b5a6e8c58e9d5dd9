use std::sync::Arc;

use serde::Deserialize;
use tracing::warn;

use crate::config::{InstallmentConfig, ModuleConfig};
use crate::kernel::ids::{CardId, CardToken, CustomerId};
use crate::ports::InstallmentResolver;

use super::customer::{Customer, CustomerData, CustomerFactory};
use super::errors::PaymentError;
use super::payments::{BoletoPayment, CardPayment, CardPaymentSource, Payment};
use super::value_objects::{CardBrand, PaymentMethodKind};

// ============================================================================
// Payment Factory
// ============================================================================
//
// Parses one inbound payment-instruction payload and produces the list of
// fully-configured payment aggregates. Identifier resolution is an explicit
// classifier over the identifier shape; entries that classify as invalid are
// dropped from the result set, never escalated. An installment count that
// matches no table entry rejects the whole request.
//
// ============================================================================

/// Inbound payment-instruction payload, keyed by payment-kind base code.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PaymentInstructions {
    pub credit_card: Vec<CardEntry>,
    pub debit_card: Vec<CardEntry>,
    pub voucher: Vec<CardEntry>,
    pub boleto: Vec<BoletoEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CardEntry {
    pub identifier: String,
    #[serde(default)]
    pub brand: Option<String>,
    pub amount: i64,
    #[serde(default = "one_installment")]
    pub installments: u32,
    #[serde(default)]
    pub customer: Option<CustomerData>,
    #[serde(default, rename = "saveOnSuccess")]
    pub save_on_success: Option<bool>,
    #[serde(default, rename = "cvvCard")]
    pub cvv_card: Option<String>,
    #[serde(default, rename = "customerId")]
    pub customer_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BoletoEntry {
    pub amount: i64,
    #[serde(default)]
    pub customer: Option<CustomerData>,
}

fn one_installment() -> u32 {
    1
}

/// Outcome of classifying an ambiguous card identifier by its shape.
#[derive(Debug, Clone, PartialEq)]
pub enum IdentifierKind {
    Token(CardToken),
    Saved(CardId),
    Invalid,
}

/// Format-validates the identifier as an ephemeral token first, then as a
/// persistent saved-card reference. Deterministic: no control flow rides on
/// construction failures beyond this one decision point.
pub fn classify_identifier(identifier: &str) -> IdentifierKind {
    if let Ok(token) = CardToken::new(identifier) {
        return IdentifierKind::Token(token);
    }
    if let Ok(card_id) = CardId::new(identifier) {
        return IdentifierKind::Saved(card_id);
    }
    IdentifierKind::Invalid
}

pub struct PaymentFactory {
    config: ModuleConfig,
    installments: Arc<dyn InstallmentResolver>,
}

impl PaymentFactory {
    pub fn new(config: ModuleConfig, installments: Arc<dyn InstallmentResolver>) -> Self {
        Self {
            config,
            installments,
        }
    }

    pub fn create_from_json(&self, json: &str) -> Result<Vec<Payment>, PaymentError> {
        let instructions: PaymentInstructions = serde_json::from_str(json)?;
        self.create_from_instructions(&instructions)
    }

    pub fn create_from_instructions(
        &self,
        instructions: &PaymentInstructions,
    ) -> Result<Vec<Payment>, PaymentError> {
        let mut payments = Vec::new();

        let card_kinds = [
            (PaymentMethodKind::CreditCard, &instructions.credit_card),
            (PaymentMethodKind::DebitCard, &instructions.debit_card),
            (PaymentMethodKind::Voucher, &instructions.voucher),
        ];
        for (kind, entries) in card_kinds {
            for entry in entries {
                if let Some(payment) = self.create_card_payment(kind, entry)? {
                    payments.push(Payment::Card(payment));
                }
            }
        }

        for entry in &instructions.boleto {
            payments.push(Payment::Boleto(self.create_boleto_payment(entry)?));
        }

        Ok(payments)
    }

    /// Returns None when the entry's identifier does not resolve to a usable
    /// card source; the miss is logged and the entry dropped.
    fn create_card_payment(
        &self,
        kind: PaymentMethodKind,
        entry: &CardEntry,
    ) -> Result<Option<CardPayment>, PaymentError> {
        let source = match classify_identifier(&entry.identifier) {
            IdentifierKind::Token(token) => CardPaymentSource::NewCard {
                token,
                save_on_success: entry.save_on_success.unwrap_or(false),
            },
            IdentifierKind::Saved(card_id) => {
                let owner = entry
                    .customer_id
                    .as_deref()
                    .and_then(|id| CustomerId::new(id).ok());
                match owner {
                    Some(owner) => CardPaymentSource::SavedCard {
                        card_id,
                        owner,
                        cvv: entry.cvv_card.clone(),
                    },
                    None => {
                        warn!(
                            identifier = %entry.identifier,
                            "saved-card entry without a valid owning customer id, dropping"
                        );
                        return Ok(None);
                    }
                }
            }
            IdentifierKind::Invalid => {
                warn!(
                    identifier = %entry.identifier,
                    "identifier is neither a card token nor a saved-card reference, dropping"
                );
                return Ok(None);
            }
        };

        let brand_tag = entry.brand.as_deref().ok_or(PaymentError::MissingBrand)?;
        let brand = CardBrand::from_tag(brand_tag)?;

        let mut payment = CardPayment::new(kind, source, brand);
        if let Some(customer) = self.create_customer(entry.customer.as_ref())? {
            payment.set_customer(customer);
        }
        payment.set_amount(entry.amount);
        payment.set_installments(entry.installments);

        let kind_config = self.config.card_config(kind);
        payment.set_amount(self.amount_with_interest(&payment, &kind_config.installments)?);
        payment.set_capture(kind_config.capture);
        payment.set_statement_descriptor(
            kind_config
                .statement_descriptor
                .clone()
                .unwrap_or_else(|| self.config.card_statement_descriptor.clone()),
        );

        Ok(Some(payment))
    }

    fn create_boleto_payment(&self, entry: &BoletoEntry) -> Result<BoletoPayment, PaymentError> {
        let mut payment = BoletoPayment::new(
            entry.amount,
            self.config.boleto.bank,
            self.config.boleto.instructions.clone(),
        );
        if let Some(customer) = self.create_customer(entry.customer.as_ref())? {
            payment.set_customer(customer);
        }
        Ok(payment)
    }

    /// Multi-buyer customers only: attached when the mode is enabled and the
    /// entry carries customer data.
    fn create_customer(
        &self,
        data: Option<&CustomerData>,
    ) -> Result<Option<Customer>, PaymentError> {
        if !self.config.multibuyer_enabled {
            return Ok(None);
        }
        match data {
            Some(data) => Ok(Some(CustomerFactory::create_from_data(data)?)),
            None => Ok(None),
        }
    }

    fn amount_with_interest(
        &self,
        payment: &CardPayment,
        config: &InstallmentConfig,
    ) -> Result<i64, PaymentError> {
        let valid =
            self.installments
                .resolve_installments(payment.brand(), payment.amount(), config);

        valid
            .iter()
            .find(|installment| installment.times == payment.installments())
            .map(|installment| installment.total)
            .ok_or(PaymentError::InvalidInstallment(payment.installments()))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
