use serde_json::json;

use crate::kernel::ids::{CardId, CardToken, CustomerId};

use super::customer::Customer;
use super::value_objects::{BoletoBank, CardBrand, PaymentMethodKind};

// ============================================================================
// Payment Aggregates
// ============================================================================
//
// A payment instruction parsed from checkout data, fully configured and
// ready to be projected into a gateway charge request. Card payments carry
// either a one-time token (new card) or a saved-card reference; the variant
// is fixed at construction by the factory's identifier classifier.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum CardPaymentSource {
    NewCard {
        token: CardToken,
        save_on_success: bool,
    },
    SavedCard {
        card_id: CardId,
        owner: CustomerId,
        cvv: Option<String>,
    },
}

#[derive(Debug, Clone)]
pub struct CardPayment {
    method: PaymentMethodKind,
    source: CardPaymentSource,
    brand: CardBrand,
    amount: i64,
    installments: u32,
    capture: bool,
    statement_descriptor: Option<String>,
    customer: Option<Customer>,
}

impl CardPayment {
    pub fn new(method: PaymentMethodKind, source: CardPaymentSource, brand: CardBrand) -> Self {
        Self {
            method,
            source,
            brand,
            amount: 0,
            installments: 1,
            capture: true,
            statement_descriptor: None,
            customer: None,
        }
    }

    pub fn method(&self) -> PaymentMethodKind {
        self.method
    }

    pub fn source(&self) -> &CardPaymentSource {
        &self.source
    }

    pub fn brand(&self) -> CardBrand {
        self.brand
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn set_amount(&mut self, amount: i64) {
        self.amount = amount;
    }

    pub fn installments(&self) -> u32 {
        self.installments
    }

    pub fn set_installments(&mut self, installments: u32) {
        self.installments = installments;
    }

    pub fn capture(&self) -> bool {
        self.capture
    }

    pub fn set_capture(&mut self, capture: bool) {
        self.capture = capture;
    }

    pub fn statement_descriptor(&self) -> Option<&str> {
        self.statement_descriptor.as_deref()
    }

    pub fn set_statement_descriptor(&mut self, descriptor: impl Into<String>) {
        self.statement_descriptor = Some(descriptor.into());
    }

    pub fn customer(&self) -> Option<&Customer> {
        self.customer.as_ref()
    }

    pub fn set_customer(&mut self, customer: Customer) {
        self.customer = Some(customer);
    }

    pub fn to_gateway_request(&self) -> serde_json::Value {
        let card = match &self.source {
            CardPaymentSource::NewCard {
                token,
                save_on_success,
            } => json!({
                "card_token": token.value(),
                "save_on_success": save_on_success,
            }),
            CardPaymentSource::SavedCard {
                card_id,
                owner,
                cvv,
            } => json!({
                "card_id": card_id.value(),
                "customer_id": owner.value(),
                "cvv": cvv,
            }),
        };

        json!({
            "payment_method": self.method.base_code(),
            "brand": self.brand.as_tag(),
            "amount": self.amount,
            "installments": self.installments,
            "capture": self.capture,
            "statement_descriptor": self.statement_descriptor,
            "card": card,
        })
    }
}

#[derive(Debug, Clone)]
pub struct BoletoPayment {
    amount: i64,
    bank: BoletoBank,
    instructions: String,
    customer: Option<Customer>,
}

impl BoletoPayment {
    pub fn new(amount: i64, bank: BoletoBank, instructions: impl Into<String>) -> Self {
        Self {
            amount,
            bank,
            instructions: instructions.into(),
            customer: None,
        }
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn bank(&self) -> BoletoBank {
        self.bank
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn customer(&self) -> Option<&Customer> {
        self.customer.as_ref()
    }

    pub fn set_customer(&mut self, customer: Customer) {
        self.customer = Some(customer);
    }

    pub fn to_gateway_request(&self) -> serde_json::Value {
        json!({
            "payment_method": PaymentMethodKind::Boleto.base_code(),
            "amount": self.amount,
            "boleto": {
                "bank": self.bank.code(),
                "instructions": self.instructions,
            },
        })
    }
}

#[derive(Debug, Clone)]
pub enum Payment {
    Card(CardPayment),
    Boleto(BoletoPayment),
}

impl Payment {
    pub fn amount(&self) -> i64 {
        match self {
            Self::Card(card) => card.amount(),
            Self::Boleto(boleto) => boleto.amount(),
        }
    }

    pub fn customer(&self) -> Option<&Customer> {
        match self {
            Self::Card(card) => card.customer(),
            Self::Boleto(boleto) => boleto.customer(),
        }
    }

    pub fn to_gateway_request(&self) -> serde_json::Value {
        match self {
            Self::Card(card) => card.to_gateway_request(),
            Self::Boleto(boleto) => boleto.to_gateway_request(),
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
    fn test_new_card_request_shape() {
        let mut payment = CardPayment::new(
            PaymentMethodKind::CreditCard,
            CardPaymentSource::NewCard {
                token: CardToken::new("token_45asDadb8Xd95451").unwrap(),
                save_on_success: true,
            },
            CardBrand::Visa,
        );
        payment.set_amount(10_000);
        payment.set_installments(3);

        let request = payment.to_gateway_request();
        assert_eq!(request["payment_method"], "credit_card");
        assert_eq!(request["card"]["card_token"], "token_45asDadb8Xd95451");
        assert_eq!(request["card"]["save_on_success"], true);
        assert_eq!(request["installments"], 3);
    }

    #[test]
    fn test_saved_card_request_shape() {
        let payment = CardPayment::new(
            PaymentMethodKind::DebitCard,
            CardPaymentSource::SavedCard {
                card_id: CardId::new("card_45asDadb8Xd95451").unwrap(),
                owner: CustomerId::new("cus_45asDadb8Xd95451").unwrap(),
                cvv: Some("123".to_string()),
            },
            CardBrand::Mastercard,
        );

        let request = payment.to_gateway_request();
        assert_eq!(request["card"]["card_id"], "card_45asDadb8Xd95451");
        assert_eq!(request["card"]["customer_id"], "cus_45asDadb8Xd95451");
        assert_eq!(request["card"]["cvv"], "123");
    }

    #[test]
    fn test_boleto_request_carries_bank_and_instructions() {
        let payment = BoletoPayment::new(4200, BoletoBank::Itau, "Pay within 3 days");
        let request = payment.to_gateway_request();
        assert_eq!(request["boleto"]["bank"], "341");
        assert_eq!(request["boleto"]["instructions"], "Pay within 3 days");
        assert_eq!(Payment::Boleto(payment).amount(), 4200);
    }
}
