use std::fmt;

use serde::{Deserialize, Serialize};

use crate::kernel::errors::ValidationError;

// ============================================================================
// Payment Value Objects
// ============================================================================

/// Card network brand reported with a payment instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardBrand {
    Visa,
    Mastercard,
    Amex,
    Elo,
    Hipercard,
    Diners,
    Discover,
    Jcb,
    Aura,
    NoBrand,
}

impl CardBrand {
    pub fn from_tag(tag: &str) -> Result<Self, ValidationError> {
        match tag {
            "visa" => Ok(Self::Visa),
            "mastercard" => Ok(Self::Mastercard),
            "amex" => Ok(Self::Amex),
            "elo" => Ok(Self::Elo),
            "hipercard" => Ok(Self::Hipercard),
            "diners" => Ok(Self::Diners),
            "discover" => Ok(Self::Discover),
            "jcb" => Ok(Self::Jcb),
            "aura" => Ok(Self::Aura),
            "no_brand" => Ok(Self::NoBrand),
            _ => Err(ValidationError::UnknownTag {
                kind: "card brand",
                tag: tag.to_string(),
            }),
        }
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::Visa => "visa",
            Self::Mastercard => "mastercard",
            Self::Amex => "amex",
            Self::Elo => "elo",
            Self::Hipercard => "hipercard",
            Self::Diners => "diners",
            Self::Discover => "discover",
            Self::Jcb => "jcb",
            Self::Aura => "aura",
            Self::NoBrand => "no_brand",
        }
    }
}

impl fmt::Display for CardBrand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Supported payment kinds. `base_code` is the key each kind's entries live
/// under in the payment-instruction payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethodKind {
    CreditCard,
    DebitCard,
    Voucher,
    Boleto,
}

impl PaymentMethodKind {
    pub fn from_tag(tag: &str) -> Result<Self, ValidationError> {
        match tag {
            "credit_card" => Ok(Self::CreditCard),
            "debit_card" => Ok(Self::DebitCard),
            "voucher" => Ok(Self::Voucher),
            "boleto" => Ok(Self::Boleto),
            _ => Err(ValidationError::UnknownTag {
                kind: "payment method",
                tag: tag.to_string(),
            }),
        }
    }

    pub fn as_tag(&self) -> &'static str {
        self.base_code()
    }

    pub fn base_code(&self) -> &'static str {
        match self {
            Self::CreditCard => "credit_card",
            Self::DebitCard => "debit_card",
            Self::Voucher => "voucher",
            Self::Boleto => "boleto",
        }
    }
}

impl fmt::Display for PaymentMethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base_code())
    }
}

/// Issuing bank for boleto slips, with the bank's clearing code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoletoBank {
    Itau,
    Bradesco,
    BancoDoBrasil,
    Santander,
    Caixa,
    Citibank,
}

impl BoletoBank {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Itau => "341",
            Self::Bradesco => "237",
            Self::BancoDoBrasil => "001",
            Self::Santander => "033",
            Self::Caixa => "104",
            Self::Citibank => "745",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerType {
    Individual,
    Company,
}

impl CustomerType {
    pub fn from_tag(tag: &str) -> Result<Self, ValidationError> {
        match tag {
            "individual" => Ok(Self::Individual),
            "company" => Ok(Self::Company),
            _ => Err(ValidationError::UnknownTag {
                kind: "customer type",
                tag: tag.to_string(),
            }),
        }
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Company => "company",
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
    fn test_card_brand_tags_round_trip() {
        for tag in [
            "visa",
            "mastercard",
            "amex",
            "elo",
            "hipercard",
            "diners",
            "discover",
            "jcb",
            "aura",
            "no_brand",
        ] {
            assert_eq!(CardBrand::from_tag(tag).unwrap().as_tag(), tag);
        }
        assert!(CardBrand::from_tag("maestro").is_err());
    }

    #[test]
    fn test_payment_kind_base_codes() {
        assert_eq!(PaymentMethodKind::CreditCard.base_code(), "credit_card");
        assert_eq!(PaymentMethodKind::Boleto.base_code(), "boleto");
        assert!(PaymentMethodKind::from_tag("pix").is_err());
    }

    #[test]
    fn test_boleto_bank_clearing_codes() {
        assert_eq!(BoletoBank::Itau.code(), "341");
        assert_eq!(BoletoBank::BancoDoBrasil.code(), "001");
    }
}
