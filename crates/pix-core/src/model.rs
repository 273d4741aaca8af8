//! Domain Models
//!
//! Input and output records of the BR Code encoder.
//! Amounts use `rust_decimal` - never use f64 for money!

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A request to charge a fixed amount via Pix
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixChargeRequest {
    /// Recipient key (CPF, CNPJ, e-mail, +55 phone or random key)
    pub pix_key: String,

    /// Payee display name (cut to 25 characters)
    pub merchant_name: String,

    /// Payee city (upper-cased, accents stripped, cut to 15 characters)
    pub merchant_city: String,

    /// Amount in BRL, not cents
    pub amount: Decimal,

    /// Transaction identifier (cut to 25 characters)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txid: Option<String>,

    /// Free-text note shown by the payer's bank (cut to 72 characters)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PixChargeRequest {
    pub fn new(
        pix_key: impl Into<String>,
        merchant_name: impl Into<String>,
        merchant_city: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            pix_key: pix_key.into(),
            merchant_name: merchant_name.into(),
            merchant_city: merchant_city.into(),
            amount,
            txid: None,
            description: None,
        }
    }

    #[must_use]
    pub fn with_txid(mut self, txid: impl Into<String>) -> Self {
        self.txid = Some(txid.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A finished BR Code ("Pix copia e cola") string
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PixPayload(String);

impl PixPayload {
    pub(crate) fn new(payload: String) -> Self {
        Self(payload)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The 4 hex digits closing the payload
    pub fn crc(&self) -> &str {
        self.0.get(self.0.len().saturating_sub(4)..).unwrap_or_default()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for PixPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for PixPayload {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Structured view of a parsed BR Code
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedPayload {
    /// Tag 00
    pub payload_format: String,

    /// Tag 01 ("11" static, "12" single use); absent on some static codes
    pub initiation_method: Option<String>,

    /// Tag 26/00
    pub gui: String,

    /// Tag 26/01
    pub pix_key: String,

    /// Tag 26/02
    pub description: Option<String>,

    /// Tag 52
    pub merchant_category_code: Option<String>,

    /// Tag 53
    pub currency: String,

    /// Tag 54; static codes leave the amount to the payer
    pub amount: Option<Decimal>,

    /// Tag 58
    pub country_code: String,

    /// Tag 59
    pub merchant_name: String,

    /// Tag 60
    pub merchant_city: String,

    /// Tag 62/05
    pub txid: Option<String>,

    /// Tag 63
    pub crc: String,
}
