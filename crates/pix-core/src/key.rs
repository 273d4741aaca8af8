//! Pix Key Helpers
//!
//! Shape checks and display formatting for Pix keys. Nothing here talks
//! to a bank or the DICT registry: an 11-digit key is accepted whether it
//! is a CPF or a local phone number, since the protocol itself does not
//! tell them apart.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

/// `+55` followed by a 10-digit landline or 11-digit mobile number
static INTERNATIONAL_PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+55[0-9]{10,11}$").expect("valid phone pattern"));

static UUID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
        .expect("valid uuid pattern")
});

/// Kind of key, inferred from its shape
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixKeyKind {
    Email,
    Phone,
    Cpf,
    Cnpj,
    Random,
}

impl PixKeyKind {
    /// Classify a key by shape. `None` means no known shape matched.
    pub fn detect(key: &str) -> Option<Self> {
        let key = key.trim();

        if key.contains('@') {
            return EMAIL.is_match(key).then_some(PixKeyKind::Email);
        }

        if key.starts_with('+') {
            return INTERNATIONAL_PHONE.is_match(key).then_some(PixKeyKind::Phone);
        }

        if all_digits(key) {
            return match key.len() {
                11 => Some(PixKeyKind::Cpf),
                14 => Some(PixKeyKind::Cnpj),
                10 => Some(PixKeyKind::Phone),
                _ => None,
            };
        }

        UUID.is_match(key).then_some(PixKeyKind::Random)
    }

    pub fn as_str(&self) -> &str {
        match self {
            PixKeyKind::Email => "email",
            PixKeyKind::Phone => "phone",
            PixKeyKind::Cpf => "cpf",
            PixKeyKind::Cnpj => "cnpj",
            PixKeyKind::Random => "random",
        }
    }
}

impl std::fmt::Display for PixKeyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape-only key check.
pub fn validate_pix_key(key: &str) -> bool {
    PixKeyKind::detect(key).is_some()
}

/// Punctuate a key for display; unknown shapes come back trimmed but
/// otherwise unchanged.
pub fn format_pix_key_display(key: &str) -> String {
    let key = key.trim();
    if !all_digits(key) {
        return key.to_string();
    }

    match key.len() {
        11 => format!("{}.{}.{}-{}", &key[0..3], &key[3..6], &key[6..9], &key[9..]),
        14 => format!(
            "{}.{}.{}/{}-{}",
            &key[0..2],
            &key[2..5],
            &key[5..8],
            &key[8..12],
            &key[12..]
        ),
        10 => format_phone_display(key),
        _ => key.to_string(),
    }
}

/// Render a 10-digit landline or 11-digit mobile number as `(XX) ...`.
pub fn format_phone_display(number: &str) -> String {
    let number = number.trim();
    if !all_digits(number) {
        return number.to_string();
    }

    match number.len() {
        10 => format!("({}) {}-{}", &number[0..2], &number[2..6], &number[6..]),
        11 => format!("({}) {}-{}", &number[0..2], &number[2..7], &number[7..]),
        _ => number.to_string(),
    }
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
