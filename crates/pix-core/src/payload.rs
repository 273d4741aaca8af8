//! BR Code Payload Assembly
//!
//! Builds the "Pix copia e cola" string following the Central Bank's
//! EMV-QR layout:
//!
//! ```text
//! 00 Payload Format Indicator    "01"
//! 01 Point of Initiation Method  "12"
//! 26 Merchant Account Info       ┌ 00 GUI  br.gov.bcb.pix
//!                                ├ 01 Pix key
//!                                └ 02 description (optional)
//! 52 Merchant Category Code      "0000"
//! 53 Transaction Currency        "986" (BRL)
//! 54 Transaction Amount          "10.50"
//! 58 Country Code                "BR"
//! 59 Merchant Name               ≤ 25 chars
//! 60 Merchant City               ≤ 15 chars, upper case, no accents
//! 62 Additional Data (optional)  └ 05 txid
//! 63 CRC16                       over everything before it + "6304"
//! ```
//!
//! Bank apps reject payloads whose fields are well-formed but out of
//! order, so the emission order below is fixed.

use rust_decimal::{Decimal, RoundingStrategy};
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::crc::crc16;
use crate::error::{PixError, Result};
use crate::model::{PixChargeRequest, PixPayload};
use crate::tlv::format_field;

pub const PAYLOAD_FORMAT_INDICATOR: &str = "01";
pub const POINT_OF_INITIATION_SINGLE_USE: &str = "12";
pub const PIX_GUI: &str = "br.gov.bcb.pix";
pub const MERCHANT_CATEGORY_CODE: &str = "0000";
pub const CURRENCY_BRL: &str = "986";
pub const COUNTRY_CODE: &str = "BR";

pub const MAX_MERCHANT_NAME: usize = 25;
pub const MAX_MERCHANT_CITY: usize = 15;
pub const MAX_TXID: usize = 25;
pub const MAX_DESCRIPTION: usize = 72;

/// Tag and length announcing the checksum field
const CRC_HEADER: &str = "6304";

pub(crate) mod tag {
    pub const PAYLOAD_FORMAT: &str = "00";
    pub const INITIATION_METHOD: &str = "01";
    pub const MERCHANT_ACCOUNT: &str = "26";
    pub const CATEGORY_CODE: &str = "52";
    pub const CURRENCY: &str = "53";
    pub const AMOUNT: &str = "54";
    pub const COUNTRY: &str = "58";
    pub const MERCHANT_NAME: &str = "59";
    pub const MERCHANT_CITY: &str = "60";
    pub const ADDITIONAL_DATA: &str = "62";

    pub const ACCOUNT_GUI: &str = "00";
    pub const ACCOUNT_KEY: &str = "01";
    pub const ACCOUNT_DESCRIPTION: &str = "02";
    pub const ADDITIONAL_TXID: &str = "05";
}

/// Request fields after trimming, truncation and amount checks
#[derive(Clone, Debug, PartialEq, Eq)]
struct NormalizedCharge {
    pix_key: String,
    merchant_name: String,
    merchant_city: String,
    txid: Option<String>,
    description: Option<String>,
    amount: String,
}

/// Generate the BR Code for a fixed-amount charge.
///
/// Fails with [`PixError::InvalidAmount`] when the amount is not positive
/// and with [`PixError::FieldTooLong`] when a nested block overflows the
/// two-digit length prefix. No partial payload is ever returned.
pub fn generate_pix_payload(request: &PixChargeRequest) -> Result<PixPayload> {
    let charge = normalize(request)?;

    let mut account = format_field(tag::ACCOUNT_GUI, PIX_GUI)?;
    account.push_str(&format_field(tag::ACCOUNT_KEY, &charge.pix_key)?);
    if let Some(description) = &charge.description {
        account.push_str(&format_field(tag::ACCOUNT_DESCRIPTION, description)?);
    }

    let mut payload = String::new();
    payload.push_str(&format_field(tag::PAYLOAD_FORMAT, PAYLOAD_FORMAT_INDICATOR)?);
    payload.push_str(&format_field(
        tag::INITIATION_METHOD,
        POINT_OF_INITIATION_SINGLE_USE,
    )?);
    payload.push_str(&format_field(tag::MERCHANT_ACCOUNT, &account)?);
    payload.push_str(&format_field(tag::CATEGORY_CODE, MERCHANT_CATEGORY_CODE)?);
    payload.push_str(&format_field(tag::CURRENCY, CURRENCY_BRL)?);
    payload.push_str(&format_field(tag::AMOUNT, &charge.amount)?);
    payload.push_str(&format_field(tag::COUNTRY, COUNTRY_CODE)?);
    payload.push_str(&format_field(tag::MERCHANT_NAME, &charge.merchant_name)?);
    payload.push_str(&format_field(tag::MERCHANT_CITY, &charge.merchant_city)?);

    if let Some(txid) = &charge.txid {
        let additional = format_field(tag::ADDITIONAL_TXID, txid)?;
        payload.push_str(&format_field(tag::ADDITIONAL_DATA, &additional)?);
    }

    payload.push_str(CRC_HEADER);
    let crc = crc16(&payload);
    payload.push_str(&crc);

    tracing::debug!(
        amount = %charge.amount,
        has_txid = charge.txid.is_some(),
        has_description = charge.description.is_some(),
        len = payload.len(),
        crc = %crc,
        "Generated Pix payload"
    );

    Ok(PixPayload::new(payload))
}

fn normalize(request: &PixChargeRequest) -> Result<NormalizedCharge> {
    let pix_key = request.pix_key.trim().to_string();
    let merchant_name = truncate("merchant_name", request.merchant_name.trim(), MAX_MERCHANT_NAME);
    let merchant_city = truncate(
        "merchant_city",
        &strip_accents(&request.merchant_city.trim().to_uppercase()),
        MAX_MERCHANT_CITY,
    );
    let txid = optional(request.txid.as_deref(), "txid", MAX_TXID);
    let description = optional(request.description.as_deref(), "description", MAX_DESCRIPTION);
    let amount = format_amount(request.amount)?;

    Ok(NormalizedCharge {
        pix_key,
        merchant_name,
        merchant_city,
        txid,
        description,
        amount,
    })
}

/// Render an amount with exactly two decimals and `.` as separator.
///
/// Rounds half away from zero. Non-positive amounts, and amounts that
/// round down to `0.00`, are rejected.
pub fn format_amount(amount: Decimal) -> Result<String> {
    if amount <= Decimal::ZERO {
        return Err(PixError::InvalidAmount(format!(
            "amount must be greater than 0, got {amount}"
        )));
    }

    let mut cents = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if cents.is_zero() {
        return Err(PixError::InvalidAmount(format!(
            "amount {amount} rounds to 0.00"
        )));
    }
    cents.rescale(2);

    Ok(cents.to_string())
}

/// Drop diacritics via NFD decomposition: "SÃO PAULO" → "SAO PAULO".
pub fn strip_accents(input: &str) -> String {
    input.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

fn truncate(field: &str, value: &str, max: usize) -> String {
    let len = value.chars().count();
    if len <= max {
        return value.to_string();
    }

    tracing::debug!(field, len, max, "Truncating Pix field");
    value.chars().take(max).collect()
}

fn optional(value: Option<&str>, field: &str, max: usize) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| truncate(field, v, max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tlv::{TlvField, find, parse_fields};
    use rust_decimal_macros::dec;

    fn sample() -> PixChargeRequest {
        PixChargeRequest::new("test@example.com", "Joao Silva", "SAO PAULO", dec!(10.5))
    }

    fn field(payload: &PixPayload, tag: &str) -> Option<String> {
        let fields = parse_fields(payload.as_str()).unwrap();
        find(&fields, tag).map(|f| f.value.clone())
    }

    #[test]
    fn test_reference_payload() {
        let payload = generate_pix_payload(&sample()).unwrap();
        assert_eq!(
            payload.as_str(),
            "00020101021226380014br.gov.bcb.pix0116test@example.com\
             520400005303986540510.505802BR5910Joao Silva6009SAO PAULO6304D268"
        );
    }

    #[test]
    fn test_end_to_end_fields() {
        let payload = generate_pix_payload(&sample()).unwrap();
        let s = payload.as_str();

        assert!(s.starts_with("000201"));
        assert!(s.contains("0014br.gov.bcb.pix"));
        assert!(s.contains("0116test@example.com"));
        assert!(s.contains("5303986"));
        assert!(s.contains("540510.50"));
        assert!(s.contains("5802BR"));
        assert!(s.contains("5910Joao Silva"));
        assert!(s.contains("6009SAO PAULO"));

        let (body, crc) = s.split_at(s.len() - 4);
        assert!(body.ends_with("6304"));
        assert_eq!(crc, crc16(body));
        assert_eq!(payload.crc(), crc);
    }

    #[test]
    fn test_deterministic() {
        let request = sample().with_txid("ABC123").with_description("Corrida");
        let first = generate_pix_payload(&request).unwrap();
        let second = generate_pix_payload(&request).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_framing_consumes_whole_payload() {
        let requests = [
            sample(),
            sample().with_txid("PEDIDO-42"),
            sample().with_description("Corrida aeroporto"),
            PixChargeRequest::new(
                "123e4567-e89b-12d3-a456-426614174000",
                "X".repeat(40),
                "Y".repeat(40),
                dec!(99999.99),
            )
            .with_txid("T".repeat(40))
            .with_description("D".repeat(30)),
        ];

        for request in &requests {
            let payload = generate_pix_payload(request).unwrap();
            let fields = parse_fields(payload.as_str()).unwrap();
            let rebuilt: String = fields
                .iter()
                .map(|f| format_field(&f.tag, &f.value).unwrap())
                .collect();
            assert_eq!(rebuilt, payload.as_str());

            let tags: Vec<&str> = fields.iter().map(|f| f.tag.as_str()).collect();
            assert_eq!(tags.first(), Some(&"00"));
            assert_eq!(tags.last(), Some(&"63"));
        }
    }

    #[test]
    fn test_field_order() {
        let request = sample().with_txid("ABC");
        let payload = generate_pix_payload(&request).unwrap();
        let tags: Vec<String> = parse_fields(payload.as_str())
            .unwrap()
            .into_iter()
            .map(|f| f.tag)
            .collect();
        assert_eq!(
            tags,
            ["00", "01", "26", "52", "53", "54", "58", "59", "60", "62", "63"]
        );
    }

    #[test]
    fn test_truncation() {
        let name = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmn";
        assert_eq!(name.len(), 40);
        let request = PixChargeRequest::new(
            "11144477735",
            name,
            "  são joão del-rei mg  ",
            dec!(1),
        );
        let payload = generate_pix_payload(&request).unwrap();

        assert_eq!(field(&payload, "59").unwrap(), &name[..25]);
        assert_eq!(field(&payload, "60").unwrap(), "SAO JOAO DEL-RE");
    }

    #[test]
    fn test_city_accents_stripped() {
        let request = PixChargeRequest::new("11144477735", "Ana", "Florianópolis", dec!(5));
        let payload = generate_pix_payload(&request).unwrap();
        assert_eq!(field(&payload, "60").unwrap(), "FLORIANOPOLIS");
    }

    #[test]
    fn test_name_case_and_accents_preserved() {
        let request = PixChargeRequest::new("11144477735", "  José Conceição ", "Natal", dec!(5));
        let payload = generate_pix_payload(&request).unwrap();
        assert_eq!(field(&payload, "59").unwrap(), "José Conceição");
    }

    #[test]
    fn test_accented_name_payload() {
        let request =
            PixChargeRequest::new("test@example.com", "José Silva", "SAO PAULO", dec!(10.50));
        let payload = generate_pix_payload(&request).unwrap();

        assert_eq!(
            payload.as_str(),
            "00020101021226380014br.gov.bcb.pix0116test@example.com\
             520400005303986540510.505802BR5910José Silva6009SAO PAULO6304D214"
        );
        assert_eq!(payload.crc(), "D214");
    }

    #[test]
    fn test_amount_formatting() {
        assert_eq!(format_amount(dec!(10)).unwrap(), "10.00");
        assert_eq!(format_amount(dec!(3.1)).unwrap(), "3.10");
        assert_eq!(format_amount(dec!(0.005)).unwrap(), "0.01");
        assert_eq!(format_amount(dec!(1234.567)).unwrap(), "1234.57");

        let payload = generate_pix_payload(&PixChargeRequest::new(
            "a@b.co", "Ana", "Natal", dec!(10),
        ))
        .unwrap();
        assert!(payload.as_str().contains("540510.00"));

        let payload = generate_pix_payload(&PixChargeRequest::new(
            "a@b.co", "Ana", "Natal", dec!(3.1),
        ))
        .unwrap();
        assert!(payload.as_str().contains("54043.10"));
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        for amount in [dec!(0), dec!(-1), dec!(-0.01), dec!(0.004)] {
            let request = PixChargeRequest::new("a@b.co", "Ana", "Natal", amount);
            let err = generate_pix_payload(&request).unwrap_err();
            assert!(matches!(err, PixError::InvalidAmount(_)), "{amount}: {err}");
        }
    }

    #[test]
    fn test_txid_omitted_when_absent() {
        let payload = generate_pix_payload(&sample()).unwrap();
        assert!(field(&payload, "62").is_none());

        let blank = generate_pix_payload(&sample().with_txid("   ")).unwrap();
        assert_eq!(blank, payload);
    }

    #[test]
    fn test_txid_nested_and_truncated() {
        let txid = "0123456789012345678901234567890";
        let payload = generate_pix_payload(&sample().with_txid(txid)).unwrap();

        let additional = field(&payload, "62").unwrap();
        let nested = parse_fields(&additional).unwrap();
        assert_eq!(nested, vec![TlvField::new("05", &txid[..25])]);
    }

    #[test]
    fn test_description_nested_in_account() {
        let payload = generate_pix_payload(&sample().with_description(" Corrida ")).unwrap();

        let account = parse_fields(&field(&payload, "26").unwrap()).unwrap();
        assert_eq!(
            account,
            vec![
                TlvField::new("00", PIX_GUI),
                TlvField::new("01", "test@example.com"),
                TlvField::new("02", "Corrida"),
            ]
        );
    }

    #[test]
    fn test_oversized_account_block_rejected() {
        let key = "k".repeat(60);
        let request = sample_with_key(&key).with_description("d".repeat(72));
        let err = generate_pix_payload(&request).unwrap_err();
        assert_eq!(err.code(), "FIELD_TOO_LONG");
    }

    fn sample_with_key(key: &str) -> PixChargeRequest {
        PixChargeRequest::new(key, "Joao Silva", "SAO PAULO", dec!(10.5))
    }

    #[test]
    fn test_strip_accents() {
        assert_eq!(strip_accents("SÃO PAULO"), "SAO PAULO");
        assert_eq!(strip_accents("GOIÂNIA"), "GOIANIA");
        assert_eq!(strip_accents("MACEIÓ"), "MACEIO");
        assert_eq!(strip_accents("CURITIBA"), "CURITIBA");
    }
}
