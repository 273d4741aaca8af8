//! BR Code Decoding
//!
//! Reads a "copia e cola" string back into its fields and checks the
//! trailing CRC. Unknown tags are skipped so codes carrying extra
//! templates (e.g. tag 80+ unreserved data) still decode.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::crc::crc16;
use crate::error::{PixError, Result};
use crate::model::DecodedPayload;
use crate::payload::{PIX_GUI, tag};
use crate::tlv::{TlvField, find, parse_fields};

const CRC_TAG: &str = "63";

/// Decode and verify a BR Code.
pub fn decode_pix_payload(payload: &str) -> Result<DecodedPayload> {
    let payload = payload.trim();
    let fields = parse_fields(payload)?;

    let crc_field = match fields.last() {
        Some(field) if field.tag == CRC_TAG && field.value.chars().count() == 4 => field,
        _ => {
            return Err(PixError::Malformed(
                "payload must end with a 4-character CRC field (6304)".into(),
            ));
        }
    };
    check_crc(payload, &crc_field.value)?;

    let account = parse_fields(&required(&fields, tag::MERCHANT_ACCOUNT)?)?;
    let gui = required(&account, tag::ACCOUNT_GUI)?;
    if !gui.eq_ignore_ascii_case(PIX_GUI) {
        return Err(PixError::Malformed(format!("unsupported GUI {gui:?}")));
    }

    let txid = match find(&fields, tag::ADDITIONAL_DATA) {
        Some(additional) => {
            let nested = parse_fields(&additional.value)?;
            optional(&nested, tag::ADDITIONAL_TXID)
        }
        None => None,
    };

    let amount = optional(&fields, tag::AMOUNT)
        .map(|raw| {
            Decimal::from_str(&raw)
                .map_err(|_| PixError::Malformed(format!("invalid amount {raw:?}")))
        })
        .transpose()?;

    Ok(DecodedPayload {
        payload_format: required(&fields, tag::PAYLOAD_FORMAT)?,
        initiation_method: optional(&fields, tag::INITIATION_METHOD),
        gui,
        pix_key: required(&account, tag::ACCOUNT_KEY)?,
        description: optional(&account, tag::ACCOUNT_DESCRIPTION),
        merchant_category_code: optional(&fields, tag::CATEGORY_CODE),
        currency: required(&fields, tag::CURRENCY)?,
        amount,
        country_code: required(&fields, tag::COUNTRY)?,
        merchant_name: required(&fields, tag::MERCHANT_NAME)?,
        merchant_city: required(&fields, tag::MERCHANT_CITY)?,
        txid,
        crc: crc_field.value.to_uppercase(),
    })
}

/// Whether the trailing CRC matches the rest of the payload.
pub fn verify_crc(payload: &str) -> bool {
    let payload = payload.trim();
    match split_crc(payload) {
        Some((_, found)) => check_crc(payload, found).is_ok(),
        None => false,
    }
}

/// Split off the last 4 characters, requiring them to follow "6304".
fn split_crc(payload: &str) -> Option<(&str, &str)> {
    let (idx, _) = payload.char_indices().rev().nth(3)?;
    let (body, crc) = payload.split_at(idx);
    body.ends_with("6304").then_some((body, crc))
}

fn check_crc(payload: &str, found: &str) -> Result<()> {
    let (body, _) = split_crc(payload)
        .ok_or_else(|| PixError::Malformed("missing CRC field".into()))?;

    let expected = crc16(body);
    if expected.eq_ignore_ascii_case(found) {
        Ok(())
    } else {
        tracing::warn!(%expected, %found, "Pix payload CRC mismatch");
        Err(PixError::ChecksumMismatch {
            expected,
            found: found.to_string(),
        })
    }
}

fn required(fields: &[TlvField], tag: &str) -> Result<String> {
    find(fields, tag)
        .map(|f| f.value.clone())
        .ok_or_else(|| PixError::MissingField(tag.to_string()))
}

fn optional(fields: &[TlvField], tag: &str) -> Option<String> {
    find(fields, tag).map(|f| f.value.clone())
}
