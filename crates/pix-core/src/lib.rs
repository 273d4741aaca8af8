//! # pix-core
//!
//! Pix BR Code (EMV-QR) encoding for fixed-amount charges.
//!
//! ## Wire format
//!
//! A BR Code is a flat run of TLV fields. Each field is a 2-digit tag, a
//! 2-digit length and the value; templates nest the same framing inside a
//! value. The last field is always a CRC16 over everything before it:
//!
//! ```text
//! 00 02 01 │ 01 02 12 │ 26 38 [00 14 br.gov.bcb.pix │ 01 16 test@example.com] │ ...
//! 52 04 0000 │ 53 03 986 │ 54 05 10.50 │ 58 02 BR │ 59 10 Joao Silva │
//! 60 09 SAO PAULO │ 63 04 D268
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use pix_core::{PixChargeRequest, generate_pix_payload, validate_pix_key};
//! use rust_decimal::Decimal;
//!
//! let request = PixChargeRequest::new(
//!     "test@example.com",
//!     "Joao Silva",
//!     "São Paulo",
//!     Decimal::new(1050, 2),
//! );
//!
//! assert!(validate_pix_key(&request.pix_key));
//! let payload = generate_pix_payload(&request)?;
//! assert!(payload.as_str().ends_with("6304D268"));
//! # Ok::<(), pix_core::PixError>(())
//! ```
//!
//! The payload string is what goes into the QR code and what the payer
//! pastes into their banking app ("Pix copia e cola").

pub mod cpf;
pub mod crc;
pub mod decode;
pub mod error;
pub mod key;
pub mod model;
pub mod payload;
pub mod tlv;

pub use crc::crc16;
pub use decode::{decode_pix_payload, verify_crc};
pub use error::{PixError, Result};
pub use key::{PixKeyKind, format_phone_display, format_pix_key_display, validate_pix_key};
pub use model::{DecodedPayload, PixChargeRequest, PixPayload};
pub use payload::generate_pix_payload;
pub use tlv::{TlvField, format_field, parse_fields};
