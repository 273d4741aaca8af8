//! CRC16-CCITT checksum
//!
//! The BR Code trailer (tag `63`) carries a CRC-16/CCITT-FALSE over the
//! whole payload, including the literal `"6304"` that introduces it.
//!
//! The register is fed one character at a time, the same unit TLV lengths
//! are counted in. Only the low byte of a code point reaches the register.

/// CRC-16/CCITT polynomial
const POLYNOMIAL: u16 = 0x1021;

/// Initial register value
const INITIAL: u16 = 0xFFFF;

/// Raw CRC register over the characters of `input`.
pub fn checksum(input: &str) -> u16 {
    let mut crc = INITIAL;

    for c in input.chars() {
        let [.., low] = u32::from(c).to_be_bytes();
        crc ^= u16::from(low) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ POLYNOMIAL;
            } else {
                crc <<= 1;
            }
        }
    }

    crc
}

/// CRC of a payload string, rendered as 4 uppercase hex digits.
///
/// ```
/// assert_eq!(pix_core::crc16("123456789"), "29B1");
/// ```
pub fn crc16(input: &str) -> String {
    format!("{:04X}", checksum(input))
}
