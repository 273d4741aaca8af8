//! CPF (Cadastro de Pessoas Físicas) helpers
//!
//! Full check-digit validation for individual taxpayer numbers. This is
//! stricter than the Pix key shape check and is meant for registration
//! forms, not for deciding whether a key can be encoded.

use crate::error::{PixError, Result};

const CPF_LEN: usize = 11;

/// Keep ASCII digits only: "111.444.777-35" → "11144477735".
pub fn clean(cpf: &str) -> String {
    cpf.chars().filter(char::is_ascii_digit).collect()
}

/// `XXX.XXX.XXX-XX`, or the input untouched when it is not 11 digits.
pub fn format(cpf: &str) -> String {
    let digits = clean(cpf);
    if digits.len() != CPF_LEN {
        return cpf.to_string();
    }

    format!(
        "{}.{}.{}-{}",
        &digits[0..3],
        &digits[3..6],
        &digits[6..9],
        &digits[9..]
    )
}

/// Validate a CPF, punctuated or not.
pub fn check(cpf: &str) -> Result<()> {
    let digits: Vec<u32> = clean(cpf).chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.is_empty() {
        return Err(PixError::InvalidCpf("CPF is required".into()));
    }

    if digits.len() != CPF_LEN {
        return Err(PixError::InvalidCpf("CPF must have 11 digits".into()));
    }

    // 000.000.000-00, 111.111.111-11, ... pass the arithmetic but are void
    if digits.iter().all(|&d| d == digits[0]) {
        return Err(PixError::InvalidCpf("invalid CPF".into()));
    }

    if check_digit(&digits[..9]) != digits[9] || check_digit(&digits[..10]) != digits[10] {
        return Err(PixError::InvalidCpf("invalid CPF".into()));
    }

    Ok(())
}

pub fn is_valid(cpf: &str) -> bool {
    check(cpf).is_ok()
}

/// Mod-11 digit over `base`, weights counting down to 2.
fn check_digit(base: &[u32]) -> u32 {
    let sum: u32 = base
        .iter()
        .rev()
        .zip(2..)
        .map(|(digit, weight)| digit * weight)
        .sum();

    match 11 - (sum % 11) {
        d if d >= 10 => 0,
        d => d,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_cpfs() {
        assert!(is_valid("11144477735"));
        assert!(is_valid("111.444.777-35"));
        assert!(is_valid("529.982.247-25"));
    }

    #[test]
    fn test_wrong_check_digits() {
        assert!(!is_valid("11144477734"));
        assert!(!is_valid("11144477725"));
    }

    #[test]
    fn test_error_reasons() {
        assert_eq!(check(""), Err(PixError::InvalidCpf("CPF is required".into())));
        assert_eq!(check("abc"), Err(PixError::InvalidCpf("CPF is required".into())));
        assert_eq!(
            check("1234"),
            Err(PixError::InvalidCpf("CPF must have 11 digits".into()))
        );
        assert_eq!(
            check("111.111.111-11"),
            Err(PixError::InvalidCpf("invalid CPF".into()))
        );
    }

    #[test]
    fn test_clean_and_format() {
        assert_eq!(clean("111.444.777-35"), "11144477735");
        assert_eq!(format("11144477735"), "111.444.777-35");
        assert_eq!(format("1234"), "1234");
    }

    #[test]
    fn test_check_digit() {
        assert_eq!(check_digit(&[1, 1, 1, 4, 4, 4, 7, 7, 7]), 3);
        assert_eq!(check_digit(&[1, 1, 1, 4, 4, 4, 7, 7, 7, 3]), 5);
    }
}
