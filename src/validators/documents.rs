//! Brazilian taxpayer registry validators (CPF and CNPJ)
//!
//! Both identifiers end in two modulo-11 check digits. Non-digit characters
//! are stripped before checking, so formatted input ("111.444.777-35",
//! "11.222.333/0001-81") and bare digit runs are both accepted.

/// CPF: 11 digits, two check digits computed over weights 10..2 and 11..2.
pub fn cpf(field: &str, value: &str) -> Vec<String> {
    if cpf_is_valid(&strip_digits(value)) {
        Vec::new()
    } else {
        vec![format!("The field '{}' is not a valid CPF.", field)]
    }
}

/// CNPJ: 14 digits, two check digits computed over the 5..2,9..2 weight cycle.
pub fn cnpj(field: &str, value: &str) -> Vec<String> {
    if cnpj_is_valid(&strip_digits(value)) {
        Vec::new()
    } else {
        vec![format!("The field '{}' is not a valid CNPJ.", field)]
    }
}

/// Route by stripped length: 11 digits go through the CPF checksum, 14
/// through the CNPJ checksum, anything else fails outright without running
/// either algorithm.
pub fn cpf_or_cnpj(field: &str, value: &str) -> Vec<String> {
    const CPF_LENGTH: usize = 11;
    const CNPJ_LENGTH: usize = 14;

    match strip_digits(value).len() {
        CPF_LENGTH => cpf(field, value),
        CNPJ_LENGTH => cnpj(field, value),
        _ => vec![format!(
            "The field '{}' is not a valid CPF or CNPJ.",
            field
        )],
    }
}

fn strip_digits(value: &str) -> Vec<u32> {
    value.chars().filter_map(|c| c.to_digit(10)).collect()
}

/// Repeated-digit sequences ("00000000000", "11111111111", ...) carry valid
/// check digits but are not assignable identifiers.
fn all_same(digits: &[u32]) -> bool {
    digits.windows(2).all(|pair| pair[0] == pair[1])
}

fn cpf_is_valid(digits: &[u32]) -> bool {
    if digits.len() != 11 || all_same(digits) {
        return false;
    }

    cpf_check_digit(&digits[..9], 10) == digits[9]
        && cpf_check_digit(&digits[..10], 11) == digits[10]
}

/// Weighted sum with weights descending from `first_weight` down to 2, then
/// `11 - sum % 11`, clamped to 0 when the remainder is below 2 or exactly
/// 10 (a raw digit of 11, 10 or 1 all collapse to 0).
fn cpf_check_digit(digits: &[u32], first_weight: u32) -> u32 {
    let sum: u32 = digits
        .iter()
        .zip((2..=first_weight).rev())
        .map(|(digit, weight)| digit * weight)
        .sum();

    let rest = sum % 11;
    if rest < 2 || rest == 10 {
        0
    } else {
        11 - rest
    }
}

fn cnpj_is_valid(digits: &[u32]) -> bool {
    if digits.len() != 14 || all_same(digits) {
        return false;
    }

    cnpj_check_digit(&digits[..12]) == digits[12] && cnpj_check_digit(&digits[..13]) == digits[13]
}

/// Weights start at `len - 7` (5 for the base 12 digits, 6 once the first
/// check digit is appended), descend to 2 and wrap back to 9.
fn cnpj_check_digit(digits: &[u32]) -> u32 {
    let mut weight = digits.len() as u32 - 7;
    let mut sum = 0;
    for &digit in digits {
        sum += digit * weight;
        weight -= 1;
        if weight < 2 {
            weight = 9;
        }
    }

    let rest = sum % 11;
    if rest < 2 {
        0
    } else {
        11 - rest
    }
}
