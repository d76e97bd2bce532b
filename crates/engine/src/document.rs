//! Brazilian tax document validation (CPF for people, CNPJ for companies).
//!
//! Both documents end with two mod-11 check digits. Inputs may be given as
//! plain digits or with the usual `.`, `-` and `/` punctuation.

const CPF_LEN: usize = 11;
const CNPJ_LEN: usize = 14;

const CNPJ_FIRST_WEIGHTS: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
const CNPJ_SECOND_WEIGHTS: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

/// Returns `true` if `document` is a valid CPF or CNPJ.
#[must_use]
pub fn is_valid_document(document: &str) -> bool {
    is_cpf(document) || is_cnpj(document)
}

/// Returns `true` if `document` is a valid CPF (11 digits).
#[must_use]
pub fn is_cpf(document: &str) -> bool {
    let Some(digits) = digits_of(document, CPF_LEN) else {
        return false;
    };

    let first = cpf_check_digit(&digits[..9]);
    let second = cpf_check_digit(&digits[..10]);
    digits[9] == first && digits[10] == second
}

/// Returns `true` if `document` is a valid CNPJ (14 digits).
#[must_use]
pub fn is_cnpj(document: &str) -> bool {
    let Some(digits) = digits_of(document, CNPJ_LEN) else {
        return false;
    };

    let first = cnpj_check_digit(&digits[..12], &CNPJ_FIRST_WEIGHTS);
    let second = cnpj_check_digit(&digits[..13], &CNPJ_SECOND_WEIGHTS);
    digits[12] == first && digits[13] == second
}

/// Extracts exactly `len` digits, ignoring punctuation.
///
/// Sequences of a single repeated digit pass the checksum but are never
/// issued, so they are rejected here.
fn digits_of(document: &str, len: usize) -> Option<Vec<u32>> {
    let document = document.trim();
    if document
        .chars()
        .any(|c| !c.is_ascii_digit() && !matches!(c, '.' | '-' | '/'))
    {
        return None;
    }

    let digits: Vec<u32> = document.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() != len || digits.iter().all(|d| *d == digits[0]) {
        return None;
    }
    Some(digits)
}

fn cpf_check_digit(digits: &[u32]) -> u32 {
    let weight_start = digits.len() as u32 + 1;
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, d)| d * (weight_start - i as u32))
        .sum();
    let rest = (sum * 10) % 11;
    if rest == 10 { 0 } else { rest }
}

fn cnpj_check_digit(digits: &[u32], weights: &[u32]) -> u32 {
    let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
    let rest = sum % 11;
    if rest < 2 { 0 } else { 11 - rest }
}
