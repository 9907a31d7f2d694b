//! Numeric checksum validators.
//!
//! Both fail closed: wrong length or any non-digit character yields
//! `false`. Callers strip separators before validating.

/// Shortest and longest digit strings accepted by [`luhn_check`]
/// (IMEI-style device numbers up to 19-digit payment cards).
const LUHN_MIN_LEN: usize = 8;
const LUHN_MAX_LEN: usize = 19;

/// Verhoeff is only applied to 12-digit national ID numbers.
const VERHOEFF_LEN: usize = 12;

/// Luhn algorithm for payment-card and device-identifier numbers.
pub fn luhn_check(digits: &str) -> bool {
    if digits.len() < LUHN_MIN_LEN || digits.len() > LUHN_MAX_LEN {
        return false;
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let mut sum = 0u32;
    let mut double = false;
    for b in digits.bytes().rev() {
        let mut d = u32::from(b - b'0');
        if double { d *= 2; if d > 9 { d -= 9; } }
        sum += d;
        double = !double;
    }
    sum % 10 == 0
}

/// Dihedral group D5 multiplication table.
const VERHOEFF_D: [[u8; 10]; 10] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9],
    [1, 2, 3, 4, 0, 6, 7, 8, 9, 5],
    [2, 3, 4, 0, 1, 7, 8, 9, 5, 6],
    [3, 4, 0, 1, 2, 8, 9, 5, 6, 7],
    [4, 0, 1, 2, 3, 9, 5, 6, 7, 8],
    [5, 9, 8, 7, 6, 0, 4, 3, 2, 1],
    [6, 5, 9, 8, 7, 1, 0, 4, 3, 2],
    [7, 6, 5, 9, 8, 2, 1, 0, 4, 3],
    [8, 7, 6, 5, 9, 3, 2, 1, 0, 4],
    [9, 8, 7, 6, 5, 4, 3, 2, 1, 0],
];

/// Position-dependent permutation table.
const VERHOEFF_P: [[u8; 10]; 8] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9],
    [1, 5, 7, 6, 2, 8, 3, 0, 9, 4],
    [5, 8, 0, 3, 7, 9, 6, 1, 4, 2],
    [8, 9, 1, 6, 0, 4, 3, 5, 2, 7],
    [9, 4, 5, 3, 1, 2, 6, 8, 7, 0],
    [4, 2, 8, 6, 5, 7, 3, 9, 0, 1],
    [2, 7, 9, 3, 8, 0, 6, 4, 1, 5],
    [7, 0, 4, 6, 9, 1, 3, 2, 5, 8],
];

/// Multiplicative inverses in D5; used when generating check digits.
const VERHOEFF_INV: [u8; 10] = [0, 4, 3, 2, 1, 5, 6, 7, 8, 9];

/// Verhoeff checksum over a 12-digit national ID number.
pub fn verhoeff_check(digits: &str) -> bool {
    if digits.len() != VERHOEFF_LEN || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    verhoeff_accumulate(digits, 0) == 0
}

/// Compute the Verhoeff check digit to append to `payload`.
///
/// Returns `None` for empty or non-digit input.
pub fn verhoeff_check_digit(payload: &str) -> Option<u8> {
    if payload.is_empty() || !payload.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(VERHOEFF_INV[verhoeff_accumulate(payload, 1) as usize])
}

fn verhoeff_accumulate(digits: &str, offset: usize) -> u8 {
    digits.bytes().rev().enumerate().fold(0u8, |c, (i, b)| {
        let d = (b - b'0') as usize;
        VERHOEFF_D[c as usize][VERHOEFF_P[(i + offset) % 8][d] as usize]
    })
}

#[cfg(test)]
#[path = "validators_tests.rs"]
mod tests;
