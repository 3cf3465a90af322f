// SPDX-FileCopyrightText: 2026 Railbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! National-id and tax-id structural checks.
//!
//! The remote server runs the same national-id checksum on its side and
//! rejects mismatches, so the algorithm here must agree with it exactly:
//! the leading letter expands to a two-digit location code (alphabet
//! A-Z skipping the reserved `I`, codes counting up from 10), the first
//! expansion digit is weighted 1 and the second 9, and the nine id
//! digits are weighted 8,7,6,5,4,3,2,1,1. Valid iff the total is a
//! multiple of 10.

/// Two-digit location code for the leading letter, `None` for the
/// reserved letter and non-ASCII input.
fn location_code(letter: char) -> Option<u32> {
    if !letter.is_ascii_uppercase() || letter == 'I' {
        return None;
    }
    let mut index = letter as u32 - 'A' as u32;
    if letter > 'I' {
        index -= 1;
    }
    Some(10 + index)
}

/// Validates a 10-character national identification number: one letter
/// followed by nine digits, with a passing weighted checksum.
pub fn validate_national_id(id: &str) -> bool {
    let id = id.trim();
    if id.len() != 10 {
        return false;
    }
    let mut chars = id.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    let Some(code) = location_code(first.to_ascii_uppercase()) else {
        return false;
    };

    let mut digits = vec![code / 10, code % 10];
    for c in chars {
        match c.to_digit(10) {
            Some(d) => digits.push(d),
            None => return false,
        }
    }

    let mut sum = digits[0] as i32;
    let mut weight: i32 = 9;
    for &d in &digits[1..] {
        let w = if weight == 0 { 1 } else { weight };
        sum += d as i32 * w;
        weight -= 1;
    }
    sum % 10 == 0
}

/// Validates a company tax id: exactly ten ASCII digits.
pub fn validate_tax_id(id: &str) -> bool {
    let id = id.trim();
    id.len() == 10 && id.chars().all(|c| c.is_ascii_digit())
}
