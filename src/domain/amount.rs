//! Amount text handling for fungible asset transfers.
//!
//! Amounts are kept as the text the user typed so that partial input such as
//! `"0."` survives between keystrokes. Conversion to the asset's smallest unit
//! is done with integer arithmetic on the decimal digits.

use std::cmp::Ordering;

use color_eyre::eyre::{Result, eyre};

/// Largest number of fraction digits whose power of ten fits in a u128.
const MAX_FRACTION_DIGITS: usize = 38;

/// Check that `s` is a plain decimal: ASCII digits with at most one '.',
/// and at least one digit. Signs, exponents and whitespace are rejected.
fn is_plain_decimal(s: &str) -> bool {
    let mut digits = 0usize;
    let mut dots = 0usize;
    for c in s.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => dots += 1,
            _ => return false,
        }
    }
    digits > 0 && dots <= 1
}

/// Compare two plain decimals by their digits, without rounding.
fn compare_decimal(a: &str, b: &str) -> Ordering {
    let (a_int, a_frac) = decimal_parts(a);
    let (b_int, b_frac) = decimal_parts(b);
    a_int
        .len()
        .cmp(&b_int.len())
        .then_with(|| a_int.cmp(b_int))
        .then_with(|| a_frac.cmp(b_frac))
}

/// Integer digits without leading zeros and fraction digits without trailing zeros.
fn decimal_parts(s: &str) -> (&str, &str) {
    let (int, frac) = s.split_once('.').unwrap_or((s, ""));
    (int.trim_start_matches('0'), frac.trim_end_matches('0'))
}

/// Normalize a proposed amount against the current text and the available balance.
///
/// - `"."` typed into an empty field becomes `"0."`.
/// - Text that is not a number is discarded (returns an empty string).
/// - A number above the balance is clamped to the balance text itself.
/// - Anything else is kept verbatim.
///
/// A balance that does not parse disables clamping.
pub fn normalize_amount(proposed: &str, current: &str, balance: &str) -> String {
    if proposed == "." && current.is_empty() {
        return "0.".to_string();
    }

    if !is_plain_decimal(proposed) {
        return String::new();
    }

    if is_plain_decimal(balance) && compare_decimal(proposed, balance) == Ordering::Greater {
        balance.to_string()
    } else {
        proposed.to_string()
    }
}

/// Scaling factor for an asset with `decimals` fractional digits.
pub fn scaling_factor(decimals: u32) -> Result<u128> {
    10u128
        .checked_pow(decimals)
        .ok_or_else(|| eyre!("Unsupported decimals: {}", decimals))
}

/// Number of fraction digits that can still change the scaled value.
fn fraction_digits(factor: u128) -> usize {
    let mut digits = 0;
    let mut power: u128 = 1;
    while power < factor && digits < MAX_FRACTION_DIGITS {
        power *= 10;
        digits += 1;
    }
    digits
}

/// Convert a human-entered amount to the asset's smallest unit.
///
/// Computes `amount * factor` exactly and truncates any sub-unit remainder.
/// Fraction digits below the smallest unit are dropped before scaling.
/// The result is an integer string without exponent or separators.
pub fn to_smallest_unit(amount: &str, factor: u128) -> Result<String> {
    if !is_plain_decimal(amount) {
        return Err(eyre!("Invalid amount: {:?}", amount));
    }

    let (int_part, frac_part) = match amount.split_once('.') {
        Some((int, frac)) => (int, frac),
        None => (amount, ""),
    };
    // Digits are ASCII, so byte slicing is safe.
    let frac_part = &frac_part[..frac_part.len().min(fraction_digits(factor))];
    let frac_part = frac_part.trim_end_matches('0');

    let int_value: u128 = if int_part.is_empty() {
        0
    } else {
        int_part
            .parse()
            .map_err(|_| eyre!("Amount too large: {}", amount))?
    };

    let overflow = || eyre!("Amount overflows smallest unit: {} x {}", amount, factor);

    let mut total = int_value.checked_mul(factor).ok_or_else(overflow)?;

    if !frac_part.is_empty() {
        let frac_value: u128 = frac_part
            .parse()
            .map_err(|_| eyre!("Invalid fraction: {}", frac_part))?;
        let denominator = 10u128.pow(frac_part.len() as u32);
        let scaled = frac_value.checked_mul(factor).ok_or_else(overflow)? / denominator;
        total = total.checked_add(scaled).ok_or_else(overflow)?;
    }

    Ok(total.to_string())
}

/// Format a raw smallest-unit integer as a decimal string with `decimals` digits.
///
/// Trailing fractional zeros are dropped, so `1500000000000000000` with 18
/// decimals becomes `"1.5"` and `0` becomes `"0"`.
pub fn format_units(raw: &str, decimals: u32) -> Result<String> {
    let value: u128 = raw
        .trim()
        .parse()
        .map_err(|_| eyre!("Invalid raw amount: {:?}", raw))?;
    let factor = scaling_factor(decimals)?;

    let int = value / factor;
    let frac = value % factor;
    if frac == 0 {
        return Ok(int.to_string());
    }

    let frac = format!("{:0width$}", frac, width = decimals as usize);
    Ok(format!("{}.{}", int, frac.trim_end_matches('0')))
}
