//! Exact conversion of smallest-unit integers into decimal strings, and the
//! orderings used when sorting balances.

use std::{cmp::Ordering, str::FromStr};

use alloy::primitives::{utils::format_units, U256};
use strum_macros::{Display, EnumString};

use crate::balances::BalanceResult;

/// Native asset convention, used when a token does not declare its decimals.
pub const DEFAULT_DECIMALS: u8 = 18;

/// Formats `raw / 10^decimals` without any rounding. A missing value is a zero
/// balance.
pub fn convert(raw: Option<U256>, decimals: u8) -> String {
    let Some(raw) = raw else {
        return "0".to_string();
    };

    match format_units(raw, decimals) {
        Ok(formatted) => trim_fraction(&formatted).to_string(),
        // alloy units stop at 77 decimals
        Err(_) => insert_decimal_point(raw, decimals),
    }
}

fn trim_fraction(value: &str) -> &str {
    if value.contains('.') {
        value.trim_end_matches('0').trim_end_matches('.')
    } else {
        value
    }
}

fn insert_decimal_point(raw: U256, decimals: u8) -> String {
    let digits = raw.to_string();
    let decimals = decimals as usize;

    let formatted = if digits.len() > decimals {
        let (integer, fraction) = digits.split_at(digits.len() - decimals);
        format!("{integer}.{fraction}")
    } else {
        format!("0.{digits:0>decimals$}")
    };
    trim_fraction(&formatted).to_string()
}

/// Parses a decimal or `0x` prefixed hex magnitude. Blank input is treated as
/// absent.
pub fn parse_magnitude(value: &str) -> crate::Result<Option<U256>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }

    U256::from_str(value)
        .map(Some)
        .map_err(|_| crate::Error::InvalidMagnitude(value.to_string()))
}

/// How the all-tokens output is ordered. Both sort descending by balance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortPolicy {
    /// Compares the decimal values, so "10" ranks above "9".
    #[default]
    Numeric,
    /// Compares the strings as text, reproducing the historical output where
    /// "9" ranks above "10".
    Lexical,
}

pub fn sort_balances(balances: &mut [BalanceResult], policy: SortPolicy) {
    match policy {
        SortPolicy::Numeric => {
            balances.sort_by(|a, b| cmp_decimal_str(&b.balance, &a.balance));
        }
        SortPolicy::Lexical => {
            balances.sort_by(|a, b| b.balance.cmp(&a.balance));
        }
    }
}

/// Orders two non-negative decimal strings by value. Works on strings produced
/// by [`convert`], which never carry leading zeros or trailing fractional zeros.
pub fn cmp_decimal_str(a: &str, b: &str) -> Ordering {
    let split = |s: &str| match s.split_once('.') {
        Some((integer, fraction)) => (
            integer.trim_start_matches('0').to_string(),
            fraction.trim_end_matches('0').to_string(),
        ),
        None => (s.trim_start_matches('0').to_string(), String::new()),
    };

    let (a_int, a_frac) = split(a);
    let (b_int, b_frac) = split(b);

    a_int
        .len()
        .cmp(&b_int.len())
        .then_with(|| a_int.cmp(&b_int))
        .then_with(|| a_frac.cmp(&b_frac))
}
