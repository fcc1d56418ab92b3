//! Hexadecimal → decimal conversion for free-form token lists.
//!
//! Values are converted over base-10^9 limbs, so tokens longer than any native
//! integer convert without loss.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

static HEX_DIGITS_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9a-fA-F]+$").unwrap());
static HEX_PREFIX_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?i)0x").unwrap());

const LIMB_BASE: u64 = 1_000_000_000;

/// A token that converted successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexConversion {
    /// Token as typed, prefix included.
    pub raw: String,
    pub decimal: String,
}

/// Split on whitespace and commas, dropping empty pieces.
pub fn parse_hex_tokens(input: &str) -> Vec<&str> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Strip an optional `#` and then an optional `0x`; `None` unless only hex digits remain.
pub fn normalize_hex_token(token: &str) -> Option<&str> {
    let mut t = token.trim();
    if let Some(rest) = t.strip_prefix('#') {
        t = rest;
    }
    if let Some(m) = HEX_PREFIX_REGEX.find(t) {
        t = &t[m.end()..];
    }
    HEX_DIGITS_REGEX.is_match(t).then_some(t)
}

/// Convert a string of hex digits to its decimal representation.
///
/// # Examples
/// ```
/// use countdown_preset::hex::hex_to_decimal;
/// assert_eq!(hex_to_decimal("ff").as_deref(), Some("255"));
/// ```
pub fn hex_to_decimal(hex: &str) -> Option<String> {
    if hex.is_empty() {
        return None;
    }

    // Little-endian limbs, each < LIMB_BASE
    let mut limbs: Vec<u64> = vec![0];
    for c in hex.chars() {
        let mut carry = c.to_digit(16)? as u64;
        for limb in limbs.iter_mut() {
            let v = *limb * 16 + carry;
            *limb = v % LIMB_BASE;
            carry = v / LIMB_BASE;
        }
        if carry > 0 {
            limbs.push(carry);
        }
    }

    let mut iter = limbs.iter().rev();
    let mut out = iter.next().map(|top| top.to_string()).unwrap_or_default();
    for limb in iter {
        out.push_str(&format!("{:09}", limb));
    }
    Some(out)
}

/// Convert every valid token of `input`, in input order. Invalid tokens are skipped.
pub fn convert_hex_tokens(input: &str) -> Vec<HexConversion> {
    parse_hex_tokens(input)
        .into_iter()
        .filter_map(|raw| {
            let converted = normalize_hex_token(raw).and_then(hex_to_decimal);
            if converted.is_none() {
                debug!("Skipping non-hex token {:?}", raw);
            }
            converted.map(|decimal| HexConversion {
                raw: raw.to_string(),
                decimal,
            })
        })
        .collect()
}
