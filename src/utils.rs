use crate::preset::{PresetRequest, TargetSelection};
use std::fmt;

/// Largest accepted start value.
pub const MAX_START_SECONDS: i64 = 3600;

/// Format with exactly one decimal place, the way `Number.prototype.toFixed(1)`
/// does it: exact ties round away from zero and `-0` prints as `0.0`.
/// Magnitudes of 1e21 and above fall back to [`format_js_number`].
///
/// # Examples
/// ```
/// use countdown_preset::to_fixed1;
/// assert_eq!(to_fixed1(0.0), "0.0");
/// assert_eq!(to_fixed1(1.5), "1.5");
/// assert_eq!(to_fixed1(1.25), "1.3");
/// ```
pub fn to_fixed1(value: f64) -> String {
    if value == 0.0 {
        return "0.0".to_string();
    }
    if !value.is_finite() || value.abs() >= 1e21 {
        return format_js_number(value);
    }
    // A value halfway between two tenths is exactly representable only as an odd multiple of 0.25.
    let quarters = value.abs() * 4.0;
    if quarters.fract() == 0.0 && quarters % 2.0 != 0.0 {
        // quarters < 2^53 here, so the integer math is exact
        let tenths = (quarters as u64 * 5 + 1) / 2;
        let sign = if value < 0.0 { "-" } else { "" };
        return format!("{}{}.{}", sign, tenths / 10, tenths % 10);
    }
    format!("{:.1}", value)
}

/// Render a number the way `JSON.stringify` writes it: shortest round-trip
/// digits, plain notation for decimal exponents in `-7 < e < 21` and
/// `1e+21` / `1e-7` style otherwise.
pub fn format_js_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let sci = format!("{:e}", value.abs());
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    // Position of the decimal point relative to the first digit
    let n = exponent.parse::<i32>().unwrap_or(0) + 1;

    let body = if k <= n && n <= 21 {
        format!("{}{}", digits, "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        format!("{}.{}", int, frac)
    } else if -6 < n && n <= 0 {
        format!("0.{}{}", "0".repeat((-n) as usize), digits)
    } else {
        let e = n - 1;
        let e_sign = if e >= 0 { '+' } else { '-' };
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{}e{}{}", first, e_sign, e.abs())
        } else {
            format!("{}.{}e{}{}", first, rest, e_sign, e.abs())
        }
    };
    format!("{}{}", sign, body)
}

/// JSON token for a one-decimal field.
///
/// Numbers the browser would write in exponent form keep that form; everything
/// else goes through [`to_fixed1`].
pub fn fixed1_token(value: f64) -> String {
    let plain = format_js_number(value);
    if plain.contains('e') {
        plain
    } else {
        to_fixed1(value)
    }
}

/// UTF-8 size of `s` with thousands separators, e.g. `"1,234 bytes"`.
pub fn bytes_label(s: &str) -> String {
    let digits = s.len().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{} bytes", grouped)
}

/// Form validation errors, one per input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyPresetName,
    EmptyGroupName,
    InvalidZoneId,
    InvalidStatusId,
    InvalidStartSeconds,
    InvalidVerticalOffset,
    InvalidFontScale,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyPresetName => write!(f, "Preset name is required"),
            ValidationError::EmptyGroupName => write!(f, "Group name is required"),
            ValidationError::InvalidZoneId => write!(f, "Zone ID must be a number"),
            ValidationError::InvalidStatusId => write!(f, "Status ID must be a number"),
            ValidationError::InvalidStartSeconds => write!(
                f,
                "Start seconds must be a whole number from 1 to {}",
                MAX_START_SECONDS
            ),
            ValidationError::InvalidVerticalOffset => {
                write!(f, "Vertical offset must be a number (one decimal place)")
            }
            ValidationError::InvalidFontScale => {
                write!(f, "Font scale must be a number (one decimal place)")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Raw text of every form input, as typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormValues {
    pub preset_name: String,
    pub group_name: String,
    pub zone_id: String,
    pub status_id: String,
    pub start_seconds: String,
    pub sub_second_threshold: String,
    pub overlay_v_offset: String,
    pub overlay_f_scale: String,
    pub target: String,
}

/// Parse a trimmed, non-empty, finite number.
fn parse_finite(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Lenient threshold parse: empty or unparsable text means "off", `NaN` floors
/// to 0 and infinities saturate (the builder clamps to the start value).
fn parse_threshold(input: &str) -> Option<i64> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .map(|raw| raw.floor() as i64)
}

fn parse_required<E>(input: &str, err: E) -> Result<f64, E> {
    parse_finite(input).ok_or(err)
}

/// Validate every field and assemble a generation request.
///
/// Fields are checked in form order; the first failure aborts.
pub fn parse_form(values: &FormValues) -> Result<PresetRequest, ValidationError> {
    let preset_name = values.preset_name.trim();
    if preset_name.is_empty() {
        return Err(ValidationError::EmptyPresetName);
    }
    let group_name = values.group_name.trim();
    if group_name.is_empty() {
        return Err(ValidationError::EmptyGroupName);
    }

    let zone_id = parse_required(&values.zone_id, ValidationError::InvalidZoneId)?;
    let status_id = parse_required(&values.status_id, ValidationError::InvalidStatusId)?;

    let start_seconds =
        parse_required(&values.start_seconds, ValidationError::InvalidStartSeconds)?;
    if start_seconds < 1.0
        || start_seconds > MAX_START_SECONDS as f64
        || start_seconds.floor() != start_seconds
    {
        return Err(ValidationError::InvalidStartSeconds);
    }

    let sub_second_threshold = parse_threshold(&values.sub_second_threshold);

    let overlay_v_offset = parse_required(
        &values.overlay_v_offset,
        ValidationError::InvalidVerticalOffset,
    )?;
    let overlay_f_scale =
        parse_required(&values.overlay_f_scale, ValidationError::InvalidFontScale)?;

    Ok(PresetRequest {
        preset_name: preset_name.to_string(),
        group_name: group_name.to_string(),
        zone_id,
        status_id,
        start_seconds: start_seconds as i64,
        sub_second_threshold,
        overlay_v_offset,
        overlay_f_scale,
        target: TargetSelection::from_value(&values.target),
    })
}
