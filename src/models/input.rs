use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Clamps a user supplied quantity to a finite, non-negative value.
pub fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Reads a loosely typed numeric form value.
///
/// Numbers pass through, strings are parsed from their leading numeric
/// prefix ("12.5kg" reads as 12.5), everything else reads as 0.
pub fn coerce_f64(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_float_prefix(s),
        Value::Bool(_) | Value::Null | Value::Array(_) | Value::Object(_) => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Integer counterpart of [`coerce_f64`]; fractional input is truncated.
pub fn coerce_i64(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|v| v.is_finite()).map(|v| v.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => parse_int_prefix(s).unwrap_or(0),
        _ => 0,
    }
}

fn parse_float_prefix(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    let mut seen_exp = false;
    let mut prev = None;

    for (i, c) in s.char_indices() {
        match c {
            '+' | '-' if i == 0 || matches!(prev, Some('e' | 'E')) => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot && !seen_exp => seen_dot = true,
            'e' | 'E' if seen_digit && !seen_exp => {
                // Only accept the exponent when digits follow it.
                let rest = &s[i + 1..];
                let rest = rest.strip_prefix(['+', '-']).unwrap_or(rest);
                if !rest.starts_with(|d: char| d.is_ascii_digit()) {
                    break;
                }
                seen_exp = true;
            }
            _ => break,
        }
        end = i + c.len_utf8();
        prev = Some(c);
    }

    if !seen_digit {
        return None;
    }
    let mut candidate = &s[..end];
    while !candidate.is_empty() {
        if let Ok(v) = candidate.parse::<f64>() {
            return Some(v);
        }
        candidate = &candidate[..candidate.len() - 1];
    }
    None
}

fn parse_int_prefix(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let end = s
        .char_indices()
        .take_while(|&(i, c)| c.is_ascii_digit() || (i == 0 && (c == '+' || c == '-')))
        .map(|(i, c)| i + c.len_utf8())
        .last()?;
    s[..end].parse().ok()
}

pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(coerce_f64).unwrap_or(0.0))
}

pub fn lenient_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(Some(value.as_ref().map(coerce_f64).unwrap_or(0.0)))
}

pub fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(coerce_i64).unwrap_or(0))
}

pub fn lenient_opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(Some(value.as_ref().map(coerce_i64).unwrap_or(0)))
}

/// Non-negative day count; negative input reads as 0.
pub fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = lenient_i64(deserializer)?;
    Ok(raw.clamp(0, u32::MAX as i64) as u32)
}
