use std::str::FromStr;

use alloy_primitives::{I256, U256, hex};
use serde_json::{Number, Value};
use tracing::debug;

use crate::models::datasets::values::{RawNumber, TypedValue};

/// Renders a single token as display text.
///
/// `Int`/`Uint` payloads go through 256-bit integers so values beyond `u64`/`f64`
/// range keep every digit. Other scalars are returned as carried. Array-like
/// tokens render as `[a, b, ...]`.
pub fn decode(value: &TypedValue) -> String {
    match value {
        TypedValue::Uint(raw) => decode_uint(raw),
        TypedValue::Int(raw) => decode_int(raw),
        TypedValue::Address(s)
        | TypedValue::FixedBytes(s)
        | TypedValue::Bytes(s)
        | TypedValue::String(s) => s.clone(),
        TypedValue::Bool(b) => b.to_string(),
        TypedValue::FixedArray(items) | TypedValue::Array(items) | TypedValue::Tuple(items) => {
            format!(
                "[{}]",
                items.iter().map(decode).collect::<Vec<String>>().join(", ")
            )
        }
        TypedValue::Other { value, .. } => raw_json(value),
    }
}

/// Decodes tokens in order, splicing the elements of array-like tokens into the
/// result. Only one level is flattened; deeper arrays render through [`decode`].
pub fn decode_sequence(values: &[TypedValue]) -> Vec<String> {
    values
        .iter()
        .flat_map(|value| match value.as_items() {
            Some(items) => items.iter().map(decode).collect::<Vec<String>>(),
            None => vec![decode(value)],
        })
        .collect()
}

/// Reads a bytes-like token as NUL-terminated text, one character per byte.
/// `String` tokens pass through; anything else, or a payload that is not hex, is `None`.
pub fn decode_ascii(value: &TypedValue) -> Option<String> {
    match value {
        TypedValue::FixedBytes(s) | TypedValue::Bytes(s) => {
            let bytes = hex::decode(s.trim_start_matches("0x")).ok()?;
            Some(
                bytes
                    .into_iter()
                    .take_while(|b| *b != 0)
                    .map(char::from)
                    .collect(),
            )
        }
        TypedValue::String(s) => Some(s.clone()),
        _ => None,
    }
}

/// Best-effort text for names and keys: [`decode_ascii`], then for byte tokens that
/// already hold text (`0xAmount00`) the payload with its prefix and zero padding
/// removed, then [`decode`].
pub fn decode_ascii_lossy(value: &TypedValue) -> String {
    if let Some(text) = decode_ascii(value) {
        return text;
    }
    match value {
        TypedValue::FixedBytes(s) | TypedValue::Bytes(s) => {
            debug!("Bytes payload {} is not hex, reading it as text", s);
            let mut text = s.strip_prefix("0x").unwrap_or(s);
            while let Some(rest) = text.strip_suffix("00") {
                text = rest;
            }
            text.to_string()
        }
        other => decode(other),
    }
}

// `U256` parses "" and a bare "0x" as zero
fn has_no_digits(s: &str) -> bool {
    let digits = s.trim();
    let digits = digits.strip_prefix("0x").unwrap_or(digits);
    digits.is_empty()
}

fn decode_uint(raw: &RawNumber) -> String {
    match raw {
        RawNumber::Text(s) if has_no_digits(s) => {
            debug!("Uint payload {:?} has no digits, rendering raw", s);
            s.clone()
        }
        RawNumber::Text(s) => match U256::from_str(s.trim()) {
            Ok(n) => n.to_string(),
            Err(e) => {
                debug!("Failed to parse Uint {}: {}, rendering raw", s, e);
                s.clone()
            }
        },
        RawNumber::Number(n) => render_number(n),
    }
}

fn decode_int(raw: &RawNumber) -> String {
    match raw {
        RawNumber::Text(s) if has_no_digits(s) => {
            debug!("Int payload {:?} has no digits, rendering raw", s);
            s.clone()
        }
        RawNumber::Text(s) => {
            let trimmed = s.trim();
            // Hex words are two's complement
            let parsed = match trimmed.strip_prefix("0x") {
                Some(digits) => U256::from_str_radix(digits, 16).map(I256::from_raw).ok(),
                None => I256::from_dec_str(trimmed).ok(),
            };
            match parsed {
                Some(n) => n.to_string(),
                None => match U256::from_str(trimmed) {
                    Ok(n) => n.to_string(),
                    Err(e) => {
                        debug!("Failed to parse Int {}: {}, rendering raw", s, e);
                        s.clone()
                    }
                },
            }
        }
        RawNumber::Number(n) => render_number(n),
    }
}

fn render_number(n: &Number) -> String {
    if let Some(v) = n.as_u64() {
        v.to_string()
    } else if let Some(v) = n.as_i64() {
        v.to_string()
    } else if let Some(v) = n.as_f64() {
        // f64 Display never switches to exponent notation
        format!("{}", v)
    } else {
        n.to_string()
    }
}

fn raw_json(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uint(s: &str) -> TypedValue {
        TypedValue::Uint(RawNumber::Text(s.to_string()))
    }

    #[test]
    fn uint_beyond_u64_keeps_all_digits() {
        assert_eq!(
            decode(&uint("115792089237316195423570985008687907853269984665640564039457584007913129639935")),
            "115792089237316195423570985008687907853269984665640564039457584007913129639935"
        );
        assert_eq!(decode(&uint("0xde0b6b3a7640000")), "1000000000000000000");
    }

    #[test]
    fn int_hex_is_twos_complement() {
        let minus_one = format!("0x{}", "f".repeat(64));
        assert_eq!(decode(&TypedValue::Int(RawNumber::Text(minus_one))), "-1");
        assert_eq!(decode(&TypedValue::Int(RawNumber::Text("-42".to_string()))), "-42");
    }

    #[test]
    fn malformed_number_falls_back_to_raw() {
        assert_eq!(decode(&uint("twelve")), "twelve");
        assert_eq!(
            decode(&TypedValue::Int(RawNumber::Text("1.5e3".to_string()))),
            "1.5e3"
        );
        assert_eq!(decode(&uint("")), "");
        assert_eq!(decode(&uint("0x")), "0x");
        assert_eq!(decode(&TypedValue::Int(RawNumber::Text(" ".to_string()))), " ");
        assert_eq!(decode(&TypedValue::Int(RawNumber::Text("0x".to_string()))), "0x");
        assert_eq!(decode(&uint("0x0")), "0");
    }

    #[test]
    fn float_numbers_render_without_exponent() {
        let n = Number::from_f64(1e21).unwrap();
        assert_eq!(decode(&TypedValue::Uint(RawNumber::Number(n))), "1000000000000000000000");
    }

    #[test]
    fn sequence_flattens_one_level() {
        let values = vec![
            TypedValue::Bool(true),
            TypedValue::Array(vec![
                uint("1"),
                TypedValue::Tuple(vec![uint("2"), uint("3")]),
            ]),
            TypedValue::String("end".to_string()),
        ];
        assert_eq!(decode_sequence(&values), vec!["true", "1", "[2, 3]", "end"]);
    }

    #[test]
    fn ascii_stops_at_first_zero_byte() {
        let value = TypedValue::FixedBytes(
            "0x48656c6c6f000000000000000000000000000000000000000000000000000000".to_string(),
        );
        assert_eq!(decode_ascii(&value).as_deref(), Some("Hello"));
        assert_eq!(decode_ascii(&uint("1")), None);
    }

    #[test]
    fn lossy_ascii_reads_textual_payloads() {
        let value = TypedValue::FixedBytes("0xMyEvent00".to_string());
        assert_eq!(decode_ascii(&value), None);
        assert_eq!(decode_ascii_lossy(&value), "MyEvent");
        assert_eq!(decode_ascii_lossy(&uint("7")), "7");
    }
}
