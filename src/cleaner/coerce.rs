//! Lossy conversions from loosely-typed page values to canonical ones.
//!
//! None of these fail: garbage in yields `None` (or, for whitespace, an
//! empty string).

use crate::record::Scalar;

/// Integers pass through; anything else keeps only its ASCII digits.
///
/// `"$1,234 USD"` becomes `1234`. A digit run too long for `i64` is `None`.
pub fn to_integer(value: &Scalar) -> Option<i64> {
    match value {
        Scalar::Int(n) => Some(*n),
        other => other
            .to_string()
            .chars()
            .filter(char::is_ascii_digit)
            .collect::<String>()
            .parse()
            .ok(),
    }
}

/// Numbers pass through; text has `,` read as `.` and keeps its digits plus
/// the first dot only.
///
/// This makes `"1.234,56"` come out as `1.23456`, which is wrong for
/// comma-decimal locales but is the defined behavior.
pub fn to_float(value: &Scalar) -> Option<f64> {
    match value {
        Scalar::Int(n) => Some(*n as f64),
        Scalar::Float(x) => Some(*x),
        Scalar::Text(s) => {
            let text = s.trim().replace(',', ".");
            let mut kept = String::with_capacity(text.len());
            let mut dot_seen = false;
            for ch in text.chars() {
                if ch.is_ascii_digit() {
                    kept.push(ch);
                } else if ch == '.' && !dot_seen {
                    kept.push(ch);
                    dot_seen = true;
                }
            }
            if kept.is_empty() {
                return None;
            }
            kept.parse().ok()
        }
    }
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
