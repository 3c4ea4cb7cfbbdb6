//! Animal identifiers
//!
//! The records API hands out ids as JSON numbers on some endpoints and as
//! strings on others. Every id is normalized into an `AnimalId` before it is
//! compared, and anything that does not name an animal becomes `None`.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Canonical animal identifier.
///
/// An unknown parent is `Option::<AnimalId>::None`, never a sentinel id, so
/// two unknown parents can never compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum AnimalId {
    /// Numeric post id (never 0)
    Num(u64),
    /// Non-numeric key, trimmed
    Key(String),
}

impl AnimalId {
    /// Wrap a numeric id. The API uses 0 for "no post".
    pub fn from_u64(n: u64) -> Option<Self> {
        (n != 0).then_some(AnimalId::Num(n))
    }

    /// Wrap a floating-point id. Only whole, positive values name an animal.
    pub fn from_f64(f: f64) -> Option<Self> {
        if f.fract() == 0.0 && (1.0..=u64::MAX as f64).contains(&f) {
            Self::from_u64(f as u64)
        } else {
            None
        }
    }

    /// Normalize a textual id. Numeric text follows the same rules as a JSON
    /// number, so `"5"`, `"5.0"` and `5` name the same animal and `"-1"` is
    /// absent like `-1`.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        if trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return match trimmed.parse::<u64>() {
                Ok(n) => Self::from_u64(n),
                // Too long for u64; still a usable opaque key
                Err(_) => Some(AnimalId::Key(trimmed.to_string())),
            };
        }

        if is_numeric_text(trimmed) {
            return trimmed.parse::<f64>().ok().and_then(Self::from_f64);
        }

        Some(AnimalId::Key(trimmed.to_string()))
    }

    /// Normalize a raw JSON value from an API payload.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => match n.as_u64() {
                Some(n) => Self::from_u64(n),
                None => n.as_f64().and_then(Self::from_f64),
            },
            Value::String(s) => Self::parse(s),
            _ => None,
        }
    }
}

/// Signed and/or decimal number text: `-1`, `+7`, `5.0`, `-0.5`.
fn is_numeric_text(text: &str) -> bool {
    let unsigned = text.strip_prefix(['-', '+']).unwrap_or(text);
    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());

    match unsigned.split_once('.') {
        Some((whole, fraction)) => all_digits(whole) && all_digits(fraction),
        None => all_digits(unsigned),
    }
}

impl fmt::Display for AnimalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnimalId::Num(n) => write!(f, "{}", n),
            AnimalId::Key(k) => f.write_str(k),
        }
    }
}
