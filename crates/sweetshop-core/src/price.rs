//! Exact money amounts.
//!
//! Prices are held as integer cents so that filters, totals and storage never
//! go through binary floating point. On the wire a price is a JSON number
//! (`2.5`); decimal strings (`"3.00"`) are accepted as well, which is also
//! what query strings deliver.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A non-negative amount with two fractional digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(i64);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    #[error("price must not be negative")]
    Negative,

    #[error("price is not a decimal number: {0}")]
    NotANumber(String),

    #[error("price has more than two fractional digits: {0}")]
    TooPrecise(String),

    #[error("price is out of range")]
    OutOfRange,
}

impl Price {
    pub fn from_cents(cents: i64) -> Result<Self, PriceError> {
        if cents < 0 {
            return Err(PriceError::Negative);
        }
        Ok(Self(cents))
    }

    /// Whole cents only. Binary representation noise (`0.29 * 100`) is
    /// absorbed; a third fractional digit is rejected.
    pub fn from_f64(value: f64) -> Result<Self, PriceError> {
        if !value.is_finite() {
            return Err(PriceError::NotANumber(value.to_string()));
        }
        if value < 0.0 {
            return Err(PriceError::Negative);
        }
        let scaled = value * 100.0;
        let cents = scaled.round();
        if (scaled - cents).abs() > 1e-9 * scaled.max(1.0) {
            return Err(PriceError::TooPrecise(value.to_string()));
        }
        if cents > i64::MAX as f64 {
            return Err(PriceError::OutOfRange);
        }
        Ok(Self(cents as i64))
    }

    pub fn cents(self) -> i64 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Total for `quantity` units, `None` on overflow.
    pub fn times(self, quantity: u32) -> Option<Price> {
        self.0.checked_mul(i64::from(quantity)).map(Price)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if raw.starts_with('-') {
            return Err(PriceError::Negative);
        }
        let unsigned = raw.strip_prefix('+').unwrap_or(raw);
        let (whole, frac) = unsigned.split_once('.').unwrap_or((unsigned, ""));

        let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if (whole.is_empty() && frac.is_empty()) || !all_digits(whole) || !all_digits(frac) {
            return Err(PriceError::NotANumber(raw.to_string()));
        }

        let frac = frac.trim_end_matches('0');
        let frac_cents: i64 = match frac.len() {
            0 => 0,
            1 => i64::from(frac.as_bytes()[0] - b'0') * 10,
            2 => frac.parse().map_err(|_| PriceError::NotANumber(raw.to_string()))?,
            _ => return Err(PriceError::TooPrecise(raw.to_string())),
        };
        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| PriceError::OutOfRange)?
        };

        whole
            .checked_mul(100)
            .and_then(|w| w.checked_add(frac_cents))
            .map(Price)
            .ok_or(PriceError::OutOfRange)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(PriceVisitor)
    }
}

struct PriceVisitor;

impl Visitor<'_> for PriceVisitor {
    type Value = Price;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative decimal number or decimal string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Price, E> {
        i64::try_from(v)
            .ok()
            .and_then(|v| v.checked_mul(100))
            .map(Price)
            .ok_or_else(|| E::custom(PriceError::OutOfRange))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Price, E> {
        if v < 0 {
            return Err(E::custom(PriceError::Negative));
        }
        v.checked_mul(100)
            .map(Price)
            .ok_or_else(|| E::custom(PriceError::OutOfRange))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Price, E> {
        Price::from_f64(v).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Price, E> {
        v.parse().map_err(E::custom)
    }
}
