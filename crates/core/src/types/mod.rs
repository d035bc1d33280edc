//! Shared type definitions and newtypes

pub mod date;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, Mul, Sub};
use std::str::FromStr;

/// USD amount backed by a decimal, so fees and balances add up to the cent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Usd(pub Decimal);

impl Usd {
    pub const ZERO: Usd = Usd(Decimal::ZERO);
    /// Largest representable amount; arithmetic saturates here
    pub const MAX: Usd = Usd(Decimal::MAX);

    /// Build an amount from whole cents (e.g. `1500` is $15.00)
    pub const fn from_cents(cents: i64) -> Self {
        let abs = cents.unsigned_abs();
        Usd(Decimal::from_parts(
            abs as u32,
            (abs >> 32) as u32,
            0,
            cents < 0,
            2,
        ))
    }

    /// Lossy conversion for JSON bodies; the backend expects plain numbers
    pub fn as_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(0.0)
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Round half away from zero to whole cents
    pub fn rounded(&self) -> Self {
        Usd(self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
    }

    /// Even share of this amount over `units`, rounded to cents
    pub fn per_unit(&self, units: u32) -> Option<Usd> {
        if units == 0 {
            return None;
        }
        Some(Usd(self.0 / Decimal::from(units)).rounded())
    }

    /// Amount by which `self` exceeds `other`, if any
    pub fn excess_over(&self, other: Usd) -> Option<Usd> {
        let diff = self.0.saturating_sub(other.0);
        (diff > Decimal::ZERO).then_some(Usd(diff))
    }

    pub fn checked_add(self, rhs: Usd) -> Option<Usd> {
        self.0.checked_add(rhs.0).map(Usd)
    }

    pub fn checked_mul(self, rhs: u32) -> Option<Usd> {
        self.0.checked_mul(Decimal::from(rhs)).map(Usd)
    }
}

// Operators saturate instead of panicking; backend figures are untrusted.
// Use the checked_* methods where an out-of-range result must be reported.

impl Add for Usd {
    type Output = Usd;

    fn add(self, rhs: Usd) -> Usd {
        Usd(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Usd {
    type Output = Usd;

    fn sub(self, rhs: Usd) -> Usd {
        Usd(self.0.saturating_sub(rhs.0))
    }
}

impl Mul<u32> for Usd {
    type Output = Usd;

    fn mul(self, rhs: u32) -> Usd {
        Usd(self.0.saturating_mul(Decimal::from(rhs)))
    }
}

impl std::iter::Sum for Usd {
    fn sum<I: Iterator<Item = Usd>>(iter: I) -> Usd {
        iter.fold(Usd::ZERO, |acc, v| acc + v)
    }
}

impl fmt::Display for Usd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cents = self.rounded().0;
        if cents.is_sign_negative() && !cents.is_zero() {
            write!(f, "-${:.2}", cents.abs())
        } else {
            write!(f, "${:.2}", cents.abs())
        }
    }
}

impl FromStr for Usd {
    type Err = rust_decimal::Error;

    /// Accepts `12.50`, `$12.50` and scientific notation
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('$');
        Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map(Usd)
    }
}

impl Serialize for Usd {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for Usd {
    /// The backend sends amounts both as JSON numbers and as strings ("2230.00")
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        use serde::de;

        struct UsdLenient;

        impl<'de> de::Visitor<'de> for UsdLenient {
            type Value = Usd;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a currency amount as number or string")
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Usd, E> {
                // f64 Display is the shortest round-trip form, so 15.1 stays 15.1
                Usd::from_str(&v.to_string()).map_err(de::Error::custom)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Usd, E> {
                Ok(Usd(Decimal::from(v)))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Usd, E> {
                Ok(Usd(Decimal::from(v)))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Usd, E> {
                Usd::from_str(v).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_any(UsdLenient)
    }
}
