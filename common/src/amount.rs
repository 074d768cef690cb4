//! Fixed-point token amounts.
//!
//! Amounts are unsigned integers counted in base units, with 18 implied
//! decimal places: one whole token is 10^18 base units. All ledger
//! arithmetic happens on the integer representation; decimal strings
//! appear only at the parsing and display boundary.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A token amount in base units.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Amount(u128);

impl Amount {
    /// Implied decimal places.
    pub const DECIMALS: u32 = 18;

    /// Zero tokens.
    pub const ZERO: Amount = Amount(0);

    /// One whole token in base units.
    pub const ONE: Amount = Amount(10u128.pow(Self::DECIMALS));

    /// Create an amount from raw base units.
    pub const fn from_base_units(base_units: u128) -> Self {
        Self(base_units)
    }

    /// Create an amount from a whole number of tokens.
    pub const fn from_whole(tokens: u64) -> Self {
        // u64::MAX * 10^18 fits in a u128 with room to spare
        Self(tokens as u128 * Self::ONE.0)
    }

    /// Get the raw base units.
    pub const fn base_units(&self) -> u128 {
        self.0
    }

    /// Check if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition. Returns `None` on overflow.
    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    /// Checked subtraction. Returns `None` on underflow.
    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / Self::ONE.0;
        let frac = self.0 % Self::ONE.0;
        if frac == 0 {
            write!(f, "{}", whole)
        } else {
            let digits = format!("{:018}", frac);
            write!(f, "{}.{}", whole, digits.trim_end_matches('0'))
        }
    }
}

impl FromStr for Amount {
    type Err = AmountParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str_exact(s.trim())
            .map_err(|_| AmountParseError::InvalidNumber(s.to_string()))?;
        if value.is_sign_negative() && !value.is_zero() {
            return Err(AmountParseError::Negative(s.to_string()));
        }

        let value = value.normalize();
        let scale = value.scale();
        if scale > Self::DECIMALS {
            return Err(AmountParseError::TooManyDecimals {
                max: Self::DECIMALS,
                actual: scale,
            });
        }

        let mantissa = value.mantissa().unsigned_abs();
        let base_units = mantissa
            .checked_mul(10u128.pow(Self::DECIMALS - scale))
            .ok_or_else(|| AmountParseError::OutOfRange(s.to_string()))?;

        Ok(Self(base_units))
    }
}

/// Error parsing an amount from its decimal representation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountParseError {
    /// Not a decimal number.
    #[error("Invalid amount: {0}")]
    InvalidNumber(String),

    /// Negative amounts cannot exist on the ledger.
    #[error("Amount cannot be negative: {0}")]
    Negative(String),

    /// More fractional digits than the fixed-point format carries.
    #[error("Too many decimal places: at most {max} allowed, got {actual}")]
    TooManyDecimals { max: u32, actual: u32 },

    /// Value does not fit the base-unit representation.
    #[error("Amount out of range: {0}")]
    OutOfRange(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_whole() {
        assert_eq!(Amount::from_whole(1), Amount::ONE);
        assert_eq!(
            Amount::from_whole(1_000_000).base_units(),
            1_000_000_000_000_000_000_000_000
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Amount::ZERO.to_string(), "0");
        assert_eq!(Amount::from_whole(100).to_string(), "100");
        assert_eq!(
            Amount::from_base_units(1_500_000_000_000_000_000).to_string(),
            "1.5"
        );
        assert_eq!(Amount::from_base_units(1).to_string(), "0.000000000000000001");
    }

    #[test]
    fn test_parse() {
        assert_eq!("100".parse::<Amount>().unwrap(), Amount::from_whole(100));
        assert_eq!(
            "1.5".parse::<Amount>().unwrap(),
            Amount::from_base_units(1_500_000_000_000_000_000)
        );
        assert_eq!(
            "0.000000000000000001".parse::<Amount>().unwrap(),
            Amount::from_base_units(1)
        );
        assert_eq!("0".parse::<Amount>().unwrap(), Amount::ZERO);
    }

    #[test]
    fn test_parse_rejects_negative() {
        assert!(matches!(
            "-1".parse::<Amount>(),
            Err(AmountParseError::Negative(_))
        ));
    }

    #[test]
    fn test_parse_rejects_excess_precision() {
        assert!(matches!(
            "0.0000000000000000001".parse::<Amount>(),
            Err(AmountParseError::TooManyDecimals { actual: 19, .. })
        ));
    }

    #[test]
    fn test_parse_rejects_junk() {
        assert!("".parse::<Amount>().is_err());
        assert!("abc".parse::<Amount>().is_err());
        assert!("1.2.3".parse::<Amount>().is_err());
    }

    #[test]
    fn test_display_parse_roundtrip() {
        for amount in [
            Amount::ZERO,
            Amount::ONE,
            Amount::from_whole(999_900),
            Amount::from_base_units(123_456_789_000_000_000_000),
        ] {
            assert_eq!(amount.to_string().parse::<Amount>().unwrap(), amount);
        }
    }

    #[test]
    fn test_checked_arithmetic() {
        let a = Amount::from_whole(100);
        let b = Amount::from_whole(30);

        assert_eq!(a.checked_add(b), Some(Amount::from_whole(130)));
        assert_eq!(a.checked_sub(b), Some(Amount::from_whole(70)));
        assert_eq!(b.checked_sub(a), None);
        assert_eq!(Amount::from_base_units(u128::MAX).checked_add(Amount::ONE), None);
    }

    #[test]
    fn test_serde_as_base_units() {
        let amount = Amount::from_whole(100);
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "100000000000000000000");
        assert_eq!(serde_json::from_str::<Amount>(&json).unwrap(), amount);
    }
}
