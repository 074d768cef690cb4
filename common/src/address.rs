//! Account address type for the token ledger.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of bytes in an account address.
pub const ADDRESS_LEN: usize = 20;

/// A fixed-width account identifier.
///
/// The all-zero address is the null identifier: it never holds a balance
/// and is rejected wherever an operation needs a real account. It appears
/// only as the source of the genesis transfer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// The null address (all zero bytes).
    pub const ZERO: Address = Address([0u8; ADDRESS_LEN]);

    /// Create a new address from raw bytes.
    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes.
    pub const fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Check if this is the null address.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_LEN]
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl From<[u8; ADDRESS_LEN]> for Address {
    fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.len() != ADDRESS_LEN * 2 {
            return Err(AddressParseError::InvalidLength {
                expected: ADDRESS_LEN * 2,
                actual: digits.len(),
            });
        }
        let decoded = hex::decode(digits)?;
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes.copy_from_slice(&decoded);
        Ok(Self(bytes))
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Error parsing an address from its hex representation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AddressParseError {
    /// Wrong number of hex digits.
    #[error("Invalid address length: expected {expected} hex digits, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Non-hex characters in the input.
    #[error("Invalid hex in address: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_address() {
        assert!(Address::ZERO.is_zero());

        let mut bytes = [0u8; ADDRESS_LEN];
        bytes[ADDRESS_LEN - 1] = 1;
        assert!(!Address::new(bytes).is_zero());
    }

    #[test]
    fn test_display_parse_roundtrip() {
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes[0] = 0xab;
        bytes[ADDRESS_LEN - 1] = 0x01;
        let address = Address::new(bytes);

        let rendered = address.to_string();
        assert!(rendered.starts_with("0x"));
        assert_eq!(rendered.len(), 2 + ADDRESS_LEN * 2);
        assert_eq!(rendered.parse::<Address>().unwrap(), address);
    }

    #[test]
    fn test_parse_without_prefix() {
        let address: Address = "ab00000000000000000000000000000000000001"
            .parse()
            .unwrap();
        assert_eq!(address.as_bytes()[0], 0xab);
        assert_eq!(address.as_bytes()[ADDRESS_LEN - 1], 0x01);
    }

    #[test]
    fn test_parse_rejects_bad_length() {
        let err = "0xabcd".parse::<Address>().unwrap_err();
        assert!(matches!(err, AddressParseError::InvalidLength { actual: 4, .. }));
    }

    #[test]
    fn test_parse_rejects_bad_hex() {
        let err = "0xzz00000000000000000000000000000000000001"
            .parse::<Address>()
            .unwrap_err();
        assert!(matches!(err, AddressParseError::InvalidHex(_)));

        // The same input yields an equal error
        let again = "0xzz00000000000000000000000000000000000001"
            .parse::<Address>()
            .unwrap_err();
        assert_eq!(err, again);
    }

    #[test]
    fn test_serde_as_hex_string() {
        let address: Address = "0xab00000000000000000000000000000000000001"
            .parse()
            .unwrap();

        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, "\"0xab00000000000000000000000000000000000001\"");

        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, address);
    }
}
