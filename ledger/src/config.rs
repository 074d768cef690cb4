//! Token deployment configuration.

use serde::{Deserialize, Serialize};
use tokenbook_common::Amount;

/// Immutable token parameters, fixed when the ledger is constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Human-readable token name.
    pub name: String,
    /// Ticker symbol.
    pub symbol: String,
    /// Display decimals. Balances are always kept in base units with
    /// 18 implied decimal places.
    pub decimals: u8,
    /// Supply credited to the deployer at construction.
    pub initial_supply: Amount,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            name: "TestToken".to_string(),
            symbol: "TTK".to_string(),
            decimals: 18,
            initial_supply: Amount::from_whole(1_000_000),
        }
    }
}

impl TokenConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(name) = std::env::var("TOKEN_NAME") {
            config.name = name;
        }

        if let Ok(symbol) = std::env::var("TOKEN_SYMBOL") {
            config.symbol = symbol;
        }

        if let Ok(supply) = std::env::var("TOKEN_INITIAL_SUPPLY") {
            if let Ok(supply) = supply.parse() {
                config.initial_supply = supply;
            }
        }

        config
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("Token name cannot be empty".to_string());
        }

        if self.symbol.is_empty() {
            return Err("Token symbol cannot be empty".to_string());
        }

        if u32::from(self.decimals) != Amount::DECIMALS {
            return Err(format!(
                "Unsupported decimals: {} (amounts are fixed at {} decimal places)",
                self.decimals,
                Amount::DECIMALS
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TokenConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.name, "TestToken");
        assert_eq!(config.symbol, "TTK");
        assert_eq!(config.initial_supply, Amount::from_whole(1_000_000));
    }

    #[test]
    fn test_invalid_config() {
        let mut config = TokenConfig::default();
        config.symbol = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unsupported_decimals() {
        let mut config = TokenConfig::default();
        config.decimals = 6;
        assert!(config.validate().is_err());
    }
}
