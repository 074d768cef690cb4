//! Simulation scenarios.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// A simulation scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Steps in the scenario.
    pub steps: Vec<ScenarioStep>,
}

/// A step in a scenario.
///
/// Accounts are referred to by label; amounts are human-readable token
/// strings ("100", "0.5") parsed into base units when the step executes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScenarioStep {
    /// Wait for a duration.
    Wait { seconds: u64 },
    /// Transfer tokens between accounts.
    Transfer {
        from: String,
        to: String,
        amount: String,
    },
    /// Set an allowance.
    Approve {
        owner: String,
        spender: String,
        amount: String,
    },
    /// Delegated transfer using a previously set allowance.
    TransferFrom {
        spender: String,
        from: String,
        to: String,
        amount: String,
    },
    /// Assert an account balance.
    AssertBalance { account: String, expected: String },
    /// Assert a remaining allowance.
    AssertAllowance {
        owner: String,
        spender: String,
        expected: String,
    },
    /// Assert that all balances still sum to the total supply.
    AssertConservation,
}

impl Scenario {
    /// Load a built-in scenario by name.
    pub fn load(name: &str) -> anyhow::Result<Self> {
        match name {
            "simple-transfer" => Ok(Self::simple_transfer()),
            "delegated-transfer" => Ok(Self::delegated_transfer()),
            "insolvent-transfer" => Ok(Self::insolvent_transfer()),
            _ => Err(anyhow::anyhow!("Unknown scenario: {}", name)),
        }
    }

    /// Load a scenario from a JSON file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Owner pays addr1 100 tokens.
    fn simple_transfer() -> Self {
        Self {
            name: "simple-transfer".to_string(),
            description: "Owner transfers 100 tokens to addr1".to_string(),
            steps: vec![
                ScenarioStep::Transfer {
                    from: "owner".to_string(),
                    to: "addr1".to_string(),
                    amount: "100".to_string(),
                },
                ScenarioStep::Wait { seconds: 1 },
                ScenarioStep::AssertBalance {
                    account: "addr1".to_string(),
                    expected: "100".to_string(),
                },
                ScenarioStep::AssertBalance {
                    account: "owner".to_string(),
                    expected: "999900".to_string(),
                },
                ScenarioStep::AssertConservation,
            ],
        }
    }

    /// Owner approves addr1, who moves the tokens to addr2.
    fn delegated_transfer() -> Self {
        Self {
            name: "delegated-transfer".to_string(),
            description: "Owner approves addr1 for 300 tokens; addr1 moves them to addr2"
                .to_string(),
            steps: vec![
                ScenarioStep::Approve {
                    owner: "owner".to_string(),
                    spender: "addr1".to_string(),
                    amount: "300".to_string(),
                },
                ScenarioStep::AssertAllowance {
                    owner: "owner".to_string(),
                    spender: "addr1".to_string(),
                    expected: "300".to_string(),
                },
                ScenarioStep::TransferFrom {
                    spender: "addr1".to_string(),
                    from: "owner".to_string(),
                    to: "addr2".to_string(),
                    amount: "300".to_string(),
                },
                ScenarioStep::AssertBalance {
                    account: "addr2".to_string(),
                    expected: "300".to_string(),
                },
                ScenarioStep::AssertAllowance {
                    owner: "owner".to_string(),
                    spender: "addr1".to_string(),
                    expected: "0".to_string(),
                },
                ScenarioStep::AssertConservation,
            ],
        }
    }

    /// Rejected operations leave every balance and allowance untouched.
    fn insolvent_transfer() -> Self {
        Self {
            name: "insolvent-transfer".to_string(),
            description: "Rejected transfers leave all balances unchanged".to_string(),
            steps: vec![
                ScenarioStep::Transfer {
                    from: "owner".to_string(),
                    to: "addr1".to_string(),
                    amount: "100".to_string(),
                },
                // addr1 holds 100 and tries to send 101
                ScenarioStep::Transfer {
                    from: "addr1".to_string(),
                    to: "addr2".to_string(),
                    amount: "101".to_string(),
                },
                ScenarioStep::AssertBalance {
                    account: "addr1".to_string(),
                    expected: "100".to_string(),
                },
                ScenarioStep::AssertBalance {
                    account: "addr2".to_string(),
                    expected: "0".to_string(),
                },
                // An allowance above the balance is legal but cannot move
                // more than the balance holds
                ScenarioStep::Approve {
                    owner: "addr1".to_string(),
                    spender: "addr2".to_string(),
                    amount: "500".to_string(),
                },
                ScenarioStep::TransferFrom {
                    spender: "addr2".to_string(),
                    from: "addr1".to_string(),
                    to: "addr2".to_string(),
                    amount: "500".to_string(),
                },
                ScenarioStep::AssertBalance {
                    account: "addr1".to_string(),
                    expected: "100".to_string(),
                },
                ScenarioStep::AssertAllowance {
                    owner: "addr1".to_string(),
                    spender: "addr2".to_string(),
                    expected: "500".to_string(),
                },
                ScenarioStep::AssertConservation,
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_scenarios_load() {
        for name in ["simple-transfer", "delegated-transfer", "insolvent-transfer"] {
            assert!(Scenario::load(name).is_ok(), "missing builtin: {}", name);
        }
        assert!(Scenario::load("bogus").is_err());
    }

    #[test]
    fn test_scenario_json_roundtrip() {
        let scenario = Scenario::load("delegated-transfer").unwrap();
        let json = serde_json::to_string_pretty(&scenario).unwrap();
        let back: Scenario = serde_json::from_str(&json).unwrap();

        assert_eq!(back.name, scenario.name);
        assert_eq!(back.steps.len(), scenario.steps.len());
    }
}
