//! Simulation controller.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use tokenbook_common::Amount;
use tokenbook_ledger::{TokenConfig, TokenLedger};

use crate::accounts::AccountBook;
use crate::metrics::SimulationMetrics;
use crate::scenario::{Scenario, ScenarioStep};

/// Seed balance handed to each generated account in continuous mode.
const SEED_TOKENS: u64 = 10_000;

/// Controls the simulation.
///
/// The controller owns the ledger outright; every operation applies
/// sequentially, as the ledger requires.
pub struct SimulationController {
    /// The ledger under simulation.
    ledger: TokenLedger,
    /// Named accounts used by scenarios and generated traffic.
    accounts: AccountBook,
    /// Simulation speed multiplier.
    speed: f64,
    /// Random number generator.
    rng: StdRng,
    /// Simulation metrics.
    metrics: SimulationMetrics,
}

impl SimulationController {
    /// Create a new controller with a freshly deployed token.
    pub fn new(
        config: TokenConfig,
        account_count: usize,
        speed: f64,
        seed: Option<u64>,
    ) -> anyhow::Result<Self> {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };

        let accounts = AccountBook::with_accounts(account_count)?;
        let ledger = TokenLedger::new(config, accounts.owner())?;

        Ok(Self {
            ledger,
            accounts,
            speed,
            rng,
            metrics: SimulationMetrics::new(),
        })
    }

    /// Seed every generated account with a starting balance from the
    /// owner so continuous traffic has funds to move.
    pub fn initialize(&mut self) -> anyhow::Result<()> {
        let owner = self.accounts.owner();
        let seed_balance = Amount::from_whole(SEED_TOKENS);

        let targets: Vec<_> = self
            .accounts
            .accounts()
            .filter(|(_, address)| *address != owner)
            .map(|(label, address)| (label.to_string(), address))
            .collect();

        for (label, address) in targets {
            self.ledger
                .transfer(owner, address, seed_balance)
                .map_err(|e| anyhow::anyhow!("Seeding {} failed: {}", label, e))?;
            info!("Initialized account {} with {} tokens", label, seed_balance);
        }

        Ok(())
    }

    /// Run a scenario to completion.
    pub async fn run_scenario(&mut self, scenario: Scenario) -> anyhow::Result<()> {
        info!(
            "Running scenario: {} - {}",
            scenario.name, scenario.description
        );

        for step in &scenario.steps {
            self.execute_step(step).await?;
        }

        self.verify()
    }

    /// Run in continuous mode, generating random transfers until the
    /// duration elapses or Ctrl+C arrives.
    pub async fn run(&mut self, duration: Option<Duration>) -> anyhow::Result<()> {
        info!("Running simulation in continuous mode");

        let start = Instant::now();

        loop {
            if let Some(limit) = duration {
                if start.elapsed() >= limit {
                    break;
                }
            }

            self.random_transfer();

            let delay = Duration::from_millis((1000.0 / self.speed) as u64);
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupted, stopping simulation");
                    break;
                }
            }
        }

        self.verify()
    }

    /// Generate and apply one random transfer between named accounts.
    fn random_transfer(&mut self) {
        let addresses = self.accounts.addresses();
        if addresses.len() < 2 {
            return;
        }

        let from = addresses[self.rng.gen_range(0..addresses.len())];
        let mut to = addresses[self.rng.gen_range(0..addresses.len())];
        while to == from {
            to = addresses[self.rng.gen_range(0..addresses.len())];
        }

        let amount = Amount::from_whole(self.rng.gen_range(1..SEED_TOKENS));

        info!(from = %from, to = %to, amount = %amount, "Generating transfer");
        match self.ledger.transfer(from, to, amount) {
            Ok(_) => self.metrics.record_applied(),
            Err(err) => {
                warn!(error = %err, code = err.error_code(), "Transfer rejected");
                self.metrics.record_rejected(err.error_code());
            }
        }
    }

    /// Execute a single scenario step.
    async fn execute_step(&mut self, step: &ScenarioStep) -> anyhow::Result<()> {
        match step {
            ScenarioStep::Wait { seconds } => {
                let adjusted = (*seconds as f64 / self.speed) as u64;
                info!("Waiting {} seconds (adjusted: {})", seconds, adjusted);
                tokio::time::sleep(Duration::from_secs(adjusted)).await;
            }
            ScenarioStep::Transfer { from, to, amount } => {
                let from = self.accounts.resolve(from)?;
                let to = self.accounts.resolve(to)?;
                let amount: Amount = amount.parse()?;

                match self.ledger.transfer(from, to, amount) {
                    Ok(_) => self.metrics.record_applied(),
                    Err(err) => {
                        warn!(error = %err, code = err.error_code(), "Transfer rejected");
                        self.metrics.record_rejected(err.error_code());
                    }
                }
            }
            ScenarioStep::Approve {
                owner,
                spender,
                amount,
            } => {
                let owner = self.accounts.resolve(owner)?;
                let spender = self.accounts.resolve(spender)?;
                let amount: Amount = amount.parse()?;

                match self.ledger.approve(owner, spender, amount) {
                    Ok(_) => self.metrics.record_applied(),
                    Err(err) => {
                        warn!(error = %err, code = err.error_code(), "Approval rejected");
                        self.metrics.record_rejected(err.error_code());
                    }
                }
            }
            ScenarioStep::TransferFrom {
                spender,
                from,
                to,
                amount,
            } => {
                let spender = self.accounts.resolve(spender)?;
                let from = self.accounts.resolve(from)?;
                let to = self.accounts.resolve(to)?;
                let amount: Amount = amount.parse()?;

                match self.ledger.transfer_from(spender, from, to, amount) {
                    Ok(_) => self.metrics.record_applied(),
                    Err(err) => {
                        warn!(error = %err, code = err.error_code(), "Delegated transfer rejected");
                        self.metrics.record_rejected(err.error_code());
                    }
                }
            }
            ScenarioStep::AssertBalance { account, expected } => {
                let address = self.accounts.resolve(account)?;
                let expected: Amount = expected.parse()?;
                let actual = self.ledger.balance_of(address);

                if actual != expected {
                    anyhow::bail!(
                        "Balance assertion failed for {}: expected {}, got {}",
                        account,
                        expected,
                        actual
                    );
                }
                info!("Balance of {} is {}", account, actual);
            }
            ScenarioStep::AssertAllowance {
                owner,
                spender,
                expected,
            } => {
                let owner_address = self.accounts.resolve(owner)?;
                let spender_address = self.accounts.resolve(spender)?;
                let expected: Amount = expected.parse()?;
                let actual = self.ledger.allowance(owner_address, spender_address);

                if actual != expected {
                    anyhow::bail!(
                        "Allowance assertion failed for {}/{}: expected {}, got {}",
                        owner,
                        spender,
                        expected,
                        actual
                    );
                }
                info!("Allowance {}/{} is {}", owner, spender, actual);
            }
            ScenarioStep::AssertConservation => {
                self.verify()?;
                info!("Conservation verified");
            }
        }

        Ok(())
    }

    /// Check that balances still sum to the total supply.
    fn verify(&self) -> anyhow::Result<()> {
        if !self.ledger.verify_conservation() {
            anyhow::bail!("Conservation violated: balances no longer sum to the total supply");
        }
        Ok(())
    }

    /// Simulation metrics.
    pub fn metrics(&self) -> &SimulationMetrics {
        &self.metrics
    }

    /// The ledger under simulation.
    pub fn ledger(&self) -> &TokenLedger {
        &self.ledger
    }

    /// Named accounts.
    pub fn accounts(&self) -> &AccountBook {
        &self.accounts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_controller() -> SimulationController {
        SimulationController::new(TokenConfig::default(), 3, 100.0, Some(42)).unwrap()
    }

    #[tokio::test]
    async fn test_simple_transfer_scenario() {
        let mut controller = create_test_controller();
        let scenario = Scenario::load("simple-transfer").unwrap();

        controller.run_scenario(scenario).await.unwrap();

        assert_eq!(controller.metrics().applied_operations, 1);
        assert_eq!(controller.metrics().rejected_operations, 0);
    }

    #[tokio::test]
    async fn test_delegated_transfer_scenario() {
        let mut controller = create_test_controller();
        let scenario = Scenario::load("delegated-transfer").unwrap();

        controller.run_scenario(scenario).await.unwrap();

        assert_eq!(controller.metrics().applied_operations, 2);
        assert_eq!(controller.metrics().rejected_operations, 0);
    }

    #[tokio::test]
    async fn test_insolvent_transfer_scenario() {
        let mut controller = create_test_controller();
        let scenario = Scenario::load("insolvent-transfer").unwrap();

        controller.run_scenario(scenario).await.unwrap();

        assert_eq!(controller.metrics().applied_operations, 2);
        assert_eq!(controller.metrics().rejected_operations, 2);

        let rejections: Vec<_> = controller.metrics().rejections_by_code().collect();
        assert_eq!(rejections, vec![("ERC20InsufficientBalance", 2)]);
    }

    #[tokio::test]
    async fn test_continuous_run_preserves_conservation() {
        let mut controller =
            SimulationController::new(TokenConfig::default(), 4, 1_000.0, Some(7)).unwrap();
        controller.initialize().unwrap();

        controller
            .run(Some(Duration::from_millis(50)))
            .await
            .unwrap();

        assert!(controller.metrics().total_operations > 0);
        assert!(controller.ledger().verify_conservation());
    }
}
