//! Core token ledger implementation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use tokenbook_common::{Address, Amount, Result, TokenError};

use crate::config::TokenConfig;
use crate::events::{EventId, EventJournal, TokenEvent};

/// Receipt for an applied transfer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferReceipt {
    /// Journal event recorded for this transfer.
    pub event_id: EventId,
    /// Sender balance after the transfer.
    pub from_balance_after: Amount,
    /// Receiver balance after the transfer.
    pub to_balance_after: Amount,
}

/// The token ledger tracks balances and allowances for a single token.
///
/// All operations are synchronous read-modify-write steps on exclusively
/// owned state. Every precondition is checked before any mutation, so a
/// returned error guarantees balances, allowances, and the journal are
/// untouched.
#[derive(Debug)]
pub struct TokenLedger {
    /// Token parameters fixed at construction.
    config: TokenConfig,
    /// Total supply in base units. Never changes after construction.
    total_supply: Amount,
    /// Balances in base units. Absent accounts hold zero.
    balances: HashMap<Address, Amount>,
    /// Allowances keyed by (owner, spender). Absent pairs are zero.
    allowances: HashMap<(Address, Address), Amount>,
    /// Append-only event journal.
    journal: EventJournal,
}

impl TokenLedger {
    /// Create a new ledger, crediting the full initial supply to `owner`.
    ///
    /// The credit is recorded as a transfer from the null address at
    /// sequence 0.
    pub fn new(config: TokenConfig, owner: Address) -> Result<Self> {
        config.validate().map_err(TokenError::InvalidConfig)?;

        if owner.is_zero() {
            return Err(TokenError::InvalidReceiver { receiver: owner });
        }

        let total_supply = config.initial_supply;
        let mut ledger = Self {
            config,
            total_supply,
            balances: HashMap::new(),
            allowances: HashMap::new(),
            journal: EventJournal::new(),
        };

        ledger.balances.insert(owner, total_supply);
        ledger.journal.append(TokenEvent::Transfer {
            from: Address::ZERO,
            to: owner,
            amount: total_supply,
        });

        info!(
            name = %ledger.config.name,
            symbol = %ledger.config.symbol,
            owner = %owner,
            supply = %total_supply,
            "Token ledger created"
        );

        Ok(ledger)
    }

    /// Move `amount` from `from` to `to`.
    ///
    /// Self-transfers and zero-amount transfers are valid and still record
    /// a transfer event.
    #[instrument(skip(self))]
    pub fn transfer(&mut self, from: Address, to: Address, amount: Amount) -> Result<TransferReceipt> {
        self.execute_transfer(from, to, amount)
    }

    /// Set the allowance of `spender` over `owner`'s tokens to `amount`.
    ///
    /// This is an absolute set, not an increment, and is not constrained
    /// by the owner's balance. There is no reserved unlimited value; every
    /// allowance decrements on use.
    #[instrument(skip(self))]
    pub fn approve(&mut self, owner: Address, spender: Address, amount: Amount) -> Result<EventId> {
        if owner.is_zero() {
            return Err(TokenError::InvalidApprover { approver: owner });
        }
        if spender.is_zero() {
            return Err(TokenError::InvalidSpender { spender });
        }

        self.allowances.insert((owner, spender), amount);
        let event_id = self.journal.append(TokenEvent::Approval {
            owner,
            spender,
            amount,
        });

        info!(
            owner = %owner,
            spender = %spender,
            amount = %amount,
            "Approval set"
        );

        Ok(event_id)
    }

    /// Move `amount` from `from` to `to` on behalf of `spender`.
    ///
    /// The spender's allowance is checked before any balance inspection
    /// and decremented as part of the same atomic step. Spending an
    /// allowance does not record an approval event.
    #[instrument(skip(self))]
    pub fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<TransferReceipt> {
        let allowance = self.allowance(from, spender);
        let remaining = allowance
            .checked_sub(amount)
            .ok_or(TokenError::InsufficientAllowance {
                spender,
                allowance,
                needed: amount,
            })?;

        let receipt = self.execute_transfer(from, to, amount)?;
        self.allowances.insert((from, spender), remaining);

        info!(
            spender = %spender,
            owner = %from,
            remaining = %remaining,
            "Allowance spent"
        );

        Ok(receipt)
    }

    /// Balance of `account`. Unknown accounts hold zero.
    pub fn balance_of(&self, account: Address) -> Amount {
        self.balances.get(&account).copied().unwrap_or(Amount::ZERO)
    }

    /// Remaining allowance of `spender` over `owner`'s tokens.
    pub fn allowance(&self, owner: Address, spender: Address) -> Amount {
        self.allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    /// Total supply in base units.
    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Token name.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Ticker symbol.
    pub fn symbol(&self) -> &str {
        &self.config.symbol
    }

    /// Display decimals.
    pub fn decimals(&self) -> u8 {
        self.config.decimals
    }

    /// Iterate over all accounts with recorded balances.
    pub fn balances(&self) -> impl Iterator<Item = (Address, Amount)> + '_ {
        self.balances.iter().map(|(address, amount)| (*address, *amount))
    }

    /// The event journal.
    pub fn journal(&self) -> &EventJournal {
        &self.journal
    }

    /// Verify that the sum of all balances equals the total supply.
    pub fn verify_conservation(&self) -> bool {
        let mut sum = Amount::ZERO;
        for amount in self.balances.values() {
            sum = match sum.checked_add(*amount) {
                Some(sum) => sum,
                None => return false,
            };
        }
        sum == self.total_supply
    }

    /// Validate and apply a balance movement.
    ///
    /// Both post-balances are computed before either is written, so any
    /// error leaves the tables untouched.
    fn execute_transfer(&mut self, from: Address, to: Address, amount: Amount) -> Result<TransferReceipt> {
        if from.is_zero() {
            return Err(TokenError::InvalidSender { sender: from });
        }
        if to.is_zero() {
            return Err(TokenError::InvalidReceiver { receiver: to });
        }

        let from_balance = self.balance_of(from);
        let debited = from_balance
            .checked_sub(amount)
            .ok_or(TokenError::InsufficientBalance {
                sender: from,
                balance: from_balance,
                needed: amount,
            })?;

        // A self-transfer credits the already debited balance.
        let to_balance = if to == from { debited } else { self.balance_of(to) };
        let credited = to_balance
            .checked_add(amount)
            .ok_or(TokenError::BalanceOverflow { account: to })?;

        self.balances.insert(from, debited);
        self.balances.insert(to, credited);
        let event_id = self.journal.append(TokenEvent::Transfer { from, to, amount });

        info!(
            from = %from,
            to = %to,
            amount = %amount,
            "Transfer applied"
        );

        Ok(TransferReceipt {
            event_id,
            from_balance_after: self.balance_of(from),
            to_balance_after: self.balance_of(to),
        })
    }
}
