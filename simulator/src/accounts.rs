//! Named accounts for simulation runs.

use std::collections::BTreeMap;

use tokenbook_common::{Address, ADDRESS_LEN};

/// Maps human-readable labels to deterministic addresses.
///
/// A label's bytes are embedded directly in the address, so the same
/// label resolves to the same address on every run.
pub struct AccountBook {
    accounts: BTreeMap<String, Address>,
    owner: Address,
}

impl AccountBook {
    /// Label of the deploying account.
    pub const OWNER_LABEL: &'static str = "owner";

    /// Create a book with the deployer plus `count` numbered accounts
    /// labeled "addr1", "addr2", and so on.
    pub fn with_accounts(count: usize) -> anyhow::Result<Self> {
        let owner = Self::address_for(Self::OWNER_LABEL)?;

        let mut accounts = BTreeMap::new();
        accounts.insert(Self::OWNER_LABEL.to_string(), owner);
        for i in 1..=count {
            let label = format!("addr{}", i);
            let address = Self::address_for(&label)?;
            accounts.insert(label, address);
        }

        Ok(Self { accounts, owner })
    }

    /// Resolve a label to its address, registering it on first use.
    pub fn resolve(&mut self, label: &str) -> anyhow::Result<Address> {
        if let Some(address) = self.accounts.get(label) {
            return Ok(*address);
        }

        let address = Self::address_for(label)?;
        self.accounts.insert(label.to_string(), address);
        Ok(address)
    }

    /// The deployer address.
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// All registered (label, address) pairs in label order.
    pub fn accounts(&self) -> impl Iterator<Item = (&str, Address)> {
        self.accounts
            .iter()
            .map(|(label, address)| (label.as_str(), *address))
    }

    /// All registered addresses.
    pub fn addresses(&self) -> Vec<Address> {
        self.accounts.values().copied().collect()
    }

    /// Derive the deterministic address for a label.
    ///
    /// Label bytes are right-aligned in the address, so short labels read
    /// like small hex numbers. An empty label would collide with the null
    /// address and is rejected, as are labels longer than the address.
    fn address_for(label: &str) -> anyhow::Result<Address> {
        let raw = label.as_bytes();
        if raw.is_empty() {
            anyhow::bail!("Account label cannot be empty");
        }
        if raw.len() > ADDRESS_LEN {
            anyhow::bail!(
                "Account label too long: {} bytes (max {})",
                raw.len(),
                ADDRESS_LEN
            );
        }

        let mut bytes = [0u8; ADDRESS_LEN];
        bytes[ADDRESS_LEN - raw.len()..].copy_from_slice(raw);
        Ok(Address::new(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_addresses() {
        let mut book = AccountBook::with_accounts(2).unwrap();
        let a = book.resolve("addr1").unwrap();
        let b = book.resolve("addr1").unwrap();
        assert_eq!(a, b);

        let fresh = AccountBook::with_accounts(2).unwrap();
        assert_eq!(fresh.accounts.get("addr1"), Some(&a));
    }

    #[test]
    fn test_distinct_labels_distinct_addresses() {
        let book = AccountBook::with_accounts(3).unwrap();
        let addresses = book.addresses();
        for (i, left) in addresses.iter().enumerate() {
            for right in &addresses[i + 1..] {
                assert_ne!(left, right);
            }
        }
    }

    #[test]
    fn test_owner_registered() {
        let book = AccountBook::with_accounts(0).unwrap();
        assert!(!book.owner().is_zero());
        assert_eq!(book.accounts().count(), 1);
    }

    #[test]
    fn test_rejects_bad_labels() {
        let mut book = AccountBook::with_accounts(0).unwrap();
        assert!(book.resolve("").is_err());
        assert!(book.resolve("a-label-far-too-long-for-an-address").is_err());
    }

    #[test]
    fn test_registers_new_labels() {
        let mut book = AccountBook::with_accounts(0).unwrap();
        let address = book.resolve("alice").unwrap();
        assert!(!address.is_zero());
        assert_eq!(book.accounts().count(), 2);
    }
}
