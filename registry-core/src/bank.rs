//! Ledger primitives: atomic value transfer and the sequence clock
//!
//! The registry treats value movement as an external collaborator with two
//! guarantees: transfers are all-or-nothing, and all operations observe a
//! single total order. `Bank` provides the first, `SequenceClock` the
//! second (a monotonic counter standing in for block height).

use crate::types::AccountId;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Receipt for one completed transfer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRecord {
    /// Unique transfer ID
    pub transfer_id: Uuid,

    /// Debited account
    pub from: AccountId,

    /// Credited account
    pub to: AccountId,

    /// Amount moved, in smallest currency units
    pub amount: u64,

    /// Sequence height at transfer time
    pub sequence: u64,

    /// Wall-clock time of the transfer
    pub timestamp: DateTime<Utc>,
}

/// In-memory account balances with an append-only transfer journal
#[derive(Debug, Default)]
pub struct Bank {
    balances: HashMap<AccountId, u64>,
    journal: Vec<TransferRecord>,
}

impl Bank {
    /// Create an empty bank
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit an account (external funding)
    pub fn deposit(&mut self, account: &AccountId, amount: u64) {
        *self.balances.entry(account.clone()).or_insert(0) += amount;
    }

    /// Current balance of an account (0 if unknown)
    pub fn balance(&self, account: &AccountId) -> u64 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Move `amount` from one account to another.
    ///
    /// All-or-nothing: fails with `InsufficientBalance` before any mutation.
    pub fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        amount: u64,
        sequence: u64,
    ) -> Result<Uuid> {
        let available = self.balance(from);
        if available < amount {
            return Err(Error::InsufficientBalance {
                account: from.to_string(),
                available,
                required: amount,
            });
        }

        *self.balances.entry(from.clone()).or_insert(0) -= amount;
        *self.balances.entry(to.clone()).or_insert(0) += amount;

        let record = TransferRecord {
            transfer_id: Uuid::new_v4(),
            from: from.clone(),
            to: to.clone(),
            amount,
            sequence,
            timestamp: Utc::now(),
        };
        let transfer_id = record.transfer_id;

        tracing::debug!(
            %transfer_id,
            from = %record.from,
            to = %record.to,
            amount,
            sequence,
            "transfer completed"
        );

        self.journal.push(record);
        Ok(transfer_id)
    }

    /// Completed transfers, oldest first
    pub fn journal(&self) -> &[TransferRecord] {
        &self.journal
    }
}

/// Monotonic sequence counter (the clock of the total order)
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct SequenceClock {
    height: u64,
}

impl SequenceClock {
    /// Clock starting at height 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Current height
    pub fn height(&self) -> u64 {
        self.height
    }

    /// Advance by one and return the new height
    pub fn advance(&mut self) -> u64 {
        self.height += 1;
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deposit_and_balance() {
        let mut bank = Bank::new();
        let alice = AccountId::new("alice");

        assert_eq!(bank.balance(&alice), 0);
        bank.deposit(&alice, 1_000);
        bank.deposit(&alice, 500);
        assert_eq!(bank.balance(&alice), 1_500);
    }

    #[test]
    fn test_transfer_moves_funds() {
        let mut bank = Bank::new();
        let alice = AccountId::new("alice");
        let bob = AccountId::new("bob");

        bank.deposit(&alice, 1_000);
        bank.transfer(&alice, &bob, 400, 1).unwrap();

        assert_eq!(bank.balance(&alice), 600);
        assert_eq!(bank.balance(&bob), 400);
        assert_eq!(bank.journal().len(), 1);
        assert_eq!(bank.journal()[0].amount, 400);
    }

    #[test]
    fn test_transfer_insufficient_balance_is_atomic() {
        let mut bank = Bank::new();
        let alice = AccountId::new("alice");
        let bob = AccountId::new("bob");

        bank.deposit(&alice, 100);
        let result = bank.transfer(&alice, &bob, 200, 1);
        assert!(matches!(result, Err(Error::InsufficientBalance { .. })));

        // No partial effects
        assert_eq!(bank.balance(&alice), 100);
        assert_eq!(bank.balance(&bob), 0);
        assert!(bank.journal().is_empty());
    }

    #[test]
    fn test_sequence_clock_monotonic() {
        let mut clock = SequenceClock::new();
        assert_eq!(clock.height(), 0);
        assert_eq!(clock.advance(), 1);
        assert_eq!(clock.advance(), 2);
        assert_eq!(clock.height(), 2);
    }
}
