//! Account Ledger
//!
//! The authoritative per-account state: collateral balances per asset
//! and outstanding pegged-asset debt. Mutators are crate-private — only
//! the engine's guarded entry points may change balances — and every
//! debit is pre-checked so a balance can never wrap around zero.
//!
//! Accounts are created implicitly on first credit and pruned once both
//! collateral and debt reach zero, so a drained account is
//! indistinguishable from one that never existed.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use synthex_common::{
    errors::{SynthError, SynthResult},
    types::{Address, AssetId},
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
struct AccountState {
    /// Positive balances only; entries are removed when drained
    collateral: BTreeMap<AssetId, u64>,
    debt: u64,
}

impl AccountState {
    fn is_empty(&self) -> bool {
        self.collateral.is_empty() && self.debt == 0
    }
}

/// Per-account collateral and debt balances
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct AccountLedger {
    accounts: BTreeMap<Address, AccountState>,
}

impl AccountLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Collateral balance of `account` in `asset`
    pub fn collateral_of(&self, account: &Address, asset: &AssetId) -> u64 {
        self.accounts
            .get(account)
            .and_then(|state| state.collateral.get(asset).copied())
            .unwrap_or(0)
    }

    /// Outstanding debt of `account`
    pub fn debt_of(&self, account: &Address) -> u64 {
        self.accounts.get(account).map(|state| state.debt).unwrap_or(0)
    }

    /// True iff the ledger currently tracks `account`
    pub fn contains(&self, account: &Address) -> bool {
        self.accounts.contains_key(account)
    }

    /// Number of tracked accounts
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    pub(crate) fn add_collateral(
        &mut self,
        account: &Address,
        asset: &AssetId,
        amount: u64,
    ) -> SynthResult<()> {
        let updated = self
            .collateral_of(account, asset)
            .checked_add(amount)
            .ok_or(SynthError::Overflow)?;

        let state = self.accounts.entry(*account).or_default();
        state.collateral.insert(*asset, updated);
        Ok(())
    }

    pub(crate) fn remove_collateral(
        &mut self,
        account: &Address,
        asset: &AssetId,
        amount: u64,
    ) -> SynthResult<()> {
        let available = self.collateral_of(account, asset);
        if amount > available {
            return Err(SynthError::InsufficientCollateral {
                available,
                requested: amount,
            });
        }

        let mut drained = false;
        if let Some(state) = self.accounts.get_mut(account) {
            let remaining = available - amount;
            if remaining == 0 {
                state.collateral.remove(asset);
            } else {
                state.collateral.insert(*asset, remaining);
            }
            drained = state.is_empty();
        }
        if drained {
            self.accounts.remove(account);
        }
        Ok(())
    }

    pub(crate) fn add_debt(&mut self, account: &Address, amount: u64) -> SynthResult<()> {
        let updated = self
            .debt_of(account)
            .checked_add(amount)
            .ok_or(SynthError::Overflow)?;

        self.accounts.entry(*account).or_default().debt = updated;
        Ok(())
    }

    pub(crate) fn remove_debt(&mut self, account: &Address, amount: u64) -> SynthResult<()> {
        let available = self.debt_of(account);
        if amount > available {
            return Err(SynthError::InsufficientDebt {
                available,
                requested: amount,
            });
        }

        let mut drained = false;
        if let Some(state) = self.accounts.get_mut(account) {
            state.debt = available - amount;
            drained = state.is_empty();
        }
        if drained {
            self.accounts.remove(account);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use synthex_common::constants::token::ONE;
    use synthex_common::types::asset_id;

    const ALICE: Address = [1u8; 32];

    #[test]
    fn credit_and_debit_collateral() {
        let weth = asset_id("WETH");
        let mut ledger = AccountLedger::new();

        ledger.add_collateral(&ALICE, &weth, 10 * ONE).unwrap();
        assert_eq!(ledger.collateral_of(&ALICE, &weth), 10 * ONE);

        ledger.remove_collateral(&ALICE, &weth, 4 * ONE).unwrap();
        assert_eq!(ledger.collateral_of(&ALICE, &weth), 6 * ONE);
    }

    #[test]
    fn collateral_debit_is_prechecked() {
        let weth = asset_id("WETH");
        let mut ledger = AccountLedger::new();
        ledger.add_collateral(&ALICE, &weth, ONE).unwrap();

        let result = ledger.remove_collateral(&ALICE, &weth, 2 * ONE);
        assert_eq!(
            result,
            Err(SynthError::InsufficientCollateral {
                available: ONE,
                requested: 2 * ONE,
            })
        );
        // The failed debit must leave the balance untouched
        assert_eq!(ledger.collateral_of(&ALICE, &weth), ONE);
    }

    #[test]
    fn debt_debit_is_prechecked() {
        let mut ledger = AccountLedger::new();
        ledger.add_debt(&ALICE, 100 * ONE).unwrap();

        let result = ledger.remove_debt(&ALICE, 101 * ONE);
        assert_eq!(
            result,
            Err(SynthError::InsufficientDebt {
                available: 100 * ONE,
                requested: 101 * ONE,
            })
        );
        assert_eq!(ledger.debt_of(&ALICE), 100 * ONE);
    }

    #[test]
    fn collateral_credit_overflow() {
        let weth = asset_id("WETH");
        let mut ledger = AccountLedger::new();
        ledger.add_collateral(&ALICE, &weth, u64::MAX).unwrap();

        assert_eq!(
            ledger.add_collateral(&ALICE, &weth, 1),
            Err(SynthError::Overflow)
        );
        assert_eq!(ledger.collateral_of(&ALICE, &weth), u64::MAX);
    }

    #[test]
    fn drained_account_is_pruned() {
        let weth = asset_id("WETH");
        let mut ledger = AccountLedger::new();

        ledger.add_collateral(&ALICE, &weth, ONE).unwrap();
        ledger.add_debt(&ALICE, 5 * ONE).unwrap();
        assert!(ledger.contains(&ALICE));

        ledger.remove_debt(&ALICE, 5 * ONE).unwrap();
        assert!(ledger.contains(&ALICE));

        ledger.remove_collateral(&ALICE, &weth, ONE).unwrap();
        assert!(!ledger.contains(&ALICE));
        assert_eq!(ledger.account_count(), 0);
    }

    #[test]
    fn unknown_account_reads_zero() {
        let ledger = AccountLedger::new();
        assert_eq!(ledger.collateral_of(&ALICE, &asset_id("WETH")), 0);
        assert_eq!(ledger.debt_of(&ALICE), 0);
    }
}
