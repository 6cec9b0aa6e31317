//! Mock collaborators for tests and local development.
//!
//! In-memory token doubles honoring the boolean-success convention:
//! a `false` return leaves every balance untouched. Failure toggles
//! let tests drive the engine's rollback paths.

use std::collections::BTreeMap;

use synthex_common::types::{Address, AssetId};

use crate::interfaces::{CollateralToken, PeggedToken};

/// In-memory multi-asset collateral token
#[derive(Debug, Clone, Default)]
pub struct MockCollateralToken {
    balances: BTreeMap<(AssetId, Address), u64>,
    /// Account debited by `transfer` (the engine's custody)
    holder: Address,
    fail_transfers: bool,
}

impl MockCollateralToken {
    /// Create a token whose outbound transfers debit `holder`
    pub fn new(holder: Address) -> Self {
        Self {
            balances: BTreeMap::new(),
            holder,
            fail_transfers: false,
        }
    }

    /// Set an owner's balance in `asset`
    pub fn set_balance(&mut self, asset: AssetId, owner: Address, amount: u64) {
        self.balances.insert((asset, owner), amount);
    }

    /// Balance of `owner` in `asset`
    pub fn balance_of(&self, asset: &AssetId, owner: &Address) -> u64 {
        self.balances.get(&(*asset, *owner)).copied().unwrap_or(0)
    }

    /// Make every subsequent transfer report failure
    pub fn set_fail_transfers(&mut self, fail: bool) {
        self.fail_transfers = fail;
    }

    fn move_balance(&mut self, asset: AssetId, from: Address, to: Address, amount: u64) -> bool {
        let from_balance = self.balance_of(&asset, &from);
        if from_balance < amount {
            return false;
        }
        self.balances.insert((asset, from), from_balance - amount);
        let to_balance = self.balance_of(&asset, &to);
        self.balances.insert((asset, to), to_balance + amount);
        true
    }
}

impl CollateralToken for MockCollateralToken {
    fn transfer_from(&mut self, asset: AssetId, from: Address, to: Address, amount: u64) -> bool {
        if self.fail_transfers {
            return false;
        }
        self.move_balance(asset, from, to, amount)
    }

    fn transfer(&mut self, asset: AssetId, to: Address, amount: u64) -> bool {
        if self.fail_transfers {
            return false;
        }
        let holder = self.holder;
        self.move_balance(asset, holder, to, amount)
    }
}

/// In-memory pegged token with supply tracking
#[derive(Debug, Clone, Default)]
pub struct MockPeggedToken {
    balances: BTreeMap<Address, u64>,
    total_supply: u64,
    /// Account whose balance `burn` consumes (the engine's custody)
    holder: Address,
    fail_mint: bool,
    fail_transfers: bool,
}

impl MockPeggedToken {
    /// Create a token whose burns consume `holder`'s balance
    pub fn new(holder: Address) -> Self {
        Self {
            balances: BTreeMap::new(),
            total_supply: 0,
            holder,
            fail_mint: false,
            fail_transfers: false,
        }
    }

    /// Balance of `owner`
    pub fn balance_of(&self, owner: &Address) -> u64 {
        self.balances.get(owner).copied().unwrap_or(0)
    }

    /// Current total supply
    pub fn total_supply(&self) -> u64 {
        self.total_supply
    }

    /// Make every subsequent mint report failure
    pub fn set_fail_mint(&mut self, fail: bool) {
        self.fail_mint = fail;
    }

    /// Make every subsequent transfer report failure
    pub fn set_fail_transfers(&mut self, fail: bool) {
        self.fail_transfers = fail;
    }
}

impl PeggedToken for MockPeggedToken {
    fn mint(&mut self, to: Address, amount: u64) -> bool {
        if self.fail_mint {
            return false;
        }
        let Some(supply) = self.total_supply.checked_add(amount) else {
            return false;
        };
        let balance = self.balance_of(&to);
        let Some(updated) = balance.checked_add(amount) else {
            return false;
        };
        self.total_supply = supply;
        self.balances.insert(to, updated);
        true
    }

    fn burn(&mut self, amount: u64) {
        let balance = self.balance_of(&self.holder);
        let burned = balance.min(amount);
        self.balances.insert(self.holder, balance - burned);
        self.total_supply = self.total_supply.saturating_sub(burned);
    }

    fn transfer_from(&mut self, from: Address, to: Address, amount: u64) -> bool {
        if self.fail_transfers {
            return false;
        }
        let from_balance = self.balance_of(&from);
        if from_balance < amount {
            return false;
        }
        self.balances.insert(from, from_balance - amount);
        let to_balance = self.balance_of(&to);
        self.balances.insert(to, to_balance + amount);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use synthex_common::constants::token::ONE;
    use synthex_common::types::asset_id;

    const ENGINE: Address = [0xEE; 32];
    const ALICE: Address = [1u8; 32];
    const BOB: Address = [2u8; 32];

    #[test]
    fn collateral_transfer_moves_funds() {
        let weth = asset_id("WETH");
        let mut token = MockCollateralToken::new(ENGINE);
        token.set_balance(weth, ALICE, 10 * ONE);

        assert!(token.transfer_from(weth, ALICE, ENGINE, 4 * ONE));
        assert_eq!(token.balance_of(&weth, &ALICE), 6 * ONE);
        assert_eq!(token.balance_of(&weth, &ENGINE), 4 * ONE);

        assert!(token.transfer(weth, BOB, ONE));
        assert_eq!(token.balance_of(&weth, &ENGINE), 3 * ONE);
        assert_eq!(token.balance_of(&weth, &BOB), ONE);
    }

    #[test]
    fn failed_collateral_transfer_moves_nothing() {
        let weth = asset_id("WETH");
        let mut token = MockCollateralToken::new(ENGINE);
        token.set_balance(weth, ALICE, ONE);

        // Insufficient balance
        assert!(!token.transfer_from(weth, ALICE, ENGINE, 2 * ONE));
        assert_eq!(token.balance_of(&weth, &ALICE), ONE);

        // Forced failure
        token.set_fail_transfers(true);
        assert!(!token.transfer_from(weth, ALICE, ENGINE, ONE));
        assert_eq!(token.balance_of(&weth, &ALICE), ONE);
        assert_eq!(token.balance_of(&weth, &ENGINE), 0);
    }

    #[test]
    fn pegged_mint_burn_tracks_supply() {
        let mut token = MockPeggedToken::new(ENGINE);

        assert!(token.mint(ALICE, 100 * ONE));
        assert_eq!(token.total_supply(), 100 * ONE);

        assert!(token.transfer_from(ALICE, ENGINE, 40 * ONE));
        token.burn(40 * ONE);
        assert_eq!(token.total_supply(), 60 * ONE);
        assert_eq!(token.balance_of(&ALICE), 60 * ONE);
        assert_eq!(token.balance_of(&ENGINE), 0);
    }

    #[test]
    fn pegged_mint_failure_toggle() {
        let mut token = MockPeggedToken::new(ENGINE);
        token.set_fail_mint(true);

        assert!(!token.mint(ALICE, ONE));
        assert_eq!(token.total_supply(), 0);
        assert_eq!(token.balance_of(&ALICE), 0);
    }
}
