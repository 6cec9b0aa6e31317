//! External Collaborator Interfaces
//!
//! The engine consumes its collaborators — the collateral asset's
//! transfer mechanics and the pegged token's supply primitives —
//! through these traits. Both follow the boolean-success convention:
//! calls never raise, complete synchronously, and a `false` return
//! means the collaborator performed **no state change**. Callers must
//! examine the result before concluding success.

use std::cell::RefCell;
use std::rc::Rc;

use synthex_common::types::{Address, AssetId};

/// Transfer mechanics of the approved collateral assets.
///
/// The engine is the counterparty of every call: `transfer_from` pulls
/// funds into the engine's custody, `transfer` pushes funds out of it.
pub trait CollateralToken {
    /// Move `amount` of `asset` from `from` to `to`, by prior approval
    fn transfer_from(&mut self, asset: AssetId, from: Address, to: Address, amount: u64) -> bool;

    /// Move `amount` of `asset` out of the engine's custody to `to`
    fn transfer(&mut self, asset: AssetId, to: Address, amount: u64) -> bool;
}

/// Supply primitives of the pegged synthetic asset.
pub trait PeggedToken {
    /// Create `amount` new units owned by `to`
    fn mint(&mut self, to: Address, amount: u64) -> bool;

    /// Destroy `amount` units held by the engine. Infallible: the
    /// engine only burns what it has just pulled into custody.
    fn burn(&mut self, amount: u64);

    /// Move `amount` units from `from` to `to`, by prior approval
    fn transfer_from(&mut self, from: Address, to: Address, amount: u64) -> bool;
}

/// Shared handle: lets a collaborator stay reachable outside the
/// engine that owns it.
impl<S: CollateralToken> CollateralToken for Rc<RefCell<S>> {
    fn transfer_from(&mut self, asset: AssetId, from: Address, to: Address, amount: u64) -> bool {
        self.borrow_mut().transfer_from(asset, from, to, amount)
    }

    fn transfer(&mut self, asset: AssetId, to: Address, amount: u64) -> bool {
        self.borrow_mut().transfer(asset, to, amount)
    }
}

/// Shared handle: lets a collaborator stay reachable outside the
/// engine that owns it.
impl<S: PeggedToken> PeggedToken for Rc<RefCell<S>> {
    fn mint(&mut self, to: Address, amount: u64) -> bool {
        self.borrow_mut().mint(to, amount)
    }

    fn burn(&mut self, amount: u64) {
        self.borrow_mut().burn(amount)
    }

    fn transfer_from(&mut self, from: Address, to: Address, amount: u64) -> bool {
        self.borrow_mut().transfer_from(from, to, amount)
    }
}
