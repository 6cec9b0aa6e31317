//! Position Operations and Liquidation
//!
//! The guarded state-transition entry points of the protocol. Every
//! mutating operation:
//!
//! 1. acquires the reentrancy guard,
//! 2. validates inputs before touching any state,
//! 3. applies its ledger effects,
//! 4. proves the relevant account still meets the minimum health
//!    factor — the check is pure, so it runs on the updated ledger
//!    before any value leaves custody,
//! 5. settles with the external collaborators last.
//!
//! A failure at any step unwinds the ledger credits/debits and the
//! provisionally emitted events, so callers observe all-or-nothing
//! transitions. Collaborators guarantee that a `false` return performed
//! no state change; the two places where a fallible external call can
//! follow an irreversible one (liquidation settlement and the composite
//! operations) unwind with an explicit compensating transfer or mint.

use synthex_common::{
    constants::precision,
    errors::{SynthError, SynthResult},
    events::{EventLog, SynthEvent},
    math,
    types::{AccountSnapshot, Address, AssetId, PriceQuote, SourceId},
};
use synthex_oracle::{self as oracle, PriceSource};

use crate::guard::ReentrancyGuard;
use crate::interfaces::{CollateralToken, PeggedToken};
use crate::ledger::AccountLedger;
use crate::registry::CollateralRegistry;

/// Settlement summary returned by a successful liquidation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiquidationReceipt {
    /// Pegged-asset debt repaid on the target's behalf
    pub debt_covered: u64,
    /// Collateral transferred to the liquidator, bonus included
    pub collateral_seized: u64,
    /// Bonus portion of the seizure
    pub bonus: u64,
    /// Target's health factor observed before the seizure
    pub starting_health_factor: u128,
    /// Target's health factor after the seizure
    pub ending_health_factor: u128,
}

/// The collateral engine.
///
/// Owns the registry, the ledger, and the event log; talks to the
/// price source `P`, the collateral token `C`, and the pegged token `T`
/// through their collaborator traits. All stores are explicit — there
/// is no global state.
pub struct SynthEngine<P, C, T> {
    registry: CollateralRegistry,
    ledger: AccountLedger,
    guard: ReentrancyGuard,
    events: EventLog,
    prices: P,
    collateral: C,
    token: T,
    /// The engine's own principal; custodian of pulled funds
    engine_account: Address,
}

impl<P, C, T> SynthEngine<P, C, T>
where
    P: PriceSource,
    C: CollateralToken,
    T: PeggedToken,
{
    /// Construct an engine over `assets` zipped pairwise with
    /// `price_sources` (fails with `ConfigMismatch` on unequal
    /// lengths).
    pub fn new(
        engine_account: Address,
        assets: Vec<AssetId>,
        price_sources: Vec<SourceId>,
        prices: P,
        collateral: C,
        token: T,
    ) -> SynthResult<Self> {
        Ok(Self {
            registry: CollateralRegistry::configure(assets, price_sources)?,
            ledger: AccountLedger::new(),
            guard: ReentrancyGuard::new(),
            events: EventLog::new(),
            prices,
            collateral,
            token,
            engine_account,
        })
    }

    // ========================================================================
    // Position Operations
    // ========================================================================

    /// Credit `amount` of `asset` to the caller and pull it into
    /// custody.
    pub fn deposit_collateral(
        &mut self,
        caller: Address,
        asset: AssetId,
        amount: u64,
    ) -> SynthResult<()> {
        let _guard = self.guard.enter()?;
        self.deposit_collateral_inner(caller, asset, amount)
    }

    /// Debit `amount` of `asset` from the caller and push it back to
    /// them. Fails with `HealthFactorBroken` if the withdrawal would
    /// leave the caller's remaining position unsafe.
    pub fn withdraw_collateral(
        &mut self,
        caller: Address,
        asset: AssetId,
        amount: u64,
    ) -> SynthResult<()> {
        let _guard = self.guard.enter()?;
        self.withdraw_collateral_inner(caller, asset, amount)
    }

    /// Record `amount` of new debt against the caller and mint the
    /// pegged units to them. Minting is the one operation that can
    /// break solvency through ledger state alone, so the factor check
    /// precedes the mint.
    pub fn mint_debt(&mut self, caller: Address, amount: u64) -> SynthResult<()> {
        let _guard = self.guard.enter()?;
        self.mint_debt_inner(caller, amount)
    }

    /// Pull `amount` pegged units from the caller, burn them, and
    /// clear that much of the caller's debt.
    pub fn burn_debt(&mut self, caller: Address, amount: u64) -> SynthResult<()> {
        let _guard = self.guard.enter()?;
        self.burn_debt_inner(caller, amount)
    }

    /// Deposit collateral and mint debt as one atomic transition.
    pub fn deposit_and_mint(
        &mut self,
        caller: Address,
        asset: AssetId,
        collateral_amount: u64,
        debt_amount: u64,
    ) -> SynthResult<()> {
        let _guard = self.guard.enter()?;

        let mark = self.events.mark();
        self.deposit_collateral_inner(caller, asset, collateral_amount)?;
        if let Err(err) = self.mint_debt_inner(caller, debt_amount) {
            // The first leg must not persist: undo the credit and
            // return the pulled funds to the caller.
            self.events.truncate(mark);
            self.ledger
                .remove_collateral(&caller, &asset, collateral_amount)?;
            if !self.collateral.transfer(asset, caller, collateral_amount) {
                return Err(SynthError::TransferFailed {
                    from: self.engine_account,
                    to: caller,
                    amount: collateral_amount,
                });
            }
            return Err(err);
        }
        Ok(())
    }

    /// Burn debt and withdraw collateral as one atomic transition.
    pub fn burn_and_withdraw(
        &mut self,
        caller: Address,
        asset: AssetId,
        debt_amount: u64,
        collateral_amount: u64,
    ) -> SynthResult<()> {
        let _guard = self.guard.enter()?;

        self.burn_debt_inner(caller, debt_amount)?;
        if let Err(err) = self.withdraw_collateral_inner(caller, asset, collateral_amount) {
            // Re-establish the burned debt so the first leg does not
            // persist on its own.
            self.restore_debt(caller, caller, debt_amount)?;
            return Err(err);
        }
        Ok(())
    }

    // ========================================================================
    // Liquidation
    // ========================================================================

    /// Repay `debt_to_cover` of an insolvent target's debt and seize
    /// the equivalent collateral plus a 10% bonus on the liquidator's
    /// behalf.
    ///
    /// The target must be below the minimum health factor
    /// (`HealthFactorOk` otherwise) and must end the operation with a
    /// strictly higher factor (`HealthFactorNotImproved` otherwise —
    /// reaching the minimum is not required). One price read decides
    /// both the seizure and the bonus.
    ///
    /// Protocol risk, accepted: once aggregate collateral value falls
    /// to or below aggregate debt, the bonus can no longer be funded
    /// from the target's own collateral and liquidation fails with
    /// `InsufficientCollateral` or `HealthFactorNotImproved`.
    pub fn liquidate(
        &mut self,
        liquidator: Address,
        collateral_asset: AssetId,
        target: Address,
        debt_to_cover: u64,
    ) -> SynthResult<LiquidationReceipt> {
        let _guard = self.guard.enter()?;
        require_positive(debt_to_cover)?;

        let starting = self.health_factor(&target)?;
        if starting >= precision::MIN_HEALTH_FACTOR {
            return Err(SynthError::HealthFactorOk { factor: starting });
        }

        let quote = self.quote(&collateral_asset)?;
        let seized = oracle::token_amount_for_usd(&quote, debt_to_cover)?;
        let bonus = math::liquidation_bonus(seized)?;
        let total_seize = math::safe_add(seized, bonus)?;

        // Ledger effects and the pure postconditions run before any
        // settlement, so failures below only have ledger state to
        // unwind.
        self.ledger
            .remove_collateral(&target, &collateral_asset, total_seize)?;
        if let Err(err) = self.ledger.remove_debt(&target, debt_to_cover) {
            self.ledger
                .add_collateral(&target, &collateral_asset, total_seize)?;
            return Err(err);
        }

        let ending = match self.liquidation_postconditions(&target, &liquidator, starting) {
            Ok(ending) => ending,
            Err(err) => {
                self.unwind_seizure(&target, &collateral_asset, total_seize, debt_to_cover)?;
                return Err(err);
            }
        };

        // Settlement: the liquidator funds the burn, then receives the
        // seized collateral.
        if !self
            .token
            .transfer_from(liquidator, self.engine_account, debt_to_cover)
        {
            self.unwind_seizure(&target, &collateral_asset, total_seize, debt_to_cover)?;
            return Err(SynthError::TransferFailed {
                from: liquidator,
                to: self.engine_account,
                amount: debt_to_cover,
            });
        }
        self.token.burn(debt_to_cover);

        if let Err(err) = self.push_collateral(target, liquidator, collateral_asset, total_seize) {
            // The burn already consumed the liquidator's payment;
            // restore it before unwinding the ledger.
            if !self.token.mint(liquidator, debt_to_cover) {
                return Err(SynthError::MintFailed {
                    to: liquidator,
                    amount: debt_to_cover,
                });
            }
            self.unwind_seizure(&target, &collateral_asset, total_seize, debt_to_cover)?;
            return Err(err);
        }

        Ok(LiquidationReceipt {
            debt_covered: debt_to_cover,
            collateral_seized: total_seize,
            bonus,
            starting_health_factor: starting,
            ending_health_factor: ending,
        })
    }

    // ========================================================================
    // Queries (read-only, unguarded)
    // ========================================================================

    /// Health factor of `account` at current prices. Zero-debt
    /// accounts report `u128::MAX`.
    pub fn health_factor(&self, account: &Address) -> SynthResult<u128> {
        let debt = self.ledger.debt_of(account);
        let value = self.total_collateral_value_usd(account)?;
        Ok(math::health_factor(value, debt))
    }

    /// USD value of the account's collateral across all approved
    /// assets, at current prices.
    pub fn total_collateral_value_usd(&self, account: &Address) -> SynthResult<u64> {
        let mut total = 0u64;
        for asset in self.registry.assets() {
            let amount = self.ledger.collateral_of(account, asset);
            if amount == 0 {
                continue;
            }
            let quote = self.quote(asset)?;
            total = math::safe_add(total, oracle::usd_value(&quote, amount)?)?;
        }
        Ok(total)
    }

    /// Collateral balances (registry order, positive only) and debt of
    /// `account`.
    pub fn account_snapshot(&self, account: &Address) -> AccountSnapshot {
        let mut collateral = Vec::new();
        for asset in self.registry.assets() {
            let amount = self.ledger.collateral_of(account, asset);
            if amount > 0 {
                collateral.push((*asset, amount));
            }
        }
        AccountSnapshot {
            collateral,
            debt: self.ledger.debt_of(account),
        }
    }

    /// Approved collateral assets in registration order
    pub fn collateral_assets(&self) -> &[AssetId] {
        self.registry.assets()
    }

    /// Collateral balance of `account` in `asset`
    pub fn collateral_balance(&self, account: &Address, asset: &AssetId) -> u64 {
        self.ledger.collateral_of(account, asset)
    }

    /// Outstanding debt of `account`
    pub fn debt_of(&self, account: &Address) -> u64 {
        self.ledger.debt_of(account)
    }

    /// USD value of `amount` units of `asset` at the current price
    pub fn usd_value(&self, asset: &AssetId, amount: u64) -> SynthResult<u64> {
        let quote = self.quote(asset)?;
        oracle::usd_value(&quote, amount)
    }

    /// Token amount of `asset` worth `usd_amount` at the current price
    pub fn token_amount_for_usd(&self, asset: &AssetId, usd_amount: u64) -> SynthResult<u64> {
        let quote = self.quote(asset)?;
        oracle::token_amount_for_usd(&quote, usd_amount)
    }

    /// Events emitted by persisted operations, oldest first
    pub fn events(&self) -> &[SynthEvent] {
        self.events.events()
    }

    /// The engine's own principal
    pub fn engine_account(&self) -> Address {
        self.engine_account
    }

    /// Collaborator access for inspection
    pub fn collateral_token(&self) -> &C {
        &self.collateral
    }

    /// Collaborator access for inspection
    pub fn pegged_token(&self) -> &T {
        &self.token
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn deposit_collateral_inner(
        &mut self,
        caller: Address,
        asset: AssetId,
        amount: u64,
    ) -> SynthResult<()> {
        require_positive(amount)?;
        if !self.registry.is_allowed(&asset) {
            return Err(SynthError::AssetNotAllowed { asset });
        }

        self.ledger.add_collateral(&caller, &asset, amount)?;
        let mark = self.events.mark();
        self.events.emit(SynthEvent::CollateralDeposited {
            account: caller,
            asset,
            amount,
        });

        if !self
            .collateral
            .transfer_from(asset, caller, self.engine_account, amount)
        {
            self.events.truncate(mark);
            self.ledger.remove_collateral(&caller, &asset, amount)?;
            return Err(SynthError::TransferFailed {
                from: caller,
                to: self.engine_account,
                amount,
            });
        }
        Ok(())
    }

    fn withdraw_collateral_inner(
        &mut self,
        caller: Address,
        asset: AssetId,
        amount: u64,
    ) -> SynthResult<()> {
        require_positive(amount)?;

        self.ledger.remove_collateral(&caller, &asset, amount)?;
        // Withdrawal can only worsen solvency; the factor is checked on
        // the debited ledger, before the asset leaves custody.
        if let Err(err) = self.require_healthy(&caller) {
            self.ledger.add_collateral(&caller, &asset, amount)?;
            return Err(err);
        }

        if let Err(err) = self.push_collateral(caller, caller, asset, amount) {
            self.ledger.add_collateral(&caller, &asset, amount)?;
            return Err(err);
        }
        Ok(())
    }

    fn mint_debt_inner(&mut self, caller: Address, amount: u64) -> SynthResult<()> {
        require_positive(amount)?;

        self.ledger.add_debt(&caller, amount)?;
        if let Err(err) = self.require_healthy(&caller) {
            self.ledger.remove_debt(&caller, amount)?;
            return Err(err);
        }

        if !self.token.mint(caller, amount) {
            self.ledger.remove_debt(&caller, amount)?;
            return Err(SynthError::MintFailed { to: caller, amount });
        }
        Ok(())
    }

    fn burn_debt_inner(&mut self, caller: Address, amount: u64) -> SynthResult<()> {
        require_positive(amount)?;
        self.pull_and_burn(caller, caller, amount)?;

        // Burning debt can only improve the factor; this check catches
        // calculation faults and is not expected to fire.
        if let Err(err) = self.require_healthy(&caller) {
            self.restore_debt(caller, caller, amount)?;
            return Err(err);
        }
        Ok(())
    }

    /// Pull `amount` pegged units from `payer`, burn them, and clear
    /// that much of `on_behalf_of`'s debt. The debt balance is checked
    /// up front so the pull never happens for a repayment the ledger
    /// would reject.
    fn pull_and_burn(
        &mut self,
        on_behalf_of: Address,
        payer: Address,
        amount: u64,
    ) -> SynthResult<()> {
        let available = self.ledger.debt_of(&on_behalf_of);
        if amount > available {
            return Err(SynthError::InsufficientDebt {
                available,
                requested: amount,
            });
        }

        if !self
            .token
            .transfer_from(payer, self.engine_account, amount)
        {
            return Err(SynthError::TransferFailed {
                from: payer,
                to: self.engine_account,
                amount,
            });
        }
        self.token.burn(amount);
        self.ledger.remove_debt(&on_behalf_of, amount)
    }

    /// Undo a [`Self::pull_and_burn`]: re-mint the burned units to the
    /// payer and re-establish the debt.
    fn restore_debt(
        &mut self,
        on_behalf_of: Address,
        payer: Address,
        amount: u64,
    ) -> SynthResult<()> {
        self.ledger.add_debt(&on_behalf_of, amount)?;
        if !self.token.mint(payer, amount) {
            return Err(SynthError::MintFailed { to: payer, amount });
        }
        Ok(())
    }

    /// Emit the redemption event and push collateral out of custody;
    /// truncates the event again when the push fails.
    fn push_collateral(
        &mut self,
        from: Address,
        to: Address,
        asset: AssetId,
        amount: u64,
    ) -> SynthResult<()> {
        let mark = self.events.mark();
        self.events.emit(SynthEvent::CollateralRedeemed {
            from,
            to,
            asset,
            amount,
        });

        if !self.collateral.transfer(asset, to, amount) {
            self.events.truncate(mark);
            return Err(SynthError::TransferFailed {
                from: self.engine_account,
                to,
                amount,
            });
        }
        Ok(())
    }

    fn liquidation_postconditions(
        &self,
        target: &Address,
        liquidator: &Address,
        starting: u128,
    ) -> SynthResult<u128> {
        let ending = self.health_factor(target)?;
        if ending <= starting {
            return Err(SynthError::HealthFactorNotImproved { starting, ending });
        }
        // Funding the burn must not leave the liquidator's own
        // position unsafe (relevant when the liquidator is also a
        // borrower).
        self.require_healthy(liquidator)?;
        Ok(ending)
    }

    fn unwind_seizure(
        &mut self,
        target: &Address,
        asset: &AssetId,
        collateral: u64,
        debt: u64,
    ) -> SynthResult<()> {
        self.ledger.add_collateral(target, asset, collateral)?;
        self.ledger.add_debt(target, debt)
    }

    fn require_healthy(&self, account: &Address) -> SynthResult<()> {
        let factor = self.health_factor(account)?;
        if factor < precision::MIN_HEALTH_FACTOR {
            return Err(SynthError::HealthFactorBroken { factor });
        }
        Ok(())
    }

    fn quote(&self, asset: &AssetId) -> SynthResult<PriceQuote> {
        let feed = self.registry.source_for(asset)?;
        oracle::quote(&self.prices, feed, *asset)
    }
}

fn require_positive(amount: u64) -> SynthResult<()> {
    if amount == 0 {
        return Err(SynthError::InvalidAmount { amount });
    }
    Ok(())
}
