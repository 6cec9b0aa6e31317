//! Synthex Engine
//!
//! The solvency-enforcement core of the Synthex protocol: accounts
//! deposit approved collateral, mint sxUSD against it, and are subject
//! to third-party liquidation once their health factor falls below 1.0.
//!
//! ## Core Pieces
//!
//! - **CollateralRegistry**: approved assets and their price feeds
//! - **AccountLedger**: authoritative per-account balances and debt
//! - **SynthEngine**: the guarded state-transition entry points
//!   (deposit, withdraw, mint, burn, composites, liquidate)
//!
//! External collaborators — the pegged token, the collateral token, and
//! the price source — are consumed through traits with synchronous,
//! boolean-success contracts; see [`interfaces`] and `synthex-oracle`.
//!
//! Every mutating operation either completes fully or rolls back every
//! ledger and event effect before returning its error.

pub mod engine;
pub mod guard;
pub mod interfaces;
pub mod ledger;
pub mod mock;
pub mod registry;


// Re-exports for convenience
pub use engine::{LiquidationReceipt, SynthEngine};
pub use guard::{GuardScope, ReentrancyGuard};
pub use interfaces::{CollateralToken, PeggedToken};
pub use ledger::AccountLedger;
pub use registry::CollateralRegistry;
