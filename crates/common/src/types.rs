//! Core Types for the Synthex Engine
//!
//! Fundamental identifiers and data structures shared by the oracle
//! adapter and the engine.

use crate::Vec;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Type alias for actor identities (opaque 32-byte principal)
pub type Address = [u8; 32];

/// Type alias for collateral asset identifiers
pub type AssetId = [u8; 32];

/// Type alias for price source (feed) identifiers
pub type SourceId = [u8; 32];

/// Derive a deterministic asset identifier from a human-readable label,
/// e.g. `asset_id("WETH")`.
pub fn asset_id(label: &str) -> AssetId {
    hash_label(b"asset", label)
}

/// Derive a deterministic price-feed identifier from a label,
/// e.g. `source_id("chainlink:ETH/USD")`.
pub fn source_id(label: &str) -> SourceId {
    hash_label(b"feed", label)
}

fn hash_label(domain: &[u8], label: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(domain);
    hasher.update(label.as_bytes());
    let digest = hasher.finalize();
    let mut id = [0u8; 32];
    id.copy_from_slice(&digest);
    id
}

// ============ Oracle Types ============

/// A validated price for one collateral asset.
///
/// The price is positive and scaled to the ledger's fixed precision
/// (`token::DECIMALS`). Quotes are authoritative at read time and are
/// never cached by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct PriceQuote {
    /// Asset the price refers to
    pub asset: AssetId,
    /// USD price of one whole unit, 8 decimals
    pub price: u64,
}

// ============ Account Types ============

/// Read-only view of one account's ledger state.
///
/// Collateral entries appear in registry order and include only assets
/// with a positive balance, so a never-used account and a fully drained
/// one produce the same (empty) snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct AccountSnapshot {
    /// Per-asset collateral balances, 8 decimals
    pub collateral: Vec<(AssetId, u64)>,
    /// Outstanding pegged-asset debt, 8 decimals
    pub debt: u64,
}

impl AccountSnapshot {
    /// Returns true if the account holds no collateral and no debt
    pub fn is_empty(&self) -> bool {
        self.collateral.is_empty() && self.debt == 0
    }
}
