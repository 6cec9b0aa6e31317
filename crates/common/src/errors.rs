//! Error Types for the Synthex Engine
//!
//! Typed errors with diagnostic payloads. Every failure is synchronous
//! and operation-aborting: an operation that returns one of these has
//! rolled back all of its effects.

use crate::types::{Address, AssetId};

/// Result type alias for Synthex operations
pub type SynthResult<T> = Result<T, SynthError>;

/// Main error enum for all Synthex engine errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthError {
    // ============ Input Errors ============
    /// A zero amount was supplied where a positive amount is required
    InvalidAmount { amount: u64 },

    /// Registry configuration sequences of unequal length
    ConfigMismatch { assets: usize, price_sources: usize },

    /// Operation referenced a collateral asset with no registered price source
    AssetNotAllowed { asset: AssetId },

    // ============ Collaborator Errors ============
    /// An external asset/token transfer reported non-success
    TransferFailed { from: Address, to: Address, amount: u64 },

    /// The external mint primitive reported non-success
    MintFailed { to: Address, amount: u64 },

    /// The external price source returned a non-positive answer
    OraclePriceInvalid { asset: AssetId, answer: i64 },

    // ============ Solvency Errors ============
    /// A caller's own post-operation solvency check failed
    HealthFactorBroken { factor: u128 },

    /// Liquidation attempted against an already-solvent account
    HealthFactorOk { factor: u128 },

    /// Liquidation settled but did not strictly improve the target's factor
    HealthFactorNotImproved { starting: u128, ending: u128 },

    // ============ Ledger Errors ============
    /// Collateral debit would underflow the account's balance
    InsufficientCollateral { available: u64, requested: u64 },

    /// Debt debit would underflow the account's balance
    InsufficientDebt { available: u64, requested: u64 },

    // ============ Execution Errors ============
    /// A guarded entry point was re-entered from within an operation
    ReentrantCall,

    /// Arithmetic overflow occurred
    Overflow,

    /// Division by zero
    DivisionByZero,
}

impl SynthError {
    /// Returns a stable error code for logging/indexing
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidAmount { .. } => "E001_INVALID_AMOUNT",
            Self::ConfigMismatch { .. } => "E002_CONFIG_MISMATCH",
            Self::AssetNotAllowed { .. } => "E003_ASSET_NOT_ALLOWED",
            Self::TransferFailed { .. } => "E010_TRANSFER_FAILED",
            Self::MintFailed { .. } => "E011_MINT_FAILED",
            Self::OraclePriceInvalid { .. } => "E012_ORACLE_PRICE_INVALID",
            Self::HealthFactorBroken { .. } => "E020_HEALTH_FACTOR_BROKEN",
            Self::HealthFactorOk { .. } => "E021_HEALTH_FACTOR_OK",
            Self::HealthFactorNotImproved { .. } => "E022_HEALTH_NOT_IMPROVED",
            Self::InsufficientCollateral { .. } => "E030_INSUFFICIENT_COLLATERAL",
            Self::InsufficientDebt { .. } => "E031_INSUFFICIENT_DEBT",
            Self::ReentrantCall => "E040_REENTRANT_CALL",
            Self::Overflow => "E041_OVERFLOW",
            Self::DivisionByZero => "E042_DIV_ZERO",
        }
    }

    /// Returns true if the caller can fix the failure and resubmit
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::InvalidAmount { .. } => true,        // Supply a positive amount
            Self::InsufficientCollateral { .. } => true, // Deposit more first
            Self::InsufficientDebt { .. } => true,     // Repay less
            Self::HealthFactorBroken { .. } => true,   // Smaller mint/withdrawal
            Self::HealthFactorOk { .. } => true,       // Wait for price movement
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn error_codes_unique() {
        let errors = [
            SynthError::InvalidAmount { amount: 0 },
            SynthError::ConfigMismatch { assets: 2, price_sources: 1 },
            SynthError::AssetNotAllowed { asset: [0u8; 32] },
            SynthError::TransferFailed {
                from: [1u8; 32],
                to: [2u8; 32],
                amount: 1,
            },
            SynthError::MintFailed { to: [2u8; 32], amount: 1 },
            SynthError::OraclePriceInvalid { asset: [0u8; 32], answer: -1 },
            SynthError::HealthFactorBroken { factor: 0 },
            SynthError::HealthFactorOk { factor: 0 },
            SynthError::HealthFactorNotImproved { starting: 1, ending: 1 },
            SynthError::InsufficientCollateral { available: 0, requested: 1 },
            SynthError::InsufficientDebt { available: 0, requested: 1 },
            SynthError::ReentrantCall,
            SynthError::Overflow,
            SynthError::DivisionByZero,
        ];

        let codes: Vec<_> = errors.iter().map(|e| e.code()).collect();
        let unique: BTreeSet<_> = codes.iter().collect();
        assert_eq!(codes.len(), unique.len(), "Error codes must be unique");
    }

    #[test]
    fn recoverability_classification() {
        assert!(SynthError::InvalidAmount { amount: 0 }.is_recoverable());
        assert!(!SynthError::ReentrantCall.is_recoverable());
        assert!(!SynthError::Overflow.is_recoverable());
    }
}
