//! Protocol Constants
//!
//! All magic numbers for the Synthex engine. Amounts, prices, and USD
//! values share one 8-decimal fixed-point convention; the health factor
//! uses a wider 18-decimal scale so small solvency margins survive
//! integer division.

/// Pegged token metadata
pub mod token {
    /// Token name
    pub const NAME: &str = "Synthex USD";
    /// Token symbol
    pub const SYMBOL: &str = "sxUSD";
    /// Decimal places shared by amounts, prices, and USD values
    pub const DECIMALS: u8 = 8;
    /// One unit with decimals (1 sxUSD = 100_000_000 base units)
    pub const ONE: u64 = 100_000_000;
}

/// Liquidation parameters (percentage points over `LIQUIDATION_PRECISION`)
pub mod ratios {
    /// Haircut applied to collateral value before comparing against debt.
    /// 50 means collateral counts at 50%, i.e. positions must stay at
    /// least 200% overcollateralized to be safe.
    pub const LIQUIDATION_THRESHOLD: u64 = 50;

    /// Premium paid to a liquidator, funded from the seized collateral
    pub const LIQUIDATION_BONUS: u64 = 10;

    /// Denominator for the two ratios above
    pub const LIQUIDATION_PRECISION: u64 = 100;
}

/// Health-factor precision
pub mod precision {
    /// Fixed-point scale of the health factor (18 decimals)
    pub const HEALTH_PRECISION: u128 = 1_000_000_000_000_000_000;

    /// Minimum factor a solvent account must hold (1.0 at full precision).
    /// Below this the account is liquidatable.
    pub const MIN_HEALTH_FACTOR: u128 = HEALTH_PRECISION;
}

/// Oracle configuration
pub mod oracle {
    /// Decimal places of a price feed answer. Feeds answer at the ledger
    /// precision, so a validated answer converts without rescaling.
    pub const PRICE_DECIMALS: u8 = 8;
}
