//! Fixed-Point Math for the Synthex Engine
//!
//! Checked conversions between token amounts and USD values, and the
//! health-factor calculation. All intermediates widen to `u128`;
//! multiplication happens before division so truncation is paid once.

use crate::constants::{precision, ratios, token};
use crate::errors::{SynthError, SynthResult};

/// USD value of `amount` units of an asset priced at `price`.
///
/// `value = price * amount / ONE`, truncating.
pub fn usd_value(price: u64, amount: u64) -> SynthResult<u64> {
    let value = (price as u128)
        .checked_mul(amount as u128)
        .ok_or(SynthError::Overflow)?
        / token::ONE as u128;

    u64::try_from(value).map_err(|_| SynthError::Overflow)
}

/// Token amount worth `usd_amount` at `price`.
///
/// `amount = usd_amount * ONE / price`, truncating toward zero. The
/// floor systematically under-delivers by at most one base unit, never
/// over-delivers.
pub fn token_amount_for_usd(price: u64, usd_amount: u64) -> SynthResult<u64> {
    if price == 0 {
        return Err(SynthError::DivisionByZero);
    }

    let amount = (usd_amount as u128)
        .checked_mul(token::ONE as u128)
        .ok_or(SynthError::Overflow)?
        / price as u128;

    u64::try_from(amount).map_err(|_| SynthError::Overflow)
}

/// Health factor of an account: haircut collateral value over debt,
/// scaled to `HEALTH_PRECISION`.
///
/// ```text
/// adjusted = collateral_value_usd * LIQUIDATION_THRESHOLD / LIQUIDATION_PRECISION
/// factor   = adjusted * HEALTH_PRECISION / debt
/// ```
///
/// A zero-debt account reports `u128::MAX` (unbounded solvency). Pure;
/// safe to call speculatively.
pub fn health_factor(collateral_value_usd: u64, debt: u64) -> u128 {
    if debt == 0 {
        return u128::MAX;
    }

    let adjusted = (collateral_value_usd as u128) * ratios::LIQUIDATION_THRESHOLD as u128
        / ratios::LIQUIDATION_PRECISION as u128;

    // adjusted < 2^64 and HEALTH_PRECISION < 2^60, so the product fits u128
    adjusted * precision::HEALTH_PRECISION / debt as u128
}

/// Returns true if `factor` is below the liquidation minimum
pub fn is_liquidatable(factor: u128) -> bool {
    factor < precision::MIN_HEALTH_FACTOR
}

/// Liquidator premium on a seized amount (10%)
pub fn liquidation_bonus(amount: u64) -> SynthResult<u64> {
    let bonus = (amount as u128)
        .checked_mul(ratios::LIQUIDATION_BONUS as u128)
        .ok_or(SynthError::Overflow)?
        / ratios::LIQUIDATION_PRECISION as u128;

    u64::try_from(bonus).map_err(|_| SynthError::Overflow)
}

/// Safe addition with overflow check
pub fn safe_add(a: u64, b: u64) -> SynthResult<u64> {
    a.checked_add(b).ok_or(SynthError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE: u64 = token::ONE;
    const PRICE_2000: u64 = 2_000 * ONE; // $2,000 per unit
    const PRICE_900: u64 = 900 * ONE; // $900 per unit

    #[test]
    fn usd_value_multiplies_before_dividing() {
        // 10 units at $2,000 = $20,000
        let value = usd_value(PRICE_2000, 10 * ONE).unwrap();
        assert_eq!(value, 20_000 * ONE);

        // Sub-unit amounts keep precision: 0.00000001 units at $2,000
        let value = usd_value(PRICE_2000, 1).unwrap();
        assert_eq!(value, 2_000);
    }

    #[test]
    fn token_amount_truncates_toward_zero() {
        // $2,500 at $900/unit = 2.77777777... units, floored
        let amount = token_amount_for_usd(PRICE_900, 2_500 * ONE).unwrap();
        assert_eq!(amount, 2_77777777);
    }

    #[test]
    fn token_amount_zero_price_rejected() {
        assert_eq!(
            token_amount_for_usd(0, ONE),
            Err(SynthError::DivisionByZero)
        );
    }

    #[test]
    fn conversion_round_trip_within_one_unit() {
        let prices = [PRICE_900, PRICE_2000, 3_00000001, 123_456_789];
        let amounts = [1u64, 7, ONE, 10 * ONE, 987_654_321];

        for price in prices {
            for amount in amounts {
                let value = usd_value(price, amount).unwrap();
                let back = token_amount_for_usd(price, value).unwrap();
                assert!(back <= amount, "round trip must never over-deliver");
                assert!(amount - back <= 1, "truncation error exceeds one unit");
            }
        }
    }

    #[test]
    fn health_factor_reference_scenario() {
        // 10 units at $2,000 = $20,000 collateral backing 5,000 debt:
        // (20000 * 50/100) * 1e18 / 5000 = 2.0e18
        let factor = health_factor(20_000 * ONE, 5_000 * ONE);
        assert_eq!(factor, 2 * precision::HEALTH_PRECISION);
        assert!(!is_liquidatable(factor));
    }

    #[test]
    fn health_factor_after_price_drop() {
        // Same position once the price falls to $900: $9,000 collateral
        // backing 5,000 debt gives 0.9e18 - liquidatable.
        let factor = health_factor(9_000 * ONE, 5_000 * ONE);
        assert_eq!(factor, 9 * precision::HEALTH_PRECISION / 10);
        assert!(is_liquidatable(factor));
    }

    #[test]
    fn health_factor_zero_debt_unbounded() {
        assert_eq!(health_factor(20_000 * ONE, 0), u128::MAX);
        assert_eq!(health_factor(0, 0), u128::MAX);
    }

    #[test]
    fn health_factor_zero_collateral() {
        assert_eq!(health_factor(0, ONE), 0);
    }

    #[test]
    fn bonus_is_ten_percent_floored() {
        assert_eq!(liquidation_bonus(2_77777777).unwrap(), 27777777);
        assert_eq!(liquidation_bonus(9).unwrap(), 0);
    }

    #[test]
    fn safe_add_overflow() {
        assert_eq!(safe_add(u64::MAX, 1), Err(SynthError::Overflow));
        assert_eq!(safe_add(1, 2), Ok(3));
    }
}
