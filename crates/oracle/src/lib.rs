//! Price Oracle Adapter
//!
//! Wraps an external price source behind the [`PriceSource`] trait and
//! turns raw signed answers into validated [`PriceQuote`]s scaled to the
//! ledger precision. Conversions between token amounts and USD values
//! live here as well, on top of the shared fixed-point math.
//!
//! Freshness is the price source's responsibility: the engine treats a
//! quote as authoritative at read time and performs no staleness check.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use synthex_common::{
    errors::{SynthError, SynthResult},
    math,
    types::{AssetId, PriceQuote, SourceId},
};

pub mod mock;

/// Raw answer of one price feed round.
///
/// Only `answer` is consumed by the engine; `updated_at` travels along
/// for observers. The answer is signed because the external source's
/// wire format is — a non-positive answer is a collaborator fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct RoundData {
    /// Price answer, 8 decimals, signed
    pub answer: i64,
    /// Source-defined timestamp of the round
    pub updated_at: u64,
}

/// External price source consumed by the engine.
///
/// Implementations must answer synchronously. A feed the source does
/// not know must report a non-positive answer, which the adapter turns
/// into `OraclePriceInvalid`.
pub trait PriceSource {
    /// Latest round of the given feed
    fn latest_round(&self, feed: &SourceId) -> RoundData;
}

/// Shared handle: lets an operator keep updating a source the engine
/// already owns.
impl<S: PriceSource> PriceSource for std::rc::Rc<std::cell::RefCell<S>> {
    fn latest_round(&self, feed: &SourceId) -> RoundData {
        self.borrow().latest_round(feed)
    }
}

/// Fetch and validate the current price of `asset` from `feed`.
///
/// Non-positive answers propagate as `OraclePriceInvalid`; they are
/// never clamped.
pub fn quote<P: PriceSource>(
    provider: &P,
    feed: &SourceId,
    asset: AssetId,
) -> SynthResult<PriceQuote> {
    let round = provider.latest_round(feed);
    if round.answer <= 0 {
        return Err(SynthError::OraclePriceInvalid {
            asset,
            answer: round.answer,
        });
    }

    // Feed answers share the ledger's 8-decimal precision, so a
    // validated answer converts without rescaling.
    Ok(PriceQuote {
        asset,
        price: round.answer as u64,
    })
}

/// USD value of `amount` units at the quoted price
pub fn usd_value(quote: &PriceQuote, amount: u64) -> SynthResult<u64> {
    math::usd_value(quote.price, amount)
}

/// Token amount worth `usd_amount` at the quoted price, floored
pub fn token_amount_for_usd(quote: &PriceQuote, usd_amount: u64) -> SynthResult<u64> {
    math::token_amount_for_usd(quote.price, usd_amount)
}
