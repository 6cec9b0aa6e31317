//! Mock price source for tests and local development.

use std::collections::BTreeMap;

use synthex_common::types::SourceId;

use crate::{PriceSource, RoundData};

/// In-memory [`PriceSource`] with settable per-feed rounds.
///
/// Feeds that were never set answer `0`, which the adapter rejects as
/// `OraclePriceInvalid` — the same failure mode as a broken feed.
#[derive(Debug, Clone, Default)]
pub struct MockPriceSource {
    rounds: BTreeMap<SourceId, RoundData>,
}

impl MockPriceSource {
    /// Create an empty mock source
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the full round for a feed
    pub fn set_round(&mut self, feed: SourceId, round: RoundData) {
        self.rounds.insert(feed, round);
    }

    /// Set a feed's answer, keeping a zero timestamp
    pub fn set_price(&mut self, feed: SourceId, answer: i64) {
        self.set_round(
            feed,
            RoundData {
                answer,
                updated_at: 0,
            },
        );
    }
}

impl PriceSource for MockPriceSource {
    fn latest_round(&self, feed: &SourceId) -> RoundData {
        self.rounds.get(feed).copied().unwrap_or(RoundData {
            answer: 0,
            updated_at: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use synthex_common::types::source_id;

    #[test]
    fn set_and_read_back() {
        let feed = source_id("ETH/USD");
        let mut source = MockPriceSource::new();
        source.set_price(feed, 42);

        assert_eq!(source.latest_round(&feed).answer, 42);
        assert_eq!(source.latest_round(&source_id("other")).answer, 0);
    }
}
