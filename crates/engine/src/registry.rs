//! Collateral Registry
//!
//! Static mapping of approved collateral assets to their price feeds,
//! fixed at construction. An asset without a registered feed is
//! rejected by every operation.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use synthex_common::{
    errors::{SynthError, SynthResult},
    types::{AssetId, SourceId},
};

/// Approved collateral assets and their price sources.
///
/// Configured exactly once; the engine exposes no mutators afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct CollateralRegistry {
    sources: BTreeMap<AssetId, SourceId>,
    assets: Vec<AssetId>,
}

impl CollateralRegistry {
    /// Build a registry from two equal-length sequences, zipped
    /// pairwise.
    ///
    /// Fails with `ConfigMismatch` when the lengths differ. A repeated
    /// asset keeps its first position in the enumeration order and
    /// takes the latest feed mapping.
    pub fn configure(assets: Vec<AssetId>, price_sources: Vec<SourceId>) -> SynthResult<Self> {
        if assets.len() != price_sources.len() {
            return Err(SynthError::ConfigMismatch {
                assets: assets.len(),
                price_sources: price_sources.len(),
            });
        }

        let mut registry = Self {
            sources: BTreeMap::new(),
            assets: Vec::with_capacity(assets.len()),
        };
        for (asset, source) in assets.into_iter().zip(price_sources) {
            if registry.sources.insert(asset, source).is_none() {
                registry.assets.push(asset);
            }
        }

        Ok(registry)
    }

    /// True iff the asset has a registered price feed
    pub fn is_allowed(&self, asset: &AssetId) -> bool {
        self.sources.contains_key(asset)
    }

    /// Approved assets in stable registration order
    pub fn assets(&self) -> &[AssetId] {
        &self.assets
    }

    /// Price feed registered for `asset`
    pub fn source_for(&self, asset: &AssetId) -> SynthResult<&SourceId> {
        self.sources
            .get(asset)
            .ok_or(SynthError::AssetNotAllowed { asset: *asset })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use synthex_common::types::{asset_id, source_id};

    #[test]
    fn configure_zips_pairwise() {
        let weth = asset_id("WETH");
        let wbtc = asset_id("WBTC");
        let eth_feed = source_id("ETH/USD");
        let btc_feed = source_id("BTC/USD");

        let registry =
            CollateralRegistry::configure(vec![weth, wbtc], vec![eth_feed, btc_feed]).unwrap();

        assert!(registry.is_allowed(&weth));
        assert!(registry.is_allowed(&wbtc));
        assert!(!registry.is_allowed(&asset_id("DOGE")));
        assert_eq!(registry.assets(), &[weth, wbtc]);
        assert_eq!(registry.source_for(&wbtc).unwrap(), &btc_feed);
    }

    #[test]
    fn configure_rejects_length_mismatch() {
        let result =
            CollateralRegistry::configure(vec![asset_id("WETH")], vec![]);
        assert_eq!(
            result,
            Err(SynthError::ConfigMismatch {
                assets: 1,
                price_sources: 0
            })
        );
    }

    #[test]
    fn duplicate_asset_keeps_order_and_latest_source() {
        let weth = asset_id("WETH");
        let wbtc = asset_id("WBTC");
        let first = source_id("first");
        let second = source_id("second");
        let btc_feed = source_id("BTC/USD");

        let registry = CollateralRegistry::configure(
            vec![weth, wbtc, weth],
            vec![first, btc_feed, second],
        )
        .unwrap();

        assert_eq!(registry.assets(), &[weth, wbtc]);
        assert_eq!(registry.source_for(&weth).unwrap(), &second);
    }

    #[test]
    fn unknown_asset_is_not_allowed() {
        let registry = CollateralRegistry::configure(vec![], vec![]).unwrap();
        let missing = asset_id("WETH");
        assert_eq!(
            registry.source_for(&missing),
            Err(SynthError::AssetNotAllowed { asset: missing })
        );
    }
}
