//! Protocol Events
//!
//! Events are collected during operation execution and consumed by
//! off-engine observers and indexers; the engine never reads them back.
//! A failing operation truncates the events it provisionally emitted,
//! so the log only ever shows effects that persisted.

use crate::types::{Address, AssetId};
use crate::Vec;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// Event types for indexing and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
#[borsh(use_discriminant = true)]
#[repr(u8)]
pub enum EventType {
    CollateralDeposited = 0x01,
    CollateralRedeemed = 0x02,
}

/// All events emitted by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum SynthEvent {
    /// Collateral credited to an account and pulled into the engine
    CollateralDeposited {
        account: Address,
        asset: AssetId,
        amount: u64,
    },

    /// Collateral debited from `from` and pushed to `to`. On a plain
    /// withdrawal the two addresses coincide; on a liquidation `from`
    /// is the target and `to` the liquidator.
    CollateralRedeemed {
        from: Address,
        to: Address,
        asset: AssetId,
        amount: u64,
    },
}

impl SynthEvent {
    /// Get the event type for filtering
    pub fn event_type(&self) -> EventType {
        match self {
            Self::CollateralDeposited { .. } => EventType::CollateralDeposited,
            Self::CollateralRedeemed { .. } => EventType::CollateralRedeemed,
        }
    }

    /// Serialize event to bytes for external indexers
    pub fn to_bytes(&self) -> Vec<u8> {
        borsh::to_vec(self).unwrap_or_default()
    }

    /// Deserialize event from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        borsh::from_slice(bytes).ok()
    }
}

/// Event log collecting the events of executed operations
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<SynthEvent>,
}

/// Position in an [`EventLog`], taken before provisional emissions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventMark(usize);

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Emit an event (add to log)
    pub fn emit(&mut self, event: SynthEvent) {
        self.events.push(event);
    }

    /// Record the current log position
    pub fn mark(&self) -> EventMark {
        EventMark(self.events.len())
    }

    /// Drop every event emitted after `mark` (operation rollback)
    pub fn truncate(&mut self, mark: EventMark) {
        self.events.truncate(mark.0);
    }

    /// Get all events
    pub fn events(&self) -> &[SynthEvent] {
        &self.events
    }

    /// Take ownership of all events
    pub fn into_events(self) -> Vec<SynthEvent> {
        self.events
    }

    /// Filter events by type
    pub fn filter_by_type(&self, event_type: EventType) -> Vec<&SynthEvent> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Check if any events were emitted
    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// Get number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if the log is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deposit_event() -> SynthEvent {
        SynthEvent::CollateralDeposited {
            account: [1u8; 32],
            asset: [2u8; 32],
            amount: 100_000_000,
        }
    }

    #[test]
    fn event_type_mapping() {
        assert_eq!(deposit_event().event_type(), EventType::CollateralDeposited);

        let redeemed = SynthEvent::CollateralRedeemed {
            from: [1u8; 32],
            to: [3u8; 32],
            asset: [2u8; 32],
            amount: 50_000_000,
        };
        assert_eq!(redeemed.event_type(), EventType::CollateralRedeemed);
    }

    #[test]
    fn event_serialization_round_trip() {
        let event = deposit_event();
        let bytes = event.to_bytes();
        let restored = SynthEvent::from_bytes(&bytes).unwrap();
        assert_eq!(event, restored);
    }

    #[test]
    fn log_emit_and_filter() {
        let mut log = EventLog::new();
        assert!(!log.has_events());

        log.emit(deposit_event());
        log.emit(SynthEvent::CollateralRedeemed {
            from: [1u8; 32],
            to: [1u8; 32],
            asset: [2u8; 32],
            amount: 1,
        });

        assert_eq!(log.len(), 2);
        assert_eq!(log.filter_by_type(EventType::CollateralDeposited).len(), 1);
    }

    #[test]
    fn truncate_drops_provisional_events() {
        let mut log = EventLog::new();
        log.emit(deposit_event());

        let mark = log.mark();
        log.emit(deposit_event());
        log.emit(deposit_event());
        assert_eq!(log.len(), 3);

        log.truncate(mark);
        assert_eq!(log.len(), 1);

        // Truncating at the current position is a no-op
        let mark = log.mark();
        log.truncate(mark);
        assert_eq!(log.len(), 1);
    }
}
