//! Off-chain market direction lookup
//!
//! The above/below flag is not stored on-chain. A lost or tampered store can
//! only change explanation text, never the on-chain resolution.

use std::collections::HashMap;

use log::warn;

use crate::resolution::Direction;

/// Used when the store has no entry for a market
pub const FALLBACK_DIRECTION: Direction = Direction::Above;

pub trait DirectionStore {
    fn get(&self, market_address: &str) -> Option<Direction>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DirectionSource {
    Stored,
    Fallback,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirectionLookup {
    pub direction: Direction,
    pub source: DirectionSource,
}

/// Look up a market's direction, falling back to [`FALLBACK_DIRECTION`] on a miss
pub fn lookup_direction<S: DirectionStore + ?Sized>(store: &S, market_address: &str) -> DirectionLookup {
    match store.get(market_address) {
        Some(direction) => DirectionLookup {
            direction,
            source: DirectionSource::Stored,
        },
        None => {
            warn!(
                "no stored direction for market {}, assuming {}",
                market_address, FALLBACK_DIRECTION
            );
            DirectionLookup {
                direction: FALLBACK_DIRECTION,
                source: DirectionSource::Fallback,
            }
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct InMemoryDirectionStore {
    entries: HashMap<String, Direction>,
}

impl InMemoryDirectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, market_address: impl Into<String>, direction: Direction) {
        self.entries.insert(market_address.into(), direction);
    }
}

impl From<HashMap<String, Direction>> for InMemoryDirectionStore {
    fn from(entries: HashMap<String, Direction>) -> Self {
        Self { entries }
    }
}

impl DirectionStore for InMemoryDirectionStore {
    fn get(&self, market_address: &str) -> Option<Direction> {
        self.entries.get(market_address).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_direction_wins() {
        let mut store = InMemoryDirectionStore::new();
        store.insert("0xabc", Direction::Below);

        let lookup = lookup_direction(&store, "0xabc");
        assert_eq!(lookup.direction, Direction::Below);
        assert_eq!(lookup.source, DirectionSource::Stored);
    }

    #[test]
    fn miss_falls_back_explicitly() {
        let store = InMemoryDirectionStore::new();
        let lookup = lookup_direction(&store, "0xmissing");
        assert_eq!(lookup.direction, FALLBACK_DIRECTION);
        assert_eq!(lookup.source, DirectionSource::Fallback);
    }

    #[test]
    fn works_through_trait_object() {
        let mut store = InMemoryDirectionStore::new();
        store.insert("0xdef", Direction::Above);
        let dyn_store: &dyn DirectionStore = &store;
        assert_eq!(lookup_direction(dyn_store, "0xdef").source, DirectionSource::Stored);
    }
}
