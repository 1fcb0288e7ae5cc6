//! Binary market resolution primitives.
//!
//! Scope:
//! - Threshold markets on a reference USD price (`YES` / `NO`)
//! - Deterministic outcome computation matching the on-chain resolver
//! - Pending -> Resolved | Cancelled lifecycle with absorbing terminal states
//! - Off-chain lookup of the market's above/below direction

pub mod direction;
pub mod market;
pub mod resolution;

pub use direction::{
    lookup_direction, DirectionLookup, DirectionSource, DirectionStore, InMemoryDirectionStore,
    FALLBACK_DIRECTION,
};
pub use market::{Market, MarketError, MarketStatus};
pub use resolution::{
    determine_outcome, should_resolve, should_resolve_at, Direction, MarketOutcomeQuery, Outcome,
};
