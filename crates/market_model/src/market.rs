//! Market lifecycle: Pending -> Resolved | Cancelled

use rust_decimal::Decimal;
use thiserror::Error;

use crate::resolution::{determine_outcome, should_resolve_at, Direction, Outcome};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarketStatus {
    Pending,
    Resolved {
        outcome: Outcome,
        reference_price_usd: Decimal,
    },
    Cancelled,
}

impl MarketStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, MarketStatus::Pending)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MarketError {
    #[error("market expires at {expiration}, now is {now}")]
    NotExpired { expiration: i64, now: i64 },
    #[error("market already resolved {0}")]
    AlreadyResolved(Outcome),
    #[error("market was cancelled")]
    AlreadyCancelled,
    #[error("reference price must not be negative")]
    InvalidPrice,
    #[error("threshold price must not be negative")]
    InvalidThreshold,
}

fn is_negative(price: Decimal) -> bool {
    price.is_sign_negative() && !price.is_zero()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Market {
    pub address: String,
    pub threshold_usd: Decimal,
    pub expiration_unix_seconds: i64,
    pub direction: Direction,
    status: MarketStatus,
}

impl Market {
    pub fn new(
        address: impl Into<String>,
        threshold_usd: Decimal,
        expiration_unix_seconds: i64,
        direction: Direction,
    ) -> Result<Self, MarketError> {
        if is_negative(threshold_usd) {
            return Err(MarketError::InvalidThreshold);
        }
        Ok(Self {
            address: address.into(),
            threshold_usd,
            expiration_unix_seconds,
            direction,
            status: MarketStatus::Pending,
        })
    }

    pub fn status(&self) -> MarketStatus {
        self.status
    }

    /// Settle the market against a fetched reference price.
    ///
    /// A resolved market is never re-resolved, even with the same price.
    pub fn resolve(
        &mut self,
        reference_price_usd: Decimal,
        now_unix_seconds: i64,
    ) -> Result<Outcome, MarketError> {
        match self.status {
            MarketStatus::Resolved { outcome, .. } => return Err(MarketError::AlreadyResolved(outcome)),
            MarketStatus::Cancelled => return Err(MarketError::AlreadyCancelled),
            MarketStatus::Pending => {}
        }
        if !should_resolve_at(self.expiration_unix_seconds, now_unix_seconds) {
            return Err(MarketError::NotExpired {
                expiration: self.expiration_unix_seconds,
                now: now_unix_seconds,
            });
        }
        if is_negative(reference_price_usd) {
            return Err(MarketError::InvalidPrice);
        }
        // threshold_usd is a public field and may have changed since new()
        if is_negative(self.threshold_usd) {
            return Err(MarketError::InvalidThreshold);
        }

        let outcome = determine_outcome(reference_price_usd, self.threshold_usd, self.direction);
        self.status = MarketStatus::Resolved {
            outcome,
            reference_price_usd,
        };
        log::info!(
            "market {} resolved {} at ${}",
            self.address,
            outcome,
            reference_price_usd
        );
        Ok(outcome)
    }

    pub fn cancel(&mut self) -> Result<(), MarketError> {
        match self.status {
            MarketStatus::Resolved { outcome, .. } => Err(MarketError::AlreadyResolved(outcome)),
            MarketStatus::Cancelled => Err(MarketError::AlreadyCancelled),
            MarketStatus::Pending => {
                self.status = MarketStatus::Cancelled;
                Ok(())
            }
        }
    }
}
