//! AMM Model - Pure constant product math (x·y=k) for binary outcome pools
//!
//! Off-chain preview of the pool contract's arithmetic. Every function here
//! reproduces the on-chain integer math exactly: amounts are 256-bit
//! integers scaled by 1e18 and intermediates are widened to 512 bits.

#![no_std]

pub mod fixed;
pub mod math;
pub mod slippage;

pub use fixed::{parse_fixed, Fixed, FixedPoint, WAD};
pub use math::{
    current_price, quote_amount_in, quote_amount_out, quote_buy, quote_cost, quote_sell,
    quote_shares_out, ReservePair, Side, TradeQuote,
};
pub use slippage::{calculate_slippage_pct, price_impact_bps, slippage_bps};

/// Basis points scale (10,000 bps = 100%)
pub const BPS_SCALE: u64 = 10_000;

/// Pool trading fee used when the caller does not supply one (0.5%)
pub const DEFAULT_FEE_BPS: u64 = 50;

/// Returned by [`quote_amount_in`] when the requested shares cannot be bought
pub const UNAFFORDABLE: FixedPoint = FixedPoint::MAX;

/// Error types for AMM operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmmError {
    /// Fee must be below 10,000 bps
    InvalidFee,
    /// Amount text had a leading minus sign
    NegativeAmount,
    /// Amount text is not a decimal number
    InvalidNumber,
    /// Amount text has more than 18 fractional digits
    TooManyDecimals,
    /// Arithmetic overflow
    Overflow,
}

impl core::fmt::Display for AmmError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AmmError::InvalidFee => write!(f, "fee must be below {} bps", BPS_SCALE),
            AmmError::NegativeAmount => write!(f, "amount must not be negative"),
            AmmError::InvalidNumber => write!(f, "amount is not a decimal number"),
            AmmError::TooManyDecimals => write!(f, "amount has more than 18 decimal places"),
            AmmError::Overflow => write!(f, "arithmetic overflow"),
        }
    }
}
