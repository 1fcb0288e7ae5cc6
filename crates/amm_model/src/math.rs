//! Constant product AMM math (x·y=k) for YES/NO share pools

use log::debug;
use primitive_types::{U256, U512};

use crate::{AmmError, FixedPoint, BPS_SCALE, UNAFFORDABLE, WAD};

/// Outcome side of a binary pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Yes,
    No,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Yes => Side::No,
            Side::No => Side::Yes,
        }
    }
}

/// Snapshot of a pool's share reserves (scaled by WAD).
///
/// Both zero is a valid, freshly created pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReservePair {
    pub reserve_yes: FixedPoint,
    pub reserve_no: FixedPoint,
}

impl ReservePair {
    pub fn new(reserve_yes: FixedPoint, reserve_no: FixedPoint) -> Self {
        Self {
            reserve_yes,
            reserve_no,
        }
    }

    pub fn reserve(&self, side: Side) -> FixedPoint {
        match side {
            Side::Yes => self.reserve_yes,
            Side::No => self.reserve_no,
        }
    }

    /// `(reserve_in, reserve_out)` when buying `side` shares with collateral
    pub fn buy_reserves(&self, side: Side) -> (FixedPoint, FixedPoint) {
        (self.reserve(side.opposite()), self.reserve(side))
    }

    /// `(reserve_in, reserve_out)` when selling `side` shares for collateral
    pub fn sell_reserves(&self, side: Side) -> (FixedPoint, FixedPoint) {
        (self.reserve(side), self.reserve(side.opposite()))
    }

    /// Implied probability of `side`, WAD-scaled
    pub fn price(&self, side: Side) -> FixedPoint {
        current_price(self.reserve_yes, self.reserve_no, side)
    }
}

/// Computed trade preview. Never stored: the chain is authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeQuote {
    pub amount_in: FixedPoint,
    pub amount_out: FixedPoint,
    pub fee_bps: u64,
    pub reserve_in_before: FixedPoint,
    pub reserve_out_before: FixedPoint,
}

impl TradeQuote {
    /// False when the quote carries the [`UNAFFORDABLE`] sentinel
    pub fn is_affordable(&self) -> bool {
        self.amount_in != UNAFFORDABLE
    }

    /// Input paid per unit of output (WAD-scaled), `None` for an empty fill
    pub fn average_price(&self) -> Option<FixedPoint> {
        if self.amount_out.is_zero() || !self.is_affordable() {
            return None;
        }
        U256::try_from(self.amount_in.full_mul(WAD) / U512::from(self.amount_out)).ok()
    }
}

/// `BPS_SCALE - fee_bps`, rejecting fees of 100% or more
fn fee_factor(fee_bps: u64) -> Result<U256, AmmError> {
    if fee_bps >= BPS_SCALE {
        return Err(AmmError::InvalidFee);
    }
    Ok(U256::from(BPS_SCALE - fee_bps))
}

fn narrow(value: U512) -> Result<U256, AmmError> {
    U256::try_from(value).map_err(|_| AmmError::Overflow)
}

/// out = in_with_fee * reserve_out / (reserve_in + in_with_fee)
///
/// Callers guarantee both reserves are non-zero.
fn constant_product_out(
    amount_in: U256,
    reserve_in: U256,
    reserve_out: U256,
    fee_factor: U256,
) -> Result<U256, AmmError> {
    // Truncating, and never larger than amount_in
    let amount_in_with_fee = narrow(amount_in.full_mul(fee_factor) / U512::from(BPS_SCALE))?;

    let denominator = U512::from(reserve_in) + U512::from(amount_in_with_fee);
    if denominator.is_zero() {
        return Ok(U256::zero());
    }

    narrow(amount_in_with_fee.full_mul(reserve_out) / denominator)
}

/// Shares received for `amount_in` collateral.
///
/// An empty side means the pool has not been seeded yet; the first trade is
/// filled 1:1.
pub fn quote_shares_out(
    amount_in: FixedPoint,
    reserve_in: FixedPoint,
    reserve_out: FixedPoint,
    fee_bps: u64,
) -> Result<FixedPoint, AmmError> {
    let fee_factor = fee_factor(fee_bps)?;

    if reserve_in.is_zero() || reserve_out.is_zero() {
        debug!("bootstrap quote: empty reserve, filling {} 1:1", amount_in);
        return Ok(amount_in);
    }

    constant_product_out(amount_in, reserve_in, reserve_out, fee_factor)
}

/// Collateral needed to receive exactly `shares_out` shares.
///
/// amount_in = ceil(reserve_in * shares_out * BPS / ((reserve_out - shares_out) * (BPS - fee)))
///
/// Returns [`UNAFFORDABLE`] when `shares_out >= reserve_out` or when the
/// answer does not fit in 256 bits. An empty `reserve_in` prices the shares
/// 1:1, the same bootstrap fill [`quote_shares_out`] gives.
pub fn quote_amount_in(
    shares_out: FixedPoint,
    reserve_in: FixedPoint,
    reserve_out: FixedPoint,
    fee_bps: u64,
) -> Result<FixedPoint, AmmError> {
    let fee_factor = fee_factor(fee_bps)?;

    if shares_out >= reserve_out {
        debug!(
            "unaffordable: {} shares requested, {} in reserve",
            shares_out, reserve_out
        );
        return Ok(UNAFFORDABLE);
    }
    if reserve_in.is_zero() {
        debug!("bootstrap cost: empty reserve, pricing {} shares 1:1", shares_out);
        return Ok(shares_out);
    }

    let numerator = match reserve_in
        .full_mul(shares_out)
        .checked_mul(U512::from(BPS_SCALE))
    {
        Some(n) => n,
        None => return Ok(UNAFFORDABLE),
    };
    // Non-zero: shares_out < reserve_out and fee_factor >= 1
    let denominator = (reserve_out - shares_out).full_mul(fee_factor);

    // Round up so the quoted input is never short
    let (quotient, remainder) = numerator.div_mod(denominator);
    let amount_in = if remainder.is_zero() {
        quotient
    } else {
        quotient + U512::one()
    };

    Ok(U256::try_from(amount_in).unwrap_or(UNAFFORDABLE))
}

/// Collateral received for selling `shares_in` shares.
///
/// `reserve_in` is the reserve of the side being sold. Zero is returned for
/// an empty sale, an empty pool, or a sale that would drain `reserve_in`.
pub fn quote_amount_out(
    shares_in: FixedPoint,
    reserve_in: FixedPoint,
    reserve_out: FixedPoint,
    fee_bps: u64,
) -> Result<FixedPoint, AmmError> {
    let fee_factor = fee_factor(fee_bps)?;

    if shares_in.is_zero() || reserve_in.is_zero() || reserve_out.is_zero() {
        return Ok(U256::zero());
    }
    if shares_in >= reserve_in {
        debug!(
            "sell of {} shares would drain reserve of {}",
            shares_in, reserve_in
        );
        return Ok(U256::zero());
    }

    constant_product_out(shares_in, reserve_in, reserve_out, fee_factor)
}

/// Implied probability of `side`, WAD-scaled (5e17 = 50%).
///
/// A side's price is the opposite reserve's share of the pool; an empty pool
/// is priced at even odds.
pub fn current_price(reserve_yes: FixedPoint, reserve_no: FixedPoint, side: Side) -> FixedPoint {
    let total = U512::from(reserve_yes) + U512::from(reserve_no);
    if total.is_zero() {
        return WAD / 2u64;
    }

    let opposite = match side {
        Side::Yes => reserve_no,
        Side::No => reserve_yes,
    };
    // opposite <= total, so the quotient is bounded by WAD
    U256::try_from(opposite.full_mul(WAD) / total).unwrap_or(WAD)
}

/// Preview buying `side` shares with `amount_in` collateral
pub fn quote_buy(
    pool: &ReservePair,
    side: Side,
    amount_in: FixedPoint,
    fee_bps: u64,
) -> Result<TradeQuote, AmmError> {
    let (reserve_in, reserve_out) = pool.buy_reserves(side);
    let amount_out = quote_shares_out(amount_in, reserve_in, reserve_out, fee_bps)?;

    Ok(TradeQuote {
        amount_in,
        amount_out,
        fee_bps,
        reserve_in_before: reserve_in,
        reserve_out_before: reserve_out,
    })
}

/// Preview the collateral cost of receiving exactly `shares_out` `side` shares
pub fn quote_cost(
    pool: &ReservePair,
    side: Side,
    shares_out: FixedPoint,
    fee_bps: u64,
) -> Result<TradeQuote, AmmError> {
    let (reserve_in, reserve_out) = pool.buy_reserves(side);
    let amount_in = quote_amount_in(shares_out, reserve_in, reserve_out, fee_bps)?;

    Ok(TradeQuote {
        amount_in,
        amount_out: shares_out,
        fee_bps,
        reserve_in_before: reserve_in,
        reserve_out_before: reserve_out,
    })
}

/// Preview selling `shares_in` `side` shares back to the pool
pub fn quote_sell(
    pool: &ReservePair,
    side: Side,
    shares_in: FixedPoint,
    fee_bps: u64,
) -> Result<TradeQuote, AmmError> {
    let (reserve_in, reserve_out) = pool.sell_reserves(side);
    let amount_out = quote_amount_out(shares_in, reserve_in, reserve_out, fee_bps)?;

    Ok(TradeQuote {
        amount_in: shares_in,
        amount_out,
        fee_bps,
        reserve_in_before: reserve_in,
        reserve_out_before: reserve_out,
    })
}
