//! Slippage and price impact reporting

use primitive_types::{U256, U512};
use rust_decimal::Decimal;

use crate::{AmmError, FixedPoint, BPS_SCALE};

/// |expected - actual| / expected, in basis points (truncated).
///
/// A zero expected amount has no meaningful slippage and reports zero.
pub fn slippage_bps(expected: FixedPoint, actual: FixedPoint) -> Result<U256, AmmError> {
    if expected.is_zero() {
        return Ok(U256::zero());
    }

    let diff = if expected > actual {
        expected - actual
    } else {
        actual - expected
    };

    U256::try_from(diff.full_mul(U256::from(BPS_SCALE)) / U512::from(expected))
        .map_err(|_| AmmError::Overflow)
}

/// Slippage as a percentage with two decimal places (500 bps -> 5.00)
pub fn calculate_slippage_pct(
    expected: FixedPoint,
    actual: FixedPoint,
) -> Result<Decimal, AmmError> {
    let bps = slippage_bps(expected, actual)?;
    if bps > U256::from(i128::MAX as u128) {
        return Err(AmmError::Overflow);
    }
    Decimal::try_from_i128_with_scale(bps.low_u128() as i128, 2).map_err(|_| AmmError::Overflow)
}

/// Shortfall of `amount_out` against the mid-price output, in basis points.
///
/// Fees are not separated out and count as impact. A zero-size trade has no
/// impact; any other trade against an empty pool reports 100%.
pub fn price_impact_bps(
    amount_in: FixedPoint,
    reserve_in: FixedPoint,
    amount_out: FixedPoint,
    reserve_out: FixedPoint,
) -> u64 {
    if amount_in.is_zero() {
        return 0;
    }
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return BPS_SCALE;
    }

    let ideal_out = amount_in.full_mul(reserve_out) / U512::from(reserve_in);
    if ideal_out.is_zero() {
        return BPS_SCALE;
    }

    let actual_out = U512::from(amount_out);
    let shortfall = if ideal_out > actual_out {
        ideal_out - actual_out
    } else {
        U512::zero()
    };

    // shortfall <= ideal_out, so this is at most BPS_SCALE
    let bps = match shortfall.checked_mul(U512::from(BPS_SCALE)) {
        Some(scaled) => scaled / ideal_out,
        // ideal_out is far above BPS_SCALE here, so the divisor is non-zero
        None => shortfall / (ideal_out / U512::from(BPS_SCALE)),
    };
    bps.low_u64()
}
