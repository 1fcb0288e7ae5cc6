//! Borrowing power and fee estimates for a BTC-backed stablecoin position
//!
//! These are "what if" previews shown before a transaction. Figures are
//! decimal USD/BTC amounts and are never submitted on-chain; the lending
//! protocol's own numbers replace them once the transaction lands.

use log::debug;
use rust_decimal::Decimal;
use thiserror::Error;

/// Collateralization ratio below which a trove can be liquidated (percent)
pub const MIN_COLLATERALIZATION_RATIO: u32 = 110;

/// Ratio the UI suggests for new positions (percent)
pub const RECOMMENDED_COLLATERALIZATION_RATIO: u32 = 150;

/// Refundable deposit held against liquidation, in stablecoin units
pub const LIQUIDATION_FEE_DEPOSIT: u32 = 200;

/// Basis points scale (10,000 bps = 100%)
pub const BPS_SCALE: u32 = 10_000;

pub fn minimum_collateralization_ratio() -> Decimal {
    Decimal::from(MIN_COLLATERALIZATION_RATIO)
}

pub fn recommended_collateralization_ratio() -> Decimal {
    Decimal::from(RECOMMENDED_COLLATERALIZATION_RATIO)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BorrowError {
    #[error("{0} must not be negative")]
    NegativeInput(&'static str),
    #[error("collateralization ratio must be positive")]
    InvalidRatio,
    #[error("liquidation price is undefined without collateral")]
    ZeroCollateral,
    #[error("arithmetic overflow")]
    Overflow,
}

fn non_negative(value: Decimal, name: &'static str) -> Result<Decimal, BorrowError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(BorrowError::NegativeInput(name));
    }
    Ok(value)
}

/// Stablecoin that `btc_amount` can back at `collateralization_ratio_pct`.
///
/// Risky ratios are still computed; use [`classify_ratio`] to warn about them.
pub fn calculate_borrow_amount(
    btc_amount: Decimal,
    btc_price_usd: Decimal,
    collateralization_ratio_pct: Decimal,
) -> Result<Decimal, BorrowError> {
    let btc_amount = non_negative(btc_amount, "BTC amount")?;
    let btc_price_usd = non_negative(btc_price_usd, "BTC price")?;
    if collateralization_ratio_pct <= Decimal::ZERO {
        return Err(BorrowError::InvalidRatio);
    }

    let collateral_value = btc_amount
        .checked_mul(btc_price_usd)
        .ok_or(BorrowError::Overflow)?;
    let ratio = collateralization_ratio_pct / Decimal::ONE_HUNDRED;

    collateral_value
        .checked_div(ratio)
        .ok_or(BorrowError::Overflow)
}

/// Borrow capacity at the protocol minimum ratio
pub fn max_borrow_amount(btc_amount: Decimal, btc_price_usd: Decimal) -> Result<Decimal, BorrowError> {
    calculate_borrow_amount(btc_amount, btc_price_usd, minimum_collateralization_ratio())
}

/// BTC price at which the position falls to `min_collateralization_ratio_pct`
pub fn calculate_liquidation_price(
    borrow_amount_usd: Decimal,
    btc_amount: Decimal,
    min_collateralization_ratio_pct: Decimal,
) -> Result<Decimal, BorrowError> {
    let borrow_amount_usd = non_negative(borrow_amount_usd, "borrow amount")?;
    let btc_amount = non_negative(btc_amount, "BTC amount")?;
    if min_collateralization_ratio_pct <= Decimal::ZERO {
        return Err(BorrowError::InvalidRatio);
    }
    if btc_amount.is_zero() {
        return Err(BorrowError::ZeroCollateral);
    }

    let required_value = borrow_amount_usd
        .checked_mul(min_collateralization_ratio_pct)
        .ok_or(BorrowError::Overflow)?
        / Decimal::ONE_HUNDRED;

    required_value
        .checked_div(btc_amount)
        .ok_or(BorrowError::Overflow)
}

/// Up-front costs of opening a trove
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorrowingFees {
    pub issuance_fee: Decimal,
    /// Refunded when the trove is closed
    pub liquidation_fee_deposit: Decimal,
    /// Issuance fee plus deposit, for display only
    pub total_fees: Decimal,
}

pub fn calculate_borrowing_fees(
    borrow_amount_usd: Decimal,
    fee_rate_bps: u32,
) -> Result<BorrowingFees, BorrowError> {
    let borrow_amount_usd = non_negative(borrow_amount_usd, "borrow amount")?;

    let issuance_fee = borrow_amount_usd
        .checked_mul(Decimal::from(fee_rate_bps))
        .ok_or(BorrowError::Overflow)?
        / Decimal::from(BPS_SCALE);
    let liquidation_fee_deposit = Decimal::from(LIQUIDATION_FEE_DEPOSIT);
    let total_fees = issuance_fee
        .checked_add(liquidation_fee_deposit)
        .ok_or(BorrowError::Overflow)?;

    Ok(BorrowingFees {
        issuance_fee,
        liquidation_fee_deposit,
        total_fees,
    })
}

/// Where a collateralization ratio sits relative to the protocol constants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollateralHealth {
    /// At or below the minimum: liquidatable
    BelowMinimum,
    /// Above the minimum but under the recommended buffer
    BelowRecommended,
    Healthy,
}

pub fn classify_ratio(collateralization_ratio_pct: Decimal) -> CollateralHealth {
    if collateralization_ratio_pct <= minimum_collateralization_ratio() {
        CollateralHealth::BelowMinimum
    } else if collateralization_ratio_pct < recommended_collateralization_ratio() {
        CollateralHealth::BelowRecommended
    } else {
        CollateralHealth::Healthy
    }
}

/// Caller-supplied snapshot of a trove
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorrowPosition {
    pub btc_collateral: Decimal,
    pub borrowed_amount: Decimal,
    pub btc_price_usd: Decimal,
    pub collateralization_ratio_pct: Decimal,
}

impl BorrowPosition {
    pub fn collateral_value_usd(&self) -> Result<Decimal, BorrowError> {
        non_negative(self.btc_collateral, "BTC amount")?
            .checked_mul(non_negative(self.btc_price_usd, "BTC price")?)
            .ok_or(BorrowError::Overflow)
    }

    /// Current ratio from collateral value and debt; `None` with no debt
    pub fn current_ratio_pct(&self) -> Result<Option<Decimal>, BorrowError> {
        let debt = non_negative(self.borrowed_amount, "borrow amount")?;
        if debt.is_zero() {
            return Ok(None);
        }
        let ratio = self
            .collateral_value_usd()?
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|v| v.checked_div(debt))
            .ok_or(BorrowError::Overflow)?;
        Ok(Some(ratio))
    }

    /// How much this position could borrow at its target ratio
    pub fn borrow_capacity(&self) -> Result<Decimal, BorrowError> {
        calculate_borrow_amount(
            self.btc_collateral,
            self.btc_price_usd,
            self.collateralization_ratio_pct,
        )
    }

    pub fn liquidation_price(&self) -> Result<Decimal, BorrowError> {
        calculate_liquidation_price(
            self.borrowed_amount,
            self.btc_collateral,
            minimum_collateralization_ratio(),
        )
    }

    /// Health of the live ratio, or of the target ratio when nothing is borrowed
    pub fn health(&self) -> Result<CollateralHealth, BorrowError> {
        let ratio = match self.current_ratio_pct()? {
            Some(ratio) => ratio,
            None => {
                debug!("no debt, classifying target ratio");
                self.collateralization_ratio_pct
            }
        };
        Ok(classify_ratio(ratio))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_protocol_constants() {
        assert_eq!(minimum_collateralization_ratio(), dec!(110));
        assert_eq!(recommended_collateralization_ratio(), dec!(150));
    }

    #[test]
    fn test_borrow_amount_scenario() {
        // 0.01 BTC at $60k and 150% -> $400
        let amount = calculate_borrow_amount(dec!(0.01), dec!(60000), dec!(150)).unwrap();
        assert_eq!(amount, dec!(400));
    }

    #[test]
    fn test_borrow_amount_risky_ratio_still_computed() {
        let amount = calculate_borrow_amount(dec!(1), dec!(1100), dec!(100)).unwrap();
        assert_eq!(amount, dec!(1100));
        assert_eq!(classify_ratio(dec!(100)), CollateralHealth::BelowMinimum);
    }

    #[test]
    fn test_borrow_amount_rejects_bad_input() {
        assert_eq!(
            calculate_borrow_amount(dec!(1), dec!(60000), dec!(0)),
            Err(BorrowError::InvalidRatio)
        );
        assert_eq!(
            calculate_borrow_amount(dec!(-1), dec!(60000), dec!(150)),
            Err(BorrowError::NegativeInput("BTC amount"))
        );
    }

    #[test]
    fn test_max_borrow_amount() {
        assert_eq!(max_borrow_amount(dec!(1.1), dec!(100)).unwrap(), dec!(100));
    }

    #[test]
    fn test_liquidation_price() {
        // $400 debt on 0.01 BTC at 110% -> $44,000
        let price = calculate_liquidation_price(dec!(400), dec!(0.01), dec!(110)).unwrap();
        assert_eq!(price, dec!(44000));
    }

    #[test]
    fn test_liquidation_price_zero_collateral() {
        assert_eq!(
            calculate_liquidation_price(dec!(400), dec!(0), dec!(110)),
            Err(BorrowError::ZeroCollateral)
        );
    }

    #[test]
    fn test_borrowing_fees() {
        let fees = calculate_borrowing_fees(dec!(2000), 50).unwrap();
        assert_eq!(fees.issuance_fee, dec!(10));
        assert_eq!(fees.liquidation_fee_deposit, dec!(200));
        assert_eq!(fees.total_fees, dec!(210));
    }

    #[test]
    fn test_deposit_is_independent_of_size() {
        let small = calculate_borrowing_fees(dec!(1), 50).unwrap();
        let large = calculate_borrowing_fees(dec!(1000000), 50).unwrap();
        assert_eq!(small.liquidation_fee_deposit, large.liquidation_fee_deposit);
    }

    #[test]
    fn test_classify_ratio_boundaries() {
        assert_eq!(classify_ratio(dec!(110)), CollateralHealth::BelowMinimum);
        assert_eq!(classify_ratio(dec!(110.01)), CollateralHealth::BelowRecommended);
        assert_eq!(classify_ratio(dec!(149.99)), CollateralHealth::BelowRecommended);
        assert_eq!(classify_ratio(dec!(150)), CollateralHealth::Healthy);
    }

    #[test]
    fn test_position_ratio_and_health() {
        let position = BorrowPosition {
            btc_collateral: dec!(0.01),
            borrowed_amount: dec!(500),
            btc_price_usd: dec!(60000),
            collateralization_ratio_pct: dec!(150),
        };
        assert_eq!(position.collateral_value_usd().unwrap(), dec!(600));
        assert_eq!(position.current_ratio_pct().unwrap(), Some(dec!(120)));
        assert_eq!(position.health().unwrap(), CollateralHealth::BelowRecommended);
        assert_eq!(position.borrow_capacity().unwrap(), dec!(400));
        assert_eq!(position.liquidation_price().unwrap(), dec!(55000));
    }

    #[test]
    fn test_position_without_debt_uses_target_ratio() {
        let position = BorrowPosition {
            btc_collateral: dec!(1),
            borrowed_amount: dec!(0),
            btc_price_usd: dec!(60000),
            collateralization_ratio_pct: dec!(200),
        };
        assert_eq!(position.current_ratio_pct().unwrap(), None);
        assert_eq!(position.health().unwrap(), CollateralHealth::Healthy);
    }
}
