//! Borrowing power previews for a BTC-backed trove

use anyhow::{anyhow, Result};
use rust_decimal::Decimal;

use borrow_model::{
    calculate_borrow_amount, calculate_borrowing_fees, calculate_liquidation_price,
    classify_ratio, max_borrow_amount, BorrowPosition, CollateralHealth,
};

use crate::config::PreviewConfig;
use crate::output::Report;

fn health_label(health: CollateralHealth) -> &'static str {
    match health {
        CollateralHealth::BelowMinimum => "liquidatable",
        CollateralHealth::BelowRecommended => "at risk",
        CollateralHealth::Healthy => "healthy",
    }
}

fn with_health_note(report: Report, health: CollateralHealth) -> Report {
    match health {
        CollateralHealth::BelowMinimum => {
            report.note("Ratio is at or below the protocol minimum; the trove can be liquidated")
        }
        CollateralHealth::BelowRecommended => {
            report.note("Ratio is below the recommended buffer; a small price drop risks liquidation")
        }
        CollateralHealth::Healthy => report,
    }
}

pub fn preview_borrow_amount(
    btc: Decimal,
    price: Decimal,
    ratio: Decimal,
    json: bool,
) -> Result<()> {
    let amount = calculate_borrow_amount(btc, price, ratio)?;
    let max = max_borrow_amount(btc, price)?;
    let health = classify_ratio(ratio);

    let report = Report::new("Borrow Amount")
        .row("BTC collateral", btc)
        .row("BTC price (USD)", price)
        .row("Collateralization ratio (%)", ratio)
        .row("Borrow amount (USD)", amount.round_dp(2))
        .row("Max at minimum ratio (USD)", max.round_dp(2))
        .row("Health", health_label(health));
    with_health_note(report, health).print(json)
}

pub fn preview_liquidation_price(
    config: &PreviewConfig,
    borrow: Decimal,
    btc: Decimal,
    min_ratio: Option<Decimal>,
    json: bool,
) -> Result<()> {
    let min_ratio = min_ratio.unwrap_or_else(|| Decimal::from(config.min_collateral_ratio_pct));
    let price = calculate_liquidation_price(borrow, btc, min_ratio)?;

    Report::new("Liquidation Price")
        .row("Debt (USD)", borrow)
        .row("BTC collateral", btc)
        .row("Minimum ratio (%)", min_ratio)
        .row("Liquidation price (USD)", price.round_dp(2))
        .print(json)
}

pub fn preview_fees(
    config: &PreviewConfig,
    borrow: Decimal,
    fee_rate_bps: Option<u32>,
    json: bool,
) -> Result<()> {
    let fee_rate_bps = fee_rate_bps.unwrap_or(config.borrowing_fee_rate_bps);
    let fees = calculate_borrowing_fees(borrow, fee_rate_bps)?;

    Report::new("Borrowing Fees")
        .row("Borrow amount (USD)", borrow)
        .row("Fee rate (bps)", fee_rate_bps)
        .row("Issuance fee", fees.issuance_fee.round_dp(2))
        .row("Liquidation deposit (refundable)", fees.liquidation_fee_deposit)
        .row("Total", fees.total_fees.round_dp(2))
        .print(json)
}

pub fn preview_position(
    config: &PreviewConfig,
    position: BorrowPosition,
    json: bool,
) -> Result<()> {
    let health = position.health()?;
    let capacity = position.borrow_capacity()?;
    let fees = calculate_borrowing_fees(position.borrowed_amount, config.borrowing_fee_rate_bps)?;

    let mut report = Report::new("Position Preview")
        .row("Collateral value (USD)", position.collateral_value_usd()?.round_dp(2))
        .row("Debt (USD)", position.borrowed_amount)
        .row("Borrow capacity (USD)", capacity.round_dp(2));

    report = match position.current_ratio_pct()? {
        Some(ratio) => report.row("Current ratio (%)", ratio.round_dp(2)),
        None => report.row("Current ratio (%)", "no debt"),
    };
    report = match position.liquidation_price() {
        Ok(price) => report.row("Liquidation price (USD)", price.round_dp(2)),
        Err(e) => report.row("Liquidation price (USD)", format!("n/a ({})", e)),
    };

    let report = report
        .row("Health", health_label(health))
        .row("Fees due (USD)", fees.total_fees.round_dp(2));
    with_health_note(report, health).print(json)
}

pub fn parse_position(btc: Decimal, debt: Decimal, price: Decimal, ratio: Decimal) -> Result<BorrowPosition> {
    if ratio <= Decimal::ZERO {
        return Err(anyhow!("Collateralization ratio must be positive, got {}", ratio));
    }
    Ok(BorrowPosition {
        btc_collateral: btc,
        borrowed_amount: debt,
        btc_price_usd: price,
        collateralization_ratio_pct: ratio,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_position_rejects_zero_ratio() {
        assert!(parse_position(dec!(1), dec!(0), dec!(60000), dec!(0)).is_err());
    }

    #[test]
    fn test_preview_rejects_negative_collateral() {
        let err = preview_borrow_amount(dec!(-0.5), dec!(60000), dec!(150), true).unwrap_err();
        assert!(err.to_string().contains("must not be negative"));
    }

    #[test]
    fn test_liquidation_without_collateral_is_error() {
        let err =
            preview_liquidation_price(&PreviewConfig::default(), dec!(400), dec!(0), None, true)
                .unwrap_err();
        assert!(err.to_string().contains("undefined"));
    }

    #[test]
    fn test_health_note_only_when_at_risk() {
        let healthy = with_health_note(Report::new("t"), CollateralHealth::Healthy).to_json();
        assert!(healthy.get("notes").is_none());
        let risky = with_health_note(Report::new("t"), CollateralHealth::BelowMinimum).to_json();
        assert!(risky["notes"][0].as_str().unwrap().contains("liquidated"));
    }
}
