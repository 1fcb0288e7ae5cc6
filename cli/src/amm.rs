//! AMM quote previews against a reserve snapshot

use anyhow::{anyhow, Result};
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;

use amm_model::{
    calculate_slippage_pct, parse_fixed, price_impact_bps, quote_buy, quote_cost, quote_sell,
    slippage_bps, Fixed, FixedPoint, ReservePair, Side, TradeQuote,
};

use crate::config::PreviewConfig;
use crate::output::Report;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SideArg {
    Yes,
    No,
}

impl From<SideArg> for Side {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::Yes => Side::Yes,
            SideArg::No => Side::No,
        }
    }
}

fn side_label(side: Side) -> &'static str {
    match side {
        Side::Yes => "YES",
        Side::No => "NO",
    }
}

/// Pool snapshot given on the command line, in token units
#[derive(Args, Clone, Debug)]
pub struct PoolArgs {
    /// YES share reserve (e.g. 1000 or 1000.5)
    #[arg(long)]
    pub reserve_yes: String,

    /// NO share reserve
    #[arg(long)]
    pub reserve_no: String,
}

impl PoolArgs {
    pub fn reserves(&self) -> Result<ReservePair> {
        Ok(ReservePair::new(
            parse_amount("YES reserve", &self.reserve_yes)?,
            parse_amount("NO reserve", &self.reserve_no)?,
        ))
    }
}

pub fn parse_amount(label: &str, text: &str) -> Result<FixedPoint> {
    parse_fixed(text).map_err(|e| anyhow!("Invalid {} '{}': {}", label, text, e))
}

/// WAD probability -> percent with two decimals
fn percent(probability: FixedPoint) -> Decimal {
    // probability <= 1e18, so bps fits in a u64
    let bps = (probability * FixedPoint::from(10_000u64) / amm_model::WAD).low_u64();
    Decimal::new(bps as i64, 2)
}

fn bps_percent(bps: u64) -> Decimal {
    Decimal::new(bps as i64, 2)
}

fn quote_report(title: &'static str, side: Side, quote: &TradeQuote, pool: &ReservePair) -> Report {
    let mut report = Report::new(title)
        .row("Side", side_label(side))
        .row("Fee (bps)", quote.fee_bps)
        .row("Reserve in", Fixed(quote.reserve_in_before))
        .row("Reserve out", Fixed(quote.reserve_out_before))
        .row("Price before", format!("{}%", percent(pool.price(side))));

    report = if quote.is_affordable() {
        report.row("Amount in", Fixed(quote.amount_in))
    } else {
        report
            .row("Amount in", "unaffordable")
            .note("Requested shares meet or exceed the pool reserve")
    };
    report = report.row("Amount out", Fixed(quote.amount_out));

    if let Some(avg) = quote.average_price() {
        report = report.row("Average price", Fixed(avg));
    }
    report
}

pub fn preview_buy(
    config: &PreviewConfig,
    side: SideArg,
    amount: &str,
    pool: &PoolArgs,
    fee_bps: Option<u64>,
    json: bool,
) -> Result<()> {
    buy_report(config, side, amount, pool, fee_bps)?.print(json)
}

fn buy_report(
    config: &PreviewConfig,
    side: SideArg,
    amount: &str,
    pool: &PoolArgs,
    fee_bps: Option<u64>,
) -> Result<Report> {
    let side = Side::from(side);
    let reserves = pool.reserves()?;
    let amount = parse_amount("amount", amount)?;
    let quote = quote_buy(&reserves, side, amount, fee_bps.unwrap_or(config.fee_bps))
        .map_err(|e| anyhow!("Quote failed: {}", e))?;

    let report = quote_report("Buy Quote", side, &quote, &reserves);
    // Bootstrap fills are 1:1, there is no curve to measure impact against
    if quote.reserve_in_before.is_zero() || quote.reserve_out_before.is_zero() {
        return Ok(report.note("Pool is not seeded; first trade fills 1:1"));
    }

    let impact = price_impact_bps(
        quote.amount_in,
        quote.reserve_in_before,
        quote.amount_out,
        quote.reserve_out_before,
    );
    Ok(report.row("Price impact", format!("{}%", bps_percent(impact))))
}

pub fn preview_sell(
    config: &PreviewConfig,
    side: SideArg,
    shares: &str,
    pool: &PoolArgs,
    fee_bps: Option<u64>,
    json: bool,
) -> Result<()> {
    let side = Side::from(side);
    let reserves = pool.reserves()?;
    let shares = parse_amount("shares", shares)?;
    let quote = quote_sell(&reserves, side, shares, fee_bps.unwrap_or(config.fee_bps))
        .map_err(|e| anyhow!("Quote failed: {}", e))?;

    let mut report = quote_report("Sell Quote", side, &quote, &reserves);
    if quote.amount_out.is_zero() && !shares.is_zero() {
        report = report.note("Sale would drain the reserve or the pool is empty; nothing is paid out");
    }
    report.print(json)
}

pub fn preview_cost(
    config: &PreviewConfig,
    side: SideArg,
    shares: &str,
    pool: &PoolArgs,
    fee_bps: Option<u64>,
    json: bool,
) -> Result<()> {
    let side = Side::from(side);
    let reserves = pool.reserves()?;
    let shares = parse_amount("shares", shares)?;
    let quote = quote_cost(&reserves, side, shares, fee_bps.unwrap_or(config.fee_bps))
        .map_err(|e| anyhow!("Quote failed: {}", e))?;

    quote_report("Cost Quote", side, &quote, &reserves).print(json)
}

pub fn show_price(pool: &PoolArgs, json: bool) -> Result<()> {
    let reserves = pool.reserves()?;
    let yes = reserves.price(Side::Yes);
    let no = reserves.price(Side::No);

    let mut report = Report::new("Pool Price")
        .row("Reserve YES", Fixed(reserves.reserve_yes))
        .row("Reserve NO", Fixed(reserves.reserve_no))
        .row("Price YES", Fixed(yes))
        .row("Price NO", Fixed(no))
        .row("Probability YES", format!("{}%", percent(yes)))
        .row("Probability NO", format!("{}%", percent(no)));
    if reserves.reserve_yes.is_zero() && reserves.reserve_no.is_zero() {
        report = report.note("Pool is empty; even odds assumed");
    }
    report.print(json)
}

pub fn show_slippage(expected: &str, actual: &str, json: bool) -> Result<()> {
    let expected = parse_amount("expected amount", expected)?;
    let actual = parse_amount("actual amount", actual)?;
    let bps = slippage_bps(expected, actual).map_err(|e| anyhow!("Slippage failed: {}", e))?;
    let pct = calculate_slippage_pct(expected, actual)
        .map_err(|e| anyhow!("Slippage failed: {}", e))?;

    Report::new("Slippage")
        .row("Expected", Fixed(expected))
        .row("Actual", Fixed(actual))
        .row("Slippage (bps)", bps)
        .row("Slippage", format!("{}%", pct))
        .print(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use amm_model::WAD;
    use rust_decimal_macros::dec;

    fn pool(yes: &str, no: &str) -> PoolArgs {
        PoolArgs {
            reserve_yes: yes.to_string(),
            reserve_no: no.to_string(),
        }
    }

    #[test]
    fn test_pool_args_parse() {
        let reserves = pool("1000", "250.5").reserves().unwrap();
        assert_eq!(reserves.reserve_yes, WAD * 1000u64);
        assert_eq!(reserves.reserve_no, WAD * 250u64 + WAD / 2u64);
    }

    #[test]
    fn test_pool_args_reject_negative() {
        let err = pool("-1", "10").reserves().unwrap_err();
        assert!(err.to_string().contains("Invalid YES reserve"));
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(WAD / 2u64), dec!(50.00));
        assert_eq!(percent(WAD / 3u64), dec!(33.33));
        assert_eq!(percent(WAD), dec!(100));
    }

    #[test]
    fn test_quote_report_marks_unaffordable() {
        let reserves = pool("10", "10").reserves().unwrap();
        let quote = quote_cost(&reserves, Side::Yes, WAD * 10u64, 50).unwrap();
        let json = quote_report("Cost Quote", Side::Yes, &quote, &reserves).to_json();
        assert_eq!(json["amount_in"], "unaffordable");
        assert!(json.get("average_price").is_none());
    }

    #[test]
    fn test_buy_report_zero_amount_has_no_impact() {
        let report = buy_report(
            &PreviewConfig::default(),
            SideArg::Yes,
            "0",
            &pool("1000", "1000"),
            None,
        )
        .unwrap();
        assert_eq!(report.to_json()["price_impact"], "0.00%");
    }

    #[test]
    fn test_buy_report_unseeded_pool_skips_impact() {
        let report = buy_report(
            &PreviewConfig::default(),
            SideArg::No,
            "10",
            &pool("0", "0"),
            None,
        )
        .unwrap();
        let json = report.to_json();
        assert!(json.get("price_impact").is_none());
        assert_eq!(json["amount_out"], "10");
        assert!(json["notes"][0].as_str().unwrap().contains("not seeded"));
    }

    #[test]
    fn test_quote_report_even_pool() {
        let reserves = pool("1000", "1000").reserves().unwrap();
        let quote = quote_buy(&reserves, Side::Yes, WAD * 100u64, 0).unwrap();
        let json = quote_report("Buy Quote", Side::Yes, &quote, &reserves).to_json();
        assert_eq!(json["side"], "YES");
        assert_eq!(json["price_before"], "50.00%");
        assert_eq!(json["amount_in"], "100");
    }
}
