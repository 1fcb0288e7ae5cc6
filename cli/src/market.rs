//! Market resolution previews

use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;

use market_model::{
    lookup_direction, should_resolve_at, Direction, DirectionSource, Market, MarketError,
    MarketOutcomeQuery,
};

use crate::config::PreviewConfig;
use crate::directions::open_store;
use crate::output::Report;

fn format_timestamp(unix_seconds: i64) -> String {
    match Utc.timestamp_opt(unix_seconds, 0).single() {
        Some(ts) => ts.to_rfc3339(),
        None => unix_seconds.to_string(),
    }
}

/// Resolve `direction`, consulting the configured store when not given
fn market_direction(
    config: &PreviewConfig,
    market: &str,
    direction: Option<Direction>,
) -> Result<(Direction, &'static str)> {
    if let Some(direction) = direction {
        return Ok((direction, "command line"));
    }
    let store = open_store(config).context("Failed to open direction store")?;
    let lookup = lookup_direction(store.as_ref(), market);
    let source = match lookup.source {
        DirectionSource::Stored => "direction store",
        DirectionSource::Fallback => "fallback",
    };
    Ok((lookup.direction, source))
}

#[allow(clippy::too_many_arguments)]
pub fn resolve_market(
    config: &PreviewConfig,
    address: String,
    price: Decimal,
    threshold: Decimal,
    expiration: i64,
    direction: Option<Direction>,
    now: Option<i64>,
    json: bool,
) -> Result<()> {
    let now = now.unwrap_or_else(|| Utc::now().timestamp());
    let (direction, source) = market_direction(config, &address, direction)?;

    let mut report = Report::new("Market Resolution")
        .row("Market", &address)
        .row("Threshold (USD)", threshold)
        .row("Direction", direction)
        .row("Direction source", source)
        .row("Reference price (USD)", price)
        .row("Expiration", format_timestamp(expiration));
    if source == "fallback" {
        report = report.note(format!(
            "No stored direction for {}; assuming {}",
            address, direction
        ));
    }

    let mut market = Market::new(address, threshold, expiration, direction)?;
    match market.resolve(price, now) {
        Ok(outcome) => {
            let query = MarketOutcomeQuery {
                reference_price_usd: price,
                threshold_usd: threshold,
                direction,
                expiration_unix_seconds: expiration,
            };
            report
                .row("Outcome", outcome)
                .row("Explanation", query.explain())
                .print(json)
        }
        Err(MarketError::NotExpired { .. }) => report
            .row("Outcome", "pending")
            .note(format!(
                "Market cannot resolve before {}",
                format_timestamp(expiration)
            ))
            .print(json),
        Err(e) => Err(e.into()),
    }
}

pub fn show_status(expiration: i64, now: Option<i64>, json: bool) -> Result<()> {
    let now = now.unwrap_or_else(|| Utc::now().timestamp());
    let ready = should_resolve_at(expiration, now);

    let mut report = Report::new("Market Status")
        .row("Expiration", format_timestamp(expiration))
        .row("Now", format_timestamp(now))
        .row("Resolvable", if ready { "yes" } else { "no" });
    if !ready {
        report = report.row("Seconds remaining", expiration - now);
    }
    report.print(json)
}
