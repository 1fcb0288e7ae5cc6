//! Outcome rules shared by the UI explanation and the resolver bot

use std::cmp::Ordering;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Yes,
    No,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Yes => write!(f, "YES"),
            Outcome::No => write!(f, "NO"),
        }
    }
}

/// Which side of the threshold pays YES
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Above,
    Below,
}

impl Direction {
    pub fn from_is_above(is_above_threshold: bool) -> Self {
        if is_above_threshold {
            Direction::Above
        } else {
            Direction::Below
        }
    }

    pub fn is_above(self) -> bool {
        self == Direction::Above
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Above => write!(f, "above"),
            Direction::Below => write!(f, "below"),
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "above" => Ok(Direction::Above),
            "below" => Ok(Direction::Below),
            other => Err(format!("unknown direction '{}', use above or below", other)),
        }
    }
}

/// True once `now_unix_seconds` has reached the expiration
pub fn should_resolve_at(expiration_unix_seconds: i64, now_unix_seconds: i64) -> bool {
    now_unix_seconds >= expiration_unix_seconds
}

/// [`should_resolve_at`] against the wall clock. Not memoizable.
pub fn should_resolve(expiration_unix_seconds: i64) -> bool {
    should_resolve_at(expiration_unix_seconds, chrono::Utc::now().timestamp())
}

/// Both boundaries are inclusive: a price equal to the threshold is YES for
/// `Above` markets and YES for `Below` markets.
///
/// Total over all inputs; negative prices are rejected by [`Market`](crate::Market).
pub fn determine_outcome(
    reference_price_usd: Decimal,
    threshold_usd: Decimal,
    direction: Direction,
) -> Outcome {
    let hit = match direction {
        Direction::Above => reference_price_usd >= threshold_usd,
        Direction::Below => reference_price_usd <= threshold_usd,
    };
    if hit {
        Outcome::Yes
    } else {
        Outcome::No
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MarketOutcomeQuery {
    pub reference_price_usd: Decimal,
    pub threshold_usd: Decimal,
    pub direction: Direction,
    pub expiration_unix_seconds: i64,
}

impl MarketOutcomeQuery {
    pub fn outcome(&self) -> Outcome {
        determine_outcome(self.reference_price_usd, self.threshold_usd, self.direction)
    }

    /// Outcome if the market has expired by `now_unix_seconds`
    pub fn outcome_at(&self, now_unix_seconds: i64) -> Option<Outcome> {
        should_resolve_at(self.expiration_unix_seconds, now_unix_seconds).then(|| self.outcome())
    }

    /// One-line explanation for the results screen
    pub fn explain(&self) -> String {
        let price = self.reference_price_usd.normalize();
        let threshold = self.threshold_usd.normalize();
        let relation = match price.cmp(&threshold) {
            Ordering::Equal => "exactly at",
            Ordering::Greater => "above",
            Ordering::Less => "below",
        };
        format!(
            "Reference price ${} is {} the ${} threshold; market pays YES when {} or equal, so it resolves {}",
            price,
            relation,
            threshold,
            self.direction,
            self.outcome()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn above_market_resolves_yes_over_threshold() {
        assert_eq!(
            determine_outcome(dec!(75000), dec!(70000), Direction::Above),
            Outcome::Yes
        );
        assert_eq!(
            determine_outcome(dec!(69999.99), dec!(70000), Direction::Above),
            Outcome::No
        );
    }

    #[test]
    fn above_market_boundary_is_yes() {
        assert_eq!(
            determine_outcome(dec!(70000), dec!(70000), Direction::Above),
            Outcome::Yes
        );
    }

    #[test]
    fn below_market_boundary_is_yes() {
        assert_eq!(
            determine_outcome(dec!(70000), dec!(70000), Direction::Below),
            Outcome::Yes
        );
        assert_eq!(
            determine_outcome(dec!(65000), dec!(70000), Direction::Below),
            Outcome::Yes
        );
        assert_eq!(
            determine_outcome(dec!(70000.01), dec!(70000), Direction::Below),
            Outcome::No
        );
    }

    #[test]
    fn should_resolve_at_expiration() {
        assert!(!should_resolve_at(1_700_000_000, 1_699_999_999));
        assert!(should_resolve_at(1_700_000_000, 1_700_000_000));
        assert!(should_resolve_at(1_700_000_000, 1_700_000_001));
    }

    #[test]
    fn should_resolve_uses_wall_clock() {
        assert!(should_resolve(0));
        assert!(!should_resolve(i64::MAX));
    }

    #[test]
    fn query_outcome_waits_for_expiry() {
        let query = MarketOutcomeQuery {
            reference_price_usd: dec!(75000),
            threshold_usd: dec!(70000),
            direction: Direction::Above,
            expiration_unix_seconds: 100,
        };
        assert_eq!(query.outcome_at(99), None);
        assert_eq!(query.outcome_at(100), Some(Outcome::Yes));
    }

    #[test]
    fn explanation_names_outcome() {
        let query = MarketOutcomeQuery {
            reference_price_usd: dec!(70000.00),
            threshold_usd: dec!(70000),
            direction: Direction::Below,
            expiration_unix_seconds: 0,
        };
        let text = query.explain();
        assert!(text.contains("$70000 is exactly at the $70000 threshold"));
        assert!(text.ends_with("resolves YES"));
    }

    #[test]
    fn direction_parsing() {
        assert_eq!("Above".parse::<Direction>(), Ok(Direction::Above));
        assert_eq!("below".parse::<Direction>(), Ok(Direction::Below));
        assert!("sideways".parse::<Direction>().is_err());
        assert_eq!(Direction::from_is_above(false), Direction::Below);
    }
}
