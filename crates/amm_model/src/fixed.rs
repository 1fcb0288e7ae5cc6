//! 18-decimal fixed point amounts

use core::fmt;

use primitive_types::U256;

use crate::AmmError;

/// Unsigned amount scaled by [`WAD`], same width as an on-chain `uint256`
pub type FixedPoint = U256;

/// Number of fractional digits in a [`FixedPoint`]
pub const DECIMALS: usize = 18;

/// 1.0 in fixed point (1e18)
pub const WAD: FixedPoint = U256([1_000_000_000_000_000_000, 0, 0, 0]);

/// Parse a decimal token amount ("12.5") into fixed point.
///
/// Negative amounts are rejected rather than clamped: a reserve or trade size
/// below zero is a caller bug, not a degenerate pool state.
pub fn parse_fixed(text: &str) -> Result<FixedPoint, AmmError> {
    let text = text.trim();
    if text.starts_with('-') {
        return Err(AmmError::NegativeAmount);
    }

    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (text, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(AmmError::InvalidNumber);
    }
    if frac_part.len() > DECIMALS {
        return Err(AmmError::TooManyDecimals);
    }

    let int_value = parse_digits(int_part)?;
    let frac_value = parse_digits(frac_part)?;
    let frac_scale = U256::exp10(DECIMALS - frac_part.len());

    int_value
        .checked_mul(WAD)
        .and_then(|v| v.checked_add(frac_value * frac_scale))
        .ok_or(AmmError::Overflow)
}

fn parse_digits(digits: &str) -> Result<U256, AmmError> {
    let mut value = U256::zero();
    for byte in digits.bytes() {
        if !byte.is_ascii_digit() {
            return Err(AmmError::InvalidNumber);
        }
        value = value
            .checked_mul(U256::from(10u64))
            .and_then(|v| v.checked_add(U256::from(byte - b'0')))
            .ok_or(AmmError::Overflow)?;
    }
    Ok(value)
}

/// Displays a fixed point amount as a decimal string ("1.5", "90", "0.000001")
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fixed(pub FixedPoint);

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (int_part, frac_part) = self.0.div_mod(WAD);
        if frac_part.is_zero() {
            return write!(f, "{}", int_part);
        }

        // frac_part < 1e18 always fits in a u64
        let mut n = frac_part.low_u64();
        let mut digits = [b'0'; DECIMALS];
        for slot in digits.iter_mut().rev() {
            *slot = b'0' + (n % 10) as u8;
            n /= 10;
        }
        let end = digits.iter().rposition(|&d| d != b'0').map_or(0, |i| i + 1);
        let frac = core::str::from_utf8(&digits[..end]).map_err(|_| fmt::Error)?;
        write!(f, "{}.{}", int_part, frac)
    }
}
