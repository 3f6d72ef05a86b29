//! Lenient numeric handling for on-chain facts.
//!
//! Fact sources hand over amounts as decimal strings. A value that does not
//! parse is read as zero and reported with a warning; it never becomes an
//! error.

use std::str::FromStr;

use alloy_primitives::aliases::{I512, U512};
use alloy_primitives::U256;
use rust_decimal::Decimal;
use tracing::warn;

/// Largest decimal exponent whose power of ten fits in a `U256`.
pub const MAX_UNIT_DECIMALS: u8 = 77;

/// A coerced numeric fact.
///
/// Integer strings keep full precision up to 512 bits, which covers any
/// on-chain integer. Fractional and scientific notation go through `Decimal`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FactAmount {
    Integer(I512),
    Fractional(Decimal),
}

impl FactAmount {
    pub const ZERO: FactAmount = FactAmount::Integer(I512::ZERO);

    pub fn is_positive(&self) -> bool {
        match self {
            FactAmount::Integer(value) => value.is_positive(),
            FactAmount::Fractional(value) => *value > Decimal::ZERO,
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            FactAmount::Integer(value) => value.is_zero(),
            FactAmount::Fractional(value) => value.is_zero(),
        }
    }

    /// `self - rhs`, `None` on overflow.
    pub fn checked_sub_u64(self, rhs: u64) -> Option<FactAmount> {
        match self {
            FactAmount::Integer(value) => value
                .checked_sub(I512::from_raw(U512::from(rhs)))
                .map(FactAmount::Integer),
            FactAmount::Fractional(value) => value
                .checked_sub(Decimal::from(rhs))
                .map(FactAmount::Fractional),
        }
    }
}

impl Default for FactAmount {
    fn default() -> Self {
        FactAmount::ZERO
    }
}

/// Renders without a redundant fractional scale: `"5.0"` shows as `5`.
impl std::fmt::Display for FactAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FactAmount::Integer(value) => write!(f, "{}", value),
            FactAmount::Fractional(value) => write!(f, "{}", value.normalize()),
        }
    }
}

/// Parse a numeric fact, reading it as zero only when no parser accepts it.
///
/// Integers are tried first at 512-bit width, then plain (`"12.5"`) and
/// scientific (`"1e3"`) decimals. Surrounding whitespace is ignored. `field`
/// only labels the warning.
pub fn coerce_amount(field: &'static str, raw: &str) -> FactAmount {
    let trimmed = raw.trim();
    if let Ok(value) = I512::from_dec_str(trimmed) {
        return FactAmount::Integer(value);
    }
    match Decimal::from_str(trimmed).or_else(|_| Decimal::from_scientific(trimmed)) {
        Ok(value) => FactAmount::Fractional(value),
        Err(e) => {
            warn!(field, raw, error = %e, "Malformed numeric fact, reading as zero");
            FactAmount::ZERO
        }
    }
}

/// Parse a smallest-unit integer string, reading anything malformed as zero.
pub fn coerce_units(field: &'static str, raw: &str) -> U256 {
    match U256::from_str_radix(raw.trim(), 10) {
        Ok(value) => value,
        Err(e) => {
            warn!(field, raw, error = %e, "Malformed unit amount, reading as zero");
            U256::ZERO
        }
    }
}

/// Scale a smallest-unit integer down by `10^decimals`.
///
/// Trailing fractional zeros are dropped, so whole amounts render without a
/// decimal point.
pub fn format_units(value: U256, decimals: u8) -> String {
    if decimals == 0 {
        return value.to_string();
    }
    let decimals = decimals.min(MAX_UNIT_DECIMALS);
    let unit = U256::from(10u64).pow(U256::from(decimals));
    let whole = value / unit;
    let fraction = value % unit;
    if fraction.is_zero() {
        return whole.to_string();
    }
    let fraction = format!("{:0>width$}", fraction.to_string(), width = decimals as usize);
    format!("{}.{}", whole, fraction.trim_end_matches('0'))
}
