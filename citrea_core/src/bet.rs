use crate::error::BetError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fraction digits shown for amounts in the UI.
pub const DISPLAY_PRECISION: u32 = 4;

/// Largest accepted stake, in whole units of the staked asset.
///
/// With at most [`MAX_BET_SCALE`] fraction digits a bet's mantissa stays below
/// 10^24, and table multipliers are capped at
/// [`MAX_MULTIPLIER`](crate::paytable::MAX_MULTIPLIER) (10^4), so every
/// `bet x multiplier` fits the 96-bit decimal mantissa without rounding.
pub const MAX_BET: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Finest accepted stake granularity (wei).
pub const MAX_BET_SCALE: u32 = 18;

/// A validated wager: an exact decimal amount of the staked asset, always `> 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct BetAmount(Decimal);

impl BetAmount {
    pub fn new(amount: Decimal) -> Result<Self, BetError> {
        if amount <= Decimal::ZERO {
            return Err(BetError::NotPositive);
        }
        if amount > MAX_BET {
            return Err(BetError::TooLarge);
        }
        // trailing zeros carry no value; only significant fraction digits count
        let amount = amount.normalize();
        if amount.scale() > MAX_BET_SCALE {
            return Err(BetError::TooPrecise {
                scale: amount.scale(),
            });
        }
        Ok(Self(amount))
    }

    pub fn parse(input: &str) -> Result<Self, BetError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(BetError::Empty);
        }
        // Decimal has no NaN or infinity, so anything that parses is finite.
        let amount = Decimal::from_str(input)
            .or_else(|_| Decimal::from_scientific(input))
            .map_err(|_| BetError::NotANumber(input.to_string()))?;
        Self::new(amount)
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for BetAmount {
    type Error = BetError;

    fn try_from(d: Decimal) -> Result<Self, Self::Error> {
        Self::new(d)
    }
}

impl From<BetAmount> for Decimal {
    fn from(b: BetAmount) -> Decimal {
        b.0
    }
}

impl FromStr for BetAmount {
    type Err = BetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for BetAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

/// Caller-side validation before a bet is dispatched: the amount must be a
/// positive number no larger than the last balance read from the ledger.
pub fn validate_bet(input: &str, balance: Decimal) -> Result<BetAmount, BetError> {
    let bet = BetAmount::parse(input)?;
    if bet.amount() > balance {
        return Err(BetError::InsufficientBalance);
    }
    Ok(bet)
}

/// Rounds for display only. Never feed the result back into arithmetic.
pub fn format_amount(amount: Decimal) -> String {
    let mut rounded = amount.round_dp(DISPLAY_PRECISION);
    rounded.rescale(DISPLAY_PRECISION);
    rounded.to_string()
}
