use crate::{
    bet::{format_amount, BetAmount},
    error::{PayoutError, ResolveError},
    paytable::PayoutTable,
    score::OutcomeScore,
    symbols::{BonusSymbols, Symbol},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Winning pattern selected for a score. Variants are listed in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "symbol", rename_all = "snake_case")]
pub enum Category {
    Jackpot,
    Triple(Symbol),
    TwoSevens,
    OneSeven,
    TwoCherries,
    TwoBars,
    CherryBonus,
    Pair(Symbol),
    NoWin,
}

impl Category {
    pub fn label(&self) -> String {
        match self {
            Category::Jackpot => "JACKPOT".to_string(),
            Category::Triple(s) => format!("TRIPLE {s}"),
            Category::TwoSevens => "TWO SEVENS".to_string(),
            Category::OneSeven => "ONE SEVEN".to_string(),
            Category::TwoCherries => "TWO CHERRIES".to_string(),
            Category::TwoBars => "TWO BARS".to_string(),
            Category::CherryBonus => "CHERRY BONUS".to_string(),
            Category::Pair(_) => "PAIR".to_string(),
            Category::NoWin => "NO WIN".to_string(),
        }
    }

    pub fn is_win(&self) -> bool {
        !matches!(self, Category::NoWin)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Outcome of one spin. Built fresh per score and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetResolution {
    pub score: OutcomeScore,
    pub category: Category,
    pub multiplier: u32,
    pub is_jackpot: bool,
    pub bet: BetAmount,
    /// Exact `bet x multiplier`; rounding happens only in [`BetResolution::display_payout`].
    pub payout: Decimal,
}

impl BetResolution {
    pub fn is_win(&self) -> bool {
        self.multiplier > 0
    }

    pub fn label(&self) -> String {
        self.category.label()
    }

    pub fn display_payout(&self) -> String {
        format_amount(self.payout)
    }
}

/// First rule that matches wins; rarer, higher-paying patterns come first.
pub fn classify(score: &OutcomeScore, bonus: &BonusSymbols) -> Category {
    let [a, b, c] = score.symbols();
    let sevens = score.count_of(bonus.premium);

    if a == b && b == c {
        return if a == bonus.premium {
            Category::Jackpot
        } else {
            Category::Triple(a)
        };
    }
    match sevens {
        2 => return Category::TwoSevens,
        1 => return Category::OneSeven,
        _ => {}
    }
    let cherries = score.count_of(bonus.cherry);
    if cherries == 2 {
        return Category::TwoCherries;
    }
    if score.count_of(bonus.bar) == 2 {
        return Category::TwoBars;
    }
    if cherries == 1 {
        return Category::CherryBonus;
    }

    if a == b || a == c {
        Category::Pair(a)
    } else if b == c {
        Category::Pair(b)
    } else {
        Category::NoWin
    }
}

/// `bet x multiplier` computed on the mantissa at the bet's own scale, so the
/// result is either exact or an error. `Decimal`'s `Mul` would round or panic.
pub fn exact_payout(bet: BetAmount, multiplier: u32) -> Result<Decimal, PayoutError> {
    let amount = bet.amount();
    amount
        .mantissa()
        .checked_mul(i128::from(multiplier))
        .and_then(|units| Decimal::try_from_i128_with_scale(units, amount.scale()).ok())
        .ok_or(PayoutError::Overflow {
            bet: amount,
            multiplier,
        })
}

pub fn resolve(
    score: &OutcomeScore,
    bet: BetAmount,
    table: &PayoutTable,
) -> Result<BetResolution, PayoutError> {
    let category = classify(score, &table.bonus_symbols());
    let multiplier = table.multiplier(&category);
    Ok(BetResolution {
        score: *score,
        category,
        multiplier,
        is_jackpot: category == Category::Jackpot,
        bet,
        payout: exact_payout(bet, multiplier)?,
    })
}

/// Convenience: parse the oracle's score string, then resolve it.
pub fn resolve_str(
    score: &str,
    bet: BetAmount,
    table: &PayoutTable,
) -> Result<BetResolution, ResolveError> {
    let score = OutcomeScore::parse(score)?;
    Ok(resolve(&score, bet, table)?)
}
