//! Return-to-player analysis of a payout table.
//!
//! Every score is equiprobable under a fair oracle, so the exact return is the
//! mean multiplier over all 1000 scores. `simulate` gives the empirical figure
//! for a concrete oracle.

use crate::{
    bet::BetAmount,
    error::{PayoutError, SimulationError},
    oracle::ScoreOracle,
    paytable::PayoutTable,
    resolver::{classify, resolve, Category},
    score::OutcomeScore,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const SCORE_SPACE: u32 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub category: Category,
    pub label: String,
    pub multiplier: u32,
    pub hits: u32,
    pub probability: Decimal,
    /// probability x multiplier
    pub contribution: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RtpReport {
    pub rows: Vec<CategoryStats>,
    pub hit_frequency: Decimal,
    pub rtp: Decimal,
}

fn rank(c: &Category) -> (u8, u8) {
    match c {
        Category::Jackpot => (0, 0),
        // higher symbols first, matching the config file order
        Category::Triple(s) => (1, 9 - s.to_index()),
        Category::TwoSevens => (2, 0),
        Category::OneSeven => (3, 0),
        Category::TwoCherries => (4, 0),
        Category::TwoBars => (5, 0),
        Category::CherryBonus => (6, 0),
        Category::Pair(_) => (7, 0),
        Category::NoWin => (8, 0),
    }
}

pub fn analyze(table: &PayoutTable) -> RtpReport {
    let bonus = table.bonus_symbols();
    let mut tally: BTreeMap<(u8, u8), (Category, u32)> = BTreeMap::new();
    for score in OutcomeScore::all() {
        let category = classify(&score, &bonus);
        tally.entry(rank(&category)).or_insert((category, 0)).1 += 1;
    }

    let space = Decimal::from(SCORE_SPACE);
    let rows: Vec<CategoryStats> = tally
        .into_values()
        .map(|(category, hits)| {
            let multiplier = table.multiplier(&category);
            let probability = Decimal::from(hits) / space;
            CategoryStats {
                category,
                label: category.label(),
                multiplier,
                hits,
                probability,
                contribution: probability * Decimal::from(multiplier),
            }
        })
        .collect();

    let winning: u32 = rows
        .iter()
        .filter(|r| r.category.is_win())
        .map(|r| r.hits)
        .sum();
    let rtp = rows.iter().map(|r| r.contribution).sum();
    RtpReport {
        rows,
        hit_frequency: Decimal::from(winning) / space,
        rtp,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinRecord {
    pub nonce: u64,
    pub score: OutcomeScore,
    pub label: String,
    pub multiplier: u32,
    pub payout: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub spins: u64,
    pub wins: u64,
    pub jackpots: u64,
    pub total_bet: Decimal,
    pub total_payout: Decimal,
    pub records: Vec<SpinRecord>,
}

impl SimulationSummary {
    /// Observed return; `None` before any spin.
    pub fn rtp(&self) -> Option<Decimal> {
        (self.total_bet > Decimal::ZERO).then(|| self.total_payout / self.total_bet)
    }
}

/// Spin `spins` times against `oracle`, using nonces `0..spins`.
pub fn simulate(
    oracle: &dyn ScoreOracle,
    player: &str,
    table: &PayoutTable,
    bet: BetAmount,
    spins: u64,
) -> Result<SimulationSummary, SimulationError> {
    let overflow = PayoutError::TotalOverflow { spins };
    // totals are summed as mantissas at the bet's scale so they stay exact
    let scale = bet.amount().scale();
    let stake = bet.amount().mantissa();
    let mut bet_units: i128 = 0;
    let mut payout_units: i128 = 0;
    let mut summary = SimulationSummary {
        spins,
        wins: 0,
        jackpots: 0,
        total_bet: Decimal::ZERO,
        total_payout: Decimal::ZERO,
        records: Vec::with_capacity(spins.min(1 << 20) as usize),
    };
    for nonce in 0..spins {
        let score = oracle.draw(player, nonce)?;
        let r = resolve(&score, bet, table)?;
        bet_units = bet_units.checked_add(stake).ok_or(overflow)?;
        payout_units = stake
            .checked_mul(i128::from(r.multiplier))
            .and_then(|p| payout_units.checked_add(p))
            .ok_or(overflow)?;
        summary.wins += r.is_win() as u64;
        summary.jackpots += r.is_jackpot as u64;
        summary.records.push(SpinRecord {
            nonce,
            score,
            label: r.label(),
            multiplier: r.multiplier,
            payout: r.payout,
        });
    }
    summary.total_bet =
        Decimal::try_from_i128_with_scale(bet_units, scale).map_err(|_| overflow)?;
    summary.total_payout =
        Decimal::try_from_i128_with_scale(payout_units, scale).map_err(|_| overflow)?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::SeededOracle;
    use rust_decimal_macros::dec;

    fn hits(report: &RtpReport, label: &str) -> u32 {
        report
            .rows
            .iter()
            .filter(|r| r.label == label)
            .map(|r| r.hits)
            .sum()
    }

    #[test]
    fn every_score_is_counted_once() {
        let report = analyze(&PayoutTable::citrea());
        let total: u32 = report.rows.iter().map(|r| r.hits).sum();
        assert_eq!(total, 1000);
        assert_eq!(hits(&report, "JACKPOT"), 1);
        assert_eq!(hits(&report, "TWO SEVENS"), 27);
        assert_eq!(hits(&report, "ONE SEVEN"), 243);
        assert_eq!(hits(&report, "TWO CHERRIES"), 24);
        assert_eq!(hits(&report, "TWO BARS"), 24);
        assert_eq!(hits(&report, "CHERRY BONUS"), 189);
        assert_eq!(hits(&report, "PAIR"), 147);
        assert_eq!(hits(&report, "NO WIN"), 336);
        assert_eq!(report.rows[0].category, Category::Jackpot);
        assert_eq!(report.rows.last().map(|r| r.category), Some(Category::NoWin));
    }

    #[test]
    fn exact_return_of_both_schedules() {
        let citrea = analyze(&PayoutTable::citrea());
        assert_eq!(citrea.rtp, dec!(6.439));
        assert_eq!(citrea.hit_frequency, dec!(0.664));
        // only the jackpot differs: 200x on a 1-in-1000 score
        assert_eq!(analyze(&PayoutTable::classic()).rtp, dec!(6.239));
    }

    #[test]
    fn simulation_is_reproducible() {
        let oracle = SeededOracle::new("server", "client");
        let table = PayoutTable::citrea();
        let bet = BetAmount::new(dec!(0.01)).unwrap();
        let a = simulate(&oracle, "0x1", &table, bet, 200).unwrap();
        let b = simulate(&oracle, "0x1", &table, bet, 200).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.records.len(), 200);
        assert_eq!(a.total_bet, dec!(2.00));
        let paid: Decimal = a.records.iter().map(|r| r.payout).sum();
        assert_eq!(paid, a.total_payout);
        assert!(a.rtp().is_some());
    }

    #[test]
    fn maximum_stakes_total_without_panicking() {
        let oracle = SeededOracle::new("server", "client");
        let bet = BetAmount::new(crate::bet::MAX_BET).unwrap();
        let s = simulate(&oracle, "0x1", &PayoutTable::citrea(), bet, 500).unwrap();
        assert_eq!(s.total_bet, dec!(500000000));
        let paid: Decimal = s.records.iter().map(|r| r.payout).sum();
        assert_eq!(paid, s.total_payout);
    }

    #[test]
    fn empty_simulation_has_no_rtp() {
        let oracle = SeededOracle::new("s", "c");
        let bet = BetAmount::new(dec!(1)).unwrap();
        let s = simulate(&oracle, "0x1", &PayoutTable::citrea(), bet, 0).unwrap();
        assert_eq!(s.rtp(), None);
    }
}
