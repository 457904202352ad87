use crate::error::PaytableError;
use crate::resolver::Category;
use crate::symbols::{BonusSymbols, Symbol};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Payout table as written in a config file: a flat map of recognized keys.
///
/// Triple keys are the three repeated digits (`"777"`, `"000"`, ...); the rest are
/// named categories. Nothing here is validated; see [`PayoutTable`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaytableFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub two_sevens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_seven: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub three_of_a_kind: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub two_cherries: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub two_bars: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub two_of_a_kind: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub one_cherry: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cherry_symbol: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bar_symbol: Option<u8>,
    #[serde(flatten)]
    pub triples: BTreeMap<String, u32>,
}

/// A validated payout schedule. Every category the resolver can select has a
/// non-zero multiplier, so resolution never fails once a table exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PaytableFile", into = "PaytableFile")]
pub struct PayoutTable {
    triples: BTreeMap<Symbol, u32>,
    two_sevens: u32,
    one_seven: u32,
    three_of_a_kind: u32,
    two_cherries: u32,
    two_bars: u32,
    two_of_a_kind: u32,
    one_cherry: u32,
    bonus: BonusSymbols,
}

/// Highest multiplier a table may assign. Keeps payouts on the largest bet exact.
pub const MAX_MULTIPLIER: u32 = 10_000;

fn checked_multiplier(key: &str, multiplier: u32) -> Result<u32, PaytableError> {
    match multiplier {
        0 => Err(PaytableError::ZeroMultiplier(key.to_string())),
        m if m > MAX_MULTIPLIER => Err(PaytableError::MultiplierTooLarge {
            key: key.to_string(),
            multiplier: m,
        }),
        m => Ok(m),
    }
}

fn required(value: Option<u32>, key: &'static str) -> Result<u32, PaytableError> {
    let multiplier = value.ok_or(PaytableError::MissingEntry(key))?;
    checked_multiplier(key, multiplier)
}

fn triple_key(key: &str) -> Option<Symbol> {
    let bytes = key.as_bytes();
    if bytes.len() != 3 || !bytes[0].is_ascii_digit() || bytes.iter().any(|b| *b != bytes[0]) {
        return None;
    }
    Symbol::new(bytes[0] - b'0')
}

fn bonus_symbol(id: Option<u8>, default: Symbol) -> Result<Symbol, PaytableError> {
    match id {
        None => Ok(default),
        Some(id) => Symbol::new(id)
            .ok_or_else(|| PaytableError::BonusSymbols(format!("symbol id {id} out of range"))),
    }
}

impl TryFrom<PaytableFile> for PayoutTable {
    type Error = PaytableError;

    fn try_from(file: PaytableFile) -> Result<Self, Self::Error> {
        let mut triples = BTreeMap::new();
        for (key, multiplier) in &file.triples {
            let symbol = triple_key(key).ok_or_else(|| PaytableError::UnknownKey(key.clone()))?;
            triples.insert(symbol, checked_multiplier(key, *multiplier)?);
        }
        if !triples.contains_key(&Symbol::SEVEN) {
            return Err(PaytableError::MissingEntry("777"));
        }

        let bonus = BonusSymbols::with_cherry_and_bar(
            bonus_symbol(file.cherry_symbol, Symbol::CHERRY)?,
            bonus_symbol(file.bar_symbol, Symbol::BAR)?,
        )
        .map_err(PaytableError::BonusSymbols)?;

        Ok(Self {
            triples,
            two_sevens: required(file.two_sevens, "two_sevens")?,
            one_seven: required(file.one_seven, "one_seven")?,
            three_of_a_kind: required(file.three_of_a_kind, "three_of_a_kind")?,
            two_cherries: required(file.two_cherries, "two_cherries")?,
            two_bars: required(file.two_bars, "two_bars")?,
            two_of_a_kind: required(file.two_of_a_kind, "two_of_a_kind")?,
            one_cherry: required(file.one_cherry, "one_cherry")?,
            bonus,
        })
    }
}

impl From<PayoutTable> for PaytableFile {
    fn from(t: PayoutTable) -> Self {
        let defaults = BonusSymbols::default();
        Self {
            two_sevens: Some(t.two_sevens),
            one_seven: Some(t.one_seven),
            three_of_a_kind: Some(t.three_of_a_kind),
            two_cherries: Some(t.two_cherries),
            two_bars: Some(t.two_bars),
            two_of_a_kind: Some(t.two_of_a_kind),
            one_cherry: Some(t.one_cherry),
            cherry_symbol: (t.bonus.cherry != defaults.cherry).then(|| t.bonus.cherry.to_index()),
            bar_symbol: (t.bonus.bar != defaults.bar).then(|| t.bonus.bar.to_index()),
            triples: t
                .triples
                .iter()
                .map(|(s, m)| (s.to_digit().to_string().repeat(3), *m))
                .collect(),
        }
    }
}

impl PayoutTable {
    /// Both observed deployments share every multiplier except the jackpot.
    fn standard(jackpot: u32) -> Self {
        let triples = [
            (7, jackpot),
            (6, 500),
            (5, 300),
            (4, 200),
            (3, 150),
            (2, 100),
            (1, 80),
            (0, 50),
        ]
        .into_iter()
        .map(|(d, m)| (Symbol::ALL[d], m))
        .collect();
        Self {
            triples,
            two_sevens: 20,
            one_seven: 10,
            three_of_a_kind: 15,
            two_cherries: 5,
            two_bars: 5,
            two_of_a_kind: 3,
            one_cherry: 2,
            bonus: BonusSymbols::default(),
        }
    }

    /// The schedule shipped with the Citrea frontend (jackpot pays 1000x).
    pub fn citrea() -> Self {
        Self::standard(1000)
    }

    /// The older deployment's schedule with an 800x jackpot.
    pub fn classic() -> Self {
        Self::standard(800)
    }

    pub fn bonus_symbols(&self) -> BonusSymbols {
        self.bonus
    }

    pub fn jackpot(&self) -> u32 {
        self.triple(Symbol::SEVEN)
    }

    /// Dedicated triple multiplier, or the generic three-of-a-kind fallback.
    pub fn triple(&self, symbol: Symbol) -> u32 {
        self.triples
            .get(&symbol)
            .copied()
            .unwrap_or(self.three_of_a_kind)
    }

    pub fn has_dedicated_triple(&self, symbol: Symbol) -> bool {
        self.triples.contains_key(&symbol)
    }

    /// Multiplier for a resolved category. `NoWin` is the only category paying 0.
    pub fn multiplier(&self, category: &Category) -> u32 {
        match category {
            Category::Jackpot => self.jackpot(),
            Category::Triple(s) => self.triple(*s),
            Category::TwoSevens => self.two_sevens,
            Category::OneSeven => self.one_seven,
            Category::TwoCherries => self.two_cherries,
            Category::TwoBars => self.two_bars,
            Category::CherryBonus => self.one_cherry,
            Category::Pair(_) => self.two_of_a_kind,
            Category::NoWin => 0,
        }
    }

    /// All entries in display order, keyed the way the config file keys them.
    pub fn entries(&self) -> Vec<(String, u32)> {
        let mut out: Vec<(String, u32)> = self
            .triples
            .iter()
            .rev()
            .map(|(s, m)| (s.to_digit().to_string().repeat(3), *m))
            .collect();
        out.extend([
            ("two_sevens".to_string(), self.two_sevens),
            ("one_seven".to_string(), self.one_seven),
            ("three_of_a_kind".to_string(), self.three_of_a_kind),
            ("two_cherries".to_string(), self.two_cherries),
            ("two_bars".to_string(), self.two_bars),
            ("two_of_a_kind".to_string(), self.two_of_a_kind),
            ("one_cherry".to_string(), self.one_cherry),
        ]);
        out
    }
}

impl Default for PayoutTable {
    fn default() -> Self {
        Self::citrea()
    }
}
