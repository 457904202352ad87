use crate::error::ScoreError;
use crate::symbols::Symbol;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Width of the score the ledger emits; one digit per reel.
pub const SCORE_WIDTH: usize = 3;

/// A 3-digit outcome as delivered by the oracle, decomposed into reel symbols.
///
/// Leading zeros are significant: `"007"` is reels `[0, 0, 7]`, never the number 7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OutcomeScore([Symbol; SCORE_WIDTH]);

impl OutcomeScore {
    pub fn parse(raw: &str) -> Result<Self, ScoreError> {
        let len = raw.chars().count();
        if len != SCORE_WIDTH {
            return Err(ScoreError::WrongLength { len });
        }
        let mut reels = [Symbol::ALL[0]; SCORE_WIDTH];
        for (position, c) in raw.chars().enumerate() {
            let digit = c
                .to_digit(10)
                .ok_or(ScoreError::NotADigit { position, found: c })?;
            reels[position] = Symbol::ALL[digit as usize];
        }
        Ok(Self(reels))
    }

    /// The ledger reports the score as an integer; it is zero-padded to width 3.
    pub fn from_number(n: u32) -> Result<Self, ScoreError> {
        if n >= 1000 {
            return Err(ScoreError::OutOfRange(n));
        }
        Self::parse(&format!("{n:03}"))
    }

    pub fn from_symbols(reels: [Symbol; SCORE_WIDTH]) -> Self {
        Self(reels)
    }

    pub fn symbols(&self) -> [Symbol; SCORE_WIDTH] {
        self.0
    }

    pub fn count_of(&self, symbol: Symbol) -> usize {
        self.0.iter().filter(|s| **s == symbol).count()
    }

    /// Every score in ascending order, `"000"` through `"999"`.
    pub fn all() -> impl Iterator<Item = OutcomeScore> {
        (0u32..1000).map(|n| {
            let d = |v: u32| Symbol::ALL[(v % 10) as usize];
            OutcomeScore([d(n / 100), d(n / 10), d(n)])
        })
    }
}

impl FromStr for OutcomeScore {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for OutcomeScore {
    type Error = ScoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<OutcomeScore> for String {
    fn from(s: OutcomeScore) -> String {
        s.to_string()
    }
}

impl fmt::Display for OutcomeScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for s in self.0 {
            write!(f, "{}", s.to_digit())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_leading_zeros() {
        let s = OutcomeScore::parse("007").unwrap();
        assert_eq!(s.symbols().map(Symbol::to_index), [0, 0, 7]);
        assert_eq!(s.to_string(), "007");
        assert_eq!(OutcomeScore::from_number(7).unwrap(), s);
    }

    #[test]
    fn rejects_malformed_scores() {
        assert_eq!(
            OutcomeScore::parse("77"),
            Err(ScoreError::WrongLength { len: 2 })
        );
        assert_eq!(
            OutcomeScore::parse("7777"),
            Err(ScoreError::WrongLength { len: 4 })
        );
        assert_eq!(
            OutcomeScore::parse("7a7"),
            Err(ScoreError::NotADigit {
                position: 1,
                found: 'a'
            })
        );
        assert!(OutcomeScore::parse(" 77").is_err());
        assert!(OutcomeScore::parse("-77").is_err());
        // full-width digits are not ASCII
        assert!(OutcomeScore::parse("７７７").is_err());
        assert_eq!(
            OutcomeScore::from_number(1000),
            Err(ScoreError::OutOfRange(1000))
        );
    }

    #[test]
    fn enumerates_every_score_once() {
        let all: Vec<_> = OutcomeScore::all().collect();
        assert_eq!(all.len(), 1000);
        assert_eq!(all[0].to_string(), "000");
        assert_eq!(all[42].to_string(), "042");
        assert_eq!(all[999].to_string(), "999");
    }

    #[test]
    fn serde_uses_the_string_form() {
        let s: OutcomeScore = serde_json::from_str("\"050\"").unwrap();
        assert_eq!(serde_json::to_string(&s).unwrap(), "\"050\"");
        assert!(serde_json::from_str::<OutcomeScore>("\"5x0\"").is_err());
    }
}
