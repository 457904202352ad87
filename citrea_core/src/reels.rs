use crate::error::ReelError;
use crate::score::{OutcomeScore, SCORE_WIDTH};
use crate::symbols::Symbol;
use serde::{Deserialize, Serialize};

/// Symbols in the order they pass the window on one physical reel.
/// Only built through [`ReelStrip::new`]; deserialize a [`ReelSet`] instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReelStrip(Vec<Symbol>);

impl ReelStrip {
    pub fn new(reel: usize, symbols: Vec<Symbol>) -> Result<Self, ReelError> {
        if symbols.is_empty() {
            return Err(ReelError::EmptyStrip { reel });
        }
        if let Some(missing) = Symbol::ALL.iter().find(|s| !symbols.contains(s)) {
            return Err(ReelError::MissingSymbol {
                reel,
                symbol: missing.to_index(),
            });
        }
        Ok(Self(symbols))
    }

    /// One of each symbol, in id order.
    pub fn identity() -> Self {
        Self(Symbol::ALL.to_vec())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First strip index showing `symbol`. Strips are validated to contain every symbol.
    pub fn position_of(&self, symbol: Symbol) -> usize {
        self.0.iter().position(|s| *s == symbol).unwrap_or(0)
    }

    pub fn at(&self, index: usize) -> Symbol {
        self.0[index % self.0.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReelStop {
    pub reel: usize,
    pub position: usize,
    pub symbol: Symbol,
}

/// Presentation cue emitted while the reels come to rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpinCue {
    Stop(ReelStop),
    /// All reels are at rest; the outcome may now be revealed.
    Reveal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ReelSetFile")]
pub struct ReelSet {
    strips: [ReelStrip; SCORE_WIDTH],
}

/// Unvalidated strips as written in a config file.
#[derive(Debug, Clone, Deserialize)]
pub struct ReelSetFile {
    pub strips: [Vec<Symbol>; SCORE_WIDTH],
}

impl TryFrom<ReelSetFile> for ReelSet {
    type Error = ReelError;

    fn try_from(file: ReelSetFile) -> Result<Self, Self::Error> {
        let [a, b, c] = file.strips;
        Ok(Self {
            strips: [
                ReelStrip::new(0, a)?,
                ReelStrip::new(1, b)?,
                ReelStrip::new(2, c)?,
            ],
        })
    }
}

impl Default for ReelSet {
    fn default() -> Self {
        Self {
            strips: [
                ReelStrip::identity(),
                ReelStrip::identity(),
                ReelStrip::identity(),
            ],
        }
    }
}

impl ReelSet {
    pub fn new(strips: [ReelStrip; SCORE_WIDTH]) -> Self {
        Self { strips }
    }

    pub fn stop_positions(&self, score: &OutcomeScore) -> [usize; SCORE_WIDTH] {
        let symbols = score.symbols();
        [0, 1, 2].map(|reel| self.strips[reel].position_of(symbols[reel]))
    }

    /// Reels stop left to right and the reveal always comes last.
    pub fn stop_sequence(&self, score: &OutcomeScore) -> Vec<SpinCue> {
        let symbols = score.symbols();
        let mut cues: Vec<SpinCue> = self
            .stop_positions(score)
            .iter()
            .enumerate()
            .map(|(reel, &position)| {
                SpinCue::Stop(ReelStop {
                    reel,
                    position,
                    symbol: symbols[reel],
                })
            })
            .collect();
        cues.push(SpinCue::Reveal);
        cues
    }

    /// Visible `rows x 3` window with the scored symbols on the centre row.
    /// Neighbouring rows wrap around each strip.
    pub fn reel_window(
        &self,
        score: &OutcomeScore,
        rows: usize,
    ) -> Result<Vec<Vec<Symbol>>, ReelError> {
        if rows == 0 {
            return Err(ReelError::NoRows);
        }
        let centre = rows / 2;
        let stops = self.stop_positions(score);
        let mut window = vec![vec![Symbol::ALL[0]; SCORE_WIDTH]; rows];
        for (col, strip) in self.strips.iter().enumerate() {
            let len = strip.len();
            // start = stop - centre, kept non-negative on the circular strip
            let start = (stops[col] + len - centre % len) % len;
            for (r, row) in window.iter_mut().enumerate() {
                row[col] = strip.at(start + r);
            }
        }
        Ok(window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(ids: &[u8]) -> Vec<Symbol> {
        ids.iter().map(|i| Symbol::ALL[*i as usize]).collect()
    }

    #[test]
    fn identity_strip_stops_on_the_digit() {
        let reels = ReelSet::default();
        let score: OutcomeScore = "507".parse().unwrap();
        assert_eq!(reels.stop_positions(&score), [5, 0, 7]);
    }

    #[test]
    fn sequence_stops_left_to_right_then_reveals() {
        let reels = ReelSet::default();
        let cues = reels.stop_sequence(&"123".parse().unwrap());
        assert_eq!(cues.len(), 4);
        for (i, cue) in cues.iter().take(3).enumerate() {
            match cue {
                SpinCue::Stop(stop) => {
                    assert_eq!(stop.reel, i);
                    assert_eq!(stop.symbol.to_index() as usize, i + 1);
                }
                SpinCue::Reveal => panic!("reveal before reel {i} stopped"),
            }
        }
        assert_eq!(cues[3], SpinCue::Reveal);
    }

    #[test]
    fn window_centres_the_payline_and_wraps() {
        let reels = ReelSet::default();
        let window = reels.reel_window(&"090".parse().unwrap(), 3).unwrap();
        assert_eq!(window[1], sym(&[0, 9, 0]));
        assert_eq!(window[0], sym(&[9, 8, 9]));
        assert_eq!(window[2], sym(&[1, 0, 1]));
    }

    #[test]
    fn custom_strips_must_show_every_symbol() {
        assert_eq!(
            ReelStrip::new(1, sym(&[0, 1, 2])),
            Err(ReelError::MissingSymbol { reel: 1, symbol: 3 })
        );
        assert_eq!(
            ReelStrip::new(0, vec![]),
            Err(ReelError::EmptyStrip { reel: 0 })
        );

        let mut ids: Vec<u8> = (0..10).rev().collect();
        ids.push(7);
        let strip = ReelStrip::new(2, sym(&ids)).unwrap();
        // first occurrence wins, so the stop is deterministic
        assert_eq!(strip.position_of(Symbol::SEVEN), 2);

        let reels = ReelSet::new([ReelStrip::identity(), ReelStrip::identity(), strip]);
        assert_eq!(reels.stop_positions(&"777".parse().unwrap()), [7, 7, 2]);
    }

    #[test]
    fn deserialized_strips_are_validated() {
        let err = serde_json::from_str::<ReelSet>(r#"{"strips":[[],[0],[1]]}"#).unwrap_err();
        assert!(err.to_string().contains("reel 0 strip is empty"), "{err}");

        let err =
            serde_json::from_str::<ReelSet>(r#"{"strips":[[0,1,2,3,4,5,6,7,8,9],[0],[1]]}"#)
                .unwrap_err();
        assert!(err.to_string().contains("reel 1 strip never shows symbol 1"), "{err}");

        let json = serde_json::to_string(&ReelSet::default()).unwrap();
        let reels: ReelSet = serde_json::from_str(&json).unwrap();
        assert_eq!(reels, ReelSet::default());
        let window = reels.reel_window(&"505".parse().unwrap(), 3).unwrap();
        assert_eq!(window[1], sym(&[5, 0, 5]));
    }

    #[test]
    fn zero_rows_is_rejected() {
        let reels = ReelSet::default();
        assert_eq!(
            reels.reel_window(&"111".parse().unwrap(), 0),
            Err(ReelError::NoRows)
        );
    }
}
