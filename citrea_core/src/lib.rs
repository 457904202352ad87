pub mod bet;
pub mod config;
pub mod error;
pub mod oracle;
pub mod paytable;
pub mod reels;
pub mod resolver;
pub mod round;
pub mod rtp;
pub mod score;
pub mod symbols;

pub use crate::bet::{
    format_amount, validate_bet, BetAmount, DISPLAY_PRECISION, MAX_BET, MAX_BET_SCALE,
};
pub use crate::config::{load_paytable, paytable_from_env, resolve_paytable, PAYTABLE_ENV};
pub use crate::error::{
    BetError, ConfigError, OracleError, PayoutError, PaytableError, ReelError, ResolveError,
    RoundError, ScoreError, SimulationError,
};
pub use crate::oracle::{derive_hash_hex, verify_score, ScoreOracle, SeededOracle};
pub use crate::paytable::{PayoutTable, PaytableFile, MAX_MULTIPLIER};
pub use crate::reels::{ReelSet, ReelSetFile, ReelStop, ReelStrip, SpinCue};
pub use crate::resolver::{classify, exact_payout, resolve, resolve_str, BetResolution, Category};
pub use crate::round::{BetEvent, BetRound, RoundState, DEFAULT_BET_TIMEOUT};
pub use crate::rtp::{analyze, simulate, RtpReport, SimulationSummary, SpinRecord};
pub use crate::score::OutcomeScore;
pub use crate::symbols::{BonusSymbols, Symbol};
